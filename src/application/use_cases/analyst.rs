// ============================================================
// ANALYST SESSION
// ============================================================
// Owns the agent client, the session config, and the current staged
// upload; one upload and one question at a time

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::application::use_cases::ingestion::{IngestedUpload, IngestionPipeline};
use crate::domain::agent_config::AgentConfig;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::agent::AgentClient;
use crate::infrastructure::staging::StagingWriter;

/// What the caller gets back after a successful upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadSummary {
    pub columns: Vec<String>,
    pub rows: usize,
    pub path: String,
}

/// A single user session: config is set once at construction and
/// read-only afterwards; at most one staged upload exists at a time.
pub struct AnalystSession {
    config: AgentConfig,
    agent: Arc<dyn AgentClient>,
    pipeline: IngestionPipeline,
    current: Option<IngestedUpload>,
}

impl AnalystSession {
    pub fn new(config: AgentConfig, staging: StagingWriter, agent: Arc<dyn AgentClient>) -> Self {
        Self {
            config,
            agent,
            pipeline: IngestionPipeline::new(staging),
            current: None,
        }
    }

    /// Ingest a new upload, replacing (and thereby deleting) any
    /// previously staged artifact.
    pub fn upload(&mut self, bytes: &[u8], filename: &str) -> Result<UploadSummary> {
        let ingested = self.pipeline.ingest(bytes, filename)?;

        let summary = UploadSummary {
            columns: ingested.artifact.columns().to_vec(),
            rows: ingested.artifact.table().row_count(),
            path: ingested.artifact.path().to_string_lossy().to_string(),
        };

        // Old artifact (if any) is dropped here, which removes its file
        self.current = Some(ingested);
        info!(filename, rows = summary.rows, "Upload staged for querying");

        Ok(summary)
    }

    /// Forward a natural-language question to the query agent. Agent
    /// failures are local to the question; the staged upload stays
    /// valid for a retry.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let upload = self.current.as_ref().ok_or_else(|| {
            AppError::ValidationError(
                "No data uploaded yet. Upload a CSV or Excel file first.".to_string(),
            )
        })?;

        self.agent
            .ask(&self.config, &upload.semantic_model, question)
            .await
    }

    pub fn has_upload(&self) -> bool {
        self.current.is_some()
    }

    pub fn columns(&self) -> Option<Vec<String>> {
        self.current
            .as_ref()
            .map(|u| u.artifact.columns().to_vec())
    }
}
