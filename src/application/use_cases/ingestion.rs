// ============================================================
// INGESTION PIPELINE
// ============================================================
// Raw upload bytes -> parsed table -> normalized table -> staged
// artifact + semantic model

use tracing::info;

use crate::application::use_cases::normalizer::Normalizer;
use crate::domain::error::Result;
use crate::domain::semantic_model::SemanticModel;
use crate::infrastructure::parsers::{parse_upload, UploadFormat};
use crate::infrastructure::staging::{StagedArtifact, StagingWriter};

/// A successfully ingested upload: the staged artifact plus the
/// semantic model describing it to the query agent.
#[derive(Debug)]
pub struct IngestedUpload {
    pub artifact: StagedArtifact,
    pub semantic_model: SemanticModel,
}

/// One-shot ingestion pipeline. Any step failing aborts the whole run
/// with a single descriptive error; no partial artifact is exposed.
pub struct IngestionPipeline {
    staging: StagingWriter,
    normalizer: Normalizer,
}

impl IngestionPipeline {
    pub fn new(staging: StagingWriter) -> Self {
        Self {
            staging,
            normalizer: Normalizer::new(),
        }
    }

    pub fn ingest(&self, upload: &[u8], filename: &str) -> Result<IngestedUpload> {
        // Format selection trusts the extension only
        let format = UploadFormat::from_filename(filename)?;

        let raw = parse_upload(format, upload)?;
        info!(
            filename,
            rows = raw.row_count(),
            columns = raw.columns().len(),
            "Parsed upload"
        );

        let normalized = self.normalizer.normalize(raw);
        let artifact = self.staging.stage(normalized)?;
        let semantic_model = SemanticModel::for_uploaded_data(artifact.path());

        Ok(IngestedUpload {
            artifact,
            semantic_model,
        })
    }
}
