// ============================================================
// STAGING WRITER
// ============================================================
// Serialize a normalized table to a durable, uniquely-named artifact
// for the external query engine

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::error::{AppError, Result};
use crate::domain::table::NormalizedTable;

/// A staged serialization of a normalized table. Owns its file: dropping
/// the artifact deletes it, so a session holding one artifact at a time
/// never accumulates stale files.
#[derive(Debug)]
pub struct StagedArtifact {
    path: PathBuf,
    columns: Vec<String>,
    table: NormalizedTable,
}

impl StagedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn table(&self) -> &NormalizedTable {
        &self.table
    }
}

impl Drop for StagedArtifact {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "Failed to remove staged artifact");
        }
    }
}

/// Writes staged artifacts into a staging directory. Every call
/// produces a fresh uuid-named path; paths are never reused.
pub struct StagingWriter {
    staging_dir: PathBuf,
}

impl StagingWriter {
    pub fn new(staging_dir: Option<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.unwrap_or_else(std::env::temp_dir),
        }
    }

    /// Serialize the table as comma-delimited text with every field
    /// wrapped in double quotes, then fsync before returning so the
    /// downstream engine can open the path immediately.
    pub fn stage(&self, table: NormalizedTable) -> Result<StagedArtifact> {
        fs::create_dir_all(&self.staging_dir).map_err(|e| {
            AppError::IoError(format!(
                "Failed to create staging dir {}: {}",
                self.staging_dir.display(),
                e
            ))
        })?;

        let path = self
            .staging_dir
            .join(format!("uploaded-{}.csv", Uuid::new_v4()));

        if let Err(e) = write_table(&path, &table) {
            // No partial artifact may survive a failed staging run
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        info!(
            path = %path.display(),
            rows = table.row_count(),
            columns = table.columns.len(),
            "Staged upload artifact"
        );

        let columns = table.column_names();
        Ok(StagedArtifact {
            path,
            columns,
            table,
        })
    }
}

fn write_table(path: &Path, table: &NormalizedTable) -> Result<()> {
    let file = fs::File::create(path)
        .map_err(|e| AppError::IoError(format!("Failed to create {}: {}", path.display(), e)))?;
    let mut writer = BufWriter::new(file);

    // Header row. Column names are raw, so escape quotes here; text
    // cells below were already sanitized by the normalizer.
    let header = table
        .columns
        .iter()
        .map(|c| format!("\"{}\"", c.name.replace('"', "\"\"")))
        .collect::<Vec<_>>()
        .join(",");
    writeln!(writer, "{}", header)
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", path.display(), e)))?;

    for row in table.rows() {
        let line = row
            .iter()
            .map(|cell| format!("\"{}\"", cell.render()))
            .collect::<Vec<_>>()
            .join(",");
        writeln!(writer, "{}", line)
            .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::IoError(format!("Failed to flush {}: {}", path.display(), e)))?;
    writer
        .into_inner()
        .map_err(|e| AppError::IoError(format!("Failed to flush {}: {}", path.display(), e)))?
        .sync_all()
        .map_err(|e| AppError::IoError(format!("Failed to sync {}: {}", path.display(), e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::{CellValue, NormalizedColumn, SemanticType};

    fn sample_table() -> NormalizedTable {
        NormalizedTable {
            columns: vec![
                NormalizedColumn {
                    name: "id".to_string(),
                    semantic_type: SemanticType::Numeric,
                    values: vec![CellValue::Number(1.0), CellValue::Number(2.0)],
                },
                NormalizedColumn {
                    name: "note".to_string(),
                    semantic_type: SemanticType::Text,
                    values: vec![
                        // Pre-sanitized, as the normalizer would hand it over
                        CellValue::Text("plain".to_string()),
                        CellValue::Text(r#"has ""quotes"""#.to_string()),
                    ],
                },
            ],
        }
    }

    #[test]
    fn test_artifact_is_fully_quoted_and_readable() {
        let writer = StagingWriter::new(None);
        let artifact = writer.stage(sample_table()).unwrap();

        let content = fs::read_to_string(artifact.path()).unwrap();
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some(r#""id","note""#));
        assert_eq!(lines.next(), Some(r#""1","plain""#));
        // Doubled quote survives inside exactly one pair of wrapping quotes
        assert_eq!(lines.next(), Some(r#""2","has ""quotes""""#));
        assert_eq!(lines.next(), None);

        // A standard CSV reader recovers the original text
        let mut reader = csv::Reader::from_path(artifact.path()).unwrap();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows[1].get(1), Some(r#"has "quotes""#));
    }

    #[test]
    fn test_paths_are_never_reused() {
        let writer = StagingWriter::new(None);
        let a = writer.stage(sample_table()).unwrap();
        let b = writer.stage(sample_table()).unwrap();

        assert_ne!(a.path(), b.path());
        assert!(a.path().exists());
        assert!(b.path().exists());
    }

    #[test]
    fn test_drop_deletes_artifact_file() {
        let writer = StagingWriter::new(None);
        let artifact = writer.stage(sample_table()).unwrap();
        let path = artifact.path().to_path_buf();

        assert!(path.exists());
        drop(artifact);
        assert!(!path.exists());
    }

    #[test]
    fn test_artifact_reports_columns_in_order() {
        let writer = StagingWriter::new(None);
        let artifact = writer.stage(sample_table()).unwrap();
        assert_eq!(artifact.columns(), ["id", "note"]);
    }

    #[test]
    fn test_null_cells_render_as_empty_quoted_fields() {
        let table = NormalizedTable {
            columns: vec![NormalizedColumn {
                name: "amount".to_string(),
                semantic_type: SemanticType::Numeric,
                values: vec![CellValue::Null],
            }],
        };

        let writer = StagingWriter::new(None);
        let artifact = writer.stage(table).unwrap();
        let content = fs::read_to_string(artifact.path()).unwrap();
        assert_eq!(content, "\"amount\"\n\"\"\n");
    }
}
