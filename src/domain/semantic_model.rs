use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{AppError, Result};

/// Name the query agent uses to refer to the staged table
pub const UPLOADED_TABLE_NAME: &str = "uploaded_data";

const UPLOADED_TABLE_DESCRIPTION: &str = "Contains the uploaded dataset.";

/// One queryable table entry in the semantic model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub name: String,
    pub description: String,
    pub path: String,
}

/// Manifest describing the staged tables to the query agent. Built once
/// per successful upload and handed to the agent with every question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticModel {
    pub tables: Vec<TableEntry>,
}

impl SemanticModel {
    /// Model for a single staged upload at the given path.
    pub fn for_uploaded_data(path: &Path) -> Self {
        Self {
            tables: vec![TableEntry {
                name: UPLOADED_TABLE_NAME.to_string(),
                description: UPLOADED_TABLE_DESCRIPTION.to_string(),
                path: path.to_string_lossy().to_string(),
            }],
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| AppError::Internal(format!("Failed to serialize semantic model: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_semantic_model_json_shape() {
        let model = SemanticModel::for_uploaded_data(&PathBuf::from("/tmp/staged.csv"));
        let json: serde_json::Value = serde_json::from_str(&model.to_json().unwrap()).unwrap();

        assert_eq!(json["tables"][0]["name"], "uploaded_data");
        assert_eq!(json["tables"][0]["path"], "/tmp/staged.csv");
        assert!(json["tables"][0]["description"]
            .as_str()
            .unwrap()
            .contains("uploaded dataset"));
    }
}
