// ============================================================
// TABLE TYPES
// ============================================================
// Data structures for ingested tabular data, before and after
// normalization

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::{AppError, Result};

/// Semantic type assigned to a column during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    Timestamp,
    Numeric,
    Text,
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SemanticType::Timestamp => write!(f, "timestamp"),
            SemanticType::Numeric => write!(f, "numeric"),
            SemanticType::Text => write!(f, "text"),
        }
    }
}

/// A single coerced cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Null,
    Timestamp(NaiveDateTime),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render the cell for delimited-text output. Null renders as an
    /// empty field.
    pub fn render(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// A named column of opaque string cells, as parsed from an upload.
/// Missing cells are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

impl RawColumn {
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// An ordered set of raw columns of equal length with unique names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTable {
    columns: Vec<RawColumn>,
}

impl RawTable {
    /// Build a table, enforcing the column invariants.
    pub fn new(columns: Vec<RawColumn>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(AppError::ValidationError(format!(
                    "Duplicate column name: {}",
                    column.name
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.values.len();
            for column in &columns {
                if column.values.len() != expected {
                    return Err(AppError::ValidationError(format!(
                        "Column {} has {} rows, expected {}",
                        column.name,
                        column.values.len(),
                        expected
                    )));
                }
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[RawColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<RawColumn> {
        self.columns
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }
}

/// A column with an assigned semantic type and coerced cells. Every
/// cell is either a value of that type or `Null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedColumn {
    pub name: String,
    pub semantic_type: SemanticType,
    pub values: Vec<CellValue>,
}

/// A fully normalized table, same column order and names as its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub columns: Vec<NormalizedColumn>,
}

impl NormalizedTable {
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.values.len()).unwrap_or(0)
    }

    /// Iterate the table row-wise in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&CellValue>> + '_ {
        (0..self.row_count()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }
}
