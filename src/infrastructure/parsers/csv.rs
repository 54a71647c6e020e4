// ============================================================
// CSV UPLOAD PARSER
// ============================================================
// Parse CSV upload bytes with encoding fallback and error handling

use csv::{ReaderBuilder, Trim};

use super::cell_from_raw;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{RawColumn, RawTable};

/// Comma-delimited parser for uploaded files; the staged-artifact
/// format downstream is comma-separated, so the delimiter is fixed.
pub struct CsvUploadParser {
    /// Whether to trim whitespace from values
    trim: bool,
}

impl Default for CsvUploadParser {
    fn default() -> Self {
        Self { trim: true }
    }
}

impl CsvUploadParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse upload bytes into a column-oriented RawTable.
    pub fn parse(&self, bytes: &[u8]) -> Result<RawTable> {
        let content = decode_bytes(bytes);

        let mut reader = ReaderBuilder::new()
            .trim(if self.trim { Trim::All } else { Trim::None })
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        if headers.is_empty() {
            return Err(AppError::ParseError(
                "CSV file has no header row".to_string(),
            ));
        }

        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.len() != headers.len() {
                return Err(AppError::ParseError(format!(
                    "CSV row {} has {} fields, expected {}",
                    index + 1,
                    record.len(),
                    headers.len()
                )));
            }

            for (idx, value) in record.iter().enumerate() {
                columns[idx].push(cell_from_raw(value));
            }
        }

        let columns = headers
            .iter()
            .zip(columns)
            .map(|(name, values)| RawColumn::new(name, values))
            .collect();

        RawTable::new(columns)
    }
}

/// Decode upload bytes: UTF-8 first, Windows-1252 as fallback for
/// legacy exports.
fn decode_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(content) => content.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.to_string()
        }
    }
}
