// ============================================================
// UPLOAD PARSERS
// ============================================================
// Turn raw upload bytes into a RawTable, dispatched on file extension

mod csv;
mod xlsx;

pub use csv::CsvUploadParser;
pub use xlsx::XlsxUploadParser;

use std::path::Path;

use crate::domain::error::{AppError, Result};
use crate::domain::table::RawTable;

/// Tokens treated as an explicit null marker during raw parsing
pub const NULL_SENTINELS: &[&str] = &["NA", "N/A", "missing"];

/// Supported upload formats. Selection trusts the filename extension
/// only; upload bytes are never sniffed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Xlsx,
}

impl UploadFormat {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        if extension.eq_ignore_ascii_case("csv") {
            Ok(UploadFormat::Csv)
        } else if extension.eq_ignore_ascii_case("xlsx") {
            Ok(UploadFormat::Xlsx)
        } else {
            Err(AppError::UnsupportedFormat(format!(
                "Unsupported file format for {:?}. Please upload a CSV or Excel file.",
                filename
            )))
        }
    }
}

/// Parse upload bytes into a RawTable using the parser for `format`.
pub fn parse_upload(format: UploadFormat, bytes: &[u8]) -> Result<RawTable> {
    match format {
        UploadFormat::Csv => CsvUploadParser::new().parse(bytes),
        UploadFormat::Xlsx => XlsxUploadParser::new().parse(bytes),
    }
}

/// Map one raw cell to its nullable form: empty cells and the sentinel
/// tokens become null, everything else passes through.
pub(crate) fn cell_from_raw(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || NULL_SENTINELS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dispatch() {
        assert_eq!(
            UploadFormat::from_filename("orders.csv").unwrap(),
            UploadFormat::Csv
        );
        assert_eq!(
            UploadFormat::from_filename("Report.XLSX").unwrap(),
            UploadFormat::Xlsx
        );
        assert!(matches!(
            UploadFormat::from_filename("data.txt"),
            Err(AppError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            UploadFormat::from_filename("no_extension"),
            Err(AppError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_sentinel_cells_become_null() {
        assert_eq!(cell_from_raw("NA"), None);
        assert_eq!(cell_from_raw("N/A"), None);
        assert_eq!(cell_from_raw("missing"), None);
        assert_eq!(cell_from_raw(""), None);
        assert_eq!(cell_from_raw("  "), None);
        assert_eq!(cell_from_raw("na"), Some("na".to_string()));
        assert_eq!(cell_from_raw("value"), Some("value".to_string()));
    }
}
