// ============================================================
// XLSX UPLOAD PARSER
// ============================================================
// Parse Excel upload bytes via calamine, first worksheet only

use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};

use super::cell_from_raw;
use crate::domain::error::{AppError, Result};
use crate::domain::table::{RawColumn, RawTable};

/// Excel parser for uploaded files. Reads the first worksheet and
/// treats its first row as the header.
pub struct XlsxUploadParser;

impl XlsxUploadParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<RawTable> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
            .map_err(|e| AppError::ParseError(format!("Failed to open Excel file: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::ParseError("No worksheet found in Excel file".to_string()))?
            .map_err(|e| AppError::ParseError(format!("Failed to read Excel range: {}", e)))?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| AppError::ParseError("Excel sheet has no header row".to_string()))?;

        let headers: Vec<String> = header_row.iter().map(render_cell).collect();
        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];

        for row in rows {
            for idx in 0..headers.len() {
                let cell = row.get(idx);
                let value = match cell {
                    None | Some(Data::Empty) => None,
                    Some(cell) => cell_from_raw(&render_cell(cell)),
                };
                columns[idx].push(value);
            }
        }

        let columns = headers
            .into_iter()
            .zip(columns)
            .map(|(name, values)| RawColumn::new(name, values))
            .collect();

        RawTable::new(columns)
    }
}

impl Default for XlsxUploadParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a worksheet cell to its string form
fn render_cell(cell: &Data) -> String {
    cell.as_string()
        .map(|s| s.to_string())
        .unwrap_or_else(|| format!("{}", cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes() -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        sheet.write_string(0, 0, "id").unwrap();
        sheet.write_string(0, 1, "status").unwrap();

        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_string(1, 1, "NA").unwrap();
        sheet.write_number(2, 0, 2.0).unwrap();
        sheet.write_string(2, 1, "N/A").unwrap();
        sheet.write_number(3, 0, 3.0).unwrap();
        sheet.write_string(3, 1, "missing").unwrap();
        // Row 4 leaves the status cell unwritten entirely
        sheet.write_number(4, 0, 4.0).unwrap();
        sheet.write_number(5, 0, 5.0).unwrap();
        sheet.write_string(5, 1, "ok").unwrap();

        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_parse_worksheet_with_sentinels_and_empty_cells() {
        let table = XlsxUploadParser::new().parse(&workbook_bytes()).unwrap();

        assert_eq!(table.column_names(), vec!["id", "status"]);
        assert_eq!(table.row_count(), 5);

        let id = &table.columns()[0].values;
        assert_eq!(id[0], Some("1".to_string()));
        assert_eq!(id[4], Some("5".to_string()));

        // Sentinel tokens and the unwritten cell all land on null
        let status = &table.columns()[1].values;
        assert_eq!(status[0], None);
        assert_eq!(status[1], None);
        assert_eq!(status[2], None);
        assert_eq!(status[3], None);
        assert_eq!(status[4], Some("ok".to_string()));
    }

    #[test]
    fn test_garbage_bytes_are_a_parse_error() {
        let result = XlsxUploadParser::new().parse(b"this is not a zip archive");
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }
}
