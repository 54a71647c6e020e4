// ============================================================
// NORMALIZER
// ============================================================
// Per-column type inference and sanitization over a whole table

use tracing::debug;

use crate::application::use_cases::sanitizer::sanitize;
use crate::application::use_cases::type_inference::infer_and_coerce;
use crate::domain::table::{CellValue, NormalizedColumn, NormalizedTable, RawTable, SemanticType};

/// Table normalizer: runs type inference per column, then sanitizes
/// text cells. Column order and names pass through unchanged.
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, raw: RawTable) -> NormalizedTable {
        let columns = raw
            .into_columns()
            .into_iter()
            .map(|column| {
                let (semantic_type, values) = infer_and_coerce(&column.name, &column.values);

                // Only text cells can carry the quote delimiter
                let values = if semantic_type == SemanticType::Text {
                    values
                        .into_iter()
                        .map(|cell| match cell {
                            CellValue::Text(s) => CellValue::Text(sanitize(&s)),
                            other => other,
                        })
                        .collect()
                } else {
                    values
                };

                debug!(column = %column.name, semantic_type = %semantic_type, "Normalized column");

                NormalizedColumn {
                    name: column.name,
                    semantic_type,
                    values,
                }
            })
            .collect();

        NormalizedTable { columns }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::RawColumn;

    fn column(name: &str, values: &[&str]) -> RawColumn {
        RawColumn::new(name, values.iter().map(|v| Some(v.to_string())).collect())
    }

    #[test]
    fn test_column_order_and_names_preserved() {
        let raw = RawTable::new(vec![
            column("id", &["1", "2"]),
            column("order_date", &["2024-01-01", "2024-01-02"]),
            column("amount", &["10.5", "20"]),
        ])
        .unwrap();

        let normalized = Normalizer::new().normalize(raw);

        assert_eq!(normalized.column_names(), vec!["id", "order_date", "amount"]);
        assert_eq!(normalized.columns[0].semantic_type, SemanticType::Numeric);
        assert_eq!(normalized.columns[1].semantic_type, SemanticType::Timestamp);
        assert_eq!(normalized.columns[2].semantic_type, SemanticType::Numeric);
    }

    #[test]
    fn test_text_cells_are_sanitized() {
        let raw = RawTable::new(vec![column("note", &[r#"she said "ok""#])]).unwrap();

        let normalized = Normalizer::new().normalize(raw);

        assert_eq!(normalized.columns[0].semantic_type, SemanticType::Text);
        assert_eq!(
            normalized.columns[0].values[0],
            CellValue::Text(r#"she said ""ok""#.to_string())
        );
    }

    #[test]
    fn test_sentinel_only_column_normalizes_to_all_null_text() {
        let raw = RawTable::new(vec![RawColumn::new("status", vec![None, None, None])]).unwrap();

        let normalized = Normalizer::new().normalize(raw);

        assert_eq!(normalized.columns[0].semantic_type, SemanticType::Text);
        assert!(normalized.columns[0].values.iter().all(|c| c.is_null()));
    }

    #[test]
    fn test_numeric_and_timestamp_columns_skip_sanitizer() {
        let raw = RawTable::new(vec![column("amount", &["1.5"])]).unwrap();
        let normalized = Normalizer::new().normalize(raw);
        assert_eq!(normalized.columns[0].values[0], CellValue::Number(1.5));
    }
}
