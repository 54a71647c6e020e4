// ============================================================
// TYPE INFERENCE
// ============================================================
// Assign a semantic type to a raw column and coerce its cells

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::warn;

use crate::domain::table::{CellValue, SemanticType};

/// Column-name substring that hints a timestamp column (case-insensitive)
const DATE_NAME_HINT: &str = "date";

/// Formats tried in order when coercing a timestamp cell. RFC 3339 is
/// tried first, separately, since chrono parses its offset directly.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Decide the semantic type of a column and coerce every cell.
///
/// Rules, in order, first match wins:
/// 1. Column name contains "date" → Timestamp; unparseable cells become
///    Null. The type stays Timestamp even when every cell fails.
/// 2. At least one non-null value and every non-null value parses as a
///    number → Numeric.
/// 3. Otherwise Text, values kept verbatim.
pub fn infer_and_coerce(
    column_name: &str,
    values: &[Option<String>],
) -> (SemanticType, Vec<CellValue>) {
    if column_name.to_lowercase().contains(DATE_NAME_HINT) {
        let coerced: Vec<CellValue> = values
            .iter()
            .map(|v| match v {
                Some(raw) => parse_timestamp(raw)
                    .map(CellValue::Timestamp)
                    .unwrap_or(CellValue::Null),
                None => CellValue::Null,
            })
            .collect();

        let had_input = values.iter().any(|v| v.is_some());
        if had_input && coerced.iter().all(|c| c.is_null()) {
            warn!(
                column = column_name,
                "Date-named column had no parseable timestamps; all values coerced to null"
            );
        }

        return (SemanticType::Timestamp, coerced);
    }

    let non_null: Vec<&String> = values.iter().flatten().collect();
    if !non_null.is_empty() && non_null.iter().all(|v| parse_number(v).is_some()) {
        let coerced = values
            .iter()
            .map(|v| match v {
                Some(raw) => parse_number(raw)
                    .map(CellValue::Number)
                    .unwrap_or(CellValue::Null),
                None => CellValue::Null,
            })
            .collect();
        return (SemanticType::Numeric, coerced);
    }

    let coerced = values
        .iter()
        .map(|v| match v {
            Some(raw) => CellValue::Text(raw.clone()),
            None => CellValue::Null,
        })
        .collect();
    (SemanticType::Text, coerced)
}

/// Permissive, locale-agnostic timestamp parse. Returns `None` when no
/// known format matches.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.naive_utc());
    }

    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(ts);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Numeric parse probe: integer or floating point, decimal point allowed.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}
