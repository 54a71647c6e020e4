// ============================================================
// SANITIZER
// ============================================================
// Escape quote delimiters in text cells so staged fields round-trip

/// Double every literal `"` so the value can be wrapped in `"` and read
/// back unambiguously by a standard CSV reader. Applied to text-typed
/// cells only; numeric and timestamp serializations cannot contain the
/// delimiter.
pub fn sanitize(value: &str) -> String {
    value.replace('"', "\"\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doubles_quotes() {
        assert_eq!(sanitize(r#"say "hi""#), r#"say ""hi"""#);
        assert_eq!(sanitize("no quotes"), "no quotes");
        assert_eq!(sanitize(r#""""#), r#""""""#);
    }

    #[test]
    fn test_round_trips_through_csv_reader() {
        let original = r#"a "quoted" value, with a comma"#;
        let record = format!("\"{}\"\n", sanitize(original));

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(record.as_bytes());
        let row = reader.records().next().unwrap().unwrap();

        assert_eq!(row.get(0), Some(original));
    }
}
