//! JSON-lines ingest and output.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rmr_core::retail::Order;
use rmr_core::{CoreError, Record};

/// Reads one order document per line, keyed by its `invoice_no`.
///
/// Blank lines are ignored. Lines without a readable invoice number are
/// logged and skipped. `limit` caps the number of non-blank lines consumed.
pub fn read_order_records(
    path: impl AsRef<Path>,
    limit: Option<usize>,
) -> Result<Vec<Record>, CoreError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();

    for (line_no, line) in non_blank_lines(reader, limit) {
        let line = line?;
        match invoice_no(&line) {
            Some(key) => records.push(Record::new(key, line)),
            None => warn!(
                path = %path.display(),
                line = line_no,
                "no invoice_no, skipping line"
            ),
        }
    }

    debug!(path = %path.display(), records = records.len(), "read order records");
    Ok(records)
}

/// Reads `{"key": .., "value": ..}` lines as written by [`write_results`].
///
/// A string value is taken verbatim; any other JSON value is kept in its
/// serialized form.
pub fn read_key_value_records(
    path: impl AsRef<Path>,
    limit: Option<usize>,
) -> Result<Vec<Record>, CoreError> {
    #[derive(Deserialize)]
    struct KeyValueLine {
        key: String,
        value: serde_json::Value,
    }

    let reader = BufReader::new(File::open(path.as_ref())?);
    let mut records = Vec::new();
    for (_, line) in non_blank_lines(reader, limit) {
        let parsed: KeyValueLine = serde_json::from_str(&line?)?;
        let value = match parsed.value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        };
        records.push(Record::new(parsed.key, value));
    }
    Ok(records)
}

/// Serializes orders into records the way ingest would have stored them.
pub fn records_from_orders(orders: &[Order]) -> Result<Vec<Record>, CoreError> {
    orders
        .iter()
        .map(|order| -> Result<Record, CoreError> {
            Ok(Record::new(order.invoice_no.clone(), serde_json::to_string(order)?))
        })
        .collect()
}

/// Writes one `{"key": .., "value": ..}` line per result.
pub fn write_results<W: Write, V: Serialize>(
    mut out: W,
    results: &BTreeMap<String, V>,
) -> Result<(), CoreError> {
    #[derive(Serialize)]
    struct OutputLine<'a, V> {
        key: &'a str,
        value: &'a V,
    }

    for (key, value) in results {
        serde_json::to_writer(&mut out, &OutputLine { key, value })?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn non_blank_lines<R: BufRead>(
    reader: R,
    limit: Option<usize>,
) -> impl Iterator<Item = (usize, std::io::Result<String>)> {
    reader
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()))
        .take(limit.unwrap_or(usize::MAX))
}

fn invoice_no(line: &str) -> Option<String> {
    let doc: serde_json::Value = serde_json::from_str(line).ok()?;
    match doc.get("invoice_no")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_lines(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file
    }

    #[test]
    fn keys_orders_by_invoice_number() {
        let file = write_lines(&[
            r#"{"invoice_no": "536365", "country": "United Kingdom", "positions": []}"#,
            "",
            r#"{"invoice_no": 536366, "country": "France", "positions": []}"#,
            r#"{"country": "Spain"}"#,
            "not json",
        ]);

        let records = read_order_records(file.path(), None).unwrap();
        let keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["536365", "536366"]);
        assert!(records[0].value.contains("United Kingdom"));
    }

    #[test]
    fn limit_counts_non_blank_lines() {
        let file = write_lines(&[
            r#"{"invoice_no": "1", "country": "A"}"#,
            "   ",
            r#"{"invoice_no": "2", "country": "B"}"#,
            r#"{"invoice_no": "3", "country": "C"}"#,
        ]);
        let records = read_order_records(file.path(), Some(2)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].key, "2");
    }

    #[test]
    fn results_round_trip_through_key_value_lines() {
        let mut results = BTreeMap::new();
        results.insert("France".to_string(), 120.5_f64);
        results.insert("Spain".to_string(), 80.0_f64);

        let mut buf = Vec::new();
        write_results(&mut buf, &results).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with(r#"{"key":"France","value":120.5}"#));

        let file = write_lines(&text.lines().collect::<Vec<_>>());
        let records = read_key_value_records(file.path(), None).unwrap();
        assert_eq!(records[0], Record::new("France", "120.5"));
        assert_eq!(records[1], Record::new("Spain", "80.0"));
    }

    #[test]
    fn string_values_are_read_verbatim() {
        let file = write_lines(&[r#"{"key": "Germany", "value": "42.25"}"#]);
        let records = read_key_value_records(file.path(), None).unwrap();
        assert_eq!(records, vec![Record::new("Germany", "42.25")]);
    }

    #[test]
    fn missing_input_is_io_error() {
        let err = read_order_records("/nonexistent/orders.jsonl", None).unwrap_err();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
