//! Console rendering of record lists.

use aimlstore_core::Record;
use anyhow::Result;

/// Two-column pattern/response listing, widths fitted to the content.
pub fn records_table(records: &[Record]) -> String {
    let pattern_width = records
        .iter()
        .map(|r| r.pattern.chars().count())
        .chain(std::iter::once("Pattern:".len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    out.push_str(&format!("{:>pattern_width$}  {}\n", "Pattern:", "Response:"));
    for record in records {
        out.push_str(&format!(
            "{:>pattern_width$}  {}\n",
            record.pattern, record.response
        ));
    }
    out
}

pub fn records_json(records: &[Record]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_right_aligns_patterns() {
        let records = vec![Record::new("HELLO", "Hi!"), Record::new("*", "Nope.")];
        let table = records_table(&records);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("   HELLO  Hi!"));
        assert!(lines[2].trim_start().starts_with("*  Nope."));
    }

    #[test]
    fn json_output_is_a_list() {
        let records = vec![Record::new("HI", "Hello")];
        let json = records_json(&records).unwrap();
        assert!(json.trim_start().starts_with('['));
        assert!(json.contains("\"pattern\": \"HI\""));
    }
}
