//! Presentation of the pivoted status table.

mod html;
mod text;

use serde::Serialize;

use crate::runs::{RunRecord, StatusTable};

pub use html::render_html;
pub use text::render_text;

/// Page-level details shown around the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub generated_at: String,
    /// Where the logs were read from (archive URL or local root).
    pub source: String,
    pub refresh_secs: Option<u64>,
}

/// Render the table together with the flat records it was built from.
pub fn render_json(table: &StatusTable, records: &[RunRecord]) -> Result<String, serde_json::Error> {
    #[derive(Serialize)]
    struct Report<'a> {
        table: &'a StatusTable,
        runs: &'a [RunRecord],
    }
    let mut json = serde_json::to_string_pretty(&Report {
        table,
        runs: records,
    })?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runs::RunStatus;
    use std::path::PathBuf;
    use time::macros::date;

    #[test]
    fn json_report_has_table_and_runs() {
        let records = vec![RunRecord {
            status: RunStatus::MissingLog,
            date: date!(2024 - 03 - 01),
            log_name: None,
            host: "unknown".to_string(),
            log_file: None,
            variant: "unknown".to_string(),
            run_dir: PathBuf::from("/runs/20240301_0"),
        }];
        let table = StatusTable::from_records(&records);
        let json = render_json(&table, &records).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["table"]["rows"][0]["host"], "unknown");
        assert_eq!(value["runs"][0]["status"], "missing-log");
        assert_eq!(value["runs"][0]["date"], "2024-03-01");
        assert!(value["runs"][0]["log_file"].is_null());
    }
}
