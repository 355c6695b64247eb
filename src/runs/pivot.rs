use std::collections::{BTreeMap, BTreeSet};

use serde::{Serialize, Serializer};
use time::Date;

use super::{RunRecord, RunStatus, format_date};

/// Statuses of one (variant, host) pair, one cell per table date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusRow {
    pub variant: String,
    pub host: String,
    /// Parallel to [`StatusTable::dates`]. An empty cell means no run that day.
    pub cells: Vec<Vec<RunStatus>>,
}

impl StatusRow {
    /// Cell text with several statuses joined by `", "`.
    pub fn cell_label(&self, index: usize) -> Option<String> {
        let statuses = self.cells.get(index)?;
        if statuses.is_empty() {
            return None;
        }
        Some(
            statuses
                .iter()
                .map(RunStatus::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// Run statuses pivoted to rows of (variant, host) and columns of dates.
///
/// Rows are sorted by variant then host; dates run newest first and only
/// include days that had at least one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusTable {
    dates: Vec<Date>,
    rows: Vec<StatusRow>,
}

impl StatusTable {
    pub fn from_records(records: &[RunRecord]) -> Self {
        let dates: Vec<Date> = records
            .iter()
            .map(|record| record.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .rev()
            .collect();
        let mut grouped: BTreeMap<(&str, &str), BTreeMap<Date, Vec<RunStatus>>> = BTreeMap::new();
        for record in records {
            let statuses = grouped
                .entry((record.variant.as_str(), record.host.as_str()))
                .or_default()
                .entry(record.date)
                .or_default();
            if !statuses.contains(&record.status) {
                statuses.push(record.status.clone());
            }
        }
        let rows = grouped
            .into_iter()
            .map(|((variant, host), mut by_date)| StatusRow {
                variant: variant.to_string(),
                host: host.to_string(),
                cells: dates
                    .iter()
                    .map(|date| by_date.remove(date).unwrap_or_default())
                    .collect(),
            })
            .collect();
        Self { dates, rows }
    }

    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    pub fn rows(&self) -> &[StatusRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Statuses recorded for a row on `date`, if the row and date exist.
    pub fn cell(&self, variant: &str, host: &str, date: Date) -> Option<&[RunStatus]> {
        let column = self.dates.iter().position(|candidate| *candidate == date)?;
        let row = self
            .rows
            .iter()
            .find(|row| row.variant == variant && row.host == host)?;
        row.cells.get(column).map(Vec::as_slice)
    }
}

impl Serialize for StatusTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct TableView<'a> {
            dates: Vec<String>,
            rows: &'a [StatusRow],
        }
        TableView {
            dates: self.dates.iter().copied().map(format_date).collect(),
            rows: &self.rows,
        }
        .serialize(serializer)
    }
}
