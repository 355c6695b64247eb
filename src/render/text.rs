use crate::runs::{StatusTable, format_date};

const EMPTY_CELL: &str = "-";
const COLUMN_GAP: &str = "  ";

/// Render the status table as aligned plain text, one line per row.
pub fn render_text(table: &StatusTable) -> String {
    if table.is_empty() {
        return "No runs found.\n".to_string();
    }
    let mut header = vec!["variant".to_string(), "host".to_string()];
    header.extend(table.dates().iter().copied().map(format_date));

    let mut lines = vec![header];
    for row in table.rows() {
        let mut line = vec![row.variant.clone(), row.host.clone()];
        line.extend(
            (0..row.cells.len())
                .map(|index| row.cell_label(index).unwrap_or_else(|| EMPTY_CELL.to_string())),
        );
        lines.push(line);
    }

    let columns = lines[0].len();
    let widths: Vec<usize> = (0..columns)
        .map(|column| {
            lines
                .iter()
                .map(|line| line[column].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in &lines {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(cells.join(COLUMN_GAP).trim_end());
        out.push('\n');
    }
    out
}
