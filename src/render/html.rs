use std::fmt::Write as _;

use crate::runs::{StatusTable, format_date};

use super::PageMeta;

const STYLE: &str = "\
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;margin:2rem;color:#222}
h1{font-size:1.6rem;margin-bottom:.2rem}
.generated{color:#777;font-size:.85rem;margin-top:0}
table{border-collapse:collapse;font-size:.9rem}
th,td{border:1px solid #ddd;padding:.35rem .6rem;text-align:left;white-space:nowrap}
th{background:#f4f4f4;position:sticky;top:0}
td.status-success{background:#e3f6e5;color:#1b5e20}
td.status-failed{background:#fde7e7;color:#b71c1c}
td.status-incomplete{background:#fff6dd;color:#8a6d00}
td.status-missing-log{background:#eeeeee;color:#555}
td.status-mixed{background:#f3e8fd;color:#4a148c}
td.status-none{color:#bbb}
";

/// Render the status table as a self-contained HTML page.
pub fn render_html(table: &StatusTable, meta: &PageMeta) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    if let Some(secs) = meta.refresh_secs {
        let _ = writeln!(out, "<meta http-equiv=\"refresh\" content=\"{secs}\">");
    }
    let title = escape(&meta.title);
    let _ = writeln!(out, "<title>{title}</title>");
    let _ = writeln!(out, "<style>\n{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(out, "<h1>{title}</h1>");
    let _ = writeln!(
        out,
        "<p class=\"generated\">Generated {} from {}</p>",
        escape(&meta.generated_at),
        escape(&meta.source)
    );
    if table.is_empty() {
        out.push_str("<p class=\"empty\">No runs found.</p>\n");
    } else {
        write_table(&mut out, table);
    }
    out.push_str("</body>\n</html>\n");
    out
}

fn write_table(out: &mut String, table: &StatusTable) {
    out.push_str("<table>\n<thead>\n<tr><th>variant</th><th>host</th>");
    for date in table.dates() {
        let _ = write!(out, "<th>{}</th>", format_date(*date));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in table.rows() {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td>",
            escape(&row.variant),
            escape(&row.host)
        );
        for (index, statuses) in row.cells.iter().enumerate() {
            let class = match statuses.as_slice() {
                [] => "status-none".to_string(),
                [single] => format!("status-{}", css_token(single.as_str())),
                _ => "status-mixed".to_string(),
            };
            let label = row.cell_label(index).unwrap_or_default();
            let _ = write!(out, "<td class=\"{class}\">{}</td>", escape(&label));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}

fn css_token(value: &str) -> String {
    value
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
