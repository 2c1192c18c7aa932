//! Export of the filtered/sorted record set.
//!
//! Both exports take the whole filtered/sorted set, not just the visible
//! page. CSV goes through the `csv` crate; the printable export is a
//! self-contained HTML document meant for the browser's print-to-PDF.

use crate::config::DEFAULT_DATE_FORMAT;
use crate::error::Result;
use crate::record::Paper;
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CSV_FILENAME: &str = "research_papers.csv";
pub const DEFAULT_PRINT_FILENAME: &str = "research_papers.html";

/// CSV header row
pub const CSV_HEADERS: [&str; 8] = [
    "Title",
    "Authors",
    "Journal",
    "Impact Factor",
    "Subject Area",
    "Publisher",
    "Published Date",
    "Service Type",
];

#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// chrono format for dates, rendered in local time
    pub date_format: String,
    /// Timestamp for the "Generated on" line; `None` means now
    pub generated_at: Option<DateTime<Local>>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            generated_at: None,
        }
    }
}

impl ExportOptions {
    pub fn with_date_format(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
            ..Self::default()
        }
    }
}

/// Format `dt` in local time. An invalid format string falls back to ISO dates.
pub fn local_date<Tz: TimeZone>(dt: &DateTime<Tz>, format: &str) -> String {
    let local = dt.with_timezone(&Local);
    let mut out = String::new();
    if write!(out, "{}", local.format(format)).is_err() {
        return local.format("%Y-%m-%d").to_string();
    }
    out
}

fn published_date(paper: &Paper, format: &str) -> String {
    paper
        .published_at()
        .map(|dt| local_date(&dt, format))
        .unwrap_or_default()
}

/// Render records as CSV text.
///
/// The six text columns are always quoted with embedded quotes doubled,
/// whatever they contain. Impact factor and date are written bare (quoted
/// only if a custom date format introduces a delimiter); a missing impact
/// factor is an empty bare field.
pub fn to_csv(records: &[&Paper], options: &ExportOptions) -> Result<String> {
    let mut out = CSV_HEADERS.join(",").into_bytes();
    out.push(b'\n');

    // Fields arrive already quoted, so the writer must not quote again.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(out);

    for paper in records {
        let impact = paper
            .impact_factor_opt()
            .map(|v| v.to_string())
            .unwrap_or_default();
        wtr.write_record([
            quoted(paper.title()),
            quoted(paper.authors()),
            quoted(paper.journal_title()),
            impact,
            quoted(paper.subject_area()),
            quoted(paper.publisher_name()),
            bare(&published_date(paper, &options.date_format)),
            quoted(paper.service_name()),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn bare(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quoted(field)
    } else {
        field.to_string()
    }
}

/// Render records as a print-ready HTML document.
pub fn to_printable(records: &[&Paper], options: &ExportOptions) -> String {
    let generated = options.generated_at.unwrap_or_else(Local::now);
    let na = |s: &str| {
        if s.is_empty() {
            "N/A".to_string()
        } else {
            escape_html(s)
        }
    };

    let mut html = String::from(PRINT_HEAD);
    let _ = writeln!(html, "  <h1>Research Papers Export</h1>");
    let _ = writeln!(
        html,
        "  <p>Generated on {}</p>",
        escape_html(&local_date(&generated, &options.date_format))
    );

    for paper in records {
        let impact = paper
            .impact_factor_opt()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let published = published_date(paper, &options.date_format);

        let _ = writeln!(html, "  <div class=\"paper\">");
        let _ = writeln!(html, "    <div class=\"title\">{}</div>", na(paper.title()));
        let _ = writeln!(html, "    <div class=\"authors\">{}</div>", na(paper.authors()));
        let _ = writeln!(
            html,
            "    <div class=\"journal\">{} - Impact Factor: <span class=\"impact\">{}</span></div>",
            na(paper.journal_title()),
            escape_html(&impact)
        );
        let _ = writeln!(
            html,
            "    <div>Subject: {} | Publisher: {}</div>",
            na(paper.subject_area()),
            na(paper.publisher_name())
        );
        let _ = writeln!(html, "    <div>Published: {}</div>", na(&published));
        let _ = writeln!(html, "  </div>");
    }

    html.push_str("</body>\n</html>\n");
    html
}

pub fn write_csv(path: &Path, records: &[&Paper], options: &ExportOptions) -> Result<()> {
    let text = to_csv(records, options)?;
    std::fs::write(path, text)?;
    info!(path = ?path, count = records.len(), "Saved CSV export");
    Ok(())
}

pub fn write_printable(path: &Path, records: &[&Paper], options: &ExportOptions) -> Result<()> {
    std::fs::write(path, to_printable(records, options))?;
    info!(path = ?path, count = records.len(), "Saved printable export");
    Ok(())
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const PRINT_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Research Papers Export</title>
  <style>
    @media print { @page { margin: 12mm; } }
    body { font-family: Arial, sans-serif; margin: 20px; }
    .paper { margin-bottom: 20px; padding: 10px; border: 1px solid #ddd; page-break-inside: avoid; }
    .title { font-weight: bold; font-size: 16px; margin-bottom: 5px; }
    .authors { color: #666; margin-bottom: 5px; }
    .journal { color: #333; margin-bottom: 5px; }
    .impact { color: #0070f3; font-weight: bold; }
  </style>
</head>
<body>
"#;
