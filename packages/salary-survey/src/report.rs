//! Report sinks: where finished provider reports go.

use console::measure_text_width;
use std::io::{self, Write};

use crate::types::ProviderReport;

/// Column headers of the table output.
pub const TABLE_HEADER: [&str; 4] = [
    "Job title",
    "Vacancies found",
    "Vacancies processed",
    "Average salary",
];

/// Receives one report per provider.
pub trait ReportSink {
    fn emit(&mut self, report: &ProviderReport) -> io::Result<()>;
}

/// ASCII table with the provider label set into the top border.
///
/// ```text
/// +HeadHunter Moscow---+-----------------+
/// | Job title | Vacancies found | ...    |
/// +-----------+-----------------+--------+
/// | Rust      | 120             | ...    |
/// +-----------+-----------------+--------+
/// ```
pub struct TableSink<W: Write> {
    out: W,
}

impl<W: Write> TableSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render a report as an ASCII table.
pub fn render_table(report: &ProviderReport) -> String {
    let mut rows: Vec<[String; 4]> = Vec::with_capacity(report.len() + 1);
    rows.push(TABLE_HEADER.map(str::to_string));
    for (term, summary) in &report.terms {
        rows.push([
            term.to_string(),
            summary.found.to_string(),
            summary.processed.to_string(),
            summary
                .average
                .map_or_else(|| "-".to_string(), |avg| avg.to_string()),
        ]);
    }

    let mut widths = [0usize; 4];
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(measure_text_width(cell));
        }
    }

    let separator = border(&widths);
    let mut lines = Vec::with_capacity(rows.len() + 3);
    lines.push(titled(&separator, &report.label));
    for (i, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                let pad = width - measure_text_width(cell);
                format!(" {}{} ", cell, " ".repeat(pad))
            })
            .collect();
        lines.push(format!("|{}|", cells.join("|")));
        if i == 0 {
            lines.push(separator.clone());
        }
    }
    lines.push(separator);

    let mut table = lines.join("\n");
    table.push('\n');
    table
}

fn border(widths: &[usize]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

/// Overlay the title onto a border line, after the leading `+`.
/// A title too long for the border is left out.
fn titled(separator: &str, title: &str) -> String {
    let title_width = measure_text_width(title);
    if title.is_empty() || title_width + 2 > separator.len() {
        return separator.to_string();
    }
    let rest: String = separator.chars().skip(1 + title_width).collect();
    format!("+{}{}", title, rest)
}

impl<W: Write> ReportSink for TableSink<W> {
    fn emit(&mut self, report: &ProviderReport) -> io::Result<()> {
        self.out.write_all(render_table(report).as_bytes())?;
        self.out.flush()
    }
}

/// One JSON document per line, per provider.
pub struct JsonSink<W: Write> {
    out: W,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn emit(&mut self, report: &ProviderReport) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, report)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}
