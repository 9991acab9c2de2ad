//! Renderings of a computed table: a title with the session date in a box, then the
//! column labels and every row, each column as wide as its widest cell. Cell values are
//! printed verbatim. [`render_table`] lays the table out as text, [`render_png`] draws the
//! same layout as a shareable image.

pub mod picture;

pub use picture::render_png;

use crate::ledger::{format_number, ResultsSummary, Table};

/// Spaces between two columns.
const COLUMN_PADDING: usize = 2;

fn width(text: &str) -> usize {
    text.chars().count()
}

fn pad(text: &str, target: usize) -> String {
    let mut padded = text.to_owned();
    padded.extend(std::iter::repeat(' ').take(target.saturating_sub(width(text))));
    padded
}

/// Renders `table` under `title`, with `date_text` boxed to the right of the title.
pub fn render_table(table: &Table, title: &str, date_text: &str) -> String {
    let labels = table.labels();
    let records = table.to_records();
    let widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(col, label)| {
            records
                .iter()
                .map(|record| width(&record[col]))
                .fold(width(label), usize::max)
        })
        .collect();

    let mut lines = Vec::<String>::new();
    let indent = " ".repeat(width(title) + COLUMN_PADDING);
    let border = format!("+{}+", "-".repeat(width(date_text) + 2));
    lines.push(format!("{title}{}{border}", " ".repeat(COLUMN_PADDING)));
    lines.push(format!("{indent}| {date_text} |"));
    lines.push(format!("{indent}{border}"));
    lines.push(String::new());

    let gap = " ".repeat(COLUMN_PADDING);
    let layout = |cells: &[String]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join(gap.as_str())
            .trim_end()
            .to_owned()
    };
    lines.push(layout(labels.as_slice()));
    for record in &records {
        lines.push(layout(record.as_slice()));
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// Human-readable summary of a calculation, one figure per line.
pub fn summary_lines(results: &ResultsSummary) -> Vec<String> {
    vec![
        format!("Shuttles used: {} units", format_number(results.shuttle_units)),
        format!("Legacy total: {}", format_number(results.legacy_total)),
        format!("New total: {}", format_number(results.net_price_total)),
        format!("New minus legacy: {}", format_number(results.delta)),
    ]
}
