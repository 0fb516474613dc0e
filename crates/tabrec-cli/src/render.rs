//! Table and JSON rendering of decoded records.

use chrono::SecondsFormat;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use tabrec_model::{DomainRecord, Severity};

const SUMMARY_WIDTH: usize = 60;

pub fn records_table(records: &[DomainRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Created"),
        header_cell("Severity"),
        header_cell("Collector"),
        header_cell("Dataset"),
        header_cell("Summary"),
        header_cell("Id"),
    ]);
    apply_table_style(&mut table);
    for record in records {
        table.add_row(vec![
            Cell::new(
                record
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
            severity_cell(record),
            Cell::new(&record.collector),
            dataset_cell(&record.dataset),
            Cell::new(truncate(&record.summary, SUMMARY_WIDTH)),
            Cell::new(&record.id).add_attribute(Attribute::Dim),
        ]);
    }
    table
}

/// Pretty JSON array in the shape the fallback producer emits.
pub fn records_json(records: &[DomainRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Ordered resolver candidates with the query each would run.
pub fn candidates_table(candidates: &[Option<String>], preferred: Option<&str>, sql: &[String]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Order by"),
        header_cell("Query"),
    ]);
    apply_table_style(&mut table);
    for (position, (candidate, query)) in candidates.iter().zip(sql).enumerate() {
        let column = match candidate.as_deref() {
            Some(column) if Some(column) == preferred => Cell::new(format!("{column} (preferred)"))
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
            Some(column) => Cell::new(column),
            None => Cell::new("(none)").add_attribute(Attribute::Dim),
        };
        table.add_row(vec![
            Cell::new(position + 1).set_alignment(CellAlignment::Right),
            column,
            Cell::new(query),
        ]);
    }
    table
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn severity_cell(record: &DomainRecord) -> Cell {
    let color = match record.severity_level() {
        Severity::Success => Color::Green,
        Severity::Info => Color::Cyan,
        Severity::Warning => Color::Yellow,
        Severity::Error | Severity::Critical => Color::Red,
        Severity::Unknown => Color::Grey,
    };
    Cell::new(&record.severity).fg(color)
}

fn dataset_cell(dataset: &str) -> Cell {
    if dataset.is_empty() {
        Cell::new("-").add_attribute(Attribute::Dim)
    } else {
        Cell::new(dataset)
    }
}

/// Cut `text` to at most `width` characters, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
