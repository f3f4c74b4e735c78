use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use bim_model::{AssetRecord, ComparisonItem, ComparisonStatus, SheetColumn, SyncHistoryEntry};
use bim_reconcile::DecisionSet;
use bim_report::decision_label;

use bim_cli::types::SyncOutcome;

pub fn print_sync_summary(outcome: &SyncOutcome) {
    println!(
        "PIM records: {}  Maximo records: {}",
        outcome.pim_records, outcome.maximo_records
    );
    let mut table = Table::new();
    table.set_header(vec![header_cell("Estado"), header_cell("Assets")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        status_cell(ComparisonStatus::New),
        count_cell(outcome.summary.new, Color::Green),
    ]);
    table.add_row(vec![
        status_cell(ComparisonStatus::Modified),
        count_cell(outcome.summary.modified, Color::Yellow),
    ]);
    table.add_row(vec![
        status_cell(ComparisonStatus::Deleted),
        count_cell(outcome.summary.deleted, Color::Red),
    ]);
    table.add_row(vec![
        status_cell(ComparisonStatus::Unchanged),
        dim_cell(outcome.unchanged()),
    ]);
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(outcome.comparison.len()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");

    print_change_table(&outcome.comparison, &outcome.decisions);

    if !outcome.changed_groups.is_empty() {
        println!("Sheets with changes: {}", outcome.changed_groups.join(", "));
    }
    if let Some(path) = &outcome.export {
        println!("Export: {}", path.display());
    }
    match &outcome.entry {
        Some(entry) => {
            println!(
                "Applied {} change(s) as sync {} by {}",
                entry.summary.total(),
                entry.id,
                entry.user
            );
            println!("Results: {}", entry.acc_link);
            if let Some(path) = &outcome.history {
                println!("History: {}", path.display());
            }
        }
        None if outcome.dry_run => println!("Dry run: no changes applied"),
        None => {}
    }
}

fn print_change_table(items: &[ComparisonItem], decisions: &DecisionSet) {
    let changes: Vec<&ComparisonItem> = items.iter().filter(|item| item.is_change()).collect();
    if changes.is_empty() {
        println!("No differences between PIM and Maximo.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Decision"),
        header_cell("Estado"),
        header_cell("Código"),
        header_cell("Descripción"),
        header_cell("Agrupación"),
        header_cell("Campos"),
    ]);
    apply_table_style(&mut table, change_table_constraints());
    align_column(&mut table, 0, CellAlignment::Center);
    align_column(&mut table, 1, CellAlignment::Center);
    for item in changes {
        let description = item
            .base_record()
            .and_then(|record| record.field_text("descripcion"))
            .unwrap_or_default();
        let fields = if item.diff_fields().is_empty() {
            dim_cell("-")
        } else {
            let names: Vec<&str> = item.diff_fields().iter().map(String::as_str).collect();
            Cell::new(names.join(", "))
        };
        table.add_row(vec![
            decision_cell(decision_label(item, decisions)),
            status_cell(item.status()),
            Cell::new(item.id()).add_attribute(Attribute::Bold),
            Cell::new(description),
            optional_cell(item.agrupacion()),
            fields,
        ]);
    }
    println!();
    println!("Changes:");
    println!("{table}");
}

/// Print one sheet: the records of one agrupación under its column set.
pub fn print_sheet(agrupacion: &str, columns: &[SheetColumn], records: &[&AssetRecord]) {
    let title = if agrupacion.is_empty() {
        "(sin agrupación)"
    } else {
        agrupacion
    };
    let mut table = Table::new();
    table.set_header(columns.iter().map(|column| header_cell(column.label)));
    apply_table_style(&mut table, Vec::new());
    for record in records {
        table.add_row(columns.iter().map(|column| {
            match record.field_text(column.key).filter(|text| !text.is_empty()) {
                Some(text) => Cell::new(text),
                None => dim_cell("-"),
            }
        }));
    }
    println!();
    println!("{title} ({} assets)", records.len());
    println!("{table}");
}

pub fn print_history(entries: &[SyncHistoryEntry], details: bool) {
    if entries.is_empty() {
        println!("No syncs recorded.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sync"),
        header_cell("Date"),
        header_cell("User"),
        header_cell("New"),
        header_cell("Modified"),
        header_cell("Deleted"),
        header_cell("Results"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 3..=5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.id).fg(Color::Blue),
            Cell::new(entry.date.format("%Y-%m-%d %H:%M:%S UTC")),
            Cell::new(&entry.user),
            count_cell(entry.summary.new, Color::Green),
            count_cell(entry.summary.modified, Color::Yellow),
            count_cell(entry.summary.deleted, Color::Red),
            Cell::new(&entry.acc_link),
        ]);
    }
    println!("{table}");

    if details {
        for entry in entries {
            println!();
            println!("Sync {} ({} change(s)):", entry.id, entry.applied_changes.len());
            for item in &entry.applied_changes {
                println!("  {:<9} {}", item.status().label(), item.id());
            }
        }
    }
}

fn apply_table_style(table: &mut Table, constraints: Vec<ColumnConstraint>) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
    if !constraints.is_empty() {
        table.set_constraints(constraints);
    }
}

/// Widths for the decision, status, code, description, agrupación and
/// fields columns of the change table.
fn change_table_constraints() -> Vec<ColumnConstraint> {
    vec![
        ColumnConstraint::LowerBoundary(Width::Fixed(9)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ColumnConstraint::LowerBoundary(Width::Fixed(8)),
        ColumnConstraint::UpperBoundary(Width::Percentage(35)),
        ColumnConstraint::LowerBoundary(Width::Fixed(10)),
        ColumnConstraint::UpperBoundary(Width::Percentage(30)),
    ]
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: ComparisonStatus) -> Cell {
    let cell = Cell::new(status.label());
    match status {
        ComparisonStatus::New => cell.fg(Color::Green),
        ComparisonStatus::Modified => cell.fg(Color::Yellow),
        ComparisonStatus::Deleted => cell.fg(Color::Red),
        ComparisonStatus::Unchanged => cell.fg(Color::DarkGrey),
    }
}

fn decision_cell(label: &str) -> Cell {
    if label == "Aplicar" {
        Cell::new(label)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(label)
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_table_constraints_match_its_columns() {
        let mut table = Table::new();
        table.set_header(vec!["a", "b", "c", "d", "e", "f"]);
        apply_table_style(&mut table, change_table_constraints());
        assert_eq!(table.column_count(), 6);
        assert!(table.column_iter().all(|column| column.constraint().is_some()));
    }

    #[test]
    fn sheet_tables_have_no_width_constraints() {
        let mut table = Table::new();
        table.set_header(vec!["a", "b", "c", "d", "e", "f"]);
        apply_table_style(&mut table, Vec::new());
        assert!(table.column_iter().all(|column| column.constraint().is_none()));
    }
}
