//! Comparison export as CSV.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use bim_model::ComparisonItem;
use bim_reconcile::DecisionSet;

/// File name used when no export path is given.
pub const DEFAULT_EXPORT_FILE: &str = "comparativa_pim_maximo.csv";

/// Export columns: decision, status, then the asset fields in sheet order.
pub const EXPORT_HEADERS: &[&str] = &[
    "Decision",
    "Estado",
    "codigoEquipo",
    "descripcion",
    "marca",
    "modelo",
    "ubicacion",
    "estado",
    "sistemaMaximo",
    "subsistemaMaximo",
    "tipoActivoMaximo",
    "agrupacionMaximo",
    "codigoBIMMaximo",
    "fechaInstalacion",
    "precioCompra",
    "vidaUtil",
    "descripcionUbicacion",
];

/// `Aplicar` for accepted changes, `Ignorar` for everything else.
pub fn decision_label(item: &ComparisonItem, decisions: &DecisionSet) -> &'static str {
    if decisions.is_accepted(item.id()) {
        "Aplicar"
    } else {
        "Ignorar"
    }
}

/// Write the comparison to `writer`.
///
/// The header row is plain; data cells are always quoted. Field values come
/// from the PIM record, or from Maximo for deleted assets.
pub fn write_comparison_csv<W: Write>(
    writer: W,
    items: &[ComparisonItem],
    decisions: &DecisionSet,
) -> Result<W> {
    let mut header = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    header.write_record(EXPORT_HEADERS)?;
    let writer = header
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flush export header: {}", e.error()))?;

    let mut rows = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    let mut written = 0usize;
    for item in items {
        let Some(record) = item.base_record() else {
            continue;
        };
        let mut row = Vec::with_capacity(EXPORT_HEADERS.len());
        row.push(decision_label(item, decisions).to_string());
        row.push(item.status().label().to_string());
        for column in &EXPORT_HEADERS[2..] {
            row.push(record.field_text(column).unwrap_or_default());
        }
        rows.write_record(&row)
            .with_context(|| format!("write export row for {}", item.id()))?;
        written += 1;
    }
    tracing::debug!(rows = written, "comparison export written");
    rows.into_inner()
        .map_err(|e| anyhow::anyhow!("flush export: {}", e.error()))
}

/// Write the comparison CSV to `path`, creating parent directories.
pub fn write_comparison_file(
    path: &Path,
    items: &[ComparisonItem],
    decisions: &DecisionSet,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut writer = write_comparison_csv(BufWriter::new(file), items, decisions)
        .with_context(|| format!("write {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use bim_model::{AssetKey, AssetRecord};
    use bim_reconcile::{initialize_decisions, reconcile_default};

    #[test]
    fn unchanged_rows_are_ignored() {
        let record = AssetRecord::new(AssetKey::new("D4").unwrap()).with("descripcion", "Motor");
        let items = reconcile_default(&[record.clone()], &[record]);
        let decisions = initialize_decisions(&items);
        assert_eq!(decision_label(&items[0], &decisions), "Ignorar");
    }

    #[test]
    fn header_matches_column_count() {
        let out = write_comparison_csv(Vec::new(), &[], &DecisionSet::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.trim_end().split(',').count(), EXPORT_HEADERS.len());
        assert!(text.starts_with("Decision,Estado,codigoEquipo,"));
    }
}
