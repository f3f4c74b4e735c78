//! Reconciliation of PIM asset sheets against Maximo.
//!
//! Both collections are indexed by `codigoEquipo`, the key sets are merged,
//! and every key is classified exactly once:
//!
//! | PIM | Maximo | status                   |
//! |-----|--------|--------------------------|
//! | yes | no     | `new`                    |
//! | no  | yes    | `deleted`                |
//! | yes | yes    | `modified` / `unchanged` |
//!
//! Everything here is pure and recomputed from scratch on each call.

use std::collections::{BTreeMap, BTreeSet};

use bim_model::{
    AssetKey, AssetRecord, ChangeSummary, CompareOptions, ComparisonItem, ComparisonStatus,
};

use crate::compare::diff_fields;

/// Records of one collection keyed by business key.
#[derive(Debug, Default)]
pub struct RecordIndex<'a> {
    pub records: BTreeMap<&'a AssetKey, &'a AssetRecord>,
    /// Keys seen more than once, in order of their first repeat.
    pub duplicates: Vec<AssetKey>,
}

/// Index records by key. A repeated key keeps the record seen last.
pub fn index_records(records: &[AssetRecord]) -> RecordIndex<'_> {
    let mut index = RecordIndex::default();
    for record in records {
        if index.records.insert(&record.key, record).is_some()
            && !index.duplicates.contains(&record.key)
        {
            index.duplicates.push(record.key.clone());
        }
    }
    index
}

/// Keys that occur more than once in `records`.
pub fn duplicate_keys(records: &[AssetRecord]) -> Vec<AssetKey> {
    index_records(records).duplicates
}

/// Match `pim` (source of truth) against `maximo` and classify every key.
///
/// Output holds one item per key found in either input, sorted by key.
pub fn reconcile(
    pim: &[AssetRecord],
    maximo: &[AssetRecord],
    options: &CompareOptions,
) -> Vec<ComparisonItem> {
    let pim_index = index_records(pim).records;
    let maximo_index = index_records(maximo).records;
    let keys: BTreeSet<&AssetKey> = pim_index
        .keys()
        .chain(maximo_index.keys())
        .copied()
        .collect();

    keys.into_iter()
        .filter_map(|key| {
            match (pim_index.get(key), maximo_index.get(key)) {
                (Some(left), None) => Some(ComparisonItem::added((*left).clone())),
                (None, Some(right)) => Some(ComparisonItem::removed((*right).clone())),
                (Some(left), Some(right)) => {
                    let diffs = diff_fields(left, right, options);
                    // Same key on both sides; diffs come from their attribute union.
                    ComparisonItem::compared((*left).clone(), (*right).clone(), diffs).ok()
                }
                // Every key came from one of the two indexes.
                (None, None) => None,
            }
        })
        .collect()
}

/// [`reconcile`] with default (strict) comparison options.
pub fn reconcile_default(pim: &[AssetRecord], maximo: &[AssetRecord]) -> Vec<ComparisonItem> {
    reconcile(pim, maximo, &CompareOptions::default())
}

/// Count items by status. Unchanged items are not counted.
pub fn summarize(items: &[ComparisonItem]) -> ChangeSummary {
    let mut summary = ChangeSummary::default();
    for item in items {
        summary.record(item.status());
    }
    summary
}

/// Count items per status, unchanged included.
pub fn status_counts(items: &[ComparisonItem]) -> BTreeMap<ComparisonStatus, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item.status()).or_insert(0) += 1;
    }
    counts
}

/// Agrupaciones that hold at least one change (the sheets worth reviewing).
pub fn changed_groups(items: &[ComparisonItem]) -> BTreeSet<String> {
    items
        .iter()
        .filter(|item| item.is_change())
        .filter_map(ComparisonItem::agrupacion)
        .map(str::to_string)
        .collect()
}

/// Group records by agrupación. Records without one fall under `""`.
pub fn group_by_agrupacion(records: &[AssetRecord]) -> BTreeMap<String, Vec<&AssetRecord>> {
    let mut groups: BTreeMap<String, Vec<&AssetRecord>> = BTreeMap::new();
    for record in records {
        let agrupacion = record.agrupacion().unwrap_or_default().to_string();
        groups.entry(agrupacion).or_default().push(record);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(key: &str) -> AssetRecord {
        AssetRecord::new(AssetKey::new(key).unwrap())
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let pim = vec![
            record("A1").with("marca", "first"),
            record("B2"),
            record("A1").with("marca", "second"),
            record("A1").with("marca", "third"),
        ];
        let index = index_records(&pim);
        assert_eq!(index.records.len(), 2);
        assert_eq!(index.duplicates, vec![AssetKey::new("A1").unwrap()]);

        let items = reconcile_default(&pim, &[]);
        assert_eq!(items.len(), 2);
        let a1 = items[0].pim().unwrap();
        assert_eq!(a1.field_text("marca").as_deref(), Some("third"));
    }

    #[test]
    fn groups_records_by_agrupacion() {
        let records = vec![
            record("A").with("agrupacionMaximo", "02_02_04"),
            record("B").with("agrupacionMaximo", "01_00_01"),
            record("C"),
            record("D").with("agrupacionMaximo", "01_00_01"),
        ];
        let groups = group_by_agrupacion(&records);
        let tags: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(tags, vec!["", "01_00_01", "02_02_04"]);
        assert_eq!(groups["01_00_01"].len(), 2);
    }
}
