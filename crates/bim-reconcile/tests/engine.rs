//! Reconciliation engine and decision set behavior.

use bim_model::{
    AssetKey, AssetRecord, ChangeSummary, CompareOptions, ComparisonStatus, FieldValue,
};
use bim_reconcile::{
    ReconcileError, apply_decisions, changed_groups, initialize_decisions, reconcile,
    reconcile_default, status_counts, summarize, toggle_decision,
};

fn key(value: &str) -> AssetKey {
    AssetKey::new(value).unwrap()
}

fn asset(id: &str, fields: &[(&str, &str)]) -> AssetRecord {
    fields
        .iter()
        .fold(AssetRecord::new(key(id)), |record, (name, value)| {
            record.with(*name, *value)
        })
}

fn mixed_inputs() -> (Vec<AssetRecord>, Vec<AssetRecord>) {
    let pim = vec![
        asset("A1", &[("descripcion", "Pump")]),
        asset("C3", &[("descripcion", "Fan"), ("marca", "X")]),
        asset("D4", &[("descripcion", "Motor")]),
    ];
    let maximo = vec![
        asset("B2", &[("descripcion", "Valve")]),
        asset("C3", &[("descripcion", "Fan"), ("marca", "Y")]),
        asset("D4", &[("descripcion", "Motor")]),
    ];
    (pim, maximo)
}

#[test]
fn pim_only_record_is_new() {
    let items = reconcile_default(&[asset("A1", &[("descripcion", "Pump")])], &[]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id().as_str(), "A1");
    assert_eq!(items[0].status(), ComparisonStatus::New);
    assert!(items[0].maximo().is_none());
}

#[test]
fn maximo_only_record_is_deleted() {
    let items = reconcile_default(&[], &[asset("B2", &[("descripcion", "Valve")])]);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id().as_str(), "B2");
    assert_eq!(items[0].status(), ComparisonStatus::Deleted);
    assert!(items[0].pim().is_none());
    assert_eq!(
        items[0].base_record().and_then(|r| r.field_text("descripcion")),
        Some("Valve".to_string())
    );
}

#[test]
fn differing_attribute_is_modified() {
    let items = reconcile_default(
        &[asset("C3", &[("descripcion", "Fan"), ("marca", "X")])],
        &[asset("C3", &[("descripcion", "Fan"), ("marca", "Y")])],
    );
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status(), ComparisonStatus::Modified);
    let diffs: Vec<&str> = items[0].diff_fields().iter().map(String::as_str).collect();
    assert_eq!(diffs, vec!["marca"]);
}

#[test]
fn identical_records_are_unchanged() {
    let items = reconcile_default(
        &[asset("D4", &[("descripcion", "Motor")])],
        &[asset("D4", &[("descripcion", "Motor")])],
    );
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].status(), ComparisonStatus::Unchanged);
    assert!(items[0].diff_fields().is_empty());
}

#[test]
fn mixed_collections_are_sorted_and_summarized() {
    let (pim, maximo) = mixed_inputs();
    let items = reconcile_default(&pim, &maximo);

    let ids: Vec<&str> = items.iter().map(|item| item.id().as_str()).collect();
    assert_eq!(ids, vec!["A1", "B2", "C3", "D4"]);
    let statuses: Vec<ComparisonStatus> = items.iter().map(|item| item.status()).collect();
    assert_eq!(
        statuses,
        vec![
            ComparisonStatus::New,
            ComparisonStatus::Deleted,
            ComparisonStatus::Modified,
            ComparisonStatus::Unchanged,
        ]
    );
    assert_eq!(
        summarize(&items),
        ChangeSummary {
            new: 1,
            modified: 1,
            deleted: 1,
        }
    );
    assert_eq!(status_counts(&items)[&ComparisonStatus::Unchanged], 1);
}

#[test]
fn decisions_start_accepted_and_filter_applied_changes() {
    let (pim, maximo) = mixed_inputs();
    let items = reconcile_default(&pim, &maximo);

    let decisions = initialize_decisions(&items);
    assert_eq!(decisions.len(), 3);
    assert_eq!(decisions.get(&key("A1")), Some(true));
    assert_eq!(decisions.get(&key("B2")), Some(true));
    assert_eq!(decisions.get(&key("C3")), Some(true));
    assert_eq!(decisions.get(&key("D4")), None);

    let decisions = toggle_decision(&decisions, &key("A1")).unwrap();
    assert_eq!(decisions.get(&key("A1")), Some(false));
    assert_eq!(decisions.accepted_count(), 2);

    let applied = apply_decisions(&items, &decisions);
    let ids: Vec<&str> = applied.iter().map(|item| item.id().as_str()).collect();
    assert_eq!(ids, vec!["B2", "C3"]);
}

#[test]
fn toggling_twice_restores_the_decision() {
    let (pim, maximo) = mixed_inputs();
    let items = reconcile_default(&pim, &maximo);
    let initial = initialize_decisions(&items);

    let once = toggle_decision(&initial, &key("C3")).unwrap();
    let twice = toggle_decision(&once, &key("C3")).unwrap();
    assert_eq!(twice, initial);
}

#[test]
fn toggling_an_unchanged_or_unknown_id_fails() {
    let (pim, maximo) = mixed_inputs();
    let items = reconcile_default(&pim, &maximo);
    let decisions = initialize_decisions(&items);

    assert_eq!(
        toggle_decision(&decisions, &key("D4")),
        Err(ReconcileError::UnknownDecision(key("D4")))
    );
    assert_eq!(
        toggle_decision(&decisions, &key("Z9")),
        Err(ReconcileError::UnknownDecision(key("Z9")))
    );
}

#[test]
fn empty_inputs_produce_no_items() {
    let items = reconcile_default(&[], &[]);
    assert!(items.is_empty());
    assert!(!summarize(&items).has_changes());
    assert!(initialize_decisions(&items).is_empty());
}

#[test]
fn strict_policy_treats_numeric_text_as_different() {
    let pim = vec![AssetRecord::new(key("E5")).with("vidaUtil", FieldValue::Number(0.0))];
    let maximo = vec![AssetRecord::new(key("E5")).with("vidaUtil", "0")];

    let strict = reconcile(&pim, &maximo, &CompareOptions::default());
    assert_eq!(strict[0].status(), ComparisonStatus::Modified);

    let normalized = reconcile(&pim, &maximo, &CompareOptions::normalized());
    assert_eq!(normalized[0].status(), ComparisonStatus::Unchanged);
}

#[test]
fn strict_policy_treats_missing_and_empty_as_different() {
    let pim = vec![AssetRecord::new(key("F6")).with("modelo", "")];
    let maximo = vec![AssetRecord::new(key("F6"))];

    let strict = reconcile(&pim, &maximo, &CompareOptions::default());
    assert_eq!(strict[0].status(), ComparisonStatus::Modified);

    let normalized = reconcile(&pim, &maximo, &CompareOptions::normalized());
    assert_eq!(normalized[0].status(), ComparisonStatus::Unchanged);
}

#[test]
fn ignored_fields_do_not_count_as_differences() {
    let pim = vec![asset("G7", &[("descripcion", "Boiler"), ("id", "p-1")])];
    let maximo = vec![asset("G7", &[("descripcion", "Boiler"), ("id", "m-9")])];

    let options = CompareOptions::default().ignoring("id");
    let items = reconcile(&pim, &maximo, &options);
    assert_eq!(items[0].status(), ComparisonStatus::Unchanged);
}

#[test]
fn changed_groups_skip_unchanged_records() {
    let pim = vec![
        asset("A1", &[("agrupacionMaximo", "01_00_01")]),
        asset("D4", &[("agrupacionMaximo", "02_02_04")]),
    ];
    let maximo = vec![
        asset("B2", &[("agrupacionMaximo", "10_00_01")]),
        asset("D4", &[("agrupacionMaximo", "02_02_04")]),
    ];
    let items = reconcile_default(&pim, &maximo);
    let groups: Vec<String> = changed_groups(&items).into_iter().collect();
    assert_eq!(groups, vec!["01_00_01".to_string(), "10_00_01".to_string()]);
}
