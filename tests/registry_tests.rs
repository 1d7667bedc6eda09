mod common;
use common::{shift_json, utc};
use serde_json::{Value, json};
use shiftpay::core::DeleteTarget;
use shiftpay::db::kv::{
    CHECK_IN_KEY, KeyValueStore, MemoryStore, TEMPLATES_KEY, WORK_INFOS_KEY, read_json,
};
use shiftpay::models::check_in::CheckIn;
use shiftpay::models::template::ShiftTemplates;
use shiftpay::models::work_info::WorkInfos;
use shiftpay::models::Shift;

fn template_shift() -> Shift {
    Shift::parse(&shift_json("tpl", "2024-03-01T08:00:00Z", "2024-03-01T16:00:00Z")).unwrap()
}

// ---------------------------
// WorkInfos
// ---------------------------

#[test]
fn work_infos_keep_unique_rates_per_workplace() {
    let store = MemoryStore::new();
    let mut infos = WorkInfos::new(store.clone());
    infos.fetch().unwrap();

    infos.add("Cafe", 15.0).unwrap();
    infos.add("  Cafe ", 12.5).unwrap();
    infos.add("Cafe", 15.0).unwrap();
    infos.add("Bar", 20.0).unwrap();

    assert_eq!(infos.rates("Cafe"), vec![12.5, 15.0]);
    assert_eq!(infos.workplaces().collect::<Vec<_>>(), vec!["Bar", "Cafe"]);

    let mut reloaded = WorkInfos::new(store);
    reloaded.fetch().unwrap();
    assert_eq!(reloaded.rates("Cafe"), vec![12.5, 15.0]);
}

#[test]
fn work_infos_reject_bad_input() {
    let mut infos = WorkInfos::new(MemoryStore::new());
    assert!(infos.add("   ", 10.0).is_err());
    assert!(infos.add("Cafe", f64::NAN).is_err());
    assert!(!infos.contains("Cafe"));
}

#[test]
fn removing_the_last_rate_forgets_the_workplace() {
    let store = MemoryStore::new();
    let mut infos = WorkInfos::new(store.clone());
    infos.add("Cafe", 15.0).unwrap();
    infos.add("Cafe", 16.0).unwrap();

    infos.delete("Cafe", Some(15.0)).unwrap();
    assert_eq!(infos.rates("Cafe"), vec![16.0]);

    infos.delete("Cafe", Some(16.0)).unwrap();
    assert!(!infos.contains("Cafe"));
    assert_eq!(read_json(&store, WORK_INFOS_KEY).unwrap(), Some(json!({})));

    // unknown entries are ignored
    infos.delete("Nowhere", Some(1.0)).unwrap();
}

#[test]
fn deleting_without_a_rate_forgets_the_workplace() {
    let mut infos = WorkInfos::new(MemoryStore::new());
    infos.add("Cafe", 15.0).unwrap();
    infos.add("Cafe", 16.0).unwrap();
    infos.delete("Cafe", None).unwrap();
    assert!(!infos.contains("Cafe"));
}

#[test]
fn work_infos_read_the_older_layout() {
    let mut store = MemoryStore::new();
    store
        .set(
            WORK_INFOS_KEY,
            &json!({
                "Cafe": {"payRates": [15, "17.5", 15]},
                "Bar": [20],
                "Empty": {"payRates": []}
            })
            .to_string(),
        )
        .unwrap();

    let mut infos = WorkInfos::new(store);
    infos.fetch().unwrap();
    assert_eq!(infos.rates("Cafe"), vec![15.0, 17.5]);
    assert_eq!(infos.rates("Bar"), vec![20.0]);
    assert!(!infos.contains("Empty"));
}

// ---------------------------
// Templates
// ---------------------------

#[test]
fn templates_round_trip_through_the_cache() {
    let store = MemoryStore::new();
    let mut templates = ShiftTemplates::new(store.clone());
    templates.fetch().unwrap();

    templates.add(" Morning ", template_shift()).unwrap();
    assert_eq!(templates.len(), 1);
    assert_eq!(templates.get("Morning"), Some(&template_shift()));

    let mut reloaded = ShiftTemplates::new(store);
    assert!(reloaded.fetch().unwrap().is_empty());
    assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["Morning"]);
    assert_eq!(reloaded.get("Morning").unwrap().start_time(), utc("2024-03-01T08:00:00Z"));
}

#[test]
fn template_names_cannot_be_blank() {
    let mut templates = ShiftTemplates::new(MemoryStore::new());
    assert!(templates.add("  ", template_shift()).is_err());
    assert!(templates.is_empty());
}

#[test]
fn deleting_templates() {
    let mut templates = ShiftTemplates::new(MemoryStore::new());
    templates.add("Morning", template_shift()).unwrap();
    assert!(templates.delete("Morning").unwrap());
    assert!(!templates.delete("Morning").unwrap());
    assert!(templates.is_empty());
}

#[test]
fn templates_tolerate_legacy_and_broken_entries() {
    let mut store = MemoryStore::new();
    store
        .set(
            TEMPLATES_KEY,
            &json!({
                "Wrapped": {"shift": shift_json("w1", "2024-03-01T08:00:00Z", "2024-03-01T12:00:00Z")},
                "Plain": shift_json("p1", "2024-03-01T13:00:00Z", "2024-03-01T18:00:00Z"),
                "Broken": {"workplace": "Cafe"}
            })
            .to_string(),
        )
        .unwrap();

    let mut templates = ShiftTemplates::new(store);
    let failures = templates.fetch().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("Broken"));
    assert_eq!(templates.len(), 2);
    assert_eq!(templates.get("Wrapped").unwrap().id(), "w1");
}

// ---------------------------
// Check-in
// ---------------------------

#[test]
fn check_in_is_remembered_until_cleared() {
    let store = MemoryStore::new();
    let mut check_in = CheckIn::new(store.clone());
    check_in.fetch().unwrap();
    assert!(!check_in.is_checked_in());

    let at = utc("2024-03-01T08:55:00Z");
    assert_eq!(check_in.set(Some(at)).unwrap(), at);
    assert!(store.contains(CHECK_IN_KEY));

    let mut reloaded = CheckIn::new(store.clone());
    reloaded.fetch().unwrap();
    assert_eq!(reloaded.time(), Some(at));

    reloaded.clear().unwrap();
    assert!(!reloaded.is_checked_in());
    assert!(!store.contains(CHECK_IN_KEY));
}

#[test]
fn check_in_reads_quoted_and_ignores_garbage() {
    let mut store = MemoryStore::new();
    store.set(CHECK_IN_KEY, "\"2024-03-01T08:55:00.000Z\"").unwrap();
    let mut check_in = CheckIn::new(store.clone());
    check_in.fetch().unwrap();
    assert_eq!(check_in.time(), Some(utc("2024-03-01T08:55:00Z")));

    store.set(CHECK_IN_KEY, "whenever").unwrap();
    check_in.fetch().unwrap();
    assert!(!check_in.is_checked_in());
}

// ---------------------------
// Delete input
// ---------------------------

#[test]
fn delete_target_from_loose_input() {
    assert_eq!(DeleteTarget::from_value(None).unwrap(), DeleteTarget::All);
    assert_eq!(DeleteTarget::from_value(Some(&Value::Null)).unwrap(), DeleteTarget::All);
    assert_eq!(
        DeleteTarget::from_value(Some(&json!("a"))).unwrap(),
        DeleteTarget::One("a".into())
    );
    assert_eq!(
        DeleteTarget::from_value(Some(&json!(["a", "b"]))).unwrap(),
        DeleteTarget::Many(vec!["a".into(), "b".into()])
    );
    assert!(DeleteTarget::from_value(Some(&json!(3))).is_err());
    assert!(DeleteTarget::from_value(Some(&json!([1]))).is_err());

    let many = DeleteTarget::Many(vec!["a".into()]);
    assert!(many.matches("a"));
    assert!(!many.matches("b"));
    assert!(DeleteTarget::All.matches("anything"));
}
