use finance_core::{
    export_records, import_records, ImportOutcome, MemorySlotStore, Persistence, RecordInput,
    RecordStore,
};

const VALID_DOCUMENT: &str = r#"[
    {"id":"1","description":"X","amount":5,"category":"Food","date":"2024-01-01"},
    {"id":"2","description":"Y","amount":7.25,"category":"Books","date":"2024-01-02",
     "createdAt":"2024-01-02T10:00:00.000Z","updatedAt":"2024-01-02T11:00:00.000Z"}
]"#;

fn store_with_one_record() -> RecordStore<MemorySlotStore> {
    let mut store = RecordStore::open(Persistence::new(MemorySlotStore::new()));
    store
        .add_record(RecordInput::new("Coffee", 3.5, "Food", "2024-01-10"))
        .unwrap();
    store
}

#[test]
fn confirmed_import_replaces_collection() {
    let mut store = store_with_one_record();
    let mut offered = None;

    let outcome = import_records(&mut store, VALID_DOCUMENT, |count| {
        offered = Some(count);
        true
    })
    .unwrap();

    assert_eq!(outcome, ImportOutcome::Imported(2));
    assert_eq!(offered, Some(2));
    let ids = store
        .records()
        .iter()
        .map(|record| record.id.as_str())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(
        store.get_record("2").unwrap().created_at,
        "2024-01-02T10:00:00.000Z"
    );
    assert!(!store.get_record("1").unwrap().created_at.is_empty());
}

#[test]
fn declined_import_keeps_collection() {
    let mut store = store_with_one_record();
    let before = store.records().to_vec();

    let outcome = import_records(&mut store, VALID_DOCUMENT, |_| false).unwrap();

    assert_eq!(outcome, ImportOutcome::Declined(2));
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn invalid_import_is_rejected_without_asking() {
    let mut store = store_with_one_record();
    let before = store.records().to_vec();

    let outcome = import_records(&mut store, r#"{"not":"an array"}"#, |_| {
        panic!("confirmation must not be requested for invalid data")
    })
    .unwrap();

    assert_eq!(
        outcome,
        ImportOutcome::Rejected("Invalid data format".to_string())
    );
    assert_eq!(store.records(), before.as_slice());
}

#[test]
fn export_then_import_restores_records() {
    let source = store_with_one_record();
    let document = export_records(source.records()).unwrap();

    let mut target = RecordStore::open(Persistence::new(MemorySlotStore::new()));
    let outcome = import_records(&mut target, &document, |_| true).unwrap();

    assert_eq!(outcome, ImportOutcome::Imported(1));
    assert_eq!(target.records(), source.records());
}
