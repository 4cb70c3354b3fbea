use finance_core::db::migrations::latest_version;
use finance_core::db::{open_db, open_db_in_memory, DbError};
use finance_core::{Persistence, Record, SlotStore, SqliteSlotStore, RECORDS_SLOT};
use rusqlite::Connection;

fn slot_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap()
}

fn slot_stamp(conn: &Connection, key: &str) -> i64 {
    conn.query_row(
        "SELECT updated_at FROM slots WHERE key = ?1;",
        [key],
        |row| row.get(0),
    )
    .unwrap()
}

#[test]
fn fresh_database_has_no_slots() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(slot_count(&conn), 0);
    let store = SqliteSlotStore::new(&conn);
    assert_eq!(store.read_slot(RECORDS_SLOT).unwrap(), None);
}

#[test]
fn slot_writes_are_stamped_in_epoch_millis() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteSlotStore::new(&conn);

    store.write_slot("finance_settings", "{}").unwrap();
    let first = slot_stamp(&conn, "finance_settings");
    // Any plausible clock reads after 2020-01-01 in milliseconds.
    assert!(first > 1_577_836_800_000, "stamp {first} is not epoch millis");

    store.write_slot("finance_settings", "{\"monthlyCap\":10}").unwrap();
    assert_eq!(slot_count(&conn), 1);
    assert!(slot_stamp(&conn, "finance_settings") >= first);
}

#[test]
fn slot_values_must_not_be_null() {
    let conn = open_db_in_memory().unwrap();

    let result = conn.execute("INSERT INTO slots (key, value) VALUES ('k', NULL);", []);
    assert!(result.is_err());
}

#[test]
fn records_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("finance.db");
    let record = Record {
        id: "txn_keep".to_string(),
        description: "Rent".to_string(),
        amount: 400.0,
        category: "Fees".to_string(),
        date: "2024-03-01".to_string(),
        ..Record::default()
    };

    let first = open_db(&path).unwrap();
    Persistence::new(SqliteSlotStore::new(&first))
        .save_records(std::slice::from_ref(&record))
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    let loaded = Persistence::new(SqliteSlotStore::new(&second))
        .load_records()
        .into_value();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].id, "txn_keep");
    assert_eq!(slot_count(&second), 1);
}

#[test]
fn database_from_newer_release_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.pragma_update(None, "user_version", latest_version() + 1)
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found, supported }
            if found == latest_version() + 1 && supported == latest_version()
    ));
    assert!(err.to_string().contains("this build reads up to"));
}

#[test]
fn unopenable_path_reports_its_location() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("finance.db");

    let err = open_db(&path).unwrap_err();
    match &err {
        DbError::Open { location, .. } => assert!(location.ends_with("finance.db")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(std::error::Error::source(&err).is_some());
}
