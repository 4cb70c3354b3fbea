//! Record and settings persistence over durable slots.
//!
//! # Responsibility
//! - Load/save the record collection and settings as JSON documents.
//! - Repair records written by older schemas (missing id or timestamps).
//! - Generate record ids.
//!
//! # Invariants
//! - Loads never fail: unreadable data yields an empty collection or the
//!   default settings, reported as `Loaded::Recovered`.
//! - Persistence keeps no copy of the data it moves.
//! - Slot key names are stable for backward compatibility.

use crate::model::record::{now_timestamp, Record, RecordId};
use crate::model::settings::Settings;
use crate::repo::slot_store::{SlotStore, StoreError, StoreResult};
use log::{debug, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Slot holding the JSON array of records.
pub const RECORDS_SLOT: &str = "student_finance_data";
/// Slot holding the JSON settings object.
pub const SETTINGS_SLOT: &str = "finance_settings";

const ID_PREFIX: &str = "txn_";

/// Why a stored value could not be used.
#[derive(Debug)]
pub enum LoadIssue {
    Read(StoreError),
    Parse(serde_json::Error),
}

impl Display for LoadIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read(err) => write!(f, "slot read failed: {err}"),
            Self::Parse(err) => write!(f, "slot value is malformed: {err}"),
        }
    }
}

impl Error for LoadIssue {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            Self::Parse(err) => Some(err),
        }
    }
}

/// Load result that keeps the recovery path visible to callers.
#[derive(Debug)]
pub enum Loaded<T> {
    /// Slot was empty; `T` is the default.
    Missing(T),
    /// Slot parsed successfully.
    Stored(T),
    /// Slot was unreadable; `value` is the default substituted for it.
    Recovered { value: T, cause: LoadIssue },
}

impl<T> Loaded<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Missing(value) | Self::Stored(value) => value,
            Self::Recovered { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Missing(value) | Self::Stored(value) => value,
            Self::Recovered { value, .. } => value,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, Self::Recovered { .. })
    }
}

/// Generates a unique record id.
///
/// The payload is a UUIDv7: a millisecond timestamp followed by random
/// bits. Uniqueness is probabilistic, not guaranteed.
pub fn generate_id() -> RecordId {
    format!("{ID_PREFIX}{}", Uuid::now_v7().simple())
}

/// Fills in a missing id or timestamps. Returns whether anything changed.
pub fn repair_record(record: &mut Record) -> bool {
    let mut repaired = false;
    if record.id.is_empty() {
        record.id = generate_id();
        repaired = true;
    }
    if record.created_at.is_empty() {
        record.created_at = now_timestamp();
        repaired = true;
    }
    if record.updated_at.is_empty() {
        record.updated_at = now_timestamp();
        repaired = true;
    }
    repaired
}

/// JSON persistence for records and settings over an injected slot store.
pub struct Persistence<S: SlotStore> {
    store: S,
}

impl<S: SlotStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the record collection, repairing legacy records.
    ///
    /// Only a slot that is not a JSON array falls back to empty. Elements
    /// are decoded one by one; non-object elements are dropped.
    pub fn load_records(&self) -> Loaded<Vec<Record>> {
        let raw = match self.store.read_slot(RECORDS_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Missing(Vec::new()),
            Err(err) => return recovered("records", Vec::new(), LoadIssue::Read(err)),
        };

        let items = match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(items) => items,
            Err(err) => return recovered("records", Vec::new(), LoadIssue::Parse(err)),
        };

        let total = items.len();
        let mut records = items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value::<Record>(item).ok())
            .collect::<Vec<_>>();
        let dropped = total - records.len();
        if dropped > 0 {
            warn!("event=records_load module=persistence status=partial dropped={dropped}");
        }

        let repaired = records
            .iter_mut()
            .map(repair_record)
            .filter(|changed| *changed)
            .count();
        info!(
            "event=records_load module=persistence status=ok count={} repaired={repaired}",
            records.len()
        );
        Loaded::Stored(records)
    }

    /// Overwrites the records slot with the full collection.
    pub fn save_records(&self, records: &[Record]) -> StoreResult<()> {
        let encoded = serde_json::to_string(records)?;
        self.store.write_slot(RECORDS_SLOT, &encoded)?;
        debug!(
            "event=records_save module=persistence status=ok count={}",
            records.len()
        );
        Ok(())
    }

    /// Loads settings, falling back to defaults when absent or unreadable.
    pub fn load_settings(&self) -> Loaded<Settings> {
        let raw = match self.store.read_slot(SETTINGS_SLOT) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Loaded::Missing(Settings::default()),
            Err(err) => return recovered("settings", Settings::default(), LoadIssue::Read(err)),
        };

        match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => Loaded::Stored(settings),
            Err(err) => recovered("settings", Settings::default(), LoadIssue::Parse(err)),
        }
    }

    /// Overwrites the settings slot.
    pub fn save_settings(&self, settings: &Settings) -> StoreResult<()> {
        let encoded = serde_json::to_string(settings)?;
        self.store.write_slot(SETTINGS_SLOT, &encoded)?;
        debug!("event=settings_save module=persistence status=ok");
        Ok(())
    }
}

fn recovered<T>(slot: &str, value: T, cause: LoadIssue) -> Loaded<T> {
    warn!("event={slot}_load module=persistence status=recovered error={cause}");
    Loaded::Recovered { value, cause }
}
