//! JSON export/import of the record collection.
//!
//! # Responsibility
//! - Serialize the collection into a downloadable document.
//! - Apply an imported document only after shape validation and caller
//!   confirmation.
//!
//! # Invariants
//! - Import is all-or-nothing: a rejected or declined document leaves the
//!   collection untouched.

use crate::model::record::Record;
use crate::repo::slot_store::{SlotStore, StoreResult};
use crate::service::record_store::RecordStore;
use crate::validation::{validate_imported_data, ImportValidation};
use chrono::NaiveDate;
use log::{info, warn};

/// Pretty-printed JSON array of `records` (two-space indent).
pub fn export_records(records: &[Record]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Download file name for an export made on `today`.
pub fn export_file_name(today: NaiveDate) -> String {
    format!("student-finance-data-{}.json", today.format("%Y-%m-%d"))
}

/// What happened to an import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Collection replaced with this many records.
    Imported(usize),
    /// Document was valid but the caller declined to replace the data.
    Declined(usize),
    /// Document failed validation; the message is meant for the user.
    Rejected(String),
}

/// Validates `raw_text` and, when `confirm` agrees, replaces the whole
/// collection with its records.
///
/// `confirm` receives the number of candidate records.
pub fn import_records<S: SlotStore>(
    store: &mut RecordStore<S>,
    raw_text: &str,
    confirm: impl FnOnce(usize) -> bool,
) -> StoreResult<ImportOutcome> {
    let records = match validate_imported_data(raw_text) {
        ImportValidation::Valid { records } => records,
        ImportValidation::Invalid { error } => {
            warn!("event=import module=transfer status=rejected error={error}");
            return Ok(ImportOutcome::Rejected(error));
        }
    };

    let count = records.len();
    if !confirm(count) {
        info!("event=import module=transfer status=declined count={count}");
        return Ok(ImportOutcome::Declined(count));
    }

    store.replace_records(records)?;
    Ok(ImportOutcome::Imported(count))
}
