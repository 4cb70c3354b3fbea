//! Core domain logic for the personal finance tracker.
//! This crate is the single source of truth for record and budget invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod validation;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::record::{Record, RecordId, RecordInput, DEFAULT_CATEGORIES};
pub use model::settings::{Settings, SettingsPatch};
pub use repo::persistence::{
    generate_id, LoadIssue, Loaded, Persistence, RECORDS_SLOT, SETTINGS_SLOT,
};
pub use repo::slot_store::{MemorySlotStore, SlotStore, SqliteSlotStore, StoreError, StoreResult};
pub use search::matcher::{Matcher, RegexMatcher, SearchPattern};
pub use search::query::{filter_records, highlight_matches, sort_records, SortKey};
pub use service::record_store::{DailySpending, DashboardStats, RecordStore, SpendingChart};
pub use service::transfer::{export_file_name, export_records, import_records, ImportOutcome};
pub use validation::{
    validate_amount, validate_category, validate_date, validate_description,
    validate_exchange_rate, validate_imported_data, validate_monthly_cap, ImportValidation,
    ValidationOutcome,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
