//! Persistence boundary for records and settings.
//!
//! # Responsibility
//! - Define the durable slot contract and its SQLite/in-memory stores.
//! - Encode/decode the record collection and settings documents.
//!
//! # Invariants
//! - Only the record store calls the write operations.
//! - Malformed stored data is recovered locally, never surfaced as `Err`.

pub mod persistence;
pub mod slot_store;
