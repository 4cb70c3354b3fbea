//! Domain model for the finance tracker.
//!
//! # Responsibility
//! - Define the transaction record and budget settings shapes.
//! - Keep persisted wire names stable for backward compatibility.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Deletion is a hard removal from the collection.

pub mod record;
pub mod settings;
