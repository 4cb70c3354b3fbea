//! Query engine over record snapshots.
//!
//! # Responsibility
//! - Expose stateless filter/sort/highlight APIs.
//! - Keep the matching engine swappable behind `Matcher`.

pub mod matcher;
pub mod query;
