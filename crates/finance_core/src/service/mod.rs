//! Core use-case services.
//!
//! # Responsibility
//! - Own live state and orchestrate persistence into use-case APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod record_store;
pub mod transfer;
