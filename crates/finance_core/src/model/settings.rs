//! Budget settings model.
//!
//! # Responsibility
//! - Define process-wide budget configuration and its defaults.
//! - Provide shallow-merge semantics for partial updates.
//!
//! # Invariants
//! - Settings are persisted as a whole, never field by field.
//! - Missing persisted fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MONTHLY_CAP: f64 = 500.00;
pub const DEFAULT_BASE_CURRENCY: &str = "USD";
pub const DEFAULT_EXCHANGE_RATE: f64 = 1.00;

/// Budget configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Spending cap compared against the total of all records.
    pub monthly_cap: f64,
    /// Currency code used for display.
    pub base_currency: String,
    /// Stored display multiplier; no conversion math is applied in core.
    pub exchange_rate: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            monthly_cap: DEFAULT_MONTHLY_CAP,
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            exchange_rate: DEFAULT_EXCHANGE_RATE,
        }
    }
}

impl Settings {
    /// Merges the given fields into these settings; `None` keeps the
    /// current value.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(cap) = patch.monthly_cap {
            self.monthly_cap = cap;
        }
        if let Some(currency) = patch.base_currency {
            self.base_currency = currency;
        }
        if let Some(rate) = patch.exchange_rate {
            self.exchange_rate = rate;
        }
    }

    /// Cap formatted for an edit form (`500.00`).
    pub fn formatted_cap(&self) -> String {
        format!("{:.2}", self.monthly_cap)
    }

    /// Exchange rate formatted for an edit form (`1.0000`).
    pub fn formatted_rate(&self) -> String {
        format!("{:.4}", self.exchange_rate)
    }
}

/// Partial settings update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub monthly_cap: Option<f64>,
    pub base_currency: Option<String>,
    pub exchange_rate: Option<f64>,
}

impl SettingsPatch {
    /// Patch that overwrites every field with the defaults.
    pub fn defaults() -> Self {
        let defaults = Settings::default();
        Self {
            monthly_cap: Some(defaults.monthly_cap),
            base_currency: Some(defaults.base_currency),
            exchange_rate: Some(defaults.exchange_rate),
        }
    }
}
