//! Transaction record model.
//!
//! # Responsibility
//! - Define the canonical transaction record persisted in the records slot.
//! - Define the caller-provided input shape used by add/update flows.
//!
//! # Invariants
//! - `id` is unique across the live collection and never changes.
//! - `created_at` is stamped once; `updated_at` moves on every update.
//! - Wire fields use camelCase names (`createdAt`, `updatedAt`).

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Opaque record identifier.
///
/// Generated ids look like `txn_<hex>`, but imported data may carry any
/// non-empty string, so no shape is assumed.
pub type RecordId = String;

/// Category labels a host can offer in its picker.
///
/// The accepted set is defined by the host; validation only requires a
/// non-empty label.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Books",
    "Transport",
    "Entertainment",
    "Fees",
    "Other",
];

/// One financial transaction.
///
/// Deserialization is lenient so that rows written by older schemas can
/// still be loaded and repaired: missing or `null` fields take empty/zero
/// defaults, scalar ids become text and numeric-text amounts are parsed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    #[serde(deserialize_with = "lenient::text")]
    pub id: RecordId,
    #[serde(deserialize_with = "lenient::text")]
    pub description: String,
    /// Non-negative, at most two fractional digits when entered via forms.
    #[serde(deserialize_with = "lenient::amount")]
    pub amount: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub category: String,
    /// Calendar date in `YYYY-MM-DD` form.
    #[serde(deserialize_with = "lenient::text")]
    pub date: String,
    /// ISO-8601 creation timestamp.
    #[serde(deserialize_with = "lenient::text")]
    pub created_at: String,
    /// ISO-8601 timestamp of the last successful update.
    #[serde(deserialize_with = "lenient::text")]
    pub updated_at: String,
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Strings pass through, numbers and booleans become text, anything
    /// else (including `null`) is empty.
    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(value) => value,
            Value::Number(value) => value.to_string(),
            Value::Bool(value) => value.to_string(),
            _ => String::new(),
        })
    }

    /// Numbers pass through and numeric text is parsed; anything else is 0.
    pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(value) => value.as_f64().unwrap_or(0.0),
            Value::String(value) => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|amount| amount.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        })
    }
}

impl Record {
    /// Builds a new record from input with the given id and a fresh
    /// `created_at == updated_at` stamp.
    pub fn from_input(id: RecordId, input: RecordInput) -> Self {
        let now = now_timestamp();
        Self {
            id,
            description: input.description,
            amount: input.amount,
            category: input.category,
            date: input.date,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Replaces every editable field and refreshes `updated_at`.
    ///
    /// `id` and `created_at` are left untouched.
    pub fn apply_input(&mut self, input: RecordInput) {
        self.description = input.description;
        self.amount = input.amount;
        self.category = input.category;
        self.date = input.date;
        self.updated_at = now_timestamp();
    }

    /// Amount as plain text, the way search matches it (`3.5`, `100`).
    pub fn amount_text(&self) -> String {
        self.amount.to_string()
    }
}

/// Editable record fields supplied by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordInput {
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
}

impl RecordInput {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category: category.into(),
            date: date.into(),
        }
    }
}

/// Current UTC time as an ISO-8601 string with millisecond precision,
/// e.g. `2024-01-10T08:30:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{now_timestamp, Record, RecordInput};

    #[test]
    fn from_input_stamps_equal_timestamps() {
        let record = Record::from_input(
            "txn_1".to_string(),
            RecordInput::new("Coffee", 3.5, "Food", "2024-01-10"),
        );
        assert_eq!(record.created_at, record.updated_at);
        assert!(!record.created_at.is_empty());
    }

    #[test]
    fn amount_text_drops_trailing_zeros() {
        let mut record = Record::default();
        record.amount = 3.5;
        assert_eq!(record.amount_text(), "3.5");
        record.amount = 100.0;
        assert_eq!(record.amount_text(), "100");
    }

    #[test]
    fn timestamp_is_utc_with_millis() {
        let stamp = now_timestamp();
        assert!(stamp.ends_with('Z'), "unexpected timestamp: {stamp}");
        assert_eq!(stamp.len(), "2024-01-10T08:30:00.000Z".len());
    }

    #[test]
    fn deserialize_fills_missing_fields_with_defaults() {
        let value = serde_json::json!({
            "description": "Bus",
            "amount": 2.75,
            "category": "Transport",
            "date": "2024-02-01"
        });
        let record: Record = serde_json::from_value(value).unwrap();
        assert!(record.id.is_empty());
        assert!(record.created_at.is_empty());
        assert_eq!(record.amount, 2.75);
    }

    #[test]
    fn deserialize_tolerates_legacy_nulls_and_scalars() {
        let value = serde_json::json!({
            "id": 7,
            "description": "Lunch",
            "amount": "12.50",
            "category": null,
            "date": "2024-02-01",
            "createdAt": null
        });
        let record: Record = serde_json::from_value(value).unwrap();
        assert_eq!(record.id, "7");
        assert_eq!(record.amount, 12.5);
        assert!(record.category.is_empty());
        assert!(record.created_at.is_empty());
        assert!(record.updated_at.is_empty());
    }
}
