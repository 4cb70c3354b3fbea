//! Input validation for record and settings forms.
//!
//! # Responsibility
//! - Check raw user-entered strings before they become records or settings.
//! - Validate the structure of imported JSON documents.
//!
//! # Invariants
//! - Validators are pure and never panic or return `Err`.
//! - Error messages are ordered; callers display the first one.
//! - Date checks are syntactic only (`2024-02-30` is accepted).

use crate::model::record::{Record, RecordInput};
use crate::model::settings::SettingsPatch;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[1-9][0-9]*)(\.[0-9]{1,2})?$").expect("valid amount regex"));
static RATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0|[1-9][0-9]*)(\.[0-9]{1,4})?$").expect("valid rate regex"));
static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$").expect("valid date regex")
});
static EDGE_WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s|\s$").expect("valid edge whitespace regex"));
static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("valid word regex"));

pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const DESCRIPTION_EDGE_SPACES: &str = "Description cannot have leading or trailing spaces";
pub const DESCRIPTION_DUPLICATE_WORDS: &str = "Description cannot contain duplicate consecutive words";
pub const AMOUNT_INVALID: &str = "Enter a valid amount (e.g., 12.50)";
pub const CATEGORY_REQUIRED: &str = "Please select a category";
pub const DATE_INVALID: &str = "Enter a valid date (YYYY-MM-DD)";
pub const MONTHLY_CAP_INVALID: &str = "Enter a valid monthly cap amount";
pub const EXCHANGE_RATE_INVALID: &str = "Enter a valid exchange rate";
pub const IMPORT_NOT_ARRAY: &str = "Invalid data format";
pub const IMPORT_BAD_RECORD: &str = "Invalid record structure";

/// Result of validating one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationOutcome {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    fn check(is_valid: bool, message: &str) -> Self {
        if is_valid {
            Self::from_errors(Vec::new())
        } else {
            Self::from_errors(vec![message.to_string()])
        }
    }

    /// First error message, the one a form shows next to the field.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Validates a transaction description.
///
/// Several failures can be reported at once, e.g. `" the the"` fails both
/// the edge-space and duplicate-word checks.
pub fn validate_description(text: &str) -> ValidationOutcome {
    let mut errors = Vec::new();

    if text.trim().is_empty() {
        errors.push(DESCRIPTION_REQUIRED.to_string());
    }
    if EDGE_WHITESPACE_RE.is_match(text) {
        errors.push(DESCRIPTION_EDGE_SPACES.to_string());
    }
    if has_repeated_word(text) {
        errors.push(DESCRIPTION_DUPLICATE_WORDS.to_string());
    }

    ValidationOutcome::from_errors(errors)
}

/// Validates an amount: unsigned, no leading zero, up to 2 decimals.
pub fn validate_amount(text: &str) -> ValidationOutcome {
    ValidationOutcome::check(AMOUNT_RE.is_match(text), AMOUNT_INVALID)
}

pub fn validate_category(value: &str) -> ValidationOutcome {
    ValidationOutcome::check(!value.is_empty(), CATEGORY_REQUIRED)
}

/// Validates a `YYYY-MM-DD` date by pattern only.
pub fn validate_date(text: &str) -> ValidationOutcome {
    ValidationOutcome::check(DATE_RE.is_match(text), DATE_INVALID)
}

/// Same grammar as [`validate_amount`].
pub fn validate_monthly_cap(text: &str) -> ValidationOutcome {
    ValidationOutcome::check(AMOUNT_RE.is_match(text), MONTHLY_CAP_INVALID)
}

/// Unsigned decimal with up to 4 fractional digits.
pub fn validate_exchange_rate(text: &str) -> ValidationOutcome {
    ValidationOutcome::check(RATE_RE.is_match(text), EXCHANGE_RATE_INVALID)
}

/// Returns whether any word is immediately followed by itself, ignoring
/// ASCII case (`"the The bus"`).
///
/// Words are ASCII word-character runs; only whitespace may separate the
/// pair.
fn has_repeated_word(text: &str) -> bool {
    let words = WORD_RE.find_iter(text).collect::<Vec<_>>();
    words.windows(2).any(|pair| {
        let gap = &text[pair[0].end()..pair[1].start()];
        !gap.is_empty()
            && gap.chars().all(char::is_whitespace)
            && pair[0].as_str().eq_ignore_ascii_case(pair[1].as_str())
    })
}

/// Outcome of validating an imported JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportValidation {
    /// Structurally valid; candidate records in document order.
    Valid { records: Vec<Record> },
    /// Parse or structure failure, shown to the user verbatim.
    Invalid { error: String },
}

impl ImportValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            error: message.into(),
        }
    }
}

/// Parses and shape-checks an import document.
///
/// Every element must be an object with a present `id`, `description`,
/// `category` and `date` (a non-empty string or a non-zero number) and a
/// numeric `amount`. Numeric ids are kept as text. Finer per-field rules
/// are not applied here.
pub fn validate_imported_data(raw_text: &str) -> ImportValidation {
    let parsed: Value = match serde_json::from_str(raw_text) {
        Ok(value) => value,
        Err(err) => return ImportValidation::invalid(err.to_string()),
    };

    let Value::Array(items) = parsed else {
        return ImportValidation::invalid(IMPORT_NOT_ARRAY);
    };

    if !items.iter().all(has_record_shape) {
        return ImportValidation::invalid(IMPORT_BAD_RECORD);
    }

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<Record>(item) {
            Ok(record) => records.push(record),
            Err(err) => return ImportValidation::invalid(err.to_string()),
        }
    }

    ImportValidation::Valid { records }
}

fn has_record_shape(item: &Value) -> bool {
    let present = |key: &str| item.get(key).is_some_and(is_present_scalar);

    item.is_object()
        && present("id")
        && present("description")
        && item.get("amount").is_some_and(Value::is_number)
        && present("category")
        && present("date")
}

fn is_present_scalar(value: &Value) -> bool {
    match value {
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// First error per field for a rejected form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub description: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub monthly_cap: Option<String>,
    pub exchange_rate: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn first_error(outcome: ValidationOutcome) -> Option<String> {
    outcome.errors.into_iter().next()
}

/// Validates raw record form values and converts them into input.
///
/// On success the description is trimmed and the amount parsed.
pub fn validate_record_form(
    description: &str,
    amount: &str,
    category: &str,
    date: &str,
) -> Result<RecordInput, FieldErrors> {
    let errors = FieldErrors {
        description: first_error(validate_description(description)),
        amount: first_error(validate_amount(amount)),
        category: first_error(validate_category(category)),
        date: first_error(validate_date(date)),
        ..FieldErrors::default()
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    // The amount grammar only admits plain decimals.
    let amount = amount.parse::<f64>().map_err(|_| FieldErrors {
        amount: Some(AMOUNT_INVALID.to_string()),
        ..FieldErrors::default()
    })?;

    Ok(RecordInput::new(description.trim(), amount, category, date))
}

/// Validates raw settings form values and converts them into a full patch.
pub fn validate_settings_form(
    monthly_cap: &str,
    base_currency: &str,
    exchange_rate: &str,
) -> Result<SettingsPatch, FieldErrors> {
    let errors = FieldErrors {
        monthly_cap: first_error(validate_monthly_cap(monthly_cap)),
        exchange_rate: first_error(validate_exchange_rate(exchange_rate)),
        ..FieldErrors::default()
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    let cap = monthly_cap.parse::<f64>().map_err(|_| FieldErrors {
        monthly_cap: Some(MONTHLY_CAP_INVALID.to_string()),
        ..FieldErrors::default()
    })?;
    let rate = exchange_rate.parse::<f64>().map_err(|_| FieldErrors {
        exchange_rate: Some(EXCHANGE_RATE_INVALID.to_string()),
        ..FieldErrors::default()
    })?;

    Ok(SettingsPatch {
        monthly_cap: Some(cap),
        base_currency: Some(base_currency.to_string()),
        exchange_rate: Some(rate),
    })
}

#[cfg(test)]
mod tests {
    use super::{has_repeated_word, validate_record_form, validate_settings_form};

    #[test]
    fn repeated_word_requires_whole_words() {
        assert!(has_repeated_word("the the bus"));
        assert!(has_repeated_word("Bus  BUS"));
        assert!(!has_repeated_word("the theory"));
        assert!(!has_repeated_word("bus, bus"));
        assert!(!has_repeated_word("single"));
    }

    #[test]
    fn record_form_trims_and_parses() {
        // Edge spaces are rejected before trimming matters.
        let err = validate_record_form(" Lunch", "12.50", "Food", "2024-01-10").unwrap_err();
        assert!(err.description.is_some());

        let input = validate_record_form("Lunch", "12.50", "Food", "2024-01-10").unwrap();
        assert_eq!(input.description, "Lunch");
        assert_eq!(input.amount, 12.5);
    }

    #[test]
    fn record_form_reports_each_bad_field() {
        let err = validate_record_form("", "01", "", "2024-13-01").unwrap_err();
        assert!(err.description.is_some());
        assert!(err.amount.is_some());
        assert!(err.category.is_some());
        assert!(err.date.is_some());
        assert!(err.monthly_cap.is_none());
    }

    #[test]
    fn settings_form_builds_full_patch() {
        let patch = validate_settings_form("750.25", "EUR", "0.9215").unwrap();
        assert_eq!(patch.monthly_cap, Some(750.25));
        assert_eq!(patch.base_currency.as_deref(), Some("EUR"));
        assert_eq!(patch.exchange_rate, Some(0.9215));

        let err = validate_settings_form("5.001", "EUR", "1.00001").unwrap_err();
        assert!(err.monthly_cap.is_some());
        assert!(err.exchange_rate.is_some());
    }
}
