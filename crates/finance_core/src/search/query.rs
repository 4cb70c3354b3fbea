//! Filter, sort and highlight over a record snapshot.
//!
//! # Responsibility
//! - Select records whose text fields match a search term.
//! - Order records by one of the supported sort keys.
//! - Annotate display text with highlight markers.
//!
//! # Invariants
//! - Inputs are never mutated; every function returns a new value.
//! - Sorting is stable: equal keys keep their input order.
//! - Malformed terms match nothing and highlight nothing.

use crate::model::record::Record;
use crate::search::matcher::{Matcher, SearchPattern};
use icu_collator::{Collator, CollatorOptions};
use log::debug;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::str::FromStr;

/// Supported sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateAsc,
    DateDesc,
    AmountAsc,
    AmountDesc,
    DescriptionAsc,
    DescriptionDesc,
    CategoryAsc,
    /// Unknown key; input order is kept.
    Unsorted,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::AmountAsc => "amount-asc",
            Self::AmountDesc => "amount-desc",
            Self::DescriptionAsc => "description-asc",
            Self::DescriptionDesc => "description-desc",
            Self::CategoryAsc => "category-asc",
            Self::Unsorted => "",
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value {
            "date-asc" => Self::DateAsc,
            "date-desc" => Self::DateDesc,
            "amount-asc" => Self::AmountAsc,
            "amount-desc" => Self::AmountDesc,
            "description-asc" => Self::DescriptionAsc,
            "description-desc" => Self::DescriptionDesc,
            "category-asc" => Self::CategoryAsc,
            _ => Self::Unsorted,
        })
    }
}

/// Returns records matching `search_term` in description, category,
/// amount text or date.
///
/// A blank term returns a copy of all records; a malformed term returns
/// an empty list.
pub fn filter_records(records: &[Record], search_term: &str) -> Vec<Record> {
    match SearchPattern::for_filter(search_term) {
        SearchPattern::All => records.to_vec(),
        SearchPattern::Pattern(matcher) => filter_records_with(records, &matcher),
        SearchPattern::Invalid(err) => {
            debug!("event=filter module=search status=invalid_pattern error={err}");
            Vec::new()
        }
    }
}

/// Filters with an already-built matcher.
pub fn filter_records_with<M: Matcher + ?Sized>(records: &[Record], matcher: &M) -> Vec<Record> {
    records
        .iter()
        .filter(|record| record_matches(record, matcher))
        .cloned()
        .collect()
}

fn record_matches<M: Matcher + ?Sized>(record: &Record, matcher: &M) -> bool {
    matcher.matches(&record.description)
        || matcher.matches(&record.category)
        || matcher.matches(&record.amount_text())
        || matcher.matches(&record.date)
}

/// Returns a sorted copy of `records`.
pub fn sort_records(records: &[Record], key: SortKey) -> Vec<Record> {
    let mut sorted = records.to_vec();
    match key {
        SortKey::DateAsc => sorted.sort_by(|a, b| compare_dates(&a.date, &b.date)),
        SortKey::DateDesc => sorted.sort_by(|a, b| compare_dates(&b.date, &a.date)),
        SortKey::AmountAsc => sorted.sort_by(|a, b| a.amount.total_cmp(&b.amount)),
        SortKey::AmountDesc => sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
        SortKey::DescriptionAsc => {
            let order = TextOrder::root();
            sorted.sort_by(|a, b| order.compare(&a.description, &b.description))
        }
        SortKey::DescriptionDesc => {
            let order = TextOrder::root();
            sorted.sort_by(|a, b| order.compare(&b.description, &a.description))
        }
        SortKey::CategoryAsc => {
            let order = TextOrder::root();
            sorted.sort_by(|a, b| order.compare(&a.category, &b.category))
        }
        SortKey::Unsorted => {}
    }
    sorted
}

/// Chronological order; unparsable dates sort after every real date and
/// compare equal to each other.
fn compare_dates(left: &str, right: &str) -> Ordering {
    match (date_key(left), date_key(right)) {
        (Some(l), Some(r)) => l.cmp(&r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// `(year, month, day)` of a `YYYY-MM-DD` string.
///
/// Days are not checked against the month, so `2024-02-30` still orders
/// between `2024-02-29` and `2024-03-01`.
fn date_key(value: &str) -> Option<(i32, u32, u32)> {
    let mut parts = value.splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    Some((year, month, day))
}

/// Locale-aware text order under the root (`und`) collation.
///
/// Accents and case are secondary/tertiary differences, so `éclair` sorts
/// before `Zebra` and `apple` before `Apple`.
struct TextOrder {
    collator: Option<Collator>,
}

impl TextOrder {
    fn root() -> Self {
        match Collator::try_new(&Default::default(), CollatorOptions::new()) {
            Ok(collator) => Self {
                collator: Some(collator),
            },
            Err(err) => {
                debug!("event=collator_init module=query status=fallback error={err:?}");
                Self { collator: None }
            }
        }
    }

    fn compare(&self, left: &str, right: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(left, right),
            None => compare_folded(left, right),
        }
    }
}

/// Case-folded code point order, used only without collation data.
fn compare_folded(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| right.cmp(left))
}

/// Wraps every case-insensitive occurrence of `search_term` in `text` with
/// `<mark>` tags.
///
/// `text` is returned unchanged for an empty or malformed term.
pub fn highlight_matches(text: &str, search_term: &str) -> String {
    match SearchPattern::for_highlight(search_term) {
        SearchPattern::Pattern(matcher) => matcher.mark(text),
        SearchPattern::All | SearchPattern::Invalid(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{compare_dates, compare_folded, SortKey, TextOrder};
    use std::cmp::Ordering;

    #[test]
    fn sort_key_round_trips_known_values() {
        for key in [
            SortKey::DateAsc,
            SortKey::DateDesc,
            SortKey::AmountAsc,
            SortKey::AmountDesc,
            SortKey::DescriptionAsc,
            SortKey::DescriptionDesc,
            SortKey::CategoryAsc,
        ] {
            assert_eq!(key.as_str().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!("price-asc".parse::<SortKey>().unwrap(), SortKey::Unsorted);
    }

    #[test]
    fn root_collation_orders_accents_and_case() {
        let order = TextOrder::root();
        assert_eq!(order.compare("apple", "Banana"), Ordering::Less);
        assert_eq!(order.compare("éclair", "Zebra"), Ordering::Less);
        assert_eq!(order.compare("apple", "Apple"), Ordering::Less);
        assert_eq!(order.compare("Food", "Food"), Ordering::Equal);
    }

    #[test]
    fn folded_compare_puts_lowercase_first_on_ties() {
        assert_eq!(compare_folded("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_folded("apple", "Apple"), Ordering::Less);
    }

    #[test]
    fn unparsable_dates_sort_last() {
        assert_eq!(compare_dates("2024-01-01", "garbage"), Ordering::Less);
        assert_eq!(compare_dates("bad", "worse"), Ordering::Equal);
        assert_eq!(compare_dates("2024-02-30", "2024-03-01"), Ordering::Less);
    }
}
