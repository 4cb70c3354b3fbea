//! Record store use-case service.
//!
//! # Responsibility
//! - Own the live record collection and settings for the process.
//! - Provide CRUD entry points and derived dashboard statistics.
//! - Persist every mutation through the injected `Persistence`.
//!
//! # Invariants
//! - This is the only caller of persistence write operations.
//! - A mutation is applied in memory only after its write succeeded.
//! - Collection order is insertion order.
//! - Missing ids are reported as `None`, never as `Err`.

use crate::model::record::{Record, RecordInput};
use crate::model::settings::{Settings, SettingsPatch};
use crate::repo::persistence::{generate_id, repair_record, Persistence};
use crate::repo::slot_store::{SlotStore, StoreResult};
use chrono::{Days, NaiveDate, Utc};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;

/// Top-category placeholder for an empty collection.
pub const NO_TOP_CATEGORY: &str = "-";
/// Number of days covered by the spending chart, today included.
pub const CHART_DAYS: u64 = 7;

/// Aggregate statistics over the whole collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_records: usize,
    pub total_spent: f64,
    /// Most frequent category; the first one seen wins ties.
    pub top_category: String,
    /// `monthly_cap - total_spent`; negative when over budget.
    pub remaining: f64,
    pub is_exceeded: bool,
}

/// Spending total for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySpending {
    pub date: String,
    pub total: f64,
}

/// Daily totals for the chart window, oldest day first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingChart {
    pub days: Vec<DailySpending>,
}

impl SpendingChart {
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(|day| day.date.as_str())
    }

    /// Largest daily total, for scaling bars.
    pub fn max_total(&self) -> f64 {
        self.days.iter().map(|day| day.total).fold(0.0, f64::max)
    }
}

/// In-memory record collection and settings backed by persistence.
pub struct RecordStore<S: SlotStore> {
    persistence: Persistence<S>,
    records: Vec<Record>,
    settings: Settings,
}

impl<S: SlotStore> RecordStore<S> {
    /// Creates an empty store with default settings. Call [`Self::init`]
    /// to load persisted state.
    pub fn new(persistence: Persistence<S>) -> Self {
        Self {
            persistence,
            records: Vec::new(),
            settings: Settings::default(),
        }
    }

    /// Creates a store and loads persisted state in one step.
    pub fn open(persistence: Persistence<S>) -> Self {
        let mut store = Self::new(persistence);
        store.init();
        store
    }

    /// Loads settings, then records, replacing in-memory state.
    pub fn init(&mut self) {
        self.settings = self.persistence.load_settings().into_value();
        self.records = self.persistence.load_records().into_value();
        info!(
            "event=store_init module=record_store status=ok records={}",
            self.records.len()
        );
    }

    /// Live collection in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Appends a new record with a generated id and fresh timestamps.
    pub fn add_record(&mut self, input: RecordInput) -> StoreResult<Record> {
        let record = Record::from_input(generate_id(), input);

        let mut next = self.records.clone();
        next.push(record.clone());
        self.commit_records(next)?;

        info!(
            "event=record_add module=record_store status=ok id={}",
            record.id
        );
        Ok(record)
    }

    /// Replaces every field except `id` and `created_at`.
    ///
    /// Returns `Ok(None)` without writing when `id` is unknown.
    pub fn update_record(&mut self, id: &str, input: RecordInput) -> StoreResult<Option<Record>> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            debug!("event=record_update module=record_store status=not_found id={id}");
            return Ok(None);
        };

        let mut next = self.records.clone();
        next[index].apply_input(input);
        let updated = next[index].clone();
        self.commit_records(next)?;

        info!("event=record_update module=record_store status=ok id={id}");
        Ok(Some(updated))
    }

    /// Removes every record with `id` and persists the result.
    ///
    /// Idempotent; returns the number of removed records.
    pub fn delete_record(&mut self, id: &str) -> StoreResult<usize> {
        let next = self
            .records
            .iter()
            .filter(|record| record.id != id)
            .cloned()
            .collect::<Vec<_>>();
        let removed = self.records.len() - next.len();
        self.commit_records(next)?;

        info!("event=record_delete module=record_store status=ok id={id} removed={removed}");
        Ok(removed)
    }

    pub fn get_record(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Replaces the whole collection, e.g. after a confirmed import.
    ///
    /// Records missing an id or timestamps are repaired first.
    pub fn replace_records(&mut self, mut records: Vec<Record>) -> StoreResult<usize> {
        records.iter_mut().for_each(|record| {
            repair_record(record);
        });
        let count = records.len();
        self.commit_records(records)?;

        info!("event=records_replace module=record_store status=ok count={count}");
        Ok(count)
    }

    /// Shallow-merges `patch` into the settings and persists them.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> StoreResult<&Settings> {
        let mut next = self.settings.clone();
        next.apply(patch);
        self.persistence.save_settings(&next)?;
        self.settings = next;

        info!("event=settings_update module=record_store status=ok");
        Ok(&self.settings)
    }

    /// Restores and persists the default settings.
    pub fn reset_settings(&mut self) -> StoreResult<&Settings> {
        self.update_settings(SettingsPatch::defaults())
    }

    pub fn dashboard_stats(&self) -> DashboardStats {
        let total_spent = self.records.iter().map(|record| record.amount).sum::<f64>();
        let remaining = self.settings.monthly_cap - total_spent;

        DashboardStats {
            total_records: self.records.len(),
            total_spent,
            top_category: top_category(&self.records),
            remaining,
            is_exceeded: remaining < 0.0,
        }
    }

    /// Daily totals for the seven days ending today (UTC).
    pub fn spending_chart_data(&self) -> SpendingChart {
        self.spending_chart_data_on(Utc::now().date_naive())
    }

    /// Daily totals for the seven days ending on `today`.
    ///
    /// Records match a day by exact `date` text; records outside the window
    /// are ignored.
    pub fn spending_chart_data_on(&self, today: NaiveDate) -> SpendingChart {
        let mut days = (0..CHART_DAYS)
            .rev()
            .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
            .map(|day| DailySpending {
                date: day.format("%Y-%m-%d").to_string(),
                total: 0.0,
            })
            .collect::<Vec<_>>();

        for record in &self.records {
            if let Some(day) = days.iter_mut().find(|day| day.date == record.date) {
                day.total += record.amount;
            }
        }

        SpendingChart { days }
    }

    fn commit_records(&mut self, next: Vec<Record>) -> StoreResult<()> {
        self.persistence.save_records(&next)?;
        self.records = next;
        Ok(())
    }
}

/// Most frequent category, first-seen order breaking ties.
fn top_category(records: &[Record]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for record in records {
        let count = counts.entry(record.category.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(record.category.as_str());
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for category in first_seen {
        let count = counts[category];
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }

    best.map_or_else(|| NO_TOP_CATEGORY.to_string(), |(category, _)| category.to_string())
}
