//! Filter criteria over order records.
//!
//! Predicates combine with logical AND. An unset predicate (`None`)
//! admits everything; a set that is present but empty admits nothing.
//! Filtering never reorders rows.

use crate::{
    aggregate::quantile,
    catalog::{Category, Channel, OrderStatus},
    error::{DashError, DashResult},
    event::OrderRecord,
    types::{Cents, Day},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Inclusive `[start, end]`.
    pub date_range: Option<(Day, Day)>,
    pub statuses: Option<BTreeSet<OrderStatus>>,
    pub channels: Option<BTreeSet<Channel>>,
    pub categories: Option<BTreeSet<Category>>,
    pub min_total: Option<Cents>,
}

impl FilterCriteria {
    /// Admits every record.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_date_range(mut self, start: Day, end: Day) -> DashResult<Self> {
        if start > end {
            return Err(DashError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        self.date_range = Some((start, end));
        Ok(self)
    }

    pub fn with_statuses<I: IntoIterator<Item = OrderStatus>>(mut self, statuses: I) -> Self {
        self.statuses = Some(statuses.into_iter().collect());
        self
    }

    pub fn with_channels<I: IntoIterator<Item = Channel>>(mut self, channels: I) -> Self {
        self.channels = Some(channels.into_iter().collect());
        self
    }

    pub fn with_categories<I: IntoIterator<Item = Category>>(mut self, categories: I) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    pub fn with_min_total(mut self, min_total: Cents) -> Self {
        self.min_total = Some(min_total);
        self
    }

    /// The sidebar defaults of the transactions page: the last 30 days
    /// ending at the newest record, every status, channel and category, and
    /// a minimum total at the 10th percentile of all totals.
    pub fn page_default(records: &[OrderRecord]) -> Self {
        let Some(max_date) = records.iter().map(|r| r.date).max() else {
            return Self::all();
        };
        let min_date = records.iter().map(|r| r.date).min().unwrap_or(max_date);
        let start = (max_date - Duration::days(29)).max(min_date);

        let mut totals: Vec<f64> = records.iter().map(|r| r.total as f64).collect();
        totals.sort_by(f64::total_cmp);
        let min_total = quantile(&totals, 0.1).floor() as Cents;

        Self {
            date_range: Some((start, max_date)),
            statuses: None,
            channels: None,
            categories: None,
            min_total: Some(min_total),
        }
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        if let Some((start, end)) = self.date_range {
            if record.date < start || record.date > end {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&record.status) {
                return false;
            }
        }
        if let Some(channels) = &self.channels {
            if !channels.contains(&record.channel) {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(&record.category()) {
                return false;
            }
        }
        if let Some(min_total) = self.min_total {
            if record.total < min_total {
                return false;
            }
        }
        true
    }

    /// The matching subsequence, in input order.
    pub fn apply(&self, records: &[OrderRecord]) -> Vec<OrderRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}
