//! Storefront traffic generator and the trend aggregates built on it.
//!
//! One row per (day, traffic source). Draw order per row: sessions,
//! conversion noise, orders, category, average ticket, product.

use crate::{
    config::TrafficConfig,
    event::SessionRecord,
    generator::{is_peak_day, GeneratorParams},
    rng::{DashRng, SeedBank, StreamSlot},
    types::{cents_from_f64, Cents, Day},
};
use chrono::{Datelike, Duration, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Traffic sources with their baseline daily sessions and conversion rate.
pub const TRAFFIC_SOURCES: [(&str, f64, f64); 5] = [
    ("Organic Search", 110.0, 0.032),
    ("Paid Ads", 130.0, 0.040),
    ("Social", 85.0, 0.024),
    ("Email", 60.0, 0.055),
    ("Direct", 75.0, 0.030),
];

pub const TREND_CATEGORIES: [&str; 6] = [
    "Cola",
    "Lemon-Lime",
    "Citrus",
    "Fruit Soda",
    "Specialty Cola",
    "Energy Drinks",
];

pub const TREND_PRODUCTS: [&str; 10] = [
    "Coca-Cola Classic 12oz Cans (24-pack)",
    "Coca-Cola Classic 20oz Bottles (12-pack)",
    "Coke Zero 12oz Cans (12-pack)",
    "Pepsi Cola 12oz Cans (12-pack)",
    "Sprite Lemon-Lime 20oz Bottles (12-pack)",
    "Fanta Orange 12oz Cans (12-pack)",
    "Dr Pepper 12oz Cans (6-pack)",
    "Mountain Dew 16oz Bottles (6-pack)",
    "Monster Energy 16oz Cans (4-pack)",
    "Red Bull 8.4oz Cans (4-pack)",
];

/// Mean and standard deviation of the average cart value per category.
fn ticket_distribution(category: &str) -> (f64, f64) {
    match category {
        "Energy Drinks" => (45.0, 10.0),
        "Specialty Cola" | "Fruit Soda" => (38.0, 8.0),
        "Cola" | "Lemon-Lime" | "Citrus" => (32.0, 7.0),
        _ => (30.0, 6.0),
    }
}

fn weekday_factor(day: Day) -> f64 {
    let early_week = if matches!(day.weekday(), Weekday::Mon | Weekday::Tue) {
        1.1
    } else {
        0.95
    };
    let weekend = if is_peak_day(day) { 1.2 } else { 1.0 };
    early_week * weekend
}

pub fn generate_sessions(config: &TrafficConfig, params: &GeneratorParams) -> Vec<SessionRecord> {
    let mut rng = SeedBank::new(params.seed).for_stream(StreamSlot::Traffic);
    let mut rows = Vec::new();
    for day in params.days() {
        for (source, base_sessions, base_cr) in TRAFFIC_SOURCES {
            rows.push(draw_row(config, day, source, base_sessions, base_cr, &mut rng));
        }
    }
    log::debug!("{}: generated {} session rows", rng.name, rows.len());
    rows
}

fn draw_row(
    config: &TrafficConfig,
    date: Day,
    traffic_source: &'static str,
    base_sessions: f64,
    base_cr: f64,
    rng: &mut DashRng,
) -> SessionRecord {
    let sessions = rng.poisson(base_sessions * weekday_factor(date));
    let cr = (base_cr + rng.normal(0.0, config.conversion_noise_std))
        .clamp(config.min_conversion_rate, config.max_conversion_rate);
    let orders = rng.binomial(sessions, cr);
    let category = *rng.pick(&TREND_CATEGORIES);
    let (mean, std_dev) = ticket_distribution(category);
    let avg_ticket = rng.normal(mean, std_dev).max(config.min_avg_ticket);
    let product_name = *rng.pick(&TREND_PRODUCTS);

    SessionRecord {
        date,
        traffic_source,
        category,
        product_name,
        sessions,
        orders,
        revenue: cents_from_f64(orders as f64 * avg_ticket),
    }
}

// ── Filtering ────────────────────────────────────────────────────────────────

/// Conjunctive predicates over session rows. `None` means unrestricted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendFilter {
    pub date_range: Option<(Day, Day)>,
    pub sources: Option<BTreeSet<String>>,
    pub categories: Option<BTreeSet<String>>,
}

impl TrendFilter {
    pub fn matches(&self, row: &SessionRecord) -> bool {
        if let Some((start, end)) = self.date_range {
            if row.date < start || row.date > end {
                return false;
            }
        }
        if let Some(sources) = &self.sources {
            if !sources.contains(row.traffic_source) {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.contains(row.category) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, rows: &[SessionRecord]) -> Vec<SessionRecord> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }

    /// The same predicates over the equally long window just before this
    /// one. `None` when no date range is set.
    pub fn previous_period(&self) -> Option<Self> {
        let (start, end) = self.date_range?;
        let (prev_start, prev_end) = previous_window(start, end);
        Some(Self {
            date_range: Some((prev_start, prev_end)),
            ..self.clone()
        })
    }
}

/// `[start, end]` → the window of the same length ending the day before `start`.
pub fn previous_window(start: Day, end: Day) -> (Day, Day) {
    let len = (end - start).num_days() + 1;
    let prev_end = start - Duration::days(1);
    let prev_start = prev_end - Duration::days(len - 1);
    (prev_start, prev_end)
}

// ── Aggregates ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSummary {
    pub revenue: Cents,
    pub orders: u64,
    pub sessions: u64,
    pub conversion_rate: f64,
    /// Average order value in currency units.
    pub aov: f64,
}

impl TrendSummary {
    pub fn compute(rows: &[SessionRecord]) -> Self {
        let revenue: Cents = rows.iter().map(|r| r.revenue).sum();
        let orders: u64 = rows.iter().map(|r| r.orders).sum();
        let sessions: u64 = rows.iter().map(|r| r.sessions).sum();
        Self {
            revenue,
            orders,
            sessions,
            conversion_rate: ratio(orders as f64, sessions as f64),
            aov: ratio(revenue as f64 / 100.0, orders as f64),
        }
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Percent change against a previous value; 0 when there is no positive
/// baseline to compare with.
pub fn pct_delta(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendDeltas {
    pub revenue_pct: f64,
    pub orders_pct: f64,
    pub conversion_rate_pct: f64,
    pub aov_pct: f64,
}

impl TrendDeltas {
    pub fn between(current: &TrendSummary, previous: &TrendSummary) -> Self {
        Self {
            revenue_pct: pct_delta(current.revenue as f64, previous.revenue as f64),
            orders_pct: pct_delta(current.orders as f64, previous.orders as f64),
            conversion_rate_pct: pct_delta(current.conversion_rate, previous.conversion_rate),
            aov_pct: pct_delta(current.aov, previous.aov),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: Day,
    pub revenue: Cents,
    pub orders: u64,
}

/// Revenue and orders per day, ascending by date.
pub fn daily_series(rows: &[SessionRecord]) -> Vec<DailyPoint> {
    let mut by_day: std::collections::BTreeMap<Day, (Cents, u64)> = Default::default();
    for r in rows {
        let entry = by_day.entry(r.date).or_default();
        entry.0 += r.revenue;
        entry.1 += r.orders;
    }
    by_day
        .into_iter()
        .map(|(date, (revenue, orders))| DailyPoint {
            date,
            revenue,
            orders,
        })
        .collect()
}

/// Sum `value` per key in first-seen key order, then sort descending (stable).
fn grouped_desc<K, F>(rows: &[SessionRecord], key: K, value: F) -> Vec<(&'static str, u64)>
where
    K: Fn(&SessionRecord) -> &'static str,
    F: Fn(&SessionRecord) -> u64,
{
    let mut groups: Vec<(&'static str, u64)> = Vec::new();
    for r in rows {
        let k = key(r);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, total)) => *total += value(r),
            None => groups.push((k, value(r))),
        }
    }
    groups.sort_by(|a, b| b.1.cmp(&a.1));
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub category: &'static str,
    pub revenue: Cents,
}

pub fn revenue_by_category(rows: &[SessionRecord]) -> Vec<CategoryRevenue> {
    grouped_desc(rows, |r| r.category, |r| r.revenue.max(0) as u64)
        .into_iter()
        .map(|(category, revenue)| CategoryRevenue {
            category,
            revenue: revenue as Cents,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceSessions {
    pub traffic_source: &'static str,
    pub sessions: u64,
}

pub fn sessions_by_source(rows: &[SessionRecord]) -> Vec<SourceSessions> {
    grouped_desc(rows, |r| r.traffic_source, |r| r.sessions)
        .into_iter()
        .map(|(traffic_source, sessions)| SourceSessions {
            traffic_source,
            sessions,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPerformance {
    pub product_name: &'static str,
    pub orders: u64,
    pub revenue: Cents,
    pub sessions: u64,
    pub conversion_rate: f64,
    pub aov: f64,
}

/// Top `n` products by revenue, ties in first-seen order.
pub fn top_products(rows: &[SessionRecord], n: usize) -> Vec<ProductPerformance> {
    let mut perf: Vec<ProductPerformance> = Vec::new();
    for r in rows {
        match perf.iter_mut().find(|p| p.product_name == r.product_name) {
            Some(p) => {
                p.orders += r.orders;
                p.revenue += r.revenue;
                p.sessions += r.sessions;
            }
            None => perf.push(ProductPerformance {
                product_name: r.product_name,
                orders: r.orders,
                revenue: r.revenue,
                sessions: r.sessions,
                conversion_rate: 0.0,
                aov: 0.0,
            }),
        }
    }
    for p in &mut perf {
        p.conversion_rate = ratio(p.orders as f64, p.sessions as f64);
        p.aov = ratio(p.revenue as f64 / 100.0, p.orders as f64);
    }
    perf.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    perf.truncate(n);
    perf
}
