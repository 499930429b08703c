//! Aggregate views over (filtered) order records.
//!
//! Every aggregate tolerates empty input: counts and sums are zero,
//! rates and averages are zero instead of dividing by zero.
//! Rankings sort descending by their metric with a stable sort, so ties
//! keep first-encountered order.

use crate::{
    catalog::{Category, CustomerType},
    event::OrderRecord,
    types::{Cents, OrderId},
};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionSummary {
    /// Sum of completed totals.
    pub gross_revenue: Cents,
    /// Sum of refunded and charged-back totals.
    pub refund_amount: Cents,
    pub net_revenue: Cents,
    pub total_orders: usize,
    pub completed_orders: usize,
    pub refund_orders: usize,
    /// Refund orders per completed order.
    pub refund_rate: f64,
    /// Mean completed total, in currency units.
    pub avg_order_value: f64,
    pub late_shipments: usize,
    pub late_rate: f64,
    /// Share of orders from new customers, in percent.
    pub new_customer_share: f64,
    /// Cans and bottles on completed orders.
    pub units_sold: u64,
}

impl TransactionSummary {
    pub fn compute(records: &[OrderRecord]) -> Self {
        let mut s = Self {
            total_orders: records.len(),
            ..Self::default()
        };
        let mut new_orders = 0usize;

        for r in records {
            if r.is_completed() {
                s.completed_orders += 1;
                s.gross_revenue += r.total;
                s.units_sold += u64::from(r.items_count);
            }
            if r.is_refund {
                s.refund_orders += 1;
                s.refund_amount += r.total;
            }
            if r.is_late() {
                s.late_shipments += 1;
            }
            if r.customer_type == CustomerType::New {
                new_orders += 1;
            }
        }

        s.net_revenue = s.gross_revenue - s.refund_amount;
        s.refund_rate = ratio(s.refund_orders as f64, s.completed_orders as f64);
        s.avg_order_value = ratio(s.gross_revenue as f64 / 100.0, s.completed_orders as f64);
        s.late_rate = ratio(s.late_shipments as f64, s.total_orders as f64);
        s.new_customer_share = ratio(new_orders as f64, s.total_orders as f64) * 100.0;
        s
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

/// Net revenue: completed totals minus refunded/charged-back totals.
pub fn net_revenue(records: &[OrderRecord]) -> Cents {
    TransactionSummary::compute(records).net_revenue
}

/// Mean completed order total in currency units; 0 with no completed orders.
pub fn average_order_value(records: &[OrderRecord]) -> f64 {
    TransactionSummary::compute(records).avg_order_value
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSpend {
    pub customer_name: String,
    /// Distinct orders.
    pub orders: usize,
    /// Totals with refunds subtracted.
    pub net_spend: Cents,
    pub units_purchased: u64,
}

/// Per-customer net spend, descending.
pub fn customer_summary(records: &[OrderRecord]) -> Vec<CustomerSpend> {
    let mut rows: Vec<CustomerSpend> = Vec::new();
    let mut index: std::collections::HashMap<&str, usize> = Default::default();
    let mut seen_orders: std::collections::HashSet<(&str, &OrderId)> = Default::default();

    for r in records {
        let i = *index.entry(r.customer_name.as_str()).or_insert_with(|| {
            rows.push(CustomerSpend {
                customer_name: r.customer_name.clone(),
                orders: 0,
                net_spend: 0,
                units_purchased: 0,
            });
            rows.len() - 1
        });
        let row = &mut rows[i];
        if seen_orders.insert((r.customer_name.as_str(), &r.order_id)) {
            row.orders += 1;
        }
        row.net_spend += r.effective_total();
        row.units_purchased += u64::from(r.items_count);
    }

    rows.sort_by(|a, b| b.net_spend.cmp(&a.net_spend));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkuSales {
    pub sku: &'static str,
    pub product_name: &'static str,
    pub brand: &'static str,
    pub flavor: &'static str,
    pub category: Category,
    pub pack_size: u32,
    pub packs_sold: u64,
    pub units_sold: u64,
    pub revenue: Cents,
}

/// Completed-order sales per SKU, descending by units sold.
/// Equal unit counts keep the order in which the SKU first appears.
pub fn sku_ranking(records: &[OrderRecord]) -> Vec<SkuSales> {
    let mut rows: Vec<SkuSales> = Vec::new();
    for r in records.iter().filter(|r| r.is_completed()) {
        let p = r.product;
        match rows.iter_mut().find(|s| s.sku == p.sku) {
            Some(s) => {
                s.packs_sold += u64::from(r.packs);
                s.units_sold += u64::from(r.items_count);
                s.revenue += r.total;
            }
            None => rows.push(SkuSales {
                sku: p.sku,
                product_name: p.product_name,
                brand: p.brand,
                flavor: p.flavor,
                category: p.category,
                pack_size: p.pack_size,
                packs_sold: u64::from(r.packs),
                units_sold: u64::from(r.items_count),
                revenue: r.total,
            }),
        }
    }
    rows.sort_by(|a, b| b.units_sold.cmp(&a.units_sold));
    rows
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub category: Category,
    pub orders: usize,
    pub units_sold: u64,
    pub revenue: Cents,
}

/// Completed-order sums per category, descending by revenue.
pub fn category_sales(records: &[OrderRecord]) -> Vec<CategorySales> {
    let mut rows: Vec<CategorySales> = Vec::new();
    for r in records.iter().filter(|r| r.is_completed()) {
        let category = r.category();
        match rows.iter_mut().find(|c| c.category == category) {
            Some(c) => {
                c.orders += 1;
                c.units_sold += u64::from(r.items_count);
                c.revenue += r.total;
            }
            None => rows.push(CategorySales {
                category,
                orders: 1,
                units_sold: u64::from(r.items_count),
                revenue: r.total,
            }),
        }
    }
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rows
}

/// Most recent first, at most `limit` rows. Orders on the same day keep
/// their generated order.
pub fn recent_orders(records: &[OrderRecord], limit: usize) -> Vec<OrderRecord> {
    let mut rows = records.to_vec();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.truncate(limit);
    rows
}

/// First `n` rows of an already ranked list.
pub fn top_n<T: Clone>(ranked: &[T], n: usize) -> Vec<T> {
    ranked.iter().take(n).cloned().collect()
}

/// Linear-interpolation quantile of ascending `sorted` values; 0 when empty.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HighValueCustomers {
    /// 90th percentile of net spend, in cents.
    pub threshold: f64,
    /// Customers strictly above the threshold.
    pub count: usize,
}

pub const HIGH_VALUE_QUANTILE: f64 = 0.9;

pub fn high_value_customers(customers: &[CustomerSpend]) -> HighValueCustomers {
    let mut spends: Vec<f64> = customers.iter().map(|c| c.net_spend as f64).collect();
    spends.sort_by(f64::total_cmp);
    let threshold = quantile(&spends, HIGH_VALUE_QUANTILE);
    let count = spends.iter().filter(|s| **s > threshold).count();
    HighValueCustomers { threshold, count }
}
