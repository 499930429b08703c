//! Recommended actions for the transactions view.
//!
//! Each signal selects one canned recommendation by threshold.

use crate::{
    aggregate::{HighValueCustomers, TransactionSummary},
    types::group_thousands,
};
use serde::Serialize;

pub const HIGH_REFUND_RATE: f64 = 0.08;
pub const HIGH_LATE_RATE: f64 = 0.10;
pub const LOW_NEW_SHARE_PCT: f64 = 30.0;
pub const HIGH_NEW_SHARE_PCT: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    RefundRate,
    LateShipments,
    HighValueCustomers,
    CustomerMix,
    InventoryPressure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub signal: Signal,
    pub text: String,
}

impl Recommendation {
    fn new(signal: Signal, text: String) -> Self {
        Self { signal, text }
    }
}

pub fn recommended_actions(
    summary: &TransactionSummary,
    high_value: &HighValueCustomers,
) -> Vec<Recommendation> {
    let mut actions = Vec::new();
    let refund_pct = summary.refund_rate * 100.0;
    let late_pct = summary.late_rate * 100.0;
    let new_share = summary.new_customer_share;

    if summary.refund_rate > HIGH_REFUND_RATE {
        actions.push(Recommendation::new(
            Signal::RefundRate,
            format!(
                "Refund rate is {refund_pct:.1}%, which is relatively high. Review which soda \
                 SKUs are driving refunds (damaged cans, incorrect flavor, warm deliveries) and \
                 tighten packaging, handling, or product descriptions."
            ),
        ));
    } else {
        actions.push(Recommendation::new(
            Signal::RefundRate,
            format!(
                "Refund rate is {refund_pct:.1}%, which is within a healthy range. Keep current \
                 quality and handling standards, and continue monitoring by flavor and brand."
            ),
        ));
    }

    if summary.late_rate > HIGH_LATE_RATE {
        actions.push(Recommendation::new(
            Signal::LateShipments,
            format!(
                "{late_pct:.1}% of orders are shipping late. Check peak times for warehouse \
                 picks, cooler restocking, and courier pickup windows. Consider adjusting \
                 same-day / next-day promises on the storefront."
            ),
        ));
    } else if summary.late_rate > 0.0 {
        actions.push(Recommendation::new(
            Signal::LateShipments,
            format!(
                "Some orders ({late_pct:.1}%) are shipping late. Pay attention to SKUs stored in \
                 coolers or backroom shelves that slow down picking and reorganize to keep \
                 best-sellers closest."
            ),
        ));
    } else {
        actions.push(Recommendation::new(
            Signal::LateShipments,
            "All orders in this view shipped on time. Use this slice as a benchmark when adding \
             new soda SKUs or changing fulfillment partners."
                .to_string(),
        ));
    }

    if high_value.count > 0 {
        actions.push(Recommendation::new(
            Signal::HighValueCustomers,
            format!(
                "{} top-spend soda fans exceed the 90th percentile net spend of ${:.2}. Consider \
                 a VIP tier: free case upgrades, early access to new flavors, or mix-and-match \
                 bundles.",
                high_value.count,
                high_value.threshold / 100.0
            ),
        ));
    }

    if new_share < LOW_NEW_SHARE_PCT {
        actions.push(Recommendation::new(
            Signal::CustomerMix,
            format!(
                "Only {new_share:.1}% of orders are from new soda customers. Invest in awareness \
                 (front-of-store displays, social promos, food-bundle deals) to bring in more \
                 first-time buyers."
            ),
        ));
    } else if new_share > HIGH_NEW_SHARE_PCT {
        actions.push(Recommendation::new(
            Signal::CustomerMix,
            format!(
                "{new_share:.1}% of orders are from new customers. Acquisition is strong; now \
                 push loyalty: refill reminders, multi-case discounts, and subscribe-and-save on \
                 favorite flavors."
            ),
        ));
    } else {
        actions.push(Recommendation::new(
            Signal::CustomerMix,
            format!(
                "Balanced mix of new ({new_share:.1}%) and returning customers. A good base to \
                 test different promotions for classic vs. limited-time soda flavors."
            ),
        ));
    }

    if summary.units_sold > 0 {
        actions.push(Recommendation::new(
            Signal::InventoryPressure,
            format!(
                "You sold {} total cans/bottles in this period. Cross-check this with your \
                 inventory overview to ensure high-velocity SKUs (Cola & Citrus especially) are \
                 reordered before hitting low-stock thresholds.",
                group_thousands(summary.units_sold)
            ),
        ));
    }

    actions
}
