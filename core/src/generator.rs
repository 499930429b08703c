//! Synthetic order generator.
//!
//! Given `(day_count, seed, end_date)` produces the orders placed on each
//! day of `[end_date - day_count + 1, end_date]`, oldest day first.
//!
//! DRAW ORDER (fixed; changing it changes every run):
//!   per day:   order count (Poisson)
//!   per order: customer, channel, payment method, product, packs,
//!              discount, shipping fee, status, fulfilment days,
//!              customer type, shipping method

use crate::{
    catalog::{
        FulfillmentStatus, CATALOG, CHANNEL_WEIGHTS, CUSTOMER_TYPE_WEIGHTS, DISCOUNT_CHOICES,
        FULFILLMENT_DAY_WEIGHTS, PaymentMethod, SHIPPING_FEE_WEIGHTS, SHIPPING_METHOD_WEIGHTS,
        STATUS_WEIGHTS,
    },
    config::GeneratorConfig,
    error::{DashError, DashResult},
    event::OrderRecord,
    rng::{DashRng, SeedBank, StreamSlot},
    types::{cents_from_f64, Day},
};
use chrono::{Datelike, Duration, Weekday};
use serde::{Deserialize, Serialize};

/// Longest window a generator accepts: one hundred years of days.
pub const MAX_DAY_COUNT: i64 = 36_525;

/// Inputs that fully determine a generated sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorParams {
    pub day_count: i64,
    pub seed: u64,
    /// Last day of the window, inclusive.
    pub end_date: Day,
}

impl GeneratorParams {
    pub fn new(day_count: i64, seed: u64, end_date: Day) -> Self {
        Self {
            day_count,
            seed,
            end_date,
        }
    }

    /// First day of the window; `None` when it falls outside the calendar.
    pub fn start_date(&self) -> Option<Day> {
        self.day_count
            .checked_sub(1)
            .and_then(Duration::try_days)
            .and_then(|d| self.end_date.checked_sub_signed(d))
    }

    /// Rejects windows longer than `MAX_DAY_COUNT` or reaching before the
    /// earliest representable date. Non-positive counts are valid (empty).
    pub fn validate(&self) -> DashResult<()> {
        if self.day_count <= 0 {
            return Ok(());
        }
        if self.day_count > MAX_DAY_COUNT || self.start_date().is_none() {
            return Err(DashError::InvalidInput(format!(
                "day count {} is out of range (1..={MAX_DAY_COUNT})",
                self.day_count
            )));
        }
        Ok(())
    }

    /// Days covered by the window, oldest first. Empty for `day_count <= 0`
    /// and for windows that fail `validate`.
    pub fn days(&self) -> Vec<Day> {
        if self.day_count <= 0 {
            return Vec::new();
        }
        if let Err(e) = self.validate() {
            log::warn!("{e}; generating nothing");
            return Vec::new();
        }
        let Some(start) = self.start_date() else {
            return Vec::new();
        };
        start
            .iter_days()
            .take(self.day_count as usize)
            .collect()
    }
}

/// Friday and Saturday draw more orders (weekend soda runs).
pub fn is_peak_day(day: Day) -> bool {
    matches!(day.weekday(), Weekday::Fri | Weekday::Sat)
}

pub struct OrderGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> OrderGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, params: &GeneratorParams) -> Vec<OrderRecord> {
        let mut rng = SeedBank::new(params.seed).for_stream(StreamSlot::Orders);
        let mut orders = Vec::new();
        let mut order_number = self.config.first_order_number;

        for day in params.days() {
            let factor = if is_peak_day(day) {
                self.config.peak_day_factor
            } else {
                1.0
            };
            let count = rng.poisson(self.config.orders_per_day_mean * factor);
            for _ in 0..count {
                orders.push(self.draw_order(day, order_number, &mut rng));
                order_number += 1;
            }
        }

        log::debug!(
            "{}: generated {} orders over {} days (seed={})",
            rng.name,
            orders.len(),
            params.day_count.max(0),
            params.seed
        );
        orders
    }

    fn draw_order(&self, date: Day, order_number: u64, rng: &mut DashRng) -> OrderRecord {
        let customer = rng.next_u64_below(u64::from(self.config.customer_count)) + 1;
        let channel = rng.pick_weighted(&CHANNEL_WEIGHTS);
        let payment_method = *rng.pick(PaymentMethod::ALL);
        let product = rng.pick(&CATALOG);
        let packs = rng.next_u64_below(u64::from(self.config.max_packs_per_order)) as u32 + 1;

        let items_count = packs * product.pack_size;
        let subtotal = cents_from_f64(f64::from(items_count) * product.unit_price);

        let discount = cents_from_f64(*rng.pick(&DISCOUNT_CHOICES));
        let shipping = cents_from_f64(rng.pick_weighted(&SHIPPING_FEE_WEIGHTS));
        let tax = cents_from_f64(subtotal as f64 / 100.0 * self.config.tax_rate);
        let total = (subtotal + tax + shipping - discount).max(self.config.min_order_total_cents);

        let status = rng.pick_weighted(&STATUS_WEIGHTS);
        let fulfillment_days = rng.pick_weighted(&FULFILLMENT_DAY_WEIGHTS);
        let fulfillment_status = if fulfillment_days > self.config.late_threshold_days {
            FulfillmentStatus::Late
        } else {
            FulfillmentStatus::OnTime
        };
        let customer_type = rng.pick_weighted(&CUSTOMER_TYPE_WEIGHTS);
        let shipping_method = rng.pick_weighted(&SHIPPING_METHOD_WEIGHTS);

        OrderRecord {
            order_id: format!("ORD-{order_number}"),
            date,
            customer_name: format!("Customer #{customer:04}"),
            channel,
            payment_method,
            status,
            items_count,
            packs,
            product,
            subtotal,
            discount,
            shipping,
            tax,
            total,
            is_refund: status.is_refund(),
            fulfillment_days,
            fulfillment_status,
            customer_type,
            shipping_method,
        }
    }
}

/// Convenience wrapper around `OrderGenerator::generate`.
pub fn generate_orders(config: &GeneratorConfig, params: &GeneratorParams) -> Vec<OrderRecord> {
    OrderGenerator::new(config).generate(params)
}
