//! Event records produced by the generators.
//!
//! RULE: Records are immutable once generated. Filters and aggregates
//! read them; nothing writes them back.

use crate::{
    catalog::{
        Category, Channel, CustomerType, FulfillmentStatus, OrderStatus, PaymentMethod, Product,
        ShippingMethod,
    },
    types::{Cents, Day, OrderId},
};
use serde::Serialize;

/// One synthetic order.
///
/// Money fields are whole cents. `total` equals
/// `subtotal + tax + shipping - discount`, clamped to the configured
/// minimum order total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub date: Day,
    pub customer_name: String,
    pub channel: Channel,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Total cans or bottles (`packs * pack_size`).
    pub items_count: u32,
    pub packs: u32,
    pub product: &'static Product,
    pub subtotal: Cents,
    pub discount: Cents,
    pub shipping: Cents,
    pub tax: Cents,
    pub total: Cents,
    pub is_refund: bool,
    pub fulfillment_days: u32,
    pub fulfillment_status: FulfillmentStatus,
    pub customer_type: CustomerType,
    pub shipping_method: ShippingMethod,
}

impl OrderRecord {
    pub fn category(&self) -> Category {
        self.product.category
    }

    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }

    pub fn is_late(&self) -> bool {
        self.fulfillment_status == FulfillmentStatus::Late
    }

    /// The total before the minimum-total clamp.
    pub fn unclamped_total(&self) -> Cents {
        self.subtotal + self.tax + self.shipping - self.discount
    }

    /// Signed contribution to customer net spend: refunds count negative.
    pub fn effective_total(&self) -> Cents {
        if self.is_refund {
            -self.total
        } else {
            self.total
        }
    }
}

/// One day × traffic-source row of storefront sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub date: Day,
    pub traffic_source: &'static str,
    pub category: &'static str,
    pub product_name: &'static str,
    pub sessions: u64,
    pub orders: u64,
    pub revenue: Cents,
}

impl SessionRecord {
    pub fn conversion_rate(&self) -> f64 {
        if self.sessions > 0 {
            self.orders as f64 / self.sessions as f64
        } else {
            0.0
        }
    }

    /// Average order value in currency units.
    pub fn aov(&self) -> f64 {
        if self.orders > 0 {
            self.revenue as f64 / 100.0 / self.orders as f64
        } else {
            0.0
        }
    }
}
