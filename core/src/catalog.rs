//! Static product catalog and the categorical vocabularies of an order.
//!
//! Weight tables are listed in the order the generator draws from them.
//! Changing an order or a weight changes every generated sequence.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One sellable soda SKU.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub sku: &'static str,
    pub product_name: &'static str,
    pub brand: &'static str,
    pub flavor: &'static str,
    pub category: Category,
    /// Cans or bottles per pack.
    pub pack_size: u32,
    /// Price per can or bottle, in currency units.
    pub unit_price: f64,
}

pub static CATALOG: [Product; 8] = [
    Product {
        sku: "CC-12C-24",
        product_name: "Coca-Cola Classic 12oz Cans (24-pack)",
        brand: "Coca-Cola",
        flavor: "Cola",
        category: Category::RegularSoda,
        pack_size: 24,
        unit_price: 1.10,
    },
    Product {
        sku: "CC-20B-12",
        product_name: "Coca-Cola Classic 20oz Bottles (12-pack)",
        brand: "Coca-Cola",
        flavor: "Cola",
        category: Category::RegularSoda,
        pack_size: 12,
        unit_price: 1.80,
    },
    Product {
        sku: "SP-20B-12",
        product_name: "Sprite Lemon-Lime 20oz Bottles (12-pack)",
        brand: "Sprite",
        flavor: "Lemon-Lime",
        category: Category::CitrusSoda,
        pack_size: 12,
        unit_price: 1.79,
    },
    Product {
        sku: "FA-12C-12",
        product_name: "Fanta Orange 12oz Cans (12-pack)",
        brand: "Fanta",
        flavor: "Orange",
        category: Category::FruitSoda,
        pack_size: 12,
        unit_price: 1.29,
    },
    Product {
        sku: "DP-12C-6",
        product_name: "Dr Pepper 12oz Cans (6-pack)",
        brand: "Dr Pepper",
        flavor: "Cola",
        category: Category::SpecialtyCola,
        pack_size: 6,
        unit_price: 1.39,
    },
    Product {
        sku: "MD-16B-6",
        product_name: "Mountain Dew 16oz Bottles (6-pack)",
        brand: "Mountain Dew",
        flavor: "Citrus",
        category: Category::CitrusSoda,
        pack_size: 6,
        unit_price: 1.59,
    },
    Product {
        sku: "CCZ-12C-12",
        product_name: "Coke Zero 12oz Cans (12-pack)",
        brand: "Coca-Cola",
        flavor: "Cola",
        category: Category::ZeroSugar,
        pack_size: 12,
        unit_price: 1.35,
    },
    Product {
        sku: "EN-MON-16",
        product_name: "Monster Energy 16oz Cans (4-pack)",
        brand: "Monster",
        flavor: "Energy",
        category: Category::EnergyDrink,
        pack_size: 4,
        unit_price: 2.99,
    },
];

pub fn product_by_sku(sku: &str) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.sku == sku)
}

/// Implements label/ALL/Display/parse for a fieldless categorical enum.
macro_rules! labelled_enum {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Case-insensitive lookup by display label.
            pub fn from_label(label: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label().eq_ignore_ascii_case(label.trim()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RegularSoda,
    CitrusSoda,
    FruitSoda,
    SpecialtyCola,
    ZeroSugar,
    EnergyDrink,
}

labelled_enum!(Category {
    RegularSoda => "Regular Soda",
    CitrusSoda => "Citrus Soda",
    FruitSoda => "Fruit Soda",
    SpecialtyCola => "Specialty Cola",
    ZeroSugar => "Zero Sugar",
    EnergyDrink => "Energy Drink",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Web,
    MobileApp,
    InStorePos,
}

labelled_enum!(Channel {
    Web => "Web",
    MobileApp => "Mobile App",
    InStorePos => "In-Store POS",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    CreditCard,
    PayPal,
    ApplePay,
    GooglePay,
}

labelled_enum!(PaymentMethod {
    CreditCard => "Credit Card",
    PayPal => "PayPal",
    ApplePay => "Apple Pay",
    GooglePay => "Google Pay",
});

/// Mutually exclusive order outcomes. Refunded and Chargeback
/// count against revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Completed,
    Refunded,
    Pending,
    Failed,
    Chargeback,
}

labelled_enum!(OrderStatus {
    Completed => "Completed",
    Refunded => "Refunded",
    Pending => "Pending",
    Failed => "Failed",
    Chargeback => "Chargeback",
});

impl OrderStatus {
    pub fn is_refund(&self) -> bool {
        matches!(self, Self::Refunded | Self::Chargeback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingMethod {
    Standard,
    Express,
    LocalDelivery,
    Pickup,
}

labelled_enum!(ShippingMethod {
    Standard => "Standard",
    Express => "Express",
    LocalDelivery => "Local Delivery",
    Pickup => "Pickup",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerType {
    New,
    Returning,
}

labelled_enum!(CustomerType {
    New => "New",
    Returning => "Returning",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentStatus {
    OnTime,
    Late,
}

labelled_enum!(FulfillmentStatus {
    OnTime => "On-Time",
    Late => "Late",
});

// ── Draw tables ──────────────────────────────────────────────────────────────

pub const CHANNEL_WEIGHTS: [(Channel, f64); 3] = [
    (Channel::Web, 0.50),
    (Channel::MobileApp, 0.25),
    (Channel::InStorePos, 0.25),
];

/// Discounts in whole currency units, drawn uniformly (mostly zero).
pub const DISCOUNT_CHOICES: [f64; 5] = [0.0, 0.0, 0.0, 5.0, 10.0];

pub const SHIPPING_FEE_WEIGHTS: [(f64, f64); 4] =
    [(0.0, 0.25), (3.99, 0.45), (6.99, 0.20), (9.99, 0.10)];

pub const STATUS_WEIGHTS: [(OrderStatus, f64); 5] = [
    (OrderStatus::Completed, 0.83),
    (OrderStatus::Refunded, 0.06),
    (OrderStatus::Pending, 0.05),
    (OrderStatus::Failed, 0.04),
    (OrderStatus::Chargeback, 0.02),
];

pub const FULFILLMENT_DAY_WEIGHTS: [(u32, f64); 6] = [
    (1, 0.25),
    (2, 0.30),
    (3, 0.25),
    (4, 0.10),
    (5, 0.07),
    (7, 0.03),
];

pub const CUSTOMER_TYPE_WEIGHTS: [(CustomerType, f64); 2] =
    [(CustomerType::New, 0.30), (CustomerType::Returning, 0.70)];

pub const SHIPPING_METHOD_WEIGHTS: [(ShippingMethod, f64); 4] = [
    (ShippingMethod::Standard, 0.50),
    (ShippingMethod::Express, 0.20),
    (ShippingMethod::LocalDelivery, 0.20),
    (ShippingMethod::Pickup, 0.10),
];
