//! Aggregates over hand-built order records with known answers.

use chrono::NaiveDate;
use soda_dash_core::{
    aggregate::{
        average_order_value, category_sales, customer_summary, high_value_customers,
        net_revenue, recent_orders, sku_ranking, top_n, CustomerSpend, TransactionSummary,
    },
    catalog::{
        product_by_sku, Category, Channel, CustomerType, FulfillmentStatus, OrderStatus,
        PaymentMethod, ShippingMethod,
    },
    event::OrderRecord,
    insights::{recommended_actions, Signal},
};

fn order(
    id: u32,
    d: u32,
    customer: &str,
    sku: &str,
    packs: u32,
    total: i64,
    status: OrderStatus,
) -> OrderRecord {
    let product = product_by_sku(sku).unwrap();
    OrderRecord {
        order_id: format!("ORD-{id}"),
        date: NaiveDate::from_ymd_opt(2025, 11, d).unwrap(),
        customer_name: customer.to_string(),
        channel: Channel::Web,
        payment_method: PaymentMethod::CreditCard,
        status,
        items_count: packs * product.pack_size,
        packs,
        product,
        subtotal: total,
        discount: 0,
        shipping: 0,
        tax: 0,
        total,
        is_refund: status.is_refund(),
        fulfillment_days: 2,
        fulfillment_status: FulfillmentStatus::OnTime,
        customer_type: CustomerType::Returning,
        shipping_method: ShippingMethod::Standard,
    }
}

fn ledger() -> Vec<OrderRecord> {
    use OrderStatus::*;
    vec![
        order(1, 1, "Customer #0001", "CC-12C-24", 2, 5_000, Completed),
        order(2, 2, "Customer #0002", "SP-20B-12", 1, 2_500, Completed),
        order(3, 3, "Customer #0001", "CC-12C-24", 1, 3_000, Refunded),
        order(4, 4, "Customer #0003", "DP-12C-6", 4, 1_500, Pending),
        order(5, 5, "Customer #0002", "FA-12C-12", 2, 4_000, Completed),
        order(6, 6, "Customer #0003", "EN-MON-16", 1, 1_200, Chargeback),
        order(7, 7, "Customer #0004", "FA-12C-12", 1, 1_800, Failed),
    ]
}

#[test]
fn summary_matches_hand_totals() {
    let rows = ledger();
    let s = TransactionSummary::compute(&rows);

    assert_eq!(s.gross_revenue, 11_500);
    assert_eq!(s.refund_amount, 4_200);
    assert_eq!(s.net_revenue, 7_300);
    assert_eq!(net_revenue(&rows), 7_300);
    assert_eq!(s.total_orders, 7);
    assert_eq!(s.completed_orders, 3);
    assert_eq!(s.refund_orders, 2);
    assert!((s.refund_rate - 2.0 / 3.0).abs() < 1e-12);
    assert!((s.avg_order_value - 115.0 / 3.0).abs() < 1e-9);
    assert!((average_order_value(&rows) - s.avg_order_value).abs() < 1e-12);
    // 24*2 + 12*1 + 12*2 units on completed orders.
    assert_eq!(s.units_sold, 84);
    assert_eq!(s.late_shipments, 0);
    assert_eq!(s.new_customer_share, 0.0);
}

#[test]
fn empty_input_aggregates_to_zero() {
    assert_eq!(net_revenue(&[]), 0);
    assert_eq!(average_order_value(&[]), 0.0);
    assert!(customer_summary(&[]).is_empty());
    assert!(sku_ranking(&[]).is_empty());
    assert!(category_sales(&[]).is_empty());
    let hv = high_value_customers(&[]);
    assert_eq!(hv.count, 0);
    assert_eq!(hv.threshold, 0.0);
}

#[test]
fn no_completed_orders_gives_zero_aov_and_refund_rate() {
    let rows = vec![order(1, 1, "Customer #0001", "CC-12C-24", 1, 900, OrderStatus::Refunded)];
    let s = TransactionSummary::compute(&rows);
    assert_eq!(s.avg_order_value, 0.0);
    assert_eq!(s.refund_rate, 0.0);
    assert_eq!(s.net_revenue, -900);
}

#[test]
fn customer_net_spend_subtracts_refunds() {
    let customers = customer_summary(&ledger());
    let by_name = |name: &str| customers.iter().find(|c| c.customer_name == name).cloned().unwrap();

    assert_eq!(by_name("Customer #0001").net_spend, 2_000);
    assert_eq!(by_name("Customer #0001").orders, 2);
    assert_eq!(by_name("Customer #0002").net_spend, 6_500);
    // Pending 1,500 minus chargeback 1,200.
    assert_eq!(by_name("Customer #0003").net_spend, 300);
    assert_eq!(by_name("Customer #0004").net_spend, 1_800);

    assert_eq!(customers[0].customer_name, "Customer #0002");
    assert!(customers.windows(2).all(|w| w[0].net_spend >= w[1].net_spend));
}

#[test]
fn sku_ranking_counts_completed_only_and_breaks_ties_by_first_seen() {
    use OrderStatus::*;
    let rows = vec![
        // 12 units each for SP and FA; SP appears first.
        order(1, 1, "A", "SP-20B-12", 1, 2_000, Completed),
        order(2, 2, "B", "FA-12C-12", 1, 1_600, Completed),
        order(3, 3, "C", "CC-12C-24", 1, 3_000, Completed),
        order(4, 4, "D", "FA-12C-12", 5, 9_000, Refunded),
    ];
    let ranking = sku_ranking(&rows);
    let skus: Vec<&str> = ranking.iter().map(|s| s.sku).collect();
    assert_eq!(skus, ["CC-12C-24", "SP-20B-12", "FA-12C-12"]);
    assert_eq!(ranking[2].units_sold, 12, "refunded order counted");
    assert_eq!(ranking[2].revenue, 1_600);

    let top = top_n(&ranking, 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top_n(&ranking, 10).len(), 3);
}

#[test]
fn category_sales_sum_completed_revenue() {
    let cats = category_sales(&ledger());
    let regular = cats.iter().find(|c| c.category == Category::RegularSoda).unwrap();
    assert_eq!(regular.revenue, 5_000);
    assert_eq!(regular.orders, 1);
    let fruit = cats.iter().find(|c| c.category == Category::FruitSoda).unwrap();
    assert_eq!(fruit.revenue, 4_000);
    assert!(cats.iter().all(|c| c.category != Category::EnergyDrink));
    assert_eq!(cats[0].category, Category::RegularSoda);
}

#[test]
fn recent_orders_newest_first_and_capped() {
    let recent = recent_orders(&ledger(), 3);
    let ids: Vec<&str> = recent.iter().map(|r| r.order_id.as_str()).collect();
    assert_eq!(ids, ["ORD-7", "ORD-6", "ORD-5"]);
}

#[test]
fn high_value_customers_are_strictly_above_ninetieth_percentile() {
    let customers: Vec<CustomerSpend> = (1..=10)
        .map(|i| CustomerSpend {
            customer_name: format!("Customer #{i:04}"),
            orders: 1,
            net_spend: i * 1_000,
            units_purchased: 1,
        })
        .collect();
    let hv = high_value_customers(&customers);
    // 1000..=10000: position 8.1 interpolates to 9,100.
    assert!((hv.threshold - 9_100.0).abs() < 1e-9);
    assert_eq!(hv.count, 1);

    let flat: Vec<CustomerSpend> = customers
        .iter()
        .map(|c| CustomerSpend { net_spend: 500, ..c.clone() })
        .collect();
    assert_eq!(high_value_customers(&flat).count, 0);
}

#[test]
fn recommendations_follow_thresholds() {
    let rows = ledger();
    let summary = TransactionSummary::compute(&rows);
    let hv = high_value_customers(&customer_summary(&rows));
    let actions = recommended_actions(&summary, &hv);

    let refund = actions.iter().find(|a| a.signal == Signal::RefundRate).unwrap();
    assert!(refund.text.contains("relatively high"), "{}", refund.text);
    let late = actions.iter().find(|a| a.signal == Signal::LateShipments).unwrap();
    assert!(late.text.starts_with("All orders in this view shipped on time"));
    let mix = actions.iter().find(|a| a.signal == Signal::CustomerMix).unwrap();
    assert!(mix.text.starts_with("Only 0.0%"), "{}", mix.text);
    let stock = actions.iter().find(|a| a.signal == Signal::InventoryPressure).unwrap();
    assert!(stock.text.contains("84 total cans/bottles"));

    let quiet = recommended_actions(&TransactionSummary::default(), &hv);
    assert!(quiet.iter().all(|a| a.signal != Signal::InventoryPressure));
    let healthy = quiet.iter().find(|a| a.signal == Signal::RefundRate).unwrap();
    assert!(healthy.text.contains("healthy range"));
}
