//! Two generator runs, same parameters, same output.
//! Any divergence breaks caching and the golden figures below.

use chrono::NaiveDate;
use soda_dash_core::{
    aggregate::TransactionSummary,
    cache::GeneratorCache,
    catalog::OrderStatus,
    config::DashConfig,
    error::DashError,
    generator::{generate_orders, GeneratorParams, MAX_DAY_COUNT},
};
use std::sync::Arc;

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 11, 25).unwrap()
}

#[test]
fn same_params_produce_identical_sequences() {
    let config = DashConfig::default_test();
    let params = GeneratorParams::new(90, 123, end_date());

    let a = generate_orders(&config.generator, &params);
    let b = generate_orders(&config.generator, &params);

    assert_eq!(a.len(), b.len(), "Sequence lengths differ");
    let json_a = serde_json::to_string(&a).unwrap();
    let json_b = serde_json::to_string(&b).unwrap();
    assert_eq!(json_a, json_b, "Serialized sequences diverged");
}

#[test]
fn different_seeds_produce_different_sequences() {
    let config = DashConfig::default_test();
    let a = generate_orders(&config.generator, &GeneratorParams::new(30, 42, end_date()));
    let b = generate_orders(&config.generator, &GeneratorParams::new(30, 99, end_date()));

    let any_different = a.len() != b.len() || a.iter().zip(b.iter()).any(|(x, y)| x != y);
    assert!(any_different, "Different seeds produced identical rows; seed is not being used");
}

#[test]
fn non_positive_day_count_yields_nothing() {
    let config = DashConfig::default_test();
    for days in [0, -1, -90] {
        let rows = generate_orders(&config.generator, &GeneratorParams::new(days, 123, end_date()));
        assert!(rows.is_empty(), "day_count={days} produced {} rows", rows.len());
    }
}

#[test]
fn oversized_day_count_is_rejected_without_panicking() {
    let config = DashConfig::default_test();
    for days in [MAX_DAY_COUNT + 1, 200_000_000, i64::MAX] {
        let params = GeneratorParams::new(days, 1, end_date());
        assert!(params.days().is_empty(), "day_count={days} produced days");
        assert!(
            matches!(params.validate(), Err(DashError::InvalidInput(_))),
            "day_count={days} passed validation"
        );
        assert!(generate_orders(&config.generator, &params).is_empty());
    }

    let longest = GeneratorParams::new(MAX_DAY_COUNT, 1, end_date());
    assert!(longest.validate().is_ok());
    assert_eq!(longest.days().len(), MAX_DAY_COUNT as usize);
    assert!(GeneratorParams::new(i64::MIN, 1, end_date()).validate().is_ok());
    assert!(GeneratorParams::new(i64::MIN, 1, end_date()).days().is_empty());
}

#[test]
fn rows_stay_inside_the_window_oldest_first() {
    let config = DashConfig::default_test();
    let rows = generate_orders(&config.generator, &GeneratorParams::new(14, 5, end_date()));
    let start = NaiveDate::from_ymd_opt(2025, 11, 12).unwrap();

    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r.date >= start && r.date <= end_date()));
    assert!(rows.windows(2).all(|w| w[0].date <= w[1].date), "rows not in day order");
    for (i, r) in rows.iter().enumerate() {
        assert_eq!(r.order_id, format!("ORD-{}", 10_000 + i));
    }
}

#[test]
fn money_invariants_hold_for_every_row() {
    let config = DashConfig::default_test();
    let rows = generate_orders(&config.generator, &GeneratorParams::new(90, 7, end_date()));

    for r in &rows {
        assert!(r.total >= 100, "{} totals {} cents", r.order_id, r.total);
        let unclamped = r.unclamped_total();
        if unclamped >= 100 {
            assert_eq!(r.total, unclamped, "{}: total != subtotal + tax + shipping - discount", r.order_id);
        } else {
            assert_eq!(r.total, 100, "{}: clamp not applied", r.order_id);
        }
        assert_eq!(r.items_count, r.packs * r.product.pack_size);
        assert!((1..=5).contains(&r.packs));
        assert_eq!(r.is_refund, matches!(r.status, OrderStatus::Refunded | OrderStatus::Chargeback));
        assert_eq!(r.is_late(), r.fulfillment_days > 3);
    }
}

/// Golden figures for 90 days ending 2025-11-25 with seed 123.
#[test]
fn golden_ninety_day_run() {
    let config = DashConfig::default_test();
    let rows = generate_orders(&config.generator, &GeneratorParams::new(90, 123, end_date()));

    assert_eq!(rows.len(), 3389);
    let first = &rows[0];
    assert_eq!(first.order_id, "ORD-10000");
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2025, 8, 28).unwrap());
    assert_eq!(first.customer_name, "Customer #0079");
    assert_eq!(first.product.sku, "CC-12C-24");
    assert_eq!(first.packs, 3);
    assert_eq!(first.total, 9332);
    assert_eq!(rows[rows.len() - 1].order_id, "ORD-13388");

    let summary = TransactionSummary::compute(&rows);
    assert_eq!(summary.completed_orders, 2822);
    assert_eq!(summary.gross_revenue, 15_777_168);
    assert_eq!(summary.refund_amount, 1_438_514);
    assert_eq!(summary.net_revenue, 14_338_654);
    assert_eq!(summary.units_sold, 94_478);
}

#[test]
fn cache_reuses_previous_generation() {
    let config = DashConfig::default_test();
    let params = GeneratorParams::new(30, 123, end_date());
    let mut cache = GeneratorCache::new();

    let first = cache.orders(&config.generator, params);
    let second = cache.orders(&config.generator, params);
    assert!(Arc::ptr_eq(&first, &second), "second lookup regenerated rows");
    assert_eq!(cache.len(), 1);

    let other = cache.orders(&config.generator, GeneratorParams::new(31, 123, end_date()));
    assert!(!Arc::ptr_eq(&first, &other));
    assert_eq!(cache.len(), 2);

    assert_eq!(*first, generate_orders(&config.generator, &params));
}
