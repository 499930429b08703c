//! Inventory overview: search, filters, metrics, add-product validation.

use soda_dash_core::{
    error::DashError,
    inventory::{Inventory, InventoryQuery, NewProduct, StockFilter, StockStatus},
};

#[test]
fn seeded_inventory_metrics() {
    let inv = Inventory::seeded();
    let m = inv.metrics(&InventoryQuery::default());
    assert_eq!(m.total_products, 6);
    assert_eq!(m.total_value, (129 + 110 + 855 + 80 + 140 + 154) * 100);
    assert_eq!(m.critical_count, 0);
    assert_eq!(m.low_count, 1);
    assert_eq!(m.summary_line(), "$1,468 · 6 products · 0 critical · 1 low");

    let alerts = inv.alerts(&InventoryQuery::default());
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].id, "P006");
}

#[test]
fn search_is_case_insensitive_and_combines_with_category() {
    let inv = Inventory::seeded();
    let q = InventoryQuery {
        search: Some("  cans ".into()),
        ..InventoryQuery::default()
    };
    let ids: Vec<&str> = inv.query(&q).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["P001", "P004", "P006"]);

    let q = InventoryQuery {
        search: Some("COLA".into()),
        category: Some("Cola".into()),
        ..InventoryQuery::default()
    };
    let ids: Vec<&str> = inv.query(&q).iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["P001"]);
}

#[test]
fn stock_filter_narrows_rows_but_not_metrics() {
    let inv = Inventory::seeded();
    let low = InventoryQuery {
        stock_filter: StockFilter::Low,
        ..InventoryQuery::default()
    };
    assert_eq!(inv.query(&low).len(), 1);
    assert_eq!(inv.metrics(&low).total_products, 6);

    let critical = InventoryQuery {
        stock_filter: StockFilter::Critical,
        ..InventoryQuery::default()
    };
    assert!(inv.query(&critical).is_empty());
}

#[test]
fn add_product_applies_defaults() {
    let mut inv = Inventory::seeded();
    let item = inv
        .add_product(NewProduct {
            name: "  Ginger Ale 12oz Cans  ".into(),
            stock: 10,
            min_stock: 12,
            value: 4_500,
            status: Some(StockStatus::Critical),
            ..NewProduct::default()
        })
        .unwrap()
        .clone();
    assert_eq!(item.product, "Ginger Ale 12oz Cans");
    assert_eq!(item.id, "NEW1");
    assert_eq!(item.category, "Uncategorized");
    assert_eq!(item.status, StockStatus::Critical);

    let second = inv
        .add_product(NewProduct {
            name: "Root Beer".into(),
            id: Some("RB1".into()),
            category: Some("Specialty Cola".into()),
            ..NewProduct::default()
        })
        .unwrap()
        .clone();
    assert_eq!(second.id, "RB1");
    assert_eq!(second.status, StockStatus::Good);

    assert_eq!(inv.items().len(), 8);
    assert_eq!(inv.metrics(&InventoryQuery::default()).critical_count, 1);
    assert!(inv.categories().contains(&"Uncategorized"));
}

#[test]
fn add_product_requires_a_name() {
    let mut inv = Inventory::seeded();
    let err = inv
        .add_product(NewProduct {
            name: "   ".into(),
            ..NewProduct::default()
        })
        .unwrap_err();
    assert!(matches!(err, DashError::InvalidInput(ref m) if m == "Please enter at least a product name."));
    assert_eq!(inv.items().len(), 6);
}

#[test]
fn results_outlive_the_query_value() {
    let inv = Inventory::seeded();
    let (rows, alerts) = {
        let q = InventoryQuery {
            search: Some("bottles".into()),
            category: Some("Cola".into()),
            ..InventoryQuery::default()
        };
        (inv.query(&q), inv.alerts(&q))
    };
    let ids: Vec<&str> = rows.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["P002"]);
    assert!(alerts.is_empty());
}
