//! Inventory overview: stock list, search, stock-level alerts.
//!
//! The list is session-scoped. Products added through `add_product`
//! live only as long as the owning session context.

use crate::{
    error::{DashError, DashResult},
    types::{group_thousands, Cents},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Good,
    Low,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub product: String,
    pub id: String,
    pub category: String,
    pub stock: u32,
    pub min_stock: u32,
    pub value: Cents,
    pub status: StockStatus,
}

impl InventoryItem {
    fn seeded(
        product: &str,
        id: &str,
        category: &str,
        stock: u32,
        min_stock: u32,
        value_dollars: i64,
        status: StockStatus,
    ) -> Self {
        Self {
            product: product.into(),
            id: id.into(),
            category: category.into(),
            stock,
            min_stock,
            value: value_dollars * 100,
            status,
        }
    }
}

/// Form input for a new product. Only the name is required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub id: Option<String>,
    pub category: Option<String>,
    pub stock: u32,
    pub min_stock: u32,
    pub value: Cents,
    pub status: Option<StockStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    #[default]
    All,
    Critical,
    Low,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryQuery {
    /// Case-insensitive substring of the product name.
    pub search: Option<String>,
    /// Exact category; `None` for all categories.
    pub category: Option<String>,
    pub stock_filter: StockFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryMetrics {
    pub total_value: Cents,
    pub total_products: usize,
    pub critical_count: usize,
    pub low_count: usize,
}

impl InventoryMetrics {
    pub fn summary_line(&self) -> String {
        format!(
            "${} · {} products · {} critical · {} low",
            group_thousands((self.total_value / 100).max(0) as u64),
            self.total_products,
            self.critical_count,
            self.low_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inventory {
    items: Vec<InventoryItem>,
    added: usize,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Inventory {
    pub fn seeded() -> Self {
        use StockStatus::*;
        let items = vec![
            InventoryItem::seeded("Mountain Dew 16oz Bottles", "P005", "Citrus", 72, 30, 129, Good),
            InventoryItem::seeded("Sprite 20oz Bottles", "P003", "Lemon-Lime", 58, 25, 110, Good),
            InventoryItem::seeded(
                "Coca-Cola Classic 12oz Cans (24-pack)",
                "P001",
                "Cola",
                45,
                20,
                855,
                Good,
            ),
            InventoryItem::seeded("Pepsi 2-Liter Bottles", "P002", "Cola", 32, 15, 80, Good),
            InventoryItem::seeded(
                "Dr Pepper 12oz Cans (6-pack)",
                "P004",
                "Specialty Cola",
                28,
                15,
                140,
                Good,
            ),
            InventoryItem::seeded(
                "Fanta Orange 12oz Cans (12-pack)",
                "P006",
                "Fruit Soda",
                22,
                20,
                154,
                Low,
            ),
        ];
        Self { items, added: 0 }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for item in &self.items {
            if !out.contains(&item.category.as_str()) {
                out.push(&item.category);
            }
        }
        out
    }

    pub fn add_product(&mut self, input: NewProduct) -> DashResult<&InventoryItem> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(DashError::InvalidInput(
                "Please enter at least a product name.".into(),
            ));
        }
        self.added += 1;
        let id = non_blank(input.id).unwrap_or_else(|| format!("NEW{}", self.added));
        let category = non_blank(input.category).unwrap_or_else(|| "Uncategorized".into());
        self.items.push(InventoryItem {
            product: name.to_string(),
            id,
            category,
            stock: input.stock,
            min_stock: input.min_stock,
            value: input.value,
            status: input.status.unwrap_or(StockStatus::Good),
        });
        log::info!("inventory: added product '{name}'");
        Ok(&self.items[self.items.len() - 1])
    }

    fn search_and_category<'a>(
        &'a self,
        query: &InventoryQuery,
    ) -> impl Iterator<Item = &'a InventoryItem> + 'a {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let category = query.category.clone();
        self.items.iter().filter(move |item| {
            let name_ok = needle
                .as_deref()
                .map_or(true, |n| item.product.to_lowercase().contains(n));
            let category_ok = category.as_deref().map_or(true, |c| item.category == c);
            name_ok && category_ok
        })
    }

    /// Rows for the stock table: search, category, then stock filter.
    pub fn query(&self, query: &InventoryQuery) -> Vec<&InventoryItem> {
        self.search_and_category(query)
            .filter(|item| match query.stock_filter {
                StockFilter::All => true,
                StockFilter::Critical => item.status == StockStatus::Critical,
                StockFilter::Low => item.status == StockStatus::Low,
            })
            .collect()
    }

    /// Metric cards over the searched rows, before the stock filter.
    pub fn metrics(&self, query: &InventoryQuery) -> InventoryMetrics {
        let mut m = InventoryMetrics::default();
        for item in self.search_and_category(query) {
            m.total_products += 1;
            m.total_value += item.value;
            match item.status {
                StockStatus::Critical => m.critical_count += 1,
                StockStatus::Low => m.low_count += 1,
                StockStatus::Good => {}
            }
        }
        m
    }

    /// Searched rows whose status is not good.
    pub fn alerts(&self, query: &InventoryQuery) -> Vec<&InventoryItem> {
        self.search_and_category(query)
            .filter(|item| item.status != StockStatus::Good)
            .collect()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
