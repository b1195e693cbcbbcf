//! Financial calculators over the in-memory collections.
//!
//! Everything here is a pure, single-pass computation recomputed from current
//! state on demand; nothing is cached for correctness. Orders may reference
//! products that no longer exist in the catalog - such line items contribute
//! zero, they never error.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::entities::{Product, WorkOrder};
use crate::types::{ClientId, ProductId};

/// Product lookup by identifier.
///
/// Build one per computation pass (O(products)), then resolve each line item
/// in O(1) instead of scanning the catalog per item.
#[derive(Debug)]
pub struct ProductIndex<'a> {
    by_id: HashMap<&'a ProductId, &'a Product>,
}

impl<'a> ProductIndex<'a> {
    /// Index a product catalog by identifier.
    #[must_use]
    pub fn new(products: &'a [Product]) -> Self {
        Self {
            by_id: products.iter().map(|p| (&p.id, p)).collect(),
        }
    }

    /// The product with this identifier, if it still exists.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&'a Product> {
        self.by_id.get(id).copied()
    }

    /// The product's price, or zero for a dangling reference.
    #[must_use]
    pub fn price_of(&self, id: &ProductId) -> Decimal {
        self.get(id).map_or(Decimal::ZERO, |p| p.price)
    }

    /// The product's display name, or the dangling-reference placeholder.
    #[must_use]
    pub fn name_of(&self, id: &ProductId) -> &'a str {
        self.get(id).map_or("N/A", |p| p.name.as_str())
    }
}

/// Total value of one order: Σ price × quantity over its line items.
///
/// Line items referencing a product missing from the index contribute zero.
#[must_use]
pub fn order_total(order: &WorkOrder, index: &ProductIndex<'_>) -> Decimal {
    order
        .items
        .iter()
        .map(|item| index.price_of(&item.product_id) * Decimal::from(item.quantity))
        .sum()
}

/// Filters applied to orders before any aggregation.
///
/// The date range is inclusive on both ends at day granularity: an order due
/// any time on `end_date` is still inside the range.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub client_id: Option<ClientId>,
    pub product_id: Option<ProductId>,
}

impl OrderFilter {
    /// Whether an order passes every configured predicate.
    #[must_use]
    pub fn matches(&self, order: &WorkOrder) -> bool {
        let due = order.due_date.date_naive();
        if self.start_date.is_some_and(|start| due < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| due > end) {
            return false;
        }
        if self
            .client_id
            .as_ref()
            .is_some_and(|client| order.client_id != *client)
        {
            return false;
        }
        if self.product_id.as_ref().is_some_and(|product| {
            !order.items.iter().any(|item| item.product_id == *product)
        }) {
            return false;
        }
        true
    }

    /// The orders passing this filter, in input order.
    #[must_use]
    pub fn apply<'a>(&self, orders: &'a [WorkOrder]) -> Vec<&'a WorkOrder> {
        orders.iter().filter(|order| self.matches(order)).collect()
    }
}

/// Headline financial KPIs for a set of (already filtered) orders.
///
/// Delivered orders count toward realized revenue; everything still in the
/// pipeline counts toward projected revenue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub realized_revenue: Decimal,
    pub projected_revenue: Decimal,
    pub completed_orders: usize,
    pub pending_orders: usize,
}

/// Compute the KPI summary over filtered orders.
#[must_use]
pub fn summarize<'a>(
    orders: impl IntoIterator<Item = &'a WorkOrder>,
    index: &ProductIndex<'_>,
) -> FinancialSummary {
    let mut summary = FinancialSummary::default();
    for order in orders {
        let value = order_total(order, index);
        if order.status.is_delivered() {
            summary.realized_revenue += value;
            summary.completed_orders += 1;
        } else {
            summary.projected_revenue += value;
            summary.pending_orders += 1;
        }
    }
    summary
}

/// Realized revenue for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    /// Bucket key in `YYYY-MM` form.
    pub month: String,
    pub total: Decimal,
}

/// Bucket delivered orders by due-date month, ascending by month key.
///
/// Only delivered orders contribute; the buckets partition exactly the
/// delivered subset of the input.
#[must_use]
pub fn monthly_revenue<'a>(
    orders: impl IntoIterator<Item = &'a WorkOrder>,
    index: &ProductIndex<'_>,
) -> Vec<MonthlyRevenue> {
    let mut buckets: BTreeMap<String, Decimal> = BTreeMap::new();
    for order in orders {
        if !order.status.is_delivered() {
            continue;
        }
        let key = format!(
            "{:04}-{:02}",
            order.due_date.year(),
            order.due_date.month()
        );
        *buckets.entry(key).or_default() += order_total(order, index);
    }
    buckets
        .into_iter()
        .map(|(month, total)| MonthlyRevenue { month, total })
        .collect()
}
