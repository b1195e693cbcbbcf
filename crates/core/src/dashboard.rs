//! Derived dashboard views over the entity collections.
//!
//! Display orderings live here so every front end agrees: the order list
//! sorts ascending by due date (most urgent first), the dashboard shows the
//! most recently due orders first.

use serde::{Deserialize, Serialize};

use crate::entities::WorkOrder;
use crate::state::AppState;

/// How many orders the dashboard's recent-orders panel shows.
pub const RECENT_ORDER_COUNT: usize = 5;

/// Headline counters for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Orders still in the pipeline (status other than delivered).
    pub pending_orders: usize,
    pub active_clients: usize,
    pub total_products: usize,
}

impl DashboardStats {
    /// Compute the counters from current state.
    #[must_use]
    pub fn from_state(state: &AppState) -> Self {
        Self {
            pending_orders: state
                .orders
                .iter()
                .filter(|order| !order.status.is_delivered())
                .count(),
            active_clients: state.clients.len(),
            total_products: state.products.len(),
        }
    }
}

/// The most recently due orders, descending by due date.
#[must_use]
pub fn recent_orders(orders: &[WorkOrder]) -> Vec<&WorkOrder> {
    let mut sorted: Vec<&WorkOrder> = orders.iter().collect();
    sorted.sort_by(|a, b| b.due_date.cmp(&a.due_date));
    sorted.truncate(RECENT_ORDER_COUNT);
    sorted
}

/// All orders ascending by due date, as shown in the order list view.
#[must_use]
pub fn by_due_date(orders: &[WorkOrder]) -> Vec<&WorkOrder> {
    let mut sorted: Vec<&WorkOrder> = orders.iter().collect();
    sorted.sort_by(|a, b| a.due_date.cmp(&b.due_date));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Client, Product};
    use crate::types::{ClientId, OrderId, OrderStatus, ProductId};

    fn order(id: &str, due: &str, status: OrderStatus) -> WorkOrder {
        WorkOrder {
            id: OrderId::new(id),
            patient_name: format!("Paciente {id}"),
            client_id: ClientId::new("c1"),
            items: Vec::new(),
            due_date: format!("{due}T00:00:00Z").parse().expect("date"),
            status,
            notes: None,
        }
    }

    #[test]
    fn test_stats_counts_pending_orders_only() {
        let state = AppState {
            orders: vec![
                order("o1", "2024-03-01", OrderStatus::Delivered),
                order("o2", "2024-03-02", OrderStatus::Received),
                order("o3", "2024-03-03", OrderStatus::QualityControl),
            ],
            clients: vec![Client {
                id: ClientId::new("c1"),
                name: "Dr. Moreno".to_string(),
                clinic: "Clínica Norte".to_string(),
                phone: String::new(),
                email: String::new(),
            }],
            products: vec![Product {
                id: ProductId::new("p1"),
                name: "Corona".to_string(),
                material: "Zirconia".to_string(),
                price: "100".parse().expect("decimal"),
            }],
            ..AppState::default()
        };

        let stats = DashboardStats::from_state(&state);
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.active_clients, 1);
        assert_eq!(stats.total_products, 1);
    }

    #[test]
    fn test_recent_orders_descending_and_capped() {
        let orders: Vec<WorkOrder> = (1..=7)
            .map(|day| {
                order(
                    &format!("o{day}"),
                    &format!("2024-03-{day:02}"),
                    OrderStatus::Received,
                )
            })
            .collect();

        let recent = recent_orders(&orders);
        assert_eq!(recent.len(), RECENT_ORDER_COUNT);
        assert_eq!(recent.first().map(|o| o.id.as_str()), Some("o7"));
        assert_eq!(recent.last().map(|o| o.id.as_str()), Some("o3"));
    }

    #[test]
    fn test_order_list_sorts_ascending_by_due_date() {
        let orders = vec![
            order("late", "2024-05-01", OrderStatus::Received),
            order("soon", "2024-03-01", OrderStatus::Received),
        ];

        let sorted = by_due_date(&orders);
        assert_eq!(sorted.first().map(|o| o.id.as_str()), Some("soon"));
    }
}
