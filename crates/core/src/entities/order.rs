//! Work orders: the jobs the laboratory produces for its clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ClientId, OrderId, OrderStatus, ProductId};

/// A (product, quantity) line item within a work order.
///
/// The product reference is not enforced: the referenced product may have
/// been deleted from the catalog. Calculations treat a dangling reference as
/// a zero-price contribution, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A work order for a patient, commissioned by a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: OrderId,
    pub patient_name: String,
    pub client_id: ClientId,
    pub items: Vec<OrderItem>,
    pub due_date: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Create payload for a work order; the server assigns the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkOrder {
    pub patient_name: String,
    pub client_id: ClientId,
    pub items: Vec<OrderItem>,
    pub due_date: DateTime<Utc>,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// An order draft left without any usable line item after normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("an order must contain at least one line item with a product selected")]
pub struct EmptyOrderError;

/// Drop line items whose product field was left unselected.
///
/// Order edit forms always hold at least one line item row, which may still
/// have an empty product reference on submit. Returns [`EmptyOrderError`]
/// when nothing usable remains; callers must reject the draft before any
/// network call.
fn normalize_items(items: Vec<OrderItem>) -> Result<Vec<OrderItem>, EmptyOrderError> {
    let items: Vec<OrderItem> = items
        .into_iter()
        .filter(|item| !item.product_id.is_empty())
        .collect();
    if items.is_empty() {
        return Err(EmptyOrderError);
    }
    Ok(items)
}

impl NewWorkOrder {
    /// Normalize the draft for submission.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyOrderError`] if every line item has an empty product
    /// reference.
    pub fn normalized(mut self) -> Result<Self, EmptyOrderError> {
        self.items = normalize_items(self.items)?;
        Ok(self)
    }
}

impl WorkOrder {
    /// Normalize an edited order for submission.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyOrderError`] if every line item has an empty product
    /// reference.
    pub fn normalized(mut self) -> Result<Self, EmptyOrderError> {
        self.items = normalize_items(self.items)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(items: Vec<OrderItem>) -> NewWorkOrder {
        NewWorkOrder {
            patient_name: "Ana Suárez".to_string(),
            client_id: ClientId::new("c1"),
            items,
            due_date: "2024-03-15T00:00:00Z".parse().expect("date"),
            status: OrderStatus::Received,
            notes: None,
        }
    }

    #[test]
    fn test_normalized_strips_unselected_items() {
        let order = draft(vec![
            OrderItem {
                product_id: ProductId::new(""),
                quantity: 1,
            },
            OrderItem {
                product_id: ProductId::new("p1"),
                quantity: 2,
            },
        ])
        .normalized()
        .expect("one usable item remains");

        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items.first().map(|i| i.quantity), Some(2));
    }

    #[test]
    fn test_normalized_rejects_all_empty_items() {
        let result = draft(vec![OrderItem {
            product_id: ProductId::new(""),
            quantity: 1,
        }])
        .normalized();

        assert_eq!(result, Err(EmptyOrderError));
    }

    #[test]
    fn test_wire_names_and_optional_notes() {
        let order = WorkOrder {
            id: OrderId::new("o1"),
            patient_name: "Ana Suárez".to_string(),
            client_id: ClientId::new("c1"),
            items: vec![OrderItem {
                product_id: ProductId::new("p1"),
                quantity: 2,
            }],
            due_date: "2024-03-15T00:00:00Z".parse().expect("date"),
            status: OrderStatus::Delivered,
            notes: None,
        };
        let json = serde_json::to_value(&order).expect("serialize");
        assert!(json.get("patientName").is_some());
        assert!(json.get("clientId").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("notes").is_none());
        assert_eq!(json["status"], "Entregado");
    }

    #[test]
    fn test_deserializes_backend_document() {
        let json = r#"{
            "id": "o1",
            "patientName": "Ana Suárez",
            "clientId": "c1",
            "items": [{"productId": "p1", "quantity": 2}],
            "dueDate": "2024-03-15T00:00:00.000Z",
            "status": "En Proceso"
        }"#;
        let order: WorkOrder = serde_json::from_str(json).expect("deserialize");
        assert_eq!(order.status, OrderStatus::InProcess);
        assert_eq!(order.notes, None);
    }
}
