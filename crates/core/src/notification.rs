//! Delivery-notice email composition.
//!
//! When an order reaches "ready for delivery" the operator can notify the
//! commissioning client. Composition is pure: this module renders the
//! subject and body; actually sending mail is an outer concern.

use rust_decimal::Decimal;

use crate::entities::{Client, WorkOrder};
use crate::finance::{ProductIndex, order_total};

/// Short order reference shown to clients (last six characters of the id).
const REFERENCE_LENGTH: usize = 6;

/// A rendered delivery notice, ready for an email preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryNotice {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Render the ready-for-delivery notice for an order.
#[must_use]
pub fn delivery_notice(
    order: &WorkOrder,
    client: &Client,
    index: &ProductIndex<'_>,
) -> DeliveryNotice {
    let reference = short_reference(order.id.as_str());
    let subject = format!(
        "Orden de Trabajo #{reference} lista para entrega - Paciente: {}",
        order.patient_name
    );

    let mut body = String::new();
    body.push_str(&format!("Estimado/a Dr./Dra. {},\n\n", client.name));
    body.push_str(&format!(
        "Le informamos que la orden de trabajo para su paciente {} ha sido \
         completada y está lista para ser retirada de nuestro laboratorio.\n\n",
        order.patient_name
    ));

    body.push_str("Resumen de la Orden:\n");
    for item in &order.items {
        body.push_str(&format!(
            "  - {} (x{})\n",
            index.name_of(&item.product_id),
            item.quantity
        ));
    }

    let total: Decimal = order_total(order, index).round_dp(2);
    body.push_str(&format!("\nMonto Total: ${total}\n"));

    if let Some(notes) = order.notes.as_deref().filter(|n| !n.is_empty()) {
        body.push_str(&format!("\nNotas Adicionales:\n  {notes}\n"));
    }

    body.push_str(
        "\nPuede pasar a retirarla en nuestro horario habitual. Si tiene \
         alguna consulta, no dude en contactarnos.\n\nGracias por confiar en \
         nuestro laboratorio.\n",
    );

    DeliveryNotice {
        recipient: client.email.clone(),
        subject,
        body,
    }
}

/// The last characters of an identifier, for human-friendly references.
fn short_reference(id: &str) -> &str {
    let chars = id.chars().count();
    if chars <= REFERENCE_LENGTH {
        return id;
    }
    let (cut, _) = id
        .char_indices()
        .nth(chars - REFERENCE_LENGTH)
        .unwrap_or((0, ' '));
    id.get(cut..).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{OrderItem, Product};
    use crate::types::{ClientId, OrderId, OrderStatus, ProductId};

    fn fixtures() -> (WorkOrder, Client, Vec<Product>) {
        let order = WorkOrder {
            id: OrderId::new("665f1a2b3c4d"),
            patient_name: "Ana Suárez".to_string(),
            client_id: ClientId::new("c1"),
            items: vec![
                OrderItem {
                    product_id: ProductId::new("p1"),
                    quantity: 2,
                },
                OrderItem {
                    product_id: ProductId::new("ghost"),
                    quantity: 1,
                },
            ],
            due_date: "2024-03-15T00:00:00Z".parse().expect("date"),
            status: OrderStatus::ReadyForDelivery,
            notes: Some("Color A2".to_string()),
        };
        let client = Client {
            id: ClientId::new("c1"),
            name: "Moreno".to_string(),
            clinic: "Clínica Norte".to_string(),
            phone: String::new(),
            email: "moreno@clinicanorte.example".to_string(),
        };
        let catalog = vec![Product {
            id: ProductId::new("p1"),
            name: "Corona".to_string(),
            material: "Zirconia".to_string(),
            price: "150.00".parse().expect("decimal"),
        }];
        (order, client, catalog)
    }

    #[test]
    fn test_notice_subject_uses_short_reference() {
        let (order, client, catalog) = fixtures();
        let notice = delivery_notice(&order, &client, &ProductIndex::new(&catalog));
        assert_eq!(
            notice.subject,
            "Orden de Trabajo #2b3c4d lista para entrega - Paciente: Ana Suárez"
        );
        assert_eq!(notice.recipient, "moreno@clinicanorte.example");
    }

    #[test]
    fn test_notice_body_lists_items_total_and_notes() {
        let (order, client, catalog) = fixtures();
        let notice = delivery_notice(&order, &client, &ProductIndex::new(&catalog));

        assert!(notice.body.contains("Corona (x2)"));
        assert!(notice.body.contains("N/A (x1)"));
        assert!(notice.body.contains("Monto Total: $300.00"));
        assert!(notice.body.contains("Color A2"));
    }

    #[test]
    fn test_short_reference_keeps_short_ids_whole() {
        assert_eq!(short_reference("abc"), "abc");
        assert_eq!(short_reference("665f1a2b3c4d"), "2b3c4d");
    }
}
