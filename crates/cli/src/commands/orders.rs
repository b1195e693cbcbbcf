//! Work order commands.

use chrono::{NaiveDate, TimeZone, Utc};
use clap::Subcommand;

use labflow_client::Store;
use labflow_core::finance::{ProductIndex, order_total};
use labflow_core::{NewWorkOrder, OrderId, OrderItem, OrderStatus, ProductId, WorkOrder, dashboard};

use super::{CommandError, ensure_session};

#[derive(Subcommand)]
pub enum OrderAction {
    /// List work orders ascending by due date
    List,
    /// Create a work order (admin role)
    Add {
        /// Patient name
        #[arg(long)]
        patient: String,
        /// Commissioning client identifier
        #[arg(long)]
        client: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// Line item as `<product-id>:<quantity>`; repeatable
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        /// Initial status (default: Recibido)
        #[arg(long)]
        status: Option<OrderStatus>,
        /// Free-text notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move an order along the pipeline (any role)
    SetStatus {
        /// Order identifier
        id: String,
        /// New status (e.g. "En Proceso", delivered, quality-control)
        status: OrderStatus,
    },
    /// Delete a work order (admin role)
    Rm {
        /// Order identifier
        id: String,
    },
}

pub async fn run(store: &mut Store, action: OrderAction) -> Result<(), CommandError> {
    ensure_session(store)?;
    match action {
        OrderAction::List => list(store),
        OrderAction::Add {
            patient,
            client,
            due,
            items,
            status,
            notes,
        } => {
            let items = items
                .iter()
                .map(|spec| parse_item(spec))
                .collect::<Result<Vec<_>, _>>()?;
            let created = store
                .add_order(NewWorkOrder {
                    patient_name: patient,
                    client_id: client.as_str().into(),
                    items,
                    due_date: parse_due_date(&due)?,
                    status: status.unwrap_or_default(),
                    notes,
                })
                .await?;
            println!("created order {}", created.id);
        }
        OrderAction::SetStatus { id, status } => {
            let mut order = find(store, &id)?;
            order.status = status;
            let updated = store.update_order(order).await?;
            println!("order {} is now: {}", updated.id, updated.status);
        }
        OrderAction::Rm { id } => {
            store.delete_order(OrderId::new(id.as_str())).await?;
            println!("deleted order {id}");
        }
    }
    Ok(())
}

fn list(store: &Store) {
    let state = store.state();
    let index = ProductIndex::new(&state.products);

    for order in dashboard::by_due_date(&state.orders) {
        let client_name = state
            .clients
            .iter()
            .find(|c| c.id == order.client_id)
            .map_or("N/A", |c| c.name.as_str());
        let items: Vec<String> = order
            .items
            .iter()
            .map(|item| format!("{} (x{})", index.name_of(&item.product_id), item.quantity))
            .collect();
        println!(
            "{}  {}  {}  {}  ${}  {}  [{}]",
            order.id,
            order.due_date.format("%Y-%m-%d"),
            order.patient_name,
            client_name,
            order_total(order, &index).round_dp(2),
            order.status,
            items.join(", ")
        );
    }
}

/// Parse a `<product-id>:<quantity>` line item specification.
fn parse_item(spec: &str) -> Result<OrderItem, CommandError> {
    let (product_id, quantity) = spec
        .rsplit_once(':')
        .ok_or_else(|| format!("invalid item {spec:?}, expected <product-id>:<quantity>"))?;
    let quantity: u32 = quantity
        .parse()
        .map_err(|_| format!("invalid quantity in item {spec:?}"))?;
    if quantity == 0 {
        return Err(format!("quantity must be positive in item {spec:?}").into());
    }
    Ok(OrderItem {
        product_id: ProductId::new(product_id),
        quantity,
    })
}

/// A bare date becomes midnight UTC, matching the order form's submission.
fn parse_due_date(raw: &str) -> Result<chrono::DateTime<Utc>, CommandError> {
    let date: NaiveDate = raw
        .parse()
        .map_err(|_| format!("invalid due date {raw:?}, expected YYYY-MM-DD"))?;
    Ok(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).ok_or("invalid due date")?))
}

fn find(store: &Store, id: &str) -> Result<WorkOrder, CommandError> {
    store
        .state()
        .orders
        .iter()
        .find(|o| o.id.as_str() == id)
        .cloned()
        .ok_or_else(|| format!("no order with id {id}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item() {
        let item = parse_item("665f:3").expect("valid spec");
        assert_eq!(item.product_id.as_str(), "665f");
        assert_eq!(item.quantity, 3);

        assert!(parse_item("no-colon").is_err());
        assert!(parse_item("p1:zero").is_err());
        assert!(parse_item("p1:0").is_err());
    }

    #[test]
    fn test_parse_due_date_midnight_utc() {
        let due = parse_due_date("2024-03-15").expect("valid date");
        assert_eq!(due.to_rfc3339(), "2024-03-15T00:00:00+00:00");
        assert!(parse_due_date("15/03/2024").is_err());
    }
}
