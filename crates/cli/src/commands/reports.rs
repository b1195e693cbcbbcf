//! Read-only views: dashboard, financials, delivery notice.

use chrono::NaiveDate;

use labflow_client::Store;
use labflow_core::dashboard::{DashboardStats, recent_orders};
use labflow_core::finance::{OrderFilter, ProductIndex, monthly_revenue, summarize};
use labflow_core::notification::delivery_notice;

use super::{CommandError, ensure_session};

/// Print the dashboard counters and recent orders.
pub fn dashboard(store: &Store) -> Result<(), CommandError> {
    ensure_session(store)?;
    let state = store.state();
    let stats = DashboardStats::from_state(state);

    println!("pending orders:  {}", stats.pending_orders);
    println!("active clients:  {}", stats.active_clients);
    println!("total products:  {}", stats.total_products);

    println!("\nrecent orders:");
    for order in recent_orders(&state.orders) {
        let client_name = state
            .clients
            .iter()
            .find(|c| c.id == order.client_id)
            .map_or("N/A", |c| c.name.as_str());
        println!(
            "  {}  {}  {}  {}",
            order.due_date.format("%Y-%m-%d"),
            order.patient_name,
            client_name,
            order.status
        );
    }
    Ok(())
}

/// Print financial KPIs and the monthly realized-revenue series.
pub fn financials(
    store: &Store,
    from: Option<&str>,
    to: Option<&str>,
    client: Option<&str>,
    product: Option<&str>,
) -> Result<(), CommandError> {
    ensure_session(store)?;
    let state = store.state();

    let filter = OrderFilter {
        start_date: from.map(parse_date).transpose()?,
        end_date: to.map(parse_date).transpose()?,
        client_id: client.map(Into::into),
        product_id: product.map(Into::into),
    };

    let filtered = filter.apply(&state.orders);
    let index = ProductIndex::new(&state.products);

    let summary = summarize(filtered.iter().copied(), &index);
    println!("realized revenue:   ${}", summary.realized_revenue.round_dp(2));
    println!("projected revenue:  ${}", summary.projected_revenue.round_dp(2));
    println!("completed orders:   {}", summary.completed_orders);
    println!("pending orders:     {}", summary.pending_orders);

    println!("\nrealized revenue by month:");
    for bucket in monthly_revenue(filtered.iter().copied(), &index) {
        println!("  {}  ${}", bucket.month, bucket.total.round_dp(2));
    }
    Ok(())
}

/// Print the delivery-notice email preview for an order.
pub fn notify(store: &Store, order_id: &str) -> Result<(), CommandError> {
    ensure_session(store)?;
    let state = store.state();

    let order = state
        .orders
        .iter()
        .find(|o| o.id.as_str() == order_id)
        .ok_or_else(|| format!("no order with id {order_id}"))?;
    let client = state
        .clients
        .iter()
        .find(|c| c.id == order.client_id)
        .ok_or_else(|| format!("order {order_id} references an unknown client"))?;

    let index = ProductIndex::new(&state.products);
    let notice = delivery_notice(order, client, &index);

    println!("To: {}", notice.recipient);
    println!("Subject: {}\n", notice.subject);
    println!("{}", notice.body);
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    raw.parse()
        .map_err(|_| format!("invalid date {raw:?}, expected YYYY-MM-DD").into())
}
