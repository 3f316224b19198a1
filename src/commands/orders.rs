use anyhow::{Context, Result};
use chrono::Utc;
use comfy_table::CellAlignment;
use console::style;

use crate::models::{order_status_label, OrderPriority};
use crate::services::api::ApiClient;

pub async fn run(client: &ApiClient) -> Result<()> {
    let orders = client
        .list_fulfillable_orders()
        .await
        .context("list fulfillable orders")?;

    if orders.is_empty() {
        println!("No orders require fulfillment");
        return Ok(());
    }

    let today = Utc::now().date_naive();
    let mut table = comfy_table::Table::new();
    table
        .load_preset(comfy_table::presets::ASCII_FULL_CONDENSED)
        .set_header(["Reference", "Customer", "Items", "Status", "Target Date", "Priority"]);

    for order in &orders {
        let priority = match order.priority(today) {
            OrderPriority::Overdue => style("Overdue").red().to_string(),
            OrderPriority::Urgent => style("Urgent").yellow().to_string(),
            OrderPriority::Normal => style("Normal").blue().to_string(),
        };
        table.add_row([
            order.reference.clone(),
            order.customer_name().to_string(),
            format!("{}/{}", order.shipped_lines, order.line_items),
            order_status_label(order.status).to_string(),
            order
                .target_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            priority,
        ]);
    }

    if let Some(column) = table.column_mut(2) {
        column.set_cell_alignment(CellAlignment::Right);
    }

    println!("{table}");
    Ok(())
}
