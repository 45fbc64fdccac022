use truenorth_core::dashboard::inventory_alerts;
use truenorth_core::{format_count, format_naira, Catalog, Dashboard};

/// Print the admin dashboard: demo sales figures plus live stock alerts.
pub(crate) fn run_dashboard(catalog: &Catalog, low_stock_threshold: u32) {
    let dashboard = Dashboard::mock();
    let totals = dashboard.totals();

    for card in &dashboard.stats {
        println!(
            "{:<18}{:>14}  {}",
            card.title,
            card.display_value(),
            card.display_change()
        );
    }

    println!();
    println!("Sales this week");
    for day in &dashboard.sales_by_day {
        println!(
            "  {:<5}{:>14}{:>6} orders",
            day.day,
            format_naira(day.sales),
            day.orders
        );
    }
    println!(
        "  total {} across {} orders (avg {}), best day {}",
        format_naira(totals.weekly_sales),
        format_count(u64::from(totals.weekly_orders)),
        format_naira(totals.average_order_value),
        totals.best_day.as_deref().unwrap_or("-")
    );

    println!();
    println!("Sales by category");
    for share in &dashboard.category_share {
        println!("  {:<14}{:>3}%", share.name, share.value);
    }

    println!();
    let header = format!(
        "{:<28}{:>6}{:>16}{:>7}",
        "TOP PRODUCT", "SOLD", "REVENUE", "STOCK"
    );
    println!("{header}");
    for product in &dashboard.top_products {
        println!(
            "{:<28}{:>6}{:>16}{:>7}",
            product.name,
            product.units_sold,
            format_naira(product.revenue),
            product.stock
        );
    }

    println!();
    let header = format!(
        "{:<14}{:<16}{:>14}  {:<12}PLACED",
        "ORDER", "CUSTOMER", "AMOUNT", "STATUS"
    );
    println!("{header}");
    for order in &dashboard.recent_orders {
        println!(
            "{:<14}{:<16}{:>14}  {:<12}{}",
            order.order_number,
            order.customer,
            format_naira(order.amount),
            order.status,
            order.placed_label()
        );
    }

    println!();
    println!("Low stock (reported)");
    for item in &dashboard.low_stock {
        println!(
            "  {:<38}{} left (threshold {})",
            item.name, item.stock, item.threshold
        );
    }

    let alerts = inventory_alerts(catalog, low_stock_threshold);
    println!();
    if alerts.is_empty() {
        println!("No catalog SKUs at or below {low_stock_threshold} units");
        return;
    }
    println!("Catalog SKUs at or below {low_stock_threshold} units");
    for alert in &alerts {
        let name = match &alert.variant_name {
            Some(variant) => format!("{} ({variant})", alert.product_name),
            None => alert.product_name.clone(),
        };
        println!("  {:<14}{:<46}{}", alert.sku, name, alert.stock);
    }
}
