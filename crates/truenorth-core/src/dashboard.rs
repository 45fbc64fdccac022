//! Admin dashboard read model.
//!
//! The sales and order figures are fixed demo data; only the inventory alerts
//! are computed from the live catalog.

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::money::{format_count, format_naira};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    Warning,
    Info,
    Success,
    Default,
}

impl OrderStatus {
    #[must_use]
    pub fn badge_tone(self) -> BadgeTone {
        match self {
            OrderStatus::Pending => BadgeTone::Warning,
            OrderStatus::Paid | OrderStatus::Processing => BadgeTone::Info,
            OrderStatus::Shipped | OrderStatus::Delivered => BadgeTone::Success,
            OrderStatus::Cancelled | OrderStatus::Refunded => BadgeTone::Default,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatFormat {
    Currency,
    Count,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatCard {
    pub title: String,
    pub value: Decimal,
    pub format: StatFormat,
    /// Day-over-day change in percent.
    pub change_pct: Decimal,
}

impl StatCard {
    #[must_use]
    pub fn display_value(&self) -> String {
        match self.format {
            StatFormat::Currency => format_naira(self.value),
            StatFormat::Count => {
                let whole = self
                    .value
                    .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                    .max(Decimal::ZERO);
                format_count(whole.to_u64().unwrap_or(0))
            }
        }
    }

    /// Signed change, e.g. `+12.5%`.
    #[must_use]
    pub fn display_change(&self) -> String {
        if self.change_pct.is_sign_negative() {
            format!("{}%", self.change_pct.normalize())
        } else {
            format!("+{}%", self.change_pct.normalize())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySales {
    pub day: String,
    pub sales: Decimal,
    pub orders: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    /// Share of sales in percent.
    pub value: u8,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopProduct {
    pub name: String,
    pub units_sold: u32,
    pub revenue: Decimal,
    pub stock: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockItem {
    pub name: String,
    pub stock: u32,
    pub threshold: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentOrder {
    pub order_number: String,
    pub customer: String,
    pub amount: Decimal,
    pub status: OrderStatus,
    pub minutes_ago: u32,
}

impl RecentOrder {
    /// Relative placement time, e.g. `5 min ago`, `1 hour ago`.
    #[must_use]
    pub fn placed_label(&self) -> String {
        let minutes = self.minutes_ago;
        match minutes {
            0 => "just now".to_string(),
            1..=59 => format!("{minutes} min ago"),
            60..=1439 => plural(minutes / 60, "hour"),
            _ => plural(minutes / 1440, "day"),
        }
    }
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// Aggregates over the 7-day sales series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub weekly_sales: Decimal,
    pub weekly_orders: u32,
    pub average_order_value: Decimal,
    pub best_day: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub stats: Vec<StatCard>,
    pub sales_by_day: Vec<DailySales>,
    pub category_share: Vec<CategoryShare>,
    pub top_products: Vec<TopProduct>,
    pub low_stock: Vec<LowStockItem>,
    pub recent_orders: Vec<RecentOrder>,
}

impl Dashboard {
    /// The demo figures shown on the admin landing page.
    #[must_use]
    pub fn mock() -> Self {
        let stat = |title: &str, value: i64, format: StatFormat, change_tenths: i64| StatCard {
            title: title.to_string(),
            value: Decimal::from(value),
            format,
            change_pct: Decimal::new(change_tenths, 1),
        };
        let day = |day: &str, sales: i64, orders: u32| DailySales {
            day: day.to_string(),
            sales: Decimal::from(sales),
            orders,
        };
        let share = |name: &str, value: u8, color: &str| CategoryShare {
            name: name.to_string(),
            value,
            color: color.to_string(),
        };
        let top = |name: &str, units_sold: u32, revenue: i64, stock: u32| TopProduct {
            name: name.to_string(),
            units_sold,
            revenue: Decimal::from(revenue),
            stock,
        };
        let low = |name: &str, stock: u32, threshold: u32| LowStockItem {
            name: name.to_string(),
            stock,
            threshold,
        };
        let order =
            |number: &str, customer: &str, amount: i64, status: OrderStatus, minutes_ago: u32| {
                RecentOrder {
                    order_number: number.to_string(),
                    customer: customer.to_string(),
                    amount: Decimal::from(amount),
                    status,
                    minutes_ago,
                }
            };

        Self {
            stats: vec![
                stat("Today's Sales", 3_240_000, StatFormat::Currency, 125),
                stat("Total Orders", 156, StatFormat::Count, 82),
                stat("Active Products", 342, StatFormat::Count, 21),
                stat("Total Customers", 1_247, StatFormat::Count, 153),
            ],
            sales_by_day: vec![
                day("Mon", 1_200_000, 24),
                day("Tue", 1_900_000, 38),
                day("Wed", 800_000, 16),
                day("Thu", 2_400_000, 48),
                day("Fri", 3_200_000, 64),
                day("Sat", 2_800_000, 56),
                day("Sun", 1_600_000, 32),
            ],
            category_share: vec![
                share("Phones", 65, "#3B82F6"),
                share("Accessories", 20, "#10B981"),
                share("Audio", 10, "#F59E0B"),
                share("Power", 5, "#EF4444"),
            ],
            top_products: vec![
                top("iPhone 15 Pro Max", 120, 222_000_000, 15),
                top("Samsung Galaxy S24 Ultra", 85, 140_250_000, 12),
                top("AirPods Pro 3rd Gen", 200, 77_000_000, 30),
                top("Tecno Camon 30 Pro", 95, 27_075_000, 25),
            ],
            low_stock: vec![
                low("iPhone 15 Pro Max Natural Titanium", 2, 5),
                low("Galaxy Buds3 Pro Silver", 1, 10),
                low("Anker PowerCore 20000mAh Black", 3, 15),
            ],
            recent_orders: vec![
                order("TN-2024-001", "John Doe", 1_850_000, OrderStatus::Processing, 5),
                order("TN-2024-002", "Jane Smith", 385_000, OrderStatus::Paid, 12),
                order("TN-2024-003", "Mike Johnson", 285_000, OrderStatus::Pending, 25),
                order("TN-2024-004", "Sarah Wilson", 45_000, OrderStatus::Shipped, 60),
            ],
        }
    }

    #[must_use]
    pub fn totals(&self) -> DashboardTotals {
        let weekly_sales: Decimal = self.sales_by_day.iter().map(|d| d.sales).sum();
        let weekly_orders: u32 = self.sales_by_day.iter().map(|d| d.orders).sum();
        let average_order_value = if weekly_orders == 0 {
            Decimal::ZERO
        } else {
            (weekly_sales / Decimal::from(weekly_orders))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };
        let best_day = self
            .sales_by_day
            .iter()
            .max_by_key(|d| d.sales)
            .map(|d| d.day.clone());

        DashboardTotals {
            weekly_sales,
            weekly_orders,
            average_order_value,
            best_day,
        }
    }
}

/// A live catalog SKU at or below the low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryAlert {
    pub product_id: String,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_name: Option<String>,
    pub sku: String,
    pub stock: u32,
    pub threshold: u32,
}

/// Scan active catalog products for low stock. Products with variants are
/// checked per variant; products without are checked on their own stock.
#[must_use]
pub fn inventory_alerts(catalog: &Catalog, threshold: u32) -> Vec<InventoryAlert> {
    let mut alerts = Vec::new();
    for product in catalog.products().iter().filter(|p| p.is_active) {
        if product.variants.is_empty() {
            if product.stock <= threshold {
                alerts.push(InventoryAlert {
                    product_id: product.id.clone(),
                    product_name: product.name.clone(),
                    variant_id: None,
                    variant_name: None,
                    sku: product.sku.clone(),
                    stock: product.stock,
                    threshold,
                });
            }
            continue;
        }
        for variant in product.variants.iter().filter(|v| v.stock <= threshold) {
            alerts.push(InventoryAlert {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                variant_id: Some(variant.id.clone()),
                variant_name: Some(variant.name.clone()),
                sku: variant.sku.clone(),
                stock: variant.stock,
                threshold,
            });
        }
    }
    alerts.sort_by_key(|a| a.stock);
    alerts
}
