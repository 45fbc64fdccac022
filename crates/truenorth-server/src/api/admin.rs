use axum::{
    extract::{Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use truenorth_core::dashboard::{
    CategoryShare, DailySales, DashboardTotals, LowStockItem, TopProduct,
};
use truenorth_core::{BadgeTone, Dashboard, InventoryAlert, OrderStatus};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct StatCardItem {
    title: String,
    value: Decimal,
    display_value: String,
    change: String,
}

#[derive(Debug, Serialize)]
pub(super) struct RecentOrderItem {
    order_number: String,
    customer: String,
    amount: Decimal,
    status: OrderStatus,
    badge_tone: BadgeTone,
    placed: String,
}

#[derive(Debug, Serialize)]
pub(super) struct DashboardData {
    stats: Vec<StatCardItem>,
    sales_by_day: Vec<DailySales>,
    category_share: Vec<CategoryShare>,
    top_products: Vec<TopProduct>,
    low_stock: Vec<LowStockItem>,
    recent_orders: Vec<RecentOrderItem>,
    totals: DashboardTotals,
}

impl From<Dashboard> for DashboardData {
    fn from(dashboard: Dashboard) -> Self {
        let totals = dashboard.totals();
        let stats = dashboard
            .stats
            .iter()
            .map(|card| StatCardItem {
                title: card.title.clone(),
                value: card.value,
                display_value: card.display_value(),
                change: card.display_change(),
            })
            .collect();
        let recent_orders = dashboard
            .recent_orders
            .iter()
            .map(|order| RecentOrderItem {
                order_number: order.order_number.clone(),
                customer: order.customer.clone(),
                amount: order.amount,
                status: order.status,
                badge_tone: order.status.badge_tone(),
                placed: order.placed_label(),
            })
            .collect();

        Self {
            stats,
            sales_by_day: dashboard.sales_by_day,
            category_share: dashboard.category_share,
            top_products: dashboard.top_products,
            low_stock: dashboard.low_stock,
            recent_orders,
            totals,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct AlertQuery {
    pub threshold: Option<u32>,
}

pub(super) async fn dashboard(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<DashboardData>> {
    Json(ApiResponse::new(
        DashboardData::from(Dashboard::mock()),
        req_id.0,
    ))
}

pub(super) async fn inventory_alerts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<AlertQuery>,
) -> Json<ApiResponse<Vec<InventoryAlert>>> {
    let threshold = query.threshold.unwrap_or(state.low_stock_threshold);
    let alerts = truenorth_core::dashboard::inventory_alerts(&state.catalog, threshold);
    if !alerts.is_empty() {
        tracing::warn!(count = alerts.len(), threshold, "low stock detected");
    }
    Json(ApiResponse::new(alerts, req_id.0))
}
