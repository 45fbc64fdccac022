use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use truenorth_core::{Cart, CartError, CartEvent, CartItem, CartSummary};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct CartView {
    cart_id: Uuid,
    items: Vec<CartItem>,
    item_count: u64,
    subtotal: Decimal,
}

impl CartView {
    fn new(cart_id: Uuid, cart: &Cart) -> Self {
        Self {
            cart_id,
            items: cart.items().to_vec(),
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
        }
    }
}

/// A cart after a mutation, with the notice the storefront would toast.
#[derive(Debug, Serialize)]
pub(super) struct CartMutation {
    event: CartEvent,
    message: String,
    cart: CartView,
}

#[derive(Debug, Deserialize)]
pub(super) struct AddItemRequest {
    pub product_id: String,
    pub variant_id: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub(super) struct UpdateItemRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub(super) struct SummaryQuery {
    pub discount: Option<Decimal>,
}

fn cart_not_found(request_id: String, cart_id: Uuid) -> ApiError {
    ApiError::new(request_id, "not_found", format!("cart {cart_id} not found"))
}

fn map_cart_error(request_id: String, error: &CartError) -> ApiError {
    match error {
        CartError::InvalidQuantity | CartError::UnknownVariant { .. } => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
        CartError::ItemNotFound(_) => ApiError::new(request_id, "not_found", error.to_string()),
        CartError::Io { .. } | CartError::Snapshot(_) => {
            tracing::error!(error = %error, "cart storage failed");
            ApiError::new(request_id, "internal_error", "cart storage failed")
        }
    }
}

/// Apply `mutate` to the cart and build the mutation response, logging the event.
async fn mutate_cart(
    state: &AppState,
    req_id: String,
    cart_id: Uuid,
    mutate: impl FnOnce(&mut Cart) -> Result<CartEvent, CartError>,
) -> Result<Json<ApiResponse<CartMutation>>, ApiError> {
    let outcome = state
        .carts
        .update(cart_id, |cart| {
            mutate(cart).map(|event| (event, CartView::new(cart_id, cart)))
        })
        .await
        .ok_or_else(|| cart_not_found(req_id.clone(), cart_id))?;
    let (event, cart) = outcome.map_err(|e| map_cart_error(req_id.clone(), &e))?;

    event.log();
    Ok(Json(ApiResponse::new(
        CartMutation {
            message: event.message(),
            event,
            cart,
        },
        req_id,
    )))
}

pub(super) async fn create_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<CartView>>) {
    let cart_id = state.carts.create().await;
    tracing::info!(cart_id = %cart_id, "cart created");
    (
        StatusCode::CREATED,
        Json(ApiResponse::new(
            CartView::new(cart_id, &Cart::new()),
            req_id.0,
        )),
    )
}

pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartView>>, ApiError> {
    let cart = state
        .carts
        .get(cart_id)
        .await
        .ok_or_else(|| cart_not_found(req_id.0.clone(), cart_id))?;
    Ok(Json(ApiResponse::new(CartView::new(cart_id, &cart), req_id.0)))
}

pub(super) async fn clear_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CartMutation>>, ApiError> {
    mutate_cart(&state, req_id.0, cart_id, |cart| Ok(cart.clear())).await
}

/// Drop the cart entirely; later requests for this id return 404.
pub(super) async fn delete_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(cart_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !state.carts.remove(cart_id).await {
        return Err(cart_not_found(req_id.0, cart_id));
    }
    tracing::info!(cart_id = %cart_id, "cart deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn add_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(cart_id): Path<Uuid>,
    Json(body): Json<AddItemRequest>,
) -> Result<Json<ApiResponse<CartMutation>>, ApiError> {
    let product = state
        .catalog
        .product_by_id(&body.product_id)
        .filter(|p| p.is_active)
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product '{}' not found", body.product_id),
            )
        })?;

    let variant = match body.variant_id.as_deref() {
        Some(variant_id) => Some(product.variant(variant_id).ok_or_else(|| {
            map_cart_error(
                req_id.0.clone(),
                &CartError::UnknownVariant {
                    product_id: product.id.clone(),
                    variant_id: variant_id.to_string(),
                },
            )
        })?),
        None => None,
    };

    mutate_cart(&state, req_id.0, cart_id, |cart| {
        cart.add_item(product, variant, body.quantity)
    })
    .await
}

pub(super) async fn update_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((cart_id, item_id)): Path<(Uuid, String)>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<CartMutation>>, ApiError> {
    mutate_cart(&state, req_id.0, cart_id, |cart| {
        cart.update_quantity(&item_id, body.quantity)
    })
    .await
}

pub(super) async fn remove_item(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path((cart_id, item_id)): Path<(Uuid, String)>,
) -> Result<Json<ApiResponse<CartMutation>>, ApiError> {
    mutate_cart(&state, req_id.0, cart_id, |cart| cart.remove_item(&item_id)).await
}

pub(super) async fn cart_summary(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(cart_id): Path<Uuid>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResponse<CartSummary>>, ApiError> {
    let discount = query.discount.unwrap_or(Decimal::ZERO);
    if discount < Decimal::ZERO {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "discount must not be negative",
        ));
    }

    let cart = state
        .carts
        .get(cart_id)
        .await
        .ok_or_else(|| cart_not_found(req_id.0.clone(), cart_id))?;
    let summary = CartSummary::compute(&cart, &state.checkout, discount);
    Ok(Json(ApiResponse::new(summary, req_id.0)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::Router;
    use rust_decimal::Decimal;
    use serde_json::json;

    use crate::api::test_support::{send, test_app};

    fn decimal(value: &serde_json::Value) -> Decimal {
        value
            .as_str()
            .expect("decimal serialized as string")
            .parse()
            .expect("decimal parse")
    }

    async fn new_cart(app: &Router) -> String {
        let (status, json) = send(app, "POST", "/api/v1/carts", None).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"]["cart_id"]
            .as_str()
            .expect("cart id")
            .to_string()
    }

    #[tokio::test]
    async fn create_cart_returns_empty_cart() {
        let app = test_app();
        let cart_id = new_cart(&app).await;

        let (status, json) = send(&app, "GET", &format!("/api/v1/carts/{cart_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["item_count"], 0);
        assert_eq!(json["data"]["items"].as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn add_item_merges_same_variant() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        let uri = format!("/api/v1/carts/{cart_id}/items");

        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(json!({ "product_id": "3", "variant_id": "3a" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["event"]["kind"], "added");
        assert_eq!(json["data"]["message"], "Added Tecno Camon 30 Pro to cart");

        let (_, json) = send(
            &app,
            "POST",
            &uri,
            Some(json!({ "product_id": "3", "variant_id": "3a", "quantity": 2 })),
        )
        .await;
        assert_eq!(json["data"]["event"]["kind"], "quantity_updated");
        assert_eq!(json["data"]["cart"]["items"][0]["id"], "3-3a");
        assert_eq!(json["data"]["cart"]["items"][0]["quantity"], 3);
        assert_eq!(decimal(&json["data"]["cart"]["subtotal"]), Decimal::from(855_000));
    }

    #[tokio::test]
    async fn add_item_rejects_unknown_variant_and_zero_quantity() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        let uri = format!("/api/v1/carts/{cart_id}/items");

        let (status, json) = send(
            &app,
            "POST",
            &uri,
            Some(json!({ "product_id": "3", "variant_id": "9z" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");

        let (status, _) = send(
            &app,
            "POST",
            &uri,
            Some(json!({ "product_id": "4", "quantity": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn add_item_unknown_product_is_not_found() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        let (status, _) = send(
            &app,
            "POST",
            &format!("/api/v1/carts/{cart_id}/items"),
            Some(json!({ "product_id": "999" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_cart_is_not_found() {
        let app = test_app();
        let (status, json) = send(
            &app,
            "GET",
            "/api/v1/carts/00000000-0000-0000-0000-000000000000",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn update_to_zero_removes_item() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        send(
            &app,
            "POST",
            &format!("/api/v1/carts/{cart_id}/items"),
            Some(json!({ "product_id": "4" })),
        )
        .await;

        let (status, json) = send(
            &app,
            "PATCH",
            &format!("/api/v1/carts/{cart_id}/items/4-default"),
            Some(json!({ "quantity": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["event"]["kind"], "removed");
        assert_eq!(json["data"]["cart"]["item_count"], 0);
    }

    #[tokio::test]
    async fn remove_missing_item_is_not_found() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        let (status, _) = send(
            &app,
            "DELETE",
            &format!("/api/v1/carts/{cart_id}/items/4-default"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn clear_cart_empties_items() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        send(
            &app,
            "POST",
            &format!("/api/v1/carts/{cart_id}/items"),
            Some(json!({ "product_id": "1", "variant_id": "1b" })),
        )
        .await;

        let (status, json) = send(
            &app,
            "DELETE",
            &format!("/api/v1/carts/{cart_id}/items"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["message"], "Cart cleared");
        assert_eq!(json["data"]["cart"]["item_count"], 0);

        let (status, _) = send(&app, "GET", &format!("/api/v1/carts/{cart_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_cart_drops_it() {
        let app = test_app();
        let cart_id = new_cart(&app).await;

        let (status, json) = send(&app, "DELETE", &format!("/api/v1/carts/{cart_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(json.is_null());

        let (status, json) = send(&app, "GET", &format!("/api/v1/carts/{cart_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");

        let (status, _) = send(&app, "DELETE", &format!("/api/v1/carts/{cart_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn summary_prices_small_order() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        send(
            &app,
            "POST",
            &format!("/api/v1/carts/{cart_id}/items"),
            Some(json!({ "product_id": "5", "variant_id": "5a" })),
        )
        .await;

        let (status, json) = send(
            &app,
            "GET",
            &format!("/api/v1/carts/{cart_id}/summary"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let data = &json["data"];
        assert_eq!(decimal(&data["subtotal"]), Decimal::from(45_000));
        assert_eq!(decimal(&data["shipping"]), Decimal::from(5000));
        assert_eq!(decimal(&data["vat"]), Decimal::from(3375));
        assert_eq!(decimal(&data["total"]), Decimal::from(53_375));
        assert_eq!(decimal(&data["free_shipping_remaining"]), Decimal::from(5000));
    }

    #[tokio::test]
    async fn summary_applies_discount_and_rejects_negative() {
        let app = test_app();
        let cart_id = new_cart(&app).await;
        send(
            &app,
            "POST",
            &format!("/api/v1/carts/{cart_id}/items"),
            Some(json!({ "product_id": "4" })),
        )
        .await;

        let (_, json) = send(
            &app,
            "GET",
            &format!("/api/v1/carts/{cart_id}/summary?discount=10000"),
            None,
        )
        .await;
        // 385,000 + 0 shipping + 28,875 VAT - 10,000
        assert_eq!(decimal(&json["data"]["total"]), Decimal::from(403_875));
        assert_eq!(json["data"]["free_shipping"], true);

        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/v1/carts/{cart_id}/summary?discount=-5"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
