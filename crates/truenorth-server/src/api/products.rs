use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use truenorth_core::{
    Brand, Category, Facets, HomePage, Product, ProductQuery, ShopParams, SortOrder,
};

use crate::middleware::RequestId;

use super::{normalize_limit, ApiError, ApiResponse, AppState};

/// Card-sized view of a product for listings.
#[derive(Debug, Serialize)]
pub(super) struct ProductItem {
    id: String,
    name: String,
    slug: String,
    brand: String,
    category: String,
    short_description: String,
    price: Decimal,
    sale_price: Option<Decimal>,
    effective_price: Decimal,
    is_on_sale: bool,
    discount_percentage: u32,
    in_stock: bool,
    is_featured: bool,
    primary_image: Option<String>,
}

impl From<&Product> for ProductItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            short_description: product.short_description.clone(),
            price: product.price,
            sale_price: product.sale_price,
            effective_price: product.effective_price(),
            is_on_sale: product.is_on_sale(),
            discount_percentage: product.discount_percentage(),
            in_stock: product.in_stock(),
            is_featured: product.is_featured,
            primary_image: product.primary_image().map(ToOwned::to_owned),
        }
    }
}

/// Full product record plus the derived pricing the product page shows.
#[derive(Debug, Serialize)]
pub(super) struct ProductDetail {
    #[serde(flatten)]
    product: Product,
    effective_price: Decimal,
    is_on_sale: bool,
    discount_percentage: u32,
    in_stock: bool,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        Self {
            effective_price: product.effective_price(),
            is_on_sale: product.is_on_sale(),
            discount_percentage: product.discount_percentage(),
            in_stock: product.in_stock(),
            product: product.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ProductList {
    items: Vec<ProductItem>,
    total: usize,
    limit: i64,
    offset: i64,
    sort: SortOrder,
    facets: Facets,
}

#[derive(Debug, Serialize)]
pub(super) struct HomeData {
    featured: Vec<ProductItem>,
    new_arrivals: Vec<ProductItem>,
    best_sellers: Vec<ProductItem>,
    categories: Vec<Category>,
    brands: Vec<Brand>,
}

impl From<HomePage<'_>> for HomeData {
    fn from(home: HomePage<'_>) -> Self {
        let cards = |products: Vec<&Product>| products.into_iter().map(ProductItem::from).collect();
        Self {
            featured: cards(home.featured),
            new_arrivals: cards(home.new_arrivals),
            best_sellers: cards(home.best_sellers),
            categories: home.categories.into_iter().cloned().collect(),
            brands: home.brands.into_iter().cloned().collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<ShopParams>,
    Query(page): Query<PageQuery>,
) -> Result<Json<ApiResponse<ProductList>>, ApiError> {
    let query = ProductQuery::from_params(&params);
    if query.min_price > query.max_price {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "min_price must not exceed max_price",
        ));
    }

    let limit = normalize_limit(page.limit);
    let offset = page.offset.unwrap_or(0).max(0);

    let results = query.run(state.catalog.products());
    let facets = Facets::for_catalog(&state.catalog);
    let total = results.len();
    let items = results
        .into_iter()
        .skip(usize::try_from(offset).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(0))
        .map(ProductItem::from)
        .collect();

    tracing::debug!(total, sort = %query.sort, "product search");

    Ok(Json(ApiResponse::new(
        ProductList {
            items,
            total,
            limit,
            offset,
            sort: query.sort,
            facets,
        },
        req_id.0,
    )))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductDetail>>, ApiError> {
    let product = state
        .catalog
        .product_by_slug(&slug)
        .filter(|p| p.is_active)
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product '{slug}' not found"),
            )
        })?;

    Ok(Json(ApiResponse::new(ProductDetail::from(product), req_id.0)))
}

pub(super) async fn list_brands(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Brand>>> {
    let brands = state.catalog.active_brands().into_iter().cloned().collect();
    Json(ApiResponse::new(brands, req_id.0))
}

pub(super) async fn list_categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Category>>> {
    let categories = state
        .catalog
        .active_categories()
        .into_iter()
        .cloned()
        .collect();
    Json(ApiResponse::new(categories, req_id.0))
}

pub(super) async fn home(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<HomeData>> {
    let home = HomeData::from(HomePage::build(&state.catalog));
    Json(ApiResponse::new(home, req_id.0))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::api::test_support::{send, test_app};

    fn slugs(json: &serde_json::Value) -> Vec<String> {
        json.as_array()
            .expect("array")
            .iter()
            .map(|p| p["slug"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn list_products_returns_catalog_order_by_default() {
        let app = test_app();
        let (status, json) = send(&app, "GET", "/api/v1/products", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 6);
        assert_eq!(json["data"]["limit"], 50);
        assert_eq!(json["data"]["sort"], "relevance");
        assert_eq!(
            json["data"]["items"][0]["slug"].as_str(),
            Some("iphone-15-pro-max")
        );
    }

    #[tokio::test]
    async fn list_products_filters_and_sorts() {
        let app = test_app();
        let (status, json) = send(
            &app,
            "GET",
            "/api/v1/products?category=Audio,Power&sort=price-low",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 3);
        let items = slugs(&json["data"]["items"]);
        assert_eq!(items[0], "anker-powercore-20000mah");
        assert_eq!(items[2], "airpods-pro-3rd-generation");
    }

    #[tokio::test]
    async fn facets_keep_every_brand_after_brand_filter() {
        let app = test_app();
        let (status, json) = send(&app, "GET", "/api/v1/products?brand=Apple", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 2);
        let facets = &json["data"]["facets"];
        let brands = facets["brands"].as_array().expect("brand facets");
        assert_eq!(brands.len(), 7);
        assert_eq!(brands[1]["name"], "Samsung");
        assert_eq!(brands[1]["count"], 2);
        assert_eq!(brands[3]["count"], 0);
        assert_eq!(facets["categories"].as_array().map(Vec::len), Some(5));
        assert_eq!(facets["in_stock"], 6);
    }

    #[tokio::test]
    async fn list_products_accepts_camel_case_price_params() {
        let app = test_app();
        let (status, json) = send(
            &app,
            "GET",
            "/api/v1/products?minPrice=245000&maxPrice=385000&inStock=true",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["total"], 3);
    }

    #[tokio::test]
    async fn list_products_text_search_matches_brand() {
        let app = test_app();
        let (_, json) = send(&app, "GET", "/api/v1/products?q=samsung", None).await;
        assert_eq!(json["data"]["total"], 2);
    }

    #[tokio::test]
    async fn list_products_applies_limit_and_offset_after_total() {
        let app = test_app();
        let (_, json) = send(&app, "GET", "/api/v1/products?limit=2&offset=1", None).await;

        assert_eq!(json["data"]["total"], 6);
        assert_eq!(json["data"]["offset"], 1);
        let items = slugs(&json["data"]["items"]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0], "samsung-galaxy-s24-ultra");
    }

    #[tokio::test]
    async fn list_products_rejects_inverted_price_range() {
        let app = test_app();
        let (status, json) = send(
            &app,
            "GET",
            "/api/v1/products?min_price=500000&max_price=1000",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[tokio::test]
    async fn get_product_includes_variants_and_pricing() {
        let app = test_app();
        let (status, json) = send(&app, "GET", "/api/v1/products/tecno-camon-30-pro", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Tecno Camon 30 Pro");
        assert_eq!(json["data"]["in_stock"], true);
        assert_eq!(json["data"]["variants"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn get_product_unknown_slug_is_not_found() {
        let app = test_app();
        let (status, json) = send(&app, "GET", "/api/v1/products/nokia-3310", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn brands_and_categories_are_listed() {
        let app = test_app();
        let (_, brands) = send(&app, "GET", "/api/v1/brands", None).await;
        let (_, categories) = send(&app, "GET", "/api/v1/categories", None).await;

        assert_eq!(brands["data"].as_array().map(Vec::len), Some(7));
        assert_eq!(brands["data"][0]["name"], "Apple");
        assert_eq!(categories["data"].as_array().map(Vec::len), Some(7));
    }

    #[tokio::test]
    async fn home_sections_are_populated() {
        let app = test_app();
        let (status, json) = send(&app, "GET", "/api/v1/home", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["featured"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["data"]["new_arrivals"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["data"]["best_sellers"].as_array().map(Vec::len), Some(4));
        assert_eq!(json["data"]["categories"].as_array().map(Vec::len), Some(5));
    }
}
