//! Storefront product search: predicate filtering followed by a single-key sort.
//!
//! Filters run in a fixed order (text, brand, category, price, stock, active)
//! and every one must pass. Sorting is stable, so ties keep catalog order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::products::Product;

/// Upper bound of the storefront price slider, in naira.
const DEFAULT_MAX_PRICE: i64 = 2_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Relevance,
    PriceLow,
    PriceHigh,
    Name,
    Newest,
    Featured,
}

impl SortOrder {
    /// Parse a sort key as used in shop URLs. Unknown keys fall back to
    /// [`SortOrder::Relevance`].
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "name" => Self::Name,
            "newest" => Self::Newest,
            "featured" => Self::Featured,
            _ => Self::Relevance,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Name => "name",
            Self::Newest => "newest",
            Self::Featured => "featured",
        }
    }

    fn sort(self, products: &mut [&Product]) {
        match self {
            Self::Relevance => {}
            Self::PriceLow => products.sort_by_key(|p| p.effective_price()),
            Self::PriceHigh => {
                products.sort_by(|a, b| b.effective_price().cmp(&a.effective_price()));
            }
            Self::Name => products.sort_by_cached_key(|p| p.name.to_lowercase()),
            Self::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            Self::Featured => products.sort_by_key(|p| !p.is_featured),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw shop query-string parameters. The camelCase spellings used by shop
/// page links (`minPrice`, `maxPrice`, `inStock`) are accepted as aliases.
///
/// Parsing is lenient: unparseable prices fall back to the slider defaults and
/// only `in_stock=true` enables the stock filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShopParams {
    pub q: Option<String>,
    /// Comma-separated brand names.
    pub brand: Option<String>,
    /// Comma-separated category names.
    pub category: Option<String>,
    #[serde(alias = "minPrice")]
    pub min_price: Option<String>,
    #[serde(alias = "maxPrice")]
    pub max_price: Option<String>,
    pub sort: Option<String>,
    #[serde(alias = "inStock")]
    pub in_stock: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub text: Option<String>,
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    pub min_price: Decimal,
    pub max_price: Decimal,
    pub in_stock_only: bool,
    pub sort: SortOrder,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            text: None,
            brands: Vec::new(),
            categories: Vec::new(),
            min_price: Decimal::ZERO,
            max_price: Decimal::from(DEFAULT_MAX_PRICE),
            in_stock_only: false,
            sort: SortOrder::Relevance,
        }
    }
}

/// Split a comma-separated filter value, dropping empty entries.
#[must_use]
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse a price bound; missing, invalid, or zero values yield `default`.
fn parse_price(raw: Option<&str>, default: Decimal) -> Decimal {
    raw.and_then(|s| s.trim().parse::<Decimal>().ok())
        .filter(|d| !d.is_zero())
        .unwrap_or(default)
}

impl ProductQuery {
    #[must_use]
    pub fn from_params(params: &ShopParams) -> Self {
        let defaults = Self::default();
        Self {
            text: params
                .q
                .as_deref()
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(ToOwned::to_owned),
            brands: split_list(params.brand.as_deref()),
            categories: split_list(params.category.as_deref()),
            min_price: parse_price(params.min_price.as_deref(), defaults.min_price),
            max_price: parse_price(params.max_price.as_deref(), defaults.max_price),
            in_stock_only: params.in_stock.as_deref() == Some("true"),
            sort: params
                .sort
                .as_deref()
                .map(SortOrder::from_key)
                .unwrap_or_default(),
        }
    }

    /// Returns `true` if `product` passes every filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            if !product.name.to_lowercase().contains(&needle)
                && !product.brand.to_lowercase().contains(&needle)
                && !product.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }

        if !self.brands.is_empty() && !self.brands.contains(&product.brand) {
            return false;
        }

        if !self.categories.is_empty() && !self.categories.contains(&product.category) {
            return false;
        }

        let price = product.effective_price();
        if price < self.min_price || price > self.max_price {
            return false;
        }

        if self.in_stock_only && product.stock == 0 {
            return false;
        }

        product.is_active
    }

    /// Filter and sort `products`, preserving input order for ties.
    #[must_use]
    pub fn run<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut results: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        self.sort.sort(&mut results);
        results
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub name: String,
    pub count: usize,
}

/// Filter sidebar counts over the whole active catalog, independent of the
/// current filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Every active brand in `sort_order`, zero counts included.
    pub brands: Vec<FacetCount>,
    /// Every active top-level category in `sort_order`, zero counts included.
    pub categories: Vec<FacetCount>,
    /// Active products with stock on hand.
    pub in_stock: usize,
}

impl Facets {
    #[must_use]
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let active: Vec<&Product> = catalog.products().iter().filter(|p| p.is_active).collect();
        Self {
            brands: catalog
                .active_brands()
                .into_iter()
                .map(|b| FacetCount {
                    name: b.name.clone(),
                    count: active.iter().filter(|p| p.brand == b.name).count(),
                })
                .collect(),
            categories: catalog
                .top_level_categories()
                .into_iter()
                .map(|c| FacetCount {
                    name: c.name.clone(),
                    count: active.iter().filter(|p| p.category == c.name).count(),
                })
                .collect(),
            in_stock: active.iter().filter(|p| p.in_stock()).count(),
        }
    }
}
