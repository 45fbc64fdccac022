use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A product as listed in the storefront catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// URL slug, e.g. `"iphone-15-pro-max"`.
    pub slug: String,
    pub description: String,
    pub short_description: String,
    /// Brand display name; must match a [`crate::Brand`] in the catalog.
    pub brand: String,
    /// Category display name; must match a [`crate::Category`] in the catalog.
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    /// List price in naira.
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Decimal>,
    pub sku: String,
    pub stock: u32,
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    /// Spec sheet rows in display order.
    #[serde(default)]
    pub specifications: IndexMap<String, String>,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
    pub warranty_months: u16,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a shopper pays: the sale price when one is set, else the list price.
    ///
    /// A zero sale price counts as unset.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.active_sale_price().unwrap_or(self.price)
    }

    /// Returns `true` when a sale price is set and strictly below the list price.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.active_sale_price().is_some_and(|sale| sale < self.price)
    }

    /// Whole-percent markdown shown on the sale badge, or 0 when not on sale.
    #[must_use]
    pub fn discount_percentage(&self) -> u32 {
        let Some(sale) = self.active_sale_price().filter(|_| self.is_on_sale()) else {
            return 0;
        };
        ((self.price - sale) / self.price * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_u32()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    #[must_use]
    pub fn variant(&self, variant_id: &str) -> Option<&ProductVariant> {
        self.variants.iter().find(|v| v.id == variant_id)
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    fn active_sale_price(&self) -> Option<Decimal> {
        self.sale_price.filter(|p| !p.is_zero())
    }
}

/// A purchasable SKU under a [`Product`], e.g. a colour/storage combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    /// Display name, e.g. `"256GB Blue Titanium"`.
    pub name: String,
    pub sku: String,
    /// Overrides the product price when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    pub stock: u32,
    /// Attribute pairs such as `color: "Black"`, `storage: "128GB"`.
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
}

impl ProductVariant {
    /// Unit price for this variant: its own price if set, else the product's
    /// effective price.
    #[must_use]
    pub fn unit_price(&self, product: &Product) -> Decimal {
        self.price
            .filter(|p| !p.is_zero())
            .unwrap_or_else(|| product.effective_price())
    }
}
