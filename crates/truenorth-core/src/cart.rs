//! Shopping cart: an insertion-ordered list of line items keyed by
//! product + variant identity.

use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::{Product, ProductVariant};

/// Storage key the storefront persisted the cart under; also the default
/// snapshot file stem.
pub const CART_STORAGE_KEY: &str = "truenorth-cart";

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,
    #[error("cart item '{0}' not found")]
    ItemNotFound(String),
    #[error("variant '{variant_id}' does not belong to product '{product_id}'")]
    UnknownVariant {
        product_id: String,
        variant_id: String,
    },
    #[error("failed to access cart snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cart snapshot is not valid JSON: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Line item identity: `"{product_id}-{variant_id}"`, or `"{product_id}-default"`
/// for products bought without a variant.
#[must_use]
pub fn item_key(product_id: &str, variant_id: Option<&str>) -> String {
    format!("{product_id}-{}", variant_id.unwrap_or("default"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub quantity: u32,
    /// Unit price captured when the item was first added.
    pub price: Decimal,
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_variant: Option<ProductVariant>,
}

impl CartItem {
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Product name plus the variant name when one was chosen.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.selected_variant {
            Some(variant) => format!("{} ({})", self.product.name, variant.name),
            None => self.product.name.clone(),
        }
    }
}

/// What a cart mutation did, for logging and shopper-facing notices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CartEvent {
    Added {
        item_id: String,
        product_name: String,
        quantity: u32,
    },
    QuantityUpdated {
        item_id: String,
        product_name: String,
        quantity: u32,
    },
    Removed {
        item_id: String,
        product_name: String,
    },
    Cleared,
}

impl CartEvent {
    /// Short notice text for the shopper.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            CartEvent::Added { product_name, .. } => format!("Added {product_name} to cart"),
            CartEvent::QuantityUpdated { product_name, .. } => {
                format!("Updated quantity for {product_name}")
            }
            CartEvent::Removed { product_name, .. } => {
                format!("Removed {product_name} from cart")
            }
            CartEvent::Cleared => "Cart cleared".to_string(),
        }
    }

    pub fn log(&self) {
        match self {
            CartEvent::Added {
                item_id, quantity, ..
            }
            | CartEvent::QuantityUpdated {
                item_id, quantity, ..
            } => tracing::info!(item_id = %item_id, quantity, "{}", self.message()),
            CartEvent::Removed { item_id, .. } => {
                tracing::info!(item_id = %item_id, "{}", self.message());
            }
            CartEvent::Cleared => tracing::info!("{}", self.message()),
        }
    }
}

/// Serializes as a bare JSON array of items with snake_case fields and
/// decimal prices as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Add `quantity` of a product (optionally a specific variant).
    ///
    /// An existing line for the same product and variant has its quantity
    /// increased; otherwise a new line is appended, priced at the variant
    /// price, else the sale price, else the list price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity and
    /// [`CartError::UnknownVariant`] if `variant` is not one of the product's.
    pub fn add_item(
        &mut self,
        product: &Product,
        variant: Option<&ProductVariant>,
        quantity: u32,
    ) -> Result<CartEvent, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if let Some(variant) = variant {
            if product.variant(&variant.id).is_none() {
                return Err(CartError::UnknownVariant {
                    product_id: product.id.clone(),
                    variant_id: variant.id.clone(),
                });
            }
        }

        let variant_id = variant.map(|v| v.id.as_str());
        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.product_id == product.id && i.variant_id.as_deref() == variant_id)
        {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return Ok(CartEvent::QuantityUpdated {
                item_id: existing.id.clone(),
                product_name: product.name.clone(),
                quantity: existing.quantity,
            });
        }

        let price = variant.map_or_else(|| product.effective_price(), |v| v.unit_price(product));
        let item = CartItem {
            id: item_key(&product.id, variant_id),
            product_id: product.id.clone(),
            variant_id: variant_id.map(ToOwned::to_owned),
            quantity,
            price,
            product: product.clone(),
            selected_variant: variant.cloned(),
        };
        let event = CartEvent::Added {
            item_id: item.id.clone(),
            product_name: product.name.clone(),
            quantity,
        };
        self.items.push(item);
        Ok(event)
    }

    /// Set the quantity of a line. Zero or negative quantities remove it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has `item_id`.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> Result<CartEvent, CartError> {
        if quantity <= 0 {
            return self.remove_item(item_id);
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| CartError::ItemNotFound(item_id.to_string()))?;
        item.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        Ok(CartEvent::QuantityUpdated {
            item_id: item.id.clone(),
            product_name: item.product.name.clone(),
            quantity: item.quantity,
        })
    }

    /// Remove a line entirely.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line has `item_id`.
    pub fn remove_item(&mut self, item_id: &str) -> Result<CartEvent, CartError> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CartError::ItemNotFound(item_id.to_string()))?;
        let item = self.items.remove(index);
        Ok(CartEvent::Removed {
            item_id: item.id,
            product_name: item.product.name,
        })
    }

    pub fn clear(&mut self) -> CartEvent {
        self.items.clear();
        CartEvent::Cleared
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Subtotal plus shipping and tax, minus discount.
    #[must_use]
    pub fn total(&self, shipping: Decimal, tax: Decimal, discount: Decimal) -> Decimal {
        self.subtotal() + shipping + tax - discount
    }

    /// Read a cart snapshot. A missing file is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Io`] if the file exists but cannot be read, or
    /// [`CartError::Snapshot`] if it does not hold a cart.
    pub fn load(path: &Path) -> Result<Self, CartError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => {
                return Err(CartError::Io {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        if content.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the cart snapshot as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CartError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| CartError::Io {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
