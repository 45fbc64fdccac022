use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::products::Product;

/// The catalog bundled into the binary, used when no catalog path is configured.
const BUILTIN_CATALOG: &str = include_str!("../../../config/catalog.yaml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Parent category id for nested categories such as "Cases & Protection".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    brands: Vec<Brand>,
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    products: Vec<Product>,
}

/// A validated, read-only product catalog. Product order is the order the
/// catalog file declares, which is also the storefront's "relevance" order.
#[derive(Debug, Clone)]
pub struct Catalog {
    brands: Vec<Brand>,
    categories: Vec<Category>,
    products: Vec<Product>,
}

/// Generate a URL-safe slug from a display name.
///
/// ASCII alphanumerics are kept (lowercased), spaces become dashes, everything
/// else is dropped, and runs of dashes collapse.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c
            } else if c == ' ' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Load the catalog from `path`, or the bundled catalog when `path` is `None`.
///
/// # Errors
///
/// Returns `CatalogError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    match path {
        Some(path) => Catalog::load(path),
        None => Catalog::builtin(),
    }
}

impl Catalog {
    /// Build a catalog from parts, validating cross references.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Validation` describing the first problem found.
    pub fn new(
        brands: Vec<Brand>,
        categories: Vec<Category>,
        products: Vec<Product>,
    ) -> Result<Self, CatalogError> {
        let catalog = Self {
            brands,
            categories,
            products,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load and validate a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            products = catalog.products.len(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled file is malformed.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG)
    }

    /// Parse and validate a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` on parse or validation failure.
    pub fn from_yaml_str(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Self::new(file.brands, file.categories, file.products)
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn product_by_id(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn product_by_slug(&self, slug: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.slug == slug)
    }

    #[must_use]
    pub fn brand_by_slug(&self, slug: &str) -> Option<&Brand> {
        self.brands.iter().find(|b| b.slug == slug)
    }

    #[must_use]
    pub fn category_by_slug(&self, slug: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Active brands ordered by `sort_order`.
    #[must_use]
    pub fn active_brands(&self) -> Vec<&Brand> {
        let mut brands: Vec<&Brand> = self.brands.iter().filter(|b| b.is_active).collect();
        brands.sort_by_key(|b| b.sort_order);
        brands
    }

    /// Active categories ordered by `sort_order`, nested ones included.
    #[must_use]
    pub fn active_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<&Category> =
            self.categories.iter().filter(|c| c.is_active).collect();
        categories.sort_by_key(|c| c.sort_order);
        categories
    }

    /// Active categories with no parent, ordered by `sort_order`.
    #[must_use]
    pub fn top_level_categories(&self) -> Vec<&Category> {
        self.active_categories()
            .into_iter()
            .filter(|c| c.parent_id.is_none())
            .collect()
    }

    /// Active children of the category with id `parent_id`.
    #[must_use]
    pub fn subcategories(&self, parent_id: &str) -> Vec<&Category> {
        self.active_categories()
            .into_iter()
            .filter(|c| c.parent_id.as_deref() == Some(parent_id))
            .collect()
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let brand_names = validate_brands(&self.brands)?;
        let category_names = validate_categories(&self.categories)?;

        let mut seen_ids = HashSet::new();
        let mut seen_slugs = HashSet::new();
        let mut seen_skus = HashSet::new();

        for product in &self.products {
            if product.name.trim().is_empty() {
                return Err(validation(format!(
                    "product '{}' must have a non-empty name",
                    product.id
                )));
            }
            if !seen_ids.insert(product.id.as_str()) {
                return Err(validation(format!("duplicate product id: '{}'", product.id)));
            }
            if !seen_slugs.insert(product.slug.as_str()) {
                return Err(validation(format!(
                    "duplicate product slug: '{}' (from product '{}')",
                    product.slug, product.name
                )));
            }
            if !brand_names.contains(product.brand.as_str()) {
                return Err(validation(format!(
                    "product '{}' references unknown brand '{}'",
                    product.name, product.brand
                )));
            }
            if !category_names.contains(product.category.as_str()) {
                return Err(validation(format!(
                    "product '{}' references unknown category '{}'",
                    product.name, product.category
                )));
            }
            if product.price.is_sign_negative()
                || product.sale_price.is_some_and(|p| p.is_sign_negative())
            {
                return Err(validation(format!(
                    "product '{}' has a negative price",
                    product.name
                )));
            }
            if !seen_skus.insert(product.sku.as_str()) {
                return Err(validation(format!("duplicate sku: '{}'", product.sku)));
            }

            let mut seen_variant_ids = HashSet::new();
            for variant in &product.variants {
                if !seen_variant_ids.insert(variant.id.as_str()) {
                    return Err(validation(format!(
                        "product '{}' has duplicate variant id '{}'",
                        product.name, variant.id
                    )));
                }
                if !seen_skus.insert(variant.sku.as_str()) {
                    return Err(validation(format!("duplicate sku: '{}'", variant.sku)));
                }
                if variant.price.is_some_and(|p| p.is_sign_negative()) {
                    return Err(validation(format!(
                        "variant '{}' of product '{}' has a negative price",
                        variant.id, product.name
                    )));
                }
            }
        }

        Ok(())
    }
}

fn validation(message: String) -> CatalogError {
    CatalogError::Validation(message)
}

fn validate_brands(brands: &[Brand]) -> Result<HashSet<&str>, CatalogError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for brand in brands {
        if brand.name.trim().is_empty() {
            return Err(validation("brand name must be non-empty".to_string()));
        }
        if !seen_names.insert(brand.name.as_str()) {
            return Err(validation(format!("duplicate brand name: '{}'", brand.name)));
        }
        if !seen_slugs.insert(brand.slug.as_str()) {
            return Err(validation(format!(
                "duplicate brand slug: '{}' (from brand '{}')",
                brand.slug, brand.name
            )));
        }
    }

    Ok(seen_names)
}

fn validate_categories(categories: &[Category]) -> Result<HashSet<&str>, CatalogError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();
    let ids: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();

    for category in categories {
        if category.name.trim().is_empty() {
            return Err(validation("category name must be non-empty".to_string()));
        }
        if !seen_names.insert(category.name.as_str()) {
            return Err(validation(format!(
                "duplicate category name: '{}'",
                category.name
            )));
        }
        if !seen_slugs.insert(category.slug.as_str()) {
            return Err(validation(format!(
                "duplicate category slug: '{}' (from category '{}')",
                category.slug, category.name
            )));
        }
        if let Some(parent) = category.parent_id.as_deref() {
            if parent == category.id || !ids.contains(parent) {
                return Err(validation(format!(
                    "category '{}' has invalid parent '{parent}'",
                    category.name
                )));
            }
        }
    }

    Ok(seen_names)
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
