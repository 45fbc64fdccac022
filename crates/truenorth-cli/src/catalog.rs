//! Catalog browsing commands.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use truenorth_core::query::FacetCount;
use truenorth_core::{format_naira, Catalog, Facets, Product, ProductQuery, ShopParams};

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// List products matching the shop filters
    List(ListFilters),
    /// Show a single product with its variants
    Show {
        /// Product slug (e.g., iphone-15-pro-max)
        slug: String,
    },
}

#[derive(Debug, Default, Args)]
pub struct ListFilters {
    /// Search text matched against name, brand, and description
    #[arg(long)]
    pub q: Option<String>,
    /// Comma-separated brand names (e.g., Apple,Samsung)
    #[arg(long)]
    pub brand: Option<String>,
    /// Comma-separated category names (e.g., Audio,Power)
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub max_price: Option<Decimal>,
    /// relevance, price-low, price-high, name, newest, or featured
    #[arg(long)]
    pub sort: Option<String>,
    /// Only list products with stock on hand
    #[arg(long)]
    pub in_stock: bool,
}

impl ListFilters {
    /// The same parameters the storefront puts in its shop URL.
    pub(crate) fn shop_params(&self) -> ShopParams {
        ShopParams {
            q: self.q.clone(),
            brand: self.brand.clone(),
            category: self.category.clone(),
            min_price: self.min_price.map(|p| p.to_string()),
            max_price: self.max_price.map(|p| p.to_string()),
            sort: self.sort.clone(),
            in_stock: self.in_stock.then(|| "true".to_string()),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}

fn price_label(product: &Product) -> String {
    if product.is_on_sale() {
        format!(
            "{} (-{}%)",
            format_naira(product.effective_price()),
            product.discount_percentage()
        )
    } else {
        format_naira(product.effective_price())
    }
}

fn facet_line(label: &str, facets: &[FacetCount]) -> String {
    let parts: Vec<String> = facets
        .iter()
        .map(|f| format!("{} ({})", f.name, f.count))
        .collect();
    format!("{label}: {}", parts.join(", "))
}

/// Print products matching `params` as a table, followed by facet counts.
pub(crate) fn run_catalog_list(catalog: &Catalog, params: &ShopParams) {
    let query = ProductQuery::from_params(params);
    let results = query.run(catalog.products());

    if results.is_empty() {
        println!("no products match these filters");
        return;
    }

    let header = format!(
        "{:<30}{:<10}{:<14}{:<22}STOCK",
        "SLUG", "BRAND", "CATEGORY", "PRICE"
    );
    println!("{header}");
    for product in &results {
        println!(
            "{:<30}{:<10}{:<14}{:<22}{}",
            truncate(&product.slug, 27),
            product.brand,
            product.category,
            price_label(product),
            product.stock
        );
    }

    let facets = Facets::for_catalog(catalog);
    println!();
    println!("{} products, sorted by {}", results.len(), query.sort);
    println!("{}", facet_line("Brands", &facets.brands));
    println!("{}", facet_line("Categories", &facets.categories));
    println!("In stock only ({})", facets.in_stock);
}

/// Print the product page for `slug`.
///
/// # Errors
///
/// Returns an error if no active product has that slug.
pub(crate) fn run_catalog_show(catalog: &Catalog, slug: &str) -> anyhow::Result<()> {
    let product = catalog
        .product_by_slug(slug)
        .filter(|p| p.is_active)
        .ok_or_else(|| anyhow::anyhow!("product '{slug}' not found"))?;

    println!("{}", product.name);
    println!("{} / {}", product.brand, product.category);
    if product.is_on_sale() {
        println!(
            "Price: {} (was {}, save {}%)",
            format_naira(product.effective_price()),
            format_naira(product.price),
            product.discount_percentage()
        );
    } else {
        println!("Price: {}", format_naira(product.price));
    }
    let availability = if product.in_stock() {
        format!("In stock ({})", product.stock)
    } else {
        "Out of stock".to_string()
    };
    println!("{availability}");
    println!("Warranty: {} months", product.warranty_months);
    println!();
    println!("{}", product.description);

    if !product.specifications.is_empty() {
        println!();
        println!("Specifications");
        for (key, value) in &product.specifications {
            println!("  {key:<16}{value}");
        }
    }

    if !product.variants.is_empty() {
        println!();
        let header = format!("{:<6}{:<32}{:<16}STOCK", "ID", "VARIANT", "PRICE");
        println!("{header}");
        for variant in &product.variants {
            println!(
                "{:<6}{:<32}{:<16}{}",
                variant.id,
                truncate(&variant.name, 29),
                format_naira(variant.unit_price(product)),
                variant.stock
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_params_carry_filters() {
        let filters = ListFilters {
            brand: Some("Apple,Samsung".to_string()),
            max_price: Some(Decimal::from(500_000)),
            in_stock: true,
            ..ListFilters::default()
        };
        let params = filters.shop_params();

        assert_eq!(params.brand.as_deref(), Some("Apple,Samsung"));
        assert_eq!(params.max_price.as_deref(), Some("500000"));
        assert_eq!(params.in_stock.as_deref(), Some("true"));
        assert!(params.min_price.is_none());

        let query = ProductQuery::from_params(&params);
        let catalog = Catalog::builtin().expect("catalog");
        let slugs: Vec<&str> = query
            .run(catalog.products())
            .into_iter()
            .map(|p| p.slug.as_str())
            .collect();
        assert_eq!(slugs, vec!["airpods-pro-3rd-generation", "galaxy-buds3-pro"]);
    }

    #[test]
    fn show_unknown_slug_errors() {
        let catalog = Catalog::builtin().expect("catalog");
        let err = run_catalog_show(&catalog, "nokia-3310").unwrap_err();
        assert!(err.to_string().contains("nokia-3310"));
    }

    #[test]
    fn truncate_adds_ellipsis_past_limit() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 4), "abcd...");
    }
}
