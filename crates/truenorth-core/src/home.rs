use serde::Serialize;

use crate::catalog::{Brand, Catalog, Category};
use crate::products::Product;

const FEATURED_LIMIT: usize = 8;
const NEW_ARRIVALS_LIMIT: usize = 4;
/// Best sellers are the catalog slice `[2, 6)`.
const BEST_SELLERS_RANGE: std::ops::Range<usize> = 2..6;

/// Sections of the storefront landing page.
#[derive(Debug, Serialize)]
pub struct HomePage<'a> {
    pub featured: Vec<&'a Product>,
    pub new_arrivals: Vec<&'a Product>,
    pub best_sellers: Vec<&'a Product>,
    pub categories: Vec<&'a Category>,
    pub brands: Vec<&'a Brand>,
}

impl<'a> HomePage<'a> {
    /// Assemble the landing page from active catalog products.
    #[must_use]
    pub fn build(catalog: &'a Catalog) -> Self {
        let active: Vec<&Product> = catalog.products().iter().filter(|p| p.is_active).collect();

        let featured = active
            .iter()
            .copied()
            .filter(|p| p.is_featured)
            .take(FEATURED_LIMIT)
            .collect();
        let new_arrivals = active.iter().copied().take(NEW_ARRIVALS_LIMIT).collect();
        let best_sellers = active
            .iter()
            .copied()
            .skip(BEST_SELLERS_RANGE.start)
            .take(BEST_SELLERS_RANGE.len())
            .collect();

        Self {
            featured,
            new_arrivals,
            best_sellers,
            categories: catalog.top_level_categories(),
            brands: catalog.active_brands(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn builds_sections_from_bundled_catalog() {
        let catalog = Catalog::builtin().unwrap();
        let home = HomePage::build(&catalog);

        assert_eq!(ids(&home.featured), vec!["1", "2", "4"]);
        assert_eq!(ids(&home.new_arrivals), vec!["1", "2", "3", "4"]);
        assert_eq!(ids(&home.best_sellers), vec!["3", "4", "5", "6"]);
        assert_eq!(home.brands.len(), 7);
        assert_eq!(home.categories.len(), 5);
    }

    #[test]
    fn inactive_products_are_skipped() {
        let catalog = Catalog::builtin().unwrap();
        let mut products = catalog.products().to_vec();
        products[0].is_active = false;
        let catalog = Catalog::new(
            catalog.brands().to_vec(),
            catalog.categories().to_vec(),
            products,
        )
        .unwrap();
        let home = HomePage::build(&catalog);

        assert_eq!(ids(&home.featured), vec!["2", "4"]);
        assert_eq!(ids(&home.new_arrivals), vec!["2", "3", "4", "5"]);
        assert_eq!(ids(&home.best_sellers), vec!["4", "5", "6"]);
    }

    #[test]
    fn serializes_sections() {
        let catalog = Catalog::builtin().unwrap();
        let json = serde_json::to_value(HomePage::build(&catalog)).unwrap();
        assert_eq!(json["featured"][0]["slug"], "iphone-15-pro-max");
        assert_eq!(json["brands"][0]["name"], "Apple");
    }
}
