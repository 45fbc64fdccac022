//! End-to-end checks over the public core API: browse the bundled catalog,
//! fill a cart, and price it at checkout.

use rust_decimal::Decimal;
use truenorth_core::{
    format_naira, Cart, CartSummary, Catalog, CheckoutPolicy, ProductQuery, ShopParams, SortOrder,
};

#[test]
fn browse_filter_and_checkout() {
    let catalog = Catalog::builtin().expect("bundled catalog");

    let params = ShopParams {
        category: Some("Audio,Power".to_string()),
        sort: Some("price-low".to_string()),
        ..ShopParams::default()
    };
    let query = ProductQuery::from_params(&params);
    assert_eq!(query.sort, SortOrder::PriceLow);

    let results = query.run(catalog.products());
    let slugs: Vec<&str> = results.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec![
            "anker-powercore-20000mah",
            "galaxy-buds3-pro",
            "airpods-pro-3rd-generation"
        ]
    );

    let powerbank = results[0];
    let white = powerbank.variant("5b").expect("white variant");

    let mut cart = Cart::new();
    cart.add_item(powerbank, Some(white), 1).unwrap();
    let summary = CartSummary::compute(&cart, &CheckoutPolicy::default(), Decimal::ZERO);
    assert_eq!(format_naira(summary.total), "₦53,375");
    assert_eq!(summary.free_shipping_remaining, Some(Decimal::from(5000)));

    cart.add_item(powerbank, Some(white), 1).unwrap();
    let summary = CartSummary::compute(&cart, &CheckoutPolicy::default(), Decimal::ZERO);
    assert_eq!(summary.item_count, 2);
    assert!(summary.free_shipping);
    assert_eq!(format_naira(summary.total), "₦96,750");
}

#[test]
fn cart_snapshot_survives_restart() {
    let catalog = Catalog::builtin().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cart.json");

    let mut cart = Cart::load(&path).unwrap();
    let phone = catalog.product_by_slug("tecno-camon-30-pro").unwrap();
    cart.add_item(phone, phone.variants.first(), 2).unwrap();
    cart.save(&path).unwrap();

    let reloaded = Cart::load(&path).unwrap();
    assert_eq!(reloaded.item_count(), 2);
    assert_eq!(reloaded.items()[0].id, "3-3a");
    assert_eq!(reloaded.subtotal(), Decimal::from(570_000));
}
