//! Cart commands. The cart is a JSON snapshot on disk that persists between
//! runs.

use std::path::Path;

use clap::Subcommand;
use rust_decimal::Decimal;
use truenorth_core::{format_naira, Cart, CartEvent, CartSummary, Catalog, CheckoutPolicy};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Add a product to the cart
    Add {
        /// Product slug (e.g., tecno-camon-30-pro)
        slug: String,
        /// Variant id (e.g., 3a)
        #[arg(long)]
        variant: Option<String>,
        #[arg(long, default_value = "1")]
        quantity: u32,
    },
    /// Set the quantity of a cart item; zero or less removes it
    Update {
        /// Cart item id (e.g., 3-3a)
        item_id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove an item from the cart
    Remove { item_id: String },
    /// Empty the cart
    Clear,
    /// Show cart contents and the order summary
    Show {
        /// Discount to apply, in naira
        #[arg(long)]
        discount: Option<Decimal>,
    },
}

fn save_and_report(cart: &Cart, path: &Path, event: &CartEvent) -> anyhow::Result<()> {
    cart.save(path)?;
    event.log();
    println!("{}", event.message());
    Ok(())
}

/// Add a product (optionally a specific variant) to the saved cart.
///
/// # Errors
///
/// Returns an error if the product or variant does not exist, the quantity is
/// zero, or the cart file cannot be read or written.
pub(crate) fn run_cart_add(
    catalog: &Catalog,
    cart_path: &Path,
    slug: &str,
    variant_id: Option<&str>,
    quantity: u32,
) -> anyhow::Result<Cart> {
    let product = catalog
        .product_by_slug(slug)
        .filter(|p| p.is_active)
        .ok_or_else(|| anyhow::anyhow!("product '{slug}' not found"))?;
    let variant = variant_id
        .map(|id| {
            product.variant(id).ok_or_else(|| {
                anyhow::anyhow!("product '{slug}' has no variant '{id}'")
            })
        })
        .transpose()?;

    let mut cart = Cart::load(cart_path)?;
    let event = cart.add_item(product, variant, quantity)?;
    save_and_report(&cart, cart_path, &event)?;
    Ok(cart)
}

/// Set an item's quantity in the saved cart.
///
/// # Errors
///
/// Returns an error if the item is not in the cart or the cart file cannot be
/// read or written.
pub(crate) fn run_cart_update(
    cart_path: &Path,
    item_id: &str,
    quantity: i64,
) -> anyhow::Result<Cart> {
    let mut cart = Cart::load(cart_path)?;
    let event = cart.update_quantity(item_id, quantity)?;
    save_and_report(&cart, cart_path, &event)?;
    Ok(cart)
}

/// Remove an item from the saved cart.
///
/// # Errors
///
/// Returns an error if the item is not in the cart or the cart file cannot be
/// read or written.
pub(crate) fn run_cart_remove(cart_path: &Path, item_id: &str) -> anyhow::Result<Cart> {
    let mut cart = Cart::load(cart_path)?;
    let event = cart.remove_item(item_id)?;
    save_and_report(&cart, cart_path, &event)?;
    Ok(cart)
}

/// Empty the saved cart.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read or written.
pub(crate) fn run_cart_clear(cart_path: &Path) -> anyhow::Result<Cart> {
    let mut cart = Cart::load(cart_path)?;
    let event = cart.clear();
    save_and_report(&cart, cart_path, &event)?;
    Ok(cart)
}

/// Print the cart lines and the checkout summary.
///
/// # Errors
///
/// Returns an error if the cart file cannot be read.
pub(crate) fn run_cart_show(
    cart_path: &Path,
    policy: &CheckoutPolicy,
    discount: Option<Decimal>,
) -> anyhow::Result<CartSummary> {
    let cart = Cart::load(cart_path)?;
    let summary = CartSummary::compute(&cart, policy, discount.unwrap_or(Decimal::ZERO));

    if cart.is_empty() {
        println!("your cart is empty; add something with `cart add <slug>`");
        return Ok(summary);
    }

    let header = format!(
        "{:<14}{:<44}{:>5}{:>16}{:>16}",
        "ITEM", "PRODUCT", "QTY", "PRICE", "TOTAL"
    );
    println!("{header}");
    for item in cart.items() {
        println!(
            "{:<14}{:<44}{:>5}{:>16}{:>16}",
            item.id,
            item.display_name(),
            item.quantity,
            format_naira(item.price),
            format_naira(item.line_total())
        );
    }

    println!();
    println!("{:<20}{:>16}", "Items", summary.item_count);
    println!("{:<20}{:>16}", "Subtotal", format_naira(summary.subtotal));
    let shipping = if summary.free_shipping {
        "Free".to_string()
    } else {
        format_naira(summary.shipping)
    };
    println!("{:<20}{:>16}", "Shipping", shipping);
    let vat_label = format!("VAT ({}%)", (summary.vat_rate * Decimal::ONE_HUNDRED).normalize());
    println!("{:<20}{:>16}", vat_label, format_naira(summary.vat));
    if !summary.discount.is_zero() {
        println!("{:<20}{:>16}", "Discount", format!("-{}", format_naira(summary.discount)));
    }
    println!("{:<20}{:>16}", "Total", format_naira(summary.total));

    if let Some(remaining) = summary.free_shipping_remaining {
        println!();
        println!(
            "Add {} more for free shipping ({}% of the way there)",
            format_naira(remaining),
            summary.free_shipping_progress.round().normalize()
        );
    }

    Ok(summary)
}
