use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::app_config::AppConfig;
use crate::cart::Cart;

/// Shipping and tax rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPolicy {
    pub flat_shipping: Decimal,
    /// Subtotals at or above this ship free.
    pub free_shipping_threshold: Decimal,
    pub vat_rate: Decimal,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            flat_shipping: Decimal::from(5000),
            free_shipping_threshold: Decimal::from(50_000),
            vat_rate: Decimal::new(75, 3),
        }
    }
}

impl CheckoutPolicy {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            flat_shipping: config.shipping_flat_rate,
            free_shipping_threshold: config.free_shipping_threshold,
            vat_rate: config.vat_rate,
        }
    }

    /// Shipping charged for a cart with this subtotal. An empty cart ships nothing.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Decimal, is_empty: bool) -> Decimal {
        if is_empty || subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        }
    }

    #[must_use]
    pub fn vat_for(&self, subtotal: Decimal) -> Decimal {
        round_kobo(subtotal * self.vat_rate)
    }
}

/// Order summary shown beside the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub item_count: u64,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub free_shipping: bool,
    pub vat_rate: Decimal,
    pub vat: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    /// How much more the shopper must add to qualify for free shipping.
    pub free_shipping_remaining: Option<Decimal>,
    /// Progress toward free shipping, 0-100.
    pub free_shipping_progress: Decimal,
}

impl CartSummary {
    /// Price `cart` under `policy`. The total never goes below zero.
    #[must_use]
    pub fn compute(cart: &Cart, policy: &CheckoutPolicy, discount: Decimal) -> Self {
        let subtotal = cart.subtotal();
        let shipping = policy.shipping_for(subtotal, cart.is_empty());
        let vat = policy.vat_for(subtotal);
        let discount = discount.max(Decimal::ZERO);
        let total = cart.total(shipping, vat, discount).max(Decimal::ZERO);

        let below_threshold = subtotal < policy.free_shipping_threshold;
        let free_shipping_remaining =
            below_threshold.then(|| policy.free_shipping_threshold - subtotal);
        let free_shipping_progress = if policy.free_shipping_threshold.is_zero() {
            Decimal::ONE_HUNDRED
        } else {
            round_kobo(
                (subtotal / policy.free_shipping_threshold * Decimal::ONE_HUNDRED)
                    .min(Decimal::ONE_HUNDRED),
            )
        };

        Self {
            item_count: cart.item_count(),
            subtotal,
            shipping,
            free_shipping: !cart.is_empty() && shipping.is_zero(),
            vat_rate: policy.vat_rate,
            vat,
            discount,
            total,
            free_shipping_remaining,
            free_shipping_progress,
        }
    }
}

fn round_kobo(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
