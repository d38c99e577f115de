//! Pricing model for mixes
//!
//! All amounts are integer cents. Multipliers are percentages scaled so that
//! `20` means +20% on the base price.

use crate::model::{MultiplierTable, Substance};

/// Base price for products whose name mentions "Meth"
pub const METH_BASE_PRICE_CENTS: i64 = 7000;
/// Base price for products whose name mentions "Cocaine"
pub const COCAINE_BASE_PRICE_CENTS: i64 = 15000;
/// Base price for every other product
pub const DEFAULT_BASE_PRICE_CENTS: i64 = 3500;

/// Base price of a product, chosen by substring match on its name
pub fn base_price_cents(product_name: &str) -> i64 {
    if product_name.contains("Meth") {
        METH_BASE_PRICE_CENTS
    } else if product_name.contains("Cocaine") {
        COCAINE_BASE_PRICE_CENTS
    } else {
        DEFAULT_BASE_PRICE_CENTS
    }
}

/// `base + base * total / 100`, truncating
pub fn price_from_multiplier(base_price_cents: i64, total_multiplier: i64) -> i64 {
    base_price_cents + (base_price_cents * total_multiplier) / 100
}

/// Sell price of a product carrying `effects`. Effects missing from the
/// table contribute nothing.
pub fn calculate_price<'a>(
    product_name: &str,
    effects: impl IntoIterator<Item = &'a str>,
    multipliers: &MultiplierTable,
) -> i64 {
    let total: i64 = effects
        .into_iter()
        .filter_map(|effect| multipliers.get(effect))
        .sum();
    price_from_multiplier(base_price_cents(product_name), total)
}

/// Total cost of the substances at the indices in `mix`
pub fn calculate_cost(mix: &[usize], substances: &[Substance]) -> i64 {
    mix.iter().map(|&i| substances[i].cost_cents).sum()
}

/// Convert cents to a dollar amount for display
pub fn cents_to_dollars(cents: i64) -> f64 {
    cents as f64 / 100.0
}
