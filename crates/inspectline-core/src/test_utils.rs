//! Shared test helpers for integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so these helpers
//! are available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use std::sync::Arc;

use chrono::NaiveDate;

use crate::calendar::Expiry;
use crate::catalog::{Catalog, IngredientType};
use crate::item::ItemRecord;
use crate::order::{DEFAULT_ORDER_CAPACITY, Order};
use crate::recipe::{RecipeEntry, RecipeSpec};
use crate::rng::SimRng;

// ===========================================================================
// Fixtures
// ===========================================================================

pub fn standard_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::standard().expect("standard catalog is valid"))
}

/// A mid-month date well clear of leap days and year boundaries.
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

pub fn seeded(seed: u64) -> SimRng {
    SimRng::new(seed)
}

// ===========================================================================
// Recipe and record constructors
// ===========================================================================

/// Build a recipe from `(type, amount)` lines. Panics on invalid input.
pub fn recipe(name: &str, lines: &[(IngredientType, u32)]) -> RecipeSpec {
    let entries = lines
        .iter()
        .map(|&(ingredient, amount)| RecipeEntry::new(ingredient, amount))
        .collect();
    RecipeSpec::new(name, entries).expect("test recipe is valid")
}

/// A flawless record of `ingredient`: first variety of its partition, that
/// variety's origin, canonical name, expiring six months after `today`.
pub fn correct_record(ingredient: IngredientType, today: NaiveDate) -> ItemRecord {
    let catalog = Catalog::standard().expect("standard catalog is valid");
    let variety = catalog.varieties_of(ingredient)[0];
    ItemRecord {
        ingredient,
        variety,
        origin: catalog.origin_of(variety),
        declared_name: ingredient.canonical_name().to_string(),
        expiry: Expiry::months_after(today, 6),
        defects: Vec::new(),
    }
}

/// An open order for `recipe_name` holding `items`, sized so they all fit.
pub fn order_with(recipe_name: &str, items: Vec<ItemRecord>) -> Order {
    let mut order = Order::with_capacity(recipe_name, items.len().max(DEFAULT_ORDER_CAPACITY));
    for record in items {
        order.accept(record).expect("order has room");
    }
    order
}
