//! Recipe specifications and the name-keyed index that stores them.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::catalog::IngredientType;

/// Smallest amount a recipe line may ask for.
pub const MIN_AMOUNT: u32 = 1;
/// Largest amount a recipe line may ask for.
pub const MAX_AMOUNT: u32 = 10;

/// One line of a recipe: `amount` units of `ingredient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub ingredient: IngredientType,
    pub amount: u32,
}

impl RecipeEntry {
    pub fn new(ingredient: IngredientType, amount: u32) -> Self {
        Self { ingredient, amount }
    }
}

/// A named, ordered list of ingredient requirements.
///
/// Deserialization goes through [`RecipeSpec::new`], so a decoded spec holds
/// the same invariants as a constructed one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecipeSpec")]
pub struct RecipeSpec {
    name: String,
    entries: Vec<RecipeEntry>,
}

#[derive(Deserialize)]
struct RawRecipeSpec {
    name: String,
    entries: Vec<RecipeEntry>,
}

impl TryFrom<RawRecipeSpec> for RecipeSpec {
    type Error = RecipeError;

    fn try_from(raw: RawRecipeSpec) -> Result<Self, Self::Error> {
        RecipeSpec::new(raw.name, raw.entries)
    }
}

impl RecipeSpec {
    /// Build a recipe, rejecting blank names and amounts outside
    /// `MIN_AMOUNT..=MAX_AMOUNT`.
    pub fn new(name: impl Into<String>, entries: Vec<RecipeEntry>) -> Result<Self, RecipeError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RecipeError::EmptyName);
        }
        for entry in &entries {
            if !(MIN_AMOUNT..=MAX_AMOUNT).contains(&entry.amount) {
                return Err(RecipeError::AmountOutOfRange {
                    recipe: name,
                    ingredient: entry.ingredient,
                    amount: entry.amount,
                });
            }
        }
        Ok(Self { name, entries })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entries(&self) -> &[RecipeEntry] {
        &self.entries
    }

    /// Required count per type. Repeated lines for one type are summed.
    pub fn requirements(&self) -> BTreeMap<IngredientType, u32> {
        RecipeIndex::aggregate_requirements([self])
    }

    /// Total units the recipe asks for.
    pub fn total_items(&self) -> u32 {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeError {
    #[error("recipe name is empty")]
    EmptyName,
    #[error("recipe '{recipe}' asks for {amount} {ingredient}, allowed {}..={}", MIN_AMOUNT, MAX_AMOUNT)]
    AmountOutOfRange {
        recipe: String,
        ingredient: IngredientType,
        amount: u32,
    },
}

/// Recipes keyed by name. Registering an existing name replaces it.
#[derive(Debug, Clone, Default)]
pub struct RecipeIndex {
    recipes: HashMap<String, RecipeSpec>,
}

impl RecipeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `spec`, returning the recipe it replaced, if any.
    pub fn register(&mut self, spec: RecipeSpec) -> Option<RecipeSpec> {
        self.recipes.insert(spec.name.clone(), spec)
    }

    pub fn lookup(&self, name: &str) -> Option<&RecipeSpec> {
        self.recipes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.recipes.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.recipes.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Sum `amount` per type across `specs`. Types nobody asks for are
    /// absent from the map.
    pub fn aggregate_requirements<'a>(
        specs: impl IntoIterator<Item = &'a RecipeSpec>,
    ) -> BTreeMap<IngredientType, u32> {
        let mut totals = BTreeMap::new();
        for spec in specs {
            for entry in &spec.entries {
                *totals.entry(entry.ingredient).or_insert(0) += entry.amount;
            }
        }
        totals
    }
}
