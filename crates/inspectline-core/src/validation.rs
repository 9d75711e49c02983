//! Order validation and time rewards.
//!
//! Validation runs in two stages. The ingredient gate compares the order's
//! per-type counts with the recipe's and stops on any difference. Past the
//! gate every record is checked for defects and documentation errors, and
//! each flawed record takes [`ScoringConfig::mistake_penalty`] off the
//! [`ScoringConfig::perfect_bonus`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::ExpiryStatus;
use crate::catalog::{Catalog, IngredientType};
use crate::item::ItemRecord;
use crate::order::Order;
use crate::recipe::RecipeSpec;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Reward constants, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Awarded for an order with no flawed records.
    pub perfect_bonus: f32,
    /// Subtracted per flawed record.
    pub mistake_penalty: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            perfect_bonus: 120.0,
            mistake_penalty: 30.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultClass {
    /// No flawed records.
    Perfect,
    /// Some flawed records, reward still above zero.
    Partial,
    /// Enough flawed records to wipe out the reward.
    ZeroReward,
    /// The ingredient counts did not match the recipe; nothing was scored.
    WrongIngredients,
}

/// Which documentation fields of a record are wrong.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataErrors {
    pub name: bool,
    pub variety: bool,
    pub origin: bool,
    pub expiry: bool,
}

impl DataErrors {
    pub fn any(&self) -> bool {
        self.name || self.variety || self.origin || self.expiry
    }
}

/// Verdict for the record in one order slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDiagnostic {
    pub slot: usize,
    pub has_defect: bool,
    pub data_errors: DataErrors,
}

impl RecordDiagnostic {
    pub fn has_data_error(&self) -> bool {
        self.data_errors.any()
    }

    pub fn has_errors(&self) -> bool {
        self.has_defect || self.has_data_error()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ingredients_correct: bool,
    /// One entry per order slot; empty when the ingredient gate failed.
    pub diagnostics: Vec<RecordDiagnostic>,
    pub reward_seconds: f32,
    pub result_class: ResultClass,
}

impl ValidationResult {
    /// Records with a defect or a documentation error.
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.has_errors()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The caller paired an order with a recipe other than the one it was
    /// opened for. This is a wiring bug, not a player mistake.
    #[error("order for '{order_recipe}' validated against recipe '{given_recipe}'")]
    RecipeMismatch {
        order_recipe: String,
        given_recipe: String,
    },
}

// ---------------------------------------------------------------------------
// OrderValidator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OrderValidator {
    catalog: Arc<Catalog>,
    scoring: ScoringConfig,
}

impl OrderValidator {
    pub fn new(catalog: Arc<Catalog>, scoring: ScoringConfig) -> Self {
        Self { catalog, scoring }
    }

    pub fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Exact per-type count equality between `items` and `recipe`. Extra
    /// types, missing types and count mismatches all fail.
    pub fn check_ingredients(&self, items: &[ItemRecord], recipe: &RecipeSpec) -> bool {
        let mut assembled: BTreeMap<IngredientType, u32> = BTreeMap::new();
        for record in items {
            *assembled.entry(record.ingredient).or_insert(0) += 1;
        }
        assembled == recipe.requirements()
    }

    /// Defect and documentation verdict for one record.
    pub fn diagnose(&self, slot: usize, record: &ItemRecord, today: NaiveDate) -> RecordDiagnostic {
        let canonical = record.ingredient.canonical_name();
        let data_errors = DataErrors {
            name: record.declared_name != canonical,
            variety: !self.catalog.is_variety_of(record.ingredient, record.variety),
            origin: record.origin != self.catalog.origin_of(record.variety),
            expiry: record.expiry.status(today) != ExpiryStatus::Valid,
        };
        RecordDiagnostic {
            slot,
            has_defect: record.has_defect(),
            data_errors,
        }
    }

    /// Reward and class for an order with `errors` flawed records.
    pub fn reward_for(&self, errors: usize) -> (f32, ResultClass) {
        let reward =
            (self.scoring.perfect_bonus - errors as f32 * self.scoring.mistake_penalty).max(0.0);
        let class = if errors == 0 {
            ResultClass::Perfect
        } else if reward > 0.0 {
            ResultClass::Partial
        } else {
            ResultClass::ZeroReward
        };
        (reward, class)
    }

    /// Validate `order` against `recipe` on `today`.
    ///
    /// Fails only when `recipe` is not the recipe the order was opened for.
    pub fn validate(
        &self,
        order: &Order,
        recipe: &RecipeSpec,
        today: NaiveDate,
    ) -> Result<ValidationResult, ValidationError> {
        if order.recipe() != recipe.name() {
            return Err(ValidationError::RecipeMismatch {
                order_recipe: order.recipe().to_string(),
                given_recipe: recipe.name().to_string(),
            });
        }

        if !self.check_ingredients(order.items(), recipe) {
            return Ok(ValidationResult {
                ingredients_correct: false,
                diagnostics: Vec::new(),
                reward_seconds: 0.0,
                result_class: ResultClass::WrongIngredients,
            });
        }

        let diagnostics: Vec<RecordDiagnostic> = order
            .items()
            .iter()
            .enumerate()
            .map(|(slot, record)| self.diagnose(slot, record, today))
            .collect();
        let errors = diagnostics.iter().filter(|d| d.has_errors()).count();
        let (reward_seconds, result_class) = self.reward_for(errors);

        Ok(ValidationResult {
            ingredients_correct: true,
            diagnostics,
            reward_seconds,
            result_class,
        })
    }
}
