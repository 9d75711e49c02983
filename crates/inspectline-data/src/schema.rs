//! Serde data file structs for recipes, levels and settings.
//!
//! These structs define the on-disk format. They are deserialized from RON,
//! JSON, or TOML data files and then resolved into engine types by the loader.

use chrono::NaiveDate;
use inspectline_core::session::SessionConfig;
use serde::Deserialize;

// ===========================================================================
// Recipes
// ===========================================================================

/// One recipe line, supporting both short tuple form and full form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IngredientData {
    /// Short form: `("Tomato", 2)`.
    Short(String, u32),
    /// Full form with explicit fields.
    Full { ingredient: String, amount: u32 },
}

impl IngredientData {
    pub fn name(&self) -> &str {
        match self {
            Self::Short(name, _) => name,
            Self::Full { ingredient, .. } => ingredient,
        }
    }

    pub fn amount(&self) -> u32 {
        match self {
            Self::Short(_, amount) | Self::Full { amount, .. } => *amount,
        }
    }
}

/// A recipe definition in a data file.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeData {
    pub name: String,
    pub ingredients: Vec<IngredientData>,
}

// ===========================================================================
// Levels
// ===========================================================================

/// A level definition: the recipes whose demand fills its queue.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub name: String,
    pub recipes: Vec<String>,
}

// ===========================================================================
// Settings
// ===========================================================================

/// Optional settings file. Every field falls back to its default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    pub session: SessionConfig,
    /// Calendar date the game starts on. The host picks one when absent.
    pub start_date: Option<NaiveDate>,
}
