//! Resolution pipeline: reads data files, resolves cross-references, builds
//! the recipe index and level list.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and
//! deserialization helpers used by [`load_game_data`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use inspectline_core::catalog::IngredientType;
use inspectline_core::recipe::{RecipeEntry, RecipeError, RecipeIndex, RecipeSpec};
use inspectline_core::session::SessionConfig;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::schema::{LevelData, RecipeData, SettingsData};

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required file '{file}' not found in {dir}")]
    MissingRequired { file: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name reference could not be resolved.
    #[error("unresolved {expected_kind} reference '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// A duplicate name was found.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// A recipe resolved but failed its own checks.
    #[error("invalid recipe in {file}: {source}")]
    InvalidRecipe {
        file: PathBuf,
        #[source]
        source: RecipeError,
    },

    /// A settings value outside its allowed range.
    #[error("invalid setting '{field}' in {file}: {detail}")]
    InvalidSetting {
        file: PathBuf,
        field: &'static str,
        detail: String,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        file: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Check that a recipe name is registered, returning an `UnresolvedRef`
/// error if not.
pub fn resolve_name(
    recipes: &RecipeIndex,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<(), DataLoadError> {
    if recipes.contains(name) {
        Ok(())
    } else {
        Err(DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: name.to_string(),
            expected_kind,
        })
    }
}

/// Record `name` in `seen`, returning a `DuplicateName` error if it was
/// already there.
pub fn check_duplicate(
    seen: &mut HashSet<String>,
    name: &str,
    file: &Path,
) -> Result<(), DataLoadError> {
    if seen.insert(name.to_string()) {
        Ok(())
    } else {
        Err(DataLoadError::DuplicateName {
            file: file.to_path_buf(),
            name: name.to_string(),
        })
    }
}

/// Resolve an ingredient name, case-insensitively.
pub fn resolve_ingredient(name: &str, file: &Path) -> Result<IngredientType, DataLoadError> {
    IngredientType::from_name(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind: "ingredient",
    })
}

// ===========================================================================
// Loading pipeline
// ===========================================================================

/// A level after its recipe references have been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelDef {
    pub name: String,
    pub recipes: Vec<String>,
}

/// Everything a host needs to run sessions.
#[derive(Debug, Clone)]
pub struct GameData {
    pub recipes: RecipeIndex,
    /// Levels in file order.
    pub levels: Vec<LevelDef>,
    pub config: SessionConfig,
    pub start_date: Option<NaiveDate>,
}

/// Load `recipes.*`, `levels.*` and the optional `settings.*` from `dir`.
pub fn load_game_data(dir: &Path) -> Result<GameData, DataLoadError> {
    let (config, start_date) = match find_data_file(dir, "settings")? {
        Some(path) => load_settings(&path)?,
        None => {
            debug!(dir = %dir.display(), "no settings file, using defaults");
            (SessionConfig::default(), None)
        }
    };

    let recipes_path = require_data_file(dir, "recipes")?;
    let recipes = load_recipes(&recipes_path, &config)?;

    let levels_path = require_data_file(dir, "levels")?;
    let levels = load_levels(&levels_path, &recipes)?;

    info!(
        recipes = recipes.len(),
        levels = levels.len(),
        dir = %dir.display(),
        "game data loaded"
    );
    Ok(GameData {
        recipes,
        levels,
        config,
        start_date,
    })
}

fn load_settings(path: &Path) -> Result<(SessionConfig, Option<NaiveDate>), DataLoadError> {
    let settings: SettingsData = deserialize_file(path)?;
    let config = settings.session;
    let invalid = |field: &'static str, detail: String| DataLoadError::InvalidSetting {
        file: path.to_path_buf(),
        field,
        detail,
    };

    if config.order_capacity == 0 {
        return Err(invalid("order_capacity", "must be at least 1".into()));
    }
    if !config.starting_seconds.is_finite() || config.starting_seconds <= 0.0 {
        return Err(invalid(
            "starting_seconds",
            format!("must be positive and finite, got {}", config.starting_seconds),
        ));
    }
    for (field, value) in [
        ("perfect_bonus", config.scoring.perfect_bonus),
        ("mistake_penalty", config.scoring.mistake_penalty),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(
                field,
                format!("must be finite and not negative, got {value}"),
            ));
        }
    }
    Ok((config, settings.start_date))
}

fn load_recipes(path: &Path, config: &SessionConfig) -> Result<RecipeIndex, DataLoadError> {
    let data: Vec<RecipeData> = deserialize_list(path, "recipes")?;
    let mut seen = HashSet::new();
    let mut index = RecipeIndex::new();

    for recipe in data {
        check_duplicate(&mut seen, &recipe.name, path)?;
        let entries = recipe
            .ingredients
            .iter()
            .map(|line| Ok(RecipeEntry::new(resolve_ingredient(line.name(), path)?, line.amount())))
            .collect::<Result<Vec<_>, DataLoadError>>()?;
        let spec = RecipeSpec::new(recipe.name, entries).map_err(|source| {
            DataLoadError::InvalidRecipe {
                file: path.to_path_buf(),
                source,
            }
        })?;

        let total = spec.total_items() as usize;
        if total > config.order_capacity {
            warn!(
                recipe = spec.name(),
                total,
                capacity = config.order_capacity,
                "recipe needs more records than an order holds"
            );
        }
        index.register(spec);
    }
    Ok(index)
}

fn load_levels(path: &Path, recipes: &RecipeIndex) -> Result<Vec<LevelDef>, DataLoadError> {
    let data: Vec<LevelData> = deserialize_list(path, "levels")?;
    let mut seen = HashSet::new();
    let mut levels = Vec::with_capacity(data.len());

    for level in data {
        check_duplicate(&mut seen, &level.name, path)?;
        for name in &level.recipes {
            resolve_name(recipes, name, path, "recipe")?;
        }
        if level.recipes.is_empty() {
            warn!(level = %level.name, "level has no recipes and will start with an empty queue");
        }
        levels.push(LevelDef {
            name: level.name,
            recipes: level.recipes,
        });
    }
    Ok(levels)
}

// ===========================================================================
// Tests
// ===========================================================================
