//! Data-driven content loading for the inspection line.
//!
//! Recipes, levels and session settings live in RON, TOML or JSON files;
//! [`load_game_data`] reads a directory of them into engine types.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, GameData, LevelDef, load_game_data};
