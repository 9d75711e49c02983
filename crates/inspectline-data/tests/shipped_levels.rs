//! Loads the level set shipped with the headless runner and checks it wires
//! into a session, plus format parity across RON, TOML and JSON.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use inspectline_core::catalog::IngredientType::{Pepper, Tomato};
use inspectline_core::session::Session;
use inspectline_core::test_utils::*;
use inspectline_data::load_game_data;

fn shipped_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../inspectline-headless/levels")
}

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "inspectline_data_it_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn shipped_levels_load() {
    let data = load_game_data(&shipped_dir()).unwrap();
    assert_eq!(data.recipes.len(), 5);
    assert_eq!(data.levels.len(), 4);
    assert_eq!(data.start_date, NaiveDate::from_ymd_opt(2024, 9, 2));
    for name in data.recipes.names() {
        let spec = data.recipes.lookup(name).unwrap();
        assert!(spec.total_items() as usize <= data.config.order_capacity, "{name}");
    }
}

#[test]
fn every_shipped_level_starts() {
    let data = load_game_data(&shipped_dir()).unwrap();
    let mut session = Session::with_config(
        data.recipes.clone(),
        data.config,
        data.start_date.unwrap(),
        seeded(99),
    )
    .unwrap();
    for level in &data.levels {
        let demand: u32 = level
            .recipes
            .iter()
            .map(|r| data.recipes.lookup(r).unwrap().total_items())
            .sum();
        assert_eq!(session.start_level(&level.recipes).unwrap(), 2 * demand as usize);
    }
}

#[test]
fn formats_load_identically() {
    let ron_dir = make_test_dir("parity_ron");
    fs::write(
        ron_dir.join("recipes.ron"),
        r#"[(name: "salsa", ingredients: [("Tomato", 3), ("Pepper", 2)])]"#,
    )
    .unwrap();
    fs::write(ron_dir.join("levels.ron"), r#"[(name: "one", recipes: ["salsa"])]"#).unwrap();

    let json_dir = make_test_dir("parity_json");
    fs::write(
        json_dir.join("recipes.json"),
        r#"[{"name": "salsa", "ingredients": [["Tomato", 3], {"ingredient": "Pepper", "amount": 2}]}]"#,
    )
    .unwrap();
    fs::write(json_dir.join("levels.json"), r#"[{"name": "one", "recipes": ["salsa"]}]"#).unwrap();

    let toml_dir = make_test_dir("parity_toml");
    fs::write(
        toml_dir.join("recipes.toml"),
        "[[recipes]]\nname = \"salsa\"\ningredients = [[\"Tomato\", 3], [\"Pepper\", 2]]\n",
    )
    .unwrap();
    fs::write(
        toml_dir.join("levels.toml"),
        "[[levels]]\nname = \"one\"\nrecipes = [\"salsa\"]\n",
    )
    .unwrap();

    let expected = recipe("salsa", &[(Tomato, 3), (Pepper, 2)]);
    for dir in [&ron_dir, &json_dir, &toml_dir] {
        let data = load_game_data(dir).unwrap();
        assert_eq!(data.recipes.lookup("salsa"), Some(&expected), "{}", dir.display());
        assert_eq!(data.levels[0].recipes, vec!["salsa"]);
        let _ = fs::remove_dir_all(dir);
    }
}
