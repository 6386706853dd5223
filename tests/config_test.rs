//! Tests for configuration loading from files.

use std::io::Write;

use tictacterm::{ConfigRegistry, DisplayKind, GameConfig, USERS_AMOUNT};

fn empty_env() -> ConfigRegistry {
    ConfigRegistry::with_env(std::iter::empty())
}

#[test]
fn test_file_values_feed_game_config() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[vars]\nusers_amount = 3\nuser3_input = \"keyboard2\"\nmoves_capacity = 64"
    )
    .unwrap();

    let mut registry = empty_env();
    registry.load_file(file.path()).unwrap();
    let config = GameConfig::from_registry(&mut registry).unwrap();

    assert_eq!(*config.players(), 3);
    assert_eq!(config.board_side(), 4);
    assert_eq!(
        config.inputs(),
        &vec![
            "keyboard1".to_string(),
            "keyboard1".to_string(),
            "keyboard2".to_string()
        ]
    );
    assert_eq!(*config.display(), DisplayKind::Cli);
    assert_eq!(*config.moves_capacity(), 64);
}

#[test]
fn test_override_beats_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[vars]\nusers_amount = 3").unwrap();

    let mut registry = empty_env();
    registry.load_file(file.path()).unwrap();
    registry.set_var(USERS_AMOUNT, "4");

    let config = GameConfig::from_registry(&mut registry).unwrap();
    assert_eq!(*config.players(), 4);
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = empty_env();

    let err = registry.load_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[vars\nusers_amount = ").unwrap();

    let mut registry = empty_env();
    let err = registry.load_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}

#[test]
fn test_file_without_vars_table_uses_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# nothing here").unwrap();

    let mut registry = empty_env();
    registry.load_file(file.path()).unwrap();

    assert_eq!(GameConfig::from_registry(&mut registry).unwrap().board_side(), 3);
}
