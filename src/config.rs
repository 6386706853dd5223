//! Configuration variables and the typed game configuration.
//!
//! Variables are registered with a default and resolved with the following precedence:
//!
//! 1. an explicit override (command line)
//! 2. the environment variable `TICTACTERM_<NAME>`
//! 3. the `[vars]` table of an optional TOML file
//! 4. the registered default

use std::collections::BTreeMap;
use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::display::DisplayKind;

/// Prefix of environment variables that override configuration variables.
pub const ENV_PREFIX: &str = "TICTACTERM_";

/// Maximum number of variables a registry holds.
pub const MAX_CONFIG_VARS: usize = 100;

/// Maximum number of players, one per board symbol.
pub const MAX_PLAYERS: usize = 10;

/// Minimum number of players.
pub const MIN_PLAYERS: usize = 2;

/// Name of the player count variable.
pub const USERS_AMOUNT: &str = "users_amount";

/// Name of the display backend variable.
pub const DISPLAY: &str = "display";

/// Name of the ledger capacity variable.
pub const MOVES_CAPACITY: &str = "moves_capacity";

/// Default input device for every user.
pub const DEFAULT_INPUT: &str = "keyboard1";

/// Returns the name of the input variable of 1-based user `n`.
pub fn user_input_var(n: usize) -> String {
    format!("user{n}_input")
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
struct ConfigVar {
    name: String,
    default: String,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    vars: BTreeMap<String, toml::Value>,
}

/// Registry of named configuration variables.
#[derive(Debug, Clone, Default)]
pub struct ConfigRegistry {
    vars: Vec<ConfigVar>,
    overrides: BTreeMap<String, String>,
    env: BTreeMap<String, String>,
    file: BTreeMap<String, String>,
}

impl ConfigRegistry {
    /// Creates a registry reading overrides from the process environment.
    #[instrument]
    pub fn new() -> Self {
        Self::with_env(
            std::env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?))),
        )
    }

    /// Creates a registry with an explicit environment.
    ///
    /// Only entries starting with [`ENV_PREFIX`] are kept.
    pub fn with_env(vars: impl IntoIterator<Item = (String, String)>) -> Self {
        let env = vars
            .into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_lowercase(), value))
            })
            .collect();
        Self {
            env,
            ..Self::default()
        }
    }

    /// Loads the `[vars]` table of a TOML file.
    ///
    /// Non-string values are kept in their TOML representation, so `users_amount = 3`
    /// and `users_amount = "3"` are equivalent.
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        self.load_str(&content)
    }

    /// Loads the `[vars]` table of a TOML document.
    #[instrument(skip(self, content))]
    pub fn load_str(&mut self, content: &str) -> Result<(), ConfigError> {
        let parsed: ConfigFile = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        for (name, value) in parsed.vars {
            let value = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            self.file.insert(name, value);
        }

        info!(vars = self.file.len(), "Config file loaded");
        Ok(())
    }

    /// Overrides a variable regardless of environment, file and default.
    #[instrument(skip(self))]
    pub fn set_var(&mut self, name: &str, value: &str) {
        self.overrides.insert(name.to_string(), value.to_string());
    }

    /// Registers a variable with its default value.
    ///
    /// Registering an existing name replaces its default.
    ///
    /// # Errors
    ///
    /// Fails when the registry already holds [`MAX_CONFIG_VARS`] variables.
    #[instrument(skip(self))]
    pub fn register_var(&mut self, name: &str, default: &str) -> Result<(), ConfigError> {
        if let Some(var) = self.vars.iter_mut().find(|v| v.name == name) {
            debug!("Replacing default of registered variable");
            var.default = default.to_string();
            return Ok(());
        }

        if self.vars.len() >= MAX_CONFIG_VARS {
            warn!(capacity = MAX_CONFIG_VARS, "Config registry is full");
            return Err(ConfigError::new(format!(
                "Unable to register '{}', registry holds at most {} variables",
                name, MAX_CONFIG_VARS
            )));
        }

        self.vars
            .push(ConfigVar::new(name.to_string(), default.to_string()));
        Ok(())
    }

    /// Returns the resolved value of a registered variable.
    #[instrument(skip(self))]
    pub fn get_var(&self, name: &str) -> Option<String> {
        let Some(var) = self.vars.iter().find(|v| v.name == name) else {
            error!("Config variable is not registered");
            return None;
        };

        let value = self
            .overrides
            .get(name)
            .or_else(|| self.env.get(name))
            .or_else(|| self.file.get(name))
            .unwrap_or(&var.default)
            .clone();

        debug!(%value, "Resolved config variable");
        Some(value)
    }

    /// Returns the names of all registered variables in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|v| v.name.as_str())
    }

    fn require(&self, name: &str) -> Result<String, ConfigError> {
        self.get_var(name)
            .ok_or_else(|| ConfigError::new(format!("Variable '{}' is not registered", name)))
    }

    fn parse_usize(&self, name: &str) -> Result<usize, ConfigError> {
        let raw = self.require(name)?;
        raw.trim().parse().map_err(|e| {
            ConfigError::new(format!("Invalid value '{}' for {}: {}", raw, name, e))
        })
    }
}

/// Validated game settings.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GameConfig {
    /// Number of players.
    players: usize,
    /// Input device name of each user, index 0 is user 1.
    inputs: Vec<String>,
    /// Display backend.
    display: DisplayKind,
    /// Maximum number of recorded moves.
    moves_capacity: usize,
}

impl GameConfig {
    /// Registers the game variables in `registry` and reads them back.
    ///
    /// `user<N>_input` variables are registered once the player count is known.
    ///
    /// # Errors
    ///
    /// Fails on unparsable values, a player count outside `2..=10`, an unknown display
    /// backend, or a zero ledger capacity.
    #[instrument(skip(registry))]
    pub fn from_registry(registry: &mut ConfigRegistry) -> Result<Self, ConfigError> {
        registry.register_var(USERS_AMOUNT, "2")?;
        registry.register_var(DISPLAY, "cli")?;
        registry.register_var(
            MOVES_CAPACITY,
            &tictacterm_core::DEFAULT_LEDGER_CAPACITY.to_string(),
        )?;

        let players = registry.parse_usize(USERS_AMOUNT)?;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            error!(players, "Invalid player count");
            return Err(ConfigError::new(format!(
                "Invalid {} value {}, expected {} to {}",
                USERS_AMOUNT, players, MIN_PLAYERS, MAX_PLAYERS
            )));
        }

        let inputs = (1..=players)
            .map(|n| {
                let name = user_input_var(n);
                registry.register_var(&name, DEFAULT_INPUT)?;
                registry.require(&name)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let display_name = registry.require(DISPLAY)?;
        let backend: DisplayKind = display_name.parse().map_err(|_| {
            ConfigError::new(format!("Unknown display backend '{}'", display_name))
        })?;

        let moves_capacity = registry.parse_usize(MOVES_CAPACITY)?;
        if moves_capacity == 0 {
            return Err(ConfigError::new(format!(
                "{} must be greater than zero",
                MOVES_CAPACITY
            )));
        }

        info!(players, %backend, moves_capacity, "Game configured");
        Ok(Self {
            players,
            inputs,
            display: backend,
            moves_capacity,
        })
    }

    /// Returns the board side length, one more than the number of players.
    pub fn board_side(&self) -> usize {
        self.players + 1
    }

    /// Renders the configuration as a TOML `[vars]` table.
    ///
    /// # Errors
    ///
    /// Fails if serialization fails.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let mut vars = toml::Table::new();
        vars.insert(USERS_AMOUNT.to_string(), toml::Value::from(self.players as i64));
        for (i, input) in self.inputs.iter().enumerate() {
            vars.insert(user_input_var(i + 1), toml::Value::from(input.as_str()));
        }
        vars.insert(DISPLAY.to_string(), toml::Value::from(self.display.to_string()));
        vars.insert(
            MOVES_CAPACITY.to_string(),
            toml::Value::from(self.moves_capacity as i64),
        );

        let mut root = toml::Table::new();
        root.insert("vars".to_string(), toml::Value::Table(vars));
        toml::to_string(&root)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> ConfigRegistry {
        ConfigRegistry::with_env(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_default_is_returned() {
        let mut registry = env(&[]);
        registry.register_var("users_amount", "2").unwrap();
        assert_eq!(registry.get_var("users_amount").as_deref(), Some("2"));
    }

    #[test]
    fn test_unregistered_variable_is_none() {
        let registry = env(&[("TICTACTERM_USERS_AMOUNT", "3")]);
        assert_eq!(registry.get_var("users_amount"), None);
    }

    #[test]
    fn test_precedence() {
        let mut registry = env(&[("TICTACTERM_DISPLAY", "env"), ("OTHER_DISPLAY", "x")]);
        registry
            .load_str("[vars]\ndisplay = \"file\"\nusers_amount = 4\n")
            .unwrap();
        registry.register_var("display", "default").unwrap();
        registry.register_var("users_amount", "2").unwrap();

        assert_eq!(registry.get_var("display").as_deref(), Some("env"));
        assert_eq!(registry.get_var("users_amount").as_deref(), Some("4"));

        registry.set_var("display", "override");
        assert_eq!(registry.get_var("display").as_deref(), Some("override"));
    }

    #[test]
    fn test_registry_capacity() {
        let mut registry = env(&[]);
        for i in 0..MAX_CONFIG_VARS {
            registry.register_var(&format!("var{i}"), "x").unwrap();
        }
        assert!(registry.register_var("one_more", "x").is_err());
        assert!(registry.register_var("var0", "y").is_ok());
        assert_eq!(registry.get_var("var0").as_deref(), Some("y"));
    }

    #[test]
    fn test_game_config_defaults() {
        let mut registry = env(&[]);
        let config = GameConfig::from_registry(&mut registry).unwrap();

        assert_eq!(*config.players(), 2);
        assert_eq!(config.inputs(), &vec!["keyboard1".to_string(); 2]);
        assert_eq!(*config.display(), DisplayKind::Cli);
        assert_eq!(config.board_side(), 3);
        assert!(registry.names().any(|n| n == "user2_input"));
    }

    #[test]
    fn test_player_count_bounds() {
        for bad in ["1", "11", "two"] {
            let mut registry = env(&[("TICTACTERM_USERS_AMOUNT", bad)]);
            assert!(GameConfig::from_registry(&mut registry).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_unknown_display_is_rejected() {
        let mut registry = env(&[("TICTACTERM_DISPLAY", "gtk")]);
        assert!(GameConfig::from_registry(&mut registry).is_err());
    }

    #[test]
    fn test_to_toml_round_trips_through_registry() {
        let mut registry = env(&[("TICTACTERM_USER2_INPUT", "keyboard2")]);
        let config = GameConfig::from_registry(&mut registry).unwrap();

        let mut reloaded = env(&[]);
        reloaded.load_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(GameConfig::from_registry(&mut reloaded).unwrap(), config);
    }
}
