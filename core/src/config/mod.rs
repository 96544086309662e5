//! Application configuration and the player binding table.
//!
//! Two layers: `AppConfig` (hub endpoint and table location) persists via
//! confy in the platform config directory, while the binding table itself
//! is a user-edited TOML file of `[[player]]` records that can be reloaded
//! without restarting.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sparrow_types::PlayerBindings;
use thiserror::Error;
use tracing::error;

pub const APP_NAME: &str = "sparrow";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the strength hub.
    pub hub_host: String,
    /// Hub client to address; "all" broadcasts to every registered client.
    pub client_id: String,
    /// Binding table location; `None` falls back to the config directory.
    pub players_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hub_host: "http://127.0.0.1:8920".to_string(),
            client_id: "all".to_string(),
            players_file: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        match confy::load(APP_NAME, None) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "failed to load app config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Err(e) = confy::store(APP_NAME, None, self) {
            error!(error = %e, "failed to persist app config");
        }
    }

    /// Resolved binding-table path: the configured one, or
    /// `<config dir>/sparrow/players.toml`.
    pub fn players_path(&self) -> Option<PathBuf> {
        self.players_file
            .clone()
            .or_else(|| dirs::config_dir().map(|p| p.join(APP_NAME).join("players.toml")))
    }
}

/// Top-level shape of the binding table file.
#[derive(Debug, Default, Deserialize)]
pub struct PlayersTable {
    #[serde(default, rename = "player")]
    pub players: Vec<PlayerBindings>,
}

/// Load the binding table from a TOML file.
pub fn load_players(path: &Path) -> Result<Vec<PlayerBindings>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table: PlayersTable = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(table.players)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
