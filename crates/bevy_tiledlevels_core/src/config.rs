//! Plugin configuration.

use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Parameter names as the host exposes them.
pub const PARAM_HALF_TILE: &str = "Half-tile movement";
pub const PARAM_MAP_LEVEL_VARIABLE: &str = "Map Level Variable";
pub const PARAM_CUSTOM_TILE_FLAGS: &str = "Custom Tile Flags";
pub const PARAM_PRIORITY_TILES_LIMIT: &str = "Priority Tiles Limit";

/// Configuration for `TiledLevelsCorePlugin`.
///
/// # Example
///
/// ```rust,no_run
/// use bevy_tiledlevels_core::TiledLevelsConfig;
///
/// let config = TiledLevelsConfig {
///     half_tile: true,
///     custom_tile_flags: vec!["swamp".into()],
///     ..Default::default()
/// };
/// ```
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TiledLevelsConfig {
    /// Split every authored cell into a 2x2 block of movement cells.
    pub half_tile: bool,
    /// Game variable holding the current level. 0 keeps the level internally.
    pub map_level_variable: u32,
    /// Tile flags registered after the built-in ones.
    pub custom_tile_flags: Vec<String>,
    /// Fail a pending map load that takes longer than this.
    pub load_timeout: Option<Duration>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Parameter '{name}' is not a boolean: '{value}'")]
    InvalidBool { name: &'static str, value: String },

    #[error("Parameter '{name}' is not a variable id: '{value}'")]
    InvalidVariable { name: &'static str, value: String },

    #[error("Parameter '{name}' is not a JSON array of flag names: {source}")]
    InvalidFlagList {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl TiledLevelsConfig {
    /// Read the host's named plugin parameters.
    ///
    /// Missing or empty parameters keep their defaults.
    /// "Priority Tiles Limit" belongs to rendering and is ignored.
    pub fn from_parameters(params: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let param = |name: &str| {
            params
                .get(name)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        if let Some(value) = param(PARAM_HALF_TILE) {
            config.half_tile = match value {
                "true" | "on" | "1" => true,
                "false" | "off" | "0" => false,
                _ => {
                    return Err(ConfigError::InvalidBool {
                        name: PARAM_HALF_TILE,
                        value: value.to_string(),
                    });
                }
            };
        }

        if let Some(value) = param(PARAM_MAP_LEVEL_VARIABLE) {
            config.map_level_variable =
                value
                    .parse()
                    .map_err(|_| ConfigError::InvalidVariable {
                        name: PARAM_MAP_LEVEL_VARIABLE,
                        value: value.to_string(),
                    })?;
        }

        if let Some(value) = param(PARAM_CUSTOM_TILE_FLAGS) {
            config.custom_tile_flags =
                serde_json::from_str(value).map_err(|source| ConfigError::InvalidFlagList {
                    name: PARAM_CUSTOM_TILE_FLAGS,
                    source,
                })?;
        }

        if params.contains_key(PARAM_PRIORITY_TILES_LIMIT) {
            debug!("Ignoring '{}'", PARAM_PRIORITY_TILES_LIMIT);
        }

        Ok(config)
    }
}
