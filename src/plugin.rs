//! Unified plugin for `bevy_tiledlevels`.

use std::collections::HashMap;

use bevy::prelude::*;

use bevy_tiledlevels_assets::TiledLevelsAssetsPlugin;
use bevy_tiledlevels_core::config::ConfigError;
use bevy_tiledlevels_core::{TiledLevelsConfig, TiledLevelsCorePlugin};

/// Adds asset loading ([`TiledLevelsAssetsPlugin`]) and level tables
/// ([`TiledLevelsCorePlugin`]).
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tiledlevels::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TiledLevelsPlugin::default().with_core(TiledLevelsConfig {
///         half_tile: true,
///         ..Default::default()
///     }))
///     .run();
/// ```
#[derive(Default)]
pub struct TiledLevelsPlugin {
    pub core: TiledLevelsConfig,
}

impl TiledLevelsPlugin {
    pub fn with_core(mut self, config: TiledLevelsConfig) -> Self {
        self.core = config;
        self
    }

    /// Configure from the host's named plugin parameters.
    pub fn from_parameters(params: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Ok(Self {
            core: TiledLevelsConfig::from_parameters(params)?,
        })
    }
}

impl Plugin for TiledLevelsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(TiledLevelsAssetsPlugin);
        app.add_plugins(TiledLevelsCorePlugin::new(self.core.clone()));

        info!("TiledLevelsPlugin initialized");
    }
}
