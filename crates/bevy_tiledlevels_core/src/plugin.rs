//! Plugin for `bevy_tiledlevels_core`.

use std::sync::Arc;

use bevy::prelude::*;

use crate::config::TiledLevelsConfig;
use crate::load::{MapLoadState, poll_map_load, request_map_load};
use crate::rules::MapRules;
use crate::service::MapQueryService;

/// Plugin building level tables for loaded Tiled maps.
///
/// Add this plugin after `TiledLevelsAssetsPlugin`. Registries are frozen
/// here: register extra tile flags and hide predicates with
/// `inventory::submit!` or through [`TiledLevelsConfig::custom_tile_flags`].
///
/// # Example
///
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_tiledlevels_assets::TiledLevelsAssetsPlugin;
/// use bevy_tiledlevels_core::{TiledLevelsConfig, TiledLevelsCorePlugin};
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(AssetPlugin::default())
///     .add_plugins(TiledLevelsAssetsPlugin)
///     .add_plugins(TiledLevelsCorePlugin::new(TiledLevelsConfig {
///         half_tile: true,
///         ..Default::default()
///     }));
/// ```
#[derive(Default)]
pub struct TiledLevelsCorePlugin {
    config: TiledLevelsConfig,
}

impl TiledLevelsCorePlugin {
    /// Create a new plugin with custom configuration.
    pub fn new(config: TiledLevelsConfig) -> Self {
        Self { config }
    }
}

impl Plugin for TiledLevelsCorePlugin {
    fn build(&self, app: &mut App) {
        let rules = Arc::new(MapRules::build(&self.config));

        app.insert_resource(MapQueryService::new(rules, &self.config))
            .insert_resource(self.config.clone())
            .init_resource::<MapLoadState>();

        app.add_observer(request_map_load);
        app.add_systems(PreUpdate, poll_map_load);

        info!(
            "TiledLevelsCorePlugin built (half-tile: {}, level variable: {})",
            self.config.half_tile, self.config.map_level_variable
        );
    }
}
