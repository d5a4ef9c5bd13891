use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::assets::{map::TiledLevelsMapAsset, tileset::TiledTilesetAsset};
use crate::loaders::TiledJsonMapLoader;

/// Plugin that registers the Tiled JSON asset types and loaders
///
/// # Example
/// ```no_run
/// use bevy::prelude::*;
/// use bevy_tiledlevels_assets::TiledLevelsAssetsPlugin;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(TiledLevelsAssetsPlugin)
///     .run();
/// ```
///
/// # What this plugin does
///
/// - Registers `TiledLevelsMapAsset` with a loader for `.tmj` and `.json` maps
/// - Registers `TiledTilesetAsset` with a JSON loader for external `.tsj` tilesets
///
/// # What this plugin does NOT do
///
/// - Level table building and passability queries (that's Layer 2 - `bevy_tiledlevels_core`)
/// - Rendering of any kind
///
/// This is a **Layer 1** plugin: pure asset loading with no game rules.
pub struct TiledLevelsAssetsPlugin;

impl Plugin for TiledLevelsAssetsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(JsonAssetPlugin::<TiledTilesetAsset>::new(&["tsj"]));

        app.init_asset::<TiledLevelsMapAsset>()
            .register_asset_loader(TiledJsonMapLoader);
    }
}
