use bevy::prelude::*;
use serde::Deserialize;

use crate::document::TilesetData;

/// Bevy asset wrapper for external Tiled JSON tilesets (.tsj files)
///
/// Loaded through `bevy_common_assets`' JSON loader; only the data the level
/// tables need (tile count and per-tile properties) is kept.
#[derive(TypePath, Asset, Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct TiledTilesetAsset {
    pub data: TilesetData,
}

impl TiledTilesetAsset {
    /// Number of tiles in the tileset.
    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.data.tile_count
    }
}
