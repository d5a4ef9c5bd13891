use std::collections::HashMap as StdHashMap;

use bevy::{platform::collections::HashMap, prelude::*};

use crate::assets::tileset::TiledTilesetAsset;
use crate::document::{TiledDocument, TilesetData};

/// A Tiled JSON map (.tmj / .json) loaded as a Bevy asset.
#[derive(TypePath, Asset, Debug)]
pub struct TiledLevelsMapAsset {
    /// Normalized map data, already cropped if the map is infinite.
    ///
    /// External tilesets are still unresolved here; see [`Self::resolved_document`].
    pub document: TiledDocument,

    /// External tileset handles (Bevy asset system)
    /// Key: Tileset index in `document.tilesets`
    pub tilesets: HashMap<usize, TilesetReference>,
}

#[derive(Debug, Clone)]
pub struct TilesetReference {
    /// Bevy asset handle to the external tileset file
    pub handle: Handle<TiledTilesetAsset>,
    /// First GID of this tileset in the map
    pub first_gid: u32,
    /// Source path as written in the map
    pub source: String,
}

impl TiledLevelsMapAsset {
    /// Clone the document with every loaded external tileset attached.
    ///
    /// Tilesets whose asset is not (or no longer) available stay unresolved,
    /// so their tiles carry no properties.
    pub fn resolved_document(&self, tileset_assets: &Assets<TiledTilesetAsset>) -> TiledDocument {
        let mut document = self.document.clone();
        let by_source: StdHashMap<&str, &TilesetReference> = self
            .tilesets
            .values()
            .map(|reference| (reference.source.as_str(), reference))
            .collect();

        document.resolve_external_tilesets(|source| -> Option<TilesetData> {
            let reference = by_source.get(source)?;
            tileset_assets
                .get(&reference.handle)
                .map(|asset| asset.data.clone())
        });
        document
    }
}
