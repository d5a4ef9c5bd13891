//! # `bevy_tiledlevels_assets`
//!
//! Layer 1 of `bevy_tiledlevels`: Tiled JSON maps and tilesets as Bevy assets.
//!
//! The [`document`] module is usable without an `App`: it turns raw Tiled
//! JSON into a [`TiledDocument`](document::TiledDocument) with flattened
//! layers, decoded cells, tileset tile properties and cropped infinite maps.

pub mod assets;
pub mod crop;
pub mod document;
pub mod error;
pub mod loaders;
pub mod plugin;
pub mod properties;

pub mod prelude {
    //! Common imports for `bevy_tiledlevels_assets` users.

    pub use crate::assets::map::{TiledLevelsMapAsset, TilesetReference};
    pub use crate::assets::tileset::TiledTilesetAsset;
    pub use crate::crop::{AutoSize, Border, InfiniteMapCropper, MapBounds};
    pub use crate::document::{
        CellOffset, Chunk, GID_MASK, LayerCells, LayerKind, LayerRecord, ObjectRecord,
        TiledDocument, TilesetData, TilesetRecord,
    };
    pub use crate::error::DocumentError;
    pub use crate::plugin::TiledLevelsAssetsPlugin;
    pub use crate::properties::{Properties, PropertyKey};
}

pub use plugin::TiledLevelsAssetsPlugin;
