use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    platform::collections::HashMap,
    prelude::*,
    tasks::ConditionalSendFuture,
};
use normalize_path::NormalizePath;
use thiserror::Error;

use crate::assets::{
    map::{TiledLevelsMapAsset, TilesetReference},
    tileset::TiledTilesetAsset,
};
use crate::document::TiledDocument;
use crate::error::DocumentError;

/// Asset loader for Tiled JSON maps (.tmj / .json files)
///
/// This loader:
/// - Normalizes the map into a [`TiledDocument`]
/// - Crops infinite maps (`autoSize` / `border` map properties)
/// - Registers external tilesets (.tsj) as load dependencies
#[derive(Default)]
pub struct TiledJsonMapLoader;

#[derive(Debug, Error)]
pub enum MapLoaderError {
    #[error("Failed to load map: {0}")]
    Document(#[from] DocumentError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl AssetLoader for TiledJsonMapLoader {
    type Asset = TiledLevelsMapAsset;
    type Settings = ();
    type Error = MapLoaderError;

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        load_context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;

            // 1. Parse, normalize and crop
            let document = TiledDocument::from_slice(&bytes)?;

            // 2. Load external tileset dependencies
            // Key by tileset index (position in document.tilesets)
            let mut tilesets = HashMap::default();
            for (tileset_index, tileset) in document.tilesets.iter().enumerate() {
                let Some(source) = tileset.source.as_deref() else {
                    continue;
                };
                let tileset_path = resolve_relative_path(load_context, source)?;
                let handle: Handle<TiledTilesetAsset> = load_context.load(tileset_path);

                tilesets.insert(
                    tileset_index,
                    TilesetReference {
                        handle,
                        first_gid: tileset.first_gid,
                        source: source.to_string(),
                    },
                );
            }

            debug!(
                "Loaded Tiled map {:?}: {}x{} cells, {} layers, {} external tilesets",
                load_context.asset_path(),
                document.width,
                document.height,
                document.layers.len(),
                tilesets.len()
            );

            Ok(TiledLevelsMapAsset { document, tilesets })
        }
    }

    fn extensions(&self) -> &[&str] {
        &["tmj", "json"]
    }
}

/// Resolve relative path from Tiled file to Bevy asset path
///
/// Tiled uses relative paths like `../tilesets/terrain.tsj`, but Bevy's asset
/// system expects asset-root-relative paths like `tilesets/terrain.tsj`.
fn resolve_relative_path(
    load_context: &LoadContext,
    relative_path: &str,
) -> Result<String, MapLoaderError> {
    // Already asset-root-relative
    if let Some(stripped) = relative_path.strip_prefix("assets/") {
        return Ok(stripped.to_string());
    }

    let parent = load_context.asset_path().path().parent().ok_or_else(|| {
        MapLoaderError::InvalidPath(format!(
            "No parent directory for asset: {:?}",
            load_context.asset_path().path()
        ))
    })?;

    // Path::join does not resolve `..`
    let normalized = parent.join(relative_path).normalize();

    let asset_path = normalized
        .to_str()
        .ok_or_else(|| {
            MapLoaderError::InvalidPath(format!("Invalid UTF-8 in path: {:?}", normalized))
        })?
        .replace('\\', "/");

    Ok(asset_path)
}
