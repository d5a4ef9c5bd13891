//! Normalized in-memory model of a Tiled JSON map.
//!
//! [`TiledDocument::load`] performs structural normalization only: it flattens
//! group layers, decodes layer data, collects tileset tile properties and keeps
//! object groups. It does not interpret any game rule; that is Layer 2's job.

use std::collections::HashMap;

use bevy::log::warn;
use serde::Deserialize;
use serde_json::Value;

use crate::crop::{InfiniteMapCropper, MapBounds};
use crate::error::DocumentError;
use crate::properties::{Properties, PropertyKey};

/// Mask that strips Tiled's flip and rotation bits from a global tile id.
pub const GID_MASK: u32 = 0x0FFF_FFFF;

/// Cell offset of a cropped infinite map.
///
/// Absolute cell `(x, y)` in the authored map is cell `(x - offset.x, y - offset.y)`
/// in the loaded map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellOffset {
    pub x: i32,
    pub y: i32,
}

/// A parsed, normalized Tiled map.
#[derive(Debug, Clone)]
pub struct TiledDocument {
    /// Width in cells (post-crop for infinite maps).
    pub width: u32,
    /// Height in cells (post-crop for infinite maps).
    pub height: u32,
    /// Authored tile width in pixels.
    pub tile_width: u32,
    /// Authored tile height in pixels.
    pub tile_height: u32,
    /// Whether the map was authored as an infinite (chunked) map.
    pub infinite: bool,
    /// Offset applied by the infinite map cropper.
    pub offset: CellOffset,
    /// Map-level custom properties.
    pub properties: Properties,
    /// Flattened layers; a layer's position is its [`LayerRecord::id`].
    pub layers: Vec<LayerRecord>,
    /// Tilesets in declaration order.
    pub tilesets: Vec<TilesetRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    TileLayer,
    ObjectGroup,
    ImageLayer,
    Group,
}

/// One entry of [`TiledDocument::layers`].
#[derive(Debug, Clone)]
pub struct LayerRecord {
    /// Position in the flattened layer list. Stable handle for overrides.
    pub id: usize,
    pub name: String,
    pub kind: LayerKind,
    pub properties: Properties,
    pub cells: LayerCells,
    /// Objects of an object group; empty for every other kind.
    pub objects: Vec<ObjectRecord>,
}

impl LayerRecord {
    /// The level partition this layer belongs to (`level` property, default 0).
    pub fn level(&self) -> i32 {
        self.properties.get_int(PropertyKey::Level).unwrap_or(0)
    }

    pub fn is_tile_layer(&self) -> bool {
        self.kind == LayerKind::TileLayer
    }
}

/// Tile storage of a layer.
#[derive(Debug, Clone, Default)]
pub enum LayerCells {
    /// Non-tile layers.
    #[default]
    None,
    /// Row-major global tile ids, `width * height` long. 0 is empty.
    Dense(Vec<u32>),
    /// Chunks of an infinite map, in absolute cell coordinates.
    Chunked(Vec<Chunk>),
}

/// A rectangular block of an infinite tile layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub data: Vec<u32>,
}

impl Chunk {
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && i64::from(x) < i64::from(self.x) + i64::from(self.width)
            && i64::from(y) < i64::from(self.y) + i64::from(self.height)
    }

    /// Masked global tile id at absolute cell `(x, y)`, if the chunk covers it.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<u32> {
        if !self.contains(x, y) {
            return None;
        }
        let local = (y - self.y) as usize * self.width as usize + (x - self.x) as usize;
        Some(self.data.get(local).copied().unwrap_or(0) & GID_MASK)
    }

    /// Absolute coordinates of every non-empty cell.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let width = self.width.max(1) as usize;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, gid)| **gid & GID_MASK != 0)
            .map(move |(i, _)| (self.x + (i % width) as i32, self.y + (i / width) as i32))
    }
}

/// An object of an object group, in authored pixel coordinates.
#[derive(Debug, Clone)]
pub struct ObjectRecord {
    pub id: u32,
    pub name: String,
    /// Tiled `class` (or legacy `type`).
    pub class: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Global tile id for tile objects.
    pub gid: Option<u32>,
    pub properties: Properties,
}

/// Tileset content shared by embedded tilesets and external tileset files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawTileset")]
pub struct TilesetData {
    pub name: String,
    /// Number of global ids this tileset owns.
    pub tile_count: u32,
    pub properties: Properties,
    /// Per-tile properties keyed by local tile index.
    pub tile_properties: HashMap<u32, Properties>,
}

/// A tileset as declared by the map.
#[derive(Debug, Clone)]
pub struct TilesetRecord {
    pub first_gid: u32,
    /// Source file of an external tileset.
    pub source: Option<String>,
    /// `false` until an external tileset has been attached.
    pub resolved: bool,
    pub data: TilesetData,
}

impl TilesetRecord {
    /// Whether `gid` (already masked) falls in `[first_gid, first_gid + tile_count)`.
    pub fn contains(&self, gid: u32) -> bool {
        gid >= self.first_gid && u64::from(gid) < u64::from(self.first_gid) + u64::from(self.data.tile_count)
    }

    /// Properties of the tile with global id `gid`, if this tileset owns it.
    pub fn tile_properties(&self, gid: u32) -> Option<&Properties> {
        if !self.contains(gid) {
            return None;
        }
        self.data.tile_properties.get(&(gid - self.first_gid))
    }
}

impl TiledDocument {
    /// Normalize a raw Tiled JSON map.
    ///
    /// Fails with [`DocumentError::MalformedDocument`] when `layers` or
    /// `tilesets` is absent. Infinite maps keep their chunks; call
    /// [`TiledDocument::fit_bounds`] (or use [`TiledDocument::from_slice`])
    /// to crop them.
    pub fn load(json: &Value) -> Result<Self, DocumentError> {
        let Some(object) = json.as_object() else {
            return Err(DocumentError::MalformedDocument(
                "document root is not an object".into(),
            ));
        };
        for field in ["layers", "tilesets"] {
            if !object.get(field).is_some_and(Value::is_array) {
                return Err(DocumentError::MalformedDocument(format!(
                    "missing '{field}' array"
                )));
            }
        }

        let raw = RawMap::deserialize(json)?;

        let mut layers = Vec::new();
        flatten_layers(raw.layers, raw.infinite, &mut layers)?;

        let tilesets = raw
            .tilesets
            .into_iter()
            .map(|tileset| {
                let first_gid = tileset.firstgid;
                let source = tileset.source.clone();
                TilesetRecord {
                    first_gid,
                    resolved: source.is_none(),
                    source,
                    data: TilesetData::from(tileset),
                }
            })
            .collect();

        let document = Self {
            width: raw.width,
            height: raw.height,
            tile_width: raw.tilewidth,
            tile_height: raw.tileheight,
            infinite: raw.infinite,
            offset: CellOffset::default(),
            properties: raw.properties,
            layers,
            tilesets,
        };

        if !document.infinite {
            document.check_layer_lengths();
        }
        Ok(document)
    }

    /// Parse bytes and crop infinite maps to their content.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DocumentError> {
        let json: Value = serde_json::from_slice(bytes)?;
        let mut document = Self::load(&json)?;
        document.fit_bounds();
        Ok(document)
    }

    /// Crop an infinite map using its `autoSize` and `border` properties.
    ///
    /// No-op for finite maps.
    pub fn fit_bounds(&mut self) {
        if !self.infinite {
            return;
        }
        let bounds = InfiniteMapCropper::from_document(self).bounds();
        self.apply_bounds(bounds);
    }

    /// Overwrite dimensions and offset, then densify chunked layers.
    ///
    /// After this call every tile layer holds `width * height` cells addressed
    /// relative to the new offset.
    pub fn apply_bounds(&mut self, bounds: MapBounds) {
        self.width = bounds.width;
        self.height = bounds.height;
        self.offset = CellOffset {
            x: bounds.x,
            y: bounds.y,
        };

        let (width, height, offset) = (self.width, self.height, self.offset);
        for layer in &mut self.layers {
            let LayerCells::Chunked(chunks) = &layer.cells else {
                continue;
            };
            let mut dense = vec![0u32; width as usize * height as usize];
            for chunk in chunks {
                for (x, y) in chunk.occupied_cells() {
                    let (local_x, local_y) = (x - offset.x, y - offset.y);
                    if local_x < 0
                        || local_y < 0
                        || local_x >= width as i32
                        || local_y >= height as i32
                    {
                        continue;
                    }
                    dense[local_y as usize * width as usize + local_x as usize] =
                        chunk.tile_at(x, y).unwrap_or(0);
                }
            }
            layer.cells = LayerCells::Dense(dense);
        }
    }

    /// Attach external tilesets through a loader keyed by source filename.
    ///
    /// Returns how many external tilesets stayed unresolved; their tiles
    /// resolve to no tileset.
    pub fn resolve_external_tilesets(
        &mut self,
        mut loader: impl FnMut(&str) -> Option<TilesetData>,
    ) -> usize {
        let mut unresolved = 0;
        for tileset in &mut self.tilesets {
            if tileset.resolved {
                continue;
            }
            let Some(source) = tileset.source.as_deref() else {
                continue;
            };
            match loader(source) {
                Some(data) => {
                    tileset.data = data;
                    tileset.resolved = true;
                }
                None => {
                    warn!("External tileset '{}' could not be resolved", source);
                    unresolved += 1;
                }
            }
        }
        unresolved
    }

    /// The tileset owning `gid`, first match in declaration order.
    ///
    /// Returns `None` for the empty tile (0) and for ids no tileset claims.
    pub fn resolve_tileset(&self, gid: u32) -> Option<&TilesetRecord> {
        let gid = gid & GID_MASK;
        if gid == 0 {
            return None;
        }
        self.tilesets.iter().find(|tileset| tileset.contains(gid))
    }

    /// Tile properties of `gid`, or `None` if the tile is unresolved or has none.
    pub fn tile_properties(&self, gid: u32) -> Option<&Properties> {
        let gid = gid & GID_MASK;
        self.resolve_tileset(gid)?.tile_properties(gid)
    }

    /// Masked global tile id of cell `index` (`x + width * y`) in `layer`.
    ///
    /// Chunk-backed layers are searched for the owning chunk; cells no chunk
    /// covers are empty.
    pub fn extract_tile_id(&self, layer: &LayerRecord, index: usize) -> u32 {
        match &layer.cells {
            LayerCells::None => 0,
            LayerCells::Dense(data) => data.get(index).copied().unwrap_or(0) & GID_MASK,
            LayerCells::Chunked(chunks) => {
                if self.width == 0 {
                    return 0;
                }
                let x = (index % self.width as usize) as i32 + self.offset.x;
                let y = (index / self.width as usize) as i32 + self.offset.y;
                chunks
                    .iter()
                    .find_map(|chunk| chunk.tile_at(x, y))
                    .unwrap_or(0)
            }
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn tile_layers(&self) -> impl Iterator<Item = &LayerRecord> {
        self.layers.iter().filter(|layer| layer.is_tile_layer())
    }

    pub fn layer(&self, id: usize) -> Option<&LayerRecord> {
        self.layers.get(id)
    }

    /// Convert an authored pixel position to a cell of the loaded map.
    ///
    /// The crop offset is subtracted, so objects and spawn points of a
    /// cropped infinite map land on the right cell.
    pub fn pixel_to_cell(&self, px: f32, py: f32) -> (i32, i32) {
        let x = (px / self.tile_width.max(1) as f32).floor() as i32;
        let y = (py / self.tile_height.max(1) as f32).floor() as i32;
        (x - self.offset.x, y - self.offset.y)
    }

    /// Cell of an object's origin in the loaded map.
    pub fn object_cell(&self, object: &ObjectRecord) -> (i32, i32) {
        self.pixel_to_cell(object.x, object.y)
    }

    fn check_layer_lengths(&self) {
        let expected = self.cell_count();
        for layer in self.tile_layers() {
            if let LayerCells::Dense(data) = &layer.cells
                && data.len() != expected
            {
                warn!(
                    "Layer '{}' has {} cells, expected {}; missing cells are empty",
                    layer.name,
                    data.len(),
                    expected
                );
            }
        }
    }
}

// ===== RAW JSON SHAPES =====

#[derive(Deserialize)]
struct RawMap {
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    properties: Properties,
    layers: Vec<RawLayer>,
    tilesets: Vec<RawTileset>,
}

#[derive(Deserialize)]
struct RawLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    properties: Properties,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    chunks: Option<Vec<RawChunk>>,
    #[serde(default)]
    layers: Vec<RawLayer>,
    #[serde(default)]
    objects: Vec<RawObject>,
}

#[derive(Deserialize)]
struct RawChunk {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    data: Value,
}

#[derive(Deserialize)]
struct RawObject {
    #[serde(default)]
    id: u32,
    #[serde(default)]
    name: String,
    #[serde(default, rename = "type")]
    legacy_type: String,
    #[serde(default)]
    class: String,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default)]
    properties: Properties,
}

#[derive(Deserialize)]
struct RawTileset {
    #[serde(default = "first_gid_default")]
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tilecount: u32,
    #[serde(default)]
    properties: Properties,
    #[serde(default)]
    tiles: Vec<RawTile>,
    #[serde(default)]
    tileproperties: HashMap<String, Properties>,
}

#[derive(Deserialize)]
struct RawTile {
    id: u32,
    #[serde(default)]
    properties: Properties,
}

fn first_gid_default() -> u32 {
    1
}

impl From<RawTileset> for TilesetData {
    fn from(raw: RawTileset) -> Self {
        let mut tile_properties: HashMap<u32, Properties> = raw
            .tileproperties
            .into_iter()
            .filter_map(|(id, props)| Some((id.parse::<u32>().ok()?, props)))
            .collect();
        for tile in raw.tiles {
            if !tile.properties.is_empty() {
                tile_properties.insert(tile.id, tile.properties);
            }
        }

        // Image collections may use sparse ids beyond `tilecount`.
        let highest = tile_properties.keys().max().map_or(0, |id| id + 1);

        Self {
            name: raw.name,
            tile_count: raw.tilecount.max(highest),
            properties: raw.properties,
            tile_properties,
        }
    }
}

fn flatten_layers(
    raw_layers: Vec<RawLayer>,
    infinite: bool,
    out: &mut Vec<LayerRecord>,
) -> Result<(), DocumentError> {
    for raw in raw_layers {
        let kind = match raw.kind.as_str() {
            "tilelayer" => LayerKind::TileLayer,
            "objectgroup" => LayerKind::ObjectGroup,
            "imagelayer" => LayerKind::ImageLayer,
            "group" => LayerKind::Group,
            other => {
                return Err(DocumentError::MalformedDocument(format!(
                    "layer '{}' has unknown type '{}'",
                    raw.name, other
                )));
            }
        };

        let cells = if kind == LayerKind::TileLayer {
            decode_cells(&raw, infinite)?
        } else {
            LayerCells::None
        };

        let objects = raw
            .objects
            .into_iter()
            .map(|object| ObjectRecord {
                id: object.id,
                name: object.name,
                class: if object.class.is_empty() {
                    object.legacy_type
                } else {
                    object.class
                },
                x: object.x,
                y: object.y,
                width: object.width,
                height: object.height,
                gid: object.gid,
                properties: object.properties,
            })
            .collect();

        out.push(LayerRecord {
            id: out.len(),
            name: raw.name,
            kind,
            properties: raw.properties,
            cells,
            objects,
        });

        if kind == LayerKind::Group {
            flatten_layers(raw.layers, infinite, out)?;
        }
    }
    Ok(())
}

fn decode_cells(raw: &RawLayer, infinite: bool) -> Result<LayerCells, DocumentError> {
    if let Some(encoding) = raw.encoding.as_deref()
        && encoding != "csv"
    {
        return Err(DocumentError::UnsupportedEncoding {
            layer: raw.name.clone(),
            encoding: encoding.to_string(),
        });
    }

    if infinite {
        let Some(chunks) = &raw.chunks else {
            return Ok(LayerCells::Chunked(Vec::new()));
        };
        let chunks = chunks
            .iter()
            .map(|chunk| {
                Ok(Chunk {
                    x: chunk.x,
                    y: chunk.y,
                    width: chunk.width,
                    height: chunk.height,
                    data: decode_gids(&raw.name, &chunk.data)?,
                })
            })
            .collect::<Result<Vec<_>, DocumentError>>()?;
        return Ok(LayerCells::Chunked(chunks));
    }

    match &raw.data {
        Some(data) => Ok(LayerCells::Dense(decode_gids(&raw.name, data)?)),
        None => Ok(LayerCells::Dense(Vec::new())),
    }
}

fn decode_gids(layer: &str, data: &Value) -> Result<Vec<u32>, DocumentError> {
    match data {
        Value::Array(values) => Ok(values
            .iter()
            .map(|v| v.as_u64().map_or(0, |gid| gid as u32))
            .collect()),
        Value::String(_) => Err(DocumentError::UnsupportedEncoding {
            layer: layer.to_string(),
            encoding: "base64".into(),
        }),
        _ => Err(DocumentError::MalformedDocument(format!(
            "layer '{layer}' data is neither an array nor a string"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tileset(first_gid: u32, tile_count: u32) -> TilesetRecord {
        TilesetRecord {
            first_gid,
            source: None,
            resolved: true,
            data: TilesetData {
                tile_count,
                ..Default::default()
            },
        }
    }

    fn document_with_tilesets(tilesets: Vec<TilesetRecord>) -> TiledDocument {
        TiledDocument {
            width: 0,
            height: 0,
            tile_width: 48,
            tile_height: 48,
            infinite: false,
            offset: CellOffset::default(),
            properties: Properties::new(),
            layers: Vec::new(),
            tilesets,
        }
    }

    #[test]
    fn test_missing_layers_is_malformed() {
        let err = TiledDocument::load(&json!({"tilesets": []})).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedDocument(_)));

        let err = TiledDocument::load(&json!({"layers": []})).unwrap_err();
        assert!(matches!(err, DocumentError::MalformedDocument(_)));
    }

    #[test]
    fn test_resolve_tileset_ranges() {
        let doc = document_with_tilesets(vec![tileset(1, 10), tileset(11, 5)]);

        assert!(doc.resolve_tileset(0).is_none());
        assert_eq!(doc.resolve_tileset(1).map(|t| t.first_gid), Some(1));
        assert_eq!(doc.resolve_tileset(10).map(|t| t.first_gid), Some(1));
        assert_eq!(doc.resolve_tileset(11).map(|t| t.first_gid), Some(11));
        assert_eq!(doc.resolve_tileset(15).map(|t| t.first_gid), Some(11));
        assert!(doc.resolve_tileset(16).is_none());
    }

    #[test]
    fn test_resolve_tileset_overlap_first_match_wins() {
        // Second tileset claims 5..25, overlapping the first one's 1..11.
        let doc = document_with_tilesets(vec![tileset(1, 10), tileset(5, 20)]);

        for gid in 1..11 {
            assert_eq!(doc.resolve_tileset(gid).map(|t| t.first_gid), Some(1));
        }
        for gid in 11..25 {
            assert_eq!(doc.resolve_tileset(gid).map(|t| t.first_gid), Some(5));
        }
        assert!(doc.resolve_tileset(25).is_none());
    }

    #[test]
    fn test_resolve_tileset_masks_flip_bits() {
        let doc = document_with_tilesets(vec![tileset(1, 10)]);
        let flipped = 0x8000_0000 | 3;

        assert_eq!(doc.resolve_tileset(flipped).map(|t| t.first_gid), Some(1));
    }

    #[test]
    fn test_load_flattens_groups_and_reads_tile_properties() {
        let doc = TiledDocument::load(&json!({
            "width": 2, "height": 1, "tilewidth": 48, "tileheight": 48,
            "layers": [
                {"type": "group", "name": "g", "layers": [
                    {"type": "tilelayer", "name": "inner", "data": [1, 0],
                     "properties": [{"name": "level", "type": "int", "value": 1}]}
                ]},
                {"type": "objectgroup", "name": "events", "objects": [
                    {"id": 4, "name": "door", "type": "Door", "x": 96, "y": 48}
                ]}
            ],
            "tilesets": [{
                "firstgid": 1, "tilecount": 4,
                "tiles": [{"id": 0, "properties": [{"name": "regionId", "type": "int", "value": 3}]}],
                "tileproperties": {"2": {"flagIsBush": true}}
            }]
        }))
        .unwrap();

        assert_eq!(doc.layers.len(), 3);
        assert_eq!(doc.layers[0].kind, LayerKind::Group);
        assert_eq!(doc.layers[1].id, 1);
        assert_eq!(doc.layers[1].level(), 1);
        assert_eq!(doc.layers[2].objects[0].class, "Door");
        assert_eq!(doc.object_cell(&doc.layers[2].objects[0]), (2, 1));

        assert_eq!(doc.extract_tile_id(&doc.layers[1], 0), 1);
        assert_eq!(doc.extract_tile_id(&doc.layers[1], 1), 0);
        assert_eq!(
            doc.tile_properties(1).and_then(|p| p.get_int(PropertyKey::RegionId)),
            Some(3)
        );
        assert!(doc.tile_properties(3).is_some_and(|p| p.is_truthy("flagIsBush")));
        assert!(doc.tile_properties(2).is_none());
    }

    #[test]
    fn test_base64_layer_is_rejected() {
        let err = TiledDocument::load(&json!({
            "width": 1, "height": 1,
            "layers": [{"type": "tilelayer", "name": "b64", "encoding": "base64", "data": "AQAAAA=="}],
            "tilesets": []
        }))
        .unwrap_err();

        assert!(matches!(err, DocumentError::UnsupportedEncoding { .. }));
    }

    #[test]
    fn test_external_tileset_resolution() {
        let mut doc = TiledDocument::load(&json!({
            "width": 1, "height": 1,
            "layers": [],
            "tilesets": [{"firstgid": 1, "source": "terrain.tsj"}, {"firstgid": 50, "source": "missing.tsj"}]
        }))
        .unwrap();

        assert!(doc.resolve_tileset(1).is_none());

        let unresolved = doc.resolve_external_tilesets(|source| {
            (source == "terrain.tsj").then(|| TilesetData {
                tile_count: 8,
                ..Default::default()
            })
        });

        assert_eq!(unresolved, 1);
        assert_eq!(doc.resolve_tileset(8).map(|t| t.first_gid), Some(1));
        assert!(doc.resolve_tileset(50).is_none());
    }

    #[test]
    fn test_chunked_extraction_outside_chunks_is_empty() {
        let mut doc = document_with_tilesets(Vec::new());
        doc.infinite = true;
        doc.width = 4;
        doc.height = 2;
        doc.offset = CellOffset { x: -2, y: 0 };
        let layer = LayerRecord {
            id: 0,
            name: "chunks".into(),
            kind: LayerKind::TileLayer,
            properties: Properties::new(),
            cells: LayerCells::Chunked(vec![Chunk {
                x: -2,
                y: 0,
                width: 2,
                height: 1,
                data: vec![7, 9],
            }]),
            objects: Vec::new(),
        };

        assert_eq!(doc.extract_tile_id(&layer, 0), 7);
        assert_eq!(doc.extract_tile_id(&layer, 1), 9);
        assert_eq!(doc.extract_tile_id(&layer, 2), 0);
        assert_eq!(doc.extract_tile_id(&layer, 5), 0);
    }
}
