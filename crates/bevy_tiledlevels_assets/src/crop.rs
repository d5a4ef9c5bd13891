//! Fixed bounds for Tiled "infinite" maps.
//!
//! Infinite maps store tiles in chunks that can extend in any direction,
//! including negative coordinates. Before any per-cell table can be built the
//! map needs a finite rectangle: by default the union of all chunk rectangles
//! (chunk-grid aligned, usually 16x16), or with `autoSize = "deep"` the tight
//! box around the non-empty cells. A `border` property pads the result.

use bevy::log::warn;
use tiled::PropertyValue;

use crate::document::{Chunk, LayerCells, TiledDocument};
use crate::properties::{Properties, PropertyKey};

/// Bounds of the loaded map in absolute authored cells.
///
/// `x`/`y` become the document's [`CellOffset`](crate::document::CellOffset).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl MapBounds {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        if right <= left || bottom <= top {
            return Self::default();
        }
        Self {
            x: left,
            y: top,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        }
    }
}

/// How an infinite map is sized (`autoSize` map property).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoSize {
    /// Union of all declared chunk rectangles (unset, `false` or `true`).
    #[default]
    ChunkUnion,
    /// Tight box around non-empty cells (`"deep"` or `"crop"`).
    Deep,
}

impl AutoSize {
    pub fn from_properties(properties: &Properties) -> Self {
        match properties.get(PropertyKey::AutoSize) {
            None | Some(PropertyValue::BoolValue(_)) => AutoSize::ChunkUnion,
            Some(PropertyValue::StringValue(s)) => match s.trim() {
                "deep" | "crop" => AutoSize::Deep,
                "" | "true" | "false" => AutoSize::ChunkUnion,
                other => {
                    warn!("Unknown autoSize '{}', using chunk bounds", other);
                    AutoSize::ChunkUnion
                }
            },
            Some(other) => {
                warn!("Unsupported autoSize value {:?}, using chunk bounds", other);
                AutoSize::ChunkUnion
            }
        }
    }
}

/// Padding added around the computed bounds (`border` map property).
///
/// Either a single integer applied to every side or `"top right bottom left"`.
/// Negative values shrink the map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Border {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Border {
    pub const fn uniform(size: i32) -> Self {
        Self {
            top: size,
            right: size,
            bottom: size,
            left: size,
        }
    }

    pub fn from_properties(properties: &Properties) -> Option<Self> {
        match properties.get(PropertyKey::Border)? {
            PropertyValue::IntValue(size) => Some(Self::uniform(*size)),
            PropertyValue::FloatValue(size) => Some(Self::uniform(size.trunc() as i32)),
            PropertyValue::StringValue(s) => {
                let parsed = Self::parse(s);
                if parsed.is_none() {
                    warn!("Ignoring malformed border '{}'", s);
                }
                parsed
            }
            other => {
                warn!("Ignoring unsupported border value {:?}", other);
                None
            }
        }
    }

    /// Parse `"n"` or `"top right bottom left"`.
    pub fn parse(s: &str) -> Option<Self> {
        let tokens = s
            .split_whitespace()
            .map(str::parse::<i32>)
            .collect::<Result<Vec<_>, _>>()
            .ok()?;
        match tokens.as_slice() {
            [size] => Some(Self::uniform(*size)),
            [top, right, bottom, left] => Some(Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            }),
            _ => None,
        }
    }
}

/// Computes [`MapBounds`] for an infinite map from its tile layer chunks.
pub struct InfiniteMapCropper<'a> {
    chunks: Vec<&'a Chunk>,
    auto_size: AutoSize,
    border: Option<Border>,
}

impl<'a> InfiniteMapCropper<'a> {
    /// Collect every tile layer chunk and read `autoSize`/`border` from the map.
    pub fn from_document(document: &'a TiledDocument) -> Self {
        let chunks = document
            .tile_layers()
            .filter_map(|layer| match &layer.cells {
                LayerCells::Chunked(chunks) => Some(chunks.iter()),
                _ => None,
            })
            .flatten()
            .collect();

        Self {
            chunks,
            auto_size: AutoSize::from_properties(&document.properties),
            border: Border::from_properties(&document.properties),
        }
    }

    pub fn new(chunks: Vec<&'a Chunk>, auto_size: AutoSize, border: Option<Border>) -> Self {
        Self {
            chunks,
            auto_size,
            border,
        }
    }

    /// Compute the bounds. A map without any non-empty cell collapses to zero size.
    pub fn bounds(&self) -> MapBounds {
        let has_content = self
            .chunks
            .iter()
            .any(|chunk| chunk.occupied_cells().next().is_some());
        if !has_content {
            return MapBounds::default();
        }

        let bounds = match self.auto_size {
            AutoSize::ChunkUnion => self.chunk_union(),
            AutoSize::Deep => self.deep_crop(),
        };

        match self.border {
            Some(border) if !bounds.is_empty() => MapBounds::from_edges(
                bounds.x - border.left,
                bounds.y - border.top,
                bounds.x + bounds.width as i32 + border.right,
                bounds.y + bounds.height as i32 + border.bottom,
            ),
            _ => bounds,
        }
    }

    fn chunk_union(&self) -> MapBounds {
        let mut edges: Option<(i32, i32, i32, i32)> = None;
        for chunk in &self.chunks {
            let (left, top) = (chunk.x, chunk.y);
            let (right, bottom) = (chunk.x + chunk.width as i32, chunk.y + chunk.height as i32);
            edges = Some(match edges {
                None => (left, top, right, bottom),
                Some((l, t, r, b)) => (l.min(left), t.min(top), r.max(right), b.max(bottom)),
            });
        }
        edges.map_or_else(MapBounds::default, |(l, t, r, b)| {
            MapBounds::from_edges(l, t, r, b)
        })
    }

    /// Each edge moves inward independently until it meets a non-empty
    /// row/column, which is the box spanned by the extreme non-empty cells.
    fn deep_crop(&self) -> MapBounds {
        let mut edges: Option<(i32, i32, i32, i32)> = None;
        for (x, y) in self.chunks.iter().flat_map(|chunk| chunk.occupied_cells()) {
            edges = Some(match edges {
                None => (x, y, x + 1, y + 1),
                Some((l, t, r, b)) => (l.min(x), t.min(y), r.max(x + 1), b.max(y + 1)),
            });
        }
        edges.map_or_else(MapBounds::default, |(l, t, r, b)| {
            MapBounds::from_edges(l, t, r, b)
        })
    }
}
