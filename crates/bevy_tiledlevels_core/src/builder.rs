//! One-shot construction of every level table of a map.
//!
//! Tile layers are scanned in declaration order. A layer contributes to a
//! table kind when it carries that kind's marker property:
//!
//! | marker        | table                     |
//! |---------------|---------------------------|
//! | `collision`   | collision, arrow collision |
//! | `regionId`    | region                    |
//! | `toLevel`     | level change              |
//! | `floorHeight` | height change             |
//! | `tileFlags`   | tile flags                |
//!
//! Layers with a hide property write into their own override table instead
//! of the level's main table.

use bevy::log::{debug, warn};
use bitflags::bitflags;
use tiled::PropertyValue;

use bevy_tiledlevels_assets::document::{LayerRecord, TiledDocument};
use bevy_tiledlevels_assets::properties::{Properties, PropertyKey};

use crate::flags::{FlagRegistry, TileFlags};
use crate::rules::MapRules;
use crate::tables::{Directions, MapTables, TableKey};

bitflags! {
    /// Quarters of an authored cell under half-tile mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Quadrants: u8 {
        const UP_LEFT = 1;
        const UP_RIGHT = 2;
        const DOWN_LEFT = 4;
        const DOWN_RIGHT = 8;
    }
}

impl Quadrants {
    /// Fine-cell offsets `(dx, dy)` of the selected quarters.
    fn offsets(self) -> impl Iterator<Item = (usize, usize)> {
        [
            (Quadrants::UP_LEFT, (0, 0)),
            (Quadrants::UP_RIGHT, (1, 0)),
            (Quadrants::DOWN_LEFT, (0, 1)),
            (Quadrants::DOWN_RIGHT, (1, 1)),
        ]
        .into_iter()
        .filter(move |(quadrant, _)| self.contains(*quadrant))
        .map(|(_, offset)| offset)
    }
}

/// How a `collision` layer marks its cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CollisionMode {
    Quadrants(Quadrants),
    Arrow,
    Tiles,
}

impl CollisionMode {
    fn parse(value: &str) -> Option<Self> {
        Some(match value.trim() {
            "full" => CollisionMode::Quadrants(Quadrants::all()),
            "up-left" => CollisionMode::Quadrants(Quadrants::UP_LEFT),
            "up-right" => CollisionMode::Quadrants(Quadrants::UP_RIGHT),
            "down-left" => CollisionMode::Quadrants(Quadrants::DOWN_LEFT),
            "down-right" => CollisionMode::Quadrants(Quadrants::DOWN_RIGHT),
            "arrow" => CollisionMode::Arrow,
            "tiles" => CollisionMode::Tiles,
            _ => return None,
        })
    }
}

/// Builds [`MapTables`] from a normalized document.
pub struct LevelTableBuilder<'a> {
    document: &'a TiledDocument,
    rules: &'a MapRules,
    half_tile: bool,
}

impl<'a> LevelTableBuilder<'a> {
    pub fn new(document: &'a TiledDocument, rules: &'a MapRules, half_tile: bool) -> Self {
        Self {
            document,
            rules,
            half_tile,
        }
    }

    fn scale(&self) -> u32 {
        if self.half_tile { 2 } else { 1 }
    }

    pub fn build(&self) -> MapTables {
        let scale = self.scale();
        let mut tables = MapTables::new(
            self.document.width * scale,
            self.document.height * scale,
            self.half_tile,
        );

        for layer in self.document.tile_layers() {
            let props = &layer.properties;
            let key = if self.rules.hide_rules.has_hide_property(props) {
                tables.override_layers.insert(layer.id, props.clone());
                TableKey::Layer(layer.id)
            } else {
                TableKey::Main
            };

            if props.contains(PropertyKey::Collision) {
                self.write_collision(layer, key, &mut tables);
            }
            if props.contains(PropertyKey::RegionId) {
                self.write_region(layer, key, &mut tables);
            }
            if let Some(target) = props.get_int(PropertyKey::ToLevel) {
                let table = tables.level_mut(layer.level()).level_change.get_mut(key);
                self.for_each_tile(layer, |_, x, y| {
                    self.for_each_cell(x, y, Quadrants::all(), |i| table[i] = target);
                });
            }
            if let Some(height) = props.get_int(PropertyKey::FloorHeight) {
                let table = tables.level_mut(layer.level()).height_change.get_mut(key);
                self.for_each_tile(layer, |_, x, y| {
                    self.for_each_cell(x, y, Quadrants::all(), |i| table[i] = height);
                });
            }
            if props.is_truthy(PropertyKey::TileFlags) {
                self.write_tile_flags(layer, key, &mut tables);
            }
        }

        for (level, level_tables) in &tables.levels {
            debug!(
                "Level {}: {} collision, {} region, {} flag override tables",
                level,
                level_tables.collision.override_ids().len(),
                level_tables.region.override_ids().len(),
                level_tables.tile_flags.override_ids().len()
            );
        }
        tables
    }

    fn write_collision(&self, layer: &LayerRecord, key: TableKey, tables: &mut MapTables) {
        let props = &layer.properties;
        let Some(mode) = props.get_str(PropertyKey::Collision).and_then(CollisionMode::parse)
        else {
            warn!(
                "Layer '{}' has unknown collision mode {:?}",
                layer.name,
                props.get(PropertyKey::Collision)
            );
            return;
        };
        debug!("Layer '{}' writes collision ({:?}) to {:?}", layer.name, mode, key);

        let level = tables.level_mut(layer.level());
        match mode {
            CollisionMode::Quadrants(quadrants) => {
                let table = level.collision.get_mut(key);
                self.for_each_tile(layer, |_, x, y| {
                    self.for_each_cell(x, y, quadrants, |i| table[i] = true);
                });
            }
            CollisionMode::Arrow => {
                let blocked = arrow_directions(layer);
                if blocked.is_empty() {
                    return;
                }
                let table = level.arrow.get_mut(key);
                self.for_each_tile(layer, |_, x, y| {
                    self.for_each_cell(x, y, Quadrants::all(), |i| table[i] ^= blocked);
                });
            }
            CollisionMode::Tiles => {
                self.for_each_tile(layer, |gid, x, y| {
                    let Some(tile) = self.document.tile_properties(gid) else {
                        return;
                    };
                    let quadrants = tile_quadrants(tile);
                    if !quadrants.is_empty() {
                        let table = level.collision.get_mut(key);
                        self.for_each_cell(x, y, quadrants, |i| table[i] = true);
                    }
                    let blocked = tile_arrow_directions(tile);
                    if !blocked.is_empty() {
                        let table = level.arrow.get_mut(key);
                        self.for_each_cell(x, y, Quadrants::all(), |i| table[i] ^= blocked);
                    }
                });
            }
        }
    }

    fn write_region(&self, layer: &LayerRecord, key: TableKey, tables: &mut MapTables) {
        let props = &layer.properties;
        let region_id = props.get_int(PropertyKey::RegionId).unwrap_or(0);
        let offset = props.get_int(PropertyKey::RegionOffset).unwrap_or(0);
        let table = tables.level_mut(layer.level()).region.get_mut(key);

        self.for_each_tile(layer, |gid, x, y| {
            let region = if region_id > -1 {
                region_id
            } else {
                self.document
                    .tile_properties(gid)
                    .and_then(|tile| tile.get_int(PropertyKey::RegionId))
                    .unwrap_or(0)
                    + offset
            };
            self.for_each_cell(x, y, Quadrants::all(), |i| table[i] = region);
        });
    }

    fn write_tile_flags(&self, layer: &LayerRecord, key: TableKey, tables: &mut MapTables) {
        let table = tables.level_mut(layer.level()).tile_flags.get_mut(key);
        self.for_each_tile(layer, |gid, x, y| {
            let Some(tile) = self.document.tile_properties(gid) else {
                return;
            };
            let flags = tile_flags(&self.rules.flags, tile);
            if flags.is_empty() {
                return;
            }
            self.for_each_cell(x, y, Quadrants::all(), |i| table[i].union_with(&flags));
        });
    }

    /// Call `f(gid, x, y)` for every non-empty authored cell of `layer`.
    fn for_each_tile(&self, layer: &LayerRecord, mut f: impl FnMut(u32, usize, usize)) {
        let width = self.document.width as usize;
        if width == 0 {
            return;
        }
        for index in 0..self.document.cell_count() {
            let gid = self.document.extract_tile_id(layer, index);
            if gid != 0 {
                f(gid, index % width, index / width);
            }
        }
    }

    /// Call `f(index)` for the movement-grid cells of authored cell `(x, y)`.
    ///
    /// Without half-tile mode every selector covers the whole cell.
    fn for_each_cell(&self, x: usize, y: usize, quadrants: Quadrants, mut f: impl FnMut(usize)) {
        if !self.half_tile {
            f(x + self.document.width as usize * y);
            return;
        }
        let fine_width = self.document.width as usize * 2;
        for (dx, dy) in quadrants.offsets() {
            f((2 * x + dx) + fine_width * (2 * y + dy));
        }
    }
}

/// Directions listed by a layer's `arrowImpassable` property.
///
/// Accepts a list of names (`"up, left"`) or a numeric bit mask.
fn arrow_directions(layer: &LayerRecord) -> Directions {
    let props = &layer.properties;
    match props.get(PropertyKey::ArrowImpassable) {
        Some(PropertyValue::StringValue(list)) => list
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .fold(Directions::empty(), |acc, token| {
                match Directions::from_direction_name(token)
                    .or_else(|| token.parse::<u8>().ok().and_then(Directions::from_bits))
                {
                    Some(direction) => acc | direction,
                    None => {
                        warn!("Layer '{}' has unknown arrow direction '{}'", layer.name, token);
                        acc
                    }
                }
            }),
        Some(_) => match props.get_int(PropertyKey::ArrowImpassable) {
            Some(bits) => match u8::try_from(bits).ok().and_then(Directions::from_bits) {
                Some(directions) => directions,
                None => {
                    warn!("Layer '{}' has out-of-range arrowImpassable {}", layer.name, bits);
                    Directions::empty()
                }
            },
            None => Directions::empty(),
        },
        None => {
            warn!("Arrow collision layer '{}' has no arrowImpassable", layer.name);
            Directions::empty()
        }
    }
}

/// Quarters marked by a tile's own `collision*` properties.
fn tile_quadrants(tile: &Properties) -> Quadrants {
    if tile.is_truthy(PropertyKey::Collision) {
        return Quadrants::all();
    }
    [
        (PropertyKey::CollisionUpLeft, Quadrants::UP_LEFT),
        (PropertyKey::CollisionUpRight, Quadrants::UP_RIGHT),
        (PropertyKey::CollisionDownLeft, Quadrants::DOWN_LEFT),
        (PropertyKey::CollisionDownRight, Quadrants::DOWN_RIGHT),
    ]
    .into_iter()
    .filter(|(key, _)| tile.is_truthy(*key))
    .fold(Quadrants::empty(), |acc, (_, quadrant)| acc | quadrant)
}

/// Directions blocked by a tile's `arrowImpassable*` properties, summed fresh
/// for each tile.
fn tile_arrow_directions(tile: &Properties) -> Directions {
    [
        (PropertyKey::ArrowImpassableDown, Directions::DOWN),
        (PropertyKey::ArrowImpassableLeft, Directions::LEFT),
        (PropertyKey::ArrowImpassableRight, Directions::RIGHT),
        (PropertyKey::ArrowImpassableUp, Directions::UP),
    ]
    .into_iter()
    .filter(|(key, _)| tile.is_truthy(*key))
    .fold(Directions::empty(), |acc, (_, direction)| acc | direction)
}

fn tile_flags(registry: &FlagRegistry, tile: &Properties) -> TileFlags {
    let mut flags = TileFlags::new();
    for (_, key, location) in registry.iter() {
        if tile.is_truthy(key) {
            flags.set(location);
        }
    }
    flags
}
