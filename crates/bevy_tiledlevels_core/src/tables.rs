//! Dense per-cell tables of a loaded map, one set per level.

use std::collections::BTreeMap;

use bevy_tiledlevels_assets::properties::Properties;
use bitflags::bitflags;

use crate::flags::TileFlags;
use crate::hide::HideCategory;

bitflags! {
    /// Arrow directions of a cell.
    ///
    /// Arrow tables store the *open* directions: a cell starts with all four
    /// open and `arrowImpassable` toggles bits off.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Directions: u8 {
        const DOWN = 1;
        const LEFT = 2;
        const RIGHT = 4;
        const UP = 8;
    }
}

impl Default for Directions {
    fn default() -> Self {
        Directions::all()
    }
}

impl Directions {
    /// Parse a direction name (`down`, `left`, `right`, `up`).
    pub fn from_direction_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "down" => Some(Directions::DOWN),
            "left" => Some(Directions::LEFT),
            "right" => Some(Directions::RIGHT),
            "up" => Some(Directions::UP),
            _ => None,
        }
    }
}

/// The six table kinds built per level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Collision,
    ArrowCollision,
    Region,
    LevelChange,
    HeightChange,
    TileFlags,
}

impl TableKind {
    pub const ALL: [TableKind; 6] = [
        TableKind::Collision,
        TableKind::ArrowCollision,
        TableKind::Region,
        TableKind::LevelChange,
        TableKind::HeightChange,
        TableKind::TileFlags,
    ];

    /// Hide category consulted when resolving this kind.
    pub const fn category(self) -> HideCategory {
        match self {
            TableKind::Collision | TableKind::ArrowCollision => HideCategory::Collisions,
            TableKind::Region => HideCategory::Regions,
            TableKind::LevelChange | TableKind::HeightChange => HideCategory::LevelChanges,
            TableKind::TileFlags => HideCategory::TileFlags,
        }
    }
}

/// Identity of one table inside a [`CellTable`].
///
/// Also used as a render hint selecting a table directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TableKey {
    #[default]
    Main,
    /// Override table contributed by the layer with this id.
    Layer(usize),
}

/// A main table plus override tables, all of the same length.
#[derive(Debug, Clone)]
pub struct CellTable<T> {
    default: T,
    main: Vec<T>,
    /// Override tables in discovery order.
    overrides: Vec<(usize, Vec<T>)>,
}

impl<T> CellTable<T> {
    pub fn default_value(&self) -> &T {
        &self.default
    }

    pub fn main(&self) -> &[T] {
        &self.main
    }

    pub fn get(&self, key: TableKey) -> Option<&[T]> {
        match key {
            TableKey::Main => Some(&self.main),
            TableKey::Layer(id) => self
                .overrides
                .iter()
                .find(|(layer, _)| *layer == id)
                .map(|(_, values)| values.as_slice()),
        }
    }

    pub fn overrides(&self) -> impl Iterator<Item = (usize, &[T])> {
        self.overrides
            .iter()
            .map(|(layer, values)| (*layer, values.as_slice()))
    }

    pub fn override_ids(&self) -> Vec<usize> {
        self.overrides.iter().map(|(layer, _)| *layer).collect()
    }
}

impl<T: Clone> CellTable<T> {
    pub fn new(len: usize, default: T) -> Self {
        Self {
            main: vec![default.clone(); len],
            default,
            overrides: Vec::new(),
        }
    }

    /// The table for `key`, allocating a default-filled override on first use.
    pub fn get_mut(&mut self, key: TableKey) -> &mut Vec<T> {
        let TableKey::Layer(id) = key else {
            return &mut self.main;
        };
        let position = match self.overrides.iter().position(|(layer, _)| *layer == id) {
            Some(position) => position,
            None => {
                self.overrides
                    .push((id, vec![self.default.clone(); self.main.len()]));
                self.overrides.len() - 1
            }
        };
        &mut self.overrides[position].1
    }
}

/// All tables of one level.
#[derive(Debug, Clone)]
pub struct LevelTables {
    pub collision: CellTable<bool>,
    pub arrow: CellTable<Directions>,
    pub region: CellTable<i32>,
    pub level_change: CellTable<i32>,
    pub height_change: CellTable<i32>,
    pub tile_flags: CellTable<TileFlags>,
}

impl LevelTables {
    pub fn new(len: usize) -> Self {
        Self {
            collision: CellTable::new(len, false),
            arrow: CellTable::new(len, Directions::all()),
            region: CellTable::new(len, 0),
            level_change: CellTable::new(len, -1),
            height_change: CellTable::new(len, -1),
            tile_flags: CellTable::new(len, TileFlags::new()),
        }
    }

    /// Layer ids of the override tables of `kind`, in discovery order.
    pub fn override_layer_ids(&self, kind: TableKind) -> Vec<usize> {
        match kind {
            TableKind::Collision => self.collision.override_ids(),
            TableKind::ArrowCollision => self.arrow.override_ids(),
            TableKind::Region => self.region.override_ids(),
            TableKind::LevelChange => self.level_change.override_ids(),
            TableKind::HeightChange => self.height_change.override_ids(),
            TableKind::TileFlags => self.tile_flags.override_ids(),
        }
    }
}

/// Every table of a loaded map.
///
/// Built once per map load and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct MapTables {
    /// Movement-grid width (doubled under half-tile mode).
    pub width: u32,
    /// Movement-grid height (doubled under half-tile mode).
    pub height: u32,
    pub half_tile: bool,
    pub levels: BTreeMap<i32, LevelTables>,
    /// Properties of every layer that owns an override table.
    pub override_layers: BTreeMap<usize, Properties>,
}

impl MapTables {
    pub fn new(width: u32, height: u32, half_tile: bool) -> Self {
        Self {
            width,
            height,
            half_tile,
            levels: BTreeMap::new(),
            override_layers: BTreeMap::new(),
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Row-major index of `(x, y)`, `None` outside the grid.
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(x as usize + self.width as usize * y as usize)
    }

    pub fn level(&self, level: i32) -> Option<&LevelTables> {
        self.levels.get(&level)
    }

    /// The tables of `level`, allocated default-filled on first reference.
    pub fn level_mut(&mut self, level: i32) -> &mut LevelTables {
        let len = self.cell_count();
        self.levels
            .entry(level)
            .or_insert_with(|| LevelTables::new(len))
    }

    pub fn level_ids(&self) -> Vec<i32> {
        self.levels.keys().copied().collect()
    }

    pub fn override_layer_ids(&self, kind: TableKind, level: i32) -> Vec<usize> {
        self.level(level)
            .map(|tables| tables.override_layer_ids(kind))
            .unwrap_or_default()
    }
}
