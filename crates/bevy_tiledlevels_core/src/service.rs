//! `MapQueryService`: the query surface collaborators use.
//!
//! Movement controllers, renderers and event interpreters ask the service
//! about cells of the current map. Coordinates are movement-grid cells,
//! i.e. fine cells when half-tile movement is enabled.

use std::sync::Arc;

use bevy::prelude::*;

use bevy_tiledlevels_assets::document::{CellOffset, TiledDocument};

use crate::builder::LevelTableBuilder;
use crate::config::TiledLevelsConfig;
use crate::flags::{FlagRef, TileFlags};
use crate::resolver::{Direction, PassabilityResolver};
use crate::rules::MapRules;
use crate::state::{GameState, GameStateMut};
use crate::tables::{MapTables, TableKey, TableKind};

/// Tables and geometry of the installed map.
#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub map_id: u32,
    pub generation: u64,
    pub tables: MapTables,
    /// Crop offset in authored cells.
    pub offset: CellOffset,
    /// Movement-grid cell size in pixels (half the authored size under
    /// half-tile movement).
    pub cell_width: f32,
    pub cell_height: f32,
}

impl LoadedMap {
    /// Build every table of `document`.
    pub fn build(
        map_id: u32,
        generation: u64,
        document: &TiledDocument,
        rules: &MapRules,
        half_tile: bool,
    ) -> Self {
        let tables = LevelTableBuilder::new(document, rules, half_tile).build();
        let scale = if half_tile { 2.0 } else { 1.0 };
        Self {
            map_id,
            generation,
            tables,
            offset: document.offset,
            cell_width: document.tile_width as f32 / scale,
            cell_height: document.tile_height as f32 / scale,
        }
    }

    fn scale(&self) -> i32 {
        if self.tables.half_tile { 2 } else { 1 }
    }

    /// Movement-grid cell of an authored pixel position, crop offset applied.
    pub fn pixel_to_cell(&self, px: f32, py: f32) -> (i32, i32) {
        let x = (px / self.cell_width.max(1.0)).floor() as i32;
        let y = (py / self.cell_height.max(1.0)).floor() as i32;
        let scale = self.scale();
        (x - self.offset.x * scale, y - self.offset.y * scale)
    }
}

/// Where the current level is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStore {
    Internal(i32),
    /// Game variable id.
    Variable(u32),
}

/// Per-cell queries over the installed map.
///
/// Every query is total: before a map is installed, and outside the grid,
/// queries return the kind's default and passability is `false`.
#[derive(Resource, Debug)]
pub struct MapQueryService {
    rules: Arc<MapRules>,
    half_tile: bool,
    map: Option<LoadedMap>,
    level: LevelStore,
}

impl MapQueryService {
    pub fn new(rules: Arc<MapRules>, config: &TiledLevelsConfig) -> Self {
        let level = match config.map_level_variable {
            0 => LevelStore::Internal(0),
            id => LevelStore::Variable(id),
        };
        Self {
            rules,
            half_tile: config.half_tile,
            map: None,
            level,
        }
    }

    pub fn rules(&self) -> &MapRules {
        &self.rules
    }

    pub fn half_tile(&self) -> bool {
        self.half_tile
    }

    /// Whether a map's tables are installed.
    ///
    /// A new load request clears the installed map, so this stays `false`
    /// until that load completes.
    pub fn is_ready(&self) -> bool {
        self.map.is_some()
    }

    pub fn map(&self) -> Option<&LoadedMap> {
        self.map.as_ref()
    }

    /// Build and install the tables of `document` in one step.
    pub fn load_document(&mut self, map_id: u32, generation: u64, document: &TiledDocument) {
        let map = LoadedMap::build(map_id, generation, document, &self.rules, self.half_tile);
        self.install(map);
    }

    /// Replace the current map. The internal level resets to 0.
    pub fn install(&mut self, map: LoadedMap) {
        info!(
            "Installed map {} (generation {}): {}x{} cells, levels {:?}",
            map.map_id,
            map.generation,
            map.tables.width,
            map.tables.height,
            map.tables.level_ids()
        );
        if let LevelStore::Internal(level) = &mut self.level {
            *level = 0;
        }
        self.map = Some(map);
    }

    pub fn clear(&mut self) {
        if let Some(map) = self.map.take() {
            debug!("Cleared map {} (generation {})", map.map_id, map.generation);
        }
    }

    /// Movement-grid size, `(0, 0)` before a map is installed.
    pub fn grid_size(&self) -> (u32, u32) {
        self.map
            .as_ref()
            .map_or((0, 0), |map| (map.tables.width, map.tables.height))
    }

    pub fn current_level(&self, state: &dyn GameState) -> i32 {
        match self.level {
            LevelStore::Internal(level) => level,
            LevelStore::Variable(id) => state.variable(id),
        }
    }

    pub fn set_level(&mut self, state: &mut dyn GameStateMut, level: i32) {
        match &mut self.level {
            LevelStore::Internal(current) => *current = level,
            LevelStore::Variable(id) => state.set_variable(*id, level),
        }
    }

    /// A resolver over the installed map for this game state.
    pub fn resolver<'a>(&'a self, state: &'a dyn GameState) -> Option<PassabilityResolver<'a>> {
        let map = self.map.as_ref()?;
        Some(PassabilityResolver::new(
            &map.tables,
            &self.rules.hide_rules,
            state,
            self.current_level(state),
        ))
    }

    /// Passability on the current level.
    pub fn is_passable_at(&self, state: &dyn GameState, x: i32, y: i32, direction: Direction) -> bool {
        self.passability(state, x, y, direction, None, None)
    }

    pub fn passability(
        &self,
        state: &dyn GameState,
        x: i32,
        y: i32,
        direction: Direction,
        hint: Option<TableKey>,
        level: Option<i32>,
    ) -> bool {
        self.resolver(state).is_some_and(|resolver| {
            let level = level.unwrap_or_else(|| self.current_level(state));
            resolver.is_passable(x, y, direction, level, hint)
        })
    }

    pub fn region_id(&self, state: &dyn GameState, x: i32, y: i32) -> i32 {
        self.resolver(state).map_or(0, |resolver| {
            resolver.region(x, y, self.current_level(state), None)
        })
    }

    /// Every visible region id at `(x, y)`.
    pub fn region_ids(&self, state: &dyn GameState, x: i32, y: i32) -> Vec<i32> {
        self.resolver(state)
            .map(|resolver| resolver.region_ids(x, y, self.current_level(state)))
            .unwrap_or_default()
    }

    pub fn tile_flags(
        &self,
        state: &dyn GameState,
        x: i32,
        y: i32,
        hint: Option<TableKey>,
        level: Option<i32>,
    ) -> TileFlags {
        self.resolver(state)
            .map(|resolver| {
                let level = level.unwrap_or_else(|| self.current_level(state));
                resolver.tile_flags(x, y, level, hint)
            })
            .unwrap_or_default()
    }

    pub fn has_flag<'f>(
        &self,
        state: &dyn GameState,
        x: i32,
        y: i32,
        flag: impl Into<FlagRef<'f>>,
    ) -> bool {
        let flag = flag.into();
        self.resolver(state).is_some_and(|resolver| {
            resolver.has_flag(&self.rules.flags, x, y, flag, self.current_level(state), None)
        })
    }

    /// Target level of a level-change cell, -1 if none.
    pub fn level_change_at(&self, state: &dyn GameState, x: i32, y: i32) -> i32 {
        self.resolver(state).map_or(-1, |resolver| {
            resolver.level_change(x, y, self.current_level(state), None)
        })
    }

    /// Floor height of a height-change cell, -1 if none.
    pub fn height_change_at(&self, state: &dyn GameState, x: i32, y: i32) -> i32 {
        self.resolver(state).map_or(-1, |resolver| {
            resolver.height_change(x, y, self.current_level(state), None)
        })
    }

    /// Layer ids owning override tables of `kind` on `level`.
    pub fn override_layer_ids(&self, kind: TableKind, level: i32) -> Vec<usize> {
        self.map
            .as_ref()
            .map(|map| map.tables.override_layer_ids(kind, level))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameVariables;
    use serde_json::json;

    fn document() -> TiledDocument {
        TiledDocument::load(&json!({
            "width": 2, "height": 2, "tilewidth": 48, "tileheight": 48,
            "layers": [
                {"type": "tilelayer", "name": "walls", "data": [1, 0, 0, 0],
                 "properties": {"collision": "full"}},
                {"type": "tilelayer", "name": "bridge", "data": [0, 1, 0, 0],
                 "properties": {"collision": "full", "level": 1}},
                {"type": "tilelayer", "name": "stairs", "data": [0, 0, 1, 0],
                 "properties": {"toLevel": 1, "floorHeight": 2}}
            ],
            "tilesets": [{"firstgid": 1, "tilecount": 1}]
        }))
        .unwrap()
    }

    fn service(config: &TiledLevelsConfig) -> MapQueryService {
        MapQueryService::new(Arc::new(MapRules::default()), config)
    }

    #[test]
    fn test_not_ready_is_total() {
        let service = service(&TiledLevelsConfig::default());
        let state = GameVariables::new();

        assert!(!service.is_ready());
        assert!(!service.is_passable_at(&state, 0, 0, Direction::Down));
        assert_eq!(service.region_id(&state, 0, 0), 0);
        assert_eq!(service.level_change_at(&state, 0, 0), -1);
        assert_eq!(service.grid_size(), (0, 0));
    }

    #[test]
    fn test_queries_follow_current_level() {
        let mut service = service(&TiledLevelsConfig::default());
        let mut state = GameVariables::new();
        service.load_document(1, 1, &document());

        assert!(!service.is_passable_at(&state, 0, 0, Direction::Down));
        assert!(service.is_passable_at(&state, 1, 0, Direction::Down));
        assert_eq!(service.level_change_at(&state, 0, 1), 1);
        assert_eq!(service.height_change_at(&state, 0, 1), 2);

        service.set_level(&mut state, 1);
        assert!(service.is_passable_at(&state, 0, 0, Direction::Down));
        assert!(!service.is_passable_at(&state, 1, 0, Direction::Down));
        assert!(!service.passability(&state, 0, 0, Direction::Down, None, Some(0)));
    }

    #[test]
    fn test_level_variable_store() {
        let config = TiledLevelsConfig {
            map_level_variable: 20,
            ..Default::default()
        };
        let mut service = service(&config);
        let mut state = GameVariables::new();
        service.load_document(1, 1, &document());

        service.set_level(&mut state, 1);
        assert_eq!(state.variable(20), 1);
        assert_eq!(service.current_level(&state), 1);

        // Reinstalling leaves the variable alone.
        service.load_document(2, 2, &document());
        assert_eq!(service.current_level(&state), 1);
    }

    #[test]
    fn test_install_resets_internal_level() {
        let mut service = service(&TiledLevelsConfig::default());
        let mut state = GameVariables::new();
        service.load_document(1, 1, &document());
        service.set_level(&mut state, 1);

        service.load_document(2, 2, &document());
        assert_eq!(service.current_level(&state), 0);
        assert_eq!(service.map().map(|map| map.map_id), Some(2));
    }

    #[test]
    fn test_half_tile_pixel_to_cell() {
        let config = TiledLevelsConfig {
            half_tile: true,
            ..Default::default()
        };
        let mut service = service(&config);
        let mut document = document();
        document.offset = CellOffset { x: -1, y: 0 };
        service.load_document(1, 1, &document);
        let map = service.map().unwrap();

        assert_eq!(service.grid_size(), (4, 4));
        assert_eq!(map.pixel_to_cell(30.0, 50.0), (3, 2));
    }
}
