//! Read-time combination of main and override tables.

use crate::flags::{FlagRef, FlagRegistry, TileFlags};
use crate::hide::{HideCategory, HideContext, HideRuleEngine};
use crate::state::GameState;
use crate::tables::{CellTable, Directions, LevelTables, MapTables, TableKey};

/// Movement direction, numbered like a numeric keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    Down = 2,
    Left = 4,
    Right = 6,
    Up = 8,
}

impl Direction {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            2 => Some(Direction::Down),
            4 => Some(Direction::Left),
            6 => Some(Direction::Right),
            8 => Some(Direction::Up),
            _ => None,
        }
    }

    /// Arrow bit of this direction: `1 << (code / 2 - 1)`.
    pub fn bit(self) -> Directions {
        let code = self as u8;
        Directions::from_bits_truncate((1 << (code / 2 - 1)) & 0xF)
    }
}

/// Resolves per-cell values for one game state snapshot.
///
/// The player's region is resolved up front with region-exempt predicates
/// skipped, then feeds `hideOnRegion` for every other category.
pub struct PassabilityResolver<'a> {
    tables: &'a MapTables,
    hide_rules: &'a HideRuleEngine,
    state: &'a dyn GameState,
    current_level: i32,
    player_region: Option<i32>,
}

impl<'a> PassabilityResolver<'a> {
    pub fn new(
        tables: &'a MapTables,
        hide_rules: &'a HideRuleEngine,
        state: &'a dyn GameState,
        current_level: i32,
    ) -> Self {
        let mut resolver = Self {
            tables,
            hide_rules,
            state,
            current_level,
            player_region: None,
        };
        let player_region = state
            .player_position()
            .filter(|(x, y)| tables.index(*x, *y).is_some())
            .map(|(x, y)| resolver.region(x, y, current_level, None));
        resolver.player_region = player_region;
        resolver
    }

    pub fn player_region(&self) -> Option<i32> {
        self.player_region
    }

    pub fn collision(&self, x: i32, y: i32, level: i32, hint: Option<TableKey>) -> bool {
        self.resolve(x, y, level, hint, HideCategory::Collisions, |t| &t.collision, |acc, v| {
            *acc |= *v;
        })
        .unwrap_or(false)
    }

    /// Open arrow directions; a direction stays open only if every visible
    /// layer leaves it open.
    pub fn arrow(&self, x: i32, y: i32, level: i32, hint: Option<TableKey>) -> Directions {
        self.resolve(x, y, level, hint, HideCategory::Collisions, |t| &t.arrow, |acc, v| {
            *acc &= *v;
        })
        .unwrap_or(Directions::all())
    }

    pub fn region(&self, x: i32, y: i32, level: i32, hint: Option<TableKey>) -> i32 {
        self.resolve(x, y, level, hint, HideCategory::Regions, |t| &t.region, |acc, v| {
            if *v != 0 {
                *acc = *v;
            }
        })
        .unwrap_or(0)
    }

    /// Main region followed by every visible override region, without
    /// duplicates or zeros.
    pub fn region_ids(&self, x: i32, y: i32, level: i32) -> Vec<i32> {
        let mut ids = Vec::new();
        let Some((table, index)) = self.lookup(x, y, level, |t| &t.region) else {
            return ids;
        };
        let main = table.main()[index];
        if main != 0 {
            ids.push(main);
        }
        for value in self.visible_overrides(table, index, HideCategory::Regions) {
            if *value != 0 && !ids.contains(value) {
                ids.push(*value);
            }
        }
        ids
    }

    pub fn level_change(&self, x: i32, y: i32, level: i32, hint: Option<TableKey>) -> i32 {
        self.resolve(x, y, level, hint, HideCategory::LevelChanges, |t| &t.level_change, |acc, v| {
            if *v != -1 {
                *acc = *v;
            }
        })
        .unwrap_or(-1)
    }

    pub fn height_change(&self, x: i32, y: i32, level: i32, hint: Option<TableKey>) -> i32 {
        self.resolve(x, y, level, hint, HideCategory::LevelChanges, |t| &t.height_change, |acc, v| {
            if *v != -1 {
                *acc = *v;
            }
        })
        .unwrap_or(-1)
    }

    pub fn tile_flags(&self, x: i32, y: i32, level: i32, hint: Option<TableKey>) -> TileFlags {
        self.resolve(x, y, level, hint, HideCategory::TileFlags, |t| &t.tile_flags, |acc, v| {
            acc.union_with(v);
        })
        .unwrap_or_default()
    }

    /// Unknown flags are never set.
    pub fn has_flag(
        &self,
        registry: &FlagRegistry,
        x: i32,
        y: i32,
        flag: FlagRef<'_>,
        level: i32,
        hint: Option<TableKey>,
    ) -> bool {
        registry
            .resolve(flag)
            .is_some_and(|location| self.tile_flags(x, y, level, hint).contains(location))
    }

    /// Whether `(x, y)` can be left or entered in `direction`.
    ///
    /// Cells outside the grid are impassable.
    pub fn is_passable(
        &self,
        x: i32,
        y: i32,
        direction: Direction,
        level: i32,
        hint: Option<TableKey>,
    ) -> bool {
        if self.tables.index(x, y).is_none() {
            return false;
        }
        !self.collision(x, y, level, hint) && self.arrow(x, y, level, hint).contains(direction.bit())
    }

    fn lookup<T: 'a>(
        &self,
        x: i32,
        y: i32,
        level: i32,
        table: impl Fn(&'a LevelTables) -> &'a CellTable<T>,
    ) -> Option<(&'a CellTable<T>, usize)> {
        let index = self.tables.index(x, y)?;
        let tables = self.tables.level(level)?;
        Some((table(tables), index))
    }

    fn visible_overrides<'t, T>(
        &'t self,
        table: &'t CellTable<T>,
        index: usize,
        category: HideCategory,
    ) -> impl Iterator<Item = &'t T>
    where
        T: 't,
    {
        let ctx = HideContext {
            state: self.state,
            level: self.current_level,
            player_region: self.player_region,
        };
        table.overrides().filter_map(move |(layer, values)| {
            let hidden = self
                .tables
                .override_layers
                .get(&layer)
                .is_some_and(|props| self.hide_rules.is_hidden(props, category, &ctx));
            (!hidden).then(|| &values[index])
        })
    }

    /// `None` outside the grid or for a level without tables; callers fall
    /// back to the kind's default.
    fn resolve<T: Clone + 'a>(
        &self,
        x: i32,
        y: i32,
        level: i32,
        hint: Option<TableKey>,
        category: HideCategory,
        table: impl Fn(&'a LevelTables) -> &'a CellTable<T>,
        combine: impl Fn(&mut T, &T),
    ) -> Option<T> {
        let (table, index) = self.lookup(x, y, level, table)?;

        if let Some(key) = hint
            && let Some(values) = table.get(key)
        {
            return Some(values[index].clone());
        }

        let mut value = table.main()[index].clone();
        for contribution in self.visible_overrides(table, index, category) {
            combine(&mut value, contribution);
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::LevelTableBuilder;
    use crate::rules::MapRules;
    use crate::state::GameVariables;
    use crate::tables::TableKind;
    use bevy_tiledlevels_assets::document::TiledDocument;
    use serde_json::{Value, json};

    fn tables(layers: Value) -> (MapTables, MapRules) {
        let document = TiledDocument::load(&json!({
            "width": 2, "height": 1, "tilewidth": 48, "tileheight": 48,
            "layers": layers,
            "tilesets": [{"firstgid": 1, "tilecount": 4}]
        }))
        .unwrap();
        let rules = MapRules::default();
        let tables = LevelTableBuilder::new(&document, &rules, false).build();
        (tables, rules)
    }

    fn layer(data: [u32; 2], properties: Value) -> Value {
        json!({"type": "tilelayer", "name": "layer", "data": data, "properties": properties})
    }

    #[test]
    fn test_direction_bits() {
        assert_eq!(Direction::Down.bit(), Directions::DOWN);
        assert_eq!(Direction::Left.bit(), Directions::LEFT);
        assert_eq!(Direction::Right.bit(), Directions::RIGHT);
        assert_eq!(Direction::Up.bit(), Directions::UP);
        assert_eq!(Direction::from_code(6), Some(Direction::Right));
        assert_eq!(Direction::from_code(5), None);
    }

    #[test]
    fn test_collision_override_follows_switch() {
        let (tables, rules) = tables(json!([
            layer([1, 1], json!({"collision": "full", "hideOnSwitch": 3}))
        ]));
        let off = GameVariables::new();
        let on = GameVariables::new().with_switch(3, true);

        let visible = PassabilityResolver::new(&tables, &rules.hide_rules, &off, 0);
        let hidden = PassabilityResolver::new(&tables, &rules.hide_rules, &on, 0);

        assert!(visible.collision(0, 0, 0, None));
        assert!(!visible.is_passable(0, 0, Direction::Down, 0, None));
        assert!(!hidden.collision(0, 0, 0, None));
        assert!(hidden.is_passable(0, 0, Direction::Down, 0, None));
    }

    #[test]
    fn test_arrow_overrides_combine_with_and() {
        let (tables, rules) = tables(json!([
            layer([1, 0], json!({"collision": "arrow", "arrowImpassable": "up"})),
            layer([1, 0], json!({"collision": "arrow", "arrowImpassable": "left", "showOnSwitch": 1}))
        ]));
        let shown = GameVariables::new().with_switch(1, true);
        let not_shown = GameVariables::new();

        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &shown, 0);
        assert_eq!(resolver.arrow(0, 0, 0, None), Directions::DOWN | Directions::RIGHT);
        assert!(!resolver.is_passable(0, 0, Direction::Left, 0, None));
        assert!(resolver.is_passable(0, 0, Direction::Right, 0, None));

        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &not_shown, 0);
        assert_eq!(resolver.arrow(0, 0, 0, None), !Directions::UP);
        assert!(resolver.is_passable(0, 0, Direction::Left, 0, None));
        assert!(!resolver.is_passable(0, 0, Direction::Up, 0, None));
    }

    #[test]
    fn test_region_last_visible_override_wins() {
        let (tables, rules) = tables(json!([
            layer([1, 1], json!({"regionId": 1})),
            layer([1, 0], json!({"regionId": 2, "hideOnSwitch": 5})),
            layer([1, 0], json!({"regionId": 7, "hideOnSwitch": 6}))
        ]));
        let state = GameVariables::new().with_switch(6, true);
        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &state, 0);

        assert_eq!(resolver.region(0, 0, 0, None), 2);
        assert_eq!(resolver.region(1, 0, 0, None), 1);
        assert_eq!(resolver.region_ids(0, 0, 0), vec![1, 2]);
        assert_eq!(tables.override_layer_ids(TableKind::Region, 0), vec![1, 2]);
    }

    #[test]
    fn test_render_hint_bypasses_hide_rules() {
        let (tables, rules) = tables(json!([
            layer([1, 0], json!({"regionId": 9, "hideOnSwitch": 1}))
        ]));
        let state = GameVariables::new().with_switch(1, true);
        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &state, 0);

        assert_eq!(resolver.region(0, 0, 0, None), 0);
        assert_eq!(resolver.region(0, 0, 0, Some(TableKey::Layer(0))), 9);
        assert_eq!(resolver.region(0, 0, 0, Some(TableKey::Main)), 0);
    }

    #[test]
    fn test_hide_on_region_uses_player_region() {
        let (tables, rules) = tables(json!([
            layer([1, 0], json!({"regionId": 4})),
            layer([0, 1], json!({"collision": "full", "hideOnRegion": 4}))
        ]));
        let on_region = GameVariables::new().with_player(0, 0);
        let elsewhere = GameVariables::new().with_player(1, 0);

        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &on_region, 0);
        assert_eq!(resolver.player_region(), Some(4));
        assert!(resolver.is_passable(1, 0, Direction::Left, 0, None));

        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &elsewhere, 0);
        assert_eq!(resolver.player_region(), Some(0));
        assert!(!resolver.is_passable(1, 0, Direction::Left, 0, None));
    }

    #[test]
    fn test_hide_on_level_uses_current_level() {
        let (tables, rules) = tables(json!([
            layer([0, 1], json!({"toLevel": 1})),
            layer([0, 1], json!({"toLevel": 0, "hideOnLevel": 1}))
        ]));
        let state = GameVariables::new();

        let ground = PassabilityResolver::new(&tables, &rules.hide_rules, &state, 0);
        let upstairs = PassabilityResolver::new(&tables, &rules.hide_rules, &state, 1);

        // toLevel 0 is a real target, not the -1 default, so it replaces.
        assert_eq!(ground.level_change(1, 0, 0, None), 0);
        assert_eq!(upstairs.level_change(1, 0, 0, None), 1);
        assert_eq!(ground.level_change(0, 0, 0, None), -1);
    }

    #[test]
    fn test_out_of_bounds_and_missing_levels_are_defaults() {
        let (tables, rules) = tables(json!([layer([1, 1], json!({"regionId": 3}))]));
        let state = GameVariables::new();
        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &state, 0);

        assert_eq!(resolver.region(5, 0, 0, None), 0);
        assert_eq!(resolver.region(0, 0, 2, None), 0);
        assert_eq!(resolver.height_change(-1, 0, 0, None), -1);
        assert!(!resolver.is_passable(2, 0, Direction::Down, 0, None));
        assert!(resolver.is_passable(0, 0, Direction::Down, 2, None));
        assert!(resolver.tile_flags(9, 9, 0, None).is_empty());
        assert!(resolver.region_ids(9, 9, 0).is_empty());
    }

    #[test]
    fn test_has_flag() {
        let document = TiledDocument::load(&json!({
            "width": 1, "height": 1,
            "layers": [{"type": "tilelayer", "name": "flags", "data": [1], "properties": {"tileFlags": true}}],
            "tilesets": [{"firstgid": 1, "tilecount": 1, "tiles": [{"id": 0, "properties": {"flagIsDamage": true}}]}]
        }))
        .unwrap();
        let rules = MapRules::default();
        let tables = LevelTableBuilder::new(&document, &rules, false).build();
        let state = GameVariables::new();
        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &state, 0);

        assert!(resolver.has_flag(&rules.flags, 0, 0, "damage".into(), 0, None));
        assert!(resolver.has_flag(&rules.flags, 0, 0, FlagRef::Index(7), 0, None));
        assert!(!resolver.has_flag(&rules.flags, 0, 0, "ice".into(), 0, None));
        assert!(!resolver.has_flag(&rules.flags, 0, 0, "typo".into(), 0, None));
    }

    #[test]
    fn test_height_change_last_visible_override_wins() {
        let (tables, rules) = tables(json!([
            layer([1, 1], json!({"floorHeight": 1})),
            layer([1, 0], json!({"floorHeight": 3, "hideOnSwitch": 2})),
            layer([1, 0], json!({"floorHeight": 5, "hideOnSwitch": 8}))
        ]));
        let height = |state: &GameVariables, x| {
            PassabilityResolver::new(&tables, &rules.hide_rules, state, 0).height_change(x, 0, 0, None)
        };

        let none = GameVariables::new();
        assert_eq!(height(&none, 0), 5);
        assert_eq!(height(&none, 1), 1);

        let top_hidden = GameVariables::new().with_switch(8, true);
        assert_eq!(height(&top_hidden, 0), 3);

        let all_hidden = GameVariables::new().with_switch(2, true).with_switch(8, true);
        assert_eq!(height(&all_hidden, 0), 1);
        assert_eq!(height(&all_hidden, 1), 1);
    }

    #[test]
    fn test_tile_flag_overrides_union() {
        let document = TiledDocument::load(&json!({
            "width": 2, "height": 1,
            "layers": [
                {"type": "tilelayer", "name": "bushes", "data": [1, 0],
                 "properties": {"tileFlags": true}},
                {"type": "tilelayer", "name": "ladders", "data": [2, 2],
                 "properties": {"tileFlags": true, "hideOnSwitch": 4}}
            ],
            "tilesets": [{"firstgid": 1, "tilecount": 2, "tiles": [
                {"id": 0, "properties": {"flagIsBush": true}},
                {"id": 1, "properties": {"flagIsLadder": true}}
            ]}]
        }))
        .unwrap();
        let rules = MapRules::default();
        let tables = LevelTableBuilder::new(&document, &rules, false).build();
        let flags = &rules.flags;

        let shown = GameVariables::new();
        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &shown, 0);
        assert!(resolver.has_flag(flags, 0, 0, "bush".into(), 0, None));
        assert!(resolver.has_flag(flags, 0, 0, "ladder".into(), 0, None));
        assert!(!resolver.has_flag(flags, 1, 0, "bush".into(), 0, None));
        assert!(resolver.has_flag(flags, 1, 0, "ladder".into(), 0, None));

        let hidden = GameVariables::new().with_switch(4, true);
        let resolver = PassabilityResolver::new(&tables, &rules.hide_rules, &hidden, 0);
        assert!(resolver.has_flag(flags, 0, 0, "bush".into(), 0, None));
        assert!(!resolver.has_flag(flags, 0, 0, "ladder".into(), 0, None));
        assert!(resolver.tile_flags(1, 0, 0, None).is_empty());
        assert_eq!(tables.override_layer_ids(TableKind::TileFlags, 0), vec![1]);
    }
}
