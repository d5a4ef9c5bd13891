//! # `bevy_tiledlevels_core`
//!
//! Game rules for Tiled maps: per-level collision, arrow passability,
//! regions, level and height changes and tile flags, with layers that can
//! be hidden at runtime by switches, levels or regions.
//!
//! **This crate does NOT render or move anything.** Movement controllers and
//! renderers ask [`MapQueryService`](service::MapQueryService) about cells.
//!
//! ## Architecture
//!
//! Layer 2 (this crate) sits on top of **Layer 1** (`bevy_tiledlevels_assets`),
//! which parses the Tiled JSON. Per map load:
//!
//! 1. [`LevelTableBuilder`](builder::LevelTableBuilder) scans tile layers once
//!    and writes dense tables per level: one main table per kind plus one
//!    override table per layer carrying a hide property.
//! 2. [`PassabilityResolver`](resolver::PassabilityResolver) combines the main
//!    table with every override whose hide predicates currently pass.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tiledlevels_assets::TiledLevelsAssetsPlugin;
//! use bevy_tiledlevels_core::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TiledLevelsAssetsPlugin)
//!         .add_plugins(TiledLevelsCorePlugin::default())
//!         .init_resource::<GameVariables>()
//!         .add_systems(Startup, load_map)
//!         .add_systems(Update, check_door)
//!         .run();
//! }
//!
//! fn load_map(mut commands: Commands) {
//!     commands.trigger(LoadMapRequested {
//!         map_id: 1,
//!         path: "maps/town.tmj".into(),
//!     });
//! }
//!
//! fn check_door(service: Res<MapQueryService>, vars: Res<GameVariables>) {
//!     if service.is_ready() && !service.is_passable_at(&*vars, 4, 7, Direction::Up) {
//!         info!("The door is shut");
//!     }
//! }
//! ```

pub mod builder;
pub mod config;
pub mod events;
pub mod flags;
pub mod hide;
pub mod load;
pub mod plugin;
pub mod resolver;
pub mod rules;
pub mod service;
pub mod state;
pub mod tables;

pub mod prelude {
    //! Common imports for `bevy_tiledlevels_core` users.

    pub use crate::builder::LevelTableBuilder;
    pub use crate::config::{ConfigError, TiledLevelsConfig};
    pub use crate::events::{LoadMapRequested, MapLoadFailed, MapTablesBuilt};
    pub use crate::flags::{
        FlagLocation, FlagRef, FlagRegistry, TileFlagRegistration, TileFlags, flag_property_key,
    };
    pub use crate::hide::{
        HideCategory, HideContext, HidePredicateRegistration, HideRuleEngine,
    };
    pub use crate::load::{LoadSequencer, LoadTicket, MapLoadState, MapLoadStatus};
    pub use crate::plugin::TiledLevelsCorePlugin;
    pub use crate::resolver::{Direction, PassabilityResolver};
    pub use crate::rules::MapRules;
    pub use crate::service::{LevelStore, LoadedMap, MapQueryService};
    pub use crate::state::{GameState, GameStateMut, GameVariables};
    pub use crate::tables::{CellTable, Directions, LevelTables, MapTables, TableKey, TableKind};
}

// Re-export plugin types at crate root for convenience
pub use config::TiledLevelsConfig;
pub use plugin::TiledLevelsCorePlugin;
