//! # bevy_tiledlevels
//!
//! Tiled map levels for Bevy: collision, arrow passability, regions, level
//! and height changes and tile flags, built from Tiled JSON maps.
//!
//! This is a meta-crate that combines the `bevy_tiledlevels_*` sub-crates.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_tiledlevels::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(TiledLevelsPlugin::default())
//!         .init_resource::<GameVariables>()
//!         .add_systems(Startup, load_map)
//!         .run();
//! }
//!
//! fn load_map(mut commands: Commands) {
//!     commands.trigger(LoadMapRequested {
//!         map_id: 1,
//!         path: "maps/town.tmj".into(),
//!     });
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Layer 1** ([`assets`]): Tiled JSON maps (.tmj, .json) and tilesets (.tsj)
//!   as Bevy assets, normalized into a `TiledDocument`
//! - **Layer 2** ([`core`]): level tables, hide rules and the `MapQueryService`
//!
//! Rendering and character movement are left to the host; they read the
//! `MapQueryService` resource.
//!
//! ## Registering flags and hide predicates
//!
//! ```rust,ignore
//! use bevy_tiledlevels::core::flags::TileFlagRegistration;
//!
//! bevy_tiledlevels::inventory::submit! {
//!     TileFlagRegistration { name: "swamp" }
//! }
//! ```

pub mod plugin;

// Re-export sub-crates for advanced usage
pub use bevy_tiledlevels_assets as assets;
pub use bevy_tiledlevels_core as core;

// Re-exported so registrations need no extra dependency
pub use inventory;
pub use tiled;

/// Unified prelude for `bevy_tiledlevels`.
pub mod prelude {
    pub use crate::assets::prelude::*;
    pub use crate::core::prelude::*;

    pub use crate::plugin::TiledLevelsPlugin;
}
