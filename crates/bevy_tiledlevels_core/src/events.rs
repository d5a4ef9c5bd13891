//! Typed events for map loading.
//!
//! Hosts trigger [`LoadMapRequested`]; the plugin answers with exactly one
//! of [`MapTablesBuilt`] or [`MapLoadFailed`] per request that is not
//! superseded by a newer one.

use bevy::prelude::*;

/// Request loading the Tiled JSON map at `path` as map `map_id`.
///
/// # Example
///
/// ```ignore
/// fn enter_town(mut commands: Commands) {
///     commands.trigger(LoadMapRequested {
///         map_id: 3,
///         path: "maps/town.tmj".into(),
///     });
/// }
/// ```
#[derive(Event, Debug, Clone)]
pub struct LoadMapRequested {
    pub map_id: u32,
    /// Asset path of the map document.
    pub path: String,
}

/// Fired once the tables of a map are installed in `MapQueryService`.
///
/// ```ignore
/// app.add_observer(|trigger: On<MapTablesBuilt>| {
///     info!("Map {} ready with levels {:?}", trigger.event().map_id, trigger.event().levels);
/// });
/// ```
#[derive(Event, Debug, Clone)]
pub struct MapTablesBuilt {
    pub map_id: u32,
    pub generation: u64,
    /// Levels that received tables, ascending.
    pub levels: Vec<i32>,
}

/// Fired when a map or one of its tilesets failed to load or timed out.
#[derive(Event, Debug, Clone)]
pub struct MapLoadFailed {
    pub map_id: u32,
    pub generation: u64,
    pub reason: String,
}
