//! Map load sequencing.
//!
//! Every request gets a generation from [`LoadSequencer`]. Only the latest
//! generation may install tables; an older load still in flight is dropped
//! when a newer request arrives.

use std::time::Duration;

use bevy::asset::RecursiveDependencyLoadState;
use bevy::platform::time::Instant;
use bevy::prelude::*;
use bevy_tiledlevels_assets::prelude::{TiledLevelsMapAsset, TiledTilesetAsset};

use crate::config::TiledLevelsConfig;
use crate::events::{LoadMapRequested, MapLoadFailed, MapTablesBuilt};
use crate::service::MapQueryService;

/// Identifies one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub map_id: u32,
}

/// Hands out increasing load generations.
#[derive(Debug, Default)]
pub struct LoadSequencer {
    latest: u64,
}

impl LoadSequencer {
    pub fn next(&mut self, map_id: u32) -> LoadTicket {
        self.latest += 1;
        LoadTicket {
            generation: self.latest,
            map_id,
        }
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }

    pub fn is_current(&self, ticket: &LoadTicket) -> bool {
        ticket.generation == self.latest
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MapLoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug)]
pub struct PendingMapLoad {
    pub ticket: LoadTicket,
    pub handle: Handle<TiledLevelsMapAsset>,
    pub started: Instant,
}

/// The single in-flight map load and the outcome of the last one.
#[derive(Resource, Debug, Default)]
pub struct MapLoadState {
    sequencer: LoadSequencer,
    pending: Option<PendingMapLoad>,
    status: MapLoadStatus,
}

impl MapLoadState {
    pub fn status(&self) -> &MapLoadStatus {
        &self.status
    }

    pub fn pending(&self) -> Option<&PendingMapLoad> {
        self.pending.as_ref()
    }

    /// Start tracking a load, superseding any pending one.
    pub fn begin(&mut self, map_id: u32, handle: Handle<TiledLevelsMapAsset>) -> LoadTicket {
        let ticket = self.sequencer.next(map_id);
        if let Some(previous) = self.pending.take() {
            debug!(
                "Map load {} (generation {}) superseded by map {}",
                previous.ticket.map_id, previous.ticket.generation, map_id
            );
        }
        self.pending = Some(PendingMapLoad {
            ticket,
            handle,
            started: Instant::now(),
        });
        self.status = MapLoadStatus::Loading;
        ticket
    }

    /// Close the load of `ticket`. Returns `false` for a stale ticket, which
    /// leaves the state untouched.
    pub fn finish(&mut self, ticket: LoadTicket, status: MapLoadStatus) -> bool {
        if !self.sequencer.is_current(&ticket) {
            return false;
        }
        if self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.ticket == ticket)
        {
            self.pending = None;
        }
        self.status = status;
        true
    }

    fn timed_out(&self, timeout: Option<Duration>) -> bool {
        match (timeout, &self.pending) {
            (Some(timeout), Some(pending)) => pending.started.elapsed() > timeout,
            _ => false,
        }
    }
}

/// Observer for [`LoadMapRequested`].
///
/// The previous map is uninstalled right away: queries answer "not ready"
/// until the requested map is built.
pub fn request_map_load(
    trigger: On<LoadMapRequested>,
    asset_server: Res<AssetServer>,
    mut load_state: ResMut<MapLoadState>,
    mut service: ResMut<MapQueryService>,
) {
    let request = trigger.event();
    let handle = asset_server.load::<TiledLevelsMapAsset>(request.path.clone());
    service.clear();
    let ticket = load_state.begin(request.map_id, handle);
    info!(
        "Loading map {} from '{}' (generation {})",
        request.map_id, request.path, ticket.generation
    );
}

/// Installs the pending map once it and its tilesets are loaded.
///
/// Runs in `PreUpdate` so queries in `Update` see the new tables.
pub fn poll_map_load(
    asset_server: Res<AssetServer>,
    maps: Res<Assets<TiledLevelsMapAsset>>,
    tilesets: Res<Assets<TiledTilesetAsset>>,
    config: Res<TiledLevelsConfig>,
    mut load_state: ResMut<MapLoadState>,
    mut service: ResMut<MapQueryService>,
    mut commands: Commands,
) {
    let Some(pending) = load_state.pending() else {
        return;
    };
    let ticket = pending.ticket;
    let handle = pending.handle.clone();

    let failure = match asset_server.get_recursive_dependency_load_state(&handle) {
        Some(RecursiveDependencyLoadState::Loaded) => {
            let Some(asset) = maps.get(&handle) else {
                return;
            };
            let document = asset.resolved_document(&tilesets);
            service.load_document(ticket.map_id, ticket.generation, &document);
            let levels = service
                .map()
                .map(|map| map.tables.level_ids())
                .unwrap_or_default();
            load_state.finish(ticket, MapLoadStatus::Ready);
            commands.trigger(MapTablesBuilt {
                map_id: ticket.map_id,
                generation: ticket.generation,
                levels,
            });
            return;
        }
        Some(RecursiveDependencyLoadState::Failed(err)) => err.to_string(),
        _ if load_state.timed_out(config.load_timeout) => format!(
            "timed out after {:?}",
            config.load_timeout.unwrap_or_default()
        ),
        _ => return,
    };

    error!("Failed to load map {}: {}", ticket.map_id, failure);
    load_state.finish(ticket, MapLoadStatus::Failed(failure.clone()));
    commands.trigger(MapLoadFailed {
        map_id: ticket.map_id,
        generation: ticket.generation,
        reason: failure,
    });
}
