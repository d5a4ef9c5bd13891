//! Load a map with a bridge over a river and print its passability per level.
//!
//! This example shows:
//! - Requesting a map load with `LoadMapRequested`
//! - Reacting to `MapTablesBuilt` / `MapLoadFailed` with observers
//! - Querying `MapQueryService` with a `GameVariables` game state

use std::time::Duration;

use bevy::prelude::*;
use bevy_tiledlevels_assets::TiledLevelsAssetsPlugin;
use bevy_tiledlevels_core::prelude::*;

fn main() {
    App::new()
        .add_plugins((
            MinimalPlugins,
            AssetPlugin::default(),
            bevy::log::LogPlugin::default(),
            TiledLevelsAssetsPlugin,
            TiledLevelsCorePlugin::new(TiledLevelsConfig {
                load_timeout: Some(Duration::from_secs(5)),
                ..Default::default()
            }),
        ))
        .init_resource::<GameVariables>()
        .add_observer(print_tables)
        .add_observer(|trigger: On<MapLoadFailed>, mut exit: MessageWriter<AppExit>| {
            error!("Map {} failed: {}", trigger.event().map_id, trigger.event().reason);
            exit.write(AppExit::error());
        })
        .add_systems(Startup, load_map)
        .run();
}

fn load_map(mut commands: Commands) {
    commands.trigger(LoadMapRequested {
        map_id: 1,
        path: "maps/bridge.tmj".into(),
    });
}

/// Draw each level as a grid: `#` blocked, `|` vertical only, `.` open.
fn print_tables(
    trigger: On<MapTablesBuilt>,
    service: Res<MapQueryService>,
    vars: Res<GameVariables>,
    mut exit: MessageWriter<AppExit>,
) {
    let (width, height) = service.grid_size();
    info!("Map {} levels: {:?}", trigger.event().map_id, trigger.event().levels);

    for level in trigger.event().levels.clone() {
        info!("Level {}:", level);
        for y in 0..height as i32 {
            let row: String = (0..width as i32)
                .map(|x| {
                    let open = |d| service.passability(&*vars, x, y, d, None, Some(level));
                    match (open(Direction::Up), open(Direction::Left)) {
                        (false, false) => '#',
                        (true, false) => '|',
                        _ => '.',
                    }
                })
                .collect();
            info!("  {}", row);
        }
    }

    info!("Region at (0, 0): {}", service.region_id(&*vars, 0, 0));
    info!("Bush at (0, 0): {}", service.has_flag(&*vars, 0, 0, "bush"));
    info!("Ramp at (2, 0) leads to level {}", service.level_change_at(&*vars, 2, 0));

    exit.write(AppExit::Success);
}
