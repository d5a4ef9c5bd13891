//! Raw Tiled JSON in, passability and region answers out.

use std::sync::Arc;

use bevy_tiledlevels_assets::document::TiledDocument;
use bevy_tiledlevels_core::prelude::*;
use serde_json::json;

fn four_by_four() -> TiledDocument {
    let mut data = vec![0u32; 16];
    // Cell (1, 1)
    data[5] = 1;
    TiledDocument::from_slice(
        json!({
            "width": 4, "height": 4, "tilewidth": 48, "tileheight": 48,
            "layers": [{
                "type": "tilelayer", "name": "walls", "data": data,
                "properties": [{"name": "collision", "type": "string", "value": "full"}]
            }],
            "tilesets": [{"firstgid": 1, "tilecount": 1, "name": "terrain"}]
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap()
}

fn service(half_tile: bool) -> MapQueryService {
    let config = TiledLevelsConfig {
        half_tile,
        ..Default::default()
    };
    MapQueryService::new(Arc::new(MapRules::build(&config)), &config)
}

fn blocked_cells(service: &MapQueryService, state: &GameVariables) -> Vec<(i32, i32)> {
    let (width, height) = service.grid_size();
    let mut blocked = Vec::new();
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            if !service.is_passable_at(state, x, y, Direction::Down) {
                blocked.push((x, y));
            }
        }
    }
    blocked
}

#[test]
fn test_single_wall_blocks_one_cell() {
    let mut service = service(false);
    let state = GameVariables::new();
    service.load_document(1, 1, &four_by_four());

    assert!(service.is_ready());
    assert_eq!(blocked_cells(&service, &state), vec![(1, 1)]);
}

#[test]
fn test_single_wall_blocks_fine_block_under_half_tile() {
    let mut service = service(true);
    let state = GameVariables::new();
    service.load_document(1, 1, &four_by_four());

    assert_eq!(service.grid_size(), (8, 8));
    assert_eq!(
        blocked_cells(&service, &state),
        vec![(2, 2), (3, 2), (2, 3), (3, 3)]
    );
}

#[test]
fn test_bridge_over_river() {
    // Row 1 is a river on level 0 crossed by a bridge on level 1.
    // The bridge railing only blocks while switch 10 is on.
    let document = TiledDocument::load(&json!({
        "width": 3, "height": 3, "tilewidth": 48, "tileheight": 48,
        "layers": [
            {"type": "group", "name": "ground", "layers": [
                {"type": "tilelayer", "name": "river", "data": [0, 0, 0, 1, 1, 1, 0, 0, 0],
                 "properties": {"collision": "full"}},
                {"type": "tilelayer", "name": "regions", "data": [2, 2, 2, 2, 2, 2, 2, 2, 2],
                 "properties": {"regionId": -1, "regionOffset": 0}}
            ]},
            {"type": "tilelayer", "name": "bridge", "data": [0, 1, 0, 0, 1, 0, 0, 1, 0],
             "properties": {"level": 1, "collision": "arrow", "arrowImpassable": "left, right"}},
            {"type": "tilelayer", "name": "railing", "data": [0, 0, 0, 0, 1, 0, 0, 0, 0],
             "properties": {"level": 1, "collision": "full", "showOnSwitch": 10}},
            {"type": "tilelayer", "name": "ramps", "data": [0, 1, 0, 0, 0, 0, 0, 1, 0],
             "properties": {"toLevel": 1, "floorHeight": 1}},
            {"type": "tilelayer", "name": "bushes", "data": [1, 0, 0, 0, 0, 0, 0, 0, 0],
             "properties": {"tileFlags": true}}
        ],
        "tilesets": [{
            "firstgid": 1, "tilecount": 2,
            "tiles": [
                {"id": 0, "properties": [{"name": "flagIsBush", "type": "bool", "value": true}]},
                {"id": 1, "properties": [{"name": "regionId", "type": "int", "value": 6}]}
            ]
        }]
    }))
    .unwrap();

    let mut service = service(false);
    let mut state = GameVariables::new();
    service.load_document(7, 1, &document);

    // Level 0: the river blocks, ramps lead up.
    assert!(!service.is_passable_at(&state, 1, 1, Direction::Up));
    assert!(service.is_passable_at(&state, 1, 0, Direction::Down));
    assert_eq!(service.level_change_at(&state, 1, 0), 1);
    assert_eq!(service.height_change_at(&state, 1, 2), 1);
    assert_eq!(service.region_id(&state, 2, 2), 6);
    assert!(service.has_flag(&state, 0, 0, "bush"));
    assert!(!service.has_flag(&state, 1, 0, "bush"));

    // Level 1: the bridge only allows vertical movement, the railing is hidden.
    service.set_level(&mut state, 1);
    assert!(service.is_passable_at(&state, 1, 1, Direction::Up));
    assert!(!service.is_passable_at(&state, 1, 1, Direction::Left));
    assert!(service.is_passable_at(&state, 0, 1, Direction::Left));
    assert_eq!(service.override_layer_ids(TableKind::Collision, 1), vec![4]);

    state.set_switch(10, true);
    assert!(!service.is_passable_at(&state, 1, 1, Direction::Up));
    assert!(service.passability(
        &state,
        1,
        1,
        Direction::Up,
        Some(TableKey::Main),
        None
    ));
}

#[test]
fn test_infinite_map_is_cropped_before_building() {
    let mut chunk = vec![0u32; 16 * 16];
    // Non-empty cells at absolute (-12, 4) and (-10, 6).
    chunk[4 * 16 + 4] = 1;
    chunk[6 * 16 + 6] = 1;
    let document = TiledDocument::from_slice(
        json!({
            "width": 16, "height": 16, "tilewidth": 48, "tileheight": 48, "infinite": true,
            "properties": {"autoSize": "deep", "border": "1"},
            "layers": [{
                "type": "tilelayer", "name": "walls",
                "chunks": [{"x": -16, "y": 0, "width": 16, "height": 16, "data": chunk}],
                "properties": {"collision": "full"}
            }],
            "tilesets": [{"firstgid": 1, "tilecount": 1}]
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap();

    // Deep crop gives x in -12..-9 and y in 4..7, border 1 grows it to 5x5.
    assert_eq!((document.width, document.height), (5, 5));
    assert_eq!((document.offset.x, document.offset.y), (-13, 3));

    let mut service = service(false);
    let state = GameVariables::new();
    service.load_document(2, 1, &document);

    assert_eq!(blocked_cells(&service, &state), vec![(1, 1), (3, 3)]);

    let map = service.map().unwrap();
    assert_eq!(map.pixel_to_cell(-12.0 * 48.0, 4.0 * 48.0), (1, 1));
}
