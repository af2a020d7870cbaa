use roam_core::SplitMix64;
use roam_map::{MapError, RouteDestination, SceneConfig, SceneMap};
use roam_nav::Vec2;

const ROW_OF_THREE: &str = r#"
rooms:
  - id: a
    name: Room A
    position: { x: 0.0, y: 0.0, z: 0.0 }
    size: { x: 4.0, y: 2.0, z: 4.0 }
    connection_points:
      east: { x: 2.0, z: 0.0 }
  - id: b
    name: Room B
    position: { x: 10.0, y: 0.0, z: 0.0 }
    size: { x: 4.0, y: 2.0, z: 4.0 }
    connection_points:
      west: { x: -2.0, z: 0.0 }
      east: { x: 2.0, z: 0.0 }
  - id: c
    name: Room C
    position: { x: 20.0, y: 0.0, z: 0.0 }
    size: { x: 4.0, y: 2.0, z: 4.0 }
    connection_points:
      west: { x: -2.0, z: 0.0 }
corridors:
  - { id: ab, room_a: a, room_b: b, connection_a: east, connection_b: west, width: 2.0 }
  - { id: bc, room_a: b, room_b: c, connection_a: east, connection_b: west, width: 2.0 }
"#;

fn row_of_three() -> SceneMap {
    let config = SceneConfig::from_yaml_str(ROW_OF_THREE).expect("parse scene");
    SceneMap::build(&config).expect("build scene")
}

#[test]
fn embedded_castle_builds() {
    let config = SceneConfig::embedded().expect("parse embedded scene");
    let scene = SceneMap::build(&config).expect("build embedded scene");

    assert_eq!(scene.rooms().len(), 19);
    assert_eq!(scene.corridors().len(), 20);
    assert!(scene.corridors().iter().all(|c| c.is_initialized()));
    for room in scene.rooms() {
        assert!(
            room.unreachable_connections().is_empty(),
            "{} has unreachable doorways",
            room.id()
        );
    }
}

#[test]
fn embedded_castle_is_connected() {
    let scene = SceneMap::build(&SceneConfig::embedded().expect("parse")).expect("build");
    let ids: Vec<&str> = scene.room_ids().collect();
    for id in &ids {
        let path = scene.graph().find_room_path("gryffindor", id);
        assert!(!path.is_empty(), "{id} unreachable from gryffindor");
    }
}

#[test]
fn rooms_keep_configuration_order() {
    let scene = row_of_three();
    assert_eq!(scene.room_ids().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    assert_eq!(scene.room("b").map(|r| r.name()), Some("Room B"));
    assert!(scene.room("z").is_none());
}

#[test]
fn room_at_and_corridor_between() {
    let scene = row_of_three();
    assert_eq!(scene.room_at(Vec2::new(10.5, 0.5)).map(|r| r.id()), Some("b"));
    assert!(scene.room_at(Vec2::new(5.0, 0.0)).is_none());

    assert_eq!(scene.corridor_between("b", "a").map(|c| c.id()), Some("ab"));
    assert!(scene.corridor_between("a", "c").is_none());
    assert_eq!(scene.corridor_at(Vec2::new(5.0, 0.5)).map(|c| c.id()), Some("ab"));
}

#[test]
fn scene_walkability_checks_rooms_then_corridors() {
    let scene = row_of_three();
    assert!(scene.is_walkable(Vec2::new(0.0, 0.0)));
    assert!(scene.is_walkable(Vec2::new(5.0, 0.5)));
    assert!(!scene.is_walkable(Vec2::new(5.0, 1.5)));
    assert!(!scene.is_walkable(Vec2::new(30.0, 0.0)));
}

#[test]
fn nearest_walkable_point_is_none_off_the_map() {
    let scene = row_of_three();
    assert!(scene.nearest_walkable_point(Vec2::new(30.0, 30.0), Some("a")).is_none());

    let inside = Vec2::new(0.5, 0.5);
    assert_eq!(scene.nearest_walkable_point(inside, Some("a")), Some(inside));
}

#[test]
fn route_starts_at_position_and_ends_at_target() {
    let scene = row_of_three();
    let rooms = scene.graph().find_room_path("a", "c");
    assert_eq!(rooms, vec!["a", "b", "c"]);

    let from = Vec2::new(0.0, 0.0);
    let target = Vec2::new(20.5, 0.5);
    let mut rng = SplitMix64::new(1);
    let route = scene.build_route(&rooms, from, RouteDestination::Point(target), &mut rng);

    assert_eq!(route.points.first().copied(), Some(from));
    assert_eq!(route.points.last().copied(), Some(target));

    let b = scene.room("b").expect("room b");
    assert!(route.points.iter().any(|p| b.contains_point(*p)));
}

#[test]
fn route_runs_corridors_in_travel_direction() {
    let scene = row_of_three();
    let rooms = scene.graph().find_room_path("c", "a");
    assert_eq!(rooms, vec!["c", "b", "a"]);

    let mut rng = SplitMix64::new(2);
    let route = scene.build_route(
        &rooms,
        Vec2::new(20.0, 0.0),
        RouteDestination::Point(Vec2::new(0.0, 0.0)),
        &mut rng,
    );

    for w in route.points.windows(2) {
        assert!(w[1].x <= w[0].x, "route doubles back at {:?}", w);
    }
}

#[test]
fn explore_route_ends_inside_destination_room() {
    let scene = row_of_three();
    let rooms = scene.graph().find_room_path("a", "b");
    let mut rng = SplitMix64::new(9);
    let route = scene.build_route(&rooms, Vec2::new(-1.0, 0.0), RouteDestination::Explore, &mut rng);

    let end = route.points.last().copied().expect("non-empty route");
    let b = scene.room("b").expect("room b");
    assert!(b.is_walkable(end));
}

#[test]
fn duplicate_room_is_rejected() {
    let yaml = r#"
rooms:
  - { id: a, name: A, position: { x: 0.0, y: 0.0, z: 0.0 }, size: { x: 2.0, y: 1.0, z: 2.0 } }
  - { id: a, name: A2, position: { x: 5.0, y: 0.0, z: 0.0 }, size: { x: 2.0, y: 1.0, z: 2.0 } }
"#;
    let config = SceneConfig::from_yaml_str(yaml).expect("parse");
    assert!(matches!(SceneMap::build(&config), Err(MapError::DuplicateRoom(id)) if id == "a"));
}

#[test]
fn corridor_to_unknown_room_is_rejected() {
    let yaml = r#"
rooms:
  - { id: a, name: A, position: { x: 0.0, y: 0.0, z: 0.0 }, size: { x: 2.0, y: 1.0, z: 2.0 } }
corridors:
  - { id: lost, room_a: a, room_b: nowhere, connection_a: east, connection_b: west, width: 1.0 }
"#;
    let config = SceneConfig::from_yaml_str(yaml).expect("parse");
    match config.validate() {
        Err(MapError::UnknownRoom { corridor, room }) => {
            assert_eq!(corridor, "lost");
            assert_eq!(room, "nowhere");
        }
        other => panic!("expected UnknownRoom, got {other:?}"),
    }
}

#[test]
fn bad_geometry_and_settings_are_rejected() {
    let mut config = SceneConfig::from_yaml_str(ROW_OF_THREE).expect("parse");
    config.corridors[0].width = 0.0;
    assert!(matches!(config.validate(), Err(MapError::InvalidGeometry { .. })));

    let mut config = SceneConfig::from_yaml_str(ROW_OF_THREE).expect("parse");
    config.nav.room_grid_step = -0.3;
    assert!(matches!(config.validate(), Err(MapError::InvalidNavSettings(_))));

    let mut config = SceneConfig::from_yaml_str(ROW_OF_THREE).expect("parse");
    config.rooms[1].size.x = 0.0;
    assert!(matches!(config.validate(), Err(MapError::InvalidGeometry { .. })));
}

#[test]
fn malformed_yaml_is_an_error() {
    assert!(matches!(
        SceneConfig::from_yaml_str("rooms: [ { id: a } ]"),
        Err(MapError::Yaml(_))
    ));
}

#[test]
fn nav_settings_default_when_omitted() {
    let config = SceneConfig::from_yaml_str(ROW_OF_THREE).expect("parse");
    assert_eq!(config.nav.room_grid_step, 0.3);
    assert_eq!(config.nav.corridor_grid_step, 0.2);
    assert_eq!(config.nav.room_interior_scale, 0.85);
}

#[test]
fn scene_config_roundtrips_via_serde_json() {
    let config = SceneConfig::embedded().expect("parse");
    let json = serde_json::to_string(&config).expect("serialize");
    let back: SceneConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back.rooms.len(), config.rooms.len());
    assert_eq!(back.corridors.len(), config.corridors.len());
    assert_eq!(back.nav, config.nav);
}
