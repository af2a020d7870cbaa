use roam_agents::{Behavior, BehaviorConfig, Character, CharacterConfig, Walker, ARRIVAL_PAUSE};
use roam_core::TickContext;
use roam_map::{SceneConfig, SceneMap};
use roam_nav::Vec2;

const ROW_WITH_ISLAND: &str = r#"
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
  - id: island
    name: Island
    position: { x: 40.0, y: 0.0, z: 0.0 }
    size: { x: 4.0, y: 2.0, z: 4.0 }
corridors:
  - { id: ab, room_a: a, room_b: b, connection_a: east, connection_b: west, width: 2.0 }
  - { id: bc, room_a: b, room_b: c, connection_a: east, connection_b: west, width: 2.0 }
"#;

const DT: f32 = 0.1;

fn scene() -> SceneMap {
    let config = SceneConfig::from_yaml_str(ROW_WITH_ISLAND).expect("parse scene");
    SceneMap::build(&config).expect("build scene")
}

fn character(id: &str, seed: u64) -> Character {
    let config = CharacterConfig {
        id: id.to_string(),
        name: id.to_uppercase(),
        color: "#336699".to_string(),
        speed: 3.0,
    };
    Character::new(&config, BehaviorConfig::default(), seed)
}

fn tick(n: u64) -> TickContext {
    TickContext::new(n, DT, 0)
}

/// A character standing at the center of room `a` with nothing to do.
fn parked_in_a(scene: &SceneMap) -> Character {
    let mut c = character("hermione", 7);
    c.initialize(scene);
    c.teleport(Vec2::new(0.0, 0.0), scene);
    c.assign_behavior(
        Behavior::Wait {
            duration: 1000.0,
            remaining: 1000.0,
        },
        scene,
    );
    c
}

#[test]
fn initialize_places_on_walkable_ground_with_a_behavior() {
    let scene = scene();
    for seed in 0..20 {
        let mut c = character("ron", seed);
        c.initialize(&scene);
        assert!(scene.is_walkable(c.position_2d()), "seed {seed}");
        assert_eq!(c.generation(), 1);
        assert!(scene.room(c.current_room()).is_some());
    }
}

#[test]
fn wait_does_not_move() {
    let scene = scene();
    let mut c = parked_in_a(&scene);
    let start = c.position_2d();
    for n in 0..50 {
        c.update(&tick(n), &scene);
    }
    assert_eq!(c.position_2d(), start);
    assert!(c.path().is_empty());
}

#[test]
fn wait_timer_completes_on_the_crossing_tick() {
    let scene = scene();
    let mut c = parked_in_a(&scene);
    c.assign_behavior(
        Behavior::Wait {
            duration: 0.25,
            remaining: 0.25,
        },
        &scene,
    );
    let generation = c.generation();

    c.update(&tick(0), &scene);
    c.update(&tick(1), &scene);
    assert_eq!(c.generation(), generation);
    c.update(&tick(2), &scene);
    assert_eq!(c.generation(), generation + 1);
}

#[test]
fn roam_stays_inside_the_room() {
    let scene = scene();
    let mut c = parked_in_a(&scene);
    c.assign_behavior(
        Behavior::Roam {
            target_room: "a".to_string(),
            duration: 1000.0,
            remaining: 1000.0,
        },
        &scene,
    );
    let room = scene.room("a").expect("room a");

    let mut moved = false;
    for n in 0..300 {
        let before = c.position_2d();
        c.update(&tick(n), &scene);
        moved |= c.position_2d() != before;
        assert!(room.contains_point(c.position_2d()));
        assert!(scene.is_walkable(c.position_2d()));
    }
    assert!(moved);
}

#[test]
fn move_to_current_room_becomes_roam() {
    let scene = scene();
    let mut c = parked_in_a(&scene);
    c.assign_behavior(
        Behavior::MoveToTarget {
            target_room: "a".to_string(),
            target_position: None,
        },
        &scene,
    );
    assert!(matches!(
        c.behavior(),
        Some(Behavior::Roam { target_room, .. }) if target_room == "a"
    ));
}

#[test]
fn travel_arrives_then_picks_a_new_behavior() {
    let scene = scene();
    let mut c = parked_in_a(&scene);
    c.assign_behavior(
        Behavior::MoveToTarget {
            target_room: "c".to_string(),
            target_position: None,
        },
        &scene,
    );
    let generation = c.generation();
    assert!(c.path().len() >= 2);

    let mut n = 0;
    while c.pending_events() == 0 {
        c.update(&tick(n), &scene);
        assert!(scene.is_walkable(c.position_2d()), "off the map at {:?}", c.position_2d());
        n += 1;
        assert!(n < 1000, "never arrived");
    }
    assert_eq!(c.current_room(), "c");
    assert_eq!(c.generation(), generation);

    let mut paused = 0;
    while c.pending_events() > 0 {
        c.update(&tick(n), &scene);
        n += 1;
        paused += 1;
        assert!(paused <= 10, "arrival event never fired");
    }
    assert!(paused as f32 * DT >= ARRIVAL_PAUSE - 1e-4);
    assert_eq!(c.generation(), generation + 1);
}

#[test]
fn stale_arrival_event_is_ignored() {
    let scene = scene();
    let mut c = parked_in_a(&scene);
    c.assign_behavior(
        Behavior::MoveToTarget {
            target_room: "b".to_string(),
            target_position: None,
        },
        &scene,
    );

    let mut n = 0;
    while c.pending_events() == 0 {
        c.update(&tick(n), &scene);
        n += 1;
        assert!(n < 1000, "never arrived");
    }

    c.assign_behavior(
        Behavior::Wait {
            duration: 100.0,
            remaining: 100.0,
        },
        &scene,
    );
    let generation = c.generation();

    for _ in 0..10 {
        c.update(&tick(n), &scene);
        n += 1;
    }
    assert_eq!(c.pending_events(), 0);
    assert_eq!(c.generation(), generation);
    assert!(matches!(c.behavior(), Some(Behavior::Wait { duration, .. }) if *duration == 100.0));
}

#[test]
fn unreachable_room_clears_behavior_until_next_tick() {
    let scene = scene();
    let mut c = parked_in_a(&scene);
    c.assign_behavior(
        Behavior::MoveToTarget {
            target_room: "island".to_string(),
            target_position: None,
        },
        &scene,
    );
    assert!(c.behavior().is_none());
    assert!(c.path().is_empty());
    let start = c.position_2d();
    let generation = c.generation();

    c.update(&tick(0), &scene);
    assert_eq!(c.generation(), generation + 1);
    assert_eq!(c.position_2d(), start);
}

#[test]
fn same_seed_and_id_replay_identically() {
    let scene = scene();
    let mut first = character("luna", 42);
    let mut second = character("luna", 42);
    first.initialize(&scene);
    second.initialize(&scene);

    for n in 0..400 {
        first.update(&tick(n), &scene);
        second.update(&tick(n), &scene);
        assert_eq!(first.position_2d(), second.position_2d());
        assert_eq!(first.behavior(), second.behavior());
    }
}

#[test]
fn wandering_never_leaves_walkable_ground() {
    let scene = scene();
    for seed in 0..4 {
        let mut c = character("neville", seed);
        c.initialize(&scene);
        for n in 0..1500 {
            c.update(&tick(n), &scene);
            assert!(
                scene.is_walkable(c.position_2d()),
                "seed {seed} tick {n} at {:?}",
                c.position_2d()
            );
        }
    }
}
