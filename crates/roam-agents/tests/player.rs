use roam_agents::stuck::{MIN_PROGRESS, STUCK_TIMEOUT};
use roam_agents::{PlayerCharacter, PlayerConfig, StuckDetector, Walker, PLAYER_ID};
use roam_core::TickContext;
use roam_map::{SceneConfig, SceneMap};
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

const DT: f32 = 0.1;

fn scene() -> SceneMap {
    let config = SceneConfig::from_yaml_str(ROW_OF_THREE).expect("parse scene");
    SceneMap::build(&config).expect("build scene")
}

fn player_at(position: Vec2, scene: &SceneMap) -> PlayerCharacter {
    let mut player = PlayerCharacter::new(&PlayerConfig::default(), 1);
    player.initialize(scene);
    player.place(position, scene);
    player
}

fn walk_until_idle(player: &mut PlayerCharacter, scene: &SceneMap) {
    let mut n = 0;
    while player.is_moving() {
        player.update(&TickContext::new(n, DT, 1), scene);
        assert!(scene.is_walkable(player.position_2d()));
        n += 1;
        assert!(n < 1000, "player never finished the path");
    }
}

#[test]
fn defaults() {
    let config = PlayerConfig::default();
    assert_eq!(config.name, "You");
    assert_eq!(config.color, "#ff0000");
    assert_eq!(config.speed, 4.0);

    let player = PlayerCharacter::new(&config, 0);
    assert_eq!(player.id(), PLAYER_ID);
    assert!(!player.is_moving());
}

#[test]
fn initialize_lands_on_walkable_ground() {
    let scene = scene();
    for seed in 0..10 {
        let mut player = PlayerCharacter::new(&PlayerConfig::default(), seed);
        player.initialize(&scene);
        assert!(scene.is_walkable(player.position_2d()));
    }
}

#[test]
fn click_to_move_across_rooms() {
    let scene = scene();
    let mut player = player_at(Vec2::new(0.0, 0.0), &scene);
    let target = Vec2::new(20.5, 0.5);

    assert!(player.set_target_position(target, &scene));
    assert_eq!(player.target_position(), Some(target));
    assert!(player.is_moving());

    walk_until_idle(&mut player, &scene);
    assert!(player.position_2d().distance(target) < 1e-4);
    assert_eq!(player.current_room(), "c");
    assert_eq!(player.target_position(), None);
    assert!(player.path().is_empty());
}

#[test]
fn click_to_move_within_room() {
    let scene = scene();
    let mut player = player_at(Vec2::new(10.0, 0.0), &scene);
    let target = Vec2::new(11.0, 1.0);

    assert!(player.set_target_position(target, &scene));
    walk_until_idle(&mut player, &scene);
    assert!(player.position_2d().distance(target) < 1e-4);
    assert_eq!(player.current_room(), "b");
}

#[test]
fn click_near_the_wall_ends_on_walkable_ground() {
    let scene = scene();
    let mut player = player_at(Vec2::new(10.0, 0.0), &scene);
    let target = Vec2::new(11.0, 1.9);
    assert!(!scene.is_walkable(target));

    assert!(player.set_target_position(target, &scene));
    walk_until_idle(&mut player, &scene);
    assert!(scene.is_walkable(player.position_2d()));
    assert!(player.position_2d().distance(target) < 0.5);
    assert_eq!(player.target_position(), None);
}

#[test]
fn target_outside_every_room_is_refused() {
    let scene = scene();
    let mut player = player_at(Vec2::new(0.0, 0.0), &scene);

    assert!(!player.set_target_position(Vec2::new(5.0, 0.0), &scene));
    assert!(!player.set_target_position(Vec2::new(30.0, 0.0), &scene));
    assert!(!player.is_moving());
    assert_eq!(player.target_position(), None);
}

#[test]
fn direction_input_moves_speed_times_dt() {
    let scene = scene();
    let mut player = player_at(Vec2::new(0.0, 0.0), &scene);

    assert!(player.move_in_direction(Vec2::new(1.0, 0.0), DT, &scene));
    assert!(player.position_2d().distance(Vec2::new(0.4, 0.0)) < 1e-5);
    assert_eq!(player.facing(), Vec2::new(1.0, 0.0));

    // Input direction is normalized.
    assert!(player.move_in_direction(Vec2::new(0.0, -5.0), DT, &scene));
    assert!(player.position_2d().distance(Vec2::new(0.4, -0.4)) < 1e-5);
}

#[test]
fn zero_direction_is_ignored() {
    let scene = scene();
    let mut player = player_at(Vec2::new(0.0, 0.0), &scene);
    assert!(!player.move_in_direction(Vec2::new(0.0, 0.0), DT, &scene));
    assert_eq!(player.position_2d(), Vec2::new(0.0, 0.0));
}

#[test]
fn direction_input_off_the_map_is_blocked() {
    let scene = scene();
    let mut player = player_at(Vec2::new(0.0, 1.5), &scene);
    assert!(!player.move_in_direction(Vec2::new(0.0, 1.0), 1.0, &scene));
    assert_eq!(player.position_2d(), Vec2::new(0.0, 1.5));
}

#[test]
fn direction_input_cancels_click_target() {
    let scene = scene();
    let mut player = player_at(Vec2::new(0.0, 0.0), &scene);
    assert!(player.set_target_position(Vec2::new(20.0, 0.0), &scene));

    assert!(player.move_in_direction(Vec2::new(0.0, 1.0), DT, &scene));
    assert!(!player.is_moving());
    assert!(player.path().is_empty());
    assert_eq!(player.target_position(), None);
}

#[test]
fn idle_player_is_never_reset() {
    let scene = scene();
    let mut player = player_at(Vec2::new(1.0, 1.0), &scene);
    for n in 0..200 {
        player.update(&TickContext::new(n, DT, 1), &scene);
    }
    assert_eq!(player.position_2d(), Vec2::new(1.0, 1.0));
}

#[test]
fn stuck_detector_fires_after_timeout_without_progress() {
    let mut detector = StuckDetector::new();
    let p = Vec2::new(1.0, 1.0);

    let ticks = (STUCK_TIMEOUT / 0.5).round() as usize;
    for _ in 0..ticks - 1 {
        assert!(!detector.observe(p, true, 0.5));
    }
    assert!(detector.observe(p, true, 0.5));
    assert_eq!(detector.elapsed(), 0.0);
}

#[test]
fn stuck_detector_rearms_on_progress() {
    let mut detector = StuckDetector::new();
    detector.observe(Vec2::new(0.0, 0.0), true, 4.0);
    assert_eq!(detector.elapsed(), 4.0);

    let moved = Vec2::new(MIN_PROGRESS + 0.1, 0.0);
    assert!(!detector.observe(moved, true, 4.0));
    assert_eq!(detector.elapsed(), 0.0);
    assert!(!detector.observe(moved, true, 4.0));
}

#[test]
fn stuck_detector_ignores_idle_time() {
    let mut detector = StuckDetector::new();
    for _ in 0..100 {
        assert!(!detector.observe(Vec2::new(0.0, 0.0), false, 1.0));
    }
    assert_eq!(detector.elapsed(), 0.0);
}
