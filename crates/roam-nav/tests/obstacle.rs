use roam_nav::{Obstacle, ObstacleKind, Vec2};

fn desk() -> Obstacle {
    Obstacle::new("desk", "Desk", Vec2::new(2.0, 3.0), Vec2::new(2.0, 1.0))
}

#[test]
fn defaults_to_furniture_with_unit_height() {
    let o = desk();
    assert_eq!(o.kind, ObstacleKind::Furniture);
    assert_eq!(o.height, 1.0);

    let wall = desk().with_kind(ObstacleKind::Wall).with_height(3.0);
    assert_eq!(wall.kind, ObstacleKind::Wall);
    assert_eq!(wall.height, 3.0);
}

#[test]
fn containment_is_inclusive_of_edges() {
    let o = desk();
    assert!(o.contains_point(Vec2::new(2.0, 3.0)));
    assert!(o.contains_point(Vec2::new(1.0, 2.5)));
    assert!(o.contains_point(Vec2::new(3.0, 3.5)));
    assert!(!o.contains_point(Vec2::new(3.01, 3.0)));
    assert!(!o.contains_point(Vec2::new(2.0, 3.51)));
}

#[test]
fn segment_through_rectangle_intersects() {
    let o = desk();
    assert!(o.intersects_segment(Vec2::new(0.0, 3.0), Vec2::new(4.0, 3.0)));
    assert!(o.intersects_segment(Vec2::new(2.0, 0.0), Vec2::new(2.0, 6.0)));
    assert!(o.intersects_segment(Vec2::new(0.0, 1.0), Vec2::new(4.0, 5.0)));
}

#[test]
fn segment_with_contained_endpoint_intersects() {
    let o = desk();
    assert!(o.intersects_segment(Vec2::new(2.0, 3.0), Vec2::new(10.0, 10.0)));
    assert!(o.intersects_segment(Vec2::new(10.0, 10.0), Vec2::new(1.5, 2.8)));
}

#[test]
fn segment_clear_of_rectangle_does_not_intersect() {
    let o = desk();
    assert!(!o.intersects_segment(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0)));
    assert!(!o.intersects_segment(Vec2::new(0.0, 5.0), Vec2::new(5.0, 4.0)));
    // Parallel to the top edge, just outside it.
    assert!(!o.intersects_segment(Vec2::new(0.0, 3.6), Vec2::new(4.0, 3.6)));
}

#[test]
fn expanded_bounds_grow_every_side() {
    let b = desk().expanded_bounds(0.5);
    assert_eq!(b.min, Vec2::new(0.5, 2.0));
    assert_eq!(b.max, Vec2::new(3.5, 4.0));
}

#[test]
fn closest_point_clamps_into_rectangle() {
    let o = desk();
    assert_eq!(o.closest_point_on_boundary(Vec2::new(5.0, 3.0)), Vec2::new(3.0, 3.0));
    assert_eq!(o.closest_point_on_boundary(Vec2::new(0.0, 0.0)), Vec2::new(1.0, 2.5));
    let inside = Vec2::new(2.5, 3.2);
    assert_eq!(o.closest_point_on_boundary(inside), inside);
}
