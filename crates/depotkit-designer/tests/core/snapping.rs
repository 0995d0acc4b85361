use depotkit_core::Point2D;
use depotkit_designer::objects::{ObjectId, PartKind, PlacedObject, ShelfSpec};
use depotkit_designer::registry::ObjectRegistry;
use depotkit_designer::snapping::{snap_part, snap_to_shelf_edges};
use std::f64::consts::FRAC_PI_2;

fn add_shelf(registry: &mut ObjectRegistry, at: Point2D) -> ObjectId {
    let id = registry.generate_id();
    registry.insert(PlacedObject::shelf(id, "Shelf", at, ShelfSpec::new(3)));
    id
}

fn add_part(registry: &mut ObjectRegistry, kind: PartKind, at: Point2D, rotation: f64) -> ObjectId {
    let id = registry.generate_id();
    registry.insert(PlacedObject::part(id, kind.label(), kind, at, kind.default_footprint()).with_rotation(rotation));
    id
}

fn assert_close(actual: Point2D, expected: Point2D) {
    assert!(
        actual.approx_eq(&expected, 1e-9),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

#[test]
fn test_shelf_snaps_to_neighbour_edge() {
    let mut registry = ObjectRegistry::new();
    add_shelf(&mut registry, Point2D::new(0.0, 0.0));
    let dragged = add_shelf(&mut registry, Point2D::new(5.0, 0.0));
    let dragged = registry.get(dragged).unwrap().clone();

    let result = snap_to_shelf_edges(&registry, &dragged, Point2D::new(1.05, 0.0), 0.1);
    assert!(result.snapped);
    assert_close(result.position, Point2D::new(1.0, 0.0));

    let result = snap_to_shelf_edges(&registry, &dragged, Point2D::new(-1.04, 0.0), 0.1);
    assert_close(result.position, Point2D::new(-1.0, 0.0));

    let result = snap_to_shelf_edges(&registry, &dragged, Point2D::new(1.3, 0.0), 0.1);
    assert!(!result.snapped);
    assert_close(result.position, Point2D::new(1.3, 0.0));
}

#[test]
fn test_shelf_snaps_end_to_end_along_z() {
    let mut registry = ObjectRegistry::new();
    add_shelf(&mut registry, Point2D::new(0.0, 0.0));
    let dragged = add_shelf(&mut registry, Point2D::new(5.0, 5.0));
    let dragged = registry.get(dragged).unwrap().clone();

    let result = snap_to_shelf_edges(&registry, &dragged, Point2D::new(0.0, 2.06), 0.1);
    assert_close(result.position, Point2D::new(0.0, 2.0));
}

#[test]
fn test_part_aligns_matching_edge_of_part() {
    let mut registry = ObjectRegistry::new();
    add_part(&mut registry, PartKind::Wall, Point2D::new(0.0, 0.0), 0.0);
    let dock = add_part(&mut registry, PartKind::Dock, Point2D::new(10.0, 10.0), 0.0);
    let dock = registry.get(dock).unwrap().clone();

    let result = snap_part(&registry, &dock, Point2D::new(1.1, 2.0), 0.3);
    assert!(result.snapped);
    assert_close(result.position, Point2D::new(1.0, 2.0));
}

#[test]
fn test_part_only_meets_opposite_shelf_edges() {
    let mut registry = ObjectRegistry::new();
    add_shelf(&mut registry, Point2D::new(0.0, 0.0));
    let restroom = add_part(&mut registry, PartKind::Restroom, Point2D::new(20.0, 20.0), 0.0);
    let restroom = registry.get(restroom).unwrap().clone();

    // Right edges line up within threshold: ignored for shelves.
    let result = snap_part(&registry, &restroom, Point2D::new(-1.4, 0.0), 0.3);
    assert!(!result.snapped);

    // Right edge of the part near the left edge of the shelf.
    let result = snap_part(&registry, &restroom, Point2D::new(-2.6, 0.0), 0.3);
    assert_close(result.position, Point2D::new(-2.5, 0.0));
}

#[test]
fn test_rotated_part_uses_rotated_bounds() {
    let mut registry = ObjectRegistry::new();
    add_part(&mut registry, PartKind::Wall, Point2D::new(0.0, 0.0), FRAC_PI_2);
    let elevator = add_part(&mut registry, PartKind::Elevator, Point2D::new(20.0, 20.0), 0.0);
    let elevator = registry.get(elevator).unwrap().clone();

    // The turned wall spans x in [-0.1, 0.1] and z in [-3, 3].
    let result = snap_part(&registry, &elevator, Point2D::new(1.7, 10.0), 0.3);
    assert_close(result.position, Point2D::new(1.6, 10.0));
}
