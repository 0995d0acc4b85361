use depotkit_core::{Point2D, Vec3};
use depotkit_designer::objects::{ObjectId, PlacedObject, ShelfSpec, SkuSpec};
use depotkit_designer::registry::ObjectRegistry;
use depotkit_designer::support::{Support, SupportResolver, SupportSource};
use std::f64::consts::FRAC_PI_2;

fn unit_box() -> SkuSpec {
    SkuSpec::new("unit", "Unit box").with_size(1.0, 1.0, 1.0)
}

fn add_cargo(registry: &mut ObjectRegistry, base: Vec3) -> ObjectId {
    let id = registry.generate_id();
    registry.insert(PlacedObject::cargo(id, &unit_box(), base, None));
    id
}

fn add_shelf(registry: &mut ObjectRegistry, at: Point2D, rotation: f64) -> ObjectId {
    let id = registry.generate_id();
    registry.insert(PlacedObject::shelf(id, "Shelf", at, ShelfSpec::new(5)).with_rotation(rotation));
    id
}

#[test]
fn test_nothing_beneath_is_ground() {
    let mut registry = ObjectRegistry::new();
    add_shelf(&mut registry, Point2D::new(10.0, 10.0), 0.0);
    let id = add_cargo(&mut registry, Vec3::new(0.0, 4.0, 0.0));
    let resolver = SupportResolver::default();
    assert_eq!(resolver.resolve(&registry, id), Support::GROUND);
    assert_eq!(resolver.target_y(&registry, id), Some(0.5));
}

#[test]
fn test_stacked_on_object_with_top_at_one() {
    let mut registry = ObjectRegistry::new();
    let a = add_cargo(&mut registry, Vec3::new(0.0, 0.0, 0.0));
    let b = add_cargo(&mut registry, Vec3::new(0.2, 1.0, 0.2));
    let resolver = SupportResolver::default();

    let support = resolver.resolve(&registry, b);
    assert_eq!(support.height, 1.0);
    assert_eq!(support.source, SupportSource::Object(a));
    assert_eq!(resolver.target_y(&registry, b), Some(1.5));

    // A is not supported by B above it.
    assert_eq!(resolver.resolve(&registry, a), Support::GROUND);
}

#[test]
fn test_shelf_layer_below_bottom_face() {
    let mut registry = ObjectRegistry::new();
    let shelf = add_shelf(&mut registry, Point2D::new(0.0, 0.0), 0.0);
    let id = add_cargo(&mut registry, Vec3::new(0.0, 3.0, 0.0));
    let support = SupportResolver::default().resolve(&registry, id);
    assert!((support.height - 2.64).abs() < 1e-9);
    assert_eq!(support.source, SupportSource::ShelfLayer { shelf, layer: 2 });
}

#[test]
fn test_layer_within_epsilon_counts() {
    let mut registry = ObjectRegistry::new();
    add_shelf(&mut registry, Point2D::new(0.0, 0.0), 0.0);
    let id = add_cargo(&mut registry, Vec3::new(0.0, 0.835, 0.0));
    let support = SupportResolver::default().resolve(&registry, id);
    assert!((support.height - 0.84).abs() < 1e-9);
}

#[test]
fn test_shelf_containment_uses_local_frame() {
    let resolver = SupportResolver::default();

    let mut registry = ObjectRegistry::new();
    add_shelf(&mut registry, Point2D::new(0.0, 0.0), 0.0);
    let along_z = add_cargo(&mut registry, Vec3::new(0.0, 1.0, 0.9));
    let along_x = add_cargo(&mut registry, Vec3::new(0.9, 1.0, 0.0));
    assert!(resolver.resolve(&registry, along_z).height > 0.0);
    assert_eq!(resolver.resolve(&registry, along_x).height, 0.0);

    let mut registry = ObjectRegistry::new();
    add_shelf(&mut registry, Point2D::new(0.0, 0.0), FRAC_PI_2);
    let along_z = add_cargo(&mut registry, Vec3::new(0.0, 1.0, 0.9));
    let along_x = add_cargo(&mut registry, Vec3::new(0.9, 1.0, 0.0));
    assert_eq!(resolver.resolve(&registry, along_z).height, 0.0);
    assert!(resolver.resolve(&registry, along_x).height > 0.0);
}

#[test]
fn test_dragged_and_deleted_objects_do_not_support() {
    let mut registry = ObjectRegistry::new();
    let a = add_cargo(&mut registry, Vec3::new(0.0, 0.0, 0.0));
    let b = add_cargo(&mut registry, Vec3::new(0.0, 1.0, 0.0));
    let resolver = SupportResolver::default();

    registry.get_mut(a).unwrap().is_dragging = true;
    assert_eq!(resolver.resolve(&registry, b), Support::GROUND);

    registry.get_mut(a).unwrap().is_dragging = false;
    registry.get_mut(a).unwrap().being_deleted = true;
    assert_eq!(resolver.resolve(&registry, b), Support::GROUND);
}

#[test]
fn test_corner_contact_is_not_overlap() {
    let mut registry = ObjectRegistry::new();
    add_cargo(&mut registry, Vec3::new(0.0, 0.0, 0.0));
    let edge = add_cargo(&mut registry, Vec3::new(0.85, 1.0, 0.0));
    let inside = add_cargo(&mut registry, Vec3::new(0.75, 1.0, 0.0));
    let resolver = SupportResolver::default();
    assert_eq!(resolver.resolve(&registry, edge).height, 0.0);
    assert_eq!(resolver.resolve(&registry, inside).height, 1.0);
}
