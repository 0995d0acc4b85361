use depotkit_core::{Point2D, Vec3};
use depotkit_designer::drag::{DragContext, DragEnd, DragKind, DragSession};
use depotkit_designer::objects::{ObjectId, PartKind, PlacedObject, ShelfSpec, SkuSpec};
use depotkit_designer::registry::ObjectRegistry;
use depotkit_designer::scene::CameraState;
use depotkit_settings::Config;

fn free_context() -> DragContext {
    DragContext {
        half_extents: (25.0, 25.0),
        shelf_snap: None,
        part_snap: None,
    }
}

fn add_cargo(registry: &mut ObjectRegistry, base: Vec3) -> ObjectId {
    let id = registry.generate_id();
    registry.insert(PlacedObject::cargo(id, &SkuSpec::new("s", "Box"), base, None));
    id
}

#[test]
fn test_shelf_carries_its_cargo() {
    let mut registry = ObjectRegistry::new();
    let shelf = registry.generate_id();
    registry.insert(PlacedObject::shelf(shelf, "Shelf", Point2D::new(0.0, 0.0), ShelfSpec::new(5)));
    let on_shelf = add_cargo(&mut registry, Vec3::new(0.0, 0.84, 0.5));
    let elsewhere = add_cargo(&mut registry, Vec3::new(6.0, 0.0, 0.0));

    let camera = CameraState::default();
    let mut drag = DragSession::begin(&mut registry, shelf, Point2D::new(0.0, 0.0), 0.0).unwrap();
    assert_eq!(drag.kind(), DragKind::Shelf);
    assert_eq!(drag.carried(), vec![on_shelf]);

    drag.update(&mut registry, &free_context(), Point2D::new(3.0, -2.0), 0.0, false, &camera)
        .unwrap();
    let carried = registry.get(on_shelf).unwrap().position;
    assert_eq!(carried.ground(), Point2D::new(3.0, -1.5));
    assert!((carried.y - 0.94).abs() < 1e-9);
    assert_eq!(registry.get(elsewhere).unwrap().ground(), Point2D::new(6.0, 0.0));

    match drag.end(&mut registry) {
        DragEnd::Moved { kind, carried, to, .. } => {
            assert_eq!(kind, DragKind::Shelf);
            assert_eq!(carried, vec![on_shelf]);
            assert_eq!(to.ground(), Point2D::new(3.0, -2.0));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_cancel_restores_shelf_and_cargo() {
    let mut registry = ObjectRegistry::new();
    let shelf = registry.generate_id();
    registry.insert(PlacedObject::shelf(shelf, "Shelf", Point2D::new(0.0, 0.0), ShelfSpec::new(2)));
    let cargo = add_cargo(&mut registry, Vec3::new(0.2, 0.84, 0.0));

    let mut drag = DragSession::begin(&mut registry, shelf, Point2D::new(0.0, 0.0), 0.0).unwrap();
    drag.update(
        &mut registry,
        &free_context(),
        Point2D::new(5.0, 5.0),
        0.0,
        false,
        &CameraState::default(),
    );
    drag.cancel(&mut registry);
    assert_eq!(registry.get(shelf).unwrap().ground(), Point2D::new(0.0, 0.0));
    assert_eq!(registry.get(cargo).unwrap().ground(), Point2D::new(0.2, 0.0));
}

#[test]
fn test_vertical_mode_scales_with_camera_distance() {
    let mut registry = ObjectRegistry::new();
    let id = add_cargo(&mut registry, Vec3::new(0.0, 0.0, 0.0));
    let camera = CameraState::default();
    let start = registry.get(id).unwrap().position;
    let distance = camera.distance_to(start);

    let mut drag = DragSession::begin(&mut registry, id, Point2D::new(0.0, 0.0), 0.0).unwrap();
    let lifted = drag
        .update(&mut registry, &free_context(), Point2D::new(0.0, 0.0), -0.1, true, &camera)
        .unwrap();
    assert!((lifted.y - (start.y + 0.05 * distance)).abs() < 1e-9);
    assert_eq!(lifted.ground(), start.ground());

    // Never below its own half height.
    let lowered = drag
        .update(&mut registry, &free_context(), Point2D::new(0.0, 0.0), 0.9, true, &camera)
        .unwrap();
    assert!((lowered.y - 0.1).abs() < 1e-12);
}

#[test]
fn test_vertical_mode_reanchors_after_horizontal_move() {
    let mut registry = ObjectRegistry::new();
    let id = add_cargo(&mut registry, Vec3::new(0.0, 0.0, 0.0));
    let camera = CameraState::default();
    let ctx = free_context();

    let mut drag = DragSession::begin(&mut registry, id, Point2D::new(0.0, 0.0), 0.0).unwrap();
    let raised = drag
        .update(&mut registry, &ctx, Point2D::new(0.0, 0.0), -0.2, true, &camera)
        .unwrap();
    let moved = drag
        .update(&mut registry, &ctx, Point2D::new(2.0, 0.0), 0.4, false, &camera)
        .unwrap();
    assert_eq!(moved.y, raised.y);

    // Pointer is far lower on screen now, but the anchor restarts here.
    let again = drag
        .update(&mut registry, &ctx, Point2D::new(2.0, 0.0), 0.4, true, &camera)
        .unwrap();
    assert!((again.y - raised.y).abs() < 1e-12);
    assert_eq!(again.x, 2.0);
}

#[test]
fn test_part_drag_snaps_when_enabled() {
    let mut registry = ObjectRegistry::new();
    let wall = registry.generate_id();
    let kind = PartKind::Wall;
    registry.insert(PlacedObject::part(wall, "Wall", kind, Point2D::new(0.0, 0.0), kind.default_footprint()));
    let office = registry.generate_id();
    let kind = PartKind::Office;
    registry.insert(PlacedObject::part(office, "Office", kind, Point2D::new(0.0, 10.0), kind.default_footprint()));

    let camera = CameraState::default();
    let snapping = DragContext::from_config(&Config::default());
    let mut drag = DragSession::begin(&mut registry, office, Point2D::new(0.0, 10.0), 0.0).unwrap();
    // Office is 4 deep: its near edge lands 0.15 from the wall face.
    let p = drag
        .update(&mut registry, &snapping, Point2D::new(0.0, 2.25), 0.0, false, &camera)
        .unwrap();
    assert!((p.z - 2.1).abs() < 1e-9);

    let mut config = Config::default();
    config.snapping.enabled = false;
    let plain = DragContext::from_config(&config);
    let p = drag
        .update(&mut registry, &plain, Point2D::new(0.0, 2.25), 0.0, false, &camera)
        .unwrap();
    assert!((p.z - 2.25).abs() < 1e-9);
}
