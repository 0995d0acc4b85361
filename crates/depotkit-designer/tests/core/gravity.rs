use depotkit_core::{Point2D, Vec3};
use depotkit_designer::cascade::CascadeEngine;
use depotkit_designer::gravity::{GravityController, SettleOutcome};
use depotkit_designer::objects::{ObjectId, PlacedObject, ShelfSpec, SkuSpec};
use depotkit_designer::registry::ObjectRegistry;
use depotkit_designer::support::SupportResolver;

fn add_cargo(registry: &mut ObjectRegistry, base: Vec3) -> ObjectId {
    let sku = SkuSpec::new("unit", "Unit box").with_size(1.0, 1.0, 1.0);
    let id = registry.generate_id();
    registry.insert(PlacedObject::cargo(id, &sku, base, None));
    id
}

#[test]
fn test_stack_falls_together() {
    let mut registry = ObjectRegistry::new();
    let a = add_cargo(&mut registry, Vec3::new(0.0, 2.0, 0.0));
    let b = add_cargo(&mut registry, Vec3::new(0.0, 3.0, 0.0));
    let resolver = SupportResolver::default();
    let cascade = CascadeEngine::default();
    let mut gravity = GravityController::default();

    assert!(matches!(
        gravity.settle(&mut registry, &resolver, a),
        SettleOutcome::Falling { .. }
    ));
    assert!(matches!(
        gravity.settle(&mut registry, &resolver, b),
        SettleOutcome::Snapped { .. }
    ));

    let mut landed = Vec::new();
    for _ in 0..500 {
        if gravity.is_idle() {
            break;
        }
        landed.extend(gravity.tick(&mut registry, &resolver, &cascade).into_iter().map(|l| l.id));
        let gap = registry.get(b).unwrap().bottom() - registry.get(a).unwrap().top();
        assert!(gap.abs() < 1e-6, "gap of {} opened in the stack", gap);
    }

    assert!(gravity.is_idle());
    assert_eq!(landed.len(), 2);
    assert!(landed.contains(&a) && landed.contains(&b));
    assert!((registry.get(a).unwrap().position.y - 0.5).abs() < 1e-9);
    assert!((registry.get(b).unwrap().position.y - 1.5).abs() < 1e-9);
    assert!(registry.get(b).unwrap().support.grounded);
}

#[test]
fn test_lands_on_shelf_layer() {
    let mut registry = ObjectRegistry::new();
    let shelf = registry.generate_id();
    registry.insert(PlacedObject::shelf(shelf, "Shelf", Point2D::new(0.0, 0.0), ShelfSpec::new(5)));
    let id = add_cargo(&mut registry, Vec3::new(0.0, 4.9, 0.0));
    let resolver = SupportResolver::default();
    let cascade = CascadeEngine::default();
    let mut gravity = GravityController::default();

    gravity.settle(&mut registry, &resolver, id);
    let landings = gravity.run_until_idle(&mut registry, &resolver, &cascade, 100);
    assert_eq!(landings.len(), 1);
    assert!((landings[0].base_y(1.0) - 4.44).abs() < 1e-9);
}

#[test]
fn test_fall_step_per_tick() {
    let mut registry = ObjectRegistry::new();
    let id = add_cargo(&mut registry, Vec3::new(0.0, 1.0, 0.0));
    let resolver = SupportResolver::default();
    let cascade = CascadeEngine::default();
    let mut gravity = GravityController::default();
    gravity.settle(&mut registry, &resolver, id);

    for _ in 0..5 {
        gravity.tick(&mut registry, &resolver, &cascade);
    }
    let bottom = registry.get(id).unwrap().bottom();
    assert!((bottom - (1.0 - 5.0 * gravity.fall_step())).abs() < 1e-9);
    assert!(!registry.get(id).unwrap().support.grounded);
}

#[test]
fn test_drag_mid_fall_stops_settling() {
    let mut registry = ObjectRegistry::new();
    let id = add_cargo(&mut registry, Vec3::new(0.0, 1.0, 0.0));
    let resolver = SupportResolver::default();
    let cascade = CascadeEngine::default();
    let mut gravity = GravityController::default();
    gravity.settle(&mut registry, &resolver, id);
    gravity.tick(&mut registry, &resolver, &cascade);

    registry.get_mut(id).unwrap().is_dragging = true;
    let before = registry.get(id).unwrap().position;
    assert!(gravity.tick(&mut registry, &resolver, &cascade).is_empty());
    assert!(gravity.is_idle());
    assert_eq!(registry.get(id).unwrap().position, before);
}

#[test]
fn test_settle_or_snap_lifts_sunken_object() {
    let mut registry = ObjectRegistry::new();
    let sunken = add_cargo(&mut registry, Vec3::new(0.0, -0.2, 0.0));
    let floating = add_cargo(&mut registry, Vec3::new(5.0, 0.5, 0.0));
    let resolver = SupportResolver::default();
    let mut gravity = GravityController::default();

    let outcome = gravity.settle_or_snap(&mut registry, &resolver, sunken);
    assert_eq!(outcome, SettleOutcome::Snapped { y: 0.5 });
    assert_eq!(registry.get(sunken).unwrap().bottom(), 0.0);

    assert!(matches!(
        gravity.settle_or_snap(&mut registry, &resolver, floating),
        SettleOutcome::Falling { .. }
    ));
    assert!(gravity.is_falling(floating));
}

#[test]
fn test_removed_object_leaves_falling_set() {
    let mut registry = ObjectRegistry::new();
    let id = add_cargo(&mut registry, Vec3::new(0.0, 1.0, 0.0));
    let resolver = SupportResolver::default();
    let cascade = CascadeEngine::default();
    let mut gravity = GravityController::default();
    gravity.settle(&mut registry, &resolver, id);
    registry.remove(id);
    assert!(gravity.tick(&mut registry, &resolver, &cascade).is_empty());
    assert!(gravity.is_idle());
}
