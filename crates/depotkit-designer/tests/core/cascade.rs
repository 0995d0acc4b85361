use depotkit_core::Vec3;
use depotkit_designer::cascade::CascadeEngine;
use depotkit_designer::gravity::GravityController;
use depotkit_designer::objects::{ObjectId, PlacedObject, SkuSpec};
use depotkit_designer::registry::ObjectRegistry;
use depotkit_designer::support::SupportResolver;

fn add_cargo(registry: &mut ObjectRegistry, base: Vec3) -> ObjectId {
    let sku = SkuSpec::new("unit", "Unit box").with_size(1.0, 1.0, 1.0);
    let id = registry.generate_id();
    registry.insert(PlacedObject::cargo(id, &sku, base, None));
    id
}

struct World {
    registry: ObjectRegistry,
    resolver: SupportResolver,
    cascade: CascadeEngine,
    gravity: GravityController,
}

impl World {
    fn new() -> Self {
        Self {
            registry: ObjectRegistry::new(),
            resolver: SupportResolver::default(),
            cascade: CascadeEngine::default(),
            gravity: GravityController::default(),
        }
    }

    fn delete(&mut self, id: ObjectId) -> Vec<ObjectId> {
        self.registry.get_mut(id).unwrap().being_deleted = true;
        let affected = self
            .cascade
            .propagate_fall(&mut self.registry, &self.resolver, &mut self.gravity, id, None);
        self.registry.remove(id);
        self.gravity.cancel(id);
        affected
    }
}

#[test]
fn test_deleting_base_drops_object_above() {
    let mut world = World::new();
    let a = add_cargo(&mut world.registry, Vec3::new(0.0, 0.0, 0.0));
    let b = add_cargo(&mut world.registry, Vec3::new(0.0, 1.0, 0.0));

    let affected = world.delete(a);
    assert_eq!(affected, vec![b]);

    let object = world.registry.get(b).unwrap();
    assert!(!object.support.grounded);
    assert!(world.gravity.is_falling(b));
    assert_eq!(world.resolver.target_y(&world.registry, b), Some(0.5));
}

#[test]
fn test_deleting_base_drops_onto_next_support() {
    let mut world = World::new();
    let floor = add_cargo(&mut world.registry, Vec3::new(0.0, 0.0, 0.0));
    let middle = add_cargo(&mut world.registry, Vec3::new(0.0, 1.0, 0.0));
    let top = add_cargo(&mut world.registry, Vec3::new(0.0, 2.0, 0.0));

    let affected = world.delete(middle);
    assert_eq!(affected, vec![top]);
    assert_eq!(world.resolver.target_y(&world.registry, top), Some(1.5));

    world
        .gravity
        .run_until_idle(&mut world.registry, &world.resolver, &world.cascade, 200);
    assert!((world.registry.get(top).unwrap().bottom() - 1.0).abs() < 1e-9);
    assert!(world.registry.get(floor).unwrap().support.grounded);
}

#[test]
fn test_cascade_reaches_whole_stack() {
    let mut world = World::new();
    let a = add_cargo(&mut world.registry, Vec3::new(0.0, 0.0, 0.0));
    let b = add_cargo(&mut world.registry, Vec3::new(0.0, 1.0, 0.0));
    let c = add_cargo(&mut world.registry, Vec3::new(0.1, 2.0, 0.0));

    let affected = world.delete(a);
    assert_eq!(affected, vec![b, c]);

    world
        .gravity
        .run_until_idle(&mut world.registry, &world.resolver, &world.cascade, 200);
    assert!(world.gravity.is_idle());
    assert!((world.registry.get(b).unwrap().position.y - 0.5).abs() < 1e-9);
    assert!((world.registry.get(c).unwrap().position.y - 1.5).abs() < 1e-9);
}

#[test]
fn test_moved_origin_uses_override() {
    let mut world = World::new();
    let a = add_cargo(&mut world.registry, Vec3::new(0.0, 0.0, 0.0));
    let b = add_cargo(&mut world.registry, Vec3::new(0.0, 1.0, 0.0));

    let old = world.registry.get(a).unwrap().position;
    world.registry.get_mut(a).unwrap().position.x = 4.0;

    assert!(world
        .cascade
        .propagate_fall(&mut world.registry, &world.resolver, &mut world.gravity, a, None)
        .is_empty());
    let affected = world
        .cascade
        .propagate_fall(&mut world.registry, &world.resolver, &mut world.gravity, a, Some(old));
    assert_eq!(affected, vec![b]);
    assert!(world.gravity.is_falling(b));
}

#[test]
fn test_unrelated_cargo_untouched() {
    let mut world = World::new();
    let a = add_cargo(&mut world.registry, Vec3::new(0.0, 0.0, 0.0));
    let beside = add_cargo(&mut world.registry, Vec3::new(3.0, 0.0, 0.0));
    let affected = world.delete(a);
    assert!(affected.is_empty());
    assert!(world.registry.get(beside).unwrap().support.grounded);
    assert!(world.gravity.is_idle());
}
