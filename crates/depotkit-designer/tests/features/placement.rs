use depotkit_core::{Point2D, Vec3};
use depotkit_designer::objects::{ObjectId, PartKind, PlacedObject, ShelfSpec, SkuSpec};
use depotkit_designer::placement::{placement_position, PlacementKind, PlacementSession, RepositionSession};
use depotkit_designer::registry::ObjectRegistry;
use depotkit_designer::scene::{BoxNode, HeadlessScene, PointerRay, Scene, SceneKey, SceneNode};
use depotkit_designer::support::SupportResolver;

struct Fixture {
    registry: ObjectRegistry,
    scene: HeadlessScene,
    resolver: SupportResolver,
}

impl Fixture {
    fn new() -> Self {
        Self {
            registry: ObjectRegistry::new(),
            scene: HeadlessScene::new(),
            resolver: SupportResolver::default(),
        }
    }

    fn add(&mut self, object: PlacedObject) -> ObjectId {
        let id = self.registry.insert(object);
        self.sync(id);
        id
    }

    fn sync(&mut self, id: ObjectId) {
        let node = BoxNode::from_object(self.registry.get(id).unwrap());
        self.scene.add_object(SceneKey::Object(id), SceneNode::Box(node));
    }

    fn cargo(&mut self, base: Vec3) -> ObjectId {
        let id = self.registry.generate_id();
        let sku = SkuSpec::new("s", "Box").with_size(1.0, 1.0, 1.0);
        self.add(PlacedObject::cargo(id, &sku, base, None))
    }

    fn shelf(&mut self, at: Point2D) -> ObjectId {
        let id = self.registry.generate_id();
        self.add(PlacedObject::shelf(id, "Shelf", at, ShelfSpec::new(5)))
    }
}

fn down(x: f64, z: f64) -> PointerRay {
    PointerRay::straight_down(Point2D::new(x, z), 20.0)
}

#[test]
fn test_stack_on_nearest_cargo() {
    let mut f = Fixture::new();
    let a = f.cargo(Vec3::new(2.0, 0.0, 2.0));
    let ray = down(2.3, 2.1);
    let hits = f.scene.raycast_from_pointer(&ray);

    let placement = placement_position(&f.registry, &f.resolver, &hits, ray.intersect_ground(), None).unwrap();
    assert_eq!(placement.stack_on, Some(a));
    assert_eq!(placement.position, Vec3::new(2.0, 1.0, 2.0));
}

#[test]
fn test_drop_onto_shelf_layer_under_hit() {
    let mut f = Fixture::new();
    f.shelf(Point2D::new(0.0, 0.0));
    let ray = down(0.1, 0.5);
    let hits = f.scene.raycast_from_pointer(&ray);
    let placement = placement_position(&f.registry, &f.resolver, &hits, ray.intersect_ground(), None).unwrap();
    assert!(placement.stack_on.is_none());
    assert!((placement.position.y - 4.44).abs() < 1e-9);
    assert_eq!(placement.position.ground(), Point2D::new(0.1, 0.5));

    // A side-on ray hitting the shelf between layers picks the layer below.
    let side = PointerRay::new(Vec3::new(-10.0, 2.0, 0.0), Vec3::new(1.0, 0.0, 0.0), 0.0);
    let hits = f.scene.raycast_from_pointer(&side);
    let placement = placement_position(&f.registry, &f.resolver, &hits, None, None).unwrap();
    assert!((placement.position.y - 1.74).abs() < 1e-9);
}

#[test]
fn test_part_preview_stays_on_floor() {
    let mut f = Fixture::new();
    f.cargo(Vec3::new(0.0, 0.0, 0.0));
    let ray = down(0.0, 0.0);
    let hits = f.scene.raycast_from_pointer(&ray);

    let mut session = PlacementSession::new(PlacementKind::Part(PartKind::Office));
    let preview = session
        .update(&f.registry, &f.resolver, &hits, ray.intersect_ground())
        .unwrap();
    assert_eq!(preview.position.y, 0.0);
    assert_eq!(session.preview_center().unwrap().y, 1.5);

    let mut session = PlacementSession::new(PlacementKind::Cargo(SkuSpec::new("s", "Box")));
    let preview = session
        .update(&f.registry, &f.resolver, &hits, ray.intersect_ground())
        .unwrap();
    assert_eq!(preview.position.y, 1.0);
    assert!((session.preview_center().unwrap().y - 1.1).abs() < 1e-12);
}

#[test]
fn test_reposition_onto_other_cargo() {
    let mut f = Fixture::new();
    let a = f.cargo(Vec3::new(0.0, 0.0, 0.0));
    let b = f.cargo(Vec3::new(5.0, 0.0, 0.0));

    let mut session = RepositionSession::begin(&mut f.registry, b).unwrap();
    assert!(f.registry.get(b).unwrap().is_dragging);

    let ray = down(0.2, 0.0);
    let hits = f.scene.raycast_from_pointer(&ray);
    let preview = session
        .preview(&mut f.registry, &f.resolver, &hits, ray.intersect_ground())
        .unwrap();
    assert_eq!(preview.stack_on, Some(a));
    assert_eq!(f.registry.get(b).unwrap().position, Vec3::new(0.0, 1.5, 0.0));

    let stacked = session.commit(&mut f.registry, &f.resolver, Some(preview));
    assert!(stacked);
    assert!(!f.registry.get(b).unwrap().is_dragging);
}

#[test]
fn test_reposition_ignores_its_own_box() {
    let mut f = Fixture::new();
    let a = f.cargo(Vec3::new(0.0, 0.0, 0.0));
    let session = RepositionSession::begin(&mut f.registry, a).unwrap();

    let ray = down(0.0, 0.0);
    let hits = f.scene.raycast_from_pointer(&ray);
    let placement = placement_position(&f.registry, &f.resolver, &hits, ray.intersect_ground(), Some(a)).unwrap();
    assert!(placement.stack_on.is_none());
    assert_eq!(placement.position.y, 0.0);
    session.cancel(&mut f.registry);
}

#[test]
fn test_reposition_cancel_restores_transform() {
    let mut f = Fixture::new();
    let a = f.cargo(Vec3::new(1.0, 0.0, 1.0));
    f.registry.get_mut(a).unwrap().rotation = 0.5;

    let mut session = RepositionSession::begin(&mut f.registry, a).unwrap();
    let ray = down(8.0, 8.0);
    let hits = f.scene.raycast_from_pointer(&ray);
    session.preview(&mut f.registry, &f.resolver, &hits, ray.intersect_ground());
    session.rotate(&mut f.registry);
    assert_eq!(f.registry.get(a).unwrap().ground(), Point2D::new(8.0, 8.0));

    session.cancel(&mut f.registry);
    let restored = f.registry.get(a).unwrap();
    assert_eq!(restored.position, Vec3::new(1.0, 0.5, 1.0));
    assert_eq!(restored.rotation, 0.5);
    assert!(!restored.is_dragging);
}
