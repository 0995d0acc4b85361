use depotkit_core::{Point2D, Vec3};
use depotkit_designer::aisle::{Aisle, DEFAULT_AISLE_WIDTH};
use depotkit_designer::objects::{ObjectKind, PartKind, PlacedObject, ShelfSpec, SkuSpec};
use depotkit_designer::path_graph::Path;
use depotkit_designer::registry::ObjectRegistry;
use depotkit_designer::serialization::{LayoutFile, ShelfData};
use depotkit_settings::{EnvironmentSettings, GlobalParams};
use tempfile::TempDir;

fn sample_registry() -> ObjectRegistry {
    let mut registry = ObjectRegistry::new();
    let shelf = registry.generate_id();
    registry.insert(PlacedObject::shelf(shelf, "A-01", Point2D::new(2.0, 3.0), ShelfSpec::new(4)).with_rotation(0.5));
    let office = registry.generate_id();
    registry.insert(PlacedObject::part(
        office,
        "Office",
        PartKind::Office,
        Point2D::new(-5.0, 0.0),
        PartKind::Office.default_footprint(),
    ));
    let cargo = registry.generate_id();
    registry.insert(PlacedObject::cargo(
        cargo,
        &SkuSpec::new("sku-9", "Pallet").with_size(1.0, 0.8, 1.2),
        Vec3::new(8.0, 0.0, 8.0),
        Some("abcd1234".to_string()),
    ));
    registry
}

fn sample_aisles() -> Vec<Aisle> {
    vec![Aisle::new(
        Path::new(vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 0.0), Point2D::new(10.0, 5.0)]),
        3.0,
    )]
}

#[test]
fn test_capture_skips_cargo_unless_asked() {
    let registry = sample_registry();
    let aisles = sample_aisles();
    let layout = LayoutFile::capture(
        "Main",
        &GlobalParams::default(),
        &EnvironmentSettings::default(),
        &registry,
        &aisles,
        false,
    );
    assert_eq!(layout.shelves.len(), 1);
    assert_eq!(layout.parts.len(), 1);
    assert!(layout.cargos.is_empty());
    assert_eq!(layout.aisles[0].width, 3.0);
    assert_eq!(
        layout.shelves[0],
        ShelfData {
            name: "A-01".to_string(),
            position: Point2D::new(2.0, 3.0),
            rotation: 0.5,
            layer_count: 4,
        }
    );
    // A default-sized part stores no footprint override.
    assert!(layout.parts[0].footprint.is_none());

    let with_cargo = LayoutFile::capture(
        "Main",
        &GlobalParams::default(),
        &EnvironmentSettings::default(),
        &registry,
        &aisles,
        true,
    );
    assert_eq!(with_cargo.cargos.len(), 1);
    let cargo = &with_cargo.cargos[0];
    assert_eq!(cargo.position, Vec3::new(8.0, 0.0, 8.0));
    assert_eq!(cargo.db_id.as_deref(), Some("abcd1234"));
    assert_eq!(cargo.sku.height, Some(0.8));
}

#[test]
fn test_save_and_load_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("layout.json");

    let mut global = GlobalParams::default();
    global.layer_count = 3;
    let layout = LayoutFile::capture(
        "Saved",
        &global,
        &EnvironmentSettings::default(),
        &sample_registry(),
        &sample_aisles(),
        true,
    );
    layout.save_to_file(&path).unwrap();

    let loaded = LayoutFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata.name, "Saved");
    assert_eq!(loaded.global.layer_count, 3);
    assert_eq!(loaded.shelves, layout.shelves);
    assert_eq!(loaded.parts, layout.parts);
    assert_eq!(loaded.aisles, layout.aisles);
    assert_eq!(loaded.cargos, layout.cargos);
    assert!(loaded.metadata.modified >= layout.metadata.modified);
}

#[test]
fn test_restore_rebuilds_objects() {
    let layout = LayoutFile::capture(
        "Main",
        &GlobalParams::default(),
        &EnvironmentSettings::default(),
        &sample_registry(),
        &sample_aisles(),
        true,
    );
    let mut registry = ObjectRegistry::new();
    let aisles = layout.restore(&mut registry);

    assert_eq!(registry.len(), 3);
    assert_eq!(aisles, sample_aisles());

    let shelf = registry.shelves().next().unwrap();
    assert_eq!(shelf.name, "A-01");
    assert_eq!(shelf.rotation, 0.5);
    assert!(matches!(shelf.kind, ObjectKind::Shelf(spec) if spec.layer_count == 4));

    let cargo = registry.cargos().next().unwrap();
    assert!(!cargo.support.grounded);
    assert_eq!(cargo.db_id(), Some("abcd1234"));
    assert!((cargo.position.y - 0.4).abs() < 1e-12);
}

#[test]
fn test_minimal_file_uses_defaults() {
    let json = r#"{
        "version": "1.0",
        "metadata": {
            "name": "Bare",
            "created": "2024-01-01T00:00:00Z",
            "modified": "2024-01-01T00:00:00Z"
        },
        "shelves": [{ "position": { "x": 1.0, "z": 1.0 }, "layer_count": 2 }],
        "aisles": [
            { "path": [{ "x": 0.0, "z": 0.0 }, { "x": 4.0, "z": 0.0 }] },
            { "path": [{ "x": 9.0, "z": 9.0 }] }
        ]
    }"#;
    let layout: LayoutFile = serde_json::from_str(json).unwrap();
    assert_eq!(layout.global, GlobalParams::default());
    assert_eq!(layout.aisles[0].width, DEFAULT_AISLE_WIDTH);

    let mut registry = ObjectRegistry::new();
    let aisles = layout.restore(&mut registry);
    // The one-point aisle is skipped.
    assert_eq!(aisles.len(), 1);
    assert_eq!(registry.shelves().next().unwrap().name, "Shelf 1");
}

#[test]
fn test_newer_major_version_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.json");
    let mut layout = LayoutFile::new("Future");
    layout.version = "2.0".to_string();
    layout.save_to_file(&path).unwrap();

    let err = LayoutFile::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("2.0"), "{}", err);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(LayoutFile::load_from_file(dir.path().join("nope.json")).is_err());
}
