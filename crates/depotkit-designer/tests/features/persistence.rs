use depotkit_core::{Point2D, StoreError};
use depotkit_designer::aisle::AisleRecord;
use depotkit_designer::objects::{ObjectId, SkuSpec};
use depotkit_designer::persistence::{PersistEvent, PersistOp, PersistOutcome, PersistQueue};
use depotkit_designer::store::{CargoPose, MemoryStore, Store};
use std::sync::Arc;

fn store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_skus([SkuSpec::new("sku-1", "Crate")]))
}

fn create(local: u64) -> PersistOp {
    PersistOp::CreateCargo {
        local: ObjectId(local),
        sku_id: "sku-1".to_string(),
        pose: CargoPose::new(1.0, 0.0, 1.0, 0.0),
    }
}

#[tokio::test]
async fn test_create_reports_db_id() {
    let store = store();
    let (mut queue, worker) = PersistQueue::new();
    worker.spawn(store.clone());

    let db_id = match queue.submit(create(7)).wait().await.unwrap() {
        PersistOutcome::Created(db_id) => db_id,
        other => panic!("expected a created record, got {:?}", other),
    };
    assert_eq!(store.cargo_count(), 1);
    assert_eq!(
        queue.drain_events(),
        vec![PersistEvent::CargoCreated {
            local: ObjectId(7),
            db_id: db_id.clone(),
            pose: CargoPose::new(1.0, 0.0, 1.0, 0.0),
        }]
    );
    assert!(queue.drain_events().is_empty());
}

#[tokio::test]
async fn test_writes_run_in_submission_order() {
    let store = store();
    let (queue, worker) = PersistQueue::new();
    worker.spawn(store.clone());

    let PersistOutcome::Created(db_id) = queue.submit(create(1)).wait().await.unwrap() else {
        panic!("create failed");
    };

    // Fire both without awaiting the first.
    let first = queue.submit(PersistOp::UpdateCargoPosition {
        db_id: db_id.clone(),
        pose: CargoPose::new(2.0, 0.0, 2.0, 0.0),
    });
    let second = queue.submit(PersistOp::UpdateCargoPosition {
        db_id: db_id.clone(),
        pose: CargoPose::new(3.0, 1.0, 3.0, 0.5),
    });
    second.wait().await.unwrap();
    assert_eq!(first.wait().await.unwrap(), PersistOutcome::Done);

    assert_eq!(store.cargo(&db_id).unwrap().pose, CargoPose::new(3.0, 1.0, 3.0, 0.5));
}

#[tokio::test]
async fn test_failures_are_reported_not_rolled_back() {
    let store = store();
    let (mut queue, worker) = PersistQueue::new();
    worker.spawn(store.clone());

    store.set_unreachable(true);
    let result = queue.submit(PersistOp::ClearCargos).wait().await;
    assert!(matches!(result, Err(StoreError::Unreachable { .. })));

    let events = queue.drain_events();
    assert_eq!(events.len(), 1);
    match &events[0] {
        PersistEvent::Failed { op, error } => {
            assert_eq!(op, "clear cargos");
            assert!(matches!(error, StoreError::Unreachable { .. }));
        }
        other => panic!("unexpected event {:?}", other),
    }

    // The worker keeps going once the backend is back.
    store.set_unreachable(false);
    assert!(queue.submit(create(2)).wait().await.is_ok());
}

#[tokio::test]
async fn test_unknown_record_update_fails() {
    let (queue, worker) = PersistQueue::new();
    worker.spawn(store());
    let result = queue
        .submit(PersistOp::UpdateCargoPosition {
            db_id: "missing".to_string(),
            pose: CargoPose::default(),
        })
        .wait()
        .await;
    assert_eq!(
        result,
        Err(StoreError::NotFound {
            id: "missing".to_string()
        })
    );
}

#[tokio::test]
async fn test_aisle_config_saved() {
    let store = store();
    let (queue, worker) = PersistQueue::new();
    worker.spawn(store.clone());

    let aisles = vec![AisleRecord {
        path: vec![Point2D::new(0.0, 0.0), Point2D::new(5.0, 0.0)],
        width: 2.5,
    }];
    queue
        .submit(PersistOp::SaveAisleConfig { aisles: aisles.clone() })
        .wait()
        .await
        .unwrap();
    assert_eq!(store.load_aisle_config().await.unwrap(), aisles);
}

#[tokio::test]
async fn test_dropped_worker_closes_queue() {
    let (queue, worker) = PersistQueue::new();
    drop(worker);
    let result = queue.submit(PersistOp::ClearCargos).wait().await;
    assert_eq!(result, Err(StoreError::Closed));
}
