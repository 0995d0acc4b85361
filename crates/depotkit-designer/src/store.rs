//! Persistence collaborator.
//!
//! The editor never awaits these calls on the interaction path; they are
//! issued through the [`crate::persistence::PersistQueue`].

use crate::aisle::AisleRecord;
use crate::objects::SkuSpec;
use async_trait::async_trait;
use depotkit_core::StoreError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Persisted cargo transform. `y` is the height of the bottom face.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CargoPose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub rotation: f64,
}

impl CargoPose {
    pub fn new(x: f64, y: f64, z: f64, rotation: f64) -> Self {
        Self { x, y, z, rotation }
    }
}

/// Persisted cargo with its SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoRecord {
    pub id: String,
    pub sku_id: String,
    #[serde(flatten)]
    pub pose: CargoPose,
    pub sku: SkuSpec,
}

/// Backend storing cargo and the aisle configuration.
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates a cargo record and returns its id.
    async fn create_cargo(&self, sku_id: &str, pose: CargoPose) -> Result<String, StoreError>;

    async fn update_cargo_position(&self, id: &str, pose: CargoPose) -> Result<(), StoreError>;

    async fn delete_cargo(&self, id: &str) -> Result<(), StoreError>;

    async fn clear_cargos(&self) -> Result<(), StoreError>;

    /// All cargo records, newest first.
    async fn load_cargos(&self) -> Result<Vec<CargoRecord>, StoreError>;

    async fn save_aisle_config(&self, aisles: &[AisleRecord]) -> Result<(), StoreError>;

    async fn load_aisle_config(&self) -> Result<Vec<AisleRecord>, StoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    skus: HashMap<String, SkuSpec>,
    cargos: Vec<CargoRecord>,
    aisles: Vec<AisleRecord>,
    unreachable: bool,
}

/// Store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose catalogue holds `skus`.
    pub fn with_skus(skus: impl IntoIterator<Item = SkuSpec>) -> Self {
        let store = Self::new();
        for sku in skus {
            store.register_sku(sku);
        }
        store
    }

    pub fn register_sku(&self, sku: SkuSpec) {
        self.state.lock().skus.insert(sku.id.clone(), sku);
    }

    /// Makes every following call fail with [`StoreError::Unreachable`].
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unreachable = unreachable;
    }

    pub fn cargo_count(&self) -> usize {
        self.state.lock().cargos.len()
    }

    pub fn cargo(&self, id: &str) -> Option<CargoRecord> {
        self.state.lock().cargos.iter().find(|c| c.id == id).cloned()
    }

    pub fn aisles(&self) -> Vec<AisleRecord> {
        self.state.lock().aisles.clone()
    }

    fn check(state: &MemoryState) -> Result<(), StoreError> {
        if state.unreachable {
            Err(StoreError::Unreachable {
                message: "memory store offline".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_cargo(&self, sku_id: &str, pose: CargoPose) -> Result<String, StoreError> {
        let mut state = self.state.lock();
        Self::check(&state)?;
        let sku = state
            .skus
            .get(sku_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: sku_id.to_string() })?;
        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        state.cargos.push(CargoRecord {
            id: id.clone(),
            sku_id: sku_id.to_string(),
            pose,
            sku,
        });
        Ok(id)
    }

    async fn update_cargo_position(&self, id: &str, pose: CargoPose) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        Self::check(&state)?;
        let record = state
            .cargos
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;
        record.pose = pose;
        Ok(())
    }

    async fn delete_cargo(&self, id: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        Self::check(&state)?;
        state.cargos.retain(|c| c.id != id);
        Ok(())
    }

    async fn clear_cargos(&self) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        Self::check(&state)?;
        state.cargos.clear();
        Ok(())
    }

    async fn load_cargos(&self) -> Result<Vec<CargoRecord>, StoreError> {
        let state = self.state.lock();
        Self::check(&state)?;
        Ok(state.cargos.iter().rev().cloned().collect())
    }

    async fn save_aisle_config(&self, aisles: &[AisleRecord]) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        Self::check(&state)?;
        state.aisles = aisles.to_vec();
        Ok(())
    }

    async fn load_aisle_config(&self) -> Result<Vec<AisleRecord>, StoreError> {
        let state = self.state.lock();
        Self::check(&state)?;
        Ok(state.aisles.clone())
    }
}
