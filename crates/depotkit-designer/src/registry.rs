//! Owned collection of placed objects.

use crate::objects::{ObjectId, PlacedObject};
use depotkit_core::to_local_frame;

/// All shelves, parts and cargo of the open warehouse, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ObjectRegistry {
    objects: Vec<PlacedObject>,
    next_id: u64,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Reserves a new unique id.
    pub fn generate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }

    /// Inserts an object, replacing any existing one with the same id.
    pub fn insert(&mut self, object: PlacedObject) -> ObjectId {
        let id = object.id;
        self.next_id = self.next_id.max(id.0 + 1);
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(slot) => *slot = object,
            None => self.objects.push(object),
        }
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<PlacedObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PlacedObject> {
        self.objects.iter_mut()
    }

    pub fn cargos(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter().filter(|o| o.is_cargo())
    }

    pub fn shelves(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter().filter(|o| o.is_shelf())
    }

    pub fn parts(&self) -> impl Iterator<Item = &PlacedObject> {
        self.objects.iter().filter(|o| o.is_part())
    }

    pub fn cargo_ids(&self) -> Vec<ObjectId> {
        self.cargos().map(|o| o.id).collect()
    }

    /// Cargo whose centre lies within the shelf's footprint, tested in the
    /// shelf's local frame.
    pub fn cargos_on_shelf(&self, shelf_id: ObjectId) -> Vec<ObjectId> {
        let Some(shelf) = self.get(shelf_id).filter(|s| s.is_shelf()) else {
            return Vec::new();
        };
        let (half_w, half_d) = shelf.footprint.half_extents();
        self.cargos()
            .filter(|cargo| {
                let local = to_local_frame(cargo.ground(), shelf.ground(), shelf.rotation);
                local.x.abs() <= half_w && local.z.abs() <= half_d
            })
            .map(|cargo| cargo.id)
            .collect()
    }

    pub fn find_by_db_id(&self, db_id: &str) -> Option<ObjectId> {
        self.cargos().find(|o| o.db_id() == Some(db_id)).map(|o| o.id)
    }

    /// Selects a single cargo, clearing any other cargo selection.
    pub fn select_cargo(&mut self, id: Option<ObjectId>) {
        for object in self.objects.iter_mut().filter(|o| o.is_cargo()) {
            object.selected = Some(object.id) == id;
        }
    }

    pub fn selected_cargo(&self) -> Option<ObjectId> {
        self.cargos().find(|o| o.selected).map(|o| o.id)
    }

    /// Removes every cargo, returning them.
    pub fn clear_cargos(&mut self) -> Vec<PlacedObject> {
        let (cargos, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.objects).into_iter().partition(|o| o.is_cargo());
        self.objects = rest;
        cargos
    }
}
