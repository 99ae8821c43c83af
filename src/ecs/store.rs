//! Entity-component store
//!
//! Components of each type live in their own sparse set (sparse index vector
//! plus dense entity/value arrays), keyed in a registry by `TypeId`. Attach,
//! get and remove are O(1) and no registration step is required: the first
//! attach of a type creates its storage.
//!
//! Iteration order of a storage is stable as long as no component of that
//! type is removed. Processors that create or destroy entities while walking
//! a query take a snapshot with [`Store::entities_with`] or defer the
//! destruction with [`Store::destroy_later`].

use std::any::{Any, TypeId};

use ahash::{AHashMap, AHashSet};

use crate::core::error::{Result, SimError};
use crate::core::types::EntityId;

/// Marker for values that can be attached to entities
pub trait Component: 'static {}

impl<T: 'static> Component for T {}

struct SparseSet<T> {
    sparse: Vec<Option<u32>>,
    ids: Vec<EntityId>,
    values: Vec<T>,
}

impl<T> SparseSet<T> {
    fn new() -> Self {
        Self {
            sparse: Vec::new(),
            ids: Vec::new(),
            values: Vec::new(),
        }
    }

    fn slot(&self, entity: EntityId) -> Option<usize> {
        self.sparse
            .get(entity.index())
            .copied()
            .flatten()
            .map(|slot| slot as usize)
    }

    fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        if let Some(slot) = self.slot(entity) {
            return Some(std::mem::replace(&mut self.values[slot], value));
        }

        if self.sparse.len() <= entity.index() {
            self.sparse.resize(entity.index() + 1, None);
        }
        self.sparse[entity.index()] = Some(self.values.len() as u32);
        self.ids.push(entity);
        self.values.push(value);
        None
    }

    fn get(&self, entity: EntityId) -> Option<&T> {
        self.slot(entity).map(|slot| &self.values[slot])
    }

    fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.slot(entity).map(move |slot| &mut self.values[slot])
    }

    fn remove(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slot(entity)?;
        self.sparse[entity.index()] = None;

        let last = self.values.len() - 1;
        if slot != last {
            let moved = self.ids[last];
            self.sparse[moved.index()] = Some(slot as u32);
        }
        self.ids.swap_remove(slot);
        Some(self.values.swap_remove(slot))
    }

    fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.ids.iter().copied().zip(self.values.iter())
    }
}

/// Type-erased access used for whole-entity operations
trait AnyStorage {
    fn remove_entity(&mut self, entity: EntityId);
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> AnyStorage for SparseSet<T> {
    fn remove_entity(&mut self, entity: EntityId) {
        self.remove(entity);
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owns every entity and its components for the lifetime of the game
pub struct Store {
    next_id: u32,
    alive: AHashSet<EntityId>,
    storages: AHashMap<TypeId, Box<dyn AnyStorage>>,
    pending_destroy: Vec<EntityId>,
}

impl Store {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            alive: AHashSet::new(),
            storages: AHashMap::new(),
            pending_destroy: Vec::new(),
        }
    }

    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.alive.insert(id);
        id
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.alive.contains(&entity)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Live entities in id order
    pub fn entities(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.alive.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn storage<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.storages
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<SparseSet<T>>())
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut SparseSet<T>> {
        self.storages
            .get_mut(&TypeId::of::<T>())
            .and_then(|s| s.as_any_mut().downcast_mut::<SparseSet<T>>())
    }

    /// Attach a component, replacing and returning any previous one of the same type
    pub fn attach<T: Component>(&mut self, entity: EntityId, component: T) -> Result<Option<T>> {
        if !self.contains(entity) {
            return Err(SimError::EntityNotFound(entity));
        }

        let storage = self
            .storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()));

        match storage.as_any_mut().downcast_mut::<SparseSet<T>>() {
            Some(set) => Ok(set.insert(entity, component)),
            None => Err(SimError::ComponentNotFound {
                entity,
                component: std::any::type_name::<T>(),
            }),
        }
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.storage::<T>()?.get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        self.get::<T>(entity).is_some()
    }

    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        self.storage_mut::<T>()?.remove(entity)
    }

    /// Iterate `(entity, component)` pairs of one component type
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.storage::<T>().into_iter().flat_map(|s| s.iter())
    }

    /// Snapshot of the entities carrying `T`, safe to hold across mutations
    pub fn entities_with<T: Component>(&self) -> Vec<EntityId> {
        self.query::<T>().map(|(id, _)| id).collect()
    }

    pub fn count<T: Component>(&self) -> usize {
        self.storage::<T>().map(|s| s.values.len()).unwrap_or(0)
    }

    /// Remove an entity and all of its components immediately
    pub fn destroy(&mut self, entity: EntityId) -> bool {
        if !self.alive.remove(&entity) {
            return false;
        }
        for storage in self.storages.values_mut() {
            storage.remove_entity(entity);
        }
        true
    }

    /// Schedule an entity for destruction at the end of the frame
    pub fn destroy_later(&mut self, entity: EntityId) {
        if self.contains(entity) && !self.pending_destroy.contains(&entity) {
            self.pending_destroy.push(entity);
        }
    }

    pub fn is_pending_destroy(&self, entity: EntityId) -> bool {
        self.pending_destroy.contains(&entity)
    }

    /// Destroy everything scheduled with [`Store::destroy_later`], returning the ids
    pub fn flush_destroyed(&mut self) -> Vec<EntityId> {
        let pending = std::mem::take(&mut self.pending_destroy);
        pending.into_iter().filter(|e| self.destroy(*e)).collect()
    }

    /// Total number of stored components across all types
    pub fn component_count(&self) -> usize {
        self.storages.values().map(|s| s.len()).sum()
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("entities", &self.alive.len())
            .field("component_types", &self.storages.len())
            .field("pending_destroy", &self.pending_destroy)
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
