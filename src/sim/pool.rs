//! Recycle-on-release entity cache
//!
//! The track streams an unbounded number of obstacles and pickups past the
//! player. Instead of allocating each one, released entities are parked in a
//! per-kind free list and handed back out by `acquire`.
//!
//! Ownership carries the membership invariant: an entity value is either in
//! the caller's active list or inside the pool, never both.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Stable identity of a pooled entity (survives recycling)
pub type EntityId = u32;

/// An entity that can live in an [`EntityPool`]
pub trait Poolable {
    type Kind: Copy + Eq + Hash + Debug;

    /// Construct a brand new entity
    fn create(id: EntityId, kind: Self::Kind) -> Self;
    fn id(&self) -> EntityId;
    fn kind(&self) -> Self::Kind;
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
    /// Restore every mutable field to its construction default
    fn reset(&mut self);
}

/// Per-kind free lists of released entities
#[derive(Debug)]
pub struct EntityPool<T: Poolable> {
    free: HashMap<T::Kind, Vec<T>>,
    /// IDs currently parked in `free` (guards against double release)
    parked: HashSet<EntityId>,
    next_id: EntityId,
    constructed: usize,
}

impl<T: Poolable> Default for EntityPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Poolable> EntityPool<T> {
    pub fn new() -> Self {
        Self {
            free: HashMap::new(),
            parked: HashSet::new(),
            next_id: 1,
            constructed: 0,
        }
    }

    /// Take an entity of `kind`, reusing a released one when available
    ///
    /// The entity comes back active and in its default state. Callers must
    /// position it and set every gameplay field before use.
    pub fn acquire(&mut self, kind: T::Kind) -> T {
        if let Some(mut entity) = self.free.get_mut(&kind).and_then(Vec::pop) {
            self.parked.remove(&entity.id());
            entity.reset();
            entity.set_active(true);
            return entity;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.constructed += 1;
        let mut entity = T::create(id, kind);
        entity.set_active(true);
        entity
    }

    /// Park an entity for reuse
    ///
    /// Releasing an inactive entity, or one whose ID is already parked, is a
    /// no-op; the duplicate is dropped and the pool is unchanged. Returns
    /// whether the entity was parked.
    pub fn release(&mut self, mut entity: T) -> bool {
        if !entity.is_active() || !self.parked.insert(entity.id()) {
            log::debug!("Ignoring double release of entity {}", entity.id());
            return false;
        }
        entity.set_active(false);
        self.free.entry(entity.kind()).or_default().push(entity);
        true
    }

    /// Total parked entities
    pub fn len(&self) -> usize {
        self.parked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parked.is_empty()
    }

    /// Parked entities of one kind
    pub fn len_of(&self, kind: T::Kind) -> usize {
        self.free.get(&kind).map_or(0, Vec::len)
    }

    /// Entities ever constructed by this pool
    pub fn constructed(&self) -> usize {
        self.constructed
    }
}
