//! The apparent-state overlay (`spec.md` §3, §4.6): two parallel maps
//! keyed by entity id, each mapping an attribute to a value. `current`
//! is the value served on read; `reference` is the value just before
//! the component currently under evaluation first wrote to that
//! attribute, and is cleared before each probe.

use indexmap::IndexMap;
use tracing::instrument;

use crate::{
    ids::EntityId,
    value::{Attribute, Impact, Value},
    world::World,
};

pub type AttrMap = IndexMap<Attribute, Value>;
pub type OverlayState = IndexMap<EntityId, AttrMap>;

#[derive(Debug, Default, Clone)]
pub struct Overlay {
    current: OverlayState,
    reference: OverlayState,
    savepoint: Option<OverlayState>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every overlay entry. Called at the start of each snapshot
    /// pass (`spec.md` §3 lifecycle: overlay entries are destroyed by
    /// `calibrate`).
    pub fn calibrate(&mut self) {
        self.current.clear();
        self.reference.clear();
        self.savepoint = None;
    }

    /// Clear only the reference map. Done before each probe so impact
    /// measurement reflects only the component currently under
    /// evaluation.
    pub fn clear_reference(&mut self) {
        self.reference.clear();
    }

    #[instrument(level = "trace", skip(self, world))]
    pub fn modify(&mut self, world: &World, entity: EntityId, attr: Attribute, new_value: Value) {
        if !self
            .reference
            .get(&entity)
            .is_some_and(|m| m.contains_key(&attr))
        {
            let pre = self.query(world, entity, attr).deep_copy();
            self.reference.entry(entity).or_default().insert(attr, pre);
        }
        self.current.entry(entity).or_default().insert(attr, new_value);
    }

    pub fn query(&self, world: &World, entity: EntityId, attr: Attribute) -> Value {
        if let Some(value) = self.current.get(&entity).and_then(|m| m.get(&attr)) {
            return value.clone();
        }
        world.base_attr(entity, attr)
    }

    pub fn snapshot(&mut self) {
        self.savepoint = Some(self.current.clone());
    }

    /// Restore `current` from the savepoint taken by `snapshot`. Leaves
    /// `reference` for the caller to clear explicitly, per `spec.md`
    /// §4.6 (probes clear it themselves between components).
    ///
    /// Clones rather than takes the savepoint: the dependency solver
    /// restores to the same sublayer baseline once per probed component
    /// (`spec.md` §4.7), so the savepoint must survive more than one
    /// restore.
    pub fn restore(&mut self) {
        if let Some(saved) = &self.savepoint {
            self.current = saved.clone();
        }
    }

    pub fn return_ravd(&self) -> OverlayState {
        self.reference.clone()
    }

    pub fn return_avd(&self) -> OverlayState {
        self.current.clone()
    }

    /// Loads `current` from an arbitrary prior capture and clears
    /// `reference`. Used by the second-order probe to re-enter the
    /// overlay state produced by a first-order probe of another
    /// component (`spec.md` §4.7) without going through the single
    /// `snapshot`/`restore` savepoint slot.
    pub fn load(&mut self, current: OverlayState) {
        self.current = current;
        self.reference.clear();
    }

    /// The impact of the component under evaluation: reference/current
    /// restricted to keys present in `reference` (`spec.md` §4.6).
    pub fn impact(&self) -> IndexMap<(EntityId, Attribute), Impact> {
        let mut out = IndexMap::new();
        for (entity, attrs) in self.reference.iter() {
            for (attr, reference_value) in attrs.iter() {
                let current_value = self
                    .current
                    .get(entity)
                    .and_then(|m| m.get(attr))
                    .unwrap_or(reference_value);
                out.insert((*entity, *attr), Impact::of(reference_value, current_value));
            }
        }
        out
    }
}
