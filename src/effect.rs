//! Effects (`spec.md` §3, §4.3): an ordered list of components sharing a
//! timestamp, an optional duration listener, and an "active zones" gate.
//! Components inherit their effect's timestamp and zone eligibility at
//! construction time; the effect only needs to hold the shared `expired`
//! flag and an overall validity guard.

use std::{cell::Cell, rc::Rc};

use crate::{
    component::EffectComponent,
    duration::Listener,
    ids::{EffectId, Timestamp},
    world::World,
};

pub struct Effect {
    pub id: EffectId,
    pub components: Vec<Rc<EffectComponent>>,
    pub timestamp: Timestamp,
    /// Shared with every component built from this effect so a duration
    /// listener marking expiry is visible without a back-reference walk.
    pub expired: Rc<Cell<bool>>,
    pub valid: Rc<dyn Fn(&World) -> bool>,
    /// Registered with the manager's [`crate::duration::DurationHandler`]
    /// when the effect is registered, if present.
    pub duration: Option<Rc<Listener>>,
}

impl Effect {
    /// Builds the effect's shared `expired` flag first and hands it to
    /// `make_components` so every component built with
    /// [`EffectComponent::with_expired`] shares it.
    pub fn new(
        timestamp: Timestamp,
        make_components: impl FnOnce(Rc<Cell<bool>>) -> Vec<Rc<EffectComponent>>,
    ) -> Self {
        let expired = Rc::new(Cell::new(false));
        let components = make_components(expired.clone());
        Self {
            id: EffectId::new(),
            components,
            timestamp,
            expired,
            valid: Rc::new(|_| true),
            duration: None,
        }
    }

    pub fn with_valid(mut self, valid: Rc<dyn Fn(&World) -> bool>) -> Self {
        self.valid = valid;
        self
    }

    pub fn with_duration(mut self, listener: Rc<Listener>) -> Self {
        self.duration = Some(listener);
        self
    }

    pub fn is_expired(&self) -> bool {
        self.expired.get()
    }

    pub fn expire(&self) {
        self.expired.set(true);
    }

    pub fn is_valid(&self, world: &World) -> bool {
        !self.is_expired() && (self.valid)(world)
    }
}
