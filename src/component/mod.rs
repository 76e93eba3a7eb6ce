//! Effect components (`spec.md` §4.3): the atomic unit the dependency
//! solver sorts. Carries a sublayer tag, a selection, and an ordered
//! list of deltas, optionally supplemented by factory closures that run
//! at apply time against the apparent state so far.

pub mod copy;
pub mod facedown;

use std::{cell::Cell, rc::Rc};

use crate::{
    config::Sublayer,
    delta::Delta,
    expression::EvalContext,
    ids::{ComponentId, EffectId, EntityId, Timestamp},
    overlay::Overlay,
    selection::Selection,
    world::World,
    zones::ZoneGate,
};

pub type DeltaFactory = Rc<dyn Fn(&EvalContext, &EffectComponent) -> Vec<Delta>>;

pub struct EffectComponent {
    pub id: ComponentId,
    pub layer: Sublayer,
    pub is_characteristic_defining: bool,
    pub selection: Rc<Selection>,
    pub deltas: Vec<Delta>,
    pub delta_factories: Vec<DeltaFactory>,
    /// Authoring order within the enclosing effect; part of the
    /// presort key alongside `timestamp` (`spec.md` §4.7).
    pub relative_component_ordinal: usize,
    pub timestamp: Timestamp,
    pub host: EntityId,
    pub zone_gate: ZoneGate,
    /// Additional authoring-time guard, evaluated through the overlay
    /// (not just base state) so the second-order probe's
    /// existence-destruction check sees effects enacted ahead of it
    /// (`spec.md` §4.7 Open Questions).
    pub antecedents_verified: Rc<dyn Fn(&EvalContext) -> bool>,
    /// Shared with the owning [`crate::effect::Effect`] so a duration
    /// listener marking that effect expired is immediately visible to
    /// every one of its components without a back-reference traversal.
    pub expired: Rc<Cell<bool>>,
    pub reference_effect: Option<EffectId>,
    applied: Cell<bool>,
}

impl EffectComponent {
    pub fn new(
        layer: Sublayer,
        selection: Rc<Selection>,
        deltas: Vec<Delta>,
        relative_component_ordinal: usize,
        timestamp: Timestamp,
        host: EntityId,
    ) -> Self {
        Self {
            id: ComponentId::new(),
            layer,
            is_characteristic_defining: false,
            selection,
            deltas,
            delta_factories: Vec::new(),
            relative_component_ordinal,
            timestamp,
            host,
            zone_gate: ZoneGate::battlefield_only(),
            antecedents_verified: Rc::new(|_| true),
            expired: Rc::new(Cell::new(false)),
            reference_effect: None,
            applied: Cell::new(false),
        }
    }

    pub fn characteristic_defining(mut self) -> Self {
        self.is_characteristic_defining = true;
        self
    }

    pub fn with_delta_factory(mut self, factory: DeltaFactory) -> Self {
        self.delta_factories.push(factory);
        self
    }

    pub fn with_zone_gate(mut self, gate: ZoneGate) -> Self {
        self.zone_gate = gate;
        self
    }

    pub fn with_antecedents_verified(mut self, f: Rc<dyn Fn(&EvalContext) -> bool>) -> Self {
        self.antecedents_verified = f;
        self
    }

    /// Shares the owning [`crate::effect::Effect`]'s expiry flag so
    /// expiring the effect is immediately visible on every one of its
    /// components.
    pub fn with_expired(mut self, expired: Rc<Cell<bool>>) -> Self {
        self.expired = expired;
        self
    }

    pub fn with_reference_effect(mut self, effect: EffectId) -> Self {
        self.reference_effect = Some(effect);
        self
    }

    pub fn is_applied(&self) -> bool {
        self.applied.get()
    }

    pub fn mark_applied(&self) {
        self.applied.set(true);
    }

    /// `applied` only gates re-enactment within one snapshot pass
    /// (`spec.md` §4.3: "the manager will not consider it again *this
    /// pass*"); the manager resets it on every registered component at
    /// the start of `snapshot()` so a continuous effect reapplies every
    /// pass until it expires or is deregistered.
    pub fn reset_applied(&self) {
        self.applied.set(false);
    }

    pub fn is_valid(&self, ctx: &EvalContext) -> bool {
        !self.expired.get()
            && (self.antecedents_verified)(ctx)
            && ctx
                .world
                .zone_of(self.host)
                .map(|zone| self.zone_gate.allows(zone))
                .unwrap_or(true)
    }

    /// Resolve the selection, compute and write every delta for every
    /// target, then run delta factories. If `subject_lock` is set, mark
    /// the component applied so the manager won't reconsider it this
    /// pass (`spec.md` §4.3 contract).
    pub fn enact(&self, world: &World, overlay: &mut Overlay, subject_lock: bool) {
        let targets = {
            let ctx = EvalContext::new(world, overlay);
            self.selection.filter(&ctx)
        };

        for target in &targets {
            self.apply_deltas(&self.deltas, world, overlay, *target);
        }

        for factory in &self.delta_factories {
            let factory_deltas = {
                let ctx = EvalContext::new(world, overlay);
                factory(&ctx, self)
            };
            for target in &targets {
                self.apply_deltas(&factory_deltas, world, overlay, *target);
            }
        }

        if subject_lock {
            self.mark_applied();
        }
    }

    fn apply_deltas(&self, deltas: &[Delta], world: &World, overlay: &mut Overlay, target: EntityId) {
        for delta in deltas {
            let value = {
                let ctx = EvalContext::new(world, overlay);
                delta.compute(&ctx, target)
            };
            for attr in &delta.targets {
                overlay.modify(world, target, *attr, value.clone());
            }
        }
    }

    /// The presort key: `(timestamp, relative_component_ordinal)`
    /// (`spec.md` §4.7).
    pub fn presort_key(&self) -> (Timestamp, usize) {
        (self.timestamp, self.relative_component_ordinal)
    }
}

impl std::fmt::Debug for EffectComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectComponent")
            .field("id", &self.id)
            .field("layer", &self.layer.as_str())
            .field("cda", &self.is_characteristic_defining)
            .field("ordinal", &self.relative_component_ordinal)
            .finish()
    }
}
