//! The effect manager (`spec.md` §4.8): the outer snapshot driver.
//! Gathers eligible components each pass, partitions them by sublayer,
//! freezes copiable values at the 1b/2 boundary, and invokes the
//! dependency solver per layer.
//!
//! The source models the overlay, the manager, and the event handler as
//! process-wide singletons. Here they're one context handle
//! (`Manager`) the caller owns and threads through explicitly — this is
//! what the design notes (`spec.md` §9) ask for so the solver stays
//! reentrant and replay-friendly instead of relying on globals.

use std::{collections::HashMap, rc::Rc, sync::atomic::{AtomicUsize, Ordering}};

use indexmap::IndexMap;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    abilities::AbilityKind,
    component::EffectComponent,
    config::{Sublayer, COPIABLE_ATTRIBUTES},
    dependency,
    duration::DurationHandler,
    effect::Effect,
    expression::EvalContext,
    ids::{AbilityId, EntityId, ObjectId, Timestamp},
    markers::MarkerType,
    object::Modifiable,
    overlay::Overlay,
    selection::Selection,
    value::Attribute,
    world::World,
};

static NEXT_ORDINAL: AtomicUsize = AtomicUsize::new(0);

/// Supplies fresh timestamps/uuids/ordinals to static-ability effect
/// generators so authoring code never reaches for a global (`spec.md`
/// §6 collaborator contracts: timestamp source, unique-id source).
#[derive(Debug, Default)]
pub struct IdSource;

impl IdSource {
    pub fn timestamp(&mut self) -> Timestamp {
        Timestamp::next()
    }

    pub fn fresh_uuid(&mut self) -> String {
        Uuid::new_v4().to_string()
    }

    /// A process-wide monotonic ordinal, used when a generated effect's
    /// components need a stable `relative_component_ordinal` distinct
    /// from any other generated this run.
    pub fn next_ordinal(&mut self) -> usize {
        NEXT_ORDINAL.fetch_add(1, Ordering::Relaxed)
    }
}

pub struct Manager {
    overlay: Overlay,
    registered_effects: Vec<Effect>,
    pub duration: DurationHandler,
    generated_this_pass: HashMap<AbilityId, Rc<Effect>>,
    id_source: IdSource,
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

impl Manager {
    pub fn new() -> Self {
        Self {
            overlay: Overlay::new(),
            registered_effects: Vec::new(),
            duration: DurationHandler::new(),
            generated_this_pass: HashMap::new(),
            id_source: IdSource::default(),
        }
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn query_attribute(&self, world: &World, entity: EntityId, attr: Attribute) -> crate::value::Value {
        self.overlay.query(world, entity, attr)
    }

    pub fn object_counter(&self, world: &World, selection: &Selection) -> usize {
        let ctx = EvalContext::new(world, &self.overlay);
        selection.cardinality(&ctx)
    }

    pub fn register_effect(&mut self, effect: Effect) {
        if let Some(listener) = effect.duration.clone() {
            self.duration.register(listener);
        }
        self.registered_effects.push(effect);
    }

    pub fn add_marker(&self, modifiable: &mut impl Modifiable, marker_type: MarkerType, count: u32) {
        if !modifiable.can_have_markers() {
            return;
        }
        if modifiable.prohibited_marker_types().contains(marker_type.tag()) {
            return;
        }
        modifiable.markers().add(marker_type, count);
    }

    pub fn remove_marker_by_type(&self, modifiable: &mut impl Modifiable, marker_type: MarkerType) {
        modifiable.markers().remove_by_type(marker_type);
    }

    /// Runs a full solver pass (`spec.md` §4.8).
    #[instrument(level = "info", skip(self, world))]
    pub fn snapshot(&mut self, world: &mut World) {
        self.overlay.calibrate();
        self.generated_this_pass.clear();
        self.registered_effects.retain(|e| !e.is_expired());
        for effect in &self.registered_effects {
            for component in &effect.components {
                component.reset_applied();
            }
        }

        let pass1 = self.gather(world, &[Sublayer::L1a, Sublayer::L1b]);
        self.solve_layers(world, &pass1, &[Sublayer::L1a, Sublayer::L1b]);

        self.freeze_copiable_values(world);

        let pass2 = self.gather(
            world,
            &[Sublayer::L2, Sublayer::L3, Sublayer::L4, Sublayer::L5, Sublayer::L6],
        );
        self.solve_layers(
            world,
            &pass2,
            &[Sublayer::L2, Sublayer::L3, Sublayer::L4, Sublayer::L5, Sublayer::L6],
        );

        let pass3 = self.gather(
            world,
            &[
                Sublayer::L6,
                Sublayer::L7a,
                Sublayer::L7b,
                Sublayer::L7c,
                Sublayer::L7d,
                Sublayer::L8,
            ],
        );
        self.solve_layers(
            world,
            &pass3,
            &[
                Sublayer::L6,
                Sublayer::L7a,
                Sublayer::L7b,
                Sublayer::L7c,
                Sublayer::L7d,
                Sublayer::L8,
            ],
        );
    }

    /// Gathers every component eligible for any of `sublayers`: marker
    /// synthesis, not-yet-applied registered effects, and novel active
    /// static abilities (`spec.md` §4.8 step 2).
    fn gather(&mut self, world: &World, sublayers: &[Sublayer]) -> Vec<Rc<EffectComponent>> {
        let mut out = Vec::new();

        for component in self.synthesize_marker_components(world) {
            if sublayers.contains(&component.layer) {
                out.push(component);
            }
        }

        for effect in &self.registered_effects {
            if effect.is_expired() || !effect.is_valid(world) {
                continue;
            }
            for component in &effect.components {
                if sublayers.contains(&component.layer) && !component.is_applied() {
                    out.push(component.clone());
                }
            }
        }

        for component in self.gather_static_abilities(world) {
            if sublayers.contains(&component.layer) && !component.is_applied() {
                out.push(component);
            }
        }

        out
    }

    fn gather_static_abilities(&mut self, world: &World) -> Vec<Rc<EffectComponent>> {
        let mut out = Vec::new();
        let hosts: Vec<(EntityId, Vec<crate::abilities::Ability>)> = world
            .objects
            .keys()
            .map(|&id| (EntityId::Object(id), world.object(id).abilities.clone()))
            .chain(
                world
                    .players
                    .keys()
                    .map(|&id| (EntityId::Player(id), world.player(id).abilities.clone())),
            )
            .collect();

        for (host, abilities) in hosts {
            for ability in abilities {
                let AbilityKind::Static(gen) = &ability.kind else {
                    continue;
                };
                if let Some(effect) = self.generated_this_pass.get(&ability.id) {
                    out.extend(effect.components.iter().cloned());
                    continue;
                }
                if !gen.is_active(world, host) || !gen.antecedents_verified(world, host) {
                    continue;
                }
                let effect = gen.generate_effect(world, host, &mut self.id_source);
                out.extend(effect.components.iter().cloned());
                self.generated_this_pass.insert(ability.id, Rc::new(effect));
            }
        }
        out
    }

    fn synthesize_marker_components(&self, world: &World) -> Vec<Rc<EffectComponent>> {
        let mut out = Vec::new();
        for (&id, object) in &world.objects {
            let plus = object.markers.count_of(MarkerType::PlusOnePlusOne) as i64;
            let minus = object.markers.count_of(MarkerType::MinusOneMinusOne) as i64;
            let net = plus - minus;
            if net == 0 {
                continue;
            }
            let target = EntityId::Object(id);
            let timestamp = object
                .markers
                .iter()
                .filter(|m| {
                    matches!(
                        m.marker_type,
                        MarkerType::PlusOnePlusOne | MarkerType::MinusOneMinusOne
                    )
                })
                .map(|m| m.timestamp)
                .max()
                .unwrap_or(object.timestamp);
            let component = EffectComponent::new(
                Sublayer::L7d,
                Rc::new(Selection::single(target)),
                crate::delta::power_toughness_boost(net, net),
                0,
                timestamp,
                target,
            );
            out.push(Rc::new(component));
        }
        out
    }

    /// Solves each sublayer in `order` against the already-gathered
    /// `components`, resolving the characteristic-defining partition
    /// before the rest within each sublayer (`spec.md` §4.8).
    fn solve_layers(&mut self, world: &mut World, components: &[Rc<EffectComponent>], order: &[Sublayer]) {
        for &layer in order {
            let layer_components: Vec<Rc<EffectComponent>> =
                components.iter().filter(|c| c.layer == layer).cloned().collect();
            if layer_components.is_empty() {
                continue;
            }

            let (cda, non_cda): (Vec<_>, Vec<_>) = layer_components
                .into_iter()
                .partition(|c| c.is_characteristic_defining);

            if !cda.is_empty() {
                dependency::solve_sublayer(world, &mut self.overlay, &cda);
            }
            if !non_cda.is_empty() {
                dependency::solve_sublayer(world, &mut self.overlay, &non_cda);
            }

            for component in components {
                component.selection.invalidate_cache();
            }
        }
    }

    /// Freezes the copiable-attribute subset into every object's
    /// `copiable_values`, read through the overlay so sublayer 1a/1b
    /// effects are visible (`spec.md` §4.8 step 5).
    fn freeze_copiable_values(&self, world: &mut World) {
        let ids: Vec<ObjectId> = world.objects.keys().copied().collect();
        for id in ids {
            let mut snapshot = IndexMap::new();
            for &attr in COPIABLE_ATTRIBUTES {
                let value = self.overlay.query(world, EntityId::Object(id), attr);
                snapshot.insert(attr, value);
            }
            world.object_mut(id).copiable_values = snapshot;
        }
    }
}
