//! Abilities living in an object's `abilities` list (`spec.md` §3).
//!
//! A static ability is an effect generator: each solver pass, while
//! active, it produces one [`Effect`]. Authored card code implements
//! [`StaticAbilityGen`] the way the teacher's activated/triggered
//! abilities implement their own small traits (`abilities.rs`) — one
//! struct per ability, dispatched through a trait object rather than a
//! closure, because static abilities also need `is_active`/
//! `antecedents_verified` alongside generation.
//!
//! A keyword ability is just a marker-like class identity (a `String`
//! tag) used by grant/ban/lose deltas; it carries no behavior here.

use std::{fmt, rc::Rc};

use crate::{effect::Effect, ids::AbilityId, ids::EntityId, world::World};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbilityOrigin {
    RulesText,
    CopiableEffect,
    Granted,
}

pub trait StaticAbilityGen: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Whether this ability is currently eligible to generate an effect:
    /// host is in an eligible zone and any guard predicate holds.
    fn is_active(&self, world: &World, host: EntityId) -> bool;

    /// Additional authoring-time guard a component checks before being
    /// considered valid at all (`spec.md` §4.3).
    fn antecedents_verified(&self, _world: &World, _host: EntityId) -> bool {
        true
    }

    fn generate_effect(&self, world: &World, host: EntityId, ids: &mut crate::manager::IdSource) -> Effect;
}

#[derive(Clone)]
pub enum AbilityKind {
    /// A keyword-ability class identity, compared by tag rather than by
    /// the identity of any particular grant.
    Keyword(String),
    /// A player-level ability tag (e.g. a granted "you have no maximum
    /// hand size"-style keyword living on a player rather than a card).
    PlayerLevel(String),
    Static(Rc<dyn StaticAbilityGen>),
}

impl fmt::Debug for AbilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityKind::Keyword(k) => write!(f, "Keyword({k})"),
            AbilityKind::PlayerLevel(k) => write!(f, "PlayerLevel({k})"),
            AbilityKind::Static(s) => write!(f, "Static({})", s.name()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Ability {
    pub id: AbilityId,
    pub origin: AbilityOrigin,
    pub host: EntityId,
    pub kind: AbilityKind,
}

impl Ability {
    pub fn keyword(host: EntityId, keyword: impl Into<String>, origin: AbilityOrigin) -> Self {
        Self {
            id: AbilityId::new(),
            origin,
            host,
            kind: AbilityKind::Keyword(keyword.into()),
        }
    }

    pub fn static_ability(host: EntityId, gen: Rc<dyn StaticAbilityGen>, origin: AbilityOrigin) -> Self {
        Self {
            id: AbilityId::new(),
            origin,
            host,
            kind: AbilityKind::Static(gen),
        }
    }

    /// Clone this ability for a copy effect: a fresh id, rebound host,
    /// tagged `copiable_effect` (`spec.md` §4.4). Unresolved string
    /// placeholders aren't modeled as a distinct variant here — callers
    /// that author placeholder abilities represent them as ordinary
    /// keyword tags, which already pass through unchanged.
    pub fn rebind_for_copy(&self, new_host: EntityId) -> Self {
        Self {
            id: AbilityId::new(),
            origin: AbilityOrigin::CopiableEffect,
            host: new_host,
            kind: self.kind.clone(),
        }
    }

    pub fn keyword_tag(&self) -> Option<&str> {
        match &self.kind {
            AbilityKind::Keyword(k) => Some(k),
            _ => None,
        }
    }
}

impl PartialEq for Ability {
    /// Keyword-ability classes compare by type tag; everything else
    /// compares by identity (`spec.md` §9 design notes).
    fn eq(&self, other: &Self) -> bool {
        match (&self.kind, &other.kind) {
            (AbilityKind::Keyword(a), AbilityKind::Keyword(b)) => a == b,
            _ => self.id == other.id,
        }
    }
}

impl Eq for Ability {}
