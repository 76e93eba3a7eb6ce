//! The overlay's value sum type and the fixed attribute name set.
//! Per the design notes (`spec.md` §9): container values must be
//! deep-cloned whenever they're placed into the overlay, since later
//! components mutate them in place via reductions.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::{abilities::Ability, ids::EntityId, ids::PlayerId};

/// Modifiable characteristics, plus the two player-level attributes
/// (`Lifetotal`, `PlayerAbilities`) supplemented from the original's
/// `LifetotalDelta` (see `SPEC_FULL.md` §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, EnumIter, Serialize, Deserialize)]
pub enum Attribute {
    Name,
    Cost,
    CardTypes,
    Subtypes,
    Supertypes,
    Colors,
    Abilities,
    Power,
    Toughness,
    Loyalty,
    Controller,
    PlayerAbilities,
    Lifetotal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Str(String),
    StrSet(IndexSet<String>),
    #[serde(skip)]
    Abilities(Vec<Ability>),
    PlayerRef(Option<PlayerId>),
    #[serde(skip)]
    EntityRef(Option<EntityId>),
    None,
}

impl Value {
    /// Deep copy: the only place a container value is ever duplicated
    /// wholesale, per the overlay's `modify`/constant-expression
    /// contracts.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str_set(&self) -> Option<&IndexSet<String>> {
        match self {
            Value::StrSet(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_abilities(&self) -> Option<&[Ability]> {
        match self {
            Value::Abilities(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            Value::EntityRef(e) => *e,
            _ => None,
        }
    }
}

/// The impact of a component under evaluation: a reference value and a
/// current value compared per `spec.md` §4.6. Integers compare with
/// signed subtraction (so `A⊕B = B⊕A` can be tested by value equality);
/// sets compare with a `(difference, symmetric_difference)` pair (so two
/// replacements that happen to swap elements still compare equal under
/// commutativity); everything else compares by plain equality.
#[derive(Debug, Clone, PartialEq)]
pub enum Impact {
    Int(i64),
    Set {
        removed: IndexSet<String>,
        symmetric_difference: IndexSet<String>,
    },
    Changed(bool),
}

impl Impact {
    pub fn of(reference: &Value, current: &Value) -> Self {
        match (reference, current) {
            (Value::Int(before), Value::Int(after)) => Impact::Int(after - before),
            (Value::StrSet(before), Value::StrSet(after)) => Impact::Set {
                removed: before.difference(after).cloned().collect(),
                symmetric_difference: before.symmetric_difference(after).cloned().collect(),
            },
            _ => Impact::Changed(reference != current),
        }
    }
}
