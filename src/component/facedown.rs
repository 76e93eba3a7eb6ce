//! Face-down effect components (`spec.md` §4.5): the fixed face-down
//! copiable set — name and cost empty, no colors, card types = {creature},
//! power and toughness 2/2, no abilities — as a family of constant deltas
//! against the same selection.

use std::rc::Rc;

use indexmap::IndexSet;

use crate::{
    config::Sublayer,
    delta::Delta,
    expression::Expr,
    ids::{EntityId, Timestamp},
    selection::Selection,
    value::{Attribute, Value},
};

use super::EffectComponent;

fn facedown_deltas() -> Vec<Delta> {
    vec![
        Delta::constant([Attribute::Name], Expr::Constant(Value::Str(String::new()))),
        Delta::constant([Attribute::Cost], Expr::Constant(Value::Str(String::new()))),
        Delta::constant(
            [Attribute::Colors],
            Expr::Constant(Value::StrSet(IndexSet::new())),
        ),
        Delta::constant(
            [Attribute::CardTypes],
            Expr::Constant(Value::StrSet(IndexSet::from(["creature".to_string()]))),
        ),
        Delta::constant(
            [Attribute::Subtypes],
            Expr::Constant(Value::StrSet(IndexSet::new())),
        ),
        Delta::constant(
            [Attribute::Supertypes],
            Expr::Constant(Value::StrSet(IndexSet::new())),
        ),
        Delta::constant([Attribute::Power], Expr::Constant(Value::Int(2))),
        Delta::constant([Attribute::Toughness], Expr::Constant(Value::Int(2))),
        Delta::constant(
            [Attribute::Abilities],
            Expr::Constant(Value::Abilities(Vec::new())),
        ),
    ]
}

/// Builds a face-down component for sublayer 1b.
pub fn facedown_effect_component(
    selection: Rc<Selection>,
    ordinal: usize,
    timestamp: Timestamp,
    host: EntityId,
) -> EffectComponent {
    EffectComponent::new(Sublayer::L1b, selection, facedown_deltas(), ordinal, timestamp, host)
}
