//! Copy-effect components (`spec.md` §4.4): assigns copiable values from
//! a target's `copy_source_object`, with an exception list that can
//! overwrite specific copiable attributes afterwards (e.g. "except it's
//! 7/7").

use std::rc::Rc;

use indexmap::IndexMap;

use crate::{
    config::{Sublayer, COPIABLE_ATTRIBUTES},
    delta::Delta,
    expression::Expr,
    ids::{EntityId, Timestamp},
    selection::Selection,
    value::{Attribute, Value},
};

use super::EffectComponent;

fn copy_attribute_delta(attr: Attribute) -> Delta {
    Delta::reflexive(
        [attr],
        Expr::MethodCall {
            target: Box::new(Expr::Subject),
            name: "copy_attribute",
            method: Rc::new(move |ctx, resolved, _args| {
                let Some(EntityId::Object(target_id)) = resolved.as_entity_ref() else {
                    return Value::None;
                };
                let target = ctx.world.object(target_id);
                match target.copy_source_object {
                    Some(source_id) => ctx
                        .world
                        .object(source_id)
                        .copiable_values
                        .get(&attr)
                        .cloned()
                        .unwrap_or(Value::None),
                    None => ctx.query(EntityId::Object(target_id), attr),
                }
            }),
            args: IndexMap::new(),
        },
    )
}

fn copy_abilities_delta() -> Delta {
    Delta::reflexive(
        [Attribute::Abilities],
        Expr::MethodCall {
            target: Box::new(Expr::Subject),
            name: "copy_abilities",
            method: Rc::new(move |ctx, resolved, _args| {
                let Some(EntityId::Object(target_id)) = resolved.as_entity_ref() else {
                    return Value::None;
                };
                let target = ctx.world.object(target_id);
                match target.copy_source_object {
                    Some(source_id) => {
                        let source = ctx.world.object(source_id);
                        let cloned = source
                            .copiable_values
                            .get(&Attribute::Abilities)
                            .and_then(Value::as_abilities)
                            .unwrap_or(&source.abilities)
                            .iter()
                            .map(|a| a.rebind_for_copy(EntityId::Object(target_id)))
                            .collect();
                        Value::Abilities(cloned)
                    }
                    None => ctx.query(EntityId::Object(target_id), Attribute::Abilities),
                }
            }),
            args: IndexMap::new(),
        },
    )
}

/// Builds a copy-effect component for sublayer 1a. Pass `exceptions` as
/// deltas that run after the base copy and overwrite specific
/// attributes.
pub fn copy_effect_component(
    selection: Rc<Selection>,
    ordinal: usize,
    timestamp: Timestamp,
    host: EntityId,
    exceptions: Vec<Delta>,
) -> EffectComponent {
    let mut deltas = Vec::with_capacity(COPIABLE_ATTRIBUTES.len() + exceptions.len());
    for &attr in COPIABLE_ATTRIBUTES {
        if attr == Attribute::Abilities {
            deltas.push(copy_abilities_delta());
        } else {
            deltas.push(copy_attribute_delta(attr));
        }
    }
    deltas.extend(exceptions);

    EffectComponent::new(Sublayer::L1a, selection, deltas, ordinal, timestamp, host)
}
