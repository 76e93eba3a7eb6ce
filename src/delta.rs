//! Deltas (`spec.md` §4.3): an assignment intent, a list of target
//! attribute names plus an expression whose value is written to each.
//! Constant deltas evaluate independent of the target; reflexive deltas
//! receive the target object as the expression's subject, enabling
//! "x gains 5 life"-style rewrites.

use indexmap::IndexMap;
use std::rc::Rc;

use crate::{
    abilities::{Ability, AbilityOrigin},
    expression::{EvalContext, Expr},
    ids::EntityId,
    value::{Attribute, Value},
};

#[derive(Clone, Debug)]
pub struct Delta {
    pub targets: Vec<Attribute>,
    pub expr: Expr,
    pub reflexive: bool,
}

impl Delta {
    pub fn constant(targets: impl IntoIterator<Item = Attribute>, expr: Expr) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            expr,
            reflexive: false,
        }
    }

    pub fn reflexive(targets: impl IntoIterator<Item = Attribute>, expr: Expr) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            expr,
            reflexive: true,
        }
    }

    pub fn compute(&self, ctx: &EvalContext, target: EntityId) -> Value {
        let subject = if self.reflexive { Some(target) } else { None };
        self.expr.evaluate(ctx, subject)
    }
}

fn abilities_method(
    f: impl Fn(&EvalContext, EntityId, Vec<Ability>) -> Vec<Ability> + 'static,
) -> Expr {
    Expr::MethodCall {
        target: Box::new(Expr::Subject),
        name: "abilities_transform",
        method: Rc::new(move |ctx, resolved, _args| {
            let Some(entity) = resolved.as_entity_ref() else {
                return Value::None;
            };
            let current = ctx
                .query(entity, Attribute::Abilities)
                .as_abilities()
                .map(|a| a.to_vec())
                .unwrap_or_default();
            Value::Abilities(f(ctx, entity, current))
        }),
        args: IndexMap::new(),
    }
}

/// Grants a keyword ability idempotently (a second grant is a no-op),
/// unless the entity currently has that keyword prohibited — in which
/// case the grant is silently dropped, per "prohibitions always win"
/// (`spec.md` §8).
pub fn grant_keyword_ability(keyword: &'static str, origin: AbilityOrigin) -> Delta {
    Delta::reflexive(
        [Attribute::Abilities],
        abilities_method(move |ctx, entity, mut current| {
            let banned = match entity {
                EntityId::Object(id) => ctx.world.object(id).banned_keywords.contains(keyword),
                EntityId::Player(_) => false,
            };
            if banned || current.iter().any(|a| a.keyword_tag() == Some(keyword)) {
                return current;
            }
            current.push(Ability::keyword(entity, keyword, origin));
            current
        }),
    )
}

pub fn lose_keyword_ability(keyword: &'static str) -> Delta {
    Delta::reflexive(
        [Attribute::Abilities],
        abilities_method(move |_ctx, _entity, mut current| {
            current.retain(|a| a.keyword_tag() != Some(keyword));
            current
        }),
    )
}

/// Strips abilities whose origin is `rules_text` or `copiable_effect`,
/// leaving `granted` abilities untouched (the original's
/// `LoseRulesTextAndCopiableEffectAbilities`) — this is Humility's and
/// Opalescence's shape.
pub fn lose_rules_text_and_copiable_effect_abilities() -> Delta {
    Delta::reflexive(
        [Attribute::Abilities],
        abilities_method(|_ctx, _entity, mut current| {
            current.retain(|a| a.origin == AbilityOrigin::Granted);
            current
        }),
    )
}

pub fn lose_all_abilities() -> Delta {
    Delta::constant([Attribute::Abilities], Expr::Constant(Value::Abilities(Vec::new())))
}

pub fn add_card_types(types: Vec<String>) -> Delta {
    Delta::reflexive(
        [Attribute::CardTypes],
        Expr::Reduction {
            op: crate::expression::ReduceOp::Union,
            attr: Attribute::CardTypes,
            sequence: Box::new(Expr::Constant(Value::StrSet(types.into_iter().collect()))),
        },
    )
}

pub fn add_supertypes(types: Vec<String>) -> Delta {
    Delta::reflexive(
        [Attribute::Supertypes],
        Expr::Reduction {
            op: crate::expression::ReduceOp::Union,
            attr: Attribute::Supertypes,
            sequence: Box::new(Expr::Constant(Value::StrSet(types.into_iter().collect()))),
        },
    )
}

pub fn remove_all_card_types() -> Delta {
    Delta::constant(
        [Attribute::CardTypes],
        Expr::Constant(Value::StrSet(Default::default())),
    )
}

pub fn set_fixed_power(value: i64) -> Delta {
    Delta::constant([Attribute::Power], Expr::Constant(Value::Int(value)))
}

pub fn set_fixed_toughness(value: i64) -> Delta {
    Delta::constant([Attribute::Toughness], Expr::Constant(Value::Int(value)))
}

pub fn power_toughness_boost(power: i64, toughness: i64) -> Vec<Delta> {
    vec![
        Delta::reflexive(
            [Attribute::Power],
            Expr::BinaryOp {
                op: crate::expression::BinOp::Add,
                left: Box::new(Expr::subject_attr(Attribute::Power)),
                right: Box::new(Expr::Constant(Value::Int(power))),
            },
        ),
        Delta::reflexive(
            [Attribute::Toughness],
            Expr::BinaryOp {
                op: crate::expression::BinOp::Add,
                left: Box::new(Expr::subject_attr(Attribute::Toughness)),
                right: Box::new(Expr::Constant(Value::Int(toughness))),
            },
        ),
    ]
}

fn base_attr_of(attr: Attribute) -> Expr {
    Expr::MethodCall {
        target: Box::new(Expr::Subject),
        name: "base_attr",
        method: Rc::new(move |ctx, resolved, _args| {
            resolved
                .as_entity_ref()
                .map(|entity| ctx.world.base_attr(entity, attr))
                .unwrap_or(Value::None)
        }),
        args: IndexMap::new(),
    }
}

/// "Switch target creature's power and toughness" — a recurring MTG
/// idiom (`SPEC_FULL.md` §4). The two deltas each read their source
/// attribute's base (pre-overlay) value directly rather than
/// `subject_attr`, which reads through the overlay's `current` map:
/// chaining two ordinary reflexive deltas here would have the second
/// delta observe the first delta's just-written value instead of the
/// original, collapsing a swap into two copies of the same value.
pub fn switch_power_toughness() -> Vec<Delta> {
    vec![
        Delta::reflexive([Attribute::Power], base_attr_of(Attribute::Toughness)),
        Delta::reflexive([Attribute::Toughness], base_attr_of(Attribute::Power)),
    ]
}

pub fn set_controller(controller: crate::ids::PlayerId) -> Delta {
    Delta::constant(
        [Attribute::Controller],
        Expr::Constant(Value::PlayerRef(Some(controller))),
    )
}

pub fn gain_life(amount: i64) -> Delta {
    Delta::reflexive(
        [Attribute::Lifetotal],
        Expr::BinaryOp {
            op: crate::expression::BinOp::Add,
            left: Box::new(Expr::subject_attr(Attribute::Lifetotal)),
            right: Box::new(Expr::Constant(Value::Int(amount))),
        },
    )
}
