//! `spec.md` §8 scenario 4: Humility and Opalescence, each a
//! characteristic-defining power/toughness setter in sublayer 7b.
//! Opalescence's CDA sets both enchantments (itself and Humility, once
//! its layer-4 effect makes Humility a creature too) to 4/4; Humility's
//! CDA sets only itself to 1/1. The two assignments conflict only over
//! Humility — the dependency solver can't establish a one-way edge
//! between them there, so the resulting 2-cycle cancels and Humility's
//! own P/T falls back to presort (timestamp) order, exactly the
//! outcome the scenario describes. Opalescence's own P/T is never a
//! target of Humility's CDA, so it is unaffected regardless of which
//! enchantment has the later timestamp.

use std::rc::Rc;

use crate::{
    _tests::support::{all_creatures, entity},
    component::EffectComponent,
    delta::{add_card_types, lose_all_abilities, set_fixed_power, set_fixed_toughness},
    config::Sublayer,
    effect::Effect,
    ids::Timestamp,
    manager::Manager,
    object::{BaseObject, Player},
    selection::{Predicate, Selection},
    value::{Attribute, Value},
    world::World,
};

struct Fixture {
    world: World,
    manager: Manager,
    humility: crate::ids::EntityId,
    opalescence: crate::ids::EntityId,
}

/// Registers both enchantments' effects. `humility_ts < opalescence_ts`
/// reproduces scenario A; the reverse reproduces scenario B.
fn setup(humility_ts: Timestamp, opalescence_ts: Timestamp) -> Fixture {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let humility_id = world.add_object(BaseObject::new("Humility", p0));
    let opalescence_id = world.add_object(BaseObject::new("Opalescence", p0));
    let humility = entity(humility_id);
    let opalescence = entity(opalescence_id);

    let mut manager = Manager::new();

    let become_creatures = EffectComponent::new(
        Sublayer::L4,
        Rc::new(Selection::new(
            move |_ctx| vec![humility, opalescence],
            Predicate::atomic("opalescence_affected", |_ctx, _e| true),
        )),
        vec![add_card_types(vec!["creature".to_string()])],
        0,
        opalescence_ts,
        opalescence,
    );
    let opalescence_pt = EffectComponent::new(
        Sublayer::L7b,
        Rc::new(Selection::new(
            move |_ctx| vec![humility, opalescence],
            Predicate::atomic("opalescence_pt_targets", |_ctx, _e| true),
        )),
        vec![set_fixed_power(4), set_fixed_toughness(4)],
        1,
        opalescence_ts,
        opalescence,
    )
    .characteristic_defining();
    let opalescence_effect = Effect::new(opalescence_ts, move |expired| {
        vec![
            Rc::new(become_creatures.with_expired(expired.clone())),
            Rc::new(opalescence_pt.with_expired(expired)),
        ]
    });
    manager.register_effect(opalescence_effect);

    let strip_abilities = EffectComponent::new(
        Sublayer::L6,
        Rc::new(all_creatures()),
        vec![lose_all_abilities()],
        0,
        humility_ts,
        humility,
    );
    let humility_pt = EffectComponent::new(
        Sublayer::L7b,
        Rc::new(Selection::single(humility)),
        vec![set_fixed_power(1), set_fixed_toughness(1)],
        1,
        humility_ts,
        humility,
    )
    .characteristic_defining();
    let humility_effect = Effect::new(humility_ts, move |expired| {
        vec![
            Rc::new(strip_abilities.with_expired(expired.clone())),
            Rc::new(humility_pt.with_expired(expired)),
        ]
    });
    manager.register_effect(humility_effect);

    Fixture {
        world,
        manager,
        humility,
        opalescence,
    }
}

#[test]
fn scenario_a_humility_first_ends_at_opalescences_four_four() {
    let early = Timestamp::next();
    let late = Timestamp::next();
    let mut fixture = setup(early, late);

    fixture.manager.snapshot(&mut fixture.world);

    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.humility, Attribute::Power),
        Value::Int(4)
    );
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.humility, Attribute::Toughness),
        Value::Int(4)
    );
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.humility, Attribute::Abilities),
        Value::Abilities(Vec::new())
    );
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.opalescence, Attribute::Power),
        Value::Int(4)
    );
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.opalescence, Attribute::Toughness),
        Value::Int(4)
    );
}

#[test]
fn scenario_b_opalescence_first_ends_at_humilitys_one_one() {
    let early = Timestamp::next();
    let late = Timestamp::next();
    let mut fixture = setup(late, early);

    fixture.manager.snapshot(&mut fixture.world);

    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.humility, Attribute::Power),
        Value::Int(1)
    );
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.humility, Attribute::Toughness),
        Value::Int(1)
    );
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.humility, Attribute::Abilities),
        Value::Abilities(Vec::new())
    );
    // Opalescence's own CDA is the only thing that ever targets Opalescence
    // for power/toughness, so it stays 4/4 regardless of which enchantment
    // has the later timestamp.
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.opalescence, Attribute::Power),
        Value::Int(4)
    );
    assert_eq!(
        fixture.manager.query_attribute(&fixture.world, fixture.opalescence, Attribute::Toughness),
        Value::Int(4)
    );
}
