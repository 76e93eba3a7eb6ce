//! `spec.md` §8 scenarios 1-3: Master of Etherium's characteristic-
//! defining power/toughness (sublayer 7b, CDA) and its anthem for other
//! artifact creatures (sublayer 7c), under a control-changing aura.

use std::rc::Rc;

use crate::{
    _tests::support::{artifact_creature, artifacts_you_control, entity, other_artifact_creatures_you_control, rc_selection},
    component::EffectComponent,
    config::Sublayer,
    delta::{add_supertypes, power_toughness_boost, set_controller},
    effect::Effect,
    expression::Expr,
    ids::Timestamp,
    manager::Manager,
    object::Player,
    selection::Selection,
    value::{Attribute, Value},
    world::World,
};

fn register_master(manager: &mut Manager, master: crate::ids::EntityId, timestamp: Timestamp) {
    let cda = EffectComponent::new(
        Sublayer::L7b,
        Rc::new(Selection::single(master)),
        vec![crate::delta::Delta::constant(
            [Attribute::Power, Attribute::Toughness],
            Expr::ObjectCount {
                selection: rc_selection(artifacts_you_control(master)),
            },
        )],
        0,
        timestamp,
        master,
    )
    .characteristic_defining();

    let anthem = EffectComponent::new(
        Sublayer::L7c,
        rc_selection(other_artifact_creatures_you_control(master)),
        power_toughness_boost(1, 1),
        1,
        timestamp,
        master,
    );

    let effect = Effect::new(timestamp, move |expired| {
        vec![Rc::new(cda.with_expired(expired.clone())), Rc::new(anthem.with_expired(expired))]
    });
    manager.register_effect(effect);
}

#[test]
fn master_alone_is_one_one() {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let master_id = world.add_object(artifact_creature("Master of Etherium", 0, 0, p0));
    let master = entity(master_id);

    let mut manager = Manager::new();
    register_master(&mut manager, master, Timestamp::next());
    manager.snapshot(&mut world);

    assert_eq!(manager.query_attribute(&world, master, Attribute::Power), Value::Int(1));
    assert_eq!(manager.query_attribute(&world, master, Attribute::Toughness), Value::Int(1));
    assert!(world.object(master_id).supertypes.is_empty());
}

#[test]
fn master_with_alpha_myr_boosts_alpha_myr_only() {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let master_id = world.add_object(artifact_creature("Master of Etherium", 0, 0, p0));
    let alpha_myr_id = world.add_object(artifact_creature("Alpha Myr", 2, 1, p0));
    let master = entity(master_id);
    let alpha_myr = entity(alpha_myr_id);

    let mut manager = Manager::new();
    register_master(&mut manager, master, Timestamp::next());
    manager.snapshot(&mut world);

    assert_eq!(manager.query_attribute(&world, master, Attribute::Power), Value::Int(2));
    assert_eq!(manager.query_attribute(&world, master, Attribute::Toughness), Value::Int(2));
    assert_eq!(manager.query_attribute(&world, alpha_myr, Attribute::Power), Value::Int(3));
    assert_eq!(manager.query_attribute(&world, alpha_myr, Attribute::Toughness), Value::Int(2));
}

#[test]
fn master_enchanted_by_in_bolas_clutches_changes_controller_and_reverts_alpha_myr() {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let p1 = world.add_player(Player::new(1));
    let master_id = world.add_object(artifact_creature("Master of Etherium", 0, 0, p0));
    let alpha_myr_id = world.add_object(artifact_creature("Alpha Myr", 2, 1, p0));
    let master = entity(master_id);
    let alpha_myr = entity(alpha_myr_id);

    let mut manager = Manager::new();
    register_master(&mut manager, master, Timestamp::next());

    let clutches_component = EffectComponent::new(
        Sublayer::L2,
        Rc::new(Selection::single(master)),
        vec![set_controller(p1)],
        0,
        Timestamp::next(),
        master,
    );
    let legendary_component = EffectComponent::new(
        Sublayer::L4,
        Rc::new(Selection::single(master)),
        vec![add_supertypes(vec!["legendary".to_string()])],
        0,
        Timestamp::next(),
        master,
    );
    let clutches = Effect::new(Timestamp::next(), move |expired| {
        vec![
            Rc::new(clutches_component.with_expired(expired.clone())),
            Rc::new(legendary_component.with_expired(expired)),
        ]
    });
    manager.register_effect(clutches);

    manager.snapshot(&mut world);

    assert_eq!(
        manager.query_attribute(&world, master, Attribute::Controller),
        Value::PlayerRef(Some(p1))
    );
    assert_eq!(
        manager.query_attribute(&world, master, Attribute::Supertypes),
        Value::StrSet(["legendary".to_string()].into_iter().collect())
    );
    assert_eq!(manager.query_attribute(&world, master, Attribute::Power), Value::Int(1));
    assert_eq!(manager.query_attribute(&world, master, Attribute::Toughness), Value::Int(1));
    assert_eq!(manager.query_attribute(&world, alpha_myr, Attribute::Power), Value::Int(2));
    assert_eq!(manager.query_attribute(&world, alpha_myr, Attribute::Toughness), Value::Int(1));
}
