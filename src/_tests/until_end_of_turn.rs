//! `spec.md` §8 scenario 6: an "until end of turn" +2/+2 that expires
//! when the distinguished `UntilEndOfTurn` signal is broadcast.

use std::{cell::RefCell, rc::Rc};

use crate::{
    _tests::support::entity,
    component::EffectComponent,
    config::Sublayer,
    delta::power_toughness_boost,
    duration::{Event, Listener, Match},
    effect::Effect,
    ids::Timestamp,
    manager::Manager,
    object::{BaseObject, Player},
    selection::Selection,
    value::Attribute,
    world::World,
};

#[test]
fn until_end_of_turn_boost_expires_on_broadcast() {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let mut creature = BaseObject::new("Target Creature", p0);
    creature.power = Some(2);
    creature.toughness = Some(2);
    let creature_id = world.add_object(creature);
    let target = entity(creature_id);

    let mut manager = Manager::new();
    let timestamp = Timestamp::next();
    let boost = EffectComponent::new(
        Sublayer::L7c,
        Rc::new(Selection::single(target)),
        power_toughness_boost(2, 2),
        0,
        timestamp,
        target,
    );

    let listener_cell: Rc<RefCell<Option<Rc<Listener>>>> = Rc::new(RefCell::new(None));
    let listener_cell_for_closure = listener_cell.clone();
    let effect = Effect::new(timestamp, move |expired| {
        let listener = Listener::new(Match::UntilEndOfTurn, 1, expired.clone());
        *listener_cell_for_closure.borrow_mut() = Some(listener.clone());
        vec![Rc::new(boost.with_expired(expired))]
    })
    .with_duration(listener_cell.borrow().clone().expect("listener built in make_components"));
    manager.register_effect(effect);

    manager.snapshot(&mut world);
    assert_eq!(manager.query_attribute(&world, target, Attribute::Power), crate::value::Value::Int(4));
    assert_eq!(manager.query_attribute(&world, target, Attribute::Toughness), crate::value::Value::Int(4));

    manager.duration.broadcast(&Event::UntilEndOfTurn);
    assert!(manager.duration.is_empty());

    manager.snapshot(&mut world);
    assert_eq!(manager.query_attribute(&world, target, Attribute::Power), crate::value::Value::Int(2));
    assert_eq!(manager.query_attribute(&world, target, Attribute::Toughness), crate::value::Value::Int(2));
}
