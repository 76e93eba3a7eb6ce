//! `spec.md` §8 boundary behaviors.

use std::rc::Rc;

use indexmap::IndexSet;

use crate::{
    _tests::support::entity,
    abilities::AbilityOrigin,
    component::EffectComponent,
    config::Sublayer,
    delta::grant_keyword_ability,
    dependency,
    effect::Effect,
    ids::Timestamp,
    manager::Manager,
    markers::MarkerType,
    object::{BaseObject, Player},
    overlay::Overlay,
    selection::{Predicate, Selection},
    value::{Attribute, Value},
    world::World,
};

#[test]
fn empty_sublayer_is_a_no_op() {
    let world = World::new();
    let mut overlay = Overlay::new();
    dependency::solve_sublayer(&world, &mut overlay, &[]);
    assert!(overlay.return_avd().is_empty());
}

#[test]
fn component_with_empty_selection_contributes_no_deltas() {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let mut object = BaseObject::new("Bystander", p0);
    object.power = Some(3);
    let object_id = world.add_object(object);
    let target = entity(object_id);

    let mut manager = Manager::new();
    let timestamp = Timestamp::next();
    let empty_selection = Selection::new(|_ctx| Vec::new(), Predicate::atomic("nothing", |_ctx, _e| true));
    let component = EffectComponent::new(
        Sublayer::L7c,
        Rc::new(empty_selection),
        crate::delta::power_toughness_boost(10, 10),
        0,
        timestamp,
        target,
    );
    let effect = Effect::new(timestamp, move |expired| vec![Rc::new(component.with_expired(expired))]);
    manager.register_effect(effect);

    manager.snapshot(&mut world);

    assert_eq!(manager.query_attribute(&world, target, Attribute::Power), Value::Int(3));
}

#[test]
fn keyword_grant_blocked_by_prohibition_is_dropped() {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let mut object = BaseObject::new("Warded Creature", p0);
    object.banned_keywords = IndexSet::from(["flying".to_string()]);
    let object_id = world.add_object(object);
    let target = entity(object_id);

    let mut manager = Manager::new();
    let timestamp = Timestamp::next();
    let component = EffectComponent::new(
        Sublayer::L6,
        Rc::new(Selection::single(target)),
        vec![grant_keyword_ability("flying", AbilityOrigin::Granted)],
        0,
        timestamp,
        target,
    );
    let effect = Effect::new(timestamp, move |expired| vec![Rc::new(component.with_expired(expired))]);
    manager.register_effect(effect);

    manager.snapshot(&mut world);

    let abilities = manager.query_attribute(&world, target, Attribute::Abilities);
    assert_eq!(abilities, Value::Abilities(Vec::new()));
}

#[test]
fn marker_add_is_dropped_when_object_cannot_have_markers() {
    let p0 = Player::new(0);
    let mut object = BaseObject::new("Marker-proof", p0.id);
    object.can_have_markers = false;

    let manager = Manager::new();
    manager.add_marker(&mut object, MarkerType::PlusOnePlusOne, 3);

    assert_eq!(object.markers.count_of(MarkerType::PlusOnePlusOne), 0);
}

#[test]
fn marker_add_is_dropped_when_type_is_prohibited() {
    let p0 = Player::new(0);
    let mut object = BaseObject::new("Counter-proof", p0.id);
    object.prohibited_marker_types = IndexSet::from(["+1/+1"]);

    let manager = Manager::new();
    manager.add_marker(&mut object, MarkerType::PlusOnePlusOne, 3);

    assert_eq!(object.markers.count_of(MarkerType::PlusOnePlusOne), 0);
}
