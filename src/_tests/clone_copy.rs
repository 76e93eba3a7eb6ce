//! `spec.md` §8 scenario 5: a Clone entering as a copy of Alpha Myr.
//!
//! Copiable values are frozen at the 1b/2 boundary of *each* pass
//! (`spec.md` §4.8 step 5) from the overlay-queried state as of that
//! pass. A copy component itself lives in sublayer 1a and reads the
//! source's `copiable_values` as already frozen — which, on the very
//! first snapshot a copy is ever part of, is still the source's empty
//! initial value. The first `snapshot()` call is what performs that
//! freeze for the source; only the second call sees it, which is why
//! this test runs the solver twice, matching the round-trip/idempotence
//! properties in `spec.md` §8 (the copy is a fixed point, not a
//! same-pass fact).

use std::rc::Rc;

use crate::{
    _tests::support::{artifact_creature, entity},
    component::copy::copy_effect_component,
    config::COPIABLE_ATTRIBUTES,
    effect::Effect,
    ids::Timestamp,
    manager::Manager,
    object::Player,
    selection::Selection,
    world::World,
};

#[test]
fn clone_copies_alpha_myrs_copiable_values_once_settled() {
    let mut world = World::new();
    let p0 = world.add_player(Player::new(0));
    let alpha_myr_id = world.add_object(artifact_creature("Alpha Myr", 2, 1, p0));
    let clone_id = world.add_object(crate::object::BaseObject::new("Clone", p0));
    world.object_mut(clone_id).copy_source_object = Some(alpha_myr_id);

    let alpha_myr = entity(alpha_myr_id);
    let clone = entity(clone_id);

    let mut manager = Manager::new();
    let timestamp = Timestamp::next();
    let copy_component =
        copy_effect_component(Rc::new(Selection::single(clone)), 0, timestamp, clone, Vec::new());
    let effect = Effect::new(timestamp, move |expired| vec![Rc::new(copy_component.with_expired(expired))]);
    manager.register_effect(effect);

    manager.snapshot(&mut world);
    manager.snapshot(&mut world);

    for &attr in COPIABLE_ATTRIBUTES {
        assert_eq!(
            world.object(clone_id).copiable_values.get(&attr),
            world.object(alpha_myr_id).copiable_values.get(&attr),
            "attribute {attr:?} did not copy"
        );
    }
    assert_eq!(
        manager.query_attribute(&world, clone, crate::value::Attribute::Power),
        manager.query_attribute(&world, alpha_myr, crate::value::Attribute::Power)
    );
}
