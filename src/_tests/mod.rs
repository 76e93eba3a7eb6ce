//! Scenario and property tests for the solver, one file per fixture in
//! the teacher's `_tests/<card_name>.rs` style.


mod master_of_etherium;
mod humility_opalescence;
mod clone_copy;
mod until_end_of_turn;
mod boundaries;
mod invariants;
