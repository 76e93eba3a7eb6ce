//! `contfx`: a continuous-effects layer solver in the style of Magic's
//! comprehensive rules §613. Given a bag of effect components and a
//! world of objects and players, a [`manager::Manager`] snapshot pass
//! gathers eligible components, partitions them into sublayers, and
//! resolves each sublayer's application order through a dependency
//! solver that probes pairwise (non-)commutativity and
//! existence-destruction before falling back to presort order.
//!
//! The solver is single-threaded and synchronous. There is no process
//! singleton: callers own a [`manager::Manager`] and a
//! [`world::World`] and thread both through explicitly, which is what
//! keeps a snapshot reentrant and replayable from a fresh overlay.

#[cfg(test)]
mod _tests;

pub mod abilities;
pub mod component;
pub mod config;
pub mod delta;
pub mod dependency;
pub mod duration;
pub mod effect;
pub mod error;
pub mod expression;
pub mod ids;
pub mod manager;
pub mod markers;
pub mod object;
pub mod overlay;
pub mod selection;
pub mod value;
pub mod world;
pub mod zones;
