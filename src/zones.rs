//! Thin zone collaborator. Full zone membership bookkeeping is an
//! external collaborator (`spec.md` §1); the solver only needs to know
//! an object's current zone, to gate effect-component validity and to
//! decide whether a static ability's `is_active` guard should fire.

use strum::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Zone {
    Battlefield,
    Stack,
    Graveyard,
    Hand,
    Exile,
    Library,
    Command,
}

/// The "active zones" gate an effect or static ability carries: the set
/// of zones in which it is eligible to apply at all.
#[derive(Debug, Clone)]
pub struct ZoneGate(Vec<Zone>);

impl ZoneGate {
    pub fn new(zones: impl IntoIterator<Item = Zone>) -> Self {
        Self(zones.into_iter().collect())
    }

    pub fn battlefield_only() -> Self {
        Self::new([Zone::Battlefield])
    }

    pub fn anywhere() -> Self {
        Self(Vec::new())
    }

    pub fn allows(&self, zone: Zone) -> bool {
        self.0.is_empty() || self.0.contains(&zone)
    }
}
