//! Markers: counter-like decorations attached to an object. Each marker
//! type may synthesize zero or one effect component (`spec.md` §3) —
//! e.g. +1/+1 counters synthesize a power/toughness delta in sublayer
//! 7d. Markers of the same type share the timestamp of the most
//! recently added one.

use crate::ids::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerType {
    PlusOnePlusOne,
    MinusOneMinusOne,
    Loyalty,
    Custom(&'static str),
}

impl MarkerType {
    /// Class tag used against `prohibited_marker_types` (`spec.md` §8):
    /// a marker add is silently dropped when its tag is prohibited.
    pub fn tag(self) -> &'static str {
        match self {
            MarkerType::PlusOnePlusOne => "+1/+1",
            MarkerType::MinusOneMinusOne => "-1/-1",
            MarkerType::Loyalty => "loyalty",
            MarkerType::Custom(tag) => tag,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub marker_type: MarkerType,
    pub count: u32,
    pub timestamp: Timestamp,
}

/// An object's marker collection. `add`/`remove_by_type` honor
/// `can_have_markers`/`prohibited_marker_types` at the call site
/// (`spec.md` §6, §8) — this type itself is just storage.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet(Vec<Marker>);

impl MarkerSet {
    pub fn add(&mut self, marker_type: MarkerType, count: u32) {
        let timestamp = Timestamp::next();
        if let Some(existing) = self.0.iter_mut().find(|m| m.marker_type == marker_type) {
            existing.count += count;
            existing.timestamp = timestamp;
        } else {
            self.0.push(Marker {
                marker_type,
                count,
                timestamp,
            });
        }
    }

    pub fn remove_by_type(&mut self, marker_type: MarkerType) {
        self.0.retain(|m| m.marker_type != marker_type);
    }

    pub fn count_of(&self, marker_type: MarkerType) -> u32 {
        self.0
            .iter()
            .find(|m| m.marker_type == marker_type)
            .map(|m| m.count)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.0.iter()
    }
}
