//! Fixed constants of the solver contract: the sublayer order and the
//! copiable-attribute set. Named after the original `contfx_config.py`.

use strum::EnumIter;

/// The twelve ordered sublayer tags. Pass order is the declaration order
/// of this enum; `Sublayer::PASS_ORDER` is the authoritative sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Sublayer {
    L1a,
    L1b,
    L2,
    L3,
    L4,
    L5,
    L6,
    L7a,
    L7b,
    L7c,
    L7d,
    L8,
}

impl Sublayer {
    /// Application order for a single outer pass, per `spec.md` §4.8.
    pub const PASS_ORDER: [Sublayer; 12] = [
        Sublayer::L1a,
        Sublayer::L1b,
        Sublayer::L2,
        Sublayer::L3,
        Sublayer::L4,
        Sublayer::L5,
        Sublayer::L6,
        Sublayer::L7a,
        Sublayer::L7b,
        Sublayer::L7c,
        Sublayer::L7d,
        Sublayer::L8,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sublayer::L1a => "1a",
            Sublayer::L1b => "1b",
            Sublayer::L2 => "2",
            Sublayer::L3 => "3",
            Sublayer::L4 => "4",
            Sublayer::L5 => "5",
            Sublayer::L6 => "6",
            Sublayer::L7a => "7a",
            Sublayer::L7b => "7b",
            Sublayer::L7c => "7c",
            Sublayer::L7d => "7d",
            Sublayer::L8 => "8",
        }
    }
}

/// Attributes snapshotted into an object's `copiable_values` at the 1b/2
/// boundary. Fixed by the core contract (`spec.md` §3, §6).
pub const COPIABLE_ATTRIBUTES: &[crate::value::Attribute] = &[
    crate::value::Attribute::Name,
    crate::value::Attribute::Cost,
    crate::value::Attribute::CardTypes,
    crate::value::Attribute::Subtypes,
    crate::value::Attribute::Supertypes,
    crate::value::Attribute::Power,
    crate::value::Attribute::Toughness,
    crate::value::Attribute::Loyalty,
    crate::value::Attribute::Colors,
    crate::value::Attribute::Abilities,
];

/// Upper bound on simple cycles enumerated per sublayer before the solver
/// gives up and treats every edge among the probed components as
/// cyclic. Sublayers are small (single digits of components) in
/// practice; this exists so a pathological card interaction can't hang
/// a snapshot.
pub const MAX_ENUMERATED_CYCLES: usize = 4096;
