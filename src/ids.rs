//! Stable identities. Newtypes over `usize`/monotonic counters, in the
//! style of the teacher's `ModifierId`/`CardId` — cheap to copy, opaque
//! to the outside, ordered only where the solver needs presort.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use derive_more::{From, Into};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct ObjectId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct PlayerId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct EffectId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct ComponentId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct AbilityId(pub(crate) usize);

/// The object's "stable identity" per `spec.md` §3 — distinct from
/// [`TransientId`], which is reissued on zone change so that identity
/// predicates authored before a move stop matching afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct StableId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, From, Into)]
pub struct TransientId(pub(crate) usize);

/// Monotonic, non-decreasing. Effects and components inherit the
/// timestamp of their generating ability; markers of one type share the
/// timestamp of the most recently added one (`spec.md` §3 invariant).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, From, Into)]
pub struct Timestamp(pub(crate) u64);

/// Either kind of mutable entity the solver can target: a game object
/// or a player. Markers, overlay writes, and selections all key on this
/// rather than on `ObjectId` alone, since player-level abilities and
/// lifetotal are legitimate delta targets too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityId {
    Object(ObjectId),
    Player(PlayerId),
}

impl From<ObjectId> for EntityId {
    fn from(id: ObjectId) -> Self {
        EntityId::Object(id)
    }
}

impl From<PlayerId> for EntityId {
    fn from(id: PlayerId) -> Self {
        EntityId::Player(id)
    }
}

static NEXT_OBJECT_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_PLAYER_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_EFFECT_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_COMPONENT_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_ABILITY_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_STABLE_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_TRANSIENT_ID: AtomicUsize = AtomicUsize::new(0);
static NEXT_TIMESTAMP: AtomicU64 = AtomicU64::new(0);

impl ObjectId {
    pub fn new() -> Self {
        Self(NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl PlayerId {
    pub fn new() -> Self {
        Self(NEXT_PLAYER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl EffectId {
    pub fn new() -> Self {
        Self(NEXT_EFFECT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl ComponentId {
    pub fn new() -> Self {
        Self(NEXT_COMPONENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl AbilityId {
    pub fn new() -> Self {
        Self(NEXT_ABILITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl StableId {
    pub fn new() -> Self {
        Self(NEXT_STABLE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl TransientId {
    /// Reissued whenever the host object changes zones.
    pub fn reissue() -> Self {
        Self(NEXT_TRANSIENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Timestamp {
    /// Source of the monotonic, non-decreasing timestamps used for
    /// presort (`spec.md` §4.7, §5).
    pub fn next() -> Self {
        Self(NEXT_TIMESTAMP.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::new()
    }
}
