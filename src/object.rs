//! Base objects and players: the mutable population the solver derives
//! apparent state for (`spec.md` §3).

use indexmap::{IndexMap, IndexSet};
use strum::EnumIter;

use crate::{
    abilities::Ability,
    ids::{EntityId, ObjectId, PlayerId, StableId, Timestamp, TransientId},
    markers::MarkerSet,
    value::{Attribute, Value},
    zones::Zone,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ObjectType {
    Token,
    Spell,
    Ability,
    Permanent,
    Card,
}

/// Unifies objects and players as valid targets for markers and overlay
/// writes (`spec.md` §3 supplement, `SPEC_FULL.md` §3). Most solver code
/// only needs `entity_id`; the marker-guard accessors exist so
/// `add_marker`/`remove_marker_by_type` (`spec.md` §6) can be written
/// once against either kind of target.
pub trait Modifiable {
    fn entity_id(&self) -> EntityId;
    fn can_have_markers(&self) -> bool;
    fn prohibited_marker_types(&self) -> &IndexSet<&'static str>;
    fn markers(&mut self) -> &mut MarkerSet;
}

#[derive(Debug, Clone)]
pub struct BaseObject {
    pub id: ObjectId,
    pub stable_id: StableId,
    pub transient_id: TransientId,
    pub timestamp: Timestamp,
    pub object_types: IndexSet<ObjectType>,
    pub zone: Zone,

    pub name: String,
    pub cost: String,
    pub card_types: IndexSet<String>,
    pub subtypes: IndexSet<String>,
    pub supertypes: IndexSet<String>,
    pub colors: IndexSet<String>,
    pub abilities: Vec<Ability>,
    pub power: Option<i64>,
    pub toughness: Option<i64>,
    pub loyalty: Option<i64>,
    pub controller: Option<PlayerId>,

    pub markers: MarkerSet,
    pub can_have_markers: bool,
    pub prohibited_marker_types: IndexSet<&'static str>,

    /// Keyword-ability classes actively prohibited on this object.
    /// Prohibitions always win over a later grant (`spec.md` §8).
    pub banned_keywords: IndexSet<String>,

    /// The source object this object is copying, if any (`spec.md`
    /// §4.4): copy-effect components read the source's `copiable_values`
    /// rather than its apparent state.
    pub copy_source_object: Option<ObjectId>,

    /// Frozen at the 1b/2 sublayer boundary (`spec.md` §4.8 step 5).
    pub copiable_values: IndexMap<Attribute, Value>,
}

impl BaseObject {
    pub fn new(name: impl Into<String>, controller: PlayerId) -> Self {
        Self {
            id: ObjectId::new(),
            stable_id: StableId::new(),
            transient_id: TransientId::reissue(),
            timestamp: Timestamp::next(),
            object_types: IndexSet::from([ObjectType::Permanent, ObjectType::Card]),
            zone: Zone::Library,
            name: name.into(),
            cost: String::new(),
            card_types: IndexSet::new(),
            subtypes: IndexSet::new(),
            supertypes: IndexSet::new(),
            colors: IndexSet::new(),
            abilities: Vec::new(),
            power: None,
            toughness: None,
            loyalty: None,
            controller: Some(controller),
            markers: MarkerSet::default(),
            can_have_markers: true,
            prohibited_marker_types: IndexSet::new(),
            banned_keywords: IndexSet::new(),
            copy_source_object: None,
            copiable_values: IndexMap::new(),
        }
    }

    /// Reissue the transient id on a zone change, so identity predicates
    /// authored against the old instance stop matching (`spec.md` §3).
    pub fn move_to(&mut self, zone: Zone) {
        self.zone = zone;
        self.transient_id = TransientId::reissue();
    }
}

impl Modifiable for BaseObject {
    fn entity_id(&self) -> EntityId {
        EntityId::Object(self.id)
    }

    fn can_have_markers(&self) -> bool {
        self.can_have_markers
    }

    fn prohibited_marker_types(&self) -> &IndexSet<&'static str> {
        &self.prohibited_marker_types
    }

    fn markers(&mut self) -> &mut MarkerSet {
        &mut self.markers
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub index: usize,
    pub lifetotal: i64,
    pub abilities: Vec<Ability>,
    pub markers: MarkerSet,
    pub can_have_markers: bool,
    pub prohibited_marker_types: IndexSet<&'static str>,
}

impl Player {
    pub fn new(index: usize) -> Self {
        Self {
            id: PlayerId::new(),
            index,
            lifetotal: 20,
            abilities: Vec::new(),
            markers: MarkerSet::default(),
            can_have_markers: true,
            prohibited_marker_types: IndexSet::new(),
        }
    }
}

impl Modifiable for Player {
    fn entity_id(&self) -> EntityId {
        EntityId::Player(self.id)
    }

    fn can_have_markers(&self) -> bool {
        self.can_have_markers
    }

    fn prohibited_marker_types(&self) -> &IndexSet<&'static str> {
        &self.prohibited_marker_types
    }

    fn markers(&mut self) -> &mut MarkerSet {
        &mut self.markers
    }
}
