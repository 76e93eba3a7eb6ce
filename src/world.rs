//! The game-object inventory collaborator (`spec.md` §6), made concrete.
//! Mirrors the teacher's `Database`: one struct owning `IndexMap`s of
//! everything mutable, indexed by stable id, iterated in insertion
//! order so presort ties break the same way every run.

use indexmap::IndexMap;

use crate::{
    ids::{EntityId, ObjectId, PlayerId},
    object::{BaseObject, Player},
    value::{Attribute, Value},
    zones::Zone,
};

#[derive(Debug, Default)]
pub struct World {
    pub objects: IndexMap<ObjectId, BaseObject>,
    pub players: IndexMap<PlayerId, Player>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: BaseObject) -> ObjectId {
        let id = object.id;
        self.objects.insert(id, object);
        id
    }

    pub fn add_player(&mut self, player: Player) -> PlayerId {
        let id = player.id;
        self.players.insert(id, player);
        id
    }

    pub fn object(&self, id: ObjectId) -> &BaseObject {
        self.objects.get(&id).expect("object id not found")
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut BaseObject {
        self.objects.get_mut(&id).expect("object id not found")
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        self.players.get(&id).expect("player id not found")
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        self.players.get_mut(&id).expect("player id not found")
    }

    pub fn zone_of(&self, entity: EntityId) -> Option<Zone> {
        match entity {
            EntityId::Object(id) => Some(self.object(id).zone),
            EntityId::Player(_) => None,
        }
    }

    pub fn is_in_one_of(&self, entity: EntityId, zones: &[Zone]) -> bool {
        match self.zone_of(entity) {
            Some(zone) => zones.is_empty() || zones.contains(&zone),
            None => zones.is_empty(),
        }
    }

    /// All objects and players the solver can target, in a stable,
    /// insertion-ordered sequence.
    pub fn all_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.objects
            .keys()
            .map(|id| EntityId::Object(*id))
            .chain(self.players.keys().map(|id| EntityId::Player(*id)))
    }

    /// The base (pre-overlay) value of an attribute, per `spec.md` §4.6
    /// `query`'s fallback and the overlay's `reference` pre-modification
    /// capture.
    pub fn base_attr(&self, entity: EntityId, attr: Attribute) -> Value {
        match entity {
            EntityId::Object(id) => {
                let o = self.object(id);
                match attr {
                    Attribute::Name => Value::Str(o.name.clone()),
                    Attribute::Cost => Value::Str(o.cost.clone()),
                    Attribute::CardTypes => Value::StrSet(o.card_types.clone()),
                    Attribute::Subtypes => Value::StrSet(o.subtypes.clone()),
                    Attribute::Supertypes => Value::StrSet(o.supertypes.clone()),
                    Attribute::Colors => Value::StrSet(o.colors.clone()),
                    Attribute::Abilities => Value::Abilities(o.abilities.clone()),
                    Attribute::Power => Value::Int(o.power.unwrap_or_default()),
                    Attribute::Toughness => Value::Int(o.toughness.unwrap_or_default()),
                    Attribute::Loyalty => Value::Int(o.loyalty.unwrap_or_default()),
                    Attribute::Controller => Value::PlayerRef(o.controller),
                    Attribute::PlayerAbilities => Value::None,
                    Attribute::Lifetotal => Value::None,
                }
            }
            EntityId::Player(id) => {
                let p = self.player(id);
                match attr {
                    Attribute::PlayerAbilities => Value::Abilities(p.abilities.clone()),
                    Attribute::Lifetotal => Value::Int(p.lifetotal),
                    _ => Value::None,
                }
            }
        }
    }

    /// Write an attribute directly to base state. Used only by external
    /// collaborators (casting, choices, zone moves) per `spec.md` §3
    /// lifecycle — never by the solver itself, which writes to the
    /// overlay.
    pub fn set_base_attr(&mut self, entity: EntityId, attr: Attribute, value: Value) {
        match entity {
            EntityId::Object(id) => {
                let o = self.object_mut(id);
                match (attr, value) {
                    (Attribute::Name, Value::Str(v)) => o.name = v,
                    (Attribute::Cost, Value::Str(v)) => o.cost = v,
                    (Attribute::CardTypes, Value::StrSet(v)) => o.card_types = v,
                    (Attribute::Subtypes, Value::StrSet(v)) => o.subtypes = v,
                    (Attribute::Supertypes, Value::StrSet(v)) => o.supertypes = v,
                    (Attribute::Colors, Value::StrSet(v)) => o.colors = v,
                    (Attribute::Abilities, Value::Abilities(v)) => o.abilities = v,
                    (Attribute::Power, Value::Int(v)) => o.power = Some(v),
                    (Attribute::Toughness, Value::Int(v)) => o.toughness = Some(v),
                    (Attribute::Loyalty, Value::Int(v)) => o.loyalty = Some(v),
                    (Attribute::Controller, Value::PlayerRef(v)) => o.controller = v,
                    _ => {}
                }
            }
            EntityId::Player(id) => {
                let p = self.player_mut(id);
                match (attr, value) {
                    (Attribute::PlayerAbilities, Value::Abilities(v)) => p.abilities = v,
                    (Attribute::Lifetotal, Value::Int(v)) => p.lifetotal = v,
                    _ => {}
                }
            }
        }
    }
}
