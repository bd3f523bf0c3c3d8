//! Artifacts: every world object that is not a monster.

use delver_foundation::text::Names;
use delver_foundation::{ActorId, ArtifactId, EffectId, MonsterId, RoomId};
use serde::{Deserialize, Serialize};

use crate::DataBag;

/// What kind of object an artifact is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ArtifactKind {
    /// Coins; picking them up adds to the carrier's gold.
    Gold,
    /// Anything valuable.
    Treasure,
    /// An ordinary weapon.
    Weapon,
    /// A weapon with magical properties.
    MagicWeapon,
    /// Holds other artifacts.
    Container,
    /// Burns fuel to light dark rooms.
    LightSource,
    /// Can be drunk.
    Drinkable,
    /// Has markings to read.
    Readable,
    /// Guards an exit.
    Door,
    /// Can be eaten.
    Edible,
    /// A monster held captive until freed.
    BoundMonster,
    /// Armor and clothing.
    Wearable,
    /// A monster pretending to be an object.
    DisguisedMonster,
    /// What is left after a monster dies.
    DeadBody,
    /// Adventure-defined kind.
    User1,
    /// Adventure-defined kind.
    User2,
    /// Adventure-defined kind.
    User3,
}

impl ArtifactKind {
    const ORDER: [Self; 17] = [
        Self::Gold,
        Self::Treasure,
        Self::Weapon,
        Self::MagicWeapon,
        Self::Container,
        Self::LightSource,
        Self::Drinkable,
        Self::Readable,
        Self::Door,
        Self::Edible,
        Self::BoundMonster,
        Self::Wearable,
        Self::DisguisedMonster,
        Self::DeadBody,
        Self::User1,
        Self::User2,
        Self::User3,
    ];
}

impl TryFrom<u8> for ArtifactKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ORDER
            .get(usize::from(code))
            .copied()
            .ok_or_else(|| format!("unknown artifact type {code}"))
    }
}

impl From<ArtifactKind> for u8 {
    fn from(kind: ArtifactKind) -> Self {
        ArtifactKind::ORDER
            .iter()
            .position(|k| *k == kind)
            .and_then(|i| u8::try_from(i).ok())
            .unwrap_or(u8::MAX)
    }
}

/// The five weapon families. Natural weapons have no family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WeaponType {
    /// Axes.
    Axe,
    /// Bows and slings.
    Bow,
    /// Clubs, maces and hammers.
    Club,
    /// Spears and polearms.
    Spear,
    /// Swords and knives.
    Sword,
}

impl WeaponType {
    /// All weapon types in code order.
    pub const ALL: [Self; 5] = [Self::Axe, Self::Bow, Self::Club, Self::Spear, Self::Sword];

    /// Lowercase name used in narration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Axe => "axe",
            Self::Bow => "bow",
            Self::Club => "club",
            Self::Spear => "spear",
            Self::Sword => "sword",
        }
    }
}

impl TryFrom<u8> for WeaponType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1..=5 => Ok(Self::ALL[usize::from(code - 1)]),
            other => Err(format!("unknown weapon type {other}")),
        }
    }
}

impl From<WeaponType> for u8 {
    fn from(kind: WeaponType) -> Self {
        match kind {
            WeaponType::Axe => 1,
            WeaponType::Bow => 2,
            WeaponType::Club => 3,
            WeaponType::Spear => 4,
            WeaponType::Sword => 5,
        }
    }
}

/// Where a wearable goes on the body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ArmorType {
    /// Body armor.
    Armor,
    /// Shields need a free hand.
    Shield,
    /// Helmets.
    Helmet,
    /// Gloves.
    Gloves,
    /// Rings.
    Ring,
}

impl ArmorType {
    /// Lowercase name used in narration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Armor => "armor",
            Self::Shield => "shield",
            Self::Helmet => "helmet",
            Self::Gloves => "gloves",
            Self::Ring => "ring",
        }
    }
}

impl TryFrom<u8> for ArmorType {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Armor),
            1 => Ok(Self::Shield),
            2 => Ok(Self::Helmet),
            3 => Ok(Self::Gloves),
            4 => Ok(Self::Ring),
            other => Err(format!("unknown armor type {other}")),
        }
    }
}

impl From<ArmorType> for u8 {
    fn from(kind: ArmorType) -> Self {
        match kind {
            ArmorType::Armor => 0,
            ArmorType::Shield => 1,
            ArmorType::Helmet => 2,
            ArmorType::Gloves => 3,
            ArmorType::Ring => 4,
        }
    }
}

/// Where an artifact is. Exactly one place, or nowhere once destroyed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    /// Destroyed, or not yet placed.
    #[default]
    Nowhere,
    /// Lying in a room.
    Room(RoomId),
    /// Carried by a monster, the player, or a group member.
    Carried(ActorId),
    /// Inside a container artifact.
    Contained(ArtifactId),
}

impl Location {
    /// Room the artifact lies in, if any.
    #[must_use]
    pub const fn room(self) -> Option<RoomId> {
        match self {
            Self::Room(id) => Some(id),
            _ => None,
        }
    }

    /// Who carries the artifact, if anyone.
    #[must_use]
    pub const fn carrier(self) -> Option<ActorId> {
        match self {
            Self::Carried(actor) => Some(actor),
            _ => None,
        }
    }

    /// Container holding the artifact, if any.
    #[must_use]
    pub const fn container(self) -> Option<ArtifactId> {
        match self {
            Self::Contained(id) => Some(id),
            _ => None,
        }
    }
}

/// How a door or container is locked.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Lock {
    /// No key needed. With hardiness set it is stuck and must be forced.
    #[default]
    Unlocked,
    /// Never opens by normal means.
    Jammed,
    /// Opens with the given key.
    Key(ArtifactId),
}

impl TryFrom<i32> for Lock {
    type Error = String;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Unlocked),
            -1 => Ok(Self::Jammed),
            id if id > 0 => Ok(Self::Key(ArtifactId::new(id.unsigned_abs()))),
            other => Err(format!("invalid key id {other}")),
        }
    }
}

impl From<Lock> for i32 {
    fn from(lock: Lock) -> Self {
        match lock {
            Lock::Unlocked => 0,
            Lock::Jammed => -1,
            Lock::Key(id) => i32::try_from(id.get()).unwrap_or(i32::MAX),
        }
    }
}

const fn default_hands() -> u8 {
    1
}

const fn default_true() -> bool {
    true
}

/// A non-monster world object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Artifact {
    /// Unique id.
    pub id: ArtifactId,

    /// Name used in narration and matching.
    pub name: String,

    /// Article shown before the name ("a", "the", "some").
    #[serde(default)]
    pub article: Option<String>,

    /// Full description, shown when first seen.
    #[serde(default)]
    pub description: String,

    /// Alternate names.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// What kind of object this is.
    #[serde(rename = "type")]
    pub kind: ArtifactKind,

    /// Current location.
    #[serde(default)]
    pub location: Location,

    /// The captive for bound monsters, the impostor for disguised monsters.
    #[serde(default)]
    pub bound_monster: Option<MonsterId>,

    /// Lock on doors and containers.
    #[serde(default, rename = "key_id")]
    pub lock: Lock,

    /// The door on the other side of this door.
    #[serde(default)]
    pub linked_door_id: Option<ArtifactId>,

    /// Monster that prevents taking or freeing this artifact.
    #[serde(default)]
    pub guard_id: Option<MonsterId>,

    /// Weight in gronds. 999 and above cannot be carried; -999 is fixed in place.
    #[serde(default)]
    pub weight: i32,

    /// Value in gold pieces.
    #[serde(default)]
    pub value: i32,

    /// Doors and containers: currently open.
    #[serde(default)]
    pub is_open: bool,

    /// Doors and containers: damage needed to smash it.
    #[serde(default)]
    pub hardiness: Option<i32>,

    /// Weapons: hands needed to wield.
    #[serde(default = "default_hands")]
    pub hands: u8,

    /// Weapons: family, used for proficiency and attack verbs.
    #[serde(default)]
    pub weapon_type: Option<WeaponType>,

    /// Weapons: to-hit bonus.
    #[serde(default)]
    pub weapon_odds: i32,

    /// Weapons: damage dice. Consumables: healing (negative is poison).
    #[serde(default)]
    pub dice: i32,

    /// Weapons and consumables: sides per die.
    #[serde(default)]
    pub sides: i32,

    /// Wearables: body slot.
    #[serde(default)]
    pub armor_type: Option<ArmorType>,

    /// Wearables: protection.
    #[serde(default)]
    pub armor_class: i32,

    /// Wearables: to-hit penalty while worn.
    #[serde(default)]
    pub armor_penalty: i32,

    /// Included when the player types "get all".
    #[serde(default = "default_true")]
    pub get_all: bool,

    /// Part of the scenery until noticed.
    #[serde(default)]
    pub embedded: bool,

    /// Secret until revealed.
    #[serde(default)]
    pub hidden: bool,

    /// Fuel for lights, servings for consumables, capacity for containers.
    #[serde(default)]
    pub quantity: Option<i32>,

    /// First effect printed when read or opened.
    #[serde(default)]
    pub effect_id: Option<EffectId>,

    /// Number of consecutive effects printed from `effect_id`.
    #[serde(default)]
    pub num_effects: u32,

    /// Light sources: currently burning.
    #[serde(default)]
    pub is_lit: bool,

    /// Wearables: currently worn by the carrier.
    #[serde(default)]
    pub is_worn: bool,

    /// Doors and containers: smashed.
    #[serde(default)]
    pub is_broken: bool,

    /// Came with the player rather than from the adventure.
    #[serde(default)]
    pub player_brought: bool,

    /// Description contains markup.
    #[serde(default)]
    pub is_markdown: bool,

    /// Extra note shown in inventory listings.
    #[serde(default)]
    pub inventory_message: Option<String>,

    /// The full description has been shown.
    #[serde(default)]
    pub seen: bool,

    /// Adventure-specific values.
    #[serde(default)]
    pub data: DataBag,
}

impl Artifact {
    /// Creates an artifact with default attributes, placed nowhere.
    #[must_use]
    pub fn new(id: ArtifactId, name: impl Into<String>, kind: ArtifactKind) -> Self {
        Self {
            id,
            name: name.into(),
            article: None,
            description: String::new(),
            aliases: Vec::new(),
            kind,
            location: Location::Nowhere,
            bound_monster: None,
            lock: Lock::Unlocked,
            linked_door_id: None,
            guard_id: None,
            weight: 0,
            value: 0,
            is_open: false,
            hardiness: None,
            hands: 1,
            weapon_type: None,
            weapon_odds: 0,
            dice: 0,
            sides: 0,
            armor_type: None,
            armor_class: 0,
            armor_penalty: 0,
            get_all: true,
            embedded: false,
            hidden: false,
            quantity: None,
            effect_id: None,
            num_effects: 0,
            is_lit: false,
            is_worn: false,
            is_broken: false,
            player_brought: false,
            is_markdown: false,
            inventory_message: None,
            seen: false,
            data: DataBag::new(),
        }
    }

    /// Places the artifact.
    #[must_use]
    pub fn at(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Makes this a weapon with the given stats.
    #[must_use]
    pub fn with_weapon(mut self, weapon_type: WeaponType, odds: i32, dice: i32, sides: i32) -> Self {
        self.weapon_type = Some(weapon_type);
        self.weapon_odds = odds;
        self.dice = dice;
        self.sides = sides;
        self
    }

    /// Names used for matching player input.
    #[must_use]
    pub fn names(&self) -> Names<'_> {
        Names {
            name: &self.name,
            article: self.article.as_deref(),
            plural: None,
            aliases: &self.aliases,
        }
    }

    /// Case-insensitive match against the name, article form and aliases.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.names().matches(query)
    }

    /// Weapons and magic weapons.
    #[must_use]
    pub const fn is_weapon(&self) -> bool {
        matches!(self.kind, ArtifactKind::Weapon | ArtifactKind::MagicWeapon)
    }

    /// Consumables with a positive healing roll.
    #[must_use]
    pub const fn is_healing(&self) -> bool {
        matches!(self.kind, ArtifactKind::Drinkable | ArtifactKind::Edible)
            && self.dice > 0
            && self.sides > 0
    }

    /// Containers.
    #[must_use]
    pub const fn is_container(&self) -> bool {
        matches!(self.kind, ArtifactKind::Container)
    }

    /// Doors and gates.
    #[must_use]
    pub const fn is_door(&self) -> bool {
        matches!(self.kind, ArtifactKind::Door)
    }

    /// Edible or drinkable.
    #[must_use]
    pub const fn is_consumable(&self) -> bool {
        matches!(self.kind, ArtifactKind::Drinkable | ArtifactKind::Edible)
    }

    /// Body armor, shields, helmets and other wearables.
    #[must_use]
    pub const fn is_armor(&self) -> bool {
        matches!(self.kind, ArtifactKind::Wearable) && self.armor_type.is_some()
    }

    /// Highest damage one blow can do.
    #[must_use]
    pub const fn max_damage(&self) -> i32 {
        if self.is_weapon() {
            self.dice * self.sides
        } else {
            0
        }
    }

    /// Too heavy for anyone to carry.
    #[must_use]
    pub const fn is_immovable(&self) -> bool {
        self.weight >= 999 || self.weight == -999
    }

    /// Generic noun for the artifact's kind.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        if let (true, Some(weapon)) = (self.is_weapon(), self.weapon_type) {
            return weapon.name();
        }
        if let (ArtifactKind::Wearable, Some(armor)) = (self.kind, self.armor_type) {
            return armor.name();
        }
        "treasure"
    }

    /// Moves the artifact, clearing any state that only makes sense where it was.
    pub fn relocate(&mut self, location: Location) {
        if location.carrier() != self.location.carrier() {
            self.is_worn = false;
        }
        self.location = location;
    }
}
