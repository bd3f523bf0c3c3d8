//! Monsters, including the player and the members of group monsters.

use delver_foundation::text::{Names, pluralize};
use delver_foundation::{ActorId, ArtifactId, MemberKey, MonsterId, RoomId, Style};
use serde::{Deserialize, Serialize};

use crate::DataBag;
use crate::artifact::WeaponType;

/// How a monster is disposed toward the player before meeting them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Friendliness {
    /// Always a friend.
    Friend,
    /// Always neutral.
    #[default]
    Neutral,
    /// Always hostile.
    Hostile,
    /// Decided by a roll against `friend_odds` when first met.
    Random,
}

/// How a monster currently feels about the player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    /// Not yet met.
    #[default]
    Unknown,
    /// Fights on the player's side and follows them.
    Friend,
    /// Stays out of fights.
    Neutral,
    /// Attacks the player and their friends.
    Hostile,
}

/// Alive or dead.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Still breathing.
    #[default]
    Alive,
    /// No longer breathing.
    Dead,
}

/// Combat disposition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum CombatCode {
    /// Attacks with a plain "attacks" verb (code 1).
    Special,
    /// Fights with whatever it has (code 0).
    #[default]
    Normal,
    /// Uses a weapon if one is available, otherwise natural weapons (code -1).
    WeaponIfAvailable,
    /// Never fights (code -2).
    NeverFight,
}

impl TryFrom<i8> for CombatCode {
    type Error = String;

    fn try_from(code: i8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Special),
            0 => Ok(Self::Normal),
            -1 => Ok(Self::WeaponIfAvailable),
            -2 => Ok(Self::NeverFight),
            other => Err(format!("unknown combat code {other}")),
        }
    }
}

impl From<CombatCode> for i8 {
    fn from(code: CombatCode) -> Self {
        match code {
            CombatCode::Special => 1,
            CombatCode::Normal => 0,
            CombatCode::WeaponIfAvailable => -1,
            CombatCode::NeverFight => -2,
        }
    }
}

/// What a monster fights with.
///
/// Stored as the classic weapon id: null, 0 for natural weapons, a positive
/// artifact id, -1 to grab any weapon, or -(id + 1) to grab a specific one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i32>", into = "Option<i32>")]
pub enum Armament {
    /// No weapon and not fighting with claws either.
    #[default]
    Unarmed,
    /// Claws, teeth, fists.
    Natural,
    /// A weapon artifact the monster is holding ready.
    Wields(ArtifactId),
    /// Will pick up the first weapon it sees.
    SeeksAny,
    /// Will pick up this particular weapon when it sees it.
    Seeks(ArtifactId),
}

impl Armament {
    /// The ready weapon artifact, if any.
    #[must_use]
    pub const fn weapon(self) -> Option<ArtifactId> {
        match self {
            Self::Wields(id) => Some(id),
            _ => None,
        }
    }

    /// True for claws and teeth or for no weapon at all.
    #[must_use]
    pub const fn is_natural_or_none(self) -> bool {
        !matches!(self, Self::Wields(_))
    }
}

impl From<Option<i32>> for Armament {
    fn from(raw: Option<i32>) -> Self {
        match raw {
            None => Self::Unarmed,
            Some(0) => Self::Natural,
            Some(-1) => Self::SeeksAny,
            Some(id) if id > 0 => Self::Wields(ArtifactId::new(id.unsigned_abs())),
            Some(id) => Self::Seeks(ArtifactId::new(id.unsigned_abs() - 1)),
        }
    }
}

impl From<Armament> for Option<i32> {
    fn from(armament: Armament) -> Self {
        let raw = |id: ArtifactId| i32::try_from(id.get()).unwrap_or(i32::MAX);
        match armament {
            Armament::Unarmed => None,
            Armament::Natural => Some(0),
            Armament::SeeksAny => Some(-1),
            Armament::Wields(id) => Some(raw(id)),
            Armament::Seeks(id) => Some(-raw(id) - 1),
        }
    }
}

/// The four spells of the classic system.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spell {
    /// Unpredictable; adventures decide what it does.
    Power,
    /// Closes wounds.
    Heal,
    /// Magic missile that ignores armor.
    Blast,
    /// Doubles agility for a while.
    Speed,
}

impl Spell {
    /// All spells.
    pub const ALL: [Self; 4] = [Self::Power, Self::Heal, Self::Blast, Self::Speed];

    /// Lowercase spell name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Heal => "heal",
            Self::Blast => "blast",
            Self::Speed => "speed",
        }
    }
}

/// Per-weapon-type proficiency percentages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponAbilities {
    /// Axe proficiency.
    #[serde(default)]
    pub axe: i32,
    /// Bow proficiency.
    #[serde(default)]
    pub bow: i32,
    /// Club proficiency.
    #[serde(default)]
    pub club: i32,
    /// Spear proficiency.
    #[serde(default)]
    pub spear: i32,
    /// Sword proficiency.
    #[serde(default)]
    pub sword: i32,
}

impl WeaponAbilities {
    /// Proficiency with the given weapon type.
    #[must_use]
    pub const fn get(&self, kind: WeaponType) -> i32 {
        match kind {
            WeaponType::Axe => self.axe,
            WeaponType::Bow => self.bow,
            WeaponType::Club => self.club,
            WeaponType::Spear => self.spear,
            WeaponType::Sword => self.sword,
        }
    }

    /// Mutable proficiency with the given weapon type.
    pub fn get_mut(&mut self, kind: WeaponType) -> &mut i32 {
        match kind {
            WeaponType::Axe => &mut self.axe,
            WeaponType::Bow => &mut self.bow,
            WeaponType::Club => &mut self.club,
            WeaponType::Spear => &mut self.spear,
            WeaponType::Sword => &mut self.sword,
        }
    }
}

/// One number per spell.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpellBook {
    /// Power.
    #[serde(default)]
    pub power: i32,
    /// Heal.
    #[serde(default)]
    pub heal: i32,
    /// Blast.
    #[serde(default)]
    pub blast: i32,
    /// Speed.
    #[serde(default)]
    pub speed: i32,
}

impl SpellBook {
    /// Value for the given spell.
    #[must_use]
    pub const fn get(&self, spell: Spell) -> i32 {
        match spell {
            Spell::Power => self.power,
            Spell::Heal => self.heal,
            Spell::Blast => self.blast,
            Spell::Speed => self.speed,
        }
    }

    /// Mutable value for the given spell.
    pub fn get_mut(&mut self, spell: Spell) -> &mut i32 {
        match spell {
            Spell::Power => &mut self.power,
            Spell::Heal => &mut self.heal,
            Spell::Blast => &mut self.blast,
            Spell::Speed => &mut self.speed,
        }
    }
}

/// Attributes only the player has.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerProfile {
    /// Weapon proficiencies.
    #[serde(default)]
    pub weapon_abilities: WeaponAbilities,

    /// Current spell abilities; casting halves them.
    #[serde(default)]
    pub spell_abilities: SpellBook,

    /// Spell abilities at full strength.
    #[serde(default)]
    pub spell_abilities_original: SpellBook,

    /// Turns left on timed spells.
    #[serde(default)]
    pub spell_counters: SpellBook,
}

const fn default_charisma() -> i32 {
    10
}

const fn default_friend_odds() -> i32 {
    50
}

const fn default_courage() -> i32 {
    100
}

const fn default_true() -> bool {
    true
}

const fn default_weapon_dice() -> i32 {
    1
}

const fn default_weapon_sides() -> i32 {
    4
}

const fn default_attack_odds() -> i32 {
    50
}

const fn default_spell_frequency() -> i32 {
    33
}

const fn default_count() -> u16 {
    1
}

const fn default_multiplier() -> i32 {
    1
}

/// A monster, the player, or one member of a group monster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Monster {
    /// Unique id. Group members share their parent's id.
    pub id: MonsterId,

    /// Set on group members only.
    #[serde(default)]
    pub member: Option<MemberKey>,

    /// Name used in narration and matching.
    pub name: String,

    /// Article shown before the name.
    #[serde(default)]
    pub article: Option<String>,

    /// Full description, shown when first seen.
    #[serde(default)]
    pub description: String,

    /// Alternate names.
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Plural used for groups; derived from the name when absent.
    #[serde(default)]
    pub name_plural: Option<String>,

    /// Current room, or none when removed from play.
    #[serde(default, rename = "room_id")]
    pub room: Option<RoomId>,

    /// Container the monster hides in until it is opened.
    #[serde(default, rename = "container_id")]
    pub container: Option<ArtifactId>,

    /// Hit points.
    pub hardiness: i32,

    /// Dodging and to-hit.
    pub agility: i32,

    /// Affects how strangers react.
    #[serde(default = "default_charisma")]
    pub charisma: i32,

    /// Disposition before meeting the player.
    #[serde(default)]
    pub friendliness: Friendliness,

    /// Chance of being friendly when friendliness is random.
    #[serde(default = "default_friend_odds")]
    pub friend_odds: i32,

    /// Combat disposition.
    #[serde(default)]
    pub combat_code: CombatCode,

    /// Custom attack verbs replacing the weapon-type verbs.
    #[serde(default)]
    pub combat_verbs: Vec<String>,

    /// Seven custom health messages, healthiest first.
    #[serde(default)]
    pub health_messages: Vec<String>,

    /// Percent chance of standing and fighting.
    #[serde(default = "default_courage")]
    pub courage: i32,

    /// Follows the player out of the room when fleeing.
    #[serde(default = "default_true")]
    pub pursues: bool,

    /// Gold carried.
    #[serde(default)]
    pub gold: i32,

    /// Weapon state.
    #[serde(default, rename = "weapon_id")]
    pub armament: Armament,

    /// Natural weapon dice.
    #[serde(default = "default_weapon_dice")]
    pub weapon_dice: i32,

    /// Natural weapon sides.
    #[serde(default = "default_weapon_sides")]
    pub weapon_sides: i32,

    /// Base to-hit percentage.
    #[serde(default = "default_attack_odds")]
    pub attack_odds: i32,

    /// Subtracted from attackers' to-hit.
    #[serde(default)]
    pub defense_bonus: i32,

    /// Damage absorbed per blow.
    #[serde(default)]
    pub armor_class: i32,

    /// Offsets the to-hit penalty of worn armor.
    #[serde(default)]
    pub armor_expertise: i32,

    /// Spells an NPC can cast.
    #[serde(default)]
    pub spells: Vec<Spell>,

    /// Spell casts left for an NPC.
    #[serde(default)]
    pub spell_points: i32,

    /// Percent chance per turn that an NPC casts instead of fighting.
    #[serde(default = "default_spell_frequency")]
    pub spell_frequency: i32,

    /// Group size; above one the monster is unpacked into members.
    #[serde(default = "default_count")]
    pub count: u16,

    /// Corpse placed when this monster dies.
    #[serde(default)]
    pub dead_body_id: Option<ArtifactId>,

    /// Current attitude toward the player.
    #[serde(default)]
    pub reaction: Reaction,

    /// Alive or dead.
    #[serde(default)]
    pub status: Status,

    /// Damage taken.
    #[serde(default)]
    pub damage: i32,

    /// Agility multiplier from the speed spell.
    #[serde(default = "default_multiplier")]
    pub speed_multiplier: i32,

    /// The full description has been shown.
    #[serde(default)]
    pub seen: bool,

    /// Present only on the player.
    #[serde(default)]
    pub player: Option<PlayerProfile>,

    /// Adventure-specific values.
    #[serde(default)]
    pub data: DataBag,
}

impl Monster {
    /// Creates a neutral monster armed with natural weapons.
    #[must_use]
    pub fn new(id: MonsterId, name: impl Into<String>, hardiness: i32, agility: i32) -> Self {
        Self {
            id,
            member: None,
            name: name.into(),
            article: None,
            description: String::new(),
            aliases: Vec::new(),
            name_plural: None,
            room: None,
            container: None,
            hardiness,
            agility,
            charisma: default_charisma(),
            friendliness: Friendliness::Neutral,
            friend_odds: default_friend_odds(),
            combat_code: CombatCode::Normal,
            combat_verbs: Vec::new(),
            health_messages: Vec::new(),
            courage: default_courage(),
            pursues: true,
            gold: 0,
            armament: Armament::Natural,
            weapon_dice: default_weapon_dice(),
            weapon_sides: default_weapon_sides(),
            attack_odds: default_attack_odds(),
            defense_bonus: 0,
            armor_class: 0,
            armor_expertise: 0,
            spells: Vec::new(),
            spell_points: 0,
            spell_frequency: default_spell_frequency(),
            count: 1,
            dead_body_id: None,
            reaction: Reaction::Unknown,
            status: Status::Alive,
            damage: 0,
            speed_multiplier: 1,
            seen: false,
            player: None,
            data: DataBag::new(),
        }
    }

    /// Places the monster in a room.
    #[must_use]
    pub fn in_room(mut self, room: RoomId) -> Self {
        self.room = Some(room);
        self
    }

    /// This monster's actor address.
    #[must_use]
    pub fn actor_id(&self) -> ActorId {
        self.member.map_or(ActorId::Monster(self.id), ActorId::Member)
    }

    /// True for the player.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        self.id.is_player() && self.member.is_none()
    }

    /// True for group members.
    #[must_use]
    pub const fn is_member(&self) -> bool {
        self.member.is_some()
    }

    /// True for the parent record of a group.
    #[must_use]
    pub const fn is_group(&self) -> bool {
        self.member.is_none() && self.count > 1
    }

    /// Still breathing.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.status == Status::Alive
    }

    /// Alive and somewhere in the world.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_alive() && self.room.is_some()
    }

    /// Plural name for groups.
    #[must_use]
    pub fn plural_name(&self) -> String {
        self.name_plural
            .clone()
            .unwrap_or_else(|| pluralize(&self.name))
    }

    /// Names used for matching player input.
    #[must_use]
    pub fn names(&self) -> Names<'_> {
        Names {
            name: &self.name,
            article: self.article.as_deref(),
            plural: self.name_plural.as_deref(),
            aliases: &self.aliases,
        }
    }

    /// Case-insensitive match against the name, plural and aliases.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.names().matches(query)
    }

    /// Heaviest load this monster can carry.
    #[must_use]
    pub const fn max_weight(&self) -> i32 {
        self.hardiness * 10
    }

    /// Remaining health as a fraction of hardiness.
    #[must_use]
    pub fn health_fraction(&self) -> f64 {
        if self.hardiness <= 0 {
            return 0.0;
        }
        f64::from(self.hardiness - self.damage) / f64::from(self.hardiness)
    }

    /// Health description and the style to show it in.
    #[must_use]
    pub fn health_message(&self) -> (String, Style) {
        let fraction = self.health_fraction();
        let (index, style) = if fraction > 0.99 {
            (0, Style::Normal)
        } else if fraction > 0.8 {
            (1, Style::Normal)
        } else if fraction > 0.6 {
            (2, Style::Normal)
        } else if fraction > 0.4 {
            (3, Style::Normal)
        } else if fraction > 0.2 {
            (4, Style::Warning)
        } else if fraction > 0.0 {
            (5, Style::Warning)
        } else {
            (6, Style::Danger)
        };
        if self.health_messages.len() == 7 {
            return (self.health_messages[index].clone(), style);
        }
        let text = [
            "is in perfect health.",
            "is in good shape.",
            "is hurting.",
            "is in pain.",
            "is badly injured.",
            "is at death's door!",
            "is dead!",
        ][index];
        (format!("{} {text}", self.name), style)
    }

    /// Attitude that friendliness implies, without rolling.
    #[must_use]
    pub const fn fixed_reaction(&self) -> Option<Reaction> {
        match self.friendliness {
            Friendliness::Friend => Some(Reaction::Friend),
            Friendliness::Neutral => Some(Reaction::Neutral),
            Friendliness::Hostile => Some(Reaction::Hostile),
            Friendliness::Random => None,
        }
    }
}
