//! Event hooks: the seam where adventures override default rules.
//!
//! Each [`Event`] has a stable camelCase name. An adventure registers at most
//! one handler per name; the engine asks the handler at well-defined points
//! and honors its [`HookResult`].

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use delver_foundation::{ActorId, ArtifactId, MonsterId, RoomId};
use delver_storage::{RoomExit, Spell, WeaponType};
use tracing::{debug, warn};

use crate::game::Game;

/// A handler's answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookResult {
    /// Run the default behavior. Also the answer when no handler is registered.
    Continue,
    /// The handler took care of everything, messages included; skip the default.
    Veto,
    /// Use this number instead of the computed one.
    Replace(i32),
    /// Use this actor instead of the chosen one.
    Redirect(ActorId),
}

impl HookResult {
    /// Returns true unless the handler vetoed.
    #[must_use]
    pub const fn proceeds(self) -> bool {
        !matches!(self, Self::Veto)
    }

    /// The replacement number, if the handler gave one.
    #[must_use]
    pub const fn replacement(self) -> Option<i32> {
        match self {
            Self::Replace(n) => Some(n),
            _ => None,
        }
    }

    /// The redirected actor, if the handler gave one.
    #[must_use]
    pub const fn redirect(self) -> Option<ActorId> {
        match self {
            Self::Redirect(actor) => Some(actor),
            _ => None,
        }
    }
}

/// Something an adventure can react to.
///
/// `arg` fields carry the player's argument text for command events.
#[derive(Clone, Debug, PartialEq)]
#[allow(missing_docs)]
pub enum Event {
    // Lifecycle
    Start,
    Exit,
    Death { actor: ActorId, attacker: Option<ActorId> },
    AfterDeath { actor: ActorId },

    // Turn phases
    EndTurn,
    EndTurn1,
    EndTurn2,

    // First sightings
    SeeRoom { room: RoomId },
    SeeMonster { monster: MonsterId },
    SeeArtifact { artifact: ArtifactId },
    RevealArtifact { artifact: ArtifactId },

    // Movement
    SpecialMove { arg: String },
    BeforeMove { arg: String, room: RoomId, exit: RoomExit },
    AfterMove { arg: String, from: RoomId, to: RoomId },
    Flee { arg: String, exit: Option<RoomExit> },
    AfterFlee { arg: String, exit: RoomExit },

    // Looking and speech
    Look { arg: String },
    BeforeSay { arg: String },
    Say { arg: String },

    // Get, remove, put, drop
    SpecialGet { arg: String },
    BeforeGet { arg: String, artifact: ArtifactId },
    AfterGet { arg: String, artifact: ArtifactId },
    BeforeRemoveFromContainer { arg: String, artifact: ArtifactId, container: ArtifactId },
    AfterRemoveFromContainer { arg: String, artifact: ArtifactId, container: ArtifactId },
    BeforeRemoveWearable { arg: String, artifact: ArtifactId },
    AfterRemoveWearable { arg: String, artifact: ArtifactId },
    SpecialPut { arg: String, item: ArtifactId, container: ArtifactId },
    BeforePut { arg: String, item: ArtifactId, container: ArtifactId },
    AfterPut { arg: String, item: ArtifactId, container: ArtifactId },
    Drop { arg: String, artifact: ArtifactId },

    // Equipment
    Ready { arg: String, artifact: ArtifactId },
    Wear { arg: String, artifact: ArtifactId },

    // Consumables and objects
    Drink { arg: String, artifact: Option<ArtifactId> },
    Eat { arg: String, artifact: Option<ArtifactId> },
    BeforeUse { arg: String, artifact: Option<ArtifactId> },
    Use { arg: String, artifact: ArtifactId },
    Light { arg: String, artifact: ArtifactId },
    BeforeRead { arg: String, artifact: Option<ArtifactId> },
    AfterRead { arg: String, artifact: Option<ArtifactId> },
    BeforeOpen { arg: String, artifact: Option<ArtifactId> },
    AfterOpen { arg: String, artifact: ArtifactId },
    BeforeClose { arg: String, artifact: Option<ArtifactId> },
    AfterClose { arg: String, artifact: ArtifactId },

    // Trading
    GiveGold { arg: String, recipient: MonsterId, amount: i32 },
    Give { arg: String, artifact: ArtifactId, recipient: MonsterId },
    AfterGive { arg: String, artifact: ArtifactId, recipient: MonsterId },
    BeforeRequest { arg: String, artifact: ArtifactId, monster: MonsterId },
    AfterRequest { arg: String, artifact: ArtifactId, monster: MonsterId },
    BeforeFree { arg: String, artifact: Option<ArtifactId> },
    Free { arg: String, artifact: ArtifactId },
    AfterFree { arg: String, artifact: ArtifactId },
    BeforeBuy { arg: String, artifact: ArtifactId, seller: ActorId },
    AfterBuy { arg: String, artifact: ArtifactId, seller: ActorId },

    // Combat
    AttackMonster { arg: String, target: MonsterId },
    AttackArtifact { arg: String, artifact: ArtifactId },
    AttackOdds { attacker: ActorId, defender: ActorId, odds: i32 },
    AttackDamage { attacker: ActorId, defender: ActorId, damage: i32 },
    AttackDamageAfter { attacker: ActorId, defender: ActorId, damage: i32 },
    Miss { attacker: ActorId, defender: ActorId },
    Fumble { attacker: ActorId, defender: ActorId, roll: i32 },
    ChooseTarget { actor: ActorId, target: ActorId },
    MonsterAction { actor: ActorId },
    Blast { arg: String, target: MonsterId },
    BlastDamage { arg: String, target: MonsterId, damage: i32 },
    WeaponProficiency { weapon_type: WeaponType, roll: i32, odds: i32 },

    // Spells
    Power { roll: i32 },
    Heal { arg: String },
    Speed { arg: String },
    BeforeSpell { spell: Spell },
    SpellBacklash { spell: Spell },
    SpellExpires { spell: Spell },

    // Reactions and inventory
    MonsterSmile { monster: MonsterId },
    PickUpArtifact { actor: ActorId, artifact: ArtifactId },
    DropArtifact { actor: ActorId, artifact: ArtifactId },
    ArmorClass { actor: ActorId },
}

impl Event {
    /// Every event name, for validating registrations.
    pub const NAMES: [&'static str; 75] = [
        "start", "exit", "death", "afterDeath",
        "endTurn", "endTurn1", "endTurn2",
        "seeRoom", "seeMonster", "seeArtifact", "revealArtifact",
        "specialMove", "beforeMove", "afterMove", "flee", "afterFlee",
        "look", "beforeSay", "say",
        "specialGet", "beforeGet", "afterGet",
        "beforeRemoveFromContainer", "afterRemoveFromContainer",
        "beforeRemoveWearable", "afterRemoveWearable",
        "specialPut", "beforePut", "afterPut", "drop",
        "ready", "wear",
        "drink", "eat", "beforeUse", "use", "light", "beforeRead", "afterRead",
        "beforeOpen", "afterOpen", "beforeClose", "afterClose",
        "giveGold", "give", "afterGive", "beforeRequest", "afterRequest",
        "beforeFree", "free", "afterFree", "beforeBuy", "afterBuy",
        "attackMonster", "attackArtifact", "attackOdds", "attackDamage", "attackDamageAfter",
        "miss", "fumble", "chooseTarget", "monsterAction", "blast", "blastDamage",
        "weaponProficiency",
        "power", "heal", "speed", "beforeSpell", "spellBacklash", "spellExpires",
        "monsterSmile", "pickUpArtifact", "dropArtifact", "armorClass",
    ];

    /// The registry key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Exit => "exit",
            Self::Death { .. } => "death",
            Self::AfterDeath { .. } => "afterDeath",
            Self::EndTurn => "endTurn",
            Self::EndTurn1 => "endTurn1",
            Self::EndTurn2 => "endTurn2",
            Self::SeeRoom { .. } => "seeRoom",
            Self::SeeMonster { .. } => "seeMonster",
            Self::SeeArtifact { .. } => "seeArtifact",
            Self::RevealArtifact { .. } => "revealArtifact",
            Self::SpecialMove { .. } => "specialMove",
            Self::BeforeMove { .. } => "beforeMove",
            Self::AfterMove { .. } => "afterMove",
            Self::Flee { .. } => "flee",
            Self::AfterFlee { .. } => "afterFlee",
            Self::Look { .. } => "look",
            Self::BeforeSay { .. } => "beforeSay",
            Self::Say { .. } => "say",
            Self::SpecialGet { .. } => "specialGet",
            Self::BeforeGet { .. } => "beforeGet",
            Self::AfterGet { .. } => "afterGet",
            Self::BeforeRemoveFromContainer { .. } => "beforeRemoveFromContainer",
            Self::AfterRemoveFromContainer { .. } => "afterRemoveFromContainer",
            Self::BeforeRemoveWearable { .. } => "beforeRemoveWearable",
            Self::AfterRemoveWearable { .. } => "afterRemoveWearable",
            Self::SpecialPut { .. } => "specialPut",
            Self::BeforePut { .. } => "beforePut",
            Self::AfterPut { .. } => "afterPut",
            Self::Drop { .. } => "drop",
            Self::Ready { .. } => "ready",
            Self::Wear { .. } => "wear",
            Self::Drink { .. } => "drink",
            Self::Eat { .. } => "eat",
            Self::BeforeUse { .. } => "beforeUse",
            Self::Use { .. } => "use",
            Self::Light { .. } => "light",
            Self::BeforeRead { .. } => "beforeRead",
            Self::AfterRead { .. } => "afterRead",
            Self::BeforeOpen { .. } => "beforeOpen",
            Self::AfterOpen { .. } => "afterOpen",
            Self::BeforeClose { .. } => "beforeClose",
            Self::AfterClose { .. } => "afterClose",
            Self::GiveGold { .. } => "giveGold",
            Self::Give { .. } => "give",
            Self::AfterGive { .. } => "afterGive",
            Self::BeforeRequest { .. } => "beforeRequest",
            Self::AfterRequest { .. } => "afterRequest",
            Self::BeforeFree { .. } => "beforeFree",
            Self::Free { .. } => "free",
            Self::AfterFree { .. } => "afterFree",
            Self::BeforeBuy { .. } => "beforeBuy",
            Self::AfterBuy { .. } => "afterBuy",
            Self::AttackMonster { .. } => "attackMonster",
            Self::AttackArtifact { .. } => "attackArtifact",
            Self::AttackOdds { .. } => "attackOdds",
            Self::AttackDamage { .. } => "attackDamage",
            Self::AttackDamageAfter { .. } => "attackDamageAfter",
            Self::Miss { .. } => "miss",
            Self::Fumble { .. } => "fumble",
            Self::ChooseTarget { .. } => "chooseTarget",
            Self::MonsterAction { .. } => "monsterAction",
            Self::Blast { .. } => "blast",
            Self::BlastDamage { .. } => "blastDamage",
            Self::WeaponProficiency { .. } => "weaponProficiency",
            Self::Power { .. } => "power",
            Self::Heal { .. } => "heal",
            Self::Speed { .. } => "speed",
            Self::BeforeSpell { .. } => "beforeSpell",
            Self::SpellBacklash { .. } => "spellBacklash",
            Self::SpellExpires { .. } => "spellExpires",
            Self::MonsterSmile { .. } => "monsterSmile",
            Self::PickUpArtifact { .. } => "pickUpArtifact",
            Self::DropArtifact { .. } => "dropArtifact",
            Self::ArmorClass { .. } => "armorClass",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An adventure-supplied handler.
pub type Hook = Rc<dyn Fn(&mut Game, &Event) -> HookResult>;

/// Handlers by event name.
#[derive(Clone, Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Hook>,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.hooks.keys().collect();
        names.sort();
        f.debug_struct("HookRegistry").field("hooks", &names).finish()
    }
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for an event name, replacing any earlier one.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        hook: impl Fn(&mut Game, &Event) -> HookResult + 'static,
    ) {
        let name = name.into();
        if !Event::NAMES.contains(&name.as_str()) {
            warn!(event = %name, "hook registered for an event the engine never raises");
        }
        if self.hooks.insert(name.clone(), Rc::new(hook)).is_some() {
            warn!(event = %name, "hook replaced");
        }
    }

    /// Removes the handler for an event name.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.hooks.remove(name).is_some()
    }

    /// Returns true if a handler is registered for the name.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }

    /// The handler for an event, cloned out so it can borrow the game mutably.
    #[must_use]
    pub fn lookup(&self, event: &Event) -> Option<Hook> {
        self.hooks.get(event.name()).cloned()
    }
}

impl Game {
    /// Raises an event and returns the handler's answer.
    pub fn trigger(&mut self, event: Event) -> HookResult {
        let Some(hook) = self.hooks.lookup(&event) else {
            return HookResult::Continue;
        };
        let result = hook(self, &event);
        debug!(event = event.name(), ?result, "hook answered");
        result
    }

    /// Raises an event and returns true unless the handler vetoed.
    pub fn allows(&mut self, event: Event) -> bool {
        self.trigger(event).proceeds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_camel_case_and_listed() {
        let events = [
            Event::EndTurn2,
            Event::BeforeGet { arg: "torch".into(), artifact: ArtifactId(1) },
            Event::AfterOpen { arg: "box".into(), artifact: ArtifactId(2) },
            Event::AttackOdds { attacker: ActorId::PLAYER, defender: ActorId::PLAYER, odds: 50 },
        ];
        let names: Vec<&str> = events.iter().map(Event::name).collect();
        assert_eq!(names, ["endTurn2", "beforeGet", "afterOpen", "attackOdds"]);
        assert!(names.iter().all(|n| Event::NAMES.contains(n)));
    }

    #[test]
    fn results_classify() {
        assert!(HookResult::Continue.proceeds());
        assert!(!HookResult::Veto.proceeds());
        assert_eq!(HookResult::Replace(0).replacement(), Some(0));
        assert_eq!(HookResult::Continue.replacement(), None);
        assert_eq!(
            HookResult::Redirect(ActorId::PLAYER).redirect(),
            Some(ActorId::PLAYER)
        );
    }

    #[test]
    fn registry_replaces_and_removes() {
        let mut hooks = HookRegistry::new();
        hooks.register("look", |_, _| HookResult::Veto);
        hooks.register("look", |_, _| HookResult::Continue);
        assert!(hooks.has("look"));
        assert!(hooks.lookup(&Event::Look { arg: String::new() }).is_some());
        assert!(hooks.lookup(&Event::EndTurn).is_none());
        assert!(hooks.unregister("look"));
        assert!(!hooks.has("look"));
    }
}
