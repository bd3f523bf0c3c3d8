//! The core command set.
//!
//! Every command is a small struct implementing [`Command`] for [`Game`].
//! Player mistakes come back as [`CommandError::Refused`], which the parser
//! narrates; engine faults propagate with `?` and surface as `Error: ...`.
//!
//! | Module        | Verbs                                                    |
//! |---------------|----------------------------------------------------------|
//! | `movement`    | the ten directions, `flee`                               |
//! | `looking`     | `look`, `examine`, `read`, `inventory`                   |
//! | `objects`     | `get`, `drop`, `remove`, `put`, `open`, `close`, `light` |
//! | `equipment`   | `ready`, `wear`, `drink`, `eat`, `use`                   |
//! | `fighting`    | `attack`, `power`, `heal`, `blast`, `speed`              |
//! | `social`      | `say`, `give`, `take`, `free`, `smile`                   |
//! | `system`      | `save`, `restore`, `xgoto`, `xaccio`                     |
//!
//! `buy` is not registered by default; adventures with merchants add
//! [`BuyCommand`] through [`Game::register_command`].

mod buy;
mod equipment;
mod fighting;
mod looking;
mod movement;
mod objects;
mod social;
mod system;

use std::sync::LazyLock;

use delver_foundation::{ArtifactId, MonsterId, Result};
use delver_parser::{CommandError, CommandParser};
use delver_storage::Artifact;
use regex::Regex;

use crate::game::Game;

pub use buy::BuyCommand;
pub use equipment::{DrinkCommand, EatCommand, ReadyCommand, UseCommand, WearCommand};
pub use fighting::{AttackCommand, BlastCommand, HealCommand, PowerCommand, SpeedCommand};
pub use looking::{InventoryCommand, LookCommand, ReadCommand};
pub use movement::{FleeCommand, MoveCommand};
pub use objects::{CloseCommand, DropCommand, GetCommand, LightCommand, OpenCommand, PutCommand, RemoveCommand};
pub use social::{FreeCommand, GiveCommand, RequestCommand, SayCommand, SmileCommand};
pub use system::{AccioCommand, GotoCommand, RestoreCommand, SaveCommand};

/// Builds a parser with every core command registered.
///
/// # Errors
///
/// Returns an error if two core commands claim the same verb.
pub fn core_parser() -> Result<CommandParser<Game>> {
    let mut parser = CommandParser::new();
    parser.register(MoveCommand)?;
    parser.register(LookCommand)?;
    parser.register(SayCommand)?;
    parser.register(GetCommand)?;
    parser.register(RemoveCommand)?;
    parser.register(PutCommand)?;
    parser.register(DropCommand)?;
    parser.register(ReadyCommand)?;
    parser.register(WearCommand)?;
    parser.register(FleeCommand)?;
    parser.register(DrinkCommand)?;
    parser.register(EatCommand)?;
    parser.register(UseCommand)?;
    parser.register(AttackCommand)?;
    parser.register(LightCommand)?;
    parser.register(ReadCommand)?;
    parser.register(OpenCommand)?;
    parser.register(CloseCommand)?;
    parser.register(GiveCommand)?;
    parser.register(RequestCommand)?;
    parser.register(FreeCommand)?;
    parser.register(PowerCommand)?;
    parser.register(HealCommand)?;
    parser.register(BlastCommand)?;
    parser.register(SpeedCommand)?;
    parser.register(SaveCommand)?;
    parser.register(RestoreCommand)?;
    parser.register(SmileCommand)?;
    parser.register(InventoryCommand)?;
    parser.register(GotoCommand)?;
    parser.register(AccioCommand)?;
    Ok(parser)
}

// =============================================================================
// Argument shapes
// =============================================================================

static FROM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+) from (.+)$").expect("valid regex"));
static INTO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+) in(?:to)? (.+)$").expect("valid regex"));
static TO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(.+) to (.+)$").expect("valid regex"));

/// Splits "X from Y".
fn split_from(arg: &str) -> Option<(&str, &str)> {
    split(&FROM, arg)
}

/// Splits "X in Y" and "X into Y".
fn split_into(arg: &str) -> Option<(&str, &str)> {
    split(&INTO, arg)
}

/// Splits "X to Y".
fn split_to(arg: &str) -> Option<(&str, &str)> {
    split(&TO, arg)
}

fn split<'a>(pattern: &Regex, arg: &'a str) -> Option<(&'a str, &'a str)> {
    let captures = pattern.captures(arg)?;
    let first = captures.get(1)?.as_str().trim();
    let second = captures.get(2)?.as_str().trim();
    Some((first, second))
}

// =============================================================================
// Lookups shared by the commands
// =============================================================================

/// An artifact in the room or carried by the player.
fn local_artifact(game: &Game, query: &str) -> Option<ArtifactId> {
    game.world
        .artifacts
        .local_by_name(query, game.world.player_room())
}

/// A living monster in the room.
fn local_monster(game: &Game, query: &str) -> Option<MonsterId> {
    game.monster_here(query)
}

/// A snapshot of an artifact, so the game can be borrowed mutably afterwards.
fn artifact(game: &Game, id: ArtifactId) -> std::result::Result<Artifact, CommandError> {
    Ok(game.world.artifacts.require(id)?.clone())
}

/// A monster's name, for refusals.
fn monster_name(game: &Game, id: MonsterId) -> String {
    game.world
        .monsters
        .get(id)
        .map(|m| m.name.clone())
        .unwrap_or_default()
}

/// Name with the article ("the goblin", "a hermit").
fn monster_display_name(game: &Game, id: MonsterId) -> String {
    game.world
        .monsters
        .get(id)
        .map(|m| m.names().display_name())
        .unwrap_or_default()
}

/// True if the player carries the artifact.
fn player_has(game: &Game, id: ArtifactId) -> bool {
    game.world
        .artifacts
        .get(id)
        .is_some_and(|a| a.location.carrier().is_some_and(|c| c.is_player()))
}

/// The guard standing watch over an artifact, if they are alive and here.
fn guard_here(game: &Game, artifact: &Artifact) -> Option<MonsterId> {
    artifact.guard_id.filter(|guard| {
        game.is_alive(*guard) && game.world.monsters.get(*guard).is_some_and(|m| m.room == game.world.player_room())
    })
}

/// Words that describe every room, so looking at them never fails loudly.
const SCENERY: [&str; 8] = ["wall", "door", "floor", "ceiling", "road", "path", "trail", "window"];

/// True if the word names scenery or appears in the room's text.
fn is_scenery(game: &Game, word: &str) -> bool {
    SCENERY.contains(&word) || game.world.current_room().is_some_and(|r| r.text_match(word))
}

/// A fixed world shared by the command tests.
#[cfg(test)]
pub(crate) mod testkit {
    use delver_foundation::{ActorId, ArtifactId, EffectId, MonsterId, RoomId};
    use delver_storage::{
        AdventureInfo, Armament, ArmorType, Artifact, ArtifactKind, Effect, ExitTarget, Friendliness, Location, Lock,
        Monster, PlayerProfile, Reaction, Room, RoomExit, Spell, WeaponType, World,
    };

    use crate::config::GameConfig;
    use crate::game::Game;

    pub const TORCH: ArtifactId = ArtifactId(1);
    pub const DAGGER: ArtifactId = ArtifactId(2);
    pub const CHEST: ArtifactId = ArtifactId(3);
    pub const COINS: ArtifactId = ArtifactId(4);
    pub const POTION: ArtifactId = ArtifactId(5);
    pub const BOULDER: ArtifactId = ArtifactId(6);
    pub const ARMOR: ArtifactId = ArtifactId(7);
    pub const SHIELD: ArtifactId = ArtifactId(8);
    pub const SCROLL: ArtifactId = ArtifactId(9);
    pub const GATE: ArtifactId = ArtifactId(10);
    pub const KEY: ArtifactId = ArtifactId(11);
    pub const STAFF: ArtifactId = ArtifactId(12);

    pub const HERMIT: MonsterId = MonsterId(1);
    pub const GOBLIN: MonsterId = MonsterId(2);

    pub const COURTYARD: RoomId = RoomId(1);
    pub const ARMORY: RoomId = RoomId(2);
    pub const GARDEN: RoomId = RoomId(3);

    /// Courtyard (1) with a locked gate north to the armory (2), a garden (3)
    /// to the east, the way out to the west and a moat to the south.
    pub fn world() -> World {
        let mut world = World::new();

        let mut courtyard = Room::new(
            COURTYARD,
            "Courtyard",
            "A cobbled courtyard. An old sign by the gate reads: BEWARE.",
        );
        courtyard.add_exit(RoomExit::new("n", ExitTarget::Room(ARMORY)).with_door(GATE));
        courtyard.add_exit(RoomExit::new("e", ExitTarget::Room(GARDEN)));
        courtyard.add_exit(RoomExit::new("w", ExitTarget::Exit));
        let mut moat = RoomExit::new("s", ExitTarget::Nowhere);
        moat.effect_id = Some(EffectId(1));
        courtyard.add_exit(moat);
        world.rooms.add(courtyard).unwrap();

        let mut armory = Room::new(ARMORY, "Armory", "Empty racks line the walls.");
        armory.add_exit(RoomExit::new("s", ExitTarget::Room(COURTYARD)));
        world.rooms.add(armory).unwrap();

        let mut garden = Room::new(GARDEN, "Garden", "A herb garden around a pond of clear water.");
        garden.add_exit(RoomExit::new("w", ExitTarget::Room(COURTYARD)));
        world.rooms.add(garden).unwrap();

        world.effects.add(Effect::new(EffectId(1), "The moat is too deep to cross.")).unwrap();
        world.effects.add(Effect::new(EffectId(2), "It says: the key is in the garden.")).unwrap();

        let mut torch = Artifact::new(TORCH, "torch", ArtifactKind::LightSource)
            .at(Location::Room(COURTYARD))
            .with_description("A pitch-soaked torch.")
            .with_weight(1);
        torch.quantity = Some(30);
        world.artifacts.add(torch).unwrap();

        world
            .artifacts
            .add(
                Artifact::new(DAGGER, "dagger", ArtifactKind::Weapon)
                    .with_weapon(WeaponType::Sword, 10, 1, 4)
                    .with_weight(2)
                    .at(Location::Carried(ActorId::PLAYER)),
            )
            .unwrap();

        let mut chest = Artifact::new(CHEST, "chest", ArtifactKind::Container)
            .at(Location::Room(COURTYARD))
            .with_description("An oak chest.")
            .with_weight(999);
        chest.quantity = Some(20);
        world.artifacts.add(chest).unwrap();

        let mut coins = Artifact::new(COINS, "coins", ArtifactKind::Gold)
            .at(Location::Contained(CHEST))
            .with_weight(1);
        coins.value = 25;
        world.artifacts.add(coins).unwrap();

        let mut potion = Artifact::new(POTION, "potion", ArtifactKind::Drinkable)
            .at(Location::Carried(ActorId::PLAYER))
            .with_weight(1);
        potion.dice = 1;
        potion.sides = 6;
        potion.quantity = Some(2);
        world.artifacts.add(potion).unwrap();

        world
            .artifacts
            .add(
                Artifact::new(BOULDER, "boulder", ArtifactKind::Treasure)
                    .at(Location::Room(COURTYARD))
                    .with_weight(2000),
            )
            .unwrap();

        let mut armor = Artifact::new(ARMOR, "leather armor", ArtifactKind::Wearable)
            .at(Location::Carried(ActorId::PLAYER))
            .with_weight(10);
        armor.armor_type = Some(ArmorType::Armor);
        armor.armor_class = 1;
        world.artifacts.add(armor).unwrap();

        let mut shield = Artifact::new(SHIELD, "shield", ArtifactKind::Wearable)
            .at(Location::Room(ARMORY))
            .with_weight(5);
        shield.armor_type = Some(ArmorType::Shield);
        shield.armor_class = 1;
        world.artifacts.add(shield).unwrap();

        let mut scroll = Artifact::new(SCROLL, "scroll", ArtifactKind::Readable)
            .at(Location::Room(COURTYARD))
            .with_description("A rolled scroll.")
            .with_weight(1);
        scroll.effect_id = Some(EffectId(2));
        scroll.num_effects = 1;
        world.artifacts.add(scroll).unwrap();

        let mut gate = Artifact::new(GATE, "iron gate", ArtifactKind::Door)
            .at(Location::Room(COURTYARD))
            .with_description("A rusty iron gate.")
            .with_weight(-999);
        gate.lock = Lock::Key(KEY);
        gate.get_all = false;
        world.artifacts.add(gate).unwrap();

        world
            .artifacts
            .add(
                Artifact::new(KEY, "iron key", ArtifactKind::Treasure)
                    .at(Location::Room(GARDEN))
                    .with_description("A heavy key.")
                    .with_weight(1),
            )
            .unwrap();

        world
            .artifacts
            .add(
                Artifact::new(STAFF, "staff", ArtifactKind::Weapon)
                    .with_weapon(WeaponType::Club, 5, 1, 6)
                    .with_weight(3)
                    .at(Location::Carried(ActorId::Monster(HERMIT))),
            )
            .unwrap();

        let mut player = Monster::new(MonsterId::PLAYER, "Mira", 20, 15).in_room(COURTYARD);
        player.reaction = Reaction::Friend;
        player.gold = 10;
        player.armament = Armament::Wields(DAGGER);
        let mut profile = PlayerProfile::default();
        for spell in Spell::ALL {
            *profile.spell_abilities.get_mut(spell) = 50;
            *profile.spell_abilities_original.get_mut(spell) = 50;
        }
        player.player = Some(profile);
        world.monsters.add(player).unwrap();

        let mut hermit = Monster::new(HERMIT, "hermit", 10, 10).in_room(GARDEN);
        hermit.description = "A hermit in a patched robe.".into();
        hermit.friendliness = Friendliness::Neutral;
        hermit.armament = Armament::Wields(STAFF);
        world.monsters.add(hermit).unwrap();

        let mut goblin = Monster::new(GOBLIN, "goblin", 8, 10).in_room(ARMORY);
        goblin.description = "A snarling goblin.".into();
        goblin.friendliness = Friendliness::Hostile;
        goblin.armament = Armament::Natural;
        goblin.courage = 200;
        world.monsters.add(goblin).unwrap();

        world.update_visible();
        world
    }

    /// A started game in the courtyard.
    pub fn game() -> Game {
        let mut game = Game::new(AdventureInfo::default(), world(), GameConfig::testing()).unwrap();
        game.start();
        game
    }

    /// A started game with the player moved somewhere else, quietly.
    pub fn game_in(room: RoomId) -> Game {
        let mut game = game();
        game.move_player(room, false).unwrap();
        game
    }
}
