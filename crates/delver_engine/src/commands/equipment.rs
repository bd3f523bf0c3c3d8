//! Weapons, armor, and things to swallow.

use delver_foundation::{ActorId, ArtifactId, Style};
use delver_parser::{Command, CommandError, CommandResult};
use delver_storage::{ArmorType, ArtifactKind};

use super::{artifact, local_artifact};
use crate::game::Game;
use crate::hooks::Event;

/// Readies a carried weapon. Armor is worn instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadyCommand;

impl Command<Game> for ReadyCommand {
    fn name(&self) -> &str {
        "ready"
    }

    fn verbs(&self) -> &[&'static str] {
        &["ready"]
    }

    fn description(&self) -> &str {
        "Changes your ready weapon"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let Some(id) = game.world.find_in_inventory(ActorId::PLAYER, arg) else {
            return Err(CommandError::refused(format!("You aren't carrying a {arg}!")));
        };
        if !game.allows(Event::Ready {
            arg: arg.to_string(),
            artifact: id,
        }) {
            return Ok(());
        }
        let weapon = artifact(game, id)?;
        if weapon.kind == ArtifactKind::Wearable {
            game.run_command(&format!("wear {}", weapon.name));
            return Ok(());
        }
        if !weapon.is_weapon() {
            return Err(CommandError::refused("That is not a weapon!"));
        }
        if weapon.hands == 2 && game.world.is_wearing_slot(ActorId::PLAYER, ArmorType::Shield) {
            return Err(CommandError::refused(
                "That is a two-handed weapon. Try removing your shield first.",
            ));
        }
        game.ready_weapon(ActorId::PLAYER, id)?;
        game.history
            .write(format!("{} readied.", weapon.name), Style::Normal);
        Ok(())
    }
}

/// Puts on clothing or armor.
#[derive(Clone, Copy, Debug, Default)]
pub struct WearCommand;

impl Command<Game> for WearCommand {
    fn name(&self) -> &str {
        "wear"
    }

    fn verbs(&self) -> &[&'static str] {
        &["wear"]
    }

    fn description(&self) -> &str {
        "Puts on an article of clothing or armor"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let Some(id) = game.world.find_in_inventory(ActorId::PLAYER, arg) else {
            return Err(CommandError::refused(format!("You aren't carrying a {arg}!")));
        };
        if !game.allows(Event::Wear {
            arg: arg.to_string(),
            artifact: id,
        }) {
            return Ok(());
        }
        let item = artifact(game, id)?;
        if item.kind != ArtifactKind::Wearable {
            return Err(CommandError::refused("You can't wear that!"));
        }
        if item.is_worn {
            return Err(CommandError::refused("You're already wearing it!"));
        }
        let wearing = |slot| game.world.is_wearing_slot(ActorId::PLAYER, slot);
        match item.armor_type {
            Some(ArmorType::Armor) if wearing(ArmorType::Armor) => {
                return Err(CommandError::refused("Try removing your other armor first."));
            }
            Some(ArmorType::Shield) if wearing(ArmorType::Shield) => {
                return Err(CommandError::refused("Try removing your other shield first."));
            }
            Some(ArmorType::Shield) if game.world.weapon(ActorId::PLAYER).is_some_and(|w| w.hands == 2) => {
                return Err(CommandError::refused(
                    "You are using a two-handed weapon. You can only use a shield with a one-handed weapon.",
                ));
            }
            Some(ArmorType::Helmet) if wearing(ArmorType::Helmet) => {
                return Err(CommandError::refused("Try removing your other helmet first."));
            }
            _ => {}
        }
        game.set_worn(ActorId::PLAYER, id, true)?;
        game.history
            .write(format!("You put on the {}.", item.name), Style::Normal);
        Ok(())
    }
}

// =============================================================================
// Consumables
// =============================================================================

/// Shared by drink and eat: the hook, the kind check, and the helpful
/// refusals for things that are not in reach.
fn consume(game: &mut Game, arg: &str, kind: ArtifactKind, verb: &str) -> CommandResult {
    let target = local_artifact(game, arg);
    let event = match kind {
        ArtifactKind::Drinkable => Event::Drink {
            arg: arg.to_string(),
            artifact: target,
        },
        _ => Event::Eat {
            arg: arg.to_string(),
            artifact: target,
        },
    };
    if !game.allows(event) {
        return Ok(());
    }

    let Some(id) = target else {
        if let Some(container) = enclosing_container(game, arg) {
            return Err(CommandError::refused(format!(
                "Try removing it from the {container} first."
            )));
        }
        let common = ["water", "river", "stream", "lake", "ocean"];
        let mentioned = game.world.current_room().is_some_and(|r| r.text_match(arg));
        if kind == ArtifactKind::Drinkable && common.contains(&arg) && mentioned {
            game.history.write("Nothing happens.", Style::Normal);
            return Ok(());
        }
        return Err(CommandError::refused("I don't know what you mean."));
    };

    let item = artifact(game, id)?;
    if item.kind != kind {
        return Err(CommandError::refused(format!("You can't {verb} that!")));
    }
    if item.quantity.is_some_and(|q| q <= 0) {
        return Err(CommandError::refused("There's none left!"));
    }
    game.history
        .write(format!("You {verb} the {}.", item.name), Style::Normal);
    game.use_artifact(id)?;
    Ok(())
}

/// Name of the container in reach that holds an artifact with this name.
fn enclosing_container(game: &Game, name: &str) -> Option<String> {
    let container_id: ArtifactId = game.world.artifacts.by_name(name)?.location.container()?;
    if !game
        .world
        .artifacts
        .is_here(container_id, game.world.player_room())
    {
        return None;
    }
    game.world.artifacts.get(container_id).map(|c| c.name.clone())
}

/// Drinks a potion or another drinkable.
#[derive(Clone, Copy, Debug, Default)]
pub struct DrinkCommand;

impl Command<Game> for DrinkCommand {
    fn name(&self) -> &str {
        "drink"
    }

    fn verbs(&self) -> &[&'static str] {
        &["drink"]
    }

    fn description(&self) -> &str {
        "Takes a drink from a drinkable artifact"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        consume(game, arg, ArtifactKind::Drinkable, "drink")
    }
}

/// Eats something edible.
#[derive(Clone, Copy, Debug, Default)]
pub struct EatCommand;

impl Command<Game> for EatCommand {
    fn name(&self) -> &str {
        "eat"
    }

    fn verbs(&self) -> &[&'static str] {
        &["eat"]
    }

    fn description(&self) -> &str {
        "Eats an edible item"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        consume(game, arg, ArtifactKind::Edible, "eat")
    }
}

/// Uses an item's special ability, carried or lying in the room.
#[derive(Clone, Copy, Debug, Default)]
pub struct UseCommand;

impl Command<Game> for UseCommand {
    fn name(&self) -> &str {
        "use"
    }

    fn verbs(&self) -> &[&'static str] {
        &["use"]
    }

    fn description(&self) -> &str {
        "Uses the special ability of an item"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let target = local_artifact(game, arg);
        if !game.allows(Event::BeforeUse {
            arg: arg.to_string(),
            artifact: target,
        }) {
            return Ok(());
        }
        let id = target.ok_or_else(|| CommandError::refused("You aren't carrying it!"))?;
        let quantity = artifact(game, id)?.quantity;
        if quantity.is_some_and(|q| q <= 0) {
            return Err(CommandError::refused("There's none left!"));
        }
        game.use_artifact(id)?;
        Ok(())
    }
}
