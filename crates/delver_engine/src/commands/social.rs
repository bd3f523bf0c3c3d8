//! Talking, trading, freeing prisoners, and smiling at people.

use delver_foundation::text::{join_and, pluralize};
use delver_foundation::{ActorId, MonsterId, Style};
use delver_parser::{Command, CommandError, CommandResult};
use delver_storage::{Armament, ArtifactKind, Lock, Reaction};
use tracing::info;

use super::{artifact, guard_here, local_artifact, local_monster, monster_display_name, monster_name, player_has,
    split_from, split_to};
use crate::game::Game;
use crate::hooks::Event;
use crate::modal::Question;

/// Gold a neutral monster needs to change sides.
const BRIBE: i32 = 5000;

/// Says a word or phrase out loud.
#[derive(Clone, Copy, Debug, Default)]
pub struct SayCommand;

impl Command<Game> for SayCommand {
    fn name(&self) -> &str {
        "say"
    }

    fn verbs(&self) -> &[&'static str] {
        &["say"]
    }

    fn description(&self) -> &str {
        "Says a word or phrase, like a magic word or something for an NPC"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if arg.is_empty() {
            game.ask(vec![Question::text("Say what?", |game, words| {
                game.run_command(&format!("say {words}"));
                true
            })]);
            return Ok(());
        }
        if game.allows(Event::BeforeSay { arg: arg.to_string() }) {
            game.history.write(format!("Ok... \"{arg}\""), Style::Normal);
        }
        if arg == "bort" {
            game.history.write(
                "You feel a sudden power, like you can see inside the Matrix.",
                Style::Normal,
            );
            game.data.insert("bort".to_string(), serde_json::Value::Bool(true));
            info!("debug commands unlocked");
        }
        game.trigger(Event::Say { arg: arg.to_string() });
        Ok(())
    }
}

// =============================================================================
// Trading
// =============================================================================

/// Reads "250", "250 gold" or "250 ducats" as an amount of money.
fn gold_amount(text: &str, money_name: &str) -> Option<f64> {
    if let Ok(amount) = text.trim().parse::<f64>() {
        return Some(amount);
    }
    let (number, unit) = text.trim().split_once(' ')?;
    let unit = unit.trim().to_lowercase();
    let money = money_name.to_lowercase();
    if unit == "gold" || unit == money || unit == pluralize(&money) {
        number.replace(',', "").parse().ok()
    } else {
        None
    }
}

/// Gives money or an item to a monster.
#[derive(Clone, Copy, Debug, Default)]
pub struct GiveCommand;

impl Command<Game> for GiveCommand {
    fn name(&self) -> &str {
        "give"
    }

    fn verbs(&self) -> &[&'static str] {
        &["give"]
    }

    fn description(&self) -> &str {
        "Gives money or an artifact to a monster or NPC"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let Some((item_name, recipient_name)) = split_to(arg) else {
            return Err(CommandError::refused("Try giving (something) to (someone)."));
        };
        let recipient = local_monster(game, recipient_name)
            .ok_or_else(|| CommandError::refused(format!("{recipient_name} is not here!")))?;

        match gold_amount(item_name, &game.config.money_name) {
            Some(amount) => give_gold(game, arg, recipient, amount),
            None => give_item(game, arg, item_name, recipient),
        }
    }
}

fn give_gold(game: &mut Game, arg: &str, recipient: MonsterId, amount: f64) -> CommandResult {
    let purse = game.world.player()?.gold;
    if amount > f64::from(purse) {
        return Err(CommandError::refused(format!("You only have {}!", game.money(purse))));
    }
    if amount <= 0.0 || amount.fract() != 0.0 {
        return Err(CommandError::refused("You're not making any sense."));
    }
    #[allow(clippy::cast_possible_truncation)]
    let amount = amount as i32;
    if !game.allows(Event::GiveGold {
        arg: arg.to_string(),
        recipient,
        amount,
    }) {
        return Ok(());
    }
    game.world.player_mut()?.gold -= amount;
    let name = monster_name(game, recipient);
    game.history
        .write(format!("{name} takes the money..."), Style::Normal);
    let neutral = game.require_monster(recipient)?.reaction == Reaction::Neutral;
    if neutral && amount >= BRIBE {
        game.history
            .write(format!("{name} agrees to join your cause."), Style::Success);
        game.set_reaction(recipient, Reaction::Friend);
    }
    Ok(())
}

fn give_item(game: &mut Game, arg: &str, item_name: &str, recipient: MonsterId) -> CommandResult {
    let id = game
        .world
        .find_in_inventory(ActorId::PLAYER, item_name)
        .ok_or_else(|| CommandError::refused("You're not carrying it!"))?;
    if !game.allows(Event::Give {
        arg: arg.to_string(),
        artifact: id,
        recipient,
    }) {
        return Ok(());
    }
    let item = artifact(game, id)?;
    let name = monster_name(game, recipient);
    let taker = ActorId::Monster(recipient);
    if item.is_worn {
        game.set_worn(ActorId::PLAYER, id, false)?;
    }

    game.world.move_artifact_to_inventory(id, taker)?;
    let consumable = matches!(item.kind, ArtifactKind::Edible | ArtifactKind::Drinkable);
    if consumable && item.is_healing() {
        let verb = if item.kind == ArtifactKind::Edible { "eats" } else { "drinks" };
        game.history.write(
            format!("{name} {verb} the {} and hands it back.", item.name),
            Style::Normal,
        );
        game.use_artifact(id)?;
        if game.world.artifacts.get(id).is_some_and(|a| a.location.carrier() == Some(taker)) {
            game.world.move_artifact_to_inventory(id, ActorId::PLAYER)?;
        }
    } else {
        game.history
            .write(format!("{name} takes the {}.", item.name), Style::Normal);
    }
    game.update_inventory(ActorId::PLAYER)?;

    if item.is_weapon() && game.require_monster(recipient)?.armament == Armament::Unarmed {
        game.history
            .write(format!("{name} readies the {}.", item.name), Style::Normal);
        game.ready_weapon(taker, id)?;
    }
    game.trigger(Event::AfterGive {
        arg: arg.to_string(),
        artifact: id,
        recipient,
    });
    Ok(())
}

/// Asks a monster to hand something over.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestCommand;

impl Command<Game> for RequestCommand {
    fn name(&self) -> &str {
        "take"
    }

    fn verbs(&self) -> &[&'static str] {
        &["take", "request"]
    }

    fn description(&self) -> &str {
        "Takes an item back from a monster, if they are willing"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let Some((item_name, holder_name)) = split_from(arg) else {
            return Err(CommandError::refused("Try taking (something) from (someone)."));
        };
        let room = game.world.player_room();
        let holder = game
            .world
            .monsters
            .by_name(holder_name)
            .filter(|m| m.room.is_some() && m.room == room)
            .map(|m| m.id);
        let Some(holder) = holder else {
            let container = local_artifact(game, holder_name)
                .filter(|id| game.world.artifacts.get(*id).is_some_and(|a| a.kind == ArtifactKind::Container));
            if container.is_some() {
                game.run_command(&format!("remove {arg}"));
                return Ok(());
            }
            return Err(CommandError::refused(format!("{holder_name} is not here!")));
        };

        let name = monster_name(game, holder);
        let giver = ActorId::Monster(holder);
        let wanted = game
            .world
            .find_in_inventory(giver, item_name)
            .or_else(|| game.world.artifacts.by_name(item_name).map(|a| a.id));
        let Some(id) = wanted else {
            return Err(CommandError::refused(format!("{name} doesn't have it!")));
        };
        if !game.allows(Event::BeforeRequest {
            arg: arg.to_string(),
            artifact: id,
            monster: holder,
        }) {
            return Ok(());
        }
        let item = artifact(game, id)?;
        if item.location.carrier() != Some(giver) {
            return Err(CommandError::refused(format!("{name} doesn't have it!")));
        }

        let ready = game.require_monster(holder)?.armament.weapon();
        game.world.move_artifact_to_inventory(id, ActorId::PLAYER)?;
        game.history
            .write(format!("{name} gives you the {}.", item.name), Style::Normal);
        if !item.seen {
            game.show_artifact_description(id);
            game.world.artifacts.require_mut(id)?.seen = true;
        }
        if ready == Some(id) {
            if let Some(weapon) = game.world.ready_best_weapon(giver)? {
                let weapon = artifact(game, weapon)?.name;
                game.history
                    .write(format!("{name} readies the {weapon}."), Style::Normal);
            }
        }
        game.update_inventory(ActorId::PLAYER)?;
        game.trigger(Event::AfterRequest {
            arg: arg.to_string(),
            artifact: id,
            monster: holder,
        });
        Ok(())
    }
}

/// Frees a bound monster, with a key if the bonds are locked.
#[derive(Clone, Copy, Debug, Default)]
pub struct FreeCommand;

impl Command<Game> for FreeCommand {
    fn name(&self) -> &str {
        "free"
    }

    fn verbs(&self) -> &[&'static str] {
        &["free", "release"]
    }

    fn description(&self) -> &str {
        "Frees a bound monster, unless someone is guarding them"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if arg.is_empty() {
            return Err(CommandError::refused("Free what?"));
        }
        let target = local_artifact(game, arg);
        if !game.allows(Event::BeforeFree {
            arg: arg.to_string(),
            artifact: target,
        }) {
            return Ok(());
        }
        let Some(id) = target else {
            if let Some(monster) = local_monster(game, arg) {
                return Err(CommandError::refused(format!(
                    "{} is already free!",
                    monster_name(game, monster)
                )));
            }
            return Err(CommandError::refused(format!("I don't see any {arg}!")));
        };

        let bonds = artifact(game, id)?;
        if bonds.kind != ArtifactKind::BoundMonster {
            return Err(CommandError::refused("You can't free that!"));
        }
        if let Some(guard) = guard_here(game, &bonds) {
            return Err(CommandError::refused(format!(
                "{} won't let you!",
                monster_display_name(game, guard)
            )));
        }
        let captive = bonds
            .bound_monster
            .map(|m| monster_name(game, m))
            .unwrap_or_default();
        let message = match bonds.lock {
            Lock::Key(key) if player_has(game, key) => {
                format!("You free {captive} using the {}.", artifact(game, key)?.name)
            }
            Lock::Key(_) => return Err(CommandError::refused("You don't have the key!")),
            Lock::Unlocked | Lock::Jammed => format!("You free {captive}."),
        };
        if game.allows(Event::Free {
            arg: arg.to_string(),
            artifact: id,
        }) {
            game.history.write(message, Style::Normal);
            game.free_bound_monster(id)?;
            game.trigger(Event::AfterFree {
                arg: arg.to_string(),
                artifact: id,
            });
        }
        Ok(())
    }
}

/// Smiles, to see who is friendly.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmileCommand;

impl Command<Game> for SmileCommand {
    fn name(&self) -> &str {
        "smile"
    }

    fn verbs(&self) -> &[&'static str] {
        &["smile"]
    }

    fn description(&self) -> &str {
        "Greets the monsters in the room to see if they are friendly"
    }

    fn run(&self, _verb: &str, _arg: &str, game: &mut Game) -> CommandResult {
        let present: Vec<MonsterId> = game.world.monsters.visible().to_vec();
        if present.is_empty() {
            game.history.write("Ok. \u{1f603}", Style::Normal);
            game.history.write(
                "You know... you look a bit dim, smiling like that, when no one's around.",
                Style::Normal,
            );
            return Ok(());
        }
        let responses = [
            (Reaction::Friend, "smiles back.", "smile back."),
            (Reaction::Neutral, "ignores you.", "ignore you."),
            (Reaction::Hostile, "scowls at you.", "scowl at you."),
        ];
        for (reaction, one, many) in responses {
            let group: Vec<MonsterId> = present
                .iter()
                .copied()
                .filter(|id| game.world.monsters.get(*id).is_some_and(|m| m.reaction == reaction))
                .collect();
            let mut names = Vec::new();
            let mut plural = false;
            for id in group {
                if !game.allows(Event::MonsterSmile { monster: id }) {
                    continue;
                }
                let here = game.members_here(id).len();
                if let Some(monster) = game.world.monsters.get(id) {
                    if here > 1 {
                        plural = true;
                        names.push(monster.plural_name());
                    } else {
                        names.push(monster.name.clone());
                    }
                }
            }
            if names.is_empty() {
                continue;
            }
            let verb = if plural || names.len() > 1 { many } else { one };
            game.history
                .write(format!("{} {verb}", join_and(&names)), Style::Normal);
        }
        Ok(())
    }
}
