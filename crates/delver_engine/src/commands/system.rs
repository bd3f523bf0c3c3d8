//! Saving, restoring, and the debugging commands.
//!
//! `xgoto` and `xaccio` stay hidden until the player says the magic word.

use std::collections::BTreeMap;

use delver_foundation::{ActorId, RoomId, Style};
use delver_parser::{Command, CommandError, CommandResult};
use delver_storage::ArtifactKind;
use tracing::{info, warn};

use crate::game::Game;
use crate::hooks::Event;
use crate::modal::Question;
use crate::saves::{FIRST_SLOT, LAST_SLOT};

const DEMO_REFUSAL: &str = "Saved games are not available when playing as the demo character.";

/// The slot number of a "3: description" choice.
fn slot_of(choice: &str) -> Option<u8> {
    choice.split_once(':')?.0.trim().parse().ok()
}

/// Saves the game to a slot, asking which one and what to call it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SaveCommand;

impl Command<Game> for SaveCommand {
    fn name(&self) -> &str {
        "save"
    }

    fn verbs(&self) -> &[&'static str] {
        &["save"]
    }

    fn description(&self) -> &str {
        "Saves your game"
    }

    fn run(&self, _verb: &str, _arg: &str, game: &mut Game) -> CommandResult {
        if game.config.demo {
            return Err(CommandError::refused(DEMO_REFUSAL));
        }
        let descriptions: BTreeMap<u8, String> = game
            .list_saves()?
            .into_iter()
            .map(|s| (s.slot, s.description))
            .collect();
        let mut choices: Vec<String> = (FIRST_SLOT..=LAST_SLOT)
            .map(|slot| match descriptions.get(&slot) {
                Some(d) if d.is_empty() => format!("{slot}: no description"),
                Some(d) => format!("{slot}: {d}"),
                None => format!("{slot}: unused"),
            })
            .collect();
        choices.push("Cancel".to_string());

        let pick = Question::choice("Please choose a saved game slot:", choices, move |game, answer| {
            let Some(slot) = slot_of(answer) else {
                return false;
            };
            if let (Some(existing), Some(next)) = (descriptions.get(&slot), game.modal.question_mut(1)) {
                next.answer.clone_from(existing);
            }
            true
        });
        let describe = Question::text("Enter a description for the saved game:", |game, description| {
            let Some(slot) = game.modal.question(0).and_then(|q| slot_of(&q.answer)) else {
                return true;
            };
            match game.save(slot, description) {
                Ok(()) => game
                    .history
                    .write(format!("Game saved to slot {slot}."), Style::Normal),
                Err(err) => {
                    warn!(slot, error = %err, "save failed");
                    game.history.write(format!("Error: {err}"), Style::Danger);
                }
            }
            true
        });
        game.ask(vec![pick, describe]);
        Ok(())
    }
}

/// Restores a saved game.
#[derive(Clone, Copy, Debug, Default)]
pub struct RestoreCommand;

impl Command<Game> for RestoreCommand {
    fn name(&self) -> &str {
        "restore"
    }

    fn verbs(&self) -> &[&'static str] {
        &["restore"]
    }

    fn description(&self) -> &str {
        "Restores from a saved game"
    }

    fn run(&self, _verb: &str, _arg: &str, game: &mut Game) -> CommandResult {
        if game.config.demo {
            return Err(CommandError::refused(DEMO_REFUSAL));
        }
        let mut choices: Vec<String> = game
            .list_saves()?
            .into_iter()
            .map(|s| {
                if s.description.is_empty() {
                    format!("{}: no description", s.slot)
                } else {
                    format!("{}: {}", s.slot, s.description)
                }
            })
            .collect();
        if choices.is_empty() {
            return Err(CommandError::refused("There are no saved games to restore."));
        }
        choices.push("Cancel".to_string());

        game.ask(vec![Question::choice(
            "Please choose a saved game to restore:",
            choices,
            |game, answer| {
                let Some(slot) = slot_of(answer) else {
                    return false;
                };
                if let Err(err) = game.restore(slot) {
                    warn!(slot, error = %err, "restore failed");
                    game.history.write(format!("Error: {err}"), Style::Danger);
                }
                true
            },
        )]);
        Ok(())
    }
}

// =============================================================================
// Debugging
// =============================================================================

/// Teleports the player to a room by number.
#[derive(Clone, Copy, Debug, Default)]
pub struct GotoCommand;

impl Command<Game> for GotoCommand {
    fn name(&self) -> &str {
        "xgoto"
    }

    fn verbs(&self) -> &[&'static str] {
        &["xgoto"]
    }

    fn description(&self) -> &str {
        "Moves the player to a room by its number"
    }

    fn enabled(&self, game: &Game) -> bool {
        game.debug_unlocked()
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let to = arg
            .trim()
            .parse::<u32>()
            .ok()
            .map(RoomId)
            .filter(|id| game.world.rooms.contains(*id))
            .ok_or_else(|| CommandError::refused(format!("There is no room {arg}")))?;
        let from = game.world.player_room();
        game.skip_battle_actions = true;
        game.move_player(to, false)?;
        info!(room = %to, "player teleported");
        if let Some(from) = from {
            game.trigger(Event::AfterMove {
                arg: arg.to_string(),
                from,
                to,
            });
        }
        Ok(())
    }
}

/// Summons an artifact into the player's hands, or a monster to their side.
#[derive(Clone, Copy, Debug, Default)]
pub struct AccioCommand;

impl Command<Game> for AccioCommand {
    fn name(&self) -> &str {
        "xaccio"
    }

    fn verbs(&self) -> &[&'static str] {
        &["xaccio"]
    }

    fn description(&self) -> &str {
        "Brings any artifact or monster to the player"
    }

    fn enabled(&self, game: &Game) -> bool {
        game.debug_unlocked()
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let monster = game.world.monsters.by_name(arg).map(|m| m.id);
        let item = game
            .world
            .artifacts
            .by_name(arg)
            .filter(|a| a.kind != ArtifactKind::DeadBody || monster.is_none())
            .map(|a| (a.id, a.name.clone(), a.seen));

        if let Some((id, name, seen)) = item {
            if !seen {
                game.show_artifact_description(id);
                game.world.artifacts.require_mut(id)?.seen = true;
            }
            game.world.move_artifact_to_inventory(id, ActorId::PLAYER)?;
            game.update_inventory(ActorId::PLAYER)?;
            game.history.write(format!("{name} taken."), Style::Normal);
            game.world
                .artifacts
                .require_mut(id)?
                .data
                .insert("for_sale".to_string(), serde_json::Value::Bool(false));
            return Ok(());
        }
        if let Some(id) = monster {
            let room = game.world.player_room();
            game.move_monster(ActorId::Monster(id), room);
            let name = game.require_monster(id)?.name.clone();
            game.history.write(format!("{name} appears."), Style::Normal);
            game.refresh_visible();
            return Ok(());
        }
        Err(CommandError::refused(format!("I don't know what {arg} is!")))
    }
}
