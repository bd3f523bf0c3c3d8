//! Walking and running away.

use delver_foundation::{RoomId, Style};
use delver_parser::{Command, CommandError, CommandResult};
use delver_storage::room::{long_direction, short_direction};
use delver_storage::{ExitTarget, Location, Lock, RoomExit};
use tracing::{debug, warn};

use super::player_has;
use crate::game::Game;
use crate::hooks::Event;

/// Moves through an exit.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoveCommand;

impl Command<Game> for MoveCommand {
    fn name(&self) -> &str {
        "move"
    }

    fn verbs(&self) -> &[&'static str] {
        &[
            "north", "n", "south", "s", "east", "e", "west", "w", "up", "u", "down", "d", "northeast", "ne",
            "southeast", "se", "southwest", "sw", "northwest", "nw",
        ]
    }

    fn history_display(&self, verb: &str) -> String {
        long_direction(verb).unwrap_or(verb).to_string()
    }

    fn description(&self) -> &str {
        "Moves in a direction"
    }

    fn run(&self, verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let direction = short_direction(verb).unwrap_or(verb);
        let from = game
            .world
            .player_room()
            .ok_or_else(|| CommandError::refused("You can't go that way!"))?;
        let exit = game.world.rooms.get(from).and_then(|r| r.exit(direction)).cloned();

        if !game.allows(Event::SpecialMove { arg: arg.to_string() }) {
            return Ok(());
        }
        let Some(exit) = exit else {
            return Err(CommandError::refused("You can't go that way!"));
        };
        if let (ExitTarget::Nowhere, Some(effect)) = (exit.room_to, exit.effect_id) {
            let text = game
                .world
                .effects
                .get(effect)
                .map(delver_storage::Effect::rendered_text)
                .unwrap_or_default();
            return Err(CommandError::refused(text));
        }
        if game.in_battle {
            return Err(CommandError::refused("You can't do that with unfriendlies about!"));
        }
        pass_door(game, &exit, from)?;

        game.skip_battle_actions = true;
        if !game.allows(Event::BeforeMove {
            arg: arg.to_string(),
            room: from,
            exit: exit.clone(),
        }) {
            return Ok(());
        }

        match exit.room_to {
            ExitTarget::Exit | ExitTarget::ExitSilent => {
                let loud = exit.room_to == ExitTarget::Exit;
                if game.config.exit_prompt {
                    game.confirm("Leave this adventure?", move |game, yes| {
                        if yes {
                            leave(game, loud);
                        }
                    });
                } else {
                    leave(game, loud);
                }
            }
            ExitTarget::Room(to) if game.world.rooms.contains(to) => {
                if let Some(effect) = exit.effect_id {
                    game.print_effect(effect);
                }
                game.move_player(to, true)?;
                debug!(%from, %to, "player moved");
                game.trigger(Event::AfterMove {
                    arg: arg.to_string(),
                    from,
                    to,
                });
            }
            target => {
                warn!(%from, ?target, "exit leads nowhere");
                game.history.write("You can't go that way!", Style::Normal);
            }
        }
        Ok(())
    }
}

/// Checks a door on the way out: hidden doors block silently, embedded ones
/// are found, and a carried key opens a locked one.
fn pass_door(game: &mut Game, exit: &RoomExit, from: RoomId) -> CommandResult {
    let Some(door_id) = exit.door_id else {
        return Ok(());
    };
    let Some(door) = game.world.artifacts.get(door_id).cloned() else {
        return Ok(());
    };
    if door.location != Location::Room(from) {
        return Ok(());
    }
    if door.hidden {
        return Err(CommandError::refused("You can't go that way!"));
    }
    if door.embedded {
        game.reveal_artifact(door_id)?;
    }
    if let (false, Lock::Key(key)) = (door.is_open, door.lock) {
        if player_has(game, key) {
            let key_name = game.world.artifacts.get(key).map(|k| k.name.clone()).unwrap_or_default();
            game.history
                .write(format!("You unlock the {} using the {key_name}.", door.name), Style::Normal);
            game.open_artifact(door_id)?;
        }
    }
    let open = game.world.artifacts.get(door_id).is_some_and(|d| d.is_open);
    if !open {
        return Err(CommandError::refused(format!("The {} blocks your way!", door.name)));
    }
    Ok(())
}

fn leave(game: &mut Game, with_message: bool) {
    if with_message {
        let message = game.config.exit_message.clone();
        game.history.write(message, Style::Normal);
    }
    game.exit();
}

/// Runs out of a fight, through a named exit or a random open one.
#[derive(Clone, Copy, Debug, Default)]
pub struct FleeCommand;

impl Command<Game> for FleeCommand {
    fn name(&self) -> &str {
        "flee"
    }

    fn verbs(&self) -> &[&'static str] {
        &["flee"]
    }

    fn description(&self) -> &str {
        "Runs away from a fight"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if !game.in_battle {
            return Err(CommandError::refused("Calm down. There is no danger here."));
        }
        let room = game.world.current_room().cloned();
        let mut exit = room
            .as_ref()
            .and_then(|r| r.random_exit(&game.world.artifacts, &mut game.dice));
        if !arg.is_empty() {
            let chosen = room
                .as_ref()
                .and_then(|r| r.exit(arg))
                .cloned()
                .ok_or_else(|| CommandError::refused("You can't go that way!"))?;
            if !chosen.is_open(&game.world.artifacts) {
                return Err(CommandError::refused("The way is blocked!"));
            }
            exit = Some(chosen);
        }

        if !game.allows(Event::Flee {
            arg: arg.to_string(),
            exit: exit.clone(),
        }) {
            return Ok(());
        }
        let Some((exit, to)) = exit.and_then(|x| x.room_to.room().map(|to| (x, to))) else {
            return Err(CommandError::refused("There is nowhere to flee to!"));
        };
        game.move_player(to, true)?;
        game.skip_battle_actions = true;
        debug!(%to, "player fled");
        game.trigger(Event::AfterFlee {
            arg: arg.to_string(),
            exit,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use delver_parser::Dispatch;

    use super::super::testkit::*;
    use crate::game::GameState;
    use crate::hooks::HookResult;

    #[test]
    fn short_directions_show_long_in_history() {
        let mut game = game();
        game.input("e");
        assert_eq!(game.world.player_room(), Some(GARDEN));
        assert_eq!(game.history.last_command(), "east");
        game.input("w");
        assert_eq!(game.world.player_room(), Some(COURTYARD));
    }

    #[test]
    fn missing_exits_refuse() {
        let mut game = game();
        let dispatch = game.input("up");
        assert!(matches!(dispatch, Dispatch::Refused { .. }));
        assert!(game.history.contains("You can't go that way!"));
        assert_eq!(game.timer, 1);
    }

    #[test]
    fn dead_end_prints_its_effect() {
        let mut game = game();
        game.input("s");
        assert!(game.history.contains("The moat is too deep to cross."));
        assert_eq!(game.world.player_room(), Some(COURTYARD));
    }

    #[test]
    fn locked_gate_blocks_without_the_key() {
        let mut game = game();
        game.input("n");
        assert!(game.history.contains("The iron gate blocks your way!"));
        assert_eq!(game.world.player_room(), Some(COURTYARD));
    }

    #[test]
    fn carried_key_unlocks_the_gate() {
        let mut game = game();
        game.world
            .move_artifact_to_inventory(KEY, delver_foundation::ActorId::PLAYER)
            .unwrap();
        game.input("north");
        assert!(game.history.contains("You unlock the iron gate using the iron key."));
        assert_eq!(game.world.player_room(), Some(ARMORY));
        assert!(game.world.artifacts.get(GATE).unwrap().is_open);
    }

    #[test]
    fn hidden_doors_look_like_walls() {
        let mut game = game();
        game.world.artifacts.get_mut(GATE).unwrap().hidden = true;
        game.input("n");
        assert!(game.history.contains("You can't go that way!"));
        assert!(!game.history.contains("blocks your way"));
    }

    #[test]
    fn hostiles_block_the_way() {
        let mut game = game();
        game.world.artifacts.get_mut(GATE).unwrap().is_open = true;
        game.input("n");
        assert!(game.in_battle);
        game.input("s");
        assert!(game.history.contains("You can't do that with unfriendlies about!"));
        assert_eq!(game.world.player_room(), Some(ARMORY));
    }

    #[test]
    fn leaving_ends_the_game() {
        let mut game = game();
        game.input("west");
        let message = game.config.exit_message.clone();
        assert!(game.history.contains(&message));
        assert_eq!(game.state(), GameState::Won);
    }

    #[test]
    fn leaving_can_be_declined() {
        let mut game = game();
        game.config.exit_prompt = true;
        game.input("w");
        assert_eq!(
            game.pending_question().map(|q| q.prompt.as_str()),
            Some("Leave this adventure?")
        );
        game.input("no");
        assert_eq!(game.state(), GameState::Active);
        assert!(game.pending_question().is_none());
    }

    #[test]
    fn before_move_can_stop_the_player() {
        let mut game = game();
        game.hooks.register("beforeMove", |_, _| HookResult::Veto);
        game.input("e");
        assert_eq!(game.world.player_room(), Some(COURTYARD));
    }

    #[test]
    fn fleeing_needs_danger() {
        let mut game = game();
        game.input("flee");
        assert!(game.history.contains("Calm down. There is no danger here."));
    }

    #[test]
    fn fleeing_through_a_named_exit() {
        let mut game = game();
        game.world.artifacts.get_mut(GATE).unwrap().is_open = true;
        game.input("n");
        game.input("flee up");
        assert!(game.history.contains("You can't go that way!"));
        game.input("flee s");
        assert_eq!(game.world.player_room(), Some(COURTYARD));
    }
}
