//! Looking around, reading, and checking inventories.

use delver_foundation::{ActorId, Style};
use delver_parser::{Command, CommandError, CommandResult};
use delver_storage::ArtifactKind;

use super::{artifact, is_scenery, local_artifact, local_monster};
use crate::game::Game;
use crate::hooks::Event;

/// True if the room description mentions a sign, which can be looked at or read.
fn room_has_sign(game: &Game) -> bool {
    game.world
        .current_room()
        .is_some_and(|r| r.description.contains("sign"))
}

fn show_current_room(game: &mut Game) {
    if let Some(room) = game.world.player_room() {
        game.show_room_description(room);
    }
}

/// Describes the room, an artifact, or a monster.
#[derive(Clone, Copy, Debug, Default)]
pub struct LookCommand;

impl Command<Game> for LookCommand {
    fn name(&self) -> &str {
        "look"
    }

    fn verbs(&self) -> &[&'static str] {
        &["look", "examine"]
    }

    fn description(&self) -> &str {
        "Inspects a room, artifact, or monster"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if !game.allows(Event::Look { arg: arg.to_string() }) {
            return Ok(());
        }
        if !game.world.has_light() {
            return Ok(());
        }
        if arg.is_empty() {
            show_current_room(game);
            return Ok(());
        }

        let mut found = false;
        if let Some(id) = local_artifact(game, arg) {
            found = true;
            let item = artifact(game, id)?;
            if item.embedded {
                game.reveal_artifact(id)?;
            } else {
                game.show_artifact_description(id);
            }

            let hidden = game.world.artifacts.contents(id);
            if !item.is_container() && !hidden.is_empty() {
                game.history.write("You found something!", Style::Normal);
                if let Some(room) = game.world.player_room() {
                    for inner in hidden {
                        game.world.move_artifact_to_room(inner, room)?;
                    }
                }
                game.refresh_visible();
            }

            if let Some(servings) = game.servings_message(id) {
                game.history.write(servings, Style::Normal);
            }
            if item.kind == ArtifactKind::LightSource {
                let fuel = game.fuel_message(id).unwrap_or("It has a lot of fuel left.");
                game.history.write(fuel, Style::Normal);
            }
        }

        let player_matches = game.world.player().is_ok_and(|p| p.matches(arg));
        if player_matches {
            found = true;
            game.history.write("You see yourself.", Style::Normal);
            game.show_health(ActorId::PLAYER);
        } else if let Some(id) = local_monster(game, arg) {
            found = true;
            let description = game.require_monster(id)?.description.clone();
            game.history.write(description, Style::Normal);
            game.print_inventory(ActorId::Monster(id));
            game.show_health(ActorId::Monster(id));
        }

        if !found {
            if arg == "sign" && room_has_sign(game) {
                show_current_room(game);
            } else if is_scenery(game, arg) {
                game.history.write("You see nothing special.", Style::Normal);
            } else {
                return Err(CommandError::refused(format!("I see no {arg} here!")));
            }
        }
        Ok(())
    }
}

/// Reads markings on an artifact.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReadCommand;

impl Command<Game> for ReadCommand {
    fn name(&self) -> &str {
        "read"
    }

    fn verbs(&self) -> &[&'static str] {
        &["read"]
    }

    fn description(&self) -> &str {
        "Reads a book, scroll, sign, or inscription"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if !game.world.has_light() {
            return Err(CommandError::refused("You can't read in the dark!"));
        }
        if arg.is_empty() {
            return Err(CommandError::refused("Read what?"));
        }

        let target = local_artifact(game, arg);
        if !game.allows(Event::BeforeRead {
            arg: arg.to_string(),
            artifact: target,
        }) {
            return Ok(());
        }

        let Some(id) = target else {
            if ["wall", "door", "floor", "ceiling"].contains(&arg) {
                game.history.write("There are no markings to read!", Style::Normal);
            } else if arg == "sign" && room_has_sign(game) {
                show_current_room(game);
            } else {
                game.history
                    .write(format!("There is no {arg} here!"), Style::Normal);
            }
            return Ok(());
        };

        let item = artifact(game, id)?;
        let revealed = item.embedded;
        if revealed {
            game.reveal_artifact(id)?;
        }
        if item.effect_id.is_some() && !item.is_container() {
            game.print_artifact_effects(id, None);
        } else if item.kind == ArtifactKind::Readable {
            if !revealed {
                game.show_artifact_description(id);
            }
        } else {
            game.history
                .write(format!("{} has no markings to read!", item.name), Style::Normal);
        }
        game.trigger(Event::AfterRead {
            arg: arg.to_string(),
            artifact: Some(id),
        });
        Ok(())
    }
}

/// Lists what the player, or someone in the room, is carrying.
#[derive(Clone, Copy, Debug, Default)]
pub struct InventoryCommand;

impl Command<Game> for InventoryCommand {
    fn name(&self) -> &str {
        "inventory"
    }

    fn verbs(&self) -> &[&'static str] {
        &["inventory", "i"]
    }

    fn description(&self) -> &str {
        "Shows what you, or someone else, is carrying"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        let actor = if arg.is_empty() {
            ActorId::PLAYER
        } else {
            let id = local_monster(game, arg).ok_or_else(|| CommandError::refused("No one here by that name!"))?;
            ActorId::Monster(id)
        };
        game.print_inventory(actor);
        game.show_health(actor);
        Ok(())
    }
}
