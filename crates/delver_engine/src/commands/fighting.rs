//! Attacks and spells.

use delver_foundation::{ActorId, ArtifactId, Style};
use delver_parser::{Command, CommandError, CommandResult};
use delver_storage::ArtifactKind;
use tracing::debug;

use super::{artifact, local_artifact, local_monster};
use crate::game::Game;
use crate::hooks::Event;
use crate::items::ArtifactDamage;

/// What an attack or blast is aimed at.
enum Target {
    Actor(ActorId),
    Artifact(ArtifactId),
    Nothing,
}

/// Resolves the argument of `attack` and `blast`. With no argument a random
/// hostile is picked; monsters win over artifacts of the same name.
fn find_target(game: &mut Game, arg: &str) -> Result<Target, CommandError> {
    if arg.is_empty() {
        return game
            .choose_target(ActorId::PLAYER)
            .map(Target::Actor)
            .ok_or_else(|| CommandError::refused("Calm down. There are no hostile monsters here."));
    }
    if let Some(monster) = local_monster(game, arg) {
        return Ok(Target::Actor(ActorId::Monster(monster)));
    }
    Ok(local_artifact(game, arg).map_or(Target::Nothing, Target::Artifact))
}

/// Fights a monster, or smashes a door or chest.
#[derive(Clone, Copy, Debug, Default)]
pub struct AttackCommand;

impl Command<Game> for AttackCommand {
    fn name(&self) -> &str {
        "attack"
    }

    fn verbs(&self) -> &[&'static str] {
        &["attack"]
    }

    fn description(&self) -> &str {
        "Attacks a monster, or sometimes an artifact like a locked door or chest"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if game.world.player()?.armament.weapon().is_none() {
            return Err(CommandError::refused("You don't have a weapon ready!"));
        }
        match find_target(game, arg)? {
            Target::Actor(target) => {
                let monster = target.monster();
                if game.allows(Event::AttackMonster {
                    arg: arg.to_string(),
                    target: monster,
                }) {
                    game.hurt_feelings(monster);
                    game.attack(ActorId::PLAYER, target)?;
                }
            }
            Target::Artifact(id) => {
                if !game.allows(Event::AttackArtifact {
                    arg: arg.to_string(),
                    artifact: id,
                }) {
                    return Ok(());
                }
                let item = artifact(game, id)?;
                if item.kind == ArtifactKind::DisguisedMonster {
                    game.reveal_disguised_monster(id)?;
                    return Ok(());
                }
                match game.injure_artifact(id, false)? {
                    ArtifactDamage::Unbreakable => game.history.write("Nothing happens.", Style::Normal),
                    ArtifactDamage::NotAttackable => {
                        return Err(CommandError::refused(format!("Why would you attack a {}?", item.name)));
                    }
                    outcome => debug!(artifact = %id, ?outcome, "artifact attacked"),
                }
            }
            Target::Nothing => return Err(CommandError::refused("Attack whom?")),
        }
        Ok(())
    }
}

// =============================================================================
// Spells
// =============================================================================

/// Casts POWER.
#[derive(Clone, Copy, Debug, Default)]
pub struct PowerCommand;

impl Command<Game> for PowerCommand {
    fn name(&self) -> &str {
        "power"
    }

    fn verbs(&self) -> &[&'static str] {
        &["power"]
    }

    fn description(&self) -> &str {
        "Casts the POWER spell, which does something different in every adventure"
    }

    fn run(&self, _verb: &str, _arg: &str, game: &mut Game) -> CommandResult {
        game.cast_power();
        Ok(())
    }
}

/// Casts HEAL on the player or someone in the room.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealCommand;

impl Command<Game> for HealCommand {
    fn name(&self) -> &str {
        "heal"
    }

    fn verbs(&self) -> &[&'static str] {
        &["heal"]
    }

    fn description(&self) -> &str {
        "Casts the HEAL spell on you, or on someone else"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if !game.allows(Event::Heal { arg: arg.to_string() }) {
            return Ok(());
        }
        let target = if arg.is_empty() {
            None
        } else {
            let monster = local_monster(game, arg).ok_or_else(|| CommandError::refused("No one here by that name."))?;
            Some(monster)
        };
        game.cast_heal(target);
        Ok(())
    }
}

/// Casts BLAST at a monster or an artifact.
#[derive(Clone, Copy, Debug, Default)]
pub struct BlastCommand;

impl Command<Game> for BlastCommand {
    fn name(&self) -> &str {
        "blast"
    }

    fn verbs(&self) -> &[&'static str] {
        &["blast"]
    }

    fn description(&self) -> &str {
        "Casts the BLAST spell at a monster, or at a door or chest"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        if !game.spell_cast(delver_storage::Spell::Blast) {
            return Ok(());
        }
        match find_target(game, arg)? {
            Target::Actor(target) => game.blast_monster(arg, target.monster())?,
            Target::Artifact(id) => {
                if let Some(ArtifactDamage::NotAttackable) = game.blast_artifact(arg, id)? {
                    let name = artifact(game, id)?.name;
                    return Err(CommandError::refused(format!("Why would you blast a {name}?")));
                }
            }
            Target::Nothing => return Err(CommandError::refused("Blast whom or what?")),
        }
        Ok(())
    }
}

/// Casts SPEED.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpeedCommand;

impl Command<Game> for SpeedCommand {
    fn name(&self) -> &str {
        "speed"
    }

    fn verbs(&self) -> &[&'static str] {
        &["speed"]
    }

    fn description(&self) -> &str {
        "Casts the SPEED spell, doubling your agility for a while"
    }

    fn run(&self, _verb: &str, arg: &str, game: &mut Game) -> CommandResult {
        game.cast_speed(arg);
        Ok(())
    }
}
