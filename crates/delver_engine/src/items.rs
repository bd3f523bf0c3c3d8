//! Artifact behavior: revealing, containers, doors, consumables, light, and
//! attacks on objects.

use delver_foundation::{ActorId, ArtifactId, EffectId, Result, Style};
use delver_storage::{ArtifactKind, Location};
use tracing::debug;

use crate::game::Game;
use crate::hooks::Event;

/// What an attack on an artifact did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactDamage {
    /// A body hacked to bits.
    Destroyed,
    /// A door or container took this much damage.
    Damaged(i32),
    /// A door or container that cannot be broken.
    Unbreakable,
    /// Attacking it makes no sense.
    NotAttackable,
}

impl Game {
    // =========================================================================
    // Light
    // =========================================================================

    /// Burns one turn of fuel from every lit light source.
    ///
    /// Lights without a fuel count, or with -1, burn forever.
    pub fn burn_light_sources(&mut self) {
        let burning = self.world.artifacts.ids_where(|a| {
            a.kind == ArtifactKind::LightSource && a.is_lit && a.quantity.is_some_and(|q| q != -1)
        });
        for id in burning {
            let Some(light) = self.world.artifacts.get_mut(id) else {
                continue;
            };
            let fuel = light.quantity.unwrap_or(0) - 1;
            light.quantity = Some(fuel.max(0));
            let name = light.name.clone();
            if fuel <= 0 {
                light.is_lit = false;
                self.history
                    .write(format!("Your {name} just went out!"), Style::Warning);
            } else if fuel < 10 {
                self.history
                    .write(format!("Your {name} is almost out!"), Style::Warning);
            } else if fuel < 20 {
                self.history
                    .write(format!("Your {name} grows dim!"), Style::Normal);
            }
        }
    }

    /// Describes how much fuel a light has left.
    #[must_use]
    pub fn fuel_message(&self, id: ArtifactId) -> Option<&'static str> {
        let light = self.world.artifacts.get(id)?;
        if light.kind != ArtifactKind::LightSource {
            return None;
        }
        let message = match light.quantity {
            None | Some(-1) => return None,
            Some(q) if q >= 25 => "It has a lot of fuel left.",
            Some(q) if q >= 10 => "It has some fuel left.",
            Some(q) if q > 0 => "It is low on fuel.",
            Some(_) => "It is out of fuel.",
        };
        Some(message)
    }

    // =========================================================================
    // Revealing
    // =========================================================================

    /// Turns an embedded or hidden artifact into a normal one.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn reveal_artifact(&mut self, id: ArtifactId) -> Result<()> {
        let player_room = self.world.player_room();
        let here = self.world.artifacts.is_here(id, player_room);
        let artifact = self.world.artifacts.require_mut(id)?;
        if artifact.hidden {
            self.statistics.secret_doors_found += 1;
        }
        artifact.embedded = false;
        artifact.hidden = false;
        let first_sight = !artifact.seen && here;
        artifact.seen |= here;
        let linked = artifact.linked_door_id.filter(|_| artifact.is_door());
        let open_container = artifact.is_container() && artifact.is_open;

        if first_sight {
            self.show_artifact_description(id);
        }
        if let Some(other) = linked.and_then(|d| self.world.artifacts.get_mut(d)) {
            other.embedded = false;
            other.hidden = false;
        }
        self.refresh_visible();
        if open_container {
            self.print_contents(id)?;
        }
        debug!(artifact = %id, "artifact revealed");
        self.trigger(Event::RevealArtifact { artifact: id });
        Ok(())
    }

    /// Prints the effects an artifact carries, in order.
    pub fn print_artifact_effects(&mut self, id: ArtifactId, style: Option<Style>) {
        let Some(artifact) = self.world.artifacts.get(id) else {
            return;
        };
        let Some(first) = artifact.effect_id else {
            return;
        };
        for offset in 0..artifact.num_effects {
            self.print_effect_with(EffectId(first.get() + offset), style, false);
        }
    }

    /// Unmasks a disguised monster: prints its effects, puts the monster in
    /// the room, and removes the disguise.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved does not exist.
    pub fn reveal_disguised_monster(&mut self, id: ArtifactId) -> Result<()> {
        self.print_artifact_effects(id, Some(Style::Special));
        let monster = self.world.artifacts.require(id)?.bound_monster;
        self.world.destroy_artifact(id)?;
        if let Some(monster) = monster {
            let room = self.world.player_room();
            self.move_monster(ActorId::Monster(monster), room);
            self.check_reaction(monster);
            self.update_inventory(ActorId::Monster(monster))?;
        }
        self.refresh_visible();
        Ok(())
    }

    /// Frees the captive of a bound-monster artifact. Other artifacts are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved does not exist.
    pub fn free_bound_monster(&mut self, id: ArtifactId) -> Result<()> {
        let artifact = self.world.artifacts.require(id)?;
        if artifact.kind != ArtifactKind::BoundMonster {
            return Ok(());
        }
        let (captive, room) = (artifact.bound_monster, artifact.location.room());
        self.world.destroy_artifact(id)?;
        if let Some(captive) = captive {
            self.move_monster(ActorId::Monster(captive), room);
            self.check_reaction(captive);
        }
        self.refresh_visible();
        Ok(())
    }

    // =========================================================================
    // Containers and doors
    // =========================================================================

    /// Lists what a container holds. Monsters hiding inside jump out.
    ///
    /// # Errors
    ///
    /// Returns an error if the container does not exist.
    pub fn print_contents(&mut self, id: ArtifactId) -> Result<()> {
        self.world.artifacts.require(id)?;
        self.history.write("It contains:", Style::Normal);
        let contents = self.world.artifacts.contents(id);
        let hiding: Vec<_> = self
            .world
            .monsters
            .iter()
            .filter(|m| m.container == Some(id))
            .map(|m| m.id)
            .collect();
        if contents.is_empty() && hiding.is_empty() {
            self.history.write_compact(" - (nothing)", Style::Normal);
        }
        let room = self.world.artifact_room(id).or(self.world.player_room());
        for monster in hiding {
            if let Some(name) = self.world.monsters.get(monster).map(|m| m.names().display_name()) {
                self.history.write_compact(format!(" - {name}"), Style::Normal);
            }
            self.move_monster(ActorId::Monster(monster), room);
            self.skip_battle_actions = true;
        }
        for item in contents {
            if let Some(name) = self.world.artifacts.get(item).map(|a| a.names().display_name()) {
                self.history.write_compact(format!(" - {name}"), Style::Normal);
            }
        }
        self.refresh_visible();
        Ok(())
    }

    /// Opens a door or container, and the other side of a two-sided door.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn open_artifact(&mut self, id: ArtifactId) -> Result<()> {
        let artifact = self.world.artifacts.require_mut(id)?;
        artifact.is_open = true;
        let linked = artifact.linked_door_id.filter(|_| artifact.is_door());
        if let Some(other) = linked.filter(|d| self.world.artifacts.contains(*d)) {
            self.reveal_artifact(other)?;
            self.world.artifacts.require_mut(other)?.is_open = true;
        }
        Ok(())
    }

    /// Closes a door or container, and the other side of a two-sided door.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn close_artifact(&mut self, id: ArtifactId) -> Result<()> {
        let artifact = self.world.artifacts.require_mut(id)?;
        artifact.is_open = false;
        let linked = artifact.linked_door_id.filter(|_| artifact.is_door());
        if let Some(other) = linked.and_then(|d| self.world.artifacts.get_mut(d)) {
            other.is_open = false;
        }
        Ok(())
    }

    // =========================================================================
    // Consumables
    // =========================================================================

    /// Uses an artifact: heals or poisons whoever holds it, lets the `use`
    /// hook run, and counts down servings.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved does not exist.
    pub fn use_artifact(&mut self, id: ArtifactId) -> Result<()> {
        let artifact = self.world.artifacts.require(id)?;
        let name = artifact.name.clone();
        let consumable = matches!(artifact.kind, ArtifactKind::Edible | ArtifactKind::Drinkable);
        let (dice, sides) = (artifact.dice, artifact.sides);
        let owner = match artifact.location {
            Location::Carried(actor) => Some(actor),
            Location::Room(room) if Some(room) == self.world.player_room() => Some(ActorId::PLAYER),
            _ => None,
        };

        if let (true, Some(owner)) = (consumable && dice != 0, owner) {
            if dice > 0 {
                let amount = self.dice.roll(dice, sides);
                let who = self.actor_name(owner);
                self.history
                    .write(format!("It heals {who} {amount} hit points."), Style::Normal);
                self.heal(owner, amount);
            } else {
                self.history.write("Yuck! It was poison!", Style::Warning);
                let damage = self.dice.roll(dice.abs(), sides);
                self.injure(owner, damage, true, None)?;
            }
        }

        self.trigger(Event::Use {
            arg: name.clone(),
            artifact: id,
        });

        let artifact = self.world.artifacts.require_mut(id)?;
        if let Some(quantity) = artifact.quantity {
            let left = (quantity - 1).max(0);
            artifact.quantity = Some(left);
            if left == 0 {
                self.history
                    .write(format!("The {name} is all gone!"), Style::Normal);
                self.world.destroy_artifact(id)?;
                self.refresh_visible();
            }
        }
        Ok(())
    }

    /// "There are N swallows remaining." and the like.
    #[must_use]
    pub fn servings_message(&self, id: ArtifactId) -> Option<String> {
        let artifact = self.world.artifacts.get(id)?;
        let unit = match artifact.kind {
            ArtifactKind::Edible => "bite",
            ArtifactKind::Drinkable => "swallow",
            _ => return None,
        };
        let quantity = artifact.quantity?;
        Some(if quantity == 1 {
            format!("There is 1 {unit} remaining.")
        } else {
            format!("There are {quantity} {unit}s remaining.")
        })
    }

    // =========================================================================
    // Attacking objects
    // =========================================================================

    /// Hits an artifact with the player's weapon, or blasts it with a spell.
    ///
    /// Bodies are destroyed. Doors and containers with hardiness take
    /// damage and smash when it runs out: containers spill and vanish, doors
    /// swing open on both sides.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved does not exist.
    pub fn injure_artifact(&mut self, id: ArtifactId, spell: bool) -> Result<ArtifactDamage> {
        let artifact = self.world.artifacts.require(id)?;
        let name = artifact.name.clone();
        match artifact.kind {
            ArtifactKind::DeadBody => {
                let verb = if spell { "blast" } else { "hack" };
                self.history
                    .write(format!("You {verb} it to bits."), Style::Normal);
                self.world.destroy_artifact(id)?;
                self.refresh_visible();
                Ok(ArtifactDamage::Destroyed)
            }
            ArtifactKind::Container | ArtifactKind::Door => {
                let Some(hardiness) = artifact.hardiness else {
                    return Ok(ArtifactDamage::Unbreakable);
                };
                let is_container = artifact.kind == ArtifactKind::Container;
                let linked = artifact.linked_door_id;
                let damage = self.player_damage_roll();
                let line = if spell {
                    format!("Zap! You blast the {name}!")
                } else {
                    format!("Wham! You hit the {name}!")
                };
                self.history.write(line, Style::Normal);
                let left = hardiness - damage;
                let artifact = self.world.artifacts.require_mut(id)?;
                artifact.hardiness = Some(left);
                if left <= 0 {
                    artifact.is_broken = true;
                    self.history
                        .write(format!("The {name} smashes to pieces!"), Style::Normal);
                    if is_container {
                        let room = self.world.artifact_room(id).or(self.world.player_room());
                        for item in self.world.artifacts.contents(id) {
                            match room {
                                Some(room) => self.world.move_artifact_to_room(item, room)?,
                                None => self.world.destroy_artifact(item)?,
                            }
                        }
                        self.world.destroy_artifact(id)?;
                    } else {
                        self.world.artifacts.require_mut(id)?.is_open = true;
                        if let Some(other) = linked.filter(|d| self.world.artifacts.contains(*d)) {
                            self.reveal_artifact(other)?;
                            let other = self.world.artifacts.require_mut(other)?;
                            other.is_open = true;
                            other.is_broken = true;
                        }
                    }
                    self.refresh_visible();
                }
                Ok(ArtifactDamage::Damaged(damage))
            }
            _ => Ok(ArtifactDamage::NotAttackable),
        }
    }

    /// Damage of the player's ready weapon, or bare hands.
    fn player_damage_roll(&mut self) -> i32 {
        let (dice, sides) = match self.world.weapon(ActorId::PLAYER) {
            Some(weapon) => (weapon.dice, weapon.sides),
            None => self
                .world
                .player()
                .map_or((1, 2), |p| (p.weapon_dice, p.weapon_sides)),
        };
        self.dice.roll(dice, sides)
    }
}
