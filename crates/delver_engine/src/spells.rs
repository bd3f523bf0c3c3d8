//! The player's spells.
//!
//! Casting drains the ability to half; it recharges a little every turn up
//! to the original value. A natural 100 burns the spell out for good.

use delver_foundation::{ActorId, ArtifactId, MonsterId, Result, Style};
use delver_storage::Spell;
use tracing::{debug, info};

use crate::game::Game;
use crate::hooks::Event;
use crate::items::ArtifactDamage;

/// Agility multiplier while the speed spell runs.
pub const SPEED_MULTIPLIER: i32 = 2;

impl Game {
    /// Rolls to cast a spell. Returns true if it worked.
    pub fn spell_cast(&mut self, spell: Spell) -> bool {
        let ability = self
            .world
            .player()
            .ok()
            .and_then(|p| p.player.as_ref())
            .map_or(0, |profile| profile.spell_abilities.get(spell));
        if ability <= 0 {
            self.history.write("You don't know that spell!", Style::Normal);
            return false;
        }
        if !self.allows(Event::BeforeSpell { spell }) {
            return false;
        }

        let roll = self.dice.roll(1, 100);
        if roll == 100 {
            if self.allows(Event::SpellBacklash { spell }) {
                self.history.write(
                    format!(
                        "The strain of attempting to cast {} overloads your brain and you forget it completely for the rest of this adventure.",
                        spell.name().to_uppercase()
                    ),
                    Style::Danger,
                );
                self.with_profile(|profile| *profile.spell_abilities.get_mut(spell) = 0);
                info!(?spell, "spell forgotten");
            }
            return false;
        }

        let success = roll <= ability || roll <= 5;
        if success {
            let increase = self.dice.roll(1, 100);
            let original = self
                .world
                .player()
                .ok()
                .and_then(|p| p.player.as_ref())
                .map_or(0, |profile| profile.spell_abilities_original.get(spell));
            if increase > original {
                self.with_profile(|profile| *profile.spell_abilities_original.get_mut(spell) += 2);
                self.history.write("Spell ability increased!", Style::Success);
            }
        } else {
            self.history.write("Nothing happens.", Style::Normal);
        }
        self.with_profile(|profile| {
            let current = profile.spell_abilities.get_mut(spell);
            *current = (*current + 1) / 2;
        });
        debug!(?spell, roll, success, "spell cast");
        success
    }

    /// Restores drained spell abilities by `amount`, never past the original.
    pub fn recharge_spell_abilities(&mut self, amount: i32) {
        self.with_profile(|profile| {
            for spell in Spell::ALL {
                let original = profile.spell_abilities_original.get(spell);
                let current = profile.spell_abilities.get_mut(spell);
                if *current > 0 && *current < original {
                    *current = (*current + amount).min(original);
                }
            }
        });
    }

    /// Counts down timed spells and ends the ones that run out.
    pub fn decay_spell_counters(&mut self) {
        let mut expired = Vec::new();
        self.with_profile(|profile| {
            for spell in Spell::ALL {
                let counter = profile.spell_counters.get_mut(spell);
                if *counter > 0 {
                    *counter -= 1;
                    if *counter == 0 {
                        expired.push(spell);
                    }
                }
            }
        });
        for spell in expired {
            if spell == Spell::Speed {
                self.history
                    .write("Your speed spell just expired!", Style::Success);
                if let Ok(player) = self.world.player_mut() {
                    player.speed_multiplier = 1;
                }
            }
            self.trigger(Event::SpellExpires { spell });
        }
    }

    fn with_profile(&mut self, change: impl FnOnce(&mut delver_storage::PlayerProfile)) {
        if let Some(profile) = self
            .world
            .player_mut()
            .ok()
            .and_then(|p| p.player.as_mut())
        {
            change(profile);
        }
    }

    // =========================================================================
    // Spell effects
    // =========================================================================

    /// POWER: only what the adventure makes of it.
    pub fn cast_power(&mut self) {
        if self.spell_cast(Spell::Power) {
            let roll = self.dice.roll(1, 100);
            self.trigger(Event::Power { roll });
        }
    }

    /// HEAL on the player, or on a monster in the room.
    pub fn cast_heal(&mut self, target: Option<MonsterId>) {
        if !self.spell_cast(Spell::Heal) {
            return;
        }
        let amount = self.dice.roll(2, 6);
        match target {
            None => {
                self.history
                    .write("Some of your wounds seem to clear up.", Style::Normal);
                self.heal(ActorId::PLAYER, amount);
            }
            Some(monster) => {
                let name = self.actor_name(ActorId::Monster(monster));
                self.history.write(
                    format!("Some of {name}'s wounds seem to clear up."),
                    Style::Normal,
                );
                self.heal(ActorId::Monster(monster), amount);
            }
        }
    }

    /// BLAST at a monster: 2d5 that armor cannot stop. The target takes it personally.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved goes missing.
    pub fn blast_monster(&mut self, arg: &str, target: MonsterId) -> Result<()> {
        let mut damage = self.dice.roll(2, 5);
        if !self.allows(Event::Blast {
            arg: arg.to_string(),
            target,
        }) {
            return Ok(());
        }
        let player = self.actor_name(ActorId::PLAYER);
        let name = self
            .world
            .monsters
            .get(target)
            .map(|m| m.names().display_name())
            .unwrap_or_default();
        self.history
            .write(format!("{player} casts a blast spell at {name}"), Style::Normal);
        self.history.write_compact("--a direct hit!", Style::Success);
        if let Some(adjusted) = self
            .trigger(Event::BlastDamage {
                arg: arg.to_string(),
                target,
                damage,
            })
            .replacement()
        {
            damage = adjusted;
        }
        let dealt = self.injure(ActorId::Monster(target), damage, true, Some(ActorId::PLAYER))?;
        self.statistics.damage_dealt += dealt;
        self.hurt_feelings(target);
        Ok(())
    }

    /// BLAST at a door or chest. `None` when the `attackArtifact` hook took over.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved goes missing.
    pub fn blast_artifact(&mut self, arg: &str, target: ArtifactId) -> Result<Option<ArtifactDamage>> {
        if !self.allows(Event::AttackArtifact {
            arg: arg.to_string(),
            artifact: target,
        }) {
            return Ok(None);
        }
        let outcome = self.injure_artifact(target, true)?;
        if outcome == ArtifactDamage::Unbreakable {
            self.history.write("Nothing happens.", Style::Normal);
        }
        Ok(Some(outcome))
    }

    /// SPEED: doubled agility for 10+1d10 turns. Recasting extends the time.
    pub fn cast_speed(&mut self, arg: &str) {
        if !self.spell_cast(Spell::Speed) {
            return;
        }
        self.trigger(Event::Speed {
            arg: arg.to_string(),
        });
        self.history.write(
            "You can feel the new agility flowing through you!",
            Style::Success,
        );
        let turns = 10 + self.dice.roll(1, 10);
        let running = self
            .world
            .player()
            .ok()
            .and_then(|p| p.player.as_ref())
            .is_some_and(|profile| profile.spell_counters.get(Spell::Speed) > 0);
        if let Ok(player) = self.world.player_mut() {
            if !running {
                player.speed_multiplier = SPEED_MULTIPLIER;
            }
            if let Some(profile) = player.player.as_mut() {
                *profile.spell_counters.get_mut(Spell::Speed) += turns;
            }
        }
    }
}
