//! Monster behavior: reactions, movement, inventory, and combat.
//!
//! Everything here narrates, so it lives on [`Game`] rather than on the
//! storage records. Group monsters are addressed by their parent id; the
//! operations that touch one body pick a living member in the player's room.

use delver_foundation::{ActorId, ArtifactId, Error, MemberKey, MonsterId, Result, RoomId, Style};
use delver_storage::room::long_direction;
use delver_storage::{Armament, Artifact, ArtifactKind, CombatCode, Friendliness, Location, Monster, Reaction, Spell, Status, WeaponType};
use tracing::{debug, info};

use crate::combat::{self, Attacker, CriticalEffect, Defender, Fumble, HitRoll};
use crate::game::Game;
use crate::hooks::Event;

/// Attack verbs, indexed by weapon type code. Zero is natural weapons.
const ATTACK_VERBS: [&[&str]; 6] = [
    &["lunges", "tears", "claws"],
    &["swings", "chops", "swings"],
    &["shoots"],
    &["swings"],
    &["stabs", "lunges", "jabs"],
    &["swings", "chops", "stabs"],
];

/// Miss verbs, indexed the same way.
const MISS_VERBS: [&[&str]; 6] = [
    &["missed", "missed"],
    &["dodged", "missed"],
    &["missed", "missed"],
    &["dodged", "missed"],
    &["dodged", "missed"],
    &["parried", "missed"],
];

/// Group members that act in one turn.
const GROUP_ACTIONS_PER_TURN: usize = 5;

impl Game {
    // =========================================================================
    // Lookups
    // =========================================================================

    /// Name of an actor, or an empty string if it is gone.
    #[must_use]
    pub fn actor_name(&self, actor: ActorId) -> String {
        self.world
            .monsters
            .actor(actor)
            .map(|m| m.name.clone())
            .unwrap_or_default()
    }

    /// Name with the article, as used in attack lines.
    fn actor_display_name(&self, actor: ActorId) -> String {
        self.world
            .monsters
            .actor(actor)
            .map(|m| m.names().display_name())
            .unwrap_or_default()
    }

    /// Living members of a group that are in the player's room.
    #[must_use]
    pub fn members_here(&self, parent: MonsterId) -> Vec<MemberKey> {
        self.world
            .monsters
            .members_in_room(parent, self.world.player_room())
    }

    /// Alive, counting any living member of a group.
    #[must_use]
    pub fn is_alive(&self, id: MonsterId) -> bool {
        if self.world.monsters.has_members(id) {
            return self.world.monsters.members_of(id).any(Monster::is_alive);
        }
        self.world.monsters.get(id).is_some_and(Monster::is_alive)
    }

    /// Alive and in the world, counting any active member of a group.
    #[must_use]
    pub fn is_active(&self, id: MonsterId) -> bool {
        if self.world.monsters.has_members(id) {
            return self.world.monsters.members_of(id).any(Monster::is_active);
        }
        self.world.monsters.get(id).is_some_and(Monster::is_active)
    }

    // =========================================================================
    // Reactions
    // =========================================================================

    /// Decides how a monster feels about the player, and passes it on to
    /// the members of a group.
    pub fn check_reaction(&mut self, id: MonsterId) {
        let charisma = self.world.player().map_or(10, |p| p.charisma);
        let Some(monster) = self.world.monsters.get(id) else {
            return;
        };
        let reaction = match monster.fixed_reaction() {
            Some(reaction) => reaction,
            None => {
                let odds = monster.friend_odds + (charisma - 10) * 2;
                if self.dice.roll(1, 100) <= odds {
                    Reaction::Friend
                } else if self.dice.roll(1, 100) <= odds {
                    Reaction::Neutral
                } else {
                    Reaction::Hostile
                }
            }
        };
        self.set_reaction(id, reaction);
    }

    /// Sets a monster's reaction, members included.
    pub fn set_reaction(&mut self, id: MonsterId, reaction: Reaction) {
        if let Some(monster) = self.world.monsters.get_mut(id) {
            monster.reaction = reaction;
        }
        for key in self.world.monsters.member_keys(id) {
            if let Some(member) = self.world.monsters.actor_mut(ActorId::Member(key)) {
                member.reaction = reaction;
            }
        }
        debug!(monster = %id, ?reaction, "reaction set");
        self.in_battle = self.world.hostile_present();
    }

    /// Rechecks the reaction of a monster the player has mistreated.
    ///
    /// Friend odds halve each time. A neutral monster never turns friendly this way.
    pub fn hurt_feelings(&mut self, id: MonsterId) {
        let Some(monster) = self.world.monsters.get_mut(id) else {
            return;
        };
        if monster.reaction == Reaction::Hostile {
            return;
        }
        match monster.friendliness {
            Friendliness::Friend => monster.friend_odds = 100,
            Friendliness::Neutral | Friendliness::Hostile => monster.friend_odds = 50,
            Friendliness::Random => {}
        }
        monster.friendliness = Friendliness::Random;
        monster.friend_odds /= 2;
        let before = monster.reaction;
        self.check_reaction(id);
        if before == Reaction::Neutral
            && self
                .world
                .monsters
                .get(id)
                .is_some_and(|m| m.reaction == Reaction::Friend)
        {
            self.set_reaction(id, Reaction::Neutral);
        }
    }

    /// Rolls against an actor's courage. Returns true if it stands firm.
    ///
    /// With `following` set, this decides whether a hostile chases a fleeing
    /// player: non-pursuers never do, and the player always has a chance.
    pub fn check_courage(&mut self, actor: ActorId, following: bool) -> bool {
        let fear = self.dice.roll(1, 100);
        let Some(monster) = self.world.monsters.actor(actor) else {
            return false;
        };
        let mut courage = f64::from(monster.courage);
        if f64::from(monster.damage) > f64::from(monster.hardiness) * 0.2 {
            courage *= 0.75;
        }
        if following {
            if !monster.pursues {
                return false;
            }
            courage = courage.min(85.0);
        }
        courage >= f64::from(fear)
    }

    // =========================================================================
    // Movement
    // =========================================================================

    /// Moves the player. Friends follow; hostiles follow if they dare.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no player.
    pub fn move_player(&mut self, room: RoomId, monsters_follow: bool) -> Result<()> {
        let followers: Vec<MonsterId> = self.world.monsters.visible().to_vec();
        self.world.player_mut()?.room = Some(room);
        self.world.player_mut()?.container = None;
        if monsters_follow {
            for id in followers {
                let unknown = self
                    .world
                    .monsters
                    .get(id)
                    .is_some_and(|m| m.reaction == Reaction::Unknown);
                if unknown {
                    self.check_reaction(id);
                }
                let moves = match self.world.monsters.get(id).map(|m| m.reaction) {
                    Some(Reaction::Friend) => true,
                    Some(Reaction::Hostile) => self.check_courage(ActorId::Monster(id), true),
                    _ => false,
                };
                if moves {
                    debug!(monster = %id, %room, "monster follows the player");
                    self.move_monster(ActorId::Monster(id), Some(room));
                }
            }
        }
        self.refresh_visible();
        Ok(())
    }

    /// Moves a monster, or the living members of a group that are with it.
    /// `None` removes it from play.
    pub fn move_monster(&mut self, actor: ActorId, room: Option<RoomId>) {
        let from = self.world.actor_room(actor);
        if let ActorId::Monster(parent) = actor {
            let members: Vec<MemberKey> = self
                .world
                .monsters
                .members_of(parent)
                .filter(|m| m.is_alive() && m.room == from)
                .filter_map(|m| m.member)
                .collect();
            for key in members {
                if let Some(member) = self.world.monsters.actor_mut(ActorId::Member(key)) {
                    member.room = room;
                }
            }
        }
        if let Some(monster) = self.world.monsters.actor_mut(actor) {
            monster.room = room;
            monster.container = None;
        }
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Recomputes armor class and the ready weapon, then lets the adventure adjust them.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn update_inventory(&mut self, actor: ActorId) -> Result<()> {
        self.world.refresh_inventory(actor)?;
        self.trigger(Event::ArmorClass { actor });
        Ok(())
    }

    /// An actor picks up an artifact.
    ///
    /// # Errors
    ///
    /// Returns an error for bound monsters and missing records.
    pub fn pick_up(&mut self, actor: ActorId, artifact: ArtifactId) -> Result<()> {
        self.world.move_artifact_to_inventory(artifact, actor)?;
        self.trigger(Event::PickUpArtifact { actor, artifact });
        self.update_inventory(actor)
    }

    /// An actor drops an artifact where they stand.
    ///
    /// # Errors
    ///
    /// Returns an error if either record is missing.
    pub fn drop_artifact(&mut self, actor: ActorId, artifact: ArtifactId) -> Result<()> {
        match self.world.actor_room(actor) {
            Some(room) => self.world.move_artifact_to_room(artifact, room)?,
            None => self.world.destroy_artifact(artifact)?,
        }
        self.trigger(Event::DropArtifact { actor, artifact });
        self.update_inventory(actor)
    }

    /// Readies a weapon.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn ready_weapon(&mut self, actor: ActorId, weapon: ArtifactId) -> Result<()> {
        self.world.monsters.require_mut(actor)?.armament = Armament::Wields(weapon);
        Ok(())
    }

    /// Puts on or takes off a wearable.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is missing.
    pub fn set_worn(&mut self, actor: ActorId, artifact: ArtifactId, worn: bool) -> Result<()> {
        self.world.artifacts.require_mut(artifact)?.is_worn = worn;
        self.update_inventory(actor)
    }

    /// Lists what an actor carries.
    ///
    /// Friends and the player show their full inventory; anyone else only
    /// shows what they fight with.
    pub fn print_inventory(&mut self, actor: ActorId) {
        let Some(monster) = self.world.monsters.actor(actor) else {
            return;
        };
        let name = monster.name.clone();
        let is_player = monster.is_player();
        let gold = monster.gold;
        let max_weight = monster.max_weight();
        let armament = monster.armament;

        if !is_player && monster.reaction != Reaction::Friend {
            let line = match (armament, self.world.weapon(actor)) {
                (_, Some(weapon)) => format!("{name} is armed with: {}", weapon.name),
                (Armament::Natural, None) => format!("{name} is armed with natural weapons."),
                _ => format!("{name} is unarmed."),
            };
            self.history.write(line, Style::Normal);
            return;
        }

        let items: Vec<_> = self
            .world
            .carried(actor)
            .iter()
            .filter_map(|id| self.world.artifacts.get(*id))
            .filter(|a| is_player || a.kind != ArtifactKind::DeadBody)
            .cloned()
            .collect();
        let (worn, carried): (Vec<_>, Vec<_>) = items.into_iter().partition(|a| a.is_worn);

        if !worn.is_empty() {
            self.history.write(format!("{name} is wearing:"), Style::Normal);
            for artifact in &worn {
                self.history
                    .write_compact(format!(" - {}", artifact.name), Style::Normal);
            }
        }
        self.history.write(format!("{name} is carrying:"), Style::Normal);
        if carried.is_empty() {
            self.history.write_compact(" - (nothing)", Style::Normal);
        }
        for artifact in &carried {
            let note = match &artifact.inventory_message {
                Some(message) if !message.is_empty() => message.clone(),
                _ if armament.weapon() == Some(artifact.id) => "(ready weapon)".to_string(),
                _ if artifact.is_lit => "(lit)".to_string(),
                _ => String::new(),
            };
            let line = if note.is_empty() {
                format!(" - {}", artifact.name)
            } else {
                format!(" - {} {note}", artifact.name)
            };
            self.history.write_compact(line, Style::Normal);
        }
        if is_player {
            let money = self.money(gold);
            let weight = self.world.weight_carried(actor);
            self.history.write_compact(format!(" - {money}"), Style::Normal);
            self.history.write_compact(
                format!("Weight carried: {weight} of {max_weight} gronds"),
                Style::Normal,
            );
        }
    }

    // =========================================================================
    // Health
    // =========================================================================

    /// Describes how hurt an actor is.
    pub fn show_health(&mut self, actor: ActorId) {
        if let Some(monster) = self.world.monsters.actor(actor) {
            let (text, style) = monster.health_message();
            self.history.write(text, style);
        }
    }

    /// Picks the body a blow lands on: a random member here for groups.
    fn body_for(&mut self, target: ActorId) -> Option<ActorId> {
        match target {
            ActorId::Monster(parent) if self.world.monsters.has_members(parent) => {
                let here = self.members_here(parent);
                self.random_element(&here).map(ActorId::Member)
            }
            other => self.world.monsters.actor(other).map(|_| other),
        }
    }

    /// Deals damage and handles death. Returns the damage actually done.
    ///
    /// Armor absorbs damage unless `ignore_armor` is set. A group takes the
    /// blow on one random member in the player's room.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved goes missing.
    pub fn injure(
        &mut self,
        target: ActorId,
        damage: i32,
        ignore_armor: bool,
        attacker: Option<ActorId>,
    ) -> Result<i32> {
        let Some(body) = self.body_for(target) else {
            return Ok(0);
        };
        let monster = self.world.monsters.require(body)?;
        let mut damage = damage;
        if monster.armor_class > 0 && !ignore_armor {
            damage = combat::absorb(damage, monster.armor_class);
            if damage <= 0 {
                self.history
                    .write_compact("-- blow bounces off armor!", Style::Normal);
                return Ok(0);
            }
        }
        damage = damage.min(monster.hardiness - monster.damage).max(0);

        let monster = self.world.monsters.require_mut(body)?;
        monster.damage += damage;
        let dead = monster.damage >= monster.hardiness;
        self.show_health(body);
        if body.is_player() {
            self.statistics.damage_taken += damage;
        }
        if dead && monster_alive(self, body) {
            self.kill(body, attacker)?;
        }
        Ok(damage)
    }

    /// Handles a death the `death` hook lets happen.
    fn kill(&mut self, actor: ActorId, attacker: Option<ActorId>) -> Result<()> {
        if !self.allows(Event::Death { actor, attacker }) {
            return Ok(());
        }
        self.world.monsters.require_mut(actor)?.status = Status::Dead;
        for artifact in self.world.carried(actor) {
            self.drop_artifact(actor, artifact)?;
        }
        self.world.place_dead_body(actor)?;

        if let ActorId::Member(key) = actor {
            let group_dead = !self
                .world
                .monsters
                .members_of(key.parent)
                .any(Monster::is_alive);
            if group_dead {
                self.trigger(Event::AfterDeath {
                    actor: ActorId::Monster(key.parent),
                });
            }
        }
        self.trigger(Event::AfterDeath { actor });

        if actor.is_player() {
            if let Some(attacker) = attacker {
                info!(%attacker, "player killed");
            }
            self.player_died();
        } else {
            self.world.monsters.require_mut(actor)?.room = None;
            debug!(%actor, "monster died");
        }
        self.refresh_visible();
        Ok(())
    }

    /// Heals an actor, or a random member of a group in the player's room.
    pub fn heal(&mut self, target: ActorId, amount: i32) {
        let Some(body) = self.body_for(target) else {
            return;
        };
        if let Some(monster) = self.world.monsters.actor_mut(body) {
            monster.damage = (monster.damage - amount).max(0);
        }
        self.show_health(body);
    }

    /// Takes a monster and all its members out of play.
    pub fn destroy_monster(&mut self, id: MonsterId) {
        for key in self.world.monsters.member_keys(id) {
            if let Some(member) = self.world.monsters.actor_mut(ActorId::Member(key)) {
                member.room = None;
            }
        }
        if let Some(monster) = self.world.monsters.get_mut(id) {
            monster.room = None;
        }
        self.refresh_visible();
    }

    /// Brings a dead monster back in the player's room and removes its body.
    ///
    /// # Errors
    ///
    /// Returns an error if the monster does not exist.
    pub fn resurrect(&mut self, actor: ActorId) -> Result<()> {
        let room = self.world.player_room();
        let monster = self.world.monsters.require_mut(actor)?;
        monster.room = room;
        monster.damage = 0;
        monster.status = Status::Alive;
        let body = monster.dead_body_id;
        if let Some(body) = body.filter(|b| self.world.artifacts.contains(*b)) {
            self.world.destroy_artifact(body)?;
        }
        self.refresh_visible();
        Ok(())
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// Adds a member to a group, armed with natural weapons.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist.
    pub fn spawn_member(&mut self, parent: MonsterId) -> Result<MemberKey> {
        let index = self.world.monsters.next_member_index(parent);
        let group = self.world.monsters.require_mut(ActorId::Monster(parent))?;
        group.count += 1;
        let mut member = group.clone();
        let key = MemberKey::new(parent, index);
        member.member = Some(key);
        member.description = String::new();
        member.count = 1;
        member.armament = Armament::Natural;
        member.damage = 0;
        member.status = Status::Alive;
        member.seen = true;
        member.player = None;
        self.world.monsters.add_member(member)?;
        self.refresh_visible();
        Ok(key)
    }

    /// Removes the last `count` members of a group. A group left empty leaves play.
    pub fn remove_members(&mut self, parent: MonsterId, count: usize) {
        let keys = self.world.monsters.member_keys(parent);
        let keep = keys.len().saturating_sub(count);
        for key in &keys[keep..] {
            self.world.monsters.remove_member(*key);
        }
        if let Some(group) = self.world.monsters.get_mut(parent) {
            group.count = u16::try_from(keep).unwrap_or(u16::MAX);
        }
        if keep == 0 {
            self.destroy_monster(parent);
        } else {
            self.refresh_visible();
        }
    }

    // =========================================================================
    // Battle
    // =========================================================================

    /// One monster's turn in a battle.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved goes missing.
    pub fn battle_actions(&mut self, id: MonsterId) -> Result<()> {
        if self.world.monsters.has_members(id) {
            self.group_battle_actions(id)
        } else {
            self.single_battle_actions(ActorId::Monster(id))
        }
    }

    fn group_battle_actions(&mut self, parent: MonsterId) -> Result<()> {
        let Some(group) = self.world.monsters.get(parent) else {
            return Ok(());
        };
        if self.skip_battle_actions
            || group.reaction == Reaction::Neutral
            || group.combat_code == CombatCode::NeverFight
        {
            return Ok(());
        }
        let (name, plural) = (group.name.clone(), group.plural_name());
        if !self.allows(Event::MonsterAction {
            actor: ActorId::Monster(parent),
        }) {
            return Ok(());
        }

        if self.has_good_exits(self.world.player_room()) {
            let mut chickens = Vec::new();
            for key in self.members_here(parent) {
                if !self.check_courage(ActorId::Member(key), false) {
                    chickens.push(key);
                }
            }
            match chickens.len() {
                0 => {}
                1 => self.history.write(format!("{name} flees!"), Style::Warning),
                n => self
                    .history
                    .write(format!("{n} {plural} flee!"), Style::Warning),
            }
            for key in chickens {
                self.flee_single(ActorId::Member(key), false);
            }
        }

        let fighters: Vec<MemberKey> = self
            .members_here(parent)
            .into_iter()
            .take(GROUP_ACTIONS_PER_TURN)
            .collect();
        for key in fighters {
            if self.is_over() {
                break;
            }
            self.single_battle_actions(ActorId::Member(key))?;
        }
        self.refresh_visible();
        Ok(())
    }

    fn single_battle_actions(&mut self, actor: ActorId) -> Result<()> {
        let monster = self.world.monsters.require(actor)?;
        if self.skip_battle_actions || monster.reaction == Reaction::Neutral || !monster.is_alive() {
            return Ok(());
        }
        if !self.allows(Event::MonsterAction { actor }) {
            return Ok(());
        }

        if !actor.is_player()
            && actor.member().is_none()
            && self.has_good_exits(self.world.actor_room(actor))
            && !self.check_courage(actor, false)
        {
            self.flee(actor);
            return Ok(());
        }

        let monster = self.world.monsters.require(actor)?;
        if monster.combat_code == CombatCode::NeverFight {
            return Ok(());
        }

        if let Some(weapon) = self.weapon_to_pick_up(actor) {
            let name = self.actor_name(actor);
            let weapon_name = self.world.artifacts.require(weapon)?.name.clone();
            self.history
                .write(format!("{name} picks up {weapon_name}."), Style::Normal);
            self.pick_up(actor, weapon)?;
            self.ready_weapon(actor, weapon)?;
            return Ok(());
        }

        if self.cast_monster_spell(actor)? {
            return Ok(());
        }

        if self.can_attack(actor) {
            if let Some(target) = self.choose_target(actor) {
                self.attack(actor, target)?;
            }
        }
        Ok(())
    }

    /// A weapon lying here that the monster wants, if any.
    fn weapon_to_pick_up(&self, actor: ActorId) -> Option<ArtifactId> {
        let monster = self.world.monsters.actor(actor)?;
        let wants = match monster.armament {
            Armament::Unarmed | Armament::SeeksAny | Armament::Seeks(_) => true,
            Armament::Natural => monster.combat_code == CombatCode::WeaponIfAvailable,
            Armament::Wields(_) => false,
        };
        if !wants {
            return None;
        }
        let lying_here = self.world.artifacts.in_player_room();
        if let Armament::Seeks(sought) = monster.armament {
            if lying_here.contains(&sought) {
                return Some(sought);
            }
        }
        self.world
            .artifacts
            .visible()
            .iter()
            .copied()
            .find(|id| self.world.artifacts.get(*id).is_some_and(|a| a.is_weapon()))
    }

    /// Lets a spellcasting monster heal itself or blast someone. Returns true if it did.
    fn cast_monster_spell(&mut self, actor: ActorId) -> Result<bool> {
        let monster = self.world.monsters.require(actor)?;
        if monster.spells.is_empty() || monster.spell_points <= 0 {
            return Ok(false);
        }
        let name = monster.name.clone();
        let knows_heal = monster.spells.contains(&Spell::Heal);
        let knows_blast = monster.spells.contains(&Spell::Blast);
        let hurt = f64::from(monster.damage) > f64::from(monster.hardiness) * 0.4;
        let frequency = monster.spell_frequency;
        if self.dice.roll(1, 100) > frequency {
            return Ok(false);
        }

        if knows_heal && hurt {
            self.history
                .write(format!("{name} casts a heal spell!"), Style::Normal);
            let amount = self.dice.roll(2, 6);
            self.heal(actor, amount);
            self.world.monsters.require_mut(actor)?.spell_points -= 1;
            return Ok(true);
        }
        if knows_blast {
            if let Some(target) = self.choose_target(actor) {
                let damage = self.dice.roll(2, 5);
                let target_name = self.actor_name(target);
                self.history.write(
                    format!("{name} casts a Blast spell at {target_name}!"),
                    Style::Normal,
                );
                self.history.write("--a direct hit!", Style::Success);
                self.injure(target, damage, true, Some(actor))?;
                self.world.monsters.require_mut(actor)?.spell_points -= 1;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Has a weapon, natural weapons, or will fight with whatever it finds.
    #[must_use]
    pub fn can_attack(&self, actor: ActorId) -> bool {
        let Some(monster) = self.world.monsters.actor(actor) else {
            return false;
        };
        if monster.combat_code == CombatCode::NeverFight {
            return false;
        }
        self.world.weapon(actor).is_some()
            || monster.armament == Armament::Natural
            || monster.combat_code == CombatCode::WeaponIfAvailable
    }

    /// Picks someone to fight. Friends go after hostiles; hostiles go after
    /// the player and the player's friends. The `chooseTarget` hook may redirect.
    pub fn choose_target(&mut self, actor: ActorId) -> Option<ActorId> {
        let reaction = self.world.monsters.actor(actor)?.reaction;
        let wanted = match reaction {
            Reaction::Friend => Reaction::Hostile,
            Reaction::Hostile => Reaction::Friend,
            Reaction::Neutral | Reaction::Unknown => return None,
        };
        let mut candidates: Vec<ActorId> = Vec::new();
        if let Ok(player) = self.world.player() {
            if player.is_alive() && wanted == Reaction::Friend {
                candidates.push(ActorId::PLAYER);
            }
        }
        candidates.extend(
            self.world
                .monsters
                .visible()
                .iter()
                .filter(|id| {
                    self.world
                        .monsters
                        .get(**id)
                        .is_some_and(|m| m.reaction == wanted)
                })
                .filter(|id| self.is_alive(**id))
                .map(|id| ActorId::Monster(*id)),
        );
        let target = self.random_element(&candidates)?;
        let chosen = self
            .trigger(Event::ChooseTarget { actor, target })
            .redirect()
            .unwrap_or(target);
        Some(chosen)
    }

    fn has_good_exits(&self, room: Option<RoomId>) -> bool {
        room.and_then(|r| self.world.rooms.get(r))
            .is_some_and(|r| r.has_good_exits(&self.world.artifacts))
    }

    /// Makes a monster run for it. A group sends every member here out.
    pub fn flee(&mut self, actor: ActorId) {
        match actor {
            ActorId::Monster(parent) if self.world.monsters.has_members(parent) => {
                self.flee_group(parent);
            }
            _ => self.flee_single(actor, true),
        }
    }

    fn flee_group(&mut self, parent: MonsterId) {
        let Some(group) = self.world.monsters.get(parent) else {
            return;
        };
        let (name, plural) = (group.name.clone(), group.plural_name());
        let here = self.members_here(parent);
        if !self.has_good_exits(self.world.actor_room(ActorId::Monster(parent))) {
            let line = if here.len() > 1 {
                format!(
                    "{} {plural} look frantically for an exit but find nowhere to go!",
                    here.len()
                )
            } else {
                format!("{name} looks frantically for an exit but finds nowhere to go!")
            };
            self.history.write(line, Style::Warning);
            return;
        }
        self.history
            .write(format!("{} {plural} flee.", here.len()), Style::Warning);
        for key in here {
            self.flee_single(ActorId::Member(key), false);
        }
        self.refresh_visible();
    }

    fn flee_single(&mut self, actor: ActorId, show_message: bool) {
        let name = self.actor_name(actor);
        let Some(room) = self.world.actor_room(actor) else {
            return;
        };
        let exit = self
            .world
            .rooms
            .get(room)
            .and_then(|r| r.random_exit(&self.world.artifacts, &mut self.dice));
        let Some(exit) = exit else {
            if show_message {
                self.history.write(
                    format!("{name} looks frantically for an exit but finds nowhere to go!"),
                    Style::Warning,
                );
            }
            return;
        };
        if show_message {
            let direction = long_direction(&exit.direction).unwrap_or(exit.direction.as_str());
            let line = if exit.direction == "u" || exit.direction == "d" {
                format!("{name} flees {direction}ward.")
            } else {
                format!("{name} flees to the {direction}.")
            };
            self.history.write(line, Style::Warning);
        }
        debug!(%actor, direction = %exit.direction, "monster fled");
        self.move_monster(actor, exit.room_to.room());
        self.refresh_visible();
    }

    // =========================================================================
    // Attacks
    // =========================================================================

    fn attacker_stats(&self, actor: ActorId) -> Result<Attacker> {
        let monster = self.world.monsters.require(actor)?;
        let weapon = self.world.weapon(actor);
        let proficiency = match (&monster.player, weapon.and_then(|w| w.weapon_type)) {
            (Some(profile), Some(kind)) => Some(profile.weapon_abilities.get(kind)),
            _ => None,
        };
        Ok(Attacker {
            agility: monster.agility,
            speed_multiplier: monster.speed_multiplier,
            attack_odds: monster.attack_odds,
            armor_factor: self.world.armor_factor(actor),
            proficiency,
            weapon_odds: weapon.map(|w| w.weapon_odds),
        })
    }

    fn defender_stats(&self, actor: ActorId) -> Result<Defender> {
        let monster = self.world.monsters.require(actor)?;
        Ok(Defender {
            agility: monster.agility,
            speed_multiplier: monster.speed_multiplier,
            defense_bonus: monster.defense_bonus,
        })
    }

    /// Chance, in percent, that an attack lands, before any hook adjusts it.
    ///
    /// # Errors
    ///
    /// Returns an error if either actor does not exist.
    pub fn to_hit_odds(&self, attacker: ActorId, defender: ActorId) -> Result<i32> {
        Ok(combat::to_hit(
            &self.config.combat,
            &self.attacker_stats(attacker)?,
            &self.defender_stats(defender)?,
        ))
    }

    /// One attack, narrated blow by blow.
    ///
    /// # Errors
    ///
    /// Returns an error if a record involved goes missing.
    pub fn attack(&mut self, attacker: ActorId, target: ActorId) -> Result<()> {
        let mut odds = self.to_hit_odds(attacker, target)?;
        if let Some(adjusted) = self
            .trigger(Event::AttackOdds {
                attacker,
                defender: target,
                odds,
            })
            .replacement()
        {
            odds = adjusted;
        }

        let monster = self.world.monsters.require(attacker)?;
        let name = monster.name.clone();
        let combat_code = monster.combat_code;
        let custom_verbs = monster.combat_verbs.clone();
        let (natural_dice, natural_sides) = (monster.weapon_dice, monster.weapon_sides);
        let weapon = self.world.weapon(attacker).cloned();
        let type_code = weapon
            .as_ref()
            .and_then(|w| w.weapon_type)
            .map_or(0, |t| usize::from(u8::from(t)));
        let target_name = self.actor_display_name(target);

        let line = if combat_code == CombatCode::Special {
            format!("{name} attacks {target_name}")
        } else if custom_verbs.is_empty() {
            let verbs = ATTACK_VERBS[type_code];
            let verb = verbs[self.dice.flavor_index(verbs.len())];
            format!("{name} {verb} at {target_name}")
        } else {
            let verb = &custom_verbs[self.dice.flavor_index(custom_verbs.len())];
            format!("{name} {verb} {target_name}")
        };
        self.history.write(line, Style::Normal);

        let roll = self.dice.roll(1, 100);
        match combat::classify(&self.config.combat, roll, odds, weapon.is_some()) {
            outcome @ (HitRoll::Critical | HitRoll::Hit) => {
                let mut damage = match &weapon {
                    Some(w) => self.dice.roll(w.dice, w.sides),
                    None => self.dice.roll(natural_dice, natural_sides),
                };
                let mut ignore_armor = false;
                if outcome == HitRoll::Critical {
                    self.history
                        .write_compact("-- a critical hit!", Style::Success);
                    let critical = CriticalEffect::from_roll(self.dice.roll(1, 100));
                    ignore_armor = critical.ignores_armor;
                    damage = critical.apply(damage);
                } else {
                    self.history.write_compact("-- a hit!", Style::Success);
                }
                if let Some(adjusted) = self
                    .trigger(Event::AttackDamage {
                        attacker,
                        defender: target,
                        damage,
                    })
                    .replacement()
                {
                    damage = adjusted;
                }
                let dealt = self.injure(target, damage, ignore_armor, Some(attacker))?;
                self.trigger(Event::AttackDamageAfter {
                    attacker,
                    defender: target,
                    damage: dealt,
                });
                if attacker.is_player() {
                    self.statistics.damage_dealt += dealt;
                    self.player_growth(weapon.as_ref().and_then(|w| w.weapon_type), odds)?;
                }
            }
            HitRoll::Miss => {
                if self.allows(Event::Miss {
                    attacker,
                    defender: target,
                }) {
                    let verbs = MISS_VERBS[type_code];
                    let verb = verbs[self.dice.flavor_index(verbs.len())];
                    self.history.write_compact(format!("-- {verb}!"), Style::Normal);
                }
            }
            HitRoll::Fumble => {
                self.history.write_compact("-- a fumble!", Style::Warning);
                let fumble_roll = self.dice.roll(1, 100);
                if let Some(weapon) = weapon {
                    if self.allows(Event::Fumble {
                        attacker,
                        defender: target,
                        roll: fumble_roll,
                    }) {
                        self.fumble(attacker, &weapon, fumble_roll)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn fumble(&mut self, attacker: ActorId, weapon: &Artifact, roll: i32) -> Result<()> {
        let magic = weapon.kind == ArtifactKind::MagicWeapon;
        match Fumble::from_roll(roll, magic, weapon.sides) {
            Fumble::Recovered => {
                self.history.write_compact("-- fumble recovered!", Style::Normal);
            }
            Fumble::Dropped => {
                self.history.write_compact("-- weapon dropped!", Style::Warning);
                self.drop_artifact(attacker, weapon.id)?;
            }
            Fumble::HitsUser => {
                self.history.write_compact("-- weapon hits user!", Style::Danger);
                let damage = self.dice.roll(weapon.dice, weapon.sides);
                self.injure(attacker, damage, false, Some(attacker))?;
            }
            Fumble::Sparks => {
                self.history
                    .write_compact(format!("-- sparks fly from {}!", weapon.name), Style::Warning);
            }
            Fumble::Damaged => {
                self.history.write_compact("-- weapon damaged!", Style::Warning);
                self.world.artifacts.require_mut(weapon.id)?.sides -= 2;
            }
            Fumble::Broken => {
                self.history.write_compact("-- weapon broken!", Style::Danger);
                self.world.destroy_artifact(weapon.id)?;
                let monster = self.world.monsters.require_mut(attacker)?;
                monster.armament = Armament::Unarmed;
                monster.courage /= 2;
                if self.dice.roll(1, 10) > 5 {
                    self.history
                        .write_compact("-- broken weapon hurts user!", Style::Danger);
                    let dice = if roll == 100 { weapon.dice + 1 } else { weapon.dice };
                    let damage = self.dice.roll(dice, weapon.sides);
                    self.injure(attacker, damage, false, Some(attacker))?;
                }
            }
        }
        Ok(())
    }

    /// Weapon ability and armor expertise growth after the player lands a blow.
    fn player_growth(&mut self, weapon_type: Option<WeaponType>, odds: i32) -> Result<()> {
        if let Some(kind) = weapon_type {
            let roll = self.dice.roll(1, 100);
            if self.allows(Event::WeaponProficiency {
                weapon_type: kind,
                roll,
                odds,
            }) {
                let player = self.world.player_mut()?;
                if let Some(profile) = player.player.as_mut() {
                    let ability = profile.weapon_abilities.get_mut(kind);
                    let gain = combat::proficiency_gain(roll, odds, *ability);
                    if gain > 0 {
                        *ability += gain;
                        self.history
                            .write(format!("Your {} ability increased!", kind.name()), Style::Success);
                    }
                }
            }
        }

        let factor = self.world.armor_factor(ActorId::PLAYER);
        if factor > 0 {
            let roll = self.dice.roll(1, 70);
            if factor.max(5) < roll {
                self.world.player_mut()?.armor_expertise += factor.min(2);
                self.history
                    .write("Your armor expertise increased!", Style::Success);
            }
        }
        Ok(())
    }

    /// Finds a living monster in the player's room by name.
    #[must_use]
    pub fn monster_here(&self, query: &str) -> Option<MonsterId> {
        self.world
            .monsters
            .local_by_name(query, self.world.player_room())
            .filter(|id| self.is_alive(*id))
    }

    /// Looks up a top-level monster that must exist.
    ///
    /// # Errors
    ///
    /// Returns a missing-reference error.
    pub fn require_monster(&self, id: MonsterId) -> Result<&Monster> {
        self.world
            .monsters
            .get(id)
            .ok_or_else(|| Error::missing_reference("monster", id))
    }

    /// Artifacts an actor is holding that are not in a container, for bulk drops.
    #[must_use]
    pub fn loose_items(&self, actor: ActorId) -> Vec<ArtifactId> {
        self.world
            .artifacts
            .ids_where(|a| a.location == Location::Carried(actor))
    }
}

/// Still alive before the blow is resolved.
fn monster_alive(game: &Game, actor: ActorId) -> bool {
    game.world
        .monsters
        .actor(actor)
        .is_some_and(Monster::is_alive)
}
