//! The world: every entity of a running adventure, plus the pure queries and
//! state transitions that do not narrate anything.

use delver_foundation::{ActorId, ArtifactId, Error, MonsterId, Result, RoomId};
use tracing::debug;

use crate::DataBag;
use crate::artifact::{Artifact, ArtifactKind, ArmorType, Location};
use crate::monster::{Armament, Monster, Reaction};
use crate::repository::{ArtifactRepository, EffectRepository, MonsterRepository, RoomRepository};
use crate::room::{ExitTarget, Room};
use crate::snapshot::Snapshot;

/// Order in which armor slots are filled by [`World::wear_best_armor`].
const ARMOR_SLOTS: [ArmorType; 5] = [
    ArmorType::Armor,
    ArmorType::Shield,
    ArmorType::Helmet,
    ArmorType::Gloves,
    ArmorType::Ring,
];

/// All entities of an adventure.
#[derive(Clone, Debug, Default)]
pub struct World {
    /// Rooms.
    pub rooms: RoomRepository,

    /// Artifacts.
    pub artifacts: ArtifactRepository,

    /// Monsters, the player, and group members.
    pub monsters: MonsterRepository,

    /// Narrative effects.
    pub effects: EffectRepository,
}

impl World {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Player and location queries
    // =========================================================================

    /// The player.
    ///
    /// # Errors
    ///
    /// Returns an error if no player has been added.
    pub fn player(&self) -> Result<&Monster> {
        self.monsters
            .player()
            .ok_or_else(|| Error::missing_reference("monster", MonsterId::PLAYER))
    }

    /// The player, for modification.
    ///
    /// # Errors
    ///
    /// Returns an error if no player has been added.
    pub fn player_mut(&mut self) -> Result<&mut Monster> {
        self.monsters
            .player_mut()
            .ok_or_else(|| Error::missing_reference("monster", MonsterId::PLAYER))
    }

    /// The room the player is in.
    #[must_use]
    pub fn player_room(&self) -> Option<RoomId> {
        self.monsters.player().and_then(|p| p.room)
    }

    /// The room record the player is in.
    #[must_use]
    pub fn current_room(&self) -> Option<&Room> {
        self.player_room().and_then(|id| self.rooms.get(id))
    }

    /// The room an actor is in.
    #[must_use]
    pub fn actor_room(&self, actor: ActorId) -> Option<RoomId> {
        self.monsters.actor(actor).and_then(|m| m.room)
    }

    /// Returns true if the actor is in the player's room.
    #[must_use]
    pub fn is_actor_here(&self, actor: ActorId) -> bool {
        let room = self.actor_room(actor);
        room.is_some() && room == self.player_room()
    }

    /// Room an artifact is ultimately in, following carriers and containers.
    #[must_use]
    pub fn artifact_room(&self, id: ArtifactId) -> Option<RoomId> {
        let mut current = self.artifacts.get(id)?.location;
        for _ in 0..=self.artifacts.len() {
            match current {
                Location::Nowhere => return None,
                Location::Room(room) => return Some(room),
                Location::Carried(actor) => return self.actor_room(actor),
                Location::Contained(container) => current = self.artifacts.get(container)?.location,
            }
        }
        None
    }

    /// Returns true if the artifact is in the player's room or carried by the player.
    #[must_use]
    pub fn is_artifact_here(&self, id: ArtifactId) -> bool {
        self.artifacts.is_here(id, self.player_room())
    }

    /// Returns true if the player's room is lit, or the player has light.
    #[must_use]
    pub fn has_light(&self) -> bool {
        let dark = self.current_room().is_some_and(|r| r.is_dark);
        !dark || self.artifacts.has_light(self.player_room())
    }

    /// Returns true if a hostile monster is in the player's room.
    #[must_use]
    pub fn hostile_present(&self) -> bool {
        self.monsters.visible().iter().any(|id| {
            self.monsters
                .get(*id)
                .is_some_and(|m| m.reaction == Reaction::Hostile && m.is_alive())
        })
    }

    /// Recomputes the derived "here" sets for the player's room.
    pub fn update_visible(&mut self) {
        let room = self.player_room();
        let groups: Vec<MonsterId> = self
            .monsters
            .iter()
            .filter(|m| m.is_group())
            .map(|m| m.id)
            .collect();
        for group in groups {
            self.monsters.sync_group_location(group, room);
        }
        self.artifacts.refresh_visibility(room);
        self.monsters.refresh_visibility(room);
    }

    // =========================================================================
    // Inventory queries
    // =========================================================================

    /// Artifacts an actor carries. Bound monsters never count as carried.
    #[must_use]
    pub fn carried(&self, actor: ActorId) -> Vec<ArtifactId> {
        self.artifacts
            .ids_where(|a| a.location == Location::Carried(actor) && a.kind != ArtifactKind::BoundMonster)
    }

    /// Artifacts an actor is wearing.
    #[must_use]
    pub fn worn(&self, actor: ActorId) -> Vec<ArtifactId> {
        self.artifacts
            .ids_where(|a| a.location == Location::Carried(actor) && a.is_worn)
    }

    /// Total weight an actor carries.
    #[must_use]
    pub fn weight_carried(&self, actor: ActorId) -> i32 {
        self.carried(actor)
            .iter()
            .filter_map(|id| self.artifacts.get(*id))
            .map(|a| a.weight)
            .sum()
    }

    /// Weight the actor can still pick up.
    #[must_use]
    pub fn remaining_capacity(&self, actor: ActorId) -> i32 {
        self.monsters
            .actor(actor)
            .map_or(0, |m| m.max_weight() - self.weight_carried(actor))
    }

    /// The weapon an actor holds ready.
    #[must_use]
    pub fn weapon(&self, actor: ActorId) -> Option<&Artifact> {
        let id = self.monsters.actor(actor)?.armament.weapon()?;
        self.artifacts.get(id)
    }

    /// Returns true if the actor wears something in the given slot.
    #[must_use]
    pub fn is_wearing_slot(&self, actor: ActorId, slot: ArmorType) -> bool {
        self.worn(actor)
            .iter()
            .filter_map(|id| self.artifacts.get(*id))
            .any(|a| a.armor_type == Some(slot))
    }

    /// Armor penalty of everything worn, less armor expertise, floored at zero.
    #[must_use]
    pub fn armor_factor(&self, actor: ActorId) -> i32 {
        let penalty: i32 = self
            .worn(actor)
            .iter()
            .filter_map(|id| self.artifacts.get(*id))
            .map(|a| a.armor_penalty)
            .sum();
        let expertise = self.monsters.actor(actor).map_or(0, |m| m.armor_expertise);
        (penalty - expertise).max(0)
    }

    /// Finds a carried artifact by name: exact name, then display name, then loose match.
    #[must_use]
    pub fn find_in_inventory(&self, actor: ActorId, query: &str) -> Option<ArtifactId> {
        let lower = query.to_lowercase();
        let inventory: Vec<&Artifact> = self
            .carried(actor)
            .iter()
            .filter_map(|id| self.artifacts.get(*id))
            .collect();
        inventory
            .iter()
            .find(|a| a.name.to_lowercase() == lower)
            .or_else(|| {
                inventory
                    .iter()
                    .find(|a| a.names().display_name().to_lowercase() == lower)
            })
            .or_else(|| inventory.iter().find(|a| a.matches(query)))
            .map(|a| a.id)
    }

    /// The carried weapon with the highest maximum damage.
    #[must_use]
    pub fn best_weapon(&self, actor: ActorId) -> Option<ArtifactId> {
        let mut best: Option<&Artifact> = None;
        for artifact in self.carried(actor).iter().filter_map(|id| self.artifacts.get(*id)) {
            if artifact.is_weapon() && best.is_none_or(|b| artifact.max_damage() > b.max_damage()) {
                best = Some(artifact);
            }
        }
        best.map(|a| a.id)
    }

    // =========================================================================
    // Equipment
    // =========================================================================

    /// Readies the best carried weapon, if the actor carries any.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn ready_best_weapon(&mut self, actor: ActorId) -> Result<Option<ArtifactId>> {
        let best = self.best_weapon(actor);
        if let Some(weapon) = best {
            self.monsters.require_mut(actor)?.armament = Armament::Wields(weapon);
        }
        Ok(best)
    }

    /// Puts on the best carried armor for each slot.
    ///
    /// A shield is only worn when the ready weapon leaves a hand free.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn wear_best_armor(&mut self, actor: ActorId) -> Result<Vec<ArtifactId>> {
        let one_hand_free = self.weapon(actor).is_none_or(|w| w.hands <= 1);
        let mut chosen = Vec::new();
        for slot in ARMOR_SLOTS {
            if slot == ArmorType::Shield && !one_hand_free {
                continue;
            }
            let best = self
                .carried(actor)
                .iter()
                .filter_map(|id| self.artifacts.get(*id))
                .filter(|a| a.kind == ArtifactKind::Wearable && a.armor_type == Some(slot))
                .fold(None::<&Artifact>, |best, a| match best {
                    Some(b) if b.armor_class >= a.armor_class => Some(b),
                    _ => Some(a),
                })
                .map(|a| a.id);
            if let Some(id) = best {
                self.artifacts.require_mut(id)?.is_worn = true;
                chosen.push(id);
            }
        }
        self.refresh_inventory(actor)?;
        Ok(chosen)
    }

    /// Recomputes the player's armor class and drops a ready weapon the actor
    /// no longer carries.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn refresh_inventory(&mut self, actor: ActorId) -> Result<()> {
        let armor_class: i32 = self
            .worn(actor)
            .iter()
            .filter_map(|id| self.artifacts.get(*id))
            .map(|a| a.armor_class)
            .sum();
        let lost_weapon = self
            .monsters
            .require(actor)?
            .armament
            .weapon()
            .is_some_and(|w| self.artifacts.get(w).is_none_or(|a| a.location != Location::Carried(actor)));
        let monster = self.monsters.require_mut(actor)?;
        if actor.is_player() {
            monster.armor_class = armor_class;
        }
        if lost_weapon {
            monster.armament = Armament::Unarmed;
        }
        Ok(())
    }

    // =========================================================================
    // Artifact movement
    // =========================================================================

    /// Puts an artifact in a room.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn move_artifact_to_room(&mut self, id: ArtifactId, room: RoomId) -> Result<()> {
        let previous = self.artifacts.require(id)?.location;
        self.artifacts.relocate(id, Location::Room(room))?;
        self.after_artifact_left(previous)
    }

    /// Gives an artifact to an actor.
    ///
    /// # Errors
    ///
    /// Returns an error for bound monsters or when the artifact or actor does not exist.
    pub fn move_artifact_to_inventory(&mut self, id: ArtifactId, actor: ActorId) -> Result<()> {
        if self.artifacts.require(id)?.kind == ArtifactKind::BoundMonster {
            return Err(Error::invalid_data(format!(
                "artifact {id} is a bound monster and cannot be carried"
            )));
        }
        self.monsters.require(actor)?;
        let previous = self.artifacts.require(id)?.location;
        self.artifacts.relocate(id, Location::Carried(actor))?;
        self.after_artifact_left(previous)?;
        self.refresh_inventory(actor)
    }

    /// Returns true if putting `id` into `container` would put it inside
    /// itself, directly or through the containers around `container`.
    #[must_use]
    pub fn would_contain_itself(&self, id: ArtifactId, container: ArtifactId) -> bool {
        let mut outer = Some(container);
        while let Some(current) = outer {
            if current == id {
                return true;
            }
            outer = self.artifacts.get(current).and_then(|a| a.location.container());
        }
        false
    }

    /// Puts an artifact into a container.
    ///
    /// # Errors
    ///
    /// Returns an error if either artifact does not exist, the target is not
    /// a container, or the artifact would end up inside itself.
    pub fn put_into_container(&mut self, id: ArtifactId, container: ArtifactId) -> Result<()> {
        if !self.artifacts.require(container)?.is_container() {
            return Err(Error::invalid_data(format!("artifact {container} is not a container")));
        }
        if self.would_contain_itself(id, container) {
            return Err(Error::invalid_data(format!(
                "artifact {id} cannot go inside itself"
            )));
        }
        let previous = self.artifacts.require(id)?.location;
        self.artifacts.relocate(id, Location::Contained(container))?;
        self.after_artifact_left(previous)
    }

    /// Where an artifact would go if taken out of its container.
    ///
    /// From a container lying in a room, immovable things stay in the room
    /// and everything else goes to the player. From a carried container, the
    /// artifact goes to the carrier.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist or is not in a container.
    pub fn removal_destination(&self, id: ArtifactId) -> Result<Location> {
        let artifact = self.artifacts.require(id)?;
        let Some(container) = artifact.location.container() else {
            return Err(Error::invalid_data(format!("artifact {id} is not in a container")));
        };
        let immovable = artifact.is_immovable();
        Ok(match self.artifacts.require(container)?.location {
            Location::Carried(actor) => Location::Carried(actor),
            Location::Room(room) if immovable => Location::Room(room),
            _ => Location::Carried(ActorId::PLAYER),
        })
    }

    /// Takes an artifact out of its container and returns where it went.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist or is not in a container.
    pub fn remove_from_container(&mut self, id: ArtifactId) -> Result<Location> {
        let destination = self.removal_destination(id)?;
        self.artifacts.relocate(id, destination)?;
        if let Location::Carried(actor) = destination {
            self.refresh_inventory(actor)?;
        }
        Ok(destination)
    }

    /// Removes an artifact from play. The record stays so its id remains valid.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn destroy_artifact(&mut self, id: ArtifactId) -> Result<()> {
        let previous = self.artifacts.require(id)?.location;
        self.artifacts.relocate(id, Location::Nowhere)?;
        self.artifacts.require_mut(id)?.is_worn = false;
        self.after_artifact_left(previous)
    }

    fn after_artifact_left(&mut self, previous: Location) -> Result<()> {
        match previous {
            Location::Carried(actor) if self.monsters.actor(actor).is_some() => {
                self.refresh_inventory(actor)
            }
            _ => Ok(()),
        }
    }

    /// Places the dead body of a monster (or of a group member's group) in
    /// the monster's room. Bodies the player brought along are never used.
    ///
    /// Returns the body placed, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn place_dead_body(&mut self, actor: ActorId) -> Result<Option<ArtifactId>> {
        let monster = self.monsters.require(actor)?;
        let room = monster.room;
        let body = match actor {
            ActorId::Member(key) => self.monsters.get(key.parent).and_then(|p| p.dead_body_id),
            ActorId::Monster(_) => monster.dead_body_id,
        };
        let (Some(body), Some(room)) = (body, room) else {
            return Ok(None);
        };
        if self.artifacts.get(body).is_none_or(|a| a.player_brought) {
            return Ok(None);
        }
        self.move_artifact_to_room(body, room)?;
        debug!(%actor, %body, "placed dead body");
        Ok(Some(body))
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Checks that every cross reference points at an existing entity.
    ///
    /// # Errors
    ///
    /// Returns a missing-reference error for the first dangling id found.
    pub fn validate(&self) -> Result<()> {
        for room in self.rooms.iter() {
            let owner = format!("room {}", room.id);
            for exit in &room.exits {
                if let ExitTarget::Room(to) = exit.room_to {
                    self.check_room(to, &owner)?;
                }
                if let Some(door) = exit.door_id {
                    self.check_artifact(door, &owner)?;
                }
                if let Some(effect) = exit.effect_id {
                    self.check_effect(effect, &owner)?;
                }
            }
            for effect in [room.effect, room.effect_inline].into_iter().flatten() {
                self.check_effect(effect, &owner)?;
            }
        }

        for artifact in self.artifacts.iter() {
            let owner = format!("artifact {}", artifact.id);
            match artifact.location {
                Location::Nowhere => {}
                Location::Room(room) => self.check_room(room, &owner)?,
                Location::Carried(actor) => {
                    if self.monsters.actor(actor).is_none() {
                        return Err(dangling("monster", actor, &owner));
                    }
                }
                Location::Contained(container) => self.check_artifact(container, &owner)?,
            }
            if let crate::artifact::Lock::Key(key) = artifact.lock {
                self.check_artifact(key, &owner)?;
            }
            if let Some(door) = artifact.linked_door_id {
                self.check_artifact(door, &owner)?;
            }
            for monster in [artifact.guard_id, artifact.bound_monster].into_iter().flatten() {
                self.check_monster(monster, &owner)?;
            }
            if let Some(effect) = artifact.effect_id {
                self.check_effect(effect, &owner)?;
            }
        }

        for monster in self.monsters.iter().chain(self.monsters.all_members()) {
            let owner = format!("monster {}", monster.actor_id());
            if let Some(room) = monster.room {
                self.check_room(room, &owner)?;
            }
            if let Some(container) = monster.container {
                self.check_artifact(container, &owner)?;
            }
            if let Armament::Wields(weapon) | Armament::Seeks(weapon) = monster.armament {
                self.check_artifact(weapon, &owner)?;
            }
            if let Some(body) = monster.dead_body_id {
                self.check_artifact(body, &owner)?;
            }
        }

        for effect in self.effects.iter() {
            let owner = format!("effect {}", effect.id);
            for next in [effect.next, effect.next_inline].into_iter().flatten() {
                self.check_effect(next, &owner)?;
            }
        }
        Ok(())
    }

    fn check_room(&self, id: RoomId, owner: &str) -> Result<()> {
        if self.rooms.contains(id) {
            Ok(())
        } else {
            Err(dangling("room", id, owner))
        }
    }

    fn check_artifact(&self, id: ArtifactId, owner: &str) -> Result<()> {
        if self.artifacts.contains(id) {
            Ok(())
        } else {
            Err(dangling("artifact", id, owner))
        }
    }

    fn check_monster(&self, id: MonsterId, owner: &str) -> Result<()> {
        if self.monsters.get(id).is_some() {
            Ok(())
        } else {
            Err(dangling("monster", id, owner))
        }
    }

    fn check_effect(&self, id: delver_foundation::EffectId, owner: &str) -> Result<()> {
        if self.effects.contains(id) {
            Ok(())
        } else {
            Err(dangling("effect", id, owner))
        }
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Captures the persistent state of the world.
    #[must_use]
    pub fn snapshot(&self, timer: u32, data: DataBag) -> Snapshot {
        Snapshot {
            rooms: self.rooms.iter().cloned().collect(),
            artifacts: self.artifacts.iter().cloned().collect(),
            effects: self.effects.iter().cloned().collect(),
            monsters: self.monsters.iter().cloned().collect(),
            members: self.monsters.all_members().cloned().collect(),
            timer,
            data,
        }
    }

    /// Rebuilds a world from a snapshot and recomputes the derived sets.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot has duplicate ids, dangling
    /// references, or no player.
    pub fn from_snapshot(snapshot: Snapshot) -> Result<Self> {
        let mut world = Self::new();
        for room in snapshot.rooms {
            world.rooms.add(room)?;
        }
        for effect in snapshot.effects {
            world.effects.add(effect)?;
        }
        for artifact in snapshot.artifacts {
            world.artifacts.add(artifact)?;
        }
        for monster in snapshot.monsters {
            world.monsters.add(monster)?;
        }
        for member in snapshot.members {
            world.monsters.add_member(member)?;
        }
        world.player()?;
        world.validate()?;
        world.update_visible();
        Ok(world)
    }
}

fn dangling(entity: &'static str, id: impl std::fmt::Display, owner: &str) -> Error {
    Error::missing_reference(entity, format!("{id} (referenced by {owner})"))
}
