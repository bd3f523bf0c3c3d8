//! Entity repositories.
//!
//! Each repository owns one kind of entity, rejects duplicate ids, and keeps
//! the derived "what is in the player's room" sets. Storage uses persistent
//! maps so that cloning a repository for a snapshot is cheap.

use delver_foundation::{ActorId, ArtifactId, EffectId, Error, MemberKey, MonsterId, Result, RoomId};
use im::OrdMap;

use crate::artifact::{Artifact, Location};
use crate::effect::Effect;
use crate::monster::{Monster, Status};
use crate::room::Room;

// =============================================================================
// Rooms
// =============================================================================

/// All rooms of an adventure.
#[derive(Clone, Debug, Default)]
pub struct RoomRepository {
    rooms: OrdMap<RoomId, Room>,
}

impl RoomRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a room.
    ///
    /// # Errors
    ///
    /// Returns an error if a room with the same id already exists.
    pub fn add(&mut self, room: Room) -> Result<()> {
        if self.rooms.contains_key(&room.id) {
            return Err(Error::duplicate_id("room", room.id));
        }
        self.rooms.insert(room.id, room);
        Ok(())
    }

    /// Looks up a room.
    #[must_use]
    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    /// Looks up a room for modification.
    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    /// Returns true if the room exists.
    #[must_use]
    pub fn contains(&self, id: RoomId) -> bool {
        self.rooms.contains_key(&id)
    }

    /// All rooms in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Returns true if there are no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Picks a room at random.
    pub fn random(&self, dice: &mut delver_foundation::Dice) -> Option<&Room> {
        let index = dice.random_index(self.rooms.len())?;
        self.rooms.values().nth(index)
    }
}

// =============================================================================
// Artifacts
// =============================================================================

/// All artifacts of an adventure, plus the derived sets for the player's room.
#[derive(Clone, Debug, Default)]
pub struct ArtifactRepository {
    artifacts: OrdMap<ArtifactId, Artifact>,

    /// Artifacts lying in the player's room.
    in_room: Vec<ArtifactId>,

    /// Artifacts in the player's room that are not embedded in the scenery.
    visible: Vec<ArtifactId>,
}

impl ArtifactRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact with the same id already exists.
    pub fn add(&mut self, artifact: Artifact) -> Result<()> {
        if self.artifacts.contains_key(&artifact.id) {
            return Err(Error::duplicate_id("artifact", artifact.id));
        }
        self.artifacts.insert(artifact.id, artifact);
        Ok(())
    }

    /// Looks up an artifact.
    #[must_use]
    pub fn get(&self, id: ArtifactId) -> Option<&Artifact> {
        self.artifacts.get(&id)
    }

    /// Looks up an artifact for modification.
    pub fn get_mut(&mut self, id: ArtifactId) -> Option<&mut Artifact> {
        self.artifacts.get_mut(&id)
    }

    /// Looks up an artifact that must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn require(&self, id: ArtifactId) -> Result<&Artifact> {
        self.get(id).ok_or_else(|| Error::missing_reference("artifact", id))
    }

    /// Looks up an artifact that must exist, for modification.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn require_mut(&mut self, id: ArtifactId) -> Result<&mut Artifact> {
        self.get_mut(id)
            .ok_or_else(|| Error::missing_reference("artifact", id))
    }

    /// Returns true if the artifact exists.
    #[must_use]
    pub fn contains(&self, id: ArtifactId) -> bool {
        self.artifacts.contains_key(&id)
    }

    /// All artifacts in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.values()
    }

    /// Number of artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Returns true if there are no artifacts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// One past the highest id in use.
    #[must_use]
    pub fn next_id(&self) -> ArtifactId {
        self.artifacts
            .keys()
            .map(|id| id.get())
            .max()
            .map_or(ArtifactId(1), |id| ArtifactId(id + 1))
    }

    /// Finds an artifact by exact name, ignoring case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Artifact> {
        let name = name.to_lowercase();
        self.iter().find(|a| a.name.to_lowercase() == name)
    }

    /// Moves an artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact does not exist.
    pub fn relocate(&mut self, id: ArtifactId, location: Location) -> Result<()> {
        self.require_mut(id)?.relocate(location);
        Ok(())
    }

    /// Artifacts lying in a room.
    #[must_use]
    pub fn in_room(&self, room: RoomId) -> Vec<ArtifactId> {
        self.ids_where(|a| a.location == Location::Room(room))
    }

    /// Artifacts carried by an actor.
    #[must_use]
    pub fn carried_by(&self, actor: ActorId) -> Vec<ArtifactId> {
        self.ids_where(|a| a.location == Location::Carried(actor))
    }

    /// Artifacts inside a container.
    #[must_use]
    pub fn contents(&self, container: ArtifactId) -> Vec<ArtifactId> {
        self.ids_where(|a| a.location == Location::Contained(container))
    }

    /// Ids of artifacts matching a predicate, in id order.
    pub fn ids_where(&self, predicate: impl Fn(&Artifact) -> bool) -> Vec<ArtifactId> {
        self.iter().filter(|a| predicate(a)).map(|a| a.id).collect()
    }

    /// Returns true if the artifact is in the player's room or carried by the player.
    #[must_use]
    pub fn is_here(&self, id: ArtifactId, player_room: Option<RoomId>) -> bool {
        self.get(id).is_some_and(|a| match a.location {
            Location::Room(room) => Some(room) == player_room,
            Location::Carried(actor) => actor.is_player(),
            _ => false,
        })
    }

    /// Finds an artifact in reach of the player by name: exact name first, then loose match.
    #[must_use]
    pub fn local_by_name(&self, query: &str, player_room: Option<RoomId>) -> Option<ArtifactId> {
        let lower = query.to_lowercase();
        let local: Vec<&Artifact> = self
            .iter()
            .filter(|a| self.is_here(a.id, player_room))
            .collect();
        local
            .iter()
            .find(|a| a.name.to_lowercase() == lower)
            .or_else(|| local.iter().find(|a| a.matches(query)))
            .map(|a| a.id)
    }

    /// Recomputes the in-room and visible sets for the player's room.
    pub fn refresh_visibility(&mut self, player_room: Option<RoomId>) {
        let Some(room) = player_room else {
            self.in_room.clear();
            self.visible.clear();
            return;
        };
        self.in_room = self.in_room(room);
        self.visible = self
            .in_room
            .iter()
            .copied()
            .filter(|id| self.get(*id).is_some_and(|a| !a.embedded))
            .collect();
    }

    /// Artifacts lying in the player's room, as of the last refresh.
    #[must_use]
    pub fn in_player_room(&self) -> &[ArtifactId] {
        &self.in_room
    }

    /// Non-embedded artifacts in the player's room, as of the last refresh.
    #[must_use]
    pub fn visible(&self) -> &[ArtifactId] {
        &self.visible
    }

    /// Returns true if a lit light source is in reach of the player.
    #[must_use]
    pub fn has_light(&self, player_room: Option<RoomId>) -> bool {
        self.iter()
            .any(|a| a.is_lit && self.is_here(a.id, player_room))
    }

    /// Space left in a container. Containers without a capacity hold anything.
    #[must_use]
    pub fn remaining_capacity(&self, container: ArtifactId) -> i32 {
        let Some(capacity) = self.get(container).and_then(|c| c.quantity) else {
            return 1_000_000;
        };
        let used: i32 = self
            .contents(container)
            .iter()
            .filter_map(|id| self.get(*id))
            .map(|a| a.weight)
            .sum();
        capacity - used
    }

    /// Renames adventure items that clash with items the player brought.
    ///
    /// The adventure's copy gets a `#` suffix so the player's item keeps its name.
    pub fn disambiguate_player_items(&mut self) {
        let brought: Vec<String> = self
            .iter()
            .filter(|a| a.player_brought)
            .map(|a| a.name.to_lowercase())
            .collect();
        let clashing = self.ids_where(|a| !a.player_brought && brought.contains(&a.name.to_lowercase()));
        for id in clashing {
            if let Some(artifact) = self.get_mut(id) {
                artifact.name.push('#');
            }
        }
    }
}

// =============================================================================
// Monsters
// =============================================================================

/// All monsters, the player, and the member arena for group monsters.
#[derive(Clone, Debug, Default)]
pub struct MonsterRepository {
    monsters: OrdMap<MonsterId, Monster>,

    /// Group members keyed by (parent, index).
    members: OrdMap<MemberKey, Monster>,

    /// Top-level non-player monsters in the player's room, as of the last refresh.
    visible: Vec<MonsterId>,
}

impl MonsterRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a top-level monster.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the record is a group member.
    pub fn add(&mut self, monster: Monster) -> Result<()> {
        if monster.member.is_some() {
            return Err(Error::invalid_data(format!(
                "monster {} is a group member; use add_member",
                monster.id
            )));
        }
        if self.monsters.contains_key(&monster.id) {
            return Err(Error::duplicate_id("monster", monster.id));
        }
        self.monsters.insert(monster.id, monster);
        Ok(())
    }

    /// Adds a group member record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record has no member key, the parent does not
    /// exist, or the key is taken.
    pub fn add_member(&mut self, monster: Monster) -> Result<()> {
        let Some(key) = monster.member else {
            return Err(Error::invalid_data(format!(
                "monster {} has no member key",
                monster.id
            )));
        };
        if !self.monsters.contains_key(&key.parent) {
            return Err(Error::missing_reference("monster", key.parent));
        }
        if self.members.contains_key(&key) {
            return Err(Error::duplicate_id("group member", key));
        }
        self.members.insert(key, monster);
        Ok(())
    }

    /// Removes a member record.
    pub fn remove_member(&mut self, key: MemberKey) -> Option<Monster> {
        self.members.remove(&key)
    }

    /// Looks up a top-level monster.
    #[must_use]
    pub fn get(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    /// Looks up a top-level monster for modification.
    pub fn get_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    /// Looks up a monster or member.
    #[must_use]
    pub fn actor(&self, actor: ActorId) -> Option<&Monster> {
        match actor {
            ActorId::Monster(id) => self.monsters.get(&id),
            ActorId::Member(key) => self.members.get(&key),
        }
    }

    /// Looks up a monster or member for modification.
    pub fn actor_mut(&mut self, actor: ActorId) -> Option<&mut Monster> {
        match actor {
            ActorId::Monster(id) => self.monsters.get_mut(&id),
            ActorId::Member(key) => self.members.get_mut(&key),
        }
    }

    /// Looks up an actor that must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn require(&self, actor: ActorId) -> Result<&Monster> {
        self.actor(actor)
            .ok_or_else(|| Error::missing_reference("monster", actor))
    }

    /// Looks up an actor that must exist, for modification.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not exist.
    pub fn require_mut(&mut self, actor: ActorId) -> Result<&mut Monster> {
        self.actor_mut(actor)
            .ok_or_else(|| Error::missing_reference("monster", actor))
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> Option<&Monster> {
        self.monsters.get(&MonsterId::PLAYER)
    }

    /// The player, for modification.
    pub fn player_mut(&mut self) -> Option<&mut Monster> {
        self.monsters.get_mut(&MonsterId::PLAYER)
    }

    /// Top-level monsters in id order, player included.
    pub fn iter(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    /// Every member record of every group.
    pub fn all_members(&self) -> impl Iterator<Item = &Monster> {
        self.members.values()
    }

    /// Members of one group in index order.
    pub fn members_of(&self, parent: MonsterId) -> impl Iterator<Item = &Monster> {
        self.members
            .values()
            .filter(move |m| m.member.is_some_and(|key| key.parent == parent))
    }

    /// Keys of one group's members in index order.
    #[must_use]
    pub fn member_keys(&self, parent: MonsterId) -> Vec<MemberKey> {
        self.members_of(parent).filter_map(|m| m.member).collect()
    }

    /// Index for the next member added to a group.
    #[must_use]
    pub fn next_member_index(&self, parent: MonsterId) -> u16 {
        self.members_of(parent)
            .filter_map(|m| m.member)
            .map(|k| k.index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Returns true if the monster is a group with member records.
    #[must_use]
    pub fn has_members(&self, parent: MonsterId) -> bool {
        self.members_of(parent).next().is_some()
    }

    /// Number of top-level monsters, player included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.monsters.len()
    }

    /// Returns true if there are no monsters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monsters.is_empty()
    }

    /// Finds a top-level monster by exact name, ignoring case.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Monster> {
        let name = name.to_lowercase();
        self.iter().find(|m| m.name.to_lowercase() == name)
    }

    /// Finds a monster in the player's room by name: exact name first, then loose match.
    #[must_use]
    pub fn local_by_name(&self, query: &str, player_room: Option<RoomId>) -> Option<MonsterId> {
        let lower = query.to_lowercase();
        let local: Vec<&Monster> = self
            .iter()
            .filter(|m| !m.is_player() && m.room.is_some() && m.room == player_room)
            .collect();
        local
            .iter()
            .find(|m| m.name.to_lowercase() == lower)
            .or_else(|| local.iter().find(|m| m.matches(query)))
            .map(|m| m.id)
    }

    /// Top-level non-player monsters in a room.
    #[must_use]
    pub fn in_room(&self, room: RoomId) -> Vec<MonsterId> {
        self.iter()
            .filter(|m| !m.is_player() && m.room == Some(room))
            .map(|m| m.id)
            .collect()
    }

    /// Members of a group that are alive and in the given room.
    #[must_use]
    pub fn members_in_room(&self, parent: MonsterId, room: Option<RoomId>) -> Vec<MemberKey> {
        self.members_of(parent)
            .filter(|m| m.is_alive() && room.is_some() && m.room == room)
            .filter_map(|m| m.member)
            .collect()
    }

    /// Places a group where its members are: with the player if any member
    /// is, otherwise with the first living member, otherwise nowhere.
    pub fn sync_group_location(&mut self, parent: MonsterId, player_room: Option<RoomId>) {
        if !self.has_members(parent) {
            return;
        }
        let living: Vec<&Monster> = self
            .members_of(parent)
            .filter(|m| m.status == Status::Alive && m.room.is_some())
            .collect();
        let room = if player_room.is_some() && living.iter().any(|m| m.room == player_room) {
            player_room
        } else {
            living.first().and_then(|m| m.room)
        };
        if let Some(group) = self.monsters.get_mut(&parent) {
            group.room = room;
        }
    }

    /// Recomputes the visible set for the player's room.
    pub fn refresh_visibility(&mut self, player_room: Option<RoomId>) {
        self.visible = player_room.map_or_else(Vec::new, |room| self.in_room(room));
    }

    /// Top-level non-player monsters in the player's room, as of the last refresh.
    #[must_use]
    pub fn visible(&self) -> &[MonsterId] {
        &self.visible
    }
}

// =============================================================================
// Effects
// =============================================================================

/// The numbered effect table.
#[derive(Clone, Debug, Default)]
pub struct EffectRepository {
    effects: OrdMap<EffectId, Effect>,
}

impl EffectRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an effect.
    ///
    /// # Errors
    ///
    /// Returns an error if an effect with the same id already exists.
    pub fn add(&mut self, effect: Effect) -> Result<()> {
        if self.effects.contains_key(&effect.id) {
            return Err(Error::duplicate_id("effect", effect.id));
        }
        self.effects.insert(effect.id, effect);
        Ok(())
    }

    /// Looks up an effect.
    #[must_use]
    pub fn get(&self, id: EffectId) -> Option<&Effect> {
        self.effects.get(&id)
    }

    /// Looks up an effect for modification.
    pub fn get_mut(&mut self, id: EffectId) -> Option<&mut Effect> {
        self.effects.get_mut(&id)
    }

    /// Returns true if the effect exists.
    #[must_use]
    pub fn contains(&self, id: EffectId) -> bool {
        self.effects.contains_key(&id)
    }

    /// All effects in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Effect> {
        self.effects.values()
    }
}
