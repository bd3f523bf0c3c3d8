//! Adventure data files and the validating loader that turns them into a world.

use delver_foundation::{ActorId, ArtifactId, Error, MemberKey, MonsterId, Result, RoomId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::artifact::{Artifact, Location};
use crate::effect::Effect;
use crate::monster::{Armament, Friendliness, Monster, PlayerProfile, Reaction, SpellBook, WeaponAbilities};
use crate::room::Room;
use crate::world::World;

/// Base to-hit chance every player gets on top of weapon ability.
pub const PLAYER_ATTACK_ODDS: i32 = 25;

const fn default_start_room() -> RoomId {
    RoomId(1)
}

/// The player character brought into an adventure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerData {
    /// Character name.
    pub name: String,

    /// Hit points.
    pub hardiness: i32,

    /// Dexterity; drives to-hit.
    pub agility: i32,

    /// Likeability; drives monster reactions.
    pub charisma: i32,

    /// Money carried.
    #[serde(default)]
    pub gold: i32,

    /// Offsets armor penalties.
    #[serde(default)]
    pub armor_expertise: i32,

    /// Weapon proficiencies.
    #[serde(default)]
    pub weapon_abilities: WeaponAbilities,

    /// Spell abilities at full strength.
    #[serde(default)]
    pub spell_abilities: SpellBook,

    /// Weapons, armor and other gear the player brings along.
    #[serde(default)]
    pub inventory: Vec<Artifact>,
}

/// Everything an adventure file contains.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdventureData {
    /// Title.
    pub name: String,

    /// Blurb shown before play.
    #[serde(default)]
    pub description: String,

    /// Text shown when the game starts.
    #[serde(default)]
    pub intro_text: Option<String>,

    /// Overrides the default exit message.
    #[serde(default)]
    pub exit_message: Option<String>,

    /// Where the player starts.
    #[serde(default = "default_start_room")]
    pub start_room: RoomId,

    /// First dead-body artifact. Monster N's body is `dead_body_id + N - 1`
    /// unless the monster names one itself.
    #[serde(default)]
    pub dead_body_id: Option<ArtifactId>,

    /// Rooms.
    pub rooms: Vec<Room>,

    /// Artifacts.
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// Monsters. The player is added separately.
    #[serde(default)]
    pub monsters: Vec<Monster>,

    /// Numbered effects.
    #[serde(default)]
    pub effects: Vec<Effect>,

    /// The player character.
    pub player: PlayerData,
}

/// Metadata kept by the game after the world has been built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdventureInfo {
    /// Title.
    pub name: String,

    /// Blurb.
    pub description: String,

    /// Intro text.
    pub intro_text: Option<String>,

    /// Exit message override.
    pub exit_message: Option<String>,
}

impl AdventureData {
    /// Parses an adventure file.
    ///
    /// Unknown fields and missing required fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe an adventure.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::invalid_data(format!("adventure data: {e}")))
    }

    /// Builds the world: adds every entity, unpacks groups, places the
    /// player, and validates every cross reference.
    ///
    /// # Errors
    ///
    /// Returns an error for duplicate ids, dangling references, or a
    /// missing start room.
    pub fn build(self) -> Result<(AdventureInfo, World)> {
        let info = AdventureInfo {
            name: self.name,
            description: self.description,
            intro_text: self.intro_text,
            exit_message: self.exit_message,
        };
        let mut world = World::new();

        for room in self.rooms {
            world.rooms.add(room)?;
        }
        if !world.rooms.contains(self.start_room) {
            return Err(Error::missing_reference("room", self.start_room));
        }
        for effect in self.effects {
            world.effects.add(effect)?;
        }
        for artifact in self.artifacts {
            world.artifacts.add(artifact)?;
        }

        let player = self.player;
        for mut artifact in player.inventory.iter().cloned() {
            artifact.seen = true;
            artifact.player_brought = true;
            artifact.location = Location::Carried(ActorId::PLAYER);
            world.artifacts.add(artifact)?;
        }
        world.artifacts.disambiguate_player_items();

        world.monsters.add(player_monster(&player, self.start_room))?;
        for monster in self.monsters {
            add_monster(&mut world, monster, self.dead_body_id)?;
        }

        world.ready_best_weapon(ActorId::PLAYER)?;
        world.wear_best_armor(ActorId::PLAYER)?;
        world.validate()?;
        world.update_visible();
        info!(
            adventure = %info.name,
            rooms = world.rooms.len(),
            artifacts = world.artifacts.len(),
            monsters = world.monsters.len(),
            "adventure loaded"
        );
        Ok((info, world))
    }
}

fn player_monster(data: &PlayerData, start_room: RoomId) -> Monster {
    let mut player = Monster::new(MonsterId::PLAYER, data.name.clone(), data.hardiness, data.agility);
    player.room = Some(start_room);
    player.charisma = data.charisma;
    player.gold = data.gold;
    player.armor_expertise = data.armor_expertise;
    player.friendliness = Friendliness::Friend;
    player.reaction = Reaction::Friend;
    player.attack_odds = PLAYER_ATTACK_ODDS;
    player.defense_bonus = 0;
    player.armament = Armament::Unarmed;
    player.seen = true;
    player.player = Some(PlayerProfile {
        weapon_abilities: data.weapon_abilities.clone(),
        spell_abilities: data.spell_abilities.clone(),
        spell_abilities_original: data.spell_abilities.clone(),
        spell_counters: SpellBook::default(),
    });
    player
}

fn add_monster(world: &mut World, mut monster: Monster, dead_body_base: Option<ArtifactId>) -> Result<()> {
    if monster.id.is_player() {
        return Err(Error::invalid_data("monster id 0 is reserved for the player"));
    }
    if let (None, Some(base)) = (monster.dead_body_id, dead_body_base) {
        let body = ArtifactId(base.get() + monster.id.get() - 1);
        if world.artifacts.contains(body) {
            monster.dead_body_id = Some(body);
        }
    }
    let id = monster.id;
    let count = monster.count;
    let armament = monster.armament;
    let template = monster.clone();
    world.monsters.add(monster)?;

    if count > 1 {
        for index in 0..count {
            let key = MemberKey::new(id, index);
            let mut member = template.clone();
            member.member = Some(key);
            member.description = String::new();
            member.count = 1;
            member.dead_body_id = None;
            if let Armament::Wields(base) = armament {
                let weapon = ArtifactId(base.get() + u32::from(index));
                member.armament = Armament::Wields(weapon);
                world.monsters.add_member(member)?;
                world.artifacts.relocate(weapon, Location::Carried(ActorId::Member(key)))?;
            } else {
                world.monsters.add_member(member)?;
            }
        }
        debug!(%id, count, "unpacked group monster");
        return Ok(());
    }

    let actor = ActorId::Monster(id);
    if let Armament::Wields(weapon) = armament {
        world.artifacts.relocate(weapon, Location::Carried(actor))?;
    }
    world.ready_best_weapon(actor)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "name": "Tiny",
        "rooms": [
            {"id": 1, "name": "Hall", "description": "A hall.", "exits": [{"direction": "n", "room_to": 2}]},
            {"id": 2, "name": "Yard", "description": "A yard.", "exits": [{"direction": "s", "room_to": 1}]}
        ],
        "artifacts": [
            {"id": 1, "name": "sword", "type": 2, "weapon_type": 5, "dice": 1, "sides": 8, "location": {"room": 2}},
            {"id": 2, "name": "club", "type": 2, "weapon_type": 3, "dice": 1, "sides": 4},
            {"id": 3, "name": "club", "type": 2, "weapon_type": 3, "dice": 1, "sides": 4},
            {"id": 10, "name": "dead goblin", "type": 13}
        ],
        "monsters": [
            {"id": 1, "name": "goblin", "hardiness": 5, "agility": 5, "room_id": 2, "count": 2, "weapon_id": 2}
        ],
        "dead_body_id": 10,
        "player": {
            "name": "Hero", "hardiness": 20, "agility": 12, "charisma": 10,
            "inventory": [{"id": 50, "name": "Sword", "type": 2, "weapon_type": 5, "dice": 2, "sides": 6}]
        }
    }"#;

    #[test]
    fn loads_and_places_the_player() {
        let (info, world) = AdventureData::from_json(MINIMAL).unwrap().build().unwrap();
        assert_eq!(info.name, "Tiny");
        let player = world.player().unwrap();
        assert_eq!(player.room, Some(RoomId(1)));
        assert_eq!(player.attack_odds, PLAYER_ATTACK_ODDS);
        assert_eq!(player.armament, Armament::Wields(ArtifactId(50)));
        assert!(world.artifacts.get(ArtifactId(50)).unwrap().player_brought);
    }

    #[test]
    fn player_items_win_name_clashes() {
        let (_, world) = AdventureData::from_json(MINIMAL).unwrap().build().unwrap();
        assert_eq!(world.artifacts.get(ArtifactId(1)).unwrap().name, "sword#");
        assert_eq!(world.artifacts.get(ArtifactId(50)).unwrap().name, "Sword");
    }

    #[test]
    fn groups_unpack_with_offset_weapons() {
        let (_, world) = AdventureData::from_json(MINIMAL).unwrap().build().unwrap();
        let keys = world.monsters.member_keys(MonsterId(1));
        assert_eq!(keys, vec![MemberKey::new(MonsterId(1), 0), MemberKey::new(MonsterId(1), 1)]);
        assert_eq!(
            world.artifacts.get(ArtifactId(3)).unwrap().location,
            Location::Carried(ActorId::Member(keys[1]))
        );
        assert_eq!(world.monsters.get(MonsterId(1)).unwrap().dead_body_id, Some(ArtifactId(10)));
    }

    #[test]
    fn unknown_fields_fail() {
        let json = MINIMAL.replace("\"name\": \"Tiny\"", "\"name\": \"Tiny\", \"author\": \"x\"");
        assert!(AdventureData::from_json(&json).is_err());
    }

    #[test]
    fn dangling_references_fail() {
        let json = MINIMAL.replace("\"room_to\": 2}", "\"room_to\": 7}");
        let err = AdventureData::from_json(&json).unwrap().build().unwrap_err();
        assert!(err.to_string().contains("room not found: 7"));
    }

    #[test]
    fn duplicate_ids_fail() {
        let json = MINIMAL.replace("{\"id\": 3, \"name\": \"club\"", "{\"id\": 2, \"name\": \"club\"");
        assert!(AdventureData::from_json(&json).unwrap().build().is_err());
    }
}
