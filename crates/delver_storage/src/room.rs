//! Rooms and the exits between them.

use delver_foundation::{ArtifactId, Dice, EffectId, RoomId};
use serde::{Deserialize, Serialize};

use crate::DataBag;
use crate::repository::ArtifactRepository;

/// Exit target that ends the adventure with the exit message.
pub const EXIT: i32 = -999;

/// Exit target that ends the adventure without printing the exit message.
pub const EXIT_SILENT: i32 = -998;

/// Short and long direction names, in compass order.
pub const DIRECTIONS: [(&str, &str); 10] = [
    ("n", "north"),
    ("ne", "northeast"),
    ("e", "east"),
    ("se", "southeast"),
    ("s", "south"),
    ("sw", "southwest"),
    ("w", "west"),
    ("nw", "northwest"),
    ("u", "up"),
    ("d", "down"),
];

/// Returns the long name for a short direction ("n" becomes "north").
#[must_use]
pub fn long_direction(short: &str) -> Option<&'static str> {
    DIRECTIONS
        .iter()
        .find(|(s, _)| *s == short)
        .map(|(_, long)| *long)
}

/// Returns the short name for a direction given in either form.
#[must_use]
pub fn short_direction(direction: &str) -> Option<&'static str> {
    DIRECTIONS
        .iter()
        .find(|(s, l)| *s == direction || *l == direction)
        .map(|(short, _)| *short)
}

/// Where an exit leads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum ExitTarget {
    /// A dead end that only exists to show its effect text.
    Nowhere,
    /// Another room.
    Room(RoomId),
    /// Leaves the adventure, printing the exit message.
    Exit,
    /// Leaves the adventure silently.
    ExitSilent,
}

impl ExitTarget {
    /// Returns the room this exit leads to, if it leads to one.
    #[must_use]
    pub const fn room(self) -> Option<RoomId> {
        match self {
            Self::Room(id) => Some(id),
            _ => None,
        }
    }

    /// Returns true if taking this exit ends the adventure.
    #[must_use]
    pub const fn leaves_adventure(self) -> bool {
        matches!(self, Self::Exit | Self::ExitSilent)
    }
}

impl TryFrom<i32> for ExitTarget {
    type Error = String;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Nowhere),
            EXIT => Ok(Self::Exit),
            EXIT_SILENT => Ok(Self::ExitSilent),
            id if id > 0 => Ok(Self::Room(RoomId::new(id.unsigned_abs()))),
            other => Err(format!("invalid exit target {other}")),
        }
    }
}

impl From<ExitTarget> for i32 {
    fn from(target: ExitTarget) -> Self {
        match target {
            ExitTarget::Nowhere => 0,
            ExitTarget::Exit => EXIT,
            ExitTarget::ExitSilent => EXIT_SILENT,
            ExitTarget::Room(id) => i32::try_from(id.get()).unwrap_or(i32::MAX),
        }
    }
}

/// A one-way connection out of a room.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoomExit {
    /// Short direction name ("n", "se", "u") or a custom word.
    pub direction: String,

    /// Destination.
    pub room_to: ExitTarget,

    /// Door or gate guarding this exit.
    #[serde(default)]
    pub door_id: Option<ArtifactId>,

    /// Effect printed when the exit is used (or refused, for dead ends).
    #[serde(default)]
    pub effect_id: Option<EffectId>,
}

impl RoomExit {
    /// Creates an exit without a door or effect.
    #[must_use]
    pub fn new(direction: impl Into<String>, room_to: ExitTarget) -> Self {
        Self {
            direction: direction.into(),
            room_to,
            door_id: None,
            effect_id: None,
        }
    }

    /// Puts a door on this exit.
    #[must_use]
    pub fn with_door(mut self, door: ArtifactId) -> Self {
        self.door_id = Some(door);
        self
    }

    /// Returns true if nothing blocks this exit.
    ///
    /// A door blocks while it is closed or still hidden.
    #[must_use]
    pub fn is_open(&self, artifacts: &ArtifactRepository) -> bool {
        match self.door_id.and_then(|id| artifacts.get(id)) {
            None => true,
            Some(door) => door.is_open && !door.hidden,
        }
    }

    /// Returns true if the player could notice this exit.
    #[must_use]
    pub fn is_visible(&self, artifacts: &ArtifactRepository) -> bool {
        if self.room_to == ExitTarget::Nowhere {
            return false;
        }
        !self
            .door_id
            .and_then(|id| artifacts.get(id))
            .is_some_and(|door| door.hidden)
    }
}

/// A location in the adventure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Room {
    /// Unique id.
    pub id: RoomId,

    /// Short name shown every turn.
    pub name: String,

    /// Full description shown on the first visit and by `look`.
    pub description: String,

    /// Exits in the order they were authored.
    #[serde(default)]
    pub exits: Vec<RoomExit>,

    /// Dark rooms need a light source to see anything.
    #[serde(default)]
    pub is_dark: bool,

    /// Name shown instead when the room is dark.
    #[serde(default)]
    pub dark_name: Option<String>,

    /// Description shown instead when the room is dark.
    #[serde(default)]
    pub dark_description: Option<String>,

    /// Effect printed on a separate line after the first description.
    #[serde(default)]
    pub effect: Option<EffectId>,

    /// Effect appended to the first description.
    #[serde(default)]
    pub effect_inline: Option<EffectId>,

    /// Description contains markup.
    #[serde(default)]
    pub is_markdown: bool,

    /// The full description has been shown.
    #[serde(default)]
    pub seen: bool,

    /// The player has been here, lit or not.
    #[serde(default)]
    pub visited: bool,

    /// Adventure-specific values.
    #[serde(default)]
    pub data: DataBag,
}

impl Room {
    /// Creates a lit room with no exits.
    #[must_use]
    pub fn new(id: RoomId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            exits: Vec::new(),
            is_dark: false,
            dark_name: None,
            dark_description: None,
            effect: None,
            effect_inline: None,
            is_markdown: false,
            seen: false,
            visited: false,
            data: DataBag::new(),
        }
    }

    /// Finds the exit in the given direction, accepting short or long names.
    #[must_use]
    pub fn exit(&self, direction: &str) -> Option<&RoomExit> {
        let wanted = short_direction(direction).unwrap_or(direction);
        self.exits.iter().find(|x| x.direction == wanted)
    }

    /// Finds the exit in the given direction for modification.
    pub fn exit_mut(&mut self, direction: &str) -> Option<&mut RoomExit> {
        let wanted = short_direction(direction).unwrap_or(direction);
        self.exits.iter_mut().find(|x| x.direction == wanted)
    }

    /// Exits the player can see.
    #[must_use]
    pub fn visible_exits(&self, artifacts: &ArtifactRepository) -> Vec<&RoomExit> {
        self.exits.iter().filter(|x| x.is_visible(artifacts)).collect()
    }

    /// Exits that lead to a real room through an open way.
    #[must_use]
    pub fn good_exits(&self, artifacts: &ArtifactRepository) -> Vec<&RoomExit> {
        self.exits
            .iter()
            .filter(|x| x.room_to.room().is_some() && x.is_open(artifacts))
            .collect()
    }

    /// Returns true if at least one exit leads somewhere usable.
    #[must_use]
    pub fn has_good_exits(&self, artifacts: &ArtifactRepository) -> bool {
        !self.good_exits(artifacts).is_empty()
    }

    /// Picks a usable exit at random.
    pub fn random_exit(&self, artifacts: &ArtifactRepository, dice: &mut Dice) -> Option<RoomExit> {
        let good = self.good_exits(artifacts);
        dice.random_index(good.len()).map(|i| good[i].clone())
    }

    /// Adds an exit, replacing any existing exit in the same direction.
    pub fn add_exit(&mut self, exit: RoomExit) {
        self.exits.retain(|x| x.direction != exit.direction);
        self.exits.push(exit);
    }

    /// Removes and returns the exit in the given direction.
    pub fn remove_exit(&mut self, direction: &str) -> Option<RoomExit> {
        let wanted = short_direction(direction).unwrap_or(direction);
        let index = self.exits.iter().position(|x| x.direction == wanted)?;
        Some(self.exits.remove(index))
    }

    /// Case-insensitive substring search over the name and description.
    #[must_use]
    pub fn text_match(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_convert_both_ways() {
        assert_eq!(long_direction("n"), Some("north"));
        assert_eq!(long_direction("north"), None);
        assert_eq!(short_direction("southwest"), Some("sw"));
        assert_eq!(short_direction("u"), Some("u"));
        assert_eq!(short_direction("sideways"), None);
    }

    #[test]
    fn exit_target_sentinels() {
        assert_eq!(ExitTarget::try_from(-999), Ok(ExitTarget::Exit));
        assert_eq!(ExitTarget::try_from(-998), Ok(ExitTarget::ExitSilent));
        assert_eq!(ExitTarget::try_from(0), Ok(ExitTarget::Nowhere));
        assert_eq!(ExitTarget::try_from(4), Ok(ExitTarget::Room(RoomId(4))));
        assert!(ExitTarget::try_from(-3).is_err());
        assert_eq!(i32::from(ExitTarget::Exit), EXIT);
    }

    #[test]
    fn exit_lookup_accepts_long_names() {
        let mut room = Room::new(RoomId(1), "Hall", "A hall.");
        room.add_exit(RoomExit::new("n", ExitTarget::Room(RoomId(2))));
        assert!(room.exit("north").is_some());
        assert!(room.exit("n").is_some());
        assert!(room.exit("s").is_none());
        assert!(room.remove_exit("north").is_some());
        assert!(room.exits.is_empty());
    }

    #[test]
    fn text_match_searches_description() {
        let room = Room::new(RoomId(1), "Hall", "A sign hangs on the wall.");
        assert!(room.text_match("SIGN"));
        assert!(room.text_match("hall"));
        assert!(!room.text_match("window"));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{"id": 1, "name": "Hall", "description": "x", "colour": "red"}"#;
        assert!(serde_json::from_str::<Room>(json).is_err());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let json = r#"{"id": 1, "description": "x"}"#;
        assert!(serde_json::from_str::<Room>(json).is_err());
    }
}
