//! Persistent game state.

use serde::{Deserialize, Serialize};

use crate::DataBag;
use crate::artifact::Artifact;
use crate::effect::Effect;
use crate::monster::Monster;
use crate::room::Room;

/// Everything needed to rebuild a game in progress.
///
/// Derived state (visible sets, carried weight) is not stored; it is
/// recomputed after a restore.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Rooms, including seen and visited flags.
    pub rooms: Vec<Room>,

    /// Artifacts with their locations.
    pub artifacts: Vec<Artifact>,

    /// Effects, including their seen flags.
    pub effects: Vec<Effect>,

    /// Top-level monsters, the player included.
    pub monsters: Vec<Monster>,

    /// Group member records.
    pub members: Vec<Monster>,

    /// Turns elapsed.
    pub timer: u32,

    /// Adventure-specific values.
    pub data: DataBag,
}

/// Label and turn number of a saved game, for slot listings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveSummary {
    /// Save slot, 1 through 10.
    pub slot: u8,

    /// Player-supplied description.
    pub description: String,

    /// Turns elapsed when saved.
    pub timer: u32,
}
