//! Stable entity identifiers.
//!
//! Ids come from adventure data and never change during play. Destroying an
//! entity clears its location but keeps its id valid, so hooks may refer to
//! it later.

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            /// Creates an id from its raw value.
            #[must_use]
            pub const fn new(raw: u32) -> Self {
                Self(raw)
            }

            /// Returns the raw value.
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(raw: u32) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(
    /// Identifier of a room.
    RoomId,
    "Room"
);

entity_id!(
    /// Identifier of an artifact.
    ArtifactId,
    "Artifact"
);

entity_id!(
    /// Identifier of a monster. The player is always [`MonsterId::PLAYER`].
    MonsterId,
    "Monster"
);

entity_id!(
    /// Identifier of a numbered effect text.
    EffectId,
    "Effect"
);

impl MonsterId {
    /// The player character.
    pub const PLAYER: Self = Self(0);

    /// Returns true if this is the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        self.0 == 0
    }
}

/// Address of one member of a group monster.
///
/// Members live in an arena keyed by their parent and their position in the
/// group, so no synthetic numeric id is ever derived for them.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberKey {
    /// The group monster this member belongs to.
    pub parent: MonsterId,

    /// Zero-based position within the group.
    pub index: u16,
}

impl MemberKey {
    /// Creates a member key.
    #[must_use]
    pub const fn new(parent: MonsterId, index: u16) -> Self {
        Self { parent, index }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.parent, self.index)
    }
}

/// Anything that can act, carry artifacts, or be attacked.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActorId {
    /// A top-level monster (including the player and group parents).
    Monster(MonsterId),
    /// One member of a group monster.
    Member(MemberKey),
}

impl ActorId {
    /// The player character.
    pub const PLAYER: Self = Self::Monster(MonsterId::PLAYER);

    /// Returns true if this is the player.
    #[must_use]
    pub const fn is_player(self) -> bool {
        matches!(self, Self::Monster(id) if id.is_player())
    }

    /// Returns the top-level monster id: the monster itself or the member's group.
    #[must_use]
    pub const fn monster(self) -> MonsterId {
        match self {
            Self::Monster(id) => id,
            Self::Member(key) => key.parent,
        }
    }

    /// Returns the member key if this actor is a group member.
    #[must_use]
    pub const fn member(self) -> Option<MemberKey> {
        match self {
            Self::Monster(_) => None,
            Self::Member(key) => Some(key),
        }
    }
}

impl From<MonsterId> for ActorId {
    fn from(id: MonsterId) -> Self {
        Self::Monster(id)
    }
}

impl From<MemberKey> for ActorId {
    fn from(key: MemberKey) -> Self {
        Self::Member(key)
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Monster(id) => write!(f, "monster {id}"),
            Self::Member(key) => write!(f, "member {key}"),
        }
    }
}
