//! Core types shared by every Delver layer.
//!
//! This crate provides:
//! - [`RoomId`], [`ArtifactId`], [`MonsterId`], [`EffectId`] - Stable entity identifiers
//! - [`MemberKey`] and [`ActorId`] - Group member addressing without derived numeric ids
//! - [`Error`] - Rich error types with context
//! - [`Dice`] - Seeded dice roller with a scripted-roll queue for deterministic tests
//! - [`Style`] - Narrative output styles
//! - [`text`] - Name matching, capitalization and plurals

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dice;
pub mod error;
pub mod id;
pub mod style;
pub mod text;

// Re-export main types for convenience
pub use dice::Dice;
pub use error::{Error, ErrorContext, ErrorKind};
pub use id::{ActorId, ArtifactId, EffectId, MemberKey, MonsterId, RoomId};
pub use style::Style;

/// Result type alias using the Delver error type.
pub type Result<T> = std::result::Result<T, Error>;
