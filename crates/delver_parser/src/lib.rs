//! Command parsing for Delver.
//!
//! Player input is a verb followed by free text. The parser lowercases and
//! trims the line, resolves the verb, and hands the rest to the command.
//!
//! # Resolution
//!
//! ```text
//! "exam the torch"
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ SPLIT           │  → verb "exam", arg "the torch"
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ EXACT VERB?     │  → no
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PREFIX MATCH    │  → "examine" (one candidate)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ RUN + TICK      │  → Command::run("examine", "the torch", game)
//! └─────────────────┘
//! ```
//!
//! This crate provides:
//! - [`Command`] - The trait every command implements
//! - [`FnCommand`] - Closure-backed commands for adventure-specific verbs
//! - [`CommandParser`] - Verb registry and dispatcher
//! - [`CommandHost`] - What the dispatcher needs from the game

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod parser;

// Re-export main types for convenience
pub use command::{Command, CommandError, CommandResult, FnCommand};
pub use parser::{CommandHost, CommandParser, Dispatch, Resolution};
