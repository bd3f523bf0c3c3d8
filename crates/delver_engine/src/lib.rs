//! Game orchestration for Delver.
//!
//! A [`Game`] owns the world, the dice, the narration history, the hook
//! registry and the command parser. Each player command runs, then one tick
//! of the turn loop:
//!
//! ```text
//! input ──► parser ──► command ──► tick
//!                                    │ recharge spells, burn torches
//!                                    │ queue monster battle actions
//!                                    ▼
//!                             OperationsQueue ──► end of turn
//! ```
//!
//! This crate provides:
//! - [`Game`] - The orchestrator and its turn loop
//! - [`GameConfig`] and [`CombatRules`] - Tunables with test and interactive presets
//! - [`combat`] - Pure to-hit, critical, fumble and armor arithmetic
//! - [`Event`] and [`HookRegistry`] - Named adventure callbacks that can veto or replace outcomes
//! - [`OperationsQueue`] - Paced, pausable delivery of queued game calls
//! - [`History`] - Narration with paging and compact lines
//! - [`Modal`] and [`Question`] - Questions that suspend the game until answered
//! - [`SaveStore`] - Where saved games go
//! - [`commands`] - The core command set

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod actors;
pub mod combat;
pub mod commands;
pub mod config;
pub mod game;
pub mod history;
pub mod hooks;
mod items;
pub mod modal;
pub mod queue;
pub mod saves;
mod spells;

// Re-export main types for convenience
pub use config::{CombatRules, DEFAULT_EXIT_MESSAGE, GameConfig};
pub use game::{Game, GameState, Statistics};
pub use history::{Display, Entry, History, Line, NullDisplay};
pub use hooks::{Event, Hook, HookRegistry, HookResult};
pub use items::ArtifactDamage;
pub use modal::{Modal, Question, QuestionKind};
pub use queue::{NoPacer, Operation, OperationsQueue, Pacer, SleepPacer};
pub use saves::{FIRST_SLOT, LAST_SLOT, MemorySaveStore, SaveStore};
pub use spells::SPEED_MULTIPLIER;
