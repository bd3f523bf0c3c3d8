//! REPL, CLI, terminal display, and file-backed saves for Delver.
//!
//! This crate provides:
//! - [`Repl`] - Interactive play over a swappable line editor
//! - [`AnsiDisplay`] - Narration printed with terminal colors
//! - [`FileSaveStore`] - Save slots kept as `MessagePack` files
//! - [`DEMO_ADVENTURE`] - The adventure that ships with the binary

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod display;
pub mod editor;
pub mod repl;
pub mod store;

// Re-export main types for convenience
pub use display::AnsiDisplay;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use repl::Repl;
pub use store::FileSaveStore;

/// The built-in demo adventure, as JSON.
pub const DEMO_ADVENTURE: &str = include_str!("../../../adventures/demo.json");
