//! Delver - Turn-based text adventure engine
//!
//! This crate re-exports all layers of the Delver system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 4: delver_runtime    - REPL, CLI, terminal display, file saves
//! Layer 3: delver_engine     - Turn loop, combat, hooks, core commands
//! Layer 2: delver_parser     - Verb registry and command dispatch
//! Layer 1: delver_storage    - Entities, repositories, adventure loading
//! Layer 0: delver_foundation - Ids, dice, styles, errors
//! ```

pub use delver_engine as engine;
pub use delver_foundation as foundation;
pub use delver_parser as parser;
pub use delver_runtime as runtime;
pub use delver_storage as storage;
