//! Integration tests for Layer 1: Storage
//!
//! Tests for adventure loading, repositories, visibility and snapshots,
//! run against the demo adventure.

mod loading;
mod snapshots;
mod world;

use delver_storage::{AdventureData, AdventureInfo, World};

/// The demo adventure, built.
pub fn demo() -> (AdventureInfo, World) {
    AdventureData::from_json(delver_runtime::DEMO_ADVENTURE)
        .unwrap()
        .build()
        .unwrap()
}
