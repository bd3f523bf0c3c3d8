//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: ids, dice, text helpers and errors.

mod dice;
mod errors;
mod ids;
mod text;
