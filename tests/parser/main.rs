//! Integration tests for Layer 2: Parser
//!
//! Tests verb registration, prefix resolution and dispatch, first against a
//! bare recording host and then against the core command set.

mod core_verbs;
mod dispatch;
