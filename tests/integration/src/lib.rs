//! Integration test utilities for the presence relay
//!
//! Spawns the HTTP server on an ephemeral port in front of a scripted
//! platform, so tests run without network access or credentials.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
