//! Shared domain types for the fuzzhub workspace.
//!
//! Everything here is dependency-light on purpose: the other crates
//! (registry, events, runner, api) all sit on top of these definitions.

pub mod error;
pub mod roles;
pub mod types;
