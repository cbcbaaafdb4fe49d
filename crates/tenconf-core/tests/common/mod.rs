//! Common test utilities and helpers
//!
//! Shared infrastructure for the manager integration tests: in-memory
//! collaborators and managers wired to the built-in catalog.

#![allow(dead_code)]

pub mod adapters;
pub mod fixtures;

pub use adapters::*;
pub use fixtures::*;

// vim: ts=4
