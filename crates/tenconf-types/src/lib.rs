//! Shared types, collaborator traits, and error types for tenant configuration.
//!
//! This crate contains the foundational types that are shared between the
//! resolution core and all adapter implementations. Keeping them separate lets
//! adapter crates depend on the traits without pulling in the core.

pub mod auth;
pub mod defaults_provider;
pub mod error;
pub mod override_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4
