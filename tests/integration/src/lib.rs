//! Integration test utilities for the moderation service
//!
//! This crate provides helpers for running end-to-end tests against
//! the REST API, served in-process over the in-memory store.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
