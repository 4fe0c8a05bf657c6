//! Integration test utilities for the forum server
//!
//! Helpers for running end-to-end tests against the JSON API.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
