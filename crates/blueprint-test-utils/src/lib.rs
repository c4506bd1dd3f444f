//! Shared test fixtures for the blueprint workspace.
//!
//! This crate provides standardised live-instance fixtures to eliminate
//! duplication across crate test suites. It is a dev-dependency only and
//! is never published.

pub mod instance;

pub use instance::{InstanceBuilder, sample_instance};
