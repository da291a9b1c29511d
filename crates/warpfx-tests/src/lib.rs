//! Integration tests for warpfx crates.
//!
//! This crate contains end-to-end tests that verify the interaction
//! between the sampling core, the geometry tables and the filters.
