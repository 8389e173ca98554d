//! `trainwatch-core` -- domain types shared by every trainwatch crate.
//!
//! Holds the synthetic sample generator, the run state shared between the
//! trainer loop and the status endpoint, run configuration with its
//! validators, and the clock seam used to make sleeps injectable.

pub mod clock;
pub mod config;
pub mod error;
pub mod generator;
pub mod metric_names;
pub mod run_state;
pub mod sample;
pub mod summary;
pub mod types;
