//! `trainwatch-trainer` library crate.
//!
//! Exposes the run orchestrator, snapshot persistence and environment
//! configuration for integration testing. The binary entrypoint lives in
//! `main.rs`.

pub mod config;
pub mod persist;
pub mod trainer;

pub use trainer::Trainer;
