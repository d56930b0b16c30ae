//! # Configuration Module
//!
//! Engine configuration and the environment abstraction it is loaded through.

pub mod config;
pub mod env;

pub use config::{EngineConfig, DEFAULT_TILE_OVERLAP_PERCENT};
pub use env::{EnvSource, ProcessEnv};
