//! # Tiled Vision Library
//!
//! Prepares full-page web captures for multimodal vision models: splits a
//! page into overlapping tiles sized for the target model, maps element
//! coordinates between tile and page space, advises on resizing and tiling,
//! and grades the quality of extracted element records.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//! - `vision`: model profile table and the resize/tiling advisor
//! - `extraction`: element records and the quality classifier
//! - `capture`: tiled capture planning and per-tile enrichment
//! - `config`: engine configuration from built-ins, a sidecar file and the environment
//! - `error`: error types with recovery suggestions
//!
//! Pure geometry (grid, coordinate mapping, presets, wait budgeting) lives in
//! the `tile-grid` crate and is re-exported as [`grid`].
//!
//! ## Features
//!
//! - **Pure computation**: no I/O outside configuration loading
//! - **Thread-safe**: every function may be called concurrently; the
//!   configuration is an immutable value passed by reference
//! - **Typed payloads**: extractor JSON is normalized on deserialization
//!
//! ## Example
//!
//! ```rust
//! use tiled_vision::capture::{plan_tiled_capture, merge_tile_extractions, TiledCaptureRequest};
//! use tiled_vision::config::EngineConfig;
//! use tiled_vision::vision::{generate_hints, HintRequest};
//!
//! # fn example() -> Result<(), tiled_vision::EngineError> {
//! let plan = plan_tiled_capture(&TiledCaptureRequest::new(1440, 5200).with_target("claude"))?;
//! assert_eq!(plan.tile_config.applied_preset.as_deref(), Some("claude"));
//!
//! // The driver captures each tile and extracts its elements...
//! let per_tile = vec![Vec::new(); plan.tiles.len()];
//! let merged = merge_tile_extractions(&plan, per_tile);
//! assert_eq!(merged.tile_warnings.len(), plan.tiles.len());
//!
//! let hints = generate_hints(&HintRequest::new(1440, 900), &EngineConfig::default());
//! assert_eq!(hints.target_model, "claude");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod extraction;
pub mod logging;
pub mod vision;

pub use tile_grid as grid;

/// Re-export error types for convenience
pub use error::{EngineError, EngineResult, HasRecoverySuggestion};

pub use capture::{plan_tiled_capture, TiledCapturePlan, TiledCaptureRequest};
pub use config::EngineConfig;
pub use extraction::{assess_quality, ExtractionQuality, PageElementRecord, QualityReport};
pub use vision::{generate_hints, HintRequest, VisionAiHints};
