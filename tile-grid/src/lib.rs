// SPDX-License-Identifier: MIT
//! # tile-grid: Page Tiling Geometry for VLM Capture
//!
//! Pure geometry used when a long web page is captured as a series of
//! viewport-sized screenshots for a vision-language model.
//!
//! ## Key Components
//!
//! - [`grid`]: overlapping tile grid covering a full page
//! - [`coords`]: tile-relative ↔ page-absolute rectangle mapping
//! - [`presets`]: per-model tile size/overlap presets with override merging
//! - [`wait`]: per-tile settle-time budgeting for lazy-loaded content
//!
//! Nothing here performs I/O or holds state; every function may be called
//! concurrently from any thread.
//!
//! ## Usage Example
//!
//! ```rust
//! use tile_grid::{coords, grid, presets};
//!
//! let preset = presets::apply_preset("claude", Default::default())?;
//! let tiles = grid::calculate_tile_grid(grid::GridRequest::new(
//!     1920, 6000, preset.tile_width, preset.tile_height, preset.overlap,
//! ))?;
//!
//! let local = coords::BoundingRect::new(10.0, 20.0, 100.0, 40.0);
//! let page = coords::to_absolute(&local, &tiles[1]);
//! assert_eq!(page.y, 20.0 + f64::from(tiles[1].y));
//! # Ok::<(), tile_grid::GridError>(())
//! ```

pub mod coords;
pub mod error;
pub mod grid;
pub mod presets;
pub mod wait;

pub use coords::BoundingRect;
pub use error::{GridError, GridResult};
pub use grid::{GridRequest, GridShape, TileBounds};
pub use presets::{PresetOverrides, TilePreset, VisionPreset};
