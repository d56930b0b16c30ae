// SPDX-License-Identifier: MIT
//! # Overlapping Tile Grid
//!
//! Partitions a full page into viewport-sized tiles so that each capture fits a
//! vision model's input limits. Adjacent tiles share an `overlap` margin so
//! content straddling a seam appears whole in at least one tile.
//!
//! ## Scan Order
//!
//! Tiles are emitted row-major starting at `(0, 0)`:
//! 1. **Step**: `step = tile_dim - overlap` per axis
//! 2. **Clip**: a tile's size is `min(tile_dim, page_dim - position)`
//! 3. **Stop**: once a tile touches the far edge of an axis, that axis is done
//!
//! Every seam therefore overlaps by exactly `overlap`; the last tile of each
//! axis is clipped to the page edge rather than shifted back.
//!
//! ## Example
//!
//! ```rust
//! use tile_grid::grid::{calculate_tile_grid, GridRequest};
//!
//! let tiles = calculate_tile_grid(GridRequest::vertical(3000, 800, 50)).unwrap();
//! assert_eq!(tiles.len(), 4);
//! assert_eq!((tiles[0].y, tiles[0].height), (0, 800));
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GridError, GridResult};

/// Tile width used when the caller does not give one (standard desktop width).
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1200;

/// Position and size of one tile within the full page.
///
/// `index` is the sequential row-major position, `row`/`column` locate the
/// tile in the grid and `x`/`y`/`width`/`height` are absolute page pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileBounds {
    pub index: u32,
    pub row: u32,
    pub column: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileBounds {
    /// Exclusive right edge in page coordinates.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge in page coordinates.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the page pixel `(px, py)` falls inside this tile.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }
}

/// Input to [`calculate_tile_grid`].
///
/// Width parameters are optional: without them the grid is a single column of
/// [`DEFAULT_VIEWPORT_WIDTH`] pixels, which is the common full-page scroll case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridRequest {
    pub page_height: u32,
    pub viewport_height: u32,
    pub overlap: u32,
    pub page_width: Option<u32>,
    pub viewport_width: Option<u32>,
}

impl GridRequest {
    /// Single-column request: only heights and overlap are given.
    pub fn vertical(page_height: u32, viewport_height: u32, overlap: u32) -> Self {
        Self {
            page_height,
            viewport_height,
            overlap,
            page_width: None,
            viewport_width: None,
        }
    }

    /// Full two-dimensional request.
    pub fn new(
        page_width: u32,
        page_height: u32,
        tile_width: u32,
        tile_height: u32,
        overlap: u32,
    ) -> Self {
        Self {
            page_height,
            viewport_height: tile_height,
            overlap,
            page_width: Some(page_width),
            viewport_width: Some(tile_width),
        }
    }

    /// Effective `(page_width, tile_width)` once defaults are applied.
    fn widths(&self) -> (u32, u32) {
        let tile_width = self.viewport_width.unwrap_or(DEFAULT_VIEWPORT_WIDTH);
        (self.page_width.unwrap_or(tile_width), tile_width)
    }
}

/// Number of rows and columns in a realized grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: u32,
    pub columns: u32,
}

/// Reject zero dimensions and overlaps that leave no forward step.
fn validate(page_w: u32, page_h: u32, tile_w: u32, tile_h: u32, overlap: u32) -> GridResult<()> {
    for (field, value) in [
        ("page_width", page_w),
        ("page_height", page_h),
        ("viewport_width", tile_w),
        ("viewport_height", tile_h),
    ] {
        if value == 0 {
            return Err(GridError::InvalidDimensions { field, value });
        }
    }
    if overlap >= tile_w {
        return Err(GridError::InvalidOverlap {
            overlap,
            axis: "viewport_width",
            tile_dim: tile_w,
        });
    }
    if overlap >= tile_h {
        return Err(GridError::InvalidOverlap {
            overlap,
            axis: "viewport_height",
            tile_dim: tile_h,
        });
    }
    Ok(())
}

/// Upper bound on the up-front allocation in [`calculate_tile_grid`].
const MAX_CAPACITY_HINT: u64 = 1024;

/// Number of tiles [`calculate_tile_grid`] would produce, without generating them.
///
/// Callers that cap the tile count check this first so an oversized request
/// is rejected before any tile is allocated.
///
/// # Errors
/// Same validation as [`calculate_tile_grid`].
pub fn tile_count(req: &GridRequest) -> GridResult<u64> {
    let (page_w, tile_w) = req.widths();
    let (page_h, tile_h) = (req.page_height, req.viewport_height);
    validate(page_w, page_h, tile_w, tile_h, req.overlap)?;

    let columns = u64::from(axis_tile_count(page_w, tile_w, tile_w - req.overlap));
    let rows = u64::from(axis_tile_count(page_h, tile_h, tile_h - req.overlap));
    Ok(columns.saturating_mul(rows))
}

/// Compute the overlapping tile grid covering the whole page.
///
/// # Errors
/// * [`GridError::InvalidDimensions`] if any page or tile dimension is zero
/// * [`GridError::InvalidOverlap`] if `overlap` is not smaller than both tile dimensions
///
/// # Performance
/// O(tiles); the only allocation is the returned vector. Use [`tile_count`]
/// to bound the size before calling this on untrusted dimensions.
pub fn calculate_tile_grid(req: GridRequest) -> GridResult<Vec<TileBounds>> {
    let expected = tile_count(&req)?;
    let (page_w, tile_w) = req.widths();
    let (page_h, tile_h) = (req.page_height, req.viewport_height);

    let step_x = tile_w - req.overlap;
    let step_y = tile_h - req.overlap;

    let mut tiles = Vec::with_capacity(expected.min(MAX_CAPACITY_HINT) as usize);

    let mut index = 0u32;
    let mut row = 0u32;
    let mut y = 0u32;
    loop {
        let height = tile_h.min(page_h - y);
        let mut column = 0u32;
        let mut x = 0u32;
        loop {
            let width = tile_w.min(page_w - x);
            tiles.push(TileBounds {
                index,
                row,
                column,
                x,
                y,
                width,
                height,
            });
            index += 1;

            if x + width >= page_w {
                break;
            }
            x += step_x;
            column += 1;
        }

        if y + height >= page_h {
            break;
        }
        y += step_y;
        row += 1;
    }

    debug!(
        page_w,
        page_h,
        tile_w,
        tile_h,
        overlap = req.overlap,
        tiles = tiles.len(),
        "tile grid generated"
    );
    Ok(tiles)
}

/// Tiles needed along one axis for the scan in [`calculate_tile_grid`].
///
/// The first tile covers `tile` pixels, each following one advances by `step`.
fn axis_tile_count(page: u32, tile: u32, step: u32) -> u32 {
    if page <= tile {
        1
    } else {
        1 + (page - tile).div_ceil(step)
    }
}

/// Rows and columns spanned by a generated grid.
pub fn grid_shape(tiles: &[TileBounds]) -> GridShape {
    tiles.iter().fold(GridShape::default(), |shape, t| GridShape {
        rows: shape.rows.max(t.row + 1),
        columns: shape.columns.max(t.column + 1),
    })
}
