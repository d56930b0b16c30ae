// SPDX-License-Identifier: MIT
//! Settle-time budgeting for scrolling captures.
//!
//! A single "wait after load" budget is spread over every tile so lazy-loaded
//! content gets a chance to render at each scroll position, without any tile
//! dropping below a usable floor.

/// Minimum per-tile wait in milliseconds.
pub const DEFAULT_MIN_WAIT_MS: u64 = 50;

/// Per-tile wait with the default 50 ms floor.
///
/// ```rust
/// use tile_grid::wait::per_tile_wait;
///
/// assert_eq!(per_tile_wait(1000, 4), 250);
/// assert_eq!(per_tile_wait(100, 4), 50);
/// assert_eq!(per_tile_wait(0, 4), 50);
/// ```
pub fn per_tile_wait(total_wait_ms: u64, tile_count: usize) -> u64 {
    per_tile_wait_with_floor(total_wait_ms, tile_count, DEFAULT_MIN_WAIT_MS)
}

/// Split `total_wait_ms` evenly across `tile_count` tiles, never below `min_wait_ms`.
///
/// A zero budget yields the floor. A zero tile count is treated as one tile.
pub fn per_tile_wait_with_floor(total_wait_ms: u64, tile_count: usize, min_wait_ms: u64) -> u64 {
    if total_wait_ms == 0 {
        return min_wait_ms;
    }
    let tiles = tile_count.max(1) as u64;
    min_wait_ms.max(total_wait_ms / tiles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_budget_evenly() {
        assert_eq!(per_tile_wait(1000, 4), 250);
        assert_eq!(per_tile_wait(1001, 4), 250);
    }

    #[test]
    fn respects_floor() {
        assert_eq!(per_tile_wait(100, 4), 50);
        assert_eq!(per_tile_wait(0, 4), 50);
        assert_eq!(per_tile_wait_with_floor(0, 4, 120), 120);
        assert_eq!(per_tile_wait_with_floor(300, 4, 100), 100);
    }

    #[test]
    fn zero_tiles_behaves_like_one() {
        assert_eq!(per_tile_wait(400, 0), 400);
    }
}
