// SPDX-License-Identifier: MIT
//! Tile-relative ↔ page-absolute rectangle mapping.
//!
//! Elements extracted while the viewport is scrolled to a tile report their
//! rectangles relative to that tile's origin. Adding the tile offset puts them
//! back in full-page space; width and height never change.

use serde::{Deserialize, Serialize};

use crate::grid::TileBounds;

/// Axis-aligned rectangle in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    fn translated(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Map a tile-relative rectangle to absolute page coordinates.
pub fn to_absolute(relative: &BoundingRect, tile: &TileBounds) -> BoundingRect {
    relative.translated(f64::from(tile.x), f64::from(tile.y))
}

/// Map an absolute page rectangle back into `tile`'s local space.
pub fn to_relative(absolute: &BoundingRect, tile: &TileBounds) -> BoundingRect {
    absolute.translated(-f64::from(tile.x), -f64::from(tile.y))
}

/// [`to_absolute`] over every rectangle captured within one tile.
pub fn to_absolute_batch(relative: &[BoundingRect], tile: &TileBounds) -> Vec<BoundingRect> {
    relative.iter().map(|r| to_absolute(r, tile)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_at(x: u32, y: u32) -> TileBounds {
        TileBounds {
            index: 1,
            row: 1,
            column: 0,
            x,
            y,
            width: 1200,
            height: 800,
        }
    }

    #[test]
    fn adds_tile_offset_only_to_origin() {
        let rect = BoundingRect::new(100.0, 200.0, 50.0, 30.0);
        let abs = to_absolute(&rect, &tile_at(0, 750));
        assert_eq!(abs, BoundingRect::new(100.0, 950.0, 50.0, 30.0));
        // input untouched
        assert_eq!(rect.y, 200.0);
    }

    #[test]
    fn batch_uses_shared_tile() {
        let rects = [
            BoundingRect::new(50.0, 100.0, 10.0, 10.0),
            BoundingRect::new(200.0, 300.0, 10.0, 10.0),
        ];
        let ys: Vec<f64> = to_absolute_batch(&rects, &tile_at(0, 1500))
            .iter()
            .map(|r| r.y)
            .collect();
        assert_eq!(ys, vec![1600.0, 1800.0]);
    }

    #[test]
    fn relative_inverts_absolute() {
        let tile = tile_at(900, 2250);
        let rect = BoundingRect::new(12.5, 7.25, 300.0, 18.0);
        assert_eq!(to_relative(&to_absolute(&rect, &tile), &tile), rect);
    }
}
