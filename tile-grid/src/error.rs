// SPDX-License-Identifier: MIT
//! Errors raised while validating grid geometry or resolving presets.
//!
//! All of these are caller mistakes detected before any tile is produced, so
//! none of them is worth retrying with the same input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// A page or tile dimension was zero.
    #[error("{field} must be positive, got {value}")]
    InvalidDimensions { field: &'static str, value: u32 },

    /// The overlap would leave no forward step along at least one axis.
    #[error("overlap ({overlap}) must be less than {axis} ({tile_dim})")]
    InvalidOverlap {
        overlap: u32,
        axis: &'static str,
        tile_dim: u32,
    },

    /// The requested preset name is not in the preset table.
    #[error("Unknown Vision AI preset '{name}'. Valid options: {}", valid.join(", "))]
    UnknownPreset { name: String, valid: Vec<String> },
}

pub type GridResult<T> = Result<T, GridError>;
