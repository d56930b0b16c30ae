// SPDX-License-Identifier: MIT
//! # Per-Model Tile Presets
//!
//! Named tile-size/overlap bundles tuned to stay within each vision model's
//! processing limits while maximizing the captured area per tile.
//!
//! | Preset | Tile | Overlap |
//! |--------|------|---------|
//! | `claude` | 1568×1568 | 50px |
//! | `gemini` | 3072×3072 | 100px |
//! | `gpt4v` | 2048×2048 | 75px |
//!
//! ## Overrides
//!
//! Callers may override any field. Each override is an `Option`, so "not
//! given" is never confused with "given the preset's own value". The preset
//! table is `const`; resolution always returns a fresh value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GridError, GridResult};

/// Tile size and overlap for one capture pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePreset {
    pub tile_width: u32,
    pub tile_height: u32,
    pub overlap: u32,
}

/// Vision models with a built-in tile preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum VisionPreset {
    /// 1568px tiles, 50px overlap
    #[value(name = "claude")]
    Claude,
    /// 3072px tiles, 100px overlap
    #[value(name = "gemini")]
    Gemini,
    /// 2048px tiles, 75px overlap
    #[value(name = "gpt4v")]
    Gpt4v,
}

impl VisionPreset {
    pub const ALL: [VisionPreset; 3] = [
        VisionPreset::Claude,
        VisionPreset::Gemini,
        VisionPreset::Gpt4v,
    ];

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            VisionPreset::Claude => "claude",
            VisionPreset::Gemini => "gemini",
            VisionPreset::Gpt4v => "gpt4v",
        }
    }

    /// The preset's tile dimensions and overlap.
    pub fn tile_preset(self) -> TilePreset {
        match self {
            VisionPreset::Claude => TilePreset {
                tile_width: 1568,
                tile_height: 1568,
                overlap: 50,
            },
            VisionPreset::Gemini => TilePreset {
                tile_width: 3072,
                tile_height: 3072,
                overlap: 100,
            },
            VisionPreset::Gpt4v => TilePreset {
                tile_width: 2048,
                tile_height: 2048,
                overlap: 75,
            },
        }
    }

    /// All preset names, sorted.
    pub fn valid_names() -> Vec<String> {
        let mut names: Vec<String> = Self::ALL.iter().map(|p| p.name().to_string()).collect();
        names.sort();
        names
    }
}

impl fmt::Display for VisionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisionPreset {
    type Err = GridError;

    /// Case-insensitive lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.name() == lower)
            .ok_or_else(|| GridError::UnknownPreset {
                name: s.to_string(),
                valid: Self::valid_names(),
            })
    }
}

/// Caller-supplied replacements for individual preset fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresetOverrides {
    pub tile_width: Option<u32>,
    pub tile_height: Option<u32>,
    pub overlap: Option<u32>,
}

impl PresetOverrides {
    /// Merge onto `base`; unset fields keep the base value.
    pub fn apply_to(&self, base: TilePreset) -> TilePreset {
        TilePreset {
            tile_width: self.tile_width.unwrap_or(base.tile_width),
            tile_height: self.tile_height.unwrap_or(base.tile_height),
            overlap: self.overlap.unwrap_or(base.overlap),
        }
    }
}

/// Resolve a named preset and merge `overrides` onto it.
///
/// # Errors
/// [`GridError::UnknownPreset`] listing every valid name when `name` is not recognized.
///
/// ```rust
/// use tile_grid::presets::{apply_preset, PresetOverrides};
///
/// let overrides = PresetOverrides {
///     tile_width: Some(1000),
///     ..Default::default()
/// };
/// let cfg = apply_preset("Claude", overrides).unwrap();
/// assert_eq!((cfg.tile_width, cfg.tile_height, cfg.overlap), (1000, 1568, 50));
/// ```
pub fn apply_preset(name: &str, overrides: PresetOverrides) -> GridResult<TilePreset> {
    let preset: VisionPreset = name.parse()?;
    Ok(overrides.apply_to(preset.tile_preset()))
}
