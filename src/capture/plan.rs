//! # Tiled Capture Planning
//!
//! Everything a capture driver needs before it scrolls the first tile, and
//! everything it does with the element records afterwards.
//!
//! ## Flow
//!
//! 1. **Resolve**: named preset (if any) with the caller's overrides, else the
//!    1568×1568 / 50px defaults
//! 2. **Ceiling**: count the tiles and reject plans needing more than
//!    `max_tile_count` before any tile is generated
//! 3. **Grid**: overlapping tiles over the full page
//! 4. **Wait**: spread the settle budget across the tiles
//! 5. **Enrich**: per tile, stamp records with their tile and move them into
//!    page coordinates
//! 6. **Merge**: concatenate tiles, drop repeated fixed elements, classify
//!
//! Tiles are captured one after another by the driver; nothing here runs
//! concurrently or keeps state between calls.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tile_grid::grid::{calculate_tile_grid, grid_shape, tile_count, GridRequest, GridShape};
use tile_grid::presets::{PresetOverrides, TilePreset, VisionPreset};
use tile_grid::wait::per_tile_wait;
use tile_grid::TileBounds;
use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult, MAX_TILE_COUNT_HARD_CAP};
use crate::extraction::element::PageElementRecord;
use crate::extraction::quality::{
    assess_quality, QualityReport, QualityWarning, WarningCode, WarningSeverity,
};

/// Tile size and overlap used when no model preset is requested.
pub const DEFAULT_TILE_PRESET: TilePreset = TilePreset {
    tile_width: 1568,
    tile_height: 1568,
    overlap: 50,
};

pub const DEFAULT_MAX_TILE_COUNT: u32 = 50;

/// Tiles yielding fewer records than this get a per-tile warning.
pub const MIN_ELEMENTS_PER_TILE: usize = 5;

pub const COORDINATE_MAPPING_TYPE: &str = "tile_offset";
pub const COORDINATE_MAPPING_INSTRUCTIONS: &str =
    "Add tile bounds.x/y to element coordinates for full-page position";

fn default_max_tile_count() -> u32 {
    DEFAULT_MAX_TILE_COUNT
}

/// What the capture driver measured and what the caller asked for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiledCaptureRequest {
    pub page_width: u32,
    pub page_height: u32,
    #[serde(default)]
    pub tile_width: Option<u32>,
    #[serde(default)]
    pub tile_height: Option<u32>,
    #[serde(default)]
    pub overlap: Option<u32>,
    #[serde(default)]
    pub target_vision_model: Option<String>,
    #[serde(default = "default_max_tile_count")]
    pub max_tile_count: u32,
    #[serde(default)]
    pub wait_for_timeout_ms: u64,
}

impl TiledCaptureRequest {
    pub fn new(page_width: u32, page_height: u32) -> Self {
        Self {
            page_width,
            page_height,
            tile_width: None,
            tile_height: None,
            overlap: None,
            target_vision_model: None,
            max_tile_count: DEFAULT_MAX_TILE_COUNT,
            wait_for_timeout_ms: 0,
        }
    }

    pub fn with_target(mut self, model: impl Into<String>) -> Self {
        self.target_vision_model = Some(model.into());
        self
    }

    fn overrides(&self) -> PresetOverrides {
        PresetOverrides {
            tile_width: self.tile_width,
            tile_height: self.tile_height,
            overlap: self.overlap,
        }
    }
}

/// Realized grid summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileConfig {
    pub tile_width: u32,
    pub tile_height: u32,
    pub overlap: u32,
    pub total_tiles: usize,
    pub grid: GridShape,
    /// Canonical preset name when a model preset was applied
    pub applied_preset: Option<String>,
}

/// How tile-relative coordinates convert to page coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateMapping {
    #[serde(rename = "type")]
    pub mapping_type: String,
    pub instructions: String,
    pub full_page_width: u32,
    pub full_page_height: u32,
}

impl CoordinateMapping {
    pub fn tile_offset(full_page_width: u32, full_page_height: u32) -> Self {
        Self {
            mapping_type: COORDINATE_MAPPING_TYPE.to_string(),
            instructions: COORDINATE_MAPPING_INSTRUCTIONS.to_string(),
            full_page_width,
            full_page_height,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TiledCapturePlan {
    pub tiles: Vec<TileBounds>,
    pub tile_config: TileConfig,
    pub coordinate_mapping: CoordinateMapping,
    /// Settle time before each tile's screenshot
    pub per_tile_wait_ms: u64,
}

/// Merged records of every tile plus their assessments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledExtraction {
    pub elements: Vec<PageElementRecord>,
    pub tile_warnings: Vec<QualityWarning>,
    pub quality: QualityReport,
}

/// Resolve the tile preset, generate the grid and check it against the ceiling.
///
/// # Errors
/// * [`EngineError::InvalidTileCeiling`] if `max_tile_count` is 0 or above 1000
/// * [`EngineError::Grid`] for an unknown preset, zero dimensions or a too-large overlap
/// * [`EngineError::TileCountExceeded`] if the page needs more tiles than allowed
pub fn plan_tiled_capture(request: &TiledCaptureRequest) -> EngineResult<TiledCapturePlan> {
    if request.max_tile_count == 0 || request.max_tile_count > MAX_TILE_COUNT_HARD_CAP {
        return Err(EngineError::invalid_tile_ceiling(request.max_tile_count));
    }

    let (preset, applied_preset) = match request.target_vision_model.as_deref() {
        Some(name) => {
            let model: VisionPreset = name
                .parse()
                .map_err(|e| EngineError::grid(e).with_operation("plan_tiled_capture"))?;
            (
                request.overrides().apply_to(model.tile_preset()),
                Some(model.name().to_string()),
            )
        }
        None => (request.overrides().apply_to(DEFAULT_TILE_PRESET), None),
    };
    debug!(?preset, applied_preset = ?applied_preset, "resolved tile preset");

    let grid_request = GridRequest::new(
        request.page_width,
        request.page_height,
        preset.tile_width,
        preset.tile_height,
        preset.overlap,
    );
    let required = tile_count(&grid_request)
        .map_err(|e| EngineError::grid(e).with_operation("plan_tiled_capture"))?;
    if required > u64::from(request.max_tile_count) {
        return Err(EngineError::tile_count_exceeded(required, request.max_tile_count)
            .with_operation("plan_tiled_capture"));
    }

    let tiles = calculate_tile_grid(grid_request)
        .map_err(|e| EngineError::grid(e).with_operation("plan_tiled_capture"))?;

    let per_tile_wait_ms = per_tile_wait(request.wait_for_timeout_ms, tiles.len());
    let tile_config = TileConfig {
        tile_width: preset.tile_width,
        tile_height: preset.tile_height,
        overlap: preset.overlap,
        total_tiles: tiles.len(),
        grid: grid_shape(&tiles),
        applied_preset,
    };

    info!(
        page_width = request.page_width,
        page_height = request.page_height,
        tiles = tile_config.total_tiles,
        rows = tile_config.grid.rows,
        columns = tile_config.grid.columns,
        per_tile_wait_ms,
        "tiled capture planned"
    );

    Ok(TiledCapturePlan {
        tiles,
        tile_config,
        coordinate_mapping: CoordinateMapping::tile_offset(request.page_width, request.page_height),
        per_tile_wait_ms,
    })
}

/// Move one tile's records into page space.
///
/// Returns a `LOW_ELEMENT_COUNT_PER_TILE` warning when the tile produced fewer
/// than [`MIN_ELEMENTS_PER_TILE`] records.
pub fn enrich_tile_elements(
    elements: &mut [PageElementRecord],
    tile: &TileBounds,
) -> Option<QualityWarning> {
    for element in elements.iter_mut() {
        element.rebase_onto_tile(tile);
    }

    if elements.len() >= MIN_ELEMENTS_PER_TILE {
        return None;
    }
    Some(
        QualityWarning::new(
            WarningCode::LowElementCountPerTile,
            format!(
                "Tile {} has only {} elements (threshold: {MIN_ELEMENTS_PER_TILE})",
                tile.index,
                elements.len()
            ),
            "Try different selectors or check that the page content loaded correctly",
        )
        .with_severity(WarningSeverity::Info),
    )
}

/// Enrich every tile's records, merge them in tile order and classify the result.
///
/// `per_tile` is matched to `plan.tiles` by position. Fixed and sticky
/// elements repeat in every tile; only the first occurrence of each selector
/// is kept.
pub fn merge_tile_extractions(
    plan: &TiledCapturePlan,
    per_tile: Vec<Vec<PageElementRecord>>,
) -> TiledExtraction {
    if per_tile.len() != plan.tiles.len() {
        warn!(
            tiles = plan.tiles.len(),
            extractions = per_tile.len(),
            "extraction count does not match tile count"
        );
    }

    let mut elements = Vec::new();
    let mut tile_warnings = Vec::new();
    let mut seen_fixed: HashSet<String> = HashSet::new();

    for (tile, mut records) in plan.tiles.iter().zip(per_tile) {
        if let Some(warning) = enrich_tile_elements(&mut records, tile) {
            tile_warnings.push(warning);
        }
        elements.extend(records.into_iter().filter(|r| {
            !r.is_fixed || r.selector.is_empty() || seen_fixed.insert(r.selector.clone())
        }));
    }

    let quality = assess_quality(&elements);
    TiledExtraction {
        elements,
        tile_warnings,
        quality,
    }
}
