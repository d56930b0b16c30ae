// # Capture Module
//
// Planning and post-processing for tiled full-page captures. The capture
// driver itself (browser, scrolling, screenshots) lives outside this crate.

pub mod plan;

pub use plan::{
    enrich_tile_elements, merge_tile_extractions, plan_tiled_capture, CoordinateMapping,
    TileConfig, TiledCapturePlan, TiledCaptureRequest, TiledExtraction,
};
