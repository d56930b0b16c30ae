//! # Resize/Tiling Advisor
//!
//! Annotates a captured image with per-model compatibility, the downscale a
//! target model would apply, and whether the document should be captured as
//! tiles instead.
//!
//! ## Target Selection
//!
//! 1. The caller's model name, if the profile table knows it
//! 2. The configured default model, if the profile table knows it
//! 3. The most restrictive profile
//!
//! ## Resize
//!
//! `resize_factor = limit / max(w, h)` when the longest side exceeds the
//! target's limit, else `1.0`. Coordinates scale linearly, so
//! `coordinate_accuracy` equals the factor. Recommended dimensions keep the
//! aspect ratio: `round(dim × factor)`.
//!
//! ## Tiling
//!
//! Evaluated on the document size when known, otherwise the image size, and
//! only against the target's max dimension:
//!
//! ```text
//! effective   = floor(limit × (1 − overlap% / 100))
//! tiles_axis  = ceil(doc_axis / effective)        (1 when doc_axis ≤ limit)
//! tile_axis   = min(limit, ceil(doc_axis / tiles_axis))
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::extraction::style::ViewportInfo;
use crate::vision::profiles::{check_compatibility, resize_impact, VisionModelProfile};

/// Input to [`generate_hints`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HintRequest {
    pub image_width: u32,
    pub image_height: u32,
    /// Full scrollable document size, when it differs from the image
    #[serde(default)]
    pub document_width: Option<u32>,
    #[serde(default)]
    pub document_height: Option<u32>,
    #[serde(default)]
    pub target_model: Option<String>,
}

impl HintRequest {
    pub fn new(image_width: u32, image_height: u32) -> Self {
        Self {
            image_width,
            image_height,
            ..Default::default()
        }
    }

    pub fn with_document(mut self, width: u32, height: u32) -> Self {
        self.document_width = Some(width);
        self.document_height = Some(height);
        self
    }

    /// Take the document size from an extractor viewport report, if present.
    pub fn with_viewport(mut self, viewport: &ViewportInfo) -> Self {
        if let Some((width, height)) = viewport.document_dimensions() {
            self = self.with_document(width, height);
        }
        self
    }

    pub fn with_target(mut self, model: impl Into<String>) -> Self {
        self.target_model = Some(model.into());
        self
    }

    fn evaluated_dimensions(&self) -> (u32, u32) {
        (
            self.document_width.unwrap_or(self.image_width),
            self.document_height.unwrap_or(self.image_height),
        )
    }
}

/// How the target model was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetSource {
    Requested,
    ConfiguredDefault,
    MostRestrictive,
}

/// One profile's verdict on the image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAssessment {
    pub model: String,
    pub compatible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Percentage of the longest side lost to this model's downscale
    pub resize_impact_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilingRecommendation {
    pub recommended: bool,
    pub reason: String,
    pub evaluated_width: u32,
    pub evaluated_height: u32,
    pub tiles_x: u32,
    pub tiles_y: u32,
    /// `tiles_x × tiles_y`, widened so extreme documents cannot overflow
    pub tile_count: u64,
    pub suggested_tile_width: u32,
    pub suggested_tile_height: u32,
    pub overlap_percent: f64,
    /// Every profile whose max dimension the evaluated size exceeds
    pub exceeded_models: Vec<String>,
}

/// Compatibility, resize and tiling advice for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionAiHints {
    pub image_width: u32,
    pub image_height: u32,
    pub target_model: String,
    pub target_source: TargetSource,
    pub models: Vec<ModelAssessment>,
    pub resize_needed: bool,
    pub estimated_resize_factor: f64,
    pub coordinate_accuracy: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_height: Option<u32>,
    pub tiling: TilingRecommendation,
}

impl VisionAiHints {
    pub fn model(&self, name: &str) -> Option<&ModelAssessment> {
        self.models.iter().find(|m| m.model.eq_ignore_ascii_case(name))
    }

    pub fn is_compatible(&self, name: &str) -> bool {
        self.model(name).is_some_and(|m| m.compatible)
    }

    pub fn resize_impact(&self, name: &str) -> Option<f64> {
        self.model(name).map(|m| m.resize_impact_percent)
    }
}

/// Produce hints for `request` against every profile in `config`.
pub fn generate_hints(request: &HintRequest, config: &EngineConfig) -> VisionAiHints {
    let (width, height) = (request.image_width, request.image_height);

    let models = config
        .profiles
        .iter()
        .map(|profile| {
            let compat = check_compatibility(width, height, profile);
            ModelAssessment {
                model: profile.name.clone(),
                compatible: compat.compatible,
                reason: compat.reason,
                resize_impact_percent: resize_impact(width, height, profile.max_dimension_px),
            }
        })
        .collect();

    let (target, target_source) = select_target(request.target_model.as_deref(), config);
    let limit = target.max_dimension_px;
    let longest = width.max(height);

    let resize_needed = longest > limit;
    let factor = if resize_needed {
        f64::from(limit) / f64::from(longest)
    } else {
        1.0
    };
    let (recommended_width, recommended_height) = if resize_needed {
        (
            Some(scale_dimension(width, factor)),
            Some(scale_dimension(height, factor)),
        )
    } else {
        (None, None)
    };

    let tiling = recommend_tiling(request, target, config);

    VisionAiHints {
        image_width: width,
        image_height: height,
        target_model: target.name.clone(),
        target_source,
        models,
        resize_needed,
        estimated_resize_factor: factor,
        coordinate_accuracy: factor,
        recommended_width,
        recommended_height,
        tiling,
    }
}

fn select_target<'a>(
    requested: Option<&str>,
    config: &'a EngineConfig,
) -> (&'a VisionModelProfile, TargetSource) {
    if let Some(name) = requested {
        if let Some(profile) = config.profiles.get(name) {
            return (profile, TargetSource::Requested);
        }
        debug!(model = %name, "requested model is not a known profile");
    }
    if let Some(profile) = config.default_profile() {
        return (profile, TargetSource::ConfiguredDefault);
    }
    (config.profiles.most_restrictive(), TargetSource::MostRestrictive)
}

fn scale_dimension(dim: u32, factor: f64) -> u32 {
    (f64::from(dim) * factor).round() as u32
}

fn recommend_tiling(
    request: &HintRequest,
    target: &VisionModelProfile,
    config: &EngineConfig,
) -> TilingRecommendation {
    let (doc_w, doc_h) = request.evaluated_dimensions();
    let limit = target.max_dimension_px;
    let overlap_percent = config.tile_overlap_percent;

    let exceeded: Vec<&VisionModelProfile> = config
        .profiles
        .iter()
        .filter(|p| doc_w.max(doc_h) > p.max_dimension_px)
        .collect();
    let exceeded_models: Vec<String> = exceeded.iter().map(|p| p.name.clone()).collect();

    if doc_w.max(doc_h) <= limit {
        return TilingRecommendation {
            recommended: false,
            reason: format!(
                "Document {doc_w}x{doc_h} fits within {}'s {limit}px max dimension",
                target.name
            ),
            evaluated_width: doc_w,
            evaluated_height: doc_h,
            tiles_x: 1,
            tiles_y: 1,
            tile_count: 1,
            suggested_tile_width: doc_w,
            suggested_tile_height: doc_h,
            overlap_percent,
            exceeded_models,
        };
    }

    let effective = ((f64::from(limit) * (1.0 - overlap_percent / 100.0)).floor() as u32).max(1);
    let tiles_for = |doc: u32| if doc <= limit { 1 } else { doc.div_ceil(effective) };
    let tiles_x = tiles_for(doc_w);
    let tiles_y = tiles_for(doc_h);
    let suggested_tile_width = limit.min(doc_w.div_ceil(tiles_x));
    let suggested_tile_height = limit.min(doc_h.div_ceil(tiles_y));

    let violated = exceeded
        .iter()
        .map(|p| format!("{} ({}px)", p.name, p.max_dimension_px))
        .collect::<Vec<_>>()
        .join(", ");

    TilingRecommendation {
        recommended: true,
        reason: format!(
            "Document {doc_w}x{doc_h} exceeds the max dimension of {violated}; \
             capture as {tiles_x}x{tiles_y} tiles of \
             {suggested_tile_width}x{suggested_tile_height}px for {}",
            target.name
        ),
        evaluated_width: doc_w,
        evaluated_height: doc_h,
        tiles_x,
        tiles_y,
        tile_count: u64::from(tiles_x) * u64::from(tiles_y),
        suggested_tile_width,
        suggested_tile_height,
        overlap_percent,
        exceeded_models,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_against_default_target() {
        let hints = generate_hints(&HintRequest::new(1920, 1080), &EngineConfig::default());
        assert_eq!(hints.target_model, "claude");
        assert_eq!(hints.target_source, TargetSource::MostRestrictive);
        assert!(!hints.is_compatible("claude"));
        assert!((hints.resize_impact("claude").unwrap() - 18.333).abs() < 0.01);
        assert!((hints.estimated_resize_factor - 0.8167).abs() < 0.0001);
        assert_eq!(hints.coordinate_accuracy, hints.estimated_resize_factor);
        assert_eq!(hints.recommended_width, Some(1568));
        assert_eq!(hints.recommended_height, Some(882));
        assert!(hints.is_compatible("gpt4v"));
        assert_eq!(hints.resize_impact("gpt4v"), Some(0.0));
    }

    #[test]
    fn small_image_needs_nothing() {
        let hints = generate_hints(&HintRequest::new(800, 600), &EngineConfig::default());
        assert!(!hints.resize_needed);
        assert_eq!(hints.estimated_resize_factor, 1.0);
        assert!(hints.recommended_width.is_none());
        assert!(!hints.tiling.recommended);
        assert_eq!(hints.tiling.tile_count, 1);
        assert!(hints.tiling.exceeded_models.is_empty());
    }

    #[test]
    fn unknown_request_falls_back_to_default_then_strictest() {
        let mut config = EngineConfig::default();
        let request = HintRequest::new(1000, 1000).with_target("llava");
        let hints = generate_hints(&request, &config);
        assert_eq!(hints.target_source, TargetSource::MostRestrictive);

        config.default_model = Some("Gemini".into());
        let hints = generate_hints(&request, &config);
        assert_eq!(hints.target_model, "gemini");
        assert_eq!(hints.target_source, TargetSource::ConfiguredDefault);

        let hints = generate_hints(&request.clone().with_target("qwen_vl"), &config);
        assert_eq!(hints.target_source, TargetSource::Requested);
    }

    #[test]
    fn tiling_uses_document_dimensions() {
        // effective = floor(1568 * 0.9) = 1411; 1920/1411 -> 2, 6000/1411 -> 5
        let request = HintRequest::new(1568, 1000).with_document(1920, 6000);
        let tiling = generate_hints(&request, &EngineConfig::default()).tiling;
        assert!(tiling.recommended);
        assert_eq!((tiling.tiles_x, tiling.tiles_y, tiling.tile_count), (2, 5, 10));
        assert_eq!((tiling.suggested_tile_width, tiling.suggested_tile_height), (960, 1200));
        assert_eq!(tiling.exceeded_models, vec!["claude", "gpt4v", "gemini", "qwen_vl"]);
        assert!(tiling.reason.contains("qwen_vl (3584px)"));
    }

    #[test]
    fn axis_within_limit_uses_one_tile() {
        let request = HintRequest::new(1500, 800).with_document(1500, 4000);
        let tiling = generate_hints(&request, &EngineConfig::default()).tiling;
        assert_eq!(tiling.tiles_x, 1);
        assert_eq!(tiling.suggested_tile_width, 1500);
        assert_eq!(tiling.tiles_y, 3);
        assert_eq!(tiling.suggested_tile_height, 1334);
        assert_eq!(tiling.exceeded_models, vec!["claude", "gpt4v", "gemini", "qwen_vl"]);
    }

    #[test]
    fn viewport_feeds_document_size() {
        let viewport = ViewportInfo {
            width: 1280,
            height: 720,
            document_width: Some(1280),
            document_height: Some(2000),
            ..Default::default()
        };
        let request = HintRequest::new(1280, 720).with_viewport(&viewport);
        let tiling = generate_hints(&request, &EngineConfig::default()).tiling;
        assert!(tiling.recommended);
        assert_eq!(tiling.exceeded_models, vec!["claude"]);
    }

    #[test]
    fn extreme_document_counts_tiles_without_overflow() {
        let request = HintRequest::new(1000, 1000).with_document(u32::MAX, u32::MAX);
        let tiling = generate_hints(&request, &EngineConfig::default()).tiling;
        // ceil(4294967295 / 1411)
        assert_eq!((tiling.tiles_x, tiling.tiles_y), (3_043_918, 3_043_918));
        assert_eq!(tiling.tile_count, 3_043_918u64 * 3_043_918);
        assert_eq!(tiling.suggested_tile_width, 1411);
    }

    #[test]
    fn near_total_overlap_degrades_to_one_pixel_steps() {
        let mut config = EngineConfig::default();
        config.tile_overlap_percent = 99.99;
        let request = HintRequest::new(1000, 1000).with_document(u32::MAX, u32::MAX);
        let tiling = generate_hints(&request, &config).tiling;
        assert_eq!(tiling.tiles_x, u32::MAX);
        assert_eq!(tiling.tile_count, u64::from(u32::MAX) * u64::from(u32::MAX));
        assert_eq!(tiling.suggested_tile_height, 1);
    }

    #[test]
    fn zero_dimension_is_incompatible_everywhere() {
        let hints = generate_hints(&HintRequest::new(0, 900), &EngineConfig::default());
        assert!(hints.models.iter().all(|m| !m.compatible));
        assert_eq!(hints.estimated_resize_factor, 1.0);
    }
}
