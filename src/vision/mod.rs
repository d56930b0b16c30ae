//! # Vision Module
//!
//! Per-model input constraints and the advisor that checks captured images
//! against them.

pub mod advisor;
pub mod profiles;

pub use advisor::{
    generate_hints, HintRequest, ModelAssessment, TargetSource, TilingRecommendation, VisionAiHints,
};
pub use profiles::{
    check_compatibility, resize_impact, Compatibility, ProfileTable, VisionModelProfile,
};
