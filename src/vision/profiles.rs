//! # Vision Model Profile Table
//!
//! Input constraints for each supported multimodal model. The table is built
//! once from the built-in defaults, then overridden by the sidecar file and
//! the environment (see [`crate::config`]); after that it is only ever read.
//!
//! ## Built-in Profiles
//!
//! | Model | Max Dimension | Max Pixels | Max Aspect |
//! |-------|---------------|------------|------------|
//! | `claude` | 1568px | 1,150,000 | 4.0 |
//! | `gpt4v` | 2048px | 4,194,304 | 6.0 |
//! | `gemini` | 3072px | 9,437,184 | 8.0 |
//! | `qwen_vl` | 3584px | 12,845,056 | 10.0 |
//!
//! Profiles are kept strictest first.

use serde::{Deserialize, Serialize};

/// Named input constraints for one vision model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisionModelProfile {
    pub name: String,
    /// Longest side accepted without downscaling
    pub max_dimension_px: u32,
    /// Total pixel budget (width × height)
    pub max_total_pixels: u64,
    /// Largest accepted `max(w,h) / min(w,h)`
    pub max_aspect_ratio: f64,
}

impl VisionModelProfile {
    pub fn new(
        name: impl Into<String>,
        max_dimension_px: u32,
        max_total_pixels: u64,
        max_aspect_ratio: f64,
    ) -> Self {
        Self {
            name: name.into(),
            max_dimension_px,
            max_total_pixels,
            max_aspect_ratio,
        }
    }
}

/// Result of checking one image against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compatibility {
    pub compatible: bool,
    /// Every violated constraint and its excess, `None` when compatible
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Ordered set of vision model profiles.
///
/// Only ever built from [`ProfileTable::builtin`] and grown, so it is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileTable {
    profiles: Vec<VisionModelProfile>,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ProfileTable {
    /// The four built-in profiles.
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                VisionModelProfile::new("claude", 1568, 1_150_000, 4.0),
                VisionModelProfile::new("gpt4v", 2048, 4_194_304, 6.0),
                VisionModelProfile::new("gemini", 3072, 9_437_184, 8.0),
                VisionModelProfile::new("qwen_vl", 3584, 12_845_056, 10.0),
            ],
        }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&VisionModelProfile> {
        let name = name.trim();
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut VisionModelProfile> {
        let name = name.trim();
        self.profiles
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Add a profile, keeping the table ordered strictest first.
    pub(crate) fn insert(&mut self, profile: VisionModelProfile) {
        let at = self
            .profiles
            .iter()
            .position(|p| strictness_key(&profile) < strictness_key(p))
            .unwrap_or(self.profiles.len());
        self.profiles.insert(at, profile);
    }

    /// Re-sort after limits were overridden in place.
    pub(crate) fn reorder(&mut self) {
        self.profiles
            .sort_by(|a, b| strictness_key(a).cmp(&strictness_key(b)));
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisionModelProfile> {
        self.profiles.iter()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.name.as_str()).collect()
    }

    /// Profile with the smallest max dimension (ties broken by pixel budget).
    pub fn most_restrictive(&self) -> &VisionModelProfile {
        &self.profiles[0]
    }
}

fn strictness_key(profile: &VisionModelProfile) -> (u32, u64) {
    (profile.max_dimension_px, profile.max_total_pixels)
}

/// Check `width × height` against every constraint of `profile`.
///
/// A zero dimension is never compatible.
pub fn check_compatibility(width: u32, height: u32, profile: &VisionModelProfile) -> Compatibility {
    if width == 0 || height == 0 {
        return Compatibility {
            compatible: false,
            reason: Some(format!("zero-sized image ({width}x{height})")),
        };
    }

    let mut violations = Vec::new();

    let longest = width.max(height);
    if longest > profile.max_dimension_px {
        violations.push(format!(
            "max dimension {}px exceeds {}px limit by {}px",
            longest,
            profile.max_dimension_px,
            longest - profile.max_dimension_px
        ));
    }

    let pixels = u64::from(width) * u64::from(height);
    if pixels > profile.max_total_pixels {
        violations.push(format!(
            "total pixels {} exceeds {} limit by {}",
            pixels,
            profile.max_total_pixels,
            pixels - profile.max_total_pixels
        ));
    }

    let aspect = aspect_ratio(width, height);
    if aspect > profile.max_aspect_ratio {
        violations.push(format!(
            "aspect ratio {:.2} exceeds {:.2} limit by {:.2}",
            aspect,
            profile.max_aspect_ratio,
            aspect - profile.max_aspect_ratio
        ));
    }

    if violations.is_empty() {
        Compatibility {
            compatible: true,
            reason: None,
        }
    } else {
        Compatibility {
            compatible: false,
            reason: Some(format!("{}: {}", profile.name, violations.join("; "))),
        }
    }
}

/// `max(w,h) / min(w,h)`; callers must rule out zero dimensions first.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    f64::from(width.max(height)) / f64::from(width.min(height))
}

/// Percentage of the longest side lost when downscaling to `limit`.
///
/// ```rust
/// use tiled_vision::vision::profiles::resize_impact;
///
/// assert_eq!(resize_impact(1000, 800, 1568), 0.0);
/// assert!((resize_impact(1920, 1080, 1568) - 18.333).abs() < 0.01);
/// ```
pub fn resize_impact(width: u32, height: u32, limit: u32) -> f64 {
    let longest = width.max(height);
    if longest <= limit {
        0.0
    } else {
        f64::from(longest - limit) / f64::from(longest) * 100.0
    }
}
