//! # Engine Configuration
//!
//! The one piece of process-wide state: the vision model profile table plus the
//! default target model and default tile overlap used by the advisor. It is
//! built once at startup and then passed by reference; nothing mutates it
//! afterwards.
//!
//! ## Sources
//!
//! Later sources win:
//! 1. **Built-in**: the table in [`crate::vision::profiles`], overlap 10%
//! 2. **Sidecar file**: TOML, path given explicitly or via `VISION_CONFIG_FILE`
//! 3. **Environment**: per-model and global `VISION_*` variables
//!
//! ## Configuration Parameters
//!
//! | Parameter | Env Variable | Type | Range |
//! |-----------|--------------|------|-------|
//! | per-model max dimension | `VISION_<MODEL>_MAX_DIMENSION` | `u32` | > 0 |
//! | per-model max pixels | `VISION_<MODEL>_MAX_PIXELS` | `u64` | > 0 |
//! | per-model max aspect | `VISION_<MODEL>_MAX_ASPECT_RATIO` | `f64` | ≥ 1.0 |
//! | `default_model` | `VISION_DEFAULT_MODEL` | `String` | any table name |
//! | `tile_overlap_percent` | `VISION_TILE_OVERLAP_PERCENT` | `f64` | 0 ≤ p < 100 |
//!
//! ## File Format
//!
//! ```toml
//! default_model = "gemini"
//! tile_overlap_percent = 15
//!
//! [models.claude]
//! max_dimension = 1400
//!
//! [models.llava]
//! max_dimension = 672
//! max_pixels = 451584
//! max_aspect_ratio = 3.0
//! ```
//!
//! A table for a model that is not already known adds a new profile only when
//! all three limits are present; otherwise it is skipped with a warning.
//! Malformed values are errors, never silently ignored.
//!
//! ## Examples
//!
//! ```rust
//! use std::collections::HashMap;
//! use tiled_vision::config::EngineConfig;
//!
//! let env: HashMap<&str, &str> = [("VISION_CLAUDE_MAX_DIMENSION", "1400")].into_iter().collect();
//! let config = EngineConfig::load(&env, None).unwrap();
//! assert_eq!(config.profiles.get("claude").unwrap().max_dimension_px, 1400);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::env::{model_var, EnvSource, ProcessEnv};
use crate::error::{EngineError, EngineResult};
use crate::vision::profiles::{ProfileTable, VisionModelProfile};

/// Overlap between suggested tiles when nothing else is configured.
pub const DEFAULT_TILE_OVERLAP_PERCENT: f64 = 10.0;

/// Environment variable naming the sidecar configuration file.
pub const CONFIG_FILE_ENV: &str = "VISION_CONFIG_FILE";

pub const DEFAULT_MODEL_ENV: &str = "VISION_DEFAULT_MODEL";
pub const TILE_OVERLAP_ENV: &str = "VISION_TILE_OVERLAP_PERCENT";

/// Immutable engine configuration.
///
/// # Field Descriptions
///
/// - `profiles`: per-model input constraints, strictest first
/// - `default_model`: target used when a caller names none (or an unknown one)
/// - `tile_overlap_percent`: overlap between tiles suggested by the advisor
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub profiles: ProfileTable,
    pub default_model: Option<String>,
    pub tile_overlap_percent: f64,
}

impl Default for EngineConfig {
    /// Built-in defaults.
    ///
    /// | Parameter | Default |
    /// |-----------|---------|
    /// | `profiles` | claude, gpt4v, gemini, qwen_vl |
    /// | `default_model` | none (most restrictive profile) |
    /// | `tile_overlap_percent` | 10.0 |
    fn default() -> Self {
        Self {
            profiles: ProfileTable::builtin(),
            default_model: None,
            tile_overlap_percent: DEFAULT_TILE_OVERLAP_PERCENT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    default_model: Option<String>,
    tile_overlap_percent: Option<f64>,
    #[serde(default)]
    models: BTreeMap<String, ModelLimits>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelLimits {
    max_dimension: Option<u32>,
    max_pixels: Option<u64>,
    max_aspect_ratio: Option<f64>,
}

impl EngineConfig {
    /// Load from the process environment, reading the sidecar file named by
    /// `VISION_CONFIG_FILE` when it is set.
    pub fn from_environment() -> EngineResult<Self> {
        let env = ProcessEnv;
        let file = env.var(CONFIG_FILE_ENV);
        Self::load(&env, file.as_deref().map(Path::new))
    }

    /// Built-in defaults, then `file` (if any), then `env`.
    pub fn load(env: &impl EnvSource, file: Option<&Path>) -> EngineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = file {
            let content = fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
            let parsed: ConfigFile =
                toml::from_str(&content).map_err(|e| EngineError::config_parse(path, e))?;
            debug!(path = %path.display(), models = parsed.models.len(), "loaded sidecar config");
            config.merge_file(parsed);
        }

        config.merge_env(env)?;
        config.profiles.reorder();
        config.validate()?;

        if let Some(name) = &config.default_model {
            if config.profiles.get(name).is_none() {
                warn!(
                    model = %name,
                    "default model is not a known profile; falling back to most restrictive"
                );
            }
        }

        Ok(config)
    }

    fn merge_file(&mut self, file: ConfigFile) {
        if let Some(model) = file.default_model {
            self.default_model = Some(model);
        }
        if let Some(percent) = file.tile_overlap_percent {
            self.tile_overlap_percent = percent;
        }

        for (name, limits) in file.models {
            if let Some(profile) = self.profiles.get_mut(&name) {
                if let Some(v) = limits.max_dimension {
                    profile.max_dimension_px = v;
                }
                if let Some(v) = limits.max_pixels {
                    profile.max_total_pixels = v;
                }
                if let Some(v) = limits.max_aspect_ratio {
                    profile.max_aspect_ratio = v;
                }
                continue;
            }

            match (limits.max_dimension, limits.max_pixels, limits.max_aspect_ratio) {
                (Some(dimension), Some(pixels), Some(aspect)) => {
                    debug!(model = %name, "adding profile from sidecar config");
                    self.profiles
                        .insert(VisionModelProfile::new(name, dimension, pixels, aspect));
                }
                _ => {
                    warn!(
                        model = %name,
                        "skipping unknown model: max_dimension, max_pixels and \
                         max_aspect_ratio are all required"
                    );
                }
            }
        }
    }

    fn merge_env(&mut self, env: &impl EnvSource) -> EngineResult<()> {
        let names: Vec<String> = self.profiles.names().iter().map(|n| n.to_string()).collect();
        for name in names {
            let dimension =
                parse_var::<u32>(env, &model_var(&name, "MAX_DIMENSION"), "a positive integer")?;
            let pixels =
                parse_var::<u64>(env, &model_var(&name, "MAX_PIXELS"), "a positive integer")?;
            let aspect =
                parse_var::<f64>(env, &model_var(&name, "MAX_ASPECT_RATIO"), "a number")?;

            if let Some(profile) = self.profiles.get_mut(&name) {
                if let Some(v) = dimension {
                    profile.max_dimension_px = v;
                }
                if let Some(v) = pixels {
                    profile.max_total_pixels = v;
                }
                if let Some(v) = aspect {
                    profile.max_aspect_ratio = v;
                }
            }
        }

        if let Some(model) = env.var(DEFAULT_MODEL_ENV) {
            let model = model.trim();
            if !model.is_empty() {
                self.default_model = Some(model.to_string());
            }
        }
        if let Some(percent) = parse_var::<f64>(env, TILE_OVERLAP_ENV, "a number")? {
            self.tile_overlap_percent = percent;
        }
        Ok(())
    }

    /// Validate every limit and the overlap percentage.
    pub fn validate(&self) -> EngineResult<()> {
        for profile in self.profiles.iter() {
            if profile.max_dimension_px == 0 {
                return Err(EngineError::config(
                    format!("models.{}.max_dimension", profile.name),
                    "0",
                    "must be greater than zero",
                ));
            }
            if profile.max_total_pixels == 0 {
                return Err(EngineError::config(
                    format!("models.{}.max_pixels", profile.name),
                    "0",
                    "must be greater than zero",
                ));
            }
            if !profile.max_aspect_ratio.is_finite() || profile.max_aspect_ratio < 1.0 {
                return Err(EngineError::config(
                    format!("models.{}.max_aspect_ratio", profile.name),
                    profile.max_aspect_ratio.to_string(),
                    "must be at least 1.0",
                ));
            }
        }

        let p = self.tile_overlap_percent;
        if !p.is_finite() || !(0.0..100.0).contains(&p) {
            return Err(EngineError::config(
                "tile_overlap_percent",
                p.to_string(),
                "must be in the range [0, 100)",
            ));
        }
        Ok(())
    }

    /// The configured default profile, if it names a known model.
    pub fn default_profile(&self) -> Option<&VisionModelProfile> {
        self.default_model
            .as_deref()
            .and_then(|name| self.profiles.get(name))
    }
}

fn parse_var<T: FromStr>(
    env: &impl EnvSource,
    key: &str,
    expected: &str,
) -> EngineResult<Option<T>> {
    match env.var(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| EngineError::config(key, raw.clone(), format!("expected {expected}"))),
    }
}
