//! Environment access behind a trait, so configuration can be loaded from the
//! real process environment or from a plain map in tests.

use std::collections::HashMap;

/// Source of `KEY=value` configuration pairs.
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// Reads the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.to_string())
    }
}

/// Name of the per-model override variable, e.g. `VISION_QWEN_VL_MAX_PIXELS`.
pub fn model_var(model: &str, suffix: &str) -> String {
    format!("VISION_{}_{}", model.to_ascii_uppercase(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_var_is_uppercased() {
        assert_eq!(model_var("qwen_vl", "MAX_DIMENSION"), "VISION_QWEN_VL_MAX_DIMENSION");
    }

    #[test]
    fn map_source_reads_values() {
        let env: HashMap<&str, &str> = [("VISION_DEFAULT_MODEL", "gemini")].into_iter().collect();
        assert_eq!(env.var("VISION_DEFAULT_MODEL").as_deref(), Some("gemini"));
        assert_eq!(env.var("VISION_TILE_OVERLAP_PERCENT"), None);
    }
}
