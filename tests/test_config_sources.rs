//! Configuration precedence: built-in < sidecar file < environment.

use std::collections::HashMap;
use std::io::Write;

use tempfile::NamedTempFile;
use tiled_vision::config::EngineConfig;
use tiled_vision::error::{classify, EngineError};

fn sidecar(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn no_env() -> HashMap<&'static str, &'static str> {
    HashMap::new()
}

#[test]
fn file_overrides_builtin_values() {
    let file = sidecar(
        r#"
default_model = "gemini"
tile_overlap_percent = 15

[models.claude]
max_dimension = 1400
max_aspect_ratio = 5.0
"#,
    );
    let config = EngineConfig::load(&no_env(), Some(file.path())).unwrap();
    let claude = config.profiles.get("claude").unwrap();
    assert_eq!(claude.max_dimension_px, 1400);
    assert_eq!(claude.max_total_pixels, 1_150_000);
    assert_eq!(claude.max_aspect_ratio, 5.0);
    assert_eq!(config.default_profile().unwrap().name, "gemini");
    assert_eq!(config.tile_overlap_percent, 15.0);
}

#[test]
fn complete_unknown_model_is_added_in_strictness_order() {
    let file = sidecar(
        r#"
[models.llava]
max_dimension = 672
max_pixels = 451584
max_aspect_ratio = 3.0
"#,
    );
    let config = EngineConfig::load(&no_env(), Some(file.path())).unwrap();
    assert_eq!(config.profiles.len(), 5);
    assert_eq!(config.profiles.most_restrictive().name, "llava");
}

#[test]
fn incomplete_unknown_model_is_skipped() {
    let file = sidecar("[models.llava]\nmax_dimension = 672\n");
    let config = EngineConfig::load(&no_env(), Some(file.path())).unwrap();
    assert_eq!(config.profiles.len(), 4);
    assert!(config.profiles.get("llava").is_none());
}

#[test]
fn added_model_accepts_env_overrides() {
    let file = sidecar(
        "[models.llava]\nmax_dimension = 672\nmax_pixels = 451584\nmax_aspect_ratio = 3.0\n",
    );
    let env: HashMap<&str, &str> = [("VISION_LLAVA_MAX_DIMENSION", "1344")].into_iter().collect();
    let config = EngineConfig::load(&env, Some(file.path())).unwrap();
    assert_eq!(config.profiles.get("llava").unwrap().max_dimension_px, 1344);
    // re-sorted ahead of claude (1568)
    assert_eq!(config.profiles.names()[0], "llava");
}

#[test]
fn environment_beats_file() {
    let file = sidecar("default_model = \"gemini\"\ntile_overlap_percent = 15\n");
    let env: HashMap<&str, &str> = [
        ("VISION_DEFAULT_MODEL", "qwen_vl"),
        ("VISION_TILE_OVERLAP_PERCENT", "5"),
    ]
    .into_iter()
    .collect();
    let config = EngineConfig::load(&env, Some(file.path())).unwrap();
    assert_eq!(config.default_model.as_deref(), Some("qwen_vl"));
    assert_eq!(config.tile_overlap_percent, 5.0);
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = sidecar("[models.claude]\nmax_dimension = \"big\"\n");
    let err = EngineConfig::load(&no_env(), Some(file.path())).unwrap_err();
    assert!(matches!(err, EngineError::ConfigParse { .. }));
    assert!(classify::is_startup_error(&err));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = EngineConfig::load(&no_env(), Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert_eq!(err.category(), "io");
}

#[test]
fn zero_limit_from_file_fails_validation() {
    let file = sidecar("[models.gpt4v]\nmax_pixels = 0\n");
    let err = EngineConfig::load(&no_env(), Some(file.path())).unwrap_err();
    match err {
        EngineError::Config { field, .. } => assert_eq!(field, "models.gpt4v.max_pixels"),
        other => panic!("unexpected error: {other}"),
    }
}
