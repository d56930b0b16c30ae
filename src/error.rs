//! # Engine Error Handling
//!
//! Every failure the engine can report is a rejected request: the caller gave
//! geometry that cannot be tiled, asked for a preset that does not exist,
//! would need more tiles than it allowed, or supplied configuration that does
//! not parse. None of them is retryable with the same input, so each error
//! carries a recovery suggestion telling the caller what to change.
//!
//! ## Usage
//!
//! ```rust
//! use tiled_vision::error::{EngineError, HasRecoverySuggestion};
//!
//! let error = EngineError::tile_count_exceeded(120, 50);
//! assert_eq!(error.category(), "tile_count");
//! assert!(error.recovery_suggestion().unwrap().contains("max_tile_count"));
//! ```
//!
//! Quality classification never errors and therefore has no variant here.

use std::{error::Error as StdError, fmt, path::PathBuf};

use tile_grid::GridError;

/// Hard upper bound on the caller-supplied tile ceiling.
pub const MAX_TILE_COUNT_HARD_CAP: u32 = 1000;

/// Metadata attached to every engine error.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The operation being performed when the error occurred
    pub operation: Option<String>,
    /// Suggested recovery action
    pub recovery_suggestion: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.recovery_suggestion = Some(suggestion.into());
        self
    }
}

/// Base error type for the tiling engine.
#[derive(Debug)]
pub enum EngineError {
    /// Invalid grid geometry or an unknown preset
    Grid {
        source: GridError,
        context: ErrorContext,
    },
    /// The generated grid needs more tiles than the caller allows
    TileCountExceeded {
        required: u64,
        max: u32,
        context: ErrorContext,
    },
    /// The caller's tile ceiling is outside `1..=MAX_TILE_COUNT_HARD_CAP`
    InvalidTileCeiling {
        requested: u32,
        context: ErrorContext,
    },
    /// A configuration value failed validation
    Config {
        field: String,
        value: String,
        reason: String,
        context: ErrorContext,
    },
    /// The sidecar configuration file could not be read
    Io {
        path: PathBuf,
        source: std::io::Error,
        context: ErrorContext,
    },
    /// The sidecar configuration file is not valid TOML for the expected schema
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
        context: ErrorContext,
    },
}

impl EngineError {
    /// Wrap a geometry/preset error.
    pub fn grid(source: GridError) -> Self {
        let suggestion = match &source {
            GridError::InvalidDimensions { .. } => {
                "Pass positive page and tile dimensions".to_string()
            }
            GridError::InvalidOverlap { .. } => {
                "Reduce the overlap below both tile dimensions".to_string()
            }
            GridError::UnknownPreset { valid, .. } => {
                format!("Use one of: {}", valid.join(", "))
            }
        };
        Self::Grid {
            source,
            context: ErrorContext::new().with_recovery_suggestion(suggestion),
        }
    }

    /// Create a tile ceiling violation.
    pub fn tile_count_exceeded(required: u64, max: u32) -> Self {
        Self::TileCountExceeded {
            required,
            max,
            context: ErrorContext::new().with_recovery_suggestion(format!(
                "Increase max_tile_count (max {MAX_TILE_COUNT_HARD_CAP}) \
                 or use larger tile dimensions"
            )),
        }
    }

    pub fn invalid_tile_ceiling(requested: u32) -> Self {
        Self::InvalidTileCeiling {
            requested,
            context: ErrorContext::new().with_recovery_suggestion(format!(
                "Choose a max_tile_count between 1 and {MAX_TILE_COUNT_HARD_CAP}"
            )),
        }
    }

    /// Create a configuration error.
    pub fn config(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Config {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
            context: ErrorContext::new(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
            context: ErrorContext::new().with_recovery_suggestion(
                "Check that the configuration file exists and is readable",
            ),
        }
    }

    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
            context: ErrorContext::new().with_recovery_suggestion(
                "Expected top-level default_model / tile_overlap_percent \
                 and [models.<name>] tables",
            ),
        }
    }

    /// Add operation context
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.context_mut().operation = Some(operation.into());
        self
    }

    /// Add recovery suggestion
    pub fn with_recovery_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.context_mut().recovery_suggestion = Some(suggestion.into());
        self
    }

    /// Get the error context
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::Grid { context, .. }
            | Self::TileCountExceeded { context, .. }
            | Self::InvalidTileCeiling { context, .. }
            | Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::ConfigParse { context, .. } => context,
        }
    }

    fn context_mut(&mut self) -> &mut ErrorContext {
        match self {
            Self::Grid { context, .. }
            | Self::TileCountExceeded { context, .. }
            | Self::InvalidTileCeiling { context, .. }
            | Self::Config { context, .. }
            | Self::Io { context, .. }
            | Self::ConfigParse { context, .. } => context,
        }
    }

    /// Get the error category as a string
    pub fn category(&self) -> &'static str {
        match self {
            Self::Grid {
                source: GridError::InvalidDimensions { .. },
                ..
            } => "invalid_dimensions",
            Self::Grid {
                source: GridError::InvalidOverlap { .. },
                ..
            } => "invalid_overlap",
            Self::Grid {
                source: GridError::UnknownPreset { .. },
                ..
            } => "unknown_preset",
            Self::TileCountExceeded { .. } | Self::InvalidTileCeiling { .. } => "tile_count",
            Self::Config { .. } | Self::ConfigParse { .. } => "config",
            Self::Io { .. } => "io",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Grid { source, .. } => write!(f, "{}", source),
            EngineError::TileCountExceeded { required, max, .. } => {
                write!(
                    f,
                    "Page requires {} tiles but max_tile_count is {}",
                    required, max
                )
            }
            EngineError::InvalidTileCeiling { requested, .. } => {
                write!(
                    f,
                    "max_tile_count must be between 1 and {} (got {})",
                    MAX_TILE_COUNT_HARD_CAP, requested
                )
            }
            EngineError::Config {
                field,
                value,
                reason,
                ..
            } => {
                write!(
                    f,
                    "Configuration error in '{}': {} (value: {})",
                    field, reason, value
                )
            }
            EngineError::Io { path, source, .. } => {
                write!(f, "I/O error reading '{}': {}", path.display(), source)
            }
            EngineError::ConfigParse { path, source, .. } => {
                write!(f, "Failed to parse '{}': {}", path.display(), source)
            }
        }
    }
}

impl StdError for EngineError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Grid { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<GridError> for EngineError {
    fn from(error: GridError) -> Self {
        Self::grid(error)
    }
}

/// Result type alias using the engine error type
pub type EngineResult<T> = Result<T, EngineError>;

/// Trait for errors that provide recovery suggestions
pub trait HasRecoverySuggestion {
    /// Get recovery suggestion for this error
    fn recovery_suggestion(&self) -> Option<&str>;
}

impl HasRecoverySuggestion for EngineError {
    fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion.as_deref()
    }
}

/// Error classification utilities
pub mod classify {
    use super::*;

    /// Rejected before any computation began; the request itself must change.
    pub fn is_rejected_request(error: &EngineError) -> bool {
        matches!(
            error,
            EngineError::Grid { .. }
                | EngineError::TileCountExceeded { .. }
                | EngineError::InvalidTileCeiling { .. }
        )
    }

    /// Raised while loading configuration at startup.
    pub fn is_startup_error(error: &EngineError) -> bool {
        matches!(
            error,
            EngineError::Config { .. } | EngineError::Io { .. } | EngineError::ConfigParse { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_error_categories() {
        let error = EngineError::from(GridError::InvalidOverlap {
            overlap: 800,
            axis: "viewport_height",
            tile_dim: 800,
        });
        assert_eq!(error.category(), "invalid_overlap");
        assert!(classify::is_rejected_request(&error));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_unknown_preset_suggestion_lists_names() {
        let error = EngineError::from(GridError::UnknownPreset {
            name: "x".into(),
            valid: vec!["claude".into(), "gemini".into(), "gpt4v".into()],
        });
        assert_eq!(error.category(), "unknown_preset");
        assert_eq!(
            error.recovery_suggestion(),
            Some("Use one of: claude, gemini, gpt4v")
        );
    }

    #[test]
    fn test_tile_count_message() {
        let error = EngineError::tile_count_exceeded(120, 50).with_operation("plan_tiled_capture");
        assert_eq!(
            error.to_string(),
            "Page requires 120 tiles but max_tile_count is 50"
        );
        assert_eq!(error.context().operation.as_deref(), Some("plan_tiled_capture"));
    }

    #[test]
    fn test_config_errors_are_startup_errors() {
        let error = EngineError::config("VISION_CLAUDE_MAX_DIMENSION", "abc", "not an integer");
        assert!(classify::is_startup_error(&error));
        assert!(!classify::is_rejected_request(&error));
        assert_eq!(error.category(), "config");
    }
}
