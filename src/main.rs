use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tiled_vision::capture::{plan_tiled_capture, TiledCaptureRequest};
use tiled_vision::config::{EngineConfig, ProcessEnv};
use tiled_vision::extraction::{
    assess_quality, ExtractionOptions, ExtractionPayload, PageElementRecord,
};
use tiled_vision::grid::VisionPreset;
use tiled_vision::vision::{generate_hints, HintRequest};
use tiled_vision::{logging, HasRecoverySuggestion};

/// Inspect tiling plans, vision hints and extraction quality from the command line.
#[derive(Parser, Debug)]
#[command(name = "tvis")]
#[command(about = "🧩 Plan tiled page captures and check them against vision model limits")]
#[command(long_about = "Plan tiled page captures and check them against vision model limits.
Every command prints JSON to stdout; logs go to stderr.")]
struct Args {
    /// Sidecar configuration file (defaults to $VISION_CONFIG_FILE)
    #[arg(short, long, global = true, help = "TOML file with model limit overrides")]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, help = "Print debug logs to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan the tile grid for a page
    Plan {
        #[arg(long, help = "Full page width in pixels")]
        page_width: u32,

        #[arg(long, help = "Full page height in pixels")]
        page_height: u32,

        #[arg(short, long, value_enum, help = "Apply a vision model tile preset")]
        model: Option<VisionPreset>,

        #[arg(long, help = "Tile width override")]
        tile_width: Option<u32>,

        #[arg(long, help = "Tile height override")]
        tile_height: Option<u32>,

        #[arg(long, help = "Overlap override in pixels")]
        overlap: Option<u32>,

        #[arg(long, default_value_t = 50, help = "Reject plans needing more tiles (1-1000)")]
        max_tiles: u32,

        #[arg(long, default_value_t = 0, help = "Total settle budget to spread across tiles, ms")]
        wait_ms: u64,
    },

    /// Check an image against every vision model profile
    Hints {
        #[arg(
            long,
            conflicts_with_all = ["width", "height"],
            help = "Read dimensions from an image file header"
        )]
        image: Option<PathBuf>,

        #[arg(long, requires = "height")]
        width: Option<u32>,

        #[arg(long, requires = "width")]
        height: Option<u32>,

        #[arg(
            long,
            requires = "document_height",
            help = "Full document width, if larger than the image"
        )]
        document_width: Option<u32>,

        #[arg(long, requires = "document_width")]
        document_height: Option<u32>,

        #[arg(short, long, help = "Target model (falls back to the configured default)")]
        model: Option<String>,
    },

    /// Grade an extraction result (JSON array of records or full extractor payload)
    Assess {
        path: PathBuf,

        #[arg(long, help = "Apply the default extraction policy before grading")]
        filter: bool,
    },

    /// List tile presets and model profiles
    Presets,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose)?;

    match args.command {
        Command::Plan {
            page_width,
            page_height,
            model,
            tile_width,
            tile_height,
            overlap,
            max_tiles,
            wait_ms,
        } => {
            let request = TiledCaptureRequest {
                page_width,
                page_height,
                tile_width,
                tile_height,
                overlap,
                target_vision_model: model.map(|m| m.name().to_string()),
                max_tile_count: max_tiles,
                wait_for_timeout_ms: wait_ms,
            };
            let plan = plan_tiled_capture(&request).map_err(with_suggestion)?;
            print_json(&plan)
        }
        Command::Hints {
            image,
            width,
            height,
            document_width,
            document_height,
            model,
        } => {
            let config = load_config(args.config.as_deref())?;
            let (width, height) = match (image, width, height) {
                (Some(path), _, _) => image::image_dimensions(&path)
                    .with_context(|| format!("failed to read image header: {}", path.display()))?,
                (None, Some(w), Some(h)) => (w, h),
                _ => anyhow::bail!("pass either --image or both --width and --height"),
            };
            let mut request = HintRequest::new(width, height);
            if let (Some(w), Some(h)) = (document_width, document_height) {
                request = request.with_document(w, h);
            }
            if let Some(model) = model {
                request = request.with_target(model);
            }
            print_json(&generate_hints(&request, &config))
        }
        Command::Assess { path, filter } => {
            let mut records = read_records(&path)?;
            if filter {
                records = ExtractionOptions::default().filter(records);
            }
            print_json(&assess_quality(&records))
        }
        Command::Presets => {
            let config = load_config(args.config.as_deref())?;
            let presets: Vec<_> = VisionPreset::ALL
                .iter()
                .map(|p| (p.name(), p.tile_preset()))
                .collect();
            print_json(&serde_json::json!({
                "tile_presets": presets
                    .into_iter()
                    .map(|(name, preset)| (name.to_string(), preset))
                    .collect::<std::collections::BTreeMap<_, _>>(),
                "profiles": config.profiles,
                "default_model": config.default_model,
                "tile_overlap_percent": config.tile_overlap_percent,
            }))
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let result = match path {
        Some(path) => EngineConfig::load(&ProcessEnv, Some(path)),
        None => EngineConfig::from_environment(),
    };
    result.map_err(with_suggestion)
}

/// Accept either a bare record array or a full extractor payload.
fn read_records(path: &Path) -> Result<Vec<PageElementRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read extraction: {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse extraction: {}", path.display()))?;
    if value.is_array() {
        serde_json::from_value(value).context("invalid element record")
    } else {
        let payload: ExtractionPayload =
            serde_json::from_value(value).context("invalid extraction payload")?;
        Ok(payload.elements)
    }
}

fn with_suggestion(error: tiled_vision::EngineError) -> anyhow::Error {
    match error.recovery_suggestion().map(str::to_owned) {
        Some(hint) => anyhow::anyhow!("{error}\nhint: {hint}"),
        None => anyhow::Error::new(error),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
