//! gradientgen - two-color gradient image generator
//!
//! Command-line consumer of the generation pipeline.
//!
//! # Execution Flow
//!
//! 1. Load settings from `<config-dir>/gradientgen.yaml` and `GRADIENTGEN__*`
//! 2. Initialize logging → logs/gradientgen.<date>
//! 3. Build the [`GradientSpec`] from settings defaults plus command-line overrides
//! 4. Submit it to a [`GenerationController`] and poll on a fixed interval,
//!    printing status until the terminal outcome arrives (Ctrl-C cancels)
//! 5. Save the finished image; PNG or JPEG is chosen by the output extension

use anyhow::{Context, Result, bail};
use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use gradientgen::models::{AspectRatio, KindName, swap_dimensions};
use gradientgen::services::{css, default_filename, save};
use gradientgen::{
    APP_NAME, Color, ConfigManager, ControllerEvent, Direction, GenerationController,
    GradientKind, GradientSpec, JobOutcome, Metrics, Position, PreviewScaler, Settings, Status,
    VERSION,
};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "gradientgen", version, about)]
struct Cli {
    /// Primary color as #RRGGBB, or `random`.
    #[arg(long)]
    primary: Option<String>,

    /// Secondary color as #RRGGBB, or `random`.
    #[arg(long)]
    secondary: Option<String>,

    /// Gradient kind.
    #[arg(long, value_enum)]
    kind: Option<KindChoice>,

    /// Linear direction, e.g. `left-to-right` or `top-left-to-bottom-right`.
    #[arg(long)]
    direction: Option<String>,

    /// Radial center, e.g. `center` or `bottom-left`.
    #[arg(long)]
    position: Option<String>,

    /// Image width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Lock the aspect ratio, e.g. `16:9`. Defaults to the configured ratio
    /// unless both --width and --height are given.
    #[arg(long)]
    aspect: Option<AspectRatio>,

    /// Exchange width and height (releases any aspect lock).
    #[arg(long)]
    swap: bool,

    /// Preview zoom, clamped to the configured range.
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Space available for the preview, as WxH.
    #[arg(long, value_parser = parse_viewport, default_value = "400x400")]
    viewport: (i64, i64),

    /// Output image path. Defaults to a name derived from the gradient.
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Print the CSS equivalent of the gradient.
    #[arg(long)]
    css: bool,

    /// Directory holding gradientgen.yaml.
    #[arg(long, default_value = ".")]
    config_dir: Utf8PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindChoice {
    Linear,
    Radial,
}

fn parse_viewport(s: &str) -> Result<(i64, i64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let w = w.trim().parse().map_err(|e| format!("bad width {w:?}: {e}"))?;
    let h = h.trim().parse().map_err(|e| format!("bad height {h:?}: {e}"))?;
    Ok((w, h))
}

fn parse_color(value: Option<&str>, fallback: Color) -> Result<Color> {
    match value {
        None => Ok(fallback),
        Some(s) if s.eq_ignore_ascii_case("random") => Ok(Color::random()),
        Some(s) => Ok(Color::parse(s)?),
    }
}

/// Merge command-line overrides onto the configured defaults
fn build_spec(cli: &Cli, settings: &Settings) -> Result<GradientSpec> {
    let defaults = &settings.defaults;
    let primary = parse_color(cli.primary.as_deref(), defaults.primary)?;
    let secondary = parse_color(cli.secondary.as_deref(), defaults.secondary)?;

    let direction = cli
        .direction
        .as_deref()
        .map(Direction::from_name)
        .unwrap_or(defaults.direction);
    let position = cli
        .position
        .as_deref()
        .map(Position::from_name)
        .unwrap_or(defaults.position);

    // A lone --direction or --position also selects its kind
    let kind = match (cli.kind, &cli.direction, &cli.position) {
        (Some(KindChoice::Linear), _, _) | (None, Some(_), None) => GradientKind::Linear(direction),
        (Some(KindChoice::Radial), _, _) | (None, None, Some(_)) => GradientKind::Radial(position),
        (None, _, _) => match defaults.kind {
            KindName::Linear => GradientKind::Linear(direction),
            KindName::Radial => GradientKind::Radial(position),
        },
    };

    let mut width = cli.width.unwrap_or(defaults.width);
    let mut height = cli.height.unwrap_or(defaults.height);

    // Explicit width and height release the configured lock
    let aspect = match (cli.aspect, cli.width, cli.height) {
        (Some(aspect), _, _) => aspect,
        (None, Some(_), Some(_)) => AspectRatio::Custom,
        (None, _, _) => defaults.aspect_ratio,
    };
    (width, height) = if cli.height.is_some() && cli.width.is_none() {
        aspect.fit_height(width, height)
    } else {
        aspect.fit_width(width, height)
    };
    if cli.swap {
        (width, height, _) = swap_dimensions(width, height);
    }

    GradientSpec::new(kind, primary, secondary, width, height)
        .context("Invalid image dimensions")
}

async fn generate(cli: Cli, settings: Settings) -> Result<()> {
    let spec = build_spec(&cli, &settings)?;
    if cli.css {
        println!("{}", css(&spec));
    }

    let metrics = Arc::new(Metrics::new());
    let mut controller = GenerationController::new(
        tokio::runtime::Handle::current(),
        PreviewScaler::new(settings.preview),
        settings.generation,
        metrics.clone(),
    );

    let (vw, vh) = cli.viewport;
    controller.submit_for_viewport(spec, vw, vh, cli.zoom)?;

    let mut interval =
        tokio::time::interval(Duration::from_millis(settings.generation.poll_interval_ms.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut cancel_sent = false;

    let outcome = 'poll: loop {
        tokio::select! {
            _ = interval.tick() => {
                let mut last_status = None;
                for event in controller.poll_events() {
                    match event {
                        ControllerEvent::Progress(progress) => {
                            last_status = Some(Status::Generating(progress.percent));
                        }
                        ControllerEvent::Finished(outcome) => break 'poll outcome,
                    }
                }
                if let Some(status) = last_status {
                    println!("{}", status);
                }
            }
            _ = &mut ctrl_c, if !cancel_sent => {
                cancel_sent = true;
                controller.cancel();
                println!("{}", controller.status());
            }
        }
    };

    println!("{}", controller.status());
    metrics.log_summary();

    match outcome {
        JobOutcome::Completed(image) => {
            let path = cli
                .output
                .unwrap_or_else(|| Utf8PathBuf::from(default_filename(&spec, "png")));
            save(&image, &path, settings.export.jpeg_quality)
                .with_context(|| format!("Failed to save {}", path))?;
            println!("Saved {}", path);
            Ok(())
        }
        JobOutcome::Cancelled => Ok(()),
        JobOutcome::Failed(message) => bail!("Generation failed: {}", message),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = ConfigManager::new(&cli.config_dir)?;
    let settings = config_manager.load_settings()?;

    let _guard = gradientgen::logging::setup_logging(&settings.logging)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("gradientgen-worker")
        .build()?;

    let result = runtime.block_on(generate(cli, settings));

    // A cancelled render may still be finishing its current phase
    runtime.shutdown_timeout(Duration::from_secs(5));
    tracing::info!("Shutdown complete");

    result.inspect_err(|e| tracing::error!("{:#}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec_from(args: &[&str], settings: &Settings) -> GradientSpec {
        let cli = Cli::parse_from(std::iter::once("gradientgen").chain(args.iter().copied()));
        build_spec(&cli, settings).unwrap()
    }

    #[test]
    fn test_defaults_without_flags() {
        let spec = spec_from(&[], &Settings::default());
        assert_eq!(spec.kind(), GradientKind::Linear(Direction::TopLeftToBottomRight));
        assert_eq!((spec.width(), spec.height()), (1024, 1024));
    }

    #[test]
    fn test_direction_without_kind() {
        let spec = spec_from(&["--direction", "left-to-right"], &Settings::default());
        assert_eq!(spec.kind(), GradientKind::Linear(Direction::LeftToRight));
    }

    #[test]
    fn test_position_without_kind_selects_radial() {
        let spec = spec_from(&["--position", "top-left"], &Settings::default());
        assert_eq!(spec.kind(), GradientKind::Radial(Position::TopLeft));
    }

    #[test]
    fn test_configured_kind_uses_flag_values() {
        let mut settings = Settings::default();
        settings.defaults.kind = KindName::Radial;

        let spec = spec_from(&[], &settings);
        assert_eq!(spec.kind(), GradientKind::Radial(Position::Center));

        let spec = spec_from(&["--position", "bottom-right", "--direction", "top-to-bottom"], &settings);
        assert_eq!(spec.kind(), GradientKind::Radial(Position::BottomRight));

        let spec = spec_from(&["--kind", "linear", "--direction", "top-to-bottom"], &settings);
        assert_eq!(spec.kind(), GradientKind::Linear(Direction::TopToBottom));
    }

    #[test]
    fn test_configured_aspect_locks_height() {
        let mut settings = Settings::default();
        settings.defaults.aspect_ratio = AspectRatio::SixteenNine;

        let spec = spec_from(&["--width", "1920"], &settings);
        assert_eq!((spec.width(), spec.height()), (1920, 1080));

        let spec = spec_from(&["--height", "900"], &settings);
        assert_eq!((spec.width(), spec.height()), (1600, 900));
    }

    #[test]
    fn test_explicit_dimensions_release_configured_aspect() {
        let mut settings = Settings::default();
        settings.defaults.aspect_ratio = AspectRatio::SixteenNine;

        let spec = spec_from(&["--width", "640", "--height", "480"], &settings);
        assert_eq!((spec.width(), spec.height()), (640, 480));

        let spec = spec_from(&["--width", "640", "--height", "1", "--aspect", "4:3"], &settings);
        assert_eq!((spec.width(), spec.height()), (640, 480));
    }

    #[test]
    fn test_swap_after_aspect() {
        let spec = spec_from(&["--width", "1920", "--aspect", "16:9", "--swap"], &Settings::default());
        assert_eq!((spec.width(), spec.height()), (1080, 1920));
    }
}
