use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::{info, warn};

use darkroom_enlarger_rs::Enlarger;
use darkroom_enlarger_rs::display::{DisplaySurface, HeadlessSurface, PrintOutcome, PreviewSurface};
use darkroom_enlarger_rs::image_pipeline::{EnlargerConfig, LutStore, TickPolicy, config};
use darkroom_enlarger_rs::logger;

#[derive(Parser)]
#[command(name = "darkroom-enlarger")]
#[command(about = "Expose a 16-bit negative through an 8-bit monochrome display")]
struct Cli {
    /// Source image, 16-bit grayscale TIFF
    #[arg(short, long)]
    image: PathBuf,

    /// Tone curve, 256x256 16-bit grayscale TIFF
    #[arg(short, long)]
    lut: PathBuf,

    /// Exposure time in seconds
    #[arg(short, long, default_value_t = 10.0)]
    exposure: f64,

    /// Average every N columns before fitting (anamorphic compression)
    #[arg(short, long)]
    squash: Option<usize>,

    /// Frames per emulation cycle
    #[arg(short, long, default_value_t = config::DEFAULT_FRAME_COUNT)]
    frames: usize,

    /// Display refresh rate in frames per second
    #[arg(long, default_value_t = config::DEFAULT_REFRESH_RATE)]
    fps: u32,

    /// Show each frame once for exposure / frames instead of cycling at --fps
    #[arg(long, conflicts_with = "fps")]
    split_exposure: bool,

    /// Render into a 1280x720 test window instead of the 8K display
    #[arg(long)]
    preview: bool,

    /// Prepare the frame set and stop before printing
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let cli = Cli::parse();

    let exposure = Duration::try_from_secs_f64(cli.exposure)
        .with_context(|| format!("invalid exposure: {}s", cli.exposure))?;
    if exposure.is_zero() {
        bail!("exposure must be greater than zero");
    }

    let tick = if cli.split_exposure {
        TickPolicy::SplitExposure
    } else {
        TickPolicy::RefreshRate(cli.fps)
    };
    let config = EnlargerConfig::builder()
        .frame_count(cli.frames)
        .tick(tick)
        .build();

    info!(
        canvas = ?config.canvas.dimensions(),
        frames = config.frame_count,
        tick = ?config.tick,
        "Starting darkroom enlarger"
    );

    if cli.preview {
        let surface = PreviewSurface::new(&config.canvas);
        expose(&cli, config, surface, exposure)
    } else {
        let surface = HeadlessSurface::new(&config.canvas);
        expose(&cli, config, surface, exposure)
    }
}

fn expose<D: DisplaySurface + 'static>(
    cli: &Cli,
    config: EnlargerConfig,
    surface: D,
    exposure: Duration,
) -> anyhow::Result<()> {
    let enlarger = Enlarger::new(config, surface).context("invalid configuration")?;

    let lut = LutStore::default()
        .load(&cli.lut)
        .with_context(|| format!("failed to load LUT {}", cli.lut.display()))?;

    let (frames, timings) = enlarger
        .prepare_file(&cli.image, &lut, cli.squash)
        .with_context(|| format!("failed to prepare {}", cli.image.display()))?;
    timings.log_summary();

    if cli.dry_run {
        info!(frames = frames.len(), "Dry run, skipping exposure");
        return Ok(());
    }

    enlarger.start(frames, exposure)?;
    match enlarger.wait() {
        Some(PrintOutcome::Completed { frames_presented }) => {
            info!(frames_presented, "Exposure complete")
        }
        Some(PrintOutcome::Cancelled { frames_presented }) => {
            warn!(frames_presented, "Exposure cancelled")
        }
        Some(PrintOutcome::Failed(reason)) => bail!("exposure failed: {reason}"),
        None => bail!("no print session ran"),
    }

    Ok(())
}
