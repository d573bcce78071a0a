use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;
use sandfield_core::{FieldConfig, FrameLoop, RecordingSurface, Simulator};
use sandfield_platform::{HostEvent, Result, SurfaceSize};
use sandfield_ui::{run_preview, PreviewOptions};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "sandfield", about = "Interactive particle field preview")]
struct Cli {
    /// TOML file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,
    /// Force the compact profile regardless of window width
    #[arg(long)]
    compact: bool,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Overlay particle/connection counts in the preview
    #[arg(long)]
    stats: bool,
    /// Run this many frames without a window and log the counts
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,
    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn main() {
    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Sandfield error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!("loading field config from {}", path.display());
            FieldConfig::load(path)?
        }
        None => FieldConfig::default(),
    };
    for warning in config.validate() {
        warn!("field config: {warning}");
    }

    if cli.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let size = SurfaceSize::new(cli.width, cli.height);
    let compact = cli.compact || config.is_compact_width(size.width);
    if let Some(frames) = cli.headless {
        return run_headless(config, size, compact, cli.seed, frames);
    }

    info!("Sandfield preview starting");
    run_preview(PreviewOptions {
        config,
        width: size.width,
        height: size.height,
        force_compact: cli.compact.then_some(true),
        seed: cli.seed,
        show_stats: cli.stats,
    })
}

/// Drive the field against a recording surface with the pointer circling the centre.
fn run_headless(
    config: FieldConfig,
    size: SurfaceSize,
    compact: bool,
    seed: Option<u64>,
    frames: u64,
) -> Result<()> {
    let mut sim = match seed {
        Some(seed) => {
            let mut field = sandfield_core::ParticleField::with_seed(config, seed)?;
            field.configure(size.width, size.height, compact);
            Simulator::new(field)
        }
        None => Simulator::mount(config, size, compact)?,
    };
    let mut surface = RecordingSurface::new(size);
    let mut frame_loop = FrameLoop::new();
    let centre = Vec2::new(size.width, size.height) * 0.5;
    let radius = size.width.min(size.height) * 0.25;

    let mut connections = 0;
    for frame in 0..frames {
        let angle = frame as f32 * 0.02;
        sim.handle_event(HostEvent::PointerMove(centre + Vec2::from_angle(angle) * radius));
        frame_loop.tick(&mut sim, &mut surface);
        connections += frame_loop.last_stats().connections;
    }

    let average = if frames == 0 { 0.0 } else { connections as f64 / frames as f64 };
    info!(
        "headless run: {} frames, {} particles, {:.1} connections/frame, {} draw calls",
        frame_loop.frames(),
        sim.field().particles().len(),
        average,
        surface.draw_calls
    );
    Ok(())
}
