//! aurora - live synth and spectrum in the terminal
//!
//! Run with: cargo run --bin aurora -- --volume 0.6

mod app;
mod ui;

use std::{fs::File, path::Path, path::PathBuf, sync::Mutex};

use aurora_synth::{AnalyserConfig, EngineConfig};
use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing_subscriber::EnvFilter;

use app::App;

#[derive(Parser, Debug)]
#[command(name = "aurora", version, about = "Pluck, drone and watch the spectrum")]
struct Args {
    /// Initial master level, 0.0 to 1.0
    #[arg(long, default_value_t = 0.8)]
    volume: f32,

    /// Display refresh rate of the render loop
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Device pixel ratio applied to the spectrum canvas
    #[arg(long, default_value_t = 1.0)]
    pixel_ratio: f32,

    /// Log destination; the terminal itself belongs to the UI
    #[arg(long, default_value = "aurora.log")]
    log_file: PathBuf,

    /// Spectrum smoothing between analysis frames, 0.0 to 1.0
    #[arg(long, default_value_t = 0.85)]
    smoothing: f32,
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(&args.log_file)?;

    let config = EngineConfig {
        initial_level: args.volume,
        analyser: AnalyserConfig {
            smoothing: args.smoothing,
            ..AnalyserConfig::default()
        },
        ..EngineConfig::default()
    };
    let mut app = App::new(config, args.fps, args.pixel_ratio)?;

    let mut terminal = ratatui::init();
    let res = app.run(&mut terminal);
    ratatui::restore();
    res
}

fn init_tracing(path: &Path) -> EyreResult<()> {
    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
