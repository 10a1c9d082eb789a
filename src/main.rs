// src/main.rs - Layer simulator entry point
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use gcode_layer_sim::config::{self, Config};
use gcode_layer_sim::interpreter::{Interpreter, InterpreterError, RunSummary};
use gcode_layer_sim::layers::JpegExporter;
use gcode_layer_sim::motion::{Motors, PassthroughMotors, SimulatedMotors};

const DEFAULT_CONFIG: &str = "layer-sim.toml";

/// Replay a G-code program on a virtual bed and write one JPEG per layer.
#[derive(Parser, Debug)]
#[command(name = "layer-sim", version, about)]
struct Cli {
    /// Path to a TOML config file (layer-sim.toml is used when present)
    config: Option<PathBuf>,

    /// G-code program to simulate (overrides simulation.gcode)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for layer images (overrides simulation.output_dir)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Track positions and layers without rendering or writing images
    #[arg(long)]
    dry_run: bool,

    /// Log every command
    #[arg(short, long)]
    verbose: bool,
}

fn load(cli: &Cli) -> Result<Config, config::ConfigError> {
    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => config::load_config(DEFAULT_CONFIG)?,
        None => Config::default(),
    };
    if let Some(input) = &cli.input {
        cfg.simulation.gcode = input.clone();
    }
    if let Some(dir) = &cli.output_dir {
        cfg.simulation.output_dir = dir.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_motors(cfg: &Config, dry_run: bool) -> Result<Box<dyn Motors>, Box<dyn std::error::Error>> {
    if dry_run {
        tracing::info!("Dry run: no images will be written");
        return Ok(Box::new(PassthroughMotors::new(cfg.bed.pixels_per_mm)));
    }
    let exporter = JpegExporter::create(&cfg.simulation.output_dir, cfg.render.jpeg_quality)?;
    Ok(Box::new(SimulatedMotors::from_config(cfg, exporter)))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let cfg = match load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let size = cfg.bed.canvas_size();
    tracing::info!(
        "Bed: {} mm at {} px/mm ({}x{} canvas)",
        cfg.bed.size_mm,
        cfg.bed.pixels_per_mm,
        size,
        size
    );

    let motors = match build_motors(&cfg, cli.dry_run) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("Failed to prepare output directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut interpreter = match Interpreter::open(&cfg.simulation.gcode, motors) {
        Ok(i) => i,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = interpreter.run();
    if let Ok(summary) = &result {
        tracing::info!("{} bytes read, {} layers captured", summary.bytes_read, summary.layers);
    }
    ExitCode::from(exit_status(&result))
}

/// Process status for a finished run: 0 on success, -1 (255 as seen by the
/// parent) for an unknown command, 1 for anything else.
fn exit_status(result: &Result<RunSummary, InterpreterError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(InterpreterError::UnknownGCode { .. }) => (-1i8) as u8,
        Err(_) => 1,
    }
}
