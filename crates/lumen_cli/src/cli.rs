use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_math::Vec3;

/// Log levels accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "A multithreaded Monte Carlo path tracer")]
pub struct Args {
    /// JSON scene description; the built-in demo scene is used when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Output image (.png or .ppm)
    #[arg(short, long, default_value = "out/image.png")]
    pub output: PathBuf,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<usize>,

    /// Sub-pixel grid size (N gives N x N samples per pixel)
    #[arg(short = 'a', long)]
    pub anti_aliasing: Option<u32>,

    /// Maximum ray bounces
    #[arg(short = 'd', long)]
    pub max_depth: Option<u32>,

    /// Render worker threads (defaults to available parallelism)
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Number of frames to render; the camera moves by --step between frames
    #[arg(long, default_value_t = 1)]
    pub frames: u32,

    /// Camera-local movement between frames, as "x,y,z"
    #[arg(long, value_parser = parse_vec3, default_value = "0,0,0")]
    pub step: Vec3,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Parse "x,y,z" into a vector.
pub fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|part| part.trim().parse::<f64>().map_err(|e| format!("{part:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected three comma-separated numbers, got {}", parts.len())),
    }
}
