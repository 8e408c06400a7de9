use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{Camera, SceneDescription};

mod cli;

use cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    let scene = match &args.scene {
        Some(path) => SceneDescription::load(path)
            .with_context(|| format!("Failed to load scene {}", path.display()))?,
        None => {
            log::info!("No scene given, using the demo scene");
            SceneDescription::demo()
        }
    };

    let mut params = scene.camera.clone().unwrap_or_default();
    if let Some(width) = args.width {
        params.image_width = width;
    }
    if let Some(anti_aliasing) = args.anti_aliasing {
        params.anti_aliasing = anti_aliasing;
    }
    if let Some(max_depth) = args.max_depth {
        params.max_depth = max_depth;
    }
    if args.workers.is_some() {
        params.workers = args.workers;
    }

    let world = scene.build();
    let mut camera = Camera::new(params).context("Failed to set up camera")?;

    let start = Instant::now();
    for frame in 0..args.frames {
        if frame > 0 {
            camera.translate(args.step);
        }
        camera.render(&world);
        log::debug!("Frame {} done, eye at {:?}", frame, camera.look_from());
    }
    let elapsed = start.elapsed();

    log::info!(
        "Rendered {} frame(s) of {}x{} in {:?} ({:.2} fps)",
        args.frames,
        camera.image_width(),
        camera.image_height(),
        elapsed,
        f64::from(args.frames) / elapsed.as_secs_f64().max(f64::EPSILON),
    );
    log::info!("lookFrom: {:?}, lookAt: {:?}", camera.look_from(), camera.look_at());

    let directory = args.output.parent().unwrap_or(std::path::Path::new(""));
    let file_name = args
        .output
        .file_name()
        .and_then(|name| name.to_str())
        .context("Output path has no file name")?;
    camera
        .screenshot(directory, file_name)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
