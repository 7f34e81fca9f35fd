//! `helios`: render a JSON scene description to a PNG image.

mod camera_config;

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use helios_core::{parse_scene_named, Color};
use helios_renderer::{render, BasicRayTracer, ImageWriter, DEFAULT_MAX_LEVEL};

use crate::camera_config::SceneFile;

#[derive(Debug, Parser)]
#[command(name = "helios", version, about = "Render a JSON scene description to a PNG image")]
struct Args {
    /// Scene description file
    #[arg(short, long)]
    scene: PathBuf,

    /// Output PNG file
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    /// Image width in pixels
    #[arg(long, default_value_t = 500)]
    width: u32,

    /// Image height in pixels
    #[arg(long, default_value_t = 500)]
    height: u32,

    /// Render worker threads, overriding the scene file (1 = sequential)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Log progress every N seconds
    #[arg(long)]
    progress_secs: Option<f64>,

    /// Draw white grid lines every N pixels over the result
    #[arg(long)]
    grid: Option<u32>,

    /// Maximum reflection/refraction recursion depth
    #[arg(long, default_value_t = DEFAULT_MAX_LEVEL)]
    max_level: u32,
}

fn run(args: &Args) -> Result<()> {
    let text = fs::read_to_string(&args.scene)
        .with_context(|| format!("failed to read {}", args.scene.display()))?;
    let stem = args
        .scene
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("scene");
    let scene = parse_scene_named(&text, stem)
        .with_context(|| format!("invalid scene {}", args.scene.display()))?;

    let camera_config = serde_json::from_str::<SceneFile>(&text)
        .context("invalid camera section")?
        .camera
        .unwrap_or_default();

    let mut camera = camera_config.build().context("invalid camera")?;
    if let Some(threads) = args.threads.or(camera_config.threads()) {
        camera = camera.with_threads(threads);
    }
    if let Some(secs) = args.progress_secs {
        let interval = Duration::try_from_secs_f64(secs).context("invalid --progress-secs")?;
        camera = camera.with_progress_interval(interval);
    }

    let tracer = BasicRayTracer::new(&scene).with_max_level(args.max_level);

    let mut sink = ImageWriter::new(&args.output, args.width, args.height);
    if let Some(interval) = args.grid {
        sink = sink.with_grid(interval, Color::WHITE);
    }

    log::info!(
        "Rendering scene '{}' ({} lights) to {}",
        scene.name,
        scene.light_count(),
        args.output.display()
    );
    render(&camera, &tracer, &sink)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    run(&args)
}
