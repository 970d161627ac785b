//! Kiln command-line renderer.
//!
//! Loads a JSON scene (or the built-in demo), traces it and writes a PNG.

mod cli;
mod demo;

use anyhow::{Context, Result};
use clap::Parser;
use kiln_core::{ImageCache, SceneDesc};
use kiln_renderer::{build_render, trace};

use crate::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting Kiln");

    let (mut desc, mut cache) = match &args.scene {
        Some(path) => {
            let desc = SceneDesc::load(path)
                .with_context(|| format!("Failed to load scene {}", path.display()))?;
            let base_dir = path.parent().map(|p| p.to_path_buf()).unwrap_or_default();
            (desc, ImageCache::with_base_dir(base_dir))
        }
        None => {
            log::info!("No scene given, using the built-in demo");
            (demo::demo_scene(), ImageCache::new())
        }
    };
    args.apply_overrides(&mut desc);

    if args.dump_scene {
        println!("{}", desc.to_json_string()?);
        return Ok(());
    }

    let job = build_render(&desc, &mut cache).context("Invalid scene")?;
    let mut buffer = job.buffer();
    buffer.clear([0, 0, 0, 0]);

    trace(&mut buffer, &job.scene, &job.camera, &job.config).context("Trace failed")?;

    image::save_buffer(
        &args.output,
        buffer.as_bytes(),
        buffer.width(),
        buffer.height(),
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("Failed to write {}", args.output.display()))?;

    log::info!("Saved {}", args.output.display());
    Ok(())
}
