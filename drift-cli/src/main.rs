use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use drift_cli::{load_settings, write_dump, HeadlessRun, PointerOrbit};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless particle field simulation", long_about = None)]
struct Args {
    /// Settings document (JSON). Defaults are used for anything it leaves out
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Override the shape (Torus, TorusKnot, Icosahedron, Sphere, Box, MobiusStrip, TrefoilKnot, Cloud)
    #[arg(long)]
    shape: Option<String>,

    /// Override the particle count
    #[arg(short, long)]
    count: Option<u32>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Radius of the pointer's orbit around the origin; negative disables the pointer
    #[arg(short, long, default_value_t = 4.0, allow_hyphen_values = true)]
    pointer_radius: f32,

    /// Seed for a repeatable run
    #[arg(long)]
    seed: Option<u64>,

    /// Log statistics every N frames (0 disables)
    #[arg(short, long, default_value_t = 60)]
    report_every: u64,

    /// Write the final frame's positions to this JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut settings = load_settings(args.settings.as_deref())?;
    if let Some(shape) = args.shape {
        settings.shape.shape = shape;
    }
    if let Some(count) = args.count {
        settings.shape.count = count;
    }

    log::info!("Shape: {} x {}", settings.shape.shape, settings.shape.count);
    log::info!("Frames: {}", args.frames);

    let pointer = (args.pointer_radius >= 0.0).then(|| PointerOrbit::new(args.pointer_radius));
    match pointer {
        Some(orbit) => log::info!("Pointer orbiting at radius {}", orbit.radius),
        None => log::info!("No pointer, field relaxes only"),
    }

    let mut run = HeadlessRun::new(&settings, pointer, args.seed)
        .context("Failed to initialize simulation")?;
    run.run(args.frames, args.report_every);

    if let Some(path) = args.output {
        write_dump(&path, &run.dump())?;
    }

    Ok(())
}
