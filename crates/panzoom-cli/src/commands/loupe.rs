use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use panzoom_core::extract::extract_loupe;
use panzoom_core::geometry::{ImagePoint, ImageSize};
use panzoom_core::io::image_io::save_image;

use super::{build_pyramid, load_config, parse_point, parse_size};

#[derive(Args)]
pub struct LoupeArgs {
    /// Input image file
    pub file: PathBuf,

    /// Full-resolution pixel to centre on, as X,Y
    #[arg(long)]
    pub at: String,

    /// Window size as WxH (defaults to the config's loupe size)
    #[arg(long)]
    pub size: Option<String>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "loupe.png")]
    pub output: PathBuf,
}

pub fn run(args: &LoupeArgs) -> Result<()> {
    let config = load_config(args.config.as_ref())?.validated();
    let (x, y) = parse_point(&args.at).context("Invalid --at")?;
    let size = match args.size {
        Some(ref s) => {
            let (w, h) = parse_size(s).context("Invalid --size")?;
            ImageSize::new(w, h)
        }
        None => config.loupe_size,
    };

    let pyramid = build_pyramid(&args.file, config.pyramid_options())?;
    let center = ImagePoint::new(x.round() as i64, y.round() as i64);
    let window = extract_loupe(&pyramid, center, size, config.max_crop_dimension)?;

    save_image(&window, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    println!(
        "Saved {}x{} loupe at {},{} to {}",
        window.width(),
        window.height(),
        center.x,
        center.y,
        args.output.display()
    );
    Ok(())
}
