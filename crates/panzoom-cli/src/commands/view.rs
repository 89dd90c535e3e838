use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use panzoom_core::engine::{Engine, ViewChange};
use panzoom_core::geometry::{DevicePoint, ViewportSize};
use panzoom_core::io::image_io::save_image;

use super::{build_pyramid, load_config, parse_point, parse_size};

#[derive(Args)]
pub struct ViewArgs {
    /// Input image file
    pub file: PathBuf,

    /// Viewport size as WxH
    #[arg(long, default_value = "800x600")]
    pub viewport: String,

    /// Scroll ticks to apply (positive zooms in)
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub ticks: i32,

    /// Extra zoom factor (e.g. 2 doubles, 0.5 halves)
    #[arg(long)]
    pub factor: Option<f64>,

    /// Device point to zoom about, as X,Y (defaults to the viewport centre)
    #[arg(long)]
    pub at: Option<String>,

    /// Drag by DX,DY device pixels after zooming
    #[arg(long, allow_hyphen_values = true)]
    pub pan: Option<String>,

    /// Scroll sensitivity in ticks per octave (overrides the config)
    #[arg(long)]
    pub sensitivity: Option<u32>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output file path
    #[arg(short, long, default_value = "view.png")]
    pub output: PathBuf,
}

pub fn run(args: &ViewArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(sensitivity) = args.sensitivity {
        config.sensitivity = sensitivity;
    }
    let config = config.validated();

    let (w, h) = parse_size(&args.viewport).context("Invalid --viewport")?;
    let viewport = ViewportSize::new(f64::from(w), f64::from(h));
    let at = match args.at {
        Some(ref s) => {
            let (x, y) = parse_point(s).context("Invalid --at")?;
            DevicePoint::new(x, y)
        }
        None => viewport.center(),
    };

    let pyramid = build_pyramid(&args.file, config.pyramid_options())?;
    let mut engine = Engine::new(pyramid, &config)?;
    let mut change = engine.resize(viewport)?;

    let direction = f64::from(args.ticks.signum());
    for _ in 0..args.ticks.unsigned_abs() {
        change = engine.scroll(at, direction)?;
    }
    if let Some(factor) = args.factor {
        change = engine.zoom_by_factor(at, factor)?;
    }
    if let Some(ref pan) = args.pan {
        let (dx, dy) = parse_point(pan).context("Invalid --pan")?;
        change = drag(&mut engine, at, DevicePoint::new(at.x + dx, at.y + dy))?;
    }

    let view = engine.current_image()?;
    save_image(&view.image, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let status = engine.status(Some(at), view.pixel_count);
    crate::summary::print_view_summary(&change, &status, &view, &args.output);
    Ok(())
}

fn drag(engine: &mut Engine, from: DevicePoint, to: DevicePoint) -> Result<ViewChange> {
    engine.begin_drag(from)?;
    let change = engine.drag_to(to)?;
    engine.end_drag();
    change.context("Drag did not start")
}
