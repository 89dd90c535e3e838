use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{build_pyramid, load_config};

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,

    /// Smallest pyramid level side (clamped up to 32)
    #[arg(long)]
    pub min_dimension: Option<u32>,

    /// Viewer config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(min_dimension) = args.min_dimension {
        config.min_dimension = min_dimension;
    }
    let config = config.validated();

    let pyramid = build_pyramid(&args.file, config.pyramid_options())?;
    crate::summary::print_pyramid_summary(&args.file, &config, &pyramid);
    Ok(())
}
