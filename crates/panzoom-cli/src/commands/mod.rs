pub mod config;
pub mod info;
pub mod loupe;
pub mod view;

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use panzoom_core::config::{PyramidOptions, ViewerConfig};
use panzoom_core::loader::PyramidLoader;
use panzoom_core::pyramid::Pyramid;

/// Load `--config` if given, otherwise defaults.
pub fn load_config(path: Option<&PathBuf>) -> Result<ViewerConfig> {
    match path {
        Some(path) => ViewerConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ViewerConfig::default()),
    }
}

/// Decode and build the pyramid on the loader thread behind a spinner.
pub fn build_pyramid(path: &Path, options: PyramidOptions) -> Result<Pyramid> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.set_message(format!("Building pyramid for {}", path.display()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let mut handle = PyramidLoader::spawn(path, options);
    let result = loop {
        if let Some(result) = handle.try_recv() {
            break result;
        }
        thread::sleep(Duration::from_millis(20));
    };
    pb.finish_and_clear();

    result.with_context(|| format!("Failed to build pyramid for {}", path.display()))
}

/// Parse `WxH`.
pub fn parse_size(s: &str) -> Result<(u32, u32)> {
    let Some((w, h)) = s.split_once(['x', 'X']) else {
        bail!("expected WxH, got '{s}'");
    };
    Ok((w.trim().parse()?, h.trim().parse()?))
}

/// Parse `X,Y`.
pub fn parse_point(s: &str) -> Result<(f64, f64)> {
    let Some((x, y)) = s.split_once(',') else {
        bail!("expected X,Y, got '{s}'");
    };
    Ok((x.trim().parse()?, y.trim().parse()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sizes_and_points() {
        assert_eq!(parse_size("640x480").unwrap(), (640, 480));
        assert_eq!(parse_size("12X7").unwrap(), (12, 7));
        assert!(parse_size("640").is_err());
        assert_eq!(parse_point("10.5, -3").unwrap(), (10.5, -3.0));
        assert!(parse_point("1;2").is_err());
    }
}
