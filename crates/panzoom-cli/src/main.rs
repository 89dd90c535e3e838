mod commands;
mod summary;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "panzoom", about = "Pan/zoom large images through a resolution pyramid")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show image size and pyramid levels
    Info(commands::info::InfoArgs),
    /// Fit, zoom and pan, then write the visible crop
    View(commands::view::ViewArgs),
    /// Write a full-resolution window around a pixel
    Loupe(commands::loupe::LoupeArgs),
    /// Print or save the default viewer config
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match &cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::View(args) => commands::view::run(args),
        Commands::Loupe(args) => commands::loupe::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
