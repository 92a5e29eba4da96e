//! twinosc CLI - render and manage dual-oscillator patches.

mod commands;
mod error;
mod factory;
mod patch;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "twinosc")]
#[command(author, version, about = "Band-limited dual oscillator CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a patch to a WAV file
    Render(commands::render::RenderArgs),

    /// Create, inspect and list patches
    Patch(commands::patch::PatchArgs),

    /// Show correction kernel details
    Kernel(commands::kernel::KernelArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Patch(args) => commands::patch::run(args),
        Commands::Kernel(args) => commands::kernel::run(args),
    }
}
