//! Patch management commands.

use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use crate::error::PatchError;
use crate::factory::{FACTORY_PATCH_NAMES, factory_patches, get_factory_patch};
use crate::patch::{OscPatch, Patch};

#[derive(Args)]
pub struct PatchArgs {
    #[command(subcommand)]
    command: PatchCommand,
}

#[derive(Subcommand)]
enum PatchCommand {
    /// Write a new patch file
    Init {
        /// Destination TOML file
        path: PathBuf,

        /// Start from a factory patch instead of the defaults
        #[arg(long)]
        factory: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show a patch file or factory patch
    Show {
        /// Patch file path or factory patch name
        name: String,
    },

    /// List factory patches
    List,
}

pub fn run(args: PatchArgs) -> anyhow::Result<()> {
    match args.command {
        PatchCommand::Init {
            path,
            factory,
            force,
        } => init_patch(&path, factory.as_deref(), force),
        PatchCommand::Show { name } => show_patch(&name),
        PatchCommand::List => list_patches(),
    }
}

fn init_patch(path: &Path, factory: Option<&str>, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let patch = match factory {
        Some(name) => {
            get_factory_patch(name).ok_or_else(|| PatchError::NotFound(name.to_string()))?
        }
        None => {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled");
            Patch::new(name)
        }
    };

    patch.save(path)?;
    tracing::debug!(path = %path.display(), "patch written");
    println!("Wrote '{}' to {}", patch.name, path.display());
    Ok(())
}

fn show_patch(name: &str) -> anyhow::Result<()> {
    let path = PathBuf::from(name);
    let patch = if path.exists() {
        Patch::load(&path)?
    } else {
        get_factory_patch(name).ok_or_else(|| PatchError::NotFound(name.to_string()))?
    };

    println!("Patch: {}", patch.name);
    if let Some(desc) = &patch.description {
        println!("  {}", desc);
    }
    println!();
    println!("  Sample rate:  {} Hz", patch.sample_rate);
    println!("  Note:         {:.2}", patch.note);
    println!("  Hard sync:    {}", if patch.hard_sync { "on" } else { "off" });
    println!("  Cross-mod:    {:.2} st", patch.cross_mod);
    println!("  Pulse width:  {:.2}", patch.pulse_width);
    println!("  Noise:        {:.2}", patch.noise_level);
    println!("  Tune:         {:+.2} st, octave {:+}", patch.tune, patch.octave);
    println!(
        "  Detune:       {:.2} st (osc2 {:+.2} st)",
        patch.total_detune, patch.slave_detune
    );
    println!("  Drift:        {:.3} st", patch.drift);
    println!("  Quantize:     {}", if patch.quantize { "on" } else { "off" });
    println!("  Decimation:   {}", if patch.decimation { "on" } else { "off" });
    print_osc("Osc 1", &patch.osc1);
    print_osc("Osc 2", &patch.osc2);

    match patch.validate() {
        Ok(()) => println!("\n  Valid"),
        Err(e) => println!("\n  Invalid: {}", e),
    }

    Ok(())
}

fn print_osc(label: &str, osc: &OscPatch) {
    println!(
        "  {}:        {:9} coarse {:+.2} st, pw mod {:+.2}, level {:.2}",
        label,
        osc.shape_name(),
        osc.coarse,
        osc.pulse_width_mod,
        osc.level
    );
}

fn list_patches() -> anyhow::Result<()> {
    println!("Factory Patches:");
    println!("================");
    for (key, patch) in FACTORY_PATCH_NAMES.iter().zip(factory_patches()) {
        let desc = patch.description.unwrap_or_default();
        println!("  {:12} - {}", key, desc);
    }
    println!();
    println!("  Copy one with: twinosc patch init <path> --factory <name>");
    Ok(())
}
