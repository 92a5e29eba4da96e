//! Render a patch to audio.

use anyhow::{Context, bail};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use crate::error::PatchError;
use crate::factory::get_factory_patch;
use crate::patch::Patch;
use crate::wav::write_wav;

/// Samples rendered between progress updates.
const BLOCK_SIZE: usize = 1024;

#[derive(Args)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Patch file to render
    #[arg(long, conflicts_with = "factory")]
    patch: Option<PathBuf>,

    /// Factory patch to render (default: init)
    #[arg(long)]
    factory: Option<String>,

    /// Duration in seconds
    #[arg(long, default_value = "2.0")]
    duration: f32,

    /// Override the patch note (MIDI semitones)
    #[arg(long)]
    note: Option<f32>,

    /// Override the patch sample rate
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Seed for drift, noise and starting phases
    #[arg(long, default_value = "1")]
    seed: u32,

    /// Output gain applied after the oscillator
    #[arg(long, default_value = "0.5")]
    amplitude: f32,

    /// Pulse-width LFO rate in Hz (0 = off)
    #[arg(long, default_value = "0.0")]
    pwm_rate: f32,

    /// Pulse-width LFO depth, added to both oscillators
    #[arg(long, default_value = "0.5")]
    pwm_depth: f32,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut patch = resolve_patch(args.patch.as_ref(), args.factory.as_deref())?;
    if let Some(note) = args.note {
        patch.note = note;
    }
    if let Some(sample_rate) = args.sample_rate {
        patch.sample_rate = sample_rate;
    }
    patch.validate().map_err(PatchError::from)?;

    if args.duration.is_nan() || args.duration <= 0.0 {
        bail!("duration must be positive, got {}", args.duration);
    }

    let sample_rate = patch.sample_rate;
    let total = (args.duration * sample_rate as f32) as usize;
    let mut dco = patch.oscillator(args.seed);
    let latency = dco.latency();

    tracing::info!(
        patch = %patch.name,
        sample_rate,
        samples = total,
        seed = args.seed,
        "rendering"
    );

    // Drop the start-up latency so the file begins with the first cycle.
    let mut skip = vec![0.0f32; latency];
    dco.process_block(&mut skip);

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let lfo_step = std::f32::consts::TAU * args.pwm_rate / sample_rate as f32;
    let mut lfo_phase = 0.0f32;
    let mut samples = vec![0.0f32; total];

    for block in samples.chunks_mut(BLOCK_SIZE) {
        if args.pwm_rate > 0.0 {
            for sample in block.iter_mut() {
                let pwm = args.pwm_depth * lfo_phase.sin();
                dco.set_pulse_width_mod(
                    patch.osc1.pulse_width_mod + pwm,
                    patch.osc2.pulse_width_mod + pwm,
                );
                lfo_phase = (lfo_phase + lfo_step) % std::f32::consts::TAU;
                *sample = dco.process() * args.amplitude;
            }
        } else {
            dco.process_block(block);
            for sample in block.iter_mut() {
                *sample *= args.amplitude;
            }
        }
        pb.inc(block.len() as u64);
    }
    pb.finish_and_clear();

    write_wav(&args.output, &samples, sample_rate)
        .with_context(|| format!("writing {}", args.output.display()))?;

    let peak = samples.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    let rms = if samples.is_empty() {
        0.0
    } else {
        (samples.iter().map(|s| f64::from(*s) * f64::from(*s)).sum::<f64>() / samples.len() as f64)
            .sqrt()
    };

    println!(
        "Rendered '{}' to {} ({:.2}s @ {} Hz)",
        patch.name,
        args.output.display(),
        args.duration,
        sample_rate
    );
    println!("  Peak: {:.3} ({:.1} dBFS)", peak, to_db(f64::from(peak)));
    println!("  RMS:  {:.3} ({:.1} dBFS)", rms, to_db(rms));
    if peak > 1.0 {
        tracing::warn!(peak, "output exceeds full scale; lower --amplitude");
    }

    Ok(())
}

/// Picks the patch from a file, a factory name, or the init patch.
fn resolve_patch(path: Option<&PathBuf>, factory: Option<&str>) -> Result<Patch, PatchError> {
    match (path, factory) {
        (Some(path), _) => Patch::load(path),
        (None, Some(name)) => {
            get_factory_patch(name).ok_or_else(|| PatchError::NotFound(name.to_string()))
        }
        (None, None) => {
            get_factory_patch("init").ok_or_else(|| PatchError::NotFound("init".to_string()))
        }
    }
}

fn to_db(linear: f64) -> f64 {
    20.0 * linear.max(1e-10).log10()
}
