//! Correction kernel details.

use clap::Args;
use twinosc_dco::{
    KERNEL_WIDTH, Kernel, OVERSAMPLING, RING_LEN, Resolution, TABLE_LEN, shared_tables,
};

#[derive(Args)]
pub struct KernelArgs {
    /// Also print the step residual, one value per sample
    #[arg(long)]
    taps: bool,
}

pub fn run(args: KernelArgs) -> anyhow::Result<()> {
    let tables = shared_tables();

    println!("Correction Kernels");
    println!("==================");
    println!("  Kernel width:  {} samples", KERNEL_WIDTH);
    println!("  Ring length:   {} samples", RING_LEN);
    println!("  Oversampling:  {}x", OVERSAMPLING);
    println!("  Table length:  {} entries", TABLE_LEN);
    println!("  Latency:       {} samples", 2 * KERNEL_WIDTH);
    println!();

    for (label, resolution) in [("Full", Resolution::Full), ("Decimated", Resolution::Decimated)] {
        let kernel = tables.get(resolution);
        let summary = summarize(kernel);
        println!("  {}:", label);
        println!("    Step centre:     {:.6}", summary.step_centre);
        println!("    Step imbalance:  {:.2e}", summary.step_imbalance);
        println!("    Ramp peak:       {:.6}", summary.ramp_peak);
        println!("    Ramp tail:       {:.2e}", summary.ramp_tail);

        if args.taps {
            let taps: Vec<String> = (0..RING_LEN)
                .map(|k| format!("{:+.5}", kernel.step()[k * OVERSAMPLING]))
                .collect();
            println!("    Step taps:       {}", taps.join(" "));
        }
    }

    Ok(())
}

struct Summary {
    step_centre: f32,
    /// Largest difference between mirrored step entries.
    step_imbalance: f32,
    ramp_peak: f32,
    ramp_tail: f32,
}

fn summarize(kernel: &Kernel) -> Summary {
    let step = kernel.step();
    let ramp = kernel.ramp();
    let step_imbalance = (0..TABLE_LEN / 2)
        .map(|j| (step[j] - step[TABLE_LEN - 1 - j]).abs())
        .fold(0.0f32, f32::max);

    Summary {
        step_centre: step[TABLE_LEN / 2],
        step_imbalance,
        ramp_peak: ramp.iter().copied().fold(f32::MIN, f32::max),
        ramp_tail: ramp[TABLE_LEN - 1],
    }
}
