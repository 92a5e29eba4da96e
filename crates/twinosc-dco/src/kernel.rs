//! Oversampled band-limited correction kernels.
//!
//! A naive sawtooth or pulse jumps instantaneously, which puts energy at
//! every harmonic and folds it back below Nyquist. The fix is to subtract,
//! around every jump, the difference between the naive step and a
//! band-limited one (BLEP). Slope corners (triangle) get the same treatment
//! with the integral of the step (BLAMP).
//!
//! The residuals are tabulated once, [`OVERSAMPLING`] points per sample over
//! `2 * KERNEL_WIDTH` samples, so a discontinuity at any sub-sample position
//! is corrected with a table walk and one linear interpolation per output
//! sample.
//!
//! # Table layout
//!
//! Entry `j` corresponds to `j / OVERSAMPLING` samples after the
//! discontinuity. The kernel is centred on `KERNEL_WIDTH`, the latency of
//! the naive signal it is paired with.
//!
//! - **Step**: the band-limited step `s(t)` for `t < KERNEL_WIDTH`, and
//!   `1 - s(t)` after it. Both halves decay to zero at the table edges and
//!   mirror each other; the corrector adds the first half and subtracts
//!   the second.
//! - **Ramp**: `r(t) - max(0, t - KERNEL_WIDTH)` where `r` is the running
//!   integral of `s`. Positive, zero at both edges.
//!
//! # Resolutions
//!
//! [`Resolution::Full`] is band-limited just under Nyquist.
//! [`Resolution::Decimated`] cuts at half that, for voices rendered at
//! twice the output rate and decimated afterwards.

use core::f64::consts::PI;
use libm::{cos, sin};

/// Kernel half-width in samples. Also the correction latency.
pub const KERNEL_WIDTH: usize = 16;

/// Length of a corrector's ring buffer (full kernel support).
pub const RING_LEN: usize = 2 * KERNEL_WIDTH;

/// Table points per sample.
pub const OVERSAMPLING: usize = 64;

/// Entries per table, including the guard point for the last interpolation.
pub const TABLE_LEN: usize = RING_LEN * OVERSAMPLING + 1;

/// Cutoff of the full-resolution kernel, as a fraction of Nyquist.
const FULL_CUTOFF: f64 = 0.9;

/// Cutoff of the decimated kernel, as a fraction of Nyquist.
const DECIMATED_CUTOFF: f64 = 0.45;

/// Which kernel bandwidth a corrector reads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    /// Band-limited to just under the output Nyquist.
    #[default]
    Full,
    /// Band-limited to half the band, for 2x-rendered voices.
    Decimated,
}

/// Step and ramp residual tables for one bandwidth.
#[derive(Clone)]
pub struct Kernel {
    step: [f32; TABLE_LEN],
    ramp: [f32; TABLE_LEN],
}

impl Kernel {
    /// Builds the tables for a windowed-sinc kernel with the given cutoff
    /// (fraction of Nyquist).
    fn design(cutoff: f64) -> Self {
        let dt = 1.0 / OVERSAMPLING as f64;
        let intervals = (TABLE_LEN - 1) as f64;
        let centre = KERNEL_WIDTH as f64;

        let impulse = |j: usize| -> f64 {
            let t = j as f64 * dt - centre;
            let u = j as f64 / intervals;
            let window = 0.42 - 0.5 * cos(2.0 * PI * u) + 0.08 * cos(4.0 * PI * u);
            let x = PI * cutoff * t;
            let sinc = if x == 0.0 { 1.0 } else { sin(x) / x };
            cutoff * sinc * window
        };

        // Trapezoidal integration keeps the step exactly point-symmetric
        // about the centre, which the mirrored table halves rely on.
        let mut step = [0.0f64; TABLE_LEN];
        let mut prev = impulse(0);
        for j in 1..TABLE_LEN {
            let cur = impulse(j);
            step[j] = step[j - 1] + 0.5 * (prev + cur) * dt;
            prev = cur;
        }
        let total = step[TABLE_LEN - 1];
        for v in &mut step {
            *v /= total;
        }

        let mut kernel = Self {
            step: [0.0; TABLE_LEN],
            ramp: [0.0; TABLE_LEN],
        };
        let mut integral = 0.0f64;
        for j in 0..TABLE_LEN {
            if j > 0 {
                integral += 0.5 * (step[j - 1] + step[j]) * dt;
            }
            let t = j as f64 * dt;
            let residual = if t < centre { step[j] } else { 1.0 - step[j] };
            kernel.step[j] = residual as f32;
            kernel.ramp[j] = (integral - (t - centre).max(0.0)) as f32;
        }
        kernel
    }

    /// Step (BLEP) residual table.
    #[inline]
    pub fn step(&self) -> &[f32; TABLE_LEN] {
        &self.step
    }

    /// Ramp (BLAMP) residual table.
    #[inline]
    pub fn ramp(&self) -> &[f32; TABLE_LEN] {
        &self.ramp
    }
}

impl core::fmt::Debug for Kernel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Kernel")
            .field("len", &TABLE_LEN)
            .field("step_peak", &self.step[TABLE_LEN / 2])
            .finish_non_exhaustive()
    }
}

/// Both kernel bandwidths. Immutable once built.
///
/// Building takes a few hundred microseconds and ~32 KiB; share one
/// instance between every oscillator with [`shared_tables`] (std) or a
/// `&'static` of your own.
#[derive(Clone, Debug)]
pub struct KernelTables {
    full: Kernel,
    decimated: Kernel,
}

impl KernelTables {
    /// Designs both kernels.
    pub fn new() -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            width = KERNEL_WIDTH,
            oversampling = OVERSAMPLING,
            "building correction kernels"
        );

        Self {
            full: Kernel::design(FULL_CUTOFF),
            decimated: Kernel::design(DECIMATED_CUTOFF),
        }
    }

    /// Kernel for the given resolution.
    #[inline]
    pub fn get(&self, resolution: Resolution) -> &Kernel {
        match resolution {
            Resolution::Full => &self.full,
            Resolution::Decimated => &self.decimated,
        }
    }
}

impl Default for KernelTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide kernel tables, built on first use.
#[cfg(feature = "std")]
pub fn shared_tables() -> &'static KernelTables {
    static TABLES: std::sync::OnceLock<KernelTables> = std::sync::OnceLock::new();
    TABLES.get_or_init(KernelTables::new)
}
