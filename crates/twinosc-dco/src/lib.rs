//! twinosc DCO - band-limited dual oscillator with hard sync and cross-mod
//!
//! This crate renders the classic two-oscillator voice source of a
//! subtractive synthesizer without the aliasing naive waveforms produce.
//!
//! # Components
//!
//! ## Kernels
//!
//! - [`KernelTables`] - Oversampled step (BLEP) and ramp (BLAMP) residuals,
//!   full band and half band
//! - [`shared_tables`] - Process-wide instance (std only)
//!
//! ## Correctors
//!
//! - [`Corrector`] - Detects discontinuities in a phase stream, injects
//!   scaled kernel residuals and renders the corrected waveform
//! - [`Shape`] - Saw, pulse or triangle
//! - [`HardSync`] - Per-sample reset signal for a synced corrector
//!
//! ## Oscillator pair
//!
//! - [`DualOscillator`] - Master and slave oscillators, drift, noise and mix
//! - [`OscillatorSettings`] / [`WaveShape`] - Per-oscillator controls
//!
//! ```rust
//! use twinosc_dco::{DualOscillator, OscillatorSettings, WaveShape};
//!
//! let mut dco = DualOscillator::new(48000.0, 7);
//! dco.set_note(48.0);
//! dco.set_osc1(OscillatorSettings {
//!     shape: WaveShape::PULSE,
//!     level: 0.6,
//!     ..OscillatorSettings::default()
//! });
//! dco.set_cross_mod(6.0);
//!
//! let sample = dco.process();
//! assert!(sample.is_finite());
//! ```
//!
//! # Latency
//!
//! Every correction needs [`KERNEL_WIDTH`] samples of look-ahead, and the
//! master is delayed once more to line up with the slave:
//! [`DualOscillator::latency`] is `2 * KERNEL_WIDTH` samples.
//!
//! # no_std Support
//!
//! Disable default features and supply your own `&'static KernelTables`
//! to [`DualOscillator::with_source`]:
//!
//! ```toml
//! [dependencies]
//! twinosc-dco = { version = "0.1", default-features = false }
//! ```
//!
//! # Features
//!
//! - `std` (default) - [`shared_tables`] and [`DualOscillator::new`]
//! - `tracing` - debug events on construction and configuration changes

#![cfg_attr(not(feature = "std"), no_std)]

pub mod corrector;
pub mod dual;
pub mod kernel;

pub use corrector::{Corrector, HardSync, Shape, phase_at_sync};
pub use dual::{
    DEFAULT_DRIFT, DualOscillator, MAX_INCREMENT, MIN_INCREMENT, NOISE_FLOOR, NOISE_GAIN,
    OUTPUT_GAIN, OscillatorSettings, WaveShape,
};
#[cfg(feature = "std")]
pub use kernel::shared_tables;
pub use kernel::{KERNEL_WIDTH, Kernel, KernelTables, OVERSAMPLING, RING_LEN, Resolution, TABLE_LEN};

pub use twinosc_core::{NoiseSource, XorShift32};
