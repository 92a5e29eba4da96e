//! twinosc Core - real-time primitives for the twinosc oscillator engine
//!
//! This crate holds the small, allocation-free building blocks the
//! oscillator engine in `twinosc-dco` is assembled from.
//!
//! # Components
//!
//! - [`AlignmentDelay`] - Fixed power-of-two delay for time-aligning
//!   auxiliary signals (sync gates, cross-mod feeds) with correction latency
//! - [`NoiseSource`] / [`XorShift32`] - Seedable uniform noise for drift and
//!   the noise mixer channel
//! - Pitch math: [`pitch_to_hz`], [`ratio_to_semitones`], [`lerp`],
//!   [`clamp`], [`truncate`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! twinosc-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod delay;
pub mod math;
pub mod noise;

pub use delay::AlignmentDelay;
pub use math::{A4_HZ, A4_PITCH, clamp, lerp, pitch_to_hz, ratio_to_semitones, truncate};
pub use noise::{NoiseSource, XorShift32};
