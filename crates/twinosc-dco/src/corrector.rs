//! Discontinuity correctors for sawtooth, pulse and triangle waves.
//!
//! A [`Corrector`] turns a naive waveform into a band-limited one. Each
//! sample the owning oscillator advances its phase and hands the
//! *unwrapped* phase to the corrector, which:
//!
//! 1. finds the level (saw, pulse) or slope (triangle) discontinuities that
//!    happened during the step and how long ago, in fractions of a sample;
//! 2. adds the matching kernel residual, scaled by the size of the jump,
//!    into its correction ring;
//! 3. on [`render`](Corrector::render), returns the naive value delayed by
//!    [`KERNEL_WIDTH`] samples minus the next ring slot.
//!
//! The delay is what lets a residual start *before* the jump it corrects.
//!
//! # Hard sync
//!
//! Slave correctors receive a [`HardSync`] signal. A natural discontinuity
//! that falls at or after the reset instant never happens and is skipped;
//! one before it is corrected as usual. The reset itself is a discontinuity
//! too, injected by [`Corrector::apply_hard_sync_reset`].
//!
//! # Example
//!
//! ```rust
//! use twinosc_dco::{Corrector, Shape, shared_tables};
//!
//! let mut saw = Corrector::new(Shape::Saw, shared_tables());
//! let increment = 0.01;
//! let mut phase = 0.0f32;
//!
//! for _ in 0..1000 {
//!     phase += increment;
//!     saw.detect_master(phase, increment, 0.5, 0.5);
//!     if phase >= 1.0 {
//!         phase -= 1.0;
//!     }
//!     let sample = saw.render(phase, 0.5);
//!     assert!(sample.abs() < 1.0);
//! }
//! ```

use twinosc_core::{AlignmentDelay, lerp};

use crate::kernel::{KERNEL_WIDTH, KernelTables, OVERSAMPLING, RING_LEN, Resolution, TABLE_LEN};

const RING_MASK: usize = RING_LEN - 1;

/// Largest age fed to a table walk; keeps the index inside one sample.
const MAX_AGE: f32 = 1.0 - f32::EPSILON;

/// Waveform a corrector produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Rising ramp from -0.5 to 0.5, one falling step per cycle.
    Saw,
    /// Low until the pulse width, then high; two steps per cycle.
    Pulse,
    /// Rises over the first half-cycle, falls over the second; two slope
    /// corners per cycle.
    Triangle,
}

impl Shape {
    /// Naive (aliasing) waveform value at `phase`.
    ///
    /// The pulse is DC-free: it sits at `pulse_width - 1` below the width
    /// and at `pulse_width` above it.
    #[inline]
    pub fn naive(self, phase: f32, pulse_width: f32) -> f32 {
        match self {
            Shape::Saw => phase - 0.5,
            Shape::Pulse => {
                if phase >= pulse_width {
                    pulse_width
                } else {
                    pulse_width - 1.0
                }
            }
            Shape::Triangle => triangle(phase),
        }
    }
}

#[inline]
fn triangle(phase: f32) -> f32 {
    if phase < 0.5 {
        2.0 * phase - 0.5
    } else {
        1.5 - 2.0 * phase
    }
}

/// Hard-sync signal delivered to a slave corrector for one sample.
///
/// `fraction` is the age of the master's wrap: how far back from the
/// current sample instant, in samples, the reset happened. It shares the
/// unit of the discontinuity ages the correctors compute, so "older than
/// the reset" is a plain comparison.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HardSync {
    /// Whether the slave is reset during this sample.
    pub reset: bool,
    /// Age of the reset instant, in `[0, 1)`.
    pub fraction: f32,
}

impl HardSync {
    /// No reset this sample.
    pub const NONE: Self = Self {
        reset: false,
        fraction: 0.0,
    };

    /// A reset `fraction` of a sample ago.
    pub fn at(fraction: f32) -> Self {
        Self {
            reset: true,
            fraction,
        }
    }

    /// Whether a discontinuity `age` samples ago is cut off by this reset.
    ///
    /// Read forward through the step, an event at position `1 - age` is
    /// realized only when it comes strictly before the reset at
    /// `1 - fraction`; an event sharing the reset instant is dropped.
    #[inline]
    pub fn suppresses(&self, age: f32) -> bool {
        self.reset && age <= self.fraction
    }
}

/// Phase of a slave at the reset instant, given its corrector-local phase
/// after detection.
#[inline]
pub fn phase_at_sync(local_phase: f32, increment: f32, fraction: f32) -> f32 {
    local_phase - increment * fraction
}

/// Band-limiting corrector for one waveform of one oscillator.
///
/// Owns a ring of [`RING_LEN`] pending correction values, a
/// [`KERNEL_WIDTH`]-deep delay for the naive waveform and, for pulse and
/// triangle, a flag recording which half of the cycle the waveform is in.
#[derive(Clone)]
pub struct Corrector {
    shape: Shape,
    tables: &'static KernelTables,
    resolution: Resolution,
    ring: [f32; RING_LEN],
    cursor: usize,
    naive: AlignmentDelay<f32, KERNEL_WIDTH>,
    /// Pulse: output is high. Triangle: on the falling half.
    pending: bool,
}

impl Corrector {
    /// Creates a corrector reading full-resolution kernels.
    pub fn new(shape: Shape, tables: &'static KernelTables) -> Self {
        Self {
            shape,
            tables,
            resolution: Resolution::Full,
            ring: [0.0; RING_LEN],
            cursor: 0,
            naive: AlignmentDelay::new(),
            pending: false,
        }
    }

    /// Waveform this corrector produces.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Selected kernel bandwidth.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Switches kernel bandwidth. Corrections already in the ring are kept.
    pub fn set_resolution(&mut self, resolution: Resolution) {
        self.resolution = resolution;
    }

    /// Whether a transition is pending (pulse high, triangle falling).
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Aligns the pending flag with a phase the oscillator jumped to.
    pub fn prime(&mut self, phase: f32, pulse_width: f32) {
        self.pending = match self.shape {
            Shape::Saw => false,
            Shape::Pulse => phase >= pulse_width,
            Shape::Triangle => phase >= 0.5,
        };
    }

    /// Drops all pending corrections and delayed samples.
    pub fn clear(&mut self) {
        self.ring = [0.0; RING_LEN];
        self.cursor = 0;
        self.naive.clear();
        self.pending = false;
    }

    /// Renders one corrected sample for the (wrapped) `phase`.
    #[inline]
    pub fn render(&mut self, phase: f32, pulse_width: f32) -> f32 {
        let naive = self.shape.naive(phase, pulse_width);
        self.naive.push(naive) - self.pop()
    }

    /// Detects and corrects discontinuities of a free-running oscillator.
    ///
    /// `phase` is the phase after this sample's advance and before
    /// wrapping. `pulse_width` and `previous_pulse_width` are only read by
    /// the pulse shape.
    #[inline]
    pub fn detect_master(
        &mut self,
        phase: f32,
        increment: f32,
        pulse_width: f32,
        previous_pulse_width: f32,
    ) {
        self.detect(
            phase,
            increment,
            HardSync::NONE,
            pulse_width,
            previous_pulse_width,
        );
    }

    /// Detects and corrects discontinuities of a hard-synced oscillator.
    ///
    /// Events cut off by `sync` are skipped. Returns the corrector-local
    /// phase: wrapped if the natural wrap was realized, unwrapped if the
    /// reset came first. Feed it to [`phase_at_sync`] before calling
    /// [`apply_hard_sync_reset`](Self::apply_hard_sync_reset).
    #[inline]
    pub fn detect_slave(
        &mut self,
        phase: f32,
        increment: f32,
        sync: HardSync,
        pulse_width: f32,
        previous_pulse_width: f32,
    ) -> f32 {
        self.detect(phase, increment, sync, pulse_width, previous_pulse_width)
    }

    /// Injects the correction for a forced reset `sync_fraction` samples
    /// ago and clears the pending flag.
    ///
    /// The scale cancels the jump from the waveform's value at the reset
    /// instant back to its value at phase zero. The caller moves the phase
    /// to `increment * sync_fraction` afterwards.
    pub fn apply_hard_sync_reset(&mut self, sync_fraction: f32, phase_at_sync: f32, increment: f32) {
        match self.shape {
            Shape::Saw => self.inject_step(sync_fraction, phase_at_sync),
            Shape::Pulse => {
                if self.pending {
                    self.inject_step(sync_fraction, 1.0);
                }
            }
            Shape::Triangle => {
                if self.pending {
                    self.inject_ramp(sync_fraction, -4.0 * increment);
                }
                self.inject_step(sync_fraction, triangle(phase_at_sync) + 0.5);
            }
        }
        self.pending = false;
    }

    fn detect(
        &mut self,
        phase: f32,
        increment: f32,
        sync: HardSync,
        pulse_width: f32,
        previous_pulse_width: f32,
    ) -> f32 {
        match self.shape {
            Shape::Saw => self.wrap_step(phase, increment, sync, 1.0),
            Shape::Pulse => {
                self.detect_pulse(phase, increment, sync, pulse_width, previous_pulse_width)
            }
            Shape::Triangle => self.detect_triangle(phase, increment, sync),
        }
    }

    /// Wrap of a level-stepping shape: a falling step of `scale`.
    #[inline]
    fn wrap_step(&mut self, phase: f32, increment: f32, sync: HardSync, scale: f32) -> f32 {
        if phase < 1.0 {
            return phase;
        }
        let age = (phase - 1.0) / increment;
        if sync.suppresses(age) {
            return phase;
        }
        self.pending = false;
        self.inject_step(age, scale);
        phase - 1.0
    }

    fn detect_pulse(
        &mut self,
        phase: f32,
        increment: f32,
        sync: HardSync,
        pulse_width: f32,
        previous_pulse_width: f32,
    ) -> f32 {
        // Rate at which the phase moves relative to a modulated edge.
        let summated = increment - (pulse_width - previous_pulse_width);
        let mut x = phase;

        if self.pending {
            x = self.wrap_step(x, increment, sync, 1.0);
        }

        if !self.pending && x >= pulse_width && x - summated <= pulse_width {
            let age = if summated > 0.0 {
                (x - pulse_width) / summated
            } else {
                0.0
            };
            if !sync.suppresses(age) {
                self.pending = true;
                self.inject_step(age, -1.0);
            }
        }

        // A rise and a wrap can share one step when the width is near 1.
        if self.pending {
            x = self.wrap_step(x, increment, sync, 1.0);
        }
        x
    }

    fn detect_triangle(&mut self, phase: f32, increment: f32, sync: HardSync) -> f32 {
        let mut x = phase;

        if x >= 1.0 {
            let age = (x - 1.0) / increment;
            if sync.suppresses(age) {
                // The reset comes first; the mid corner of this cycle is
                // already behind us, nothing else to find.
                return x;
            }
            x -= 1.0;
            self.pending = false;
            self.inject_ramp(age, -4.0 * increment);
        }

        if x >= 0.5 && x - increment < 0.5 {
            let age = (x - 0.5) / increment;
            if !sync.suppresses(age) {
                self.pending = true;
                self.inject_ramp(age, 4.0 * increment);
            }
        }
        x
    }

    /// Adds a step residual for a jump `age` samples ago. Positive `scale`
    /// corrects a falling step.
    fn inject_step(&mut self, age: f32, scale: f32) {
        let table = self.tables.get(self.resolution).step();
        let (mut index, frac) = table_position(age);

        for k in 0..RING_LEN {
            let value = kernel_at(table, index, frac) * scale;
            let slot = &mut self.ring[(self.cursor + k) & RING_MASK];
            if k < KERNEL_WIDTH {
                *slot += value;
            } else {
                *slot -= value;
            }
            index += OVERSAMPLING;
        }
    }

    /// Adds a ramp residual for a slope change `age` samples ago. `scale`
    /// is the negated slope change per sample.
    fn inject_ramp(&mut self, age: f32, scale: f32) {
        let table = self.tables.get(self.resolution).ramp();
        let (mut index, frac) = table_position(age);

        for k in 0..RING_LEN {
            self.ring[(self.cursor + k) & RING_MASK] += kernel_at(table, index, frac) * scale;
            index += OVERSAMPLING;
        }
    }

    /// Reads and zeroes the slot under the cursor, then advances it.
    #[inline]
    fn pop(&mut self) -> f32 {
        let value = self.ring[self.cursor];
        self.ring[self.cursor] = 0.0;
        self.cursor = (self.cursor + 1) & RING_MASK;
        value
    }
}

impl core::fmt::Debug for Corrector {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Corrector")
            .field("shape", &self.shape)
            .field("resolution", &self.resolution)
            .field("cursor", &self.cursor)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

/// Table index and interpolation fraction for an event `age` samples ago.
#[inline]
fn table_position(age: f32) -> (usize, f32) {
    let position = age.clamp(0.0, MAX_AGE) * OVERSAMPLING as f32;
    let index = (position as usize).min(OVERSAMPLING - 1);
    (index, position - index as f32)
}

#[inline]
fn kernel_at(table: &[f32; TABLE_LEN], index: usize, frac: f32) -> f32 {
    lerp(table[index], table[index + 1], frac)
}
