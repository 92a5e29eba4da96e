//! Master/slave oscillator pair with hard sync and cross-modulation.
//!
//! [`DualOscillator`] runs two band-limited oscillators. Oscillator 1 is
//! always the master: it free-runs, and its wrap can hard-sync oscillator 2
//! while its mixed output modulates oscillator 2's pitch.
//!
//! The corrections add [`KERNEL_WIDTH`] samples of latency to every
//! rendered waveform, so everything that crosses from master to slave is
//! delayed by the same amount:
//!
//! - the sync gate and sync fraction, so the slave's reset lines up with
//!   the master's (already corrected) wrap;
//! - the slave pitch, so cross-modulation from the undelayed master mix
//!   acts in step with the slave waveform it bends;
//! - the master mix itself, so both oscillators reach the output together.
//!
//! Total latency is therefore `2 * KERNEL_WIDTH` samples, see
//! [`DualOscillator::latency`].

use twinosc_core::{AlignmentDelay, NoiseSource, XorShift32, clamp, pitch_to_hz, truncate};

use crate::corrector::{Corrector, HardSync, Shape, phase_at_sync};
use crate::kernel::{KERNEL_WIDTH, KernelTables, Resolution};

/// Upper bound on the phase increment (cycles per sample).
pub const MAX_INCREMENT: f32 = 0.45;

/// Lower bound on the phase increment. Keeps discontinuity ages finite.
pub const MIN_INCREMENT: f32 = 1e-7;

/// Fixed gain applied to the final mix.
pub const OUTPUT_GAIN: f32 = 3.0;

/// Noise channel gain.
pub const NOISE_GAIN: f32 = 1.3;

/// Noise always present under the mix, regardless of noise level.
pub const NOISE_FLOOR: f32 = 0.0006;

/// Default per-sample pitch jitter depth, in semitones.
pub const DEFAULT_DRIFT: f32 = 0.1;

/// Which waveforms an oscillator sums.
///
/// Saw and pulse may be combined. With neither enabled the oscillator
/// produces a triangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WaveShape {
    /// Sawtooth enabled.
    pub saw: bool,
    /// Pulse enabled.
    pub pulse: bool,
}

impl WaveShape {
    /// Triangle only.
    pub const TRIANGLE: Self = Self {
        saw: false,
        pulse: false,
    };
    /// Sawtooth only.
    pub const SAW: Self = Self {
        saw: true,
        pulse: false,
    };
    /// Pulse only.
    pub const PULSE: Self = Self {
        saw: false,
        pulse: true,
    };
    /// Sawtooth plus pulse.
    pub const SAW_PULSE: Self = Self {
        saw: true,
        pulse: true,
    };

    /// Whether the triangle fills in for the other two.
    pub fn uses_triangle(self) -> bool {
        !self.saw && !self.pulse
    }

    /// Whether the corrector for `shape` contributes to the mix.
    pub fn enables(self, shape: Shape) -> bool {
        match shape {
            Shape::Saw => self.saw,
            Shape::Pulse => self.pulse,
            Shape::Triangle => self.uses_triangle(),
        }
    }
}

/// Per-oscillator controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OscillatorSettings {
    /// Enabled waveforms.
    pub shape: WaveShape,
    /// Coarse tuning in semitones. Truncated toward zero when quantize is on.
    pub coarse: f32,
    /// Pitch modulation in semitones (envelope, LFO, bend).
    pub pitch_mod: f32,
    /// Added to the shared pulse-width control, `[-1, 1]` scale.
    pub pulse_width_mod: f32,
    /// Mix level.
    pub level: f32,
}

impl Default for OscillatorSettings {
    fn default() -> Self {
        Self {
            shape: WaveShape::SAW,
            coarse: 0.0,
            pitch_mod: 0.0,
            pulse_width_mod: 0.0,
            level: 0.5,
        }
    }
}

/// One oscillator: phase state plus a corrector per waveform.
#[derive(Clone, Debug)]
struct Slot {
    settings: OscillatorSettings,
    phase: f32,
    increment: f32,
    previous_width: f32,
    saw: Corrector,
    pulse: Corrector,
    triangle: Corrector,
}

impl Slot {
    fn new(settings: OscillatorSettings, tables: &'static KernelTables) -> Self {
        Self {
            settings,
            phase: 0.0,
            increment: MIN_INCREMENT,
            previous_width: 0.5,
            saw: Corrector::new(Shape::Saw, tables),
            pulse: Corrector::new(Shape::Pulse, tables),
            triangle: Corrector::new(Shape::Triangle, tables),
        }
    }

    /// Effective pulse width for the shared control `pulse_width`.
    #[inline]
    fn width(&self, pulse_width: f32) -> f32 {
        clamp(
            0.5 + 0.5 * (pulse_width + self.settings.pulse_width_mod),
            0.1,
            1.0,
        )
    }

    #[inline]
    fn coarse(&self, quantize: bool) -> f32 {
        if quantize {
            truncate(self.settings.coarse)
        } else {
            self.settings.coarse
        }
    }

    /// Calls `f` on each corrector in the mix, pulse first.
    #[inline]
    fn for_each_enabled(&mut self, mut f: impl FnMut(&mut Corrector)) {
        let shape = self.settings.shape;
        if shape.pulse {
            f(&mut self.pulse);
        }
        if shape.saw {
            f(&mut self.saw);
        } else if !shape.pulse {
            f(&mut self.triangle);
        }
    }

    fn correctors_mut(&mut self) -> [&mut Corrector; 3] {
        [&mut self.saw, &mut self.pulse, &mut self.triangle]
    }

    fn prime(&mut self, width: f32) {
        let phase = self.phase;
        for corrector in self.correctors_mut() {
            corrector.prime(phase, width);
        }
        self.previous_width = width;
    }

    /// Switches waveforms. Correctors joining the mix start clean and in
    /// phase.
    fn set_settings(&mut self, settings: OscillatorSettings, width: f32) {
        let before = self.settings.shape;
        let after = settings.shape;
        let phase = self.phase;
        self.settings = settings;
        for corrector in self.correctors_mut() {
            let shape = corrector.shape();
            if after.enables(shape) && !before.enables(shape) {
                corrector.clear();
                corrector.prime(phase, width);
            }
        }
    }

    fn set_resolution(&mut self, resolution: Resolution) {
        for corrector in self.correctors_mut() {
            corrector.set_resolution(resolution);
        }
    }

    fn clear(&mut self) {
        for corrector in self.correctors_mut() {
            corrector.clear();
        }
    }

    fn detect_master(&mut self, width: f32) {
        let (phase, increment, previous) = (self.phase, self.increment, self.previous_width);
        self.for_each_enabled(|c| c.detect_master(phase, increment, width, previous));
    }

    fn detect_slave(&mut self, sync: HardSync, width: f32) {
        let (phase, increment, previous) = (self.phase, self.increment, self.previous_width);
        self.for_each_enabled(|c| {
            let local = c.detect_slave(phase, increment, sync, width, previous);
            if sync.reset {
                let at_sync = phase_at_sync(local, increment, sync.fraction);
                c.apply_hard_sync_reset(sync.fraction, at_sync, increment);
            }
        });
    }

    fn render(&mut self, width: f32) -> f32 {
        let phase = self.phase;
        let mut mix = 0.0;
        self.for_each_enabled(|c| mix += c.render(phase, width));
        mix
    }
}

/// Band-limited master/slave oscillator pair for one synthesizer voice.
///
/// Generic over the [`NoiseSource`] that supplies drift and noise; the
/// default is a seeded [`XorShift32`].
///
/// # Example
///
/// ```rust
/// use twinosc_dco::{DualOscillator, OscillatorSettings, WaveShape};
///
/// let mut dco = DualOscillator::new(48000.0, 1);
/// dco.set_note(45.0);
/// dco.set_osc2(OscillatorSettings {
///     shape: WaveShape::SAW,
///     coarse: 7.0,
///     ..OscillatorSettings::default()
/// });
/// dco.set_hard_sync(true);
///
/// let mut block = [0.0f32; 256];
/// dco.process_block(&mut block);
/// assert!(block.iter().all(|s| s.is_finite()));
/// ```
#[derive(Clone, Debug)]
pub struct DualOscillator<R: NoiseSource = XorShift32> {
    sample_rate: f32,
    sample_rate_inv: f32,
    source: R,
    master: Slot,
    slave: Slot,
    master_factor: f32,
    slave_factor: f32,
    mix_delay: AlignmentDelay<f32, KERNEL_WIDTH>,
    gate_delay: AlignmentDelay<bool, KERNEL_WIDTH>,
    fraction_delay: AlignmentDelay<f32, KERNEL_WIDTH>,
    cv_delay: AlignmentDelay<f32, KERNEL_WIDTH>,
    note: f32,
    slave_detune: f32,
    pulse_width: f32,
    hard_sync: bool,
    cross_mod: f32,
    noise_level: f32,
    tune: f32,
    octave: i32,
    total_detune: f32,
    drift: f32,
    quantize: bool,
    resolution: Resolution,
    slave_synced: bool,
}

#[cfg(feature = "std")]
impl DualOscillator<XorShift32> {
    /// Creates an oscillator pair on the shared kernel tables with an
    /// [`XorShift32`] seeded from `seed`.
    pub fn new(sample_rate: f32, seed: u32) -> Self {
        Self::with_source(sample_rate, crate::kernel::shared_tables(), XorShift32::new(seed))
    }
}

impl<R: NoiseSource> DualOscillator<R> {
    /// Creates an oscillator pair reading `tables` and drawing randomness
    /// from `source`.
    ///
    /// Four values are drawn immediately: the two static detune factors,
    /// then the master and slave starting phases.
    pub fn with_source(sample_rate: f32, tables: &'static KernelTables, mut source: R) -> Self {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");

        let master_factor = source.next_bipolar();
        let slave_factor = source.next_bipolar();
        let mut master = Slot::new(OscillatorSettings::default(), tables);
        let mut slave = Slot::new(OscillatorSettings::default(), tables);
        master.phase = source.next_f32();
        slave.phase = source.next_f32();

        let pulse_width = 0.0;
        let master_width = master.width(pulse_width);
        let slave_width = slave.width(pulse_width);
        master.prime(master_width);
        slave.prime(slave_width);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            master_phase = master.phase,
            slave_phase = slave.phase,
            "dual oscillator created"
        );

        Self {
            sample_rate,
            sample_rate_inv: 1.0 / sample_rate,
            source,
            master,
            slave,
            master_factor,
            slave_factor,
            mix_delay: AlignmentDelay::new(),
            gate_delay: AlignmentDelay::new(),
            fraction_delay: AlignmentDelay::new(),
            cv_delay: AlignmentDelay::new(),
            note: twinosc_core::A4_PITCH,
            slave_detune: 0.0,
            pulse_width,
            hard_sync: false,
            cross_mod: 0.0,
            noise_level: 0.0,
            tune: 0.0,
            octave: 0,
            total_detune: 0.0,
            drift: DEFAULT_DRIFT,
            quantize: false,
            resolution: Resolution::Full,
            slave_synced: false,
        }
    }

    /// Renders one output sample.
    #[inline]
    pub fn process(&mut self) -> f32 {
        // Master
        let master_noise = self.source.next_bipolar();
        let master_pitch = self.note
            + self.master.coarse(self.quantize)
            + self.master.settings.pitch_mod
            + self.common_pitch()
            + self.total_detune * self.master_factor
            + self.drift * master_noise;
        self.master.increment = self.increment(master_pitch);
        self.master.phase += self.master.increment;

        let master_width = self.master.width(self.pulse_width);
        self.master.detect_master(master_width);

        let mut gate = false;
        let mut fraction = 0.0;
        if self.master.phase >= 1.0 {
            self.master.phase -= 1.0;
            fraction = self.master.phase / self.master.increment;
            gate = true;
        }
        self.master.previous_width = master_width;

        let sync = HardSync {
            reset: self.gate_delay.push(gate && self.hard_sync),
            fraction: self.fraction_delay.push(fraction),
        };

        let master_mix = self.master.render(master_width);

        // Slave
        let slave_noise = self.source.next_bipolar();
        let slave_pitch = self.cv_delay.push(
            self.note
                + self.slave_detune
                + self.slave.coarse(self.quantize)
                + self.slave.settings.pitch_mod
                + master_mix * self.cross_mod
                + self.common_pitch()
                + self.total_detune * self.slave_factor
                + self.drift * slave_noise,
        );
        self.slave.increment = self.increment(slave_pitch);
        self.slave.phase += self.slave.increment;

        let slave_width = self.slave.width(self.pulse_width);
        self.slave.detect_slave(sync, slave_width);

        if self.slave.phase >= 1.0 {
            self.slave.phase -= 1.0;
        }
        self.slave.previous_width = slave_width;
        if sync.reset {
            self.slave.phase = self.slave.increment * sync.fraction;
        }
        self.slave_synced = sync.reset;

        let master_out = self.mix_delay.push(master_mix);
        let slave_mix = self.slave.render(slave_width);

        OUTPUT_GAIN
            * (self.master.settings.level * master_out
                + self.slave.settings.level * slave_mix
                + slave_noise * (self.noise_level * NOISE_GAIN + NOISE_FLOOR))
    }

    /// Fills `output` with consecutive samples.
    pub fn process_block(&mut self, output: &mut [f32]) {
        for sample in output.iter_mut() {
            *sample = self.process();
        }
    }

    #[inline]
    fn common_pitch(&self) -> f32 {
        self.tune + 12.0 * self.octave as f32
    }

    #[inline]
    fn increment(&self, pitch: f32) -> f32 {
        clamp(
            pitch_to_hz(pitch) * self.sample_rate_inv,
            MIN_INCREMENT,
            MAX_INCREMENT,
        )
    }

    /// Clears every pending correction and delay line and restarts both
    /// phases at zero.
    ///
    /// Never called implicitly; a voice that wants a clean attack on
    /// retrigger calls it before the first sample of the note.
    pub fn reset(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::debug!("dual oscillator reset");

        self.master.clear();
        self.slave.clear();
        self.master.phase = 0.0;
        self.slave.phase = 0.0;
        let master_width = self.master.width(self.pulse_width);
        let slave_width = self.slave.width(self.pulse_width);
        self.master.prime(master_width);
        self.slave.prime(slave_width);
        self.mix_delay.clear();
        self.gate_delay.clear();
        self.fraction_delay.clear();
        self.cv_delay.clear();
        self.slave_synced = false;
    }

    /// Sets the sample rate in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        debug_assert!(sample_rate > 0.0, "sample rate must be positive");

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, "sample rate changed");

        self.sample_rate = sample_rate;
        self.sample_rate_inv = 1.0 / sample_rate;
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Sets the base note in MIDI semitones (fractional allowed).
    pub fn set_note(&mut self, note: f32) {
        self.note = note;
    }

    /// Base note in MIDI semitones.
    pub fn note(&self) -> f32 {
        self.note
    }

    /// Replaces oscillator 1's settings.
    pub fn set_osc1(&mut self, settings: OscillatorSettings) {
        let width = self.master.width(self.pulse_width);
        self.master.set_settings(settings, width);
    }

    /// Oscillator 1 settings.
    pub fn osc1(&self) -> &OscillatorSettings {
        &self.master.settings
    }

    /// Replaces oscillator 2's settings.
    pub fn set_osc2(&mut self, settings: OscillatorSettings) {
        let width = self.slave.width(self.pulse_width);
        self.slave.set_settings(settings, width);
    }

    /// Oscillator 2 settings.
    pub fn osc2(&self) -> &OscillatorSettings {
        &self.slave.settings
    }

    /// Per-sample pitch modulation for both oscillators, in semitones.
    #[inline]
    pub fn set_pitch_mod(&mut self, osc1: f32, osc2: f32) {
        self.master.settings.pitch_mod = osc1;
        self.slave.settings.pitch_mod = osc2;
    }

    /// Per-sample pulse-width modulation for both oscillators.
    #[inline]
    pub fn set_pulse_width_mod(&mut self, osc1: f32, osc2: f32) {
        self.master.settings.pulse_width_mod = osc1;
        self.slave.settings.pulse_width_mod = osc2;
    }

    /// Extra detune of oscillator 2, in semitones.
    pub fn set_slave_detune(&mut self, semitones: f32) {
        self.slave_detune = semitones;
    }

    /// Shared pulse width, `-1` to `1` (0 = square).
    pub fn set_pulse_width(&mut self, pulse_width: f32) {
        self.pulse_width = pulse_width;
    }

    /// Pulse width control.
    pub fn pulse_width(&self) -> f32 {
        self.pulse_width
    }

    /// Enables hard sync of oscillator 2 to oscillator 1.
    pub fn set_hard_sync(&mut self, enabled: bool) {
        self.hard_sync = enabled;
    }

    /// Whether hard sync is enabled.
    pub fn hard_sync(&self) -> bool {
        self.hard_sync
    }

    /// Cross-modulation depth: semitones of slave pitch per unit of
    /// master output.
    pub fn set_cross_mod(&mut self, depth: f32) {
        self.cross_mod = depth;
    }

    /// Cross-modulation depth.
    pub fn cross_mod(&self) -> f32 {
        self.cross_mod
    }

    /// White noise mix level.
    pub fn set_noise_level(&mut self, level: f32) {
        self.noise_level = level;
    }

    /// Fine tune in semitones, applied to both oscillators.
    pub fn set_tune(&mut self, semitones: f32) {
        self.tune = semitones;
    }

    /// Octave offset applied to both oscillators.
    pub fn set_octave(&mut self, octave: i32) {
        self.octave = octave;
    }

    /// Depth of the static per-voice detune, in semitones.
    pub fn set_total_detune(&mut self, semitones: f32) {
        self.total_detune = semitones;
    }

    /// Depth of the per-sample pitch jitter, in semitones.
    pub fn set_drift(&mut self, semitones: f32) {
        self.drift = semitones;
    }

    /// Truncates coarse tuning to whole semitones.
    pub fn set_quantize(&mut self, enabled: bool) {
        self.quantize = enabled;
    }

    /// Selects the half-band kernels for voices rendered at twice the
    /// output rate.
    pub fn set_decimation(&mut self, enabled: bool) {
        let resolution = if enabled {
            Resolution::Decimated
        } else {
            Resolution::Full
        };
        if resolution == self.resolution {
            return;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(?resolution, "kernel resolution changed");

        self.resolution = resolution;
        self.master.set_resolution(resolution);
        self.slave.set_resolution(resolution);
    }

    /// Whether the decimated kernels are in use.
    pub fn decimation(&self) -> bool {
        self.resolution == Resolution::Decimated
    }

    /// Master phase after the last sample, in `[0, 1)`.
    pub fn master_phase(&self) -> f32 {
        self.master.phase
    }

    /// Slave phase after the last sample, in `[0, 1)`.
    pub fn slave_phase(&self) -> f32 {
        self.slave.phase
    }

    /// Master increment used for the last sample.
    pub fn master_increment(&self) -> f32 {
        self.master.increment
    }

    /// Slave increment used for the last sample.
    pub fn slave_increment(&self) -> f32 {
        self.slave.increment
    }

    /// Whether the slave was hard-synced during the last sample.
    pub fn slave_synced(&self) -> bool {
        self.slave_synced
    }

    /// Samples between a phase event and its appearance in the output.
    pub const fn latency(&self) -> usize {
        2 * KERNEL_WIDTH
    }
}
