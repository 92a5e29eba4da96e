//! Pitch and interpolation helpers.
//!
//! Pitches are expressed in MIDI semitones (69.0 = A4 = 440 Hz) so that
//! every modulation term (coarse, fine, drift, cross-mod) can be summed
//! linearly before a single exponential conversion.

use libm::powf;

/// Reference pitch (A4) in MIDI semitones.
pub const A4_PITCH: f32 = 69.0;

/// Reference frequency for [`A4_PITCH`] in Hz.
pub const A4_HZ: f32 = 440.0;

/// Convert a pitch in semitones to frequency in Hz.
///
/// # Example
/// ```rust
/// use twinosc_core::pitch_to_hz;
///
/// assert_eq!(pitch_to_hz(69.0), 440.0);
/// assert!((pitch_to_hz(81.0) - 880.0).abs() < 1e-3);
/// ```
#[inline]
pub fn pitch_to_hz(pitch: f32) -> f32 {
    A4_HZ * powf(2.0, (pitch - A4_PITCH) / 12.0)
}

/// Convert a frequency ratio to semitones.
#[inline]
pub fn ratio_to_semitones(ratio: f32) -> f32 {
    12.0 * libm::log2f(ratio)
}

/// Linear interpolation between two values.
///
/// # Arguments
/// * `a` - Start value (at t=0)
/// * `b` - End value (at t=1)
/// * `t` - Interpolation factor (0.0 to 1.0)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp a value to a range.
#[inline]
pub fn clamp(x: f32, min: f32, max: f32) -> f32 {
    x.clamp(min, max)
}

/// Truncate toward zero, matching an integer cast.
///
/// Used for quantised coarse tuning: `-2.7` becomes `-2.0`, not `-3.0`.
#[inline]
pub fn truncate(x: f32) -> f32 {
    libm::truncf(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_to_hz_octaves() {
        assert_eq!(pitch_to_hz(69.0), 440.0);
        assert!((pitch_to_hz(57.0) - 220.0).abs() < 1e-3);
        assert!((pitch_to_hz(60.0) - 261.6256).abs() < 1e-2);
    }

    #[test]
    fn test_ratio_round_trip() {
        let semis = ratio_to_semitones(1.5);
        assert!((semis - 7.01955).abs() < 1e-3);
        let hz = pitch_to_hz(69.0 + semis);
        assert!((hz - 660.0).abs() < 1e-2);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(1.0, 3.0, 0.0), 1.0);
        assert_eq!(lerp(1.0, 3.0, 1.0), 3.0);
        assert_eq!(lerp(1.0, 3.0, 0.5), 2.0);
    }

    #[test]
    fn test_truncate_toward_zero() {
        assert_eq!(truncate(2.9), 2.0);
        assert_eq!(truncate(-2.7), -2.0);
        assert_eq!(truncate(0.4), 0.0);
    }
}
