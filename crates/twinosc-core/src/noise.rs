//! Seedable pseudo-random sources for drift and noise.
//!
//! Analog-style oscillators jitter their pitch a little every sample and
//! mix in some white noise. Both come from a [`NoiseSource`] that the
//! oscillator owns; injecting the source (instead of seeding from system
//! entropy) keeps rendering reproducible.

/// A uniform pseudo-random source producing values in `[0, 1)`.
pub trait NoiseSource {
    /// Returns the next value in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Returns the next value centred on zero, in `[-0.5, 0.5)`.
    #[inline]
    fn next_bipolar(&mut self) -> f32 {
        self.next_f32() - 0.5
    }
}

/// Xorshift32 generator.
///
/// Tiny state, no allocation, deterministic for a given seed. Not suitable
/// for anything but audio-rate noise.
///
/// # Example
///
/// ```rust
/// use twinosc_core::{NoiseSource, XorShift32};
///
/// let mut a = XorShift32::new(42);
/// let mut b = XorShift32::new(42);
/// assert_eq!(a.next_f32(), b.next_f32());
/// ```
#[derive(Debug, Clone)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// State used when a zero seed is given (xorshift has a fixed point at 0).
    const FALLBACK_SEED: u32 = 0x1234_5678;

    /// Creates a generator from `seed`. A zero seed is replaced.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the generator and returns the raw 32-bit state.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(Self::FALLBACK_SEED)
    }
}

impl NoiseSource for XorShift32 {
    #[inline]
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits map exactly onto the f32 mantissa.
        (self.next_u32() >> 8) as f32 * (1.0 / 16_777_216.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range() {
        let mut rng = XorShift32::new(7);
        for _ in 0..100_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "out of range: {}", v);
        }
    }

    #[test]
    fn test_bipolar_range_and_mean() {
        let mut rng = XorShift32::new(99);
        let n = 200_000;
        let mut sum = 0.0f64;
        for _ in 0..n {
            let v = rng.next_bipolar();
            assert!((-0.5..0.5).contains(&v));
            sum += f64::from(v);
        }
        let mean = sum / f64::from(n);
        assert!(mean.abs() < 0.01, "mean too far from zero: {}", mean);
    }

    #[test]
    fn test_zero_seed_does_not_stick() {
        let mut rng = XorShift32::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = XorShift32::new(1234);
        let mut b = XorShift32::new(1234);
        for _ in 0..1000 {
            assert_eq!(a.next_f32().to_bits(), b.next_f32().to_bits());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = XorShift32::new(1);
        let mut b = XorShift32::new(2);
        let same = (0..64).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 4);
    }
}
