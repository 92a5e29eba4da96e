//! Fixed-depth alignment delay.
//!
//! Band-limited correction adds a fixed latency to every corrected
//! waveform. Any signal derived from one oscillator that feeds another
//! (hard-sync gate, sync fraction, cross-modulation, pitch CV) has to be
//! shifted by the same amount so the two stay causally aligned.
//! [`AlignmentDelay`] is that shift: a stack-allocated circular buffer
//! whose depth is a compile-time power of two.
//!
//! # Example
//!
//! ```rust
//! use twinosc_core::AlignmentDelay;
//!
//! let mut gate: AlignmentDelay<bool, 4> = AlignmentDelay::new();
//!
//! assert!(!gate.push(true)); // nothing pushed 4 calls ago yet
//! for _ in 0..3 {
//!     assert!(!gate.push(false));
//! }
//! assert!(gate.push(false)); // the `true` comes back out
//! ```

/// Circular delay returning the value pushed exactly `N` calls earlier.
///
/// `N` must be a non-zero power of two; this is checked at compile time so
/// the read/write cursor can be wrapped with a bitmask. The buffer starts
/// filled with `T::default()`.
///
/// Works for any `Copy` payload, so the same type delays both audio
/// (`f32`) and gate (`bool`) signals.
#[derive(Debug, Clone)]
pub struct AlignmentDelay<T, const N: usize> {
    buffer: [T; N],
    pos: usize,
}

impl<T: Copy + Default, const N: usize> AlignmentDelay<T, N> {
    const MASK: usize = {
        assert!(N.is_power_of_two(), "delay depth must be a power of two");
        N - 1
    };

    /// Creates a delay line filled with `T::default()`.
    pub fn new() -> Self {
        // Forces evaluation of the depth check for this `N`.
        let _ = Self::MASK;
        Self {
            buffer: [T::default(); N],
            pos: 0,
        }
    }

    /// Pushes `value` and returns the value pushed `N` calls ago.
    #[inline]
    pub fn push(&mut self, value: T) -> T {
        let out = self.buffer[self.pos];
        self.buffer[self.pos] = value;
        self.pos = (self.pos + 1) & Self::MASK;
        out
    }

    /// Returns the value the next [`push`](Self::push) will emit.
    #[inline]
    pub fn peek(&self) -> T {
        self.buffer[self.pos]
    }

    /// Refills the line with `T::default()`.
    pub fn clear(&mut self) {
        self.buffer = [T::default(); N];
        self.pos = 0;
    }

    /// Fills every slot with `value`, as if it had been pushed `N` times.
    pub fn fill(&mut self, value: T) {
        self.buffer = [value; N];
    }

    /// Delay depth in samples.
    pub const fn depth(&self) -> usize {
        N
    }
}

impl<T: Copy + Default, const N: usize> Default for AlignmentDelay<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delays_by_exact_depth() {
        let mut delay: AlignmentDelay<f32, 8> = AlignmentDelay::new();

        let mut out = [0.0f32; 24];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = delay.push(i as f32 + 1.0);
        }

        for (i, &value) in out.iter().enumerate() {
            let expected = if i < 8 { 0.0 } else { (i - 8) as f32 + 1.0 };
            assert_eq!(value, expected, "mismatch at sample {}", i);
        }
    }

    #[test]
    fn test_bool_payload() {
        let mut gate: AlignmentDelay<bool, 2> = AlignmentDelay::new();

        assert!(!gate.push(true));
        assert!(!gate.push(false));
        assert!(gate.push(false));
        assert!(!gate.push(false));
    }

    #[test]
    fn test_peek_matches_next_push() {
        let mut delay: AlignmentDelay<f32, 4> = AlignmentDelay::new();
        for i in 0..10 {
            let expected = delay.peek();
            assert_eq!(delay.push(i as f32), expected);
        }
    }

    #[test]
    fn test_clear_and_fill() {
        let mut delay: AlignmentDelay<f32, 4> = AlignmentDelay::new();
        for i in 0..4 {
            delay.push(i as f32 + 10.0);
        }

        delay.clear();
        for _ in 0..4 {
            assert_eq!(delay.push(1.0), 0.0);
        }

        delay.fill(0.25);
        for _ in 0..4 {
            assert_eq!(delay.push(0.0), 0.25);
        }
    }

    #[test]
    fn test_depth_one_is_unit_delay() {
        let mut delay: AlignmentDelay<f32, 1> = AlignmentDelay::new();
        assert_eq!(delay.push(3.0), 0.0);
        assert_eq!(delay.push(4.0), 3.0);
        assert_eq!(delay.depth(), 1);
    }
}
