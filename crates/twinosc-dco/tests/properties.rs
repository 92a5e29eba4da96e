//! Property-based tests for twinosc-dco.
//!
//! Phase bounds, finiteness and ring hygiene under randomized controls.

use proptest::prelude::*;
use twinosc_dco::{
    Corrector, DualOscillator, HardSync, OscillatorSettings, RING_LEN, Shape, WaveShape,
    shared_tables,
};

fn shape_strategy() -> impl Strategy<Value = WaveShape> {
    prop_oneof![
        Just(WaveShape::SAW),
        Just(WaveShape::PULSE),
        Just(WaveShape::TRIANGLE),
        Just(WaveShape::SAW_PULSE),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Both phases stay in [0, 1) whatever the pitch, sync and cross-mod.
    #[test]
    fn phases_stay_in_unit_interval(
        seed in any::<u32>(),
        sample_rate in 8000.0f32..192000.0f32,
        note in -20.0f32..160.0f32,
        coarse2 in -24.0f32..48.0f32,
        cross_mod in 0.0f32..48.0f32,
        hard_sync in any::<bool>(),
        shape1 in shape_strategy(),
        shape2 in shape_strategy(),
        pulse_width in -1.0f32..1.0f32,
    ) {
        let mut dco = DualOscillator::new(sample_rate, seed);
        dco.set_note(note);
        dco.set_osc1(OscillatorSettings { shape: shape1, ..OscillatorSettings::default() });
        dco.set_osc2(OscillatorSettings {
            shape: shape2,
            coarse: coarse2,
            ..OscillatorSettings::default()
        });
        dco.set_cross_mod(cross_mod);
        dco.set_hard_sync(hard_sync);
        dco.set_pulse_width(pulse_width);

        for i in 0..600 {
            let out = dco.process();
            prop_assert!(out.is_finite(), "sample {} not finite", i);
            prop_assert!((0.0..1.0).contains(&dco.master_phase()), "master {}", dco.master_phase());
            prop_assert!((0.0..1.0).contains(&dco.slave_phase()), "slave {}", dco.slave_phase());
            prop_assert!(dco.master_increment() > 0.0 && dco.master_increment() <= 0.45);
            prop_assert!(dco.slave_increment() > 0.0 && dco.slave_increment() <= 0.45);
        }
    }

    /// Output stays bounded while pulse width sweeps every sample.
    #[test]
    fn pulse_width_modulation_is_bounded(
        seed in any::<u32>(),
        note in 24.0f32..110.0f32,
        rate in 0.0001f32..0.01f32,
    ) {
        let mut dco = DualOscillator::new(48000.0, seed);
        dco.set_note(note);
        dco.set_osc1(OscillatorSettings {
            shape: WaveShape::PULSE,
            level: 1.0,
            ..OscillatorSettings::default()
        });
        dco.set_osc2(OscillatorSettings { level: 0.0, ..OscillatorSettings::default() });

        for i in 0..2000 {
            let pwm = libm::sinf(i as f32 * rate);
            dco.set_pulse_width_mod(pwm, 0.0);
            let out = dco.process();
            prop_assert!(out.is_finite() && out.abs() < 8.0, "sample {} = {}", i, out);
        }
    }

    /// Whatever a slave corrector sees, a ring left alone drains to zero
    /// within one kernel length.
    #[test]
    fn corrector_ring_drains(
        increment in 0.001f32..0.45f32,
        start in 0.0f32..1.0f32,
        fraction in 0.0f32..1.0f32,
        reset in any::<bool>(),
        shape in prop_oneof![Just(Shape::Saw), Just(Shape::Pulse), Just(Shape::Triangle)],
    ) {
        let mut corrector = Corrector::new(shape, shared_tables());
        corrector.prime(start, 0.5);
        let phase = start + increment;
        let sync = HardSync { reset, fraction };
        let local = corrector.detect_slave(phase, increment, sync, 0.5, 0.5);
        if reset {
            let at_sync = twinosc_dco::phase_at_sync(local, increment, fraction);
            corrector.apply_hard_sync_reset(fraction, at_sync, increment);
        }

        // Hold a constant phase: no new events, only the delayed naive value.
        let held = 0.25;
        for _ in 0..RING_LEN {
            corrector.render(held, 0.5);
        }
        let expected = shape.naive(held, 0.5);
        for _ in 0..8 {
            prop_assert_eq!(corrector.render(held, 0.5), expected);
        }
    }
}
