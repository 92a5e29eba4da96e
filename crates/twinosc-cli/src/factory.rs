//! Factory patches bundled with the binary.
//!
//! Always available without any file on disk; `twinosc patch init --factory`
//! copies one out as a starting point.

use crate::patch::Patch;

/// Factory patch names, in listing order.
pub static FACTORY_PATCH_NAMES: &[&str] = &["init", "sync-lead", "xmod-bell", "pwm-pad"];

/// TOML content for factory patches, embedded at compile time.
static FACTORY_PATCHES_TOML: &[(&str, &str)] = &[
    ("init", INIT_PATCH),
    ("sync-lead", SYNC_LEAD_PATCH),
    ("xmod-bell", XMOD_BELL_PATCH),
    ("pwm-pad", PWM_PAD_PATCH),
];

/// Two detuned saws, no sync or cross-mod.
const INIT_PATCH: &str = r#"
name = "Init"
description = "Two saws, a touch of detune"
sample_rate = 48000
note = 57.0
total_detune = 0.1

[osc1]
saw = true
level = 0.5

[osc2]
saw = true
level = 0.5
"#;

/// Classic hard-sync lead: the slave runs a fifth up and is reset by the
/// master every cycle.
const SYNC_LEAD_PATCH: &str = r#"
name = "Sync Lead"
description = "Hard-synced saw a fifth above a silent master"
sample_rate = 48000
note = 57.0
hard_sync = true

[osc1]
saw = true
level = 0.0

[osc2]
saw = true
coarse = 7.0
level = 0.7
"#;

/// Pulse master bending a triangle slave.
const XMOD_BELL_PATCH: &str = r#"
name = "Xmod Bell"
description = "Pulse master cross-modulating a triangle an octave and a fifth up"
sample_rate = 48000
note = 64.0
cross_mod = 9.0
pulse_width = -0.2
drift = 0.02

[osc1]
saw = false
pulse = true
level = 0.2

[osc2]
saw = false
pulse = false
coarse = 19.0
level = 0.7
"#;

/// Two pulses at different widths; sweep them with `render --pwm-rate`.
const PWM_PAD_PATCH: &str = r#"
name = "PWM Pad"
description = "Detuned pulses, try render --pwm-rate 0.3"
sample_rate = 48000
note = 50.0
pulse_width = 0.1
total_detune = 0.15
slave_detune = 0.07
noise_level = 0.02

[osc1]
saw = false
pulse = true
pulse_width_mod = 0.2
level = 0.5

[osc2]
saw = false
pulse = true
coarse = 12.0
pulse_width_mod = -0.3
level = 0.4
"#;

/// All factory patches.
pub fn factory_patches() -> Vec<Patch> {
    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .collect()
}

/// Look up a factory patch by key (`sync-lead`) or display name
/// (`Sync Lead`), ignoring case.
pub fn get_factory_patch(name: &str) -> Option<Patch> {
    let wanted = name.to_lowercase();

    for (key, toml) in FACTORY_PATCHES_TOML {
        if key.to_lowercase() == wanted {
            return Patch::from_toml(toml).ok();
        }
    }

    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .find(|patch| patch.name.to_lowercase() == wanted)
}
