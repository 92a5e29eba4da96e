//! Patch file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;
use twinosc_dco::{DualOscillator, NoiseSource, OscillatorSettings, WaveShape};

use crate::error::{PatchError, ValidationError};

/// Settings for one oscillator inside a patch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OscPatch {
    /// Sawtooth enabled.
    pub saw: bool,
    /// Pulse enabled. With neither saw nor pulse the oscillator is a triangle.
    pub pulse: bool,
    /// Coarse tuning in semitones.
    pub coarse: f32,
    /// Offset added to the shared pulse width.
    pub pulse_width_mod: f32,
    /// Mix level, 0 to 1.
    pub level: f32,
}

impl Default for OscPatch {
    fn default() -> Self {
        Self {
            saw: true,
            pulse: false,
            coarse: 0.0,
            pulse_width_mod: 0.0,
            level: 0.5,
        }
    }
}

impl OscPatch {
    /// Waveform label for listings.
    pub fn shape_name(&self) -> &'static str {
        match (self.saw, self.pulse) {
            (true, true) => "saw+pulse",
            (true, false) => "saw",
            (false, true) => "pulse",
            (false, false) => "triangle",
        }
    }
}

impl From<OscPatch> for OscillatorSettings {
    fn from(osc: OscPatch) -> Self {
        OscillatorSettings {
            shape: WaveShape {
                saw: osc.saw,
                pulse: osc.pulse,
            },
            coarse: osc.coarse,
            pitch_mod: 0.0,
            pulse_width_mod: osc.pulse_width_mod,
            level: osc.level,
        }
    }
}

/// A complete dual-oscillator setting, stored as TOML.
///
/// Every field is optional in the file; missing fields take the values of
/// [`Patch::default`].
///
/// # TOML Format
///
/// ```toml
/// name = "Sync Lead"
/// sample_rate = 48000
/// note = 57.0
/// hard_sync = true
///
/// [osc1]
/// saw = true
/// level = 0.0
///
/// [osc2]
/// saw = true
/// coarse = 7.0
/// level = 0.7
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate in Hz.
    pub sample_rate: u32,

    /// Base note in MIDI semitones.
    pub note: f32,

    /// Hard-sync oscillator 2 to oscillator 1.
    pub hard_sync: bool,

    /// Cross-modulation depth in semitones per unit of oscillator 1 output.
    pub cross_mod: f32,

    /// Shared pulse width, -1 to 1 (0 = square).
    pub pulse_width: f32,

    /// White noise level.
    pub noise_level: f32,

    /// Fine tune in semitones.
    pub tune: f32,

    /// Octave offset.
    pub octave: i32,

    /// Static per-voice detune depth in semitones.
    pub total_detune: f32,

    /// Extra detune of oscillator 2 in semitones.
    pub slave_detune: f32,

    /// Per-sample pitch jitter in semitones.
    pub drift: f32,

    /// Truncate coarse tuning to whole semitones.
    pub quantize: bool,

    /// Use the half-band kernels.
    pub decimation: bool,

    /// Oscillator 1 (master).
    pub osc1: OscPatch,

    /// Oscillator 2 (slave).
    pub osc2: OscPatch,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            name: "Untitled".to_string(),
            description: None,
            sample_rate: 48000,
            note: 57.0,
            hard_sync: false,
            cross_mod: 0.0,
            pulse_width: 0.0,
            noise_level: 0.0,
            tune: 0.0,
            octave: 0,
            total_detune: 0.0,
            slave_detune: 0.0,
            drift: twinosc_dco::DEFAULT_DRIFT,
            quantize: false,
            decimation: false,
            osc1: OscPatch::default(),
            osc2: OscPatch::default(),
        }
    }
}

/// Accepted sample rates.
const SAMPLE_RATE_RANGE: (u32, u32) = (8000, 384_000);

impl Patch {
    /// Create a default patch with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PatchError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PatchError::read_file(path, e))?;
        let patch: Patch = toml::from_str(&content)?;
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PatchError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PatchError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| PatchError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| PatchError::write_file(path, e))?;
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, PatchError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every value against the range the oscillator is meant for.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        let (min_sr, max_sr) = SAMPLE_RATE_RANGE;
        if !(min_sr..=max_sr).contains(&self.sample_rate) {
            errors.push(ValidationError::OutOfRange {
                param: "sample_rate".to_string(),
                value: self.sample_rate as f32,
                min: min_sr as f32,
                max: max_sr as f32,
            });
        }

        let mut check = |param: &str, value: f32, min: f32, max: f32| {
            if !(min..=max).contains(&value) {
                errors.push(ValidationError::OutOfRange {
                    param: param.to_string(),
                    value,
                    min,
                    max,
                });
            }
        };

        check("note", self.note, 0.0, 127.0);
        check("cross_mod", self.cross_mod, 0.0, 48.0);
        check("pulse_width", self.pulse_width, -1.0, 1.0);
        check("noise_level", self.noise_level, 0.0, 1.0);
        check("tune", self.tune, -12.0, 12.0);
        check("octave", self.octave as f32, -4.0, 4.0);
        check("total_detune", self.total_detune, 0.0, 12.0);
        check("slave_detune", self.slave_detune, -48.0, 48.0);
        check("drift", self.drift, 0.0, 1.0);
        for (prefix, osc) in [("osc1", &self.osc1), ("osc2", &self.osc2)] {
            check(format!("{prefix}.coarse").as_str(), osc.coarse, -48.0, 48.0);
            check(
                format!("{prefix}.pulse_width_mod").as_str(),
                osc.pulse_width_mod,
                -1.0,
                1.0,
            );
            check(format!("{prefix}.level").as_str(), osc.level, 0.0, 1.0);
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }

    /// Load every control of the patch into `dco`.
    pub fn apply<R: NoiseSource>(&self, dco: &mut DualOscillator<R>) {
        dco.set_sample_rate(self.sample_rate as f32);
        dco.set_note(self.note);
        dco.set_osc1(self.osc1.into());
        dco.set_osc2(self.osc2.into());
        dco.set_hard_sync(self.hard_sync);
        dco.set_cross_mod(self.cross_mod);
        dco.set_pulse_width(self.pulse_width);
        dco.set_noise_level(self.noise_level);
        dco.set_tune(self.tune);
        dco.set_octave(self.octave);
        dco.set_total_detune(self.total_detune);
        dco.set_slave_detune(self.slave_detune);
        dco.set_drift(self.drift);
        dco.set_quantize(self.quantize);
        dco.set_decimation(self.decimation);
    }

    /// A fresh oscillator pair configured from this patch.
    pub fn oscillator(&self, seed: u32) -> DualOscillator {
        let mut dco = DualOscillator::new(self.sample_rate as f32, seed);
        self.apply(&mut dco);
        dco
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patch_is_valid() {
        let patch = Patch::default();
        assert_eq!(patch.name, "Untitled");
        assert_eq!(patch.sample_rate, 48000);
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let patch = Patch::from_toml(
            r#"
name = "Partial"
hard_sync = true

[osc2]
coarse = 12.0
"#,
        )
        .unwrap();

        assert_eq!(patch.name, "Partial");
        assert!(patch.hard_sync);
        assert_eq!(patch.osc2.coarse, 12.0);
        assert!(patch.osc2.saw, "unspecified osc fields keep their defaults");
        assert_eq!(patch.osc2.level, 0.5);
        assert_eq!(patch.osc1, OscPatch::default());
        assert_eq!(patch.drift, twinosc_dco::DEFAULT_DRIFT);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut patch = Patch::new("Round Trip");
        patch.description = Some("every field set".to_string());
        patch.note = 45.5;
        patch.hard_sync = true;
        patch.cross_mod = 3.0;
        patch.octave = -1;
        patch.osc1.pulse = true;
        patch.osc2.saw = false;
        patch.osc2.coarse = 7.0;

        let text = patch.to_toml().unwrap();
        assert!(text.contains("[osc1]"));
        let parsed = Patch::from_toml(&text).unwrap();
        assert_eq!(parsed, patch);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = Patch::from_toml("note = \"high\"").unwrap_err();
        assert!(matches!(err, PatchError::TomlParse(_)));
    }

    #[test]
    fn test_validate_single_error() {
        let mut patch = Patch::default();
        patch.osc1.level = 1.5;
        let err = patch.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref param, .. } if param == "osc1.level"
        ));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut patch = Patch::default();
        patch.sample_rate = 1000;
        patch.cross_mod = 60.0;
        patch.drift = f32::NAN;

        match patch.validate() {
            Err(ValidationError::Multiple(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected three errors, got {:?}", other),
        }
    }

    #[test]
    fn test_apply_configures_oscillator() {
        let mut patch = Patch::new("Applied");
        patch.sample_rate = 44100;
        patch.note = 40.0;
        patch.hard_sync = true;
        patch.cross_mod = 5.0;
        patch.pulse_width = 0.3;
        patch.decimation = true;
        patch.osc1 = OscPatch {
            saw: false,
            pulse: true,
            level: 0.8,
            ..OscPatch::default()
        };
        patch.osc2.coarse = 7.0;

        let dco = patch.oscillator(3);
        assert_eq!(dco.sample_rate(), 44100.0);
        assert_eq!(dco.note(), 40.0);
        assert!(dco.hard_sync());
        assert_eq!(dco.cross_mod(), 5.0);
        assert_eq!(dco.pulse_width(), 0.3);
        assert!(dco.decimation());
        assert_eq!(dco.osc1().shape, WaveShape::PULSE);
        assert_eq!(dco.osc1().level, 0.8);
        assert_eq!(dco.osc2().coarse, 7.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lead.toml");

        let mut patch = Patch::new("Saved");
        patch.osc2.coarse = -5.0;
        patch.save(&path).unwrap();
        assert!(path.exists());

        let loaded = Patch::load(&path).unwrap();
        assert_eq!(loaded, patch);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Patch::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, PatchError::ReadFile { .. }));
    }

    #[test]
    fn test_shape_names() {
        let mut osc = OscPatch::default();
        assert_eq!(osc.shape_name(), "saw");
        osc.pulse = true;
        assert_eq!(osc.shape_name(), "saw+pulse");
        osc.saw = false;
        assert_eq!(osc.shape_name(), "pulse");
        osc.pulse = false;
        assert_eq!(osc.shape_name(), "triangle");
    }
}
