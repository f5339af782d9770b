//! Audio tuning: volume scalar and filter chain
//!
//! The tuning state is owned per controller instance and applied by the
//! external renderer; this module only validates and stores it. No
//! per-track filter state is retained.

use crate::error::{PlaybackError, Result};
use crate::types::VolumePolicy;
use serde::{Deserialize, Serialize};

/// Upper bound of the volume scalar (1.0 = unity gain, 5.0 = +500%)
pub const MAX_VOLUME: f32 = 5.0;

/// One band of the equalizer filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EqualizerBand {
    /// Band index, 0 (25 Hz) through 14 (16 kHz)
    pub band: u8,

    /// Gain multiplier, -0.25 (muted) through 1.0 (+0.25 doubles)
    pub gain: f32,
}

/// A named audio filter with its parameters
///
/// Applied by the renderer in chain order. Validation bounds follow the
/// render protocol the controller targets; an invalid spec never reaches
/// the live chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterSpec {
    /// 15-band equalizer
    Equalizer { bands: Vec<EqualizerBand> },

    /// Speed/pitch/rate scaling; 1.0 is unchanged
    Timescale { speed: f32, pitch: f32, rate: f32 },

    /// Amplitude oscillation
    Tremolo { frequency: f32, depth: f32 },

    /// Pitch oscillation
    Vibrato { frequency: f32, depth: f32 },

    /// Audio-channel rotation ("8D audio")
    Rotation { rotation_hz: f32 },

    /// Vocal suppression
    Karaoke {
        level: f32,
        mono_level: f32,
        filter_band: f32,
        filter_width: f32,
    },

    /// High-frequency suppression; higher smoothing cuts lower
    LowPass { smoothing: f32 },

    /// Stereo channel mixing; all factors in [0.0, 1.0]
    ChannelMix {
        left_to_left: f32,
        left_to_right: f32,
        right_to_left: f32,
        right_to_right: f32,
    },
}

impl FilterSpec {
    /// Name of the filter, for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            FilterSpec::Equalizer { .. } => "equalizer",
            FilterSpec::Timescale { .. } => "timescale",
            FilterSpec::Tremolo { .. } => "tremolo",
            FilterSpec::Vibrato { .. } => "vibrato",
            FilterSpec::Rotation { .. } => "rotation",
            FilterSpec::Karaoke { .. } => "karaoke",
            FilterSpec::LowPass { .. } => "lowPass",
            FilterSpec::ChannelMix { .. } => "channelMix",
        }
    }

    /// Check parameter bounds
    pub fn validate(&self) -> Result<()> {
        match self {
            FilterSpec::Equalizer { bands } => {
                for band in bands {
                    if band.band > 14 {
                        return Err(invalid(self, "band index must be 0-14"));
                    }
                    if !(-0.25..=1.0).contains(&band.gain) || band.gain.is_nan() {
                        return Err(invalid(self, "band gain must be in [-0.25, 1.0]"));
                    }
                }
                Ok(())
            }
            FilterSpec::Timescale { speed, pitch, rate } => {
                for value in [speed, pitch, rate] {
                    if !value.is_finite() || *value <= 0.0 {
                        return Err(invalid(self, "speed/pitch/rate must be > 0"));
                    }
                }
                Ok(())
            }
            FilterSpec::Tremolo { frequency, depth }
            | FilterSpec::Vibrato { frequency, depth } => {
                if !frequency.is_finite() || *frequency <= 0.0 {
                    return Err(invalid(self, "frequency must be > 0"));
                }
                if !depth.is_finite() || *depth <= 0.0 || *depth > 1.0 {
                    return Err(invalid(self, "depth must be in (0.0, 1.0]"));
                }
                Ok(())
            }
            FilterSpec::Rotation { rotation_hz } => {
                if !rotation_hz.is_finite() {
                    return Err(invalid(self, "rotation_hz must be finite"));
                }
                Ok(())
            }
            FilterSpec::Karaoke {
                level,
                mono_level,
                filter_band,
                filter_width,
            } => {
                for value in [level, mono_level, filter_band, filter_width] {
                    if !value.is_finite() {
                        return Err(invalid(self, "parameters must be finite"));
                    }
                }
                Ok(())
            }
            FilterSpec::LowPass { smoothing } => {
                if !smoothing.is_finite() || *smoothing < 1.0 {
                    return Err(invalid(self, "smoothing must be >= 1.0"));
                }
                Ok(())
            }
            FilterSpec::ChannelMix {
                left_to_left,
                left_to_right,
                right_to_left,
                right_to_right,
            } => {
                for value in [left_to_left, left_to_right, right_to_left, right_to_right] {
                    if !(0.0..=1.0).contains(value) || value.is_nan() {
                        return Err(invalid(self, "mix factors must be in [0.0, 1.0]"));
                    }
                }
                Ok(())
            }
        }
    }
}

fn invalid(spec: &FilterSpec, reason: &str) -> PlaybackError {
    PlaybackError::Validation(format!("{}: {}", spec.name(), reason))
}

/// Per-controller tuning state
#[derive(Debug, Clone)]
pub struct Tuning {
    volume: f32,
    filters: Vec<FilterSpec>,
    policy: VolumePolicy,
}

impl Tuning {
    /// Create tuning state with the given volume policy
    ///
    /// The initial volume goes through the same policy as later updates;
    /// a bad initial value under `Clamp` is silently brought into range.
    pub fn new(initial_volume: f32, policy: VolumePolicy) -> Self {
        let mut tuning = Self {
            volume: 1.0,
            filters: Vec::new(),
            policy,
        };
        // Clamp policy cannot fail; Strict falls back to unity
        if tuning.set_volume(initial_volume).is_err() {
            tuning.volume = 1.0;
        }
        tuning
    }

    /// Set the volume scalar
    ///
    /// Out-of-range input is clamped into `[0.0, MAX_VOLUME]` or rejected
    /// with a validation error, per the configured policy. NaN is always
    /// rejected. Returns the applied value.
    pub fn set_volume(&mut self, volume: f32) -> Result<f32> {
        if volume.is_nan() {
            return Err(PlaybackError::Validation("volume must not be NaN".into()));
        }

        let applied = match self.policy {
            VolumePolicy::Clamp => volume.clamp(0.0, MAX_VOLUME),
            VolumePolicy::Strict => {
                if !(0.0..=MAX_VOLUME).contains(&volume) {
                    return Err(PlaybackError::Validation(format!(
                        "volume {volume} out of range [0.0, {MAX_VOLUME}]"
                    )));
                }
                volume
            }
        };

        self.volume = applied;
        Ok(applied)
    }

    /// Current volume scalar
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Replace the active filter chain atomically
    ///
    /// Every spec is validated before any of them is applied; on error the
    /// previous chain stays active. An empty chain is valid (bypass).
    pub fn set_filters(&mut self, chain: Vec<FilterSpec>) -> Result<()> {
        for spec in &chain {
            spec.validate()?;
        }
        self.filters = chain;
        Ok(())
    }

    /// The active filter chain, in application order
    pub fn filters(&self) -> &[FilterSpec] {
        &self.filters
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::new(1.0, VolumePolicy::Clamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_policy_brings_volume_into_range() {
        let mut tuning = Tuning::new(1.0, VolumePolicy::Clamp);

        assert_eq!(tuning.set_volume(7.5).unwrap(), MAX_VOLUME);
        assert_eq!(tuning.set_volume(-0.5).unwrap(), 0.0);
        assert_eq!(tuning.set_volume(0.8).unwrap(), 0.8);
        assert_eq!(tuning.volume(), 0.8);
    }

    #[test]
    fn strict_policy_rejects_out_of_range() {
        let mut tuning = Tuning::new(1.0, VolumePolicy::Strict);

        assert!(tuning.set_volume(5.1).is_err());
        assert!(tuning.set_volume(-0.1).is_err());
        // Rejected input leaves the previous value
        assert_eq!(tuning.volume(), 1.0);

        assert_eq!(tuning.set_volume(0.5).unwrap(), 0.5);
    }

    #[test]
    fn nan_volume_always_rejected() {
        let mut clamp = Tuning::new(1.0, VolumePolicy::Clamp);
        assert!(clamp.set_volume(f32::NAN).is_err());
        assert_eq!(clamp.volume(), 1.0);
    }

    #[test]
    fn empty_chain_is_bypass() {
        let mut tuning = Tuning::default();
        tuning
            .set_filters(vec![FilterSpec::LowPass { smoothing: 20.0 }])
            .unwrap();
        assert_eq!(tuning.filters().len(), 1);

        tuning.set_filters(vec![]).unwrap();
        assert!(tuning.filters().is_empty());
    }

    #[test]
    fn invalid_spec_leaves_previous_chain() {
        let mut tuning = Tuning::default();
        tuning
            .set_filters(vec![FilterSpec::Rotation { rotation_hz: 0.2 }])
            .unwrap();

        let err = tuning
            .set_filters(vec![
                FilterSpec::Rotation { rotation_hz: 0.5 },
                FilterSpec::Tremolo {
                    frequency: 2.0,
                    depth: 1.5,
                },
            ])
            .unwrap_err();
        assert!(matches!(err, PlaybackError::Validation(_)));

        // Atomic replace: the old chain is still active
        assert_eq!(
            tuning.filters(),
            &[FilterSpec::Rotation { rotation_hz: 0.2 }]
        );
    }

    #[test]
    fn equalizer_band_bounds() {
        let ok = FilterSpec::Equalizer {
            bands: vec![EqualizerBand { band: 0, gain: 0.25 }],
        };
        assert!(ok.validate().is_ok());

        let bad_band = FilterSpec::Equalizer {
            bands: vec![EqualizerBand {
                band: 15,
                gain: 0.0,
            }],
        };
        assert!(bad_band.validate().is_err());

        let bad_gain = FilterSpec::Equalizer {
            bands: vec![EqualizerBand {
                band: 3,
                gain: -0.5,
            }],
        };
        assert!(bad_gain.validate().is_err());
    }

    #[test]
    fn timescale_requires_positive_factors() {
        let ok = FilterSpec::Timescale {
            speed: 1.2,
            pitch: 0.9,
            rate: 1.0,
        };
        assert!(ok.validate().is_ok());

        let bad = FilterSpec::Timescale {
            speed: 0.0,
            pitch: 1.0,
            rate: 1.0,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn vibrato_depth_bounds() {
        let ok = FilterSpec::Vibrato {
            frequency: 4.0,
            depth: 1.0,
        };
        assert!(ok.validate().is_ok());

        let bad = FilterSpec::Vibrato {
            frequency: 4.0,
            depth: 0.0,
        };
        assert!(bad.validate().is_err());
    }
}
