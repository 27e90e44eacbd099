use serde::{Deserialize, Serialize};

use crate::analysis::gate::{validate_threshold, DEFAULT_FLAT_MAX_R, DEFAULT_PINK_MAX_R2};
use crate::analysis::savgol::SmoothingSpec;
use crate::analysis::spectrum::BandLimits;
use crate::analysis::IafError;

/// Options for estimating IAF from one spectrum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IafOptions {
    pub band: BandLimits,
    pub smoothing: SmoothingSpec,
    /// Spectra whose log-log 1/f fit has a larger `R²` carry no resolvable peak.
    pub pink_max_r2: f64,
}

impl IafOptions {
    pub fn validate(&self) -> Result<(), IafError> {
        self.band.validate()?;
        self.smoothing.validate()?;
        validate_threshold("pink_max_r2", self.pink_max_r2)
    }
}

impl Default for IafOptions {
    fn default() -> Self {
        Self {
            band: BandLimits::auto(),
            smoothing: SmoothingSpec::default(),
            pink_max_r2: DEFAULT_PINK_MAX_R2,
        }
    }
}

/// Where Savitzky–Golay smoothing is applied in the attenuation estimator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmoothingMode {
    /// Peaks are read from the unsmoothed attenuation curve.
    #[default]
    None,
    /// Smooth every channel's spectrum before taking the difference.
    Each,
    /// Smooth the channel-averaged attenuation curve.
    Diff,
}

/// Options for estimating IAF from the attenuation between two conditions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttenuationOptions {
    pub band: BandLimits,
    pub smoothing_mode: SmoothingMode,
    pub smoothing: SmoothingSpec,
    /// Conditions correlated more strongly than this show no attenuation effect.
    pub flat_max_r: f64,
}

impl AttenuationOptions {
    pub fn validate(&self) -> Result<(), IafError> {
        self.band.validate()?;
        self.smoothing.validate()?;
        validate_threshold("flat_max_r", self.flat_max_r)
    }
}

impl Default for AttenuationOptions {
    fn default() -> Self {
        Self {
            band: BandLimits::auto(),
            smoothing_mode: SmoothingMode::None,
            smoothing: SmoothingSpec::default(),
            flat_max_r: DEFAULT_FLAT_MAX_R,
        }
    }
}

/// PSD settings shared by the recording-level estimators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsdOptions {
    /// Channels to use; all channels when `None`.
    pub picks: Option<Vec<usize>>,
    /// Frequency resolution in Hz; sets the FFT length to `sample_rate / resolution`.
    pub resolution_hz: f64,
    pub fmin_hz: f64,
    pub fmax_hz: f64,
    /// Average the PSD across channels. Per-channel estimates are not supported.
    pub average: bool,
}

impl PsdOptions {
    pub fn validate(&self) -> Result<(), IafError> {
        if !self.average {
            return Err(IafError::Configuration(
                "per-channel estimation is not supported; `average` must be true".into(),
            ));
        }
        if !self.resolution_hz.is_finite() || self.resolution_hz <= 0.0 {
            return Err(IafError::Configuration(format!(
                "resolution must be positive, got {} Hz",
                self.resolution_hz
            )));
        }
        if !(self.fmin_hz.is_finite() && self.fmax_hz.is_finite())
            || self.fmin_hz < 0.0
            || self.fmin_hz >= self.fmax_hz
        {
            return Err(IafError::Configuration(format!(
                "PSD range needs 0 <= fmin < fmax, got {}-{} Hz",
                self.fmin_hz, self.fmax_hz
            )));
        }
        Ok(())
    }
}

impl Default for PsdOptions {
    fn default() -> Self {
        Self {
            picks: None,
            resolution_hz: 0.25,
            fmin_hz: 1.0,
            fmax_hz: 30.0,
            average: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavgolIafOptions {
    pub psd: PsdOptions,
    pub iaf: IafOptions,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttenuationIafOptions {
    pub psd: PsdOptions,
    pub attenuation: AttenuationOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        IafOptions::default().validate().unwrap();
        AttenuationOptions::default().validate().unwrap();
        PsdOptions::default().validate().unwrap();
    }

    #[test]
    fn averaging_is_required() {
        let psd = PsdOptions {
            average: false,
            ..PsdOptions::default()
        };
        assert!(matches!(psd.validate(), Err(IafError::Configuration(_))));
    }

    #[test]
    fn invalid_band_is_rejected() {
        let options = IafOptions {
            band: BandLimits::fixed(13.0, 7.0),
            ..IafOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn options_read_from_partial_json() {
        let options: SavgolIafOptions = serde_json::from_str(
            r#"{"psd": {"resolution_hz": 1.0}, "iaf": {"band": {"fmin": 7.0, "fmax": 13.0}}}"#,
        )
        .unwrap();
        assert_eq!(options.psd.resolution_hz, 1.0);
        assert!(options.psd.average);
        assert_eq!(options.iaf.band, BandLimits::fixed(7.0, 13.0));
        assert_eq!(options.iaf.smoothing, SmoothingSpec::default());

        let attenuation: AttenuationIafOptions =
            serde_json::from_str(r#"{"attenuation": {"smoothing_mode": "diff"}}"#).unwrap();
        assert_eq!(attenuation.attenuation.smoothing_mode, SmoothingMode::Diff);
    }
}
