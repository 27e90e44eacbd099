//! Spectrum-level IAF estimators.
//!
//! Both estimators resolve the alpha band first, then run their validity
//! gate, and only read the peak and centroid when the gate passes.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::band::{locate_alpha_band, SearchCurve};
use crate::analysis::config::{AttenuationOptions, IafOptions, SmoothingMode};
use crate::analysis::gate::{pink_noise_gate, similarity_gate, GateReport};
use crate::analysis::peak::{estimate_peak, AlphaPeak};
use crate::analysis::savgol::{SavitzkyGolay, Smoother};
use crate::analysis::spectrum::{ChannelSpectra, FrequencyBand, Spectrum};
use crate::analysis::stats::LinearFit;
use crate::analysis::IafError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IafEstimate {
    Detected {
        peak_alpha_frequency: f64,
        center_of_gravity: f64,
    },
    NotDetected,
}

impl From<AlphaPeak> for IafEstimate {
    fn from(peak: AlphaPeak) -> Self {
        IafEstimate::Detected {
            peak_alpha_frequency: peak.peak_alpha_frequency,
            center_of_gravity: peak.center_of_gravity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IafResult {
    pub estimate: IafEstimate,
    pub alpha_band: FrequencyBand,
}

impl IafResult {
    pub fn peak_alpha_frequency(&self) -> Option<f64> {
        match self.estimate {
            IafEstimate::Detected {
                peak_alpha_frequency,
                ..
            } => Some(peak_alpha_frequency),
            IafEstimate::NotDetected => None,
        }
    }

    pub fn center_of_gravity(&self) -> Option<f64> {
        match self.estimate {
            IafEstimate::Detected {
                center_of_gravity, ..
            } => Some(center_of_gravity),
            IafEstimate::NotDetected => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self.estimate, IafEstimate::Detected { .. })
    }
}

/// Intermediate curves behind an estimate, for plotting and inspection.
#[derive(Clone, Debug, PartialEq)]
pub enum IafDiagnostics {
    Single {
        spectrum: Spectrum,
        smoothed: Spectrum,
        search_curve: Option<SearchCurve>,
        gate: GateReport,
        pink_fit: Option<LinearFit>,
    },
    Attenuation {
        /// Channel-averaged curves of the two conditions, before any smoothing.
        first: Spectrum,
        second: Spectrum,
        /// The curve the peak is read from.
        attenuation: Spectrum,
        search_curve: Option<SearchCurve>,
        gate: GateReport,
    },
}

impl IafDiagnostics {
    pub fn gate(&self) -> &GateReport {
        match self {
            IafDiagnostics::Single { gate, .. } | IafDiagnostics::Attenuation { gate, .. } => gate,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct IafOutcome {
    pub result: IafResult,
    pub diagnostics: IafDiagnostics,
}

/// Estimate IAF from one (channel-averaged) spectrum with Savitzky–Golay smoothing.
pub fn estimate_iaf(spectrum: &Spectrum, options: &IafOptions) -> Result<IafOutcome, IafError> {
    options.validate()?;
    let smoother = SavitzkyGolay::new(options.smoothing)?;
    estimate_iaf_with(spectrum, options, &smoother)
}

/// Same as [`estimate_iaf`] with a caller-supplied smoother; `options.smoothing` is ignored.
pub fn estimate_iaf_with<S: Smoother + ?Sized>(
    spectrum: &Spectrum,
    options: &IafOptions,
    smoother: &S,
) -> Result<IafOutcome, IafError> {
    options.band.validate()?;
    let search = locate_alpha_band(spectrum, options.band)?;
    let smoothed = spectrum.with_powers(smoother.smooth(spectrum.powers())?)?;
    let check = pink_noise_gate(spectrum, options.pink_max_r2)?;

    let estimate = if check.report.passed() {
        estimate_peak(&smoothed, search.band)?.into()
    } else {
        IafEstimate::NotDetected
    };
    debug!("single-spectrum estimate: {estimate:?} in {:?}", search.band);

    Ok(IafOutcome {
        result: IafResult {
            estimate,
            alpha_band: search.band,
        },
        diagnostics: IafDiagnostics::Single {
            spectrum: spectrum.clone(),
            smoothed,
            search_curve: search.search_curve,
            gate: check.report,
            pink_fit: check.fit,
        },
    })
}

/// Estimate IAF from the power attenuation between two conditions.
///
/// `first` is the condition with less alpha power (typically eyes open) and
/// `second` the one with more; the sign does not matter since the averaged
/// difference is taken in absolute value.
pub fn estimate_attenuation_iaf(
    first: &ChannelSpectra,
    second: &ChannelSpectra,
    options: &AttenuationOptions,
) -> Result<IafOutcome, IafError> {
    options.validate()?;
    if !first.shares_grid_with(second) {
        return Err(IafError::ShapeMismatch {
            context: "attenuation frequency grids",
            expected: grid_summary(first.frequencies_hz()),
            actual: grid_summary(second.frequencies_hz()),
        });
    }
    if first.num_channels() != second.num_channels() {
        return Err(IafError::ShapeMismatch {
            context: "attenuation channel count",
            expected: format!("{} channels", first.num_channels()),
            actual: format!("{} channels", second.num_channels()),
        });
    }

    let first_mean = first.average();
    let second_mean = second.average();

    let smoother = SavitzkyGolay::new(options.smoothing)?;
    let (first, second) = match options.smoothing_mode {
        SmoothingMode::Each => (
            first.map_channels(|row| smoother.apply(row))?,
            second.map_channels(|row| smoother.apply(row))?,
        ),
        SmoothingMode::None | SmoothingMode::Diff => (first.clone(), second.clone()),
    };

    let difference = (second.powers() - first.powers())
        .mean_axis(ndarray::Axis(0))
        .ok_or_else(|| IafError::InvalidInput("attenuation needs at least one channel".into()))?;
    let attenuation =
        first_mean.with_powers(difference.iter().map(|value| value.abs()).collect())?;

    let search = locate_alpha_band(&attenuation, options.band)?;
    let attenuation = match options.smoothing_mode {
        SmoothingMode::Diff => attenuation.with_powers(smoother.apply(attenuation.powers())?)?,
        SmoothingMode::None | SmoothingMode::Each => attenuation,
    };

    let gate = similarity_gate(&first_mean, &second_mean, options.flat_max_r)?;
    let estimate = if gate.passed() {
        estimate_peak(&attenuation, search.band)?.into()
    } else {
        IafEstimate::NotDetected
    };
    debug!(
        "attenuation estimate ({:?} smoothing): {estimate:?} in {:?}",
        options.smoothing_mode, search.band
    );

    Ok(IafOutcome {
        result: IafResult {
            estimate,
            alpha_band: search.band,
        },
        diagnostics: IafDiagnostics::Attenuation {
            first: first_mean,
            second: second_mean,
            attenuation,
            search_curve: search.search_curve,
            gate,
        },
    })
}

fn grid_summary(frequencies_hz: &[f64]) -> String {
    match (frequencies_hz.first(), frequencies_hz.last()) {
        (Some(first), Some(last)) => {
            format!("{} bins over {first}-{last} Hz", frequencies_hz.len())
        }
        _ => "an empty grid".into(),
    }
}
