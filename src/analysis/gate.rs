//! Decide whether a spectrum supports an alpha-peak estimate at all.
//!
//! Single recordings are rejected when a straight line in log-log space
//! (1/f background) explains them too well. Two-condition recordings are
//! rejected when the two spectra are too strongly correlated to carry an
//! attenuation effect.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::spectrum::Spectrum;
use crate::analysis::stats::{linear_regression, pearson_correlation, LinearFit};
use crate::analysis::IafError;

pub const DEFAULT_PINK_MAX_R2: f64 = 0.9;
pub const DEFAULT_FLAT_MAX_R: f64 = 0.98;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateKind {
    /// `R²` of the log-log 1/f fit.
    PinkNoise,
    /// Pearson `r` between the two conditions.
    Similarity,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GateReport {
    pub kind: GateKind,
    /// `None` when the statistic is undefined for this input.
    pub statistic: Option<f64>,
    pub threshold: f64,
}

impl GateReport {
    /// An undefined statistic never exceeds the threshold.
    pub fn passed(&self) -> bool {
        self.statistic.map_or(true, |value| value <= self.threshold)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinkNoiseCheck {
    pub report: GateReport,
    pub fit: Option<LinearFit>,
}

pub fn validate_threshold(name: &'static str, value: f64) -> Result<(), IafError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(IafError::InvalidThreshold { name, value });
    }
    Ok(())
}

/// Fit `ln(power) = slope * ln(f) + intercept` over the whole spectrum and
/// compare its `R²` against `max_r2`.
pub fn pink_noise_gate(spectrum: &Spectrum, max_r2: f64) -> Result<PinkNoiseCheck, IafError> {
    validate_threshold("pink_max_r2", max_r2)?;
    if spectrum.frequencies_hz().iter().any(|&f| f <= 0.0) {
        return Err(IafError::InvalidInput(
            "pink-noise fit needs strictly positive frequencies".into(),
        ));
    }
    let powers = spectrum.powers();
    if !powers.iter().any(|&p| p > 0.0) {
        return Err(IafError::NonPositivePower {
            context: "pink-noise fit",
        });
    }

    let fit = if powers.iter().all(|&p| p > 0.0) {
        let log_f: Vec<f64> = spectrum.frequencies_hz().iter().map(|f| f.ln()).collect();
        let log_p: Vec<f64> = powers.iter().map(|p| p.ln()).collect();
        Some(linear_regression(&log_f, &log_p)?)
    } else {
        warn!("smoothed spectrum has non-positive power; log-log fit is undefined");
        None
    };

    let report = GateReport {
        kind: GateKind::PinkNoise,
        statistic: fit.map(|f| f.r_squared()),
        threshold: max_r2,
    };
    debug!(
        "pink-noise gate: r2={:?} threshold={} passed={}",
        report.statistic,
        max_r2,
        report.passed()
    );
    Ok(PinkNoiseCheck { report, fit })
}

/// Correlate the two conditions' full spectra and compare `r` against `max_r`.
pub fn similarity_gate(
    first: &Spectrum,
    second: &Spectrum,
    max_r: f64,
) -> Result<GateReport, IafError> {
    validate_threshold("flat_max_r", max_r)?;
    let r = pearson_correlation(first.powers(), second.powers())?;
    if r.is_none() {
        warn!("a condition has constant power; inter-condition correlation is undefined");
    }
    let report = GateReport {
        kind: GateKind::Similarity,
        statistic: r,
        threshold: max_r,
    };
    debug!(
        "similarity gate: r={:?} threshold={} passed={}",
        report.statistic,
        max_r,
        report.passed()
    );
    Ok(report)
}
