use std::ops::Range;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use crate::analysis::IafError;
/// Closed frequency interval `[low, high]` in Hz.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    pub low: f64,
    pub high: f64,
}
impl FrequencyBand {
    pub fn new(low: f64, high: f64) -> Result<Self, IafError> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(IafError::InvalidInput(format!(
                "frequency band needs finite low < high, got {low}-{high} Hz"
            )));
        }
        Ok(Self { low, high })
    }
    pub fn contains(&self, frequency_hz: f64) -> bool {
        frequency_hz >= self.low && frequency_hz <= self.high
    }
}
/// Alpha-band edges fixed by the caller. A missing edge is located from the spectrum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BandLimits {
    pub fmin: Option<f64>,
    pub fmax: Option<f64>,
}
impl BandLimits {
    pub fn auto() -> Self {
        Self::default()
    }
    pub fn fixed(fmin: f64, fmax: f64) -> Self {
        Self {
            fmin: Some(fmin),
            fmax: Some(fmax),
        }
    }
    pub fn is_fixed(&self) -> bool {
        self.fmin.is_some() && self.fmax.is_some()
    }
    pub fn validate(&self) -> Result<(), IafError> {
        for edge in [self.fmin, self.fmax].into_iter().flatten() {
            if !edge.is_finite() {
                return Err(IafError::InvalidInput(format!(
                    "alpha band edge must be finite, got {edge}"
                )));
            }
        }
        if let (Some(low), Some(high)) = (self.fmin, self.fmax) {
            FrequencyBand::new(low, high)?;
        }
        Ok(())
    }
}
/// A single power curve over a strictly increasing frequency grid.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    frequencies_hz: Vec<f64>,
    powers: Vec<f64>,
}
impl Spectrum {
    pub fn new(frequencies_hz: Vec<f64>, powers: Vec<f64>) -> Result<Self, IafError> {
        if frequencies_hz.len() != powers.len() {
            return Err(IafError::ShapeMismatch {
                context: "spectrum",
                expected: format!("{} power values", frequencies_hz.len()),
                actual: format!("{} power values", powers.len()),
            });
        }
        validate_grid(&frequencies_hz)?;
        validate_powers(powers.iter())?;
        Ok(Self {
            frequencies_hz,
            powers,
        })
    }
    pub fn frequencies_hz(&self) -> &[f64] {
        &self.frequencies_hz
    }
    pub fn powers(&self) -> &[f64] {
        &self.powers
    }
    pub fn len(&self) -> usize {
        self.powers.len()
    }
    pub fn is_empty(&self) -> bool {
        self.powers.is_empty()
    }
    /// Same frequency grid, new power values.
    pub fn with_powers(&self, powers: Vec<f64>) -> Result<Self, IafError> {
        Self::new(self.frequencies_hz.clone(), powers)
    }
    /// Contiguous index range of the samples with `low <= f <= high`.
    pub fn band_range(&self, low: f64, high: f64) -> Range<usize> {
        band_range(&self.frequencies_hz, low, high)
    }
}
/// Per-channel power curves sharing one frequency grid.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSpectra {
    frequencies_hz: Vec<f64>,
    powers: Array2<f64>, // channels x bins
    channel_labels: Vec<String>,
}
impl ChannelSpectra {
    pub fn new(
        frequencies_hz: Vec<f64>,
        powers: Array2<f64>,
        channel_labels: Vec<String>,
    ) -> Result<Self, IafError> {
        let (channels, bins) = powers.dim();
        if channels == 0 {
            return Err(IafError::InvalidInput(
                "channel spectra need at least one channel".into(),
            ));
        }
        if bins != frequencies_hz.len() {
            return Err(IafError::ShapeMismatch {
                context: "channel spectra",
                expected: format!("{} bins per channel", frequencies_hz.len()),
                actual: format!("{bins} bins per channel"),
            });
        }
        if channel_labels.len() != channels {
            return Err(IafError::ShapeMismatch {
                context: "channel labels",
                expected: format!("{channels} labels"),
                actual: format!("{} labels", channel_labels.len()),
            });
        }
        validate_grid(&frequencies_hz)?;
        validate_powers(powers.iter())?;
        Ok(Self {
            frequencies_hz,
            powers,
            channel_labels,
        })
    }
    pub fn frequencies_hz(&self) -> &[f64] {
        &self.frequencies_hz
    }
    pub fn powers(&self) -> &Array2<f64> {
        &self.powers
    }
    pub fn channel_labels(&self) -> &[String] {
        &self.channel_labels
    }
    pub fn num_channels(&self) -> usize {
        self.powers.nrows()
    }
    pub fn pick(&self, picks: &[usize]) -> Result<Self, IafError> {
        if picks.is_empty() {
            return Err(IafError::InvalidInput("channel picks are empty".into()));
        }
        if let Some(&bad) = picks.iter().find(|&&idx| idx >= self.num_channels()) {
            return Err(IafError::InvalidInput(format!(
                "channel pick {bad} is out of range for {} channels",
                self.num_channels()
            )));
        }
        Ok(Self {
            frequencies_hz: self.frequencies_hz.clone(),
            powers: self.powers.select(Axis(0), picks),
            channel_labels: picks
                .iter()
                .map(|&idx| self.channel_labels[idx].clone())
                .collect(),
        })
    }
    /// Mean power across channels.
    pub fn average(&self) -> Spectrum {
        let mean = self
            .powers
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(self.frequencies_hz.len()));
        Spectrum {
            frequencies_hz: self.frequencies_hz.clone(),
            powers: mean.to_vec(),
        }
    }
    /// Apply `f` to every channel's power curve.
    pub fn map_channels<F>(&self, mut f: F) -> Result<Self, IafError>
    where
        F: FnMut(&[f64]) -> Result<Vec<f64>, IafError>,
    {
        let mut powers = Array2::zeros(self.powers.raw_dim());
        for (mut out_row, row) in powers.rows_mut().into_iter().zip(self.powers.rows()) {
            let values = f(&row.to_vec())?;
            if values.len() != out_row.len() {
                return Err(IafError::ShapeMismatch {
                    context: "channel transform",
                    expected: format!("{} bins", out_row.len()),
                    actual: format!("{} bins", values.len()),
                });
            }
            out_row.assign(&Array1::from(values));
        }
        Ok(Self {
            frequencies_hz: self.frequencies_hz.clone(),
            powers,
            channel_labels: self.channel_labels.clone(),
        })
    }
    /// True when both grids have the same length and agree within a small tolerance.
    pub fn shares_grid_with(&self, other: &ChannelSpectra) -> bool {
        self.frequencies_hz.len() == other.frequencies_hz.len()
            && self
                .frequencies_hz
                .iter()
                .zip(&other.frequencies_hz)
                .all(|(&a, &b)| (a - b).abs() <= GRID_ATOL + GRID_RTOL * b.abs())
    }
}
impl From<Spectrum> for ChannelSpectra {
    fn from(spectrum: Spectrum) -> Self {
        let bins = spectrum.powers.len();
        let powers = Array2::from_shape_vec((1, bins), spectrum.powers)
            .unwrap_or_else(|_| Array2::zeros((1, bins)));
        Self {
            frequencies_hz: spectrum.frequencies_hz,
            powers,
            channel_labels: vec!["mean".into()],
        }
    }
}
const GRID_RTOL: f64 = 1e-5;
const GRID_ATOL: f64 = 1e-8;
pub(crate) fn band_range(frequencies_hz: &[f64], low: f64, high: f64) -> Range<usize> {
    let start = frequencies_hz.partition_point(|&f| f < low);
    let end = frequencies_hz.partition_point(|&f| f <= high);
    start..end.max(start)
}
fn validate_grid(frequencies_hz: &[f64]) -> Result<(), IafError> {
    if frequencies_hz.is_empty() {
        return Err(IafError::InvalidInput("spectrum has no samples".into()));
    }
    if frequencies_hz.iter().any(|f| !f.is_finite()) {
        return Err(IafError::InvalidInput(
            "frequency axis contains non-finite values".into(),
        ));
    }
    if let Some(pair) = frequencies_hz.windows(2).find(|pair| pair[1] <= pair[0]) {
        return Err(IafError::InvalidInput(format!(
            "frequency axis must be strictly increasing ({} Hz followed by {} Hz)",
            pair[0], pair[1]
        )));
    }
    Ok(())
}
fn validate_powers<'a>(mut powers: impl Iterator<Item = &'a f64>) -> Result<(), IafError> {
    if powers.any(|p| !p.is_finite()) {
        return Err(IafError::InvalidInput(
            "power values must be finite".into(),
        ));
    }
    Ok(())
}
