use serde::{Deserialize, Serialize};
use crate::analysis::spectrum::{FrequencyBand, Spectrum};
use crate::analysis::stats::{argmax, center_of_mass, round_half_even};
use crate::analysis::IafError;
/// Peak alpha frequency and alpha centre of gravity, both on the spectrum's grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlphaPeak {
    pub peak_alpha_frequency: f64,
    pub center_of_gravity: f64,
}
/// Locate the maximum and the power-weighted centroid of `smoothed` inside `band`.
///
/// The maximum takes the lowest frequency among equal powers. The centroid
/// index is rounded to the nearest sample (ties to even) so the centre of
/// gravity is always a grid frequency.
pub fn estimate_peak(smoothed: &Spectrum, band: FrequencyBand) -> Result<AlphaPeak, IafError> {
    let range = smoothed.band_range(band.low, band.high);
    if range.is_empty() {
        return Err(IafError::EmptyBand {
            low: band.low,
            high: band.high,
        });
    }
    let frequencies = &smoothed.frequencies_hz()[range.clone()];
    let powers = &smoothed.powers()[range];
    let peak_idx = argmax(powers).ok_or(IafError::EmptyBand {
        low: band.low,
        high: band.high,
    })?;
    let centroid = center_of_mass(powers).ok_or(IafError::NonPositivePower {
        context: "alpha centre of gravity",
    })?;
    let centroid_idx = round_half_even(centroid);
    if centroid_idx < 0.0 || centroid_idx >= powers.len() as f64 {
        return Err(IafError::InvalidInput(format!(
            "alpha centre of gravity falls at index {centroid_idx} outside the {}-sample band \
             {}-{} Hz; negative power in the band",
            powers.len(),
            band.low,
            band.high
        )));
    }
    Ok(AlphaPeak {
        peak_alpha_frequency: frequencies[peak_idx],
        center_of_gravity: frequencies[centroid_idx as usize],
    })
}
