//! Alpha-band edge detection.
//!
//! The power inside a seed range around 10 Hz is smoothed with a single
//! high-order polynomial, and the band edges are the local minima of that
//! curve nearest to 10 Hz: the last one below it and the first one above it.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::analysis::savgol::{Smoother, SmoothingSpec};
use crate::analysis::spectrum::{BandLimits, FrequencyBand, Spectrum};
use crate::analysis::stats::local_minima;
use crate::analysis::IafError;

/// Frequency that splits the search range into its lower and upper halves.
pub const REFERENCE_FREQUENCY_HZ: f64 = 10.0;
/// Search range used for an edge the caller left open.
pub const DEFAULT_SEED_RANGE_HZ: (f64, f64) = (5.0, 15.0);
/// Polynomial order of the search smoothing.
pub const SEARCH_POLYORDER: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandEdge {
    Lower,
    Upper,
}

impl fmt::Display for BandEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandEdge::Lower => write!(f, "lower"),
            BandEdge::Upper => write!(f, "upper"),
        }
    }
}

/// Smoothed power over the seed range, kept for diagnostics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchCurve {
    pub frequencies_hz: Vec<f64>,
    pub smoothed: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BandSearch {
    pub band: FrequencyBand,
    /// `None` when the caller fixed both edges and no search ran.
    pub search_curve: Option<SearchCurve>,
}

/// Resolve the alpha band, searching only for the edges `limits` leaves open.
pub fn locate_alpha_band(spectrum: &Spectrum, limits: BandLimits) -> Result<BandSearch, IafError> {
    limits.validate()?;
    if let (Some(low), Some(high)) = (limits.fmin, limits.fmax) {
        return Ok(BandSearch {
            band: FrequencyBand::new(low, high)?,
            search_curve: None,
        });
    }

    let seed_low = limits.fmin.unwrap_or(DEFAULT_SEED_RANGE_HZ.0);
    let seed_high = limits.fmax.unwrap_or(DEFAULT_SEED_RANGE_HZ.1);
    let range = spectrum.band_range(seed_low, seed_high);
    let frequencies = &spectrum.frequencies_hz()[range.clone()];
    let powers = &spectrum.powers()[range];

    // The window spans the whole seed range; an even count drops to the next odd length.
    let window_length = if frequencies.len() % 2 == 1 {
        frequencies.len()
    } else {
        frequencies.len().saturating_sub(1)
    };
    if window_length <= SEARCH_POLYORDER {
        return Err(IafError::InvalidSmoothing {
            window_length,
            polyorder: SEARCH_POLYORDER,
            reason: "alpha search range holds too few samples",
        });
    }
    let smoothed = SmoothingSpec::new(window_length, SEARCH_POLYORDER)?.smooth(powers)?;

    let fmin = match limits.fmin {
        Some(low) => low,
        None => {
            let below = frequencies.partition_point(|&f| f < REFERENCE_FREQUENCY_HZ);
            let nearest = local_minima(&smoothed[..below]).last().copied().ok_or(
                IafError::NoBandEdgeFound {
                    edge: BandEdge::Lower,
                    seed_low,
                    seed_high,
                },
            )?;
            frequencies[nearest]
        }
    };
    let fmax = match limits.fmax {
        Some(high) => high,
        None => {
            let above = frequencies.partition_point(|&f| f <= REFERENCE_FREQUENCY_HZ);
            let nearest = local_minima(&smoothed[above..]).first().copied().ok_or(
                IafError::NoBandEdgeFound {
                    edge: BandEdge::Upper,
                    seed_low,
                    seed_high,
                },
            )?;
            frequencies[above + nearest]
        }
    };
    debug!("alpha band located at {fmin}-{fmax} Hz (seed {seed_low}-{seed_high} Hz)");

    Ok(BandSearch {
        band: FrequencyBand::new(fmin, fmax)?,
        search_curve: Some(SearchCurve {
            frequencies_hz: frequencies.to_vec(),
            smoothed,
        }),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Vec<f64> {
        (0..117).map(|i| 1.0 + 0.25 * i as f64).collect()
    }

    fn pink_with_bump(centre: f64, width: f64, amplitude: f64) -> Spectrum {
        let freqs = grid();
        let powers = freqs
            .iter()
            .map(|f| 1.0 / f + amplitude * (-(f - centre).powi(2) / (2.0 * width * width)).exp())
            .collect();
        Spectrum::new(freqs, powers).unwrap()
    }

    #[test]
    fn finds_minima_nearest_ten_hz() {
        let search = locate_alpha_band(&pink_with_bump(10.5, 1.0, 2.0), BandLimits::auto()).unwrap();
        assert_eq!(search.band, FrequencyBand::new(7.75, 13.25).unwrap());
        let curve = search.search_curve.unwrap();
        assert_eq!(curve.frequencies_hz.first(), Some(&5.0));
        assert_eq!(curve.frequencies_hz.last(), Some(&15.0));
        assert_eq!(curve.smoothed.len(), 41);
    }

    #[test]
    fn keeps_the_minimum_closest_to_reference() {
        // Lower half has minima at 5.25 and 7.0 Hz, upper half at 12.0 and 14.0 Hz.
        let search = locate_alpha_band(&pink_with_bump(9.5, 0.8, 1.0), BandLimits::auto()).unwrap();
        assert_eq!(search.band, FrequencyBand::new(7.0, 12.0).unwrap());
    }

    #[test]
    fn supplied_edge_narrows_the_search() {
        let spectrum = pink_with_bump(10.5, 1.0, 2.0);
        let lower_fixed = locate_alpha_band(
            &spectrum,
            BandLimits {
                fmin: Some(7.0),
                fmax: None,
            },
        )
        .unwrap();
        assert_eq!(lower_fixed.band, FrequencyBand::new(7.0, 14.25).unwrap());

        let upper_fixed = locate_alpha_band(
            &spectrum,
            BandLimits {
                fmin: None,
                fmax: Some(13.0),
            },
        )
        .unwrap();
        assert_eq!(upper_fixed.band, FrequencyBand::new(6.5, 13.0).unwrap());
        // 5-13 Hz holds 33 samples.
        assert_eq!(upper_fixed.search_curve.unwrap().smoothed.len(), 33);
    }

    #[test]
    fn fixed_band_skips_the_search() {
        let spectrum = Spectrum::new(grid(), vec![0.0; 117]).unwrap();
        let search = locate_alpha_band(&spectrum, BandLimits::fixed(7.0, 13.0)).unwrap();
        assert_eq!(search.band, FrequencyBand::new(7.0, 13.0).unwrap());
        assert!(search.search_curve.is_none());
    }

    #[test]
    fn pure_pink_noise_has_no_edges() {
        let freqs = grid();
        let powers = freqs.iter().map(|f| 1.0 / f).collect();
        let spectrum = Spectrum::new(freqs, powers).unwrap();
        let err = locate_alpha_band(&spectrum, BandLimits::auto()).unwrap_err();
        assert!(matches!(
            err,
            IafError::NoBandEdgeFound {
                edge: BandEdge::Lower,
                ..
            }
        ));
        let err = locate_alpha_band(
            &spectrum,
            BandLimits {
                fmin: Some(7.0),
                fmax: None,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IafError::NoBandEdgeFound {
                edge: BandEdge::Upper,
                ..
            }
        ));
    }

    #[test]
    fn flat_spectrum_has_no_edges() {
        let spectrum = Spectrum::new(grid(), vec![0.0; 117]).unwrap();
        assert!(matches!(
            locate_alpha_band(&spectrum, BandLimits::auto()),
            Err(IafError::NoBandEdgeFound { .. })
        ));
    }

    #[test]
    fn coarse_grid_cannot_support_the_search() {
        let freqs: Vec<f64> = (1..=30).map(f64::from).collect();
        let powers = vec![1.0; freqs.len()];
        let spectrum = Spectrum::new(freqs, powers).unwrap();
        // 5-15 Hz at 1 Hz holds 11 samples: a window of 11 with order 10 is allowed,
        // 6-15 Hz drops to 9 samples and is not.
        let limits = BandLimits {
            fmin: Some(6.0),
            fmax: None,
        };
        assert!(matches!(
            locate_alpha_band(&spectrum, limits),
            Err(IafError::InvalidSmoothing { .. })
        ));
    }
}
