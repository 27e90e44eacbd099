//! Savitzky–Golay smoothing.
//!
//! Each output sample is the value, at the window centre, of the least-squares
//! polynomial of order `polyorder` fitted over `window_length` neighbouring
//! samples. The first and last `window_length / 2` samples are taken from the
//! polynomial fitted to the first (last) full window, evaluated at their own
//! positions, so the output has the same length as the input and reproduces
//! any polynomial of order `polyorder` exactly, edges included.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::analysis::IafError;

/// Something that turns a power curve into a smoothed curve of the same length.
pub trait Smoother {
    fn smooth(&self, values: &[f64]) -> Result<Vec<f64>, IafError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmoothingSpec {
    pub window_length: usize,
    pub polyorder: usize,
}

impl SmoothingSpec {
    pub fn new(window_length: usize, polyorder: usize) -> Result<Self, IafError> {
        let spec = Self {
            window_length,
            polyorder,
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> Result<(), IafError> {
        let invalid = |reason| IafError::InvalidSmoothing {
            window_length: self.window_length,
            polyorder: self.polyorder,
            reason,
        };
        if self.window_length % 2 == 0 {
            return Err(invalid("window length must be a positive odd integer"));
        }
        if self.polyorder >= self.window_length {
            return Err(invalid("polynomial order must be less than the window length"));
        }
        Ok(())
    }
}

impl Default for SmoothingSpec {
    fn default() -> Self {
        Self {
            window_length: 11,
            polyorder: 5,
        }
    }
}

impl Smoother for SmoothingSpec {
    fn smooth(&self, values: &[f64]) -> Result<Vec<f64>, IafError> {
        SavitzkyGolay::new(*self)?.apply(values)
    }
}

/// Precomputed Savitzky–Golay filter for one window/order pair.
#[derive(Clone, Debug)]
pub struct SavitzkyGolay {
    spec: SmoothingSpec,
    /// Maps a window of samples to polynomial coefficients, (polyorder + 1) x window.
    projection: Array2<f64>,
    half: usize,
    scale: f64,
}

impl SavitzkyGolay {
    pub fn new(spec: SmoothingSpec) -> Result<Self, IafError> {
        spec.validate()?;
        let half = spec.window_length / 2;
        // Abscissae are scaled into [-1, 1] to keep high orders well conditioned.
        let scale = half.max(1) as f64;
        let design = DMatrix::from_fn(spec.window_length, spec.polyorder + 1, |i, k| {
            ((i as f64 - half as f64) / scale).powi(k as i32)
        });
        let projection = least_squares_projection(design).ok_or(IafError::InvalidSmoothing {
            window_length: spec.window_length,
            polyorder: spec.polyorder,
            reason: "polynomial fit is rank deficient",
        })?;
        Ok(Self {
            spec,
            projection,
            half,
            scale,
        })
    }

    pub fn spec(&self) -> SmoothingSpec {
        self.spec
    }

    pub fn apply(&self, values: &[f64]) -> Result<Vec<f64>, IafError> {
        let n = values.len();
        let window = self.spec.window_length;
        if n < window {
            return Err(IafError::InvalidSmoothing {
                window_length: window,
                polyorder: self.spec.polyorder,
                reason: "window length exceeds the number of samples",
            });
        }
        let mut smoothed = vec![0.0; n];
        let centre = self.projection.row(0);
        for i in self.half..n - self.half {
            let segment = &values[i - self.half..=i + self.half];
            smoothed[i] = centre.iter().zip(segment).map(|(c, v)| c * v).sum();
        }
        let left = self.fit(&values[..window]);
        for (i, out) in smoothed.iter_mut().enumerate().take(self.half) {
            *out = evaluate(&left, self.abscissa(i));
        }
        let offset = n - window;
        let right = self.fit(&values[offset..]);
        for i in n - self.half..n {
            smoothed[i] = evaluate(&right, self.abscissa(i - offset));
        }
        Ok(smoothed)
    }

    fn fit(&self, window: &[f64]) -> Array1<f64> {
        self.projection.dot(&ArrayView1::from(window))
    }

    fn abscissa(&self, position: usize) -> f64 {
        (position as f64 - self.half as f64) / self.scale
    }
}

impl Smoother for SavitzkyGolay {
    fn smooth(&self, values: &[f64]) -> Result<Vec<f64>, IafError> {
        self.apply(values)
    }
}

fn evaluate(coefficients: &Array1<f64>, x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Least-squares projection (the pseudo-inverse) of a design matrix.
///
/// Returns `None` when the design does not have full column rank.
fn least_squares_projection(design: DMatrix<f64>) -> Option<Array2<f64>> {
    let cols = design.ncols();
    let size = design.nrows().max(cols) as f64;
    let svd = design.svd(true, true);
    let tolerance = f64::EPSILON * size * svd.singular_values.max();
    if svd.rank(tolerance) < cols {
        return None;
    }
    let pinv = svd.pseudo_inverse(tolerance).ok()?;
    Some(Array2::from_shape_fn(pinv.shape(), |(i, j)| pinv[(i, j)]))
}
