//! Small numeric helpers composed by the band locator, validity gates and peak estimator.

use crate::analysis::IafError;

/// Ordinary least-squares line `y = slope * x + intercept` with its correlation coefficient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
}

impl LinearFit {
    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }

    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Least-squares regression of `y` on `x`.
///
/// Needs at least two points and a non-constant `x`. A constant `y` has
/// correlation 0.
pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<LinearFit, IafError> {
    check_pair(x, y, "linear regression")?;
    let (mean_x, mean_y) = (mean(x), mean(y));
    let (sxx, syy, sxy) = centred_sums(x, y, mean_x, mean_y);
    if sxx == 0.0 {
        return Err(IafError::InvalidInput(
            "linear regression needs a non-constant predictor".into(),
        ));
    }
    let slope = sxy / sxx;
    let r = if syy == 0.0 {
        0.0
    } else {
        (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
    };
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r,
    })
}

/// Pearson correlation; `None` when either series is constant.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> Result<Option<f64>, IafError> {
    check_pair(a, b, "pearson correlation")?;
    let (mean_a, mean_b) = (mean(a), mean(b));
    let (saa, sbb, sab) = centred_sums(a, b, mean_a, mean_b);
    let denom = (saa * sbb).sqrt();
    if denom == 0.0 {
        return Ok(None);
    }
    Ok(Some((sab / denom).clamp(-1.0, 1.0)))
}

/// Indices of strict local minima, in ascending order. The first and last
/// samples are never minima.
pub fn local_minima(values: &[f64]) -> Vec<usize> {
    values
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] < w[0] && w[1] < w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

/// Weighted mean index `Σ i·w_i / Σ w_i`; `None` unless the total weight is positive.
pub fn center_of_mass(weights: &[f64]) -> Option<f64> {
    let total: f64 = weights.iter().sum();
    if total.is_nan() || total <= 0.0 || total.is_infinite() {
        return None;
    }
    let moment: f64 = weights
        .iter()
        .enumerate()
        .map(|(i, w)| i as f64 * w)
        .sum();
    Some(moment / total)
}

/// Index of the first maximum.
pub fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, current)) if v <= current => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

/// Round to the nearest integer, ties to even.
pub fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

fn check_pair(a: &[f64], b: &[f64], what: &'static str) -> Result<(), IafError> {
    if a.len() != b.len() {
        return Err(IafError::ShapeMismatch {
            context: what,
            expected: format!("{} samples", a.len()),
            actual: format!("{} samples", b.len()),
        });
    }
    if a.len() < 2 {
        return Err(IafError::InvalidInput(format!(
            "{what} needs at least two samples"
        )));
    }
    Ok(())
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn centred_sums(a: &[f64], b: &[f64], mean_a: f64, mean_b: f64) -> (f64, f64, f64) {
    a.iter()
        .zip(b)
        .fold((0.0, 0.0, 0.0), |(saa, sbb, sab), (&x, &y)| {
            let (dx, dy) = (x - mean_a, y - mean_b);
            (saa + dx * dx, sbb + dy * dy, sab + dx * dy)
        })
}
