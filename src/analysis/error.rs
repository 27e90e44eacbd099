use thiserror::Error;
use crate::analysis::band::BandEdge;
#[derive(Debug, Error)]
pub enum IafError {
    #[error("invalid smoothing (window_length={window_length}, polyorder={polyorder}): {reason}")]
    InvalidSmoothing {
        window_length: usize,
        polyorder: usize,
        reason: &'static str,
    },
    #[error("threshold `{name}` must be finite and within [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("shape mismatch in {context}: expected {expected}, got {actual}")]
    ShapeMismatch {
        context: &'static str,
        expected: String,
        actual: String,
    },
    #[error("no local minimum for the {edge} alpha edge in the {seed_low}-{seed_high} Hz search range")]
    NoBandEdgeFound {
        edge: BandEdge,
        seed_low: f64,
        seed_high: f64,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{context} is undefined: power is not positive")]
    NonPositivePower { context: &'static str },
    #[error("alpha band {low}-{high} Hz contains no spectrum samples")]
    EmptyBand { low: f64, high: f64 },
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for IafError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        IafError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for IafError {
    fn from(value: image::ImageError) -> Self {
        IafError::Plot(value.to_string())
    }
}
