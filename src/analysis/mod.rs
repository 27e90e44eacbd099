// src/analysis/mod.rs
// Spectral building blocks first, estimators and the recording front end on top.
pub mod band;
pub mod config;
pub mod error;
pub mod estimator;
pub mod gate;
pub mod peak;
pub mod pipeline;
pub mod plot;
pub mod recording;
pub mod savgol;
pub mod spectrum;
pub mod stats;
pub mod synthetic;
pub mod welch;
// Re-exports for callers that only need the estimators.
pub use band::{locate_alpha_band, BandEdge, BandSearch, SearchCurve};
pub use config::{
    AttenuationIafOptions, AttenuationOptions, IafOptions, PsdOptions, SavgolIafOptions,
    SmoothingMode,
};
pub use error::IafError;
pub use estimator::{
    estimate_attenuation_iaf, estimate_iaf, estimate_iaf_with, IafDiagnostics, IafEstimate,
    IafOutcome, IafResult,
};
pub use gate::{pink_noise_gate, similarity_gate, GateKind, GateReport, PinkNoiseCheck};
pub use peak::{estimate_peak, AlphaPeak};
pub use pipeline::{attenuation_iaf, channel_psd, savgol_iaf};
pub use plot::{render_iaf_png, PlotStyle};
pub use recording::Recording;
pub use savgol::{SavitzkyGolay, Smoother, SmoothingSpec};
pub use spectrum::{BandLimits, ChannelSpectra, FrequencyBand, Spectrum};
pub use synthetic::SyntheticRecording;
pub use welch::WelchEstimator;
