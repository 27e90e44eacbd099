//! Individual alpha frequency (IAF) estimation from EEG power spectra.
//!
//! [`savgol_iaf`] estimates the IAF of a single recording from its
//! channel-averaged Welch PSD; [`attenuation_iaf`] estimates it from the alpha
//! power difference between two conditions (eyes open / eyes closed). Both
//! are thin wrappers over the spectrum-level [`estimate_iaf`] and
//! [`estimate_attenuation_iaf`].

pub mod analysis;

pub use analysis::{
    attenuation_iaf, estimate_attenuation_iaf, estimate_iaf, render_iaf_png, savgol_iaf,
    AttenuationIafOptions, AttenuationOptions, BandLimits, ChannelSpectra, FrequencyBand,
    IafDiagnostics, IafError, IafEstimate, IafOptions, IafOutcome, IafResult, PlotStyle,
    PsdOptions, Recording, SavgolIafOptions, SmoothingMode, SmoothingSpec, Spectrum,
    SyntheticRecording,
};
