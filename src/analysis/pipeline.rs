use log::info;
use crate::analysis::config::{AttenuationIafOptions, PsdOptions, SavgolIafOptions};
use crate::analysis::estimator::{estimate_attenuation_iaf, estimate_iaf, IafOutcome};
use crate::analysis::recording::Recording;
use crate::analysis::spectrum::ChannelSpectra;
use crate::analysis::welch::WelchEstimator;
use crate::analysis::IafError;
/// Welch PSD of the picked channels of `recording`.
pub fn channel_psd(recording: &Recording, psd: &PsdOptions) -> Result<ChannelSpectra, IafError> {
    psd.validate()?;
    let welch = WelchEstimator::with_resolution(
        recording.sample_rate_hz(),
        psd.resolution_hz,
        psd.fmin_hz,
        psd.fmax_hz,
    )?;
    let spectra = welch.compute(recording)?;
    match &psd.picks {
        Some(picks) => spectra.pick(picks),
        None => Ok(spectra),
    }
}
/// IAF of one recording: channel-averaged Welch PSD, then Savitzky–Golay peak estimation.
pub fn savgol_iaf(recording: &Recording, options: &SavgolIafOptions) -> Result<IafOutcome, IafError> {
    options.iaf.validate()?;
    let spectra = channel_psd(recording, &options.psd)?;
    let outcome = estimate_iaf(&spectra.average(), &options.iaf)?;
    info!(
        "savgol IAF over {} channels: PAF={:?} CoG={:?} band={}-{} Hz",
        spectra.num_channels(),
        outcome.result.peak_alpha_frequency(),
        outcome.result.center_of_gravity(),
        outcome.result.alpha_band.low,
        outcome.result.alpha_band.high
    );
    Ok(outcome)
}
/// IAF from the alpha attenuation between two recordings of the same montage,
/// e.g. eyes open and eyes closed.
pub fn attenuation_iaf(
    recordings: [&Recording; 2],
    options: &AttenuationIafOptions,
) -> Result<IafOutcome, IafError> {
    options.attenuation.validate()?;
    let first = channel_psd(recordings[0], &options.psd)?;
    let second = channel_psd(recordings[1], &options.psd)?;
    let outcome = estimate_attenuation_iaf(&first, &second, &options.attenuation)?;
    info!(
        "attenuation IAF over {} channels ({:?} smoothing): PAF={:?} CoG={:?} band={}-{} Hz",
        first.num_channels(),
        options.attenuation.smoothing_mode,
        outcome.result.peak_alpha_frequency(),
        outcome.result.center_of_gravity(),
        outcome.result.alpha_band.low,
        outcome.result.alpha_band.high
    );
    Ok(outcome)
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::synthetic::SyntheticRecording;
    fn short(frequency_hz: f64) -> Recording {
        SyntheticRecording::at(frequency_hz)
            .channels(4)
            .duration_seconds(8.0)
            .build()
            .unwrap()
    }
    #[test]
    fn picks_select_channels() {
        let psd = PsdOptions {
            picks: Some(vec![0, 2]),
            ..PsdOptions::default()
        };
        let spectra = channel_psd(&short(10.0), &psd).unwrap();
        assert_eq!(spectra.num_channels(), 2);
        assert_eq!(spectra.channel_labels(), ["ch0".to_string(), "ch2".to_string()]);
    }
    #[test]
    fn bad_picks_are_rejected() {
        let options = SavgolIafOptions {
            psd: PsdOptions {
                picks: Some(vec![9]),
                ..PsdOptions::default()
            },
            ..SavgolIafOptions::default()
        };
        assert!(matches!(
            savgol_iaf(&short(10.0), &options),
            Err(IafError::InvalidInput(_))
        ));
    }
    #[test]
    fn per_channel_estimation_is_refused() {
        let mut options = AttenuationIafOptions::default();
        options.psd.average = false;
        let recording = short(10.0);
        assert!(matches!(
            attenuation_iaf([&recording, &recording], &options),
            Err(IafError::Configuration(_))
        ));
    }
    #[test]
    fn recordings_must_share_a_grid() {
        let slow = SyntheticRecording::at(10.0)
            .channels(2)
            .sample_rate_hz(100.0)
            .duration_seconds(8.0)
            .build()
            .unwrap();
        let fast = SyntheticRecording::at(10.0)
            .channels(2)
            .sample_rate_hz(128.0)
            .duration_seconds(8.0)
            .build()
            .unwrap();
        let options = AttenuationIafOptions {
            psd: PsdOptions {
                resolution_hz: 0.3,
                ..PsdOptions::default()
            },
            ..AttenuationIafOptions::default()
        };
        assert!(matches!(
            attenuation_iaf([&slow, &fast], &options),
            Err(IafError::ShapeMismatch { .. })
        ));
    }
}
