use iaf_pipeline::analysis::{
    attenuation_iaf, savgol_iaf, AttenuationIafOptions, AttenuationOptions, BandLimits,
    FrequencyBand, IafError, IafEstimate, IafOptions, PsdOptions, Recording, SavgolIafOptions,
    SmoothingMode, SmoothingSpec, SyntheticRecording,
};

fn alpha_recording() -> Recording {
    SyntheticRecording::at(11.25).build().unwrap()
}

fn reference_recording() -> Recording {
    SyntheticRecording::at(35.0).seed(7).build().unwrap()
}

fn coarse_psd() -> PsdOptions {
    PsdOptions {
        resolution_hz: 1.0,
        ..PsdOptions::default()
    }
}

fn coarse_smoothing() -> SmoothingSpec {
    SmoothingSpec::new(5, 4).unwrap()
}

#[test]
fn savgol_recovers_synthetic_alpha() {
    let outcome = savgol_iaf(&alpha_recording(), &SavgolIafOptions::default()).unwrap();
    let result = outcome.result;
    assert_eq!(result.peak_alpha_frequency(), Some(11.25));
    assert_eq!(result.center_of_gravity(), Some(11.25));
    assert_eq!(result.alpha_band, FrequencyBand::new(9.25, 13.0).unwrap());
}

#[test]
fn savgol_with_explicit_band_at_coarse_resolution() {
    let options = SavgolIafOptions {
        psd: coarse_psd(),
        iaf: IafOptions {
            band: BandLimits::fixed(7.0, 13.0),
            smoothing: coarse_smoothing(),
            ..IafOptions::default()
        },
    };
    let result = savgol_iaf(&alpha_recording(), &options).unwrap().result;
    assert_eq!(result.peak_alpha_frequency(), Some(11.0));
    assert_eq!(result.center_of_gravity(), Some(11.0));
    assert_eq!(result.alpha_band, FrequencyBand::new(7.0, 13.0).unwrap());
}

#[test]
fn attenuation_recovers_synthetic_alpha() {
    let result = attenuation_iaf(
        [&reference_recording(), &alpha_recording()],
        &AttenuationIafOptions::default(),
    )
    .unwrap()
    .result;
    assert_eq!(result.peak_alpha_frequency(), Some(11.25));
    assert_eq!(result.center_of_gravity(), Some(11.25));
    assert_eq!(result.alpha_band, FrequencyBand::new(9.25, 13.0).unwrap());
}

#[test]
fn attenuation_smoothing_modes_agree_on_explicit_band() {
    let reference = reference_recording();
    let alpha = alpha_recording();
    for mode in [SmoothingMode::None, SmoothingMode::Each, SmoothingMode::Diff] {
        let options = AttenuationIafOptions {
            psd: coarse_psd(),
            attenuation: AttenuationOptions {
                band: BandLimits::fixed(7.0, 13.0),
                smoothing_mode: mode,
                smoothing: coarse_smoothing(),
                ..AttenuationOptions::default()
            },
        };
        let result = attenuation_iaf([&reference, &alpha], &options)
            .unwrap()
            .result;
        assert_eq!(result.peak_alpha_frequency(), Some(11.0), "{mode:?}");
        assert_eq!(result.center_of_gravity(), Some(11.0), "{mode:?}");
        assert_eq!(result.alpha_band, FrequencyBand::new(7.0, 13.0).unwrap());
    }
}

#[test]
fn estimates_are_deterministic() {
    let recording = alpha_recording();
    let first = savgol_iaf(&recording, &SavgolIafOptions::default()).unwrap();
    let second = savgol_iaf(&recording, &SavgolIafOptions::default()).unwrap();
    assert_eq!(first, second);
    assert_eq!(recording, alpha_recording());
}

#[test]
fn band_follows_the_alpha_frequency() {
    let cases = [(9.0, (7.0, 11.0)), (10.0, (8.0, 12.0)), (12.0, (7.0, 13.75))];
    for (frequency, (low, high)) in cases {
        let recording = SyntheticRecording::at(frequency).channels(4).build().unwrap();
        let result = savgol_iaf(&recording, &SavgolIafOptions::default())
            .unwrap()
            .result;
        assert_eq!(result.alpha_band, FrequencyBand::new(low, high).unwrap());
        assert_eq!(result.peak_alpha_frequency(), Some(frequency));
        assert_eq!(result.center_of_gravity(), Some(frequency));
    }
}

#[test]
fn identical_conditions_have_no_attenuation_peak() {
    let alpha = alpha_recording();
    let options = AttenuationIafOptions {
        attenuation: AttenuationOptions {
            band: BandLimits::fixed(7.0, 13.0),
            ..AttenuationOptions::default()
        },
        ..AttenuationIafOptions::default()
    };
    let result = attenuation_iaf([&alpha, &alpha], &options).unwrap().result;
    assert_eq!(result.estimate, IafEstimate::NotDetected);
    assert_eq!(result.alpha_band, FrequencyBand::new(7.0, 13.0).unwrap());
}

#[test]
fn zero_threshold_rejects_a_clear_peak() {
    let mut options = SavgolIafOptions::default();
    options.iaf.band = BandLimits::fixed(7.0, 13.0);
    options.iaf.smoothing = coarse_smoothing();
    options.psd = coarse_psd();
    options.iaf.pink_max_r2 = 0.0;
    let result = savgol_iaf(&alpha_recording(), &options).unwrap().result;
    assert_eq!(result.estimate, IafEstimate::NotDetected);
}

#[test]
fn zero_threshold_rejects_the_default_recovery() {
    let mut options = SavgolIafOptions::default();
    options.iaf.pink_max_r2 = 0.0;
    let outcome = savgol_iaf(&alpha_recording(), &options).unwrap();
    assert_eq!(outcome.result.estimate, IafEstimate::NotDetected);
    assert_eq!(outcome.result.alpha_band, FrequencyBand::new(9.25, 13.0).unwrap());
    assert!(outcome.diagnostics.gate().statistic.is_some());
}

#[test]
fn silent_recording_is_an_error() {
    let silent = Recording::unlabeled(250.0, vec![vec![0.0; 7500]; 4]).unwrap();
    assert!(savgol_iaf(&silent, &SavgolIafOptions::default()).is_err());
    let fixed = SavgolIafOptions {
        iaf: IafOptions {
            band: BandLimits::fixed(7.0, 13.0),
            ..IafOptions::default()
        },
        ..SavgolIafOptions::default()
    };
    assert!(matches!(
        savgol_iaf(&silent, &fixed),
        Err(IafError::NonPositivePower { .. })
    ));
}

#[test]
fn configuration_errors_surface_before_computation() {
    let alpha = alpha_recording();
    let mut options = SavgolIafOptions::default();
    options.psd.average = false;
    assert!(matches!(
        savgol_iaf(&alpha, &options),
        Err(IafError::Configuration(_))
    ));

    let mut options = SavgolIafOptions::default();
    options.iaf.pink_max_r2 = -0.5;
    assert!(matches!(
        savgol_iaf(&alpha, &options),
        Err(IafError::InvalidThreshold { .. })
    ));

    let mut options = SavgolIafOptions::default();
    options.psd.picks = Some(vec![0, 16]);
    assert!(matches!(
        savgol_iaf(&alpha, &options),
        Err(IafError::InvalidInput(_))
    ));
}
