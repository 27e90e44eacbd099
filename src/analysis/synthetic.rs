use std::f64::consts::PI;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::recording::Recording;
use crate::analysis::IafError;

/// Builder for sine-wave recordings with a known alpha frequency.
///
/// Every channel is a sine at `frequency_hz` with its own random phase, plus
/// uniform noise in `[-noise, noise]`. The same seed always gives the same
/// samples.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticRecording {
    pub frequency_hz: f64,
    pub channels: usize,
    pub sample_rate_hz: f64,
    pub duration_seconds: f64,
    pub amplitude: f64,
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticRecording {
    fn default() -> Self {
        Self {
            frequency_hz: 11.25,
            channels: 16,
            sample_rate_hz: 250.0,
            duration_seconds: 30.0,
            amplitude: 10e-6,
            noise: 1e-9,
            seed: 42,
        }
    }
}

impl SyntheticRecording {
    pub fn at(frequency_hz: f64) -> Self {
        Self {
            frequency_hz,
            ..Self::default()
        }
    }

    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn sample_rate_hz(mut self, sample_rate_hz: f64) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    pub fn duration_seconds(mut self, duration_seconds: f64) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }

    pub fn amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    pub fn noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(&self) -> Result<Recording, IafError> {
        if self.duration_seconds.is_nan() || self.duration_seconds <= 0.0 {
            return Err(IafError::Configuration(format!(
                "synthetic duration must be positive, got {} s",
                self.duration_seconds
            )));
        }
        for (name, value) in [("amplitude", self.amplitude), ("noise", self.noise)] {
            if !value.is_finite() || value < 0.0 {
                return Err(IafError::Configuration(format!(
                    "synthetic {name} must be finite and non-negative, got {value}"
                )));
            }
        }
        let n_times = (self.duration_seconds * self.sample_rate_hz).round() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let samples = (0..self.channels)
            .map(|_| {
                let phase = 2.0 * PI * rng.gen::<f64>();
                (0..n_times)
                    .map(|t| {
                        let angle = 2.0 * PI * self.frequency_hz * t as f64 / self.sample_rate_hz;
                        let jitter = if self.noise > 0.0 {
                            rng.gen_range(-self.noise..self.noise)
                        } else {
                            0.0
                        };
                        self.amplitude * (angle + phase).sin() + jitter
                    })
                    .collect::<Vec<f64>>()
            })
            .collect();
        Recording::unlabeled(self.sample_rate_hz, samples)
    }
}
