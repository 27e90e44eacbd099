//! Welch power spectral density for recordings.
use std::f64::consts::PI;
use log::debug;
use ndarray::Array2;
use rustfft::{num_complex::Complex64, FftPlanner};
use crate::analysis::recording::Recording;
use crate::analysis::spectrum::{band_range, ChannelSpectra};
use crate::analysis::IafError;
/// Computes averaged periodograms over non-overlapping, Hamming-windowed segments.
#[derive(Clone, Debug, PartialEq)]
pub struct WelchEstimator {
    fft_size: usize,
    fmin_hz: f64,
    fmax_hz: f64,
}
impl WelchEstimator {
    pub fn with_size(fft_size: usize, fmin_hz: f64, fmax_hz: f64) -> Self {
        Self {
            fft_size,
            fmin_hz,
            fmax_hz,
        }
    }
    /// FFT length `round(sample_rate / resolution)`, giving bins `resolution` Hz apart.
    pub fn with_resolution(
        sample_rate_hz: f64,
        resolution_hz: f64,
        fmin_hz: f64,
        fmax_hz: f64,
    ) -> Result<Self, IafError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if !positive(resolution_hz) || !positive(sample_rate_hz) {
            return Err(IafError::Configuration(format!(
                "cannot derive an FFT length from {sample_rate_hz} Hz at {resolution_hz} Hz resolution"
            )));
        }
        let fft_size = (sample_rate_hz / resolution_hz).round() as usize;
        Ok(Self::with_size(fft_size, fmin_hz, fmax_hz))
    }
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }
    pub fn compute(&self, recording: &Recording) -> Result<ChannelSpectra, IafError> {
        recording.validate()?;
        let n_fft = self.fft_size;
        let n_times = recording.samples_per_channel();
        if n_fft < 2 || n_fft > n_times {
            return Err(IafError::InvalidInput(format!(
                "FFT length {n_fft} does not fit a recording of {n_times} samples"
            )));
        }
        let fs = recording.sample_rate_hz();
        let all_frequencies: Vec<f64> = (0..=n_fft / 2)
            .map(|k| k as f64 * fs / n_fft as f64)
            .collect();
        let range = band_range(&all_frequencies, self.fmin_hz, self.fmax_hz);
        if range.is_empty() {
            return Err(IafError::EmptyBand {
                low: self.fmin_hz,
                high: self.fmax_hz,
            });
        }
        let window = hamming(n_fft);
        let scale = 1.0 / (fs * window.iter().map(|w| w * w).sum::<f64>());
        let n_segments = n_times / n_fft;
        debug!(
            "welch: {} channels, n_fft={n_fft}, {n_segments} segments, {} bins kept",
            recording.num_channels(),
            range.len()
        );
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n_fft);
        let mut powers = Array2::zeros((recording.num_channels(), range.len()));
        let mut buffer = vec![Complex64::new(0.0, 0.0); n_fft];
        for (mut row, channel) in powers.rows_mut().into_iter().zip(recording.channels()) {
            let mut accumulated = vec![0.0; n_fft / 2 + 1];
            for segment in channel.chunks_exact(n_fft) {
                let mean = segment.iter().sum::<f64>() / n_fft as f64;
                for ((slot, &sample), w) in buffer.iter_mut().zip(segment).zip(&window) {
                    *slot = Complex64::new((sample - mean) * w, 0.0);
                }
                fft.process(&mut buffer);
                for (k, acc) in accumulated.iter_mut().enumerate() {
                    let one_sided = if k == 0 || (n_fft % 2 == 0 && k == n_fft / 2) {
                        1.0
                    } else {
                        2.0
                    };
                    *acc += one_sided * buffer[k].norm_sqr() * scale;
                }
            }
            for (out, acc) in row.iter_mut().zip(&accumulated[range.clone()]) {
                *out = acc / n_segments as f64;
            }
        }
        ChannelSpectra::new(
            all_frequencies[range].to_vec(),
            powers,
            recording.channel_labels().to_vec(),
        )
    }
}
/// Periodic Hamming window.
fn hamming(len: usize) -> Vec<f64> {
    (0..len)
        .map(|n| 0.54 - 0.46 * (2.0 * PI * n as f64 / len as f64).cos())
        .collect()
}
