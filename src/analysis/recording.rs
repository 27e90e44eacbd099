use std::time::Duration;
use crate::analysis::IafError;
/// Multichannel time series handed to the recording-level estimators.
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    sample_rate_hz: f64,
    channel_labels: Vec<String>,
    samples: Vec<Vec<f64>>, // channels x samples
}
impl Recording {
    pub fn new(
        sample_rate_hz: f64,
        samples: Vec<Vec<f64>>,
        channel_labels: Vec<String>,
    ) -> Result<Self, IafError> {
        let recording = Self {
            sample_rate_hz,
            channel_labels,
            samples,
        };
        recording.validate()?;
        Ok(recording)
    }
    /// Recording with labels `ch0`, `ch1`, ...
    pub fn unlabeled(sample_rate_hz: f64, samples: Vec<Vec<f64>>) -> Result<Self, IafError> {
        let labels = (0..samples.len()).map(|i| format!("ch{i}")).collect();
        Self::new(sample_rate_hz, samples, labels)
    }
    pub fn validate(&self) -> Result<(), IafError> {
        if !self.sample_rate_hz.is_finite() || self.sample_rate_hz <= 0.0 {
            return Err(IafError::InvalidInput(format!(
                "sample rate must be positive, got {} Hz",
                self.sample_rate_hz
            )));
        }
        if self.samples.is_empty() {
            return Err(IafError::InvalidInput(
                "recording needs at least one channel".into(),
            ));
        }
        if self.samples.len() != self.channel_labels.len() {
            return Err(IafError::ShapeMismatch {
                context: "recording labels",
                expected: format!("{} labels", self.samples.len()),
                actual: format!("{} labels", self.channel_labels.len()),
            });
        }
        let expected = self.samples[0].len();
        if let Some(channel) = self.samples.iter().find(|c| c.len() != expected) {
            return Err(IafError::ShapeMismatch {
                context: "recording channels",
                expected: format!("{expected} samples per channel"),
                actual: format!("{} samples", channel.len()),
            });
        }
        if self.samples.iter().flatten().any(|v| !v.is_finite()) {
            return Err(IafError::InvalidInput(
                "recording contains non-finite samples".into(),
            ));
        }
        Ok(())
    }
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }
    pub fn channel_labels(&self) -> &[String] {
        &self.channel_labels
    }
    pub fn channels(&self) -> &[Vec<f64>] {
        &self.samples
    }
    pub fn num_channels(&self) -> usize {
        self.samples.len()
    }
    pub fn samples_per_channel(&self) -> usize {
        self.samples.first().map_or(0, Vec::len)
    }
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.samples_per_channel() as f64 / self.sample_rate_hz)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn rejects_bad_shapes() {
        assert!(Recording::unlabeled(0.0, vec![vec![0.0; 4]]).is_err());
        assert!(Recording::unlabeled(250.0, vec![]).is_err());
        assert!(matches!(
            Recording::unlabeled(250.0, vec![vec![0.0; 4], vec![0.0; 3]]),
            Err(IafError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Recording::new(250.0, vec![vec![0.0; 4]], vec!["Fz".into(), "Cz".into()]),
            Err(IafError::ShapeMismatch { .. })
        ));
        assert!(Recording::unlabeled(250.0, vec![vec![f64::NAN; 4]]).is_err());
    }
    #[test]
    fn reports_duration() {
        let recording = Recording::unlabeled(250.0, vec![vec![0.0; 500]; 3]).unwrap();
        assert_eq!(recording.num_channels(), 3);
        assert_eq!(recording.samples_per_channel(), 500);
        assert_eq!(recording.duration(), Duration::from_secs(2));
        assert_eq!(recording.channel_labels()[2], "ch2");
    }
}
