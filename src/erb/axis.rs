//! Linear frequency axis underlying the filterbank.

use super::FilterbankError;

/// Evenly spaced frequency axis from 0 Hz to the signal's maximum
/// representable frequency. One point per spectral magnitude bin.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyAxis {
    points: Vec<f64>,
    point_count: usize,
    max_frequency: f64,
}

impl FrequencyAxis {
    /// Build the axis for a spectrum of `signal_length` bins at `sample_rate`.
    ///
    /// Returns the axis together with the effective high limit: a
    /// `requested_high_limit` above Nyquist is clamped to the axis maximum,
    /// never rejected. Callers that need to know whether clamping happened
    /// compare the returned limit against what they asked for.
    pub fn build(
        signal_length: usize,
        sample_rate: f64,
        requested_high_limit: f64,
    ) -> Result<(Self, f64), FilterbankError> {
        if signal_length < 1 {
            return Err(FilterbankError::EmptySignal);
        }
        if sample_rate <= 0.0 {
            return Err(FilterbankError::NonPositiveSampleRate(sample_rate));
        }

        let (point_count, max_frequency) = if signal_length % 2 == 0 {
            (signal_length, sample_rate / 2.0)
        } else {
            (
                signal_length - 1,
                sample_rate * (signal_length - 1) as f64 / (2.0 * signal_length as f64),
            )
        };

        // signal_length == 1 degenerates to a single point at 0 Hz
        let points = if point_count == 0 {
            vec![0.0]
        } else {
            (0..=point_count)
                .map(|i| max_frequency * i as f64 / point_count as f64)
                .collect()
        };

        let high_limit = if requested_high_limit > sample_rate / 2.0 {
            max_frequency
        } else {
            requested_high_limit
        };

        let axis = FrequencyAxis {
            points,
            point_count,
            max_frequency,
        };
        Ok((axis, high_limit))
    }

    /// Index of the axis point closest to `target_hz`.
    ///
    /// Ties resolve to the lowest index (first-minimum scan).
    pub fn nearest_index(&self, target_hz: f64) -> usize {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (i, &p) in self.points.iter().enumerate() {
            let dist = (p - target_hz).abs();
            if dist < best_dist {
                best = i;
                best_dist = dist;
            }
        }
        best
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    /// Number of spectral bins the axis spans; the axis holds one more point.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    pub fn max_frequency(&self) -> f64 {
        self.max_frequency
    }

    pub fn spacing(&self) -> f64 {
        self.max_frequency / self.point_count as f64
    }
}
