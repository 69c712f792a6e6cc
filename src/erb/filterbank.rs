//! Overlapping auditory bands, evenly spaced on the ERB scale.

use super::axis::FrequencyAxis;
use super::scale::{erb_to_hz, hz_to_erb};
use super::FilterbankError;

/// Inputs to a filterbank construction. `signal_length` is the bin count of
/// the magnitude spectrum the bands will index into.
#[derive(Clone, Debug)]
pub struct FilterbankConfig {
    pub signal_length: usize,
    pub sample_rate: f64,
    pub band_count: usize,
    pub low_limit: f64,
    pub high_limit: f64,
}

/// One auditory channel. Its edges sit two cutoff steps apart, so each band
/// overlaps half of each neighbor.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub center_erb: f64,
    pub center_hz: f64,
    pub bandwidth_hz: f64,
    pub nearest_axis_index: usize,
}

/// The complete band geometry for one configuration, produced in one shot.
#[derive(Clone, Debug, PartialEq)]
pub struct ErbFilterbank {
    axis: FrequencyAxis,
    cutoffs: Vec<f64>,
    bands: Vec<Band>,
    low_limit: f64,
    high_limit: f64,
}

impl ErbFilterbank {
    /// Compute the band geometry for `config`.
    ///
    /// A high limit above Nyquist is clamped to the axis maximum; the
    /// effective value is readable via [`high_limit`](Self::high_limit).
    /// Everything else that would poison the arithmetic is rejected up
    /// front.
    pub fn build(config: &FilterbankConfig) -> Result<Self, FilterbankError> {
        let (axis, high_limit) =
            FrequencyAxis::build(config.signal_length, config.sample_rate, config.high_limit)?;

        if config.band_count < 1 {
            return Err(FilterbankError::NoBands);
        }
        if config.low_limit < 0.0 {
            return Err(FilterbankError::NegativeLowLimit(config.low_limit));
        }
        if config.low_limit >= high_limit {
            return Err(FilterbankError::EmptyFrequencyRange {
                low: config.low_limit,
                high: high_limit,
            });
        }

        let cutoffs = erb_spaced_cutoffs(config.low_limit, high_limit, config.band_count);

        let mut bands = Vec::with_capacity(config.band_count);
        for i in 0..config.band_count {
            let lower = cutoffs[i];
            let upper = cutoffs[i + 2];
            let center_erb = (hz_to_erb(lower) + hz_to_erb(upper)) / 2.0;
            let center_hz = erb_to_hz(center_erb);
            bands.push(Band {
                center_erb,
                center_hz,
                bandwidth_hz: upper - lower,
                nearest_axis_index: axis.nearest_index(center_hz),
            });
        }

        Ok(ErbFilterbank {
            axis,
            cutoffs,
            bands,
            low_limit: config.low_limit,
            high_limit,
        })
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    /// Band edges in Hz, `band_count + 2` of them. Band `i` spans
    /// `cutoffs[i]..cutoffs[i + 2]`.
    pub fn cutoffs(&self) -> &[f64] {
        &self.cutoffs
    }

    pub fn axis(&self) -> &FrequencyAxis {
        &self.axis
    }

    pub fn low_limit(&self) -> f64 {
        self.low_limit
    }

    /// Effective high limit after Nyquist clamping.
    pub fn high_limit(&self) -> f64 {
        self.high_limit
    }
}

/// `band_count + 2` edges evenly spaced on the ERB scale between the two
/// limits inclusive, converted back to Hz.
fn erb_spaced_cutoffs(low_hz: f64, high_hz: f64, band_count: usize) -> Vec<f64> {
    let erb_low = hz_to_erb(low_hz);
    let erb_high = hz_to_erb(high_hz);
    let steps = band_count + 1;
    (0..=steps)
        .map(|i| erb_low + (erb_high - erb_low) * i as f64 / steps as f64)
        .map(erb_to_hz)
        .collect()
}
