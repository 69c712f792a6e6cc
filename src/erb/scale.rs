//! ERB-rate scale conversion (Glasberg & Moore 1990).

/// Scale factor of the ERB-rate curve.
const ERB_SCALE: f64 = 21.4;
/// Frequency coefficient, 4.37 / 1000 with the frequency taken in Hz.
const ERB_COEFF: f64 = 0.00437;

/// Convert a frequency in Hz to its ERB number.
///
/// `hz_to_erb(0.0)` is 0; the curve is strictly increasing.
pub fn hz_to_erb(freq_hz: f64) -> f64 {
    ERB_SCALE * (1.0 + ERB_COEFF * freq_hz).log10()
}

/// Convert an ERB number back to Hz. Inverse of [`hz_to_erb`].
pub fn erb_to_hz(n_erb: f64) -> f64 {
    (10f64.powf(n_erb / ERB_SCALE) - 1.0) / ERB_COEFF
}
