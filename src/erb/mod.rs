pub mod axis;
pub mod filterbank;
pub mod scale;

use thiserror::Error;

/// Configuration faults caught before any band geometry is computed.
///
/// The reference numerics would otherwise surface these as NaN bands or a
/// division by zero deep inside the axis construction.
#[derive(Debug, Error, PartialEq)]
pub enum FilterbankError {
    #[error("signal length must be at least 1")]
    EmptySignal,

    #[error("sample rate must be positive, got {0} Hz")]
    NonPositiveSampleRate(f64),

    #[error("band count must be at least 1")]
    NoBands,

    #[error("low limit must be non-negative, got {0} Hz")]
    NegativeLowLimit(f64),

    #[error("low limit {low} Hz must lie below the effective high limit {high} Hz")]
    EmptyFrequencyRange { low: f64, high: f64 },
}
