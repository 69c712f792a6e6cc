use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rustfft::{num_complex::Complex, FftPlanner};

/// STFT parameters. Window length equals the FFT size.
#[derive(Clone, Copy, Debug)]
pub struct SpectrumParams {
    pub fft_size: usize,
    pub hop_size: usize,
}

impl SpectrumParams {
    /// Default hop: 1/64 of the FFT size, matching a dense analysis grid.
    pub fn with_default_hop(fft_size: usize) -> Self {
        Self {
            fft_size,
            hop_size: (fft_size / 64).max(1),
        }
    }
}

/// Time-averaged magnitude spectrum, peak-normalized to 1.0.
/// `magnitudes.len()` is `fft_size / 2 + 1`.
pub struct AverageSpectrum {
    pub magnitudes: Vec<f32>,
    pub sample_rate: u32,
}

impl AverageSpectrum {
    /// Bin count — the `signal_length` the filterbank is built over.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

/// Hann-window STFT over the whole track, magnitudes averaged across frames.
///
/// Each frame's magnitudes are normalized by the window sum before
/// averaging; the averaged spectrum is then normalized to its peak.
pub fn average_spectrum(
    samples: &[f32],
    sample_rate: u32,
    params: &SpectrumParams,
) -> Result<AverageSpectrum> {
    // a 2-point Hann window is identically zero, so its sum cannot
    // normalize anything
    if params.fft_size < 4 {
        bail!("FFT size must be at least 4, got {}", params.fft_size);
    }
    if params.hop_size < 1 {
        bail!("Hop size must be at least 1");
    }

    let fft_size = params.fft_size;
    let bins = fft_size / 2 + 1;
    let window = hann_window(fft_size);
    let window_sum: f32 = window.iter().sum();

    // Frame start positions; a track shorter than one window still yields
    // a single zero-padded frame.
    let starts: Vec<usize> = if samples.len() < fft_size {
        vec![0]
    } else {
        (0..=samples.len() - fft_size).step_by(params.hop_size).collect()
    };

    log::info!(
        "STFT: {} frames, fft_size={}, hop={}",
        starts.len(),
        fft_size,
        params.hop_size
    );

    let pb = ProgressBar::new(starts.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let accumulated: Vec<f64> = starts
        .par_iter()
        .map(|&start| {
            // Per-thread FFT planner (rayon-safe)
            let mut planner = FftPlanner::<f32>::new();
            let fft = planner.plan_fft_forward(fft_size);

            let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); fft_size];
            let end = (start + fft_size).min(samples.len());
            for i in 0..(end - start) {
                buffer[i] = Complex::new(samples[start + i] * window[i], 0.0);
            }
            fft.process(&mut buffer);

            let frame: Vec<f64> = buffer[..bins]
                .iter()
                .map(|c| (c.norm() / window_sum) as f64)
                .collect();
            pb.inc(1);
            frame
        })
        .reduce(
            || vec![0.0f64; bins],
            |mut acc, frame| {
                for (a, f) in acc.iter_mut().zip(frame.iter()) {
                    *a += f;
                }
                acc
            },
        );
    pb.finish_and_clear();

    let frame_count = starts.len() as f64;
    let mut magnitudes: Vec<f32> = accumulated
        .iter()
        .map(|&m| (m / frame_count) as f32)
        .collect();

    let peak = magnitudes.iter().copied().fold(0.0f32, f32::max);
    if peak > 0.0 {
        for m in magnitudes.iter_mut() {
            *m /= peak;
        }
    }

    Ok(AverageSpectrum {
        magnitudes,
        sample_rate,
    })
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn bin_count_is_half_fft_plus_one() {
        let samples = sine(440.0, 8192, 1.0);
        let params = SpectrumParams::with_default_hop(2048);
        let spec = average_spectrum(&samples, 8192, &params).unwrap();
        assert_eq!(spec.len(), 1025);
    }

    #[test]
    fn peak_lands_on_the_tone() {
        let sample_rate = 8192;
        let fft_size = 2048;
        // 1000 Hz falls near bin 1000 / (8192 / 2048) = 250
        let samples = sine(1000.0, sample_rate, 2.0);
        let params = SpectrumParams::with_default_hop(fft_size);
        let spec = average_spectrum(&samples, sample_rate, &params).unwrap();

        let peak_bin = spec
            .magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert!(
            (peak_bin as i64 - 250).unsigned_abs() <= 1,
            "peak bin {} not at the tone",
            peak_bin
        );
    }

    #[test]
    fn normalized_to_unit_peak() {
        let samples = sine(500.0, 8192, 1.0);
        let params = SpectrumParams::with_default_hop(1024);
        let spec = average_spectrum(&samples, 8192, &params).unwrap();
        let peak = spec.magnitudes.iter().copied().fold(0.0f32, f32::max);
        assert!((peak - 1.0).abs() < 1e-6);
        assert!(spec.magnitudes.iter().all(|&m| (0.0..=1.0).contains(&m)));
    }

    #[test]
    fn short_input_is_zero_padded() {
        let samples = sine(440.0, 8192, 0.01); // far shorter than one window
        let params = SpectrumParams::with_default_hop(2048);
        let spec = average_spectrum(&samples, 8192, &params).unwrap();
        assert_eq!(spec.len(), 1025);
    }

    #[test]
    fn rejects_degenerate_params() {
        for fft_size in [0, 2, 3] {
            let params = SpectrumParams {
                fft_size,
                hop_size: 1,
            };
            assert!(
                average_spectrum(&[0.0; 16], 8000, &params).is_err(),
                "fft_size {} should be rejected",
                fft_size
            );
        }
        let params = SpectrumParams {
            fft_size: 1024,
            hop_size: 0,
        };
        assert!(average_spectrum(&[0.0; 16], 8000, &params).is_err());
    }

    #[test]
    fn smallest_window_stays_finite() {
        let params = SpectrumParams {
            fft_size: 4,
            hop_size: 1,
        };
        let spec = average_spectrum(&[0.5, -0.5, 0.5, -0.5, 0.5, -0.5], 8000, &params).unwrap();
        assert!(spec.magnitudes.iter().all(|m| m.is_finite()));
    }
}
