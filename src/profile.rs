use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::audio::spectrum::AverageSpectrum;
use crate::erb::filterbank::ErbFilterbank;

/// One exported row: band geometry joined with the spectrum amplitude at
/// the band's nearest bin.
#[derive(Clone, Debug, Serialize)]
pub struct BandRecord {
    pub index: usize,
    pub center_erb: f64,
    pub center_hz: f64,
    pub bandwidth_hz: f64,
    pub bin: usize,
    pub amplitude: f32,
}

#[derive(Debug, Serialize)]
pub struct BandProfile {
    pub sample_rate: u32,
    pub low_limit_hz: f64,
    pub high_limit_hz: f64,
    pub bands: Vec<BandRecord>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => bail!("Unknown export format: {} (expected json or csv)", other),
        }
    }
}

/// Look up each band's amplitude in the averaged spectrum and normalize to
/// the loudest band.
pub fn band_profile(bank: &ErbFilterbank, spectrum: &AverageSpectrum) -> BandProfile {
    let mut bands: Vec<BandRecord> = bank
        .bands()
        .iter()
        .enumerate()
        .map(|(index, band)| {
            let bin = band.nearest_axis_index;
            // the axis carries one more point than the spectrum has bins
            let amplitude = spectrum
                .magnitudes
                .get(bin)
                .copied()
                .unwrap_or_else(|| *spectrum.magnitudes.last().unwrap_or(&0.0));
            BandRecord {
                index,
                center_erb: band.center_erb,
                center_hz: band.center_hz,
                bandwidth_hz: band.bandwidth_hz,
                bin,
                amplitude,
            }
        })
        .collect();

    let peak = bands.iter().map(|b| b.amplitude).fold(0.0f32, f32::max);
    if peak > 0.0 {
        for b in bands.iter_mut() {
            b.amplitude /= peak;
        }
    }

    BandProfile {
        sample_rate: spectrum.sample_rate,
        low_limit_hz: bank.low_limit(),
        high_limit_hz: bank.high_limit(),
        bands,
    }
}

/// Write the profile to `path` in the requested format.
pub fn export(profile: &BandProfile, path: &Path, format: ExportFormat) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);

    match format {
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, profile)
                .context("Failed to serialize band profile")?;
            writer.write_all(b"\n")?;
        }
        ExportFormat::Csv => {
            writeln!(writer, "index,center_erb,center_hz,bandwidth_hz,bin,amplitude")?;
            for b in &profile.bands {
                writeln!(
                    writer,
                    "{},{:.6},{:.6},{:.6},{},{:.6}",
                    b.index, b.center_erb, b.center_hz, b.bandwidth_hz, b.bin, b.amplitude
                )?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
