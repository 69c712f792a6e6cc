use serde::Deserialize;
use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spectrum: SpectrumConfig,
    #[serde(default)]
    pub filterbank: FilterbankConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct SpectrumConfig {
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default)]
    pub hop: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct FilterbankConfig {
    #[serde(default = "default_bands")]
    pub bands: usize,
    #[serde(default = "default_low_limit")]
    pub low_limit: f64,
    #[serde(default)]
    pub high_limit: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for SpectrumConfig {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            hop: None,
        }
    }
}

impl Default for FilterbankConfig {
    fn default() -> Self {
        Self {
            bands: default_bands(),
            low_limit: default_low_limit(),
            high_limit: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_fft_size() -> usize { 32768 }
fn default_bands() -> usize { 50 }
fn default_low_limit() -> f64 { 20.0 }
fn default_format() -> String { "json".into() }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Fold config values into the CLI. A config value applies only when the
/// corresponding flag is still at its clap default, so anything given
/// explicitly on the command line wins.
pub fn merge_into_cli(cli: &mut Cli, cfg: Config) {
    if cli.bands == 50 { cli.bands = cfg.filterbank.bands; }
    if cli.low_limit == 20.0 { cli.low_limit = cfg.filterbank.low_limit; }
    if cli.high_limit.is_none() { cli.high_limit = cfg.filterbank.high_limit; }
    if cli.fft_size == 32768 { cli.fft_size = cfg.spectrum.fft_size; }
    if cli.hop.is_none() { cli.hop = cfg.spectrum.hop; }
    if cli.format == "json" { cli.format = cfg.output.format; }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.spectrum.fft_size, 32768);
        assert_eq!(cfg.filterbank.bands, 50);
        assert_eq!(cfg.filterbank.low_limit, 20.0);
        assert!(cfg.filterbank.high_limit.is_none());
        assert_eq!(cfg.output.format, "json");
    }

    #[test]
    fn explicit_cli_values_beat_config() {
        use clap::Parser;

        let cfg: Config = toml::from_str(
            "[filterbank]\nbands = 30\nlow_limit = 50.0\nhigh_limit = 16000.0\n\n\
             [spectrum]\nfft_size = 4096\n\n[output]\nformat = \"csv\"\n",
        )
        .unwrap();
        let mut cli = Cli::parse_from(["erbscope", "in.wav", "--bands", "64", "--fft-size", "8192"]);
        merge_into_cli(&mut cli, cfg);

        // given on the command line: untouched
        assert_eq!(cli.bands, 64);
        assert_eq!(cli.fft_size, 8192);
        // left at their defaults: config fills them in
        assert_eq!(cli.low_limit, 50.0);
        assert_eq!(cli.high_limit, Some(16000.0));
        assert_eq!(cli.format, "csv");
    }

    #[test]
    fn defaults_survive_an_empty_config() {
        use clap::Parser;

        let cfg: Config = toml::from_str("").unwrap();
        let mut cli = Cli::parse_from(["erbscope", "in.wav"]);
        merge_into_cli(&mut cli, cfg);

        assert_eq!(cli.bands, 50);
        assert_eq!(cli.low_limit, 20.0);
        assert_eq!(cli.high_limit, None);
        assert_eq!(cli.fft_size, 32768);
        assert_eq!(cli.hop, None);
        assert_eq!(cli.format, "json");
    }

    #[test]
    fn partial_sections_fill_in() {
        let cfg: Config = toml::from_str(
            "[filterbank]\nbands = 40\nhigh_limit = 16000.0\n\n[output]\nformat = \"csv\"\n",
        )
        .unwrap();
        assert_eq!(cfg.filterbank.bands, 40);
        assert_eq!(cfg.filterbank.high_limit, Some(16000.0));
        assert_eq!(cfg.filterbank.low_limit, 20.0);
        assert_eq!(cfg.spectrum.fft_size, 32768);
        assert_eq!(cfg.output.format, "csv");
    }
}
