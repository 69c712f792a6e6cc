mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use erbscope::audio::{self, spectrum::SpectrumParams};
use erbscope::erb::filterbank::{ErbFilterbank, FilterbankConfig};
use erbscope::profile::{self, ExportFormat};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect erbscope.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("erbscope.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("erbscope").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("erbscope").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            config::merge_into_cli(&mut cli, cfg);
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let input = cli.input.as_ref().context("Input audio file is required")?;
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let format: ExportFormat = cli.format.parse()?;

    if !(10..=100).contains(&cli.bands) {
        log::warn!("{} bands is outside the recommended 10-100 range", cli.bands);
    }
    if !(1000..=32768).contains(&cli.fft_size) {
        log::warn!(
            "FFT size {} is outside the recommended 1000-32768 range",
            cli.fft_size
        );
    }

    log::info!("erbscope - ERB-scale spectrum profiler");
    log::info!("Input: {}", input.display());
    log::info!("Output: {}", cli.output.display());
    log::info!("Bands: {}, FFT size: {}", cli.bands, cli.fft_size);

    // 1. Decode audio
    log::info!("Decoding audio...");
    let track = audio::decode::decode_file(input)?;
    log::info!("Track: {:.1}s @ {}Hz", track.duration_secs(), track.sample_rate);

    // 2. Averaged magnitude spectrum
    log::info!("Computing averaged spectrum...");
    let params = match cli.hop {
        Some(hop) => SpectrumParams {
            fft_size: cli.fft_size,
            hop_size: hop,
        },
        None => SpectrumParams::with_default_hop(cli.fft_size),
    };
    let spectrum = audio::spectrum::average_spectrum(&track.samples, track.sample_rate, &params)?;

    // 3. ERB band geometry over the spectrum's frequency axis
    let nyquist = track.sample_rate as f64 / 2.0;
    let requested_high = cli.high_limit.unwrap_or(nyquist);
    let bank_config = FilterbankConfig {
        signal_length: spectrum.len(),
        sample_rate: track.sample_rate as f64,
        band_count: cli.bands,
        low_limit: cli.low_limit,
        high_limit: requested_high,
    };
    let bank = ErbFilterbank::build(&bank_config)?;
    if bank.high_limit() < requested_high {
        log::warn!(
            "High limit {:.1} Hz is above Nyquist; clamped to {:.1} Hz",
            requested_high,
            bank.high_limit()
        );
    }
    log::info!(
        "Filterbank: {} bands, {:.1}-{:.1} Hz",
        bank.bands().len(),
        bank.low_limit(),
        bank.high_limit()
    );

    // 4. Per-band amplitude profile
    let band_profile = profile::band_profile(&bank, &spectrum);

    if cli.print_bands {
        println!("{:>5} {:>12} {:>12} {:>12} {:>8} {:>10}",
            "band", "center_erb", "center_hz", "bandwidth", "bin", "amplitude");
        for b in &band_profile.bands {
            println!(
                "{:>5} {:>12.3} {:>12.2} {:>12.2} {:>8} {:>10.4}",
                b.index, b.center_erb, b.center_hz, b.bandwidth_hz, b.bin, b.amplitude
            );
        }
    }

    // 5. Export
    profile::export(&band_profile, &cli.output, format)?;
    log::info!("Done! Output: {}", cli.output.display());
    Ok(())
}
