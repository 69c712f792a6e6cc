use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "erbscope", about = "ERB-scale spectrum profiler for audio files")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Output profile file
    #[arg(short, long, default_value = "profile.json")]
    pub output: PathBuf,

    /// Number of ERB bands (recommended 10-100)
    #[arg(short, long, default_value_t = 50)]
    pub bands: usize,

    /// Centre frequency of the lowest band, in Hz
    #[arg(long, default_value_t = 20.0)]
    pub low_limit: f64,

    /// Centre frequency of the highest band, in Hz. Defaults to Nyquist;
    /// values above Nyquist are clamped, not rejected.
    #[arg(long)]
    pub high_limit: Option<f64>,

    /// FFT size / number of spectral samples (recommended 1000-32768)
    #[arg(long, default_value_t = 32768)]
    pub fft_size: usize,

    /// Hop size in samples; defaults to fft-size / 64
    #[arg(long)]
    pub hop: Option<usize>,

    /// Output format: json or csv
    #[arg(short, long, default_value = "json")]
    pub format: String,

    /// Print the band table to stdout
    #[arg(long)]
    pub print_bands: bool,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
