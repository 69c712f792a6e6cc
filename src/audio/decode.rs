use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// A fully decoded track, downmixed to mono.
pub struct MonoTrack {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoTrack {
    pub fn duration_secs(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode `path` into mono f32 samples.
///
/// Uses the container's default track when it is decodable, otherwise the
/// first decodable one. Corrupt packets are counted and skipped; a file
/// that yields no samples at all is an error.
pub fn decode_file(path: &Path) -> Result<MonoTrack> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Cannot open {}", path.display()))?;

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            MediaSourceStream::new(Box::new(file), Default::default()),
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Unrecognized audio container: {}", path.display()))?;
    let mut reader = probed.format;

    let track = reader
        .default_track()
        .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .or_else(|| {
            reader
                .tracks()
                .iter()
                .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        })
        .ok_or_else(|| anyhow!("{} has no decodable audio track", path.display()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let channels = codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = codec_params
        .sample_rate
        .ok_or_else(|| anyhow!("{} does not declare a sample rate", path.display()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .context("Unsupported audio codec")?;

    let mut samples: Vec<f32> = Vec::with_capacity(codec_params.n_frames.unwrap_or(0) as usize);
    let mut skipped_packets = 0usize;
    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(e.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let mut buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
                buf.copy_interleaved_ref(decoded);
                downmix_into(&mut samples, buf.samples(), channels);
            }
            Err(SymphoniaError::DecodeError(_)) => skipped_packets += 1,
            Err(e) => return Err(e.into()),
        }
    }

    if skipped_packets > 0 {
        log::warn!("Skipped {} undecodable packets", skipped_packets);
    }
    if samples.is_empty() {
        bail!("{} decoded to zero samples", path.display());
    }

    let track = MonoTrack {
        samples,
        sample_rate,
    };
    log::info!(
        "Decoded {}: {:.1}s of mono audio at {} Hz",
        path.display(),
        track.duration_secs(),
        track.sample_rate
    );
    Ok(track)
}

/// Append interleaved samples to `out`, averaging the channels of each frame.
fn downmix_into(out: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels <= 1 {
        out.extend_from_slice(interleaved);
        return;
    }
    out.extend(
        interleaved
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mono_passes_through_unchanged() {
        let mut out = vec![0.25];
        downmix_into(&mut out, &[1.0, -1.0, 0.5], 1);
        assert_eq!(out, vec![0.25, 1.0, -1.0, 0.5]);
    }

    #[test]
    fn stereo_averages_per_frame() {
        let mut out = Vec::new();
        downmix_into(&mut out, &[1.0, 0.0, 0.5, 0.5, -1.0, 1.0], 2);
        assert_eq!(out, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn five_one_averages_all_channels() {
        let mut out = Vec::new();
        downmix_into(&mut out, &[0.6, 0.6, 0.0, 0.0, 0.9, 0.9], 6);
        assert!((out[0] - 0.5).abs() < 1e-6);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn duration_follows_sample_count() {
        let track = MonoTrack {
            samples: vec![0.0; 66150],
            sample_rate: 44100,
        };
        assert!((track.duration_secs() - 1.5).abs() < 1e-6);
    }
}
