//! Float waveform to 16-bit PCM WAV conversion.

use std::path::Path;

use crate::artifact::EncodedArtifact;
use crate::error::RenderError;

/// Quantize one sample to signed 16-bit PCM.
///
/// Samples are clipped to [-1.0, 1.0] first, then scaled by 32767
/// and truncated toward zero. The boundaries are exact: 1.0 encodes to
/// 32767 and -1.0 to -32767 (not -32768).
pub(crate) fn quantize_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Write a mono waveform as a 16-bit little-endian PCM WAV at a uniquely
/// named temporary path.
///
/// The buffer is already one-dimensional; a model that produces interleaved
/// multi-channel audio arrives here pre-flattened, which is lossy unless it
/// was mono to begin with.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<EncodedArtifact, RenderError> {
    let tmp = tempfile::Builder::new()
        .prefix("chatterbox-")
        .suffix(".wav")
        .tempfile()?;
    let path = tmp.into_temp_path();

    write_pcm16(&path, samples, sample_rate)?;

    log::info!(
        "encoded {} samples at {} Hz to {}",
        samples.len(),
        sample_rate,
        path.display()
    );
    Ok(EncodedArtifact::new(path, sample_rate))
}

fn write_pcm16(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), RenderError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(quantize_i16(sample))?;
    }
    writer.finalize()?;
    Ok(())
}
