//! base64 → PCM16 little-endian → normalized f32 channels.
//!
//! Sample rate and channel count come from the producer's contract; nothing
//! is sniffed from the payload.

use std::path::Path;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{ReaderError, Result};

/// De-interleaved samples in [-1.0, 1.0). One inner vector per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn frame_count(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count() as f64 / f64::from(self.sample_rate))
    }

    /// Frame-major samples, the layout audio sinks expect.
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frame_count();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            for channel in &self.channels {
                out.push(channel[i]);
            }
        }
        out
    }

    /// Export as 16-bit PCM WAV.
    pub fn write_wav(&self, path: &Path) -> Result<()> {
        let spec = hound::WavSpec {
            channels: self.channel_count(),
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let wav_err = |e: hound::Error| ReaderError::Io(format!("WAV export failed: {e}"));
        let mut writer = hound::WavWriter::create(path, spec).map_err(wav_err)?;
        for sample in self.interleaved() {
            let s = (sample * 32768.0).clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16;
            writer.write_sample(s).map_err(wav_err)?;
        }
        writer.finalize().map_err(wav_err)
    }
}

/// Standard-alphabet, padded base64 decode.
pub fn decode(payload: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| ReaderError::InvalidEncoding(e.to_string()))
}

/// Interpret `bytes` as interleaved signed 16-bit LE samples.
pub fn to_audio_buffer(bytes: &[u8], sample_rate: u32, channel_count: u16) -> Result<DecodedAudio> {
    if channel_count == 0 {
        return Err(ReaderError::InvalidRequest("channel count must be at least 1".into()));
    }
    let channels = usize::from(channel_count);
    let frame_bytes = 2 * channels;
    if bytes.len() % frame_bytes != 0 {
        return Err(ReaderError::InvalidAudioLength {
            len: bytes.len(),
            frame_bytes,
        });
    }

    let frame_count = bytes.len() / frame_bytes;
    let mut out = vec![Vec::with_capacity(frame_count); channels];
    for frame in bytes.chunks_exact(frame_bytes) {
        for (channel, sample) in frame.chunks_exact(2).enumerate() {
            let value = i16::from_le_bytes([sample[0], sample[1]]);
            out[channel].push(f32::from(value) / 32768.0);
        }
    }

    Ok(DecodedAudio {
        sample_rate,
        channels: out,
    })
}
