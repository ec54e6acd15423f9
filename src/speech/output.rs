//! Audio output: a process-wide device handle acquired lazily on first use.

use std::sync::Mutex;

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use super::decode::DecodedAudio;
use crate::error::{ReaderError, Result};

/// Where decoded speech goes. Playback is fire-and-forget: `play` returns
/// once audio has been handed to the device, not when it finishes.
pub trait AudioOutput: Send + Sync {
    /// Acquire the underlying device if not yet open. Idempotent.
    fn ensure_ready(&self) -> Result<()>;

    fn play(&self, audio: DecodedAudio) -> Result<()>;
}

/// rodio-backed output. The stream is opened once and kept for the process
/// lifetime; a failed open is retried on the next call.
#[derive(Default)]
pub struct RodioOutput {
    // In rodio 0.21, OutputStream is the handle; dropping it stops all sinks.
    stream: Mutex<Option<OutputStream>>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioOutput for RodioOutput {
    fn ensure_ready(&self) -> Result<()> {
        let mut guard = self
            .stream
            .lock()
            .map_err(|_| ReaderError::Playback("audio output lock poisoned".into()))?;
        if guard.is_none() {
            let stream = OutputStreamBuilder::open_default_stream().map_err(|e| {
                warn!("Failed to open audio output: {e}");
                ReaderError::Playback(format!("Failed to open audio output: {e}"))
            })?;
            info!("Audio output opened");
            *guard = Some(stream);
        }
        Ok(())
    }

    fn play(&self, audio: DecodedAudio) -> Result<()> {
        self.ensure_ready()?;
        let guard = self
            .stream
            .lock()
            .map_err(|_| ReaderError::Playback("audio output lock poisoned".into()))?;
        let stream = guard
            .as_ref()
            .ok_or_else(|| ReaderError::Playback("audio output not open".into()))?;

        let frames = audio.frame_count();
        let source =
            SamplesBuffer::new(audio.channel_count(), audio.sample_rate, audio.interleaved());
        let sink = Sink::connect_new(stream.mixer());
        sink.append(source);
        // No stop handle is kept; the sink plays out on its own.
        sink.detach();

        debug!("Playback started: {frames} frames @ {}Hz", audio.sample_rate);
        Ok(())
    }
}
