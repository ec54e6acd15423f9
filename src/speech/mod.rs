//! Verse speech: Gemini TTS → PCM16 decode → rodio playback.
//!
//! Components:
//! - `decode`: base64 / PCM16 LE → normalized f32 channels
//! - `output`: lazily opened audio output behind a trait
//! - `synthesizer`: provider request + decode + fire-and-forget playback

pub mod decode;
pub mod output;
pub mod synthesizer;

pub use decode::DecodedAudio;
pub use output::{AudioOutput, RodioOutput};
pub use synthesizer::{AudioRequest, Language, PlaybackHandle, SpeechSynthesizer};
