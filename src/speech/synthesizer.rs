use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::decode::{decode, to_audio_buffer, DecodedAudio};
use super::output::AudioOutput;
use crate::config::{AudioConfig, ProviderConfig};
use crate::error::{ReaderError, Result};
use crate::gemini::types::{
    Content, GenerateContentRequest, GenerationConfig, Modality, Part, SpeechConfig,
};
use crate::gemini::GeminiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Zh,
    Ja,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Zh => "zh",
            Self::Ja => "ja",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Language {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "en" => Ok(Self::En),
            "zh" => Ok(Self::Zh),
            "ja" => Ok(Self::Ja),
            other => Err(ReaderError::InvalidRequest(format!(
                "unsupported language: {other} (expected en, zh or ja)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioRequest {
    text: String,
    language: Language,
}

impl AudioRequest {
    pub fn new(text: impl Into<String>, language: Language) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ReaderError::InvalidRequest("empty text".into()));
        }
        Ok(Self { text, language })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// What was handed to the audio output. Playback cannot be awaited or
/// stopped through this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackHandle {
    pub frames: usize,
    pub duration: Duration,
}

/// Text → provider speech endpoint → PCM decode → audio output.
#[derive(Clone)]
pub struct SpeechSynthesizer {
    client: GeminiClient,
    model: String,
    voice: String,
    audio: AudioConfig,
    output: Arc<dyn AudioOutput>,
}

impl SpeechSynthesizer {
    pub fn new(
        client: GeminiClient,
        provider: &ProviderConfig,
        audio: AudioConfig,
        output: Arc<dyn AudioOutput>,
    ) -> Self {
        Self {
            client,
            model: provider.speech_model.clone(),
            voice: provider.voice.clone(),
            audio,
            output,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }

    pub fn build_request(&self, request: &AudioRequest) -> GenerateContentRequest {
        // One voice for every language; the model carries the accent.
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(request.text())],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec![Modality::Audio]),
                speech_config: Some(SpeechConfig::prebuilt(&self.voice)),
                ..GenerationConfig::default()
            }),
        }
    }

    /// Request speech and decode it, without playing.
    pub async fn fetch_audio(&self, request: &AudioRequest) -> Result<DecodedAudio> {
        let t_start = Instant::now();
        let response = self
            .client
            .generate_content(&self.model, &self.build_request(request))
            .await?;

        let Some(blob) = response.inline_data() else {
            warn!(
                "No audio in speech response (finish reason: {})",
                response.finish_reason().unwrap_or("none")
            );
            return Err(ReaderError::NoAudioData);
        };
        let bytes = decode(&blob.data)?;
        let audio = to_audio_buffer(&bytes, self.audio.sample_rate, self.audio.channels)?;

        info!(
            "Synthesized [{}] {} chars → {:.1}s audio ({:.0}ms)",
            request.language(),
            request.text().chars().count(),
            audio.duration().as_secs_f64(),
            t_start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(audio)
    }

    /// Synthesize and start playback. Resolves once playback has started.
    pub async fn synthesize(&self, request: &AudioRequest) -> Result<PlaybackHandle> {
        // Acquire the output first so a dead device never costs a provider call.
        self.output.ensure_ready()?;

        let audio = self
            .fetch_audio(request)
            .await
            .inspect_err(|e| warn!("TTS error: {e}"))?;
        let handle = PlaybackHandle {
            frames: audio.frame_count(),
            duration: audio.duration(),
        };
        self.output.play(audio)?;
        Ok(handle)
    }

    pub async fn play_text_to_speech(
        &self,
        text: &str,
        language: Language,
    ) -> Result<PlaybackHandle> {
        let request = AudioRequest::new(text, language)?;
        self.synthesize(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parse() {
        assert_eq!("ja".parse::<Language>().unwrap(), Language::Ja);
        assert_eq!(Language::Zh.to_string(), "zh");
        assert!(matches!(
            "fr".parse::<Language>(),
            Err(ReaderError::InvalidRequest(_))
        ));
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::En);
    }

    #[test]
    fn test_audio_request_rejects_blank_text() {
        assert!(AudioRequest::new("   ", Language::En).is_err());
        let req = AudioRequest::new("Amen", Language::En).unwrap();
        assert_eq!(req.text(), "Amen");
        assert_eq!(req.language(), Language::En);
    }
}
