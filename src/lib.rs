//! bible-trilingual-rs: Chinese / English / Japanese (furigana) Bible chapters
//! and verse speech, fetched on demand from Gemini.

pub mod api;
pub mod canon;
pub mod config;
pub mod content;
pub mod error;
pub mod gemini;
pub mod navigation;
pub mod speech;

use std::sync::Arc;

pub use canon::ChapterRequest;
pub use config::Config;
pub use content::{ChapterDocument, ContentFetcher, VerseRecord};
pub use error::{ReaderError, Result};
pub use speech::{AudioOutput, Language, SpeechSynthesizer};

/// Both flows wired to one provider client. Owned by the entry point; the
/// audio output is passed in so tests can substitute it.
#[derive(Clone)]
pub struct Reader {
    pub content: ContentFetcher,
    pub speech: SpeechSynthesizer,
}

impl Reader {
    pub fn new(config: &Config, output: Arc<dyn AudioOutput>) -> Result<Self> {
        let client = gemini::GeminiClient::new(&config.provider)?;
        let content = ContentFetcher::new(
            client.clone(),
            &config.provider.content_model,
            config.provider.temperature,
        );
        let speech = SpeechSynthesizer::new(client, &config.provider, config.audio.clone(), output);
        Ok(Self { content, speech })
    }
}
