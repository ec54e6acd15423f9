//! Shared fixtures: a Gemini stub and a recording audio output.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use wiremock::MockServer;

use bible_trilingual::config::Config;
use bible_trilingual::error::{ReaderError, Result};
use bible_trilingual::speech::{AudioOutput, DecodedAudio};
use bible_trilingual::Reader;

pub const CONTENT_PATH: &str = "/models/gemini-2.5-flash:generateContent";
pub const SPEECH_PATH: &str = "/models/gemini-2.5-flash-preview-tts:generateContent";

/// Captures played audio instead of touching a device.
#[derive(Default)]
pub struct RecordingOutput {
    pub played: Mutex<Vec<DecodedAudio>>,
    pub fail_acquire: AtomicBool,
}

impl RecordingOutput {
    pub fn failing() -> Self {
        let output = Self::default();
        output.fail_acquire.store(true, Ordering::SeqCst);
        output
    }

    pub fn played(&self) -> Vec<DecodedAudio> {
        self.played.lock().unwrap().clone()
    }
}

impl AudioOutput for RecordingOutput {
    fn ensure_ready(&self) -> Result<()> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(ReaderError::Playback("no output device".into()));
        }
        Ok(())
    }

    fn play(&self, audio: DecodedAudio) -> Result<()> {
        self.ensure_ready()?;
        self.played.lock().unwrap().push(audio);
        Ok(())
    }
}

pub fn test_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.provider.base_url = server.uri();
    config.provider.api_key = "test-key".into();
    config.provider.timeout_secs = 5;
    config
}

pub fn test_reader(server: &MockServer, output: Arc<RecordingOutput>) -> Reader {
    Reader::new(&test_config(server), output).unwrap()
}

/// Wrap `text` the way generateContent returns a single text part.
pub fn text_envelope(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

pub fn audio_envelope(base64_pcm: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [{"inlineData": {"mimeType": "audio/L16;codec=pcm;rate=24000", "data": base64_pcm}}]
            },
            "finishReason": "STOP"
        }]
    })
}

pub fn chapter_json(book: &str, chapter: u32, verses: &[u32]) -> Value {
    let verses: Vec<Value> = verses
        .iter()
        .map(|n| {
            json!({
                "verseNumber": n,
                "chinese": format!("經文 {n}"),
                "english": format!("Verse {n}"),
                "japaneseHtml": format!("<ruby>節<rt>せつ</rt></ruby>{n}"),
                "japanesePlain": format!("節{n}")
            })
        })
        .collect();
    json!({
        "bookName": book,
        "bookNameChinese": "約翰福音",
        "bookNameJapanese": "ヨハネによる福音書",
        "chapterNumber": chapter,
        "verses": verses
    })
}
