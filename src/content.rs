//! Chapter fetch: prompt + strict JSON schema → typed chapter document.
//!
//! One provider call per fetch. No caching, no retry, no normalization:
//! the parsed document is returned as the provider produced it.

use std::time::Instant;

use scraper::{node::Node, Html};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::canon::ChapterRequest;
use crate::error::{ReaderError, Result};
use crate::gemini::types::{Content, GenerateContentRequest, GenerationConfig};
use crate::gemini::GeminiClient;

const CHAPTER_PROMPT: &str = r#"Retrieve the full text of the Bible book "{book}", Chapter {chapter}.

1. Provide the Book Name in English, Chinese (Traditional), and Japanese.
2. Return the content in three languages simultaneously for each verse:
   - Chinese (Traditional Union Version / CUV).
   - English (NIV or KJV).
   - Japanese (Colloquial Japanese or New Japanese Bible).

CRITICAL REQUIREMENT FOR JAPANESE:
- field 'japaneseHtml': You MUST format the Japanese text using HTML <ruby> tags for Kanji readings (Furigana). Example: <ruby>初<rt>はじめ</rt></ruby>めに...
- field 'japanesePlain': Provide the same text WITHOUT ruby tags (clean text) for text-to-speech purposes.

Structure the response as a JSON object."#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseRecord {
    pub verse_number: u32,
    pub chinese: String,
    pub english: String,
    pub japanese_html: String,
    pub japanese_plain: String,
}

impl VerseRecord {
    /// Whether `japanese_plain` reads like the text content of `japanese_html`.
    /// Whitespace is ignored on both sides.
    pub fn plain_is_plausible(&self) -> bool {
        let stripped: String = strip_ruby(&self.japanese_html)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let plain: String = self
            .japanese_plain
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        stripped == plain
    }
}

/// Verses are kept in the order received; ordering, uniqueness and gaps
/// are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDocument {
    pub book_name: String,
    pub book_name_chinese: String,
    pub book_name_japanese: String,
    pub chapter_number: u32,
    pub verses: Vec<VerseRecord>,
}

/// Text content of a verse fragment with furigana readings (`<rt>`, `<rp>`)
/// left out. Entities are decoded; unclosed tags close at their parent.
pub fn strip_ruby(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text: String = fragment
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some((node, text)),
            _ => None,
        })
        .filter(|(node, _)| {
            !node.ancestors().any(|a| {
                matches!(a.value(), Node::Element(e) if e.name() == "rt" || e.name() == "rp")
            })
        })
        .map(|(_, text)| &*text.text)
        .collect();
    text
}

pub fn chapter_prompt(request: &ChapterRequest) -> String {
    CHAPTER_PROMPT
        .replace("{book}", request.book_name())
        .replace("{chapter}", &request.chapter().to_string())
}

/// Output schema in the provider's OpenAPI subset.
pub fn chapter_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "bookName": { "type": "STRING", "description": "Book name in English" },
            "bookNameChinese": { "type": "STRING", "description": "Book name in Chinese" },
            "bookNameJapanese": { "type": "STRING", "description": "Book name in Japanese" },
            "chapterNumber": { "type": "INTEGER" },
            "verses": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "verseNumber": { "type": "INTEGER" },
                        "chinese": { "type": "STRING", "description": "Chinese text" },
                        "english": { "type": "STRING", "description": "English text" },
                        "japaneseHtml": { "type": "STRING", "description": "Japanese text with <ruby> tags" },
                        "japanesePlain": { "type": "STRING", "description": "Japanese text without tags for TTS" }
                    },
                    "required": ["verseNumber", "chinese", "english", "japaneseHtml", "japanesePlain"]
                }
            }
        },
        "required": ["bookName", "bookNameChinese", "bookNameJapanese", "chapterNumber", "verses"]
    })
}

/// Parse the provider's text payload. Empty text and parse failures map to
/// distinct errors; a partially valid document is never returned.
pub fn parse_chapter(text: Option<&str>) -> Result<ChapterDocument> {
    let text = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => return Err(ReaderError::EmptyResponse),
    };
    serde_json::from_str(text).map_err(|e| ReaderError::MalformedResponse(e.to_string()))
}

#[derive(Clone)]
pub struct ContentFetcher {
    client: GeminiClient,
    model: String,
    temperature: f32,
}

impl ContentFetcher {
    pub fn new(client: GeminiClient, model: &str, temperature: f32) -> Self {
        Self {
            client,
            model: model.to_string(),
            temperature,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Validate `book`/`chapter` against the canon, then fetch.
    pub async fn fetch(&self, book: &str, chapter: u32) -> Result<ChapterDocument> {
        let request = ChapterRequest::new(book, chapter)?;
        self.fetch_chapter(&request).await
    }

    pub fn build_request(&self, request: &ChapterRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user_text(chapter_prompt(request))],
            generation_config: Some(GenerationConfig {
                temperature: Some(self.temperature),
                response_mime_type: Some("application/json".into()),
                response_schema: Some(chapter_schema()),
                ..GenerationConfig::default()
            }),
        }
    }

    pub async fn fetch_chapter(&self, request: &ChapterRequest) -> Result<ChapterDocument> {
        let t_start = Instant::now();
        info!("Fetching {request} from {}", self.model);

        let response = self
            .client
            .generate_content(&self.model, &self.build_request(request))
            .await
            .inspect_err(|e| warn!("Error fetching {request}: {e}"))?;

        let text = response.text();
        if text.is_none() {
            warn!(
                "No text in response for {request} (finish reason: {})",
                response.finish_reason().unwrap_or("none")
            );
        }
        let document = parse_chapter(text.as_deref())
            .inspect_err(|e| warn!("Error fetching {request}: {e}"))?;

        if document.chapter_number != request.chapter() {
            warn!(
                "Requested {request} but provider returned chapter {}",
                document.chapter_number
            );
        }
        for verse in &document.verses {
            if !verse.plain_is_plausible() {
                warn!(
                    "{request}:{} japanesePlain does not match japaneseHtml text",
                    verse.verse_number
                );
            }
        }

        info!(
            "Fetched {request}: {} verses ({:.0}ms)",
            document.verses.len(),
            t_start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_ruby() {
        assert_eq!(
            strip_ruby("<ruby>初<rt>はじめ</rt></ruby>めに<ruby>言<rp>(</rp><rt>ことば</rt><rp>)</rp></ruby>があった。"),
            "初めに言があった。"
        );
        assert_eq!(strip_ruby("plain text"), "plain text");
        assert_eq!(strip_ruby("<RUBY>神<RT>かみ</RT></RUBY>"), "神");
        assert_eq!(strip_ruby("a <b>bold</b> word"), "a bold word");
    }

    #[test]
    fn test_strip_ruby_decodes_entities() {
        assert_eq!(
            strip_ruby("<ruby>神<rt>かみ</rt></ruby>&amp;<ruby>人<rt>ひと</rt></ruby>"),
            "神&人"
        );
    }

    #[test]
    fn test_strip_ruby_quoted_attribute() {
        assert_eq!(strip_ruby("<ruby data-x=\"a>b\">神<rt>かみ</rt></ruby>"), "神");
    }

    #[test]
    fn test_strip_ruby_unclosed_reading_keeps_rest_of_verse() {
        assert_eq!(strip_ruby("<ruby>神<rt>かみ</ruby>は愛なり"), "神は愛なり");

        let verse = VerseRecord {
            verse_number: 8,
            chinese: "神就是愛".into(),
            english: "God is love".into(),
            japanese_html: "<ruby>神<rt>かみ</ruby>は<ruby>愛<rt>あい</rt></ruby>なり".into(),
            japanese_plain: "神は愛なり".into(),
        };
        assert!(verse.plain_is_plausible());
    }

    #[test]
    fn test_plain_plausibility() {
        let mut verse = VerseRecord {
            verse_number: 1,
            chinese: "太初有道".into(),
            english: "In the beginning was the Word".into(),
            japanese_html: "<ruby>初<rt>はじ</rt></ruby>めに <ruby>言<rt>ことば</rt></ruby>があった。".into(),
            japanese_plain: "初めに言があった。".into(),
        };
        assert!(verse.plain_is_plausible());
        verse.japanese_plain = "はじめにことばがあった。".into();
        assert!(!verse.plain_is_plausible());
    }

    #[test]
    fn test_prompt_names_book_and_chapter() {
        let request = ChapterRequest::new("john", 3).unwrap();
        let prompt = chapter_prompt(&request);
        assert!(prompt.contains("\"John\", Chapter 3."));
        assert!(prompt.contains("japaneseHtml"));
        assert!(prompt.contains("japanesePlain"));
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = chapter_schema();
        assert_eq!(
            schema["required"],
            json!(["bookName", "bookNameChinese", "bookNameJapanese", "chapterNumber", "verses"])
        );
        assert_eq!(schema["properties"]["verses"]["items"]["required"][4], "japanesePlain");
    }

    #[test]
    fn test_parse_chapter_exact_fields() {
        let text = r#"{
            "bookName": "John",
            "bookNameChinese": "約翰福音",
            "bookNameJapanese": "ヨハネによる福音書",
            "chapterNumber": 1,
            "verses": [
                {"verseNumber": 2, "chinese": "b", "english": "B", "japaneseHtml": "<ruby>二<rt>に</rt></ruby>", "japanesePlain": "二"},
                {"verseNumber": 1, "chinese": "a", "english": "A", "japaneseHtml": "一", "japanesePlain": "一"}
            ]
        }"#;
        let doc = parse_chapter(Some(text)).unwrap();
        assert_eq!(doc.book_name_chinese, "約翰福音");
        assert_eq!(doc.verses.len(), 2);
        // Order as received.
        assert_eq!(doc.verses[0].verse_number, 2);
        assert_eq!(doc.verses[0].japanese_html, "<ruby>二<rt>に</rt></ruby>");
    }

    #[test]
    fn test_parse_chapter_errors() {
        assert!(matches!(parse_chapter(None), Err(ReaderError::EmptyResponse)));
        assert!(matches!(parse_chapter(Some("  ")), Err(ReaderError::EmptyResponse)));
        assert!(matches!(
            parse_chapter(Some("not json")),
            Err(ReaderError::MalformedResponse(_))
        ));
        let missing_verses = r#"{"bookName":"John","bookNameChinese":"約翰福音","bookNameJapanese":"ヨハネ","chapterNumber":1}"#;
        assert!(matches!(
            parse_chapter(Some(missing_verses)),
            Err(ReaderError::MalformedResponse(_))
        ));
        let wrong_type = r#"{"bookName":"John","bookNameChinese":"x","bookNameJapanese":"y","chapterNumber":"one","verses":[]}"#;
        assert!(matches!(
            parse_chapter(Some(wrong_type)),
            Err(ReaderError::MalformedResponse(_))
        ));
    }
}
