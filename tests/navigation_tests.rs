//! Newest-navigation-wins behaviour with out-of-order provider latency.

mod common;

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bible_trilingual::navigation::ChapterNavigator;
use bible_trilingual::{ChapterRequest, ReaderError};
use common::*;

async fn mount_chapter(server: &MockServer, book: &str, delay: Duration) {
    Mock::given(method("POST"))
        .and(path(CONTENT_PATH))
        .and(body_string_contains(format!("\\\"{book}\\\", Chapter 1.")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_envelope(&chapter_json(book, 1, &[1, 2]).to_string()))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_slow_older_navigation_is_cancelled() {
    let server = MockServer::start().await;
    mount_chapter(&server, "Genesis", Duration::from_millis(500)).await;
    mount_chapter(&server, "Exodus", Duration::ZERO).await;

    let reader = test_reader(&server, Arc::new(RecordingOutput::default()));
    let navigator = Arc::new(ChapterNavigator::new(reader.content));

    let slow = {
        let navigator = navigator.clone();
        tokio::spawn(async move {
            let request = ChapterRequest::new("Genesis", 1).unwrap();
            navigator.navigate(&request).await
        })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let request = ChapterRequest::new("Exodus", 1).unwrap();
    let newest = navigator.navigate(&request).await.unwrap();
    assert_eq!(newest.map(|d| d.book_name).as_deref(), Some("Exodus"));

    let stale = slow.await.unwrap();
    assert!(matches!(stale, Err(ReaderError::Cancelled)));
    assert_eq!(navigator.current(), 2);
}

#[tokio::test]
async fn test_single_navigation_returns_document() {
    let server = MockServer::start().await;
    mount_chapter(&server, "Ruth", Duration::ZERO).await;

    let reader = test_reader(&server, Arc::new(RecordingOutput::default()));
    let navigator = ChapterNavigator::new(reader.content);
    let request = ChapterRequest::new("Ruth", 1).unwrap();

    let document = navigator.navigate(&request).await.unwrap().unwrap();
    assert_eq!(document.verses.len(), 2);
    assert_eq!(navigator.current(), 1);
}

#[tokio::test]
async fn test_provider_error_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let reader = test_reader(&server, Arc::new(RecordingOutput::default()));
    let navigator = ChapterNavigator::new(reader.content);
    let request = ChapterRequest::new("Ruth", 1).unwrap();

    assert!(matches!(
        navigator.navigate(&request).await,
        Err(ReaderError::Transport(_))
    ));
}
