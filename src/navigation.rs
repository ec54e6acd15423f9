//! Newest-navigation-wins guard around chapter fetches.
//!
//! Every navigation takes a sequence number and cancels the one before it.
//! A result that completes after a newer navigation began is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::canon::ChapterRequest;
use crate::content::{ChapterDocument, ContentFetcher};
use crate::error::{ReaderError, Result};

pub struct ChapterNavigator {
    fetcher: ContentFetcher,
    sequence: AtomicU64,
    current: Mutex<CancellationToken>,
}

impl ChapterNavigator {
    pub fn new(fetcher: ContentFetcher) -> Self {
        Self {
            fetcher,
            sequence: AtomicU64::new(0),
            current: Mutex::new(CancellationToken::new()),
        }
    }

    pub fn fetcher(&self) -> &ContentFetcher {
        &self.fetcher
    }

    /// Latest issued sequence number.
    pub fn current(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn begin(&self) -> (u64, CancellationToken) {
        let token = CancellationToken::new();
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        // Sequence and token swap under one lock so they always agree.
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let previous = std::mem::replace(&mut *current, token.clone());
        previous.cancel();
        (seq, token)
    }

    /// Fetch `request` as the newest navigation.
    ///
    /// Returns `Ok(None)` if a newer navigation started while this one was
    /// in flight, and `Err(Cancelled)` if it was cancelled before completing.
    pub async fn navigate(&self, request: &ChapterRequest) -> Result<Option<ChapterDocument>> {
        let (seq, token) = self.begin();
        debug!("Navigation #{seq}: {request}");

        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ReaderError::Cancelled),
            result = self.fetcher.fetch_chapter(request) => result,
        };

        if self.current() != seq {
            debug!("Navigation #{seq} ({request}) superseded, discarding result");
            return match result {
                Err(ReaderError::Cancelled) => Err(ReaderError::Cancelled),
                _ => Ok(None),
            };
        }
        result.map(Some)
    }
}
