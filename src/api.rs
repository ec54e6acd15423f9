//! HTTP API consumed by a reader front end.
//!
//! Endpoints:
//! - `GET  /status`
//! - `GET  /books?testament=old|new`
//! - `GET  /chapter/{book}/{chapter}`
//! - `POST /speak` `{text, language}`
//!
//! The API serves a single reader session. All clients share one
//! `ChapterNavigator`, so a `/chapter` request supersedes any chapter fetch
//! still in flight, and the superseded request answers 409.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{info, warn};

use crate::canon::{self, Book, ChapterRequest, Testament};
use crate::content::ChapterDocument;
use crate::error::ReaderError;
use crate::navigation::ChapterNavigator;
use crate::speech::{AudioRequest, Language, SpeechSynthesizer};

#[derive(Clone)]
pub struct ReaderApiState {
    pub navigator: Arc<ChapterNavigator>,
    pub speech: Arc<SpeechSynthesizer>,
    /// At most one synthesis in flight.
    pub speak_lock: Arc<AsyncMutex<()>>,
}

impl ReaderApiState {
    pub fn new(navigator: ChapterNavigator, speech: SpeechSynthesizer) -> Self {
        Self {
            navigator: Arc::new(navigator),
            speech: Arc::new(speech),
            speak_lock: Arc::new(AsyncMutex::new(())),
        }
    }
}

// --- Request/Response types ---

#[derive(Deserialize)]
struct BooksQuery {
    testament: Option<String>,
}

#[derive(Deserialize)]
struct SpeakRequest {
    text: String,
    language: Language,
}

#[derive(Serialize)]
struct StatusResponse {
    speaking: bool,
    content_model: String,
    speech_model: String,
    voice: String,
}

#[derive(Serialize)]
struct SpeakResponse {
    status: String,
    frames: usize,
    duration_ms: u64,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    error: String,
}

/// Error body with a status code picked from the error kind.
pub struct ApiError(StatusCode, String);

impl ApiError {
    fn busy() -> Self {
        Self(StatusCode::CONFLICT, "busy".into())
    }
}

impl From<ReaderError> for ApiError {
    fn from(e: ReaderError) -> Self {
        let status = match &e {
            ReaderError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ReaderError::Cancelled => StatusCode::CONFLICT,
            e if e.is_provider_error() => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".into(),
            error: self.1,
        };
        (self.0, Json(body)).into_response()
    }
}

/// Build the axum router.
pub fn router(state: ReaderApiState) -> Router {
    Router::new()
        .route("/status", get(handle_status))
        .route("/books", get(handle_books))
        .route("/chapter/{book}/{chapter}", get(handle_chapter))
        .route("/speak", post(handle_speak))
        .with_state(state)
}

/// Start the API server as a background tokio task.
pub async fn start_reader_api(
    state: ReaderApiState,
    port: u16,
) -> std::io::Result<tokio::task::JoinHandle<()>> {
    let app = router(state);
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Reader API listening on {addr}");

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warn!("Reader API server error: {e}");
        }
    }))
}

// --- Handlers ---

async fn handle_status(State(state): State<ReaderApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        speaking: state.speak_lock.try_lock().is_err(),
        content_model: state.navigator.fetcher().model().to_string(),
        speech_model: state.speech.model().to_string(),
        voice: state.speech.voice().to_string(),
    })
}

async fn handle_books(Query(query): Query<BooksQuery>) -> Result<Json<Vec<Book>>, ApiError> {
    let testament = query
        .testament
        .as_deref()
        .map(str::parse::<Testament>)
        .transpose()?;
    Ok(Json(canon::books(testament).copied().collect()))
}

async fn handle_chapter(
    State(state): State<ReaderApiState>,
    Path((book, chapter)): Path<(String, u32)>,
) -> Result<Json<ChapterDocument>, ApiError> {
    let request = ChapterRequest::new(&book, chapter)?;
    match state.navigator.navigate(&request).await? {
        Some(document) => Ok(Json(document)),
        None => Err(ReaderError::Cancelled.into()),
    }
}

async fn handle_speak(
    State(state): State<ReaderApiState>,
    Json(req): Json<SpeakRequest>,
) -> Result<Json<SpeakResponse>, ApiError> {
    let request = AudioRequest::new(req.text, req.language)?;

    let Ok(_guard) = state.speak_lock.try_lock() else {
        info!("HTTP /speak rejected: synthesis already in flight");
        return Err(ApiError::busy());
    };

    let preview: String = request.text().chars().take(40).collect();
    info!(
        "HTTP /speak [{}]: \"{}{}\"",
        request.language(),
        preview.replace('\n', " "),
        if request.text().chars().count() > 40 { "..." } else { "" },
    );

    let handle = state.speech.synthesize(&request).await?;
    Ok(Json(SpeakResponse {
        status: "playing".into(),
        frames: handle.frames,
        duration_ms: handle.duration.as_millis() as u64,
    }))
}
