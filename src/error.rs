//! Error taxonomy shared by the content and speech flows.

/// Everything that can go wrong between a reader request and its result.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// Network, DNS, timeout, or a non-success status from the provider.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The provider answered but carried no text.
    #[error("Empty response from provider")]
    EmptyResponse,

    /// JSON parse failure or schema mismatch.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The speech endpoint answered without an inline audio part.
    #[error("No audio data received")]
    NoAudioData,

    #[error("Invalid base64 audio payload: {0}")]
    InvalidEncoding(String),

    #[error("Invalid audio length: {len} bytes is not a multiple of {frame_bytes}")]
    InvalidAudioLength { len: usize, frame_bytes: usize },

    /// Audio output could not be acquired or started.
    #[error("Playback error: {0}")]
    Playback(String),

    /// A newer navigation superseded this request.
    #[error("Request cancelled")]
    Cancelled,

    /// Caller-side input rejected before any network call.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Local file output (WAV export).
    #[error("I/O error: {0}")]
    Io(String),
}

impl ReaderError {
    /// True for failures that originate at the provider boundary.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::EmptyResponse
                | Self::MalformedResponse(_)
                | Self::NoAudioData
        )
    }
}

impl From<reqwest::Error> for ReaderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Transport(format!("cannot connect to provider: {e}"))
        } else if e.is_decode() {
            Self::MalformedResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, ReaderError>;
