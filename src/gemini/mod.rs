//! Gemini provider: wire types and HTTP client shared by both flows.

pub mod client;
pub mod types;

pub use client::GeminiClient;
