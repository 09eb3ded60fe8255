//! Client for the external MetaTag backend.
//!
//! The backend is an opaque collaborator reachable at a configured base URL.
//! It exposes four operations: `/chat` and `/feedback` (JSON in, answer
//! envelope out), `/metacritic` (JSON in, prediction envelope out), and
//! `/rag` (JSON in, chunked plain-text body out).
//!
//! The [`Backend`] trait is the seam between handlers and the wire; the
//! [`HttpBackend`] implementation speaks HTTP via reqwest, and tests
//! substitute their own.

mod client;
mod types;

pub use client::HttpBackend;
pub use types::{
    ByteStream, ChatReply, FeedbackReport, Prediction, RagResponse, ScoreForm,
};

use thiserror::Error;

/// Errors surfaced by backend calls.
///
/// Handlers map these to the fixed user-facing error strings; the variant
/// only matters for logging.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never completed or the body could not be decoded.
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The four operations the frontend needs from the backend.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// POST `/chat` with a user message, returning the answer envelope.
    async fn chat(&self, message: &str) -> Result<ChatReply, BackendError>;

    /// POST `/feedback` with the rated exchange, returning a retried answer.
    async fn feedback(&self, report: &FeedbackReport) -> Result<ChatReply, BackendError>;

    /// POST `/metacritic` with the form record, returning the prediction.
    async fn predict(&self, form: &ScoreForm) -> Result<Prediction, BackendError>;

    /// POST `/rag` with a question, returning the response status and the
    /// chunked answer body for incremental consumption.
    async fn rag(&self, question: &str) -> Result<RagResponse, BackendError>;
}
