//! Request and response shapes for the backend API.

use std::pin::Pin;

use axum::body::Bytes;
use futures::Stream;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::BackendError;

/// Answer envelope returned by `/chat` and `/feedback`.
///
/// The backend populates exactly one of the fields; both are displayed
/// verbatim, so the distinction only drives which one wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatReply {
    /// Displayed text: `answer`, else `error`, else the caller's fallback.
    #[must_use]
    pub fn into_text(self, fallback: &str) -> String {
        self.answer
            .or(self.error)
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Prediction envelope returned by `/metacritic`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Body of a `/feedback` report: the rated exchange plus the rating.
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackReport {
    pub user_message: String,
    pub bot_message: String,
    pub feedback: String,
}

/// The numeric prediction form record.
///
/// Five numeric-as-text fields plus free text, submitted as one JSON
/// object. The backend parses the numbers; the frontend passes the field
/// values through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreForm {
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub imdb_rating: String,
    #[serde(default)]
    pub imdb_votes: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub opening_weekend: String,
    #[serde(default)]
    pub text: String,
}

/// Chunked bytes of a `/rag` answer body.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, BackendError>> + Send>>;

/// A `/rag` response: the status to check before reading, and the body.
pub struct RagResponse {
    pub status: StatusCode,
    pub body: ByteStream,
}

impl std::fmt::Debug for RagResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagResponse")
            .field("status", &self.status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_prefers_answer_over_error() {
        let reply = ChatReply {
            answer: Some("the answer".into()),
            error: Some("the error".into()),
        };
        assert_eq!(reply.into_text("fallback"), "the answer");
    }

    #[test]
    fn reply_falls_back_to_error_then_default() {
        let reply = ChatReply {
            answer: None,
            error: Some("the error".into()),
        };
        assert_eq!(reply.into_text("fallback"), "the error");

        assert_eq!(ChatReply::default().into_text("fallback"), "fallback");
    }

    #[test]
    fn score_form_serializes_with_original_field_names() {
        let form = ScoreForm {
            year: "2007".into(),
            imdb_rating: "7.7".into(),
            imdb_votes: "340000".into(),
            budget: "55000000".into(),
            opening_weekend: "14035033".into(),
            text: "A small-time rancher agrees to escort a captured outlaw.".into(),
        };
        let json = serde_json::to_value(&form).unwrap();
        assert_eq!(json["imdb_rating"], "7.7");
        assert_eq!(json["opening_weekend"], "14035033");
    }

    #[test]
    fn score_form_tolerates_missing_fields() {
        let form: ScoreForm = serde_json::from_str(r#"{"year":"1999"}"#).unwrap();
        assert_eq!(form.year, "1999");
        assert_eq!(form.text, "");
    }
}
