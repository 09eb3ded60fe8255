//! HTTP implementation of the [`Backend`] trait.

use std::time::Duration;

use futures::TryStreamExt;
use serde_json::json;

use crate::config::BackendConfig;

use super::types::{ChatReply, FeedbackReport, Prediction, RagResponse, ScoreForm};
use super::{Backend, BackendError};

/// Backend client speaking JSON over HTTP via reqwest.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl HttpBackend {
    /// Create a client for the configured backend.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        // The per-request timeout is applied to the three request/response
        // operations only; a whole-request timeout would sever a long-lived
        // `/rag` stream mid-answer.
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        build_endpoint_url(&self.base_url, path)
    }

    /// POST a JSON body and decode the envelope, regardless of status.
    ///
    /// The backend reports its own failures inside the envelope (`error`
    /// with a 500), and the UI displays them verbatim, so a non-success
    /// status is not a transport error here.
    async fn post_envelope<T, B>(&self, path: &str, body: &B) -> Result<T, BackendError>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        let url = self.endpoint(path);
        tracing::debug!(name: "backend.request", url = %url, "Sending backend request");

        let resp = self
            .http
            .post(&url)
            .timeout(self.request_timeout)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let envelope = resp.json::<T>().await?;
        tracing::debug!(name: "backend.response", url = %url, status = %status, "Backend responded");
        Ok(envelope)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn chat(&self, message: &str) -> Result<ChatReply, BackendError> {
        self.post_envelope("/chat", &json!({ "message": message }))
            .await
    }

    async fn feedback(&self, report: &FeedbackReport) -> Result<ChatReply, BackendError> {
        self.post_envelope("/feedback", report).await
    }

    async fn predict(&self, form: &ScoreForm) -> Result<Prediction, BackendError> {
        self.post_envelope("/metacritic", form).await
    }

    async fn rag(&self, question: &str) -> Result<RagResponse, BackendError> {
        let url = self.endpoint("/rag");
        tracing::debug!(name: "backend.request", url = %url, "Opening rag stream");

        let resp = self
            .http
            .post(&url)
            .json(&json!({ "question": question }))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.bytes_stream().map_err(BackendError::from);

        Ok(RagResponse {
            status,
            body: Box::pin(body),
        })
    }
}

/// Join the configured base URL and an endpoint path.
#[must_use]
fn build_endpoint_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_cleanly() {
        assert_eq!(
            build_endpoint_url("http://localhost:8000", "/chat"),
            "http://localhost:8000/chat"
        );
    }

    #[test]
    fn endpoint_url_drops_trailing_slash() {
        assert_eq!(
            build_endpoint_url("http://localhost:8000/", "/rag"),
            "http://localhost:8000/rag"
        );
        assert_eq!(
            build_endpoint_url("http://localhost:8000/", "metacritic"),
            "http://localhost:8000/metacritic"
        );
    }
}
