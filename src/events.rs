//! Events pushed to the browser while a retrieval answer streams.
//!
//! The retrieval panel holds one SSE channel open per exchange. Each event
//! carries the *full* replacement text of the current bot turn — the
//! browser swaps, it never appends — so a dropped event costs nothing but
//! latency.
//!
//! # Example
//!
//! ```rust
//! use metatag::events::{UiEvent, sse_event};
//!
//! let event = UiEvent::AnswerUpdate {
//!     text: "The graph stores".to_string(),
//! };
//! let sse = sse_event(&event);
//! assert!(sse.contains("answer.update"));
//! ```

use serde::{Deserialize, Serialize};

/// Events emitted on the retrieval stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum UiEvent {
    /// Full replacement text for the most recent bot turn.
    #[serde(rename = "answer.update")]
    AnswerUpdate {
        /// The accumulated answer so far.
        text: String,
    },

    /// The exchange failed; `message` is the fixed string to display.
    #[serde(rename = "error")]
    StreamError {
        /// Error message.
        message: String,
    },

    /// The stream has ended — success or not — and input is re-enabled.
    #[serde(rename = "done")]
    Done,
}

/// Convert a [`UiEvent`] to an SSE-formatted frame.
///
/// The output follows the Server-Sent Events specification with an
/// `event:` line (for EventSource listeners) and a `data:` line holding
/// the JSON payload.
///
/// # Example
///
/// ```rust
/// use metatag::events::{UiEvent, sse_event};
///
/// let sse = sse_event(&UiEvent::Done);
/// assert!(sse.contains("event: done"));
/// ```
#[must_use]
pub fn sse_event(evt: &UiEvent) -> String {
    let json = serde_json::to_string(evt).unwrap_or_else(|e| {
        serde_json::json!({ "type": "error", "data": { "message": e.to_string() } }).to_string()
    });

    format!("event: {}\ndata: {json}\n\n", event_name(evt))
}

/// Get the SSE event name for a [`UiEvent`].
#[must_use]
pub fn event_name(evt: &UiEvent) -> &'static str {
    match evt {
        UiEvent::AnswerUpdate { .. } => "answer.update",
        UiEvent::StreamError { .. } => "error",
        UiEvent::Done => "done",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_update_serialization() {
        let event = UiEvent::AnswerUpdate {
            text: "Hello".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("answer.update"));
        assert!(json.contains("Hello"));
    }

    #[test]
    fn sse_frame_format() {
        let sse = sse_event(&UiEvent::Done);
        assert!(sse.starts_with("event: done\n"));
        assert!(sse.contains("data: "));
        assert!(sse.ends_with("\n\n"));
    }

    #[test]
    fn error_frame_carries_the_message() {
        let sse = sse_event(&UiEvent::StreamError {
            message: "Error: streaming failed.".to_string(),
        });
        assert!(sse.starts_with("event: error\n"));
        assert!(sse.contains("Error: streaming failed."));
    }

    #[test]
    fn events_round_trip_through_json() {
        let event = UiEvent::AnswerUpdate {
            text: "scène".to_string(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: UiEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
