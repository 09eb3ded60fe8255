//! Router assembly and request handlers.
//!
//! Pages render server-side; the chat panels exchange HTML fragments over
//! htmx, and the retrieval panel holds one SSE channel per exchange. All
//! view state lives in the [`ConversationStore`]; the external backend is
//! reached only through the [`Backend`] seam.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::AppState;
use crate::backend::{Backend, FeedbackReport, HttpBackend, Prediction, ScoreForm};
use crate::config::AppConfig;
use crate::conversation::{Conversation, ConversationStore, Feedback};
use crate::events::{UiEvent, sse_event};
use crate::stream::Utf8Assembler;
use crate::ui;

/// Bot text when `/chat` answers with an empty envelope.
const NO_RESPONSE: &str = "Error: No response";
/// Bot text when `/chat` or `/feedback` cannot be reached.
const BACKEND_UNREACHABLE: &str = "Error connecting to backend.";
/// Bot text when `/feedback` answers with an empty envelope.
const NO_IMPROVED_ANSWER: &str = "No improved answer.";
/// Bot text when the feedback retry itself fails.
const FEEDBACK_FAILED: &str = "Feedback failed, cannot retry right now.";
/// Placeholder replacement when `/rag` rejects the request.
const RAG_REJECTED: &str = "Error: Unable to get response.";
/// Appended bot text when the `/rag` body dies mid-stream.
const RAG_STREAM_FAILED: &str = "Error: streaming failed.";
/// Toast shown for a thumbs-up.
const FEEDBACK_THANKS: &str = "Hooray! Thanks for the feedback.";

/// Start the server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    let backend = HttpBackend::new(&config.backend)?;

    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        "Backend configuration loaded"
    );

    let state = AppState {
        backend: Arc::new(backend),
        conversations: ConversationStore::new(),
        config: Arc::clone(&config),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the application router.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .route("/", get(index_page))
        .route("/chat", get(chat_page))
        .route("/rag", get(rag_page))
        .route("/metacritic", get(metacritic_page))
        // API routes
        .route("/api/chat", post(api_chat))
        .route("/api/chat/feedback", post(api_chat_feedback))
        .route("/api/rag", post(api_rag))
        .route("/api/rag/stream", get(api_rag_stream))
        .route("/api/metacritic", post(api_metacritic))
        .route("/healthz", get(healthz))
        // Static assets
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Page Handlers
// ─────────────────────────────────────────────────────────────────────────────

async fn index_page() -> impl IntoResponse {
    Html(ui::home::page())
}

async fn chat_page() -> impl IntoResponse {
    Html(ui::chat::page())
}

async fn rag_page() -> impl IntoResponse {
    Html(ui::rag::page())
}

async fn metacritic_page() -> impl IntoResponse {
    Html(ui::metacritic::page())
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Html(ui::app::not_found_page()))
}

async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ─────────────────────────────────────────────────────────────────────────────
// Simple Chat
// ─────────────────────────────────────────────────────────────────────────────

/// Form body of a simple chat send.
#[derive(Debug, Deserialize)]
struct ChatSendForm {
    #[serde(default)]
    conversation_id: String,
    message: String,
}

/// POST /api/chat - send a message, wait for the answer, return the list.
async fn api_chat(
    State(state): State<AppState>,
    Form(form): Form<ChatSendForm>,
) -> Response {
    let convo = state.conversations.resolve(&form.conversation_id);

    let message = form.message.trim().to_string();
    if message.is_empty() {
        return fragment_response(&convo, None);
    }

    if !convo.try_begin_exchange() {
        return StatusCode::CONFLICT.into_response();
    }

    info!(
        name: "chat.send",
        conversation_id = %convo.id(),
        message_length = message.len(),
        "Received chat message"
    );

    convo.push_user(&message);

    let text = match state.backend.chat(&message).await {
        Ok(reply) => reply.into_text(NO_RESPONSE),
        Err(e) => {
            tracing::error!(
                name: "chat.backend_error",
                conversation_id = %convo.id(),
                error = %e,
                "Chat request failed"
            );
            BACKEND_UNREACHABLE.to_string()
        }
    };

    convo.push_bot(text);
    convo.end_exchange();

    fragment_response(&convo, None)
}

/// Form body of a feedback action.
#[derive(Debug, Deserialize)]
struct FeedbackForm {
    conversation_id: String,
    turn_index: usize,
    feedback: String,
}

/// POST /api/chat/feedback - mark a bot turn; a thumbs-down retries.
async fn api_chat_feedback(
    State(state): State<AppState>,
    Form(form): Form<FeedbackForm>,
) -> Response {
    let Some(convo) = state.conversations.get(&form.conversation_id) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match form.feedback.as_str() {
        "up" => {
            if !convo.mark_feedback(form.turn_index, Feedback::Up) {
                return StatusCode::NOT_FOUND.into_response();
            }
            fragment_response(&convo, Some(FEEDBACK_THANKS))
        }
        "down" => {
            // One retry at a time per conversation; a rejected action
            // leaves the turn list untouched.
            if !convo.try_begin_exchange() {
                return StatusCode::CONFLICT.into_response();
            }
            if !convo.mark_feedback(form.turn_index, Feedback::Down) {
                convo.end_exchange();
                return StatusCode::NOT_FOUND.into_response();
            }

            let bot_message = convo
                .turn(form.turn_index)
                .map(|t| t.text)
                .unwrap_or_default();
            let user_message = convo.user_text_before(form.turn_index).unwrap_or_default();

            info!(
                name: "chat.feedback.retry",
                conversation_id = %convo.id(),
                turn_index = form.turn_index,
                "Retrying a thumbed-down answer"
            );

            let report = FeedbackReport {
                user_message,
                bot_message,
                feedback: "down".to_string(),
            };

            let text = match state.backend.feedback(&report).await {
                Ok(reply) => reply.into_text(NO_IMPROVED_ANSWER),
                Err(e) => {
                    tracing::error!(
                        name: "chat.feedback.error",
                        conversation_id = %convo.id(),
                        error = %e,
                        "Feedback retry failed"
                    );
                    FEEDBACK_FAILED.to_string()
                }
            };

            convo.push_bot(text);
            convo.end_exchange();

            fragment_response(&convo, None)
        }
        _ => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

fn fragment_response(convo: &Conversation, toast: Option<&str>) -> Response {
    Html(ui::chat::messages_fragment(
        convo.id(),
        &convo.turns(),
        toast,
    ))
    .into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Retrieval Chat
// ─────────────────────────────────────────────────────────────────────────────

/// Body of a retrieval submit.
#[derive(Debug, Deserialize)]
struct RagStartRequest {
    #[serde(default)]
    conversation_id: String,
    question: String,
}

/// Response to a retrieval submit.
#[derive(Debug, Serialize)]
struct RagStartResponse {
    conversation_id: String,
    stream_url: String,
}

/// POST /api/rag - append the user turn and the placeholder, hand back the
/// stream URL.
async fn api_rag(
    State(state): State<AppState>,
    Json(req): Json<RagStartRequest>,
) -> Response {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": "No question provided." })),
        )
            .into_response();
    }

    let convo = state.conversations.resolve(&req.conversation_id);

    // Only one streaming request in flight per conversation.
    if !convo.try_begin_exchange() {
        return StatusCode::CONFLICT.into_response();
    }

    convo.push_user(&question);
    convo.push_bot("");
    convo.set_pending_question(question);

    let conversation_id = convo.id().to_string();
    let stream_url = format!("/api/rag/stream?conversation_id={conversation_id}");

    info!(
        name: "rag.submit",
        conversation_id = %conversation_id,
        stream_url = %stream_url,
        "Retrieval exchange started"
    );

    Json(RagStartResponse {
        conversation_id,
        stream_url,
    })
    .into_response()
}

/// Query parameters for the stream endpoint.
#[derive(Debug, Deserialize)]
struct StreamQuery {
    conversation_id: String,
}

/// GET /api/rag/stream - consume the backend's chunked answer and push
/// replacement snapshots to the browser.
async fn api_rag_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Response {
    let Some(convo) = state.conversations.get(&query.conversation_id) else {
        tracing::error!(
            name: "rag.stream.unknown_conversation",
            conversation_id = %query.conversation_id,
            "Stream opened for an unknown conversation"
        );
        return single_error_sse("Conversation not found");
    };

    // A stream without a submit (or opened twice) has nothing to consume.
    // The busy flag belongs to whichever exchange stashed the question, so
    // it is left alone here.
    let Some(question) = convo.take_pending_question() else {
        return single_error_sse("No question pending");
    };

    let backend = Arc::clone(&state.backend);

    info!(
        name: "rag.stream.open",
        conversation_id = %convo.id(),
        "Consuming retrieval answer stream"
    );

    let sse = async_stream::stream! {
        let response = match backend.rag(&question).await {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    name: "rag.stream.request_error",
                    conversation_id = %convo.id(),
                    error = %e,
                    "Retrieval request failed"
                );
                convo.replace_last_bot_text(RAG_REJECTED);
                yield Ok::<String, Infallible>(sse_event(&UiEvent::StreamError {
                    message: RAG_REJECTED.to_string(),
                }));
                convo.end_exchange();
                yield Ok(sse_event(&UiEvent::Done));
                return;
            }
        };

        if !response.status.is_success() {
            tracing::error!(
                name: "rag.stream.bad_status",
                conversation_id = %convo.id(),
                status = %response.status,
                "Retrieval request rejected"
            );
            convo.replace_last_bot_text(RAG_REJECTED);
            yield Ok::<String, Infallible>(sse_event(&UiEvent::StreamError {
                message: RAG_REJECTED.to_string(),
            }));
            convo.end_exchange();
            yield Ok(sse_event(&UiEvent::Done));
            return;
        }

        let mut decoder = Utf8Assembler::new();
        let mut answer = String::new();
        let mut body = response.body;

        loop {
            match body.next().await {
                Some(Ok(chunk)) => {
                    let text = decoder.decode(&chunk);
                    if text.is_empty() {
                        continue;
                    }
                    answer.push_str(&text);
                    // Replacement, not delta append: the most recent bot
                    // turn always holds the full accumulated answer.
                    convo.replace_last_bot_text(answer.clone());
                    yield Ok::<String, Infallible>(sse_event(&UiEvent::AnswerUpdate {
                        text: answer.clone(),
                    }));
                }
                Some(Err(e)) => {
                    tracing::error!(
                        name: "rag.stream.read_error",
                        conversation_id = %convo.id(),
                        error = %e,
                        "Retrieval stream died mid-answer"
                    );
                    convo.push_bot(RAG_STREAM_FAILED);
                    yield Ok::<String, Infallible>(sse_event(&UiEvent::StreamError {
                        message: RAG_STREAM_FAILED.to_string(),
                    }));
                    break;
                }
                None => {
                    let tail = decoder.finish();
                    if !tail.is_empty() {
                        answer.push_str(&tail);
                        convo.replace_last_bot_text(answer.clone());
                        yield Ok::<String, Infallible>(sse_event(&UiEvent::AnswerUpdate {
                            text: answer.clone(),
                        }));
                    }
                    info!(
                        name: "rag.stream.complete",
                        conversation_id = %convo.id(),
                        answer_length = answer.len(),
                        "Retrieval answer complete"
                    );
                    break;
                }
            }
        }

        // Success, error, or early return: the flag clears and input
        // re-enables.
        convo.end_exchange();
        yield Ok(sse_event(&UiEvent::Done));
    };

    build_sse_response(axum::body::Body::from_stream(sse))
}

// ─────────────────────────────────────────────────────────────────────────────
// Numeric Prediction
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/metacritic - submit the form record, render the envelope.
async fn api_metacritic(
    State(state): State<AppState>,
    Form(form): Form<ScoreForm>,
) -> Response {
    let prediction = match state.backend.predict(&form).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!(name: "metacritic.backend_error", error = %e, "Prediction request failed");
            Prediction {
                output: None,
                error: Some("Error: could not connect to backend.".to_string()),
            }
        }
    };

    Html(ui::metacritic::result_fragment(&prediction)).into_response()
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn single_error_sse(message: &str) -> Response {
    let err = UiEvent::StreamError {
        message: message.to_string(),
    };

    let payload = format!("{}{}", sse_event(&err), sse_event(&UiEvent::Done));
    build_sse_response(axum::body::Body::from(payload))
}

fn build_sse_response(body: axum::body::Body) -> Response {
    let mut resp = Response::new(body);
    let h = resp.headers_mut();
    h.insert("Content-Type", "text/event-stream".parse().unwrap());
    h.insert("Cache-Control", "no-cache".parse().unwrap());
    h.insert("Connection", "keep-alive".parse().unwrap());
    h.insert("X-Accel-Buffering", "no".parse().unwrap());
    resp
}
