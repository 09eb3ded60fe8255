//! MetaTag web frontend.
//!
//! An HTML-first web application for the MetaTag film-intelligence app:
//! a marketing page plus three panels (simple chat, retrieval chat, score
//! prediction) that talk to an external backend over plain HTTP, with one
//! streamed response consumed incrementally.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server; pages render via Leptos SSR,
//!   panels exchange htmx fragments and one SSE channel
//! - **Backend client**: typed reqwest client for the four backend
//!   operations behind the [`backend::Backend`] seam
//! - **State**: in-memory conversation turns with a per-view in-flight
//!   guard; nothing persists
//!
//! # Modules
//!
//! - [`backend`]: backend client and wire types
//! - [`conversation`]: turn lists and the conversation store
//! - [`events`]: SSE events for the retrieval stream
//! - [`stream`]: incremental UTF-8 assembly for chunked answers
//! - [`ui`]: Leptos SSR views and fragments

// Page handlers are async for the router's sake, awaits or not.
#![allow(clippy::unused_async)]

pub mod backend;
pub mod config;
pub mod conversation;
pub mod events;
pub mod server;
pub mod stream;
pub mod ui;

use std::sync::Arc;

use backend::Backend;
use config::AppConfig;
use conversation::ConversationStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the external backend.
    pub backend: Arc<dyn Backend>,
    /// Store of live conversations.
    pub conversations: ConversationStore,
    /// Global configuration.
    pub config: Arc<AppConfig>,
}
