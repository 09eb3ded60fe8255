//! UI views and layouts.
//!
//! This module provides Leptos SSR views for the four pages and the HTML
//! fragments the chat panels swap in. Views render to strings inside the
//! document shell; htmx and a small page script drive interactivity.
//!
//! # Structure
//!
//! - [`app`]: document shell, shared header/footer, 404 page
//! - [`home`]: marketing view (hero + feature grid)
//! - [`chat`]: simple chat view and its message-list fragment
//! - [`rag`]: retrieval chat view
//! - [`metacritic`]: numeric prediction view and its result fragment
//! - [`components`]: reusable UI components

pub mod app;
pub mod chat;
pub mod components;
pub mod home;
pub mod metacritic;
pub mod rag;
