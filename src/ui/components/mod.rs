//! Reusable UI components.
//!
//! A small kit of composable components rendered via Leptos SSR, styled by
//! `static/app.css`.
//!
//! # Components
//!
//! - [`Button`]: clickable button with variants
//! - [`Card`], [`CardHeader`], [`CardContent`]: card container
//! - [`Badge`]: status badge/tag
//! - [`icons`]: SVG icon components

mod badge;
mod button;
mod card;
mod icons;

pub use badge::{Badge, BadgeVariant};
pub use button::{Button, ButtonSize, ButtonVariant};
pub use card::{Card, CardContent, CardHeader};
pub use icons::*;
