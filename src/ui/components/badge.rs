//! Badge component for status indicators and tags.

use leptos::prelude::*;

/// Badge visual variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BadgeVariant {
    /// Default badge style.
    #[default]
    Default,
    /// Success/positive badge.
    Success,
    /// Outline badge.
    Outline,
}

impl BadgeVariant {
    /// Get the CSS class for this variant.
    #[must_use]
    pub fn class(self) -> &'static str {
        match self {
            Self::Default => "badge-default",
            Self::Success => "badge-success",
            Self::Outline => "badge-outline",
        }
    }
}

/// Badge component for displaying status or labels.
///
/// # Example
///
/// ```rust,ignore
/// view! {
///     <Badge variant=BadgeVariant::Success>"Connected · Ready"</Badge>
/// }
/// ```
#[component]
pub fn Badge(
    /// Badge variant.
    #[prop(default = BadgeVariant::Default)]
    variant: BadgeVariant,
    /// Additional CSS classes.
    #[prop(default = "")]
    class: &'static str,
    /// Badge content.
    children: Children,
) -> impl IntoView {
    let classes = format!("badge {} {}", variant.class(), class);

    view! {
        <span class=classes>
            {children()}
        </span>
    }
}
