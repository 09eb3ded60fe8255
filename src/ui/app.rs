//! Document shell and shared chrome.

use leptos::prelude::*;

use crate::ui::components::{Button, ButtonVariant, ClapperboardIcon};

/// Wrap rendered page content in the HTML document shell.
///
/// The shell carries the shared header and footer, the stylesheet, htmx,
/// and the page script.
#[must_use]
pub fn shell(title: &str, content: &str) -> String {
    let header = view! { <SiteHeader/> }.to_html();
    let footer = view! { <SiteFooter/> }.to_html();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="AI-powered metadata for movie scripts and transcripts">
    <title>{title} - MetaTag</title>

    <!-- HTMX (local, no CDN) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>

    <!-- Application bundle -->
    <script defer src="/static/main.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <div id="app-shell">
        {header}
        <main id="app">
            {content}
        </main>
        {footer}
    </div>
</body>
</html>"#
    )
}

/// Site header with brand and primary navigation.
#[component]
fn SiteHeader() -> impl IntoView {
    view! {
        <header class="site-header" role="banner">
            <div class="header-inner">
                <a class="brand" href="/" aria-label="MetaTag home">
                    <ClapperboardIcon class="brand-mark" />
                    <span class="brand-text">
                        <strong class="brand-name">"MetaTag"</strong>
                        <span class="brand-sub">"film intelligence"</span>
                    </span>
                </a>

                <nav class="nav" aria-label="Primary" hx-boost="true">
                    <a href="/rag" class="nav-link">"How it Works"</a>
                    <a href="/metacritic" class="nav-link">"Score Predictor"</a>
                    <a href="/chat" class="nav-link cta">"Chat with Agent"</a>
                </nav>
            </div>
        </header>
    }
}

/// Site footer.
#[component]
fn SiteFooter() -> impl IntoView {
    view! {
        <footer class="site-footer">
            <div class="footer-inner">
                <div>"© MetaTag · NPN Hackathon"</div>
                <div class="links">
                    <a href="/#features">"Features"</a>
                    <a href="/chat">"Chat"</a>
                </div>
            </div>
        </footer>
    }
}

/// 404 page rendered in the shared shell.
#[must_use]
pub fn not_found_page() -> String {
    let content = view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p class="lead">"Page not found"</p>
            <a href="/">
                <Button variant=ButtonVariant::Primary>
                    "Go Home"
                </Button>
            </a>
        </div>
    }
    .to_html();

    shell("Not Found", &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shell_wraps_content_with_chrome() {
        let page = shell("Home", "<p>hello</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Home - MetaTag</title>"));
        assert!(page.contains("<p>hello</p>"));
        assert!(page.contains("MetaTag"));
        assert!(page.contains("/static/app.css"));
    }

    #[test]
    fn not_found_page_renders() {
        let page = not_found_page();
        assert!(page.contains("404"));
        assert!(page.contains("Go Home"));
    }
}
