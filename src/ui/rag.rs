//! Retrieval chat view.
//!
//! The page script (`static/main.js`) owns this panel: it posts the
//! question to `/api/rag`, appends the user bubble and an empty bot
//! bubble, then follows the returned SSE URL and swaps the bot bubble's
//! text with every `answer.update` snapshot. The send control stays
//! disabled until the `done` event arrives.

use leptos::prelude::*;

use crate::ui::app::shell;
use crate::ui::components::{Badge, BadgeVariant, BotIcon, SendIcon};

/// Render the retrieval chat page.
#[must_use]
pub fn page() -> String {
    let content = view! {
        <div class="chat-shell" id="rag-root">
            <header class="chat-header">
                <div class="chat-header-left">
                    <div class="avatar" aria-hidden="true">
                        <BotIcon/>
                    </div>
                    <div>
                        <h2>"General Query Chatbot"</h2>
                        <p class="chat-sub">"AI-assisted guide to our corpus."</p>
                    </div>
                </div>
                <Badge variant=BadgeVariant::Success class="status-badge">
                    "Connected · Ready"
                </Badge>
            </header>

            <div id="rag-messages" class="chat-history">
                <div class="welcome">
                    <div class="welcome-title">"Welcome — Ask anything about our work"</div>
                    <div class="welcome-sub">"Example: \"What is this application about?\""</div>
                </div>
            </div>

            <div class="chat-input-area">
                <form id="rag-form" data-endpoint="/api/rag">
                    <input type="hidden" id="rag-conversation-id" value=""/>
                    <textarea
                        id="rag-input"
                        class="chat-input"
                        rows="2"
                        placeholder="Type your question here... (Enter to send)"
                    ></textarea>
                    // Plain element: the page script needs the id to toggle
                    // the control while streaming.
                    <button type="submit" id="rag-send" class="btn btn-primary btn-md send-btn">
                        <SendIcon/>
                        "Send"
                    </button>
                </form>
            </div>
        </div>
    }
    .to_html();

    shell("Chatbot", &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_carries_stream_wiring() {
        let page = page();
        assert!(page.contains("id=\"rag-form\""));
        assert!(page.contains("data-endpoint=\"/api/rag\""));
        assert!(page.contains("id=\"rag-conversation-id\""));
        assert!(page.contains("General Query Chatbot"));
    }
}
