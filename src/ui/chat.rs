//! Simple chat view and its message-list fragment.
//!
//! The page posts through htmx; the server answers with the full message
//! list, which htmx swaps into `#messages`. Two out-of-band elements ride
//! along: the hidden conversation-id input (so the page learns its id on
//! the first exchange) and the toast area.

use leptos::prelude::*;

use crate::conversation::{Feedback, Role, Turn};
use crate::ui::app::shell;
use crate::ui::components::{
    BotIcon, Button, ClapperboardIcon, LoaderIcon, SendIcon, ThumbsDownIcon, ThumbsUpIcon,
};

/// Render the simple chat page.
#[must_use]
pub fn page() -> String {
    let content = view! {
        <div class="chat-shell">
            <header class="chat-header">
                <div class="chat-header-left">
                    <ClapperboardIcon class="chat-mark"/>
                    <div>
                        <h2>"Agent Chat"</h2>
                        <p class="chat-sub">"AI-assisted answers about your corpus."</p>
                    </div>
                </div>
            </header>

            <div id="messages" class="chat-history">
                {welcome_view()}
            </div>
            <div id="toast" class="toast-area"></div>

            <div class="chat-input-area">
                <form
                    id="chat-form"
                    hx-post="/api/chat"
                    hx-target="#messages"
                    hx-swap="innerHTML"
                    hx-disabled-elt="find button"
                    hx-indicator="#chat-indicator"
                >
                    <input
                        type="hidden"
                        id="chat-conversation-id"
                        name="conversation_id"
                        value=""
                    />
                    <input
                        class="chat-input"
                        name="message"
                        placeholder="Ask me anything..."
                        autocomplete="off"
                        required
                    />
                    <Button button_type="submit" class="send-btn">
                        <SendIcon/>
                        "Send"
                    </Button>
                </form>
                <div id="chat-indicator" class="htmx-indicator loading">
                    <LoaderIcon/>
                    "Agent is thinking..."
                </div>
            </div>
        </div>
    }
    .to_html();

    shell("Chat", &content)
}

/// Render the message list plus the out-of-band conversation id and toast.
#[must_use]
pub fn messages_fragment(conversation_id: &str, turns: &[Turn], toast: Option<&str>) -> String {
    let list = if turns.is_empty() {
        welcome_view()
    } else {
        turns
            .iter()
            .enumerate()
            .map(|(index, turn)| turn_view(conversation_id, index, turn))
            .collect_view()
            .into_any()
    };

    view! {
        {list}
        <input
            type="hidden"
            id="chat-conversation-id"
            name="conversation_id"
            value=conversation_id.to_string()
            hx-swap-oob="true"
        />
        <div id="toast" class="toast-area" hx-swap-oob="true">
            {toast.map(|text| view! { <div class="feedback-toast">{text.to_string()}</div> })}
        </div>
    }
    .to_html()
}

/// Empty-state block shown before the first exchange.
fn welcome_view() -> AnyView {
    view! {
        <div class="welcome">
            <div class="welcome-title">"Welcome — ask anything about your corpus"</div>
            <div class="welcome-sub">"Example: \"What is this application about?\""</div>
        </div>
    }
    .into_any()
}

/// One turn in the list. Bot turns carry the feedback row.
fn turn_view(conversation_id: &str, index: usize, turn: &Turn) -> AnyView {
    match turn.role {
        Role::User => view! {
            <div class="message user">
                <div class="avatar" aria-hidden="true">"You"</div>
                <div class="user-text">{turn.text.clone()}</div>
            </div>
        }
        .into_any(),
        Role::Bot => {
            let up_vals = feedback_vals(conversation_id, index, "up");
            let down_vals = feedback_vals(conversation_id, index, "down");
            let up_class = thumb_class(turn.feedback, Feedback::Up);
            let down_class = thumb_class(turn.feedback, Feedback::Down);

            view! {
                <div class="message bot">
                    <div class="avatar" aria-hidden="true">
                        <BotIcon/>
                    </div>
                    <div class="bot-block">
                        <div class="chat-bubble">{turn.text.clone()}</div>
                        <div class="feedback-row">
                            <button
                                class=up_class
                                title="I like this answer"
                                hx-post="/api/chat/feedback"
                                hx-target="#messages"
                                hx-swap="innerHTML"
                                hx-vals=up_vals
                            >
                                <ThumbsUpIcon/>
                            </button>
                            <button
                                class=down_class
                                title="This did not help, retry"
                                hx-post="/api/chat/feedback"
                                hx-target="#messages"
                                hx-swap="innerHTML"
                                hx-vals=down_vals
                                hx-indicator="#chat-indicator"
                            >
                                <ThumbsDownIcon/>
                            </button>
                        </div>
                    </div>
                </div>
            }
            .into_any()
        }
    }
}

fn feedback_vals(conversation_id: &str, index: usize, which: &str) -> String {
    format!(
        r#"{{"conversation_id":"{conversation_id}","turn_index":{index},"feedback":"{which}"}}"#
    )
}

fn thumb_class(marked: Option<Feedback>, this: Feedback) -> String {
    if marked == Some(this) {
        let which = match this {
            Feedback::Up => "up",
            Feedback::Down => "down",
        };
        format!("thumb-btn selected {which}")
    } else {
        "thumb-btn".to_string()
    }
}
