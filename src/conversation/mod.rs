//! Conversation state for the chat panels.
//!
//! Conversations are transient: an in-memory turn list per view instance,
//! identified by UUID, alive only as long as the process. There is no
//! persistence and no identity beyond array position.
//!
//! # Architecture
//!
//! - [`Turn`]: one entry in the list — role, text, optional feedback mark
//! - [`Conversation`]: a turn list plus the per-view in-flight guard
//! - [`ConversationStore`]: thread-safe store for all live conversations
//!
//! # Example
//!
//! ```rust
//! use metatag::conversation::{ConversationStore, Role};
//!
//! let store = ConversationStore::new();
//! let convo = store.create();
//! convo.push_user("What is this application about?");
//!
//! assert_eq!(convo.turn_count(), 1);
//! assert_eq!(convo.turns()[0].role, Role::User);
//! ```

mod turns;

pub use turns::{Conversation, ConversationStore, Feedback, Role, Turn};
