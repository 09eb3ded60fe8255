//! Turn list and conversation storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed by the person at the keyboard.
    User,
    /// Produced by the backend.
    Bot,
}

/// Thumb mark on a bot turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Up,
    Down,
}

/// A single entry in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    /// Set once the user rates a bot turn; never set on user turns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl Turn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            feedback: None,
        }
    }

    #[must_use]
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            feedback: None,
        }
    }
}

/// A single conversation: an ordered turn list, append-only except the
/// feedback mark and the in-place text growth of the most recent bot turn
/// while an answer is streaming.
#[derive(Debug)]
pub struct Conversation {
    inner: Arc<ConversationInner>,
}

#[derive(Debug)]
struct ConversationInner {
    id: String,
    turns: RwLock<Vec<Turn>>,
    /// The per-view in-flight guard: set while a send, feedback retry, or
    /// streamed answer is underway.
    busy: AtomicBool,
    /// Question handed from the retrieval submit to the stream opener.
    pending_question: RwLock<Option<String>>,
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
    last_activity: RwLock<DateTime<Utc>>,
}

impl Clone for Conversation {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Conversation {
    fn new(id: String) -> Self {
        let now = Utc::now();
        Self {
            inner: Arc::new(ConversationInner {
                id,
                turns: RwLock::new(Vec::new()),
                busy: AtomicBool::new(false),
                pending_question: RwLock::new(None),
                created_at: now,
                last_activity: RwLock::new(now),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Append a user turn.
    pub fn push_user(&self, text: impl Into<String>) {
        self.push(Turn::user(text));
    }

    /// Append a bot turn with no feedback mark.
    pub fn push_bot(&self, text: impl Into<String>) {
        self.push(Turn::bot(text));
    }

    fn push(&self, turn: Turn) {
        let mut guard = self.inner.turns.write().unwrap();
        guard.push(turn);
        drop(guard);
        self.touch();
    }

    /// Snapshot of the full turn list.
    #[must_use]
    pub fn turns(&self) -> Vec<Turn> {
        self.inner.turns.read().unwrap().clone()
    }

    #[must_use]
    pub fn turn_count(&self) -> usize {
        self.inner.turns.read().unwrap().len()
    }

    /// A single turn by position.
    #[must_use]
    pub fn turn(&self, index: usize) -> Option<Turn> {
        self.inner.turns.read().unwrap().get(index).cloned()
    }

    /// Mark a bot turn with a thumb. Returns `false` if the index does not
    /// name a bot turn.
    pub fn mark_feedback(&self, index: usize, feedback: Feedback) -> bool {
        let mut guard = self.inner.turns.write().unwrap();
        let marked = match guard.get_mut(index) {
            Some(turn) if turn.role == Role::Bot => {
                turn.feedback = Some(feedback);
                true
            }
            _ => false,
        };
        drop(guard);
        if marked {
            self.touch();
        }
        marked
    }

    /// Replace the text of the most recent bot turn with a full snapshot.
    ///
    /// This is the streaming update: replacement, not delta append.
    /// Returns `false` if the list holds no bot turn.
    pub fn replace_last_bot_text(&self, text: impl Into<String>) -> bool {
        let mut guard = self.inner.turns.write().unwrap();
        let replaced = match guard.iter_mut().rev().find(|t| t.role == Role::Bot) {
            Some(turn) => {
                turn.text = text.into();
                true
            }
            None => false,
        };
        drop(guard);
        if replaced {
            self.touch();
        }
        replaced
    }

    /// Text of the nearest user turn preceding `index`, for feedback
    /// retries.
    #[must_use]
    pub fn user_text_before(&self, index: usize) -> Option<String> {
        let guard = self.inner.turns.read().unwrap();
        guard
            .iter()
            .take(index)
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.text.clone())
    }

    /// Claim the in-flight slot. Returns `false` if an exchange is already
    /// underway; the caller must reject the action without touching the
    /// turn list.
    pub fn try_begin_exchange(&self) -> bool {
        self.inner
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the in-flight slot. Always runs at the end of an exchange,
    /// on success and failure alike, which re-enables input.
    pub fn end_exchange(&self) {
        self.inner.busy.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inner.busy.load(Ordering::Acquire)
    }

    /// Stash the question between the retrieval submit and the stream open.
    pub fn set_pending_question(&self, question: impl Into<String>) {
        let mut guard = self.inner.pending_question.write().unwrap();
        *guard = Some(question.into());
    }

    /// Take the stashed question, leaving the slot empty.
    #[must_use]
    pub fn take_pending_question(&self) -> Option<String> {
        self.inner.pending_question.write().unwrap().take()
    }

    fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap();
        *guard = Utc::now();
    }
}

/// Thread-safe store for live conversations.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    inner: Arc<ConversationStoreInner>,
}

#[derive(Debug)]
struct ConversationStoreInner {
    conversations: RwLock<HashMap<String, Conversation>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ConversationStoreInner {
                conversations: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Create a conversation with a fresh UUID.
    #[must_use]
    pub fn create(&self) -> Conversation {
        let id = Uuid::new_v4().to_string();
        self.create_with_id(id)
    }

    #[must_use]
    pub fn create_with_id(&self, id: impl Into<String>) -> Conversation {
        let id = id.into();
        let convo = Conversation::new(id.clone());
        let mut guard = self.inner.conversations.write().unwrap();
        guard.insert(id, convo.clone());
        convo
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Conversation> {
        let guard = self.inner.conversations.read().unwrap();
        guard.get(id).cloned()
    }

    /// Resolve the id a page sent with an exchange: empty or unknown ids
    /// get a fresh conversation.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Conversation {
        if id.is_empty() {
            return self.create();
        }

        {
            let guard = self.inner.conversations.read().unwrap();
            if let Some(convo) = guard.get(id) {
                return convo.clone();
            }
        }

        self.create_with_id(id)
    }

    pub fn remove(&self, id: &str) -> Option<Conversation> {
        let mut guard = self.inner.conversations.write().unwrap();
        guard.remove(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.conversations.read().unwrap().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_lifecycle() {
        let convo = Conversation::new("test-123".to_string());

        assert_eq!(convo.id(), "test-123");
        assert_eq!(convo.turn_count(), 0);

        convo.push_user("Who directed 3:10 to Yuma?");
        convo.push_bot("James Mangold.");
        assert_eq!(convo.turn_count(), 2);

        let turns = convo.turns();
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[1].role, Role::Bot);
        assert!(turns[1].feedback.is_none());
    }

    #[test]
    fn feedback_marks_only_bot_turns() {
        let convo = Conversation::new("test".to_string());
        convo.push_user("question");
        convo.push_bot("answer");

        assert!(!convo.mark_feedback(0, Feedback::Up));
        assert!(!convo.mark_feedback(5, Feedback::Up));
        assert!(convo.mark_feedback(1, Feedback::Down));
        assert_eq!(convo.turn(1).unwrap().feedback, Some(Feedback::Down));
    }

    #[test]
    fn replace_targets_the_most_recent_bot_turn() {
        let convo = Conversation::new("test".to_string());
        assert!(!convo.replace_last_bot_text("nothing to replace"));

        convo.push_user("q1");
        convo.push_bot("first answer");
        convo.push_user("q2");
        convo.push_bot("");

        assert!(convo.replace_last_bot_text("partial"));
        assert!(convo.replace_last_bot_text("partial answer"));

        let turns = convo.turns();
        assert_eq!(turns[1].text, "first answer");
        assert_eq!(turns[3].text, "partial answer");
    }

    #[test]
    fn user_text_before_skips_bot_turns() {
        let convo = Conversation::new("test".to_string());
        convo.push_user("first question");
        convo.push_bot("first answer");
        convo.push_bot("second answer");

        assert_eq!(
            convo.user_text_before(2).as_deref(),
            Some("first question")
        );
        assert_eq!(convo.user_text_before(0), None);
    }

    #[test]
    fn exchange_guard_admits_one_at_a_time() {
        let convo = Conversation::new("test".to_string());

        assert!(convo.try_begin_exchange());
        assert!(convo.is_busy());
        assert!(!convo.try_begin_exchange());

        convo.end_exchange();
        assert!(!convo.is_busy());
        assert!(convo.try_begin_exchange());
    }

    #[test]
    fn pending_question_is_taken_once() {
        let convo = Conversation::new("test".to_string());
        convo.set_pending_question("what is this about?");

        assert_eq!(
            convo.take_pending_question().as_deref(),
            Some("what is this about?")
        );
        assert_eq!(convo.take_pending_question(), None);
    }

    #[test]
    fn store_resolves_ids() {
        let store = ConversationStore::new();
        assert!(store.is_empty());

        let created = store.resolve("");
        assert_eq!(store.len(), 1);

        let found = store.resolve(created.id());
        assert_eq!(found.id(), created.id());
        assert_eq!(store.len(), 1);

        let adopted = store.resolve("view-abc");
        assert_eq!(adopted.id(), "view-abc");
        assert_eq!(store.len(), 2);

        store.remove(created.id());
        assert!(store.get(created.id()).is_none());
    }
}
