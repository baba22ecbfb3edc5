use chrono::{
    DateTime,
    Utc,
};
use serde::Serialize;

/// Phrases handled locally without ever reaching the pit boss service.
pub const CHEAT_PHRASES: &[&str] = &["add coins", "cheat"];

/// Chips credited by a cheat grant.
pub const CHEAT_GRANT: i64 = 5000;

/// Think-time before the cheat reply lands.
pub const CHEAT_DELAY_MS: u64 = 1000;

pub const CHEAT_REPLY: &str =
    "\u{1f92b} Giving you a stimulus package. Don't tell the owner.";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Player,
    Assistant,
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn player(text: impl Into<String>) -> Self {
        Self {
            role: Role::Player,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Append-only transcript. Append order is the authoritative order shown in
/// the chat panel and sent to the pit boss; timestamps are informational.
#[derive(Clone, Debug, Default)]
pub struct ChatLog {
    entries: Vec<ChatMessage>,
}

impl ChatLog {
    pub fn push(&mut self, message: ChatMessage) {
        self.entries.push(message);
    }

    pub fn entries(&self) -> &[ChatMessage] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.entries.last()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Route {
    /// Handled locally: canned reply plus a chip grant after a short delay.
    Cheat,
    /// Forwarded to the pit boss response service.
    PitBoss,
}

/// Classifies an outgoing player message before any network-bound call, so
/// trick phrases never leak to the external service.
pub fn route_message(text: &str) -> Route {
    let lowered = text.to_lowercase();
    if CHEAT_PHRASES.iter().any(|phrase| lowered.contains(phrase)) {
        Route::Cheat
    } else {
        Route::PitBoss
    }
}
