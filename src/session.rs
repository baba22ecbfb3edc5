use tracing::debug;

use crate::chat::{
    ChatLog,
    ChatMessage,
};

pub const DEFAULT_OPENING_BALANCE: u64 = 10_000;
pub const JACKPOT_SEED: u64 = 50_000;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum GameView {
    #[default]
    Lobby,
    Fish,
    Slots,
    Creative,
}

impl GameView {
    pub fn title(self) -> &'static str {
        match self {
            GameView::Lobby => "Lobby",
            GameView::Fish => "Ocean King",
            GameView::Slots => "Dragon Slots",
            GameView::Creative => "Nano Studio",
        }
    }
}

/// The single shared mutable record for one session: identity, wallet,
/// jackpot, active view, chat panel state, and the transcript. Created at
/// login, gone at process teardown. All mutation goes through the narrow
/// entry points below; collaborators only ever see deltas.
#[derive(Debug, Default)]
pub struct SessionState {
    pub has_entered: bool,
    pub username: String,
    pub selected_game: String,
    active_view: GameView,
    balance: u64,
    jackpot: u64,
    pub chat_open: bool,
    pub chat_input: String,
    pending_replies: u32,
    pub chat: ChatLog,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            jackpot: JACKPOT_SEED,
            ..Self::default()
        }
    }

    /// Enters the lobby. Seeds the transcript with exactly one welcome
    /// message naming the player and their chosen game.
    pub fn login(
        &mut self,
        username: impl Into<String>,
        selected_game: impl Into<String>,
        opening_balance: u64,
    ) {
        self.username = username.into();
        self.selected_game = selected_game.into();
        self.balance = opening_balance;
        self.active_view = GameView::Lobby;
        self.chat = ChatLog::default();
        self.chat.push(ChatMessage::assistant(format!(
            "Welcome to {} on RiverSweeps, {}! I'm the Boss here. Need chips? Just ask!",
            self.selected_game, self.username
        )));
        self.has_entered = true;
    }

    pub fn active_view(&self) -> GameView {
        self.active_view
    }

    /// Total transition function over the view machine. Game views are only
    /// reachable from the lobby; a direct game-to-game jump is a no-op.
    /// Returns whether the view changed.
    pub fn select_view(&mut self, target: GameView) -> bool {
        let legal = match (self.active_view, target) {
            (current, t) if current == t => false,
            (_, GameView::Lobby) => true,
            (GameView::Lobby, _) => true,
            _ => {
                debug!(from = ?self.active_view, to = ?target, "ignoring direct game-to-game jump");
                false
            }
        };
        if legal {
            self.active_view = target;
        }
        legal
    }

    /// The single "go back" action: always lands in the lobby.
    pub fn go_back(&mut self) {
        self.active_view = GameView::Lobby;
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn jackpot(&self) -> u64 {
        self.jackpot
    }

    /// Applies a chip delta as one synchronous step. A debit that would
    /// cross zero is clamped at zero, keeping the balance a non-negative
    /// integer after every completed mutation.
    pub fn apply_balance_delta(&mut self, delta: i64) {
        let before = self.balance;
        self.balance = apply_delta(self.balance, delta);
        if delta < 0 && self.balance == 0 && before as i128 + delta as i128 != 0 {
            debug!(before, delta, "balance delta clamped at zero");
        }
    }

    pub fn apply_jackpot_delta(&mut self, delta: i64) {
        self.jackpot = apply_delta(self.jackpot, delta);
    }

    pub fn begin_reply(&mut self) {
        self.pending_replies = self.pending_replies.saturating_add(1);
    }

    pub fn finish_reply(&mut self) {
        self.pending_replies = self.pending_replies.saturating_sub(1);
    }

    /// The "typing..." flag: true while any assistant request is in flight.
    pub fn is_assistant_busy(&self) -> bool {
        self.pending_replies > 0
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta as u64)
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_balance_delta__clamps_debits_at_zero() {
        let mut session = SessionState::new();
        session.login("Alice", "Slots", 100);
        session.apply_balance_delta(-250);
        assert_eq!(session.balance(), 0);
        session.apply_balance_delta(40);
        assert_eq!(session.balance(), 40);
    }

    #[test]
    fn select_view__rejects_game_to_game_jumps() {
        let mut session = SessionState::new();
        session.login("Alice", "Slots", 100);
        assert!(session.select_view(GameView::Fish));
        assert!(!session.select_view(GameView::Slots));
        assert_eq!(session.active_view(), GameView::Fish);
        session.go_back();
        assert!(session.select_view(GameView::Slots));
    }

    #[test]
    fn busy_flag__tracks_overlapping_requests() {
        let mut session = SessionState::new();
        session.begin_reply();
        session.begin_reply();
        session.finish_reply();
        assert!(session.is_assistant_busy());
        session.finish_reply();
        assert!(!session.is_assistant_busy());
    }
}
