use std::{
    sync::Arc,
    time::Duration,
};

use color_eyre::eyre::Result;
use rand::{
    SeedableRng,
    rngs::StdRng,
};
use tokio::{
    sync::mpsc,
    time,
};
use tracing::{
    error,
    info,
};

use crate::{
    chat::{
        self,
        ChatMessage,
        Route,
    },
    commentary::{
        CommentaryTrigger,
        system_event_message,
    },
    games::{
        CreativeStudio,
        FishArena,
        GameEffect,
        SlotMachine,
    },
    pitboss::{
        HttpPitBoss,
        PitBossGateway,
        PitBossRequest,
        ResponseSource,
        ScriptedPitBoss,
    },
    session::{
        GameView,
        SessionState,
    },
    transcript::TranscriptStore,
    ui,
};

pub const DEFAULT_PIT_BOSS_URL: &str = "http://127.0.0.1:8977";

const MAX_ERRORS: usize = 50;

#[derive(Clone, Debug)]
pub enum PitBossMode {
    Http { url: String },
    Offline,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub pit_boss: PitBossMode,
    pub username: Option<String>,
    pub opening_balance: u64,
    pub transcript_dir: Option<String>,
}

/// Async outcomes funneled back into the event loop. Everything that can
/// complete out of order arrives here and is applied in completion order.
#[derive(Debug)]
pub enum LoopEvent {
    /// Reply to a direct chat turn; clears one slot of the busy counter.
    AssistantReply(String),
    /// Unsolicited commentary on a game event; never tracked as busy.
    Commentary(String),
    /// Local cheat path: canned reply plus the chip grant, after the delay.
    CheatGrant { reply: String, amount: i64 },
}

pub struct AppController {
    pub session: SessionState,
    gateway: PitBossGateway,
    trigger: CommentaryTrigger,
    rng: StdRng,
    pub slots: SlotMachine,
    pub fish: Option<FishArena>,
    pub studio: CreativeStudio,
    transcripts: TranscriptStore,
    pub status: String,
    errors: Vec<String>,
    event_tx: mpsc::UnboundedSender<LoopEvent>,
    event_rx: Option<mpsc::UnboundedReceiver<LoopEvent>>,
}

impl AppController {
    pub fn new(
        config: &AppConfig,
        gateway: PitBossGateway,
        trigger: CommentaryTrigger,
    ) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            session: SessionState::new(),
            gateway,
            trigger,
            rng: StdRng::from_os_rng(),
            slots: SlotMachine::default(),
            fish: None,
            studio: CreativeStudio::default(),
            transcripts: TranscriptStore::new(config.transcript_dir.as_deref()),
            status: String::from("Ready"),
            errors: Vec::new(),
            event_tx,
            event_rx: Some(event_rx),
        }
    }

    pub fn with_seeded_rng(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// The receiver half of the reply channel; taken once by whatever
    /// drives delivery (the run loop, or a test).
    pub fn take_events(&mut self) -> mpsc::UnboundedReceiver<LoopEvent> {
        self.event_rx.take().expect("loop events already taken")
    }

    pub fn login(&mut self, username: &str, selected_game: &str, opening_balance: u64) {
        self.session.login(username, selected_game, opening_balance);
        info!(username, selected_game, opening_balance, "player entered the lobby");
        self.set_status(format!("Welcome, {username}"));
    }

    /// Sends the chat input line. Empty or whitespace-only input mutates
    /// nothing; cheat phrases are resolved locally and never reach the
    /// response service.
    pub fn send_chat(&mut self) {
        let text = self.session.chat_input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.session.chat_input.clear();

        // History snapshot is taken before the new turn is appended; the
        // new text travels in the request's message field.
        let history = self.session.chat.entries().to_vec();
        let balance = self.session.balance();
        self.session.chat.push(ChatMessage::player(text.clone()));
        self.session.begin_reply();

        match chat::route_message(&text) {
            Route::Cheat => {
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    time::sleep(Duration::from_millis(chat::CHEAT_DELAY_MS)).await;
                    let _ = tx.send(LoopEvent::CheatGrant {
                        reply: chat::CHEAT_REPLY.to_string(),
                        amount: chat::CHEAT_GRANT,
                    });
                });
            }
            Route::PitBoss => {
                let request = PitBossRequest::new(&history, text, balance);
                let gateway = self.gateway.clone();
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    let reply = gateway.respond(request).await;
                    let _ = tx.send(LoopEvent::AssistantReply(reply));
                });
            }
        }
    }

    /// Fire-and-forget commentary hook for the mini-games. One uniform
    /// draw per call; on a hit the comment request runs detached and its
    /// reply arrives through the same channel as direct chat.
    pub fn notable_event(&mut self, description: &str) {
        if !self.trigger.should_comment() {
            return;
        }
        let request = PitBossRequest::new(
            self.session.chat.entries(),
            system_event_message(description),
            self.session.balance(),
        );
        let gateway = self.gateway.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let reply = gateway.respond(request).await;
            let _ = tx.send(LoopEvent::Commentary(reply));
        });
    }

    /// Applies one completed async outcome. Each balance delta is a single
    /// synchronous step here, so overlapping completions compose.
    pub fn apply(&mut self, event: LoopEvent) {
        match event {
            LoopEvent::AssistantReply(reply) => {
                self.session.chat.push(ChatMessage::assistant(reply));
                self.session.finish_reply();
            }
            LoopEvent::Commentary(reply) => {
                self.session.chat.push(ChatMessage::assistant(reply));
            }
            LoopEvent::CheatGrant { reply, amount } => {
                self.session.chat.push(ChatMessage::assistant(reply));
                self.session.apply_balance_delta(amount);
                self.session.finish_reply();
            }
        }
    }

    fn apply_effects(&mut self, effects: Vec<GameEffect>) {
        for effect in effects {
            match effect {
                GameEffect::Credit(delta) => self.session.apply_balance_delta(delta),
                GameEffect::Jackpot(delta) => self.session.apply_jackpot_delta(delta),
                GameEffect::Notable(description) => self.notable_event(&description),
                GameEffect::Leave => self.session.go_back(),
            }
        }
    }

    pub fn enter_game(&mut self, view: GameView) {
        if !self.session.select_view(view) {
            return;
        }
        if view == GameView::Fish && self.fish.is_none() {
            self.fish = Some(FishArena::spawn(&mut self.rng));
        }
        self.set_status(format!("Entered {}", view.title()));
    }

    pub fn go_back(&mut self) {
        self.session.go_back();
        self.set_status("Back to the lobby");
    }

    pub fn spin_slots(&mut self) {
        let balance = self.session.balance();
        let jackpot = self.session.jackpot();
        let effects = self.slots.spin(&mut self.rng, balance, jackpot);
        if effects.is_empty() {
            self.set_status("Not enough chips for that bet");
            return;
        }
        let win = self.slots.last_win;
        self.apply_effects(effects);
        if win > 0 {
            self.set_status(format!("Won {win} chips"));
        } else {
            self.set_status("No luck this spin");
        }
    }

    pub fn shoot_fish(&mut self) {
        let balance = self.session.balance();
        let Some(arena) = self.fish.as_mut() else {
            return;
        };
        let effects = arena.shoot(&mut self.rng, balance);
        if effects.is_empty() {
            self.set_status("Not enough chips for a shot");
            return;
        }
        let result = arena.last_result;
        self.apply_effects(effects);
        match result {
            Some((species, true)) => {
                self.set_status(format!(
                    "Caught a {} for {} chips",
                    species.label(),
                    species.bounty()
                ));
            }
            Some((species, false)) => {
                self.set_status(format!("The {} got away", species.label()));
            }
            None => {}
        }
    }

    pub fn paint(&mut self) {
        let effects = self.studio.paint();
        self.apply_effects(effects);
    }

    pub fn export_transcript(&mut self) {
        let result = self.transcripts.export(
            &self.session.username,
            &self.session.selected_game,
            self.session.balance(),
            self.session.chat.entries(),
        );
        match result {
            Ok(path) => {
                self.set_status(format!("Transcript saved to {}", path.display()));
            }
            Err(err) => {
                self.set_status("Transcript export failed");
                self.push_errors(vec![format!("transcript export error: {err}")]);
            }
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn push_errors(&mut self, mut items: Vec<String>) {
        if items.is_empty() {
            return;
        }
        for item in &items {
            error!("{}", item);
        }
        self.errors.append(&mut items);
        if self.errors.len() > MAX_ERRORS {
            let drain = self.errors.len() - MAX_ERRORS;
            self.errors.drain(0..drain);
        }
    }

    pub fn snapshot(&self) -> ui::AppSnapshot {
        ui::AppSnapshot {
            has_entered: self.session.has_entered,
            username: self.session.username.clone(),
            selected_game: self.session.selected_game.clone(),
            view: self.session.active_view(),
            balance: self.session.balance(),
            jackpot: self.session.jackpot(),
            chat_open: self.session.chat_open,
            chat_input: self.session.chat_input.clone(),
            assistant_busy: self.session.is_assistant_busy(),
            messages: self.session.chat.entries().to_vec(),
            status: self.status.clone(),
            errors: self.errors.iter().rev().take(5).cloned().collect(),
            slots: ui::SlotsView {
                reels: self.slots.reels,
                bet: self.slots.bet,
                last_win: self.slots.last_win,
                spins: self.slots.spins,
            },
            fish: self.fish.as_ref().map(|arena| ui::FishView {
                lanes: arena.lanes.clone(),
                aim: arena.aim,
                shots: arena.shots,
                caught_value: arena.caught_value,
                last_result: arena.last_result,
            }),
            studio: ui::StudioView::from_studio(&self.studio),
        }
    }
}

pub async fn run_app(config: AppConfig) -> Result<()> {
    let source: Arc<dyn ResponseSource> = match &config.pit_boss {
        PitBossMode::Http { url } => Arc::new(HttpPitBoss::new(url.clone())?),
        PitBossMode::Offline => Arc::new(ScriptedPitBoss::default()),
    };
    let gateway = PitBossGateway::new(source);
    let mut controller =
        AppController::new(&config, gateway, CommentaryTrigger::from_thread_rng());
    let mut ui_state = ui::UiState::new(config.username.clone());
    let mut input_events = ui::input_event_stream();

    info!("starting lobby UI");
    ui::terminal_enter(&mut ui_state)?;
    let res = run_loop(&mut controller, &config, &mut ui_state, &mut input_events).await;
    ui::terminal_exit()?;
    res
}

async fn run_loop(
    controller: &mut AppController,
    config: &AppConfig,
    ui_state: &mut ui::UiState,
    input_events: &mut ui::InputEventReceiver,
) -> Result<()> {
    let mut loop_events = controller.take_events();
    ui::draw(ui_state, &controller.snapshot())?;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => { break; }
            maybe_event = loop_events.recv() => {
                let Some(event) = maybe_event else { break; };
                controller.apply(event);
                ui::draw(ui_state, &controller.snapshot())?;
            }
            raw = ui::next_raw_event(input_events) => {
                let raw = raw?;
                let snapshot = controller.snapshot();
                let Some(event) = ui::interpret_event(ui_state, &snapshot, raw) else {
                    continue;
                };
                match event {
                    ui::UserEvent::Quit => break,
                    ui::UserEvent::Redraw => {}
                    ui::UserEvent::Login { username, game } => {
                        controller.login(&username, &game, config.opening_balance);
                    }
                    ui::UserEvent::SelectGame(view) => controller.enter_game(view),
                    ui::UserEvent::GoBack => controller.go_back(),
                    ui::UserEvent::OpenChat => controller.session.chat_open = true,
                    ui::UserEvent::CloseChat => controller.session.chat_open = false,
                    ui::UserEvent::ChatChar(c) => controller.session.chat_input.push(c),
                    ui::UserEvent::ChatBackspace => {
                        controller.session.chat_input.pop();
                    }
                    ui::UserEvent::SendChat => controller.send_chat(),
                    ui::UserEvent::SpinSlots => controller.spin_slots(),
                    ui::UserEvent::RaiseBet => controller.slots.raise_bet(),
                    ui::UserEvent::LowerBet => controller.slots.lower_bet(),
                    ui::UserEvent::AimUp => {
                        if let Some(arena) = controller.fish.as_mut() {
                            arena.aim_up();
                        }
                    }
                    ui::UserEvent::AimDown => {
                        if let Some(arena) = controller.fish.as_mut() {
                            arena.aim_down();
                        }
                    }
                    ui::UserEvent::Shoot => controller.shoot_fish(),
                    ui::UserEvent::MoveCursor(dx, dy) => {
                        controller.studio.move_cursor(dx, dy);
                    }
                    ui::UserEvent::Paint => controller.paint(),
                    ui::UserEvent::CycleColor => controller.studio.cycle_color(),
                    ui::UserEvent::ClearCanvas => controller.studio.clear(),
                    ui::UserEvent::ExportTranscript => controller.export_transcript(),
                }
                ui::draw(ui_state, &controller.snapshot())?;
            }
        }
    }
    Ok(())
}
