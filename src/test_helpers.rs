//! Deterministic doubles for the response service and the commentary
//! random source, shared by the integration tests.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        Mutex,
        atomic::{
            AtomicUsize,
            Ordering,
        },
    },
};

use color_eyre::eyre::eyre;
use futures::future::BoxFuture;
use tokio::sync::oneshot;

use crate::{
    client::{
        AppConfig,
        AppController,
        PitBossMode,
    },
    commentary::{
        Chance,
        CommentaryTrigger,
    },
    pitboss::{
        PitBossGateway,
        PitBossRequest,
        ResponseSource,
    },
};

pub enum ScriptedReply {
    Ok(String),
    Err(String),
    /// Held back until the paired sender fires; lets a test dictate
    /// completion order across concurrent requests.
    Gated(oneshot::Receiver<()>, String),
}

/// Response source that plays back a queue of scripted replies and counts
/// how often it was invoked.
pub struct ScriptedSource {
    replies: Mutex<VecDeque<ScriptedReply>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(replies: Vec<ScriptedReply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResponseSource for ScriptedSource {
    fn respond(&self, _request: PitBossRequest) -> BoxFuture<'static, color_eyre::eyre::Result<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front();
        Box::pin(async move {
            match next {
                Some(ScriptedReply::Ok(reply)) => Ok(reply),
                Some(ScriptedReply::Err(message)) => Err(eyre!(message)),
                Some(ScriptedReply::Gated(gate, reply)) => {
                    let _ = gate.await;
                    Ok(reply)
                }
                None => Err(eyre!("scripted source exhausted")),
            }
        })
    }
}

pub struct FixedChance(pub f64);

impl Chance for FixedChance {
    fn draw(&mut self) -> f64 {
        self.0
    }
}

pub struct SequenceChance {
    values: Vec<f64>,
    next: usize,
}

impl SequenceChance {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

impl Chance for SequenceChance {
    fn draw(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        pit_boss: PitBossMode::Offline,
        username: None,
        opening_balance: 10_000,
        transcript_dir: Some(
            std::env::temp_dir()
                .join("river-lobby-tests")
                .to_string_lossy()
                .into_owned(),
        ),
    }
}

/// Controller wired to the given doubles, already logged in as Alice at
/// the Slots table with 10_000 chips.
pub fn logged_in_controller(
    source: Arc<dyn ResponseSource>,
    chance: Box<dyn Chance>,
) -> AppController {
    let gateway = PitBossGateway::new(source);
    let mut controller = AppController::new(
        &test_config(),
        gateway,
        CommentaryTrigger::new(chance),
    )
    .with_seeded_rng(42);
    controller.login("Alice", "Slots", 10_000);
    controller
}
