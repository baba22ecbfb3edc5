use std::{
    sync::{
        Arc,
        Mutex,
    },
    time::Duration,
};

use color_eyre::eyre::{
    Result,
    WrapErr,
    eyre,
};
use futures::future::BoxFuture;
use reqwest::StatusCode;
use serde::{
    Deserialize,
    Serialize,
};
use tokio::time;
use tracing::warn;

use crate::chat::{
    ChatMessage,
    Role,
};

/// Reply substituted whenever the response service fails, answers with an
/// empty body, or exceeds the gateway timeout. The chat panel always
/// receives exactly one terminal reply per request, never silence.
pub const FALLBACK_REPLY: &str =
    "The pit boss tips his hat and says nothing. Try him again in a moment.";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const PERSONA: &str = "You are the Pit Boss of the RiverSweeps lobby: part \
                       host, part hustler. Keep replies short, cocky, and in \
                       character. Nudge the player toward the tables.";

#[derive(Clone, Debug, Serialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub text: String,
}

/// One request to the response service: transcript snapshot, the new player
/// text, and the balance the persona may comment on. Built per call, never
/// stored.
#[derive(Clone, Debug, Serialize)]
pub struct PitBossRequest {
    pub persona: &'static str,
    pub history: Vec<HistoryTurn>,
    pub message: String,
    pub balance: u64,
}

impl PitBossRequest {
    pub fn new(log: &[ChatMessage], message: impl Into<String>, balance: u64) -> Self {
        Self {
            persona: PERSONA,
            history: log
                .iter()
                .map(|m| HistoryTurn {
                    role: m.role,
                    text: m.text.clone(),
                })
                .collect(),
            message: message.into(),
            balance,
        }
    }
}

/// The opaque external response generator. The core never depends on a
/// specific transport; anything that can turn a request into one reply (or
/// one failure) fits behind this seam.
pub trait ResponseSource: Send + Sync {
    fn respond(&self, request: PitBossRequest) -> BoxFuture<'static, Result<String>>;
}

#[derive(Debug, Deserialize)]
struct RespondBody {
    reply: String,
}

/// HTTP-backed source speaking a small JSON protocol.
#[derive(Clone)]
pub struct HttpPitBoss {
    base_url: String,
    http: reqwest::Client,
}

impl HttpPitBoss {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .build()
            .wrap_err("failed to build HTTP client for the pit boss service")?;
        Ok(Self { base_url, http })
    }

    async fn call(&self, request: PitBossRequest) -> Result<String> {
        let url = format!("{}/v1/respond", self.base_url);
        let res = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .wrap_err("pit boss request failed")?;
        let status = res.status();
        if status != StatusCode::OK {
            let body = res.text().await.unwrap_or_default();
            return Err(eyre!("pit boss service returned {status}: {body}"));
        }
        let body: RespondBody = res
            .json()
            .await
            .wrap_err("failed to decode pit boss response body")?;
        Ok(body.reply)
    }
}

impl ResponseSource for HttpPitBoss {
    fn respond(&self, request: PitBossRequest) -> BoxFuture<'static, Result<String>> {
        let this = self.clone();
        Box::pin(async move { this.call(request).await })
    }
}

/// Offline source cycling through canned pit-boss lines. Used by
/// `--offline` mode so the lobby works without the response service.
pub struct ScriptedPitBoss {
    lines: Vec<&'static str>,
    next: Mutex<usize>,
}

impl Default for ScriptedPitBoss {
    fn default() -> Self {
        Self {
            lines: vec![
                "Luck favors the bold. The slots are hot tonight.",
                "I've seen players walk in with less and walk out with the jackpot.",
                "Keep your chips close and your bets closer.",
                "The fish are biting. Ocean King pays double for the bold.",
                "House always wins? Not while I'm watching the floor.",
            ],
            next: Mutex::new(0),
        }
    }
}

impl ResponseSource for ScriptedPitBoss {
    fn respond(&self, _request: PitBossRequest) -> BoxFuture<'static, Result<String>> {
        let line = {
            let mut next = self.next.lock().unwrap_or_else(|e| e.into_inner());
            let line = self.lines[*next % self.lines.len()];
            *next += 1;
            line
        };
        Box::pin(async move { Ok(line.to_string()) })
    }
}

/// Boundary wrapper around a response source. Imposes a timeout and
/// absorbs every failure into the fallback reply, so callers always get
/// exactly one reply string back.
#[derive(Clone)]
pub struct PitBossGateway {
    source: Arc<dyn ResponseSource>,
    timeout: Duration,
}

impl PitBossGateway {
    pub fn new(source: Arc<dyn ResponseSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(source: Arc<dyn ResponseSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub async fn respond(&self, request: PitBossRequest) -> String {
        let fut = self.source.respond(request);
        match time::timeout(self.timeout, fut).await {
            Ok(Ok(reply)) if !reply.trim().is_empty() => reply,
            Ok(Ok(_)) => {
                warn!("pit boss returned an empty reply; using fallback");
                FALLBACK_REPLY.to_string()
            }
            Ok(Err(err)) => {
                warn!(?err, "pit boss request failed; using fallback");
                FALLBACK_REPLY.to_string()
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "pit boss timed out; using fallback");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
