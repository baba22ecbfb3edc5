use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use chrono::Utc;
use color_eyre::eyre::{
    Result,
    WrapErr,
};
use serde::Serialize;

use crate::chat::ChatMessage;

pub const DEFAULT_TRANSCRIPT_DIR: &str = "~/.river-lobby/transcripts";

#[derive(Serialize)]
struct TranscriptRecord<'a> {
    exported_at: String,
    username: &'a str,
    selected_game: &'a str,
    closing_balance: u64,
    messages: &'a [ChatMessage],
}

/// Write-only store for chat transcripts. Exports are artifacts for the
/// player; nothing here is ever read back into a session.
#[derive(Debug)]
pub struct TranscriptStore {
    dir: PathBuf,
}

impl TranscriptStore {
    pub fn new(dir: Option<&str>) -> Self {
        let raw = dir.unwrap_or(DEFAULT_TRANSCRIPT_DIR);
        let expanded = shellexpand::tilde(raw);
        Self {
            dir: PathBuf::from(expanded.into_owned()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn export(
        &self,
        username: &str,
        selected_game: &str,
        closing_balance: u64,
        messages: &[ChatMessage],
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .wrap_err("failed to create transcript directory")?;
        let now = Utc::now();
        let record = TranscriptRecord {
            exported_at: now.to_rfc3339(),
            username,
            selected_game,
            closing_balance,
            messages,
        };
        let filename = format!("session-{}.json", now.format("%Y%m%d-%H%M%S"));
        let path = self.dir.join(filename);
        let json = serde_json::to_string_pretty(&record)
            .wrap_err("failed to serialize transcript")?;
        fs::write(&path, json).wrap_err("failed to write transcript file")?;
        Ok(path)
    }
}
