//! Result handoff stash.
//!
//! A generation run and the page that displays its outcome happen in
//! separate requests. The stash persists the result under a one-time
//! token and hands it back at most once, within a short expiry window.

use std::{fs, path::PathBuf};

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use sitemark_core::config::HandoffConfig;
use thiserror::Error;
use tracing::debug;

use crate::pipeline::GenerationResult;

/// Length of stash tokens.
const TOKEN_LEN: usize = 32;

/// Errors from the handoff stash.
#[derive(Error, Debug)]
pub enum HandoffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("stash serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HandoffError>;

#[derive(Debug, Serialize, Deserialize)]
struct StashEnvelope {
    expires_at: DateTime<Utc>,
    result: GenerationResult,
}

/// Short-lived, single-read stash of generation results.
pub struct ResultStash {
    dir: PathBuf,
    ttl: Duration,
}

impl ResultStash {
    /// Create a stash rooted at `dir` whose entries live for `ttl_secs`.
    pub fn new(dir: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            dir: dir.into(),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Create a stash from configuration.
    #[must_use]
    pub fn from_config(config: &HandoffConfig) -> Self {
        Self::new(&config.dir, config.ttl_secs)
    }

    /// Store a result and return the token that retrieves it.
    pub fn put(&self, result: &GenerationResult) -> Result<String> {
        fs::create_dir_all(&self.dir)?;

        let token = new_token();
        let envelope = StashEnvelope {
            expires_at: Utc::now() + self.ttl,
            result: result.clone(),
        };
        let path = self.token_path(&token);
        fs::write(&path, serde_json::to_string(&envelope)?)?;
        debug!(path = %path.display(), "stashed generation result");

        Ok(token)
    }

    /// Retrieve and consume the result stored under `token`.
    ///
    /// The entry is removed before its content is inspected, so a token
    /// works at most once. Unknown, malformed and expired tokens all
    /// come back as `None`.
    pub fn take(&self, token: &str) -> Result<Option<GenerationResult>> {
        if !valid_token(token) {
            return Ok(None);
        }

        let path = self.token_path(token);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        fs::remove_file(&path)?;

        let envelope: StashEnvelope = serde_json::from_str(&json)?;
        if envelope.expires_at < Utc::now() {
            debug!(token, "stash entry expired");
            return Ok(None);
        }

        Ok(Some(envelope.result))
    }

    /// Remove stash entries that can no longer be served.
    ///
    /// Returns how many files were deleted.
    pub fn sweep(&self) -> Result<usize> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = Utc::now();
        let mut removed = 0;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let stale = match fs::read_to_string(&path)
                .ok()
                .and_then(|json| serde_json::from_str::<StashEnvelope>(&json).ok())
            {
                Some(envelope) => envelope.expires_at < now,
                None => true,
            };
            if stale {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }

        if removed > 0 {
            debug!(removed, "swept stash entries");
        }
        Ok(removed)
    }

    fn token_path(&self, token: &str) -> PathBuf {
        self.dir.join(format!("{token}.json"))
    }
}

fn new_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Tokens name files under the stash directory, so anything but the
/// generated alphanumeric shape is refused outright.
fn valid_token(token: &str) -> bool {
    token.len() == TOKEN_LEN && token.bytes().all(|b| b.is_ascii_alphanumeric())
}
