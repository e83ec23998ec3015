use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::errors::{AppError, AppResult};

/// Long-lived credential persistence provided by the hosting environment.
///
/// Every change is published on the channel returned by `subscribe`; only
/// the latest token is retained, so slow subscribers skip stale values.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn current_token(&self) -> AppResult<Option<String>>;
    async fn save(&self, token: &str) -> AppResult<()>;
    async fn clear(&self) -> AppResult<()>;
    fn subscribe(&self) -> watch::Receiver<Option<String>>;
}

pub struct MemoryTokenStore {
    sender: watch::Sender<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn current_token(&self) -> AppResult<Option<String>> {
        Ok(self.sender.borrow().clone())
    }

    async fn save(&self, token: &str) -> AppResult<()> {
        self.sender.send_replace(Some(token.to_string()));
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.sender.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.sender.subscribe()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedToken {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Keeps the token in a small JSON file so a session survives restarts.
pub struct FileTokenStore {
    path: PathBuf,
    sender: watch::Sender<Option<String>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            path: path.into(),
            sender,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> AppResult<Option<String>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AppError::StoreUnavailable(format!(
                    "Failed to read session file {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_str::<PersistedToken>(&raw) {
            Ok(persisted) => Ok(Some(persisted.token)),
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn current_token(&self) -> AppResult<Option<String>> {
        let token = self.read_file().await?;
        self.sender.send_if_modified(|current| {
            if *current != token {
                *current = token.clone();
                true
            } else {
                false
            }
        });
        Ok(token)
    }

    async fn save(&self, token: &str) -> AppResult<()> {
        let persisted = PersistedToken {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let body = serde_json::to_string(&persisted)
            .map_err(|e| AppError::InternalError(format!("Failed to encode session file: {}", e)))?;

        tokio::fs::write(&self.path, body).await.map_err(|e| {
            AppError::StoreUnavailable(format!(
                "Failed to write session file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        self.sender.send_replace(Some(token.to_string()));
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::StoreUnavailable(format!(
                    "Failed to remove session file {}: {}",
                    self.path.display(),
                    e
                )))
            }
        }

        self.sender.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.sender.subscribe()
    }
}
