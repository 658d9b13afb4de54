use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::StorageError;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";
pub const LOGGED_IN_AT_KEY: &str = "logged_in_at";

/// String key-value store for session data, optionally mirrored to a JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            path: None,
        }
    }

    /// Opens `path`. A corrupted file falls back to `<path>.json.tmp`, then to empty.
    pub async fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let data = read_session_file(&path).await;
        Self {
            inner: Arc::new(RwLock::new(data)),
            path: Some(path),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: impl Into<String>) -> Result<(), StorageError> {
        self.inner
            .write()
            .await
            .insert(key.to_string(), value.into());
        self.persist().await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let removed = self.inner.write().await.remove(key).is_some();
        if removed {
            self.persist().await
        } else {
            Ok(())
        }
    }

    /// Decodes a JSON value stored under `key`. Undecodable values read as absent.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, key, "stored value is not valid JSON");
                None
            }
        }
    }

    pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, raw).await
    }

    async fn persist(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            debug!("session store is in-memory only; skipping persist");
            return Ok(());
        };
        let bytes = {
            let inner = self.inner.read().await;
            serde_json::to_vec_pretty(&*inner)?
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

/// Reads the session file, recovering from the tmp copy a crashed write leaves behind.
async fn read_session_file(path: &Path) -> HashMap<String, String> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(error = %e, path = %path.display(), "no saved session");
            return HashMap::new();
        }
    };
    let parse_error = match serde_json::from_slice(&bytes) {
        Ok(entries) => return entries,
        Err(e) => e,
    };

    let tmp = path.with_extension("json.tmp");
    let recovered: Option<HashMap<String, String>> = tokio::fs::read(&tmp)
        .await
        .ok()
        .and_then(|tmp_bytes| serde_json::from_slice(&tmp_bytes).ok());
    match recovered {
        Some(entries) => {
            warn!(
                error = %parse_error,
                path = %path.display(),
                "session file corrupted, restored from tmp copy"
            );
            entries
        }
        None => {
            warn!(
                error = %parse_error,
                path = %path.display(),
                "session file corrupted, starting logged out"
            );
            HashMap::new()
        }
    }
}
