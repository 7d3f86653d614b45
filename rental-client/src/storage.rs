//! Durable token storage
//!
//! A single persisted key, `adminToken`, survives restarts. The file store
//! keeps it in a small JSON document; the memory store backs tests and
//! ephemeral sessions.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ClientResult;

/// Storage key of the bearer token
pub const TOKEN_KEY: &str = "adminToken";

/// Persisted token store
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> ClientResult<Option<String>>;
    fn save(&self, token: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(rename = "adminToken", default, skip_serializing_if = "Option::is_none")]
    admin_token: Option<String>,
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    file_path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read(&self) -> ClientResult<TokenFile> {
        if !self.file_path.exists() {
            return Ok(TokenFile::default());
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        if content.trim().is_empty() {
            return Ok(TokenFile::default());
        }
        match serde_json::from_str(&content) {
            Ok(data) => Ok(data),
            Err(e) => {
                // Unreadable session file: start signed out and reset it
                tracing::warn!(path = %self.file_path.display(), "Discarding corrupt token file: {e}");
                let data = TokenFile::default();
                self.write(&data)?;
                Ok(data)
            }
        }
    }

    fn write(&self, data: &TokenFile) -> ClientResult<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(data)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> ClientResult<Option<String>> {
        Ok(self.read()?.admin_token.filter(|t| !t.is_empty()))
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        self.write(&TokenFile {
            admin_token: Some(token.to_string()),
        })
    }

    fn clear(&self) -> ClientResult<()> {
        if !self.file_path.exists() {
            return Ok(());
        }
        self.write(&TokenFile::default())
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> ClientResult<Option<String>> {
        Ok(self.token.lock().clone())
    }

    fn save(&self, token: &str) -> ClientResult<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("auth/session.json"));

        assert_eq!(storage.load().unwrap(), None);

        storage.save("tok-1").unwrap();
        let raw = std::fs::read_to_string(storage.path()).unwrap();
        assert!(raw.contains("\"adminToken\""));
        assert_eq!(storage.load().unwrap().as_deref(), Some("tok-1"));

        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
        // A fresh handle on the same file sees the cleared state
        let reopened = FileTokenStorage::new(storage.path());
        assert_eq!(reopened.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_loads_as_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let storage = FileTokenStorage::new(&path);
        assert_eq!(storage.load().unwrap(), None);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());

        storage.save("tok-2").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("tok-2"));
    }

    #[test]
    fn test_clear_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("missing.json"));
        storage.clear().unwrap();
        assert!(!storage.path().exists());
    }

    #[test]
    fn test_memory_storage() {
        let storage = MemoryTokenStorage::with_token("abc");
        assert_eq!(storage.load().unwrap().as_deref(), Some("abc"));
        storage.clear().unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }
}
