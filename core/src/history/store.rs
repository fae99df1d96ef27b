//! Persistence backends for the calculation history

use super::entry::{History, HistoryEntry};
use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::error::{HistoryError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Fixed key the history is stored under
pub const HISTORY_KEY: &str = "integralHistory";

/// Storage for the calculation history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Current history, most recent first
    async fn load(&self) -> Result<History>;

    /// Record a calculation. Returns false when it repeated the head.
    async fn append(&self, entry: HistoryEntry) -> Result<bool>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;
}

/// History kept as one JSON array in a file.
///
/// The whole array is rewritten on every change through a temporary file
/// and a rename.
#[derive(Debug, Clone)]
pub struct JsonFileHistoryStore {
    path: PathBuf,
    capacity: usize,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl AsRef<Path>, capacity: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            capacity,
        }
    }

    /// Get the default history file path
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("integra");
        path.push(format!("{}.json", HISTORY_KEY));
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, history: &History) -> Result<()> {
        let save_failed = |e: std::io::Error| HistoryError::SaveFailed {
            path: self.path.display().to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(save_failed)?;
        }

        let content = serde_json::to_string_pretty(&history.to_vec())?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).await.map_err(save_failed)?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(save_failed)?;

        debug!("Saved {} history entries", history.len());
        Ok(())
    }
}

impl Default for JsonFileHistoryStore {
    fn default() -> Self {
        Self::new(Self::default_path(), DEFAULT_HISTORY_CAPACITY)
    }
}

#[async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn load(&self) -> Result<History> {
        if !self.path.exists() {
            debug!("History file does not exist, starting with empty history");
            return Ok(History::new(self.capacity));
        }

        let content =
            fs::read_to_string(&self.path)
                .await
                .map_err(|e| HistoryError::LoadFailed {
                    path: self.path.display().to_string(),
                    message: e.to_string(),
                })?;

        // A corrupt file is treated like an empty one and overwritten on the
        // next append
        let entries: Vec<HistoryEntry> = match serde_json::from_str(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Ignoring unreadable history file {}: {}", self.path.display(), e);
                Vec::new()
            }
        };

        debug!("Loaded {} history entries", entries.len());
        Ok(History::from_entries(entries, self.capacity))
    }

    async fn append(&self, entry: HistoryEntry) -> Result<bool> {
        let mut history = self.load().await?;
        if !history.push(entry) {
            return Ok(false);
        }
        self.save(&history).await?;
        Ok(true)
    }

    async fn clear(&self) -> Result<()> {
        self.save(&History::new(self.capacity)).await
    }
}

/// In-process history, lost on exit
#[derive(Debug)]
pub struct MemoryHistoryStore {
    history: Mutex<History>,
}

impl MemoryHistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: Mutex::new(History::new(capacity)),
        }
    }
}

impl Default for MemoryHistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn load(&self) -> Result<History> {
        Ok(self.history.lock().await.clone())
    }

    async fn append(&self, entry: HistoryEntry) -> Result<bool> {
        Ok(self.history.lock().await.push(entry))
    }

    async fn clear(&self) -> Result<()> {
        self.history.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::IntegralKind;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_store_save_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("integralHistory.json");
        let store = JsonFileHistoryStore::new(&path, 10);

        assert!(store.load().await.unwrap().is_empty());

        assert!(store
            .append(HistoryEntry::new("x^2", IntegralKind::Indefinite, "", ""))
            .await
            .unwrap());
        assert!(store
            .append(HistoryEntry::new("sin(x)", IntegralKind::Definite, "0", "pi"))
            .await
            .unwrap());

        // A fresh store over the same file sees both entries
        let reopened = JsonFileHistoryStore::new(&path, 10);
        let history = reopened.load().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.head().unwrap().expression, "sin(x)");
        assert_eq!(history.get(1).unwrap().expression, "x^2");
    }

    #[tokio::test]
    async fn test_file_store_duplicate_head() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileHistoryStore::new(temp_dir.path().join("h.json"), 10);

        let entry = HistoryEntry::new("x", IntegralKind::Indefinite, "", "");
        assert!(store.append(entry.clone()).await.unwrap());
        assert!(!store.append(entry).await.unwrap());
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_capacity_and_clear() {
        let temp_dir = tempdir().unwrap();
        let store = JsonFileHistoryStore::new(temp_dir.path().join("h.json"), 10);

        for i in 0..15 {
            let entry = HistoryEntry::new(format!("x^{}", i), IntegralKind::Indefinite, "", "");
            store.append(entry).await.unwrap();
        }
        assert_eq!(store.load().await.unwrap().len(), 10);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("h.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileHistoryStore::new(&path, 10);
        assert!(store.load().await.unwrap().is_empty());
        assert!(store
            .append(HistoryEntry::new("x", IntegralKind::Indefinite, "", ""))
            .await
            .unwrap());
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryHistoryStore::new(2);
        for expr in ["a", "b", "c"] {
            store
                .append(HistoryEntry::new(expr, IntegralKind::Indefinite, "", ""))
                .await
                .unwrap();
        }
        let history = store.load().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.head().unwrap().expression, "c");
    }

    #[test]
    fn test_default_path() {
        let path = JsonFileHistoryStore::default_path();
        assert!(path.ends_with("integra/integralHistory.json"));
    }
}
