//! Calculation history with swappable persistence

pub mod entry;
pub mod store;

pub use entry::{History, HistoryEntry};
pub use store::{HistoryStore, JsonFileHistoryStore, MemoryHistoryStore, HISTORY_KEY};
