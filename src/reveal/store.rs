//! Persistence seam for the revealed-verse set

use anyhow::{Result, anyhow};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Key the revealed set is stored under
pub const REVEALED_VERSES_KEY: &str = "revealedVerses";

/// Durable storage for revealed verse numbers
pub trait RevealStore {
    /// Read the whole set (empty if nothing was ever saved)
    fn load_revealed(&self) -> Result<HashSet<String>>;

    /// Replace the stored set with `revealed`
    fn save_revealed(&self, revealed: &HashSet<String>) -> Result<()>;
}

/// In-memory store. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    revealed: Arc<Mutex<HashSet<String>>>,
    saves: Arc<AtomicUsize>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds some verse numbers
    pub fn with_revealed<I, T>(verses: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let store = Self::default();
        if let Ok(mut revealed) = store.revealed.lock() {
            revealed.extend(verses.into_iter().map(Into::into));
        }
        store
    }

    /// Number of times the set has been written
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl RevealStore for MemoryStore {
    fn load_revealed(&self) -> Result<HashSet<String>> {
        let revealed = self
            .revealed
            .lock()
            .map_err(|_| anyhow!("Revealed verse store lock poisoned"))?;
        Ok(revealed.clone())
    }

    fn save_revealed(&self, revealed: &HashSet<String>) -> Result<()> {
        let mut stored = self
            .revealed
            .lock()
            .map_err(|_| anyhow!("Revealed verse store lock poisoned"))?;
        stored.clone_from(revealed);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        let set: HashSet<String> = ["1.1".to_string()].into_iter().collect();
        store.save_revealed(&set).unwrap();

        assert_eq!(other.load_revealed().unwrap(), set);
        assert_eq!(other.save_count(), 1);
    }

    #[test]
    fn test_with_revealed() {
        let store = MemoryStore::with_revealed(["2.47", "18.66"]);
        let loaded = store.load_revealed().unwrap();
        assert!(loaded.contains("2.47"));
        assert!(loaded.contains("18.66"));
        assert_eq!(store.save_count(), 0);
    }
}
