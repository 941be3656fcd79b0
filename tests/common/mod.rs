//! Shared test doubles for the reveal integration tests.

#![allow(dead_code)]

use anyhow::{Result, bail};
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use gitapro::{FetchError, RevealStore, Verse, VerseSource};

/// Source that plays back a fixed list of answers, then repeats `fallback`.
pub struct ScriptedSource {
    script: Mutex<VecDeque<Result<Verse, FetchError>>>,
    fallback: Result<Verse, FetchError>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(
        script: Vec<Result<Verse, FetchError>>,
        fallback: Result<Verse, FetchError>,
    ) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always answers with the same verse
    pub fn always_verse(verse_number: &str) -> Self {
        Self::new(Vec::new(), Ok(verse(verse_number)))
    }

    /// Always fails with a network error
    pub fn always_failing() -> Self {
        Self::new(Vec::new(), Err(network_error()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VerseSource for ScriptedSource {
    async fn lookup(&self, _chapter: u32, _verse: u32) -> Result<Verse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

/// Store that loads empty and refuses every write
pub struct FailingStore;

impl RevealStore for FailingStore {
    fn load_revealed(&self) -> Result<HashSet<String>> {
        Ok(HashSet::new())
    }

    fn save_revealed(&self, _revealed: &HashSet<String>) -> Result<()> {
        bail!("disk is read-only")
    }
}

pub fn verse(verse_number: &str) -> Verse {
    let mut verse = Verse::with_number(verse_number);
    verse.translation = format!("Translation of {verse_number}");
    verse
}

pub fn network_error() -> FetchError {
    FetchError::Network("connection reset by peer".to_string())
}
