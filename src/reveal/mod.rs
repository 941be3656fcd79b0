//! Verse reveal service
//!
//! Draws random chapter/verse pairs, looks them up through a [`VerseSource`],
//! skips verses the user has already seen and records every new reveal in a
//! [`RevealStore`] before handing the verse back.

pub mod sampling;
pub mod store;

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::HashSet;

use crate::api::VerseSource;
use crate::config::Config;
use crate::error::FetchError;
use crate::models::Verse;

pub use sampling::{Sampling, TOTAL_VERSES, VerseRef};
pub use store::{MemoryStore, REVEALED_VERSES_KEY, RevealStore};

/// Lookups allowed per reveal unless configured otherwise
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// Outcome of one lookup inside a reveal
#[derive(Debug)]
pub enum Attempt {
    /// A verse the user has not seen
    Accepted(Verse),
    /// The source returned a verse that is already revealed
    DuplicateSkip(String),
    /// The lookup failed in a way worth another draw
    TransientFailure(FetchError),
    /// The source reported a non-retryable error; the reveal stops here
    Aborted(FetchError),
}

/// Reveal progress against the whole text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealProgress {
    /// Verses revealed so far
    pub revealed: usize,
    /// Verses in the whole text
    pub total: usize,
}

impl RevealProgress {
    /// Share revealed, between 0.0 and 1.0
    #[allow(clippy::cast_precision_loss)]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.revealed as f64 / self.total as f64).min(1.0)
    }
}

impl std::fmt::Display for RevealProgress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.revealed, self.total)
    }
}

/// Fetches unseen verses and tracks which ones have been revealed
pub struct VerseRevealService<S, P> {
    source: S,
    store: P,
    revealed: HashSet<String>,
    sampling: Sampling,
    retry_budget: u32,
    rng: StdRng,
}

impl<S: VerseSource, P: RevealStore> VerseRevealService<S, P> {
    /// Create a service, loading the revealed set from `store`
    pub fn new(source: S, store: P) -> Result<Self> {
        let revealed = store.load_revealed()?;
        tracing::debug!("Loaded {} revealed verses", revealed.len());

        Ok(Self {
            source,
            store,
            revealed,
            sampling: Sampling::default(),
            retry_budget: DEFAULT_RETRY_BUDGET,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Create a service using the retry budget and sampling from `config`
    pub fn from_config(source: S, store: P, config: &Config) -> Result<Self> {
        Ok(Self::new(source, store)?
            .with_retry_budget(config.retry_budget)
            .with_sampling(config.sampling))
    }

    /// Set the number of lookups allowed per reveal
    pub const fn with_retry_budget(mut self, retry_budget: u32) -> Self {
        self.retry_budget = retry_budget;
        self
    }

    /// Set how chapter/verse pairs are drawn
    pub const fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Use a specific random source (seeded draws in tests)
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Fetch a verse the user has not seen yet, mark it revealed and persist.
    ///
    /// Duplicates and transient lookup failures share one budget. When it runs
    /// out the call fails with [`FetchError::Exhausted`]; calling again starts
    /// a fresh budget. Any other error from the source is returned at once.
    pub async fn fetch_unrevealed_verse(&mut self) -> Result<Verse, FetchError> {
        for attempt in 1..=self.retry_budget {
            let at = self.sampling.draw(&mut self.rng);
            tracing::debug!("Reveal attempt {attempt}/{}: {at}", self.retry_budget);

            let result = self.source.lookup(at.chapter, at.verse).await;

            match self.classify(result) {
                Attempt::Accepted(verse) => {
                    self.record(&verse.verse_number)?;
                    tracing::info!(
                        "Revealed verse {} ({} of {TOTAL_VERSES})",
                        verse.verse_number,
                        self.revealed.len()
                    );
                    return Ok(verse);
                }
                Attempt::DuplicateSkip(verse_number) => {
                    tracing::debug!("Verse {verse_number} already revealed, drawing again");
                }
                Attempt::TransientFailure(e) => {
                    tracing::warn!("Failed to fetch verse {at}: {e}");
                }
                Attempt::Aborted(e) => {
                    tracing::error!("Verse source gave up on {at}: {e}");
                    return Err(e);
                }
            }
        }

        Err(FetchError::Exhausted {
            attempts: self.retry_budget,
        })
    }

    fn classify(&self, result: Result<Verse, FetchError>) -> Attempt {
        match result {
            Ok(verse) if self.is_revealed(&verse.verse_number) => {
                Attempt::DuplicateSkip(verse.verse_number)
            }
            Ok(verse) => Attempt::Accepted(verse),
            Err(e) if e.is_transient() => Attempt::TransientFailure(e),
            Err(e) => Attempt::Aborted(e),
        }
    }

    /// Insert and persist. A failed write is rolled back in memory.
    fn record(&mut self, verse_number: &str) -> Result<(), FetchError> {
        self.revealed.insert(verse_number.to_string());

        if let Err(e) = self.store.save_revealed(&self.revealed) {
            self.revealed.remove(verse_number);
            tracing::error!("Failed to save revealed verses: {e:#}");
            return Err(FetchError::Storage(format!("{e:#}")));
        }

        Ok(())
    }

    /// Mark a verse revealed without fetching it. Returns `false` if it
    /// already was.
    pub fn mark_revealed(&mut self, verse_number: &str) -> Result<bool, FetchError> {
        if self.is_revealed(verse_number) {
            return Ok(false);
        }
        self.record(verse_number)?;
        Ok(true)
    }

    /// Number of verses revealed so far
    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Whether `verse_number` has been revealed
    pub fn is_revealed(&self, verse_number: &str) -> bool {
        self.revealed.contains(verse_number)
    }

    /// Progress out of [`TOTAL_VERSES`]
    pub fn progress(&self) -> RevealProgress {
        RevealProgress {
            revealed: self.revealed.len(),
            total: TOTAL_VERSES,
        }
    }

    /// Forget every revealed verse (full data reset)
    pub fn reset(&mut self) -> Result<()> {
        let previous = std::mem::take(&mut self.revealed);

        if let Err(e) = self.store.save_revealed(&self.revealed) {
            self.revealed = previous;
            return Err(e);
        }

        tracing::info!("Cleared {} revealed verses", previous.len());
        Ok(())
    }

    /// The verse source
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// The backing store
    pub const fn store(&self) -> &P {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source that answers every lookup with the verse number `chapter.verse`
    struct EchoSource;

    impl VerseSource for EchoSource {
        async fn lookup(&self, chapter: u32, verse: u32) -> Result<Verse, FetchError> {
            Ok(Verse::with_number(&format!("{chapter}.{verse}")))
        }
    }

    fn service(store: MemoryStore) -> VerseRevealService<EchoSource, MemoryStore> {
        VerseRevealService::new(EchoSource, store)
            .unwrap()
            .with_rng(StdRng::seed_from_u64(42))
    }

    #[test]
    fn test_loads_existing_reveals() {
        let svc = service(MemoryStore::with_revealed(["2.47", "3.5"]));
        assert_eq!(svc.revealed_count(), 2);
        assert!(svc.is_revealed("2.47"));
        assert!(!svc.is_revealed("2.48"));
    }

    #[test]
    fn test_reveal_persists_each_time() {
        let store = MemoryStore::new();
        let mut svc = service(store.clone());

        let first = tokio_test::block_on(svc.fetch_unrevealed_verse()).unwrap();
        assert!(svc.is_revealed(&first.verse_number));
        assert_eq!(store.save_count(), 1);

        let second = tokio_test::block_on(svc.fetch_unrevealed_verse()).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load_revealed().unwrap().len(), 2);
    }

    #[test]
    fn test_drawn_verse_is_in_flat_range() {
        let mut svc = service(MemoryStore::new());
        let verse = tokio_test::block_on(svc.fetch_unrevealed_verse()).unwrap();

        let (chapter, index) = verse.verse_number.split_once('.').unwrap();
        let chapter: u32 = chapter.parse().unwrap();
        let index: u32 = index.parse().unwrap();
        assert!((1..=18).contains(&chapter));
        assert!((1..=78).contains(&index));
    }

    #[test]
    fn test_mark_revealed() {
        let store = MemoryStore::new();
        let mut svc = service(store.clone());

        assert!(svc.mark_revealed("9.22").unwrap());
        assert!(!svc.mark_revealed("9.22").unwrap());
        assert_eq!(svc.revealed_count(), 1);
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_zero_budget_is_exhausted_immediately() {
        let mut svc = service(MemoryStore::new()).with_retry_budget(0);
        let result = tokio_test::block_on(svc.fetch_unrevealed_verse());
        assert_eq!(result, Err(FetchError::Exhausted { attempts: 0 }));
    }

    #[test]
    fn test_reset_clears_and_persists() {
        let store = MemoryStore::with_revealed(["1.1", "1.2"]);
        let mut svc = service(store.clone());

        svc.reset().unwrap();
        assert_eq!(svc.revealed_count(), 0);
        assert!(store.load_revealed().unwrap().is_empty());
    }

    #[test]
    fn test_progress() {
        let svc = service(MemoryStore::with_revealed(["1.1", "1.2", "1.3"]));
        let progress = svc.progress();
        assert_eq!(progress, RevealProgress { revealed: 3, total: 700 });
        assert_eq!(progress.to_string(), "3/700");
        assert!((progress.fraction() - 3.0 / 700.0).abs() < f64::EPSILON);
    }
}
