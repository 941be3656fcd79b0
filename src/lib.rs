//! # gitapro
//!
//! Reveal a fresh Bhagavad Gita verse and keep track of what you've read.
//!
//! ## Overview
//!
//! gitapro fetches random verses from a remote content API, skips any verse
//! you have already been shown, and remembers every reveal on disk so your
//! progress through the 700 verses survives restarts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Front end (CLI / worker)                    │
//! │   Sends reveal commands, renders verses and progress        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   VerseRevealService                        │
//! │  Random draw → lookup → dedup → persist, bounded retries    │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                       │
//!          ▼                                       ▼
//! ┌─────────────────┐                     ┌─────────────────┐
//! │   VerseSource   │                     │   RevealStore   │
//! │                 │                     │                 │
//! │ • Gita API      │                     │ • SQLite        │
//! │ • Test stubs    │                     │ • In-memory     │
//! └─────────────────┘                     └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — Verse content API client
//! - [`auth`] — Encrypted storage for the content API key
//! - [`config`] — Configuration management
//! - [`db`] — `SQLite` database for revealed verses and saved lessons
//! - [`error`] — Fetch error taxonomy
//! - [`models`] — Data models (Verse, Lesson)
//! - [`reveal`] — The reveal service, sampling and persistence seam
//! - [`worker`] — Background task that owns the service
//!
//! ## Example
//!
//! ```no_run
//! use gitapro::{Config, Database, GitaClient, VerseRevealService};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let client = GitaClient::from_config(&config, "my-rapidapi-key");
//! let mut service = VerseRevealService::from_config(client, Database::open()?, &config)?;
//!
//! let verse = service.fetch_unrevealed_verse().await?;
//! println!("{}: {}", verse.title(), verse.translation);
//! println!("Progress: {}", service.progress());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::uninlined_format_args)]

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod paths;
pub mod reveal;
pub mod worker;

// Re-export main types for convenience
pub use api::{GitaClient, VerseSource};
pub use config::Config;
pub use db::Database;
pub use error::FetchError;
pub use models::{Lesson, Verse};
pub use reveal::{
    MemoryStore, RevealProgress, RevealStore, Sampling, TOTAL_VERSES, VerseRevealService,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
