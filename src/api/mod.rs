//! Verse content API clients

pub mod gita;

use std::future::Future;

use crate::error::FetchError;
use crate::models::Verse;

pub use gita::GitaClient;

/// Remote lookup of a single verse by chapter and index.
///
/// Implementations report every failure as one of the transient
/// [`FetchError`] kinds (`Network`, `EmptyResponse`, `Decode`).
pub trait VerseSource {
    /// Fetch the verse at `chapter`.`verse`
    fn lookup(
        &self,
        chapter: u32,
        verse: u32,
    ) -> impl Future<Output = Result<Verse, FetchError>> + Send;
}
