//! Bhagavad Gita content API client (RapidAPI)

use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::Verse;

use super::VerseSource;

/// Gita API client
pub struct GitaClient {
    client: Client,
    base_url: String,
    api_host: String,
    api_key: String,
}

impl GitaClient {
    /// Create a new client
    pub fn new(base_url: &str, api_host: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_host: api_host.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client from the configured endpoint
    pub fn from_config(config: &Config, api_key: &str) -> Self {
        Self::new(&config.api_base_url, &config.api_host, api_key)
    }

    /// Build the lookup URL for a verse
    fn verse_url(&self, chapter: u32, verse: u32) -> String {
        format!("{}/{chapter}/{verse}", self.base_url)
    }
}

impl VerseSource for GitaClient {
    async fn lookup(&self, chapter: u32, verse: u32) -> Result<Verse, FetchError> {
        let url = self.verse_url(chapter, verse);
        tracing::debug!("Requesting verse: {url}");

        let response = self
            .client
            .get(&url)
            .header("x-rapidapi-host", self.api_host.as_str())
            .header("x-rapidapi-key", self.api_key.as_str())
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if status.is_server_error() {
            return Err(FetchError::Network(format!("Gita API error {status}")));
        }
        if !status.is_success() {
            return Err(FetchError::Decode(format!(
                "No verse at {chapter}.{verse} (HTTP {status})"
            )));
        }

        parse_verse_payload(&body, chapter, verse)
    }
}

/// Decode a lookup response body.
///
/// The body is an object whose values are verse records; the first record wins.
pub fn parse_verse_payload(body: &[u8], chapter: u32, verse: u32) -> Result<Verse, FetchError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(FetchError::EmptyResponse { chapter, verse });
    }

    let records: BTreeMap<String, GitaVerseRecord> =
        serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    records
        .into_values()
        .next()
        .map(GitaVerseRecord::into_verse)
        .ok_or(FetchError::EmptyResponse { chapter, verse })
}

// ==================== API Types ====================

#[derive(Debug, Deserialize)]
struct GitaVerseRecord {
    #[serde(rename = "verseNumber")]
    verse_number: String,
    #[serde(rename = "sanskrit verse")]
    sanskrit_verse: String,
    #[serde(rename = "english transliteration")]
    english_transliteration: String,
    #[serde(rename = "word meanings")]
    word_meanings: String,
    translation: String,
    purport: String,
}

impl GitaVerseRecord {
    fn into_verse(self) -> Verse {
        Verse {
            verse_number: self.verse_number,
            sanskrit_text: self.sanskrit_verse,
            transliteration: self.english_transliteration,
            word_meanings: self.word_meanings,
            translation: self.translation,
            commentary: self.purport,
        }
    }
}
