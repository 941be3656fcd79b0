//! Saved lesson model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Verse;

/// A lesson the user kept from a revealed verse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique identifier
    pub id: Uuid,
    /// Verse the lesson was taken from
    pub verse_number: String,
    /// Heading (e.g. "Verse 2.47")
    pub title: String,
    /// Original text
    pub content: String,
    /// Transliteration
    pub transliteration: String,
    /// Translation
    pub translation: String,
    /// How the verse applies (taken from the commentary)
    pub application: String,
    /// When the lesson was created
    pub date: DateTime<Utc>,
    /// When the lesson was saved, if it has been
    pub saved_at: Option<DateTime<Utc>>,
}

impl Lesson {
    /// Build an unsaved lesson from a verse
    pub fn from_verse(verse: &Verse) -> Self {
        Self {
            id: Uuid::new_v4(),
            verse_number: verse.verse_number.clone(),
            title: verse.title(),
            content: verse.sanskrit_text.clone(),
            transliteration: verse.transliteration.clone(),
            translation: verse.translation.clone(),
            application: verse.commentary.clone(),
            date: Utc::now(),
            saved_at: None,
        }
    }

    /// Date to show in lists: the save time, or creation time if never saved
    pub fn display_date(&self) -> DateTime<Utc> {
        self.saved_at.unwrap_or(self.date)
    }
}
