//! Verse model

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A single scripture verse.
///
/// Identity is the verse number alone: two verses with the same number are
/// the same verse whatever their text fields hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verse {
    /// Chapter.verse identifier, e.g. "2.47"
    pub verse_number: String,
    /// Devanagari text
    pub sanskrit_text: String,
    /// Latin transliteration
    pub transliteration: String,
    /// Word-by-word meanings
    pub word_meanings: String,
    /// English translation
    pub translation: String,
    /// Commentary (purport)
    pub commentary: String,
}

impl Verse {
    /// Create a verse with only its number set
    pub fn with_number(verse_number: &str) -> Self {
        Self {
            verse_number: verse_number.to_string(),
            sanskrit_text: String::new(),
            transliteration: String::new(),
            word_meanings: String::new(),
            translation: String::new(),
            commentary: String::new(),
        }
    }

    /// Heading used when showing the verse
    pub fn title(&self) -> String {
        format!("Verse {}", self.verse_number)
    }
}

impl PartialEq for Verse {
    fn eq(&self, other: &Self) -> bool {
        self.verse_number == other.verse_number
    }
}

impl Eq for Verse {}

impl Hash for Verse {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.verse_number.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_is_verse_number() {
        let mut a = Verse::with_number("2.47");
        a.translation = "You have a right to perform your prescribed duty".to_string();
        let b = Verse::with_number("2.47");

        assert_eq!(a, b);

        let set: HashSet<Verse> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_different_numbers_differ() {
        assert_ne!(Verse::with_number("1.1"), Verse::with_number("1.10"));
    }
}
