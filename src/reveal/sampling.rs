//! Chapter/verse sampling

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of chapters in the Bhagavad Gita
pub const CHAPTER_COUNT: u32 = 18;

/// Upper bound used by flat sampling for every chapter
pub const FLAT_VERSE_BOUND: u32 = 78;

/// Verses per chapter in the As It Is edition the content API serves, chapter 1 first
pub const CHAPTER_VERSE_COUNTS: [u32; CHAPTER_COUNT as usize] = [
    46, 72, 43, 42, 29, 47, 30, 28, 34, 42, 55, 20, 35, 27, 20, 24, 28, 78,
];

/// Total number of verses
pub const TOTAL_VERSES: usize = 700;

/// A (chapter, verse) pair to request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VerseRef {
    /// Chapter, starting at 1
    pub chapter: u32,
    /// Verse index within the chapter, starting at 1
    pub verse: u32,
}

impl std::fmt::Display for VerseRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.chapter, self.verse)
    }
}

/// How random verse pairs are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sampling {
    /// Any chapter, verse 1..=78 regardless of chapter length.
    /// Short chapters can produce pairs that do not exist.
    #[default]
    Flat,
    /// Verse drawn within the real length of the chosen chapter
    ChapterTable,
}

impl Sampling {
    /// Draw one pair
    pub fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> VerseRef {
        let chapter = rng.random_range(1..=CHAPTER_COUNT);
        let bound = match self {
            Self::Flat => FLAT_VERSE_BOUND,
            Self::ChapterTable => verses_in_chapter(chapter).unwrap_or(FLAT_VERSE_BOUND),
        };

        VerseRef {
            chapter,
            verse: rng.random_range(1..=bound),
        }
    }
}

/// Number of verses in a chapter, `None` outside 1..=18
pub fn verses_in_chapter(chapter: u32) -> Option<u32> {
    let index = chapter.checked_sub(1)? as usize;
    CHAPTER_VERSE_COUNTS.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_table_sums_to_total() {
        let sum: u32 = CHAPTER_VERSE_COUNTS.iter().sum();
        assert_eq!(sum as usize, TOTAL_VERSES);
    }

    #[test]
    fn test_verses_in_chapter_bounds() {
        assert_eq!(verses_in_chapter(0), None);
        assert_eq!(verses_in_chapter(1), Some(46));
        assert_eq!(verses_in_chapter(13), Some(35));
        assert_eq!(verses_in_chapter(18), Some(78));
        assert_eq!(verses_in_chapter(19), None);
    }

    #[test]
    fn test_flat_draws_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let at = Sampling::Flat.draw(&mut rng);
            assert!((1..=CHAPTER_COUNT).contains(&at.chapter));
            assert!((1..=FLAT_VERSE_BOUND).contains(&at.verse));
        }
    }

    #[test]
    fn test_chapter_table_draws_exist() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..2_000 {
            let at = Sampling::ChapterTable.draw(&mut rng);
            let len = verses_in_chapter(at.chapter).unwrap();
            assert!((1..=len).contains(&at.verse), "{at} out of range");
        }
    }
}
