//! Database module for `SQLite` storage (revealed verses, saved lessons)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use uuid::Uuid;

use crate::models::Lesson;
use crate::paths;
use crate::reveal::{REVEALED_VERSES_KEY, RevealStore};

/// Database connection wrapper
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create the database at the default location
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_path(&path)
    }

    /// Open or create the database at a specific path
    pub fn open_path(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let conn = Connection::open(path).context("Failed to open database")?;

        let db = Self { conn };
        db.init()?;

        Ok(db)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Get the default database path
    pub fn default_path() -> Result<PathBuf> {
        paths::database_path()
    }

    /// Initialize the database schema
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            -- Key-value application state
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            -- Saved lessons table
            CREATE TABLE IF NOT EXISTS lessons (
                id TEXT PRIMARY KEY,
                verse_number TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                transliteration TEXT NOT NULL,
                translation TEXT NOT NULL,
                application TEXT NOT NULL,
                created_at TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_lessons_saved_at ON lessons(saved_at);
            ",
        )?;

        Ok(())
    }

    // ==================== App State ====================

    /// Read a raw state value
    pub fn get_state(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Write a raw state value, replacing any previous one
    pub fn set_state(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO app_state (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    // ==================== Lessons ====================

    /// Save a lesson. Stamps `saved_at` if the lesson has none.
    pub fn save_lesson(&self, lesson: &Lesson) -> Result<Lesson> {
        let mut saved = lesson.clone();
        let saved_at = *saved.saved_at.get_or_insert_with(Utc::now);

        self.conn.execute(
            r"INSERT OR REPLACE INTO lessons
               (id, verse_number, title, content, transliteration, translation, application, created_at, saved_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                saved.id.to_string(),
                saved.verse_number,
                saved.title,
                saved.content,
                saved.transliteration,
                saved.translation,
                saved.application,
                saved.date.to_rfc3339(),
                saved_at.to_rfc3339(),
            ],
        )?;

        Ok(saved)
    }

    /// Get all saved lessons (oldest save first)
    pub fn get_lessons(&self) -> Result<Vec<Lesson>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, verse_number, title, content, transliteration, translation, application, created_at, saved_at
             FROM lessons ORDER BY saved_at ASC",
        )?;

        let lessons = stmt.query_map([], Self::row_to_lesson)?;
        lessons.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a lesson. Returns whether it existed.
    pub fn delete_lesson(&self, id: Uuid) -> Result<bool> {
        let count = self
            .conn
            .execute("DELETE FROM lessons WHERE id = ?1", params![id.to_string()])?;
        Ok(count > 0)
    }

    /// Helper to convert a row to `Lesson`
    fn row_to_lesson(row: &rusqlite::Row<'_>) -> rusqlite::Result<Lesson> {
        Ok(Lesson {
            id: parse_uuid(0, &row.get::<_, String>(0)?)?,
            verse_number: row.get(1)?,
            title: row.get(2)?,
            content: row.get(3)?,
            transliteration: row.get(4)?,
            translation: row.get(5)?,
            application: row.get(6)?,
            date: parse_timestamp(7, &row.get::<_, String>(7)?)?,
            saved_at: Some(parse_timestamp(8, &row.get::<_, String>(8)?)?),
        })
    }
}

impl RevealStore for Database {
    /// An unreadable stored list counts as empty; the next save overwrites it.
    fn load_revealed(&self) -> Result<HashSet<String>> {
        let Some(json) = self.get_state(REVEALED_VERSES_KEY)? else {
            return Ok(HashSet::new());
        };

        match serde_json::from_str::<Vec<String>>(&json) {
            Ok(verses) => Ok(verses.into_iter().collect()),
            Err(e) => {
                tracing::warn!("Ignoring corrupt revealed verse list: {e}");
                Ok(HashSet::new())
            }
        }
    }

    fn save_revealed(&self, revealed: &HashSet<String>) -> Result<()> {
        let mut verses: Vec<&String> = revealed.iter().collect();
        verses.sort();
        let json = serde_json::to_string(&verses)?;
        self.set_state(REVEALED_VERSES_KEY, &json)
            .context("Failed to save revealed verses")
    }
}

fn parse_uuid(column: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}
