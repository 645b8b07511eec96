//! Library database using SQLite

use crate::entry::{EntryStatus, LibraryEntry, NewEntry};
use crate::LibraryError;
use gameshelf_catalog::CatalogItem;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;

const ENTRY_SELECT: &str = r#"
    SELECT e.id, e.user_id, e.game_id, e.platform, e.status, e.rating, e.notes, e.created_at,
           g.name AS game_name, g.slug AS game_slug, g.summary AS game_summary,
           g.release_date AS game_release_date, g.cover_url AS game_cover_url,
           g.platforms AS game_platforms, g.genres AS game_genres
    FROM game_entries e
    JOIN games g ON g.id = e.game_id
"#;

/// Library database manager
pub struct LibraryDatabase {
    conn: Connection,
}

impl LibraryDatabase {
    /// Open or create a database
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let conn = Connection::open(path)?;

        let db = Self { conn };
        db.init_schema()?;

        Ok(db)
    }

    /// Create an in-memory database (for testing)
    pub fn in_memory() -> Result<Self, LibraryError> {
        let conn = Connection::open_in_memory()?;

        let db = Self { conn };
        db.init_schema()?;

        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<(), LibraryError> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS games (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                slug TEXT,
                summary TEXT,
                release_date TEXT,
                cover_url TEXT,
                platforms TEXT NOT NULL DEFAULT '[]',
                genres TEXT NOT NULL DEFAULT '[]',
                created_at TEXT DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS game_entries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                game_id INTEGER NOT NULL,
                platform TEXT,
                status TEXT NOT NULL DEFAULT 'OWNED',
                rating INTEGER,
                notes TEXT,
                created_at TEXT NOT NULL,
                FOREIGN KEY (game_id) REFERENCES games(id)
            );

            CREATE INDEX IF NOT EXISTS idx_game_entries_user ON game_entries(user_id);
            CREATE INDEX IF NOT EXISTS idx_game_entries_game ON game_entries(game_id);
        "#,
        )?;

        Ok(())
    }

    /// Insert or refresh the cached copy of a catalog game
    pub fn upsert_game(&self, game: &CatalogItem) -> Result<(), LibraryError> {
        Self::upsert_game_on(&self.conn, game)
    }

    /// Get a cached game by catalog id
    pub fn get_game(&self, id: i64) -> Result<Option<CatalogItem>, LibraryError> {
        let game = self
            .conn
            .query_row(
                "SELECT id, name, slug, summary, release_date, cover_url, platforms, genres
                 FROM games WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CatalogItem {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        slug: row.get("slug")?,
                        summary: row.get("summary")?,
                        release_date: row.get("release_date")?,
                        cover_url: row.get("cover_url")?,
                        platforms: json_list(row, "platforms")?,
                        genres: json_list(row, "genres")?,
                    })
                },
            )
            .optional()?;

        Ok(game)
    }

    /// Insert a library entry for an already cached game
    pub fn insert_entry(&self, entry: &NewEntry) -> Result<(), LibraryError> {
        Self::insert_entry_on(&self.conn, entry)
    }

    /// Cache the game and create the entry in one transaction
    pub fn record_entry(
        &mut self,
        game: &CatalogItem,
        entry: &NewEntry,
    ) -> Result<LibraryEntry, LibraryError> {
        let tx = self.conn.transaction()?;
        Self::upsert_game_on(&tx, game)?;
        Self::insert_entry_on(&tx, entry)?;
        tx.commit()?;

        self.get_entry(&entry.id)?.ok_or_else(|| {
            LibraryError::Database(format!("entry {} missing after insert", entry.id))
        })
    }

    /// Get an entry by id
    pub fn get_entry(&self, id: &str) -> Result<Option<LibraryEntry>, LibraryError> {
        let sql = format!("{} WHERE e.id = ?1", ENTRY_SELECT);
        let entry = self
            .conn
            .query_row(&sql, params![id], Self::row_to_entry)
            .optional()?;

        Ok(entry)
    }

    /// All entries of a user, newest first
    pub fn entries_for_user(&self, user_id: &str) -> Result<Vec<LibraryEntry>, LibraryError> {
        let sql = format!(
            "{} WHERE e.user_id = ?1 ORDER BY e.created_at DESC, e.rowid DESC",
            ENTRY_SELECT
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let entries = stmt
            .query_map(params![user_id], Self::row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete an entry if it belongs to `user_id`; returns the rows removed
    pub fn delete_entry(&self, user_id: &str, entry_id: &str) -> Result<usize, LibraryError> {
        let removed = self.conn.execute(
            "DELETE FROM game_entries WHERE id = ?1 AND user_id = ?2",
            params![entry_id, user_id],
        )?;
        Ok(removed)
    }

    /// Number of entries owned by a user
    pub fn entry_count(&self, user_id: &str) -> Result<i64, LibraryError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM game_entries WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Number of cached games
    pub fn game_count(&self) -> Result<i64, LibraryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM games", [], |row| row.get(0))?;
        Ok(count)
    }

    fn upsert_game_on(conn: &Connection, game: &CatalogItem) -> Result<(), LibraryError> {
        conn.execute(
            r#"INSERT INTO games
               (id, name, slug, summary, release_date, cover_url, platforms, genres)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
               ON CONFLICT(id) DO UPDATE SET
                   name = excluded.name,
                   slug = excluded.slug,
                   summary = excluded.summary,
                   release_date = excluded.release_date,
                   cover_url = excluded.cover_url,
                   platforms = excluded.platforms,
                   genres = excluded.genres,
                   updated_at = CURRENT_TIMESTAMP"#,
            params![
                game.id,
                game.name,
                game.slug,
                game.summary,
                game.release_date,
                game.cover_url,
                serde_json::to_string(&game.platforms)?,
                serde_json::to_string(&game.genres)?,
            ],
        )?;
        Ok(())
    }

    fn insert_entry_on(conn: &Connection, entry: &NewEntry) -> Result<(), LibraryError> {
        conn.execute(
            r#"INSERT INTO game_entries
               (id, user_id, game_id, platform, status, rating, notes, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                entry.id,
                entry.user_id,
                entry.game_id,
                entry.platform,
                entry.status.as_str(),
                entry.rating,
                entry.notes,
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    /// Convert a joined row to a LibraryEntry
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<LibraryEntry> {
        let status: String = row.get("status")?;
        let status = status.parse::<EntryStatus>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(4, Type::Text, e.into())
        })?;
        let game_id: i64 = row.get("game_id")?;

        Ok(LibraryEntry {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            game_id,
            platform: row.get("platform")?,
            status,
            rating: row.get("rating")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            game: CatalogItem {
                id: game_id,
                name: row.get("game_name")?,
                slug: row.get("game_slug")?,
                summary: row.get("game_summary")?,
                release_date: row.get("game_release_date")?,
                cover_url: row.get("game_cover_url")?,
                platforms: json_list(row, "game_platforms")?,
                genres: json_list(row, "game_genres")?,
            },
        })
    }
}

/// Decode a JSON string-array column
fn json_list(row: &rusqlite::Row, column: &str) -> rusqlite::Result<Vec<String>> {
    let raw: String = row.get(column)?;
    serde_json::from_str(&raw).map_err(|e| {
        let index = row.as_ref().column_index(column).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
    })
}
