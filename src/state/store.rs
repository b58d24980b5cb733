use rusqlite::{Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::emoji::RecencyList;

/// Settings key holding the recency list as a JSON array of glyphs
pub const RECENT_EMOJIS_KEY: &str = "recentEmojis";

/// Errors raised by the persisted client state
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("could not create data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed stored value for {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The Store manages the small SQLite database of client settings.
/// Only the recency list lives here; everything else is session-scoped.
pub struct Store {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Store {
    /// Open (or create) the store at `db_path`.
    ///
    /// Parent directories are created as needed.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(db_path)?;
        info!("📁 Settings store opened at: {}", db_path.display());

        let store = Store {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// A throwaway store that lives for the session only
    pub fn in_memory() -> Result<Self, StoreError> {
        let store = Store {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Default location of the store:
    /// - Linux: ~/.local/share/emoji-face/emoji_face.db
    /// - macOS: ~/Library/Application Support/emoji-face/emoji_face.db
    /// - Windows: %APPDATA%\emoji-face\emoji_face.db
    ///
    /// Returns None when neither a data nor a home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("emoji-face");
        path.push("emoji_face.db");
        Some(path)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key     TEXT PRIMARY KEY,
                value   TEXT NOT NULL
            )",
            [],
        )?;
        debug!("Settings schema initialized");
        Ok(())
    }

    /// Path of the database file, None for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Read a raw setting
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Insert or replace a raw setting
    pub fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// Load the recency list, empty when nothing was stored yet
    pub fn load_recent_emojis(&self) -> Result<RecencyList, StoreError> {
        let Some(raw) = self.get(RECENT_EMOJIS_KEY)? else {
            return Ok(RecencyList::new());
        };

        let glyphs: Vec<String> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
                key: RECENT_EMOJIS_KEY.to_string(),
                source,
            })?;
        Ok(RecencyList::from_glyphs(glyphs))
    }

    /// Persist the recency list
    pub fn save_recent_emojis(&self, list: &RecencyList) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&list.glyphs()).map_err(|source| StoreError::Malformed {
            key: RECENT_EMOJIS_KEY.to_string(),
            source,
        })?;
        self.put(RECENT_EMOJIS_KEY, &raw)
    }
}

// `Connection` is not Debug
impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("db_path", &self.db_path)
            .finish()
    }
}
