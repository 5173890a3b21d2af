//! Store persistence over a single key-value slot.
//!
//! # Responsibility
//! - Read and write the whole store document as JSON text.
//! - Detect and migrate legacy documents on load.
//!
//! # Invariants
//! - Saves overwrite the full snapshot; there is no partial write.
//! - A malformed document is reported as [`StoreError::Parse`], never
//!   repaired or replaced.

use super::legacy::{is_legacy_document, migrate_legacy, LegacyDocument};
use crate::db::DbError;
use crate::logging::error_chain;
use crate::model::ids::LeagueId;
use crate::model::store::Store;
use log::{info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized store.
pub const DB_KEY: &str = "badminton_leagues_db";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Persisted document is not valid store JSON.
    Parse(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(_) => write!(f, "league storage failed"),
            Self::Parse(_) => write!(f, "persisted league data is malformed"),
            Self::Encode(_) => write!(f, "failed to encode league data"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Parse(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Raw access to the persisted document slot.
pub trait StoreRepository {
    fn load_document(&self) -> StoreResult<Option<String>>;
    fn save_document(&self, document: &str) -> StoreResult<()>;
}

impl<R: StoreRepository + ?Sized> StoreRepository for &R {
    fn load_document(&self) -> StoreResult<Option<String>> {
        (**self).load_document()
    }

    fn save_document(&self, document: &str) -> StoreResult<()> {
        (**self).save_document(document)
    }
}

/// SQLite-backed slot stored in the `kv_store` table.
pub struct SqliteStoreRepository<'conn> {
    conn: &'conn Connection,
    key: String,
}

impl<'conn> SqliteStoreRepository<'conn> {
    /// Uses the default [`DB_KEY`] slot.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_key(conn, DB_KEY)
    }

    pub fn with_key(conn: &'conn Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }
}

impl StoreRepository for SqliteStoreRepository<'_> {
    fn load_document(&self) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                params![self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save_document(&self, document: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), document],
        )?;
        Ok(())
    }
}

/// Result of [`load_store`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedStore {
    pub store: Store,
    /// Set when a legacy document was migrated (and re-saved) during load.
    pub migrated_from_legacy: bool,
}

/// Decodes persisted JSON, migrating the legacy layout when detected.
///
/// Returns the store and whether migration happened.
pub fn decode_store(document: &str) -> StoreResult<(Store, bool)> {
    let mut value: Value = serde_json::from_str(document).map_err(StoreError::Parse)?;

    if is_legacy_document(&value) {
        let legacy: LegacyDocument = serde_json::from_value(value).map_err(StoreError::Parse)?;
        return Ok((migrate_legacy(legacy, LeagueId::generate()), true));
    }

    if let Some(object) = value.as_object_mut() {
        if object.get("leagues").is_some_and(Value::is_null) {
            object.remove("leagues");
        }
    }
    let store = serde_json::from_value(value).map_err(StoreError::Parse)?;
    Ok((store, false))
}

pub fn encode_store(store: &Store) -> StoreResult<String> {
    serde_json::to_string(store).map_err(StoreError::Encode)
}

/// Loads the store from its slot.
///
/// An empty or blank slot yields an empty store. A migrated legacy document
/// is saved back in the current layout before returning.
///
/// # Errors
/// - [`StoreError::Parse`] for a malformed document; callers treat it as fatal.
/// - [`StoreError::Db`] when the slot cannot be read or the migrated
///   document cannot be written.
pub fn load_store<R: StoreRepository>(repo: &R) -> StoreResult<LoadedStore> {
    let document = repo
        .load_document()?
        .filter(|document| !document.trim().is_empty());
    let Some(document) = document else {
        info!("event=store_load module=repo status=ok source=empty");
        return Ok(LoadedStore {
            store: Store::default(),
            migrated_from_legacy: false,
        });
    };

    let (store, migrated) = match decode_store(document.as_str()) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(
                "event=store_load module=repo status=error error_code=parse_failed error={}",
                error_chain(&err)
            );
            return Err(err);
        }
    };

    if migrated {
        save_store(repo, &store)?;
        info!(
            "event=store_migrate module=repo status=ok source=legacy leagues={}",
            store.leagues.len()
        );
    }

    info!(
        "event=store_load module=repo status=ok source=slot leagues={} has_active={}",
        store.leagues.len(),
        store.active_league().is_some()
    );
    Ok(LoadedStore {
        store,
        migrated_from_legacy: migrated,
    })
}

/// Writes the full store snapshot to its slot.
pub fn save_store<R: StoreRepository>(repo: &R, store: &Store) -> StoreResult<()> {
    let document = encode_store(store)?;
    repo.save_document(document.as_str())
}
