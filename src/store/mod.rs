//! SQLite-backed market store.
//!
//! One database file holds catalog, users, sales and daily stats, so the
//! store can join across them and enforce cross-domain constraints (the
//! duplicate-purchase guard, sold songs surviving deletion) in the database
//! itself. A single write connection is shared behind a mutex; reads go
//! through a small round-robin pool of read-only connections.

mod catalog;
mod ledger;
mod schema;
mod users;

use crate::sqlite_persistence::migrate_to_latest;
use anyhow::{Context, Result};
use rusqlite::Connection;
use schema::MARKET_VERSIONED_SCHEMAS;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub struct SqliteMarketStore {
    write_conn: Arc<Mutex<Connection>>,
    read_pool: Vec<Arc<Mutex<Connection>>>,
    read_index: Arc<AtomicUsize>,
}

impl SqliteMarketStore {
    /// Opens (creating and migrating as needed) the market database at
    /// `db_path` with `read_pool_size` read-only connections.
    pub fn open<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open market database")?;

        migrate_to_latest(&mut write_conn, MARKET_VERSIONED_SCHEMAS)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        let song_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM songs", [], |r| r.get(0))
            .unwrap_or(0);
        let user_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))
            .unwrap_or(0);
        let sale_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM sales", [], |r| r.get(0))
            .unwrap_or(0);
        info!(
            "Opened market db: {} songs, {} users, {} sales",
            song_count, user_count, sale_count
        );

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteMarketStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub(crate) fn write_conn(&self) -> Arc<Mutex<Connection>> {
        self.write_conn.clone()
    }

    pub(crate) fn read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SqliteMarketStore;
    use crate::catalog::{CatalogStore, Genre, NewSong, Song};
    use crate::error::EntityId;
    use crate::user::{UserAccount, UserDraft, UserRole, UserStore};
    use tempfile::TempDir;

    pub fn create_tmp_store() -> (SqliteMarketStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqliteMarketStore::open(temp_dir.path().join("market.db"), 2).unwrap();
        (store, temp_dir)
    }

    pub fn seed_artist(store: &SqliteMarketStore, name: &str) -> UserAccount {
        let user = store
            .create_user(UserDraft {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                role: UserRole::Artist,
            })
            .unwrap();
        store.set_verified(user.id, true).unwrap();
        store.get_user(user.id).unwrap().unwrap()
    }

    pub fn seed_listener(store: &SqliteMarketStore, name: &str) -> UserAccount {
        store
            .create_user(UserDraft {
                full_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                role: UserRole::Listener,
            })
            .unwrap()
    }

    pub fn seed_genre(store: &SqliteMarketStore, name: &str) -> Genre {
        store.create_genre(name).unwrap()
    }

    pub fn seed_song(
        store: &SqliteMarketStore,
        title: &str,
        artist_ids: Vec<EntityId>,
        genre_id: EntityId,
    ) -> Song {
        store
            .create_song(NewSong {
                title: title.to_string(),
                artist_ids,
                album_id: None,
                genre_id,
                duration_secs: 200,
                price: 0.99,
                free_download: false,
                is_published: true,
                cover_image_url: None,
                audio_url: format!("audio/{title}"),
                audio_url_high: None,
            })
            .unwrap()
    }
}
