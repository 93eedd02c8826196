// src/util/database.rs
// SQLite-backed non-volatile region

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{Result, WatcherError};
use crate::{log_info, log_warn};
use crate::util::storage::{check_bounds, NonVolatileStorage, ERASED_BYTE};

/// One storage region persisted as a single blob row.
///
/// Clones share the connection and the staged bytes.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    staged: Arc<Mutex<Option<Vec<u8>>>>,
    region_size: usize,
}

// Manual Debug implementation since Mutex<Connection> doesn't implement Debug
impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("conn", &"Arc<Mutex<Connection>>")
            .field("region_size", &self.region_size)
            .finish()
    }
}

impl Database {
    pub fn open(path: &Path, region_size: usize) -> Result<Self> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir)?;
            }
        }

        Self::with_connection(Connection::open(path)?, region_size)
    }

    pub fn open_in_memory(region_size: usize) -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?, region_size)
    }

    fn with_connection(conn: Connection, region_size: usize) -> Result<Self> {
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
            staged: Arc::new(Mutex::new(None)),
            region_size,
        };

        db.init_schema()?;

        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS nvs_region (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data BLOB NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        let existing: Option<Vec<u8>> = conn
            .query_row("SELECT data FROM nvs_region WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        match existing {
            None => {
                conn.execute(
                    "INSERT INTO nvs_region (id, data, updated_at) VALUES (1, ?1, ?2)",
                    params![vec![ERASED_BYTE; self.region_size], chrono::Utc::now().timestamp()],
                )?;
                log_info!("Initialized storage region of {} bytes", self.region_size);
            }
            Some(data) if data.len() < self.region_size => {
                let mut grown = data;
                grown.resize(self.region_size, ERASED_BYTE);
                conn.execute(
                    "UPDATE nvs_region SET data = ?1, updated_at = ?2 WHERE id = 1",
                    params![grown, chrono::Utc::now().timestamp()],
                )?;
                log_info!("Grew storage region to {} bytes", self.region_size);
            }
            Some(data) if data.len() > self.region_size => {
                // Stored bytes past region_size stay untouched; access is bounded
                log_warn!(
                    "Stored region is {} bytes, using the first {} only",
                    data.len(),
                    self.region_size
                );
            }
            Some(_) => {}
        }

        Ok(())
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| WatcherError::StorageUnavailable("database connection lock poisoned".into()))
    }

    fn lock_staged(&self) -> Result<MutexGuard<'_, Option<Vec<u8>>>> {
        self.staged
            .lock()
            .map_err(|_| WatcherError::StorageUnavailable("staged region lock poisoned".into()))
    }

    fn load_region(&self) -> Result<Vec<u8>> {
        let conn = self.lock_conn()?;
        let data: Vec<u8> =
            conn.query_row("SELECT data FROM nvs_region WHERE id = 1", [], |row| row.get(0))?;
        Ok(data)
    }

    /// Seconds since epoch of the last commit
    pub fn last_commit(&self) -> Result<i64> {
        let conn = self.lock_conn()?;
        Ok(conn.query_row("SELECT updated_at FROM nvs_region WHERE id = 1", [], |row| row.get(0))?)
    }
}

impl NonVolatileStorage for Database {
    fn capacity(&self) -> usize {
        self.region_size
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        check_bounds(offset, buf.len(), self.region_size)?;

        let staged = self.lock_staged()?;
        match staged.as_ref() {
            Some(bytes) => buf.copy_from_slice(&bytes[offset..offset + buf.len()]),
            None => {
                let bytes = self.load_region()?;
                buf.copy_from_slice(&bytes[offset..offset + buf.len()]);
            }
        }

        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_bounds(offset, data.len(), self.region_size)?;

        let mut staged = self.lock_staged()?;
        if staged.is_none() {
            *staged = Some(self.load_region()?);
        }
        if let Some(bytes) = staged.as_mut() {
            bytes[offset..offset + data.len()].copy_from_slice(data);
        }

        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let mut staged = self.lock_staged()?;
        let Some(bytes) = staged.as_ref() else {
            return Ok(());
        };

        {
            let conn = self.lock_conn()?;
            conn.execute(
                "UPDATE nvs_region SET data = ?1, updated_at = ?2 WHERE id = 1",
                params![bytes, chrono::Utc::now().timestamp()],
            )?;
        }

        *staged = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_region_is_erased() {
        let db = Database::open_in_memory(64).unwrap();
        let mut buf = [0u8; 8];
        db.read(56, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE; 8]);
    }

    #[test]
    fn test_commit_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db").join("region.db");

        {
            let mut db = Database::open(&path, 32).unwrap();
            db.write(4, b"abc").unwrap();
            db.commit().unwrap();
        }

        let db = Database::open(&path, 32).unwrap();
        let mut buf = [0u8; 3];
        db.read(4, &mut buf).unwrap();
        assert_eq!(&buf, b"abc");
    }

    #[test]
    fn test_uncommitted_writes_are_lost_on_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.db");

        {
            let mut db = Database::open(&path, 32).unwrap();
            db.write(0, b"xyz").unwrap();
        }

        let db = Database::open(&path, 32).unwrap();
        let mut buf = [0u8; 3];
        db.read(0, &mut buf).unwrap();
        assert_eq!(buf, [ERASED_BYTE; 3]);
    }

    #[test]
    fn test_reopen_with_larger_region_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.db");

        {
            let mut db = Database::open(&path, 8).unwrap();
            db.write(0, &[1, 2]).unwrap();
            db.commit().unwrap();
        }

        let db = Database::open(&path, 16).unwrap();
        let mut buf = [0u8; 16];
        db.read(0, &mut buf).unwrap();
        assert_eq!(&buf[..2], &[1, 2]);
        assert_eq!(&buf[8..], &[ERASED_BYTE; 8]);
    }

    #[test]
    fn test_reopen_with_smaller_region_keeps_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.db");

        {
            let mut db = Database::open(&path, 32).unwrap();
            db.write(24, b"tail").unwrap();
            db.commit().unwrap();
        }

        {
            let mut db = Database::open(&path, 16).unwrap();
            assert_eq!(db.capacity(), 16);
            assert!(matches!(
                db.write(24, b"x"),
                Err(WatcherError::StorageOutOfBounds { .. })
            ));
            db.write(0, b"head").unwrap();
            db.commit().unwrap();
        }

        let db = Database::open(&path, 32).unwrap();
        let mut buf = [0u8; 4];
        db.read(0, &mut buf).unwrap();
        assert_eq!(&buf, b"head");
        db.read(24, &mut buf).unwrap();
        assert_eq!(&buf, b"tail");
    }

    #[test]
    fn test_out_of_bounds() {
        let mut db = Database::open_in_memory(16).unwrap();
        assert!(matches!(
            db.write(15, &[0, 0]),
            Err(WatcherError::StorageOutOfBounds { .. })
        ));
    }
}
