// src/util/storage.rs
//! Non-volatile storage seam: a bounded byte region addressed by offset.
//!
//! Writes are staged and only become durable on [`NonVolatileStorage::commit`],
//! matching the begin/put/commit cycle of EEPROM emulation layers.

use std::sync::{Arc, Mutex};

use crate::error::{Result, WatcherError};

/// Region size used when nothing else is configured
pub const DEFAULT_REGION_SIZE: usize = 4096;

/// Value of bytes that have never been written (erased flash)
pub const ERASED_BYTE: u8 = 0xFF;

pub trait NonVolatileStorage {
    /// Size of the region in bytes
    fn capacity(&self) -> usize;

    /// Fill `buf` from the region starting at `offset`. Staged writes are visible.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()>;

    /// Stage `data` at `offset`
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()>;

    /// Make staged writes durable
    fn commit(&mut self) -> Result<()>;
}

pub(crate) fn check_bounds(offset: usize, len: usize, capacity: usize) -> Result<()> {
    match offset.checked_add(len) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(WatcherError::StorageOutOfBounds { offset, len, capacity }),
    }
}

#[derive(Debug)]
struct MemoryRegion {
    committed: Vec<u8>,
    staged: Option<Vec<u8>>,
}

/// In-RAM region. Clones share the same bytes, so several watchers can use
/// one region the way they would share an EEPROM.
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    region: Arc<Mutex<MemoryRegion>>,
    capacity: usize,
}

impl MemoryStorage {
    /// Virgin region of `capacity` erased bytes
    pub fn new(capacity: usize) -> Self {
        Self::from_bytes(vec![ERASED_BYTE; capacity])
    }

    /// Region with the given committed contents
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let capacity = bytes.len();
        Self {
            region: Arc::new(Mutex::new(MemoryRegion { committed: bytes, staged: None })),
            capacity,
        }
    }

    /// Copy of the committed bytes
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(self.lock()?.committed.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryRegion>> {
        self.region
            .lock()
            .map_err(|_| WatcherError::StorageUnavailable("memory region lock poisoned".into()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_SIZE)
    }
}

impl NonVolatileStorage for MemoryStorage {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        check_bounds(offset, buf.len(), self.capacity)?;
        let region = self.lock()?;
        let bytes = region.staged.as_ref().unwrap_or(&region.committed);
        buf.copy_from_slice(&bytes[offset..offset + buf.len()]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<()> {
        check_bounds(offset, data.len(), self.capacity)?;
        let mut region = self.lock()?;
        let MemoryRegion { committed, staged } = &mut *region;
        let staged = staged.get_or_insert_with(|| committed.clone());
        staged[offset..offset + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let mut region = self.lock()?;
        if let Some(staged) = region.staged.take() {
            region.committed = staged;
        }
        Ok(())
    }
}
