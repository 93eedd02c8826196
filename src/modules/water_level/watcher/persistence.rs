use crate::error::Result;
use crate::modules::water_level::record::{WatcherRecord, RECORD_SIZE};
use crate::modules::water_level::watcher::WaterLevelWatcher;
use crate::util::storage::NonVolatileStorage;
use crate::{log_error, log_info};

impl<S: NonVolatileStorage, C> WaterLevelWatcher<S, C> {
    /// Restore the configuration record from storage.
    ///
    /// A record that was never saved comes back with no URL and no outlet.
    /// Storage errors are logged and leave the in-memory record untouched.
    pub fn load_data(&mut self) {
        match self.read_record() {
            Ok(mut record) => {
                record.normalize_unsaved();
                self.record = record;
                log_info!(
                    "[WaterLevelWatcher] url: {} outlet: {}",
                    self.record.url,
                    self.record.outlet
                );
            }
            Err(e) => {
                log_error!(
                    "[WaterLevelWatcher] Failed to load record at offset {}: {}",
                    self.storage_offset,
                    e
                );
            }
        }
    }

    /// Mark the record saved and write it to storage. Errors are logged only.
    pub fn save_data(&mut self) {
        log_info!("[WaterLevelWatcher] storage offset: {}", self.storage_offset);
        self.record.is_saved = true;

        if let Err(e) = self.write_record() {
            log_error!(
                "[WaterLevelWatcher] Failed to save record at offset {}: {}",
                self.storage_offset,
                e
            );
        }
    }

    fn read_record(&self) -> Result<WatcherRecord> {
        let mut bytes = [0u8; RECORD_SIZE];
        self.storage.read(self.storage_offset, &mut bytes)?;
        Ok(WatcherRecord::from_bytes(&bytes))
    }

    fn write_record(&mut self) -> Result<()> {
        let bytes = self.record.to_bytes();
        self.storage.write(self.storage_offset, &bytes)?;
        self.storage.commit()
    }
}
