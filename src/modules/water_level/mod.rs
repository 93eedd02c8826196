pub mod classify;
pub mod record;
pub mod watcher;

pub use record::{WatcherRecord, RECORD_SIZE, UNASSIGNED_OUTLET, URL_CAPACITY};
pub use watcher::{WaterLevelWatcher, DEVICE_NAME_CAPACITY};
