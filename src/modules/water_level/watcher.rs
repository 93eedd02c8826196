// src/modules/water_level/watcher.rs
mod persistence;
mod watch;

use crate::error::Result;
use crate::log_debug;
use crate::modules::sensor_state::WaterLevelState;
use crate::modules::water_level::record::{Url, WatcherRecord};
use crate::util::string::BoundedString;

pub const DEVICE_NAME_CAPACITY: usize = 31;

pub type DeviceName = BoundedString<DEVICE_NAME_CAPACITY>;

/// Polls a sensor endpoint and tracks the water level it reports.
///
/// Not re-entrant: callers must not run `watch` concurrently on one instance.
#[derive(Debug)]
pub struct WaterLevelWatcher<S, C> {
    record: WatcherRecord,
    device_name: DeviceName,
    state: WaterLevelState,
    changed: bool,
    storage_offset: usize,
    storage: S,
    client: C,
}

impl<S, C> WaterLevelWatcher<S, C> {
    pub fn new(storage: S, client: C) -> Self {
        Self {
            record: WatcherRecord::default(),
            device_name: DeviceName::default(),
            state: WaterLevelState::None,
            changed: false,
            storage_offset: 0,
            storage,
            client,
        }
    }

    pub fn power(&self) -> bool {
        self.record.power
    }

    pub fn set_power(&mut self, power: bool) {
        self.record.power = power;
    }

    pub fn is_water_level_changed(&self) -> bool {
        self.changed
    }

    pub fn storage_offset(&self) -> usize {
        self.storage_offset
    }

    pub fn set_storage_offset(&mut self, offset: usize) {
        self.storage_offset = offset;
    }

    pub fn url(&self) -> &str {
        self.record.url.as_str()
    }

    /// Replace the URL. Rejects values over 127 bytes, keeping the old one.
    pub fn set_url(&mut self, url: &str) -> Result<()> {
        self.record.url = Url::new(url)?;
        Ok(())
    }

    pub fn outlet(&self) -> i32 {
        self.record.outlet
    }

    pub fn set_outlet(&mut self, outlet: i32) {
        self.record.outlet = outlet;
    }

    pub fn device_name(&self) -> &str {
        self.device_name.as_str()
    }

    pub fn set_device_name(&mut self, device_name: &str) -> Result<()> {
        self.device_name = DeviceName::new(device_name)?;
        Ok(())
    }

    pub fn state(&self) -> WaterLevelState {
        log_debug!("[WaterLevelWatcher] state: {}", self.state);
        self.state
    }

    pub fn record(&self) -> &WatcherRecord {
        &self.record
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WatcherError;
    use crate::modules::water_level::record::UNASSIGNED_OUTLET;

    fn watcher() -> WaterLevelWatcher<(), ()> {
        WaterLevelWatcher::new((), ())
    }

    #[test]
    fn test_initial_state() {
        let w = watcher();
        assert_eq!(w.state(), WaterLevelState::None);
        assert!(!w.is_water_level_changed());
        assert!(!w.power());
        assert_eq!(w.url(), "");
        assert_eq!(w.outlet(), UNASSIGNED_OUTLET);
        assert_eq!(w.storage_offset(), 0);
    }

    #[test]
    fn test_set_url_rejects_oversized_value() {
        let mut w = watcher();
        w.set_url("http://x/y").unwrap();

        let long = format!("http://{}", "a".repeat(121));
        assert_eq!(long.len(), 128);
        assert!(matches!(
            w.set_url(&long),
            Err(WatcherError::LengthExceeded { len: 128, capacity: 127 })
        ));
        assert_eq!(w.url(), "http://x/y");

        let max = format!("http://{}", "a".repeat(120));
        w.set_url(&max).unwrap();
        assert_eq!(w.url(), max);
    }

    #[test]
    fn test_set_url_replaces_whole_value() {
        let mut w = watcher();
        w.set_url("http://long.example/sensor/state").unwrap();
        w.set_url("http://x").unwrap();
        assert_eq!(w.url(), "http://x");
    }

    #[test]
    fn test_device_name() {
        let mut w = watcher();
        w.set_device_name("pump").unwrap();
        assert_eq!(w.device_name(), "pump");
        assert!(w.set_device_name(&"n".repeat(32)).is_err());
        assert_eq!(w.device_name(), "pump");
    }
}
