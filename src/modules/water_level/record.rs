// src/modules/water_level/record.rs
//! Persisted watcher configuration and its fixed byte layout.
//!
//! ```text
//! offset  size  field
//!      0     1  is_saved   (1 = saved)
//!      1     1  power      (1 = enabled)
//!      2   128  url        (NUL-terminated)
//!    130     2  padding
//!    132     4  outlet     (i32, little endian)
//! ```

use crate::util::string::BoundedString;

pub const URL_CAPACITY: usize = 127;
pub const UNASSIGNED_OUTLET: i32 = -1;

pub type Url = BoundedString<URL_CAPACITY>;

const IS_SAVED_AT: usize = 0;
const POWER_AT: usize = 1;
const URL_AT: usize = 2;
const OUTLET_AT: usize = 132;

pub const RECORD_SIZE: usize = 136;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatcherRecord {
    pub is_saved: bool,
    pub power: bool,
    pub url: Url,
    pub outlet: i32,
}

impl Default for WatcherRecord {
    fn default() -> Self {
        Self {
            is_saved: false,
            power: false,
            url: Url::default(),
            outlet: UNASSIGNED_OUTLET,
        }
    }
}

impl WatcherRecord {
    /// Whether `watch` has everything it needs to poll
    pub fn is_ready(&self) -> bool {
        self.power && !self.url.is_empty() && self.outlet != UNASSIGNED_OUTLET
    }

    /// Reset the fields that must not be trusted from unwritten storage
    pub fn normalize_unsaved(&mut self) {
        if !self.is_saved {
            self.url.clear();
            self.outlet = UNASSIGNED_OUTLET;
        }
    }

    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[IS_SAVED_AT] = u8::from(self.is_saved);
        bytes[POWER_AT] = u8::from(self.power);
        self.url.encode_into(&mut bytes[URL_AT..URL_AT + Url::SLOT_SIZE]);
        bytes[OUTLET_AT..OUTLET_AT + 4].copy_from_slice(&self.outlet.to_le_bytes());
        bytes
    }

    /// Decode raw bytes as found in storage. Flags count only when exactly `1`;
    /// a URL that is not UTF-8 decodes as empty.
    pub fn from_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let mut outlet = [0u8; 4];
        outlet.copy_from_slice(&bytes[OUTLET_AT..OUTLET_AT + 4]);

        Self {
            is_saved: bytes[IS_SAVED_AT] == 1,
            power: bytes[POWER_AT] == 1,
            url: Url::decode(&bytes[URL_AT..URL_AT + Url::SLOT_SIZE]).unwrap_or_default(),
            outlet: i32::from_le_bytes(outlet),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_stable() {
        let record = WatcherRecord {
            is_saved: true,
            power: true,
            url: Url::new("http://x/y").unwrap(),
            outlet: 3,
        };

        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), 136);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[1], 1);
        assert_eq!(&bytes[2..12], b"http://x/y");
        assert!(bytes[12..132].iter().all(|b| *b == 0));
        assert_eq!(&bytes[132..136], &[3, 0, 0, 0]);
        assert_eq!(WatcherRecord::from_bytes(&bytes), record);
    }

    #[test]
    fn test_negative_outlet_encoding() {
        let record = WatcherRecord::default();
        let bytes = record.to_bytes();
        assert_eq!(&bytes[132..136], &[0xFF; 4]);
        assert_eq!(WatcherRecord::from_bytes(&bytes).outlet, UNASSIGNED_OUTLET);
    }

    #[test]
    fn test_erased_bytes_are_not_saved() {
        let record = WatcherRecord::from_bytes(&[0xFF; RECORD_SIZE]);
        assert!(!record.is_saved);
        assert!(!record.power);
        assert!(record.url.is_empty());
    }

    #[test]
    fn test_normalize_unsaved() {
        let mut bytes = [0u8; RECORD_SIZE];
        bytes[2..8].copy_from_slice(b"garbag");
        bytes[132..136].copy_from_slice(&9i32.to_le_bytes());

        let mut record = WatcherRecord::from_bytes(&bytes);
        assert_eq!(record.url.as_str(), "garbag");
        record.normalize_unsaved();
        assert!(record.url.is_empty());
        assert_eq!(record.outlet, UNASSIGNED_OUTLET);
    }

    #[test]
    fn test_is_ready() {
        let mut record = WatcherRecord {
            is_saved: true,
            power: true,
            url: Url::new("http://sensor/state").unwrap(),
            outlet: 0,
        };
        assert!(record.is_ready());

        record.outlet = UNASSIGNED_OUTLET;
        assert!(!record.is_ready());
        record.outlet = 0;
        record.power = false;
        assert!(!record.is_ready());
        record.power = true;
        record.url.clear();
        assert!(!record.is_ready());
    }
}
