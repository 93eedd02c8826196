// src/util/string.rs
//! Fixed-capacity strings that map onto NUL-terminated storage slots.

use std::fmt;
use std::ops::Deref;

use crate::error::{Result, WatcherError};

/// UTF-8 string of at most `N` bytes with no interior NUL.
///
/// Persisted as an `N + 1` byte slot: the bytes followed by zero padding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundedString<const N: usize> {
    value: String,
}

impl<const N: usize> BoundedString<N> {
    pub const CAPACITY: usize = N;
    pub const SLOT_SIZE: usize = N + 1;

    pub fn new(value: &str) -> Result<Self> {
        if value.len() > N {
            return Err(WatcherError::LengthExceeded {
                len: value.len(),
                capacity: N,
            });
        }
        if value.as_bytes().contains(&0) {
            return Err(WatcherError::InteriorNul);
        }
        Ok(Self { value: value.to_string() })
    }

    /// Cut at the first NUL, then at the last char boundary that fits.
    pub fn truncated(value: &str) -> Self {
        let value = value.split('\0').next().unwrap_or_default();
        let mut end = value.len().min(N);
        while !value.is_char_boundary(end) {
            end -= 1;
        }
        Self { value: value[..end].to_string() }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Write into `slot`, zero-filling the rest. `slot` must be `SLOT_SIZE` bytes.
    pub fn encode_into(&self, slot: &mut [u8]) {
        debug_assert_eq!(slot.len(), Self::SLOT_SIZE);
        slot.fill(0);
        slot[..self.value.len()].copy_from_slice(self.value.as_bytes());
    }

    /// Read from a NUL-terminated slot. Returns `None` if the bytes before the
    /// terminator are not UTF-8.
    pub fn decode(slot: &[u8]) -> Option<Self> {
        let limit = slot.len().min(N);
        let end = slot[..limit].iter().position(|b| *b == 0).unwrap_or(limit);
        let value = std::str::from_utf8(&slot[..end]).ok()?;
        Some(Self { value: value.to_string() })
    }
}

impl<const N: usize> Deref for BoundedString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.value
    }
}

impl<const N: usize> fmt::Display for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<const N: usize> TryFrom<&str> for BoundedString<N> {
    type Error = WatcherError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}
