// src/modules/sensor_state.rs
//! Ordinal contract between the ultrasound sensor service and its consumers.
//!
//! The sensor service reports `SensorState` as an integer. Both enums below
//! are defined in terms of [`ordinal`], so the two sides cannot drift apart.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire ordinals shared by [`UltrasoundState`] and [`WaterLevelState`]
pub mod ordinal {
    pub const NONE: i64 = 0;
    /// Water at the expected distance
    pub const GOOD: i64 = 1;
    /// Water closer than expected
    pub const FLOOD: i64 = 2;
    /// Water further than expected
    pub const LACK: i64 = 3;
    /// Reading could not be obtained
    pub const ERROR: i64 = 4;
}

/// State published by the ultrasound distance sensor service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UltrasoundState {
    None,
    GoodDistance,
    CloseDistance,
    FarDistance,
}

impl UltrasoundState {
    pub fn ordinal(self) -> i64 {
        match self {
            UltrasoundState::None => ordinal::NONE,
            UltrasoundState::GoodDistance => ordinal::GOOD,
            UltrasoundState::CloseDistance => ordinal::FLOOD,
            UltrasoundState::FarDistance => ordinal::LACK,
        }
    }

    pub fn from_ordinal(value: i64) -> Option<Self> {
        match value {
            ordinal::NONE => Some(UltrasoundState::None),
            ordinal::GOOD => Some(UltrasoundState::GoodDistance),
            ordinal::FLOOD => Some(UltrasoundState::CloseDistance),
            ordinal::LACK => Some(UltrasoundState::FarDistance),
            _ => None,
        }
    }
}

/// Water level classification tracked by a watcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaterLevelState {
    #[default]
    None,
    Good,
    Flood,
    Lack,
    Error,
    /// Ordinal outside the known table, kept as reported
    Unrecognized(i64),
}

impl WaterLevelState {
    pub fn ordinal(self) -> i64 {
        match self {
            WaterLevelState::None => ordinal::NONE,
            WaterLevelState::Good => ordinal::GOOD,
            WaterLevelState::Flood => ordinal::FLOOD,
            WaterLevelState::Lack => ordinal::LACK,
            WaterLevelState::Error => ordinal::ERROR,
            WaterLevelState::Unrecognized(value) => value,
        }
    }

    /// Never fails: unknown ordinals become [`WaterLevelState::Unrecognized`]
    pub fn from_ordinal(value: i64) -> Self {
        match value {
            ordinal::NONE => WaterLevelState::None,
            ordinal::GOOD => WaterLevelState::Good,
            ordinal::FLOOD => WaterLevelState::Flood,
            ordinal::LACK => WaterLevelState::Lack,
            ordinal::ERROR => WaterLevelState::Error,
            other => WaterLevelState::Unrecognized(other),
        }
    }

    pub fn is_recognized(self) -> bool {
        !matches!(self, WaterLevelState::Unrecognized(_))
    }
}

impl From<UltrasoundState> for WaterLevelState {
    fn from(state: UltrasoundState) -> Self {
        WaterLevelState::from_ordinal(state.ordinal())
    }
}

impl fmt::Display for WaterLevelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterLevelState::None => write!(f, "none"),
            WaterLevelState::Good => write!(f, "good"),
            WaterLevelState::Flood => write!(f, "flood"),
            WaterLevelState::Lack => write!(f, "lack"),
            WaterLevelState::Error => write!(f, "error"),
            WaterLevelState::Unrecognized(value) => write!(f, "unrecognized({})", value),
        }
    }
}
