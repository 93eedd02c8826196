// src/modules/water_level/classify.rs
//! Turns the outcome of one sensor poll into a water level state.

use serde_json::Value;

use crate::error::Result;
use crate::modules::sensor_state::WaterLevelState;
use crate::util::http::SensorResponse;
use crate::{log_debug, log_warn};

pub const SENSOR_STATE_FIELD: &str = "SensorState";

/// Classify a poll outcome given the state held before it.
///
/// - transport failure or non-2xx status: `Error`
/// - 2xx with a body that is not JSON: `Error`
/// - 2xx with a non-null `SensorState`: that ordinal
/// - 2xx without it: `previous`
pub fn classify(previous: WaterLevelState, outcome: &Result<SensorResponse>) -> WaterLevelState {
    let response = match outcome {
        Ok(response) => response,
        Err(e) => {
            log_warn!("Sensor poll failed: {}", e);
            return WaterLevelState::Error;
        }
    };

    log_debug!("Sensor poll status {}: {}", response.status, response.body);

    if !response.is_success() {
        return WaterLevelState::Error;
    }

    let document = match parse_document(&response.body) {
        Ok(document) => document,
        Err(e) => {
            log_warn!("Parse {} failed: {}", response.body, e);
            return WaterLevelState::Error;
        }
    };

    match document.get(SENSOR_STATE_FIELD) {
        None | Some(Value::Null) => previous,
        Some(value) => WaterLevelState::from_ordinal(ordinal_of(value)),
    }
}

/// First JSON value in the body; anything after it is ignored.
fn parse_document(body: &str) -> std::result::Result<Value, serde_json::Error> {
    let mut values = serde_json::Deserializer::from_str(body).into_iter::<Value>();
    match values.next() {
        Some(value) => value,
        // Empty or whitespace-only body: let the parser report it
        None => serde_json::from_str::<Value>(body),
    }
}

/// Integer view of a JSON value: floats truncate, booleans are 0/1,
/// numeric strings are parsed, anything else is 0.
fn ordinal_of(value: &Value) -> i64 {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .or_else(|| value.as_bool().map(i64::from))
        .or_else(|| value.as_str().and_then(parse_numeric))
        .unwrap_or(0)
}

fn parse_numeric(text: &str) -> Option<i64> {
    let text = text.trim();
    text.parse::<i64>()
        .ok()
        .or_else(|| text.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
}
