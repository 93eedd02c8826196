pub mod sensor_state;
pub mod water_level;
