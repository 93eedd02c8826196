pub mod config;
pub mod error;
pub mod modules;
pub mod runtime;
pub mod util;

pub use config::WatcherConfig;
pub use error::{Result, WatcherError};
pub use modules::sensor_state::{UltrasoundState, WaterLevelState};
pub use modules::water_level::WaterLevelWatcher;
pub use runtime::{PollReport, Runtime, RuntimeConfig};
