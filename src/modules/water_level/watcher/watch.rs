use crate::log_debug;
use crate::modules::water_level::classify::classify;
use crate::modules::water_level::watcher::WaterLevelWatcher;
use crate::util::http::SensorClient;

impl<S, C: SensorClient> WaterLevelWatcher<S, C> {
    /// Poll the sensor once and update the state and change flag.
    ///
    /// Does nothing but clear the change flag while disabled, without a URL
    /// or without an outlet.
    pub fn watch(&mut self) {
        log_debug!("[WaterLevelWatcher] power: {}", if self.record.power { "on" } else { "off" });

        if !self.record.is_ready() {
            self.changed = false;
            return;
        }

        log_debug!("[WaterLevelWatcher] polling {}", self.record.url);
        let outcome = self.client.get(self.record.url.as_str());
        let state = classify(self.state, &outcome);

        if state != self.state {
            self.changed = true;
            self.state = state;
        } else {
            self.changed = false;
        }
    }
}
