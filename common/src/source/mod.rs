mod dummy;
mod mqtt;

pub use dummy::DummySensorSource;
pub use mqtt::MqttSensorSource;

use chrono::{DateTime, Local};
use sensor_monitor_hardware::AlertOutput;

use crate::alert::{self, AlertState};
use crate::reading::{self, SensorReading};
use crate::ValueStore;

/// The unit handed from a listener thread to the UI: the outcome of one
/// message. `reading` is `None` when the message failed to parse.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorUpdate {
    pub reading: Option<SensorReading>,
    pub alert: AlertState,
    pub received: DateTime<Local>,
}

/// Broker-link health, shown in the status line so a dead listener is
/// visible instead of silently freezing the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    Connected,
    Down(String),
}

/// A producer of [`SensorUpdate`]s. Implementations spawn their own
/// background worker on `start` and publish into the given stores; the UI
/// drains them from its event loop.
pub trait SensorSource {
    fn start(
        &mut self,
        updates: ValueStore<SensorUpdate>,
        link: ValueStore<LinkState>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}

pub type SensorSourcePointer = Box<dyn SensorSource>;

/// Runs one raw payload through parse and alert evaluation, re-asserting
/// the alert output level once per successfully parsed message. A parse
/// failure leaves the output untouched.
pub fn process_payload(raw: &str, alert_output: &mut dyn AlertOutput) -> SensorUpdate {
    match reading::parse_payload(raw) {
        Ok(reading) => {
            let alert = alert::evaluate(reading.temperature);
            alert_output.set_active(alert.is_active());
            SensorUpdate {
                reading: Some(reading),
                alert,
                received: Local::now(),
            }
        }
        Err(err) => {
            log::warn!("error parsing sensor data: {err}");
            SensorUpdate {
                reading: None,
                alert: AlertState::ParseError,
                received: Local::now(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor_monitor_hardware::DummyAlertOutput;

    #[test]
    fn exceeded_temperature_drives_the_output_active() {
        let mut output = DummyAlertOutput::new(17);

        let update = process_payload("Temperature: 32.5, Humidity: 55%, Smoke Level: 3%", &mut output);

        assert_eq!(update.alert, AlertState::Exceeded);
        assert!(output.is_active());
        let reading = update.reading.unwrap();
        assert_eq!(reading.temperature, Some(32.5));
        assert_eq!(reading.humidity, Some(55.0));
        assert_eq!(reading.smoke, Some(3.0));
        assert_eq!(reading.light, None);
    }

    #[test]
    fn normal_temperature_drives_the_output_inactive() {
        let mut output = DummyAlertOutput::new(17);
        process_payload("Temperature: 32.5", &mut output);

        let update = process_payload("Temperature: 21.0", &mut output);

        assert_eq!(update.alert, AlertState::Normal);
        assert!(!output.is_active());
    }

    #[test]
    fn parse_failure_leaves_the_output_untouched() {
        let mut output = DummyAlertOutput::new(17);
        process_payload("Temperature: 32.5", &mut output);

        let update = process_payload("Temperature: abc, Humidity: 40%", &mut output);

        assert_eq!(update.alert, AlertState::ParseError);
        assert_eq!(update.reading, None);
        assert!(output.is_active());
    }

    #[test]
    fn processing_the_same_payload_twice_is_idempotent() {
        let mut output = DummyAlertOutput::new(17);

        let first = process_payload("Temperature: 32.5, Humidity: 55%", &mut output);
        let level_after_first = output.is_active();
        let second = process_payload("Temperature: 32.5, Humidity: 55%", &mut output);

        assert_eq!(first.reading, second.reading);
        assert_eq!(first.alert, second.alert);
        assert_eq!(level_after_first, output.is_active());
    }

    #[test]
    fn absent_temperature_reads_as_normal() {
        let mut output = DummyAlertOutput::new(17);

        let update = process_payload("Humidity: 60%", &mut output);

        assert_eq!(update.alert, AlertState::Normal);
        assert!(!output.is_active());
    }
}
