use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Runtime configuration for the sensor monitor. Defaults match the
/// deployed senders; every value can be overridden through the
/// `MONITOR_*` environment variables. Loaded once at startup and
/// immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitorConfig {
    /// MQTT broker host name.
    pub mqtt_host: String,
    /// MQTT broker port.
    pub mqtt_port: u16,
    /// Topic the sensor network publishes to.
    pub topic: String,
    /// Client identifier presented to the broker.
    pub client_id: String,
    /// BCM number of the digital alert output pin.
    pub alert_pin: u8,
    /// Replay bundled sample payloads instead of connecting to the broker.
    pub use_dummy_source: bool,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            mqtt_host: "broker.hivemq.com".to_string(),
            mqtt_port: 1883,
            topic: "Home/SensorData".to_string(),
            client_id: "sensor-monitor".to_string(),
            alert_pin: 17,
            use_dummy_source: false,
        }
    }
}

impl MonitorConfig {
    /// Loads the configuration, applying `MONITOR_*` overrides on top of
    /// the defaults. Unparsable numeric overrides are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("MONITOR_MQTT_HOST") {
            config.mqtt_host = host;
        }
        if let Some(port) = parse_env("MONITOR_MQTT_PORT") {
            config.mqtt_port = port;
        }
        if let Ok(topic) = env::var("MONITOR_MQTT_TOPIC") {
            config.topic = topic;
        }
        if let Ok(client_id) = env::var("MONITOR_CLIENT_ID") {
            config.client_id = client_id;
        }
        if let Some(pin) = parse_env("MONITOR_ALERT_PIN") {
            config.alert_pin = pin;
        }
        config.use_dummy_source = matches!(env::var("MONITOR_SOURCE").as_deref(), Ok("dummy"));

        config
    }

    /// Logs the loaded configuration once at startup.
    pub fn log(&self) {
        log::info!(
            "broker {}:{}, topic {}, client id {}, alert pin {}{}",
            self.mqtt_host,
            self.mqtt_port,
            self.topic,
            self.client_id,
            self.alert_pin,
            if self.use_dummy_source {
                " (dummy source)"
            } else {
                ""
            }
        );
    }
}

/// Configuration for the camera/object-detection view of the vision
/// binary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisionConfig {
    /// Index of the capture device.
    pub camera_index: u32,
    /// ONNX detector graph, read once at startup.
    pub model_path: PathBuf,
    /// Class-name list, one name per line, read once at startup.
    pub classes_path: PathBuf,
    /// Minimum confidence for a detection to be kept.
    pub confidence_threshold: f32,
    /// IoU above which overlapping boxes are suppressed.
    pub iou_threshold: f32,
    /// BCM number of the digital light-sensor input pin.
    pub light_sensor_pin: u8,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            camera_index: 0,
            model_path: PathBuf::from("/usr/local/share/sensor-monitor/detector.onnx"),
            classes_path: PathBuf::from("/usr/local/share/sensor-monitor/classes.txt"),
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            light_sensor_pin: 27,
        }
    }
}

impl VisionConfig {
    /// Loads the vision configuration with `MONITOR_*` overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(index) = parse_env("MONITOR_CAMERA_INDEX") {
            config.camera_index = index;
        }
        if let Ok(path) = env::var("MONITOR_MODEL_PATH") {
            config.model_path = PathBuf::from(path);
        }
        if let Ok(path) = env::var("MONITOR_CLASSES_PATH") {
            config.classes_path = PathBuf::from(path);
        }
        if let Some(threshold) = parse_env("MONITOR_CONFIDENCE_THRESHOLD") {
            config.confidence_threshold = threshold;
        }
        if let Some(threshold) = parse_env("MONITOR_IOU_THRESHOLD") {
            config.iou_threshold = threshold;
        }
        if let Some(pin) = parse_env("MONITOR_LIGHT_PIN") {
            config.light_sensor_pin = pin;
        }

        config
    }

    pub fn log(&self) {
        log::info!(
            "camera {}, model {}, classes {}, conf {}, iou {}, light pin {}",
            self.camera_index,
            self.model_path.display(),
            self.classes_path.display(),
            self.confidence_threshold,
            self.iou_threshold,
            self.light_sensor_pin
        );
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let value = env::var(name).ok()?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("ignoring unparsable {name}={value}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_senders() {
        let config = MonitorConfig::default();

        assert_eq!(config.mqtt_host, "broker.hivemq.com");
        assert_eq!(config.mqtt_port, 1883);
        assert_eq!(config.topic, "Home/SensorData");
        assert_eq!(config.alert_pin, 17);
        assert!(!config.use_dummy_source);
    }

    #[test]
    fn vision_defaults_use_the_dashboard_thresholds() {
        let config = VisionConfig::default();

        assert_eq!(config.confidence_threshold, 0.25);
        assert_eq!(config.iou_threshold, 0.45);
    }
}
