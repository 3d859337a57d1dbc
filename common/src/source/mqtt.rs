use std::thread;
use std::time::Duration;

use rumqttc::{Client, Event, MqttOptions, Packet, QoS};
use sensor_monitor_hardware::AlertOutputSharedPointer;

use crate::config::MonitorConfig;
use crate::source::{process_payload, LinkState, SensorSource, SensorUpdate};
use crate::ValueStore;

/// The broker-backed sensor source. Subscribes to the configured topic and
/// runs every inbound publish through parse, alert evaluation and the
/// output pin write on its own thread, one message at a time.
pub struct MqttSensorSource {
    config: MonitorConfig,
    alert_output: AlertOutputSharedPointer,
    started: bool,
}

impl MqttSensorSource {
    pub fn new(config: MonitorConfig, alert_output: AlertOutputSharedPointer) -> Self {
        Self {
            config,
            alert_output,
            started: false,
        }
    }
}

impl SensorSource for MqttSensorSource {
    fn start(
        &mut self,
        updates: ValueStore<SensorUpdate>,
        link: ValueStore<LinkState>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.started {
            return Err("source already started".into());
        }
        self.started = true;

        let mut options = MqttOptions::new(
            self.config.client_id.clone(),
            self.config.mqtt_host.clone(),
            self.config.mqtt_port,
        );
        options.set_keep_alive(Duration::from_secs(5));

        let (client, mut connection) = Client::new(options, 10);
        let topic = self.config.topic.clone();
        let alert_output = self.alert_output.clone();

        thread::spawn(move || {
            log::info!("listening for sensor data on {topic}");

            for notification in connection.iter() {
                match notification {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        // The broker forgets subscriptions between sessions,
                        // so re-issue on every (re)connect.
                        link.set(LinkState::Connected);
                        if let Err(err) = client.subscribe(topic.as_str(), QoS::AtMostOnce) {
                            log::warn!("subscribe to {topic} failed: {err}");
                        }
                    }
                    Ok(Event::Incoming(Packet::Publish(publish))) => {
                        let raw = String::from_utf8_lossy(&publish.payload);
                        log::debug!("received sensor data: {raw}");

                        let mut output = alert_output.lock().unwrap();
                        updates.set(process_payload(&raw, output.as_mut()));
                    }
                    Ok(_) => {}
                    Err(err) => {
                        log::warn!("mqtt connection error: {err}");
                        link.set(LinkState::Down(err.to_string()));
                        thread::sleep(Duration::from_secs(2));
                    }
                }
            }
        });

        Ok(())
    }
}
