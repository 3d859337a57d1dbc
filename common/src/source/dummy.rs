use std::thread;
use std::time::Duration;

use sensor_monitor_hardware::AlertOutputSharedPointer;

use crate::source::{process_payload, LinkState, SensorSource, SensorUpdate};
use crate::ValueStore;

/// Replays a bundled list of sample payloads through the regular parse and
/// alert path. Useful on a desk without a broker or sensors; one of the
/// bundled payloads is deliberately malformed so the parse-error state is
/// exercised too.
pub struct DummySensorSource {
    payloads: Vec<String>,
    interval: Duration,
    alert_output: AlertOutputSharedPointer,
    started: bool,
}

impl DummySensorSource {
    pub fn new(alert_output: AlertOutputSharedPointer) -> Result<Self, serde_json::Error> {
        let payloads: Vec<String> = serde_json::from_str(include_str!("./dummy_payloads.json"))?;

        Ok(Self {
            payloads,
            interval: Duration::from_secs(2),
            alert_output,
            started: false,
        })
    }
}

impl SensorSource for DummySensorSource {
    fn start(
        &mut self,
        updates: ValueStore<SensorUpdate>,
        link: ValueStore<LinkState>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if self.started {
            return Err("source already started".into());
        }
        self.started = true;

        let payloads = self.payloads.clone();
        let interval = self.interval;
        let alert_output = self.alert_output.clone();

        thread::spawn(move || {
            link.set(LinkState::Connected);

            for raw in payloads.iter().cycle() {
                {
                    let mut output = alert_output.lock().unwrap();
                    updates.set(process_payload(raw, output.as_mut()));
                }
                thread::sleep(interval);
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertState;
    use sensor_monitor_hardware::{shared_alert_output, DummyAlertOutput};

    #[test]
    fn bundled_payloads_cover_all_alert_states() {
        let source =
            DummySensorSource::new(shared_alert_output(Box::new(DummyAlertOutput::new(17))))
                .unwrap();

        let mut output = DummyAlertOutput::new(17);
        let states: Vec<AlertState> = source
            .payloads
            .iter()
            .map(|raw| process_payload(raw, &mut output).alert)
            .collect();

        assert!(states.contains(&AlertState::Normal));
        assert!(states.contains(&AlertState::Exceeded));
        assert!(states.contains(&AlertState::ParseError));
    }
}
