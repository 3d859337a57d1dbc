use crate::{AlertOutput, LightSensor};

/// Stand-in alert output for hosts without GPIO. Remembers the level so
/// tests can observe controller writes, and logs level changes.
pub struct DummyAlertOutput {
    pin: u8,
    active: bool,
}

impl DummyAlertOutput {
    pub fn new(pin: u8) -> Self {
        Self { pin, active: false }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl AlertOutput for DummyAlertOutput {
    fn set_active(&mut self, active: bool) {
        if self.active != active {
            log::info!(
                "alert pin {} set {}",
                self.pin,
                if active { "high" } else { "low" }
            );
        }
        self.active = active;
    }
}

/// Stand-in light sensor reporting a fixed level.
pub struct DummyLightSensor {
    bright: bool,
}

impl DummyLightSensor {
    pub fn new(bright: bool) -> Self {
        Self { bright }
    }
}

impl LightSensor for DummyLightSensor {
    fn is_bright(&mut self) -> bool {
        self.bright
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_starts_inactive_and_tracks_writes() {
        let mut output = DummyAlertOutput::new(17);
        assert!(!output.is_active());

        output.set_active(true);
        assert!(output.is_active());

        output.set_active(true);
        assert!(output.is_active());

        output.set_active(false);
        assert!(!output.is_active());
    }

    #[test]
    fn light_sensor_reports_its_fixed_level() {
        assert!(DummyLightSensor::new(true).is_bright());
        assert!(!DummyLightSensor::new(false).is_bright());
    }
}
