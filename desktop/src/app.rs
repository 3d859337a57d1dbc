use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use sensor_monitor_common::alert::AlertState;
use sensor_monitor_common::config::MonitorConfig;
use sensor_monitor_common::source::{
    DummySensorSource, LinkState, MqttSensorSource, SensorSourcePointer, SensorUpdate,
};
use sensor_monitor_hardware::AlertOutputSharedPointer;
use slint::Color;

use crate::ViewModel;

/// Builds the configured sensor source around the shared alert output.
pub fn build_source(
    config: &MonitorConfig,
    alert_output: AlertOutputSharedPointer,
) -> Result<SensorSourcePointer> {
    if config.use_dummy_source {
        let source =
            DummySensorSource::new(alert_output).context("loading bundled sample payloads")?;
        Ok(Box::new(source))
    } else {
        Ok(Box::new(MqttSensorSource::new(
            config.clone(),
            alert_output,
        )))
    }
}

/// Opens the platform alert output and wraps it for sharing between the
/// listener thread and the shutdown path.
pub fn open_alert_output(pin: u8) -> Result<AlertOutputSharedPointer> {
    let output = sensor_monitor_hardware::alert_output(pin)
        .map_err(|err| anyhow!("failed to open alert output on pin {pin}: {err}"))?;
    Ok(sensor_monitor_hardware::shared_alert_output(output))
}

/// Applies one drained update to the sensor panel. Absent fields leave the
/// previous text in place, so a field that stops arriving keeps showing
/// its last value.
pub fn apply_update(vm: &ViewModel<'_>, update: &SensorUpdate) {
    if let Some(reading) = &update.reading {
        if let Some(value) = reading.temperature {
            vm.set_temperature_text(format!("Temperature: {value} C").into());
        }
        if let Some(value) = reading.humidity {
            vm.set_humidity_text(format!("Humidity: {value} %").into());
        }
        if let Some(value) = reading.light {
            vm.set_light_text(format!("Light: {value} lx").into());
        }
        if let Some(value) = reading.soil_moisture {
            vm.set_soil_moisture_text(format!("Soil Moisture: {value} %").into());
        }
        if let Some(value) = reading.co2 {
            vm.set_co2_text(format!("CO₂: {value} ppm").into());
        }
        if let Some(value) = reading.smoke {
            vm.set_smoke_text(format!("Smoke Level: {value} %").into());
        }
    }

    vm.set_alert_text(update.alert.message().into());
    vm.set_alert_color(alert_color(update.alert));
}

fn alert_color(alert: AlertState) -> Color {
    match alert {
        AlertState::Normal => Color::from_rgb_u8(0x00, 0x80, 0x00),
        AlertState::Exceeded => Color::from_rgb_u8(0xff, 0x00, 0x00),
        AlertState::ParseError => Color::from_rgb_u8(0xff, 0xa5, 0x00),
    }
}

/// Status line under the readings: link state plus the last update time.
pub fn status_text(link: Option<&LinkState>, last_update: Option<DateTime<Local>>) -> String {
    let link_text = match link {
        Some(LinkState::Connected) => "link up".to_string(),
        Some(LinkState::Down(reason)) => format!("link down ({reason})"),
        None => "connecting...".to_string(),
    };

    match last_update {
        Some(when) => format!("{link_text}, last update {}", when.format("%H:%M:%S")),
        None => link_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_line_before_any_data() {
        assert_eq!(status_text(None, None), "connecting...");
    }

    #[test]
    fn status_line_with_link_and_data() {
        let when = Local.with_ymd_and_hms(2025, 3, 26, 18, 45, 7).unwrap();

        assert_eq!(
            status_text(Some(&LinkState::Connected), Some(when)),
            "link up, last update 18:45:07"
        );
    }

    #[test]
    fn status_line_surfaces_a_dead_link() {
        let state = LinkState::Down("connection refused".to_string());

        assert_eq!(
            status_text(Some(&state), None),
            "link down (connection refused)"
        );
    }
}
