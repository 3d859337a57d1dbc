use std::sync::{Arc, Mutex};

#[cfg(feature = "rpi")]
mod gpio;
#[cfg(feature = "rpi")]
pub use gpio::{GpioAlertOutput, GpioLightSensor};

mod dummy;
pub use dummy::{DummyAlertOutput, DummyLightSensor};

/// The digital alert output, driven high while the temperature threshold
/// is exceeded. Writes are unconditional; callers re-assert the level on
/// every message.
pub trait AlertOutput {
    fn set_active(&mut self, active: bool);
}

/// The digital light-sensor input of the vision build. One read yields a
/// binary bright/dark level, displayed as 100 % or 0 %.
pub trait LightSensor {
    fn is_bright(&mut self) -> bool;
}

pub type AlertOutputPointer = Box<dyn AlertOutput + Send>;
pub type AlertOutputSharedPointer = Arc<Mutex<AlertOutputPointer>>;

pub fn shared_alert_output(output: AlertOutputPointer) -> AlertOutputSharedPointer {
    Arc::new(Mutex::new(output))
}

/// Constructs the platform alert output for BCM pin `pin`: a GPIO pin on
/// the `rpi` build, a logging stand-in elsewhere.
#[cfg(feature = "rpi")]
pub fn alert_output(pin: u8) -> Result<AlertOutputPointer, Box<dyn std::error::Error>> {
    Ok(Box::new(GpioAlertOutput::new(pin)?))
}

#[cfg(not(feature = "rpi"))]
pub fn alert_output(pin: u8) -> Result<AlertOutputPointer, Box<dyn std::error::Error>> {
    Ok(Box::new(DummyAlertOutput::new(pin)))
}

/// Constructs the platform light sensor for BCM pin `pin`.
#[cfg(feature = "rpi")]
pub fn light_sensor(pin: u8) -> Result<Box<dyn LightSensor + Send>, Box<dyn std::error::Error>> {
    Ok(Box::new(GpioLightSensor::new(pin)?))
}

#[cfg(not(feature = "rpi"))]
pub fn light_sensor(pin: u8) -> Result<Box<dyn LightSensor + Send>, Box<dyn std::error::Error>> {
    log::info!("no GPIO available, light sensor on pin {pin} reads dark");
    Ok(Box::new(DummyLightSensor::new(false)))
}
