use rppal::gpio::{Gpio, InputPin, OutputPin};

use crate::{AlertOutput, LightSensor};

/// Raspberry Pi alert output. The pin starts low and is reset by `rppal`
/// when the pin is dropped.
pub struct GpioAlertOutput {
    pin: OutputPin,
}

impl GpioAlertOutput {
    pub fn new(bcm_pin: u8) -> Result<Self, rppal::gpio::Error> {
        let pin = Gpio::new()?.get(bcm_pin)?.into_output_low();
        Ok(Self { pin })
    }
}

impl AlertOutput for GpioAlertOutput {
    fn set_active(&mut self, active: bool) {
        if active {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}

/// Raspberry Pi digital light-sensor input.
pub struct GpioLightSensor {
    pin: InputPin,
}

impl GpioLightSensor {
    pub fn new(bcm_pin: u8) -> Result<Self, rppal::gpio::Error> {
        let pin = Gpio::new()?.get(bcm_pin)?.into_input();
        Ok(Self { pin })
    }
}

impl LightSensor for GpioLightSensor {
    fn is_bright(&mut self) -> bool {
        self.pin.is_high()
    }
}
