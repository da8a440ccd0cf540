//! Optical Sensor

use rgb::Rgb;
use vex_sdk::V5_DeviceOpticalRgb;

use super::{PortError, SmartDevice, SmartDeviceType, SmartPort};

/// An optical sensor plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpticalSensor<'a> {
    port: SmartPort<'a>,
}

impl<'a> OpticalSensor<'a> {
    /// Creates an optical sensor driver on a port.
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }

    fn read<R>(&self, f: impl FnOnce(&OpticalState) -> R) -> Result<R, PortError> {
        self.port.with_state(f)
    }

    /// Returns the detected color.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an optical sensor is not connected to the port.
    pub fn color(&self) -> Result<Rgb<f64>, PortError> {
        self.read(|sensor| sensor.color)
    }

    /// Returns the detected brightness.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an optical sensor is not connected to the port.
    pub fn brightness(&self) -> Result<f64, PortError> {
        self.read(|sensor| sensor.brightness)
    }

    /// Returns the detected color and brightness together.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an optical sensor is not connected to the port.
    pub fn rgb(&self) -> Result<OpticalRgb, PortError> {
        self.read(|sensor| OpticalRgb {
            red: sensor.color.r,
            green: sensor.color.g,
            blue: sensor.color.b,
            brightness: sensor.brightness,
        })
    }
}

impl SmartDevice for OpticalSensor<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Optical
    }
}

/// The state of an emulated optical sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OpticalState {
    /// Detected color.
    pub color: Rgb<f64>,
    /// Detected brightness.
    pub brightness: f64,
}

/// RGB data from a [`OpticalSensor`].
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct OpticalRgb {
    /// The red value from the sensor.
    pub red: f64,
    /// The green value from the sensor.
    pub green: f64,
    /// The blue value from the sensor.
    pub blue: f64,
    /// The brightness value from the sensor.
    pub brightness: f64,
}

impl From<OpticalRgb> for V5_DeviceOpticalRgb {
    fn from(value: OpticalRgb) -> Self {
        Self {
            red: value.red,
            green: value.green,
            blue: value.blue,
            brightness: value.brightness,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::table;

    #[test]
    fn reads_published_color() {
        let (_clock, table) = table();
        table.plug_in_device(15, SmartDeviceType::Optical).unwrap();
        let port = table.port(15).unwrap();

        port.with_state_mut(|state: &mut OpticalState| {
            state.color = Rgb::new(0.75, 0.5, 0.25);
            state.brightness = 0.9;
        })
        .unwrap();

        let sensor = OpticalSensor::new(port);
        assert_eq!(sensor.color(), Ok(Rgb::new(0.75, 0.5, 0.25)));
        assert_eq!(
            sensor.rgb(),
            Ok(OpticalRgb {
                red: 0.75,
                green: 0.5,
                blue: 0.25,
                brightness: 0.9,
            })
        );
    }
}
