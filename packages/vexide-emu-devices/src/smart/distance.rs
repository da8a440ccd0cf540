//! Distance Sensor

use super::{PortError, SmartDevice, SmartDeviceType, SmartPort};

/// A distance sensor plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistanceSensor<'a> {
    port: SmartPort<'a>,
}

impl<'a> DistanceSensor<'a> {
    /// Creates a distance sensor driver on a port.
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }

    /// Returns the distance to the detected object in millimeters.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a distance sensor is not connected to the port.
    pub fn distance(&self) -> Result<f64, PortError> {
        self.port.with_state(|sensor: &DistanceState| sensor.position)
    }
}

impl SmartDevice for DistanceSensor<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Distance
    }
}

/// The state of an emulated distance sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DistanceState {
    /// Distance to the detected object in millimeters.
    pub position: f64,
}
