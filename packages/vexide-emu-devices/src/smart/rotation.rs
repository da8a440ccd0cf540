//! Rotation Sensor

use super::{PortError, SmartDevice, SmartDeviceType, SmartPort};

/// A rotation sensor plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationSensor<'a> {
    port: SmartPort<'a>,
}

impl<'a> RotationSensor<'a> {
    /// Creates a rotation sensor driver on a port.
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }

    /// Returns the sensor's position reading in degrees.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a rotation sensor is not connected to the port.
    pub fn position(&self) -> Result<f64, PortError> {
        self.port.with_state(|sensor: &RotationState| sensor.position)
    }

    /// Overwrites the sensor's position reading.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a rotation sensor is not connected to the port.
    pub fn set_position(&mut self, position: f64) -> Result<(), PortError> {
        self.port
            .with_state_mut(|sensor: &mut RotationState| sensor.position = position)
    }

    /// Sets the sensor's position reading to zero.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a rotation sensor is not connected to the port.
    pub fn reset_position(&mut self) -> Result<(), PortError> {
        self.set_position(0.0)
    }
}

impl SmartDevice for RotationSensor<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Rotation
    }
}

/// The state of an emulated rotation sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RotationState {
    /// Position in degrees.
    pub position: f64,
}
