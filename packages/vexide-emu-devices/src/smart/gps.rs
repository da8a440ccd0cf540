//! GPS Sensor

use mint::Point2;

use super::{PortError, SmartDevice, SmartDeviceType, SmartPort};

/// A GPS sensor plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpsSensor<'a> {
    port: SmartPort<'a>,
}

impl<'a> GpsSensor<'a> {
    /// Creates a GPS sensor driver on a port.
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }

    /// Returns the sensor's mounting offset from the robot's center of rotation, in meters.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a GPS sensor is not connected to the port.
    pub fn offset(&self) -> Result<Point2<f64>, PortError> {
        self.port.with_state(|gps: &GpsState| gps.offset)
    }

    /// Sets the sensor's mounting offset from the robot's center of rotation, in meters.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a GPS sensor is not connected to the port.
    pub fn set_offset(&mut self, offset: Point2<f64>) -> Result<(), PortError> {
        self.port.with_state_mut(|gps: &mut GpsState| gps.offset = offset)
    }

    /// Returns the raw position published for the sensor.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a GPS sensor is not connected to the port.
    pub fn raw_position(&self) -> Result<GpsRaw, PortError> {
        self.port.with_state(|gps: &GpsState| gps.position)
    }
}

impl SmartDevice for GpsSensor<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Gps
    }
}

/// The state of an emulated GPS sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsState {
    /// Mounting offset in meters.
    pub offset: Point2<f64>,
    /// Last published raw position.
    pub position: GpsRaw,
}

impl Default for GpsState {
    fn default() -> Self {
        Self {
            offset: Point2 { x: 0.0, y: 0.0 },
            position: GpsRaw::default(),
        }
    }
}

/// A raw four component position reading from a GPS sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GpsRaw {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// W component.
    pub w: f64,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::table;

    #[test]
    fn offset_round_trip() {
        let (_clock, table) = table();
        table.plug_in_device(19, SmartDeviceType::Gps).unwrap();
        let mut gps = GpsSensor::new(table.port(19).unwrap());

        assert_eq!(gps.offset(), Ok(Point2 { x: 0.0, y: 0.0 }));
        gps.set_offset(Point2 { x: 0.1, y: -0.2 }).unwrap();
        assert_eq!(gps.offset(), Ok(Point2 { x: 0.1, y: -0.2 }));
        assert_eq!(gps.raw_position(), Ok(GpsRaw::default()));
    }
}
