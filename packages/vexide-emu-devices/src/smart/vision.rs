//! Vision Sensor
//!
//! Object detection is not emulated. A vision sensor only occupies its port, so drivers can
//! check that it is connected.

use super::{SmartDevice, SmartDeviceType, SmartPort};

/// A vision sensor plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisionSensor<'a> {
    port: SmartPort<'a>,
}

impl<'a> VisionSensor<'a> {
    /// Creates a vision sensor driver on a port.
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }
}

impl SmartDevice for VisionSensor<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Vision
    }
}

/// The (empty) state of an emulated vision sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct VisionState;

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::table;

    #[test]
    fn connection() {
        let (_clock, table) = table();
        let sensor = VisionSensor::new(table.port(10).unwrap());
        assert!(!sensor.is_connected());

        table.plug_in_device(10, SmartDeviceType::Vision).unwrap();
        assert!(sensor.is_connected());
        assert_eq!(sensor.validate_port(), Ok(()));
        assert!(sensor.timestamp().is_ok());
    }
}
