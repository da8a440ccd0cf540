//! Smart ports and emulated devices.
//!
//! This module provides the driver-side view of the emulated smart port table. This includes
//! motors, the inertial sensor, and the handful of simpler sensors whose state the emulator
//! publishes.
//!
//! # Ports
//!
//! A [`SmartPort`] is a lightweight handle onto one slot of a [`PortTable`]. Handles are `Copy` and
//! never own the slot's state, so a mutation made through one handle is visible through every other
//! handle to the same port. Unlike the brain's user-facing numbering, ports here are identified by
//! their zero-based slot index.
//!
//! ```
//! use std::sync::Arc;
//! use vexide_emu_core::time::ManualClock;
//! use vexide_emu_devices::{PortTable, smart::SmartDeviceType};
//!
//! let table = PortTable::new(Arc::new(ManualClock::new()));
//! table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
//!
//! let port = table.port(0).unwrap();
//! assert_eq!(port.device_type(), Some(SmartDeviceType::Motor));
//! ```
//!
//! # Devices
//!
//! Drivers such as [`Motor`](motor::Motor) and [`InertialSensor`](imu::InertialSensor) are created
//! from a [`SmartPort`]. Every driver operation first checks that a device of the right type is
//! connected to its port, returning a [`PortError`] otherwise, and only then touches the slot's
//! state.
//!
//! The emulator side (whatever is producing "measured" values such as encoder positions or IMU
//! vectors) writes those values through [`SmartPort::with_state_mut`].

use snafu::{Snafu, ensure};
use vex_sdk::V5_DeviceType;
use vexide_emu_core::{config::EmulatorConfig, time::LowResolutionTime};

use crate::ports::{DeviceSlot, DeviceState, PortTable};

pub mod distance;
pub mod expander;
pub mod gps;
pub mod imu;
pub mod link;
pub mod motor;
pub mod optical;
pub mod rotation;
pub mod vision;

/// Defines common functionality shared by all Smart Port devices.
pub trait SmartDevice {
    /// Returns the [`SmartPort`] this device is registered on.
    fn port(&self) -> SmartPort<'_>;

    /// Returns the variant of [`SmartDeviceType`] that this device is associated with.
    fn device_type(&self) -> SmartDeviceType;

    /// Returns the zero-based index of the port this device is registered on.
    fn port_index(&self) -> u8 {
        self.port().index()
    }

    /// Determines if this device type is currently plugged into its [`SmartPort`].
    fn is_connected(&self) -> bool {
        self.port().device_type() == Some(self.device_type())
    }

    /// Returns the time at which this device's slot was last updated.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if there is not a physical device of type
    /// [`SmartDevice::device_type`] in this [`SmartDevice`]'s port.
    fn timestamp(&self) -> Result<LowResolutionTime, PortError> {
        self.validate_port()?;
        Ok(self.port().timestamp())
    }

    /// Verify that the device type is currently plugged into this port, returning an appropriate
    /// [`PortError`] if not available.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if there is not a physical device of type
    /// [`SmartDevice::device_type`] in this [`SmartDevice`]'s port.
    fn validate_port(&self) -> Result<(), PortError> {
        self.port().validate_type(self.device_type())
    }
}

/// Verify that a slot holds a connected device of the given type.
///
/// A slot that is marked present but was never given a type is treated as disconnected.
pub(crate) fn validate_slot(slot: &DeviceSlot, device_type: SmartDeviceType) -> Result<(), PortError> {
    let port = slot.port;

    match slot.connected_type() {
        Some(connected_type) => {
            // The connected device must match the requested type.
            ensure!(
                connected_type == device_type,
                IncorrectDeviceSnafu {
                    expected: device_type,
                    actual: connected_type,
                    port,
                }
            );
            Ok(())
        }
        // No device is plugged into the port.
        None => DisconnectedSnafu { port }.fail(),
    }
}

/// A handle to one slot of a [`PortTable`].
#[derive(Debug, Clone, Copy)]
pub struct SmartPort<'a> {
    table: &'a PortTable,
    index: u8,
}

impl<'a> SmartPort<'a> {
    pub(crate) const fn new(table: &'a PortTable, index: u8) -> Self {
        Self { table, index }
    }

    /// Returns the zero-based index of the port.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Returns the table this port belongs to.
    #[must_use]
    pub const fn table(&self) -> &'a PortTable {
        self.table
    }

    /// Returns the configuration of the table this port belongs to.
    #[must_use]
    pub fn config(&self) -> &'a EmulatorConfig {
        self.table.config()
    }

    /// Returns the type of device currently connected to this port, or `None` if no device is
    /// connected.
    #[must_use]
    pub fn device_type(&self) -> Option<SmartDeviceType> {
        self.table.lock(self.index).connected_type()
    }

    /// Verify that a device type is currently plugged into this port, returning an appropriate
    /// [`PortError`] if not available.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if there is not a device of the specified type in this port.
    pub fn validate_type(&self, device_type: SmartDeviceType) -> Result<(), PortError> {
        validate_slot(&self.table.lock(self.index), device_type)
    }

    /// Returns the time at which this port's slot was last updated.
    ///
    /// Unlike [`SmartDevice::timestamp`], this reads the slot whether or not a device is present.
    #[must_use]
    pub fn timestamp(&self) -> LowResolutionTime {
        self.table.lock(self.index).timestamp
    }

    /// Runs `f` against the state of the device connected to this port.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the port does not hold a connected device whose state is `S`.
    pub fn with_state<S: DeviceData, R>(&self, f: impl FnOnce(&S) -> R) -> Result<R, PortError> {
        self.with_timestamped_state(|state, _| f(state))
    }

    /// Runs `f` against the state of the device connected to this port along with the slot's
    /// timestamp, both observed under the same lock.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the port does not hold a connected device whose state is `S`.
    pub fn with_timestamped_state<S: DeviceData, R>(
        &self,
        f: impl FnOnce(&S, LowResolutionTime) -> R,
    ) -> Result<R, PortError> {
        let slot = self.table.lock(self.index);
        validate_slot(&slot, S::DEVICE_TYPE)?;

        let state = S::from_state(&slot.state).ok_or_else(|| slot.state_mismatch(S::DEVICE_TYPE))?;
        Ok(f(state, slot.timestamp))
    }

    /// Runs `f` against the state of the device connected to this port, allowing it to be
    /// modified.
    ///
    /// The slot's timestamp is set to the table clock's current time once the guard passes. If the
    /// guard fails, the slot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the port does not hold a connected device whose state is `S`.
    pub fn with_state_mut<S: DeviceData, R>(
        &self,
        f: impl FnOnce(&mut S) -> R,
    ) -> Result<R, PortError> {
        let mut slot = self.table.lock(self.index);
        validate_slot(&slot, S::DEVICE_TYPE)?;

        let now = self.table.now();
        let error = slot.state_mismatch(S::DEVICE_TYPE);
        let state = S::from_state_mut(&mut slot.state).ok_or(error)?;
        let result = f(state);

        slot.timestamp = now;
        Ok(result)
    }
}

impl PartialEq for SmartPort<'_> {
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.table, other.table) && self.index == other.index
    }
}

impl Eq for SmartPort<'_> {}

mod private {
    pub trait Sealed {}
}

/// Per-device state that can live in a smart port slot.
///
/// This trait is sealed; it is implemented for the state type of every emulated device.
pub trait DeviceData: private::Sealed + Sized {
    /// The device type whose slots carry this state.
    const DEVICE_TYPE: SmartDeviceType;

    #[doc(hidden)]
    fn from_state(state: &DeviceState) -> Option<&Self>;

    #[doc(hidden)]
    fn from_state_mut(state: &mut DeviceState) -> Option<&mut Self>;
}

macro_rules! impl_device_data {
    ($($state:ty => $variant:ident, $device_type:ident;)*) => {
        $(
            impl private::Sealed for $state {}

            impl DeviceData for $state {
                const DEVICE_TYPE: SmartDeviceType = SmartDeviceType::$device_type;

                fn from_state(state: &DeviceState) -> Option<&Self> {
                    match state {
                        DeviceState::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }

                fn from_state_mut(state: &mut DeviceState) -> Option<&mut Self> {
                    match state {
                        DeviceState::$variant(inner) => Some(inner),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_device_data! {
    motor::MotorState => Motor, Motor;
    imu::ImuState => Imu, Imu;
    rotation::RotationState => Rotation, Rotation;
    distance::DistanceState => Distance, Distance;
    optical::OpticalState => Optical, Optical;
    vision::VisionState => Vision, Vision;
    gps::GpsState => Gps, Gps;
    expander::ExpanderState => Expander, Adi;
}

/// A possible type of device that can be plugged into a [`SmartPort`].
///
/// Each variant maps to one raw `V5_DeviceType` code used by the SDK. The SDK's "no sensor" code is
/// represented by `None` wherever a port may be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmartDeviceType {
    /// Smart Motor
    ///
    /// This corresponds to the [`Motor`](motor::Motor) device.
    Motor,

    /// LED
    Led,

    /// Rotation Sensor
    ///
    /// This corresponds to the [`RotationSensor`](rotation::RotationSensor) device.
    Rotation,

    /// Continuous rotation motor
    CrMotor,

    /// Inertial Sensor
    ///
    /// This corresponds to the [`InertialSensor`](imu::InertialSensor) device.
    Imu,

    /// Distance Sensor
    ///
    /// This corresponds to the [`DistanceSensor`](distance::DistanceSensor) device.
    Distance,

    /// Smart Radio
    ///
    /// This corresponds to the [`RadioLink`](link::RadioLink) device.
    Radio,

    /// Controller tether
    Tether,

    /// Brain
    Brain,

    /// Vision Sensor
    ///
    /// This corresponds to the [`VisionSensor`](vision::VisionSensor) device.
    Vision,

    /// ADI Expander
    ///
    /// This corresponds to the [`AdiExpander`](expander::AdiExpander) device.
    Adi,

    /// Optical Sensor
    ///
    /// This corresponds to the [`OpticalSensor`](optical::OpticalSensor) device.
    Optical,

    /// Workcell Electromagnet
    Electromagnet,

    /// GPS Sensor
    ///
    /// This corresponds to the [`GpsSensor`](gps::GpsSensor) device.
    Gps,

    /// Bumper
    Bumper,

    /// Legacy gyro
    Gyro,

    /// Sonar
    Sonar,

    /// Generic Sensor
    GenericSensor,

    /// Generic Serial Port
    GenericSerial,

    /// The SDK's undefined device code.
    Undefined,

    /// A device code with no named counterpart, kept as-is.
    Unknown(u8),
}

impl SmartDeviceType {
    /// Decodes a raw SDK device type code.
    ///
    /// Returns `None` for the "no sensor" code (`0`). Codes that do not name a known device kind
    /// decode to [`SmartDeviceType::Unknown`], which keeps the code.
    #[must_use]
    pub const fn from_raw(code: u8) -> Option<Self> {
        Some(match code {
            0 => return None,
            2 => Self::Motor,
            3 => Self::Led,
            4 => Self::Rotation,
            5 => Self::CrMotor,
            6 => Self::Imu,
            7 => Self::Distance,
            8 => Self::Radio,
            9 => Self::Tether,
            10 => Self::Brain,
            11 => Self::Vision,
            12 => Self::Adi,
            16 => Self::Optical,
            17 => Self::Electromagnet,
            20 => Self::Gps,
            0x40 => Self::Bumper,
            0x46 => Self::Gyro,
            0x47 => Self::Sonar,
            128 => Self::GenericSensor,
            129 => Self::GenericSerial,
            255 => Self::Undefined,
            other => Self::Unknown(other),
        })
    }

    /// Decodes an SDK device type, returning `None` for `kDeviceTypeNoSensor`.
    #[must_use]
    pub const fn from_device_type(raw: V5_DeviceType) -> Option<Self> {
        Self::from_raw(raw.0 as u8)
    }

    /// Returns the raw SDK device type code.
    #[must_use]
    pub const fn into_raw(self) -> u8 {
        match self {
            Self::Motor => 2,
            Self::Led => 3,
            Self::Rotation => 4,
            Self::CrMotor => 5,
            Self::Imu => 6,
            Self::Distance => 7,
            Self::Radio => 8,
            Self::Tether => 9,
            Self::Brain => 10,
            Self::Vision => 11,
            Self::Adi => 12,
            Self::Optical => 16,
            Self::Electromagnet => 17,
            Self::Gps => 20,
            Self::Bumper => 0x40,
            Self::Gyro => 0x46,
            Self::Sonar => 0x47,
            Self::GenericSensor => 128,
            Self::GenericSerial => 129,
            Self::Undefined => 255,
            Self::Unknown(code) => code,
        }
    }
}

impl From<SmartDeviceType> for V5_DeviceType {
    fn from(value: SmartDeviceType) -> Self {
        Self(value.into_raw() as _)
    }
}

/// Errors that can occur when performing operations on [`SmartPort`]-connected devices.
///
/// Every smart device operation returns this type when an error occurs.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PortError {
    /// No device was plugged into the port, when one was expected.
    #[snafu(display("Expected a device to be connected to port {port}"))]
    Disconnected {
        /// The port that was expected to have a device
        port: u8,
    },

    /// The wrong type of device is plugged into the port.
    #[snafu(display(
        "Expected a {expected:?} device on port {port}, but found a {actual:?} device"
    ))]
    IncorrectDevice {
        /// The device type that was expected
        expected: SmartDeviceType,
        /// The device type that was found
        actual: SmartDeviceType,
        /// The port that was expected to have a device
        port: u8,
    },

    /// The port index does not name a slot of the port table.
    #[snafu(display("Port index {index} is outside of the port table"))]
    InvalidPort {
        /// The rejected port index
        index: u8,
    },
}

/// A raw SDK enum value that has no typed counterpart.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Snafu)]
#[snafu(display("Unrecognized raw {kind} value {value}"))]
pub struct UnknownVariantError {
    /// The name of the enum being decoded.
    pub kind: &'static str,
    /// The raw value that was rejected.
    pub value: u32,
}

impl DeviceSlot {
    /// Builds the error reported when the type tag matched but the state variant did not.
    pub(crate) fn state_mismatch(&self, expected: SmartDeviceType) -> PortError {
        PortError::IncorrectDevice {
            expected,
            actual: self.state.device_type().unwrap_or(SmartDeviceType::Undefined),
            port: self.port,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::table;

    #[test]
    fn raw_device_codes() {
        assert_eq!(SmartDeviceType::from_raw(0), None);
        assert_eq!(SmartDeviceType::from_raw(2), Some(SmartDeviceType::Motor));
        assert_eq!(SmartDeviceType::from_raw(0x46), Some(SmartDeviceType::Gyro));
        assert_eq!(SmartDeviceType::from_raw(14), Some(SmartDeviceType::Unknown(14)));
        assert_eq!(SmartDeviceType::from_raw(255), Some(SmartDeviceType::Undefined));
        assert_eq!(SmartDeviceType::Unknown(14).into_raw(), 14);
        assert_eq!(SmartDeviceType::Gps.into_raw(), 20);

        let raw: V5_DeviceType = SmartDeviceType::Imu.into();
        assert_eq!(
            SmartDeviceType::from_device_type(raw),
            Some(SmartDeviceType::Imu)
        );
    }

    #[test]
    fn validate_type_errors() {
        let (_clock, table) = table();
        let port = table.port(3).unwrap();

        assert_eq!(
            port.validate_type(SmartDeviceType::Motor),
            Err(PortError::Disconnected { port: 3 })
        );

        table.install_device(3, SmartDeviceType::Imu).unwrap();
        assert_eq!(
            port.validate_type(SmartDeviceType::Imu),
            Err(PortError::Disconnected { port: 3 })
        );

        table.connect_device(3).unwrap();
        assert_eq!(port.validate_type(SmartDeviceType::Imu), Ok(()));
        assert_eq!(
            port.validate_type(SmartDeviceType::Motor),
            Err(PortError::IncorrectDevice {
                expected: SmartDeviceType::Motor,
                actual: SmartDeviceType::Imu,
                port: 3,
            })
        );
    }

    #[test]
    fn connected_without_type_is_disconnected() {
        let (_clock, table) = table();
        table.connect_device(5).unwrap();

        let port = table.port(5).unwrap();
        assert_eq!(port.device_type(), None);
        assert_eq!(
            port.validate_type(SmartDeviceType::Motor),
            Err(PortError::Disconnected { port: 5 })
        );
    }

    #[test]
    fn state_access_stamps_timestamp() {
        let (clock, table) = table();
        table.plug_in_device(1, SmartDeviceType::Rotation).unwrap();
        let port = table.port(1).unwrap();

        clock.advance(core::time::Duration::from_millis(75));
        let position = port
            .with_state(|state: &rotation::RotationState| state.position)
            .unwrap();
        assert_eq!(position, 0.0);
        assert_eq!(port.timestamp(), LowResolutionTime::EPOCH);

        port.with_state_mut(|state: &mut rotation::RotationState| state.position = 90.0)
            .unwrap();
        assert!(port.timestamp() > LowResolutionTime::EPOCH);
        assert_eq!(port.timestamp().as_millis_since_epoch(), 75);
    }

    #[test]
    fn failed_guard_leaves_slot_untouched() {
        let (clock, table) = table();
        table.plug_in_device(2, SmartDeviceType::Imu).unwrap();
        let port = table.port(2).unwrap();

        clock.advance(core::time::Duration::from_millis(10));
        let result = port.with_state_mut(|state: &mut motor::MotorState| state.voltage = 12_000);

        assert!(matches!(result, Err(PortError::IncorrectDevice { .. })));
        assert_eq!(port.timestamp(), LowResolutionTime::EPOCH);
    }
}
