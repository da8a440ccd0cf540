//! Inertial Sensor
//!
//! The emulated inertial sensor reports whatever rotation and acceleration vectors the emulator
//! publishes into its [`ImuState`]. The only behavior it models on its own is calibration: a
//! [`reset`](InertialSensor::reset) starts a window (three seconds by default) during which the
//! sensor reports [`InertialStatus::CALIBRATING`]. The window is checked when the status is read,
//! and the read that observes its end also clears it.

use bitflags::bitflags;
use tracing::{debug, warn};
use vex_sdk::{V5_DeviceImuAttitude, V5_DeviceImuRaw, V5ImuOrientationMode};
use vexide_emu_core::time::LowResolutionTime;

use super::{PortError, SmartDevice, SmartDeviceType, SmartPort, UnknownVariantError};

/// An inertial sensor (IMU) plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InertialSensor<'a> {
    port: SmartPort<'a>,
}

impl<'a> InertialSensor<'a> {
    /// Creates an inertial sensor driver on a port.
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }

    fn read<R>(&self, f: impl FnOnce(&ImuState) -> R) -> Result<R, PortError> {
        self.port.with_state(f)
    }

    /// Starts a calibration window at the current time.
    ///
    /// Resetting a sensor that is already calibrating restarts its window.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn reset(&mut self) -> Result<(), PortError> {
        let now = self.port.table().now();
        self.port
            .with_state_mut(|imu: &mut ImuState| imu.reset_timestamp = Some(now))?;

        debug!(port = self.port.index(), reset_at = ?now, "imu calibration started");
        Ok(())
    }

    /// Returns the sensor's status bits.
    ///
    /// While a calibration window is open this reports [`InertialStatus::CALIBRATING`]. Once the
    /// configured calibration time has elapsed, the first status read clears the window and every
    /// read after it reports an empty status. Only the read that clears the window updates the
    /// slot's timestamp.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn status(&self) -> Result<InertialStatus, PortError> {
        let calibration_time = self.port.config().imu_calibration_time;
        let now = self.port.table().now();

        let reset_at = self.read(|imu| imu.reset_timestamp)?;
        let Some(reset_at) = reset_at else {
            return Ok(InertialStatus::empty());
        };

        if now.saturating_duration_since(reset_at) < calibration_time {
            return Ok(InertialStatus::CALIBRATING);
        }

        // The window may have been restarted since it was read above.
        let (status, finished) = self.port.with_state_mut(|imu: &mut ImuState| {
            match imu.reset_timestamp {
                Some(reset_at) if now.saturating_duration_since(reset_at) < calibration_time => {
                    (InertialStatus::CALIBRATING, false)
                }
                Some(_) => {
                    imu.reset_timestamp = None;
                    (InertialStatus::empty(), true)
                }
                None => (InertialStatus::empty(), false),
            }
        })?;

        if finished {
            debug!(port = self.port.index(), "imu calibration finished");
        }
        Ok(status)
    }

    /// Returns `true` if the sensor is inside a calibration window.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn is_calibrating(&self) -> Result<bool, PortError> {
        Ok(self.status()?.contains(InertialStatus::CALIBRATING))
    }

    /// Returns the raw yaw reading in degrees, without any wrapping.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn heading(&self) -> Result<f64, PortError> {
        self.read(|imu| imu.rotation.z)
    }

    /// Returns the yaw reading wrapped to a single turn.
    ///
    /// This is the floating point remainder of the yaw by 360, which keeps the sign of the yaw:
    /// a yaw of `370.0` reads `10.0` and a yaw of `-10.0` reads `-10.0`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn degrees(&self) -> Result<f64, PortError> {
        self.read(|imu| imu.rotation.z % 360.0)
    }

    /// Returns the sensor's orientation as a quaternion.
    ///
    /// Orientation fusion is not emulated, so this is always the zero quaternion.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn quaternion(&self) -> Result<mint::Quaternion<f64>, PortError> {
        self.validate_port()?;

        Ok(mint::Quaternion {
            v: mint::Vector3 {
                x: 0.0,
                y: 0.0,
                z: 0.0,
            },
            s: 0.0,
        })
    }

    /// Returns the sensor's pitch, roll and yaw in degrees.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn attitude(&self) -> Result<ImuAttitude, PortError> {
        self.read(|imu| ImuAttitude {
            pitch: imu.rotation.x,
            roll: imu.rotation.y,
            yaw: imu.rotation.z,
        })
    }

    /// Returns the raw rotation vector exactly as published.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn raw_gyro(&self) -> Result<ImuRaw, PortError> {
        self.read(|imu| imu.rotation)
    }

    /// Returns the raw acceleration vector exactly as published.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn raw_accel(&self) -> Result<ImuRaw, PortError> {
        self.read(|imu| imu.acceleration)
    }

    /// Accepts a raw mode word and ignores it.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn set_mode(&mut self, _mode: u32) -> Result<(), PortError> {
        self.validate_port()?;
        warn!(port = self.port.index(), "set_mode does nothing on an emulated imu");
        Ok(())
    }

    /// Returns the sensor's raw mode word, which is always `0`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn mode(&self) -> Result<u32, PortError> {
        self.validate_port()?;
        Ok(0)
    }

    /// Accepts a data rate in milliseconds and ignores it.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn set_data_rate(&mut self, _rate: u32) -> Result<(), PortError> {
        self.validate_port()?;
        warn!(port = self.port.index(), "set_data_rate does nothing on an emulated imu");
        Ok(())
    }

    /// Returns the physical orientation published for the sensor.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if an IMU is not connected to the port.
    pub fn physical_orientation(&self) -> Result<InertialOrientation, PortError> {
        self.read(|imu| imu.orientation)
    }
}

impl SmartDevice for InertialSensor<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Imu
    }
}

/// The state of an emulated inertial sensor.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImuState {
    /// Physical mounting orientation.
    pub orientation: InertialOrientation,
    /// Rotation in degrees: `x` is pitch, `y` is roll and `z` is yaw.
    pub rotation: ImuRaw,
    /// Acceleration in g.
    pub acceleration: ImuRaw,
    /// Start of the open calibration window, if any.
    pub reset_timestamp: Option<LowResolutionTime>,
}

/// A raw four component reading from an inertial sensor.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ImuRaw {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
    /// W component.
    pub w: f64,
}

impl From<ImuRaw> for V5_DeviceImuRaw {
    fn from(value: ImuRaw) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
            w: value.w,
        }
    }
}

impl From<ImuRaw> for mint::Vector3<f64> {
    fn from(value: ImuRaw) -> Self {
        Self {
            x: value.x,
            y: value.y,
            z: value.z,
        }
    }
}

/// Euler angles reported by an inertial sensor, in degrees.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ImuAttitude {
    /// Rotation about the sensor's X axis.
    pub pitch: f64,
    /// Rotation about the sensor's Y axis.
    pub roll: f64,
    /// Rotation about the sensor's Z axis.
    pub yaw: f64,
}

impl From<ImuAttitude> for V5_DeviceImuAttitude {
    fn from(value: ImuAttitude) -> Self {
        Self {
            pitch: value.pitch,
            roll: value.roll,
            yaw: value.yaw,
        }
    }
}

/// Represents one of six possible physical IMU orientations relative
/// to the earth's center of gravity.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum InertialOrientation {
    /// Z-Axis facing up (VEX logo facing DOWN).
    #[default]
    ZUp,

    /// Z-Axis facing down (VEX logo facing UP).
    ZDown,

    /// X-axis facing up.
    XUp,

    /// X-axis facing down.
    XDown,

    /// Y-axis facing up.
    YUp,

    /// Y-axis facing down.
    YDown,
}

impl From<InertialOrientation> for V5ImuOrientationMode {
    fn from(value: InertialOrientation) -> Self {
        match value {
            InertialOrientation::ZUp => Self::kImuOrientationZUp,
            InertialOrientation::ZDown => Self::kImuOrientationZDown,
            InertialOrientation::XUp => Self::kImuOrientationXUp,
            InertialOrientation::XDown => Self::kImuOrientationXDown,
            InertialOrientation::YUp => Self::kImuOrientationYUp,
            InertialOrientation::YDown => Self::kImuOrientationYDown,
        }
    }
}

impl TryFrom<V5ImuOrientationMode> for InertialOrientation {
    type Error = UnknownVariantError;

    fn try_from(value: V5ImuOrientationMode) -> Result<Self, Self::Error> {
        match value {
            V5ImuOrientationMode::kImuOrientationZUp => Ok(Self::ZUp),
            V5ImuOrientationMode::kImuOrientationZDown => Ok(Self::ZDown),
            V5ImuOrientationMode::kImuOrientationXUp => Ok(Self::XUp),
            V5ImuOrientationMode::kImuOrientationXDown => Ok(Self::XDown),
            V5ImuOrientationMode::kImuOrientationYUp => Ok(Self::YUp),
            V5ImuOrientationMode::kImuOrientationYDown => Ok(Self::YDown),
            other => Err(UnknownVariantError {
                kind: "V5ImuOrientationMode",
                value: u32::from(other.0),
            }),
        }
    }
}

bitflags! {
    /// The status bits returned by an [`InertialSensor`].
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub struct InertialStatus: u32 {
        /// The sensor is currently calibrating.
        const CALIBRATING = 0b00001;
    }
}

#[cfg(test)]
mod test {
    use core::time::Duration;

    use vexide_emu_core::config::EmulatorConfig;

    use super::*;
    use crate::test_util::{table, table_with_config};

    fn publish(sensor: &InertialSensor<'_>, rotation: ImuRaw) {
        sensor
            .port()
            .with_state_mut(|imu: &mut ImuState| imu.rotation = rotation)
            .unwrap();
    }

    #[test]
    fn calibration_window() {
        let (clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let mut imu = InertialSensor::new(table.port(0).unwrap());

        assert_eq!(imu.status(), Ok(InertialStatus::empty()));

        imu.reset().unwrap();
        assert_eq!(imu.status(), Ok(InertialStatus::CALIBRATING));

        clock.advance(Duration::from_millis(2999));
        assert_eq!(imu.is_calibrating(), Ok(true));

        clock.advance(Duration::from_millis(1));
        assert_eq!(imu.status(), Ok(InertialStatus::empty()));
        assert_eq!(imu.status(), Ok(InertialStatus::empty()));

        let reset_timestamp = imu
            .port()
            .with_state(|state: &ImuState| state.reset_timestamp)
            .unwrap();
        assert_eq!(reset_timestamp, None);
    }

    #[test]
    fn reset_restarts_window() {
        let (clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let mut imu = InertialSensor::new(table.port(0).unwrap());

        imu.reset().unwrap();
        clock.advance(Duration::from_millis(2000));
        imu.reset().unwrap();
        clock.advance(Duration::from_millis(2000));

        assert_eq!(imu.is_calibrating(), Ok(true));
    }

    #[test]
    fn status_reads_only_stamp_when_window_closes() {
        let (clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let mut imu = InertialSensor::new(table.port(0).unwrap());

        clock.advance(Duration::from_millis(500));
        assert_eq!(imu.status(), Ok(InertialStatus::empty()));
        assert_eq!(imu.port().timestamp(), LowResolutionTime::EPOCH);

        imu.reset().unwrap();
        assert_eq!(imu.port().timestamp().as_millis_since_epoch(), 500);

        clock.advance(Duration::from_millis(1000));
        assert_eq!(imu.status(), Ok(InertialStatus::CALIBRATING));
        assert_eq!(imu.port().timestamp().as_millis_since_epoch(), 500);

        clock.advance(Duration::from_millis(2000));
        assert_eq!(imu.status(), Ok(InertialStatus::empty()));
        assert_eq!(imu.port().timestamp().as_millis_since_epoch(), 3500);

        clock.advance(Duration::from_millis(100));
        assert_eq!(imu.status(), Ok(InertialStatus::empty()));
        assert_eq!(imu.port().timestamp().as_millis_since_epoch(), 3500);
    }

    #[test]
    fn calibration_time_from_config() {
        let config = EmulatorConfig::new().with_imu_calibration_time(Duration::from_millis(100));
        let (clock, table) = table_with_config(config);
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let mut imu = InertialSensor::new(table.port(0).unwrap());

        imu.reset().unwrap();
        clock.advance(Duration::from_millis(100));
        assert_eq!(imu.is_calibrating(), Ok(false));
    }

    #[test]
    fn heading_and_degrees() {
        let (_clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let imu = InertialSensor::new(table.port(0).unwrap());

        publish(&imu, ImuRaw { z: 370.0, ..Default::default() });
        assert_eq!(imu.heading(), Ok(370.0));
        assert_eq!(imu.degrees(), Ok(10.0));

        publish(&imu, ImuRaw { z: -10.0, ..Default::default() });
        assert_eq!(imu.heading(), Ok(-10.0));
        assert_eq!(imu.degrees(), Ok(-10.0));

        publish(&imu, ImuRaw { z: -725.0, ..Default::default() });
        assert_eq!(imu.degrees(), Ok(-5.0));
    }

    #[test]
    fn attitude_and_raw_readback() {
        let (_clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let imu = InertialSensor::new(table.port(0).unwrap());

        let rotation = ImuRaw {
            x: 1.5,
            y: -2.25,
            z: 90.0,
            w: 0.125,
        };
        let acceleration = ImuRaw {
            x: 0.0,
            y: 0.0,
            z: 1.0,
            w: 0.0,
        };
        imu.port()
            .with_state_mut(|state: &mut ImuState| {
                state.rotation = rotation;
                state.acceleration = acceleration;
            })
            .unwrap();

        assert_eq!(
            imu.attitude(),
            Ok(ImuAttitude {
                pitch: 1.5,
                roll: -2.25,
                yaw: 90.0,
            })
        );
        assert_eq!(imu.raw_gyro(), Ok(rotation));
        assert_eq!(imu.raw_accel(), Ok(acceleration));
    }

    #[test]
    fn inert_operations() {
        let (_clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let mut imu = InertialSensor::new(table.port(0).unwrap());
        let before = table.slot(0).unwrap();

        imu.set_mode(7).unwrap();
        imu.set_data_rate(5).unwrap();

        assert_eq!(imu.mode(), Ok(0));
        assert_eq!(imu.quaternion().unwrap().s, 0.0);
        assert_eq!(table.slot(0).unwrap(), before);
    }

    #[test]
    fn guard_rejects_motor() {
        let (_clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        let mut imu = InertialSensor::new(table.port(0).unwrap());
        let before = table.slot(0).unwrap();

        assert!(imu.reset().is_err());
        assert!(imu.status().is_err());
        assert!(imu.quaternion().is_err());
        assert_eq!(table.slot(0).unwrap(), before);
    }
}
