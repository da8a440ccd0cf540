//! SDK-shaped device functions.
//!
//! [`Jumptable`] speaks the calling convention of the VEXos device SDK instead of returning
//! [`Result`]s: every function returns a plain value, and failures are reported through a sentinel
//! return value plus an error code left in [`Jumptable::errno`].
//!
//! | Return type     | Failure sentinel                         |
//! |-----------------|------------------------------------------|
//! | integer or enum | [`PROS_ERR`] (truncated to the raw type) |
//! | `f64`           | [`PROS_ERR_F`]                           |
//! | `bool`          | `true` (`PROS_ERR` is nonzero)           |
//! | nothing         | no effect                                |
//!
//! A missing device and a device of the wrong type both report [`ENODEV`]. Out-of-range port
//! indices and unrecognized raw enum values report [`EINVAL`].
//!
//! Device handles are [`SmartPort`]s obtained from [`Jumptable::device_get_by_index`].

use std::sync::Arc;

use tracing::trace;
use vex_sdk::{
    V5_DeviceImuAttitude, V5_DeviceImuQuaternion, V5_DeviceImuRaw, V5_DeviceType,
    V5MotorBrakeMode, V5MotorControlMode, V5MotorEncoderUnits, V5MotorGearset,
};
use vexide_emu_core::error::{EINVAL, ENODEV, Errno, PROS_ERR, PROS_ERR_F};

use crate::{
    ports::{MAX_DEVICE_PORTS, PortTable},
    smart::{
        PortError, SmartDevice, SmartDeviceType, SmartPort, UnknownVariantError,
        imu::InertialSensor,
        link::{LinkType, RadioLink},
        motor::{BrakeMode, EncoderUnits, Gearset, Motor, MotorTuningConstants},
    },
};

/// Sentinel returned by `bool` functions on failure.
const PROS_ERR_BOOL: bool = PROS_ERR != 0;

/// The SDK device function surface over a [`PortTable`].
#[derive(Debug)]
pub struct Jumptable<'a> {
    table: &'a PortTable,
    errno: Errno,
}

impl<'a> Jumptable<'a> {
    /// Creates a function surface over `table` with a clear error code.
    #[must_use]
    pub const fn new(table: &'a PortTable) -> Self {
        Self {
            table,
            errno: Errno::new(),
        }
    }

    /// Returns the error code side channel.
    #[must_use]
    pub const fn errno(&self) -> &Errno {
        &self.errno
    }

    /// Returns the table behind this surface.
    #[must_use]
    pub const fn table(&self) -> &'a PortTable {
        self.table
    }

    /// Unwraps a guarded result, recording [`ENODEV`] for a missing or mismatched device and
    /// [`EINVAL`] for an index outside of the table.
    fn check<T>(&self, result: Result<T, PortError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                trace!(%error, "device guard failed");
                self.errno.set(match error {
                    PortError::InvalidPort { .. } => EINVAL,
                    PortError::Disconnected { .. } | PortError::IncorrectDevice { .. } => ENODEV,
                });
                None
            }
        }
    }

    /// Unwraps a raw enum conversion, recording [`EINVAL`] on failure.
    fn decode<T>(&self, result: Result<T, UnknownVariantError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                trace!(%error, "rejected raw value");
                self.errno.set(EINVAL);
                None
            }
        }
    }

    /// Sets the device type of a slot without marking it present.
    ///
    /// Installing `kDeviceTypeNoSensor` clears the slot's type. An out-of-range index records
    /// [`EINVAL`] and changes nothing.
    pub fn install_device(&self, index: u8, device_type: V5_DeviceType) {
        let device_type = SmartDeviceType::from_device_type(device_type);
        self.check(self.table.install(index, device_type));
    }

    // MARK: Generic device

    /// Returns the number of connected devices.
    #[must_use]
    pub fn devices_get_number(&self) -> u32 {
        self.table.device_count() as u32
    }

    /// Returns the number of connected devices of a type.
    #[must_use]
    pub fn devices_get_number_by_type(&self, device_type: V5_DeviceType) -> u32 {
        SmartDeviceType::from_device_type(device_type)
            .map_or(0, |device_type| self.table.device_count_by_type(device_type) as u32)
    }

    /// Returns a handle to every slot of the table.
    pub fn devices_get(&self) -> impl Iterator<Item = SmartPort<'a>> + 'a {
        self.table.ports()
    }

    /// Returns a handle to the slot at `index`, or `None` past the end of the table.
    #[must_use]
    pub fn device_get_by_index(&self, index: u32) -> Option<SmartPort<'a>> {
        let index = u8::try_from(index).ok()?;
        self.table.port(index).ok()
    }

    /// Fills `buffer` with the connected device type of every slot.
    ///
    /// Slots without a connected device report `kDeviceTypeNoSensor`. Always returns `0`.
    pub fn device_get_status(&self, buffer: &mut [V5_DeviceType; MAX_DEVICE_PORTS]) -> i32 {
        for (entry, device_type) in buffer.iter_mut().zip(self.table.device_status()) {
            *entry = device_type.map_or(V5_DeviceType::kDeviceTypeNoSensor, V5_DeviceType::from);
        }
        0
    }

    /// Returns the time a slot was last updated, in milliseconds.
    #[must_use]
    pub fn device_get_timestamp(&self, device: SmartPort<'_>) -> u32 {
        device.timestamp().as_millis_since_epoch()
    }

    /// Returns the time the slot at `index` was last updated, in milliseconds, or `-1` if
    /// `index` is outside of the table.
    #[must_use]
    pub fn device_get_timestamp_by_index(&self, index: i32) -> i32 {
        u8::try_from(index)
            .ok()
            .and_then(|index| self.table.timestamp_by_index(index).ok())
            .map_or(-1, |timestamp| timestamp.as_millis_since_epoch() as i32)
    }

    // MARK: Generic radio

    /// Returns the number of received bytes waiting, which is always `0`.
    #[must_use]
    pub fn device_generic_radio_receive_avail(&self, device: SmartPort<'_>) -> u32 {
        RadioLink::open(device, "", LinkType::Worker).unread_bytes() as u32
    }

    /// Returns the free space in the receive buffer, which is always `0`.
    #[must_use]
    pub fn device_generic_radio_receive_free(&self, device: SmartPort<'_>) -> u32 {
        RadioLink::open(device, "", LinkType::Worker).receive_free() as u32
    }

    /// Requests a radio link. The request is ignored.
    pub fn device_generic_radio_connection(
        &self,
        device: SmartPort<'_>,
        link_id: &str,
        link_type: i32,
        _override: bool,
    ) {
        let link_type = match link_type {
            0 => LinkType::Manager,
            _ => LinkType::Worker,
        };
        _ = RadioLink::open(device, link_id, link_type);
    }

    /// Returns whether the radio is linked, which is never the case.
    #[must_use]
    pub fn device_generic_radio_link_status(&self, device: SmartPort<'_>) -> bool {
        RadioLink::open(device, "", LinkType::Worker).is_linked()
    }

    /// Returns the free space in the transmit buffer, which is always `0`.
    #[must_use]
    pub fn device_generic_radio_write_free(&self, device: SmartPort<'_>) -> i32 {
        RadioLink::open(device, "", LinkType::Worker).available_write_bytes() as i32
    }

    /// Transmits nothing and returns `0`.
    pub fn device_generic_radio_transmit(&self, device: SmartPort<'_>, data: &[u8]) -> i32 {
        let mut link = RadioLink::open(device, "", LinkType::Worker);
        std::io::Write::write(&mut link, data).map_or(0, |written| written as i32)
    }

    /// Receives nothing and returns `0`.
    pub fn device_generic_radio_receive(&self, device: SmartPort<'_>, data: &mut [u8]) -> i32 {
        let mut link = RadioLink::open(device, "", LinkType::Worker);
        std::io::Read::read(&mut link, data).map_or(0, |read| read as i32)
    }

    // MARK: Motor

    /// Sets the velocity setpoint and switches to velocity control.
    pub fn device_motor_velocity_set(&self, device: SmartPort<'_>, velocity: i32) {
        self.check(Motor::new(device).set_velocity(velocity));
    }

    /// Sets the velocity setpoint without changing the control mode.
    pub fn device_motor_velocity_update(&self, device: SmartPort<'_>, velocity: i32) {
        self.check(Motor::new(device).update_velocity(velocity));
    }

    /// Sets the output voltage and switches to raw voltage drive.
    pub fn device_motor_voltage_set(&self, device: SmartPort<'_>, value: i32) {
        self.check(Motor::new(device).set_voltage(value));
    }

    /// Returns the velocity setpoint.
    #[must_use]
    pub fn device_motor_velocity_get(&self, device: SmartPort<'_>) -> i32 {
        self.check(Motor::new(device).velocity()).unwrap_or(PROS_ERR)
    }

    /// Returns the measured velocity.
    #[must_use]
    pub fn device_motor_actual_velocity_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(Motor::new(device).actual_velocity())
            .unwrap_or(PROS_ERR_F)
    }

    /// Returns `-1` for a reversed motor and `1` otherwise.
    #[must_use]
    pub fn device_motor_direction_get(&self, device: SmartPort<'_>) -> i32 {
        self.check(Motor::new(device).direction())
            .map_or(PROS_ERR, |direction| direction.signum())
    }

    /// Forces a control mode.
    pub fn device_motor_mode_set(&self, device: SmartPort<'_>, mode: V5MotorControlMode) {
        self.check(Motor::new(device).set_mode(mode.into()));
    }

    /// Returns the control mode.
    #[must_use]
    pub fn device_motor_mode_get(&self, device: SmartPort<'_>) -> V5MotorControlMode {
        self.check(Motor::new(device).mode())
            .map_or(V5MotorControlMode(PROS_ERR as _), V5MotorControlMode::from)
    }

    /// Accepts a PWM duty cycle and ignores it.
    pub fn device_motor_pwm_set(&self, device: SmartPort<'_>, value: i32) {
        self.check(Motor::new(device).set_pwm(value));
    }

    /// Returns `0`.
    #[must_use]
    pub fn device_motor_pwm_get(&self, device: SmartPort<'_>) -> i32 {
        self.check(Motor::new(device).pwm()).unwrap_or(PROS_ERR)
    }

    /// Sets the current limit.
    pub fn device_motor_current_limit_set(&self, device: SmartPort<'_>, value: i32) {
        self.check(Motor::new(device).set_current_limit(value));
    }

    /// Returns the current limit.
    #[must_use]
    pub fn device_motor_current_limit_get(&self, device: SmartPort<'_>) -> i32 {
        self.check(Motor::new(device).current_limit())
            .unwrap_or(PROS_ERR)
    }

    /// Sets the voltage limit.
    pub fn device_motor_voltage_limit_set(&self, device: SmartPort<'_>, value: i32) {
        self.check(Motor::new(device).set_voltage_limit(value));
    }

    /// Returns the voltage limit.
    #[must_use]
    pub fn device_motor_voltage_limit_get(&self, device: SmartPort<'_>) -> i32 {
        self.check(Motor::new(device).voltage_limit())
            .unwrap_or(PROS_ERR)
    }

    /// Attaches position controller tuning constants owned by the caller.
    pub fn device_motor_position_pid_set(
        &self,
        device: SmartPort<'_>,
        pid: &Arc<MotorTuningConstants>,
    ) {
        self.check(Motor::new(device).set_position_tuning_constants(pid));
    }

    /// Attaches velocity controller tuning constants owned by the caller.
    pub fn device_motor_velocity_pid_set(
        &self,
        device: SmartPort<'_>,
        pid: &Arc<MotorTuningConstants>,
    ) {
        self.check(Motor::new(device).set_velocity_tuning_constants(pid));
    }

    /// Returns the measured current.
    #[must_use]
    pub fn device_motor_current_get(&self, device: SmartPort<'_>) -> i32 {
        self.check(Motor::new(device).current()).unwrap_or(PROS_ERR)
    }

    /// Returns the output voltage.
    #[must_use]
    pub fn device_motor_voltage_get(&self, device: SmartPort<'_>) -> i32 {
        self.check(Motor::new(device).voltage()).unwrap_or(PROS_ERR)
    }

    /// Returns the measured power.
    #[must_use]
    pub fn device_motor_power_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(Motor::new(device).power()).unwrap_or(PROS_ERR_F)
    }

    /// Returns the measured torque.
    #[must_use]
    pub fn device_motor_torque_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(Motor::new(device).torque()).unwrap_or(PROS_ERR_F)
    }

    /// Returns the measured efficiency.
    #[must_use]
    pub fn device_motor_efficiency_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(Motor::new(device).efficiency())
            .unwrap_or(PROS_ERR_F)
    }

    /// Returns the measured temperature.
    #[must_use]
    pub fn device_motor_temperature_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(Motor::new(device).temperature())
            .unwrap_or(PROS_ERR_F)
    }

    /// Returns whether the motor is hotter than the configured threshold.
    #[must_use]
    pub fn device_motor_over_temp_flag_get(&self, device: SmartPort<'_>) -> bool {
        self.check(Motor::new(device).is_over_temperature())
            .unwrap_or(PROS_ERR_BOOL)
    }

    /// Returns the current limit flag.
    #[must_use]
    pub fn device_motor_current_limit_flag_get(&self, device: SmartPort<'_>) -> bool {
        self.check(Motor::new(device).is_current_limited())
            .unwrap_or(PROS_ERR_BOOL)
    }

    /// Returns the raw fault word.
    #[must_use]
    pub fn device_motor_faults_get(&self, device: SmartPort<'_>) -> u32 {
        self.check(Motor::new(device).faults())
            .map_or(PROS_ERR as u32, |faults| faults.bits())
    }

    /// Returns the zero velocity flag.
    #[must_use]
    pub fn device_motor_zero_velocity_flag_get(&self, device: SmartPort<'_>) -> bool {
        self.check(Motor::new(device).is_zero_velocity())
            .unwrap_or(PROS_ERR_BOOL)
    }

    /// Returns the zero position flag.
    #[must_use]
    pub fn device_motor_zero_position_flag_get(&self, device: SmartPort<'_>) -> bool {
        self.check(Motor::new(device).is_zero_position())
            .unwrap_or(PROS_ERR_BOOL)
    }

    /// Returns the flag byte.
    #[must_use]
    pub fn device_motor_flags_get(&self, device: SmartPort<'_>) -> u32 {
        self.check(Motor::new(device).flags())
            .map_or(PROS_ERR as u32, |flags| u32::from(flags.bits()))
    }

    /// Sets whether the motor runs reversed.
    pub fn device_motor_reverse_flag_set(&self, device: SmartPort<'_>, value: bool) {
        self.check(Motor::new(device).set_reversed(value));
    }

    /// Returns whether the motor runs reversed.
    #[must_use]
    pub fn device_motor_reverse_flag_get(&self, device: SmartPort<'_>) -> bool {
        self.check(Motor::new(device).is_reversed())
            .unwrap_or(PROS_ERR_BOOL)
    }

    /// Sets the units of the position reading.
    pub fn device_motor_encoder_units_set(&self, device: SmartPort<'_>, units: V5MotorEncoderUnits) {
        let mut motor = Motor::new(device);
        if let Some(units) = self
            .check(motor.validate_port())
            .and_then(|()| self.decode(EncoderUnits::try_from(units)))
        {
            self.check(motor.set_encoder_units(units));
        }
    }

    /// Returns the units of the position reading.
    #[must_use]
    pub fn device_motor_encoder_units_get(&self, device: SmartPort<'_>) -> V5MotorEncoderUnits {
        self.check(Motor::new(device).encoder_units())
            .map_or(V5MotorEncoderUnits(PROS_ERR as _), V5MotorEncoderUnits::from)
    }

    /// Sets how the motor brakes.
    pub fn device_motor_brake_mode_set(&self, device: SmartPort<'_>, mode: V5MotorBrakeMode) {
        let mut motor = Motor::new(device);
        if let Some(mode) = self
            .check(motor.validate_port())
            .and_then(|()| self.decode(BrakeMode::try_from(mode)))
        {
            self.check(motor.set_brake_mode(mode));
        }
    }

    /// Returns how the motor brakes.
    #[must_use]
    pub fn device_motor_brake_mode_get(&self, device: SmartPort<'_>) -> V5MotorBrakeMode {
        self.check(Motor::new(device).brake_mode())
            .map_or(V5MotorBrakeMode(PROS_ERR as _), V5MotorBrakeMode::from)
    }

    /// Overwrites the position reading.
    pub fn device_motor_position_set(&self, device: SmartPort<'_>, position: f64) {
        self.check(Motor::new(device).set_position(position));
    }

    /// Returns the position reading.
    #[must_use]
    pub fn device_motor_position_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(Motor::new(device).position())
            .unwrap_or(PROS_ERR_F)
    }

    /// Returns the position reading truncated to an integer and writes the slot timestamp to
    /// `timestamp`.
    ///
    /// On failure `timestamp` is left untouched.
    pub fn device_motor_position_raw_get(&self, device: SmartPort<'_>, timestamp: &mut u32) -> i32 {
        match self.check(Motor::new(device).raw_position()) {
            Some((position, time)) => {
                *timestamp = time.as_millis_since_epoch();
                position
            }
            None => PROS_ERR,
        }
    }

    /// Sets the position reading to zero.
    pub fn device_motor_position_reset(&self, device: SmartPort<'_>) {
        self.check(Motor::new(device).reset_position());
    }

    /// Returns the position target.
    #[must_use]
    pub fn device_motor_target_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(Motor::new(device).position_target())
            .unwrap_or(PROS_ERR_F)
    }

    /// Accepts a servo target and ignores it.
    pub fn device_motor_servo_target_set(&self, device: SmartPort<'_>, position: f64) {
        self.check(Motor::new(device).set_servo_target(position));
    }

    /// Sets an absolute position target and switches to profiled movement.
    pub fn device_motor_absolute_target_set(
        &self,
        device: SmartPort<'_>,
        position: f64,
        velocity: i32,
    ) {
        self.check(Motor::new(device).set_position_target(position, velocity));
    }

    /// Sets a position target relative to the current position and switches to profiled
    /// movement.
    pub fn device_motor_relative_target_set(
        &self,
        device: SmartPort<'_>,
        position: f64,
        velocity: i32,
    ) {
        self.check(Motor::new(device).set_relative_position_target(position, velocity));
    }

    /// Sets the internal gearset.
    pub fn device_motor_gearing_set(&self, device: SmartPort<'_>, value: V5MotorGearset) {
        let mut motor = Motor::new(device);
        if let Some(gearset) = self
            .check(motor.validate_port())
            .and_then(|()| self.decode(Gearset::try_from(value)))
        {
            self.check(motor.set_gearset(gearset));
        }
    }

    /// Returns the internal gearset.
    #[must_use]
    pub fn device_motor_gearing_get(&self, device: SmartPort<'_>) -> V5MotorGearset {
        self.check(Motor::new(device).gearset())
            .map_or(V5MotorGearset(PROS_ERR as _), V5MotorGearset::from)
    }

    /// Accepts an external profile step and ignores it.
    pub fn device_motor_external_profile_set(
        &self,
        device: SmartPort<'_>,
        position: f64,
        velocity: i32,
    ) {
        self.check(Motor::new(device).set_external_profile(position, velocity));
    }

    // MARK: Inertial sensor

    /// Starts a calibration window.
    pub fn device_imu_reset(&self, device: SmartPort<'_>) {
        self.check(InertialSensor::new(device).reset());
    }

    /// Returns the unwrapped yaw.
    #[must_use]
    pub fn device_imu_heading_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(InertialSensor::new(device).heading())
            .unwrap_or(PROS_ERR_F)
    }

    /// Returns the yaw wrapped to a single turn.
    #[must_use]
    pub fn device_imu_degrees_get(&self, device: SmartPort<'_>) -> f64 {
        self.check(InertialSensor::new(device).degrees())
            .unwrap_or(PROS_ERR_F)
    }

    /// Validates the device and leaves `data` untouched.
    pub fn device_imu_quaternion_get(&self, device: SmartPort<'_>, _data: &mut V5_DeviceImuQuaternion) {
        self.check(InertialSensor::new(device).quaternion());
    }

    /// Writes pitch, roll and yaw to `data`.
    pub fn device_imu_attitude_get(&self, device: SmartPort<'_>, data: &mut V5_DeviceImuAttitude) {
        if let Some(attitude) = self.check(InertialSensor::new(device).attitude()) {
            *data = attitude.into();
        }
    }

    /// Copies the raw rotation vector to `data`.
    pub fn device_imu_raw_gyro_get(&self, device: SmartPort<'_>, data: &mut V5_DeviceImuRaw) {
        if let Some(raw) = self.check(InertialSensor::new(device).raw_gyro()) {
            *data = raw.into();
        }
    }

    /// Copies the raw acceleration vector to `data`.
    pub fn device_imu_raw_accel_get(&self, device: SmartPort<'_>, data: &mut V5_DeviceImuRaw) {
        if let Some(raw) = self.check(InertialSensor::new(device).raw_accel()) {
            *data = raw.into();
        }
    }

    /// Returns the status bits, closing a finished calibration window.
    #[must_use]
    pub fn device_imu_status_get(&self, device: SmartPort<'_>) -> u32 {
        self.check(InertialSensor::new(device).status())
            .map_or(PROS_ERR as u32, |status| status.bits())
    }

    /// Accepts a mode word and ignores it.
    pub fn device_imu_mode_set(&self, device: SmartPort<'_>, mode: u32) {
        self.check(InertialSensor::new(device).set_mode(mode));
    }

    /// Returns `0`.
    #[must_use]
    pub fn device_imu_mode_get(&self, device: SmartPort<'_>) -> u32 {
        self.check(InertialSensor::new(device).mode())
            .unwrap_or(PROS_ERR as u32)
    }

    /// Accepts a data rate and ignores it.
    pub fn device_imu_data_rate_set(&self, device: SmartPort<'_>, rate: u32) {
        self.check(InertialSensor::new(device).set_data_rate(rate));
    }
}

#[cfg(test)]
mod test {
    use core::time::Duration;

    use super::*;
    use crate::{
        smart::{imu::ImuState, motor::MotorState},
        test_util::table,
    };

    #[test]
    fn install_is_not_presence() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);

        sdk.install_device(3, SmartDeviceType::Motor.into());
        assert_eq!(sdk.devices_get_number(), 0);
        assert_eq!(sdk.errno().take(), 0);

        sdk.install_device(32, SmartDeviceType::Motor.into());
        assert_eq!(sdk.errno().take(), EINVAL);

        table.connect_device(3).unwrap();
        assert_eq!(sdk.devices_get_number(), 1);
        assert_eq!(
            sdk.devices_get_number_by_type(SmartDeviceType::Motor.into()),
            1
        );
        assert_eq!(
            sdk.devices_get_number_by_type(V5_DeviceType::kDeviceTypeNoSensor),
            0
        );
    }

    #[test]
    fn lookup_and_status() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(1, SmartDeviceType::Imu).unwrap();
        table.install_device(2, SmartDeviceType::Motor).unwrap();

        assert!(sdk.device_get_by_index(31).is_some());
        assert!(sdk.device_get_by_index(32).is_none());
        assert!(sdk.device_get_by_index(u32::MAX).is_none());
        assert_eq!(sdk.devices_get().count(), MAX_DEVICE_PORTS);

        let mut buffer = [V5_DeviceType::from(SmartDeviceType::Gps); MAX_DEVICE_PORTS];
        assert_eq!(sdk.device_get_status(&mut buffer), 0);
        assert_eq!(buffer[1], V5_DeviceType::kDeviceTypeImuSensor);
        assert_eq!(buffer[2], V5_DeviceType::kDeviceTypeNoSensor);
        assert!(
            buffer
                .iter()
                .enumerate()
                .all(|(index, entry)| index == 1 || *entry == V5_DeviceType::kDeviceTypeNoSensor)
        );
    }

    #[test]
    fn timestamps() {
        let (clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        let motor = sdk.device_get_by_index(0).unwrap();

        clock.advance(Duration::from_millis(1234));
        sdk.device_motor_velocity_set(motor, 10);

        assert_eq!(sdk.device_get_timestamp(motor), 1234);
        assert_eq!(sdk.device_get_timestamp_by_index(0), 1234);
        assert_eq!(sdk.device_get_timestamp_by_index(32), -1);
        assert_eq!(sdk.device_get_timestamp_by_index(-1), -1);
    }

    #[test]
    fn motor_guard_sentinels() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let device = sdk.device_get_by_index(0).unwrap();
        let before = table.slot(0).unwrap();

        sdk.device_motor_velocity_set(device, 100);
        assert_eq!(sdk.errno().take(), ENODEV);
        assert_eq!(sdk.errno().take(), 0);

        assert_eq!(sdk.device_motor_velocity_get(device), PROS_ERR);
        assert_eq!(sdk.errno().take(), ENODEV);

        assert_eq!(sdk.device_motor_position_get(device), PROS_ERR_F);
        assert_eq!(sdk.device_motor_power_get(device), PROS_ERR_F);
        assert!(sdk.device_motor_reverse_flag_get(device));
        assert_eq!(
            sdk.device_motor_mode_get(device),
            V5MotorControlMode(PROS_ERR as _)
        );

        let mut timestamp = 77;
        assert_eq!(sdk.device_motor_position_raw_get(device, &mut timestamp), PROS_ERR);
        assert_eq!(timestamp, 77);

        sdk.device_motor_brake_mode_set(device, V5MotorBrakeMode::kV5MotorBrakeModeHold);
        assert_eq!(sdk.errno().take(), ENODEV);

        assert_eq!(table.slot(0).unwrap(), before);
    }

    #[test]
    fn motor_round_trip() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(5, SmartDeviceType::Motor).unwrap();
        let motor = sdk.device_get_by_index(5).unwrap();

        sdk.device_motor_velocity_set(motor, 120);
        assert_eq!(sdk.device_motor_velocity_get(motor), 120);
        assert_eq!(
            sdk.device_motor_mode_get(motor),
            V5MotorControlMode::from(crate::smart::motor::MotorControlMode::Velocity)
        );

        sdk.device_motor_position_set(motor, 5.0);
        sdk.device_motor_relative_target_set(motor, 10.0, 50);
        assert_eq!(sdk.device_motor_target_get(motor), 15.0);

        sdk.device_motor_reverse_flag_set(motor, true);
        assert_eq!(sdk.device_motor_direction_get(motor), -1);
        assert_eq!(sdk.device_motor_flags_get(motor), 1 << 4);

        sdk.device_motor_gearing_set(motor, V5MotorGearset::kMotorGearSet_06);
        assert_eq!(
            sdk.device_motor_gearing_get(motor),
            V5MotorGearset::kMotorGearSet_06
        );

        sdk.device_motor_pwm_set(motor, 50);
        assert_eq!(sdk.device_motor_pwm_get(motor), 0);
        assert_eq!(sdk.errno().take(), 0);
    }

    #[test]
    fn rejects_unknown_raw_enums() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        let motor = sdk.device_get_by_index(0).unwrap();

        sdk.device_motor_brake_mode_set(motor, V5MotorBrakeMode(200));
        assert_eq!(sdk.errno().take(), EINVAL);
        assert_eq!(
            sdk.device_motor_brake_mode_get(motor),
            V5MotorBrakeMode::kV5MotorBrakeModeCoast
        );
    }

    #[test]
    fn unnamed_raw_codes_are_kept() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);

        sdk.install_device(4, V5_DeviceType(14));
        table.connect_device(4).unwrap();
        let mut buffer = [V5_DeviceType::kDeviceTypeNoSensor; MAX_DEVICE_PORTS];
        sdk.device_get_status(&mut buffer);
        assert_eq!(buffer[4], V5_DeviceType(14));
        assert_eq!(sdk.devices_get_number_by_type(V5_DeviceType(14)), 1);

        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        let motor = sdk.device_get_by_index(0).unwrap();
        sdk.device_motor_mode_set(motor, V5MotorControlMode(42));
        assert_eq!(sdk.device_motor_mode_get(motor), V5MotorControlMode(42));
        assert_eq!(sdk.errno().take(), 0);
    }

    #[test]
    fn imu_surface() {
        let (clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(0, SmartDeviceType::Imu).unwrap();
        let imu = sdk.device_get_by_index(0).unwrap();

        imu.with_state_mut(|state: &mut ImuState| {
            state.rotation.x = 3.0;
            state.rotation.z = 370.0;
        })
        .unwrap();

        assert_eq!(sdk.device_imu_heading_get(imu), 370.0);
        assert_eq!(sdk.device_imu_degrees_get(imu), 10.0);

        let mut attitude = V5_DeviceImuAttitude::default();
        sdk.device_imu_attitude_get(imu, &mut attitude);
        assert_eq!({ attitude.pitch }, 3.0);
        assert_eq!({ attitude.yaw }, 370.0);

        let mut quaternion = V5_DeviceImuQuaternion::default();
        quaternion.a = 9.0;
        sdk.device_imu_quaternion_get(imu, &mut quaternion);
        assert_eq!({ quaternion.a }, 9.0);

        sdk.device_imu_reset(imu);
        assert_eq!(sdk.device_imu_status_get(imu), 1);
        clock.advance(Duration::from_secs(3));
        assert_eq!(sdk.device_imu_status_get(imu), 0);
        assert_eq!(sdk.device_imu_status_get(imu), 0);
        assert_eq!(sdk.errno().take(), 0);
    }

    #[test]
    fn imu_guard_leaves_buffers() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        let device = sdk.device_get_by_index(0).unwrap();

        let mut raw = V5_DeviceImuRaw::default();
        raw.w = 4.0;
        sdk.device_imu_raw_gyro_get(device, &mut raw);
        assert_eq!({ raw.w }, 4.0);
        assert_eq!(sdk.errno().take(), ENODEV);

        assert_eq!(sdk.device_imu_status_get(device), PROS_ERR as u32);
        assert_eq!(sdk.device_imu_degrees_get(device), PROS_ERR_F);
    }

    #[test]
    fn radio_is_inert() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(0, SmartDeviceType::Radio).unwrap();
        table.plug_in_device(1, SmartDeviceType::Motor).unwrap();

        for index in [0, 1, 2] {
            let device = sdk.device_get_by_index(index).unwrap();
            sdk.device_generic_radio_connection(device, "link", 0, false);

            assert!(!sdk.device_generic_radio_link_status(device));
            assert_eq!(sdk.device_generic_radio_receive_avail(device), 0);
            assert_eq!(sdk.device_generic_radio_receive_free(device), 0);
            assert_eq!(sdk.device_generic_radio_write_free(device), 0);
            assert_eq!(sdk.device_generic_radio_transmit(device, b"hello"), 0);

            let mut buf = [0; 8];
            assert_eq!(sdk.device_generic_radio_receive(device, &mut buf), 0);
        }
        assert_eq!(sdk.errno().take(), 0);
    }

    #[test]
    fn motor_state_untouched_by_imu_calls() {
        let (_clock, table) = table();
        let sdk = Jumptable::new(&table);
        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        let device = sdk.device_get_by_index(0).unwrap();

        sdk.device_imu_reset(device);
        assert_eq!(sdk.errno().take(), ENODEV);
        assert_eq!(
            table.slot(0).unwrap().state,
            crate::ports::DeviceState::Motor(MotorState::default())
        );
    }
}
