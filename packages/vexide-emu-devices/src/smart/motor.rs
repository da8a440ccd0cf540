//! V5 Smart Motors
//!
//! The emulated motor is a bag of setpoints and measurements rather than a physical model. Driver
//! calls record what the program asked for (a control mode plus its setpoint) and read back
//! whatever the emulator last published as the motor's measured state.
//!
//! # Control modes
//!
//! Setting a setpoint switches the motor into the matching [`MotorControlMode`]:
//!
//! | Call                                   | Resulting mode                       |
//! |----------------------------------------|--------------------------------------|
//! | [`Motor::set_velocity`]                | [`MotorControlMode::Velocity`]       |
//! | [`Motor::set_voltage`]                 | [`MotorControlMode::Undefined`]      |
//! | [`Motor::set_position_target`]         | [`MotorControlMode::Profile`]        |
//! | [`Motor::set_relative_position_target`]| [`MotorControlMode::Profile`]        |
//!
//! Any mode may replace any other. [`Motor::update_velocity`] changes the velocity setpoint
//! without touching the mode.

use std::sync::{Arc, Weak};

use bitflags::bitflags;
use tracing::{debug, warn};
use vex_sdk::{V5MotorBrakeMode, V5MotorControlMode, V5MotorEncoderUnits, V5MotorGearset};
use vexide_emu_core::time::LowResolutionTime;

use super::{PortError, SmartDevice, SmartDeviceType, SmartPort, UnknownVariantError};

/// A smart motor plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Motor<'a> {
    port: SmartPort<'a>,
}

/// Represents a possible direction that a motor can be configured as.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Direction {
    /// Motor rotates in the forward direction.
    Forward,

    /// Motor rotates in the reverse direction.
    Reverse,
}

impl Direction {
    /// Returns `true` if the direction is [`Forward`](Direction::Forward).
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Returns `true` if the direction is [`Reverse`](Direction::Reverse).
    #[must_use]
    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::Reverse)
    }

    /// Returns `1` for [`Forward`](Direction::Forward) and `-1` for
    /// [`Reverse`](Direction::Reverse).
    #[must_use]
    pub const fn signum(&self) -> i32 {
        match self {
            Self::Forward => 1,
            Self::Reverse => -1,
        }
    }
}

impl core::ops::Not for Direction {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

impl<'a> Motor<'a> {
    /// Creates a motor driver on a port.
    ///
    /// No check is made here; every other operation validates the port itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use vexide_emu_core::time::ManualClock;
    /// use vexide_emu_devices::{PortTable, smart::{SmartDeviceType, motor::{Motor, MotorControlMode}}};
    ///
    /// let table = PortTable::new(Arc::new(ManualClock::new()));
    /// table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
    ///
    /// let mut motor = Motor::new(table.port(0).unwrap());
    /// motor.set_velocity(100).unwrap();
    ///
    /// assert_eq!(motor.velocity(), Ok(100));
    /// assert_eq!(motor.mode(), Ok(MotorControlMode::Velocity));
    /// ```
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }

    fn read<R>(&self, f: impl FnOnce(&MotorState) -> R) -> Result<R, PortError> {
        self.port.with_state(f)
    }

    fn write<R>(&mut self, f: impl FnOnce(&mut MotorState) -> R) -> Result<R, PortError> {
        self.port.with_state_mut(f)
    }

    fn set_mode_with(
        &mut self,
        mode: MotorControlMode,
        f: impl FnOnce(&mut MotorState),
    ) -> Result<(), PortError> {
        let previous = self.write(|motor| {
            f(motor);
            core::mem::replace(&mut motor.control_mode, mode)
        })?;

        if previous != mode {
            debug!(port = self.port.index(), ?previous, ?mode, "motor control mode changed");
        }
        Ok(())
    }

    /// Sets the motor's velocity setpoint in RPM and switches it to velocity control.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_velocity(&mut self, rpm: i32) -> Result<(), PortError> {
        self.set_mode_with(MotorControlMode::Velocity, |motor| motor.velocity_target = rpm)
    }

    /// Changes the velocity setpoint without changing the control mode.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn update_velocity(&mut self, rpm: i32) -> Result<(), PortError> {
        self.write(|motor| motor.velocity_target = rpm)
    }

    /// Returns the velocity setpoint in RPM.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn velocity(&self) -> Result<i32, PortError> {
        self.read(|motor| motor.velocity_target)
    }

    /// Returns the measured velocity of the motor in RPM.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn actual_velocity(&self) -> Result<f64, PortError> {
        self.read(|motor| motor.velocity)
    }

    /// Sets the raw output voltage of the motor in millivolts, switching it to raw voltage drive.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_voltage(&mut self, millivolts: i32) -> Result<(), PortError> {
        self.set_mode_with(MotorControlMode::Undefined, |motor| motor.voltage = millivolts)
    }

    /// Returns the motor's output voltage in millivolts.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn voltage(&self) -> Result<i32, PortError> {
        self.read(|motor| motor.voltage)
    }

    /// Sets an absolute position target and the maximum velocity used to reach it, switching the
    /// motor to profiled movement.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_position_target(&mut self, position: f64, velocity: i32) -> Result<(), PortError> {
        self.set_mode_with(MotorControlMode::Profile, |motor| {
            motor.position_target = position;
            motor.velocity_max = velocity;
        })
    }

    /// Sets a position target relative to the motor's current position, switching the motor to
    /// profiled movement.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_relative_position_target(
        &mut self,
        delta: f64,
        velocity: i32,
    ) -> Result<(), PortError> {
        self.set_mode_with(MotorControlMode::Profile, |motor| {
            motor.position_target = motor.position + delta;
            motor.velocity_max = velocity;
        })
    }

    /// Returns the position target of the last profiled movement.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn position_target(&self) -> Result<f64, PortError> {
        self.read(|motor| motor.position_target)
    }

    /// Returns the maximum velocity of the last profiled movement.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn profile_velocity(&self) -> Result<i32, PortError> {
        self.read(|motor| motor.velocity_max)
    }

    /// Forces the motor into a control mode without changing any setpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_mode(&mut self, mode: MotorControlMode) -> Result<(), PortError> {
        self.set_mode_with(mode, |_| {})
    }

    /// Returns the motor's current control mode.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn mode(&self) -> Result<MotorControlMode, PortError> {
        self.read(|motor| motor.control_mode)
    }

    /// Accepts a PWM duty cycle and ignores it.
    ///
    /// PWM output is not modelled.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_pwm(&mut self, _duty: i32) -> Result<(), PortError> {
        self.validate_port()?;
        warn!(port = self.port.index(), "set_pwm does nothing on an emulated motor");
        Ok(())
    }

    /// Returns the motor's PWM duty cycle, which is always `0`.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn pwm(&self) -> Result<i32, PortError> {
        self.validate_port()?;
        warn!(port = self.port.index(), "pwm does nothing on an emulated motor");
        Ok(0)
    }

    /// Accepts a servo target and ignores it.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_servo_target(&mut self, _position: f64) -> Result<(), PortError> {
        self.validate_port()?;
        warn!(port = self.port.index(), "set_servo_target does nothing on an emulated motor");
        Ok(())
    }

    /// Accepts an externally generated motion profile step and ignores it.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_external_profile(&mut self, _position: f64, _velocity: i32) -> Result<(), PortError> {
        self.validate_port()?;
        warn!(port = self.port.index(), "set_external_profile does nothing on an emulated motor");
        Ok(())
    }

    /// Sets the motor's current limit in milliamps.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_current_limit(&mut self, milliamps: i32) -> Result<(), PortError> {
        self.write(|motor| motor.current_max = milliamps)
    }

    /// Returns the motor's current limit in milliamps.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn current_limit(&self) -> Result<i32, PortError> {
        self.read(|motor| motor.current_max)
    }

    /// Sets the motor's voltage limit in millivolts.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_voltage_limit(&mut self, millivolts: i32) -> Result<(), PortError> {
        self.write(|motor| motor.voltage_max = millivolts)
    }

    /// Returns the motor's voltage limit in millivolts.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn voltage_limit(&self) -> Result<i32, PortError> {
        self.read(|motor| motor.voltage_max)
    }

    /// Points the motor's position controller at a set of tuning constants.
    ///
    /// The motor only keeps a weak reference. The constants stay attached for as long as the
    /// caller keeps the [`Arc`] alive.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_position_tuning_constants(
        &mut self,
        constants: &Arc<MotorTuningConstants>,
    ) -> Result<(), PortError> {
        let constants = SharedTuningConstants::new(constants);
        self.write(|motor| motor.position_pid = constants)
    }

    /// Returns the position controller's tuning constants, if they are still alive.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn position_tuning_constants(&self) -> Result<Option<Arc<MotorTuningConstants>>, PortError> {
        self.read(|motor| motor.position_pid.upgrade())
    }

    /// Points the motor's velocity controller at a set of tuning constants.
    ///
    /// The motor only keeps a weak reference. The constants stay attached for as long as the
    /// caller keeps the [`Arc`] alive.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_velocity_tuning_constants(
        &mut self,
        constants: &Arc<MotorTuningConstants>,
    ) -> Result<(), PortError> {
        let constants = SharedTuningConstants::new(constants);
        self.write(|motor| motor.velocity_pid = constants)
    }

    /// Returns the velocity controller's tuning constants, if they are still alive.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn velocity_tuning_constants(&self) -> Result<Option<Arc<MotorTuningConstants>>, PortError> {
        self.read(|motor| motor.velocity_pid.upgrade())
    }

    /// Returns the current drawn by the motor in milliamps.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn current(&self) -> Result<i32, PortError> {
        self.read(|motor| motor.current)
    }

    /// Returns the power drawn by the motor in Watts.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn power(&self) -> Result<f64, PortError> {
        self.read(|motor| motor.power)
    }

    /// Returns the torque output of the motor in Nm.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn torque(&self) -> Result<f64, PortError> {
        self.read(|motor| motor.torque)
    }

    /// Returns the efficiency of the motor as a percentage.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn efficiency(&self) -> Result<f64, PortError> {
        self.read(|motor| motor.efficiency)
    }

    /// Returns the internal temperature recorded by the motor in °C.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn temperature(&self) -> Result<f64, PortError> {
        self.read(|motor| motor.temperature)
    }

    /// Returns `true` if the motor is hotter than the table's configured threshold.
    ///
    /// This is derived from [`Motor::temperature`], not from the stored
    /// [`MotorFlags::OVER_TEMPERATURE`] bit.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn is_over_temperature(&self) -> Result<bool, PortError> {
        let threshold = self.port.config().motor_over_temperature_threshold;
        self.read(|motor| motor.temperature > threshold)
    }

    /// Returns `true` if the motor is being limited by its current limit.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn is_current_limited(&self) -> Result<bool, PortError> {
        self.read(|motor| motor.flags.contains(MotorFlags::CURRENT_LIMIT))
    }

    /// Returns `true` if the motor reports zero velocity.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn is_zero_velocity(&self) -> Result<bool, PortError> {
        self.read(|motor| motor.flags.contains(MotorFlags::ZERO_VELOCITY))
    }

    /// Returns `true` if the motor reports being at its zero position.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn is_zero_position(&self) -> Result<bool, PortError> {
        self.read(|motor| motor.flags.contains(MotorFlags::ZERO_POSITION))
    }

    /// Returns the fault word published for the motor.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn faults(&self) -> Result<MotorFaults, PortError> {
        self.read(|motor| motor.faults)
    }

    /// Returns the motor's flag byte.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn flags(&self) -> Result<MotorFlags, PortError> {
        self.read(|motor| motor.flags)
    }

    /// Sets whether the motor runs reversed.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_reversed(&mut self, reversed: bool) -> Result<(), PortError> {
        self.write(|motor| motor.flags.set(MotorFlags::REVERSE, reversed))
    }

    /// Returns `true` if the motor runs reversed.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn is_reversed(&self) -> Result<bool, PortError> {
        self.read(|motor| motor.flags.contains(MotorFlags::REVERSE))
    }

    /// Sets the direction the motor spins in.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), PortError> {
        self.set_reversed(direction.is_reverse())
    }

    /// Returns the direction the motor spins in.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn direction(&self) -> Result<Direction, PortError> {
        Ok(match self.is_reversed()? {
            false => Direction::Forward,
            true => Direction::Reverse,
        })
    }

    /// Sets the units the motor reports its position in.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_encoder_units(&mut self, units: EncoderUnits) -> Result<(), PortError> {
        self.write(|motor| motor.encoder_units = units)
    }

    /// Returns the units the motor reports its position in.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn encoder_units(&self) -> Result<EncoderUnits, PortError> {
        self.read(|motor| motor.encoder_units)
    }

    /// Sets how the motor behaves when braking.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_brake_mode(&mut self, mode: BrakeMode) -> Result<(), PortError> {
        self.write(|motor| motor.brake_mode = mode)
    }

    /// Returns how the motor behaves when braking.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn brake_mode(&self) -> Result<BrakeMode, PortError> {
        self.read(|motor| motor.brake_mode)
    }

    /// Overwrites the motor's position reading.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_position(&mut self, position: f64) -> Result<(), PortError> {
        self.write(|motor| motor.position = position)
    }

    /// Returns the motor's position reading.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn position(&self) -> Result<f64, PortError> {
        self.read(|motor| motor.position)
    }

    /// Sets the motor's position reading to zero.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn reset_position(&mut self) -> Result<(), PortError> {
        self.set_position(0.0)
    }

    /// Returns the motor's position reading truncated to an integer, together with the time its
    /// slot was last updated.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn raw_position(&self) -> Result<(i32, LowResolutionTime), PortError> {
        self.port.with_timestamped_state(|motor: &MotorState, timestamp| {
            (motor.position as i32, timestamp)
        })
    }

    /// Sets the motor's internal gearset.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn set_gearset(&mut self, gearset: Gearset) -> Result<(), PortError> {
        self.write(|motor| motor.gearset = gearset)
    }

    /// Returns the motor's internal gearset.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a motor is not connected to the port.
    pub fn gearset(&self) -> Result<Gearset, PortError> {
        self.read(|motor| motor.gearset)
    }
}

impl SmartDevice for Motor<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Motor
    }
}

/// The state of an emulated smart motor.
///
/// A freshly installed motor is all zeroes: coasting, in [`MotorControlMode::Off`], reporting
/// degrees, with a [`Gearset::Red`] cartridge and no tuning constants attached.
#[derive(Debug, Clone, PartialEq)]
pub struct MotorState {
    /// How the motor behaves when braking.
    pub brake_mode: BrakeMode,
    /// The active control mode.
    pub control_mode: MotorControlMode,
    /// Units of the position reading.
    pub encoder_units: EncoderUnits,
    /// The internal gearset.
    pub gearset: Gearset,
    /// Position controller tuning, owned by the program.
    pub position_pid: SharedTuningConstants,
    /// Velocity controller tuning, owned by the program.
    pub velocity_pid: SharedTuningConstants,
    /// Velocity setpoint in RPM.
    pub velocity_target: i32,
    /// Maximum velocity of a profiled movement in RPM.
    pub velocity_max: i32,
    /// Measured current in milliamps.
    pub current: i32,
    /// Current limit in milliamps.
    pub current_max: i32,
    /// Output voltage in millivolts.
    pub voltage: i32,
    /// Voltage limit in millivolts.
    pub voltage_max: i32,
    /// Measured position, in `encoder_units`.
    pub position: f64,
    /// Target of the last profiled movement.
    pub position_target: f64,
    /// Measured velocity in RPM.
    pub velocity: f64,
    /// Measured power in Watts.
    pub power: f64,
    /// Measured torque in Nm.
    pub torque: f64,
    /// Measured efficiency as a percentage.
    pub efficiency: f64,
    /// Measured temperature in °C.
    pub temperature: f64,
    /// Raw fault word.
    pub faults: MotorFaults,
    /// Status flag byte.
    pub flags: MotorFlags,
}

impl Default for MotorState {
    fn default() -> Self {
        Self {
            brake_mode: BrakeMode::default(),
            control_mode: MotorControlMode::default(),
            encoder_units: EncoderUnits::default(),
            gearset: Gearset::default(),
            position_pid: SharedTuningConstants::default(),
            velocity_pid: SharedTuningConstants::default(),
            velocity_target: 0,
            velocity_max: 0,
            current: 0,
            current_max: 0,
            voltage: 0,
            voltage_max: 0,
            position: 0.0,
            position_target: 0.0,
            velocity: 0.0,
            power: 0.0,
            torque: 0.0,
            efficiency: 0.0,
            temperature: 0.0,
            faults: MotorFaults::empty(),
            flags: MotorFlags::empty(),
        }
    }
}

/// The actuation strategy a motor is currently using.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MotorControlMode {
    /// Coasting.
    #[default]
    Off,
    /// Braking.
    Brake,
    /// Holding position.
    Hold,
    /// Moving to and holding a position.
    Servo,
    /// Moving to a target and stopping.
    Profile,
    /// Holding a continuous velocity.
    Velocity,
    /// Driving a raw voltage.
    Undefined,
    /// A mode code with no named counterpart, kept as-is.
    Unknown(u8),
}

impl From<V5MotorControlMode> for MotorControlMode {
    /// Decodes a raw control mode. Codes past the end of the SDK's enum decode as
    /// [`MotorControlMode::Unknown`], which keeps the code.
    fn from(value: V5MotorControlMode) -> Self {
        match value.0 {
            0 => Self::Off,
            1 => Self::Brake,
            2 => Self::Hold,
            3 => Self::Servo,
            4 => Self::Profile,
            5 => Self::Velocity,
            6 => Self::Undefined,
            other => Self::Unknown(other),
        }
    }
}

impl From<MotorControlMode> for V5MotorControlMode {
    fn from(value: MotorControlMode) -> Self {
        Self(match value {
            MotorControlMode::Off => 0,
            MotorControlMode::Brake => 1,
            MotorControlMode::Hold => 2,
            MotorControlMode::Servo => 3,
            MotorControlMode::Profile => 4,
            MotorControlMode::Velocity => 5,
            MotorControlMode::Undefined => 6,
            MotorControlMode::Unknown(code) => code,
        })
    }
}

/// Determines how a motor should act when braking.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum BrakeMode {
    /// Motor never brakes.
    #[default]
    Coast,

    /// Motor uses regenerative braking to slow down faster.
    Brake,

    /// Motor exerts force to hold the same position.
    Hold,
}

impl TryFrom<V5MotorBrakeMode> for BrakeMode {
    type Error = UnknownVariantError;

    fn try_from(value: V5MotorBrakeMode) -> Result<Self, Self::Error> {
        match value {
            V5MotorBrakeMode::kV5MotorBrakeModeCoast => Ok(Self::Coast),
            V5MotorBrakeMode::kV5MotorBrakeModeBrake => Ok(Self::Brake),
            V5MotorBrakeMode::kV5MotorBrakeModeHold => Ok(Self::Hold),
            other => Err(UnknownVariantError {
                kind: "V5MotorBrakeMode",
                value: u32::from(other.0),
            }),
        }
    }
}

impl From<BrakeMode> for V5MotorBrakeMode {
    fn from(value: BrakeMode) -> Self {
        match value {
            BrakeMode::Brake => Self::kV5MotorBrakeModeBrake,
            BrakeMode::Coast => Self::kV5MotorBrakeModeCoast,
            BrakeMode::Hold => Self::kV5MotorBrakeModeHold,
        }
    }
}

/// Units used for a motor's position reading.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum EncoderUnits {
    /// Degrees of output shaft rotation.
    #[default]
    Degrees,
    /// Full rotations of the output shaft.
    Rotations,
    /// Raw encoder ticks.
    Counts,
}

impl TryFrom<V5MotorEncoderUnits> for EncoderUnits {
    type Error = UnknownVariantError;

    fn try_from(value: V5MotorEncoderUnits) -> Result<Self, Self::Error> {
        match value.0 {
            0 => Ok(Self::Degrees),
            1 => Ok(Self::Rotations),
            2 => Ok(Self::Counts),
            other => Err(UnknownVariantError {
                kind: "V5MotorEncoderUnits",
                value: u32::from(other),
            }),
        }
    }
}

impl From<EncoderUnits> for V5MotorEncoderUnits {
    fn from(value: EncoderUnits) -> Self {
        match value {
            EncoderUnits::Degrees => Self(0),
            EncoderUnits::Rotations => Self(1),
            EncoderUnits::Counts => Self::kMotorEncoderCounts,
        }
    }
}

/// Internal gearset used by VEX smart motors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Gearset {
    /// 36:1 gear ratio
    #[default]
    Red,
    /// 18:1 gear ratio
    Green,
    /// 6:1 gear ratio
    Blue,
}

impl Gearset {
    /// Rated max speed for a smart motor with a [`Red`](Gearset::Red) gearset.
    pub const MAX_RED_RPM: f64 = 100.0;
    /// Rated speed for a smart motor with a [`Green`](Gearset::Green) gearset.
    pub const MAX_GREEN_RPM: f64 = 200.0;
    /// Rated speed for a smart motor with a [`Blue`](Gearset::Blue) gearset.
    pub const MAX_BLUE_RPM: f64 = 600.0;

    /// Get the rated maximum speed for this motor gearset.
    #[must_use]
    pub const fn max_rpm(&self) -> f64 {
        match self {
            Self::Red => Self::MAX_RED_RPM,
            Self::Green => Self::MAX_GREEN_RPM,
            Self::Blue => Self::MAX_BLUE_RPM,
        }
    }
}

impl TryFrom<V5MotorGearset> for Gearset {
    type Error = UnknownVariantError;

    fn try_from(value: V5MotorGearset) -> Result<Self, Self::Error> {
        match value {
            V5MotorGearset::kMotorGearSet_36 => Ok(Self::Red),
            V5MotorGearset::kMotorGearSet_18 => Ok(Self::Green),
            V5MotorGearset::kMotorGearSet_06 => Ok(Self::Blue),
            other => Err(UnknownVariantError {
                kind: "V5MotorGearset",
                value: u32::from(other.0),
            }),
        }
    }
}

impl From<Gearset> for V5MotorGearset {
    fn from(value: Gearset) -> Self {
        match value {
            Gearset::Blue => Self::kMotorGearSet_06,
            Gearset::Green => Self::kMotorGearSet_18,
            Gearset::Red => Self::kMotorGearSet_36,
        }
    }
}

bitflags! {
    /// The status flag byte of a [`Motor`].
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub struct MotorFlags: u8 {
        /// The motor's temperature is above its limit.
        const OVER_TEMPERATURE = 1 << 0;

        /// The motor is being held to its current limit.
        const CURRENT_LIMIT = 1 << 1;

        /// The motor is near zero velocity.
        const ZERO_VELOCITY = 1 << 2;

        /// The motor is at its zero position.
        const ZERO_POSITION = 1 << 3;

        /// The motor runs reversed.
        const REVERSE = 1 << 4;
    }
}

bitflags! {
    /// The fault flags returned by a [`Motor`].
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub struct MotorFaults: u32 {
        /// The motor's temperature is above its limit.
        const OVER_TEMPERATURE = 0x01;

        /// The motor's H-bridge has encountered a fault.
        const DRIVER_FAULT = 0x02;

        /// The motor is over current.
        const OVER_CURRENT = 0x04;

        /// The motor's H-bridge is over current.
        const DRIVER_OVER_CURRENT = 0x08;

        // Emulators may publish bits the SDK does not name.
        const _ = !0;
    }
}

/// Holds the information about a Motor's position or velocity PID controls.
///
/// These are only stored and handed back; the emulated motor does not run a controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorTuningConstants {
    /// The feedforward constant.
    pub kf: f64,

    /// The proportional constant.
    pub kp: f64,

    /// The integral constant.
    pub ki: f64,

    /// The derivative constant.
    pub kd: f64,

    /// A constant used for filtering the profile acceleration.
    pub filter: f64,

    /// The integral limit.
    pub integral_limit: f64,

    /// The threshold for determining if a position movement has reached its goal.
    pub tolerance: f64,

    /// The rate at which the PID computation is run, in milliseconds.
    pub sample_rate: u32,
}

/// A non-owning reference to [`MotorTuningConstants`] held by a motor slot.
///
/// Two references compare equal when they point at the same allocation.
#[derive(Debug, Clone, Default)]
pub struct SharedTuningConstants(Weak<MotorTuningConstants>);

impl SharedTuningConstants {
    /// Creates a weak reference to `constants`.
    #[must_use]
    pub fn new(constants: &Arc<MotorTuningConstants>) -> Self {
        Self(Arc::downgrade(constants))
    }

    /// Returns the constants if their owner still holds them.
    #[must_use]
    pub fn upgrade(&self) -> Option<Arc<MotorTuningConstants>> {
        self.0.upgrade()
    }
}

impl PartialEq for SharedTuningConstants {
    fn eq(&self, other: &Self) -> bool {
        Weak::ptr_eq(&self.0, &other.0)
    }
}
