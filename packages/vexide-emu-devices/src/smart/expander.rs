//! ADI Expander
//!
//! The emulated expander models only the configuration of its eight three-wire ports. Port
//! configurations start out as [`AdiDeviceType::AnalogIn`], which is the SDK's zero value.

use snafu::{Snafu, ensure};
use vex_sdk::V5_AdiPortConfiguration;

use super::{PortError, SmartDevice, SmartDeviceType, SmartPort};

/// Number of three-wire ports on an expander.
pub const ADI_PORT_COUNT: usize = 8;

/// An ADI expander plugged into an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdiExpander<'a> {
    port: SmartPort<'a>,
}

impl<'a> AdiExpander<'a> {
    /// Creates an expander driver on a port.
    #[must_use]
    pub const fn new(port: SmartPort<'a>) -> Self {
        Self { port }
    }

    /// Returns the configuration of one of the expander's three-wire ports.
    ///
    /// `adi_index` is zero-based, so port A is `0`.
    ///
    /// # Errors
    ///
    /// - An [`ExpanderError::InvalidAdiPort`] error is returned if `adi_index` is not below
    ///   [`ADI_PORT_COUNT`].
    /// - An [`ExpanderError::Port`] error is returned if an expander is not connected to the port.
    pub fn port_config(&self, adi_index: u8) -> Result<AdiDeviceType, ExpanderError> {
        ensure!(
            usize::from(adi_index) < ADI_PORT_COUNT,
            InvalidAdiPortSnafu { index: adi_index }
        );
        Ok(self
            .port
            .with_state(|expander: &ExpanderState| expander.ports[usize::from(adi_index)])?)
    }

    /// Configures one of the expander's three-wire ports.
    ///
    /// # Errors
    ///
    /// - An [`ExpanderError::InvalidAdiPort`] error is returned if `adi_index` is not below
    ///   [`ADI_PORT_COUNT`].
    /// - An [`ExpanderError::Port`] error is returned if an expander is not connected to the port.
    pub fn set_port_config(
        &mut self,
        adi_index: u8,
        config: AdiDeviceType,
    ) -> Result<(), ExpanderError> {
        ensure!(
            usize::from(adi_index) < ADI_PORT_COUNT,
            InvalidAdiPortSnafu { index: adi_index }
        );
        self.port.with_state_mut(|expander: &mut ExpanderState| {
            expander.ports[usize::from(adi_index)] = config;
        })?;
        Ok(())
    }
}

impl SmartDevice for AdiExpander<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Adi
    }
}

/// The state of an emulated ADI expander.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExpanderState {
    /// Configuration of each three-wire port, A through H.
    pub ports: [AdiDeviceType; ADI_PORT_COUNT],
}

/// Represents a possible type of device that can be registered on a three-wire port.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum AdiDeviceType {
    /// Undefined Device Type
    Undefined,

    /// Generic digital input
    DigitalIn,

    /// Generic digital output
    DigitalOut,

    /// 12-bit Generic analog input
    ///
    /// This is the configuration of a port that was never configured.
    #[default]
    AnalogIn,

    /// 8-bit generic PWM output
    PwmOut,

    /// Limit Switch / Bumper Switch
    Switch,

    /// V2 Bumper Switch
    SwitchV2,

    /// Cortex-era potentiometer
    Potentiometer,

    /// V2 Potentiometer
    PotentiometerV2,

    /// Cortex-era yaw-rate gyroscope
    Gyro,

    /// Cortex-era servo motor
    Servo,

    /// Quadrature Encoder
    Encoder,

    /// Ultrasonic Sensor/Sonar
    RangeFinder,

    /// Cortex-era Line Tracker
    LineTracker,

    /// Cortex-era Light Sensor
    LightSensor,

    /// Cortex-era 3-Axis Accelerometer
    Accelerometer,

    /// MC29 Controller Output
    Motor,

    /// Slew-rate limited motor PWM output
    MotorSlew,

    /// Other configuration code that has no named counterpart.
    Unknown(V5_AdiPortConfiguration),
}

impl From<V5_AdiPortConfiguration> for AdiDeviceType {
    fn from(value: V5_AdiPortConfiguration) -> Self {
        match value {
            V5_AdiPortConfiguration::kAdiPortTypeUndefined => Self::Undefined,
            V5_AdiPortConfiguration::kAdiPortTypeDigitalIn => Self::DigitalIn,
            V5_AdiPortConfiguration::kAdiPortTypeDigitalOut => Self::DigitalOut,
            V5_AdiPortConfiguration::kAdiPortTypeAnalogIn => Self::AnalogIn,
            V5_AdiPortConfiguration::kAdiPortTypeAnalogOut => Self::PwmOut,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyButton => Self::Switch,
            V5_AdiPortConfiguration::kAdiPortTypeSmartButton => Self::SwitchV2,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyPotentiometer => Self::Potentiometer,
            V5_AdiPortConfiguration::kAdiPortTypeSmartPot => Self::PotentiometerV2,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyGyro => Self::Gyro,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyServo => Self::Servo,
            V5_AdiPortConfiguration::kAdiPortTypeQuadEncoder => Self::Encoder,
            V5_AdiPortConfiguration::kAdiPortTypeSonar => Self::RangeFinder,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyLineSensor => Self::LineTracker,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyLightSensor => Self::LightSensor,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyAccelerometer => Self::Accelerometer,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyPwm => Self::Motor,
            V5_AdiPortConfiguration::kAdiPortTypeLegacyPwmSlew => Self::MotorSlew,
            other => Self::Unknown(other),
        }
    }
}

impl From<AdiDeviceType> for V5_AdiPortConfiguration {
    fn from(value: AdiDeviceType) -> Self {
        match value {
            AdiDeviceType::Undefined => Self::kAdiPortTypeUndefined,
            AdiDeviceType::DigitalIn => Self::kAdiPortTypeDigitalIn,
            AdiDeviceType::DigitalOut => Self::kAdiPortTypeDigitalOut,
            AdiDeviceType::AnalogIn => Self::kAdiPortTypeAnalogIn,
            AdiDeviceType::PwmOut => Self::kAdiPortTypeAnalogOut,
            AdiDeviceType::Switch => Self::kAdiPortTypeLegacyButton,
            AdiDeviceType::SwitchV2 => Self::kAdiPortTypeSmartButton,
            AdiDeviceType::Potentiometer => Self::kAdiPortTypeLegacyPotentiometer,
            AdiDeviceType::PotentiometerV2 => Self::kAdiPortTypeSmartPot,
            AdiDeviceType::Gyro => Self::kAdiPortTypeLegacyGyro,
            AdiDeviceType::Servo => Self::kAdiPortTypeLegacyServo,
            AdiDeviceType::Encoder => Self::kAdiPortTypeQuadEncoder,
            AdiDeviceType::RangeFinder => Self::kAdiPortTypeSonar,
            AdiDeviceType::LineTracker => Self::kAdiPortTypeLegacyLineSensor,
            AdiDeviceType::LightSensor => Self::kAdiPortTypeLegacyLightSensor,
            AdiDeviceType::Accelerometer => Self::kAdiPortTypeLegacyAccelerometer,
            AdiDeviceType::Motor => Self::kAdiPortTypeLegacyPwm,
            AdiDeviceType::MotorSlew => Self::kAdiPortTypeLegacyPwmSlew,
            AdiDeviceType::Unknown(raw) => raw,
        }
    }
}

/// Errors that can occur when configuring an [`AdiExpander`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Snafu)]
pub enum ExpanderError {
    /// The three-wire port index is past the end of the expander.
    #[snafu(display("Three-wire port index {index} is out of range"))]
    InvalidAdiPort {
        /// The rejected index.
        index: u8,
    },

    /// Generic port related error.
    #[snafu(display("{source}"), context(false))]
    Port {
        /// The source of the error.
        source: PortError,
    },
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_util::table;

    #[test]
    fn ports_start_as_analog_in() {
        let (_clock, table) = table();
        table.plug_in_device(20, SmartDeviceType::Adi).unwrap();
        let expander = AdiExpander::new(table.port(20).unwrap());

        for index in 0..ADI_PORT_COUNT as u8 {
            assert_eq!(expander.port_config(index), Ok(AdiDeviceType::AnalogIn));
        }
    }

    #[test]
    fn configure_ports() {
        let (_clock, table) = table();
        table.plug_in_device(20, SmartDeviceType::Adi).unwrap();
        let mut expander = AdiExpander::new(table.port(20).unwrap());

        expander.set_port_config(7, AdiDeviceType::Encoder).unwrap();
        assert_eq!(expander.port_config(7), Ok(AdiDeviceType::Encoder));
        assert_eq!(
            expander.set_port_config(8, AdiDeviceType::Servo),
            Err(ExpanderError::InvalidAdiPort { index: 8 })
        );
    }

    #[test]
    fn port_errors_propagate() {
        let (_clock, table) = table();
        let expander = AdiExpander::new(table.port(20).unwrap());

        assert_eq!(
            expander.port_config(0),
            Err(ExpanderError::Port {
                source: PortError::Disconnected { port: 20 }
            })
        );
    }

    #[test]
    fn raw_configuration_codes() {
        let raw: V5_AdiPortConfiguration = AdiDeviceType::RangeFinder.into();
        assert_eq!(AdiDeviceType::from(raw), AdiDeviceType::RangeFinder);
    }
}
