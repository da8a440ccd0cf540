//! Emulator configuration.

use core::time::Duration;

/// Tunable constants consulted by the emulated device drivers.
///
/// The [`Default`] values reproduce the behavior of the VEXos SDK as closely as the emulator
/// models it.
///
/// # Examples
///
/// ```
/// use core::time::Duration;
/// use vexide_emu_core::config::EmulatorConfig;
///
/// let config = EmulatorConfig::new()
///     .with_imu_calibration_time(Duration::from_millis(500))
///     .with_motor_over_temperature_threshold(55.0);
///
/// assert_eq!(config.imu_calibration_time, Duration::from_millis(500));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmulatorConfig {
    /// Temperature in °C above which a motor reports its over-temperature flag.
    ///
    /// A motor sitting exactly at the threshold is not considered over temperature.
    pub motor_over_temperature_threshold: f64,

    /// How long an inertial sensor reports itself as calibrating after a reset.
    pub imu_calibration_time: Duration,
}

impl EmulatorConfig {
    /// Default value of [`Self::motor_over_temperature_threshold`].
    pub const DEFAULT_MOTOR_OVER_TEMPERATURE_THRESHOLD: f64 = 40.0;

    /// Default value of [`Self::imu_calibration_time`].
    pub const DEFAULT_IMU_CALIBRATION_TIME: Duration = Duration::from_secs(3);

    /// Creates a configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            motor_over_temperature_threshold: Self::DEFAULT_MOTOR_OVER_TEMPERATURE_THRESHOLD,
            imu_calibration_time: Self::DEFAULT_IMU_CALIBRATION_TIME,
        }
    }

    /// Sets the motor over-temperature threshold in °C.
    #[must_use]
    pub const fn with_motor_over_temperature_threshold(mut self, threshold: f64) -> Self {
        self.motor_over_temperature_threshold = threshold;
        self
    }

    /// Sets the inertial sensor calibration window.
    #[must_use]
    pub const fn with_imu_calibration_time(mut self, time: Duration) -> Self {
        self.imu_calibration_time = time;
        self
    }
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self::new()
    }
}
