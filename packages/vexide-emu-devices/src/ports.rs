//! The emulated smart port table.
//!
//! A [`PortTable`] owns the 32 device slots that back every emulated smart port. Each slot is
//! guarded by its own lock, so drivers working on different ports never contend, and every
//! operation on the table takes at most one slot lock at a time.
//!
//! The emulator attaches peripherals with [`PortTable::install_device`], which only decides *what*
//! kind of device a slot models, and then marks the device as physically present with
//! [`PortTable::connect_device`]. [`PortTable::plug_in_device`] does both at once.

use core::fmt;
use std::sync::Arc;

use snafu::ensure;
use spin::{Mutex, MutexGuard};
use tracing::debug;
use vexide_emu_core::{
    config::EmulatorConfig,
    time::{Clock, LowResolutionTime},
};

use crate::smart::{
    InvalidPortSnafu, PortError, SmartDeviceType, distance::DistanceState,
    expander::ExpanderState, gps::GpsState, imu::ImuState, motor::MotorState,
    optical::OpticalState, rotation::RotationState, vision::VisionState,
};

/// Number of slots in a [`PortTable`].
pub const MAX_DEVICE_PORTS: usize = 32;

/// The type-specific state carried by a device slot.
///
/// Exactly one variant is meaningful at a time, and it always agrees with the slot's device type.
/// Device kinds that the emulator does not model carry [`DeviceState::Empty`].
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceState {
    /// No modelled state.
    Empty,
    /// Smart motor state.
    Motor(MotorState),
    /// Inertial sensor state.
    Imu(ImuState),
    /// Rotation sensor state.
    Rotation(RotationState),
    /// Distance sensor state.
    Distance(DistanceState),
    /// Optical sensor state.
    Optical(OpticalState),
    /// Vision sensor state.
    Vision(VisionState),
    /// GPS sensor state.
    Gps(GpsState),
    /// ADI expander state.
    Expander(ExpanderState),
}

impl DeviceState {
    /// Returns the zeroed state for a device type.
    #[must_use]
    pub fn for_type(device_type: Option<SmartDeviceType>) -> Self {
        match device_type {
            Some(SmartDeviceType::Motor) => Self::Motor(MotorState::default()),
            Some(SmartDeviceType::Imu) => Self::Imu(ImuState::default()),
            Some(SmartDeviceType::Rotation) => Self::Rotation(RotationState::default()),
            Some(SmartDeviceType::Distance) => Self::Distance(DistanceState::default()),
            Some(SmartDeviceType::Optical) => Self::Optical(OpticalState::default()),
            Some(SmartDeviceType::Vision) => Self::Vision(VisionState),
            Some(SmartDeviceType::Gps) => Self::Gps(GpsState::default()),
            Some(SmartDeviceType::Adi) => Self::Expander(ExpanderState::default()),
            _ => Self::Empty,
        }
    }

    /// Returns the device type this state belongs to, or `None` for [`DeviceState::Empty`].
    #[must_use]
    pub const fn device_type(&self) -> Option<SmartDeviceType> {
        Some(match self {
            Self::Empty => return None,
            Self::Motor(_) => SmartDeviceType::Motor,
            Self::Imu(_) => SmartDeviceType::Imu,
            Self::Rotation(_) => SmartDeviceType::Rotation,
            Self::Distance(_) => SmartDeviceType::Distance,
            Self::Optical(_) => SmartDeviceType::Optical,
            Self::Vision(_) => SmartDeviceType::Vision,
            Self::Gps(_) => SmartDeviceType::Gps,
            Self::Expander(_) => SmartDeviceType::Adi,
        })
    }
}

/// One slot of the port table.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceSlot {
    /// Index of this slot in its table.
    pub port: u8,

    /// Whether a device is physically present.
    ///
    /// A slot that does not exist is logically empty regardless of its type and state.
    pub exists: bool,

    /// The installed device type, or `None` if nothing was installed.
    pub device_type: Option<SmartDeviceType>,

    /// Time of the last driver update to this slot.
    pub timestamp: LowResolutionTime,

    /// Type-specific state, selected by `device_type`.
    pub state: DeviceState,
}

impl DeviceSlot {
    const fn empty(port: u8) -> Self {
        Self {
            port,
            exists: false,
            device_type: None,
            timestamp: LowResolutionTime::EPOCH,
            state: DeviceState::Empty,
        }
    }

    /// Returns the device type if a device is present and has a type.
    #[must_use]
    pub const fn connected_type(&self) -> Option<SmartDeviceType> {
        if self.exists { self.device_type } else { None }
    }
}

/// A fixed table of 32 smart port slots.
///
/// The table is `Send + Sync` and is usually shared behind an [`Arc`] between the robot program
/// (through drivers) and the emulator (through [`SmartPort::with_state_mut`]).
///
/// [`SmartPort::with_state_mut`]: crate::smart::SmartPort::with_state_mut
pub struct PortTable {
    slots: [Mutex<DeviceSlot>; MAX_DEVICE_PORTS],
    clock: Arc<dyn Clock>,
    config: EmulatorConfig,
}

impl PortTable {
    /// Creates an empty table using the default [`EmulatorConfig`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use vexide_emu_core::time::SystemClock;
    /// use vexide_emu_devices::PortTable;
    ///
    /// let table = PortTable::new(Arc::new(SystemClock::new()));
    /// assert_eq!(table.device_count(), 0);
    /// ```
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_config(clock, EmulatorConfig::default())
    }

    /// Creates an empty table with a custom configuration.
    #[must_use]
    pub fn with_config(clock: Arc<dyn Clock>, config: EmulatorConfig) -> Self {
        Self {
            slots: core::array::from_fn(|index| Mutex::new(DeviceSlot::empty(index as u8))),
            clock,
            config,
        }
    }

    /// Returns the table's configuration.
    #[must_use]
    pub const fn config(&self) -> &EmulatorConfig {
        &self.config
    }

    /// Returns the current time on the table's clock.
    #[must_use]
    pub fn now(&self) -> LowResolutionTime {
        self.clock.now()
    }

    /// Locks a slot.
    ///
    /// Callers must only pass indices that have already been checked against
    /// [`MAX_DEVICE_PORTS`]; the only way to obtain one from outside the crate is through
    /// [`PortTable::port`].
    pub(crate) fn lock(&self, index: u8) -> MutexGuard<'_, DeviceSlot> {
        self.slots[usize::from(index)].lock()
    }

    /// Returns a copy of a slot's current contents.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPort`] if `index` is outside of the table.
    pub fn slot(&self, index: u8) -> Result<DeviceSlot, PortError> {
        Ok(self.checked_lock(index)?.clone())
    }

    fn checked_lock(&self, index: u8) -> Result<MutexGuard<'_, DeviceSlot>, PortError> {
        ensure!(usize::from(index) < MAX_DEVICE_PORTS, InvalidPortSnafu { index });
        Ok(self.lock(index))
    }

    /// Sets the kind of device a slot models.
    ///
    /// The slot's state is replaced with the zeroed state for `device_type`, discarding whatever
    /// the previous device left behind. Presence is not changed: a freshly installed device is
    /// not reported as connected until [`PortTable::connect_device`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPort`] if `index` is outside of the table. Nothing is modified
    /// in that case.
    pub fn install_device(&self, index: u8, device_type: SmartDeviceType) -> Result<(), PortError> {
        self.install(index, Some(device_type))
    }

    /// Installs a raw device type, where `None` clears the slot's type.
    pub(crate) fn install(
        &self,
        index: u8,
        device_type: Option<SmartDeviceType>,
    ) -> Result<(), PortError> {
        let mut slot = self.checked_lock(index)?;

        slot.device_type = device_type;
        slot.state = DeviceState::for_type(device_type);

        debug!(port = index, ?device_type, "installed device");
        Ok(())
    }

    /// Marks a slot as holding a physically present device.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPort`] if `index` is outside of the table.
    pub fn connect_device(&self, index: u8) -> Result<(), PortError> {
        let mut slot = self.checked_lock(index)?;
        slot.exists = true;

        debug!(port = index, device_type = ?slot.device_type, "device connected");
        Ok(())
    }

    /// Marks a slot as empty.
    ///
    /// The slot keeps its type and state, so reconnecting it restores the same device.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPort`] if `index` is outside of the table.
    pub fn disconnect_device(&self, index: u8) -> Result<(), PortError> {
        let mut slot = self.checked_lock(index)?;
        slot.exists = false;

        debug!(port = index, device_type = ?slot.device_type, "device disconnected");
        Ok(())
    }

    /// Installs a device and marks it as present in one step.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPort`] if `index` is outside of the table.
    pub fn plug_in_device(&self, index: u8, device_type: SmartDeviceType) -> Result<(), PortError> {
        let mut slot = self.checked_lock(index)?;

        slot.device_type = Some(device_type);
        slot.state = DeviceState::for_type(Some(device_type));
        slot.exists = true;

        debug!(port = index, ?device_type, "device plugged in");
        Ok(())
    }
}

impl fmt::Debug for PortTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortTable")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{smart::motor::MotorState, test_util::table};

    #[test]
    fn install_out_of_range() {
        let (_clock, table) = table();

        assert_eq!(
            table.install_device(32, SmartDeviceType::Motor),
            Err(PortError::InvalidPort { index: 32 })
        );
        assert_eq!(
            table.connect_device(200),
            Err(PortError::InvalidPort { index: 200 })
        );
        assert!(table.slot(32).is_err());
        assert_eq!(table.device_count(), 0);
    }

    #[test]
    fn install_does_not_connect() {
        let (_clock, table) = table();
        table.install_device(4, SmartDeviceType::Motor).unwrap();

        let slot = table.slot(4).unwrap();
        assert_eq!(slot.device_type, Some(SmartDeviceType::Motor));
        assert_eq!(slot.state, DeviceState::Motor(MotorState::default()));
        assert!(!slot.exists);
        assert_eq!(table.device_count(), 0);

        table.connect_device(4).unwrap();
        assert_eq!(table.device_count(), 1);
        assert_eq!(table.device_status()[4], Some(SmartDeviceType::Motor));
    }

    #[test]
    fn reinstall_discards_state() {
        let (_clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        table
            .port(0)
            .unwrap()
            .with_state_mut(|motor: &mut MotorState| motor.position = 123.0)
            .unwrap();

        table.install_device(0, SmartDeviceType::Imu).unwrap();
        assert!(matches!(table.slot(0).unwrap().state, DeviceState::Imu(_)));

        table.install_device(0, SmartDeviceType::Motor).unwrap();
        assert_eq!(
            table.slot(0).unwrap().state,
            DeviceState::Motor(MotorState::default())
        );
    }

    #[test]
    fn disconnect_keeps_state() {
        let (_clock, table) = table();
        table.plug_in_device(9, SmartDeviceType::Distance).unwrap();
        table.disconnect_device(9).unwrap();

        let slot = table.slot(9).unwrap();
        assert!(!slot.exists);
        assert_eq!(slot.device_type, Some(SmartDeviceType::Distance));
        assert_eq!(slot.connected_type(), None);

        table.connect_device(9).unwrap();
        assert_eq!(
            table.slot(9).unwrap().connected_type(),
            Some(SmartDeviceType::Distance)
        );
    }

    #[test]
    fn unmodelled_types_carry_no_state() {
        assert_eq!(
            DeviceState::for_type(Some(SmartDeviceType::Radio)),
            DeviceState::Empty
        );
        assert_eq!(DeviceState::for_type(None).device_type(), None);
        assert_eq!(
            DeviceState::for_type(Some(SmartDeviceType::Adi)).device_type(),
            Some(SmartDeviceType::Adi)
        );
    }
}
