//! Enumeration and lookup over a [`PortTable`].

use snafu::ensure;
use vexide_emu_core::time::LowResolutionTime;

use crate::{
    ports::{MAX_DEVICE_PORTS, PortTable},
    smart::{InvalidPortSnafu, PortError, SmartDeviceType, SmartPort},
};

impl PortTable {
    /// Returns the number of ports with a connected device.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.ports().filter(|port| port.device_type().is_some()).count()
    }

    /// Returns the number of ports with a connected device of the given type.
    #[must_use]
    pub fn device_count_by_type(&self, device_type: SmartDeviceType) -> usize {
        self.ports()
            .filter(|port| port.device_type() == Some(device_type))
            .count()
    }

    /// Returns a handle to every port of the table, in index order.
    ///
    /// Handles are views onto the live table; state observed through them can change between
    /// calls if another thread is driving the same ports.
    pub fn ports(&self) -> impl Iterator<Item = SmartPort<'_>> + '_ {
        (0..MAX_DEVICE_PORTS as u8).map(|index| SmartPort::new(self, index))
    }

    /// Returns a handle to the port at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPort`] if `index` is outside of the table.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use vexide_emu_core::time::ManualClock;
    /// use vexide_emu_devices::{PortTable, smart::PortError};
    ///
    /// let table = PortTable::new(Arc::new(ManualClock::new()));
    ///
    /// assert!(table.port(31).is_ok());
    /// assert_eq!(table.port(32), Err(PortError::InvalidPort { index: 32 }));
    /// ```
    pub fn port(&self, index: u8) -> Result<SmartPort<'_>, PortError> {
        ensure!(usize::from(index) < MAX_DEVICE_PORTS, InvalidPortSnafu { index });
        Ok(SmartPort::new(self, index))
    }

    /// Returns the connected device type of every port, in index order.
    ///
    /// Ports without a connected device report `None`.
    #[must_use]
    pub fn device_status(&self) -> [Option<SmartDeviceType>; MAX_DEVICE_PORTS] {
        core::array::from_fn(|index| self.lock(index as u8).connected_type())
    }

    /// Returns the time at which the slot at `index` was last updated.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::InvalidPort`] if `index` is outside of the table.
    pub fn timestamp_by_index(&self, index: u8) -> Result<LowResolutionTime, PortError> {
        Ok(self.port(index)?.timestamp())
    }
}

#[cfg(test)]
mod test {
    use core::time::Duration;

    use crate::{
        smart::{PortError, SmartDeviceType, rotation::RotationState},
        test_util::table,
    };

    #[test]
    fn out_of_range_lookup() {
        let (_clock, table) = table();

        for index in 32..=u8::MAX {
            assert_eq!(table.port(index), Err(PortError::InvalidPort { index }));
            assert_eq!(
                table.timestamp_by_index(index),
                Err(PortError::InvalidPort { index })
            );
        }
    }

    #[test]
    fn counts_only_connected() {
        let (_clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
        table.plug_in_device(1, SmartDeviceType::Motor).unwrap();
        table.plug_in_device(2, SmartDeviceType::Imu).unwrap();
        table.install_device(3, SmartDeviceType::Motor).unwrap();

        assert_eq!(table.device_count(), 3);
        assert_eq!(table.device_count_by_type(SmartDeviceType::Motor), 2);
        assert_eq!(table.device_count_by_type(SmartDeviceType::Imu), 1);
        assert_eq!(table.device_count_by_type(SmartDeviceType::Gps), 0);

        table.disconnect_device(0).unwrap();
        assert_eq!(table.device_count_by_type(SmartDeviceType::Motor), 1);
    }

    #[test]
    fn status_snapshot() {
        let (_clock, table) = table();
        table.plug_in_device(7, SmartDeviceType::Optical).unwrap();
        table.install_device(8, SmartDeviceType::Gps).unwrap();

        let status = table.device_status();
        assert_eq!(status.len(), 32);
        assert_eq!(status[7], Some(SmartDeviceType::Optical));
        assert_eq!(status[8], None);
        assert_eq!(status.iter().flatten().count(), 1);
    }

    #[test]
    fn ports_are_views() {
        let (clock, table) = table();
        table.plug_in_device(12, SmartDeviceType::Rotation).unwrap();

        let first = table.port(12).unwrap();
        let second = table.ports().nth(12).unwrap();
        assert_eq!(first, second);

        clock.advance(Duration::from_millis(20));
        first
            .with_state_mut(|state: &mut RotationState| state.position = 45.0)
            .unwrap();

        assert_eq!(
            second.with_state(|state: &RotationState| state.position),
            Ok(45.0)
        );
        assert_eq!(
            table.timestamp_by_index(12).unwrap().as_millis_since_epoch(),
            20
        );
    }
}
