//! Emulated smart port devices for the V5 Brain.
//!
//! # Overview
//!
//! This crate models the 32 smart port slots of a V5 Brain on the host, along with the state of the
//! devices plugged into them. Robot code reaches those devices the same way it would on hardware:
//! either through typed drivers such as [`Motor`](smart::motor::Motor), or through the SDK-shaped
//! functions on [`Jumptable`], which report failures with sentinel values and an errno code.
//!
//! Emulation begins at the [`PortTable`], which owns every slot and the clock used to timestamp
//! updates:
//!
//! ```
//! use std::sync::Arc;
//! use vexide_emu_core::time::ManualClock;
//! use vexide_emu_devices::{PortTable, smart::{SmartDeviceType, motor::Motor}};
//!
//! let table = PortTable::new(Arc::new(ManualClock::new()));
//! table.plug_in_device(0, SmartDeviceType::Motor).unwrap();
//!
//! let mut motor = Motor::new(table.port(0).unwrap());
//! motor.set_velocity(100).unwrap();
//! assert_eq!(motor.velocity(), Ok(100));
//! ```
//!
//! Included in this crate:
//! - The slot table and its lifecycle: [`ports`]
//! - Port handles, device drivers and device types: [`smart`]
//! - Lookup and enumeration: [`PortTable::port`], [`PortTable::device_status`] and friends
//! - The SDK calling convention: [`jumptable`]

pub mod jumptable;
pub mod ports;
mod query;
pub mod smart;

#[cfg(test)]
mod test_util;

pub use jumptable::Jumptable;
pub use ports::{MAX_DEVICE_PORTS, PortTable};
pub use smart::{PortError, SmartPort};
