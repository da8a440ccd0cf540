//! Generic radio (VEXLink)
//!
//! Radio links are not emulated. A [`RadioLink`] behaves like a radio that never finds a partner:
//! it is never linked, has no buffer space, and moves no data. These answers do not depend on what
//! is plugged into its port, so none of its operations can fail on a guard.

use std::io;

use tracing::trace;

use super::{SmartDevice, SmartDeviceType, SmartPort};

/// A radio link on an emulated port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RadioLink<'a> {
    port: SmartPort<'a>,
}

impl<'a> RadioLink<'a> {
    /// Requests a link with the given ID and returns a handle to it.
    ///
    /// The request is accepted and ignored.
    #[must_use]
    pub fn open(port: SmartPort<'a>, id: &str, link_type: LinkType) -> Self {
        trace!(port = port.index(), id, ?link_type, "radio connection requested");
        Self { port }
    }

    /// Returns the number of received bytes waiting to be read, which is always `0`.
    #[must_use]
    pub fn unread_bytes(&self) -> usize {
        trace!(port = self.port.index(), "radio receive buffer polled");
        0
    }

    /// Returns the free space in the receive buffer, which is always `0`.
    #[must_use]
    pub fn receive_free(&self) -> usize {
        trace!(port = self.port.index(), "radio receive space polled");
        0
    }

    /// Returns the free space in the transmit buffer, which is always `0`.
    #[must_use]
    pub fn available_write_bytes(&self) -> usize {
        trace!(port = self.port.index(), "radio transmit space polled");
        0
    }

    /// Returns whether the radio is linked with a partner, which is never the case.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        trace!(port = self.port.index(), "radio link status polled");
        false
    }
}

impl io::Read for RadioLink<'_> {
    /// Reads nothing.
    fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
        trace!(port = self.port.index(), "radio receive");
        Ok(0)
    }
}

impl io::Write for RadioLink<'_> {
    /// Accepts no bytes.
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        trace!(port = self.port.index(), "radio transmit");
        Ok(0)
    }

    /// This function does nothing.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SmartDevice for RadioLink<'_> {
    fn port(&self) -> SmartPort<'_> {
        self.port
    }

    fn device_type(&self) -> SmartDeviceType {
        SmartDeviceType::Radio
    }
}

/// The type of a radio link being established.
///
/// VEXLink is a point-to-point connection, with one "manager" robot and
/// one "worker" robot.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum LinkType {
    /// Manager Radio
    Manager,

    /// Worker Radio
    Worker,
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use super::*;
    use crate::test_util::table;

    #[test]
    fn never_linked() {
        let (_clock, table) = table();
        table.plug_in_device(0, SmartDeviceType::Radio).unwrap();
        table.plug_in_device(1, SmartDeviceType::Motor).unwrap();

        for index in 0..3 {
            let mut link = RadioLink::open(table.port(index).unwrap(), "robot", LinkType::Manager);

            assert!(!link.is_linked());
            assert_eq!(link.unread_bytes(), 0);
            assert_eq!(link.receive_free(), 0);
            assert_eq!(link.available_write_bytes(), 0);

            let mut buf = [0xAA; 4];
            assert_eq!(link.read(&mut buf).unwrap(), 0);
            assert_eq!(buf, [0xAA; 4]);
            assert_eq!(link.write(b"ping").unwrap(), 0);
            assert!(link.write_all(b"ping").is_err());
        }
    }
}
