//! Helpers for dealing with errno.
//!
//! The SDK function surface reports failures the way the PROS/VEXos C APIs do: a sentinel return
//! value plus an error code left in a side channel. [`Errno`] is that side channel, and the
//! constants in this module are the sentinels and codes it carries.

use core::sync::atomic::{AtomicI32, Ordering};

/// Returned by integer (and enum) producing SDK functions when they fail.
pub const PROS_ERR: i32 = i32::MAX;

/// Returned by floating point producing SDK functions when they fail.
pub const PROS_ERR_F: f64 = f64::INFINITY;

/// "No such device": the port is empty or holds a different kind of device.
pub const ENODEV: i32 = 19;

/// "Invalid argument": a port index or raw enum value is out of range.
pub const EINVAL: i32 = 22;

/// A "last error" cell shared by a set of SDK calls.
///
/// A value of `0` means no error has been recorded since the last [`take`](Errno::take).
#[derive(Debug, Default)]
pub struct Errno(AtomicI32);

impl Errno {
    /// Creates an empty errno cell.
    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicI32::new(0))
    }

    /// Records an error code, replacing any previous one.
    pub fn set(&self, code: i32) {
        self.0.store(code, Ordering::Release);
    }

    /// Returns the recorded error code without clearing it.
    #[must_use]
    pub fn get(&self) -> i32 {
        self.0.load(Ordering::Acquire)
    }

    /// Gets the value of errno and sets errno to 0.
    pub fn take(&self) -> i32 {
        self.0.swap(0, Ordering::AcqRel)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn take_clears() {
        let errno = Errno::new();
        assert_eq!(errno.take(), 0);

        errno.set(ENODEV);
        assert_eq!(errno.get(), ENODEV);
        assert_eq!(errno.take(), ENODEV);
        assert_eq!(errno.take(), 0);
    }
}
