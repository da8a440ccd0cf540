//! Temporal quantification for emulated devices.
//!
//! Emulated smart devices never read the host's wall clock directly. Instead, every
//! time-dependent operation asks a [`Clock`] for the current [`LowResolutionTime`], which lets the
//! surrounding emulator decide whether time follows the host ([`SystemClock`]) or is stepped
//! explicitly ([`ManualClock`]).

use core::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
    time::Duration,
};
use std::time::Instant;

/// A timestamp on a monotonically nondecreasing clock.
///
/// # Precision
///
/// This type has a precision of 1 millisecond, matching the timestamps VEXos attaches to smart
/// device packets.
#[derive(Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LowResolutionTime {
    millis: u32,
}

impl LowResolutionTime {
    /// An instant representing the start of the clock's epoch.
    pub const EPOCH: Self = Self { millis: 0 };

    /// Creates a timestamp from a number of milliseconds since the clock's epoch.
    ///
    /// # Examples
    ///
    /// ```
    /// use vexide_emu_core::time::LowResolutionTime;
    ///
    /// let time = LowResolutionTime::from_millis_since_epoch(1500);
    /// assert_eq!(time.as_millis_since_epoch(), 1500);
    /// ```
    #[must_use]
    pub const fn from_millis_since_epoch(millis: u32) -> Self {
        Self { millis }
    }

    /// Returns the number of milliseconds since the clock's epoch.
    #[must_use]
    pub const fn as_millis_since_epoch(&self) -> u32 {
        self.millis
    }

    /// Returns the amount of time elapsed from another timestamp to this one, or `None` if that
    /// timestamp is later than this one.
    #[must_use]
    pub const fn checked_duration_since(&self, earlier: Self) -> Option<Duration> {
        if earlier.millis <= self.millis {
            Some(Duration::from_millis((self.millis - earlier.millis) as u64))
        } else {
            None
        }
    }

    /// Returns the amount of time elapsed from another timestamp to this one, or zero duration if
    /// that timestamp is later than this one.
    #[must_use]
    pub fn saturating_duration_since(&self, earlier: Self) -> Duration {
        self.checked_duration_since(earlier).unwrap_or_default()
    }

    /// Returns `Some(t)` where `t` is the time `self + duration`, or `None` if the result would
    /// not fit in the clock's range.
    #[must_use]
    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        let millis = u32::try_from(duration.as_millis()).ok()?;
        Some(Self {
            millis: self.millis.checked_add(millis)?,
        })
    }
}

impl fmt::Debug for LowResolutionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.millis)
    }
}

/// A monotonic millisecond time source.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> LowResolutionTime;
}

/// A clock that follows the host's monotonic clock, starting at zero when created.
///
/// Readings saturate at `u32::MAX` milliseconds (about 49 days).
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    /// Creates a clock whose epoch is the moment of creation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> LowResolutionTime {
        let millis = u32::try_from(self.start.elapsed().as_millis()).unwrap_or(u32::MAX);
        LowResolutionTime::from_millis_since_epoch(millis)
    }
}

/// A clock that only moves when told to.
///
/// This is the clock of choice for tests and for emulators that step the robot program in lock
/// step with a physics simulation.
///
/// # Examples
///
/// ```
/// use core::time::Duration;
/// use vexide_emu_core::time::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// clock.advance(Duration::from_millis(250));
///
/// assert_eq!(clock.now().as_millis_since_epoch(), 250);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU32,
}

impl ManualClock {
    /// Creates a clock stopped at its epoch.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            millis: AtomicU32::new(0),
        }
    }

    /// Moves the clock to an absolute timestamp.
    ///
    /// Nothing prevents moving the clock backwards; callers that need monotonic readings must
    /// only move it forward.
    pub fn set(&self, time: LowResolutionTime) {
        self.millis
            .store(time.as_millis_since_epoch(), Ordering::Release);
    }

    /// Moves the clock forward by `duration`, saturating at the end of the clock's range.
    pub fn advance(&self, duration: Duration) {
        let step = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        // The closure never returns `None`, so the update cannot fail.
        _ = self
            .millis
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |millis| {
                Some(millis.saturating_add(step))
            });
    }
}

impl Clock for ManualClock {
    fn now(&self) -> LowResolutionTime {
        LowResolutionTime::from_millis_since_epoch(self.millis.load(Ordering::Acquire))
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> LowResolutionTime {
        (**self).now()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn duration_since_saturates() {
        let early = LowResolutionTime::from_millis_since_epoch(100);
        let late = LowResolutionTime::from_millis_since_epoch(350);

        assert_eq!(
            late.saturating_duration_since(early),
            Duration::from_millis(250)
        );
        assert_eq!(early.saturating_duration_since(late), Duration::ZERO);
        assert_eq!(early.checked_duration_since(late), None);
    }

    #[test]
    fn checked_add_overflow() {
        let time = LowResolutionTime::from_millis_since_epoch(u32::MAX - 1);

        assert_eq!(
            time.checked_add(Duration::from_millis(1)),
            Some(LowResolutionTime::from_millis_since_epoch(u32::MAX))
        );
        assert_eq!(time.checked_add(Duration::from_millis(2)), None);
    }

    #[test]
    fn manual_clock_steps() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), LowResolutionTime::EPOCH);

        clock.advance(Duration::from_millis(2999));
        clock.advance(Duration::from_millis(1));
        assert_eq!(clock.now().as_millis_since_epoch(), 3000);

        clock.set(LowResolutionTime::from_millis_since_epoch(u32::MAX - 5));
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now().as_millis_since_epoch(), u32::MAX);
    }

    #[test]
    fn shared_clock_reads_through() {
        let clock = std::sync::Arc::new(ManualClock::new());
        let shared: std::sync::Arc<dyn Clock> = clock.clone();

        clock.advance(Duration::from_millis(42));
        assert_eq!(shared.now().as_millis_since_epoch(), 42);
    }
}
