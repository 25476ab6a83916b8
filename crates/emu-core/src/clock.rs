//! Master clock configuration.

use crate::Ticks;

/// Master clock configuration for a system.
///
/// Each system has a master crystal that drives all timing. Components may
/// run at divided rates, but everything derives from this frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Crystal frequency in Hz (e.g., `16_000_000` for the 1541 drive board).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Master ticks per tick of a slower clock domain (integer division).
    ///
    /// A 16 MHz crystal feeding a 1 MHz CPU gives 16.
    #[must_use]
    pub const fn divider_for(&self, domain_hz: u64) -> u64 {
        self.frequency_hz / domain_hz
    }

    /// Ticks for one revolution of a spindle turning at `rpm`.
    #[must_use]
    pub const fn ticks_per_revolution(&self, rpm: u64) -> Ticks {
        Ticks::new(self.frequency_hz * 60 / rpm)
    }
}
