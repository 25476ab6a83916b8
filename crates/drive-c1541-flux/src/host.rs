//! The drive board as the flux channel sees it.
//!
//! Everything the channel reads comes through VIA2: motor, read/write mode,
//! byte-ready enable and the data port. The host owns the VIA and the
//! 6502; the channel only samples lines and hands back [`Signals`].

use crate::signals::Signals;

/// Control and data lines sampled by the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlLines {
    /// Spindle motor (VIA2 PB2).
    pub motor_on: bool,
    /// CB2 high: read mode. Low enables the write head.
    pub write_inhibit: bool,
    /// CA2: byte-ready enable (SOE).
    pub latch_strobe: bool,
    /// Port A output, latched when the write path needs a byte.
    pub data: u8,
}

impl ControlLines {
    /// Motor off, read mode, byte-ready disabled.
    pub const IDLE: Self = Self {
        motor_on: false,
        write_inhibit: true,
        latch_strobe: false,
        data: 0,
    };
}

impl Default for ControlLines {
    fn default() -> Self {
        Self::IDLE
    }
}

/// The drive's CPU side, stepped from inside the flux loop.
///
/// `step` must not reach back into the drive; it sees the channel only
/// through the [`Signals`] it is handed.
pub trait DriveHost {
    /// Current levels of the lines the channel samples.
    fn lines(&self) -> ControlLines;

    /// Run one drive CPU cycle.
    fn step(&mut self, signals: &Signals);
}

/// Fixed lines and no CPU.
impl DriveHost for ControlLines {
    fn lines(&self) -> ControlLines {
        *self
    }

    fn step(&mut self, _signals: &Signals) {}
}
