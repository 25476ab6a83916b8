//! Lines from the flux channel back to VIA2 and the drive CPU.

use crate::state::DriveState;

/// Disk cycles up to this one propagate the byte-ready edge faster.
const FAST_EDGE_LAST_CYCLE: u8 = 6;

/// What the host sees of the channel at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signals {
    /// Byte ready: a byte has been assembled or latched.
    pub byte_ready: bool,
    /// SYNC: the last ten bits read were all 1 (PB7, active-low on the
    /// real port).
    pub sync: bool,
    /// CA1 level (inverse of byte-ready).
    pub status_line: bool,
    /// A flux reversal was consumed this tick.
    pub flux_reversal: bool,
    /// The delayed byte-ready edge reaches the CPU's SO pin on this step.
    pub set_overflow: bool,
    /// Read data as presented on VIA2 port A.
    pub read_data: u8,
    /// Write-protect sense (PB4). No disk reads as protected.
    pub write_protected: bool,
}

impl Signals {
    pub(crate) fn sample(state: &DriveState, write_protected: bool, set_overflow: bool) -> Self {
        Self {
            byte_ready: state.byte_ready,
            sync: state.sync,
            status_line: state.status_line,
            flux_reversal: state.reversal_this_tick,
            set_overflow,
            read_data: state.bit_history as u8,
            write_protected,
        }
    }
}

/// Drive CA1 from byte-ready and catch its falling edge.
///
/// The edge sets bit 1 or bit 2 of the SO delay line, so it reaches the CPU
/// one or two host steps later (see [`shift_overflow`]).
pub(crate) fn sample_status_line(state: &mut DriveState) {
    state.previous_status_line = state.status_line;
    state.status_line = !state.byte_ready;
    if state.previous_status_line && !state.status_line {
        state.overflow_delay |= if state.disk_cycle > FAST_EDGE_LAST_CYCLE { 4 } else { 2 };
    }
}

/// Advance the SO delay line by one CPU step; true when the edge arrives.
///
/// The register shifts before bit 0 is tested, so a pending value of `N`
/// fires on the `log2(N)`th step: 2 on the next step, 4 on the one after.
pub(crate) fn shift_overflow(state: &mut DriveState) -> bool {
    state.overflow_delay >>= 1;
    state.overflow_delay & 1 != 0
}
