//! Write path: bytes from VIA2 port A out to the head.
//!
//! Each bit cell shifts the top bit of the write latch into the output
//! flux accumulator. A fresh byte is latched from the data port every
//! eighth cell, which is also when byte-ready asks the DOS for the next
//! one.

use crate::flux::FLUX_TOP_BIT;
use crate::host::ControlLines;
use crate::state::DriveState;

pub(crate) fn bit_cell(state: &mut DriveState, lines: &ControlLines) {
    state.noise_countdown = 0;
    state.byte_ready = false;

    if state.write_bits_remaining <= 0 {
        state.write_latch = lines.data;
        state.write_bits_remaining = 8;
        state.byte_ready = lines.latch_strobe;
    }

    if state.write_latch & 0x80 != 0 {
        state.output_bits |= FLUX_TOP_BIT;
    }
    state.write_latch <<= 1;
}
