//! Data separator: bit cells out of flux timing.
//!
//! A reversal restarts the density counter. The counter overflows once per
//! sub-cycle; every fourth sub-cycle (offset by two, so mid-cell) is a bit
//! cell boundary. A cell with a reversal at its start decodes as 1. Without
//! reversals the sub-cycle counter keeps wrapping, which is why more than
//! three 0 bits in a row read back with a spurious 1.

use crate::config::{DENSITY_THRESHOLD, Density};
use crate::host::ControlLines;
use crate::noise;
use crate::signals;
use crate::state::DriveState;
use crate::write;

/// Ten consecutive 1 bits.
pub const SYNC_MASK: u32 = 0x3FF;

/// Hand a pending reversal to the counters.
pub(crate) fn consume_reversal(state: &mut DriveState, density: Density) {
    if !state.flux_reversal {
        return;
    }
    if !state.write_enabled {
        state.density_counter = density.reload();
        state.sub_counter = 0;
    }
    state.flux_reversal = false;
    state.reversal_this_tick = true;
    if state.noise_countdown == 0 {
        state.noise_countdown = noise::spacing_after_reversal(&mut state.rng);
    }
}

/// Counter circuitry for one tick, up to and including the status line.
pub(crate) fn clock(state: &mut DriveState, density: Density, lines: &ControlLines) {
    if state.density_counter >= DENSITY_THRESHOLD {
        state.density_counter = density.reload();
        state.sub_counter += 1;

        if state.sub_counter & 0x03 == 0x02 {
            bit_cell(state, lines);
        }

        signals::sample_status_line(state);
    }

    if state.sub_counter >= 16 {
        state.sub_counter = 0;
    }
}

/// End of tick: the density counter runs at the full flux clock.
pub(crate) fn count(state: &mut DriveState) {
    state.density_counter += 1;
}

fn bit_cell(state: &mut DriveState, lines: &ControlLines) {
    if !state.write_enabled {
        state.write_bits_remaining = 0;
    }
    state.write_enabled = !lines.write_inhibit;
    state.write_bits_remaining -= 1;

    if state.write_enabled {
        write::bit_cell(state, lines);
    } else {
        read_bit_cell(state, lines);
    }
}

fn read_bit_cell(state: &mut DriveState, lines: &ControlLines) {
    state.bits_in_byte = state.bits_in_byte.saturating_sub(1);
    state.byte_ready = false;

    let bit = u32::from(state.sub_counter & 0x0C == 0);
    state.bit_history = (state.bit_history << 1) | bit;

    state.sync = false;
    if !state.write_enabled && state.bit_history & SYNC_MASK == SYNC_MASK {
        state.sync = true;
        state.bits_in_byte = 8;
        state.byte_ready = false;
    }

    if state.bits_in_byte == 0 {
        state.bits_in_byte = 8;
        state.byte_ready = lines.latch_strobe;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> ControlLines {
        ControlLines {
            motor_on: true,
            latch_strobe: true,
            ..ControlLines::IDLE
        }
    }

    #[test]
    fn reversal_restarts_counters_when_reading() {
        let mut s = DriveState::default();
        s.flux_reversal = true;
        s.density_counter = 12;
        s.sub_counter = 9;
        s.noise_countdown = 40;
        consume_reversal(&mut s, Density::FASTEST);
        assert_eq!(s.density_counter, 3);
        assert_eq!(s.sub_counter, 0);
        assert!(!s.flux_reversal);
        assert!(s.reversal_this_tick);
        // A random reversal was already pending.
        assert_eq!(s.noise_countdown, 40);
    }

    #[test]
    fn reversal_while_writing_keeps_counters() {
        let mut s = DriveState::default();
        s.write_enabled = true;
        s.flux_reversal = true;
        s.density_counter = 12;
        s.sub_counter = 9;
        s.noise_countdown = 0;
        s.rng = 1;
        consume_reversal(&mut s, Density::FASTEST);
        assert_eq!(s.density_counter, 12);
        assert_eq!(s.sub_counter, 9);
        assert_eq!(s.noise_countdown, (48_271 & 0x1F) + 289);
    }

    #[test]
    fn sub_cycle_on_overflow() {
        let mut s = DriveState::default();
        s.density_counter = 16;
        s.sub_counter = 0;
        clock(&mut s, Density::SLOWEST, &reading());
        assert_eq!(s.density_counter, 0);
        assert_eq!(s.sub_counter, 1);

        clock(&mut s, Density::SLOWEST, &reading());
        assert_eq!(s.sub_counter, 1);
        count(&mut s);
        assert_eq!(s.density_counter, 1);
    }

    #[test]
    fn mid_cell_after_reversal_reads_one() {
        let mut s = DriveState::default();
        s.bit_history = 0;
        s.density_counter = 16;
        s.sub_counter = 1;
        clock(&mut s, Density::SLOWEST, &reading());
        assert_eq!(s.bit_history, 1);
        assert_eq!(s.write_bits_remaining, -1);
    }

    #[test]
    fn later_cells_read_zero() {
        for sub in [5, 9, 13] {
            let mut s = DriveState::default();
            s.bit_history = 0;
            s.density_counter = 16;
            s.sub_counter = sub;
            clock(&mut s, Density::SLOWEST, &reading());
            assert_eq!(s.bit_history, 0, "sub-cycle {}", sub + 1);
        }
    }

    #[test]
    fn sub_counter_wraps() {
        let mut s = DriveState::default();
        s.density_counter = 16;
        s.sub_counter = 15;
        clock(&mut s, Density::SLOWEST, &reading());
        assert_eq!(s.sub_counter, 0);
    }

    #[test]
    fn ten_ones_is_sync() {
        let mut s = DriveState::default();
        s.bit_history = 0x1FF;
        s.bits_in_byte = 3;
        s.byte_ready = true;
        s.density_counter = 16;
        s.sub_counter = 1;
        clock(&mut s, Density::SLOWEST, &reading());
        assert!(s.sync);
        assert_eq!(s.bits_in_byte, 8);
        assert!(!s.byte_ready);
    }

    #[test]
    fn eighth_bit_raises_byte_ready() {
        let mut s = DriveState::default();
        s.bit_history = 0;
        s.bits_in_byte = 1;
        s.density_counter = 16;
        s.sub_counter = 1;
        clock(&mut s, Density::SLOWEST, &reading());
        assert!(!s.sync);
        assert!(s.byte_ready);
        assert_eq!(s.bits_in_byte, 8);

        // SOE low: the byte is framed but not signalled.
        let mut s = DriveState::default();
        s.bits_in_byte = 1;
        s.density_counter = 16;
        s.sub_counter = 1;
        clock(&mut s, Density::SLOWEST, &ControlLines::IDLE);
        assert!(!s.byte_ready);
        assert_eq!(s.bits_in_byte, 8);
    }
}
