//! Disk rotation and the flux bit under the head.

use crate::media::{FLUX_BITS_PER_ENTRY, FluxTrack};
use crate::state::DriveState;

/// Newest tick in the output accumulator.
pub(crate) const FLUX_TOP_BIT: u32 = 1 << 31;

/// Move the surface one flux tick under the head.
///
/// Only called while the spindle motor runs. With no disk the head sees a
/// permanently quiet surface.
pub(crate) fn rotate(state: &mut DriveState, track: Option<&mut FluxTrack>) {
    match track {
        None => {
            state.bits_left = 1;
            state.entry_bits = 0;
        }
        Some(track) => {
            if state.bits_left == 0 {
                next_entry(state, track);
            }
        }
    }

    state.output_bits >>= 1;

    if state.write_enabled {
        state.noise_countdown = 0;
    }

    if state.entry_bits & 1 != 0 {
        state.noise_countdown = 0;
        state.flux_reversal = true;
        state.output_bits |= FLUX_TOP_BIT;
    } else {
        state.output_bits &= !FLUX_TOP_BIT;
    }

    state.entry_bits >>= 1;
    state.bits_left -= 1;
}

/// Commit the finished entry when writing, then load the next one.
fn next_entry(state: &mut DriveState, track: &mut FluxTrack) {
    let index = state.entry_index as usize;
    if state.write_enabled && !track.write_protected() {
        track.store(index, state.output_bits);
    }

    let next = if index + 1 >= track.entry_count() { 0 } else { index + 1 };
    state.entry_index = next as u32;

    if !state.write_enabled {
        state.entry_bits = track.entry(next);
    }

    state.output_bits = 0;
    state.bits_left = FLUX_BITS_PER_ENTRY;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DriveState {
        DriveState::default()
    }

    #[test]
    fn no_disk_is_quiet() {
        let mut s = state();
        s.entry_bits = 0xFFFF_FFFF;
        rotate(&mut s, None);
        assert!(!s.flux_reversal);
        assert_eq!(s.bits_left, 0);
        assert_eq!(s.output_bits & FLUX_TOP_BIT, 0);
    }

    #[test]
    fn loads_next_entry_when_exhausted() {
        let mut track = FluxTrack::from_entries(vec![0, 0b101, 0]).expect("valid");
        let mut s = state();
        rotate(&mut s, Some(&mut track));
        assert_eq!(s.entry_index, 1);
        assert_eq!(s.bits_left, 31);
        assert!(s.flux_reversal);
        assert_eq!(s.noise_countdown, 0);
        assert_eq!(s.output_bits, FLUX_TOP_BIT);

        s.flux_reversal = false;
        rotate(&mut s, Some(&mut track));
        assert!(!s.flux_reversal);
        assert_eq!(s.output_bits, FLUX_TOP_BIT >> 1);

        rotate(&mut s, Some(&mut track));
        assert!(s.flux_reversal);
        assert_eq!(s.output_bits, FLUX_TOP_BIT | FLUX_TOP_BIT >> 2);
    }

    #[test]
    fn cursor_wraps_at_track_end() {
        let mut track = FluxTrack::unformatted(2).expect("valid");
        let mut s = state();
        s.entry_index = 1;
        rotate(&mut s, Some(&mut track));
        assert_eq!(s.entry_index, 0);
    }

    #[test]
    fn writing_commits_accumulator() {
        let mut track = FluxTrack::from_entries(vec![0, 0xFFFF_FFFF]).expect("valid");
        let mut s = state();
        s.write_enabled = true;
        s.output_bits = 0x1234_5678;
        s.noise_countdown = 50;
        rotate(&mut s, Some(&mut track));
        assert_eq!(track.entry(0), 0x1234_5678);
        assert_eq!(s.entry_index, 1);
        // The next entry is not read while writing.
        assert_eq!(s.entry_bits, 0);
        assert_eq!(s.noise_countdown, 0);
    }

    #[test]
    fn write_protect_blocks_commit() {
        let mut track = FluxTrack::unformatted(2).expect("valid");
        track.set_write_protected(true);
        let mut s = state();
        s.write_enabled = true;
        s.output_bits = 0xDEAD_BEEF;
        rotate(&mut s, Some(&mut track));
        assert_eq!(track.entry(0), 0);
        assert_eq!(s.entry_index, 1);
    }
}
