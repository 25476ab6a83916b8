//! Flux-level track buffer.
//!
//! A track is a ring of 32-bit flux entries. Each bit is one 16 MHz tick of
//! disk surface; a set bit is a flux reversal passing under the head. Bits
//! are consumed least significant first, entries in ascending order.

use crate::config::{Density, FLUX_CLOCK};
use crate::error::ConfigError;

/// Flux ticks stored per track entry.
pub const FLUX_BITS_PER_ENTRY: u8 = 32;

/// Flux ticks in one revolution at 300 rpm.
pub const FLUX_BITS_PER_TRACK: usize = FLUX_CLOCK.ticks_per_revolution(300).get() as usize;

/// Entries in a full-length physical track.
pub const FLUX_ENTRIES_PER_TRACK: usize = FLUX_BITS_PER_TRACK / FLUX_BITS_PER_ENTRY as usize;

/// One track of magnetic surface, as seen by the read/write head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FluxTrack {
    entries: Vec<u32>,
    write_protected: bool,
}

impl FluxTrack {
    /// A blank track with no recorded flux reversals.
    pub fn unformatted(entries: usize) -> Result<Self, ConfigError> {
        Self::from_entries(vec![0; entries])
    }

    pub fn from_entries(entries: Vec<u32>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptyTrack);
        }
        Ok(Self {
            entries,
            write_protected: false,
        })
    }

    /// Lay a GCR bitstream out as flux reversals.
    ///
    /// Each bit occupies one bit cell at `density`; a 1 bit puts a reversal
    /// at the start of its cell. Bits go out most significant first. The
    /// remainder of the track is left unformatted and bits that do not fit
    /// are dropped.
    pub fn from_gcr(gcr: &[u8], density: Density, entries: usize) -> Result<Self, ConfigError> {
        let mut track = Self::unformatted(entries)?;
        let cell = density.cell_ticks() as usize;
        let total = track.flux_len();

        let bits = gcr
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |bit| (byte >> bit) & 1 != 0));
        for (position, bit) in (0..total).step_by(cell).zip(bits) {
            if bit {
                track.set_flux_bit(position);
            }
        }
        Ok(track)
    }

    /// Number of flux entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Number of flux ticks in one revolution of this track.
    #[must_use]
    pub fn flux_len(&self) -> usize {
        self.entries.len() * FLUX_BITS_PER_ENTRY as usize
    }

    #[must_use]
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    #[must_use]
    pub fn entry(&self, index: usize) -> u32 {
        self.entries[index]
    }

    pub(crate) fn store(&mut self, index: usize, flux: u32) {
        self.entries[index] = flux;
    }

    /// Whether a reversal is recorded at flux tick `position`.
    #[must_use]
    pub fn flux_bit(&self, position: usize) -> bool {
        let per_entry = FLUX_BITS_PER_ENTRY as usize;
        (self.entries[position / per_entry] >> (position % per_entry)) & 1 != 0
    }

    fn set_flux_bit(&mut self, position: usize) {
        let per_entry = FLUX_BITS_PER_ENTRY as usize;
        self.entries[position / per_entry] |= 1u32 << (position % per_entry);
    }

    /// Every flux tick of the track in rotation order.
    pub fn flux_bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.entries
            .iter()
            .flat_map(|&entry| (0..FLUX_BITS_PER_ENTRY).map(move |bit| (entry >> bit) & 1 != 0))
    }

    #[must_use]
    pub fn write_protected(&self) -> bool {
        self.write_protected
    }

    pub fn set_write_protected(&mut self, protected: bool) {
        self.write_protected = protected;
    }
}
