//! Commodore 1541 read/write channel at flux level.
//!
//! Emulates the drive board's data path between the head and VIA2 at the
//! 16 MHz crystal rate: disk rotation over a flux track buffer, the data
//! separator that turns reversal timing into bits, SYNC detection, byte
//! framing, the write shift register, and random reversals over
//! unformatted media. The drive CPU and VIA2 live outside this crate and
//! are stepped through [`DriveHost`] every `cpu_divider` ticks.
//!
//! ```
//! use drive_c1541_flux::{ControlLines, DriveConfig, FluxDrive, FluxTrack};
//! use emu_core::Ticks;
//!
//! let mut drive = FluxDrive::new(DriveConfig::default()).expect("valid config");
//! drive.insert(FluxTrack::unformatted(64).expect("non-empty"));
//! let mut lines = ControlLines { motor_on: true, ..ControlLines::IDLE };
//! drive.run(Ticks::new(1_000), &mut lines);
//! assert!(drive.state().entry_index < 64);
//! ```

mod config;
mod drive;
mod error;
mod flux;
mod host;
mod media;
pub mod noise;
mod separator;
mod signals;
mod state;
mod write;

pub use config::{
    CPU_CLOCK_HZ, DEFAULT_CPU_DIVIDER, DENSITY_THRESHOLD, Density, DriveConfig, FLUX_CLOCK,
};
pub use drive::FluxDrive;
pub use error::{ConfigError, SnapshotError};
pub use host::{ControlLines, DriveHost};
pub use media::{FLUX_BITS_PER_ENTRY, FLUX_BITS_PER_TRACK, FLUX_ENTRIES_PER_TRACK, FluxTrack};
pub use separator::SYNC_MASK;
pub use signals::Signals;
pub use state::{DriveState, FIELD_COUNT, FIELD_NAMES};
