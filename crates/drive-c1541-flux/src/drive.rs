//! The 16 MHz flux loop and the drive-facing API.
//!
//! Each tick runs, in order: rotation, the noise countdown, reversal
//! hand-off, the counter circuitry (bit cells and CA1), the host CPU divider
//! and finally the free-running counters. The host CPU is stepped from
//! inside the loop every `cpu_divider` ticks, so byte-ready and SYNC are
//! seen by the 6502 on the cycle they change.

use emu_core::{Observable, Ticks, Value};

use crate::config::{Density, DriveConfig};
use crate::error::{ConfigError, SnapshotError};
use crate::flux;
use crate::host::DriveHost;
use crate::media::FluxTrack;
use crate::noise;
use crate::separator;
use crate::signals::{self, Signals};
use crate::state::DriveState;

/// Commodore 1541 read/write channel at flux level.
#[derive(Debug, Clone)]
pub struct FluxDrive {
    config: DriveConfig,
    state: DriveState,
    /// Track under the head (None = no disk).
    track: Option<FluxTrack>,
}

impl FluxDrive {
    pub fn new(config: DriveConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("rejected drive configuration: {err}");
            return Err(err);
        }
        log::debug!(
            "flux drive: density {} ({} ticks/bit), CPU every {} ticks",
            config.density.reload(),
            config.density.cell_ticks(),
            config.cpu_divider
        );
        Ok(Self {
            config,
            state: DriveState::power_on(&config),
            track: None,
        })
    }

    /// Advance the channel by `ticks` flux clock ticks.
    pub fn run<H: DriveHost>(&mut self, ticks: Ticks, host: &mut H) {
        let density = self.config.density;
        let write_protected = self.write_protected();
        let mut lines = host.lines();

        for _ in 0..ticks.get() {
            let state = &mut self.state;
            state.reversal_this_tick = false;

            if lines.motor_on {
                flux::rotate(state, self.track.as_mut());
            }
            noise::tick(state);
            separator::consume_reversal(state, density);
            separator::clock(state, density, &lines);

            state.cpu_clocks = state.cpu_clocks.saturating_sub(1);
            if state.cpu_clocks == 0 {
                let set_overflow = signals::shift_overflow(state);
                host.step(&Signals::sample(state, write_protected, set_overflow));
                lines = host.lines();
                state.cpu_clocks = self.config.cpu_divider;
            }

            separator::count(state);
            state.disk_cycle = (state.disk_cycle + 1) & 0x0F;
        }
    }

    /// Put a track under the head. Any previous track is dropped.
    pub fn insert(&mut self, track: FluxTrack) {
        log::info!(
            "flux track inserted: {} entries{}",
            track.entry_count(),
            if track.write_protected() { ", write protected" } else { "" }
        );
        self.track = Some(track);
        self.reset();
    }

    /// Take the track out, with everything written to it.
    pub fn eject(&mut self) -> Option<FluxTrack> {
        let track = self.track.take();
        if track.is_some() {
            log::info!("flux track ejected");
        }
        self.reset();
        track
    }

    /// Return every register to its power-on value.
    pub fn reset(&mut self) {
        log::debug!("flux drive reset");
        self.state = DriveState::power_on(&self.config);
    }

    /// Change the density select; takes effect at the next counter reload.
    pub fn set_density(&mut self, density: Density) {
        if density != self.config.density {
            log::debug!("density select {} -> {}", self.config.density.reload(), density.reload());
            self.config.density = density;
        }
        self.state.density = density.reload();
    }

    /// Copy of the register set for a save state, density select included.
    #[must_use]
    pub fn snapshot(&self) -> DriveState {
        self.state.clone()
    }

    /// Load a register set saved by [`FluxDrive::snapshot`].
    ///
    /// The matching track must already be inserted. On error the drive is
    /// left unchanged.
    pub fn restore(&mut self, state: DriveState) -> Result<(), SnapshotError> {
        let entries = self.track.as_ref().map(FluxTrack::entry_count);
        if let Err(err) = state.validate(entries, self.config.cpu_divider) {
            log::warn!("snapshot rejected: {err}");
            return Err(err);
        }
        log::debug!("snapshot restored at entry {}", state.entry_index);
        self.config.density = Density::from_reload(state.density);
        self.state = state;
        Ok(())
    }

    /// Lines as they stand between ticks. `set_overflow` is only ever
    /// reported to the host during a step.
    #[must_use]
    pub fn signals(&self) -> Signals {
        Signals::sample(&self.state, self.write_protected(), false)
    }

    #[must_use]
    pub fn state(&self) -> &DriveState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    #[must_use]
    pub fn has_disk(&self) -> bool {
        self.track.is_some()
    }

    #[must_use]
    pub fn track(&self) -> Option<&FluxTrack> {
        self.track.as_ref()
    }

    #[must_use]
    pub fn byte_ready(&self) -> bool {
        self.state.byte_ready
    }

    #[must_use]
    pub fn sync(&self) -> bool {
        self.state.sync
    }

    #[must_use]
    pub fn status_line(&self) -> bool {
        self.state.status_line
    }

    /// Whether a reversal was consumed during the last tick.
    #[must_use]
    pub fn flux_reversal(&self) -> bool {
        self.state.reversal_this_tick
    }

    /// Pending SO delay line (bit 0 fires on the next CPU step).
    #[must_use]
    pub fn overflow_delay(&self) -> u8 {
        self.state.overflow_delay
    }

    fn write_protected(&self) -> bool {
        self.track.as_ref().is_none_or(FluxTrack::write_protected)
    }
}

const QUERY_PATHS: &[&str] = &[
    "state.entry_index",
    "state.bits_left",
    "state.entry_bits",
    "state.output_bits",
    "state.density_counter",
    "state.sub_counter",
    "state.disk_cycle",
    "state.cpu_clocks",
    "state.write_enabled",
    "state.write_bits_remaining",
    "state.write_latch",
    "state.bit_history",
    "state.bits_in_byte",
    "state.sync",
    "state.byte_ready",
    "state.status_line",
    "state.previous_status_line",
    "state.flux_reversal",
    "state.reversal_this_tick",
    "state.noise_countdown",
    "state.rng",
    "state.overflow_delay",
    "state.density",
    "signals.byte_ready",
    "signals.sync",
    "signals.status_line",
    "signals.flux_reversal",
    "signals.read_data",
    "signals.write_protected",
    "media.inserted",
    "media.entries",
    "config.density",
    "config.cpu_divider",
];

impl Observable for FluxDrive {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("state.") {
            self.state.field(rest)
        } else if let Some(rest) = path.strip_prefix("signals.") {
            let signals = self.signals();
            match rest {
                "byte_ready" => Some(signals.byte_ready.into()),
                "sync" => Some(signals.sync.into()),
                "status_line" => Some(signals.status_line.into()),
                "flux_reversal" => Some(signals.flux_reversal.into()),
                "read_data" => Some(signals.read_data.into()),
                "write_protected" => Some(signals.write_protected.into()),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("media.") {
            match rest {
                "inserted" => Some(self.has_disk().into()),
                "entries" => self
                    .track
                    .as_ref()
                    .map(|t| Value::U64(t.entry_count() as u64)),
                _ => None,
            }
        } else if let Some(rest) = path.strip_prefix("config.") {
            match rest {
                "density" => Some(self.config.density.reload().into()),
                "cpu_divider" => Some(self.config.cpu_divider.into()),
                _ => None,
            }
        } else {
            None
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        QUERY_PATHS
    }
}
