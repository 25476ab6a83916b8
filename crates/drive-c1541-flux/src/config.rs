//! Drive configuration: density select, clock ratio and noise seed.

use emu_core::MasterClock;

use crate::error::ConfigError;

/// The drive board's 16 MHz crystal. One tick moves one flux bit under the
/// head.
pub const FLUX_CLOCK: MasterClock = MasterClock::new(16_000_000);

/// Drive CPU clock (1 MHz).
pub const CPU_CLOCK_HZ: u64 = 1_000_000;

/// Flux ticks per drive CPU cycle.
pub const DEFAULT_CPU_DIVIDER: u8 = FLUX_CLOCK.divider_for(CPU_CLOCK_HZ) as u8;

/// The density counter starts a new sub-cycle when it reaches this value.
pub const DENSITY_THRESHOLD: u8 = 16;

/// Density select: the value the density counter is reloaded with.
///
/// The counter runs from the reload value up to [`DENSITY_THRESHOLD`], so a
/// sub-cycle lasts `16 - reload` ticks and a bit cell four sub-cycles.
/// On the 1541 the reload value comes from VIA2 port B bits 5-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Density(u8);

impl Density {
    /// Tracks 31-35: 16 ticks per sub-cycle, 64 per bit.
    pub const SLOWEST: Self = Self(0);
    /// Tracks 1-17: 13 ticks per sub-cycle, 52 per bit.
    pub const FASTEST: Self = Self(3);

    pub fn new(reload: u8) -> Result<Self, ConfigError> {
        if reload < DENSITY_THRESHOLD {
            Ok(Self(reload))
        } else {
            Err(ConfigError::InvalidDensity(reload))
        }
    }

    /// Reload value from a saved register set, which is range-checked
    /// before it gets here.
    pub(crate) const fn from_reload(reload: u8) -> Self {
        Self(reload & 0x0F)
    }

    /// Density select as wired to VIA2 port B (bits 5-6).
    #[must_use]
    pub const fn from_port_b(prb: u8) -> Self {
        Self((prb >> 5) & 0x03)
    }

    /// The density the 1541 DOS selects for a track (1-35).
    #[must_use]
    pub const fn for_track(track: u8) -> Self {
        match track {
            1..=17 => Self(3),
            18..=24 => Self(2),
            25..=30 => Self(1),
            _ => Self(0),
        }
    }

    #[must_use]
    pub const fn reload(self) -> u8 {
        self.0
    }

    /// Ticks per sub-cycle (the density divisor).
    #[must_use]
    pub const fn sub_cycle_ticks(self) -> u32 {
        (DENSITY_THRESHOLD - self.0) as u32
    }

    /// Ticks per bit cell.
    #[must_use]
    pub const fn cell_ticks(self) -> u32 {
        self.sub_cycle_ticks() * 4
    }
}

impl Default for Density {
    fn default() -> Self {
        Self::FASTEST
    }
}

/// Configuration for constructing a flux drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveConfig {
    /// Density select.
    pub density: Density,
    /// Flux ticks per host CPU step.
    pub cpu_divider: u8,
    /// Initial register of the noise generator. 0 behaves as 1.
    pub noise_seed: u32,
}

impl DriveConfig {
    pub fn new(density: Density, cpu_divider: u8, noise_seed: u32) -> Result<Self, ConfigError> {
        let config = Self {
            density,
            cpu_divider,
            noise_seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cpu_divider == 0 {
            return Err(ConfigError::ZeroCpuDivider);
        }
        Ok(())
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            density: Density::default(),
            cpu_divider: DEFAULT_CPU_DIVIDER,
            noise_seed: 0,
        }
    }
}
