//! Flux noise over unformatted media.
//!
//! With nothing recorded under the head, the read amplifier still sees
//! stray reversals. They are modelled with a Lehmer generator (the
//! `minstd_rand` parameters) feeding a countdown of ticks until the next
//! random reversal. Copy protection checks probe unformatted areas, so the
//! spacing constants must not drift.

use crate::state::DriveState;

/// Lehmer multiplier.
pub const MULTIPLIER: u64 = 48_271;

/// Lehmer modulus, 2^31 - 1.
pub const MODULUS: u32 = 0x7FFF_FFFF;

/// Shortest gap between two random reversals.
pub const NOISE_MIN_SPACING: u32 = 33;

/// Longest gap between two random reversals.
pub const NOISE_MAX_SPACING: u32 = NOISE_MIN_SPACING + 366;

/// Seed value the register holds after reset: 0 and multiples of the
/// modulus would lock the generator, so they become 1.
#[must_use]
pub fn normalise_seed(seed: u32) -> u32 {
    match seed % MODULUS {
        0 => 1,
        s => s,
    }
}

/// Step the generator and return the new register value.
pub fn advance(register: &mut u32) -> u32 {
    if *register == 0 {
        *register = 1;
    }
    *register = (u64::from(*register) * MULTIPLIER % u64::from(MODULUS)) as u32;
    *register
}

/// Countdown after a random reversal fired.
pub(crate) fn spacing_after_noise(register: &mut u32) -> u32 {
    advance(register) % 367 + NOISE_MIN_SPACING
}

/// Countdown after a reversal while no random one was pending.
pub(crate) fn spacing_after_reversal(register: &mut u32) -> u32 {
    (advance(register) & 0x1F) + 289
}

/// Run the random reversal countdown for one tick.
pub(crate) fn tick(state: &mut DriveState) {
    if state.noise_countdown > 0 {
        state.noise_countdown -= 1;
        if state.noise_countdown == 0 {
            state.flux_reversal = true;
            state.noise_countdown = spacing_after_noise(&mut state.rng);
        }
    }
}
