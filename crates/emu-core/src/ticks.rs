//! The fundamental unit of time in the emulator.

/// A count of master clock ticks.
///
/// All timing is expressed in ticks of the master crystal oscillator. A
/// scheduler hands components a budget of ticks; components never see
/// wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(pub u64);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_default() {
        assert_eq!(Ticks::default(), Ticks::ZERO);
        assert_eq!(Ticks::new(65).get(), 65);
        assert!(Ticks::new(1) > Ticks::ZERO);
    }
}
