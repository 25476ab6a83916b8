//! Core clock, timing and inspection types shared by chip emulators.
//!
//! Every component is driven from a master crystal. Slower domains are
//! integer divisions of it, and component state can be queried by name
//! without disturbing emulation.

mod clock;
mod observable;
mod ticks;

pub use clock::MasterClock;
pub use observable::{Observable, Value, ValueKind};
pub use ticks::Ticks;
