//! Setup-time and snapshot errors.
//!
//! The tick loop itself cannot fail. Everything here is reported before the
//! first `run` or when a saved register set is handed back to the drive.

use std::fmt;

use emu_core::{Value, ValueKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Density reload value outside `0..16`.
    InvalidDensity(u8),
    /// The CPU clock divider must be at least 1.
    ZeroCpuDivider,
    /// A track buffer needs at least one flux entry.
    EmptyTrack,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDensity(value) => {
                write!(f, "invalid density reload value {value} (expected 0-15)")
            }
            Self::ZeroCpuDivider => write!(f, "CPU clock divider must be non-zero"),
            Self::EmptyTrack => write!(f, "track buffer has no flux entries"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    /// A field of the register set was not supplied.
    MissingField(&'static str),
    /// A field name that is not part of the register set.
    UnknownField(String),
    /// A field supplied more than once.
    DuplicateField(&'static str),
    /// A field was supplied with the wrong primitive type.
    WrongType {
        field: &'static str,
        expected: ValueKind,
        found: ValueKind,
    },
    /// A field value that no reachable state can hold.
    OutOfRange { field: &'static str, value: Value },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "snapshot is missing field `{field}`"),
            Self::UnknownField(field) => write!(f, "snapshot has unknown field `{field}`"),
            Self::DuplicateField(field) => write!(f, "snapshot repeats field `{field}`"),
            Self::WrongType {
                field,
                expected,
                found,
            } => write!(f, "snapshot field `{field}` is {found}, expected {expected}"),
            Self::OutOfRange { field, value } => {
                write!(f, "snapshot field `{field}` has out-of-range value {value}")
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
