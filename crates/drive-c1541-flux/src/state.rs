//! The drive channel's complete register set.
//!
//! Everything the tick loop mutates lives in [`DriveState`], a flat record
//! of primitives. Save states persist it either through serde (with the
//! `snapshot` feature) or through the named field list, which is kept by
//! hand in declaration order.

use emu_core::{Value, ValueKind};

use crate::config::{DENSITY_THRESHOLD, DriveConfig};
use crate::error::SnapshotError;
use crate::media::FLUX_BITS_PER_ENTRY;
use crate::noise::{self, MODULUS, NOISE_MAX_SPACING};

/// Number of fields in the register set.
pub const FIELD_COUNT: usize = 23;

/// Field names, in the order [`DriveState::to_fields`] reports them.
pub const FIELD_NAMES: [&str; FIELD_COUNT] = [
    "entry_index",
    "bits_left",
    "entry_bits",
    "output_bits",
    "density_counter",
    "sub_counter",
    "disk_cycle",
    "cpu_clocks",
    "write_enabled",
    "write_bits_remaining",
    "write_latch",
    "bit_history",
    "bits_in_byte",
    "sync",
    "byte_ready",
    "status_line",
    "previous_status_line",
    "flux_reversal",
    "reversal_this_tick",
    "noise_countdown",
    "rng",
    "overflow_delay",
    "density",
];

/// Flux channel registers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(serde::Serialize, serde::Deserialize))]
pub struct DriveState {
    /// Rotation cursor: flux entry under the head.
    pub entry_index: u32,
    /// Flux ticks left in the current entry (0-32).
    pub bits_left: u8,
    /// Input shift register; bit 0 is under the head.
    pub entry_bits: u32,
    /// Output flux accumulator. Bit 31 is the newest tick.
    pub output_bits: u32,
    /// Counts up from the density reload value to 16.
    pub density_counter: u8,
    /// Sub-cycles since the last reversal (0-15).
    pub sub_counter: u8,
    /// 16 MHz phase within the 1 MHz cycle (0-15).
    pub disk_cycle: u8,
    /// Flux ticks until the next host CPU step.
    pub cpu_clocks: u8,
    pub write_enabled: bool,
    /// Bits left in the write latch. Settles at -1 while reading.
    pub write_bits_remaining: i8,
    pub write_latch: u8,
    /// Decoded bits, newest in bit 0.
    pub bit_history: u32,
    /// Bits until the next byte-ready while reading (0-8).
    pub bits_in_byte: u8,
    pub sync: bool,
    pub byte_ready: bool,
    /// CA1 level: the inverse of byte-ready.
    pub status_line: bool,
    pub previous_status_line: bool,
    /// Reversal waiting to be consumed by the separator.
    pub flux_reversal: bool,
    /// A reversal was consumed during the last tick.
    pub reversal_this_tick: bool,
    /// Ticks until the next random reversal; 0 when idle.
    pub noise_countdown: u32,
    /// Lehmer generator register.
    pub rng: u32,
    /// SO pin delay line, shifted once per host CPU step.
    pub overflow_delay: u8,
    /// Density select: the counter reload value (0-15).
    pub density: u8,
}

impl DriveState {
    /// Register set after power-on, reset, or a media change.
    #[must_use]
    pub fn power_on(config: &DriveConfig) -> Self {
        let mut rng = noise::normalise_seed(config.noise_seed);
        let noise_countdown = noise::spacing_after_reversal(&mut rng);
        Self {
            entry_index: 0,
            bits_left: 0,
            entry_bits: 0,
            output_bits: 0,
            density_counter: 0,
            sub_counter: 0,
            disk_cycle: 0,
            cpu_clocks: config.cpu_divider,
            write_enabled: false,
            write_bits_remaining: 0,
            write_latch: 0,
            bit_history: 0,
            bits_in_byte: 8,
            sync: false,
            byte_ready: false,
            status_line: true,
            previous_status_line: true,
            flux_reversal: false,
            reversal_this_tick: false,
            noise_countdown,
            rng,
            overflow_delay: 0,
            density: config.density.reload(),
        }
    }

    /// All fields as named primitives, in [`FIELD_NAMES`] order.
    #[must_use]
    pub fn to_fields(&self) -> [(&'static str, Value); FIELD_COUNT] {
        let values = [
            Value::U32(self.entry_index),
            Value::U8(self.bits_left),
            Value::U32(self.entry_bits),
            Value::U32(self.output_bits),
            Value::U8(self.density_counter),
            Value::U8(self.sub_counter),
            Value::U8(self.disk_cycle),
            Value::U8(self.cpu_clocks),
            Value::Bool(self.write_enabled),
            Value::I8(self.write_bits_remaining),
            Value::U8(self.write_latch),
            Value::U32(self.bit_history),
            Value::U8(self.bits_in_byte),
            Value::Bool(self.sync),
            Value::Bool(self.byte_ready),
            Value::Bool(self.status_line),
            Value::Bool(self.previous_status_line),
            Value::Bool(self.flux_reversal),
            Value::Bool(self.reversal_this_tick),
            Value::U32(self.noise_countdown),
            Value::U32(self.rng),
            Value::U8(self.overflow_delay),
            Value::U8(self.density),
        ];
        core::array::from_fn(|i| (FIELD_NAMES[i], values[i]))
    }

    /// Look up one field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<Value> {
        self.to_fields()
            .into_iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// Rebuild a register set from named fields, in any order.
    ///
    /// Every field must be present exactly once with its declared type. Values
    /// are not range-checked here; see [`DriveState::validate`].
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = (&'a str, Value)>,
    {
        let mut slots = [None; FIELD_COUNT];
        for (name, value) in fields {
            let index = FIELD_NAMES
                .iter()
                .position(|&n| n == name)
                .ok_or_else(|| SnapshotError::UnknownField(name.to_string()))?;
            if slots[index].replace(value).is_some() {
                return Err(SnapshotError::DuplicateField(FIELD_NAMES[index]));
            }
        }
        let read = FieldReader { slots: &slots };

        Ok(Self {
            entry_index: read.u32("entry_index")?,
            bits_left: read.u8("bits_left")?,
            entry_bits: read.u32("entry_bits")?,
            output_bits: read.u32("output_bits")?,
            density_counter: read.u8("density_counter")?,
            sub_counter: read.u8("sub_counter")?,
            disk_cycle: read.u8("disk_cycle")?,
            cpu_clocks: read.u8("cpu_clocks")?,
            write_enabled: read.bool("write_enabled")?,
            write_bits_remaining: read.i8("write_bits_remaining")?,
            write_latch: read.u8("write_latch")?,
            bit_history: read.u32("bit_history")?,
            bits_in_byte: read.u8("bits_in_byte")?,
            sync: read.bool("sync")?,
            byte_ready: read.bool("byte_ready")?,
            status_line: read.bool("status_line")?,
            previous_status_line: read.bool("previous_status_line")?,
            flux_reversal: read.bool("flux_reversal")?,
            reversal_this_tick: read.bool("reversal_this_tick")?,
            noise_countdown: read.u32("noise_countdown")?,
            rng: read.u32("rng")?,
            overflow_delay: read.u8("overflow_delay")?,
            density: read.u8("density")?,
        })
    }

    /// Check the invariants every reachable state holds between ticks.
    ///
    /// `track_entries` is the length of the inserted track, if any.
    pub fn validate(&self, track_entries: Option<usize>, cpu_divider: u8) -> Result<(), SnapshotError> {
        fn check(ok: bool, field: &'static str, value: Value) -> Result<(), SnapshotError> {
            if ok {
                Ok(())
            } else {
                Err(SnapshotError::OutOfRange { field, value })
            }
        }

        if let Some(entries) = track_entries {
            check(
                (self.entry_index as usize) < entries,
                "entry_index",
                self.entry_index.into(),
            )?;
        }
        check(self.bits_left <= FLUX_BITS_PER_ENTRY, "bits_left", self.bits_left.into())?;
        check(
            self.density_counter <= DENSITY_THRESHOLD,
            "density_counter",
            self.density_counter.into(),
        )?;
        check(self.sub_counter < 16, "sub_counter", self.sub_counter.into())?;
        check(self.disk_cycle < 16, "disk_cycle", self.disk_cycle.into())?;
        check(self.cpu_clocks <= cpu_divider, "cpu_clocks", self.cpu_clocks.into())?;
        check(
            (-1..=8).contains(&self.write_bits_remaining),
            "write_bits_remaining",
            self.write_bits_remaining.into(),
        )?;
        check(self.bits_in_byte <= 8, "bits_in_byte", self.bits_in_byte.into())?;
        check(
            self.noise_countdown <= NOISE_MAX_SPACING,
            "noise_countdown",
            self.noise_countdown.into(),
        )?;
        check((1..MODULUS).contains(&self.rng), "rng", self.rng.into())?;
        check(self.density < DENSITY_THRESHOLD, "density", self.density.into())
    }
}

impl Default for DriveState {
    fn default() -> Self {
        Self::power_on(&DriveConfig::default())
    }
}

struct FieldReader<'a> {
    slots: &'a [Option<Value>; FIELD_COUNT],
}

impl FieldReader<'_> {
    fn get(&self, field: &'static str, expected: ValueKind) -> Result<Value, SnapshotError> {
        let index = FIELD_NAMES
            .iter()
            .position(|&n| n == field)
            .ok_or(SnapshotError::MissingField(field))?;
        let value = self.slots[index].ok_or(SnapshotError::MissingField(field))?;
        if value.kind() == expected {
            Ok(value)
        } else {
            Err(SnapshotError::WrongType {
                field,
                expected,
                found: value.kind(),
            })
        }
    }

    fn bool(&self, field: &'static str) -> Result<bool, SnapshotError> {
        Ok(self.get(field, ValueKind::Bool)?.as_bool().unwrap_or_default())
    }

    fn u8(&self, field: &'static str) -> Result<u8, SnapshotError> {
        Ok(self.get(field, ValueKind::U8)?.as_u8().unwrap_or_default())
    }

    fn u32(&self, field: &'static str) -> Result<u32, SnapshotError> {
        Ok(self.get(field, ValueKind::U32)?.as_u32().unwrap_or_default())
    }

    fn i8(&self, field: &'static str) -> Result<i8, SnapshotError> {
        Ok(self.get(field, ValueKind::I8)?.as_i8().unwrap_or_default())
    }
}
