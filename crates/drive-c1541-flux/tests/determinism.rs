//! Replay: the same inputs give the same signal trace, and a restored
//! snapshot picks up exactly where the saved drive left off.

use drive_c1541_flux::noise::{NOISE_MAX_SPACING, NOISE_MIN_SPACING};
use drive_c1541_flux::{
    ControlLines, Density, DriveConfig, DriveHost, DriveState, FluxDrive, FluxTrack, Signals,
};
use emu_core::{Observable, Ticks, Value};

/// Records every signal set the drive hands over.
struct Trace {
    lines: ControlLines,
    seen: Vec<Signals>,
}

impl Trace {
    fn new() -> Self {
        Self {
            lines: ControlLines {
                motor_on: true,
                latch_strobe: true,
                ..ControlLines::IDLE
            },
            seen: Vec::new(),
        }
    }
}

impl DriveHost for Trace {
    fn lines(&self) -> ControlLines {
        self.lines
    }

    fn step(&mut self, signals: &Signals) {
        self.seen.push(*signals);
    }
}

fn drive(seed: u32) -> FluxDrive {
    let config = DriveConfig::new(Density::FASTEST, 16, seed).expect("valid config");
    let mut drive = FluxDrive::new(config).expect("valid config");
    let gcr = [0xFF, 0xFF, 0x52, 0x55, 0xD6, 0x9B, 0x55, 0x55];
    drive.insert(FluxTrack::from_gcr(&gcr, Density::FASTEST, 1_000).expect("non-empty"));
    drive
}

/// Flux ticks at which a reversal reached the separator.
fn reversal_ticks(drive: &mut FluxDrive, ticks: u32) -> Vec<u32> {
    let mut lines = ControlLines {
        motor_on: true,
        ..ControlLines::IDLE
    };
    (0..ticks)
        .filter(|_| {
            drive.run(Ticks::new(1), &mut lines);
            drive.flux_reversal()
        })
        .collect()
}

#[test]
fn same_seed_same_trace() {
    let mut a = drive(1234);
    let mut b = drive(1234);
    let mut ta = Trace::new();
    let mut tb = Trace::new();
    a.run(Ticks::new(50_000), &mut ta);
    b.run(Ticks::new(50_000), &mut tb);
    assert_eq!(ta.seen.len(), 50_000 / 16);
    assert_eq!(ta.seen, tb.seen);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn seed_changes_noise() {
    let mut a = FluxDrive::new(DriveConfig::default()).expect("valid config");
    let mut b = FluxDrive::new(DriveConfig {
        noise_seed: 99,
        ..DriveConfig::default()
    })
    .expect("valid config");
    a.insert(FluxTrack::unformatted(100).expect("non-empty"));
    b.insert(FluxTrack::unformatted(100).expect("non-empty"));
    assert_ne!(reversal_ticks(&mut a, 3_000), reversal_ticks(&mut b, 3_000));
}

#[test]
fn unformatted_track_noise_spacing() {
    for seed in [0, 1, 7, 0x7FFF_FFFF, u32::MAX] {
        let mut d = FluxDrive::new(DriveConfig {
            noise_seed: seed,
            ..DriveConfig::default()
        })
        .expect("valid config");
        d.insert(FluxTrack::unformatted(400).expect("non-empty"));

        let ticks = reversal_ticks(&mut d, 10_000);
        assert!(ticks[0] < 320, "seed {seed}: first reversal at {}", ticks[0]);
        for pair in ticks.windows(2) {
            let gap = pair[1] - pair[0];
            assert!(
                (NOISE_MIN_SPACING..=NOISE_MAX_SPACING).contains(&gap),
                "seed {seed}: gap {gap}"
            );
        }
    }
}

#[cfg(feature = "snapshot")]
#[test]
fn serde_snapshot_resumes_identically() {
    let mut a = drive(5);
    let mut ta = Trace::new();
    a.run(Ticks::new(12_345), &mut ta);

    let json = serde_json::to_string(&a.snapshot()).expect("serialize");
    let saved: DriveState = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(saved, a.snapshot());

    let mut b = drive(5);
    b.insert(a.track().cloned().expect("inserted"));
    b.restore(saved).expect("same geometry");

    let mut ta = Trace::new();
    let mut tb = Trace::new();
    a.run(Ticks::new(20_000), &mut ta);
    b.run(Ticks::new(20_000), &mut tb);
    assert_eq!(ta.seen, tb.seen);
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn field_list_snapshot_resumes_identically() {
    let mut a = drive(77);
    a.run(Ticks::new(9_999), &mut Trace::new());

    let fields: Vec<(String, Value)> = a
        .snapshot()
        .to_fields()
        .iter()
        .map(|(name, value)| ((*name).to_string(), *value))
        .collect();
    let saved = DriveState::from_fields(fields.iter().map(|(n, v)| (n.as_str(), *v)))
        .expect("complete");

    let mut b = drive(77);
    b.restore(saved).expect("valid");
    a.run(Ticks::new(5_000), &mut Trace::new());
    b.run(Ticks::new(5_000), &mut Trace::new());
    assert_eq!(a.snapshot(), b.snapshot());

    for (name, value) in a.snapshot().to_fields() {
        assert_eq!(a.query(&format!("state.{name}")), Some(value));
    }
}
