// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named note durations derived from a fixed tempo.
//!
//! A `Meter` is computed once from a BPM value and never changes. Playing at
//! another tempo means building another meter (and the notes from it).

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::debug;

use crate::error::ScoreError;
use crate::music::PitchSource;
use crate::sequencer::Note;

/// Default tempo in BPM
pub const DEFAULT_BPM: f64 = 140.0;

/// Every duration the meter knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationName {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    DottedWhole,
    DottedHalf,
    DottedQuarter,
    DottedEighth,
    DottedSixteenth,
    DottedThirtySecond,
    HalfTriplet,
    QuarterTriplet,
    EighthTriplet,
    SixteenthTriplet,
}

impl DurationName {
    pub const ALL: [DurationName; 16] = [
        DurationName::Whole,
        DurationName::Half,
        DurationName::Quarter,
        DurationName::Eighth,
        DurationName::Sixteenth,
        DurationName::ThirtySecond,
        DurationName::DottedWhole,
        DurationName::DottedHalf,
        DurationName::DottedQuarter,
        DurationName::DottedEighth,
        DurationName::DottedSixteenth,
        DurationName::DottedThirtySecond,
        DurationName::HalfTriplet,
        DurationName::QuarterTriplet,
        DurationName::EighthTriplet,
        DurationName::SixteenthTriplet,
    ];

    /// Short symbol used in scores ("q", "dq", "qt", ...)
    pub fn symbol(self) -> &'static str {
        match self {
            DurationName::Whole => "w",
            DurationName::Half => "h",
            DurationName::Quarter => "q",
            DurationName::Eighth => "e",
            DurationName::Sixteenth => "s",
            DurationName::ThirtySecond => "t",
            DurationName::DottedWhole => "dw",
            DurationName::DottedHalf => "dh",
            DurationName::DottedQuarter => "dq",
            DurationName::DottedEighth => "de",
            DurationName::DottedSixteenth => "ds",
            DurationName::DottedThirtySecond => "dt",
            DurationName::HalfTriplet => "ht",
            DurationName::QuarterTriplet => "qt",
            DurationName::EighthTriplet => "et",
            DurationName::SixteenthTriplet => "st",
        }
    }

    /// Long, human-readable name
    pub fn name(self) -> &'static str {
        match self {
            DurationName::Whole => "whole",
            DurationName::Half => "half",
            DurationName::Quarter => "quarter",
            DurationName::Eighth => "eighth",
            DurationName::Sixteenth => "sixteenth",
            DurationName::ThirtySecond => "thirty-second",
            DurationName::DottedWhole => "dotted-whole",
            DurationName::DottedHalf => "dotted-half",
            DurationName::DottedQuarter => "dotted-quarter",
            DurationName::DottedEighth => "dotted-eighth",
            DurationName::DottedSixteenth => "dotted-sixteenth",
            DurationName::DottedThirtySecond => "dotted-thirty-second",
            DurationName::HalfTriplet => "half-triplet",
            DurationName::QuarterTriplet => "quarter-triplet",
            DurationName::EighthTriplet => "eighth-triplet",
            DurationName::SixteenthTriplet => "sixteenth-triplet",
        }
    }
}

impl FromStr for DurationName {
    type Err = ScoreError;

    /// Accepts the short symbol or the long name, ignoring case and
    /// treating spaces and underscores like hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace([' ', '_'], "-");
        DurationName::ALL
            .iter()
            .copied()
            .find(|d| d.symbol() == key || d.name() == key)
            .ok_or_else(|| ScoreError::UnknownDuration(s.to_string()))
    }
}

impl fmt::Display for DurationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Duration table for one tempo
#[derive(Debug, Clone, PartialEq)]
pub struct Meter {
    bpm: f64,
    table: HashMap<DurationName, f64>,
}

impl Meter {
    /// Build the table for `bpm` beats (quarter notes) per minute.
    pub fn new(bpm: f64) -> Result<Self, ScoreError> {
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(ScoreError::InvalidTempo(bpm));
        }

        let table = build_table(bpm);

        // Every entry must fit a Duration; the dotted whole is the longest
        let longest = table
            .get(&DurationName::DottedWhole)
            .copied()
            .unwrap_or(f64::INFINITY);
        if Duration::try_from_secs_f64(longest).is_err() {
            return Err(ScoreError::InvalidTempo(bpm));
        }

        debug!(bpm, quarter = 60.0 / bpm, "built duration table");
        Ok(Self { bpm, table })
    }

    /// Tempo this table was built for
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Length of a named duration in seconds
    pub fn seconds(&self, name: DurationName) -> f64 {
        // The table is filled for every variant in `new`
        self.table.get(&name).copied().unwrap_or_default()
    }

    /// Length of a named duration
    pub fn duration(&self, name: DurationName) -> Duration {
        Duration::from_secs_f64(self.seconds(name))
    }

    /// Look a duration up by symbol or long name
    pub fn lookup(&self, name: &str) -> Result<Duration, ScoreError> {
        let name: DurationName = name.parse()?;
        Ok(self.duration(name))
    }

    /// Build an unbound note of a named duration
    pub fn note(&self, name: DurationName, pitches: impl Into<PitchSource>) -> Note {
        Note::new(self.duration(name), pitches)
    }

    /// Build an unbound note from a duration given as text
    pub fn note_named(
        &self,
        name: &str,
        pitches: impl Into<PitchSource>,
    ) -> Result<Note, ScoreError> {
        Ok(Note::new(self.lookup(name)?, pitches))
    }

    pub fn w(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::Whole, pitches)
    }

    pub fn h(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::Half, pitches)
    }

    pub fn q(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::Quarter, pitches)
    }

    pub fn e(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::Eighth, pitches)
    }

    pub fn s(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::Sixteenth, pitches)
    }

    pub fn t(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::ThirtySecond, pitches)
    }

    pub fn dw(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::DottedWhole, pitches)
    }

    pub fn dh(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::DottedHalf, pitches)
    }

    pub fn dq(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::DottedQuarter, pitches)
    }

    pub fn de(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::DottedEighth, pitches)
    }

    pub fn ds(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::DottedSixteenth, pitches)
    }

    pub fn dt(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::DottedThirtySecond, pitches)
    }

    pub fn ht(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::HalfTriplet, pitches)
    }

    pub fn qt(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::QuarterTriplet, pitches)
    }

    pub fn et(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::EighthTriplet, pitches)
    }

    pub fn st(&self, pitches: impl Into<PitchSource>) -> Note {
        self.note(DurationName::SixteenthTriplet, pitches)
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self {
            bpm: DEFAULT_BPM,
            table: build_table(DEFAULT_BPM),
        }
    }
}

fn build_table(bpm: f64) -> HashMap<DurationName, f64> {
    let q = 60.0 / bpm;
    let w = q * 4.0;
    let h = w / 2.0;
    let e = q / 2.0;
    let s = e / 2.0;
    let t = s / 2.0;

    HashMap::from([
        (DurationName::Whole, w),
        (DurationName::Half, h),
        (DurationName::Quarter, q),
        (DurationName::Eighth, e),
        (DurationName::Sixteenth, s),
        (DurationName::ThirtySecond, t),
        // Dotted: the value plus the next smaller one
        (DurationName::DottedWhole, w + h),
        (DurationName::DottedHalf, h + q),
        (DurationName::DottedQuarter, q + e),
        (DurationName::DottedEighth, e + s),
        (DurationName::DottedSixteenth, s + t),
        (DurationName::DottedThirtySecond, t * 1.5),
        // Triplets: three in the span of the next larger value
        (DurationName::HalfTriplet, w / 3.0),
        (DurationName::QuarterTriplet, h / 3.0),
        (DurationName::EighthTriplet, q / 3.0),
        (DurationName::SixteenthTriplet, e / 3.0),
    ])
}
