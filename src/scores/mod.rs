// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Built-in scores.
//!
//! A score is plain Rust against the public API: it looks parts up by name
//! and calls `add` on them.

pub mod lost_woods;

use std::fmt;
use std::time::Duration;

use crate::error::ScoreError;
use crate::music::Pitch;
use crate::sequencer::{Ensemble, Instrument, Note};
use crate::timing::Meter;

/// Pitches of the test-note routine (absolute, home key 0)
pub const TEST_TONES: [Pitch; 4] = [60, 64, 70, 72];

/// Length of each test tone
pub const TEST_TONE_LENGTH: Duration = Duration::from_millis(500);

/// Scores that can be picked by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    LostWoods,
}

impl Score {
    pub const ALL: [Score; 1] = [Score::LostWoods];

    /// Parse a score name ("lost-woods", "lost_woods", "Lost Woods")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace([' ', '-', '_'], "");
        match s.as_str() {
            "lostwoods" => Some(Score::LostWoods),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Score::LostWoods => "lost-woods",
        }
    }

    /// Part names the score expects in the ensemble
    pub fn parts(self) -> &'static [&'static str] {
        match self {
            Score::LostWoods => &lost_woods::PARTS,
        }
    }

    /// Write the score into the ensemble
    pub fn arrange(self, meter: &Meter, ensemble: &mut Ensemble) -> Result<(), ScoreError> {
        match self {
            Score::LostWoods => lost_woods::arrange(meter, ensemble),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Four test tones, played twice, half a second each.
pub fn test_tones(instrument: &mut Instrument) -> Result<(), ScoreError> {
    let tones: Vec<Note> = TEST_TONES
        .iter()
        .map(|&pitch| Note::new(TEST_TONE_LENGTH, pitch))
        .collect();

    for _ in 0..2 {
        instrument.add(tones.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::{shared, LogSink};
    use crate::music::{pitch_with_octave, Octave, C};
    use crate::timing::DurationName;

    fn satb() -> Ensemble {
        let keys = [
            ("soprano", pitch_with_octave(C, 6)),
            ("alto", pitch_with_octave(C, 5)),
            ("tenor", pitch_with_octave(C, Octave::Middle)),
            ("bass", pitch_with_octave(C, 3)),
        ];
        keys.iter().fold(Ensemble::new(), |ensemble, (name, key)| {
            ensemble.with(Instrument::new(*name, *key, shared(LogSink::new(*name))))
        })
    }

    #[test]
    fn test_score_parse() {
        assert_eq!(Score::parse("lost-woods"), Some(Score::LostWoods));
        assert_eq!(Score::parse("Lost Woods"), Some(Score::LostWoods));
        assert_eq!(Score::parse("zeldas-lullaby"), None);
        for score in Score::ALL {
            assert_eq!(Score::parse(&score.to_string()), Some(score));
        }
    }

    #[test]
    fn test_lost_woods_parts_line_up() {
        let meter = Meter::new(140.0).unwrap();
        let mut ensemble = satb();

        Score::LostWoods.arrange(&meter, &mut ensemble).unwrap();

        // 18 bars of 4/4 in every part
        let expected = meter.duration(DurationName::Whole) * 18;
        for name in Score::LostWoods.parts() {
            let part = ensemble.get(name).unwrap();
            let diff = part.duration().as_secs_f64() - expected.as_secs_f64();
            assert!(diff.abs() < 1e-6, "{} is {:?}", name, part.duration());
        }
    }

    #[test]
    fn test_lost_woods_uses_home_keys() {
        let meter = Meter::new(140.0).unwrap();
        let mut ensemble = satb();
        Score::LostWoods.arrange(&meter, &mut ensemble).unwrap();

        // Alto opens on F above its home C5
        let alto = ensemble.get("alto").unwrap();
        assert_eq!(alto.sequence()[0].pitches(), &[Some(65)]);

        // Soprano opens with rests
        let soprano = ensemble.get("soprano").unwrap();
        assert!(soprano.sequence()[0].is_rest());
    }

    #[test]
    fn test_lost_woods_needs_all_parts() {
        let meter = Meter::default();
        let mut ensemble = Ensemble::new().with(Instrument::new(
            "soprano",
            72,
            shared(LogSink::new("soprano")),
        ));

        assert_eq!(
            Score::LostWoods.arrange(&meter, &mut ensemble),
            Err(ScoreError::MissingPart("alto".to_string()))
        );
    }

    #[test]
    fn test_test_tones() {
        let mut inst = Instrument::new("test", 0, shared(LogSink::new("test")));
        test_tones(&mut inst).unwrap();

        assert_eq!(inst.sequence().len(), 8);
        assert_eq!(inst.duration(), Duration::from_secs(4));
        assert_eq!(inst.sequence()[6].pitches(), &[Some(70)]);
    }
}
