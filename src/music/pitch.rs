// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch classes, octave placement and pitch sources.
//!
//! Pitches are plain integers: a pitch class (C=0 … B=11) plus twelve per
//! octave. Nothing here clamps to the MIDI range; transposition may carry a
//! pitch anywhere and it is up to the sink to reject what it cannot send.

use std::fmt;

/// Absolute pitch (pitch class + 12 × octave + transpositions)
pub type Pitch = i32;

/// Semitones per octave
pub const OCTAVE: Pitch = 12;

/// Octave index conventionally called "middle"
pub const MIDDLE_OCTAVE: i32 = 4;

/// A rest: no pitch in this slot
pub const R: Option<Pitch> = None;

pub const C: Pitch = 0;
pub const BS: Pitch = 0;
pub const CS: Pitch = 1;
pub const DF: Pitch = 1;
pub const D: Pitch = 2;
pub const DS: Pitch = 3;
pub const EF: Pitch = 3;
pub const E: Pitch = 4;
pub const FF: Pitch = 4;
pub const ES: Pitch = 5;
pub const F: Pitch = 5;
pub const FS: Pitch = 6;
pub const GF: Pitch = 6;
pub const G: Pitch = 7;
pub const GS: Pitch = 8;
pub const AF: Pitch = 8;
pub const A: Pitch = 9;
pub const AS: Pitch = 10;
pub const BF: Pitch = 10;
pub const B: Pitch = 11;
pub const CF: Pitch = 11;

/// Octave selector for `pitch_with_octave`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Octave {
    /// Octave index 4
    Middle,
    Index(i32),
}

impl Octave {
    pub fn index(self) -> i32 {
        match self {
            Octave::Middle => MIDDLE_OCTAVE,
            Octave::Index(i) => i,
        }
    }
}

impl From<i32> for Octave {
    fn from(index: i32) -> Self {
        Octave::Index(index)
    }
}

/// Place a pitch class in an octave: `base + 12 × octave`.
///
/// ```
/// use ensemble::music::{pitch_with_octave, Octave, C, A};
/// assert_eq!(pitch_with_octave(C, Octave::Middle), 48);
/// assert_eq!(pitch_with_octave(A, 1), 21);
/// ```
pub fn pitch_with_octave(base: Pitch, octave: impl Into<Octave>) -> Pitch {
    base + OCTAVE * octave.into().index()
}

/// Note names (pitch classes), used where pitches are named in text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PitchClass {
    C,
    Cs, // C# / Db
    D,
    Ds, // D# / Eb
    E,
    F,
    Fs, // F# / Gb
    G,
    Gs, // G# / Ab
    A,
    As, // A# / Bb
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    /// Integer value (0-11)
    pub fn value(self) -> Pitch {
        self as Pitch
    }

    /// Parse a note name (e.g., "C", "C#", "Db", "Fs", "E#")
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_uppercase();
        match s.as_str() {
            "C" | "B#" | "BS" => Some(PitchClass::C),
            "C#" | "CS" | "DB" | "DF" => Some(PitchClass::Cs),
            "D" => Some(PitchClass::D),
            "D#" | "DS" | "EB" | "EF" => Some(PitchClass::Ds),
            "E" | "FB" | "FF" => Some(PitchClass::E),
            "F" | "E#" | "ES" => Some(PitchClass::F),
            "F#" | "FS" | "GB" | "GF" => Some(PitchClass::Fs),
            "G" => Some(PitchClass::G),
            "G#" | "GS" | "AB" | "AF" => Some(PitchClass::Gs),
            "A" => Some(PitchClass::A),
            "A#" | "AS" | "BB" | "BF" => Some(PitchClass::As),
            "B" | "CB" | "CF" => Some(PitchClass::B),
            _ => None,
        }
    }

    /// Place this pitch class in an octave
    pub fn at(self, octave: impl Into<Octave>) -> Pitch {
        pitch_with_octave(self.value(), octave)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        };
        write!(f, "{}", name)
    }
}

/// What a note sounds: silence, one pitch, or a chord.
///
/// Chords may contain rests; they are carried through transposition
/// untouched and never emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PitchSource {
    Rest,
    Single(Pitch),
    Chord(Vec<Option<Pitch>>),
}

impl PitchSource {
    /// Flatten into the ordered pitch list stored on a note
    pub fn into_pitches(self) -> Vec<Option<Pitch>> {
        match self {
            PitchSource::Rest => vec![None],
            PitchSource::Single(p) => vec![Some(p)],
            PitchSource::Chord(pitches) => pitches,
        }
    }
}

impl From<Pitch> for PitchSource {
    fn from(pitch: Pitch) -> Self {
        PitchSource::Single(pitch)
    }
}

impl From<Option<Pitch>> for PitchSource {
    fn from(pitch: Option<Pitch>) -> Self {
        match pitch {
            Some(p) => PitchSource::Single(p),
            None => PitchSource::Rest,
        }
    }
}

impl From<Vec<Pitch>> for PitchSource {
    fn from(pitches: Vec<Pitch>) -> Self {
        PitchSource::Chord(pitches.into_iter().map(Some).collect())
    }
}

impl From<Vec<Option<Pitch>>> for PitchSource {
    fn from(pitches: Vec<Option<Pitch>>) -> Self {
        PitchSource::Chord(pitches)
    }
}

impl From<&[Pitch]> for PitchSource {
    fn from(pitches: &[Pitch]) -> Self {
        PitchSource::Chord(pitches.iter().copied().map(Some).collect())
    }
}

impl<const N: usize> From<[Pitch; N]> for PitchSource {
    fn from(pitches: [Pitch; N]) -> Self {
        PitchSource::Chord(pitches.into_iter().map(Some).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enharmonic_aliases() {
        assert_eq!(BS, C);
        assert_eq!(CS, DF);
        assert_eq!(ES, F);
        assert_eq!(FF, E);
        assert_eq!(CF, B);
        assert_eq!(AS, BF);
    }

    #[test]
    fn test_pitch_with_octave() {
        assert_eq!(pitch_with_octave(C, Octave::Middle), 48);
        assert_eq!(pitch_with_octave(C, 6), 72);
        assert_eq!(pitch_with_octave(G, 3), 43);
        // No bounds checking in either direction
        assert_eq!(pitch_with_octave(C, -1), -12);
        assert_eq!(pitch_with_octave(B, 11), 143);
    }

    #[test]
    fn test_pitch_class_parse() {
        assert_eq!(PitchClass::parse("C"), Some(PitchClass::C));
        assert_eq!(PitchClass::parse("c#"), Some(PitchClass::Cs));
        assert_eq!(PitchClass::parse("Db"), Some(PitchClass::Cs));
        assert_eq!(PitchClass::parse(" Fs "), Some(PitchClass::Fs));
        assert_eq!(PitchClass::parse("E#"), Some(PitchClass::F));
        assert_eq!(PitchClass::parse("H"), None);
    }

    #[test]
    fn test_pitch_class_value_and_display() {
        for (i, pc) in PitchClass::ALL.iter().enumerate() {
            assert_eq!(pc.value(), i as Pitch);
            assert_eq!(PitchClass::parse(&pc.to_string()), Some(*pc));
        }
        assert_eq!(PitchClass::A.at(Octave::Middle), 57);
    }

    #[test]
    fn test_pitch_source_flattening() {
        assert_eq!(PitchSource::from(R).into_pitches(), vec![None]);
        assert_eq!(PitchSource::from(E).into_pitches(), vec![Some(4)]);
        assert_eq!(
            PitchSource::from([C, E, G]).into_pitches(),
            vec![Some(0), Some(4), Some(7)]
        );
        assert_eq!(
            PitchSource::from(vec![Some(C), R]).into_pitches(),
            vec![Some(0), None]
        );
    }
}
