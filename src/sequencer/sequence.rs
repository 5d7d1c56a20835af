// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! One part's timeline: notes in the order they are played.

use std::ops::Index;
use std::slice;
use std::time::Duration;

use tracing::debug;

use crate::error::PlaybackError;
use crate::music::Pitch;

use super::Note;

/// Ordered list of notes. Play order is append order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    notes: Vec<Note>,
}

impl Sequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Append notes, keeping their order
    pub fn append(&mut self, notes: impl IntoIterator<Item = Note>) {
        self.notes.extend(notes);
    }

    /// Append every note of another sequence
    pub fn extend(&mut self, other: Sequence) {
        self.notes.extend(other.notes);
    }

    /// Transpose each note by the offset at the same position.
    ///
    /// The offsets are repeated (doubled until long enough) when there are
    /// fewer offsets than notes, so `[2]` shifts every note by 2 and
    /// `[0, 5]` alternates. The caller's slice is never modified. An empty
    /// slice leaves the sequence as it is.
    pub fn apply_key(&mut self, offsets: &[Pitch]) {
        if offsets.is_empty() {
            debug!("empty key list; sequence left unchanged");
            return;
        }

        let mut keys = offsets.to_vec();
        while keys.len() < self.notes.len() {
            keys.extend_from_within(..);
        }

        for (note, &key) in self.notes.iter_mut().zip(keys.iter()) {
            *note = note.transpose(key);
        }
    }

    /// Remove every note
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Play every note in order on the calling thread.
    ///
    /// Stops at the first failing note and returns its error.
    pub fn play(&self) -> Result<(), PlaybackError> {
        for note in &self.notes {
            note.play()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Note> {
        self.notes.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Note> {
        self.notes.iter()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Sum of all note durations, rests included
    pub fn total_duration(&self) -> Duration {
        self.notes.iter().map(Note::duration).sum()
    }
}

impl Index<usize> for Sequence {
    type Output = Note;

    fn index(&self, index: usize) -> &Note {
        &self.notes[index]
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Note;
    type IntoIter = slice::Iter<'a, Note>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter()
    }
}

impl FromIterator<Note> for Sequence {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self {
            notes: iter.into_iter().collect(),
        }
    }
}
