// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Instrument: one part with its own home key, sink and timeline.

use std::time::Duration;

use tracing::{debug, info};

use crate::error::{PlaybackError, ScoreError};
use crate::midi::{SharedSink, DEFAULT_VELOCITY};
use crate::music::Pitch;

use super::{Note, Sequence};

/// One entry passed to `Instrument::add`
#[derive(Debug, Clone, PartialEq)]
pub enum NoteInput {
    Note(Note),
    /// A whole passage handed over as one list
    Group(Vec<Note>),
}

impl From<Note> for NoteInput {
    fn from(note: Note) -> Self {
        NoteInput::Note(note)
    }
}

impl From<Vec<Note>> for NoteInput {
    fn from(notes: Vec<Note>) -> Self {
        NoteInput::Group(notes)
    }
}

/// Resolve `add` input into a flat note list.
///
/// Either every entry is a single note, or the input is exactly one group.
/// Anything else is ambiguous and rejected.
fn flatten_input(entries: Vec<NoteInput>) -> Result<Vec<Note>, ScoreError> {
    let mut entries = entries.into_iter();

    match entries.next() {
        None => Ok(Vec::new()),
        Some(NoteInput::Group(group)) => {
            let extra = entries.count();
            if extra > 0 {
                return Err(ScoreError::MalformedChordInput(format!(
                    "a group must be the only entry, found {} more",
                    extra
                )));
            }
            Ok(group)
        }
        Some(NoteInput::Note(first)) => {
            let mut notes = vec![first];
            for (i, entry) in entries.enumerate() {
                match entry {
                    NoteInput::Note(note) => notes.push(note),
                    NoteInput::Group(_) => {
                        return Err(ScoreError::MalformedChordInput(format!(
                            "group at position {} mixed with single notes",
                            i + 1
                        )))
                    }
                }
            }
            Ok(notes)
        }
    }
}

/// A part: home key, output sink and the notes it will play.
pub struct Instrument {
    name: String,
    key: Pitch,
    velocity: u8,
    sink: SharedSink,
    sequence: Sequence,
}

impl Instrument {
    /// Create an instrument with an empty part
    pub fn new(name: impl Into<String>, key: Pitch, sink: SharedSink) -> Self {
        Self {
            name: name.into(),
            key,
            velocity: DEFAULT_VELOCITY,
            sink,
            sequence: Sequence::new(),
        }
    }

    /// Set the velocity given to notes added from now on (0 to
    /// `DEFAULT_VELOCITY`, higher values are capped)
    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity.min(DEFAULT_VELOCITY);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Home transposition applied to every added note
    pub fn key(&self) -> Pitch {
        self.key
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    /// Total playing time of the part
    pub fn duration(&self) -> Duration {
        self.sequence.total_duration()
    }

    /// Append notes to the part.
    ///
    /// Each note is copied, moved into the home key and bound to this
    /// instrument's sink; the templates passed in are never touched.
    /// On error nothing is appended.
    pub fn add<I>(&mut self, notes: I) -> Result<(), ScoreError>
    where
        I: IntoIterator,
        I::Item: Into<NoteInput>,
    {
        let voiced = self.voice(notes)?;
        self.commit(voiced);
        Ok(())
    }

    /// Like `add`, then transpose the new notes by the offsets `keys`
    /// returns (repeated to cover every note). `keys` runs once, at call
    /// time, and only affects the notes added by this call.
    pub fn add_keyed<I, K>(&mut self, notes: I, keys: K) -> Result<(), ScoreError>
    where
        I: IntoIterator,
        I::Item: Into<NoteInput>,
        K: FnOnce() -> Vec<Pitch>,
    {
        let mut voiced = self.voice(notes)?;
        voiced.apply_key(&keys());
        self.commit(voiced);
        Ok(())
    }

    /// Remove every note from the part
    pub fn clear(&mut self) {
        self.sequence.clear();
    }

    /// Play the whole part on the calling thread
    pub fn play(&self) -> Result<(), PlaybackError> {
        info!(part = %self.name, notes = self.sequence.len(), "part started");
        self.sequence.play()?;
        info!(part = %self.name, "part finished");
        Ok(())
    }

    fn voice<I>(&self, notes: I) -> Result<Sequence, ScoreError>
    where
        I: IntoIterator,
        I::Item: Into<NoteInput>,
    {
        let entries: Vec<NoteInput> = notes.into_iter().map(Into::into).collect();
        let notes = flatten_input(entries)?;

        Ok(notes
            .iter()
            .map(|template| {
                let mut note = template.transpose(self.key);
                note.set_velocity(self.velocity);
                note.set_sink(self.sink.clone());
                note
            })
            .collect())
    }

    fn commit(&mut self, voiced: Sequence) {
        debug!(part = %self.name, added = voiced.len(), total = self.sequence.len() + voiced.len(), "notes added");
        self.sequence.extend(voiced);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::midi::{shared, NoteSink};
    use crate::music::{C, E, G, R};
    use std::sync::{Arc, Mutex};

    struct CountingSink(Arc<Mutex<Vec<(bool, Pitch)>>>);

    impl NoteSink for CountingSink {
        fn note_on(&mut self, pitch: Pitch, _velocity: u8) -> Result<(), SinkError> {
            self.0.lock().unwrap().push((true, pitch));
            Ok(())
        }

        fn note_off(&mut self, pitch: Pitch, _velocity: u8) -> Result<(), SinkError> {
            self.0.lock().unwrap().push((false, pitch));
            Ok(())
        }
    }

    fn instrument(key: Pitch) -> (Instrument, Arc<Mutex<Vec<(bool, Pitch)>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = shared(CountingSink(Arc::clone(&events)));
        (Instrument::new("test", key, sink), events)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_add_transposes_and_binds() {
        let (mut inst, _) = instrument(60);
        let template = Note::new(ms(1), E);

        inst.add(vec![template.clone(), Note::new(ms(1), R)]).unwrap();

        assert_eq!(inst.sequence().len(), 2);
        assert_eq!(inst.sequence()[0].pitches(), &[Some(64)]);
        assert!(inst.sequence()[0].has_sink());
        assert!(inst.sequence()[1].is_rest());
        // Template untouched
        assert_eq!(template.pitches(), &[Some(E)]);
        assert!(!template.has_sink());
    }

    #[test]
    fn test_add_single_group() {
        let (mut inst, _) = instrument(0);
        let passage = vec![Note::new(ms(1), C), Note::new(ms(1), G)];

        inst.add([NoteInput::Group(passage)]).unwrap();
        assert_eq!(inst.sequence().len(), 2);
    }

    #[test]
    fn test_add_rejects_mixed_nesting() {
        let (mut inst, _) = instrument(0);
        inst.add(vec![Note::new(ms(1), C)]).unwrap();

        let mixed = vec![
            NoteInput::Note(Note::new(ms(1), C)),
            NoteInput::Group(vec![Note::new(ms(1), E)]),
        ];
        assert!(matches!(
            inst.add(mixed),
            Err(ScoreError::MalformedChordInput(_))
        ));

        let two_groups = vec![
            NoteInput::Group(vec![Note::new(ms(1), C)]),
            NoteInput::Group(vec![Note::new(ms(1), E)]),
        ];
        assert!(inst.add(two_groups).is_err());

        // Nothing from the failed calls was appended
        assert_eq!(inst.sequence().len(), 1);
    }

    #[test]
    fn test_add_keyed_only_touches_new_notes() {
        let (mut inst, _) = instrument(12);
        inst.add(vec![Note::new(ms(1), C)]).unwrap();

        inst.add_keyed(
            vec![Note::new(ms(1), C), Note::new(ms(1), E), Note::new(ms(1), G)],
            || vec![5],
        )
        .unwrap();

        let firsts: Vec<_> = inst.sequence().iter().map(|n| n.pitches()[0]).collect();
        assert_eq!(firsts, vec![Some(12), Some(17), Some(21), Some(24)]);
    }

    #[test]
    fn test_add_keyed_progression() {
        let (mut inst, _) = instrument(0);
        let motif = vec![Note::new(ms(1), C); 4];

        inst.add_keyed(motif, || vec![0, 5, 7, 5]).unwrap();

        let firsts: Vec<_> = inst.sequence().iter().map(|n| n.pitches()[0]).collect();
        assert_eq!(firsts, vec![Some(0), Some(5), Some(7), Some(5)]);
    }

    #[test]
    fn test_velocity_applied_on_add() {
        let (inst, _) = instrument(0);
        let mut inst = inst.with_velocity(80);
        inst.add(vec![Note::new(ms(1), C)]).unwrap();
        assert_eq!(inst.sequence()[0].velocity(), 80);
    }

    #[test]
    fn test_velocity_capped_at_default() {
        let (inst, _) = instrument(0);
        let mut inst = inst.with_velocity(120);
        assert_eq!(inst.velocity(), DEFAULT_VELOCITY);

        inst.add(vec![Note::new(ms(1), C)]).unwrap();
        assert_eq!(inst.sequence()[0].velocity(), DEFAULT_VELOCITY);
    }

    #[test]
    fn test_clear_and_duration() {
        let (mut inst, _) = instrument(0);
        inst.add(vec![Note::new(ms(10), C), Note::new(ms(15), R)]).unwrap();
        assert_eq!(inst.duration(), ms(25));

        inst.clear();
        assert!(inst.sequence().is_empty());
        assert_eq!(inst.duration(), Duration::ZERO);
    }

    #[test]
    fn test_play_uses_instrument_sink() {
        let (mut inst, events) = instrument(48);
        inst.add(vec![Note::new(ms(5), C), Note::new(ms(5), R)]).unwrap();

        inst.play().unwrap();
        assert_eq!(*events.lock().unwrap(), vec![(true, 48), (false, 48)]);
    }
}
