// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! A single timed slot: one pitch, a chord, or a rest.

use std::fmt;
use std::sync::MutexGuard;
use std::thread;
use std::time::Duration;

use tracing::{trace, warn};

use crate::error::{PlaybackError, SinkError};
use crate::midi::{NoteSink, SharedSink, DEFAULT_VELOCITY};
use crate::music::{Pitch, PitchSource};

/// Pitches sounding together for one duration.
///
/// Notes are values: cloning copies the pitch list, and `transpose` returns
/// a new note. The bound sink is a shared handle and is not compared by
/// `PartialEq`.
#[derive(Clone)]
pub struct Note {
    duration: Duration,
    pitches: Vec<Option<Pitch>>,
    velocity: u8,
    sink: Option<SharedSink>,
}

impl Note {
    /// Create an unbound note
    pub fn new(duration: Duration, pitches: impl Into<PitchSource>) -> Self {
        Self {
            duration,
            pitches: pitches.into().into_pitches(),
            velocity: DEFAULT_VELOCITY,
            sink: None,
        }
    }

    /// Create an unbound rest
    pub fn rest(duration: Duration) -> Self {
        Self::new(duration, PitchSource::Rest)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// All slots in order, rests included
    pub fn pitches(&self) -> &[Option<Pitch>] {
        &self.pitches
    }

    /// Only the pitches that make sound
    pub fn sounding(&self) -> impl Iterator<Item = Pitch> + '_ {
        self.pitches.iter().flatten().copied()
    }

    /// True if nothing in this note makes sound
    pub fn is_rest(&self) -> bool {
        self.pitches.iter().all(Option::is_none)
    }

    pub fn is_chord(&self) -> bool {
        self.sounding().count() > 1
    }

    pub fn velocity(&self) -> u8 {
        self.velocity
    }

    /// Set the velocity used for both note on and note off, capped at
    /// `DEFAULT_VELOCITY`
    pub fn set_velocity(&mut self, velocity: u8) {
        self.velocity = velocity.min(DEFAULT_VELOCITY);
    }

    /// Copy of this note with every sounding pitch shifted by `offset`
    pub fn transpose(&self, offset: Pitch) -> Note {
        let mut note = self.clone();
        for pitch in note.pitches.iter_mut().flatten() {
            *pitch += offset;
        }
        note
    }

    /// Bind (or rebind) the sink used by `play`
    pub fn set_sink(&mut self, sink: SharedSink) {
        self.sink = Some(sink);
    }

    pub fn with_sink(mut self, sink: SharedSink) -> Self {
        self.set_sink(sink);
        self
    }

    pub fn has_sink(&self) -> bool {
        self.sink.is_some()
    }

    /// Sound the note: note on for each pitch, wait `duration`, note off.
    ///
    /// Blocks the calling thread for the full duration. Rests wait without
    /// touching the sink. If the sink fails part way, every pitch that was
    /// turned on is still turned off before the first error is returned.
    pub fn play(&self) -> Result<(), PlaybackError> {
        if self.is_rest() {
            trace!(duration = ?self.duration, "rest");
            thread::sleep(self.duration);
            return Ok(());
        }

        let sink = self.sink.as_ref().ok_or(PlaybackError::Unbound)?;

        let sounding = match self.start(sink) {
            Ok(sounding) => sounding,
            Err((sounding, err)) => {
                warn!(error = %err, "note on failed; releasing {} pitch(es)", sounding.len());
                // Report the note-on failure, not a follow-up one
                let _ = self.stop(sink, &sounding);
                return Err(err.into());
            }
        };

        thread::sleep(self.duration);

        self.stop(sink, &sounding).map_err(PlaybackError::from)
    }

    /// Send note on for every sounding pitch; returns the pitches that are on.
    fn start(&self, sink: &SharedSink) -> Result<Vec<Pitch>, (Vec<Pitch>, SinkError)> {
        let mut sounding = Vec::with_capacity(self.pitches.len());
        let mut guard = match lock(sink) {
            Ok(guard) => guard,
            Err(err) => return Err((sounding, err)),
        };

        for pitch in self.sounding() {
            trace!(pitch, velocity = self.velocity, "note on");
            if let Err(err) = guard.note_on(pitch, self.velocity) {
                return Err((sounding, err));
            }
            sounding.push(pitch);
        }
        Ok(sounding)
    }

    /// Send note off for every pitch in `sounding`, attempting all of them.
    fn stop(&self, sink: &SharedSink, sounding: &[Pitch]) -> Result<(), SinkError> {
        let mut guard = lock(sink)?;
        let mut first_error = None;

        for &pitch in sounding {
            trace!(pitch, velocity = self.velocity, "note off");
            if let Err(err) = guard.note_off(pitch, self.velocity) {
                warn!(pitch, error = %err, "note off failed");
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn lock(sink: &SharedSink) -> Result<MutexGuard<'_, dyn NoteSink + 'static>, SinkError> {
    sink.lock()
        .map_err(|_| SinkError::Unavailable("sink lock poisoned".to_string()))
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.duration == other.duration
            && self.pitches == other.pitches
            && self.velocity == other.velocity
    }
}

impl fmt::Debug for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Note")
            .field("duration", &self.duration)
            .field("pitches", &self.pitches)
            .field("velocity", &self.velocity)
            .field("bound", &self.sink.is_some())
            .finish()
    }
}
