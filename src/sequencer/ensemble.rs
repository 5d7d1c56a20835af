// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Playback engine: every part on its own thread, joined at the end.

use std::thread;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::error::{PartFailure, PlaybackError, ScoreError};

use super::Instrument;

/// The parts of a piece, played together.
#[derive(Default)]
pub struct Ensemble {
    instruments: Vec<Instrument>,
}

impl Ensemble {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part
    pub fn push(&mut self, instrument: Instrument) {
        self.instruments.push(instrument);
    }

    pub fn with(mut self, instrument: Instrument) -> Self {
        self.push(instrument);
        self
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get(&self, name: &str) -> Option<&Instrument> {
        self.instruments.iter().find(|i| i.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Instrument> {
        self.instruments.iter_mut().find(|i| i.name() == name)
    }

    /// Like `get_mut`, for scores that cannot go on without the part
    pub fn part(&mut self, name: &str) -> Result<&mut Instrument, ScoreError> {
        self.get_mut(name)
            .ok_or_else(|| ScoreError::MissingPart(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Expected wall-clock time: the longest part
    pub fn duration(&self) -> Duration {
        self.instruments
            .iter()
            .map(Instrument::duration)
            .max()
            .unwrap_or_default()
    }

    /// Empty every part
    pub fn clear(&mut self) {
        for instrument in &mut self.instruments {
            instrument.clear();
        }
    }

    /// Play all parts at once and wait for the last one.
    pub fn play(&self) -> Result<(), PlaybackError> {
        play_all(&self.instruments)
    }
}

/// Play each instrument on its own thread and wait for all of them.
///
/// The instruments stay borrowed until every thread has joined, so parts
/// cannot be edited mid-playback. A part that fails or panics does not stop
/// the others; all failures are reported together once everyone is done.
pub fn play_all(instruments: &[Instrument]) -> Result<(), PlaybackError> {
    let started = Instant::now();
    info!(parts = instruments.len(), "playback started");

    let failures: Vec<PartFailure> = thread::scope(|scope| {
        let handles: Vec<_> = instruments
            .iter()
            .map(|instrument| (instrument.name(), scope.spawn(move || instrument.play())))
            .collect();

        handles
            .into_iter()
            .filter_map(|(name, handle)| {
                let error = match handle.join() {
                    Ok(Ok(())) => return None,
                    Ok(Err(e)) => Some(e),
                    Err(_) => None,
                };
                let failure = PartFailure {
                    part: name.to_string(),
                    error,
                };
                error!(%failure, "part failed");
                Some(failure)
            })
            .collect()
    });

    info!(elapsed = ?started.elapsed(), failed = failures.len(), "playback finished");

    if failures.is_empty() {
        Ok(())
    } else {
        Err(PlaybackError::PartsFailed(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SinkError;
    use crate::midi::{shared, LogSink, NoteSink};
    use crate::music::{Pitch, C, R};
    use crate::sequencer::Note;

    struct BrokenSink;

    impl NoteSink for BrokenSink {
        fn note_on(&mut self, _pitch: Pitch, _velocity: u8) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("disconnected".to_string()))
        }

        fn note_off(&mut self, _pitch: Pitch, _velocity: u8) -> Result<(), SinkError> {
            Err(SinkError::Unavailable("disconnected".to_string()))
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn part(name: &str, length: Duration) -> Instrument {
        let mut inst = Instrument::new(name, 0, shared(LogSink::new(name)));
        inst.add(vec![Note::new(length, R)]).unwrap();
        inst
    }

    #[test]
    fn test_parts_play_concurrently() {
        let ensemble = Ensemble::new()
            .with(part("short", ms(150)))
            .with(part("long", ms(300)));
        assert_eq!(ensemble.duration(), ms(300));

        let start = Instant::now();
        ensemble.play().unwrap();
        let elapsed = start.elapsed();

        assert!(elapsed >= ms(300));
        assert!(elapsed < ms(430), "parts ran back to back: {:?}", elapsed);
    }

    #[test]
    fn test_failed_part_is_reported_and_others_finish() {
        let mut broken = Instrument::new("broken", 0, shared(BrokenSink));
        broken.add(vec![Note::new(ms(1), C)]).unwrap();

        let ensemble = Ensemble::new().with(broken).with(part("fine", ms(80)));

        let start = Instant::now();
        let err = ensemble.play().unwrap_err();
        assert!(start.elapsed() >= ms(80));

        match err {
            PlaybackError::PartsFailed(failures) => {
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].part, "broken");
                assert_eq!(
                    failures[0].error,
                    Some(PlaybackError::Sink(SinkError::Unavailable(
                        "disconnected".to_string()
                    )))
                );
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_ensemble_plays() {
        assert!(Ensemble::new().play().is_ok());
        assert_eq!(Ensemble::new().duration(), Duration::ZERO);
    }

    #[test]
    fn test_part_lookup() {
        let mut ensemble = Ensemble::new().with(part("alto", ms(1)));
        assert!(ensemble.get("alto").is_some());
        assert!(ensemble.part("alto").is_ok());
        assert_eq!(
            ensemble.part("bass").err(),
            Some(ScoreError::MissingPart("bass".to_string()))
        );

        ensemble.clear();
        assert!(ensemble.get("alto").unwrap().sequence().is_empty());
    }
}
