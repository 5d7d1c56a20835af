// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Error types for score construction and playback.
//!
//! Construction errors (`ScoreError`) abort the call that raised them and
//! never leave a half-built sequence behind. Playback errors (`PlaybackError`)
//! carry sink failures up to the ensemble join so a failed part is reported
//! instead of silently cut short.

use std::fmt;

use thiserror::Error;

/// Errors raised while building notes, sequences and scores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// The duration name is not in the meter's table.
    #[error("unknown duration: '{0}'")]
    UnknownDuration(String),

    /// `Instrument::add` input mixes single notes and chord groups.
    #[error("malformed chord input: {0}")]
    MalformedChordInput(String),

    /// Tempo must be finite and greater than zero.
    #[error("invalid tempo: {0} BPM")]
    InvalidTempo(f64),

    /// A score asked for a part the ensemble does not have.
    #[error("score requires part '{0}' which is not in the ensemble")]
    MissingPart(String),
}

/// Errors surfaced by a `NoteSink`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// The output could not deliver the event (device gone, port closed, ...).
    #[error("sink unavailable: {0}")]
    Unavailable(String),

    /// The pitch cannot be encoded by this sink.
    #[error("pitch {0} is outside the MIDI range 0-127")]
    PitchOutOfRange(i32),
}

/// A part that did not finish cleanly.
#[derive(Debug, Clone, PartialEq)]
pub struct PartFailure {
    /// Instrument name
    pub part: String,
    /// What went wrong; `None` if the part's thread panicked
    pub error: Option<PlaybackError>,
}

impl fmt::Display for PartFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            Some(e) => write!(f, "{}: {}", self.part, e),
            None => write!(f, "{}: playback thread panicked", self.part),
        }
    }
}

/// Errors raised while playing notes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error(transparent)]
    Sink(#[from] SinkError),

    /// A sounding note was played with no sink bound.
    #[error("note has pitches but no sink is bound")]
    Unbound,

    /// One or more parts failed; the rest played to completion.
    #[error("{} part(s) failed: {}", .0.len(), join_failures(.0))]
    PartsFailed(Vec<PartFailure>),
}

fn join_failures(failures: &[PartFailure]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_error_messages() {
        let err = ScoreError::UnknownDuration("zz".to_string());
        assert_eq!(err.to_string(), "unknown duration: 'zz'");

        let err = ScoreError::InvalidTempo(0.0);
        assert_eq!(err.to_string(), "invalid tempo: 0 BPM");
    }

    #[test]
    fn test_sink_error_converts_to_playback_error() {
        let err: PlaybackError = SinkError::PitchOutOfRange(130).into();
        assert_eq!(err, PlaybackError::Sink(SinkError::PitchOutOfRange(130)));
        assert_eq!(err.to_string(), "pitch 130 is outside the MIDI range 0-127");
    }

    #[test]
    fn test_parts_failed_lists_every_part() {
        let err = PlaybackError::PartsFailed(vec![
            PartFailure {
                part: "alto".to_string(),
                error: Some(PlaybackError::Unbound),
            },
            PartFailure {
                part: "bass".to_string(),
                error: None,
            },
        ]);
        let msg = err.to_string();
        assert!(msg.starts_with("2 part(s) failed"));
        assert!(msg.contains("alto: note has pitches but no sink is bound"));
        assert!(msg.contains("bass: playback thread panicked"));
    }
}
