// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! ENSEMBLE - describe notes, rests and chords in Rust and play several
//! parts at once as timed note-on/note-off events.
//!
//! ```no_run
//! use ensemble::midi::{shared, LogSink};
//! use ensemble::music::{C, E, G, R};
//! use ensemble::sequencer::{Ensemble, Instrument};
//! use ensemble::timing::Meter;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let m = Meter::new(140.0)?;
//!
//! let mut lead = Instrument::new("lead", 60, shared(LogSink::new("lead")));
//! lead.add(vec![m.q(C), m.q(E), m.h(G)])?;
//!
//! let mut pad = Instrument::new("pad", 48, shared(LogSink::new("pad")));
//! pad.add(vec![m.h([C, E, G]), m.h(R)])?;
//!
//! Ensemble::new().with(lead).with(pad).play()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod midi;
pub mod music;
pub mod scores;
pub mod sequencer;
pub mod timing;

pub use error::{PartFailure, PlaybackError, ScoreError, SinkError};
