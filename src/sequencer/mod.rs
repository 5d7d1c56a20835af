// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Sequencer core for building parts and playing them back.
//!
//! - Notes: timed pitch groups bound to a sink
//! - Sequences: one part's ordered timeline, with key application
//! - Instruments: home key, sink and sequence for one part
//! - Ensemble: one thread per instrument, joined at the end

pub mod ensemble;
pub mod instrument;
pub mod note;
pub mod sequence;

pub use ensemble::{play_all, Ensemble};
pub use instrument::{Instrument, NoteInput};
pub use note::Note;
pub use sequence::Sequence;
