// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Timing module.
//!
//! Converts a tempo into the table of named note durations used when
//! building notes.

pub mod meter;

pub use meter::{DurationName, Meter, DEFAULT_BPM};
