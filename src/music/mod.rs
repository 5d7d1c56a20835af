// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch model: pitch-class constants, octave arithmetic and the
//! `PitchSource` accepted by note constructors.

pub mod pitch;

pub use pitch::*;
