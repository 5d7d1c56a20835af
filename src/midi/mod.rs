// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Output side of playback.
//!
//! Notes talk to a `NoteSink`, which only knows "note on" and "note off".
//! Turning those into MIDI bytes is the job of `MidiSink`, which wraps any
//! byte-level `MidiOutput` backend (Core MIDI on macOS, midir behind the
//! `midir` feature). `LogSink` stands in when there is no device.

#[cfg(target_os = "macos")]
pub mod coremidi_backend;
#[cfg(feature = "midir")]
pub mod midir_backend;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{info, trace};

use crate::error::SinkError;
use crate::music::Pitch;

#[cfg(target_os = "macos")]
pub use coremidi_backend::CoreMidiOutput;
#[cfg(feature = "midir")]
pub use midir_backend::MidirOutput;

/// Default (and maximum) note velocity
pub const DEFAULT_VELOCITY: u8 = 100;

/// Receiver of note events.
///
/// Errors must be returned, not swallowed: a lost note-off leaves a stuck
/// note on the receiving device.
pub trait NoteSink: Send {
    fn note_on(&mut self, pitch: Pitch, velocity: u8) -> Result<(), SinkError>;
    fn note_off(&mut self, pitch: Pitch, velocity: u8) -> Result<(), SinkError>;
}

/// Sink handle shared by the notes of one instrument
pub type SharedSink = Arc<Mutex<dyn NoteSink>>;

/// Wrap a sink so it can be bound to notes
pub fn shared<S: NoteSink + 'static>(sink: S) -> SharedSink {
    Arc::new(Mutex::new(sink))
}

/// Trait for MIDI output implementations.
///
/// This trait abstracts over different MIDI backends, providing a unified
/// interface for sending raw MIDI messages.
pub trait MidiOutput: Send {
    /// Send a MIDI message immediately.
    ///
    /// # Arguments
    /// * `message` - Raw MIDI bytes (e.g., `[0x90, 60, 100]` for Note On)
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

impl<O: MidiOutput + ?Sized> MidiOutput for Box<O> {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        (**self).send(message)
    }
}

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
}

/// `NoteSink` that encodes events as MIDI channel voice messages
pub struct MidiSink<O: MidiOutput> {
    output: O,
    channel: u8,
}

impl<O: MidiOutput> MidiSink<O> {
    /// Create a sink on `channel` (0-15, higher bits are masked off)
    pub fn new(output: O, channel: u8) -> Self {
        Self {
            output,
            channel: channel & 0x0F,
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Access the wrapped output
    pub fn output(&self) -> &O {
        &self.output
    }

    fn emit(&mut self, status: u8, pitch: Pitch, velocity: u8) -> Result<(), SinkError> {
        let note = u8::try_from(pitch)
            .ok()
            .filter(|n| *n <= 0x7F)
            .ok_or(SinkError::PitchOutOfRange(pitch))?;

        let message = [status | self.channel, note, velocity.min(0x7F)];
        trace!(?message, "midi out");
        self.output
            .send(&message)
            .map_err(|e| SinkError::Unavailable(e.to_string()))
    }
}

impl<O: MidiOutput> NoteSink for MidiSink<O> {
    fn note_on(&mut self, pitch: Pitch, velocity: u8) -> Result<(), SinkError> {
        self.emit(messages::NOTE_ON, pitch, velocity)
    }

    fn note_off(&mut self, pitch: Pitch, velocity: u8) -> Result<(), SinkError> {
        self.emit(messages::NOTE_OFF, pitch, velocity)
    }
}

/// Sink that only writes events to the log (dry runs, no device)
#[derive(Debug, Clone)]
pub struct LogSink {
    part: String,
}

impl LogSink {
    pub fn new(part: impl Into<String>) -> Self {
        Self { part: part.into() }
    }
}

impl NoteSink for LogSink {
    fn note_on(&mut self, pitch: Pitch, velocity: u8) -> Result<(), SinkError> {
        info!(part = %self.part, pitch, velocity, "note on");
        Ok(())
    }

    fn note_off(&mut self, pitch: Pitch, velocity: u8) -> Result<(), SinkError> {
        info!(part = %self.part, pitch, velocity, "note off");
        Ok(())
    }
}

/// Open a MIDI destination with the best backend compiled in.
///
/// `name` wins over `index` when given and is matched as a
/// case-insensitive substring.
#[cfg(target_os = "macos")]
pub fn open_output(index: usize, name: Option<&str>) -> Result<Box<dyn MidiOutput>> {
    let output = match name {
        Some(name) => CoreMidiOutput::new_by_name(name)?,
        None => CoreMidiOutput::new(index)?,
    };
    Ok(Box::new(output))
}

#[cfg(all(feature = "midir", not(target_os = "macos")))]
pub fn open_output(index: usize, name: Option<&str>) -> Result<Box<dyn MidiOutput>> {
    let output = match name {
        Some(name) => MidirOutput::new_by_name(name)?,
        None => MidirOutput::new(index)?,
    };
    Ok(Box::new(output))
}

#[cfg(not(any(target_os = "macos", feature = "midir")))]
pub fn open_output(index: usize, name: Option<&str>) -> Result<Box<dyn MidiOutput>> {
    Err(anyhow::anyhow!(
        "No MIDI backend available to open destination {} ({:?}); rebuild with --features midir or use --dry-run",
        index,
        name
    ))
}

/// List all available MIDI destinations as (index, name) pairs
pub fn list_destinations() -> Vec<(usize, String)> {
    #[cfg(target_os = "macos")]
    let destinations = coremidi_backend::list_destinations();
    #[cfg(all(feature = "midir", not(target_os = "macos")))]
    let destinations = midir_backend::list_destinations();
    #[cfg(not(any(target_os = "macos", feature = "midir")))]
    let destinations = Vec::new();

    destinations
}

/// Print all available MIDI destinations to stdout.
pub fn print_destinations() {
    let destinations = list_destinations();
    if destinations.is_empty() {
        println!("No MIDI destinations found.");
    } else {
        println!("Available MIDI destinations:");
        for (i, name) in destinations {
            println!("  {}: {}", i, name);
        }
    }
}
