// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cross-platform MIDI output through midir (ALSA, WinMM, Core MIDI).

use anyhow::{anyhow, Result};
use midir::MidiOutputConnection;

use super::MidiOutput;

const CLIENT_NAME: &str = "Ensemble";

/// midir connection to one output port.
pub struct MidirOutput {
    connection: MidiOutputConnection,
}

impl MidirOutput {
    /// Connect to the output port at `port_index`.
    pub fn new(port_index: usize) -> Result<Self> {
        let midi_out = midir::MidiOutput::new(CLIENT_NAME)
            .map_err(|e| anyhow!("Failed to create MIDI client: {}", e))?;

        let ports = midi_out.ports();
        let port = ports.get(port_index).ok_or_else(|| {
            anyhow!(
                "MIDI destination {} not found (only {} available)",
                port_index,
                ports.len()
            )
        })?;

        let connection = midi_out
            .connect(port, "ensemble-out")
            .map_err(|e| anyhow!("Failed to connect to MIDI destination {}: {}", port_index, e))?;

        Ok(Self { connection })
    }

    /// Connect to the first port whose name contains `name` (case-insensitive).
    pub fn new_by_name(name: &str) -> Result<Self> {
        let index = list_destinations()
            .into_iter()
            .find(|(_, n)| n.to_lowercase().contains(&name.to_lowercase()))
            .map(|(i, _)| i)
            .ok_or_else(|| anyhow!("No MIDI destination matching '{}' found", name))?;

        Self::new(index)
    }
}

impl MidiOutput for MidirOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        self.connection
            .send(message)
            .map_err(|e| anyhow!("Failed to send MIDI message: {}", e))
    }
}

/// List all midir output ports as (index, name) pairs.
pub fn list_destinations() -> Vec<(usize, String)> {
    let Ok(midi_out) = midir::MidiOutput::new(CLIENT_NAME) else {
        return Vec::new();
    };

    midi_out
        .ports()
        .iter()
        .enumerate()
        .map(|(i, port)| {
            let name = midi_out
                .port_name(port)
                .unwrap_or_else(|_| format!("Unknown {}", i));
            (i, name)
        })
        .collect()
}
