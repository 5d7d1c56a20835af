// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Core MIDI backend for macOS.

use anyhow::{anyhow, Result};
use coremidi::{Client, Destination, Destinations, OutputPort, PacketBuffer};

use super::MidiOutput;

/// Core MIDI output connected to one destination.
pub struct CoreMidiOutput {
    _client: Client,
    output_port: OutputPort,
    destination: Destination,
}

impl CoreMidiOutput {
    /// Create a new Core MIDI output connected to the specified destination.
    ///
    /// # Arguments
    /// * `destination_index` - Index of the destination in the system's MIDI device list
    pub fn new(destination_index: usize) -> Result<Self> {
        let client = Client::new("Ensemble")
            .map_err(|e| anyhow!("Failed to create MIDI client: {:?}", e))?;

        let output_port = client
            .output_port("Ensemble Output")
            .map_err(|e| anyhow!("Failed to create output port: {:?}", e))?;

        let count = Destinations::count();
        if destination_index >= count {
            return Err(anyhow!(
                "MIDI destination {} not found (only {} available)",
                destination_index,
                count
            ));
        }

        let destination = Destination::from_index(destination_index)
            .ok_or_else(|| anyhow!("MIDI destination {} not found", destination_index))?;

        Ok(Self {
            _client: client,
            output_port,
            destination,
        })
    }

    /// Connect to the first destination whose name contains `name`
    /// (case-insensitive).
    pub fn new_by_name(name: &str) -> Result<Self> {
        let destinations = list_destinations();
        let index = destinations
            .iter()
            .position(|(_, n)| n.to_lowercase().contains(&name.to_lowercase()))
            .ok_or_else(|| anyhow!("No MIDI destination matching '{}' found", name))?;

        Self::new(destinations[index].0)
    }
}

impl MidiOutput for CoreMidiOutput {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        // Timestamp 0 sends immediately
        let packet_buffer = PacketBuffer::new(0, message);
        self.output_port
            .send(&self.destination, &packet_buffer)
            .map_err(|e| anyhow!("Failed to send MIDI message: {:?}", e))?;
        Ok(())
    }
}

/// List all Core MIDI destinations as (index, name) pairs.
pub fn list_destinations() -> Vec<(usize, String)> {
    Destinations
        .into_iter()
        .enumerate()
        .map(|(i, dest)| {
            let name = dest.display_name().unwrap_or_else(|| format!("Unknown {}", i));
            (i, name)
        })
        .collect()
}
