//! Command table and dispatcher.
//!
//! Each opcode maps to one [`Handler`] from a small capability set:
//! drive an output (setter) or read a sensor and reply (getter). Adding a
//! command is a table entry, not a new `match` arm.

use heapless::Vec;
use log::debug;

use super::ports::{ActuatorPort, SensorPort};
use crate::error::Error;
use crate::rpc::packet::Packet;

/// Set the status LED. `payload[0] == 1` turns it on, anything else off.
pub const CMD_SET_LED: u8 = 0x01;

/// Read the temperature sensor; the reply carries an `f32` (little-endian).
pub const CMD_GET_TEMPERATURE: u8 = 0x03;

/// Capacity of a [`CommandTable`].
pub const MAX_COMMANDS: usize = 16;

/// Boolean outputs a setter can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputId {
    StatusLed,
}

/// Sensors a getter can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorId {
    Temperature,
}

/// What a command does once its frame is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    /// Apply `payload[0]` to an output. No reply frame.
    SetOutput(OutputId),
    /// Read a sensor and send its value back under `reply_id`.
    ReadSensor { sensor: SensorId, reply_id: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandEntry {
    pub id: u8,
    pub handler: Handler,
}

impl CommandEntry {
    pub const fn setter(id: u8, output: OutputId) -> Self {
        Self {
            id,
            handler: Handler::SetOutput(output),
        }
    }

    pub const fn getter(id: u8, sensor: SensorId, reply_id: u8) -> Self {
        Self {
            id,
            handler: Handler::ReadSensor { sensor, reply_id },
        }
    }
}

/// Commands understood out of the box.
pub const DEFAULT_COMMANDS: [CommandEntry; 2] = [
    CommandEntry::setter(CMD_SET_LED, OutputId::StatusLed),
    CommandEntry::getter(CMD_GET_TEMPERATURE, SensorId::Temperature, CMD_GET_TEMPERATURE),
];

/// Result of dispatching one validated packet.
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// A setter drove `output` to `on`.
    Applied { output: OutputId, on: bool },
    /// A getter produced a reply frame to transmit.
    Reply(Packet),
    /// A setter arrived with an empty payload; nothing was changed.
    MissingArgument,
    /// No entry for this command id.
    Unknown,
}

/// Opcode → handler mapping.
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry, MAX_COMMANDS>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl CommandTable {
    /// Table with no commands.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Table preloaded with [`DEFAULT_COMMANDS`].
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        for entry in DEFAULT_COMMANDS {
            // MAX_COMMANDS exceeds the default set.
            let _ = table.register(entry);
        }
        table
    }

    /// Add `entry`, replacing any existing entry with the same id.
    pub fn register(&mut self, entry: CommandEntry) -> Result<(), Error> {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == entry.id) {
            *existing = entry;
            return Ok(());
        }
        self.entries.push(entry).map_err(|_| Error::TableFull)
    }

    pub fn lookup(&self, id: u8) -> Option<Handler> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.handler)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the handler for `packet` against the device ports.
    ///
    /// Only call this for packets that passed checksum validation.
    pub fn dispatch<H>(&self, packet: &Packet, hw: &mut H) -> Dispatch
    where
        H: ActuatorPort + SensorPort,
    {
        match self.lookup(packet.command_id()) {
            Some(Handler::SetOutput(output)) => match packet.payload().first() {
                Some(&arg) => {
                    let on = arg == 1;
                    debug!("CMD 0x{:02X}: {:?} <- {}", packet.command_id(), output, on);
                    hw.set_output(output, on);
                    Dispatch::Applied { output, on }
                }
                None => Dispatch::MissingArgument,
            },
            Some(Handler::ReadSensor { sensor, reply_id }) => {
                let value = hw.read_sensor(sensor);
                debug!("CMD 0x{:02X}: {:?} = {}", packet.command_id(), sensor, value);
                Dispatch::Reply(Packet::from_f32(reply_id, value))
            }
            None => Dispatch::Unknown,
        }
    }
}
