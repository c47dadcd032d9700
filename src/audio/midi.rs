//! MIDI input for Etude
//!
//! A dedicated thread owns the midir connection. The REPL talks to it through
//! [`MidiInputHandle`]; incoming note messages go straight from the midir
//! callback into the practice session's command channel.

use crate::session::SessionCommand;
use anyhow::{Result, anyhow};
use crossbeam_channel::{Sender as SessionSender, TrySendError};
use midir::{Ignore, MidiInput, MidiInputConnection};
use std::sync::RwLock;
use std::sync::mpsc::{Sender, channel};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

const CLIENT_NAME: &str = "Etude";

/// Note messages the session cares about. Everything else is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { note: u8, velocity: u8 },
    NoteOff { note: u8 },
}

impl MidiEvent {
    fn into_command(self) -> SessionCommand {
        match self {
            MidiEvent::NoteOn { note, .. } => SessionCommand::NoteOn(note),
            MidiEvent::NoteOff { note } => SessionCommand::NoteOff(note),
        }
    }
}

/// Decode a raw MIDI message on any channel. Note-on with velocity 0 is a
/// note-off.
pub fn parse_message(bytes: &[u8]) -> Option<MidiEvent> {
    let &[status, note, velocity, ..] = bytes else {
        return None;
    };
    let note = note & 0x7F;
    match status & 0xF0 {
        0x90 if velocity > 0 => Some(MidiEvent::NoteOn { note, velocity }),
        0x90 | 0x80 => Some(MidiEvent::NoteOff { note }),
        _ => None,
    }
}

/// Commands that can be sent to the MIDI input thread
enum MidiCommand {
    Connect {
        port_name: String,
        reply: Sender<Result<String>>,
    },
    Disconnect,
    Shutdown,
}

/// Internal MIDI input handler that owns the connection
struct MidiInputInternal {
    connection: Option<MidiInputConnection<()>>,
    command_rx: std::sync::mpsc::Receiver<MidiCommand>,
    notes: SessionSender<SessionCommand>,
}

impl MidiInputInternal {
    fn connect(&mut self, port_name: &str) -> Result<String> {
        // Drop the old connection first so the port is free to reopen
        self.connection = None;

        let mut midi_in = MidiInput::new(CLIENT_NAME)?;
        midi_in.ignore(Ignore::Sysex | Ignore::Time | Ignore::ActiveSense);

        let ports = midi_in.ports();
        let port = ports
            .iter()
            .find(|p| {
                midi_in
                    .port_name(p)
                    .map(|name| name.contains(port_name))
                    .unwrap_or(false)
            })
            .ok_or_else(|| anyhow!("MIDI port '{}' not found", port_name))?;
        let actual_name = midi_in.port_name(port)?;

        let notes = self.notes.clone();
        let connection = midi_in
            .connect(
                port,
                "etude-in",
                move |_stamp, message, _| {
                    let Some(event) = parse_message(message) else {
                        return;
                    };
                    match notes.try_send(event.into_command()) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => warn!(?event, "Session busy, dropped note"),
                        Err(TrySendError::Disconnected(_)) => {}
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("Failed to connect to '{}': {}", actual_name, e))?;

        self.connection = Some(connection);
        info!(port = %actual_name, "MIDI input connected");
        Ok(actual_name)
    }

    fn run(&mut self) {
        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                MidiCommand::Connect { port_name, reply } => {
                    let _ = reply.send(self.connect(&port_name));
                }
                MidiCommand::Disconnect => {
                    if let Some(connection) = self.connection.take() {
                        connection.close();
                        debug!("MIDI input disconnected");
                    }
                }
                MidiCommand::Shutdown => break,
            }
        }
    }
}

/// Thread-safe handle to the MIDI input thread
pub struct MidiInputHandle {
    command_tx: Sender<MidiCommand>,
    _thread: JoinHandle<()>,
    /// Name of the connected port
    port_name: RwLock<Option<String>>,
}

impl MidiInputHandle {
    /// Create a handle that forwards notes to the session. Not connected yet.
    pub fn new(notes: SessionSender<SessionCommand>) -> Result<Self> {
        let (tx, rx) = channel();

        let thread = thread::Builder::new()
            .name("etude-midi-in".to_string())
            .spawn(move || {
                let mut internal = MidiInputInternal {
                    connection: None,
                    command_rx: rx,
                    notes,
                };
                internal.run();
            })?;

        Ok(Self {
            command_tx: tx,
            _thread: thread,
            port_name: RwLock::new(None),
        })
    }

    /// List available MIDI input ports.
    /// Creating the client can fail transiently, so retry a few times.
    pub fn list_ports() -> Result<Vec<String>> {
        let mut last_err = None;
        for attempt in 0..3 {
            if attempt > 0 {
                thread::sleep(std::time::Duration::from_millis(100));
            }
            match MidiInput::new(CLIENT_NAME) {
                Ok(midi_in) => {
                    return Ok(midi_in
                        .ports()
                        .iter()
                        .filter_map(|p| midi_in.port_name(p).ok())
                        .collect());
                }
                Err(e) => last_err = Some(e),
            }
        }
        Err(anyhow!(
            "MIDI initialization failed after 3 attempts: {:?}",
            last_err
        ))
    }

    /// Connect to an input port by name (partial match supported).
    /// Returns the full port name.
    pub fn connect(&self, port_name: &str) -> Result<String> {
        let (reply, response) = channel();
        self.command_tx
            .send(MidiCommand::Connect {
                port_name: port_name.to_string(),
                reply,
            })
            .map_err(|e| anyhow!("Failed to send connect command: {}", e))?;

        let actual_name = response
            .recv()
            .map_err(|_| anyhow!("MIDI thread stopped"))??;

        if let Ok(mut stored) = self.port_name.write() {
            *stored = Some(actual_name.clone());
        }
        Ok(actual_name)
    }

    pub fn disconnect(&self) -> Result<()> {
        self.command_tx
            .send(MidiCommand::Disconnect)
            .map_err(|e| anyhow!("Failed to send disconnect: {}", e))?;
        if let Ok(mut stored) = self.port_name.write() {
            *stored = None;
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected_port().is_some()
    }

    pub fn connected_port(&self) -> Option<String> {
        self.port_name.read().ok().and_then(|name| name.clone())
    }
}

impl Drop for MidiInputHandle {
    fn drop(&mut self) {
        let _ = self.command_tx.send(MidiCommand::Shutdown);
    }
}
