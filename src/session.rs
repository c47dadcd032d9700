//! Practice session actor
//!
//! One thread owns the [`ProgressionTracker`] and drains a bounded channel of
//! [`SessionCommand`]s. Note events from the MIDI callback thread and
//! commands typed at the REPL all funnel through that channel, so the tracker
//! never needs a lock. Everything the session has to say comes back as
//! [`SessionEvent`]s on an unbounded channel the REPL loop selects on.

use anyhow::{anyhow, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use etude_core::tracker::Completion;
use etude_core::{
    ExerciseConfig, ExerciseError, Key, NoteOutcome, PracticeExercise, PracticeStep,
    ProgressionTracker, TrackerState,
};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};

/// Room for a burst of notes from a fast player
const COMMAND_CAPACITY: usize = 256;
const REPLY_TIMEOUT: Duration = Duration::from_secs(2);

/// Requests handled by the session thread
#[derive(Debug)]
pub enum SessionCommand {
    NoteOn(u8),
    NoteOff(u8),
    Configure {
        config: ExerciseConfig,
        reply: Sender<Result<String, ExerciseError>>,
    },
    Start,
    Reset,
    SetAutoKeyProgression(bool),
    Snapshot(Sender<SessionSnapshot>),
    Shutdown,
}

/// Things the session reports back to the REPL
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { step: PracticeStep, total: usize },
    NothingToPractise { title: String },
    Matched { note: u8, remaining: usize },
    WrongNote { note: u8, expected: Vec<u8> },
    StepAdvanced { index: usize, total: usize, step: PracticeStep },
    Completed(Completion),
    KeyAdvanced { key: Key, title: String },
}

/// Point-in-time view of the tracker
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub config: ExerciseConfig,
    pub exercise: PracticeExercise,
    pub state: TrackerState,
    pub step_index: usize,
    pub highlighted: Vec<u8>,
    pub auto_key_progression: bool,
}

/// Owns the tracker and turns commands into events
struct SessionInternal {
    tracker: ProgressionTracker,
    command_rx: Receiver<SessionCommand>,
    event_tx: Sender<SessionEvent>,
}

impl SessionInternal {
    fn new(
        mut tracker: ProgressionTracker,
        command_rx: Receiver<SessionCommand>,
        event_tx: Sender<SessionEvent>,
    ) -> Self {
        let completed_tx = event_tx.clone();
        tracker.on_completed(Box::new(move |completion: &Completion| {
            let _ = completed_tx.send(SessionEvent::Completed(completion.clone()));
        }));

        SessionInternal {
            tracker,
            command_rx,
            event_tx,
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.tracker.config().clone(),
            exercise: self.tracker.exercise().clone(),
            state: self.tracker.state(),
            step_index: self.tracker.step_index(),
            highlighted: self.tracker.highlighted_notes().to_vec(),
            auto_key_progression: self.tracker.auto_key_progression(),
        }
    }

    fn note_on(&mut self, note: u8) {
        match self.tracker.on_note_on(note) {
            NoteOutcome::Ignored => {}
            NoteOutcome::Matched { remaining } => {
                self.emit(SessionEvent::Matched { note, remaining })
            }
            NoteOutcome::Wrong { expected } => {
                self.emit(SessionEvent::WrongNote { note, expected })
            }
            NoteOutcome::StepComplete { next_step } => {
                if let Some(step) = self.tracker.current_step() {
                    let event = SessionEvent::StepAdvanced {
                        index: next_step,
                        total: self.tracker.exercise().len(),
                        step: step.clone(),
                    };
                    self.emit(event);
                }
            }
            // Completion itself is published by the tracker callback
            NoteOutcome::ExerciseComplete(completion) => {
                if let Some(key) = completion.next_key {
                    self.emit(SessionEvent::KeyAdvanced {
                        key,
                        title: self.tracker.exercise().title().to_string(),
                    });
                }
            }
        }
    }

    fn run(&mut self) {
        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                SessionCommand::NoteOn(note) => self.note_on(note),
                SessionCommand::NoteOff(note) => self.tracker.on_note_off(note),
                SessionCommand::Configure { config, reply } => {
                    let result = self
                        .tracker
                        .set_configuration(config)
                        .map(|()| self.tracker.exercise().title().to_string());
                    if let Err(e) = &result {
                        debug!(error = %e, "Configuration rejected");
                    }
                    let _ = reply.send(result);
                }
                SessionCommand::Start => {
                    let total = self.tracker.exercise().len();
                    let event = match self.tracker.start().cloned() {
                        Some(step) => SessionEvent::Started { step, total },
                        None if self.tracker.state() == TrackerState::Active => continue,
                        None => SessionEvent::NothingToPractise {
                            title: self.tracker.exercise().title().to_string(),
                        },
                    };
                    self.emit(event);
                }
                SessionCommand::Reset => self.tracker.reset(),
                SessionCommand::SetAutoKeyProgression(enabled) => {
                    self.tracker.set_auto_key_progression(enabled)
                }
                SessionCommand::Snapshot(reply) => {
                    let _ = reply.send(self.snapshot());
                }
                SessionCommand::Shutdown => break,
            }
        }
        debug!("Session thread stopped");
    }
}

/// Handle to the session thread. Cloning the command sender is how other
/// threads (the MIDI callback) feed notes in.
pub struct SessionHandle {
    command_tx: Sender<SessionCommand>,
    event_rx: Receiver<SessionEvent>,
    thread: Option<JoinHandle<()>>,
}

impl SessionHandle {
    /// Spawn the session thread with an initial configuration
    pub fn spawn(config: ExerciseConfig, auto_key_progression: bool) -> Result<Self> {
        let mut tracker = ProgressionTracker::new(config)?;
        tracker.set_auto_key_progression(auto_key_progression);

        let (command_tx, command_rx) = bounded(COMMAND_CAPACITY);
        let (event_tx, event_rx) = unbounded();

        let thread = thread::Builder::new()
            .name("etude-session".to_string())
            .spawn(move || {
                let mut internal = SessionInternal::new(tracker, command_rx, event_tx);
                internal.run();
            })?;

        Ok(SessionHandle {
            command_tx,
            event_rx,
            thread: Some(thread),
        })
    }

    pub fn sender(&self) -> Sender<SessionCommand> {
        self.command_tx.clone()
    }

    pub fn events(&self) -> &Receiver<SessionEvent> {
        &self.event_rx
    }

    pub fn send(&self, cmd: SessionCommand) -> Result<()> {
        self.command_tx
            .send(cmd)
            .map_err(|_| anyhow!("Practice session has stopped"))
    }

    /// Replace the configuration, returning the new exercise title
    pub fn configure(&self, config: ExerciseConfig) -> Result<String> {
        let (reply, response) = bounded(1);
        self.send(SessionCommand::Configure { config, reply })?;
        let result = wait_for(&response)?;
        Ok(result?)
    }

    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, response) = bounded(1);
        self.send(SessionCommand::Snapshot(reply))?;
        wait_for(&response)
    }
}

fn wait_for<T>(response: &Receiver<T>) -> Result<T> {
    response.recv_timeout(REPLY_TIMEOUT).map_err(|e| match e {
        RecvTimeoutError::Timeout => anyhow!("Practice session did not respond"),
        RecvTimeoutError::Disconnected => anyhow!("Practice session has stopped"),
    })
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        let _ = self.command_tx.send(SessionCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("Session thread panicked");
            }
        }
    }
}
