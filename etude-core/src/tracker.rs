//! # Progression Tracker
//!
//! Caller-owned session state for one practice exercise. The tracker holds
//! the configuration and the exercise built from it, checks incoming note
//! events against the current step and moves through the steps.
//!
//! ```text
//!            start()               last step satisfied
//!   Idle ───────────────▶ Active ─────────────────────▶ Completed
//!    ▲                                                      │
//!    └───────── auto key progression, reset() or start() ───┘
//! ```
//!
//! Notes of a step must sound together: a note-on adds a matching note to
//! the held set and a note-off removes it again. Once every expected note is
//! held, the step is satisfied and the next one begins.

use crate::builder::build_exercise;
use crate::circle::CircleOfFifths;
use crate::error::ExerciseResult;
use crate::types::config::ExerciseConfig;
use crate::types::note::Key;
use crate::types::step::{PracticeExercise, PracticeStep};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{info, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackerState {
    Idle,
    Active,
    Completed,
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerState::Idle => write!(f, "idle"),
            TrackerState::Active => write!(f, "active"),
            TrackerState::Completed => write!(f, "completed"),
        }
    }
}

/// What a note event did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    /// No exercise is running
    Ignored,
    /// Part of the current step; `remaining` notes still have to join it
    Matched { remaining: usize },
    /// Not part of the current step. Nothing advances.
    Wrong { expected: Vec<u8> },
    /// The step is satisfied and `next_step` is now current
    StepComplete { next_step: usize },
    /// The final step is satisfied
    ExerciseComplete(Completion),
}

/// Summary handed to the completion callback
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Completion {
    pub key: Key,
    pub title: String,
    pub steps: usize,
    /// Key the tracker moved on to, when auto key progression is on
    pub next_key: Option<Key>,
}

pub type CompletionCallback = Box<dyn FnMut(&Completion) + Send>;

pub struct ProgressionTracker {
    config: ExerciseConfig,
    exercise: PracticeExercise,
    state: TrackerState,
    step_index: usize,
    held: BTreeSet<u8>,
    auto_key_progression: bool,
    on_completed: Option<CompletionCallback>,
}

impl ProgressionTracker {
    pub fn new(config: ExerciseConfig) -> ExerciseResult<Self> {
        let exercise = build_exercise(&config)?;
        Ok(ProgressionTracker {
            config,
            exercise,
            state: TrackerState::Idle,
            step_index: 0,
            held: BTreeSet::new(),
            auto_key_progression: false,
            on_completed: None,
        })
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn exercise(&self) -> &PracticeExercise {
        &self.exercise
    }

    pub fn state(&self) -> TrackerState {
        self.state
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn current_step(&self) -> Option<&PracticeStep> {
        self.exercise.step(self.step_index)
    }

    pub fn held_notes(&self) -> &BTreeSet<u8> {
        &self.held
    }

    pub fn auto_key_progression(&self) -> bool {
        self.auto_key_progression
    }

    /// Replace the configuration and rebuild. Works in any state and leaves
    /// the tracker idle at the first step. On error the old configuration
    /// and exercise stay in place.
    pub fn set_configuration(&mut self, config: ExerciseConfig) -> ExerciseResult<()> {
        let exercise = build_exercise(&config)?;
        self.config = config;
        self.exercise = exercise;
        self.rewind(TrackerState::Idle);
        Ok(())
    }

    /// Begin the exercise from its first step. Returns the step to play, or
    /// `None` when the tracker is already active or there is nothing to play.
    pub fn start(&mut self) -> Option<&PracticeStep> {
        if self.state == TrackerState::Active || self.exercise.is_empty() {
            return None;
        }
        self.rewind(TrackerState::Active);
        self.current_step()
    }

    /// Back to idle at the first step, keeping the configuration
    pub fn reset(&mut self) {
        self.rewind(TrackerState::Idle);
    }

    pub fn set_auto_key_progression(&mut self, enabled: bool) {
        self.auto_key_progression = enabled;
    }

    /// Register the callback fired each time the final step is satisfied
    pub fn on_completed(&mut self, callback: CompletionCallback) {
        self.on_completed = Some(callback);
    }

    /// Notes of the current step while active, nothing otherwise
    pub fn highlighted_notes(&self) -> &[u8] {
        match (self.state, self.current_step()) {
            (TrackerState::Active, Some(step)) => step.notes(),
            _ => &[],
        }
    }

    pub fn on_note_on(&mut self, note: u8) -> NoteOutcome {
        if self.state != TrackerState::Active {
            return NoteOutcome::Ignored;
        }
        let Some(step) = self.exercise.step(self.step_index) else {
            return NoteOutcome::Ignored;
        };

        let expected = step.expected();
        if !expected.contains(&note) {
            trace!(note, step = self.step_index, "Wrong note");
            return NoteOutcome::Wrong {
                expected: step.notes().to_vec(),
            };
        }

        self.held.insert(note);
        let remaining = expected.difference(&self.held).count();
        trace!(note, step = self.step_index, remaining, "Matched note");
        if remaining > 0 {
            return NoteOutcome::Matched { remaining };
        }

        self.held.clear();
        if self.step_index + 1 < self.exercise.len() {
            self.step_index += 1;
            return NoteOutcome::StepComplete {
                next_step: self.step_index,
            };
        }

        NoteOutcome::ExerciseComplete(self.complete())
    }

    pub fn on_note_off(&mut self, note: u8) {
        self.held.remove(&note);
    }

    fn rewind(&mut self, state: TrackerState) {
        self.state = state;
        self.step_index = 0;
        self.held.clear();
    }

    fn complete(&mut self) -> Completion {
        self.state = TrackerState::Completed;
        let mut completion = Completion {
            key: self.config.key,
            title: self.exercise.title().to_string(),
            steps: self.exercise.len(),
            next_key: None,
        };

        if let Some(callback) = self.on_completed.as_mut() {
            callback(&completion);
        }

        if self.auto_key_progression {
            let next_key = CircleOfFifths::next(self.config.key);
            let next = self.config.clone().with_key(next_key);
            match self.set_configuration(next) {
                Ok(()) => {
                    info!(from = %completion.key, to = %next_key, "Advanced to next key");
                    completion.next_key = Some(next_key);
                }
                Err(e) => {
                    warn!(key = %next_key, error = %e, "Could not build exercise in next key");
                }
            }
        }

        completion
    }
}

impl fmt::Debug for ProgressionTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressionTracker")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("step_index", &self.step_index)
            .field("held", &self.held)
            .field("auto_key_progression", &self.auto_key_progression)
            .finish_non_exhaustive()
    }
}
