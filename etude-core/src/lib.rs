//! # Etude Core
//!
//! Practice exercise engine for the piano. Turns a key, practice mode, hand
//! selection and octave into an ordered list of steps (the MIDI notes to play
//! at each point) and tracks a player's progress through them.
//! No audio or MIDI I/O lives here.
//!
//! ## Features
//!
//! - **serde**: Serialize configurations and exercises
//! - **colored**: Colored terminal output for steps and exercises
//!
//! ## Example
//!
//! ```rust
//! use etude_core::{build_exercise, ExerciseConfig, Key, PracticeMode};
//!
//! let config = ExerciseConfig::default()
//!     .with_key(Key::C)
//!     .with_mode(PracticeMode::Progression { name: "I-V".to_string() });
//!
//! let exercise = build_exercise(&config).unwrap();
//! assert_eq!(exercise.steps()[1].notes(), &[67, 71, 74]);
//! ```

pub mod builder;
pub mod circle;
pub mod error;
pub mod tracker;
pub mod types;

pub use builder::{build_exercise, ExerciseBuilder};
pub use circle::CircleOfFifths;
pub use error::{ExerciseError, ExerciseResult};
pub use tracker::{Completion, NoteOutcome, ProgressionTracker, TrackerState};
pub use types::{
    ArpeggioOctaves, ArpeggioType, ChordInversion, ChordProgression, ChordType, ExerciseConfig,
    HandSelection, Key, PitchClass, PracticeExercise, PracticeMode, PracticeStep, ScaleType,
    StepLabel, StepType,
};
