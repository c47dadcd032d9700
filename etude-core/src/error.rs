//! # Error Types
//!
//! Errors raised while turning a practice configuration into concrete MIDI
//! notes. Every error is local to build time: exercise generation does no I/O,
//! so nothing here is transient or worth retrying.
//!
//! ## Usage
//! ```rust
//! use etude_core::{build_exercise, ExerciseConfig, ExerciseError, HandSelection};
//!
//! let config = ExerciseConfig::default()
//!     .with_hands(HandSelection::Both)
//!     .with_start_octave(0);
//!
//! match build_exercise(&config) {
//!     Err(ExerciseError::BothHandsBelowFirstOctave { start_octave }) => {
//!         assert_eq!(start_octave, 0);
//!     }
//!     other => panic!("unexpected result: {:?}", other),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExerciseError {
    /// A generated note fell outside the MIDI range.
    ///
    /// Raised when the start octave pushes the lowest or highest note of the
    /// exercise past 0 or 127. Notes are never clamped, since clamping would
    /// silently change which key the player is asked to press.
    ///
    /// # Example
    /// ```
    /// # use etude_core::ExerciseError;
    /// let err = ExerciseError::NoteOutOfRange { note: 132 };
    /// assert_eq!(err.to_string(), "Note 132 is outside the MIDI range 0-127");
    /// ```
    #[error("Note {note} is outside the MIDI range 0-127")]
    NoteOutOfRange { note: i32 },

    /// Both hands were selected with a start octave below 1.
    ///
    /// The left hand plays one octave below the start octave, so octave 0
    /// would put it below the lowest octave this engine voices.
    #[error("Both hands need a start octave of at least 1 (got {start_octave})")]
    BothHandsBelowFirstOctave { start_octave: i8 },
}

/// Result alias for exercise generation.
pub type ExerciseResult<T> = std::result::Result<T, ExerciseError>;
