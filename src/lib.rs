//! # Etude
//!
//! Interactive piano practice in the terminal. Pick a key and a drill
//! (scale, diatonic chords, one chord type round the circle of fifths,
//! arpeggio or chord progression), then play it on a MIDI keyboard while
//! Etude checks every note.
//!
//! Exercise generation and progress tracking live in [`etude_core`]. This
//! crate adds the I/O around it:
//!
//! - `session`: thread owning the progress tracker, fed by a channel
//! - `audio`: MIDI keyboard input and sine-tone hints
//! - `commands` and `repl`: the interactive prompt
//! - `settings`: configuration persisted as JSON between runs

pub mod audio;
pub mod commands;
pub mod repl;
pub mod session;
pub mod settings;

pub use etude_core;
