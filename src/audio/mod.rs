//! Audio and MIDI I/O: note input from a keyboard and hint tones out

pub mod hint;
pub mod midi;

pub use hint::{DEFAULT_HINT, HintPlayer, midi_to_frequency};
pub use midi::{MidiEvent, MidiInputHandle, parse_message};
