// etude-core/src/types/mod.rs

pub mod arpeggio;
pub mod chord;
pub mod config;
pub mod hand;
pub mod note;
pub mod progression;
pub mod roman_numeral;
pub mod scale;
pub mod step;
pub mod voice_leading;

pub use arpeggio::{arpeggio_intervals, ArpeggioOctaves, ArpeggioType, ChordTone};
pub use chord::{chord_intervals, ChordInversion, ChordType};
pub use config::{ExerciseConfig, PracticeMode};
pub use hand::{Hand, HandSelection};
pub use note::{checked_midi, midi_name, parse_midi_note, Key, PitchClass};
pub use progression::{ChordProgression, ProgressionChord};
pub use roman_numeral::*;
pub use scale::{scale_intervals, ScaleType};
pub use step::{PracticeExercise, PracticeStep, StepLabel, StepType};
pub use voice_leading::VoiceLeading;
