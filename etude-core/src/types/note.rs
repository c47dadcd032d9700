use crate::error::{ExerciseError, ExerciseResult};
use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// One of the twelve chromatic pitch classes.
/// 0=C, 1=C#/Db, 2=D, 3=D#/Eb, 4=E, 5=F, 6=F#/Gb, 7=G, 8=G#/Ab, 9=A, 10=A#/Bb, 11=B
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    /// Pitch class for any semitone count, wrapping into 0-11
    pub fn from_semitone(semitone: i32) -> Self {
        Self::ALL[semitone.rem_euclid(12) as usize]
    }

    /// Chromatic index (0-11)
    pub fn semitone(self) -> u8 {
        self as u8
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_semitone(self.semitone() as i32 + semitones)
    }

    pub fn sharp_name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::CSharp => "C#",
            PitchClass::D => "D",
            PitchClass::DSharp => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::FSharp => "F#",
            PitchClass::G => "G",
            PitchClass::GSharp => "G#",
            PitchClass::A => "A",
            PitchClass::ASharp => "A#",
            PitchClass::B => "B",
        }
    }

    pub fn flat_name(self) -> &'static str {
        match self {
            PitchClass::CSharp => "Db",
            PitchClass::DSharp => "Eb",
            PitchClass::FSharp => "Gb",
            PitchClass::GSharp => "Ab",
            PitchClass::ASharp => "Bb",
            natural => natural.sharp_name(),
        }
    }

    /// MIDI note number of this pitch class in the given octave (C4 = 60)
    pub fn midi(self, octave: i8) -> ExerciseResult<u8> {
        checked_midi((octave as i32 + 1) * 12 + self.semitone() as i32)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sharp_name())
    }
}

impl FromStr for PitchClass {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('♯', "#").replace('♭', "b").to_uppercase();

        // Legacy 'S' suffix is accepted for sharps; 'B' after the letter is a flat
        let pitch_class = match normalized.as_str() {
            "C" => PitchClass::C,
            "D" => PitchClass::D,
            "E" => PitchClass::E,
            "F" => PitchClass::F,
            "G" => PitchClass::G,
            "A" => PitchClass::A,
            "B" => PitchClass::B,

            "C#" | "CS" | "DB" => PitchClass::CSharp,
            "D#" | "DS" | "EB" => PitchClass::DSharp,
            "F#" | "FS" | "GB" => PitchClass::FSharp,
            "G#" | "GS" | "AB" => PitchClass::GSharp,
            "A#" | "AS" | "BB" => PitchClass::ASharp,

            // Enharmonic spellings that stay inside the octave
            "E#" | "ES" => PitchClass::F,
            "FB" => PitchClass::E,

            _ => return Err(anyhow!("Invalid note name: {}", s.trim())),
        };

        Ok(pitch_class)
    }
}

/// A tonal centre. Shares its cardinality with `PitchClass` but displays with
/// the conventional key-signature spelling (D♭ rather than C♯).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl Key {
    pub const ALL: [Key; 12] = [
        Key::C,
        Key::CSharp,
        Key::D,
        Key::DSharp,
        Key::E,
        Key::F,
        Key::FSharp,
        Key::G,
        Key::GSharp,
        Key::A,
        Key::ASharp,
        Key::B,
    ];

    pub fn tonic(self) -> PitchClass {
        PitchClass::ALL[self as usize]
    }

    pub fn from_pitch_class(pitch_class: PitchClass) -> Self {
        Self::ALL[pitch_class.semitone() as usize]
    }

    /// Display name, using flats for the keys usually written with flats
    pub fn name(self) -> &'static str {
        match self {
            Key::C => "C",
            Key::CSharp => "D♭",
            Key::D => "D",
            Key::DSharp => "E♭",
            Key::E => "E",
            Key::F => "F",
            Key::FSharp => "F♯",
            Key::G => "G",
            Key::GSharp => "A♭",
            Key::A => "A",
            Key::ASharp => "B♭",
            Key::B => "B",
        }
    }

    /// Whether note names in this key read better with flats
    pub fn prefers_flats(self) -> bool {
        matches!(
            self,
            Key::F | Key::CSharp | Key::DSharp | Key::GSharp | Key::ASharp
        )
    }

    /// Spell a pitch class the way this key's signature would
    pub fn spell(self, pitch_class: PitchClass) -> &'static str {
        if self.prefers_flats() {
            pitch_class.flat_name()
        } else {
            pitch_class.sharp_name()
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Key {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let pitch_class: PitchClass = s
            .parse()
            .map_err(|_| anyhow!("Invalid key: {}", s.trim()))?;
        Ok(Key::from_pitch_class(pitch_class))
    }
}

impl From<Key> for PitchClass {
    fn from(key: Key) -> Self {
        key.tonic()
    }
}

impl From<PitchClass> for Key {
    fn from(pitch_class: PitchClass) -> Self {
        Key::from_pitch_class(pitch_class)
    }
}

/// Validate an absolute pitch as a MIDI note number
pub fn checked_midi(value: i32) -> ExerciseResult<u8> {
    if (0..=127).contains(&value) {
        Ok(value as u8)
    } else {
        Err(ExerciseError::NoteOutOfRange { note: value })
    }
}

/// Octave of a MIDI note in scientific pitch notation (60 = C4)
pub fn midi_octave(midi: u8) -> i8 {
    (midi / 12) as i8 - 1
}

/// Scientific pitch name of a MIDI note, e.g. 60 -> "C4", 61 -> "C#4"
pub fn midi_name(midi: u8) -> String {
    let pitch_class = PitchClass::from_semitone(midi as i32);
    format!("{}{}", pitch_class.sharp_name(), midi_octave(midi))
}

/// Parse a note as either a MIDI number ("60") or a pitch name with octave
/// ("C4", "F#3", "Bb2", "G-1"). A bare pitch name defaults to octave 4.
pub fn parse_midi_note(s: &str) -> Result<u8> {
    let s = s.trim();
    if s.is_empty() {
        return Err(anyhow!("Empty note"));
    }

    if let Ok(number) = s.parse::<i32>() {
        return checked_midi(number).map_err(|e| anyhow!("{}", e));
    }

    // Note name is the letter plus an optional accidental; the rest is the octave
    let mut chars = s.char_indices();
    chars.next();
    let mut name_end = s.chars().next().map(char::len_utf8).unwrap_or(1);
    if let Some((idx, c)) = chars.next() {
        if matches!(c, '#' | 'b' | 'B' | 's' | 'S' | '♯' | '♭') {
            name_end = idx + c.len_utf8();
        }
    }

    let (name_part, octave_part) = s.split_at(name_end);
    let pitch_class: PitchClass = name_part.parse()?;
    let octave = if octave_part.is_empty() {
        4
    } else {
        octave_part
            .parse::<i8>()
            .map_err(|_| anyhow!("Invalid octave: {}", octave_part))?
    };

    pitch_class.midi(octave).map_err(|e| anyhow!("{}", e))
}
