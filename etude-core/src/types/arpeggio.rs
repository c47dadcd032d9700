use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArpeggioType {
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Minor7,
    Major7,
}

impl ArpeggioType {
    pub const ALL: [ArpeggioType; 7] = [
        ArpeggioType::Major,
        ArpeggioType::Minor,
        ArpeggioType::Diminished,
        ArpeggioType::Augmented,
        ArpeggioType::Dominant7,
        ArpeggioType::Minor7,
        ArpeggioType::Major7,
    ];

    /// Chord tones within one octave, root first
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ArpeggioType::Major => &[0, 4, 7],
            ArpeggioType::Minor => &[0, 3, 7],
            ArpeggioType::Diminished => &[0, 3, 6],
            ArpeggioType::Augmented => &[0, 4, 8],
            ArpeggioType::Dominant7 => &[0, 4, 7, 10],
            ArpeggioType::Minor7 => &[0, 3, 7, 10],
            ArpeggioType::Major7 => &[0, 4, 7, 11],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ArpeggioType::Major => "Major",
            ArpeggioType::Minor => "minor",
            ArpeggioType::Diminished => "diminished",
            ArpeggioType::Augmented => "Augmented",
            ArpeggioType::Dominant7 => "Dominant 7th",
            ArpeggioType::Minor7 => "minor 7th",
            ArpeggioType::Major7 => "Major 7th",
        }
    }

    /// Chord tone at `index` counting up from the root, wrapping each octave
    pub fn tone(self, index: usize) -> ChordTone {
        match index % self.intervals().len() {
            0 => ChordTone::Root,
            1 => ChordTone::Third,
            2 => ChordTone::Fifth,
            _ => ChordTone::Seventh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordTone {
    Root,
    Third,
    Fifth,
    Seventh,
}

impl fmt::Display for ChordTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordTone::Root => write!(f, "root"),
            ChordTone::Third => write!(f, "3rd"),
            ChordTone::Fifth => write!(f, "5th"),
            ChordTone::Seventh => write!(f, "7th"),
        }
    }
}

/// Arpeggio interval table lookup
pub fn arpeggio_intervals(arpeggio: ArpeggioType) -> &'static [u8] {
    arpeggio.intervals()
}

impl fmt::Display for ArpeggioType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ArpeggioType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "major" | "maj" => Ok(ArpeggioType::Major),
            "minor" | "min" | "m" => Ok(ArpeggioType::Minor),
            "diminished" | "dim" => Ok(ArpeggioType::Diminished),
            "augmented" | "aug" => Ok(ArpeggioType::Augmented),
            "dominant7" | "dom7" | "7" => Ok(ArpeggioType::Dominant7),
            "minor7" | "min7" | "m7" => Ok(ArpeggioType::Minor7),
            "major7" | "maj7" => Ok(ArpeggioType::Major7),
            _ => Err(anyhow!("Unknown arpeggio type: {}", s.trim())),
        }
    }
}

/// How many octaves an arpeggio climbs before turning back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArpeggioOctaves {
    One,
    Two,
}

impl ArpeggioOctaves {
    pub fn count(self) -> usize {
        match self {
            ArpeggioOctaves::One => 1,
            ArpeggioOctaves::Two => 2,
        }
    }
}

impl FromStr for ArpeggioOctaves {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" | "one" => Ok(ArpeggioOctaves::One),
            "2" | "two" => Ok(ArpeggioOctaves::Two),
            other => Err(anyhow!("Arpeggio span must be 1 or 2 octaves, got {}", other)),
        }
    }
}
