use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Chord quality, stored as a fixed interval set above the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordType {
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Minor7,
    Major7,
    HalfDiminished7,
    Diminished7,
    Sus2,
    Sus4,
}

impl ChordType {
    pub const ALL: [ChordType; 11] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Diminished,
        ChordType::Augmented,
        ChordType::Dominant7,
        ChordType::Minor7,
        ChordType::Major7,
        ChordType::HalfDiminished7,
        ChordType::Diminished7,
        ChordType::Sus2,
        ChordType::Sus4,
    ];

    /// Semitones above the root in root position
    pub fn intervals(self) -> &'static [u8] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::Augmented => &[0, 4, 8],
            ChordType::Dominant7 => &[0, 4, 7, 10],
            ChordType::Minor7 => &[0, 3, 7, 10],
            ChordType::Major7 => &[0, 4, 7, 11],
            ChordType::HalfDiminished7 => &[0, 3, 6, 10],
            ChordType::Diminished7 => &[0, 3, 6, 9],
            ChordType::Sus2 => &[0, 2, 7],
            ChordType::Sus4 => &[0, 5, 7],
        }
    }

    pub fn len(self) -> usize {
        self.intervals().len()
    }

    pub fn is_seventh(self) -> bool {
        self.len() == 4
    }

    /// Identify a root-position chord from its intervals above the root
    pub fn from_intervals(intervals: &[u8]) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|chord| chord.intervals() == intervals)
    }

    pub fn name(self) -> &'static str {
        match self {
            ChordType::Major => "Major",
            ChordType::Minor => "minor",
            ChordType::Diminished => "diminished",
            ChordType::Augmented => "Augmented",
            ChordType::Dominant7 => "Dominant 7th",
            ChordType::Minor7 => "minor 7th",
            ChordType::Major7 => "Major 7th",
            ChordType::HalfDiminished7 => "minor 7th♭5",
            ChordType::Diminished7 => "diminished 7th",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
        }
    }

    /// Chord-symbol suffix, e.g. "m7" for a minor seventh
    pub fn symbol(self) -> &'static str {
        match self {
            ChordType::Major => "",
            ChordType::Minor => "m",
            ChordType::Diminished => "°",
            ChordType::Augmented => "+",
            ChordType::Dominant7 => "7",
            ChordType::Minor7 => "m7",
            ChordType::Major7 => "maj7",
            ChordType::HalfDiminished7 => "ø7",
            ChordType::Diminished7 => "°7",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
        }
    }

    /// Inversions available for this chord size, root position first
    pub fn inversions(self) -> &'static [ChordInversion] {
        if self.is_seventh() {
            &ChordInversion::ALL
        } else {
            &ChordInversion::ALL[..3]
        }
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ChordType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "major" | "maj" => Ok(ChordType::Major),
            "minor" | "min" | "m" => Ok(ChordType::Minor),
            "diminished" | "dim" => Ok(ChordType::Diminished),
            "augmented" | "aug" => Ok(ChordType::Augmented),
            "dominant7" | "dom7" | "7" => Ok(ChordType::Dominant7),
            "minor7" | "min7" | "m7" => Ok(ChordType::Minor7),
            "major7" | "maj7" => Ok(ChordType::Major7),
            "halfdiminished7" | "halfdim7" | "m7b5" => Ok(ChordType::HalfDiminished7),
            "diminished7" | "dim7" => Ok(ChordType::Diminished7),
            "sus2" => Ok(ChordType::Sus2),
            "sus4" => Ok(ChordType::Sus4),
            _ => Err(anyhow!("Unknown chord type: {}", s.trim())),
        }
    }
}

/// Which chord tone sits in the bass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChordInversion {
    Root,
    First,
    Second,
    Third,
}

impl ChordInversion {
    pub const ALL: [ChordInversion; 4] = [
        ChordInversion::Root,
        ChordInversion::First,
        ChordInversion::Second,
        ChordInversion::Third,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Rotate `intervals` so that this inversion's chord tone is lowest.
    /// Displaced tones move up an octave; the inversion wraps modulo the
    /// chord size, so a third inversion of a triad is root position.
    pub fn apply(self, intervals: &[u8]) -> Vec<u8> {
        if intervals.len() < 2 {
            return intervals.to_vec();
        }

        let effective_n = self.index() % intervals.len();
        let mut voiced = intervals.to_vec();
        voiced.rotate_left(effective_n);

        let wrapped = intervals.len() - effective_n;
        for interval in voiced.iter_mut().skip(wrapped) {
            *interval += 12;
        }
        voiced
    }

    pub fn name(self) -> &'static str {
        match self {
            ChordInversion::Root => "root position",
            ChordInversion::First => "1st inversion",
            ChordInversion::Second => "2nd inversion",
            ChordInversion::Third => "3rd inversion",
        }
    }

    /// Short suffix as used in chord analysis, e.g. "(1st inv)"
    pub fn suffix(self) -> &'static str {
        match self {
            ChordInversion::Root => "",
            ChordInversion::First => " (1st inv)",
            ChordInversion::Second => " (2nd inv)",
            ChordInversion::Third => " (3rd inv)",
        }
    }
}

impl fmt::Display for ChordInversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Chord interval table lookup with the inversion applied
pub fn chord_intervals(chord: ChordType, inversion: ChordInversion) -> Vec<u8> {
    inversion.apply(chord.intervals())
}
