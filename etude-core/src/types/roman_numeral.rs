use crate::types::chord::ChordType;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Accidental {
    Flat,  // ♭
    Sharp, // ♯
}

/// Roman numeral for a chord relative to a tonic, e.g. `ii`, `V7`, `♭VII`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RomanNumeral {
    /// Scale degree, 1-7
    pub degree: u8,
    pub accidental: Option<Accidental>,
    pub chord: ChordType,
}

impl RomanNumeral {
    /// Numeral for a chord built on a diatonic degree (0-based index)
    pub fn diatonic(degree_index: usize, chord: ChordType) -> Self {
        RomanNumeral {
            degree: (degree_index % 7) as u8 + 1,
            accidental: None,
            chord,
        }
    }

    /// Numeral for a chord whose root lies `semitones` above the tonic.
    /// Chromatic roots are spelled the way borrowed chords usually are:
    /// ♭II, ♭III, ♯IV, ♭VI, ♭VII.
    pub fn from_offset(semitones: u8, chord: ChordType) -> Self {
        let (degree, accidental) = match semitones % 12 {
            0 => (1, None),
            1 => (2, Some(Accidental::Flat)),
            2 => (2, None),
            3 => (3, Some(Accidental::Flat)),
            4 => (3, None),
            5 => (4, None),
            6 => (4, Some(Accidental::Sharp)),
            7 => (5, None),
            8 => (6, Some(Accidental::Flat)),
            9 => (6, None),
            10 => (7, Some(Accidental::Flat)),
            _ => (7, None),
        };

        RomanNumeral {
            degree,
            accidental,
            chord,
        }
    }

    fn is_upper_case(&self) -> bool {
        matches!(
            self.chord,
            ChordType::Major
                | ChordType::Augmented
                | ChordType::Dominant7
                | ChordType::Major7
                | ChordType::Sus2
                | ChordType::Sus4
        )
    }

    fn suffix(&self) -> &'static str {
        match self.chord {
            ChordType::Major | ChordType::Minor => "",
            ChordType::Diminished => "°",
            ChordType::Augmented => "+",
            ChordType::Dominant7 | ChordType::Minor7 => "7",
            ChordType::Major7 => "maj7",
            ChordType::HalfDiminished7 => "ø7",
            ChordType::Diminished7 => "°7",
            ChordType::Sus2 => "sus2",
            ChordType::Sus4 => "sus4",
        }
    }

    /// Describe the harmonic function of this degree
    pub fn function_description(&self) -> &'static str {
        match (self.accidental, self.degree) {
            (Some(Accidental::Flat), 7) => "Subtonic - borrowed from the parallel minor",
            (Some(Accidental::Flat), 6) => "Modal mixture - borrowed from the parallel minor",
            (Some(Accidental::Flat), 3) => "Modal mixture - borrowed mediant",
            (Some(Accidental::Flat), 2) => "Neapolitan - predominant colour",
            (Some(_), _) => "Chromatic alteration",
            (None, 1) => "Tonic",
            (None, 2) => "Supertonic",
            (None, 3) => "Mediant",
            (None, 4) => "Subdominant",
            (None, 5) => "Dominant",
            (None, 6) => "Submediant",
            (None, _) => "Leading tone",
        }
    }
}

impl fmt::Display for RomanNumeral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const UPPER: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];
        const LOWER: [&str; 7] = ["i", "ii", "iii", "iv", "v", "vi", "vii"];

        match self.accidental {
            Some(Accidental::Flat) => write!(f, "♭")?,
            Some(Accidental::Sharp) => write!(f, "♯")?,
            None => {}
        }

        let index = (self.degree.clamp(1, 7) - 1) as usize;
        let base = if self.is_upper_case() {
            UPPER[index]
        } else {
            LOWER[index]
        };
        write!(f, "{}{}", base, self.suffix())
    }
}
