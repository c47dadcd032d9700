//! Library of named chord progressions
//!
//! Each chord is stored as a semitone offset from the tonic plus a chord
//! quality, so borrowed chords such as ♭VII resolve as easily as diatonic
//! ones. Lookups accept ASCII spellings: `I-bVII-IV` finds `I–♭VII–IV`.

use crate::types::chord::ChordType::{self, Dominant7, Major, Major7, Minor, Minor7};
use crate::types::roman_numeral::RomanNumeral;

/// One chord of a progression, relative to the tonic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionChord {
    pub offset: u8,
    pub chord: ChordType,
}

impl ProgressionChord {
    const fn new(offset: u8, chord: ChordType) -> Self {
        ProgressionChord { offset, chord }
    }

    pub fn numeral(&self) -> RomanNumeral {
        RomanNumeral::from_offset(self.offset, self.chord)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordProgression {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub chords: &'static [ProgressionChord],
}

const fn pc(offset: u8, chord: ChordType) -> ProgressionChord {
    ProgressionChord::new(offset, chord)
}

static PROGRESSIONS: &[ChordProgression] = &[
    ChordProgression {
        name: "I–V",
        aliases: &["15"],
        description: "Tonic and dominant",
        chords: &[pc(0, Major), pc(7, Major)],
    },
    ChordProgression {
        name: "I–IV–V",
        aliases: &["145"],
        description: "Primary triads",
        chords: &[pc(0, Major), pc(5, Major), pc(7, Major)],
    },
    ChordProgression {
        name: "I–IV–V–I",
        aliases: &["1451", "cadence"],
        description: "Full authentic cadence",
        chords: &[pc(0, Major), pc(5, Major), pc(7, Major), pc(0, Major)],
    },
    ChordProgression {
        name: "I–V–vi–IV",
        aliases: &["1564", "pop"],
        description: "Pop progression",
        chords: &[pc(0, Major), pc(7, Major), pc(9, Minor), pc(5, Major)],
    },
    ChordProgression {
        name: "I–vi–IV–V",
        aliases: &["1645", "doowop", "50s"],
        description: "Doo-wop progression",
        chords: &[pc(0, Major), pc(9, Minor), pc(5, Major), pc(7, Major)],
    },
    ChordProgression {
        name: "vi–IV–I–V",
        aliases: &["6415"],
        description: "Pop progression from the relative minor",
        chords: &[pc(9, Minor), pc(5, Major), pc(0, Major), pc(7, Major)],
    },
    ChordProgression {
        name: "I–vi–ii–V",
        aliases: &["1625", "turnaround"],
        description: "Turnaround",
        chords: &[pc(0, Major), pc(9, Minor), pc(2, Minor), pc(7, Major)],
    },
    ChordProgression {
        name: "ii–V–I",
        aliases: &["251"],
        description: "Jazz cadence with triads",
        chords: &[pc(2, Minor), pc(7, Major), pc(0, Major)],
    },
    ChordProgression {
        name: "ii7–V7–Imaj7",
        aliases: &["251-7", "jazz"],
        description: "Jazz cadence with seventh chords",
        chords: &[pc(2, Minor7), pc(7, Dominant7), pc(0, Major7)],
    },
    ChordProgression {
        name: "I–♭VII–IV",
        aliases: &["mixolydian", "rock"],
        description: "Mixolydian rock progression with a borrowed ♭VII",
        chords: &[pc(0, Major), pc(10, Major), pc(5, Major)],
    },
    ChordProgression {
        name: "i–iv–v",
        aliases: &["minor"],
        description: "Natural minor primary triads",
        chords: &[pc(0, Minor), pc(5, Minor), pc(7, Minor)],
    },
    ChordProgression {
        name: "i–♭VI–♭III–♭VII",
        aliases: &["epic"],
        description: "Minor progression through the relative major",
        chords: &[pc(0, Minor), pc(8, Major), pc(3, Major), pc(10, Major)],
    },
    ChordProgression {
        name: "I–V–vi–iii–IV–I–IV–V",
        aliases: &["canon", "pachelbel"],
        description: "Pachelbel's Canon",
        chords: &[
            pc(0, Major),
            pc(7, Major),
            pc(9, Minor),
            pc(4, Minor),
            pc(5, Major),
            pc(0, Major),
            pc(5, Major),
            pc(7, Major),
        ],
    },
    ChordProgression {
        name: "12-bar blues",
        aliases: &["blues", "12bar"],
        description: "I I I I / IV IV I I / V IV I V",
        chords: &[
            pc(0, Major),
            pc(0, Major),
            pc(0, Major),
            pc(0, Major),
            pc(5, Major),
            pc(5, Major),
            pc(0, Major),
            pc(0, Major),
            pc(7, Major),
            pc(5, Major),
            pc(0, Major),
            pc(7, Major),
        ],
    },
];

/// Fold dash, flat and spacing variants so `I-bVII-IV` matches `I–♭VII–IV`.
/// Case is kept, since `ii` and `II` are different chords.
fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '–' | '—' | '_' | ' ' => '-',
            '♭' => 'b',
            '♯' => '#',
            other => other,
        })
        .collect()
}

impl ChordProgression {
    /// Every progression in the library
    pub fn all() -> &'static [ChordProgression] {
        PROGRESSIONS
    }

    /// Look up a progression by name or alias. Aliases match
    /// case-insensitively; numeral names match exactly after folding.
    pub fn find(name: &str) -> Option<&'static ChordProgression> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }

        PROGRESSIONS.iter().find(|progression| {
            normalize_name(progression.name) == wanted
                || progression
                    .aliases
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(&wanted))
        })
    }

    /// Numerals for each chord, e.g. ["I", "♭VII", "IV"]
    pub fn numerals(&self) -> Vec<String> {
        self.chords
            .iter()
            .map(|chord| chord.numeral().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_by_name_and_ascii_spelling() {
        let by_name = ChordProgression::find("I–V").unwrap();
        let by_ascii = ChordProgression::find("I-V").unwrap();
        assert_eq!(by_name, by_ascii);
        assert_eq!(by_name.chords.len(), 2);

        let borrowed = ChordProgression::find("I-bVII-IV").unwrap();
        assert_eq!(borrowed.name, "I–♭VII–IV");
        assert_eq!(borrowed.chords[1].offset, 10);
    }

    #[test]
    fn test_find_by_alias() {
        assert_eq!(ChordProgression::find("251").unwrap().name, "ii–V–I");
        assert_eq!(ChordProgression::find("Blues").unwrap().chords.len(), 12);
        assert_eq!(
            ChordProgression::find("pachelbel").unwrap().name,
            "I–V–vi–iii–IV–I–IV–V"
        );
    }

    #[test]
    fn test_case_distinguishes_numerals() {
        assert!(ChordProgression::find("ii-V-I").is_some());
        assert!(ChordProgression::find("II-V-I").is_none());
    }

    #[test]
    fn test_unknown_names() {
        assert!(ChordProgression::find("").is_none());
        assert!(ChordProgression::find("   ").is_none());
        assert!(ChordProgression::find("I-II-III-IV-V").is_none());
    }

    #[test]
    fn test_numerals_match_names() {
        for progression in ChordProgression::all() {
            if progression.name.contains('–') {
                assert_eq!(progression.numerals().join("–"), progression.name);
            }
        }
    }

    #[test]
    fn test_names_are_unique() {
        let all = ChordProgression::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(normalize_name(a.name), normalize_name(b.name));
            }
        }
    }
}
