use crate::types::arpeggio::ChordTone;
use crate::types::chord::ChordInversion;
use crate::types::config::PracticeMode;
use crate::types::hand::HandSelection;
use crate::types::note::{midi_name, Key};
use crate::types::roman_numeral::RomanNumeral;
#[cfg(feature = "colored")]
use colored::*;
use std::collections::BTreeSet;
use std::fmt;

/// How the notes of a step are meant to be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StepType {
    /// A single note of a melodic line
    Sequential,
    /// A chord, all notes sounding together
    Simultaneous,
    /// One note per hand, played together: `[left, right]`
    Paired,
}

/// Display information for a step. Never consulted when validating notes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum StepLabel {
    ScaleNote {
        /// 1-based scale degree, 8 for the octave
        degree: u8,
        position: usize,
        hands: HandSelection,
    },
    Chord {
        /// Chord symbol such as "Dm" or "G7"
        symbol: String,
        numeral: Option<RomanNumeral>,
        inversion: ChordInversion,
        hands: HandSelection,
    },
    ArpeggioNote {
        tone: ChordTone,
        position: usize,
        hands: HandSelection,
    },
}

impl fmt::Display for StepLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepLabel::ScaleNote { degree, hands, .. } => {
                if *degree == 8 {
                    write!(f, "octave ({})", hands)
                } else {
                    write!(f, "degree {} ({})", degree, hands)
                }
            }
            StepLabel::Chord {
                symbol,
                numeral,
                inversion,
                hands,
            } => {
                match numeral {
                    Some(numeral) => write!(f, "{} {}", numeral, symbol)?,
                    None => write!(f, "{}", symbol)?,
                }
                write!(f, "{} ({})", inversion.suffix(), hands)
            }
            StepLabel::ArpeggioNote { tone, hands, .. } => write!(f, "{} ({})", tone, hands),
        }
    }
}

/// One unit of an exercise: the notes the player must sound to move on
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PracticeStep {
    notes: Vec<u8>,
    kind: StepType,
    label: StepLabel,
}

impl PracticeStep {
    pub fn new(notes: Vec<u8>, kind: StepType, label: StepLabel) -> Self {
        debug_assert!(!notes.is_empty(), "practice steps always carry notes");
        PracticeStep { notes, kind, label }
    }

    /// Notes in playing order (lowest first for chords, `[left, right]` for pairs)
    pub fn notes(&self) -> &[u8] {
        &self.notes
    }

    pub fn kind(&self) -> StepType {
        self.kind
    }

    pub fn label(&self) -> &StepLabel {
        &self.label
    }

    /// The set of notes that satisfies this step
    pub fn expected(&self) -> BTreeSet<u8> {
        self.notes.iter().copied().collect()
    }

    pub fn note_names(&self) -> Vec<String> {
        self.notes.iter().map(|&n| midi_name(n)).collect()
    }
}

#[cfg(feature = "colored")]
impl fmt::Display for PracticeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .note_names()
            .into_iter()
            .map(|n| n.cyan().to_string())
            .collect();
        write!(
            f,
            "{} [{}]",
            self.label.to_string().bold(),
            names.join(", ")
        )
    }
}

#[cfg(not(feature = "colored"))]
impl fmt::Display for PracticeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.label, self.note_names().join(", "))
    }
}

/// An ordered, immutable sequence of steps generated from one configuration.
/// A new exercise replaces the old one whenever the configuration changes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PracticeExercise {
    mode: PracticeMode,
    key: Key,
    hands: HandSelection,
    title: String,
    steps: Vec<PracticeStep>,
}

impl PracticeExercise {
    pub fn new(
        mode: PracticeMode,
        key: Key,
        hands: HandSelection,
        title: String,
        steps: Vec<PracticeStep>,
    ) -> Self {
        PracticeExercise {
            mode,
            key,
            hands,
            title,
            steps,
        }
    }

    /// An exercise with nothing to practise
    pub fn empty(mode: PracticeMode, key: Key, hands: HandSelection, title: String) -> Self {
        Self::new(mode, key, hands, title, Vec::new())
    }

    pub fn mode(&self) -> &PracticeMode {
        &self.mode
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn hands(&self) -> HandSelection {
        self.hands
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn steps(&self) -> &[PracticeStep] {
        &self.steps
    }

    pub fn step(&self, index: usize) -> Option<&PracticeStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The notes of each step, in order
    pub fn note_lists(&self) -> Vec<Vec<u8>> {
        self.steps.iter().map(|s| s.notes.clone()).collect()
    }
}

impl fmt::Display for PracticeExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} steps)", self.title, self.steps.len())?;
        for (i, step) in self.steps.iter().enumerate() {
            writeln!(f, "  {:>2}. {}", i + 1, step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::chord::ChordType;
    use crate::types::scale::ScaleType;

    fn chord_step() -> PracticeStep {
        PracticeStep::new(
            vec![60, 64, 67],
            StepType::Simultaneous,
            StepLabel::Chord {
                symbol: "C".to_string(),
                numeral: Some(RomanNumeral::diatonic(0, ChordType::Major)),
                inversion: ChordInversion::Root,
                hands: HandSelection::Right,
            },
        )
    }

    #[test]
    fn test_expected_set() {
        let step = chord_step();
        let expected = step.expected();
        assert_eq!(expected.len(), 3);
        assert!(expected.contains(&64));
        assert_eq!(step.note_names(), vec!["C4", "E4", "G4"]);
    }

    #[test]
    fn test_label_display() {
        let step = chord_step();
        assert_eq!(step.label().to_string(), "I C (right hand)");

        let scale_label = StepLabel::ScaleNote {
            degree: 8,
            position: 7,
            hands: HandSelection::Both,
        };
        assert_eq!(scale_label.to_string(), "octave (both hands)");

        let arp_label = StepLabel::ArpeggioNote {
            tone: ChordTone::Fifth,
            position: 2,
            hands: HandSelection::Left,
        };
        assert_eq!(arp_label.to_string(), "5th (left hand)");
    }

    #[test]
    fn test_empty_exercise() {
        let exercise = PracticeExercise::empty(
            PracticeMode::Scale {
                scale: ScaleType::Major,
            },
            Key::C,
            HandSelection::Right,
            "nothing".to_string(),
        );
        assert!(exercise.is_empty());
        assert_eq!(exercise.len(), 0);
        assert!(exercise.step(0).is_none());
    }
}
