use crate::error::{ExerciseError, ExerciseResult};
use crate::types::arpeggio::{ArpeggioOctaves, ArpeggioType};
use crate::types::chord::ChordType;
use crate::types::hand::HandSelection;
use crate::types::note::Key;
use crate::types::scale::ScaleType;
use std::fmt;

/// Practice mode together with the parameters only that mode uses
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum PracticeMode {
    Scale {
        scale: ScaleType,
    },
    /// Chords built on every degree of the key's scale
    ChordsByKey {
        scale: ScaleType,
        sevenths: bool,
    },
    /// One chord quality through all twelve keys
    ChordsByType {
        chord: ChordType,
        inversions: bool,
    },
    Arpeggio {
        arpeggio: ArpeggioType,
        octaves: ArpeggioOctaves,
    },
    Progression {
        name: String,
    },
}

impl Default for PracticeMode {
    fn default() -> Self {
        PracticeMode::Scale {
            scale: ScaleType::Major,
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PracticeMode::Scale { scale } => write!(f, "{} scale", scale),
            PracticeMode::ChordsByKey { scale, sevenths } => write!(
                f,
                "{} in {}",
                if *sevenths { "seventh chords" } else { "triads" },
                scale
            ),
            PracticeMode::ChordsByType { chord, inversions } => {
                write!(f, "{} chords in all keys", chord)?;
                if *inversions {
                    write!(f, " with inversions")?;
                }
                Ok(())
            }
            PracticeMode::Arpeggio { arpeggio, octaves } => {
                write!(f, "{} arpeggio, {} octave", arpeggio, octaves.count())?;
                if octaves.count() > 1 {
                    write!(f, "s")?;
                }
                Ok(())
            }
            PracticeMode::Progression { name } => write!(f, "progression {}", name),
        }
    }
}

/// Everything a sequence builder needs to produce an exercise
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExerciseConfig {
    pub key: Key,
    pub mode: PracticeMode,
    pub hands: HandSelection,
    /// Octave of the right hand; the left hand plays one octave lower
    pub start_octave: i8,
}

impl Default for ExerciseConfig {
    fn default() -> Self {
        ExerciseConfig {
            key: Key::C,
            mode: PracticeMode::default(),
            hands: HandSelection::Right,
            start_octave: 4,
        }
    }
}

impl ExerciseConfig {
    pub fn with_key(mut self, key: Key) -> Self {
        self.key = key;
        self
    }

    pub fn with_mode(mut self, mode: PracticeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_hands(mut self, hands: HandSelection) -> Self {
        self.hands = hands;
        self
    }

    pub fn with_start_octave(mut self, start_octave: i8) -> Self {
        self.start_octave = start_octave;
        self
    }

    /// Checks that do not depend on the mode. Range checks on individual
    /// notes happen while building.
    pub fn validate(&self) -> ExerciseResult<()> {
        if self.hands == HandSelection::Both && self.start_octave < 1 {
            return Err(ExerciseError::BothHandsBelowFirstOctave {
                start_octave: self.start_octave,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ExerciseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}, octave {}",
            self.key, self.mode, self.hands, self.start_octave
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExerciseConfig::default();
        assert_eq!(config.key, Key::C);
        assert_eq!(config.start_octave, 4);
        assert_eq!(config.hands, HandSelection::Right);
        assert!(config.validate().is_ok());
        assert_eq!(config.to_string(), "C Major scale, right hand, octave 4");
    }

    #[test]
    fn test_both_hands_need_octave_one() {
        let config = ExerciseConfig::default()
            .with_hands(HandSelection::Both)
            .with_start_octave(0);
        assert_eq!(
            config.validate(),
            Err(ExerciseError::BothHandsBelowFirstOctave { start_octave: 0 })
        );

        assert!(config.with_start_octave(1).validate().is_ok());
    }

    #[test]
    fn test_left_hand_alone_may_start_at_octave_zero() {
        let config = ExerciseConfig::default()
            .with_hands(HandSelection::Left)
            .with_start_octave(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mode_display() {
        let mode = PracticeMode::Arpeggio {
            arpeggio: ArpeggioType::Minor,
            octaves: ArpeggioOctaves::Two,
        };
        assert_eq!(mode.to_string(), "minor arpeggio, 2 octaves");

        let mode = PracticeMode::ChordsByKey {
            scale: ScaleType::Major,
            sevenths: true,
        };
        assert_eq!(mode.to_string(), "seventh chords in Major");
    }
}
