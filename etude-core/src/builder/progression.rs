use super::{hand_layout, stack_hands, tonic_midi, ExerciseBuilder};
use crate::error::ExerciseResult;
use crate::types::chord::ChordInversion;
use crate::types::config::{ExerciseConfig, PracticeMode};
use crate::types::progression::ChordProgression;
use crate::types::step::{PracticeExercise, PracticeStep, StepLabel, StepType};
use tracing::debug;

/// A named progression from the library, every chord in root position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionBuilder {
    pub name: String,
}

impl ExerciseBuilder for ProgressionBuilder {
    fn build(&self, config: &ExerciseConfig) -> ExerciseResult<PracticeExercise> {
        config.validate()?;

        let mode = PracticeMode::Progression {
            name: self.name.clone(),
        };

        let Some(progression) = ChordProgression::find(&self.name) else {
            debug!(name = %self.name, "Unknown progression, nothing to practise");
            return Ok(PracticeExercise::empty(
                mode,
                config.key,
                config.hands,
                format!("Unknown progression {}", self.name),
            ));
        };

        let (base_octave, layers) = hand_layout(config);
        let tonic = tonic_midi(config.key, base_octave);

        let steps = progression
            .chords
            .iter()
            .map(|chord| {
                let root = tonic + chord.offset as i32;
                let voicing: Vec<i32> = chord
                    .chord
                    .intervals()
                    .iter()
                    .map(|&i| root + i as i32)
                    .collect();
                let root_pc = config.key.tonic().transpose(chord.offset as i32);

                Ok(PracticeStep::new(
                    stack_hands(&voicing, layers)?,
                    StepType::Simultaneous,
                    StepLabel::Chord {
                        symbol: format!("{}{}", config.key.spell(root_pc), chord.chord.symbol()),
                        numeral: Some(chord.numeral()),
                        inversion: ChordInversion::Root,
                        hands: config.hands,
                    },
                ))
            })
            .collect::<ExerciseResult<Vec<_>>>()?;

        Ok(PracticeExercise::new(
            mode,
            config.key,
            config.hands,
            format!("{} in {}", progression.name, config.key),
            steps,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExerciseError;
    use crate::types::hand::HandSelection;
    use crate::types::note::Key;

    fn build(name: &str, config: &ExerciseConfig) -> ExerciseResult<PracticeExercise> {
        ProgressionBuilder {
            name: name.to_string(),
        }
        .build(config)
    }

    #[test]
    fn test_one_five_in_c() {
        let exercise = build("I–V", &ExerciseConfig::default()).unwrap();
        assert_eq!(exercise.note_lists(), vec![vec![60, 64, 67], vec![67, 71, 74]]);
        assert_eq!(exercise.title(), "I–V in C");
    }

    #[test]
    fn test_borrowed_chord() {
        let exercise = build("I-bVII-IV", &ExerciseConfig::default().with_key(Key::D)).unwrap();
        assert_eq!(exercise.steps()[1].notes(), &[72, 76, 79]);
        match exercise.steps()[1].label() {
            StepLabel::Chord {
                symbol, numeral, ..
            } => {
                assert_eq!(symbol, "C");
                assert_eq!(numeral.map(|n| n.to_string()).as_deref(), Some("♭VII"));
            }
            other => panic!("unexpected label {:?}", other),
        }
    }

    #[test]
    fn test_both_hands() {
        let config = ExerciseConfig::default().with_hands(HandSelection::Both);
        let exercise = build("ii-V-I", &config).unwrap();
        assert_eq!(exercise.steps()[0].notes(), &[50, 53, 57, 62, 65, 69]);
        assert_eq!(exercise.len(), 3);
    }

    #[test]
    fn test_unknown_progression_is_empty() {
        let exercise = build("not a progression", &ExerciseConfig::default()).unwrap();
        assert!(exercise.is_empty());
    }

    #[test]
    fn test_high_octave_is_out_of_range() {
        // I fits at C9, the V chord's third is past 127
        let config = ExerciseConfig::default().with_start_octave(9);
        assert_eq!(
            build("I–V", &config),
            Err(ExerciseError::NoteOutOfRange { note: 131 })
        );
    }
}
