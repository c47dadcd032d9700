use super::{hand_layout, line_steps, mirrored_index, tonic_midi, up_and_down, ExerciseBuilder};
use crate::error::ExerciseResult;
use crate::types::arpeggio::{arpeggio_intervals, ArpeggioOctaves, ArpeggioType};
use crate::types::config::{ExerciseConfig, PracticeMode};
use crate::types::step::{PracticeExercise, StepLabel};

/// Broken chord on the key's tonic, climbing one or two octaves and back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpeggioBuilder {
    pub arpeggio: ArpeggioType,
    pub octaves: ArpeggioOctaves,
}

impl ArpeggioBuilder {
    /// Offsets from the root up to and including the top root
    fn ascending(&self) -> Vec<u8> {
        let intervals = arpeggio_intervals(self.arpeggio);
        let span = self.octaves.count() as u8;

        let mut offsets: Vec<u8> = (0..span)
            .flat_map(|octave| intervals.iter().map(move |&i| i + 12 * octave))
            .collect();
        offsets.push(12 * span);
        offsets
    }
}

impl ExerciseBuilder for ArpeggioBuilder {
    fn build(&self, config: &ExerciseConfig) -> ExerciseResult<PracticeExercise> {
        config.validate()?;

        let (base_octave, layers) = hand_layout(config);
        let ascending = self.ascending();
        let line = up_and_down(&ascending);

        let steps = line_steps(
            tonic_midi(config.key, base_octave),
            &line,
            layers,
            |position| StepLabel::ArpeggioNote {
                tone: self.arpeggio.tone(mirrored_index(position, ascending.len())),
                position,
                hands: config.hands,
            },
        )?;

        let span = match self.octaves {
            ArpeggioOctaves::One => "1 octave",
            ArpeggioOctaves::Two => "2 octaves",
        };

        Ok(PracticeExercise::new(
            PracticeMode::Arpeggio {
                arpeggio: self.arpeggio,
                octaves: self.octaves,
            },
            config.key,
            config.hands,
            format!("{} {} arpeggio ({})", config.key, self.arpeggio, span),
            steps,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExerciseError;
    use crate::types::arpeggio::ChordTone;
    use crate::types::hand::HandSelection;
    use crate::types::note::Key;
    use crate::types::step::StepType;

    fn notes(exercise: &PracticeExercise) -> Vec<Vec<u8>> {
        exercise.note_lists()
    }

    #[test]
    fn test_one_octave_major() {
        let builder = ArpeggioBuilder {
            arpeggio: ArpeggioType::Major,
            octaves: ArpeggioOctaves::One,
        };
        let exercise = builder.build(&ExerciseConfig::default()).unwrap();

        let flat: Vec<u8> = notes(&exercise).into_iter().flatten().collect();
        assert_eq!(flat, vec![60, 64, 67, 72, 67, 64, 60]);
        assert_eq!(exercise.title(), "C Major arpeggio (1 octave)");
    }

    #[test]
    fn test_two_octave_seventh_does_not_repeat_top() {
        let builder = ArpeggioBuilder {
            arpeggio: ArpeggioType::Dominant7,
            octaves: ArpeggioOctaves::Two,
        };
        let config = ExerciseConfig::default().with_key(Key::G).with_start_octave(3);
        let exercise = builder.build(&config).unwrap();

        // 4 tones per octave, 2 octaves, the top root, then back down
        assert_eq!(exercise.len(), 17);
        assert_eq!(exercise.steps()[8].notes(), &[79]);
        assert_eq!(exercise.steps()[7].notes(), &[77]);
        assert_eq!(exercise.steps()[9].notes(), &[77]);
        assert_eq!(exercise.steps()[16].notes(), &[55]);
    }

    #[test]
    fn test_chord_tone_labels() {
        let builder = ArpeggioBuilder {
            arpeggio: ArpeggioType::Minor,
            octaves: ArpeggioOctaves::One,
        };
        let exercise = builder.build(&ExerciseConfig::default()).unwrap();
        let tones: Vec<ChordTone> = exercise
            .steps()
            .iter()
            .map(|s| match s.label() {
                StepLabel::ArpeggioNote { tone, .. } => *tone,
                other => panic!("unexpected label {:?}", other),
            })
            .collect();

        assert_eq!(
            tones,
            vec![
                ChordTone::Root,
                ChordTone::Third,
                ChordTone::Fifth,
                ChordTone::Root,
                ChordTone::Fifth,
                ChordTone::Third,
                ChordTone::Root,
            ]
        );
    }

    #[test]
    fn test_both_hands_pairs() {
        let builder = ArpeggioBuilder {
            arpeggio: ArpeggioType::Minor,
            octaves: ArpeggioOctaves::One,
        };
        let config = ExerciseConfig::default()
            .with_key(Key::A)
            .with_hands(HandSelection::Both);
        let exercise = builder.build(&config).unwrap();

        assert_eq!(exercise.steps()[0].notes(), &[57, 69]);
        assert!(exercise.steps().iter().all(|s| {
            s.kind() == StepType::Paired && s.notes()[1] == s.notes()[0] + 12
        }));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let builder = ArpeggioBuilder {
            arpeggio: ArpeggioType::Major,
            octaves: ArpeggioOctaves::One,
        };
        // G9 is MIDI 127, its major third is not
        let config = ExerciseConfig::default().with_key(Key::G).with_start_octave(9);
        assert_eq!(
            builder.build(&config),
            Err(ExerciseError::NoteOutOfRange { note: 131 })
        );
    }
}
