//! Chord builders: every chord of a key, or one chord quality in every key.
//!
//! Consecutive chords are voice-led. Each chord is tried in every inversion
//! and in two octave placements; the candidate whose lowest note stays within
//! a window around the starting tonic and that moves the fewest semitones from
//! the previous chord wins.

use super::{fits_all_hands, hand_layout, stack_hands, tonic_midi, ExerciseBuilder};
use crate::circle::CircleOfFifths;
use crate::error::ExerciseResult;
use crate::types::chord::{ChordInversion, ChordType};
use crate::types::config::{ExerciseConfig, PracticeMode};
use crate::types::note::PitchClass;
use crate::types::roman_numeral::RomanNumeral;
use crate::types::scale::ScaleType;
use crate::types::step::{PracticeExercise, PracticeStep, StepLabel, StepType};
use crate::types::voice_leading::smoothest_voicing;

/// Lowest notes allowed, relative to the anchor tonic
const WINDOW_BELOW: i32 = 6;
const WINDOW_ABOVE: i32 = 11;

/// Chooses voicings for a chain of chords, remembering the last one
struct Voicer {
    anchor: i32,
    layers: usize,
    previous: Option<Vec<i32>>,
}

impl Voicer {
    fn new(anchor: i32, layers: usize) -> Self {
        Voicer {
            anchor,
            layers,
            previous: None,
        }
    }

    fn in_window(&self, lowest: i32) -> bool {
        lowest >= self.anchor - WINDOW_BELOW && lowest <= self.anchor + WINDOW_ABOVE
    }

    /// Voicing for a chord rooted `root_offset` semitones above the anchor.
    /// The first chord is in root position; later chords are led from the
    /// previous one using the given inversions.
    fn lead(
        &mut self,
        root_offset: u8,
        intervals: &[u8],
        inversions: &[ChordInversion],
    ) -> ExerciseResult<Vec<i32>> {
        let root = self.anchor + root_offset as i32;
        let root_position: Vec<i32> = intervals.iter().map(|&i| root + i as i32).collect();
        // Root position must be playable for every hand
        stack_hands(&root_position, self.layers)?;

        let chosen = match &self.previous {
            None => root_position,
            Some(previous) => {
                let candidates: Vec<Vec<i32>> = inversions
                    .iter()
                    .flat_map(|inversion| {
                        let voiced = inversion.apply(intervals);
                        [0, -12].into_iter().map(move |shift| {
                            voiced
                                .iter()
                                .map(|&i| root + shift + i as i32)
                                .collect::<Vec<i32>>()
                        })
                    })
                    .filter(|notes| {
                        self.in_window(notes[0]) && fits_all_hands(notes, self.layers)
                    })
                    .collect();

                let previous = to_midi(previous);
                let as_midi: Vec<Vec<u8>> = candidates.iter().map(|c| to_midi(c)).collect();
                match smoothest_voicing(&previous, &as_midi) {
                    Some(index) => candidates[index].clone(),
                    None => root_position,
                }
            }
        };

        self.previous = Some(chosen.clone());
        Ok(chosen)
    }
}

/// Candidates are range-checked before they get here
fn to_midi(notes: &[i32]) -> Vec<u8> {
    notes.iter().map(|&n| n.clamp(0, 127) as u8).collect()
}

/// Bass-to-top inversion of a voicing, found from its lowest note
fn inversion_of(voicing: &[i32], root: i32, intervals: &[u8]) -> ChordInversion {
    let bass = (voicing[0] - root).rem_euclid(12) as u8;
    let index = intervals.iter().position(|&i| i % 12 == bass).unwrap_or(0);
    ChordInversion::from_index(index)
}

fn chord_step(voicing: &[i32], layers: usize, label: StepLabel) -> ExerciseResult<PracticeStep> {
    Ok(PracticeStep::new(
        stack_hands(voicing, layers)?,
        StepType::Simultaneous,
        label,
    ))
}

/// Diatonic triads or seventh chords on each degree of the key's scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordsByKeyBuilder {
    pub scale: ScaleType,
    pub sevenths: bool,
}

impl ChordsByKeyBuilder {
    /// Intervals above the root of the chord on `degree`, stacking thirds
    /// from the scale
    fn stacked_thirds(&self, degree: usize) -> Vec<u8> {
        let tones = if self.sevenths { 4 } else { 3 };
        let root = self.scale.degree_offset(degree);
        (0..tones)
            .map(|t| self.scale.degree_offset(degree + 2 * t) - root)
            .collect()
    }
}

impl ExerciseBuilder for ChordsByKeyBuilder {
    fn build(&self, config: &ExerciseConfig) -> ExerciseResult<PracticeExercise> {
        config.validate()?;

        let (base_octave, layers) = hand_layout(config);
        let mut voicer = Voicer::new(tonic_midi(config.key, base_octave), layers);
        let mut steps = Vec::with_capacity(7);

        for degree in 0..7 {
            let intervals = self.stacked_thirds(degree);
            let root_offset = self.scale.degree_offset(degree);
            let quality = ChordType::from_intervals(&intervals);
            let inversions: &[ChordInversion] = match quality {
                Some(chord) => chord.inversions(),
                None => &ChordInversion::ALL[..intervals.len().min(4)],
            };

            let voicing = voicer.lead(root_offset, &intervals, inversions)?;
            let root_pc = config.key.tonic().transpose(root_offset as i32);
            let label = StepLabel::Chord {
                symbol: format!(
                    "{}{}",
                    config.key.spell(root_pc),
                    quality.map(ChordType::symbol).unwrap_or("")
                ),
                numeral: quality.map(|chord| RomanNumeral::diatonic(degree, chord)),
                inversion: inversion_of(&voicing, voicer.anchor + root_offset as i32, &intervals),
                hands: config.hands,
            };
            steps.push(chord_step(&voicing, layers, label)?);
        }

        let kind = if self.sevenths {
            "seventh chords"
        } else {
            "triads"
        };

        Ok(PracticeExercise::new(
            PracticeMode::ChordsByKey {
                scale: self.scale,
                sevenths: self.sevenths,
            },
            config.key,
            config.hands,
            format!("{} {} {}", config.key, self.scale, kind),
            steps,
        ))
    }
}

/// One chord quality through all twelve keys, in circle-of-fifths order
/// from the configured key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordsByTypeBuilder {
    pub chord: ChordType,
    /// Follow each root-position chord with its inversions
    pub inversions: bool,
}

impl ExerciseBuilder for ChordsByTypeBuilder {
    fn build(&self, config: &ExerciseConfig) -> ExerciseResult<PracticeExercise> {
        config.validate()?;

        let (base_octave, layers) = hand_layout(config);
        let mut voicer = Voicer::new(tonic_midi(config.key, base_octave), layers);
        let intervals = self.chord.intervals();
        let start = config.key.tonic();
        let mut steps = Vec::new();

        for key in CircleOfFifths::starting_at(config.key) {
            let root_offset = semitones_above(start, key.tonic());
            let voicing = voicer.lead(root_offset, intervals, &[ChordInversion::Root])?;
            let root = voicing[0];
            let symbol = format!("{}{}", key.spell(key.tonic()), self.chord.symbol());

            let inversions: &[ChordInversion] = if self.inversions {
                self.chord.inversions()
            } else {
                &[ChordInversion::Root]
            };

            for &inversion in inversions {
                let notes: Vec<i32> = inversion
                    .apply(intervals)
                    .iter()
                    .map(|&i| root + i as i32)
                    .collect();
                let label = StepLabel::Chord {
                    symbol: symbol.clone(),
                    numeral: None,
                    inversion,
                    hands: config.hands,
                };
                steps.push(chord_step(&notes, layers, label)?);
            }
        }

        let title = if self.inversions {
            format!(
                "{} chords with inversions around the circle from {}",
                self.chord, config.key
            )
        } else {
            format!("{} chords around the circle from {}", self.chord, config.key)
        };

        Ok(PracticeExercise::new(
            PracticeMode::ChordsByType {
                chord: self.chord,
                inversions: self.inversions,
            },
            config.key,
            config.hands,
            title,
            steps,
        ))
    }
}

fn semitones_above(from: PitchClass, to: PitchClass) -> u8 {
    (to.semitone() + 12 - from.semitone()) % 12
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExerciseError;
    use crate::types::hand::HandSelection;
    use crate::types::note::Key;
    use std::collections::BTreeSet;

    fn pitch_classes(notes: &[u8]) -> BTreeSet<u8> {
        notes.iter().map(|n| n % 12).collect()
    }

    #[test]
    fn test_stacked_thirds() {
        let triads = ChordsByKeyBuilder {
            scale: ScaleType::Major,
            sevenths: false,
        };
        assert_eq!(triads.stacked_thirds(0), vec![0, 4, 7]);
        assert_eq!(triads.stacked_thirds(1), vec![0, 3, 7]);
        assert_eq!(triads.stacked_thirds(6), vec![0, 3, 6]);

        let sevenths = ChordsByKeyBuilder {
            scale: ScaleType::Major,
            sevenths: true,
        };
        assert_eq!(sevenths.stacked_thirds(4), vec![0, 4, 7, 10]);
        assert_eq!(sevenths.stacked_thirds(6), vec![0, 3, 6, 10]);
    }

    #[test]
    fn test_c_major_triads() {
        let builder = ChordsByKeyBuilder {
            scale: ScaleType::Major,
            sevenths: false,
        };
        let exercise = builder.build(&ExerciseConfig::default()).unwrap();

        assert_eq!(exercise.len(), 7);
        assert_eq!(exercise.steps()[0].notes(), &[60, 64, 67]);
        assert_eq!(exercise.steps()[1].notes(), &[62, 65, 69]);

        let expected_chords = [
            [0, 4, 7],
            [2, 5, 9],
            [4, 7, 11],
            [5, 9, 0],
            [7, 11, 2],
            [9, 0, 4],
            [11, 2, 5],
        ];
        for (i, step) in exercise.steps().iter().enumerate() {
            assert_eq!(step.kind(), StepType::Simultaneous);
            assert_eq!(
                pitch_classes(step.notes()),
                expected_chords[i].iter().copied().collect()
            );
            assert!(step.notes()[0] >= 54 && step.notes()[0] <= 71);
            match step.label() {
                StepLabel::Chord { numeral, .. } => {
                    assert_eq!(numeral.map(|n| n.degree), Some(i as u8 + 1));
                }
                other => panic!("unexpected label {:?}", other),
            }
        }
    }

    #[test]
    fn test_numerals_for_sevenths() {
        let builder = ChordsByKeyBuilder {
            scale: ScaleType::Major,
            sevenths: true,
        };
        let exercise = builder
            .build(&ExerciseConfig::default().with_key(Key::F))
            .unwrap();
        let numerals: Vec<String> = exercise
            .steps()
            .iter()
            .map(|s| match s.label() {
                StepLabel::Chord {
                    numeral: Some(n), ..
                } => n.to_string(),
                other => panic!("unexpected label {:?}", other),
            })
            .collect();

        assert_eq!(
            numerals,
            vec!["Imaj7", "ii7", "iii7", "IVmaj7", "V7", "vi7", "viiø7"]
        );
        assert!(exercise.steps().iter().all(|s| s.notes().len() == 4));
    }

    #[test]
    fn test_chord_symbols_follow_key_spelling() {
        let builder = ChordsByKeyBuilder {
            scale: ScaleType::Major,
            sevenths: false,
        };
        let exercise = builder
            .build(&ExerciseConfig::default().with_key(Key::F))
            .unwrap();
        match exercise.steps()[3].label() {
            StepLabel::Chord { symbol, .. } => assert_eq!(symbol, "Bb"),
            other => panic!("unexpected label {:?}", other),
        }
    }

    #[test]
    fn test_both_hands_stack_left_then_right() {
        let builder = ChordsByKeyBuilder {
            scale: ScaleType::Major,
            sevenths: false,
        };
        let config = ExerciseConfig::default().with_hands(HandSelection::Both);
        let exercise = builder.build(&config).unwrap();

        assert_eq!(exercise.steps()[0].notes(), &[48, 52, 55, 60, 64, 67]);
        for step in exercise.steps() {
            let (left, right) = step.notes().split_at(3);
            let raised: Vec<u8> = left.iter().map(|n| n + 12).collect();
            assert_eq!(raised, right);
        }
    }

    #[test]
    fn test_chords_by_type_follow_the_circle() {
        let builder = ChordsByTypeBuilder {
            chord: ChordType::Major,
            inversions: false,
        };
        let exercise = builder
            .build(&ExerciseConfig::default().with_key(Key::D))
            .unwrap();

        assert_eq!(exercise.len(), 12);
        let roots: Vec<u8> = exercise.steps().iter().map(|s| s.notes()[0] % 12).collect();
        let expected: Vec<u8> = CircleOfFifths::starting_at(Key::D)
            .map(|k| k.tonic().semitone())
            .collect();
        assert_eq!(roots, expected);
        assert_eq!(exercise.steps()[0].notes(), &[62, 66, 69]);
    }

    #[test]
    fn test_chords_by_type_with_inversions() {
        let builder = ChordsByTypeBuilder {
            chord: ChordType::Dominant7,
            inversions: true,
        };
        let exercise = builder.build(&ExerciseConfig::default()).unwrap();

        assert_eq!(exercise.len(), 48);
        assert_eq!(exercise.steps()[0].notes(), &[60, 64, 67, 70]);
        assert_eq!(exercise.steps()[1].notes(), &[64, 67, 70, 72]);
        assert_eq!(exercise.steps()[3].notes(), &[70, 72, 76, 79]);
        for step in exercise.steps() {
            assert!(step.notes().windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_voicings_stay_near_the_start() {
        for key in Key::ALL {
            let builder = ChordsByTypeBuilder {
                chord: ChordType::Minor,
                inversions: false,
            };
            let config = ExerciseConfig::default().with_key(key);
            let exercise = builder.build(&config).unwrap();
            let anchor = tonic_midi(key, 4);
            for step in exercise.steps() {
                let lowest = step.notes()[0] as i32;
                assert!(lowest >= anchor - WINDOW_BELOW && lowest <= anchor + WINDOW_ABOVE);
            }
        }
    }

    #[test]
    fn test_high_octave_is_out_of_range() {
        let builder = ChordsByKeyBuilder {
            scale: ScaleType::Major,
            sevenths: false,
        };
        // C9 major fits, D9 minor reaches A9 = 129
        let config = ExerciseConfig::default().with_start_octave(9);
        assert_eq!(
            builder.build(&config),
            Err(ExerciseError::NoteOutOfRange { note: 129 })
        );
    }
}
