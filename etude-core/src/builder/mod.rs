//! # Sequence Builders
//!
//! One builder per practice mode. Every builder turns an [`ExerciseConfig`]
//! into a [`PracticeExercise`]: an ordered list of steps, each holding the
//! MIDI notes the player must sound.
//!
//! Builders work in the octave of the lowest playing hand. When both hands
//! play, every note is stacked once more an octave higher for the right hand,
//! so a both-hands step is always `[left..., right...]` with
//! `right = left + 12`.

pub mod arpeggio;
pub mod chords;
pub mod progression;
pub mod scale;

pub use arpeggio::ArpeggioBuilder;
pub use chords::{ChordsByKeyBuilder, ChordsByTypeBuilder};
pub use progression::ProgressionBuilder;
pub use scale::ScaleBuilder;

use crate::error::ExerciseResult;
use crate::types::config::{ExerciseConfig, PracticeMode};
use crate::types::hand::HandSelection;
use crate::types::note::{checked_midi, Key};
use crate::types::step::{PracticeExercise, PracticeStep, StepLabel, StepType};
use tracing::debug;

/// Common interface of the per-mode builders
pub trait ExerciseBuilder {
    fn build(&self, config: &ExerciseConfig) -> ExerciseResult<PracticeExercise>;
}

/// Build the exercise for `config`, dispatching on its practice mode
pub fn build_exercise(config: &ExerciseConfig) -> ExerciseResult<PracticeExercise> {
    let exercise = match &config.mode {
        PracticeMode::Scale { scale } => ScaleBuilder { scale: *scale }.build(config),
        PracticeMode::ChordsByKey { scale, sevenths } => ChordsByKeyBuilder {
            scale: *scale,
            sevenths: *sevenths,
        }
        .build(config),
        PracticeMode::ChordsByType { chord, inversions } => ChordsByTypeBuilder {
            chord: *chord,
            inversions: *inversions,
        }
        .build(config),
        PracticeMode::Arpeggio { arpeggio, octaves } => ArpeggioBuilder {
            arpeggio: *arpeggio,
            octaves: *octaves,
        }
        .build(config),
        PracticeMode::Progression { name } => {
            ProgressionBuilder { name: name.clone() }.build(config)
        }
    }?;

    debug!(
        mode = %config.mode,
        key = %config.key,
        hands = %config.hands,
        steps = exercise.len(),
        "Built exercise"
    );
    Ok(exercise)
}

/// Octave of the lowest playing hand and the number of hands stacked from it
pub(crate) fn hand_layout(config: &ExerciseConfig) -> (i32, usize) {
    let hands = config.hands.hands();
    let base_octave = match hands.first() {
        Some(&hand) => HandSelection::octave_for(hand, config.start_octave),
        None => config.start_octave as i32,
    };
    (base_octave, hands.len())
}

/// MIDI number of the key's tonic in `octave`, unchecked
pub(crate) fn tonic_midi(key: Key, octave: i32) -> i32 {
    (octave + 1) * 12 + key.tonic().semitone() as i32
}

/// Repeat `voicing` once per hand, an octave apart, lowest hand first
pub(crate) fn stack_hands(voicing: &[i32], layers: usize) -> ExerciseResult<Vec<u8>> {
    let mut notes = Vec::with_capacity(voicing.len() * layers);
    for layer in 0..layers {
        for &note in voicing {
            notes.push(checked_midi(note + 12 * layer as i32)?);
        }
    }
    Ok(notes)
}

/// Whether every hand's copy of `voicing` stays inside the MIDI range
pub(crate) fn fits_all_hands(voicing: &[i32], layers: usize) -> bool {
    let top_shift = 12 * layers.saturating_sub(1) as i32;
    voicing
        .iter()
        .all(|&note| note >= 0 && note + top_shift <= 127)
}

/// Steps for a single melodic line given as semitone offsets from `root`.
/// One hand gives one-note sequential steps; both hands give `[left, right]`
/// pairs.
pub(crate) fn line_steps(
    root: i32,
    offsets: &[u8],
    layers: usize,
    label: impl Fn(usize) -> StepLabel,
) -> ExerciseResult<Vec<PracticeStep>> {
    let kind = if layers > 1 {
        StepType::Paired
    } else {
        StepType::Sequential
    };

    offsets
        .iter()
        .enumerate()
        .map(|(position, &offset)| {
            let notes = stack_hands(&[root + offset as i32], layers)?;
            Ok(PracticeStep::new(notes, kind, label(position)))
        })
        .collect()
}

/// Ascending offsets followed by the descent, without repeating the top
pub(crate) fn up_and_down(ascending: &[u8]) -> Vec<u8> {
    let mut line = ascending.to_vec();
    line.extend(ascending.iter().rev().skip(1));
    line
}

/// Index into the ascending half for a position on an up-and-down line
pub(crate) fn mirrored_index(position: usize, ascending_len: usize) -> usize {
    if position < ascending_len {
        position
    } else {
        2 * (ascending_len - 1) - position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExerciseError;

    #[test]
    fn test_hand_layout() {
        let config = ExerciseConfig::default();
        assert_eq!(hand_layout(&config), (4, 1));

        let config = config.with_hands(HandSelection::Left);
        assert_eq!(hand_layout(&config), (3, 1));

        let config = config.with_hands(HandSelection::Both);
        assert_eq!(hand_layout(&config), (3, 2));

        let config = ExerciseConfig::default()
            .with_hands(HandSelection::Left)
            .with_start_octave(i8::MIN);
        assert_eq!(hand_layout(&config), (-129, 1));
    }

    #[test]
    fn test_left_hand_at_lowest_octave_is_out_of_range() {
        let config = ExerciseConfig::default()
            .with_hands(HandSelection::Left)
            .with_start_octave(i8::MIN);
        assert_eq!(
            build_exercise(&config),
            Err(ExerciseError::NoteOutOfRange { note: -1536 })
        );
    }

    #[test]
    fn test_stack_hands() {
        assert_eq!(stack_hands(&[48, 52], 2).unwrap(), vec![48, 52, 60, 64]);
        assert_eq!(
            stack_hands(&[120], 2),
            Err(ExerciseError::NoteOutOfRange { note: 132 })
        );
        assert!(fits_all_hands(&[115], 2));
        assert!(!fits_all_hands(&[116], 2));
        assert!(!fits_all_hands(&[-1], 1));
    }

    #[test]
    fn test_up_and_down() {
        let line = up_and_down(&[0, 4, 7, 12]);
        assert_eq!(line, vec![0, 4, 7, 12, 7, 4, 0]);
        assert_eq!(mirrored_index(3, 4), 3);
        assert_eq!(mirrored_index(4, 4), 2);
        assert_eq!(mirrored_index(6, 4), 0);
    }
}
