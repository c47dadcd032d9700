use super::{hand_layout, line_steps, mirrored_index, tonic_midi, up_and_down, ExerciseBuilder};
use crate::error::ExerciseResult;
use crate::types::config::{ExerciseConfig, PracticeMode};
use crate::types::scale::ScaleType;
use crate::types::step::{PracticeExercise, StepLabel};

/// One octave up and back down: 8 notes ascending, 7 descending
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleBuilder {
    pub scale: ScaleType,
}

impl ScaleBuilder {
    /// Degree offsets from the tonic, octave included
    fn ascending(&self) -> Vec<u8> {
        (0..8).map(|index| self.scale.degree_offset(index)).collect()
    }
}

impl ExerciseBuilder for ScaleBuilder {
    fn build(&self, config: &ExerciseConfig) -> ExerciseResult<PracticeExercise> {
        config.validate()?;

        let (base_octave, layers) = hand_layout(config);
        let ascending = self.ascending();
        let line = up_and_down(&ascending);

        let steps = line_steps(
            tonic_midi(config.key, base_octave),
            &line,
            layers,
            |position| StepLabel::ScaleNote {
                degree: mirrored_index(position, ascending.len()) as u8 + 1,
                position,
                hands: config.hands,
            },
        )?;

        Ok(PracticeExercise::new(
            PracticeMode::Scale { scale: self.scale },
            config.key,
            config.hands,
            format!("{} {} scale", config.key, self.scale),
            steps,
        ))
    }
}
