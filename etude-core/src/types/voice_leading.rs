//! Voice leading between chord voicings
//!
//! Voicings are plain MIDI note slices, lowest first. The analysis pairs each
//! voice of one chord with a note of the next so that total movement is as
//! small as possible, then scores the transition. Lower scores are smoother.

use std::fmt;

/// Movement of a single voice from one chord to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceMovement {
    pub from_note: u8,
    pub to_note: u8,
    pub semitones: i16,
    /// 0 is the lowest voice of the first chord
    pub voice_index: usize,
}

impl VoiceMovement {
    fn new(from_note: u8, to_note: u8, voice_index: usize) -> Self {
        VoiceMovement {
            from_note,
            to_note,
            semitones: to_note as i16 - from_note as i16,
            voice_index,
        }
    }

    /// Anything wider than a major third
    pub fn is_leap(&self) -> bool {
        self.semitones.abs() > 4
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoiceLeading {
    /// Notes held by the same key in both chords
    pub common_tones: Vec<u8>,
    pub movements: Vec<VoiceMovement>,
    pub total_movement: u32,
}

impl VoiceLeading {
    /// Analyze the transition between two voicings using the voice
    /// assignment with the least total movement
    pub fn analyze(from: &[u8], to: &[u8]) -> Self {
        let common_tones: Vec<u8> = from.iter().copied().filter(|n| to.contains(n)).collect();

        let movements = if from.len().min(to.len()) <= 4 {
            Self::find_optimal_assignment_brute_force(from, to)
        } else {
            Self::find_optimal_assignment_greedy(from, to)
        };

        let total_movement = movements
            .iter()
            .map(|m| m.semitones.unsigned_abs() as u32)
            .sum();

        VoiceLeading {
            common_tones,
            movements,
            total_movement,
        }
    }

    fn find_optimal_assignment_brute_force(from: &[u8], to: &[u8]) -> Vec<VoiceMovement> {
        let voice_count = from.len().min(to.len());
        let to_indices: Vec<usize> = (0..to.len()).collect();
        let mut best_movements = Vec::new();
        let mut best_total = u32::MAX;

        for perm in permutations(&to_indices) {
            let movements: Vec<VoiceMovement> = perm
                .iter()
                .take(voice_count)
                .enumerate()
                .map(|(voice, &target)| VoiceMovement::new(from[voice], to[target], voice))
                .collect();
            let total: u32 = movements
                .iter()
                .map(|m| m.semitones.unsigned_abs() as u32)
                .sum();

            if total < best_total {
                best_total = total;
                best_movements = movements;
            }
        }

        best_movements
    }

    /// Nearest free target for each voice, lowest voice first
    fn find_optimal_assignment_greedy(from: &[u8], to: &[u8]) -> Vec<VoiceMovement> {
        let mut used = vec![false; to.len()];
        let mut movements = Vec::new();

        for (voice, &from_note) in from.iter().enumerate().take(to.len()) {
            let best = to
                .iter()
                .enumerate()
                .filter(|&(j, _)| !used[j])
                .min_by_key(|&(_, &to_note)| (to_note as i16 - from_note as i16).abs());

            if let Some((j, &to_note)) = best {
                used[j] = true;
                movements.push(VoiceMovement::new(from_note, to_note, voice));
            }
        }

        movements
    }

    /// Quality score, lower is better: movement costs, held notes earn a
    /// bonus, and every leap beyond a major third is penalised by its excess
    pub fn smoothness_score(&self) -> f32 {
        let mut score = self.total_movement as f32 * 0.3;
        score -= self.common_tones.len() as f32 * 3.0;

        for movement in &self.movements {
            if movement.is_leap() {
                score += (movement.semitones.abs() as f32 - 4.0) * 2.0;
            }
        }

        score
    }

    pub fn leap_count(&self) -> usize {
        self.movements.iter().filter(|m| m.is_leap()).count()
    }
}

impl fmt::Display for VoiceLeading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let moves: Vec<String> = self
            .movements
            .iter()
            .map(|m| format!("{}→{}({:+})", m.from_note, m.to_note, m.semitones))
            .collect();
        write!(
            f,
            "[{}] total {}, score {:.1}",
            moves.join(", "),
            self.total_movement,
            self.smoothness_score()
        )
    }
}

/// Index of the candidate voicing that follows `previous` most smoothly.
/// Ties go to the earliest candidate.
pub fn smoothest_voicing(previous: &[u8], candidates: &[Vec<u8>]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (i, candidate) in candidates.iter().enumerate() {
        let score = VoiceLeading::analyze(previous, candidate).smoothness_score();
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((i, score)),
        }
    }

    best.map(|(i, _)| i)
}

/// Generate all permutations of a slice
pub fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }

    let mut result = Vec::new();
    for (i, &item) in items.iter().enumerate() {
        let mut rest: Vec<usize> = items.to_vec();
        rest.remove(i);
        for mut perm in permutations(&rest) {
            perm.insert(0, item);
            result.push(perm);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutations() {
        let perms = permutations(&[0, 1, 2]);
        assert_eq!(perms.len(), 6);
        assert_eq!(perms[0], vec![0, 1, 2]);
    }

    #[test]
    fn test_common_tones_are_exact_notes() {
        // C major to F major second inversion keeps C4
        let vl = VoiceLeading::analyze(&[60, 64, 67], &[60, 65, 69]);
        assert_eq!(vl.common_tones, vec![60]);
        assert_eq!(vl.total_movement, 3);
        assert_eq!(vl.leap_count(), 0);
    }

    #[test]
    fn test_stepwise_beats_leaping() {
        let previous = [60, 64, 67];
        let candidates = vec![vec![65, 69, 72], vec![60, 65, 69]];
        assert_eq!(smoothest_voicing(&previous, &candidates), Some(1));
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let previous = [60, 64, 67];
        let candidates = vec![vec![62, 65, 69], vec![62, 65, 69]];
        assert_eq!(smoothest_voicing(&previous, &candidates), Some(0));
        assert_eq!(smoothest_voicing(&previous, &[]), None);
    }

    #[test]
    fn test_greedy_for_wide_chords() {
        let from = [48, 52, 55, 59, 62];
        let to = [48, 52, 55, 59, 64];
        let vl = VoiceLeading::analyze(&from, &to);
        assert_eq!(vl.movements.len(), 5);
        assert_eq!(vl.total_movement, 2);
    }
}
