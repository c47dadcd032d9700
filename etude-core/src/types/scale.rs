use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Diatonic scale or mode used for scale runs and for harmonising a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScaleType {
    Major,
    NaturalMinor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl ScaleType {
    pub const ALL: [ScaleType; 8] = [
        ScaleType::Major,
        ScaleType::NaturalMinor,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::Aeolian,
        ScaleType::Locrian,
    ];

    /// Semitone intervals from the tonic (tonic = 0). The octave is not included.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            ScaleType::Major => [0, 2, 4, 5, 7, 9, 11],
            ScaleType::NaturalMinor => [0, 2, 3, 5, 7, 8, 10],
            ScaleType::Dorian => [0, 2, 3, 5, 7, 9, 10],
            ScaleType::Phrygian => [0, 1, 3, 5, 7, 8, 10],
            ScaleType::Lydian => [0, 2, 4, 6, 7, 9, 11],
            ScaleType::Mixolydian => [0, 2, 4, 5, 7, 9, 10],
            ScaleType::Aeolian => [0, 2, 3, 5, 7, 8, 10],
            ScaleType::Locrian => [0, 1, 3, 5, 6, 8, 10],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::NaturalMinor => "Natural Minor",
            ScaleType::Dorian => "Dorian",
            ScaleType::Phrygian => "Phrygian",
            ScaleType::Lydian => "Lydian",
            ScaleType::Mixolydian => "Mixolydian",
            ScaleType::Aeolian => "Aeolian",
            ScaleType::Locrian => "Locrian",
        }
    }

    /// Interval of scale degree `index` (0-based), continuing into higher
    /// octaves for indices past the seventh degree
    pub fn degree_offset(self, index: usize) -> u8 {
        let intervals = self.intervals();
        intervals[index % 7] + 12 * (index / 7) as u8
    }
}

/// Scale interval table lookup
pub fn scale_intervals(scale: ScaleType) -> [u8; 7] {
    scale.intervals()
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ScaleType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "major" | "maj" | "ionian" => Ok(ScaleType::Major),
            "minor" | "min" | "naturalminor" => Ok(ScaleType::NaturalMinor),
            "dorian" => Ok(ScaleType::Dorian),
            "phrygian" => Ok(ScaleType::Phrygian),
            "lydian" => Ok(ScaleType::Lydian),
            "mixolydian" | "mixo" => Ok(ScaleType::Mixolydian),
            "aeolian" => Ok(ScaleType::Aeolian),
            "locrian" => Ok(ScaleType::Locrian),
            _ => Err(anyhow!("Unknown scale type: {}", s.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intervals_are_seven_ascending_within_octave() {
        for scale in ScaleType::ALL {
            let intervals = scale_intervals(scale);
            assert_eq!(intervals.len(), 7);
            assert_eq!(intervals[0], 0, "{} must start on the tonic", scale);
            for pair in intervals.windows(2) {
                assert!(pair[0] < pair[1], "{} intervals not ascending", scale);
            }
            assert!(intervals.iter().all(|&i| i < 12));
        }
    }

    #[test]
    fn test_modes_are_rotations_of_major() {
        let major = ScaleType::Major.intervals();
        let modes = [
            (1, ScaleType::Dorian),
            (2, ScaleType::Phrygian),
            (3, ScaleType::Lydian),
            (4, ScaleType::Mixolydian),
            (5, ScaleType::Aeolian),
            (6, ScaleType::Locrian),
        ];

        for (start, mode) in modes {
            let rotated: Vec<u8> = (0..7)
                .map(|i| (major[(start + i) % 7] + 12 - major[start]) % 12)
                .collect();
            assert_eq!(rotated, mode.intervals().to_vec(), "{}", mode);
        }

        assert_eq!(
            ScaleType::NaturalMinor.intervals(),
            ScaleType::Aeolian.intervals()
        );
    }

    #[test]
    fn test_degree_offset_continues_past_octave() {
        assert_eq!(ScaleType::Major.degree_offset(0), 0);
        assert_eq!(ScaleType::Major.degree_offset(6), 11);
        assert_eq!(ScaleType::Major.degree_offset(7), 12);
        assert_eq!(ScaleType::Major.degree_offset(9), 16);
    }

    #[test]
    fn test_parsing() {
        assert_eq!("major".parse::<ScaleType>().unwrap(), ScaleType::Major);
        assert_eq!(
            "Natural Minor".parse::<ScaleType>().unwrap(),
            ScaleType::NaturalMinor
        );
        assert_eq!("mixo".parse::<ScaleType>().unwrap(), ScaleType::Mixolydian);
        assert!("blues".parse::<ScaleType>().is_err());
    }
}
