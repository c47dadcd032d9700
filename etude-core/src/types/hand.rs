use anyhow::{anyhow, Result};
use std::fmt;
use std::str::FromStr;

/// Which hand (or hands) an exercise is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HandSelection {
    Left,
    #[default]
    Right,
    Both,
}

/// A single hand, as carried on step labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hand {
    Left,
    Right,
}

impl HandSelection {
    /// Octave each hand plays in, relative to the exercise's start octave.
    /// The left hand sits one octave lower. Widened so the lowest start
    /// octave still has a left hand below it.
    pub fn octave_for(hand: Hand, start_octave: i8) -> i32 {
        let start_octave = start_octave as i32;
        match hand {
            Hand::Left => start_octave - 1,
            Hand::Right => start_octave,
        }
    }

    /// Hands that play, lowest first
    pub fn hands(self) -> &'static [Hand] {
        match self {
            HandSelection::Left => &[Hand::Left],
            HandSelection::Right => &[Hand::Right],
            HandSelection::Both => &[Hand::Left, Hand::Right],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HandSelection::Left => "left hand",
            HandSelection::Right => "right hand",
            HandSelection::Both => "both hands",
        }
    }
}

impl fmt::Display for HandSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HandSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "l" | "left" | "lh" => Ok(HandSelection::Left),
            "r" | "right" | "rh" => Ok(HandSelection::Right),
            "b" | "both" | "hands" => Ok(HandSelection::Both),
            other => Err(anyhow!("Hands must be left, right or both, got {}", other)),
        }
    }
}
