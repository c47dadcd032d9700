//! Circle-of-fifths navigation over the twelve keys

use crate::types::note::Key;

pub struct CircleOfFifths;

impl CircleOfFifths {
    /// Keys in order of ascending fifths, starting from C
    pub const ORDER: [Key; 12] = [
        Key::C,
        Key::G,
        Key::D,
        Key::A,
        Key::E,
        Key::B,
        Key::FSharp,
        Key::CSharp,
        Key::GSharp,
        Key::DSharp,
        Key::ASharp,
        Key::F,
    ];

    /// Index of `key` on the circle (C = 0)
    pub fn position(key: Key) -> usize {
        Self::ORDER.iter().position(|&k| k == key).unwrap_or(0)
    }

    /// One fifth up, wrapping from F back to C
    pub fn next(key: Key) -> Key {
        Self::ORDER[(Self::position(key) + 1) % 12]
    }

    /// One fifth down, wrapping from C back to F
    pub fn previous(key: Key) -> Key {
        Self::ORDER[(Self::position(key) + 11) % 12]
    }

    /// All twelve keys in circle order beginning with `start`
    pub fn starting_at(start: Key) -> impl Iterator<Item = Key> {
        let offset = Self::position(start);
        (0..12).map(move |i| Self::ORDER[(offset + i) % 12])
    }
}
