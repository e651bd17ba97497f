pub mod builder;
pub mod outlines;

use serde::{Deserialize, Serialize};

/// One of the 26 stackable glyphs. Serializes as a one-letter string, the
/// format the score records persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rustfmt::skip]
pub enum Letter {
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,
}

impl Letter {
    pub const ALL: [Letter; 26] = [
        Letter::A, Letter::B, Letter::C, Letter::D, Letter::E, Letter::F,
        Letter::G, Letter::H, Letter::I, Letter::J, Letter::K, Letter::L,
        Letter::M, Letter::N, Letter::O, Letter::P, Letter::Q, Letter::R,
        Letter::S, Letter::T, Letter::U, Letter::V, Letter::W, Letter::X,
        Letter::Y, Letter::Z,
    ];

    pub fn from_char(c: char) -> Option<Letter> {
        let upper = c.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            Some(Letter::ALL[(upper as u8 - b'A') as usize])
        } else {
            None
        }
    }

    pub fn as_char(self) -> char {
        (b'A' + self as u8) as char
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_round_trip() {
        for letter in Letter::ALL {
            assert_eq!(Letter::from_char(letter.as_char()), Some(letter));
        }
        assert_eq!(Letter::from_char('q'), Some(Letter::Q));
        assert_eq!(Letter::from_char('7'), None);
    }

    #[test]
    fn serializes_as_single_letter_string() {
        assert_eq!(serde_json::to_string(&Letter::K).unwrap(), "\"K\"");
        let back: Letter = serde_json::from_str("\"K\"").unwrap();
        assert_eq!(back, Letter::K);
    }
}
