//! Castling rights.

use crate::{Color, Square};
use std::fmt;

/// The four castling flags packed as `K=1, Q=2, k=4, q=8`.
///
/// The raw value doubles as the index into the castling hash keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;

    pub const NONE: CastlingRights = CastlingRights(0);
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    const LETTERS: [(char, u8); 4] = [
        ('K', Self::WHITE_KINGSIDE),
        ('Q', Self::WHITE_QUEENSIDE),
        ('k', Self::BLACK_KINGSIDE),
        ('q', Self::BLACK_QUEENSIDE),
    ];

    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_flag(color) != 0
    }

    #[inline]
    pub const fn queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_flag(color) != 0
    }

    pub const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    pub const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Rights lost when a piece leaves or lands on `square`.
    ///
    /// Moving a king from its home square drops both of its flags; moving
    /// from or capturing on a rook's corner drops that wing.
    pub const fn lost_by_touching(square: Square) -> u8 {
        match square.index() {
            4 => Self::WHITE_KINGSIDE | Self::WHITE_QUEENSIDE,
            7 => Self::WHITE_KINGSIDE,
            0 => Self::WHITE_QUEENSIDE,
            60 => Self::BLACK_KINGSIDE | Self::BLACK_QUEENSIDE,
            63 => Self::BLACK_KINGSIDE,
            56 => Self::BLACK_QUEENSIDE,
            _ => 0,
        }
    }

    #[inline]
    pub fn remove(&mut self, flags: u8) {
        self.0 &= !flags;
    }

    /// Parses the FEN castling field. `-` means no rights.
    pub fn from_fen_field(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::NONE);
        }
        if field.is_empty() {
            return None;
        }
        let mut bits = 0u8;
        for c in field.chars() {
            let (_, flag) = Self::LETTERS.iter().find(|(letter, _)| *letter == c)?;
            if bits & flag != 0 {
                return None;
            }
            bits |= flag;
        }
        Some(CastlingRights(bits))
    }
}

impl fmt::Display for CastlingRights {
    /// Writes `KQkq` letters in canonical order, or `-`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (letter, flag) in Self::LETTERS {
            if self.0 & flag != 0 {
                write!(f, "{}", letter)?;
            }
        }
        Ok(())
    }
}
