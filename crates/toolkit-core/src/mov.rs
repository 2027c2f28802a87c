//! Move representation.

use crate::{Piece, Square};
use std::fmt;

/// Special-move marker carried by every [`Move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoveFlag {
    #[default]
    Normal,
    /// Pawn advancing two squares from its starting rank.
    DoublePush,
    /// O-O.
    CastleKingside,
    /// O-O-O.
    CastleQueenside,
    /// Pawn capturing onto the en passant target square.
    EnPassant,
}

impl MoveFlag {
    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A fully described move.
///
/// Besides the two squares a move records what moved, what it took, and what
/// a pawn turned into. That is enough to undo it without looking at the board
/// again, and two moves compare equal only when every field matches.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promotion: Option<Piece>,
    pub flag: MoveFlag,
}

impl Move {
    /// A quiet move of `piece` with no side effects.
    #[inline]
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move {
            from,
            to,
            piece,
            captured: None,
            promotion: None,
            flag: MoveFlag::Normal,
        }
    }

    #[inline]
    pub const fn with_capture(mut self, captured: Piece) -> Self {
        self.captured = Some(captured);
        self
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion: Piece) -> Self {
        self.promotion = Some(promotion);
        self
    }

    #[inline]
    pub const fn with_flag(mut self, flag: MoveFlag) -> Self {
        self.flag = flag;
        self
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        self.flag.is_castling()
    }

    /// Coordinate form, e.g. `e2e4` or `e7e8q`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({} {}", self, self.piece)?;
        if let Some(captured) = self.captured {
            write!(f, " x{}", captured)?;
        }
        if self.flag != MoveFlag::Normal {
            write!(f, " {:?}", self.flag)?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
