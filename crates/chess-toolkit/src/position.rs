//! Chess position representation.
//!
//! A [`Position`] keeps a square-indexed board alongside per-kind and
//! per-color bitboards, plus a Zobrist hash that every mutation updates in
//! place. Moves are applied with [`Position::make_move`], which hands back an
//! [`Undo`] record that [`Position::unmake_move`] uses to restore the previous
//! state exactly.

use std::fmt;

use toolkit_core::{
    Board, CastlingRights, Color, Fen, FenError, File, Move, MoveFlag, Piece, Square,
};

use crate::{zobrist, Bitboard};

/// State needed to take a move back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    played: Move,
    castling: CastlingRights,
    en_passant: Option<Square>,
    side_to_move: Color,
}

impl Undo {
    /// The move this record reverts.
    #[inline]
    pub fn played(&self) -> Move {
        self.played
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    pieces: [Bitboard; 6],
    colors: [Bitboard; 2],
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    hash: u64,
}

impl Position {
    pub fn startpos() -> Self {
        Self::from_record(Fen::default())
    }

    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Fen::parse(fen).map(Self::from_record)
    }

    /// Replaces this position with the one described by `fen`.
    ///
    /// Nothing changes when the text does not parse.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Self::from_fen(fen)?;
        Ok(())
    }

    fn from_record(record: Fen) -> Self {
        let mut position = Position {
            board: [None; 64],
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: record.side_to_move,
            castling: record.castling,
            en_passant: record.en_passant,
            hash: 0,
        };
        for sq in Square::all() {
            if let Some((piece, color)) = record.board[sq.index() as usize] {
                position.put(sq, piece, color);
            }
        }
        position.hash = position.compute_hash();
        position
    }

    /// Four-field FEN: placement, side, castling, en passant.
    pub fn to_fen(&self) -> String {
        Fen {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
        }
        .to_string()
    }

    /// Incrementally maintained Zobrist hash.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Hash recomputed from scratch. Always equal to [`Position::hash`].
    pub fn compute_hash(&self) -> u64 {
        let mut hash = zobrist::turn_key(self.side_to_move)
            ^ zobrist::castling_key(self.castling)
            ^ zobrist::en_passant_key(self.en_passant);
        for sq in Square::all() {
            if let Some((piece, color)) = self.piece_at(sq) {
                hash ^= zobrist::piece_key(piece, color, sq);
            }
        }
        hash
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn is_white_to_move(&self) -> bool {
        self.side_to_move == Color::White
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        self.board[sq.index() as usize]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    #[inline]
    pub fn color_pieces(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(Piece::King, color).first()
    }

    /// Board diagram followed by the side, castling and en passant line.
    ///
    /// ```text
    ///  8  r n b q k b n r
    ///  ...
    ///  1  R N B Q K B N R
    ///     a b c d e f g h
    /// White KQkq -
    /// ```
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    /// Applies a move generated for this position.
    ///
    /// The move is trusted; callers that accept outside input check it
    /// against the legal move list first.
    pub fn make_move(&mut self, m: Move) -> Undo {
        let us = self.side_to_move;
        let undo = Undo {
            played: m,
            castling: self.castling,
            en_passant: self.en_passant,
            side_to_move: us,
        };

        if m.flag == MoveFlag::EnPassant {
            self.remove(Square::new(m.to.file(), m.from.rank()));
        } else if m.captured.is_some() {
            self.remove(m.to);
        }
        self.remove(m.from);
        self.put(m.to, m.promotion.unwrap_or(m.piece), us);

        if let Some((rook_from, rook_to)) = castling_rook_squares(m.flag, us) {
            self.remove(rook_from);
            self.put(rook_to, Piece::Rook, us);
        }

        let mut rights = self.castling;
        rights.remove(
            CastlingRights::lost_by_touching(m.from) | CastlingRights::lost_by_touching(m.to),
        );
        self.set_castling(rights);

        let target = if m.flag == MoveFlag::DoublePush && self.enemy_pawn_beside(m.to, us) {
            Some(Square::new(m.to.file(), us.opposite().en_passant_rank()))
        } else {
            None
        };
        self.set_en_passant(target);

        self.set_side_to_move(us.opposite());
        undo
    }

    /// Reverts the move recorded in `undo`, which must be the last one made.
    pub fn unmake_move(&mut self, undo: Undo) {
        let m = undo.played;
        let us = undo.side_to_move;

        if let Some((rook_from, rook_to)) = castling_rook_squares(m.flag, us) {
            self.remove(rook_to);
            self.put(rook_from, Piece::Rook, us);
        }

        self.remove(m.to);
        self.put(m.from, m.piece, us);
        if let Some(captured) = m.captured {
            let square = if m.flag == MoveFlag::EnPassant {
                Square::new(m.to.file(), m.from.rank())
            } else {
                m.to
            };
            self.put(square, captured, us.opposite());
        }

        self.set_castling(undo.castling);
        self.set_en_passant(undo.en_passant);
        self.set_side_to_move(us);
    }

    /// An en passant target is only recorded when a capture could follow.
    fn enemy_pawn_beside(&self, sq: Square, us: Color) -> bool {
        [-1, 1].into_iter().filter_map(|df| sq.offset(df, 0)).any(|side| {
            self.piece_at(side) == Some((Piece::Pawn, us.opposite()))
        })
    }

    fn put(&mut self, sq: Square, piece: Piece, color: Color) {
        self.board[sq.index() as usize] = Some((piece, color));
        self.pieces[piece.index()].set(sq);
        self.colors[color.index()].set(sq);
        self.hash ^= zobrist::piece_key(piece, color, sq);
    }

    fn remove(&mut self, sq: Square) {
        if let Some((piece, color)) = self.board[sq.index() as usize].take() {
            self.pieces[piece.index()].clear(sq);
            self.colors[color.index()].clear(sq);
            self.hash ^= zobrist::piece_key(piece, color, sq);
        }
    }

    fn set_castling(&mut self, rights: CastlingRights) {
        self.hash ^= zobrist::castling_key(self.castling) ^ zobrist::castling_key(rights);
        self.castling = rights;
    }

    fn set_en_passant(&mut self, target: Option<Square>) {
        self.hash ^= zobrist::en_passant_key(self.en_passant) ^ zobrist::en_passant_key(target);
        self.en_passant = target;
    }

    fn set_side_to_move(&mut self, side: Color) {
        self.hash ^= zobrist::turn_key(self.side_to_move) ^ zobrist::turn_key(side);
        self.side_to_move = side;
    }
}

/// Rook origin and destination for a castling move.
fn castling_rook_squares(flag: MoveFlag, color: Color) -> Option<(Square, Square)> {
    let back = color.home_rank();
    let (from, to) = match flag {
        MoveFlag::CastleKingside => (File::H, File::F),
        MoveFlag::CastleQueenside => (File::A, File::D),
        _ => return None,
    };
    Some((Square::new(from, back), Square::new(to, back)))
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, " {} ", rank + 1)?;
            for file in 0..8u8 {
                let c = Square::from_coords(file as i8, rank as i8)
                    .and_then(|sq| self.piece_at(sq))
                    .map_or('-', |(piece, color)| piece.to_fen_char(color));
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        writeln!(f, "    a b c d e f g h")?;
        write!(f, "{} {} ", self.side_to_move, self.castling)?;
        match self.en_passant {
            Some(sq) => write!(f, "{}", sq),
            None => f.write_str("-"),
        }
    }
}
