//! Move generation.
//!
//! Moves are generated pseudo-legally per piece kind and then filtered by
//! playing each one on a scratch position and checking the mover's king.
//! The resulting order is stable: pawns, knights, bishops, rooks, queens,
//! king, castling, each kind by ascending origin square.

mod attacks;
pub mod perft;

use crate::{Bitboard, Position};
use toolkit_core::{Color, File, Move, MoveFlag, Piece, Rank, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};

/// Moves in generation order.
///
/// Any placement `Position::from_fen` accepts can be generated for, including
/// king-less boards crowded with queens, so the list grows as needed.
#[derive(Clone, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Enough room for the legal moves of any position reachable in a game.
    const TYPICAL_CAPACITY: usize = 218;

    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(Self::TYPICAL_CAPACITY),
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        self.moves.push(m);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn contains(&self, m: &Move) -> bool {
        self.moves.contains(m)
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        self.moves.retain(f);
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Every legal move for the side to move.
pub fn legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    generate_pawn_moves(position, &mut moves);
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
        generate_piece_moves(position, piece, &mut moves);
    }
    generate_castling_moves(position, &mut moves);

    let us = position.side_to_move();
    let mut scratch = position.clone();
    moves.retain(|m| {
        let undo = scratch.make_move(*m);
        let safe = !is_king_attacked(&scratch, us);
        scratch.unmake_move(undo);
        safe
    });
    moves
}

fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move();
    let them = position.color_pieces(us.opposite());
    let occupied = position.occupied();
    let start_rank = if us == Color::White { Rank::R2 } else { Rank::R7 };

    for from in position.pieces_of(Piece::Pawn, us) {
        let Some(one) = from.offset(0, us.forward()) else {
            continue;
        };
        if !occupied.contains(one) {
            push_pawn_move(moves, Move::new(from, one, Piece::Pawn), us);
            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, us.forward()) {
                    if !occupied.contains(two) {
                        moves.push(
                            Move::new(from, two, Piece::Pawn).with_flag(MoveFlag::DoublePush),
                        );
                    }
                }
            }
        }

        for to in pawn_attacks(from, us) & them {
            if let Some((victim, _)) = position.piece_at(to) {
                push_pawn_move(moves, Move::new(from, to, Piece::Pawn).with_capture(victim), us);
            }
        }

        if let Some(target) = position.en_passant() {
            if pawn_attacks(from, us).contains(target) {
                moves.push(
                    Move::new(from, target, Piece::Pawn)
                        .with_capture(Piece::Pawn)
                        .with_flag(MoveFlag::EnPassant),
                );
            }
        }
    }
}

/// Pushes a pawn move, expanding it into four moves on the last rank.
fn push_pawn_move(moves: &mut MoveList, m: Move, us: Color) {
    if m.to.rank() == us.promotion_rank() {
        for promotion in Piece::PROMOTIONS {
            moves.push(m.with_promotion(promotion));
        }
    } else {
        moves.push(m);
    }
}

fn generate_piece_moves(position: &Position, piece: Piece, moves: &mut MoveList) {
    let us = position.side_to_move();
    let ours = position.color_pieces(us);
    let occupied = position.occupied();

    for from in position.pieces_of(piece, us) {
        let targets = match piece {
            Piece::Knight => knight_attacks(from),
            Piece::Bishop => bishop_attacks(from, occupied),
            Piece::Rook => rook_attacks(from, occupied),
            Piece::Queen => queen_attacks(from, occupied),
            Piece::King => king_attacks(from),
            Piece::Pawn => Bitboard::EMPTY,
        } & !ours;
        for to in targets {
            let m = Move::new(from, to, piece);
            moves.push(match position.piece_at(to) {
                Some((victim, _)) => m.with_capture(victim),
                None => m,
            });
        }
    }
}

fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move();
    let rights = position.castling();
    if !(rights.kingside(us) || rights.queenside(us)) {
        return;
    }
    let back = us.home_rank();
    let king_from = Square::new(File::E, back);
    if position.piece_at(king_from) != Some((Piece::King, us))
        || is_square_attacked(position, king_from, us.opposite())
    {
        return;
    }

    let wings = [
        (
            rights.kingside(us),
            MoveFlag::CastleKingside,
            File::G,
            &[File::F, File::G][..],
            &[File::F, File::G][..],
        ),
        (
            rights.queenside(us),
            MoveFlag::CastleQueenside,
            File::C,
            &[File::B, File::C, File::D][..],
            &[File::D, File::C][..],
        ),
    ];
    for (allowed, flag, king_to, between, walked) in wings {
        if !allowed {
            continue;
        }
        let clear = between
            .iter()
            .all(|file| position.piece_at(Square::new(*file, back)).is_none());
        let safe = walked
            .iter()
            .all(|file| !is_square_attacked(position, Square::new(*file, back), us.opposite()));
        if clear && safe {
            moves.push(Move::new(king_from, Square::new(king_to, back), Piece::King).with_flag(flag));
        }
    }
}

/// True when any piece of `by` attacks `sq`.
pub fn is_square_attacked(position: &Position, sq: Square, by: Color) -> bool {
    let occupied = position.occupied();
    let queens = position.pieces_of(Piece::Queen, by);

    (pawn_attacks(sq, by.opposite()) & position.pieces_of(Piece::Pawn, by)).any()
        || (knight_attacks(sq) & position.pieces_of(Piece::Knight, by)).any()
        || (king_attacks(sq) & position.pieces_of(Piece::King, by)).any()
        || (bishop_attacks(sq, occupied) & (position.pieces_of(Piece::Bishop, by) | queens)).any()
        || (rook_attacks(sq, occupied) & (position.pieces_of(Piece::Rook, by) | queens)).any()
}

/// True when the king of `color` is attacked. A side without a king is
/// never in check.
pub fn is_king_attacked(position: &Position, color: Color) -> bool {
    position
        .king_square(color)
        .is_some_and(|king| is_square_attacked(position, king, color.opposite()))
}

/// True when the side to move is in check.
pub fn is_check(position: &Position) -> bool {
    is_king_attacked(position, position.side_to_move())
}
