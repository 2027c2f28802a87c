//! Attack tables for every piece kind.
//!
//! Leapers use per-square tables. Sliders walk precomputed rays and cut each
//! ray at its first blocker.

use crate::Bitboard;
use toolkit_core::{Color, Square};

const KNIGHT_STEPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_STEPS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Ray directions as (file, rank) deltas. The first four point towards
/// higher square indices, the last four towards lower ones.
const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (-1, 1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (1, -1),
];

const ROOK_DIRECTIONS: [usize; 4] = [0, 2, 4, 6];
const BISHOP_DIRECTIONS: [usize; 4] = [1, 3, 5, 7];

const KNIGHT_ATTACKS: [Bitboard; 64] = step_table(&KNIGHT_STEPS);
const KING_ATTACKS: [Bitboard; 64] = step_table(&KING_STEPS);
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    step_table(&[(-1, 1), (1, 1)]),
    step_table(&[(-1, -1), (1, -1)]),
];
const RAYS: [[Bitboard; 64]; 8] = ray_table();

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` on `sq` captures on.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slide(sq, occupied, &ROOK_DIRECTIONS)
}

pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    slide(sq, occupied, &BISHOP_DIRECTIONS)
}

pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    rook_attacks(sq, occupied) | bishop_attacks(sq, occupied)
}

fn slide(sq: Square, occupied: Bitboard, directions: &[usize]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &dir in directions {
        let ray = RAYS[dir][sq.index() as usize];
        let blockers = ray & occupied;
        let nearest = if dir < 4 {
            blockers.first()
        } else {
            blockers.last()
        };
        attacks |= match nearest {
            // The blocker itself stays attacked; everything beyond it is cut.
            Some(blocker) => ray & !RAYS[dir][blocker.index() as usize],
            None => ray,
        };
    }
    attacks
}

const fn step_table(steps: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let mut bits = 0u64;
        let mut i = 0;
        while i < steps.len() {
            let file = (sq % 8) as i8 + steps[i].0;
            let rank = (sq / 8) as i8 + steps[i].1;
            if file >= 0 && file < 8 && rank >= 0 && rank < 8 {
                bits |= 1u64 << (rank * 8 + file);
            }
            i += 1;
        }
        table[sq] = Bitboard(bits);
        sq += 1;
    }
    table
}

const fn ray_table() -> [[Bitboard; 64]; 8] {
    let mut table = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = DIRECTIONS[dir];
        let mut sq = 0;
        while sq < 64 {
            let mut bits = 0u64;
            let mut file = (sq % 8) as i8 + df;
            let mut rank = (sq / 8) as i8 + dr;
            while file >= 0 && file < 8 && rank >= 0 && rank < 8 {
                bits |= 1u64 << (rank * 8 + file);
                file += df;
                rank += dr;
            }
            table[dir][sq] = Bitboard(bits);
            sq += 1;
        }
        dir += 1;
    }
    table
}
