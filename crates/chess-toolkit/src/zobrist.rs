//! Zobrist hashing for position identification.
//!
//! A position hash is the XOR of one key per occupied square, one key for the
//! side to move, one for the castling rights and one for the en passant file.
//! The keys come from a fixed additive lagged-Fibonacci generator (degree 63,
//! separation 1, seed 1), so hashes are stable across runs, platforms and
//! versions and can be stored by callers.

use toolkit_core::{CastlingRights, Color, Piece, Square};

const PIECE_CODES: usize = 16;
const PIECE_KEYS: usize = PIECE_CODES * 64;
const TURN_KEYS: usize = PIECE_KEYS;
const CASTLING_KEYS: usize = TURN_KEYS + 2;
const EN_PASSANT_KEYS: usize = CASTLING_KEYS + 16;
const KEY_COUNT: usize = EN_PASSANT_KEYS + 9;

/// All keys, computed at compile time.
static KEYS: [u64; KEY_COUNT] = generate_keys();

/// Generator state: 63 words plus the front and rear taps.
#[derive(Clone, Copy)]
struct Feedback {
    state: [u32; 63],
    front: usize,
    rear: usize,
}

impl Feedback {
    const DEGREE: usize = 63;

    const fn seeded(seed: i64) -> Self {
        let mut state = [0u32; 63];
        state[0] = seed as u32;
        let mut word = seed;
        let mut i = 1;
        while i < Self::DEGREE {
            // Park-Miller minimal standard step, kept in 31 bits.
            word = 16807 * (word % 127773) - 2836 * (word / 127773);
            if word < 0 {
                word += 2147483647;
            }
            state[i] = word as u32;
            i += 1;
        }
        let mut generator = Feedback {
            state,
            front: 1,
            rear: 0,
        };
        let mut warmup = 0;
        while warmup < Self::DEGREE * 10 {
            generator = generator.advance().0;
            warmup += 1;
        }
        generator
    }

    /// Steps the generator, returning the new state and a 31-bit output.
    const fn advance(self) -> (Self, u64) {
        let mut next = self;
        let sum = next.state[next.front].wrapping_add(next.state[next.rear]);
        next.state[next.front] = sum;
        next.front += 1;
        if next.front >= Self::DEGREE {
            next.front = 0;
            next.rear += 1;
        } else {
            next.rear += 1;
            if next.rear >= Self::DEGREE {
                next.rear = 0;
            }
        }
        (next, (sum >> 1) as u64)
    }
}

const fn generate_keys() -> [u64; KEY_COUNT] {
    let mut generator = Feedback::seeded(1);
    let mut keys = [0u64; KEY_COUNT];
    let mut i = 0;
    while i < KEY_COUNT {
        let (after_high, high) = generator.advance();
        let (after_low, low) = after_high.advance();
        generator = after_low;
        keys[i] = (high << 31) | low;
        i += 1;
    }
    keys
}

/// Four-bit code of a man: white pawn 1, king 2, knight 3, queen 4, rook 5,
/// bishop 6, black adds 8.
const fn piece_code(piece: Piece, color: Color) -> usize {
    let code = match piece {
        Piece::Pawn => 1,
        Piece::King => 2,
        Piece::Knight => 3,
        Piece::Queen => 4,
        Piece::Rook => 5,
        Piece::Bishop => 6,
    };
    match color {
        Color::White => code,
        Color::Black => code | 8,
    }
}

#[inline]
pub fn piece_key(piece: Piece, color: Color, square: Square) -> u64 {
    KEYS[piece_code(piece, color) * 64 + square.index() as usize]
}

#[inline]
pub fn turn_key(side_to_move: Color) -> u64 {
    let white_to_move = usize::from(side_to_move == Color::White);
    KEYS[TURN_KEYS + white_to_move]
}

#[inline]
pub fn castling_key(rights: CastlingRights) -> u64 {
    KEYS[CASTLING_KEYS + rights.bits() as usize]
}

/// Key for the en passant file, with slot 0 meaning "no target".
#[inline]
pub fn en_passant_key(target: Option<Square>) -> u64 {
    let slot = target.map_or(0, |sq| sq.file().index() as usize + 1);
    KEYS[EN_PASSANT_KEYS + slot]
}
