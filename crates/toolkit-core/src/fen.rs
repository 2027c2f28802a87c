//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! Only the four fields that describe a position are modelled: placement,
//! side to move, castling rights and en passant target. Trailing half-move
//! and full-move counters are accepted on input and dropped.

use crate::{CastlingRights, Color, Piece, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 4 to 6 fields, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid move counter: {0}")]
    InvalidMoveCounter(String),
}

/// Piece placement indexed by square.
pub type Board = [Option<(Piece, Color)>; 64];

/// A decoded FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if !(4..=6).contains(&fields.len()) {
            return Err(FenError::InvalidPartCount(fields.len()));
        }
        for counter in &fields[4..] {
            if counter.parse::<u32>().is_err() {
                return Err(FenError::InvalidMoveCounter(counter.to_string()));
            }
        }

        let board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = CastlingRights::from_fen_field(fields[2])
            .ok_or_else(|| FenError::InvalidCastlingRights(fields[2].to_string()))?;
        check_castling_pieces(&board, castling)?;

        let en_passant = match fields[3] {
            "-" => None,
            name => {
                let square = Square::from_algebraic(name)
                    .filter(|sq| sq.rank() == side_to_move.en_passant_rank())
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(name.to_string()))?;
                Some(square)
            }
        };

        Ok(Fen {
            board,
            side_to_move,
            castling,
            en_passant,
        })
    }
}

impl Default for Fen {
    fn default() -> Self {
        let mut board = [None; 64];
        let back = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back.into_iter().enumerate() {
            board[file] = Some((piece, Color::White));
            board[8 + file] = Some((Piece::Pawn, Color::White));
            board[48 + file] = Some((Piece::Pawn, Color::Black));
            board[56 + file] = Some((piece, Color::Black));
        }
        Fen {
            board,
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
        }
    }
}

impl fmt::Display for Fen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.board[rank * 8 + file] {
                    Some((piece, color)) => {
                        if empty > 0 {
                            write!(f, "{}", empty)?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.to_fen_char(color))?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{}", empty)?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }
        write!(f, " {} {} ", self.side_to_move.fen_char(), self.castling)?;
        match self.en_passant {
            Some(square) => write!(f, "{}", square),
            None => f.write_str("-"),
        }
    }
}

fn parse_placement(placement: &str) -> Result<Board, FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            rows.len()
        )));
    }

    let mut board = [None; 64];
    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row;
        let mut file = 0usize;
        for c in text.chars() {
            let width = match c {
                '1'..='8' => c as usize - '0' as usize,
                _ => {
                    let occupant = Piece::from_fen_char(c).ok_or_else(|| {
                        FenError::InvalidPiecePlacement(format!(
                            "invalid character '{}' in rank {}",
                            c,
                            rank + 1
                        ))
                    })?;
                    if file < 8 {
                        board[rank * 8 + file] = Some(occupant);
                    }
                    1
                }
            };
            file += width;
            if file > 8 {
                break;
            }
        }
        if file != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} does not have 8 squares",
                rank + 1
            )));
        }
    }
    Ok(board)
}

/// Each castling letter needs its king and rook still on their home squares.
fn check_castling_pieces(board: &Board, castling: CastlingRights) -> Result<(), FenError> {
    for color in Color::BOTH {
        let back = color.home_rank().index() as usize * 8;
        let wings = [
            (castling.kingside(color), back + 7),
            (castling.queenside(color), back),
        ];
        for (granted, rook_square) in wings {
            if !granted {
                continue;
            }
            if board[back + 4] != Some((Piece::King, color))
                || board[rook_square] != Some((Piece::Rook, color))
            {
                return Err(FenError::InvalidCastlingRights(format!(
                    "{} has no king and rook on their home squares",
                    castling
                )));
            }
        }
    }
    Ok(())
}
