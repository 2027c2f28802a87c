//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! SAN is the standard way to record chess moves in human-readable form.
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1"

use crate::movegen::{is_check, legal_moves};
use crate::Position;
use std::str::FromStr;
use thiserror::Error;
use toolkit_core::{File, Move, MoveFlag, Piece, Rank, Square};

/// Error type for SAN parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The SAN string is empty.
    #[error("empty SAN string")]
    Empty,
    /// The SAN string has invalid format.
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),
    /// No legal move matches the SAN.
    #[error("no legal move matches: {0}")]
    NoMatchingMove(String),
    /// Multiple legal moves match the SAN (ambiguous).
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),
}

/// A SAN token split into its parts, before it is matched against a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SanMove {
    Castle {
        kingside: bool,
    },
    /// Everything else. `capture` records whether an `x` was written; it is
    /// not checked against the board.
    Normal {
        piece: Piece,
        from_file: Option<File>,
        from_rank: Option<Rank>,
        capture: bool,
        to: Square,
        promotion: Option<Piece>,
    },
}

impl SanMove {
    /// True when `m` is a move this token describes.
    pub fn matches(&self, m: &Move) -> bool {
        match *self {
            SanMove::Castle { kingside } => {
                let flag = if kingside {
                    MoveFlag::CastleKingside
                } else {
                    MoveFlag::CastleQueenside
                };
                m.flag == flag
            }
            SanMove::Normal {
                piece,
                from_file,
                from_rank,
                to,
                promotion,
                ..
            } => {
                m.to == to
                    && m.piece == piece
                    && !m.is_castling()
                    && from_file.map_or(true, |file| m.from.file() == file)
                    && from_rank.map_or(true, |rank| m.from.rank() == rank)
                    && promotion.map_or(true, |p| m.promotion == Some(p))
            }
        }
    }
}

impl FromStr for SanMove {
    type Err = SanError;

    /// Grammar: `O-O` | `O-O-O` |
    /// `[Piece][file][rank][x|-]<file><rank>[=Piece]`, optionally followed by
    /// any of `+ # ! ?`. Zeros are accepted for the castling letters.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SanError::Empty);
        }
        let body = text.trim_end_matches(['+', '#', '!', '?']);
        let invalid = || SanError::InvalidFormat(text.to_string());

        match body {
            "O-O" | "0-0" => return Ok(SanMove::Castle { kingside: true }),
            "O-O-O" | "0-0-0" => return Ok(SanMove::Castle { kingside: false }),
            _ => {}
        }

        let mut chars = body.chars().peekable();
        let piece = match chars.peek().copied() {
            Some(c) if c.is_ascii_uppercase() => {
                chars.next();
                Piece::from_letter(c).ok_or_else(invalid)?
            }
            _ => Piece::Pawn,
        };

        let mut file = chars.next_if(|c| File::from_char(*c).is_some()).and_then(File::from_char);
        let mut rank = chars.next_if(|c| Rank::from_char(*c).is_some()).and_then(Rank::from_char);
        let capture = chars.next_if_eq(&'x').is_some();
        let separated = capture || chars.next_if_eq(&'-').is_some();

        let mut from_file = None;
        let mut from_rank = None;
        match chars.next_if(|c| File::from_char(*c).is_some()).and_then(File::from_char) {
            Some(second) => {
                from_file = file.replace(second);
                match chars.next_if(|c| Rank::from_char(*c).is_some()).and_then(Rank::from_char) {
                    Some(second) => from_rank = rank.replace(second),
                    None => return Err(invalid()),
                }
            }
            None if separated => return Err(invalid()),
            None => {}
        }
        let (Some(to_file), Some(to_rank)) = (file, rank) else {
            return Err(invalid());
        };

        let promotion = if chars.next_if_eq(&'=').is_some() {
            match chars.next().and_then(Piece::from_letter) {
                Some(p) if p != Piece::Pawn && p != Piece::King => Some(p),
                _ => return Err(invalid()),
            }
        } else {
            None
        };
        if chars.next().is_some() {
            return Err(invalid());
        }

        Ok(SanMove::Normal {
            piece,
            from_file,
            from_rank,
            capture,
            to: Square::new(to_file, to_rank),
            promotion,
        })
    }
}

/// Converts a move to SAN notation given the current position.
///
/// The position must be the state BEFORE the move is made.
/// The move must be legal in the given position.
pub fn move_to_san(position: &Position, m: Move) -> String {
    let mut san = String::new();

    match m.flag {
        MoveFlag::CastleKingside => san.push_str("O-O"),
        MoveFlag::CastleQueenside => san.push_str("O-O-O"),
        _ => {
            if m.piece == Piece::Pawn {
                // Pawn captures include the source file
                if m.is_capture() {
                    san.push(m.from.file().to_char());
                }
            } else {
                san.push(m.piece.letter());
                san.push_str(&disambiguation(position, m));
            }
            if m.is_capture() {
                san.push('x');
            }
            san.push_str(&m.to.to_algebraic());
            if let Some(promotion) = m.promotion {
                san.push('=');
                san.push(promotion.letter());
            }
        }
    }

    push_check_suffix(position, m, &mut san);
    san
}

/// Parses a SAN string and returns the corresponding legal move.
pub fn san_to_move(position: &Position, san: &str) -> Result<Move, SanError> {
    let parsed: SanMove = san.parse()?;
    let moves = legal_moves(position);
    let mut matching = moves.iter().filter(|m| parsed.matches(m));

    match (matching.next(), matching.next()) {
        (Some(m), None) => Ok(*m),
        (None, _) => Err(SanError::NoMatchingMove(san.trim().to_string())),
        (Some(_), Some(_)) => Err(SanError::AmbiguousMove(san.trim().to_string())),
    }
}

/// Origin file, rank, or both; only what is needed to tell `m` apart from
/// other pieces of the same kind that can reach the same square.
fn disambiguation(position: &Position, m: Move) -> String {
    let moves = legal_moves(position);
    let rivals: Vec<Square> = moves
        .iter()
        .filter(|other| other.piece == m.piece && other.to == m.to && other.from != m.from)
        .map(|other| other.from)
        .collect();

    if rivals.is_empty() {
        return String::new();
    }
    let shares_file = rivals.iter().any(|sq| sq.file() == m.from.file());
    let shares_rank = rivals.iter().any(|sq| sq.rank() == m.from.rank());

    let mut out = String::with_capacity(2);
    if !shares_file || shares_rank {
        out.push(m.from.file().to_char());
    }
    if shares_file {
        out.push(m.from.rank().to_char());
    }
    out
}

fn push_check_suffix(position: &Position, m: Move, san: &mut String) {
    let mut after = position.clone();
    after.make_move(m);
    if is_check(&after) {
        san.push(if legal_moves(&after).is_empty() { '#' } else { '+' });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn find(position: &Position, uci: &str) -> Move {
        legal_moves(position)
            .iter()
            .copied()
            .find(|m| m.to_uci() == uci)
            .unwrap()
    }

    #[test]
    fn san_pawn_push() {
        let pos = Position::startpos();
        assert_eq!(move_to_san(&pos, find(&pos, "e2e4")), "e4");
    }

    #[test]
    fn san_knight_move() {
        let pos = Position::startpos();
        assert_eq!(move_to_san(&pos, find(&pos, "g1f3")), "Nf3");
    }

    #[test]
    fn san_pawn_capture() {
        let pos =
            Position::from_fen("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "e4d5")), "exd5");
    }

    #[test]
    fn san_en_passant() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "e5d6")), "exd6");
    }

    #[test]
    fn san_castling() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "e1g1")), "O-O");
        assert_eq!(move_to_san(&pos, find(&pos, "e1c1")), "O-O-O");
    }

    #[test]
    fn san_promotion() {
        let pos = Position::from_fen("8/P7/8/8/8/8/8/4K1k1 w - -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "a7a8q")), "a8=Q");
        assert_eq!(move_to_san(&pos, find(&pos, "a7a8n")), "a8=N");
    }

    #[test]
    fn san_disambiguation_by_file() {
        let pos = Position::from_fen("7k/8/8/8/8/8/8/1N1K1N2 w - -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "b1d2")), "Nbd2");
        assert_eq!(move_to_san(&pos, find(&pos, "f1d2")), "Nfd2");
        assert_eq!(move_to_san(&pos, find(&pos, "b1c3")), "Nc3");
    }

    #[test]
    fn san_disambiguation_by_rank() {
        let pos = Position::from_fen("R7/7k/8/8/8/8/8/R3K3 w - -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "a1a4")), "R1a4");
        assert_eq!(move_to_san(&pos, find(&pos, "a8a4")), "R8a4");
    }

    #[test]
    fn san_disambiguation_by_square() {
        let pos = Position::from_fen("2k5/8/8/8/4Q2Q/8/8/K6Q w - -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "h4e1")), "Qh4e1");
        assert_eq!(move_to_san(&pos, find(&pos, "e4e1")), "Qee1");
        assert_eq!(move_to_san(&pos, find(&pos, "h1e1")), "Q1e1");
    }

    #[test]
    fn san_check_and_mate() {
        let pos = Position::from_fen("7k/8/5K2/8/8/8/8/6Q1 w - -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "g1g7")), "Qg7#");
        assert_eq!(move_to_san(&pos, find(&pos, "g1g8")), "Qg8+");
        assert_eq!(move_to_san(&pos, find(&pos, "g1h2")), "Qh2+");
        assert_eq!(move_to_san(&pos, find(&pos, "g1g2")), "Qg2");

        let pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R3K3 w Q -").unwrap();
        assert_eq!(move_to_san(&pos, find(&pos, "a1a8")), "Ra8#");
        assert_eq!(move_to_san(&pos, find(&pos, "a1a7")), "Ra7");
    }

    #[test]
    fn parse_tokens() {
        assert_eq!("O-O+".parse(), Ok(SanMove::Castle { kingside: true }));
        assert_eq!("0-0-0".parse(), Ok(SanMove::Castle { kingside: false }));
        assert_eq!(
            "Nbxd2!?".parse(),
            Ok(SanMove::Normal {
                piece: Piece::Knight,
                from_file: Some(File::B),
                from_rank: None,
                capture: true,
                to: sq("d2"),
                promotion: None,
            })
        );
        assert_eq!(
            "e2-e4".parse(),
            Ok(SanMove::Normal {
                piece: Piece::Pawn,
                from_file: Some(File::E),
                from_rank: Some(Rank::R2),
                capture: false,
                to: sq("e4"),
                promotion: None,
            })
        );
        assert_eq!("".parse::<SanMove>(), Err(SanError::Empty));
        for bad in ["xyz", "Ze4", "e", "e4x", "Nx", "e8=K", "e8=", "e4e", "e4 junk"] {
            assert!(
                matches!(bad.parse::<SanMove>(), Err(SanError::InvalidFormat(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn parse_san_moves() {
        let pos = Position::startpos();
        assert_eq!(san_to_move(&pos, "e4").unwrap(), find(&pos, "e2e4"));
        assert_eq!(san_to_move(&pos, "Nf3").unwrap(), find(&pos, "g1f3"));
        assert_eq!(san_to_move(&pos, "Pe4").unwrap(), find(&pos, "e2e4"));
        assert_eq!(san_to_move(&pos, "e2-e4").unwrap(), find(&pos, "e2e4"));
        assert_eq!(san_to_move(&pos, "Ng1-f3").unwrap(), find(&pos, "g1f3"));
        assert_eq!(san_to_move(&pos, "Kg1"), Err(SanError::NoMatchingMove("Kg1".into())));
    }

    #[test]
    fn parse_san_castling() {
        let pos = Position::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq -").unwrap();
        assert_eq!(san_to_move(&pos, "O-O").unwrap().flag, MoveFlag::CastleKingside);
        assert_eq!(san_to_move(&pos, "0-0-0").unwrap().flag, MoveFlag::CastleQueenside);
    }

    #[test]
    fn parse_san_with_suffix() {
        let pos = Position::from_fen("7k/8/5K2/8/8/8/8/6Q1 w - -").unwrap();
        assert_eq!(san_to_move(&pos, "Qg7#").unwrap().to, sq("g7"));
        assert_eq!(san_to_move(&pos, "Qg2!?").unwrap().to, sq("g2"));
    }

    #[test]
    fn parse_san_errors() {
        let pos = Position::startpos();
        assert_eq!(san_to_move(&pos, "  "), Err(SanError::Empty));
        assert_eq!(san_to_move(&pos, "Ke4"), Err(SanError::NoMatchingMove("Ke4".into())));
        assert_eq!(san_to_move(&pos, "O-O"), Err(SanError::NoMatchingMove("O-O".into())));
        assert!(matches!(san_to_move(&pos, "xyz"), Err(SanError::InvalidFormat(_))));

        let pos = Position::from_fen("7k/8/8/8/8/8/8/1N1K1N2 w - -").unwrap();
        assert_eq!(san_to_move(&pos, "Nd2"), Err(SanError::AmbiguousMove("Nd2".into())));
        assert!(san_to_move(&pos, "Nfd2").is_ok());
    }

    #[test]
    fn promotion_needs_a_piece() {
        let pos = Position::from_fen("8/P7/8/8/8/8/8/4K1k1 w - -").unwrap();
        assert!(matches!(san_to_move(&pos, "a8"), Err(SanError::AmbiguousMove(_))));
        assert_eq!(san_to_move(&pos, "a8=R").unwrap().promotion, Some(Piece::Rook));
    }

    #[test]
    fn san_roundtrip() {
        let fens = [
            Position::startpos().to_fen(),
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -".to_string(),
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -".to_string(),
        ];
        for fen in fens {
            let pos = Position::from_fen(&fen).unwrap();
            for m in &legal_moves(&pos) {
                let san = move_to_san(&pos, *m);
                assert_eq!(san_to_move(&pos, &san), Ok(*m), "roundtrip failed for {}", san);
            }
        }
    }
}
