//! Chess rules and notation.
//!
//! This crate provides:
//! - [`Position`] - board state with FEN import/export and an incrementally
//!   updated Zobrist hash
//! - Legal move generation, check detection and perft in [`movegen`]
//! - SAN parsing and generation in [`san`]
//! - [`Graph`] - a game with make/unmake history and PGN import/export
//! - [`GameTags`] - the PGN tag pairs of a game
//!
//! # Architecture
//!
//! Positions keep a square-indexed board next to per-kind and per-color
//! bitboards. Attack sets for knights, kings and pawns come from tables
//! built at compile time; sliding attacks walk rays over the occupancy.
//! Legal moves are pseudo-legal moves that do not leave the king attacked.
//!
//! # Example
//!
//! ```
//! use chess_toolkit::{GameTags, Graph};
//!
//! let mut graph = Graph::new();
//! for san in ["e4", "e5", "Nf3"] {
//!     let m = graph.move_from_san(san).unwrap();
//!     graph.make_move(m).unwrap();
//! }
//! assert_eq!(graph.ply(), 3);
//! assert_eq!(graph.to_pgn(None), "1. e4 e5 2. Nf3 *\n");
//!
//! let mut tags = GameTags::new();
//! graph.from_pgn("[White \"Morphy, Paul\"]\n1. e4 c5 1-0", Some(&mut tags)).unwrap();
//! assert_eq!(tags.get("White").unwrap(), "Morphy, Paul");
//! assert_eq!(tags.get("Result").unwrap(), "1-0");
//! ```

mod bitboard;
mod graph;
pub mod movegen;
pub mod pgn;
mod position;
pub mod san;
mod tags;
mod zobrist;

pub use bitboard::Bitboard;
pub use graph::{Graph, GraphError, MovesMade, Replay};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{is_check, is_king_attacked, is_square_attacked, legal_moves, MoveList};
pub use pgn::{PgnError, PgnWriterOptions};
pub use position::{Position, Undo};
pub use san::{move_to_san, san_to_move, SanError, SanMove};
pub use tags::{GameTags, TagError, RESULTS, ROSTER};
pub use toolkit_core::{
    CastlingRights, Color, Fen, FenError, File, Move, MoveFlag, Piece, Rank, Square,
};
