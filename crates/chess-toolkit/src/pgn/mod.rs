//! Portable Game Notation.
//!
//! Import goes through [`Graph::from_pgn`](crate::Graph::from_pgn) and
//! [`Graph::from_pgn_reader`](crate::Graph::from_pgn_reader), export through
//! [`Graph::to_pgn`](crate::Graph::to_pgn).

mod lexer;
mod reader;
mod writer;

use std::io;
use thiserror::Error;

pub(crate) use reader::read_games;
pub(crate) use writer::write;
pub use writer::PgnWriterOptions;

#[derive(Debug, Error)]
pub enum PgnError {
    /// Lines and columns are 1-based. `game` counts games from 1 within the
    /// input being read.
    #[error("syntax error in game {game} on line {line} column {column}: {token:?} ({reason})")]
    Syntax {
        game: usize,
        line: usize,
        column: usize,
        token: String,
        reason: String,
    },
    #[error("failed to read PGN input: {0}")]
    Io(#[from] io::Error),
}
