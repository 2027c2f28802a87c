//! Board vocabulary for the chess toolkit.
//!
//! This crate holds the plain data types shared by the rules crate:
//! - [`Piece`] and [`Color`] for the men on the board
//! - [`Square`], [`File`], and [`Rank`] for coordinates
//! - [`Move`] for a fully described, reversible move
//! - [`CastlingRights`] and the four-field [`Fen`] record

mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use color::Color;
pub use fen::{Board, Fen, FenError};
pub use mov::{Move, MoveFlag};
pub use piece::Piece;
pub use square::{File, ParseSquareError, Rank, Square};
