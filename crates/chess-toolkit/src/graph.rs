//! Game tracking with move history.
//!
//! A [`Graph`] holds the position a game started from, the current position,
//! and the stack of moves that lead from one to the other. Moves can be taken
//! back one at a time, and the whole line can be exported as PGN.

use std::fmt;
use std::io::BufRead;
use std::ops::ControlFlow;

use thiserror::Error;
use tracing::{debug, trace};

use crate::movegen::{self, perft::perft, MoveList};
use crate::pgn::{self, PgnError, PgnWriterOptions};
use crate::san::{move_to_san, san_to_move, SanError};
use crate::{GameTags, Position, Undo};
use toolkit_core::{FenError, Move};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    #[error("no move to take back")]
    EmptyHistory,
    #[error("invalid FEN: {0}")]
    Fen(#[from] FenError),
    #[error("invalid SAN: {0}")]
    San(#[from] SanError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    root: Position,
    position: Position,
    history: Vec<Undo>,
}

impl Graph {
    /// A graph at the standard starting position.
    pub fn new() -> Self {
        let root = Position::startpos();
        Graph {
            position: root.clone(),
            root,
            history: Vec::new(),
        }
    }

    /// Back to the starting position with no history.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Number of moves made since the root position.
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The position the current game started from.
    pub fn root(&self) -> &Position {
        &self.root
    }

    pub fn position_hash(&self) -> u64 {
        self.position.hash()
    }

    pub fn legal_moves(&self) -> MoveList {
        movegen::legal_moves(&self.position)
    }

    pub fn is_check(&self) -> bool {
        movegen::is_check(&self.position)
    }

    /// Plays `m`, which must be one of [`legal_moves`](Self::legal_moves).
    pub fn make_move(&mut self, m: Move) -> Result<(), GraphError> {
        if !self.legal_moves().contains(&m) {
            return Err(GraphError::IllegalMove(m));
        }
        trace!(ply = self.ply(), %m, "make move");
        let undo = self.position.make_move(m);
        self.history.push(undo);
        Ok(())
    }

    /// Takes back the last move and returns it.
    pub fn unmake_move(&mut self) -> Result<Move, GraphError> {
        let undo = self.history.pop().ok_or(GraphError::EmptyHistory)?;
        self.position.unmake_move(undo);
        trace!(ply = self.ply(), m = %undo.played(), "unmake move");
        Ok(undo.played())
    }

    /// The legal move `san` names in the current position.
    pub fn move_from_san(&self, san: &str) -> Result<Move, GraphError> {
        Ok(san_to_move(&self.position, san)?)
    }

    /// SAN for `m`, a legal move in the current position.
    pub fn move_to_san(&self, m: Move) -> String {
        move_to_san(&self.position, m)
    }

    /// Moves made so far, oldest first. The iterator can be cloned to walk
    /// the history again.
    pub fn for_each_move_made(&self) -> MovesMade<'_> {
        MovesMade {
            inner: self.history.iter(),
        }
    }

    /// Moves made so far together with their SAN, oldest first.
    pub fn replay(&self) -> Replay<'_> {
        Replay {
            position: self.root.clone(),
            moves: self.for_each_move_made(),
        }
    }

    /// Starts a new game from `fen`. On error the graph is unchanged.
    pub fn from_fen(&mut self, fen: &str) -> Result<(), GraphError> {
        let root = Position::from_fen(fen)?;
        debug!(fen, "loaded position");
        self.position = root.clone();
        self.root = root;
        self.history.clear();
        Ok(())
    }

    pub fn to_fen(&self) -> String {
        self.position.to_fen()
    }

    /// The game as PGN, with a tag header when `tags` is given.
    pub fn to_pgn(&self, tags: Option<&GameTags>) -> String {
        self.to_pgn_with(&PgnWriterOptions::default(), tags)
    }

    pub fn to_pgn_with(&self, options: &PgnWriterOptions, tags: Option<&GameTags>) -> String {
        pgn::write(self, options, tags)
    }

    /// Replaces the game with the first game in `text`.
    ///
    /// Tag pairs are stored in `tags` when given. Anything after the first
    /// game's result is not read.
    pub fn from_pgn(&mut self, text: &str, tags: Option<&mut GameTags>) -> Result<(), PgnError> {
        let mut scratch = GameTags::new();
        let tags = tags.unwrap_or(&mut scratch);
        pgn::read_games(self, tags, text.as_bytes(), |_, _| ControlFlow::Break(()))?;
        Ok(())
    }

    /// Streams every game in `reader`, calling `on_game` with each one once
    /// its moves and tags are loaded. Returns the number of games read.
    ///
    /// Without `tags` the callback still sees each game's tag pairs, held in
    /// a private set. The graph and tags are cleared between games, so after
    /// the call they are back to their defaults.
    pub fn from_pgn_reader<R, F>(
        &mut self,
        reader: R,
        tags: Option<&mut GameTags>,
        mut on_game: F,
    ) -> Result<usize, PgnError>
    where
        R: BufRead,
        F: FnMut(&Graph, &GameTags),
    {
        let mut scratch = GameTags::new();
        let tags = tags.unwrap_or(&mut scratch);
        pgn::read_games(self, tags, reader, |graph, tags| {
            on_game(graph, tags);
            ControlFlow::Continue(())
        })
    }

    /// Leaf count of the legal move tree below the current position.
    pub fn perft(&self, depth: u32) -> u64 {
        perft(&self.position, depth)
    }

    /// Calls `visit` at every node `depth` plies below the current position,
    /// with the graph standing on that node. Moves are tried in generation
    /// order and taken back afterwards, so the graph ends where it started.
    /// A depth of zero visits nothing.
    pub fn dfs<F>(&mut self, depth: u32, mut visit: F)
    where
        F: FnMut(&Graph),
    {
        if depth > 0 {
            self.walk(depth, &mut visit);
        }
    }

    fn walk<F>(&mut self, depth: u32, visit: &mut F)
    where
        F: FnMut(&Graph),
    {
        if depth == 0 {
            visit(self);
            return;
        }
        let moves = self.legal_moves();
        for &m in moves.iter() {
            self.history.push(self.position.make_move(m));
            self.walk(depth - 1, visit);
            if let Some(undo) = self.history.pop() {
                self.position.unmake_move(undo);
            }
        }
    }

    /// The position diagram followed by a `Ply N` line.
    pub fn inspect(&self) -> String {
        self.to_string()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\nPly {}", self.position, self.ply())
    }
}

/// Iterator over the moves of a [`Graph`], returned by
/// [`Graph::for_each_move_made`].
#[derive(Debug, Clone)]
pub struct MovesMade<'a> {
    inner: std::slice::Iter<'a, Undo>,
}

impl Iterator for MovesMade<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        self.inner.next().map(Undo::played)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for MovesMade<'_> {}

/// Iterator over `(move, SAN)` pairs, returned by [`Graph::replay`].
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    position: Position,
    moves: MovesMade<'a>,
}

impl Iterator for Replay<'_> {
    type Item = (Move, String);

    fn next(&mut self) -> Option<(Move, String)> {
        let m = self.moves.next()?;
        let san = move_to_san(&self.position, m);
        self.position.make_move(m);
        Some((m, san))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.moves.size_hint()
    }
}
