//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use super::legal_moves;
use crate::Position;
use toolkit_core::Move;

/// Counts the number of leaf nodes at the given depth.
///
/// The walk plays and takes back moves on a single private copy of
/// `position`.
pub fn perft(position: &Position, depth: u32) -> u64 {
    let mut scratch = position.clone();
    count(&mut scratch, depth)
}

fn count(position: &mut Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = legal_moves(position);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0u64;
    for m in &moves {
        let undo = position.make_move(*m);
        nodes += count(position, depth - 1);
        position.unmake_move(undo);
    }
    nodes
}

/// Perft split by root move, in generation order.
/// Useful for finding which subtree disagrees with a reference count.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(Move, u64)> {
    let mut scratch = position.clone();
    let moves = legal_moves(&scratch);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let undo = scratch.make_move(*m);
        let nodes = count(&mut scratch, depth.saturating_sub(1));
        scratch.unmake_move(undo);
        results.push((*m, nodes));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -";
    const POSITION_5: &str = "rnbqkb1r/pp1p1ppp/2p5/4P3/2B5/8/PPP1NnPP/RNBQK2R w KQkq -";

    fn counts(fen: &str, expected: &[u64]) {
        let position = Position::from_fen(fen).unwrap();
        for (depth, nodes) in expected.iter().enumerate() {
            assert_eq!(perft(&position, depth as u32 + 1), *nodes, "{} depth {}", fen, depth + 1);
        }
    }

    #[test]
    fn perft_startpos() {
        let position = Position::startpos();
        assert_eq!(perft(&position, 0), 1);
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
        assert_eq!(perft(&position, 3), 8902);
    }

    // Castling, en passant, promotions and pins in one position.
    #[test]
    fn perft_kiwipete() {
        counts(KIWIPETE, &[48, 2039]);
    }

    // Check evasion, en passant, promotion
    #[test]
    fn perft_position3() {
        counts(POSITION_3, &[14, 191, 2812]);
    }

    #[test]
    fn perft_position4() {
        counts(POSITION_4, &[6, 264]);
    }

    #[test]
    fn perft_position5() {
        counts(POSITION_5, &[42, 1352]);
    }

    #[test]
    fn perft_leaves_position_untouched() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        let before = position.clone();
        perft(&position, 2);
        assert_eq!(position, before);
    }

    #[test]
    fn perft_divide_works() {
        let position = Position::startpos();
        let results = perft_divide(&position, 2);
        assert_eq!(results.len(), 20);
        assert!(results.iter().all(|(_, n)| *n == 20));
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&position, 2));
        assert_eq!(results[0].0.to_uci(), "a2a3");
    }
}
