//! Move generator validation against published perft counts.
//!
//! The deepest counts take a while in debug builds. Run them with:
//! `cargo test -p chess-toolkit --release --test perft -- --ignored`

use chess_toolkit::{legal_moves, move_to_san, perft, san_to_move, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq -";
const POSITION_5: &str = "rnbqkb1r/pp1p1ppp/2p5/4P3/2B5/8/PPP1NnPP/RNBQK2R w KQkq -";

fn assert_perft(fen: &str, depth: u32, expected: u64) {
    let position = Position::from_fen(fen).expect("valid FEN");
    assert_eq!(perft(&position, depth), expected, "{} at depth {}", fen, depth);
}

#[test]
fn test_startpos_depth_4() {
    assert_perft(Position::startpos().to_fen().as_str(), 4, 197_281);
}

#[test]
#[ignore = "slow in debug builds"]
fn test_startpos_depth_5() {
    assert_perft(Position::startpos().to_fen().as_str(), 5, 4_865_609);
}

#[test]
fn test_kiwipete_depth_3() {
    assert_perft(KIWIPETE, 3, 97_862);
}

#[test]
fn test_position_3_depth_4() {
    assert_perft(POSITION_3, 4, 43_238);
}

#[test]
fn test_position_4_depth_3() {
    assert_perft(POSITION_4, 3, 9_467);
}

#[test]
fn test_mirrored_position_4_depth_3() {
    assert_perft(
        "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ -",
        3,
        9_467,
    );
}

#[test]
fn test_position_5_depth_3() {
    assert_perft(POSITION_5, 3, 53_392);
}

#[test]
fn test_san_round_trip_to_depth_2() {
    fn walk(position: &mut Position, depth: u32, checked: &mut usize) {
        if depth == 0 {
            return;
        }
        for m in &legal_moves(position) {
            let san = move_to_san(position, *m);
            assert_eq!(
                san_to_move(position, &san),
                Ok(*m),
                "{} in {}",
                san,
                position.to_fen()
            );
            *checked += 1;
            let undo = position.make_move(*m);
            walk(position, depth - 1, checked);
            position.unmake_move(undo);
        }
    }

    let mut position = Position::from_fen(POSITION_4).unwrap();
    let mut checked = 0;
    walk(&mut position, 2, &mut checked);
    assert_eq!(checked, 6 + 264);
}
