//! Game history behaviour through the public API.

use chess_toolkit::{Graph, GraphError, MoveFlag, Piece, Position, SanError};
use proptest::prelude::*;

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

fn play(graph: &mut Graph, sans: &[&str]) {
    for san in sans {
        let m = graph.move_from_san(san).unwrap();
        graph.make_move(m).unwrap();
    }
}

#[test]
fn test_start_position() {
    let graph = Graph::new();
    assert_eq!(graph.to_fen(), START);
    assert_eq!(graph.ply(), 0);
    assert_eq!(graph.legal_moves().len(), 20);
    assert_eq!(graph.position_hash(), 3973843602409076421);
    let expected = [
        " 8  r n b q k b n r",
        " 7  p p p p p p p p",
        " 6  - - - - - - - -",
        " 5  - - - - - - - -",
        " 4  - - - - - - - -",
        " 3  - - - - - - - -",
        " 2  P P P P P P P P",
        " 1  R N B Q K B N R",
        "    a b c d e f g h",
        "White KQkq -",
        "Ply 0",
    ]
    .join("\n");
    assert_eq!(graph.inspect(), expected);
}

#[test]
fn test_fen_round_trip() {
    let mut graph = Graph::new();
    for fen in [
        START,
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -",
        "8/8/8/8/3KPpk1/8/8/8 b - e3",
        "4k3/8/8/8/8/8/8/4K3 w - -",
    ] {
        graph.from_fen(fen).unwrap();
        assert_eq!(graph.to_fen(), fen);
    }
}

#[test]
fn test_fen_counters_are_dropped() {
    let mut graph = Graph::new();
    graph
        .from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
        .unwrap();
    assert_eq!(graph.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq -");
}

#[test]
fn test_en_passant_hash() {
    let mut graph = Graph::new();
    graph.from_fen("8/8/8/8/3KPpk1/8/8/8 b - e3").unwrap();
    assert_eq!(graph.position_hash(), 739132817695691147);
    let capture = graph.move_from_san("fxe3").unwrap();
    graph.make_move(capture).unwrap();
    assert_eq!(graph.to_fen(), "8/8/8/8/3K2k1/4p3/8/8 w - -");
    graph.unmake_move().unwrap();
    assert_eq!(graph.position_hash(), 739132817695691147);
}

#[test]
fn test_double_push_without_capturer_sets_no_target() {
    let mut graph = Graph::new();
    play(&mut graph, &["e4"]);
    assert_eq!(
        graph.to_fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq -"
    );
    play(&mut graph, &["d5", "e5", "f5"]);
    assert!(graph.to_fen().ends_with(" w KQkq f6"));
}

#[test]
fn test_unmake_restores_everything() {
    let mut graph = Graph::new();
    let before = graph.clone();
    play(
        &mut graph,
        &["e4", "d5", "exd5", "Nf6", "Bb5+", "c6", "dxc6", "Qb6", "cxb7+", "Kd8", "bxa8=Q"],
    );
    assert_eq!(graph.ply(), 11);
    while graph.ply() > 0 {
        graph.unmake_move().unwrap();
    }
    assert_eq!(graph, before);
    assert_eq!(graph.unmake_move(), Err(GraphError::EmptyHistory));
}

#[test]
fn test_unmake_returns_the_move_made() {
    let mut graph = Graph::new();
    graph
        .from_fen("r3k2r/1P6/8/3pP3/8/8/8/R3K2R w KQkq d6")
        .unwrap();
    for san in ["exd6", "bxa8=Q+", "O-O", "O-O-O"] {
        let fen = graph.to_fen();
        let m = graph.move_from_san(san).unwrap();
        graph.make_move(m).unwrap();
        assert_eq!(graph.unmake_move(), Ok(m), "{}", san);
        assert_eq!(graph.to_fen(), fen);
    }

    let en_passant = graph.move_from_san("exd6").unwrap();
    assert_eq!(en_passant.flag, MoveFlag::EnPassant);
    assert_eq!(en_passant.captured, Some(Piece::Pawn));
    let promotion = graph.move_from_san("bxa8=Q").unwrap();
    graph.make_move(promotion).unwrap();
    let undone = graph.unmake_move().unwrap();
    assert_eq!(undone.captured, Some(Piece::Rook));
    assert_eq!(undone.promotion, Some(Piece::Queen));
    let castle = graph.move_from_san("O-O-O").unwrap();
    graph.make_move(castle).unwrap();
    assert_eq!(graph.unmake_move().map(|m| m.flag), Ok(MoveFlag::CastleQueenside));
    assert_eq!(graph.ply(), 0);
}

#[test]
fn test_crowded_board_without_kings() {
    let mut graph = Graph::new();
    graph
        .from_fen("Q1nQQQQQ/Q1Q5/Q6Q/Q4Q1Q/1Q5Q/Q5Q1/Q7/Q1QQQQ1Q w - -")
        .unwrap();
    let moves = graph.legal_moves();
    assert!(moves.len() > 256, "{}", moves.len());
    assert_eq!(graph.perft(1), moves.len() as u64);
}

#[test]
fn test_castling_moves_rook_and_clears_rights() {
    let mut graph = Graph::new();
    graph.from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq -").unwrap();
    play(&mut graph, &["O-O", "O-O-O"]);
    assert_eq!(graph.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - -");
}

#[test]
fn test_checkmate_has_no_moves() {
    let mut graph = Graph::new();
    play(&mut graph, &["f3", "e5", "g4"]);
    let mate = graph.move_from_san("Qh4").unwrap();
    assert_eq!(graph.move_to_san(mate), "Qh4#");
    graph.make_move(mate).unwrap();
    assert!(graph.is_check());
    assert!(graph.legal_moves().is_empty());
}

#[test]
fn test_san_errors_surface() {
    let graph = Graph::new();
    assert_eq!(
        graph.move_from_san("Ke2"),
        Err(GraphError::San(SanError::NoMatchingMove("Ke2".into())))
    );
    assert!(matches!(
        graph.move_from_san("Zz9"),
        Err(GraphError::San(SanError::InvalidFormat(_)))
    ));
}

#[test]
fn test_promotion_needs_piece() {
    let mut graph = Graph::new();
    graph.from_fen("8/P6k/8/8/8/8/8/K7 w - -").unwrap();
    assert!(matches!(
        graph.move_from_san("a8"),
        Err(GraphError::San(SanError::AmbiguousMove(_)))
    ));
    let m = graph.move_from_san("a8=N").unwrap();
    assert_eq!(graph.move_to_san(m), "a8=N");
}

#[test]
fn test_moves_made_match_replay() {
    let mut graph = Graph::new();
    play(&mut graph, &["Nf3", "Nf6", "c4", "g6", "Nc3", "Bg7", "d4", "O-O"]);
    let moves: Vec<_> = graph.for_each_move_made().collect();
    let replayed: Vec<_> = graph.replay().map(|(m, _)| m).collect();
    assert_eq!(moves, replayed);
    assert_eq!(graph.replay().last().map(|(_, san)| san).as_deref(), Some("O-O"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_keeps_position_consistent(choices in proptest::collection::vec(any::<u8>(), 0..60)) {
        let mut graph = Graph::new();
        let start = graph.clone();

        for choice in choices {
            let moves = graph.legal_moves();
            if moves.is_empty() {
                break;
            }
            let m = moves[choice as usize % moves.len()];
            let san = graph.move_to_san(m);
            prop_assert_eq!(graph.move_from_san(&san), Ok(m));

            let fen_before = graph.to_fen();
            let ply_before = graph.ply();
            graph.make_move(m).unwrap();
            prop_assert_eq!(graph.unmake_move(), Ok(m));
            prop_assert_eq!(graph.to_fen(), fen_before);
            prop_assert_eq!(graph.ply(), ply_before);
            graph.make_move(m).unwrap();

            let position = graph.position();
            prop_assert_eq!(position.hash(), position.compute_hash());
            let reloaded = Position::from_fen(&graph.to_fen()).unwrap();
            prop_assert_eq!(&reloaded, position);
        }

        while graph.ply() > 0 {
            graph.unmake_move().unwrap();
        }
        prop_assert_eq!(graph, start);
    }
}
