//! Public-API board tests: playing through games, boundary validation,
//! packed-move round trips.

use skewer::board::{EngineError, Move, MoveList, Position};

#[test]
fn plays_a_short_game_through_the_boundary() {
    let mut pos = Position::new_initial();
    // a few moves of an Italian game
    for notation in [
        "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1", "f8c5",
    ] {
        let mv = pos.parse_move(notation).unwrap();
        pos.play_move(mv).unwrap();
    }
    assert_eq!(pos.half_move_index(), 8);
    assert!(pos.whites_turn());
    // both sides castled or developed; the position must round-trip
    let fen = pos.to_fen();
    assert_eq!(Position::from_fen(&fen).unwrap().to_fen(), fen);
}

#[test]
fn boundary_rejects_stale_moves() {
    let mut pos = Position::new_initial();
    let e4 = pos.parse_move("e2e4").unwrap();
    pos.play_move(e4).unwrap();
    match pos.play_move(e4) {
        Err(EngineError::InvalidMove { notation }) => assert_eq!(notation, "e2e4"),
        other => panic!("expected InvalidMove, got {other:?}"),
    }
}

#[test]
fn packed_moves_survive_the_hash_table_round_trip() {
    let pos =
        Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .unwrap();
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    for &mv in &moves {
        let unpacked = Move::unpack(mv.pack()).expect("well-formed");
        assert_eq!(unpacked, mv);
        assert!(pos.is_legal_soft(unpacked));
    }
}

#[test]
fn unmake_walks_back_a_whole_game() {
    let mut pos = Position::new_initial();
    let start_fen = pos.to_fen();
    let game = [
        "d2d4", "d7d5", "c2c4", "d5c4", "e2e4", "b7b5", "a2a4", "c7c6",
        "a4b5", "c6b5", "b1c3", "a7a6", "g1f3", "g8f6",
    ];
    for notation in game {
        let mv = pos.parse_move(notation).unwrap();
        pos.play_move(mv).unwrap();
    }
    for _ in game {
        pos.unmake_move();
    }
    assert_eq!(pos.to_fen(), start_fen);
}

#[test]
fn perft_is_stable_across_repeated_runs() {
    // the position must be bit-identical after perft walks the whole tree
    let mut pos = Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
    let fen_before = pos.to_fen();
    let first = pos.perft(4);
    assert_eq!(pos.to_fen(), fen_before);
    let second = pos.perft(4);
    assert_eq!(first, second);
}
