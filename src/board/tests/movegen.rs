//! Move generator correctness: cross-checks against a naive
//! generate-pseudo-then-filter reference, plus targeted edge cases.

use crate::board::attack_tables::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, rook_attacks,
};
use crate::board::{
    Bitboard, Color, Move, MoveKind, MoveList, Piece, PieceKind, Position, Square,
    PROMOTION_KINDS,
};

/// A deliberately slow reference generator: emit every pseudo-legal move,
/// make it, and keep it only if the mover's king is not attacked.
fn reference_moves(pos: &Position) -> Vec<Move> {
    let us = pos.side_to_move();
    let them = us.opponent();
    let occupancy = pos.all_occupied();
    let own = pos.occupied_by(us);
    let mut pseudo: Vec<Move> = Vec::new();

    for kind in [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ] {
        let piece = Piece::from_parts(us, kind);
        for from in pos.pieces(piece).squares() {
            let attacks = match kind {
                PieceKind::King => king_attacks(from),
                PieceKind::Queen => queen_attacks(from, occupancy),
                PieceKind::Rook => rook_attacks(from, occupancy),
                PieceKind::Bishop => bishop_attacks(from, occupancy),
                _ => knight_attacks(from),
            };
            for to in (attacks & !own).squares() {
                pseudo.push(Move::new(from, to, piece, pos.piece_at(to), MoveKind::Normal));
            }
        }
    }

    let pawn = Piece::from_parts(us, PieceKind::Pawn);
    let push = us.pawn_push();
    let (double_rank, promo_rank) = if us.is_white() { (1, 7) } else { (6, 0) };
    for from in pos.pieces(pawn).squares() {
        let mut targets: Vec<(Square, Piece)> = Vec::new();
        let single = from.offset(push);
        if pos.piece_at(single).is_none() {
            targets.push((single, Piece::None));
            if from.rank() == double_rank {
                let double = from.offset(2 * push);
                if pos.piece_at(double).is_none() {
                    pseudo.push(Move::new(from, double, pawn, Piece::None, MoveKind::Normal));
                }
            }
        }
        for to in (pawn_attacks(us, from) & pos.occupied_by(them)).squares() {
            targets.push((to, pos.piece_at(to)));
        }
        for (to, captured) in targets {
            if to.rank() == promo_rank {
                for kind in PROMOTION_KINDS {
                    pseudo.push(Move::new(
                        from,
                        to,
                        pawn,
                        captured,
                        MoveKind::promotion_from_kind(kind),
                    ));
                }
            } else {
                pseudo.push(Move::new(from, to, pawn, captured, MoveKind::Normal));
            }
        }
        if let Some(ep_to) = pos.en_passant_square() {
            if pawn_attacks(us, from).is_set(ep_to) {
                let captured = Piece::from_parts(them, PieceKind::Pawn);
                pseudo.push(Move::new(from, ep_to, pawn, captured, MoveKind::EnPassant));
            }
        }
    }

    // castling: delegate structure to the strict validator, which the
    // generator also uses, but re-derive the candidates here
    let (home, short_to, long_to) = if us.is_white() {
        (Square::E1, Square::G1, Square::C1)
    } else {
        (Square::E8, Square::G8, Square::C8)
    };
    for (to, kind) in [(short_to, MoveKind::ShortCastle), (long_to, MoveKind::LongCastle)] {
        let mv = Move::new(home, to, Piece::from_parts(us, PieceKind::King), Piece::None, kind);
        if pos.is_legal_soft(mv) {
            pseudo.push(mv);
        }
    }

    // filter by make/unmake: the opponent must not be able to take the king
    let mut scratch = pos.clone();
    pseudo
        .into_iter()
        .filter(|&mv| {
            scratch.make_move(mv);
            let ksq = scratch.king_square(us);
            let legal = scratch
                .attackers_to_by(ksq, them, scratch.all_occupied())
                .is_empty();
            scratch.unmake_move();
            legal
        })
        .collect()
}

fn assert_matches_reference(fen: &str) {
    let pos = Position::from_fen(fen).unwrap();
    let mut generated = MoveList::new();
    pos.generate_moves(&mut generated);
    let mut fast: Vec<String> = generated.iter().map(|m| format!("{m}/{:?}", m.kind())).collect();
    let mut reference: Vec<String> = reference_moves(&pos)
        .iter()
        .map(|m| format!("{m}/{:?}", m.kind()))
        .collect();
    fast.sort();
    reference.sort();
    assert_eq!(fast, reference, "generator mismatch in {fen}");
}

#[test]
fn matches_reference_on_assorted_positions() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
        "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1",
    ] {
        assert_matches_reference(fen);
    }
}

#[test]
fn matches_reference_on_check_positions() {
    for fen in [
        // single slider check: block, capture or run
        "4k3/8/8/8/8/8/4q3/4K2R w - - 0 1",
        // knight check: no blocking possible
        "4k3/8/8/8/8/3n4/8/4K3 w - - 0 1",
        // double check: king moves only
        "4k3/8/8/8/8/6b1/4r3/4K3 w - - 0 1",
        // pawn check with en passant capture available
        "8/8/8/2k5/3Pp3/8/8/3K4 b - d3 0 1",
        // checked along a rank, evasion squares shadowed by the slider
        "4k3/8/8/8/8/8/8/r3K3 w - - 0 1",
    ] {
        assert_matches_reference(fen);
    }
}

#[test]
fn evasions_never_leave_the_king_in_check() {
    let fens = [
        "4k3/8/8/8/8/8/4q3/4K2R w - - 0 1",
        "4k3/8/8/8/8/6b1/4r3/4K3 w - - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    ];
    for fen in fens {
        let mut pos = Position::from_fen(fen).unwrap();
        let mut moves = MoveList::new();
        pos.generate_moves(&mut moves);
        let us = pos.side_to_move();
        let them = us.opponent();
        for &mv in &moves {
            pos.make_move(mv);
            let ksq = pos.king_square(us);
            assert!(
                pos.attackers_to_by(ksq, them, pos.all_occupied()).is_empty(),
                "{mv} leaves the king attacked in {fen}"
            );
            pos.unmake_move();
        }
    }
}

#[test]
fn material_and_quiet_families_partition_the_legal_moves() {
    let fens = [
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "4k3/8/8/8/8/8/4q3/4K2R w - - 0 1",
        "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
    ];
    for fen in fens {
        let pos = Position::from_fen(fen).unwrap();
        let mut all = MoveList::new();
        let mut material = MoveList::new();
        let mut quiet = MoveList::new();
        pos.generate_moves(&mut all);
        pos.generate_material_moves(&mut material);
        pos.generate_quiet_moves(&mut quiet);

        assert_eq!(material.len() + quiet.len(), all.len(), "partition size in {fen}");
        for &mv in &material {
            assert!(mv.is_material(), "{mv} in material family");
            assert!(all.contains(mv));
        }
        for &mv in &quiet {
            assert!(!mv.is_material(), "{mv} in quiet family");
            assert!(all.contains(mv));
        }
    }
}

#[test]
fn pinned_pieces_stay_on_their_ray() {
    // the d2 rook is pinned by the d8 rook against the d1 king
    let pos = Position::from_fen("3rk3/8/8/8/8/8/3R4/3K4 w - - 0 1").unwrap();
    let pinned = pos.pinned_blockers(Color::White);
    let d2: Square = "d2".parse().unwrap();
    assert!(pinned.is_set(d2));

    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    for &mv in &moves {
        if mv.from() == d2 {
            assert_eq!(mv.to().file(), 3, "pinned rook left the d-file: {mv}");
        }
    }
    // the pinned rook can still capture its pinner
    assert!(moves.iter().any(|m| m.from() == d2 && m.to() == "d8".parse().unwrap()));
}

#[test]
fn castling_requires_safe_transit() {
    // f1 is covered: no short castling, long castling fine
    let pos = Position::from_fen("5r2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    assert!(!moves.iter().any(|m| m.kind() == MoveKind::ShortCastle));
    assert!(moves.iter().any(|m| m.kind() == MoveKind::LongCastle));

    // b1 attacked: long castling is still allowed, the king never crosses b1
    let pos = Position::from_fen("1r6/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    assert!(moves.iter().any(|m| m.kind() == MoveKind::LongCastle));
}

#[test]
fn en_passant_pinned_horizontally_is_rejected() {
    // removing both pawns exposes the king to the h5 rook
    let pos = Position::from_fen("8/8/8/KPp4r/8/8/8/4k3 w - c6 0 1").unwrap();
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    assert!(!moves.iter().any(|m| m.kind() == MoveKind::EnPassant));

    // same shape without the rook: the capture is fine
    let pos = Position::from_fen("8/8/8/KPp5/8/8/8/4k3 w - c6 0 1").unwrap();
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    assert!(moves.iter().any(|m| m.kind() == MoveKind::EnPassant));
}

#[test]
fn double_check_only_king_moves() {
    let pos = Position::from_fen("4k3/8/8/8/8/6b1/4r3/4K3 w - - 0 1").unwrap();
    assert_eq!(pos.checkers().pop_count(), 2);
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    assert!(!moves.is_empty());
    for &mv in &moves {
        assert_eq!(mv.piece(), Piece::WhiteKing);
    }
}

#[test]
fn checkmate_and_stalemate_have_no_moves() {
    // back-rank mate
    let pos = Position::from_fen("R3k3/8/4K3/8/8/8/8/8 b - - 0 1").unwrap();
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    assert!(pos.in_check());
    assert!(moves.is_empty());

    // classic stalemate
    let pos = Position::from_fen("k7/8/1Q6/8/8/8/8/4K3 b - - 0 1").unwrap();
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    assert!(!pos.in_check());
    assert!(moves.is_empty());
}

#[test]
fn promotion_pushes_are_material_moves() {
    let pos = Position::from_fen("8/P3k3/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    let mut material = MoveList::new();
    pos.generate_material_moves(&mut material);
    let promos: Vec<&Move> = material.iter().filter(|m| m.is_promotion()).collect();
    assert_eq!(promos.len(), 4);
    let mut quiet = MoveList::new();
    pos.generate_quiet_moves(&mut quiet);
    assert!(quiet.iter().all(|m| !m.is_promotion()));
}

#[test]
fn king_cannot_hide_behind_itself() {
    // checked along the first rank: retreating to f1 stays inside the
    // rook's shadow once the king leaves e1, so only off-rank flights work
    let pos = Position::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
    assert!(pos.in_check());
    let mut moves = MoveList::new();
    pos.generate_moves(&mut moves);
    let shadow: Square = "f1".parse().unwrap();
    assert!(!moves.iter().any(|m| m.to() == shadow));
    assert!(moves.iter().any(|m| m.to() == "e2".parse::<Square>().unwrap()));
}

#[test]
fn bitboard_partition_invariant_holds() {
    let pos = Position::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
        .unwrap();
    let white = pos.occupied_by(Color::White);
    let black = pos.occupied_by(Color::Black);
    assert_eq!(white & black, Bitboard::EMPTY);
    assert_eq!(white | black | pos.empty_squares(), Bitboard::FULL);
    assert_eq!(pos.pieces(Piece::WhiteKing).pop_count(), 1);
    assert_eq!(pos.pieces(Piece::BlackKing).pop_count(), 1);
}
