//! Move generation edge cases.

use crate::board::{Color, Position};

#[test]
fn test_startpos_has_twenty_moves() {
    let mut pos = Position::startpos();
    assert_eq!(pos.generate_legal().len(), 20);
}

#[test]
fn test_legal_moves_never_leave_own_king_in_check() {
    let fens = [
        "startpos",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "rnb1kbnr/pppp1ppp/8/8/5PPq/8/PPPPP2P/RNBQKBNR w KQkq - 0 1",
    ];
    for fen in fens {
        let mut pos = Position::from_fen(fen).unwrap();
        let mover = pos.side_to_move();
        let moves = pos.generate_legal();
        for &mv in &moves {
            let undo = pos.make_move(mv).unwrap();
            assert!(
                !pos.is_in_check(mover),
                "move {mv} left the {mover} king in check in {fen}"
            );
            pos.unmake_move(mv, undo);
        }
    }
}

#[test]
fn test_in_check_matches_attack_detection() {
    let pos = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
        .unwrap();
    assert!(pos.in_check());
    assert!(pos.is_in_check(Color::White));
    assert!(!pos.is_in_check(Color::Black));
}

#[test]
fn test_castling_blocked_by_pieces() {
    // Bishop on f1 blocks kingside castling
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/R3KB1R w KQ - 0 1").unwrap();
    let moves = pos.generate_legal();
    assert!(!moves.iter().any(|m| m.is_castle_kingside()));
    assert!(moves.iter().any(|m| m.is_castle_queenside()));
}

#[test]
fn test_castling_forbidden_while_in_check() {
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
    assert!(pos.in_check());
    let moves = pos.generate_legal();
    assert!(!moves.iter().any(|m| m.is_castling()));
}

#[test]
fn test_castling_forbidden_through_attacked_square() {
    // Black rook on f8 covers f1, the square the king passes over
    let mut pos = Position::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let moves = pos.generate_legal();
    assert!(!moves.iter().any(|m| m.is_castle_kingside()));
    assert!(moves.iter().any(|m| m.is_castle_queenside()));
}

#[test]
fn test_queenside_castle_allowed_when_only_b1_attacked() {
    // The king never crosses b1, so an attack there does not matter
    let mut pos = Position::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
    let moves = pos.generate_legal();
    assert!(moves.iter().any(|m| m.is_castle_queenside()));
}

#[test]
fn test_castling_requires_rook_on_corner() {
    // Kingside right still set in FEN, but the rook has wandered off
    let mut pos = Position::from_fen("4k3/8/8/8/8/8/7R/R3K3 w KQ - 0 1").unwrap();
    let moves = pos.generate_legal();
    assert!(!moves.iter().any(|m| m.is_castle_kingside()));
    assert!(moves.iter().any(|m| m.is_castle_queenside()));
}

#[test]
fn test_en_passant_requires_adjacent_pawn() {
    let mut pos =
        Position::from_fen("rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3")
            .unwrap();
    let ep_moves: Vec<_> = pos
        .generate_legal()
        .iter()
        .copied()
        .filter(|m| m.is_en_passant())
        .collect();
    assert_eq!(ep_moves.len(), 1);
    assert_eq!(ep_moves[0].to_string(), "e5f6");
}

#[test]
fn test_en_passant_illegal_when_it_exposes_the_king() {
    // Rook on the fifth rank skewers the king once both pawns vanish
    let mut pos = Position::from_fen("8/8/8/K1pP3r/8/8/8/4k3 w - c6 0 2").unwrap();
    let moves = pos.generate_legal();
    assert!(
        !moves.iter().any(|m| m.is_en_passant()),
        "en passant capture would expose the white king along the rank"
    );
}

#[test]
fn test_promotion_fan_generates_four_moves() {
    let mut pos = Position::from_fen("8/P7/8/8/8/8/8/K1k5 w - - 0 1").unwrap();
    let promos: Vec<_> = pos
        .generate_legal()
        .iter()
        .copied()
        .filter(|m| m.is_promotion())
        .collect();
    assert_eq!(promos.len(), 4);
}

#[test]
fn test_checkmate_and_stalemate_detection() {
    // Fool's mate: white is checkmated
    let mut mated =
        Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
    assert!(mated.is_checkmate());
    assert!(!mated.is_stalemate());

    // Classic king-and-queen stalemate
    let mut stale = Position::from_fen("k7/8/1Q6/8/8/8/8/K7 b - - 0 1").unwrap();
    assert!(stale.is_stalemate());
    assert!(!stale.is_checkmate());
}

#[test]
fn test_generation_order_is_deterministic() {
    let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    let mut a = Position::from_fen(fen).unwrap();
    let mut b = Position::from_fen(fen).unwrap();
    let list_a: Vec<String> = a.generate_legal().iter().map(ToString::to_string).collect();
    let list_b: Vec<String> = b.generate_legal().iter().map(ToString::to_string).collect();
    assert_eq!(list_a, list_b);
    assert!(!list_a.is_empty());
}
