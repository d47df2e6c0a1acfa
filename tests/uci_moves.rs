use pulsar::board::{Color, MoveKind, PieceType, Position, Square};
use pulsar::error::ParseError;

#[test]
fn apply_startpos_moves_sequence() {
    let mut pos = Position::startpos();
    pos.apply_uci_moves(&["e2e4", "e7e5", "g1f3"]).expect("legal move sequence");
    assert_eq!(pos.side_to_move(), Color::Black, "expected black to move after 3 plies");
    // History is dropped at each pawn move; only Nf3 is undoable
    assert_eq!(pos.history_len(), 1);
}

#[test]
fn illegal_and_malformed_moves_are_rejected() {
    let mut pos = Position::startpos();
    assert_eq!(pos.parse_uci_move("e2e5"), Err(ParseError::IllegalMove("e2e5".into())));
    assert_eq!(pos.parse_uci_move("zz"), Err(ParseError::IllegalMove("zz".into())));
    let before = pos.to_fen();
    assert!(pos.apply_uci_moves(&["e2e4", "e2e4"]).is_err());
    assert_ne!(pos.to_fen(), before, "moves before the bad one stay applied");
}

#[test]
fn castling_moves_the_rook() {
    let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    let mv = pos.parse_uci_move("e1g1").unwrap();
    assert_eq!(mv.kind, MoveKind::CastleKingSide);
    pos.apply_uci_moves(&["e1g1", "e8c8"]).unwrap();
    assert_eq!(pos.to_fen(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 2 2");
}

#[test]
fn en_passant_and_promotion() {
    let mut pos = Position::from_fen("4k3/1P6/8/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
    let ep = pos.parse_uci_move("e5d6").unwrap();
    assert_eq!(ep.kind, MoveKind::EnPassant);
    pos.make_move(ep);
    assert_eq!(pos.piece_at(Square::parse("d5").unwrap()), None);
    pos.undo_move(ep);

    let promo = pos.parse_uci_move("b7b8n").unwrap();
    assert_eq!(promo.promotion, Some(PieceType::Knight));
    pos.apply_uci_moves(&["b7b8q"]).unwrap();
    assert_eq!(pos.to_fen(), "1Q2k3/8/8/3pP3/8/8/8/4K3 b - - 0 1");
}
