use super::*;
use ironbit_core::fen::parse_fen;
use ironbit_core::types::square::*;

#[test]
fn test_undefended_capture_wins_full_value() {
    // Rook takes a loose pawn.
    let b = parse_fen("4k3/8/8/3p4/8/8/8/3RK3 w - - 0 1").unwrap();
    assert_eq!(see(&b, D1, D5), 100);
}

#[test]
fn test_pawn_takes_defended_pawn_is_even() {
    // Pawn takes pawn, pawn recaptures: equal trade, never negative.
    let b = parse_fen("4k3/8/4p3/3p4/4P3/8/8/4K3 w - - 0 1").unwrap();
    let result = see(&b, E4, D5);
    assert!(result >= 0, "equal pawn trade must be non-negative, got {result}");
    assert_eq!(result, 0);
}

#[test]
fn test_rook_takes_pawn_defended_by_pawn_loses() {
    // Rook grabs a pawn that a pawn defends: win 100, lose 500.
    let b = parse_fen("4k3/2p5/3p4/8/8/8/8/3RK3 w - - 0 1").unwrap();
    assert_eq!(see(&b, D1, D6), 100 - 500);
}

#[test]
fn test_queen_takes_defended_minor_loses_queen() {
    // Queen takes a knight defended by a pawn: +325 then -950.
    let b = parse_fen("4k3/2p5/3n4/8/8/8/8/3QK3 w - - 0 1").unwrap();
    let result = see(&b, D1, D6);
    assert!(result < 0, "trading the queen for a minor must lose, got {result}");
    assert_eq!(result, 325 - 950);
}

#[test]
fn test_xray_attacker_joins_exchange() {
    // Doubled rooks against a pawn defended by a pawn: the back rook is
    // only seen once the front one comes off the occupancy.
    let b = parse_fen("4k3/8/2p5/3p4/8/8/3R4/3RK3 w - - 0 1").unwrap();
    // Rxd5, cxd5, Rxd5: the recapture is correct for black, so white
    // nets pawn + pawn - rook.
    assert_eq!(see(&b, D2, D5), 100 - 500 + 100);
}

#[test]
fn test_defender_can_decline() {
    // Knight takes a pawn the queen defends, with a white rook also on
    // the file: recapturing would lose the queen, so black declines and
    // white keeps the pawn.
    let b = parse_fen("3qk3/8/8/3p4/8/4N3/8/3RK3 w - - 0 1").unwrap();
    assert_eq!(see(&b, E3, D5), 100);
}

#[test]
fn test_king_joins_and_terminates() {
    // King capture onto a square still covered by the enemy stops the
    // simulated ladder instead of "losing" the king.
    let b = parse_fen("4k3/3r4/8/8/8/8/3p4/3K4 w - - 0 1").unwrap();
    // Kxd2 with the rook on d7 covering d2: the king would be taken.
    let result = see(&b, D1, D2);
    assert!(result < 100, "capturing into a defended square with the king must not win");
}

#[test]
fn test_non_capture_see_is_zero_or_less() {
    // Moving to an empty undefended square gains nothing.
    let b = parse_fen("4k3/8/8/8/8/8/8/3RK3 w - - 0 1").unwrap();
    assert_eq!(see(&b, D1, D4), 0);
}
