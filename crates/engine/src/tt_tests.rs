use super::*;
use ironbit_core::{Castling, Piece};

fn mv(from: u8, to: u8) -> Move {
    Move::pack(from, to, Piece::WN, Piece::EMPTY, Piece::EMPTY, 0, Castling::ALL)
}

#[test]
fn test_store_retrieve_round_trip() {
    let mut tt = TransTable::new(1);
    let key = 0xABCD_EF01_2345_6789u64;
    let m = mv(6, 21);

    tt.store(key, m, 8, 0, 42, SCORE_EXACT);
    let probe = tt.probe(key, 8, 0).expect("entry must be found");
    assert!(probe.usable);
    assert!(probe.mv.same_move(m));
    assert_eq!(probe.score, 42);
    assert_eq!(probe.score_type, SCORE_EXACT);

    // Shallower requirement also hits.
    let probe = tt.probe(key, 3, 0).expect("entry must be found");
    assert!(probe.usable);
    assert_eq!(probe.score, 42);
}

#[test]
fn test_partial_hit_yields_move_only() {
    let mut tt = TransTable::new(1);
    let key = 0x1111_2222_3333_4444u64;
    let m = mv(12, 28);

    tt.store(key, m, 4, 0, 10, SCORE_LOWER);
    // Asking for more depth than stored: move for ordering, no cutoff.
    let probe = tt.probe(key, 9, 0).expect("lock still matches");
    assert!(!probe.usable);
    assert!(probe.mv.same_move(m));
}

#[test]
fn test_shallow_store_does_not_overwrite_deeper() {
    let mut tt = TransTable::new(1);
    let key = 0x5555_6666_7777_8888u64;
    let deep = mv(1, 18);
    let shallow = mv(8, 16);

    tt.store(key, deep, 9, 0, 77, SCORE_EXACT);
    tt.store(key, shallow, 2, 0, -5, SCORE_UPPER);

    let probe = tt.probe(key, 5, 0).expect("entry must remain");
    assert!(probe.usable);
    assert!(probe.mv.same_move(deep), "shallow store must not replace deeper data");
    assert_eq!(probe.score, 77);
}

#[test]
fn test_equal_depth_overwrites() {
    let mut tt = TransTable::new(1);
    let key = 0x9999_AAAA_BBBB_CCCCu64;
    let first = mv(1, 18);
    let second = mv(6, 21);

    tt.store(key, first, 5, 0, 10, SCORE_LOWER);
    tt.store(key, second, 5, 0, 30, SCORE_EXACT);

    let probe = tt.probe(key, 5, 0).unwrap();
    assert!(probe.mv.same_move(second));
    assert_eq!(probe.score, 30);
}

#[test]
fn test_mate_scores_normalized_by_ply() {
    let mut tt = TransTable::new(1);
    let key = 0xDEAD_BEEF_0000_0001u64;
    // Mate found at ply 4: score is MATE - 4 from that node.
    let found = crate::MATE - 4;
    tt.store(key, mv(0, 8), 6, 4, found, SCORE_EXACT);

    // Retrieved at ply 2, the same mate reads two plies closer to the
    // root than it would from ply 4.
    let probe = tt.probe(key, 6, 2).unwrap();
    assert_eq!(probe.score, crate::MATE - 2);

    // Mated-side scores mirror.
    let key2 = 0xDEAD_BEEF_0000_0002u64;
    tt.store(key2, Move::NONE, 6, 3, -(crate::MATE) + 3, SCORE_EXACT);
    let probe = tt.probe(key2, 6, 5).unwrap();
    assert_eq!(probe.score, -(crate::MATE) + 5);
}

#[test]
fn test_miss_on_unknown_key() {
    let mut tt = TransTable::new(1);
    tt.store(0x0123_4567_89AB_CDEFu64, mv(0, 1), 3, 0, 1, SCORE_LOWER);
    // Same index bits, different lock.
    assert!(tt.probe(0xFFFF_0000_89AB_CDEFu64, 1, 0).is_none());
}

#[test]
fn test_generation_aging_prefers_stale_victims() {
    let mut tt = TransTable::new(1);
    let mask = (tt.len() - 1) as u64;

    // Fill one bucket with current-generation entries.
    let base_index = 5u64;
    let keys: Vec<u64> = (0..4u64)
        .map(|i| ((i + 100) << 32) | base_index)
        .collect();
    for &k in &keys {
        assert_eq!(k & mask, base_index, "keys must share a bucket");
        tt.store(k, mv(0, 1), 9, 0, 7, SCORE_EXACT);
    }

    // Next generation: a new key hashing into the same bucket must
    // evict one of the stale entries even though they are deeper.
    tt.begin_search();
    let fresh = (999u64 << 32) | base_index;
    tt.store(fresh, mv(8, 16), 1, 0, 3, SCORE_LOWER);
    let probe = tt.probe(fresh, 1, 0).expect("fresh entry must be stored");
    assert!(probe.usable);
    assert_eq!(probe.score, 3);
}

#[test]
fn test_score_type_classification() {
    assert_eq!(score_type(50, 10, 100), SCORE_EXACT);
    assert_eq!(score_type(5, 10, 100), SCORE_UPPER);
    assert_eq!(score_type(150, 10, 100), SCORE_LOWER);
}

#[test]
fn test_mate_helpers() {
    assert!(is_mate_score(crate::MATE - 3));
    assert!(is_mate_score(-(crate::MATE) + 7));
    assert!(!is_mate_score(0));
    assert!(!is_mate_score(950));

    assert_eq!(remove_mate_ply(crate::MATE - 9, 9), crate::MATE);
    assert_eq!(remove_mate_ply(-(crate::MATE) + 4, 4), -crate::MATE);
    assert_eq!(remove_mate_ply(123, 4), 123);
    assert_eq!(add_mate_ply(crate::MATE, 6), crate::MATE - 6);
    assert_eq!(add_mate_ply(-crate::MATE, 6), -(crate::MATE) + 6);
    assert_eq!(add_mate_ply(123, 6), 123);
}

#[test]
fn test_power_of_two_sizing() {
    let tt = TransTable::new(1);
    assert!(tt.len().is_power_of_two());
    let bigger = TransTable::new(8);
    assert!(bigger.len().is_power_of_two());
    assert!(bigger.len() > tt.len());
}
