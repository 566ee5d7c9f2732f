//! Pseudo-legal move generation, one generator per piece type.
//!
//! Each generator restricts destinations to a caller-supplied target
//! bitboard, so the same code produces "all moves", "captures only" or
//! "quiet only". Pawns are special-cased for pushes, promotions and en
//! passant; both colors run through one parameterized body instead of
//! per-color variants.

use crate::attacks;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::magics;
use crate::moves::{Move, MoveList};
use crate::types::{Color, Piece, PieceType};

pub fn gen_rook_moves(b: &Board, ml: &mut MoveList, target: Bitboard) {
    let side = b.stm;
    let pc = Piece::new(PieceType::Rook, side);
    let mut from_bb = b.pieces(PieceType::Rook, side);
    while let Some(fr) = from_bb.pop_lsb() {
        let mut to_bb = magics::rook_attacks(fr, b.all_bb()) & target;
        while let Some(to) = to_bb.pop_lsb() {
            ml.add(Move::pack(fr, to, pc, b.squares[to as usize], Piece::EMPTY, b.ep, b.castling));
        }
    }
}

pub fn gen_bishop_moves(b: &Board, ml: &mut MoveList, target: Bitboard) {
    let side = b.stm;
    let pc = Piece::new(PieceType::Bishop, side);
    let mut from_bb = b.pieces(PieceType::Bishop, side);
    while let Some(fr) = from_bb.pop_lsb() {
        let mut to_bb = magics::bishop_attacks(fr, b.all_bb()) & target;
        while let Some(to) = to_bb.pop_msb() {
            ml.add(Move::pack(fr, to, pc, b.squares[to as usize], Piece::EMPTY, b.ep, b.castling));
        }
    }
}

pub fn gen_queen_moves(b: &Board, ml: &mut MoveList, target: Bitboard) {
    let side = b.stm;
    let pc = Piece::new(PieceType::Queen, side);
    let mut from_bb = b.pieces(PieceType::Queen, side);
    while let Some(fr) = from_bb.pop_lsb() {
        let mut to_bb = magics::queen_attacks(fr, b.all_bb()) & target;
        while let Some(to) = to_bb.pop_lsb() {
            ml.add(Move::pack(fr, to, pc, b.squares[to as usize], Piece::EMPTY, b.ep, b.castling));
        }
    }
}

pub fn gen_knight_moves(b: &Board, ml: &mut MoveList, target: Bitboard) {
    let side = b.stm;
    let pc = Piece::new(PieceType::Knight, side);
    let mut from_bb = b.pieces(PieceType::Knight, side);
    while let Some(fr) = from_bb.pop_lsb() {
        let mut to_bb = attacks::knight_attacks(fr) & target;
        while let Some(to) = to_bb.pop_lsb() {
            ml.add(Move::pack(fr, to, pc, b.squares[to as usize], Piece::EMPTY, b.ep, b.castling));
        }
    }
}

pub fn gen_king_moves(b: &Board, ml: &mut MoveList, target: Bitboard) {
    let side = b.stm;
    let pc = Piece::new(PieceType::King, side);
    let fr = b.king[side.idx()];

    let mut to_bb = attacks::king_attacks(fr) & target;
    while let Some(to) = to_bb.pop_lsb() {
        ml.add(Move::pack(fr, to, pc, b.squares[to as usize], Piece::EMPTY, b.ep, b.castling));
    }

    // Castling: two-square king moves, generated only when the rook is
    // home, nothing stands between, and the king's start, transit and
    // destination squares are all unattacked.
    let home = crate::castling::CASTLE[side.idx()].king_home;
    if fr == home {
        if target.contains(fr + 2) && b.can_castle_short(side) {
            ml.add(Move::pack(fr, fr + 2, pc, Piece::EMPTY, Piece::EMPTY, b.ep, b.castling));
        }
        if fr >= 2 && target.contains(fr - 2) && b.can_castle_long(side) {
            ml.add(Move::pack(fr, fr - 2, pc, Piece::EMPTY, Piece::EMPTY, b.ep, b.castling));
        }
    }
}

/// Pawn move geometry for one side: board deltas (positive = toward
/// higher squares) and the masks that depend on the direction of travel.
struct PawnGeom {
    pawn: Piece,
    enemy_pawn: Piece,
    up: i16,
    up_west: i16,
    up_east: i16,
    /// Single-push destinations from which a double push may continue.
    double_rank: Bitboard,
    promo_rank: Bitboard,
    promotions: [Piece; 4],
}

fn pawn_geom(side: Color) -> PawnGeom {
    match side {
        Color::White => PawnGeom {
            pawn: Piece::WP,
            enemy_pawn: Piece::BP,
            up: 8,
            up_west: 7,
            up_east: 9,
            double_rank: Bitboard::RANK_3,
            promo_rank: Bitboard::RANK_8,
            promotions: [Piece::WQ, Piece::WR, Piece::WN, Piece::WB],
        },
        Color::Black => PawnGeom {
            pawn: Piece::BP,
            enemy_pawn: Piece::WP,
            up: -8,
            up_west: -9,
            up_east: -7,
            double_rank: Bitboard::RANK_6,
            promo_rank: Bitboard::RANK_1,
            promotions: [Piece::BQ, Piece::BR, Piece::BN, Piece::BB],
        },
    }
}

#[inline(always)]
fn shift(bb: Bitboard, delta: i16) -> Bitboard {
    if delta >= 0 {
        bb << delta as u8
    } else {
        bb >> (-delta) as u8
    }
}

#[inline(always)]
fn back(sq: u8, delta: i16) -> u8 {
    (sq as i16 - delta) as u8
}

/// All pawn moves: pushes, captures, promotions, en passant.
pub fn gen_pawn_moves(b: &Board, ml: &mut MoveList) {
    let g = pawn_geom(b.stm);
    let pawns = b.pieces(PieceType::Pawn, b.stm);
    let them = b.side_bb[b.stm.opposite().idx()];

    let mut one_step = shift(pawns, g.up) & !b.all_bb();
    let two_step = shift(one_step & g.double_rank, g.up) & !b.all_bb();
    let mut cap_west = shift(pawns & Bitboard::NOT_FILE_A, g.up_west) & them;
    let mut cap_east = shift(pawns & Bitboard::NOT_FILE_H, g.up_east) & them;

    let promo = (one_step | cap_west | cap_east) & g.promo_rank;
    if !promo.is_empty() {
        push_promotions(b, ml, &g, promo, cap_west, cap_east);
        one_step &= !g.promo_rank;
        cap_west &= !g.promo_rank;
        cap_east &= !g.promo_rank;
    }

    gen_ep(b, ml, &g, pawns);
    add_pawn_moves(b, ml, &g, one_step, g.up);
    add_pawn_moves(b, ml, &g, two_step, 2 * g.up);
    add_pawn_moves(b, ml, &g, cap_west, g.up_west);
    add_pawn_moves(b, ml, &g, cap_east, g.up_east);
}

/// Pawn captures and promotions only (quiescence move set).
pub fn gen_pawn_captures(b: &Board, ml: &mut MoveList) {
    let g = pawn_geom(b.stm);
    let pawns = b.pieces(PieceType::Pawn, b.stm);
    let them = b.side_bb[b.stm.opposite().idx()];

    let mut cap_west = shift(pawns & Bitboard::NOT_FILE_A, g.up_west) & them;
    let mut cap_east = shift(pawns & Bitboard::NOT_FILE_H, g.up_east) & them;
    let one_step = shift(pawns, g.up) & !b.all_bb();

    let promo = (one_step | cap_west | cap_east) & g.promo_rank;
    if !promo.is_empty() {
        push_promotions(b, ml, &g, promo, cap_west, cap_east);
        cap_west &= !g.promo_rank;
        cap_east &= !g.promo_rank;
    }

    gen_ep(b, ml, &g, pawns);
    add_pawn_moves(b, ml, &g, cap_west, g.up_west);
    add_pawn_moves(b, ml, &g, cap_east, g.up_east);
}

/// Pawn pushes that neither capture nor promote.
pub fn gen_pawn_quiet(b: &Board, ml: &mut MoveList) {
    let g = pawn_geom(b.stm);
    let pawns = b.pieces(PieceType::Pawn, b.stm);

    let mut one_step = shift(pawns, g.up) & !b.all_bb();
    let two_step = shift(one_step & g.double_rank, g.up) & !b.all_bb();
    one_step &= !g.promo_rank;

    add_pawn_moves(b, ml, &g, one_step, g.up);
    add_pawn_moves(b, ml, &g, two_step, 2 * g.up);
}

fn add_pawn_moves(b: &Board, ml: &mut MoveList, g: &PawnGeom, mut to_bb: Bitboard, delta: i16) {
    while let Some(to) = to_bb.pop_lsb() {
        ml.add(Move::pack(
            back(to, delta),
            to,
            g.pawn,
            b.squares[to as usize],
            Piece::EMPTY,
            b.ep,
            b.castling,
        ));
    }
}

fn push_promotions(
    b: &Board,
    ml: &mut MoveList,
    g: &PawnGeom,
    mut promo: Bitboard,
    cap_west: Bitboard,
    cap_east: Bitboard,
) {
    while let Some(to) = promo.pop_lsb() {
        let cp = b.squares[to as usize];
        let mut from_squares = [0u8; 3];
        let mut n = 0;
        if cp.is_empty() {
            from_squares[n] = back(to, g.up);
            n += 1;
        } else {
            if cap_west.contains(to) {
                from_squares[n] = back(to, g.up_west);
                n += 1;
            }
            if cap_east.contains(to) {
                from_squares[n] = back(to, g.up_east);
                n += 1;
            }
        }
        for &fr in &from_squares[..n] {
            for &pr in &g.promotions {
                ml.add(Move::pack(fr, to, g.pawn, cp, pr, b.ep, b.castling));
            }
        }
    }
}

fn gen_ep(b: &Board, ml: &mut MoveList, g: &PawnGeom, pawns: Bitboard) {
    if b.ep == 0 {
        return;
    }
    let ep_bb = Bitboard::from_square(b.ep);
    if !(shift(pawns & Bitboard::NOT_FILE_A, g.up_west) & ep_bb).is_empty() {
        ml.add(Move::pack(
            back(b.ep, g.up_west),
            b.ep,
            g.pawn,
            g.enemy_pawn,
            Piece::EMPTY,
            b.ep,
            b.castling,
        ));
    }
    if !(shift(pawns & Bitboard::NOT_FILE_H, g.up_east) & ep_bb).is_empty() {
        ml.add(Move::pack(
            back(b.ep, g.up_east),
            b.ep,
            g.pawn,
            g.enemy_pawn,
            Piece::EMPTY,
            b.ep,
            b.castling,
        ));
    }
}

/// All pseudo-legal moves for the side to move.
pub fn gen_all(b: &Board, ml: &mut MoveList) {
    let target = !b.side_bb[b.stm.idx()];
    gen_pawn_moves(b, ml);
    gen_knight_moves(b, ml, target);
    gen_bishop_moves(b, ml, target);
    gen_rook_moves(b, ml, target);
    gen_queen_moves(b, ml, target);
    gen_king_moves(b, ml, target);
}

/// Captures, promotions and en passant, least valuable mover first.
/// The quiescence search relies on that ordering when it resolves each
/// target square only once.
pub fn gen_captures(b: &Board, ml: &mut MoveList) {
    let them = b.side_bb[b.stm.opposite().idx()];
    gen_pawn_captures(b, ml);
    gen_knight_moves(b, ml, them);
    gen_bishop_moves(b, ml, them);
    gen_rook_moves(b, ml, them);
    gen_queen_moves(b, ml, them);
    gen_king_moves(b, ml, them);
}

/// Quiet moves only.
pub fn gen_quiet(b: &Board, ml: &mut MoveList) {
    let empty = !b.all_bb();
    gen_pawn_quiet(b, ml);
    gen_knight_moves(b, ml, empty);
    gen_bishop_moves(b, ml, empty);
    gen_rook_moves(b, ml, empty);
    gen_queen_moves(b, ml, empty);
    gen_king_moves(b, ml, empty);
}

/// Drop pseudo-legal moves that leave the mover's own king attacked, by
/// speculatively playing each one. There is no cheaper pin shortcut in
/// this design; correctness rests on symmetric make/unmake.
pub fn filter_legals(b: &mut Board, ml: &mut MoveList) {
    let mut ix = ml.len();
    while ix > 0 {
        ix -= 1;
        let mv = ml[ix];
        if b.make(mv) {
            b.unmake(mv);
        } else {
            ml.swap_remove(ix);
        }
    }
}

/// All legal moves for the side to move.
pub fn gen_legal(b: &mut Board, ml: &mut MoveList) {
    ml.clear();
    gen_all(b, ml);
    filter_legals(b, ml);
}

#[cfg(test)]
#[path = "movegen_tests.rs"]
mod movegen_tests;
