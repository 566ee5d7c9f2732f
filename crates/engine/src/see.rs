//! Static exchange evaluation.
//!
//! Simulates the full capture sequence on one square without searching:
//! collect every attacker of both colors (re-scanning sliders for x-ray
//! attackers as pieces come off), always capture with the least valuable
//! attacker next, then resolve the material ladder backward — either
//! side may stop capturing when continuing would lose material. The
//! result is the net material outcome from the mover's point of view.

use ironbit_core::attacks;
use ironbit_core::magics;
use ironbit_core::{Board, Color, Piece, PieceType};

use crate::eval::PIECE_TYPE_VAL;

#[inline]
fn val(pc: Piece) -> i32 {
    if pc.is_empty() {
        0
    } else {
        PIECE_TYPE_VAL[pc.kind().idx()]
    }
}

/// Net material result of the capture exchange starting with the piece
/// on `fr` taking on `to`, from the mover's perspective.
pub fn see(b: &Board, fr: u8, to: u8) -> i32 {
    let pc = b.squares[fr as usize];
    let cp = b.squares[to as usize];
    debug_assert!(!pc.is_empty(), "see: no piece on from-square");

    let us = pc.color();
    let them = us.opposite();

    let pawns = b.piece_bb[PieceType::Pawn.idx()];
    let diag = b.piece_bb[PieceType::Bishop.idx()] | b.piece_bb[PieceType::Queen.idx()];
    let ortho = b.piece_bb[PieceType::Rook.idx()] | b.piece_bb[PieceType::Queen.idx()];

    // Remove the first capturer up front so its x-ray shadow attackers
    // are seen from the start.
    let mut occ = b.all_bb();
    occ.clear(fr);

    let mut attackers = magics::rook_attacks(to, occ) & ortho
        | magics::bishop_attacks(to, occ) & diag
        | attacks::knight_attacks(to) & b.piece_bb[PieceType::Knight.idx()]
        | attacks::king_attacks(to) & b.piece_bb[PieceType::King.idx()]
        | attacks::pawn_attacks(Color::White, to) & pawns & b.side_bb[Color::Black.idx()]
        | attacks::pawn_attacks(Color::Black, to) & pawns & b.side_bb[Color::White.idx()];
    attackers &= occ;

    if (attackers & b.side_bb[them.idx()]).is_empty() {
        // Nothing recaptures; the first capture stands.
        return val(cp);
    }

    // Signed gain ladder: entry n is the material balance after n+1
    // captures, from the perspective of whoever made capture n+1.
    let mut gains = [0i32; 32];
    gains[0] = val(cp);
    let mut n = 1;
    let mut last_attacker_val = val(pc);
    let mut stm = them;

    loop {
        // Least valuable attacker of the side to move.
        let mut chosen = None;
        for kind in PieceType::ALL {
            let candidates = attackers & b.piece_bb[kind.idx()] & b.side_bb[stm.idx()];
            if !candidates.is_empty() {
                chosen = Some((kind, candidates));
                break;
            }
        }
        let (kind, candidates) = chosen
            .unwrap_or_else(|| unreachable!("see: attacker set has no matching piece type"));

        // Take the chosen attacker off the occupancy and rescan sliders
        // for anything it was shadowing.
        occ.0 ^= candidates.0 & candidates.0.wrapping_neg();
        attackers |= magics::rook_attacks(to, occ) & ortho | magics::bishop_attacks(to, occ) & diag;
        attackers &= occ;

        gains[n] = -gains[n - 1] + last_attacker_val;
        n += 1;

        last_attacker_val = PIECE_TYPE_VAL[kind.idx()];
        stm = stm.opposite();

        if kind == PieceType::King && !(attackers & b.side_bb[stm.idx()]).is_empty() {
            // The king walked into a defended square; the ladder ends
            // with it being taken.
            gains[n] = PIECE_TYPE_VAL[PieceType::King.idx()];
            n += 1;
            break;
        }

        if (attackers & b.side_bb[stm.idx()]).is_empty() {
            break;
        }
    }

    // Resolve backward: each side may decline to continue the exchange.
    while n > 1 {
        n -= 1;
        gains[n - 1] = std::cmp::min(-gains[n], gains[n - 1]);
    }

    gains[0]
}

#[cfg(test)]
#[path = "see_tests.rs"]
mod see_tests;
