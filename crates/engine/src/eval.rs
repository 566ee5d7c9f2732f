//! Static evaluation: material plus piece-square tables.
//!
//! Deliberately minimal; the tables are placeholder weights kept as
//! data. Scores are centipawns from white's point of view; `sign_eval`
//! converts to the side to move.

use once_cell::sync::Lazy;

use ironbit_core::{Board, Color, Piece, PieceType};

/// Absolute piece values by type, used by SEE and exchange logic.
pub const PIECE_TYPE_VAL: [i32; 6] = [100, 325, 325, 500, 950, 10_000];

/// Material values by type for the static eval; kings carry no material.
const MATERIAL: [i32; 6] = [100, 325, 325, 500, 950, 0];

const PAWN_FILE: [i32; 8] = [-4, -2, 0, 4, 4, 0, -2, -4];
const PAWN_RANK: [i32; 8] = [0, 0, 2, 6, 10, 16, 24, 0];
const KNIGHT_FILE: [i32; 8] = [-8, -2, 2, 6, 6, 2, -2, -8];
const KNIGHT_RANK: [i32; 8] = [-10, -4, 2, 6, 8, 10, 4, -2];
const CENTER_FILE: [i32; 8] = [-4, -2, 0, 2, 2, 0, -2, -4];
const KING_FILE: [i32; 8] = [3, 4, 2, 0, 0, 2, 4, 3];
const KING_RANK: [i32; 8] = [1, 0, -2, -4, -6, -8, -10, -12];
const LONG_DIAG: i32 = 10;

/// Piece-square tables indexed by `[piece code][square]`, white positive.
static PSQ: Lazy<[[i32; 64]; 12]> = Lazy::new(build_psq);

fn build_psq() -> [[i32; 64]; 12] {
    let mut tab = [[0i32; 64]; 12];

    for sq in 0..64usize {
        let fl = sq % 8;
        let rk = sq / 8;

        tab[Piece::WP.code() as usize][sq] = PAWN_FILE[fl] + PAWN_RANK[rk];
        tab[Piece::WN.code() as usize][sq] = KNIGHT_FILE[fl] + KNIGHT_RANK[rk];
        tab[Piece::WB.code() as usize][sq] = CENTER_FILE[fl] + CENTER_FILE[rk] * 2;
        tab[Piece::WR.code() as usize][sq] = CENTER_FILE[fl] * 5;
        tab[Piece::WQ.code() as usize][sq] = CENTER_FILE[fl] + CENTER_FILE[rk];
        tab[Piece::WK.code() as usize][sq] = (KING_FILE[fl] + KING_RANK[rk]) * 8;
    }

    // Nudge the center pawns toward e4/d4.
    {
        use ironbit_core::types::square::*;
        let wp = Piece::WP.code() as usize;
        tab[wp][E2 as usize] = 0;
        tab[wp][D2 as usize] = 0;
        tab[wp][E3 as usize] = 6;
        tab[wp][D3 as usize] = 6;
        tab[wp][E4 as usize] = 24;
        tab[wp][D4 as usize] = 20;
        tab[wp][C4 as usize] = 12;
    }

    // Long diagonals are worth extra for bishops.
    let wb = Piece::WB.code() as usize;
    let mut sq = 0usize;
    while sq < 64 {
        tab[wb][sq] += LONG_DIAG - 2;
        sq += 9;
    }
    let mut sq = 7usize;
    while sq <= 56 {
        tab[wb][sq] += LONG_DIAG;
        sq += 7;
    }

    // Black mirrors white with the sign flipped.
    for kind in PieceType::ALL {
        let white = Piece::new(kind, Color::White).code() as usize;
        let black = Piece::new(kind, Color::Black).code() as usize;
        for sq in 0..64usize {
            let mirrored = (7 - sq / 8) * 8 + sq % 8;
            tab[black][sq] = -tab[white][mirrored];
        }
    }

    tab
}

/// Evaluate from white's point of view.
pub fn evaluate(b: &Board) -> i32 {
    let mut ev = 0i32;
    for sq in 0..64usize {
        let pc = b.squares[sq];
        if pc.is_empty() {
            continue;
        }
        let material = MATERIAL[pc.kind().idx()];
        ev += match pc.color() {
            Color::White => material,
            Color::Black => -material,
        };
        ev += PSQ[pc.code() as usize][sq];
    }
    ev
}

/// Convert a white-view score to the side to move.
#[inline(always)]
pub fn sign_eval(stm: Color, ev: i32) -> i32 {
    match stm {
        Color::White => ev,
        Color::Black => -ev,
    }
}

/// Piece-square component for one piece, for diagnostics.
pub fn psq_score(pc: Piece, sq: u8) -> i32 {
    PSQ[pc.code() as usize][sq as usize]
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod eval_tests;
