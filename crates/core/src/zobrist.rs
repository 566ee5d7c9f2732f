//! Zobrist hashing.
//!
//! The board key XORs one random value per (piece, square) and flips all
//! bits when black is to move, so make/unmake updates it in O(1). The
//! *full key* additionally folds in the en-passant file and the castling
//! state; it is used only for transposition-table addressing, never for
//! position equality.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::castling::Castling;
use crate::types::Piece;

/// Fixed seed keeps keys reproducible across runs.
const ZOBRIST_SEED: u64 = 1013;

pub struct ZobristKeys {
    /// One key per piece code per square.
    piece_sq: [[u64; 64]; 12],
    /// One key per en-passant file.
    ep_file: [u64; 8],
    /// One key per castling-rights state.
    castling: [u64; 16],
}

pub static ZOBRIST: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut keys = ZobristKeys {
        piece_sq: [[0; 64]; 12],
        ep_file: [0; 8],
        castling: [0; 16],
    };
    for pc in 0..12 {
        for sq in 0..64 {
            keys.piece_sq[pc][sq] = rng.gen();
        }
    }
    for file in 0..8 {
        keys.ep_file[file] = rng.gen();
    }
    for state in 0..16 {
        keys.castling[state] = rng.gen();
    }
    keys
});

impl ZobristKeys {
    #[inline(always)]
    pub fn piece_sq(&self, pc: Piece, sq: u8) -> u64 {
        debug_assert!(!pc.is_empty());
        self.piece_sq[pc.code() as usize][sq as usize]
    }

    /// Key for the current en-passant state; square 0 means none.
    #[inline(always)]
    pub fn ep(&self, ep_sq: u8) -> u64 {
        if ep_sq == 0 {
            return 0;
        }
        self.ep_file[(ep_sq % 8) as usize]
    }

    #[inline(always)]
    pub fn castling(&self, castling: Castling) -> u64 {
        self.castling[castling.bits() as usize]
    }
}

/// Side-to-move is folded in by complementing the whole key.
#[inline(always)]
pub fn flip_side(key: u64) -> u64 {
    !key
}

#[cfg(test)]
#[path = "zobrist_tests.rs"]
mod zobrist_tests;
