//! Perft: exhaustive legal-move tree counts.
//!
//! The correctness oracle for move generation and make/unmake. No
//! pruning, no evaluation; just count the leaves.

use crate::board::Board;
use crate::movegen::gen_legal;
use crate::moves::{Move, MoveList};

/// Count leaf nodes of the legal move tree to `depth`.
pub fn perft(b: &mut Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    fn inner(b: &mut Board, depth: u8, layers: &mut [MoveList]) -> u64 {
        if depth == 0 {
            return 1;
        }

        let (ml, rest) = layers
            .split_first_mut()
            .expect("perft requires one move buffer per remaining ply");

        gen_legal(b, ml);

        if depth == 1 {
            return ml.len() as u64;
        }

        let mut nodes = 0u64;
        for ix in 0..ml.len() {
            let mv = ml[ix];
            b.make(mv);
            nodes += inner(b, depth - 1, rest);
            b.unmake(mv);
        }
        nodes
    }

    let mut layers = vec![MoveList::with_capacity(64); depth as usize];
    inner(b, depth, &mut layers[..])
}

/// Per-root-move leaf counts plus the total, for the `perft` debug
/// command.
pub fn perft_divide(b: &mut Board, depth: u8) -> (Vec<(Move, u64)>, u64) {
    if depth == 0 {
        return (Vec::new(), 1);
    }

    let mut ml = MoveList::with_capacity(64);
    gen_legal(b, &mut ml);

    let mut per_move = Vec::with_capacity(ml.len());
    let mut total = 0u64;
    for ix in 0..ml.len() {
        let mv = ml[ix];
        b.make(mv);
        let nodes = perft(b, depth - 1);
        b.unmake(mv);
        per_move.push((mv, nodes));
        total += nodes;
    }
    (per_move, total)
}
