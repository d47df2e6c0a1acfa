// Perft using make/unmake on a single position, one generator per depth.
use rayon::prelude::*;

use crate::board::{GenMode, Move, MoveGenerator, Position};

pub fn perft(board: &mut Position, depth: u32) -> u64 {
    let mut gens: Vec<MoveGenerator> = (0..depth).map(|_| MoveGenerator::new()).collect();
    perft_with(board, depth, &mut gens)
}

fn perft_with(board: &mut Position, depth: u32, gens: &mut [MoveGenerator]) -> u64 {
    if depth == 0 { return 1; }
    let Some((gen, rest)) = gens.split_first_mut() else { return 1; };
    let us = board.side_to_move();
    let count = gen.generate(board, GenMode::All).len();
    let mut nodes = 0u64;
    for i in 0..count {
        let mv = gen.list().get(i);
        board.make_move(mv);
        if !board.is_check_for(us) { nodes += perft_with(board, depth - 1, rest); }
        board.undo_move(mv);
    }
    nodes
}

/// Leaf counts per legal root move, in generation order.
pub fn divide(board: &mut Position, depth: u32) -> Vec<(Move, u64)> {
    let root = board.legal_moves();
    root.into_iter()
        .map(|mv| {
            board.make_move(mv);
            let n = perft(board, depth.saturating_sub(1));
            board.undo_move(mv);
            (mv, n)
        })
        .collect()
}

/// Root-split perft on the rayon pool; each root move gets its own copy.
pub fn perft_parallel(board: &Position, depth: u32) -> u64 {
    if depth == 0 { return 1; }
    let mut root = board.clone();
    let moves = root.legal_moves();
    moves.par_iter().map(|&mv| {
        let mut b = board.clone();
        b.make_move(mv);
        perft(&mut b, depth - 1)
    }).sum()
}
