use crate::board::position::{BISHOP_DELTAS, KNIGHT_DELTAS, QUEEN_DELTAS, ROOK_DELTAS};
use crate::board::{Color, PieceType, Position, Square, MAX_PLY};

// Score bounds and mate scoring helpers
pub const INFINITE: i32 = 200_000;
pub const MATE_SCORE: i32 = 100_000;
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;
pub const DRAW_SCORE: i32 = 0;

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    let a = score.abs();
    a >= MATE_THRESHOLD && a <= MATE_SCORE
}

/// Leaf scoring oracle. Scores are from the side-to-move perspective
/// (negamax-friendly) and must stay inside `(-MATE_THRESHOLD, MATE_THRESHOLD)`.
pub trait Evaluator: Send {
    fn evaluate(&self, pos: &Position) -> i32;
}

const TEMPO: i32 = 1;
const MATERIAL_WEIGHT: i32 = 100;
const MOBILITY_WEIGHT: i32 = 80;
const MAX_WEIGHT: i32 = 100;

/// Material plus piece mobility, with a small tempo bonus.
#[derive(Clone, Copy, Debug, Default)]
pub struct Material;

impl Evaluator for Material {
    fn evaluate(&self, pos: &Position) -> i32 {
        let us = pos.side_to_move();
        let them = !us;
        let material = (material_cp(pos, us) - material_cp(pos, them)) * MATERIAL_WEIGHT / MAX_WEIGHT;
        let mobility = (mobility(pos, us) - mobility(pos, them)) * MOBILITY_WEIGHT / MAX_WEIGHT;
        material + mobility + TEMPO
    }
}

// Side material without the king
fn material_cp(pos: &Position, color: Color) -> i32 {
    pos.material(color) - PieceType::King.value()
}

// Side-agnostic material in centipawns: positive means White has more material.
pub fn material_eval_cp_side_agnostic(pos: &Position) -> i32 {
    material_cp(pos, Color::White) - material_cp(pos, Color::Black)
}

fn mobility(pos: &Position, color: Color) -> i32 {
    let mut score = 0;
    for sq in pos.pieces(color, PieceType::Knight) { score += 4 * reach(pos, color, sq, &KNIGHT_DELTAS, false); }
    for sq in pos.pieces(color, PieceType::Bishop) { score += 5 * reach(pos, color, sq, &BISHOP_DELTAS, true); }
    for sq in pos.pieces(color, PieceType::Rook) { score += 2 * reach(pos, color, sq, &ROOK_DELTAS, true); }
    for sq in pos.pieces(color, PieceType::Queen) { score += reach(pos, color, sq, &QUEEN_DELTAS, true); }
    score
}

// Squares a piece could move to (empty or enemy-occupied)
fn reach(pos: &Position, color: Color, from: Square, deltas: &[(i8, i8)], slide: bool) -> i32 {
    let mut n = 0;
    for &(df, dr) in deltas {
        let mut cur = from;
        while let Some(to) = cur.offset(df, dr) {
            match pos.piece_at(to) {
                None => n += 1,
                Some(p) => {
                    if p.color != color { n += 1; }
                    break;
                }
            }
            if !slide { break; }
            cur = to;
        }
    }
    n
}
