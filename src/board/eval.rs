//! Static evaluation.
//!
//! Material only: the score is the signed sum of piece values, returned
//! from the side-to-move's perspective so the search can negate it at
//! every ply. Richer evaluators replace this method; everything else in
//! the search treats the score as opaque centipawns.

use super::types::{Color, Piece};
use super::Position;

impl Position {
    /// Static score in centipawns, positive when the side to move is ahead.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        let mut score = 0;
        for color in Color::BOTH {
            for piece in [
                Piece::Pawn,
                Piece::Knight,
                Piece::Bishop,
                Piece::Rook,
                Piece::Queen,
            ] {
                score +=
                    color.sign() * self.pieces(color, piece).popcount() as i32 * piece.value();
            }
        }
        if self.stm == Color::White {
            score
        } else {
            -score
        }
    }
}
