mod attack_tables;
mod error;
mod eval;
mod fen;
mod make_unmake;
mod movegen;
mod search;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use error::{FenError, MoveError};
pub use search::{
    think, InfoCallback, SearchLimits, SearchOutcome, SearchReport, MATE_BOUND, MATE_SCORE,
};
pub use state::{NullUndo, Position, Undo};
pub use types::{Bitboard, BitboardIter, CastlingRights, Color, Move, MoveList, Piece, Square};

pub(crate) use types::{ScoredMoveList, MAX_PLY};
