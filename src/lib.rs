//! Bitboard chess engine core.
//!
//! Provides the hard parts of a chess engine as a library:
//! - Bitboard board representation with precomputed attack tables
//! - Fully legal move generation validated against perft
//! - Incremental make/unmake with Zobrist position hashing
//! - Iterative-deepening alpha-beta search with a transposition table
//!
//! # Quick start
//!
//! ```
//! use finback::board::{think, Position, SearchLimits};
//! use finback::sync::CancelToken;
//! use finback::tt::TranspositionTable;
//!
//! let mut pos = Position::from_fen("startpos").unwrap();
//! pos.play_uci_move("e2e4").unwrap();
//! pos.play_uci_move("e7e5").unwrap();
//!
//! let mut tt = TranspositionTable::new(16);
//! let cancel = CancelToken::new();
//! let limits = SearchLimits::depth(5);
//! let outcome = think(&mut pos, &limits, &mut tt, &cancel, None);
//! assert!(outcome.best_move.is_some());
//! ```
//!
//! # Features
//!
//! - `serde` - serialization for `Piece`, `Color`, `Square`, `Move`, and
//!   `CastlingRights`

// Enable pedantic lints with sensible domain-specific exceptions
#![warn(clippy::pedantic)]
// Bitboard hex literals are clearer without separators (bit patterns visible)
#![allow(clippy::unreadable_literal)]
// Chess engines have intentionally similar names (rook_from/rook_to, etc.)
#![allow(clippy::similar_names)]
// Index casts are ubiquitous and safe in chess (board indices, square indices)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
// Module-level documentation is sufficient for this codebase
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod board;
pub mod options;
pub mod sync;
pub mod tt;
pub mod zobrist;
