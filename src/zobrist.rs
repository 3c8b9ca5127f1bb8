//! Zobrist hashing keys.
//!
//! One random 64-bit key per (piece, square), one per castling-rights mask,
//! one per en-passant file, and one for the side to move. The generator is
//! seeded with a fixed constant so position hashes are stable across runs.
//! All tables are read-only after first use.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{Color, Piece, Square};

const ZOBRIST_SEED: u64 = 0x9E3779B97F4A7C15;

struct ZobristKeys {
    piece_square: [[u64; 64]; 12],
    castling: [u64; 16],
    ep_file: [u64; 8],
    side_to_move: u64,
}

static KEYS: Lazy<ZobristKeys> = Lazy::new(|| {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut piece_square = [[0u64; 64]; 12];
    for square_keys in &mut piece_square {
        for key in square_keys.iter_mut() {
            *key = rng.gen();
        }
    }
    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = rng.gen();
    }
    let mut ep_file = [0u64; 8];
    for key in &mut ep_file {
        *key = rng.gen();
    }
    ZobristKeys {
        piece_square,
        castling,
        ep_file,
        side_to_move: rng.gen(),
    }
});

/// Key for a piece of a color on a square.
#[inline]
#[must_use]
pub fn piece_key(color: Color, piece: Piece, sq: Square) -> u64 {
    KEYS.piece_square[color.index() * 6 + piece.index()][sq.index()]
}

/// Key for a castling-rights bitmask (0-15).
#[inline]
#[must_use]
pub fn castling_key(rights_mask: u8) -> u64 {
    KEYS.castling[rights_mask as usize]
}

/// Key for the file of an en-passant target square.
#[inline]
#[must_use]
pub fn ep_key(sq: Square) -> u64 {
    KEYS.ep_file[sq.file()]
}

/// Key XORed in when black is to move.
#[inline]
#[must_use]
pub fn side_key() -> u64 {
    KEYS.side_to_move
}
