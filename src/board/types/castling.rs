//! Castling rights type.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Color;

pub(crate) const CASTLE_WHITE_K: u8 = 1 << 0;
pub(crate) const CASTLE_WHITE_Q: u8 = 1 << 1;
pub(crate) const CASTLE_BLACK_K: u8 = 1 << 2;
pub(crate) const CASTLE_BLACK_Q: u8 = 1 << 3;

const ALL_RIGHTS: u8 = CASTLE_WHITE_K | CASTLE_WHITE_Q | CASTLE_BLACK_K | CASTLE_BLACK_Q;

/// Castling rights represented as a bitmask (bits: K, Q, k, q).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights.
    #[inline]
    #[must_use]
    pub const fn none() -> Self {
        CastlingRights(0)
    }

    /// All four castling rights.
    #[inline]
    #[must_use]
    pub const fn all() -> Self {
        CastlingRights(ALL_RIGHTS)
    }

    /// Check whether a specific right is set.
    #[inline]
    #[must_use]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::bit_for(color, kingside) != 0
    }

    /// Grant a specific right.
    #[inline]
    pub fn grant(&mut self, color: Color, kingside: bool) {
        self.0 |= Self::bit_for(color, kingside);
    }

    /// Raw bitmask value, used as the Zobrist castling index.
    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Clear the rights named by a mask.
    #[inline]
    pub(crate) fn clear_mask(&mut self, mask: u8) {
        self.0 &= !mask;
    }

    #[inline]
    const fn bit_for(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => CASTLE_WHITE_K,
            (Color::White, false) => CASTLE_WHITE_Q,
            (Color::Black, true) => CASTLE_BLACK_K,
            (Color::Black, false) => CASTLE_BLACK_Q,
        }
    }
}

/// Per-square castling-right clear masks.
///
/// Applied to both the from- and to-square of every move: a king or rook
/// leaving its initial square and a rook being captured on its corner both
/// clear the affected rights through the same table.
pub(crate) const CASTLE_CLEAR_MASK: [u8; 64] = {
    let mut table = [0u8; 64];
    table[0] = CASTLE_WHITE_Q; // a1
    table[4] = CASTLE_WHITE_K | CASTLE_WHITE_Q; // e1
    table[7] = CASTLE_WHITE_K; // h1
    table[56] = CASTLE_BLACK_Q; // a8
    table[60] = CASTLE_BLACK_K | CASTLE_BLACK_Q; // e8
    table[63] = CASTLE_BLACK_K; // h8
    table
};
