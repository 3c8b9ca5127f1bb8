//! Square type and utilities.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::error::FenError;

pub(crate) fn file_to_index(file: char) -> usize {
    file as usize - ('a' as usize)
}

pub(crate) fn rank_to_index(rank: char) -> usize {
    (rank as usize) - ('1' as usize)
}

/// A square on the chess board, stored as a compact 0-63 index.
///
/// Index layout: rank * 8 + file, where a1=0, b1=1, ..., h8=63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Square(u8);

impl Square {
    /// Create a square from rank and file (both 0-7).
    /// Does not bounds-check; callers pass values derived from valid squares.
    #[inline]
    #[must_use]
    pub const fn new(rank: usize, file: usize) -> Self {
        Square((rank * 8 + file) as u8)
    }

    /// Create a square from an index (0-63).
    #[inline]
    #[must_use]
    pub const fn from_index(idx: usize) -> Self {
        Square(idx as u8)
    }

    /// The square's index (0-63, a1=0, b1=1, ..., h8=63).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Rank of the square (0-7, where 0 = rank 1).
    #[inline]
    #[must_use]
    pub const fn rank(self) -> usize {
        (self.0 / 8) as usize
    }

    /// File of the square (0-7, where 0 = file a).
    #[inline]
    #[must_use]
    pub const fn file(self) -> usize {
        (self.0 % 8) as usize
    }

    /// Offset the square by rank/file deltas, staying on the board.
    #[must_use]
    pub fn offset(self, dr: isize, df: isize) -> Option<Self> {
        let nr = self.rank() as isize + dr;
        let nf = self.file() as isize + df;
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            Some(Square::new(nr as usize, nf as usize))
        } else {
            None
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (self.file() as u8 + b'a') as char,
            self.rank() + 1
        )
    }
}

impl FromStr for Square {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(FenError::InvalidEnPassant {
                found: s.to_string(),
            });
        };
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(FenError::InvalidEnPassant {
                found: s.to_string(),
            });
        }
        Ok(Square::new(rank_to_index(rank), file_to_index(file)))
    }
}
