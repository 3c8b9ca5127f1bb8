//! FEN parsing/emission and UCI move text.

use std::str::FromStr;

use super::attack_tables::PAWN_ATTACKS;
use super::error::{FenError, MoveError};
use super::types::{file_to_index, rank_to_index, Bitboard, Color, Move, Piece, Square};
use super::Position;

const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    /// Parse a position from FEN notation. The literal `startpos` is a
    /// synonym for the standard starting position.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let fen = if fen.trim() == "startpos" {
            STARTPOS_FEN
        } else {
            fen
        };

        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let mut pos = Position::empty();

        // Piece placement, ranks 8 down to 1
        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::BadRankLayout);
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx;
            let mut file = 0usize;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as usize;
                } else {
                    let color = if c.is_ascii_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let piece = Piece::from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::BadRankLayout);
                    }
                    pos.put_piece(color, piece, Square::new(rank, file));
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::BadRankLayout);
            }
        }

        for color in Color::BOTH {
            let kings = pos.pieces(color, Piece::King).popcount();
            if kings != 1 {
                return Err(FenError::WrongKingCount {
                    color_name: if color == Color::White { "white" } else { "black" },
                    count: kings,
                });
            }
        }

        pos.stm = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        for c in parts[2].chars() {
            match c {
                'K' => pos.castling.grant(Color::White, true),
                'Q' => pos.castling.grant(Color::White, false),
                'k' => pos.castling.grant(Color::Black, true),
                'q' => pos.castling.grant(Color::Black, false),
                '-' => {}
                _ => return Err(FenError::InvalidCastling { char: c }),
            }
        }

        pos.en_passant = if parts[3] == "-" {
            None
        } else {
            let sq = Square::from_str(parts[3])?;
            if sq.rank() != 2 && sq.rank() != 5 {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            // A pawn of the side to move must attack the target from an
            // adjacent file, or the square cannot be a capture target
            let capturers = Bitboard(PAWN_ATTACKS[pos.stm.opponent().index()][sq.index()])
                & pos.pieces(pos.stm, Piece::Pawn);
            if capturers.is_empty() {
                return Err(FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                });
            }
            Some(sq)
        };

        if let Some(half) = parts.get(4) {
            pos.halfmove_clock = half.parse().unwrap_or(0);
        }
        if let Some(full) = parts.get(5) {
            pos.fullmove_number = full.parse().unwrap_or(1).max(1);
        }

        pos.hash = pos.recompute_hash();
        Ok(pos)
    }

    /// Replace this position with one parsed from `fen`. On malformed
    /// input the position is left unchanged.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), FenError> {
        *self = Position::from_fen(fen)?;
        Ok(())
    }

    /// Emit the position as a six-field FEN string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut placement = String::new();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match self.piece_at(Square::new(rank, file)) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            placement.push_str(&empty.to_string());
                            empty = 0;
                        }
                        placement.push(piece.to_fen_char(color));
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                placement.push_str(&empty.to_string());
            }
            if rank > 0 {
                placement.push('/');
            }
        }

        let stm = if self.stm == Color::White { "w" } else { "b" };

        let mut castling = String::new();
        if self.castling.has(Color::White, true) {
            castling.push('K');
        }
        if self.castling.has(Color::White, false) {
            castling.push('Q');
        }
        if self.castling.has(Color::Black, true) {
            castling.push('k');
        }
        if self.castling.has(Color::Black, false) {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let ep = self
            .en_passant
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{placement} {stm} {castling} {ep} {} {}",
            self.halfmove_clock, self.fullmove_number
        )
    }

    /// Resolve 4- or 5-character move text ("e2e4", "e7e8q") against the
    /// legal move list without applying it.
    pub fn parse_uci_move(&mut self, text: &str) -> Result<Move, MoveError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() < 4 || chars.len() > 5 {
            return Err(MoveError::InvalidLength { len: chars.len() });
        }
        if !('a'..='h').contains(&chars[0])
            || !('1'..='8').contains(&chars[1])
            || !('a'..='h').contains(&chars[2])
            || !('1'..='8').contains(&chars[3])
        {
            return Err(MoveError::InvalidNotation {
                notation: text.to_string(),
            });
        }

        let from = Square::new(rank_to_index(chars[1]), file_to_index(chars[0]));
        let to = Square::new(rank_to_index(chars[3]), file_to_index(chars[2]));
        let promotion = match chars.get(4) {
            None => None,
            Some(&c) => match Piece::from_char(c) {
                Some(p @ (Piece::Queen | Piece::Rook | Piece::Bishop | Piece::Knight)) => Some(p),
                _ => {
                    return Err(MoveError::InvalidNotation {
                        notation: text.to_string(),
                    })
                }
            },
        };

        self.generate_legal()
            .iter()
            .copied()
            .find(|m| m.from() == from && m.to() == to && m.promotion_piece() == promotion)
            .ok_or(MoveError::Illegal)
    }

    /// Parse move text and apply it to the position.
    pub fn play_uci_move(&mut self, text: &str) -> Result<Move, MoveError> {
        let mv = self.parse_uci_move(text)?;
        self.make_move(mv)?;
        Ok(mv)
    }
}

impl FromStr for Position {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
