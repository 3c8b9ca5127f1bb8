//! Move application and reversal with incremental Zobrist hashing.
//!
//! `make_move` applies a move, maintaining the hash by XORing the key of
//! every square whose occupancy changed plus the castling, en-passant and
//! side deltas. If the mover's king ends up attacked the move is rolled
//! back and rejected. `unmake_move` is the exact inverse of a successful
//! make; after the pair the position is bit-identical, hash included.

use crate::zobrist;

use super::attack_tables::PAWN_ATTACKS;
use super::error::MoveError;
use super::types::{Bitboard, CASTLE_CLEAR_MASK, Color, Move, Piece, Square};
use super::{NullUndo, Position, Undo};

impl Position {
    /// Apply `m` for the side to move.
    ///
    /// Returns the snapshot needed by [`Position::unmake_move`], or
    /// `MoveError::Illegal` if the move does not fit the current position
    /// or would leave the mover's king in check. On error the position is
    /// unchanged.
    pub fn make_move(&mut self, m: Move) -> Result<Undo, MoveError> {
        let from = m.from();
        let to = m.to();
        let color = self.stm;

        let Some((piece_color, piece)) = self.piece_at(from) else {
            return Err(MoveError::Illegal);
        };
        if piece_color != color {
            return Err(MoveError::Illegal);
        }

        // Identify the capture up front so every precondition is checked
        // before the first mutation.
        let captured = if m.is_en_passant() {
            if piece != Piece::Pawn || self.en_passant != Some(to) {
                return Err(MoveError::Illegal);
            }
            let Some(cap_sq) = to.offset(-color.pawn_direction(), 0) else {
                return Err(MoveError::Illegal);
            };
            match self.piece_at(cap_sq) {
                Some((c, Piece::Pawn)) if c == color.opponent() => Some((c, Piece::Pawn, cap_sq)),
                _ => return Err(MoveError::Illegal),
            }
        } else {
            match self.piece_at(to) {
                Some((c, _)) if c == color => return Err(MoveError::Illegal),
                Some((c, p)) => {
                    if !m.is_capture() {
                        return Err(MoveError::Illegal);
                    }
                    Some((c, p, to))
                }
                None => {
                    if m.is_capture() {
                        return Err(MoveError::Illegal);
                    }
                    None
                }
            }
        };

        // Castling preconditions: king on its initial square, rook on its
        // corner. Square safety is the generator's responsibility.
        let rook_squares = if m.is_castling() {
            let back = color.back_rank();
            let (rook_from, rook_to) = if m.is_castle_kingside() {
                (Square::new(back, 7), Square::new(back, 5))
            } else {
                (Square::new(back, 0), Square::new(back, 3))
            };
            if piece != Piece::King || from != Square::new(back, 4) {
                return Err(MoveError::Illegal);
            }
            if self.piece_at(rook_from) != Some((color, Piece::Rook)) {
                return Err(MoveError::Illegal);
            }
            Some((rook_from, rook_to))
        } else {
            None
        };

        let undo = Undo {
            captured: captured.map(|(c, p, _)| (c, p)),
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            hash: self.hash,
        };

        let mut hash = self.hash;
        hash ^= zobrist::side_key();

        // Clocks
        if piece == Piece::Pawn || captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if color == Color::Black {
            self.fullmove_number += 1;
        }

        // En passant: clear the old square, set the jumped-over square on
        // a double push
        if let Some(old_ep) = self.en_passant.take() {
            hash ^= zobrist::ep_key(old_ep);
        }

        if let Some((cap_color, cap_piece, cap_sq)) = captured {
            self.remove_piece(cap_color, cap_piece, cap_sq);
            hash ^= zobrist::piece_key(cap_color, cap_piece, cap_sq);
        }

        if let Some((rook_from, rook_to)) = rook_squares {
            self.move_piece(color, Piece::Rook, rook_from, rook_to);
            hash ^= zobrist::piece_key(color, Piece::Rook, rook_from);
            hash ^= zobrist::piece_key(color, Piece::Rook, rook_to);
        }

        self.move_piece(color, piece, from, to);
        hash ^= zobrist::piece_key(color, piece, from);
        hash ^= zobrist::piece_key(color, piece, to);

        if let Some(promo) = m.promotion_piece() {
            self.remove_piece(color, Piece::Pawn, to);
            self.put_piece(color, promo, to);
            hash ^= zobrist::piece_key(color, Piece::Pawn, to);
            hash ^= zobrist::piece_key(color, promo, to);
        }

        if m.is_double_push() && piece == Piece::Pawn {
            let ep_rank = (from.rank() + to.rank()) / 2;
            let ep_sq = Square::new(ep_rank, from.file());
            // The target is only recorded when an enemy pawn attacks it
            // from an adjacent file; a square nothing can capture on must
            // not leak into the hash or the FEN output
            let capturers = Bitboard(PAWN_ATTACKS[color.index()][ep_sq.index()])
                & self.pieces(color.opponent(), Piece::Pawn);
            if !capturers.is_empty() {
                self.en_passant = Some(ep_sq);
                hash ^= zobrist::ep_key(ep_sq);
            }
        }

        // Castling rights: both endpoints go through the clear-mask table,
        // covering the king move, rook moves, and rook captures at once
        let old_rights = self.castling.as_u8();
        self.castling
            .clear_mask(CASTLE_CLEAR_MASK[from.index()] | CASTLE_CLEAR_MASK[to.index()]);
        if self.castling.as_u8() != old_rights {
            hash ^= zobrist::castling_key(old_rights);
            hash ^= zobrist::castling_key(self.castling.as_u8());
        }

        self.hash = hash;
        self.stm = color.opponent();

        if self.is_square_attacked(self.king_square(color), color.opponent()) {
            self.unmake_move(m, undo);
            return Err(MoveError::Illegal);
        }

        Ok(undo)
    }

    /// Reverse a move made by [`Position::make_move`]. Must be called with
    /// the move and snapshot of the most recent successful make.
    pub fn unmake_move(&mut self, m: Move, undo: Undo) {
        let color = self.stm.opponent();
        self.stm = color;

        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
        if color == Color::Black {
            self.fullmove_number -= 1;
        }

        let from = m.from();
        let to = m.to();

        if m.is_castling() {
            let back = color.back_rank();
            let (rook_from, rook_to) = if m.is_castle_kingside() {
                (Square::new(back, 7), Square::new(back, 5))
            } else {
                (Square::new(back, 0), Square::new(back, 3))
            };
            self.move_piece(color, Piece::King, to, from);
            self.move_piece(color, Piece::Rook, rook_to, rook_from);
            return;
        }

        if let Some(promo) = m.promotion_piece() {
            self.remove_piece(color, promo, to);
            self.put_piece(color, Piece::Pawn, from);
        } else {
            let (_, piece) = self
                .piece_at(to)
                .expect("unmake: destination square is empty");
            self.move_piece(color, piece, to, from);
        }

        if let Some((cap_color, cap_piece)) = undo.captured {
            let cap_sq = if m.is_en_passant() {
                to.offset(-color.pawn_direction(), 0)
                    .expect("unmake: en-passant capture square off board")
            } else {
                to
            };
            self.put_piece(cap_color, cap_piece, cap_sq);
        }
    }

    /// Pass the move: flip the side to move and clear the en-passant
    /// square, updating the hash. Not valid while in check.
    pub fn make_null_move(&mut self) -> NullUndo {
        debug_assert!(!self.in_check(), "null move while in check");

        let undo = NullUndo {
            en_passant: self.en_passant,
            hash: self.hash,
        };

        let mut hash = self.hash ^ zobrist::side_key();
        if let Some(ep) = self.en_passant.take() {
            hash ^= zobrist::ep_key(ep);
        }
        self.hash = hash;
        self.stm = self.stm.opponent();
        undo
    }

    /// Reverse a null move.
    pub fn unmake_null_move(&mut self, undo: NullUndo) {
        self.stm = self.stm.opponent();
        self.en_passant = undo.en_passant;
        self.hash = undo.hash;
    }
}
