//! FEN and move-notation boundary parsing.

use std::str::FromStr;

use super::error::ChessParseError;
use super::types::{
    CastlingRights, Color, Move, MoveList, Piece, PieceKind, Square, RANK_1, RANK_8,
};
use super::Position;

impl Position {
    /// Parse a 4- or 6-field FEN string.
    ///
    /// Rejects malformed boards (wrong rank/file counts, unknown letters,
    /// missing or duplicated kings, pawns on the back ranks), an illegal
    /// side to move (the opponent's king already attacked), bad castling
    /// or en-passant fields and negative clocks.
    pub fn from_fen(fen: &str) -> Result<Self, ChessParseError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(ChessParseError::TooFewFields {
                found: fields.len(),
            });
        }

        let mut pos = Position::empty_board();

        // board: ranks top-down, '/'-separated
        let ranks: Vec<&str> = fields[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(ChessParseError::MalformedBoard {
                detail: format!("expected 8 ranks, found {}", ranks.len()),
            });
        }
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(skip) = c.to_digit(10) {
                    file += skip as u8;
                } else {
                    let piece = Piece::from_fen_char(c)
                        .ok_or(ChessParseError::InvalidPiece { letter: c })?;
                    if file >= 8 {
                        return Err(ChessParseError::MalformedBoard {
                            detail: format!("rank {} overflows 8 files", rank + 1),
                        });
                    }
                    pos.set_piece(Square::new(file, rank), piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(ChessParseError::MalformedBoard {
                    detail: format!("rank {} has {} files", rank + 1, file),
                });
            }
        }

        pos.whites_turn = match fields[1] {
            "w" => true,
            "b" => false,
            other => {
                return Err(ChessParseError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        if fields[2] != "-" {
            for c in fields[2].chars() {
                let (color, short) = match c {
                    'K' => (Color::White, true),
                    'Q' => (Color::White, false),
                    'k' => (Color::Black, true),
                    'q' => (Color::Black, false),
                    _ => return Err(ChessParseError::InvalidCastling { letter: c }),
                };
                let rights = &mut pos.castling_rights[color.index()];
                *rights = match (short, *rights) {
                    (true, CastlingRights::None) => CastlingRights::Short,
                    (true, CastlingRights::Long) => CastlingRights::All,
                    (false, CastlingRights::None) => CastlingRights::Long,
                    (false, CastlingRights::Short) => CastlingRights::All,
                    (_, unchanged) => unchanged,
                };
            }
        }

        if fields[3] != "-" {
            let sq = Square::from_str(fields[3]).map_err(|_| ChessParseError::InvalidEnPassant {
                found: fields[3].to_string(),
            })?;
            let expected_rank = if pos.whites_turn { 5 } else { 2 };
            if sq.rank() != expected_rank {
                return Err(ChessParseError::InvalidEnPassant {
                    found: fields[3].to_string(),
                });
            }
            pos.en_passant_file = Some(sq.file());
        }

        if fields.len() >= 6 {
            pos.fifty_move_clock =
                fields[4]
                    .parse::<u16>()
                    .map_err(|_| ChessParseError::InvalidClock {
                        found: fields[4].to_string(),
                    })?;
            let full_moves: u16 =
                fields[5]
                    .parse::<u16>()
                    .map_err(|_| ChessParseError::InvalidClock {
                        found: fields[5].to_string(),
                    })?;
            pos.half_move_index =
                (full_moves.max(1) - 1) * 2 + u16::from(!pos.whites_turn);
        }

        pos.check_parsed_board()?;
        pos.refresh_derived_state();
        Ok(pos)
    }

    fn check_parsed_board(&self) -> Result<(), ChessParseError> {
        if self.pieces(Piece::WhiteKing).pop_count() != 1
            || self.pieces(Piece::BlackKing).pop_count() != 1
        {
            return Err(ChessParseError::MalformedBoard {
                detail: "each side needs exactly one king".to_string(),
            });
        }
        let pawns = self.pieces(Piece::WhitePawn) | self.pieces(Piece::BlackPawn);
        if !(pawns & (RANK_1 | RANK_8)).is_empty() {
            return Err(ChessParseError::MalformedBoard {
                detail: "pawn on a back rank".to_string(),
            });
        }
        // the side not to move must not be in check
        let us = self.side_to_move();
        let them = us.opponent();
        if self.is_square_attacked(self.king_square(them), us, self.all_occupied()) {
            return Err(ChessParseError::InvalidSideToMove {
                found: "side to move could capture the king".to_string(),
            });
        }
        Ok(())
    }

    /// Emit a 6-field FEN. Any position parsed from a 6-field FEN
    /// round-trips exactly.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut board = String::new();
        for rank in (0..8).rev() {
            let mut empty_run = 0;
            for file in 0..8 {
                let piece = self.piece_at(Square::new(file, rank));
                if piece.is_none() {
                    empty_run += 1;
                } else {
                    if empty_run > 0 {
                        board.push_str(&empty_run.to_string());
                        empty_run = 0;
                    }
                    board.push(piece.fen_char());
                }
            }
            if empty_run > 0 {
                board.push_str(&empty_run.to_string());
            }
            if rank > 0 {
                board.push('/');
            }
        }

        let mut castling = String::new();
        if self.castling_rights[0].has_short() {
            castling.push('K');
        }
        if self.castling_rights[0].has_long() {
            castling.push('Q');
        }
        if self.castling_rights[1].has_short() {
            castling.push('k');
        }
        if self.castling_rights[1].has_long() {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }

        let en_passant = self
            .en_passant_square()
            .map_or_else(|| "-".to_string(), |sq| sq.to_string());

        format!(
            "{} {} {} {} {} {}",
            board,
            if self.whites_turn { 'w' } else { 'b' },
            castling,
            en_passant,
            self.fifty_move_clock,
            self.half_move_index / 2 + 1,
        )
    }

    /// Parse pure algebraic coordinate notation (`e2e4`, `e7e8q`, castling
    /// as the king's two-square move). Case-insensitive; the matching
    /// legal move is returned.
    pub fn parse_move(&self, notation: &str) -> Result<Move, ChessParseError> {
        let lower = notation.to_ascii_lowercase();
        let bytes = lower.as_bytes();
        if bytes.len() < 4 || bytes.len() > 5 {
            return Err(ChessParseError::InvalidMoveNotation {
                notation: notation.to_string(),
            });
        }
        let from = Square::from_str(&lower[0..2]).map_err(|_| {
            ChessParseError::InvalidMoveNotation {
                notation: notation.to_string(),
            }
        })?;
        let to = Square::from_str(&lower[2..4]).map_err(|_| {
            ChessParseError::InvalidMoveNotation {
                notation: notation.to_string(),
            }
        })?;
        let promotion = if bytes.len() == 5 {
            Some(match bytes[4] {
                b'q' => PieceKind::Queen,
                b'r' => PieceKind::Rook,
                b'b' => PieceKind::Bishop,
                b'n' => PieceKind::Knight,
                _ => {
                    return Err(ChessParseError::InvalidMoveNotation {
                        notation: notation.to_string(),
                    })
                }
            })
        } else {
            None
        };

        let mut moves = MoveList::new();
        self.generate_moves(&mut moves);
        for &mv in &moves {
            if mv.from() == from && mv.to() == to && mv.kind().promotion_kind() == promotion {
                return Ok(mv);
            }
        }
        Err(ChessParseError::IllegalMove {
            notation: notation.to_string(),
        })
    }
}

impl FromStr for Position {
    type Err = ChessParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
