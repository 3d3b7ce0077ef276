//! Piece and colour types.
//!
//! Pieces carry fixed ordinals 0..12 that index arrays (bitboards, Zobrist
//! keys, piece values) directly; `Piece::None` marks an empty square.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The two sides.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_white(self) -> bool {
        matches!(self, Color::White)
    }

    /// Forward direction for this side's pawns, in square offsets.
    #[inline]
    #[must_use]
    pub const fn pawn_push(self) -> i8 {
        match self {
            Color::White => 8,
            Color::Black => -8,
        }
    }
}

/// The piece kind without colour, in descending value order. Used to index
/// value tables, piece-square tables and phase weights.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PieceKind {
    King = 0,
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
    Pawn = 5,
}

/// Kinds a pawn may promote to.
pub const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

impl PieceKind {
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    #[must_use]
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Queen | PieceKind::Rook | PieceKind::Bishop)
    }
}

/// A coloured piece (or `None` for an empty square), with fixed ordinals:
/// 0 = none, 1..6 = white K Q R B N P, 7..12 = black K Q R B N P.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Piece {
    None = 0,
    WhiteKing = 1,
    WhiteQueen = 2,
    WhiteRook = 3,
    WhiteBishop = 4,
    WhiteKnight = 5,
    WhitePawn = 6,
    BlackKing = 7,
    BlackQueen = 8,
    BlackRook = 9,
    BlackBishop = 10,
    BlackKnight = 11,
    BlackPawn = 12,
}

/// Number of piece ordinals including `None`.
pub const PIECE_COUNT: usize = 13;

impl Piece {
    /// All real pieces, white first.
    pub const ALL: [Piece; 12] = [
        Piece::WhiteKing,
        Piece::WhiteQueen,
        Piece::WhiteRook,
        Piece::WhiteBishop,
        Piece::WhiteKnight,
        Piece::WhitePawn,
        Piece::BlackKing,
        Piece::BlackQueen,
        Piece::BlackRook,
        Piece::BlackBishop,
        Piece::BlackKnight,
        Piece::BlackPawn,
    ];

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Reconstruct a piece from its ordinal; `None` for anything outside
    /// 0..=12. Used when unpacking hash moves, so it must not panic.
    #[inline]
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Piece> {
        match index {
            0 => Some(Piece::None),
            1 => Some(Piece::WhiteKing),
            2 => Some(Piece::WhiteQueen),
            3 => Some(Piece::WhiteRook),
            4 => Some(Piece::WhiteBishop),
            5 => Some(Piece::WhiteKnight),
            6 => Some(Piece::WhitePawn),
            7 => Some(Piece::BlackKing),
            8 => Some(Piece::BlackQueen),
            9 => Some(Piece::BlackRook),
            10 => Some(Piece::BlackBishop),
            11 => Some(Piece::BlackKnight),
            12 => Some(Piece::BlackPawn),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn from_parts(color: Color, kind: PieceKind) -> Piece {
        let base = match color {
            Color::White => 1,
            Color::Black => 7,
        };
        match Piece::from_index(base + kind as u8) {
            Some(piece) => piece,
            None => unreachable!(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        matches!(self, Piece::None)
    }

    /// The piece's colour; `None` squares have no colour.
    #[inline]
    #[must_use]
    pub const fn color(self) -> Option<Color> {
        match self as u8 {
            0 => None,
            1..=6 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    /// The colourless kind. Must not be called on `Piece::None`.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        debug_assert!(!self.is_none());
        match (self as u8 - 1) % 6 {
            0 => PieceKind::King,
            1 => PieceKind::Queen,
            2 => PieceKind::Rook,
            3 => PieceKind::Bishop,
            4 => PieceKind::Knight,
            _ => PieceKind::Pawn,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_color(self, color: Color) -> bool {
        match (self.color(), color) {
            (Some(Color::White), Color::White) | (Some(Color::Black), Color::Black) => true,
            _ => false,
        }
    }

    /// FEN letter: uppercase for white, lowercase for black.
    #[must_use]
    pub const fn fen_char(self) -> char {
        match self {
            Piece::None => ' ',
            Piece::WhiteKing => 'K',
            Piece::WhiteQueen => 'Q',
            Piece::WhiteRook => 'R',
            Piece::WhiteBishop => 'B',
            Piece::WhiteKnight => 'N',
            Piece::WhitePawn => 'P',
            Piece::BlackKing => 'k',
            Piece::BlackQueen => 'q',
            Piece::BlackRook => 'r',
            Piece::BlackBishop => 'b',
            Piece::BlackKnight => 'n',
            Piece::BlackPawn => 'p',
        }
    }

    #[must_use]
    pub const fn from_fen_char(c: char) -> Option<Piece> {
        Some(match c {
            'K' => Piece::WhiteKing,
            'Q' => Piece::WhiteQueen,
            'R' => Piece::WhiteRook,
            'B' => Piece::WhiteBishop,
            'N' => Piece::WhiteKnight,
            'P' => Piece::WhitePawn,
            'k' => Piece::BlackKing,
            'q' => Piece::BlackQueen,
            'r' => Piece::BlackRook,
            'b' => Piece::BlackBishop,
            'n' => Piece::BlackKnight,
            'p' => Piece::BlackPawn,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_round_trip() {
        for piece in Piece::ALL {
            assert_eq!(Piece::from_index(piece.index() as u8), Some(piece));
        }
        assert_eq!(Piece::from_index(13), None);
    }

    #[test]
    fn parts_round_trip() {
        for color in [Color::White, Color::Black] {
            for kind in [
                PieceKind::King,
                PieceKind::Queen,
                PieceKind::Rook,
                PieceKind::Bishop,
                PieceKind::Knight,
                PieceKind::Pawn,
            ] {
                let piece = Piece::from_parts(color, kind);
                assert_eq!(piece.color(), Some(color));
                assert_eq!(piece.kind(), kind);
            }
        }
    }

    #[test]
    fn fen_chars_round_trip() {
        for piece in Piece::ALL {
            assert_eq!(Piece::from_fen_char(piece.fen_char()), Some(piece));
        }
        assert_eq!(Piece::from_fen_char('x'), None);
    }
}
