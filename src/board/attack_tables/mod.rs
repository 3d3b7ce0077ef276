//! Precomputed attack tables.
//!
//! Leaper attacks (king, knight, pawn), half-ray masks, the line/between
//! square-pair tables used for pins and check evasion, and the magic
//! sliding-attack tables. Everything here is initialized once and read-only
//! afterwards, so the statics are safe to share across search threads
//! without synchronization.

mod magics;

use std::sync::LazyLock;

use super::types::{Bitboard, Color, Piece, PieceKind, Square};

/// A half-ray direction from a square, excluding the square itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(usize)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    NorthEast = 4,
    SouthWest = 5,
    NorthWest = 6,
    SouthEast = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthWest,
        Direction::NorthWest,
        Direction::SouthEast,
    ];

    const fn step(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, 1),
            Direction::SouthWest => (-1, -1),
            Direction::NorthWest => (-1, 1),
            Direction::SouthEast => (1, -1),
        }
    }
}

static KING_ATTACKS: LazyLock<[Bitboard; 64]> = LazyLock::new(|| {
    let deltas = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];
    leaper_table(&deltas)
});

static KNIGHT_ATTACKS: LazyLock<[Bitboard; 64]> = LazyLock::new(|| {
    let deltas = [
        (2, 1),
        (1, 2),
        (-1, 2),
        (-2, 1),
        (-2, -1),
        (-1, -2),
        (1, -2),
        (2, -1),
    ];
    leaper_table(&deltas)
});

/// `PAWN_ATTACKS[color][square]`: the two capture targets. Empty on the
/// back ranks where no pawn can stand.
static PAWN_ATTACKS: LazyLock<[[Bitboard; 64]; 2]> = LazyLock::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for sq in Square::all() {
        for (color, dr) in [(Color::White, 1i8), (Color::Black, -1i8)] {
            let mut mask = Bitboard::EMPTY;
            for df in [-1i8, 1] {
                let file = sq.file() as i8 + df;
                let rank = sq.rank() as i8 + dr;
                if (0..8).contains(&file) && (0..8).contains(&rank) {
                    mask |= Bitboard::from_square(Square::new(file as u8, rank as u8));
                }
            }
            table[color.index()][sq.index() as usize] = mask;
        }
    }
    table
});

/// `PAWN_PUSHES[color][square]`: the single-push destination.
static PAWN_PUSHES: LazyLock<[[Bitboard; 64]; 2]> = LazyLock::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    for sq in Square::all() {
        for (color, dr) in [(Color::White, 1i8), (Color::Black, -1i8)] {
            let rank = sq.rank() as i8 + dr;
            if (0..8).contains(&rank) {
                table[color.index()][sq.index() as usize] =
                    Bitboard::from_square(Square::new(sq.file(), rank as u8));
            }
        }
    }
    table
});

/// `RAYS[direction][square]`: the half-ray from the square to the board
/// edge, excluding the origin.
static RAYS: LazyLock<[[Bitboard; 64]; 8]> = LazyLock::new(|| {
    let mut table = [[Bitboard::EMPTY; 64]; 8];
    for dir in Direction::ALL {
        let (df, dr) = dir.step();
        for sq in Square::all() {
            let mut mask = Bitboard::EMPTY;
            let mut file = sq.file() as i8 + df;
            let mut rank = sq.rank() as i8 + dr;
            while (0..8).contains(&file) && (0..8).contains(&rank) {
                mask |= Bitboard::from_square(Square::new(file as u8, rank as u8));
                file += df;
                rank += dr;
            }
            table[dir as usize][sq.index() as usize] = mask;
        }
    }
    table
});

/// `LINE[a][b]`: the full edge-to-edge line through two collinear squares
/// (both included), or empty when no rank, file or diagonal joins them.
static LINE: LazyLock<Box<[[Bitboard; 64]; 64]>> = LazyLock::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for a in Square::all() {
        for dir in Direction::ALL {
            let ray = RAYS[dir as usize][a.index() as usize];
            for b in ray.squares() {
                let opposite = opposite_ray(dir, a);
                table[a.index() as usize][b.index() as usize] =
                    ray | opposite | Bitboard::from_square(a);
            }
        }
    }
    table
});

/// `BETWEEN[a][b]`: squares strictly between two collinear squares; empty
/// otherwise.
static BETWEEN: LazyLock<Box<[[Bitboard; 64]; 64]>> = LazyLock::new(|| {
    let mut table = Box::new([[Bitboard::EMPTY; 64]; 64]);
    for a in Square::all() {
        for dir in Direction::ALL {
            let (df, dr) = dir.step();
            let mut mask = Bitboard::EMPTY;
            let mut file = a.file() as i8 + df;
            let mut rank = a.rank() as i8 + dr;
            while (0..8).contains(&file) && (0..8).contains(&rank) {
                let b = Square::new(file as u8, rank as u8);
                table[a.index() as usize][b.index() as usize] = mask;
                mask |= Bitboard::from_square(b);
                file += df;
                rank += dr;
            }
        }
    }
    table
});

fn opposite_ray(dir: Direction, sq: Square) -> Bitboard {
    let opposite = match dir {
        Direction::North => Direction::South,
        Direction::South => Direction::North,
        Direction::East => Direction::West,
        Direction::West => Direction::East,
        Direction::NorthEast => Direction::SouthWest,
        Direction::SouthWest => Direction::NorthEast,
        Direction::NorthWest => Direction::SouthEast,
        Direction::SouthEast => Direction::NorthWest,
    };
    RAYS[opposite as usize][sq.index() as usize]
}

fn leaper_table(deltas: &[(i8, i8); 8]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    for sq in Square::all() {
        let mut mask = Bitboard::EMPTY;
        for &(df, dr) in deltas {
            let file = sq.file() as i8 + df;
            let rank = sq.rank() as i8 + dr;
            if (0..8).contains(&file) && (0..8).contains(&rank) {
                mask |= Bitboard::from_square(Square::new(file as u8, rank as u8));
            }
        }
        table[sq.index() as usize] = mask;
    }
    table
}

#[inline]
#[must_use]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

#[inline]
#[must_use]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
#[must_use]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

#[inline]
#[must_use]
pub fn pawn_push(color: Color, sq: Square) -> Bitboard {
    PAWN_PUSHES[color.index()][sq.index() as usize]
}

/// The half-ray from `sq` towards `dir`, origin excluded.
#[inline]
#[must_use]
pub fn ray(dir: Direction, sq: Square) -> Bitboard {
    RAYS[dir as usize][sq.index() as usize]
}

/// The full line through `a` and `b` (empty if not collinear). A pinned
/// piece is confined to the line through its king and the pinner.
#[inline]
#[must_use]
pub fn line_through(a: Square, b: Square) -> Bitboard {
    LINE[a.index() as usize][b.index() as usize]
}

/// The squares strictly between `a` and `b` (empty if not collinear).
#[inline]
#[must_use]
pub fn between(a: Square, b: Square) -> Bitboard {
    BETWEEN[a.index() as usize][b.index() as usize]
}

#[inline]
#[must_use]
pub fn rook_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    magics::ROOK_TABLE.attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn bishop_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    magics::BISHOP_TABLE.attacks(sq, occupancy)
}

#[inline]
#[must_use]
pub fn queen_attacks(sq: Square, occupancy: Bitboard) -> Bitboard {
    rook_attacks(sq, occupancy) | bishop_attacks(sq, occupancy)
}

/// The attack set of a piece standing on `sq` with the given full-board
/// occupancy. The caller intersects with "not own pieces".
#[inline]
#[must_use]
pub fn piece_attacks(piece: Piece, sq: Square, occupancy: Bitboard) -> Bitboard {
    match piece.kind() {
        PieceKind::King => king_attacks(sq),
        PieceKind::Queen => queen_attacks(sq, occupancy),
        PieceKind::Rook => rook_attacks(sq, occupancy),
        PieceKind::Bishop => bishop_attacks(sq, occupancy),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Pawn => match piece.color() {
            Some(color) => pawn_attacks(color, sq),
            None => Bitboard::EMPTY,
        },
    }
}

/// Force initialization of every table. The first search would do this
/// lazily anyway; calling it up front keeps startup cost out of the first
/// node.
pub fn warm_up() {
    let _ = king_attacks(Square::A1);
    let _ = knight_attacks(Square::A1);
    let _ = pawn_attacks(Color::White, Square::A1);
    let _ = pawn_push(Color::White, Square::A1);
    let _ = ray(Direction::North, Square::A1);
    let _ = line_through(Square::A1, Square::H8);
    let _ = between(Square::A1, Square::H8);
    let _ = rook_attacks(Square::A1, Bitboard::EMPTY);
    let _ = bishop_attacks(Square::A1, Bitboard::EMPTY);
}
