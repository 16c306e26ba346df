//! FEN (Forsyth-Edwards Notation) text boundary.
//!
//! [`FenRecord`] is the typed content of one FEN line: placement as tagged
//! pieces, side to move as a [`Color`], castling flags, the en passant
//! square and both clocks. Characters never leave this module. Whether the
//! fields make a playable position (pawn behind the en passant square,
//! rooks behind the castling flags) is judged by the engine when it builds
//! its board.

use crate::{Color, ColoredPiece, Piece, Square};
use std::fmt;
use thiserror::Error;

/// FEN of the standard starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Errors that can occur when reading FEN text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid king count: {0}")]
    InvalidKingCount(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),

    #[error("inconsistent position: {0}")]
    InconsistentPosition(String),
}

/// The four castling flags of a FEN line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingFlags([[bool; 2]; 2]);

impl CastlingFlags {
    /// Flag letters in FEN order, with the side and wing each one names.
    const LETTERS: [(char, Color, bool); 4] = [
        ('K', Color::White, true),
        ('Q', Color::White, false),
        ('k', Color::Black, true),
        ('q', Color::Black, false),
    ];

    /// Every flag set.
    pub const ALL: CastlingFlags = CastlingFlags([[true; 2]; 2]);

    /// No flag set.
    pub const NONE: CastlingFlags = CastlingFlags([[false; 2]; 2]);

    #[inline]
    pub const fn allows(self, color: Color, short: bool) -> bool {
        self.0[color.index()][short as usize]
    }

    #[inline]
    pub fn set(&mut self, color: Color, short: bool, allowed: bool) {
        self.0[color.index()][short as usize] = allowed;
    }

    /// Reads the field: `-` or a non-empty subset of `KQkq` in that order.
    fn parse(field: &str) -> Result<Self, FenError> {
        let mut flags = CastlingFlags::NONE;
        if field == "-" {
            return Ok(flags);
        }
        let mut remaining = Self::LETTERS.iter();
        for c in field.chars() {
            match remaining.find(|(letter, _, _)| *letter == c) {
                Some(&(_, color, short)) => flags.set(color, short, true),
                None => return Err(FenError::InvalidCastlingRights(field.to_string())),
            }
        }
        Ok(flags)
    }
}

impl fmt::Display for CastlingFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        for &(letter, color, short) in &Self::LETTERS {
            if self.allows(color, short) {
                write!(f, "{}", letter)?;
                any = true;
            }
        }
        if !any {
            write!(f, "-")?;
        }
        Ok(())
    }
}

/// The typed fields of one FEN line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    /// Piece on every square, indexed by [`Square::index`] (a8 first).
    pub placement: [Option<ColoredPiece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingFlags,
    /// Square skipped by the pawn that just advanced two squares.
    pub en_passant: Option<Square>,
    /// Half-moves since the last capture or pawn move.
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenRecord {
    /// Reads a FEN line.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        let [placement, active, castling, en_passant, halfmove, fullmove] = parts[..] else {
            return Err(FenError::InvalidPartCount(parts.len()));
        };

        let side_to_move = match active {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let halfmove_clock = halfmove
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(halfmove.to_string()))?;
        let fullmove_number = fullmove
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(fullmove.to_string()))?;

        Ok(FenRecord {
            placement: parse_placement(placement)?,
            side_to_move,
            castling: CastlingFlags::parse(castling)?,
            en_passant: parse_en_passant(en_passant, side_to_move)?,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// The piece on `sq`.
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<ColoredPiece> {
        self.placement[sq.index() as usize]
    }
}

impl fmt::Display for FenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, rank) in self.placement.chunks(8).enumerate() {
            if row > 0 {
                write!(f, "/")?;
            }
            let mut gap = 0;
            for square in rank {
                match square {
                    Some(piece) => {
                        if gap > 0 {
                            write!(f, "{}", gap)?;
                            gap = 0;
                        }
                        write!(f, "{}", piece.to_fen_char())?;
                    }
                    None => gap += 1,
                }
            }
            if gap > 0 {
                write!(f, "{}", gap)?;
            }
        }

        write!(f, " {} {} ", self.side_to_move.to_fen_char(), self.castling)?;
        match self.en_passant {
            Some(sq) => write!(f, "{}", sq)?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

impl Default for FenRecord {
    /// The standard starting position.
    fn default() -> Self {
        let mut placement = [None; 64];
        let back = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (col, &piece) in back.iter().enumerate() {
            placement[col] = Some(ColoredPiece::new(piece, Color::Black));
            placement[8 + col] = Some(ColoredPiece::new(Piece::Pawn, Color::Black));
            placement[48 + col] = Some(ColoredPiece::new(Piece::Pawn, Color::White));
            placement[56 + col] = Some(ColoredPiece::new(piece, Color::White));
        }
        FenRecord {
            placement,
            side_to_move: Color::White,
            castling: CastlingFlags::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

/// Eight `/`-separated ranks, rank 8 first, with exactly one king per side.
fn parse_placement(field: &str) -> Result<[Option<ColoredPiece>; 64], FenError> {
    let ranks: Vec<&str> = field.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::InvalidPiecePlacement(format!(
            "expected 8 ranks, got {}",
            ranks.len()
        )));
    }

    let mut placement = [None; 64];
    let mut kings = [0u32; 2];
    for (row, rank) in ranks.iter().enumerate() {
        let label = 8 - row;
        let mut col = 0usize;
        for c in rank.chars() {
            if let Some(run @ 1..=8) = c.to_digit(10) {
                col += run as usize;
                continue;
            }
            let Some(piece) = ColoredPiece::from_fen_char(c) else {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "invalid character '{}' in rank {}",
                    c, label
                )));
            };
            if col < 8 {
                placement[row * 8 + col] = Some(piece);
            }
            if piece.is(Piece::King) {
                kings[piece.color.index()] += 1;
            }
            col += 1;
        }
        if col != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "rank {} has {} squares, expected 8",
                label, col
            )));
        }
    }

    if kings != [1, 1] {
        return Err(FenError::InvalidKingCount(format!(
            "expected one king per side, got {} white and {} black",
            kings[0], kings[1]
        )));
    }
    Ok(placement)
}

/// The target lies behind a pawn of the side that just moved, so its row
/// follows from the side to move.
fn parse_en_passant(field: &str, side_to_move: Color) -> Result<Option<Square>, FenError> {
    if field == "-" {
        return Ok(None);
    }
    let behind_row = match side_to_move {
        Color::White => 2,
        Color::Black => 5,
    };
    match Square::from_algebraic(field) {
        Some(sq) if sq.row() == behind_row => Ok(Some(sq)),
        _ => Err(FenError::InvalidEnPassantSquare(field.to_string())),
    }
}
