//! Standard Algebraic Notation (SAN) resolution and formatting.
//!
//! Tokens are resolved against a position into a fully specified [`Move`].
//! Examples: "e4", "Nf3", "exd5", "O-O", "e8=Q", "Nbd2", "R1e1", "Qh4e1".

use crate::check::is_attacked;
use crate::legality::is_legal;
use crate::position::Position;
use crate::reach;
use chess_core::{ColoredPiece, File, Move, MoveKind, Piece, Rank, Square};
use thiserror::Error;

/// Reasons a SAN token does not resolve to a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanError {
    /// The token is empty.
    #[error("empty move")]
    Empty,

    /// The token is not SAN.
    #[error("invalid SAN format: {0}")]
    InvalidFormat(String),

    /// No piece of the named kind reaches the destination.
    #[error("no piece can make the move {0}")]
    NoMatchingMove(String),

    /// Several pieces could make the move and the token does not say which.
    #[error("ambiguous move: {0}")]
    AmbiguousMove(String),

    /// The move is well formed but breaks a rule.
    #[error("illegal move {0}: {1}")]
    IllegalMove(String, &'static str),

    /// Castling rights are gone or castling is blocked.
    #[error("cannot castle: {0}")]
    CastlingUnavailable(&'static str),
}

/// Parsed components of a non-castling SAN token.
#[derive(Debug)]
struct ParsedSan {
    piece: Piece,
    from_file: Option<File>,
    from_rank: Option<Rank>,
    to_square: Square,
    promotion: Option<Piece>,
    is_capture: bool,
}

/// Resolves `san` to a legal move for the side to move in `position`.
///
/// The position is tried out but left exactly as it was.
pub fn san_to_move(position: &mut Position, san: &str) -> Result<Move, SanError> {
    let san = san.trim();
    if san.is_empty() {
        return Err(SanError::Empty);
    }

    let san = san.trim_end_matches(['+', '#']);

    match san {
        "O-O" | "0-0" => return castle_move(position, true),
        "O-O-O" | "0-0-0" => return castle_move(position, false),
        _ => {}
    }

    let parsed = parse_san_components(san)?;
    let m = if parsed.piece == Piece::Pawn {
        resolve_pawn_move(position, &parsed, san)?
    } else {
        resolve_piece_move(position, &parsed, san)?
    };
    Ok(m)
}

fn parse_san_components(san: &str) -> Result<ParsedSan, SanError> {
    let invalid = || SanError::InvalidFormat(san.to_string());

    let (body, promotion) = match san.split_once('=') {
        Some((body, suffix)) => {
            let mut chars = suffix.chars();
            let piece = match (chars.next().and_then(Piece::from_san_char), chars.next()) {
                (Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)), None) => p,
                _ => return Err(invalid()),
            };
            (body, Some(piece))
        }
        None => (san, None),
    };

    let chars: Vec<char> = body.chars().collect();
    let (piece, rest) = match chars.split_first() {
        Some((&c, rest)) if c.is_ascii_uppercase() => match Piece::from_san_char(c) {
            Some(Piece::Pawn) | None => return Err(invalid()),
            Some(piece) => (piece, rest),
        },
        Some(_) => (Piece::Pawn, &chars[..]),
        None => return Err(invalid()),
    };

    // The destination is the trailing file and rank.
    let [prefix @ .., file, rank] = rest else {
        return Err(invalid());
    };
    let to_square = match (File::from_char(*file), Rank::from_char(*rank)) {
        (Some(f), Some(r)) => Square::new(f, r),
        _ => return Err(invalid()),
    };

    let (prefix, is_capture) = match prefix {
        [head @ .., 'x'] => (head, true),
        _ => (prefix, false),
    };

    let (from_file, from_rank) = parse_disambiguation(prefix).ok_or_else(invalid)?;

    if piece == Piece::Pawn {
        // Pushes name only the destination; captures name the origin file.
        let well_formed = match (from_file, from_rank, is_capture) {
            (None, None, false) => true,
            (Some(_), None, true) => true,
            _ => false,
        };
        if !well_formed {
            return Err(invalid());
        }
    }

    Ok(ParsedSan {
        piece,
        from_file,
        from_rank,
        to_square,
        promotion,
        is_capture,
    })
}

fn parse_disambiguation(chars: &[char]) -> Option<(Option<File>, Option<Rank>)> {
    match *chars {
        [] => Some((None, None)),
        [c] => match (File::from_char(c), Rank::from_char(c)) {
            (Some(f), _) => Some((Some(f), None)),
            (_, Some(r)) => Some((None, Some(r))),
            _ => None,
        },
        [f, r] => Some((Some(File::from_char(f)?), Some(Rank::from_char(r)?))),
        _ => None,
    }
}

/// Validates castling on the given side for the side to move.
///
/// The king's square and the two squares it crosses towards the rook must be
/// unattacked, and the line between king and rook must be empty.
pub fn castle_move(position: &Position, short: bool) -> Result<Move, SanError> {
    let color = position.side_to_move;
    let king = position.king(color);
    if !king.can_castle(short) {
        return Err(SanError::CastlingUnavailable("castling right has been lost"));
    }

    let m = Move::castle(color, short);
    let Some((rook_from, _)) = m.rook_squares() else {
        return Err(SanError::CastlingUnavailable("no castling rook"));
    };
    if king.square() != m.from
        || position.board.get(rook_from) != Some(ColoredPiece::new(Piece::Rook, color))
    {
        return Err(SanError::CastlingUnavailable("king or rook has left home"));
    }
    if !position.board.has_clear_sight(m.from, rook_from) {
        return Err(SanError::CastlingUnavailable("pieces stand between king and rook"));
    }

    let step = if short { 1 } else { -1 };
    for i in 0..=2 {
        let crossed = m.from.offset(0, step * i);
        if crossed.is_some_and(|sq| is_attacked(&position.board, sq, color)) {
            return Err(SanError::CastlingUnavailable("king would cross an attacked square"));
        }
    }
    Ok(m)
}

fn resolve_pawn_move(position: &mut Position, parsed: &ParsedSan, san: &str) -> Result<Move, SanError> {
    let color = position.side_to_move;
    let pawn = ColoredPiece::new(Piece::Pawn, color);
    let to = parsed.to_square;
    let back = -color.forward();
    let no_match = || SanError::NoMatchingMove(san.to_string());

    check_destination(position, to, san)?;

    let promotes = to.row() == color.promotion_row();
    match (promotes, parsed.promotion) {
        (true, None) => {
            return Err(SanError::InvalidFormat(format!("{}: promotion piece required", san)))
        }
        (false, Some(_)) => {
            return Err(SanError::InvalidFormat(format!(
                "{}: promotion only on the last rank",
                san
            )))
        }
        _ => {}
    }

    let (kind, from) = if parsed.is_capture {
        let from_file = parsed.from_file.ok_or_else(no_match)?;
        let dc = to.col() as i8 - from_file.index() as i8;
        if dc.abs() != 1 {
            return Err(SanError::InvalidFormat(format!(
                "{}: pawns capture on an adjacent file",
                san
            )));
        }
        let from = to.offset(back, -dc).ok_or_else(no_match)?;
        if position.board.get(from) != Some(pawn) {
            return Err(no_match());
        }
        let kind = if !position.board.is_empty(to) {
            MoveKind::Normal
        } else if position.en_passant_square() == Some(to) {
            MoveKind::EnPassant
        } else {
            return Err(SanError::IllegalMove(
                san.to_string(),
                "nothing to capture there",
            ));
        };
        (kind, from)
    } else {
        let one_back = to.offset(back, 0).ok_or_else(no_match)?;
        match position.board.get(one_back) {
            Some(p) if p == pawn => (MoveKind::Normal, one_back),
            None if to.row() == color.double_push_row() => {
                let two_back = one_back.offset(back, 0).ok_or_else(no_match)?;
                if position.board.get(two_back) != Some(pawn) {
                    return Err(no_match());
                }
                (MoveKind::DoublePawnPush, two_back)
            }
            _ => return Err(no_match()),
        }
    };

    let m = match parsed.promotion {
        Some(promotion) => Move::promote(from, to, color, parsed.is_capture, promotion),
        None => Move::new(kind, from, to, pawn, parsed.is_capture),
    };

    let king = *position.king(color);
    let last_move = position.last_move;
    if !is_legal(&mut position.board, &m, &king, last_move.as_ref()) {
        return Err(SanError::IllegalMove(san.to_string(), "king would be in check"));
    }
    Ok(m)
}

fn resolve_piece_move(position: &mut Position, parsed: &ParsedSan, san: &str) -> Result<Move, SanError> {
    let color = position.side_to_move;
    let piece = ColoredPiece::new(parsed.piece, color);
    let to = parsed.to_square;

    if parsed.promotion.is_some() {
        return Err(SanError::InvalidFormat(format!("{}: only pawns promote", san)));
    }
    check_destination(position, to, san)?;

    let captures = !position.board.is_empty(to);
    if parsed.is_capture && !captures {
        return Err(SanError::IllegalMove(
            san.to_string(),
            "nothing to capture there",
        ));
    }

    let mut origins = reach::find(&position.board, parsed.piece, to, piece);
    origins.retain(|sq| {
        parsed.from_file.map_or(true, |f| sq.file() == f)
            && parsed.from_rank.map_or(true, |r| sq.rank() == r)
    });
    if origins.is_empty() {
        return Err(SanError::NoMatchingMove(san.to_string()));
    }

    let king = *position.king(color);
    let last_move = position.last_move;
    let mut legal = Vec::with_capacity(origins.len());
    for &from in &origins {
        let m = Move::new(MoveKind::Normal, from, to, piece, captures);
        if is_legal(&mut position.board, &m, &king, last_move.as_ref()) {
            legal.push(m);
        }
    }

    match legal[..] {
        [] => Err(SanError::IllegalMove(san.to_string(), "king would be in check")),
        [m] => Ok(m),
        _ => Err(SanError::AmbiguousMove(san.to_string())),
    }
}

/// Kings are never captured and own pieces never taken.
fn check_destination(position: &Position, to: Square, san: &str) -> Result<(), SanError> {
    match position.board.get(to) {
        Some(p) if p.is(Piece::King) => Err(SanError::IllegalMove(
            san.to_string(),
            "kings cannot be captured",
        )),
        Some(p) if p.color == position.side_to_move => Err(SanError::IllegalMove(
            san.to_string(),
            "square is occupied by an own piece",
        )),
        _ => Ok(()),
    }
}

/// Formats a legal move as SAN, without a check suffix.
///
/// The position must be the one BEFORE the move is made.
pub fn move_to_san(position: &mut Position, m: &Move) -> String {
    match m.kind {
        MoveKind::CastleShort => return "O-O".to_string(),
        MoveKind::CastleLong => return "O-O-O".to_string(),
        MoveKind::DrawOffer => return "draw".to_string(),
        MoveKind::Resign => return "resign".to_string(),
        _ => {}
    }

    let mut san = String::new();
    if m.is_pawn_move() {
        if m.captures {
            san.push(m.from.file().to_char());
            san.push('x');
        }
    } else {
        san.push(m.piece.piece.to_san_char());
        san.push_str(&disambiguation(position, m));
        if m.captures {
            san.push('x');
        }
    }
    san.push_str(&m.to.to_algebraic());

    if let Some(promotion) = m.promotion {
        san.push('=');
        san.push(promotion.to_san_char());
    }
    san
}

/// The shortest origin hint that singles `m` out among same-kind pieces.
fn disambiguation(position: &mut Position, m: &Move) -> String {
    let color = m.color();
    let king = *position.king(color);
    let last_move = position.last_move;
    let mut rivals = reach::find(&position.board, m.piece.piece, m.to, m.piece);
    rivals.retain(|sq| sq != m.from);

    let mut others = Vec::new();
    for &from in &rivals {
        let rival = Move { from, ..*m };
        if is_legal(&mut position.board, &rival, &king, last_move.as_ref()) {
            others.push(from);
        }
    }

    if others.is_empty() {
        return String::new();
    }
    if others.iter().all(|sq| sq.file() != m.from.file()) {
        return m.from.file().to_char().to_string();
    }
    if others.iter().all(|sq| sq.rank() != m.from.rank()) {
        return m.from.rank().to_char().to_string();
    }
    m.from.to_algebraic()
}
