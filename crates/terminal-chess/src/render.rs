//! Board drawing for the terminal.

use chess_core::{Color, ColoredPiece, File, Piece, Rank, Square};
use chess_rules::Board;

/// How pieces and empty squares are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphStyle {
    /// Chess symbols, with filled and hollow squares for the shading.
    #[default]
    Unicode,
    /// FEN letters, `.` for light and `:` for dark squares.
    Ascii,
}

/// The character drawn for `piece`.
pub fn glyph(piece: ColoredPiece, style: GlyphStyle) -> char {
    match style {
        GlyphStyle::Ascii => piece.to_fen_char(),
        GlyphStyle::Unicode => match (piece.color, piece.piece) {
            (Color::White, Piece::King) => '♔',
            (Color::White, Piece::Queen) => '♕',
            (Color::White, Piece::Rook) => '♖',
            (Color::White, Piece::Bishop) => '♗',
            (Color::White, Piece::Knight) => '♘',
            (Color::White, Piece::Pawn) => '♙',
            (Color::Black, Piece::King) => '♚',
            (Color::Black, Piece::Queen) => '♛',
            (Color::Black, Piece::Rook) => '♜',
            (Color::Black, Piece::Bishop) => '♝',
            (Color::Black, Piece::Knight) => '♞',
            (Color::Black, Piece::Pawn) => '♟',
        },
    }
}

fn empty_square(sq: Square, style: GlyphStyle) -> char {
    match (style, sq.is_light()) {
        (GlyphStyle::Unicode, true) => '■',
        (GlyphStyle::Unicode, false) => '□',
        (GlyphStyle::Ascii, true) => '.',
        (GlyphStyle::Ascii, false) => ':',
    }
}

/// Draws `board` with rank 8 at the top, rank labels on the left and file
/// labels underneath.
pub fn render_board(board: &Board, style: GlyphStyle) -> String {
    let mut out = String::new();
    for row in 0..8 {
        if let Some(rank) = Rank::from_row(row) {
            out.push(rank.to_char());
            out.push(' ');
        }
        for col in 0..8 {
            let Some(sq) = Square::from_coords(row, col) else {
                continue;
            };
            let c = match board.get(sq) {
                Some(piece) => glyph(piece, style),
                None => empty_square(sq, style),
            };
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("  ");
    for index in 0..8 {
        if let Some(file) = File::from_index(index) {
            out.push(file.to_char());
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_start_position() {
        let text = render_board(&Board::startpos(), GlyphStyle::Ascii);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "8 rnbqkbnr");
        assert_eq!(lines[1], "7 pppppppp");
        assert_eq!(lines[2], "6 .:.:.:.:");
        assert_eq!(lines[3], "5 :.:.:.:.");
        assert_eq!(lines[6], "2 PPPPPPPP");
        assert_eq!(lines[7], "1 RNBQKBNR");
        assert_eq!(lines[8], "  abcdefgh");
    }

    #[test]
    fn test_unicode_glyphs() {
        let text = render_board(&Board::startpos(), GlyphStyle::Unicode);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "8 ♜♞♝♛♚♝♞♜");
        assert_eq!(lines[2], "6 ■□■□■□■□");
        assert_eq!(lines[7], "1 ♖♘♗♕♔♗♘♖");
    }

    #[test]
    fn test_empty_board_shading() {
        let text = render_board(&Board::empty(), GlyphStyle::Ascii);
        // a1 is dark and h1 light.
        assert!(text.lines().nth(7).unwrap().starts_with("1 :"));
        assert!(text.lines().nth(7).unwrap().ends_with('.'));
    }
}
