//! Text-format I/O for puzzle boards and solution paths.
//!
//! Input format, one character per cell, rows separated by newlines:
//! - `1` goal block (all four cells)
//! - `2` single piece
//! - `^` / `v` vertical domino top / bottom
//! - `<` / `>` horizontal domino left / right
//! - `.` empty
//!
//! Pieces are anchored at `^`, `<`, `2`, and the first `1` in row-major
//! order; extra `1` markers are tolerated (first goal wins). A solution
//! is written as one rendered board per frame, frames separated by a
//! blank line.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::grid::{Board, BoardError};
use crate::pieces::{Piece, PieceKind};

/// Errors detected while decoding a board from text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The input contained no rows.
    Empty,
    /// Row `row` has `found` cells where `expected` were required.
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
    /// A character outside the board vocabulary.
    UnknownChar { ch: char, x: usize, y: usize },
    /// A marker at (x, y) that does not line up with any piece, such as
    /// a `v` with no `^` above it or an incomplete goal quad.
    StrayMarker { x: usize, y: usize },
    /// The decoded piece list failed board validation.
    Board(BoardError),
}

impl From<BoardError> for ParseError {
    fn from(err: BoardError) -> Self {
        ParseError::Board(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "input contains no board rows"),
            ParseError::RaggedRow {
                row,
                found,
                expected,
            } => {
                write!(
                    f,
                    "row {row} has {found} cells, expected {expected}"
                )
            }
            ParseError::UnknownChar { ch, x, y } => {
                write!(f, "unknown character {ch:?} at ({x}, {y})")
            }
            ParseError::StrayMarker { x, y } => {
                write!(f, "marker at ({x}, {y}) does not belong to any piece")
            }
            ParseError::Board(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Board(err) => Some(err),
            _ => None,
        }
    }
}

/// Decodes a board from its text representation.
///
/// Board dimensions come from the input itself; every row must have the
/// same length. After construction the board is rendered back and
/// compared against the input, which rejects marker layouts that do not
/// tile into pieces.
pub fn parse_board(text: &str) -> Result<Board, ParseError> {
    let rows: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
    if rows.is_empty() || rows[0].is_empty() {
        return Err(ParseError::Empty);
    }

    let width = rows[0].chars().count();
    for (y, row) in rows.iter().enumerate() {
        let found = row.chars().count();
        if found != width {
            return Err(ParseError::RaggedRow {
                row: y,
                found,
                expected: width,
            });
        }
    }

    let mut pieces = Vec::new();
    let mut goal_found = false;
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let kind = match ch {
                '^' => Some(PieceKind::VerticalDomino),
                '<' => Some(PieceKind::HorizontalDomino),
                '2' => Some(PieceKind::Single),
                '1' if !goal_found => {
                    goal_found = true;
                    Some(PieceKind::GoalBlock)
                }
                '1' | 'v' | '>' | '.' => None,
                _ => {
                    return Err(ParseError::UnknownChar { ch, x, y });
                }
            };
            if let Some(kind) = kind {
                pieces.push(Piece::new(kind, x as i32, y as i32));
            }
        }
    }

    let board = Board::new(width as i32, rows.len() as i32, pieces)?;

    // markers that did not resolve into a piece render differently than
    // they were written; extra goal markers are the one tolerated case
    let rendered = board.render();
    for (y, (have, want)) in rows.iter().zip(rendered.lines()).enumerate() {
        for (x, (input, output)) in have.chars().zip(want.chars()).enumerate() {
            if input != output && input != '1' {
                return Err(ParseError::StrayMarker { x, y });
            }
        }
    }

    Ok(board)
}

/// Formats a solution path as display frames separated by blank lines.
pub fn format_path(boards: &[Board]) -> String {
    let mut out = String::new();
    for (index, board) in boards.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        out.push_str(&board.render());
    }
    out
}

/// Writes a solution path to a file, one frame per board.
pub fn save_path(file: &Path, boards: &[Board]) -> std::io::Result<()> {
    let mut out = File::create(file)?;
    out.write_all(format_path(boards).as_bytes())?;
    Ok(())
}
