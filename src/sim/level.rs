//! Brick grid layouts
//!
//! Text format, one row per line:
//! - `0` or `.`: empty cell
//! - `1`: solid (indestructible) brick
//! - `2`-`9`: breakable brick
//!
//! Blank lines and surrounding whitespace are ignored.

use std::str::FromStr;

use glam::Vec2;
use thiserror::Error;

use super::state::Body;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("level layout has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell '{glyph}' at row {row}, column {col}")]
    UnknownCell { row: usize, col: usize, glyph: char },

    #[error("{cols} columns leave no room for bricks in a {width}px field with {gap}px gaps")]
    TooManyColumns { cols: usize, width: u32, gap: u32 },
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Breakable,
    Solid,
}

impl Cell {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '0' | '.' => Some(Cell::Empty),
            '1' => Some(Cell::Solid),
            '2'..='9' => Some(Cell::Breakable),
            _ => None,
        }
    }
}

/// A rectangular grid of cells, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelLayout {
    rows: Vec<Vec<Cell>>,
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self::grid(crate::consts::BRICK_ROWS, crate::consts::BRICK_COLS)
    }
}

impl LevelLayout {
    /// All-breakable grid
    pub fn grid(rows: u32, cols: u32) -> Self {
        Self {
            rows: vec![vec![Cell::Breakable; cols as usize]; rows as usize],
        }
    }

    /// Default grid sized from the tuning
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self::grid(tuning.brick_rows, tuning.brick_cols)
    }

    pub fn parse(text: &str) -> Result<Self, LevelError> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let row = rows.len();
            let cells = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .enumerate()
                .map(|(col, glyph)| {
                    Cell::from_glyph(glyph).ok_or(LevelError::UnknownCell { row, col, glyph })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if let Some(first) = rows.first() {
                if cells.len() != first.len() {
                    return Err(LevelError::RaggedRow {
                        row,
                        expected: first.len(),
                        found: cells.len(),
                    });
                }
            }
            rows.push(cells);
        }

        if rows.is_empty() {
            return Err(LevelError::Empty);
        }
        Ok(Self { rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Lay the grid out across the field width, row-major
    ///
    /// Empty cells produce no brick, so brick indices follow non-empty cells.
    pub fn build(&self, tuning: &Tuning) -> Result<Vec<Body>, LevelError> {
        let cols = self.col_count();
        if cols == 0 {
            return Err(LevelError::Empty);
        }

        let cell_w = tuning.field_width / cols as f32;
        let cell_h = tuning.brick_height;
        let size = Vec2::new(cell_w - tuning.brick_gap, cell_h - tuning.brick_gap);
        if size.x <= 0.0 || size.y <= 0.0 {
            return Err(LevelError::TooManyColumns {
                cols,
                width: tuning.field_width as u32,
                gap: tuning.brick_gap as u32,
            });
        }

        let mut bricks = Vec::new();
        for (row, cells) in self.rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                let pos = Vec2::new(
                    col as f32 * cell_w,
                    tuning.brick_top + row as f32 * cell_h,
                );
                match cell {
                    Cell::Empty => {}
                    Cell::Breakable => bricks.push(Body::new(pos, size)),
                    Cell::Solid => bricks.push(Body::new(pos, size).solid()),
                }
            }
        }
        Ok(bricks)
    }
}

impl FromStr for LevelLayout {
    type Err = LevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
