//! Tabular projection of a folder tree
//!
//! A tree of arbitrary depth flattens into a rectangular grid for display in
//! a sheet-like surface: row 0 holds the root's name alone, every other row
//! is a checkbox toggle, indentation blanks, and the node's name at the
//! column matching its depth. All rows are padded to a common width so the
//! grid is rectangular.
//!
//! The inverse mapping, [`range_for_row`], turns a toggled row back into the
//! contiguous block of rows forming that node's subtree; a display surface
//! hides or shows exactly that block when the checkbox flips.

use serde::{Deserialize, Serialize};

use crate::tree::Node;

/// One grid cell. Serializes untagged, so a row becomes the plain JSON array
/// a sheet API expects: `[true, null, "name", null]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Toggle(bool),
    Label(String),
    Blank,
}

/// One flattened grid line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    /// Column index of this row's label; its indentation depth. Row 0 (the
    /// root row) has its label at column 0.
    pub fn label_column(&self) -> Option<usize> {
        self.cells
            .iter()
            .position(|cell| matches!(cell, Cell::Label(_)))
    }

    pub fn label(&self) -> Option<&str> {
        self.cells.iter().find_map(|cell| match cell {
            Cell::Label(name) => Some(name.as_str()),
            _ => None,
        })
    }
}

/// A contiguous block of rows, as `(start, count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub count: usize,
}

/// Flatten `root` into `(rows, max_level)` by a depth-first pre-order walk.
///
/// The root's direct children sit at level 1; `max_level` is the deepest
/// level reached (1 even for a childless root). Every row is padded with
/// [`Cell::Blank`] to width `max_level + 1`.
pub fn flatten(root: &Node) -> (Vec<Row>, usize) {
    let mut rows = vec![Row {
        cells: vec![Cell::Label(root.name().to_string())],
    }];
    let mut max_level = 1;

    // Children pushed in reverse so popping yields pre-order.
    let mut stack: Vec<(&Node, usize)> = root
        .children()
        .iter()
        .rev()
        .map(|child| (child, 1))
        .collect();
    while let Some((node, level)) = stack.pop() {
        if level > max_level {
            max_level = level;
        }
        let mut cells = Vec::with_capacity(level + 1);
        cells.push(Cell::Toggle(true));
        for _ in 1..level {
            cells.push(Cell::Blank);
        }
        cells.push(Cell::Label(node.name().to_string()));
        rows.push(Row { cells });

        for child in node.children().iter().rev() {
            stack.push((child, level + 1));
        }
    }

    let width = max_level + 1;
    for row in &mut rows {
        while row.cells.len() < width {
            row.cells.push(Cell::Blank);
        }
    }
    (rows, max_level)
}

/// The block of rows forming the subtree of `rows[row_index]`.
///
/// Scans forward from `row_index + 1`; the block ends at the first row whose
/// label column is at or above the triggering row's, or at the end of the
/// list. Leaf rows (and an out-of-range index) yield `count = 0`.
pub fn range_for_row(rows: &[Row], row_index: usize) -> RowRange {
    let start = row_index + 1;
    let level = match rows.get(row_index).and_then(Row::label_column) {
        Some(level) => level,
        None => return RowRange { start, count: 0 },
    };

    let mut end = rows.len();
    for (i, row) in rows.iter().enumerate().skip(start) {
        if row.label_column().map_or(false, |l| l <= level) {
            end = i;
            break;
        }
    }
    RowRange {
        start,
        count: end.saturating_sub(start),
    }
}
