/*
funge98 – a Funge-98 core interpreter

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as
published by the Free Software Foundation, either version 3 of the
License, or (at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

//! The sparse, offset-addressed, mutable 2-D Funge-space that backs program
//! storage. Stored as a jagged array of rows, each independently sized, with
//! a pair of offsets mapping logical (possibly negative) coordinates onto
//! the physical storage. Never fails to read: any unpopulated cell reads as
//! space (32).

use std::fmt;
use std::fs;
use std::io;

/// A single Funge-space cell. 64-bit is plenty of range for the arithmetic
/// this core performs and lets us reuse `num::Integer` for floor division.
pub type Cell = i64;

/// The space character, used as both the default cell value and a comment/
/// whitespace instruction.
pub const SPACE: Cell = 32;

/// The semicolon character, used to delimit `;...;` comment blocks.
pub const SEMICOLON: Cell = 59;

/// The sparse, toroidal 2-D cell grid described in spec §3/§4.1.
#[derive(Debug, Clone)]
pub struct FungeSpace {
    /// Rows of populated cells. A row may be empty; missing cells within a
    /// row, or rows past the end, read as [`SPACE`].
    cells: Vec<Vec<Cell>>,
    /// Physical column of logical x = 0.
    x_offset: usize,
    /// Physical row of logical y = 0.
    y_offset: usize,
    /// Width of the populated bounding rectangle (the widest row ever seen).
    max_cols: usize,
}

impl FungeSpace {
    /// An empty Funge-space, with no populated rows.
    pub fn new() -> Self {
        FungeSpace {
            cells: Vec::new(),
            x_offset: 0,
            y_offset: 0,
            max_cols: 0,
        }
    }

    /// Load a Funge-space from a source file. Lines are split on `\n`, `\r`
    /// and `\f`, with the terminator bytes stripped; every remaining byte
    /// becomes a cell value. Rows are not padded to a common width.
    pub fn load(path: &str) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_source(&text))
    }

    /// Build a Funge-space directly from source text, as [`FungeSpace::load`]
    /// does after reading the file. `\r\n` is treated as one terminator (so
    /// ordinary text files don't gain spurious blank rows); a lone `\r` or
    /// `\x0c` (form feed) also terminates a row, matching spec §6. A
    /// trailing terminator does not produce a phantom final row.
    pub fn from_source(text: &str) -> Self {
        let mut space = FungeSpace::new();
        let normalized = text.replace("\r\n", "\n");
        for line in normalized.split_terminator(|c| c == '\n' || c == '\r' || c == '\x0c') {
            let row: Vec<Cell> = line.bytes().map(Cell::from).collect();
            if row.len() > space.max_cols {
                space.max_cols = row.len();
            }
            space.cells.push(row);
        }
        space
    }

    /// Physical coordinates for a logical position.
    fn physical(&self, x: i64, y: i64) -> (i64, i64) {
        (x + self.x_offset as i64, y + self.y_offset as i64)
    }

    /// True when `(x, y)` falls inside the populated bounding rectangle
    /// (`max_cols` wide, one row per entry in `cells`), regardless of
    /// whether that particular cell has been written.
    pub fn in_bounds_rect(&self, x: i64, y: i64) -> bool {
        let (gx, gy) = self.physical(x, y);
        gy >= 0 && (gy as usize) < self.cells.len() && gx >= 0 && (gx as usize) < self.max_cols
    }

    /// True when `(x, y)` has an actual backing cell in the jagged storage
    /// (stricter than [`FungeSpace::in_bounds_rect`]: short rows don't count
    /// past their own length even inside the rectangle).
    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        let (gx, gy) = self.physical(x, y);
        if gy < 0 || gx < 0 {
            return false;
        }
        match self.cells.get(gy as usize) {
            Some(row) => (gx as usize) < row.len(),
            None => false,
        }
    }

    /// Read the cell at `(x, y)`. Never fails: an unwritten cell is space.
    pub fn get(&self, x: i64, y: i64) -> Cell {
        if !self.in_bounds(x, y) {
            return SPACE;
        }
        let gx = (x + self.x_offset as i64) as usize;
        let gy = (y + self.y_offset as i64) as usize;
        self.cells[gy][gx]
    }

    /// Write `v` at `(x, y)`, growing the sparse storage (and, for negative
    /// coordinates, the offsets) as needed.
    pub fn put(&mut self, x: i64, y: i64, v: Cell) {
        let mut gx = x + self.x_offset as i64;
        let mut gy = y + self.y_offset as i64;

        if gy < 0 {
            let n = (-gy) as usize;
            let mut new_rows = vec![Vec::new(); n];
            new_rows.append(&mut self.cells);
            self.cells = new_rows;
            self.y_offset += n;
            gy += n as i64;
        }
        if gx < 0 {
            let n = (-gx) as usize;
            for row in self.cells.iter_mut() {
                if row.is_empty() {
                    continue;
                }
                let mut padded = vec![SPACE; n];
                padded.append(row);
                *row = padded;
            }
            self.x_offset += n;
            gx += n as i64;
        }

        let gy = gy as usize;
        let gx = gx as usize;

        while gy >= self.cells.len() {
            self.cells.push(Vec::new());
        }
        let row = &mut self.cells[gy];
        while gx >= row.len() {
            row.push(SPACE);
        }
        if row.len() > self.max_cols {
            self.max_cols = row.len();
        }
        row[gx] = v;
    }

    /// Least point of the bounding rectangle, `(-x_offset, -y_offset)`.
    pub fn least_point(&self) -> (i64, i64) {
        (-(self.x_offset as i64), -(self.y_offset as i64))
    }

    /// Greatest point of the bounding rectangle. The `+1` on the row count
    /// is the source's own formula (spec §9 "known source quirk"); it is
    /// preserved rather than "fixed" to a more conventional
    /// `y_least + height - 1`.
    pub fn greatest_point(&self) -> (i64, i64) {
        (
            self.max_cols as i64,
            self.cells.len() as i64 - self.y_offset as i64 + 1,
        )
    }

    /// Number of populated rows.
    pub fn row_count(&self) -> usize {
        self.cells.len()
    }
}

impl Default for FungeSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FungeSpace {
    /// A printable dump of the loaded space, used as the startup diagnostic
    /// (spec §6). Non-printable cells are rendered as `?` rather than
    /// panicking on an out-of-range `char`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let justify = self.cells.len().to_string().len() + 3;
        for (i, row) in self.cells.iter().enumerate() {
            write!(f, "{:>width$}", format!("{} | ", i), width = justify)?;
            for &c in row {
                let ch = u32::try_from(c).ok().and_then(char::from_u32).unwrap_or('?');
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_cells_are_space() {
        let space = FungeSpace::new();
        assert_eq!(space.get(0, 0), SPACE);
        assert_eq!(space.get(-100, 57), SPACE);
    }

    #[test]
    fn load_strips_terminators_and_tracks_width() {
        let space = FungeSpace::from_source("12345\nab\r\nxyz\x0c\n");
        assert_eq!(space.get(0, 0), b'1' as Cell);
        assert_eq!(space.get(4, 0), b'5' as Cell);
        assert_eq!(space.get(1, 1), b'b' as Cell);
        assert_eq!(space.get(10, 0), SPACE);
        assert_eq!(space.greatest_point().0, 5);
    }

    #[test]
    fn put_grows_negative_offsets() {
        let mut space = FungeSpace::new();
        space.put(0, 0, 1);
        space.put(-2, -1, 9);
        assert_eq!(space.get(-2, -1), 9);
        assert_eq!(space.least_point(), (-2, -1));
        // the originally-written cell is still readable at its logical coords
        assert_eq!(space.get(0, 0), 1);
    }

    #[test]
    fn put_pads_only_nonempty_rows_on_negative_x() {
        let mut space = FungeSpace::new();
        space.put(0, 0, b'a' as Cell);
        space.put(0, 5, b'b' as Cell);
        space.put(-1, 0, b'c' as Cell);
        // row 0 was nonempty and got padded+shifted
        assert_eq!(space.get(-1, 0), b'c' as Cell);
        assert_eq!(space.get(0, 0), b'a' as Cell);
        // row 5 stayed empty until this write; unaffected by the x_offset
        // bump because it had nothing to pad
        assert_eq!(space.get(0, 5), b'b' as Cell);
    }

    #[test]
    fn max_cols_is_monotonic() {
        let mut space = FungeSpace::new();
        space.put(9, 0, 1);
        let before = space.greatest_point().0;
        space.put(0, 1, 1);
        assert_eq!(space.greatest_point().0, before);
    }

    #[test]
    fn in_bounds_rect_vs_in_bounds() {
        let mut space = FungeSpace::new();
        space.put(5, 0, 1); // row 0 grows to width 6, widening max_cols
        space.put(0, 1, 1); // row 1 stays width 1
        // column 3 of row 1 is inside the rectangle (max_cols is 6, from
        // row 0) but row 1 itself was never padded out that far
        assert!(space.in_bounds_rect(3, 1));
        assert!(!space.in_bounds(3, 1));
        assert_eq!(space.get(3, 1), SPACE);
    }
}
