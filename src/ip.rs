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

//! A single instruction pointer: position, delta, storage offset, string
//! mode, liveness, and its own stack-stack. The motion primitives here
//! (`move`, `wrap`, `skip_spaces`, ...) are pure geometry over a
//! [`FungeSpace`]; instruction dispatch lives in [`crate::instructions`].

use crate::fungespace::{Cell, FungeSpace, SEMICOLON, SPACE};
use crate::stack::StackStack;

/// The four cardinal deltas used by `>`, `<`, `^`, `v` and `?`.
pub const EAST: (Cell, Cell) = (1, 0);
pub const WEST: (Cell, Cell) = (-1, 0);
pub const NORTH: (Cell, Cell) = (0, -1);
pub const SOUTH: (Cell, Cell) = (0, 1);

/// State of a single instruction pointer (spec §3).
#[derive(Debug, Clone)]
pub struct InstructionPointer {
    pub x: Cell,
    pub y: Cell,
    pub dx: Cell,
    pub dy: Cell,
    pub x_soffset: Cell,
    pub y_soffset: Cell,
    pub stringmode: bool,
    pub alive: bool,
    pub stack_stack: StackStack,
}

impl InstructionPointer {
    /// The initial IP: origin, heading east, no storage offset, one empty
    /// stack, alive.
    pub fn new() -> Self {
        InstructionPointer {
            x: 0,
            y: 0,
            dx: EAST.0,
            dy: EAST.1,
            x_soffset: 0,
            y_soffset: 0,
            stringmode: false,
            alive: true,
            stack_stack: StackStack::new(),
        }
    }

    pub fn pos(&self) -> (Cell, Cell) {
        (self.x, self.y)
    }

    pub fn delta(&self) -> (Cell, Cell) {
        (self.dx, self.dy)
    }

    pub fn storage_offset(&self) -> (Cell, Cell) {
        (self.x_soffset, self.y_soffset)
    }

    pub fn set_delta(&mut self, delta: (Cell, Cell)) {
        self.dx = delta.0;
        self.dy = delta.1;
    }

    /// Unconditional single step; no bounds check.
    pub fn move_once(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }

    /// Lahey-space toroidal wrap: reverse, step back until out of the
    /// rectangle on the opposite side, then turn around and step once more
    /// into it. An involution along a fixed delta.
    pub fn wrap(&mut self, space: &FungeSpace) {
        self.reflect();
        self.move_once();
        while space.in_bounds_rect(self.x, self.y) {
            self.move_once();
        }
        self.reflect();
        self.move_once();
    }

    /// Step once, wrapping if that leaves the bounding rectangle.
    pub fn move_try_wrap(&mut self, space: &FungeSpace) {
        self.move_once();
        if !space.in_bounds_rect(self.x, self.y) {
            self.wrap(space);
        }
    }

    /// Advance past a run of spaces (SGML-style collapsing).
    pub fn skip_spaces(&mut self, space: &FungeSpace) {
        while space.get(self.x, self.y) == SPACE {
            self.move_try_wrap(space);
        }
    }

    /// Advance until the cell under the IP is `;`. Used to skip `;...;`
    /// comment blocks; the caller steps past the closing `;` itself.
    pub fn skip_semicolon_block(&mut self, space: &FungeSpace) {
        while space.get(self.x, self.y) != SEMICOLON {
            self.move_try_wrap(space);
        }
    }

    /// Combined skipping used by `k`: collapse space runs and `;...;`
    /// comments until landing on a real instruction, which is returned
    /// without being executed.
    pub fn find_next_instruction(&mut self, space: &FungeSpace) -> Cell {
        loop {
            let v = space.get(self.x, self.y);
            if v == SPACE {
                self.skip_spaces(space);
            } else if v == SEMICOLON {
                self.skip_semicolon_block(space);
                self.move_try_wrap(space);
            } else {
                return v;
            }
        }
    }

    pub fn reflect(&mut self) {
        self.dx = -self.dx;
        self.dy = -self.dy;
    }

    pub fn turn_left(&mut self) {
        let (dx, dy) = (self.dx, self.dy);
        self.dx = dy;
        self.dy = -dx;
    }

    pub fn turn_right(&mut self) {
        let (dx, dy) = (self.dx, self.dy);
        self.dx = -dy;
        self.dy = dx;
    }
}

impl Default for InstructionPointer {
    fn default() -> Self {
        Self::new()
    }
}
