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

//! The stack-of-stacks: a nonempty ordered sequence of integer stacks, with
//! the Funge-98 `{`/`}`/`u` block operations layered on top of plain
//! push/pop.

use crate::fungespace::Cell;

/// A single LIFO integer stack with a soft bottom: popping an empty stack
/// yields 0 rather than failing.
#[derive(Debug, Clone, Default)]
pub struct Stack {
    values: Vec<Cell>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { values: Vec::new() }
    }

    pub fn push(&mut self, v: Cell) {
        self.values.push(v);
    }

    /// Push `list`, with its first element ending up deepest (pushes in
    /// reverse order).
    pub fn push_all(&mut self, list: &[Cell]) {
        for &v in list.iter().rev() {
            self.push(v);
        }
    }

    pub fn pop(&mut self) -> Cell {
        self.values.pop().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The `n`-th element from the top, without removing it (`n = 1` is the
    /// top). Out-of-range picks are not something any instruction in this
    /// core performs; callers must only call this with a valid `n`.
    pub fn pick(&self, n: usize) -> Cell {
        self.values[self.values.len() - n]
    }
}

/// Signal returned by the stack-stack operations that can fail: `{`/`u`/`}`
/// reflect the IP instead of acting when there is only one stack.
pub enum BlockResult {
    /// The operation completed; for `}`, carries the restored storage
    /// offset to install on the IP.
    Ok(Option<(Cell, Cell)>),
    /// Only one stack exists; the caller should reflect the IP.
    Reflect,
}

/// A nonempty ordered sequence of [Stack]s. Index 0 is the TOSS (top of
/// stack stack); index 1, when present, is the SOSS.
#[derive(Debug, Clone)]
pub struct StackStack {
    stacks: Vec<Stack>,
}

impl StackStack {
    pub fn new() -> Self {
        StackStack {
            stacks: vec![Stack::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.stacks.len()
    }

    /// Element counts of every stack, top to bottom (used by `y`).
    pub fn depths(&self) -> Vec<usize> {
        self.stacks.iter().map(Stack::len).collect()
    }

    pub fn toss(&self) -> &Stack {
        &self.stacks[0]
    }

    pub fn toss_mut(&mut self) -> &mut Stack {
        &mut self.stacks[0]
    }

    pub fn push(&mut self, v: Cell) {
        self.toss_mut().push(v);
    }

    pub fn push_all(&mut self, list: &[Cell]) {
        self.toss_mut().push_all(list);
    }

    pub fn pop(&mut self) -> Cell {
        self.toss_mut().pop()
    }

    pub fn clear(&mut self) {
        self.toss_mut().clear();
    }

    pub fn pick(&self, n: usize) -> Cell {
        self.toss().pick(n)
    }

    /// `{`: pop `n` from the TOSS, push a new empty TOSS above it (the old
    /// TOSS becomes SOSS), then transfer `n` values SOSS→TOSS preserving
    /// order (or push `|n|` zeros onto the SOSS if `n < 0`). Finally push
    /// the caller's current storage offset onto the SOSS, x then y.
    ///
    /// "SOSS" here means the stack immediately beneath the TOSS at the
    /// moment of the instruction — i.e. the stack that was TOSS a moment
    /// ago, not whatever was SOSS before `{` ran (spec §9 quirk).
    pub fn begin_block(&mut self, storage_offset: (Cell, Cell)) {
        let n = self.pop();
        self.stacks.insert(0, Stack::new());

        if n > 0 {
            let mut buf = Vec::with_capacity(n as usize);
            for _ in 0..n {
                buf.push(self.stacks[1].pop());
            }
            while let Some(v) = buf.pop() {
                self.stacks[0].push(v);
            }
        } else if n < 0 {
            for _ in 0..(-n) {
                self.stacks[1].push(0);
            }
        }

        self.stacks[1].push(storage_offset.0);
        self.stacks[1].push(storage_offset.1);
    }

    /// `}`: if only one stack exists, signal reflect. Otherwise pop `n` from
    /// the TOSS, restore `(x_soffset, y_soffset)` from the SOSS (`y` was
    /// pushed last by `{`, so it comes off first), transfer `n` values
    /// TOSS→SOSS preserving order (or discard `|n|` values off the SOSS if
    /// `n < 0`), then drop the TOSS.
    pub fn end_block(&mut self) -> BlockResult {
        if self.stacks.len() == 1 {
            return BlockResult::Reflect;
        }

        let n = self.pop();
        let y_soffset = self.stacks[1].pop();
        let x_soffset = self.stacks[1].pop();

        if n > 0 {
            let mut buf = Vec::with_capacity(n as usize);
            for _ in 0..n {
                buf.push(self.stacks[0].pop());
            }
            while let Some(v) = buf.pop() {
                self.stacks[1].push(v);
            }
        } else if n < 0 {
            for _ in 0..(-n) {
                self.stacks[1].pop();
            }
        }

        self.stacks.remove(0);
        BlockResult::Ok(Some((x_soffset, y_soffset)))
    }

    /// `u`: if only one stack exists, signal reflect. Otherwise pop `n` from
    /// the TOSS: if `n > 0`, move `n` values SOSS→TOSS one at a time
    /// (reversing their order, unlike `{`/`}`'s order-preserving buffer
    /// transfer); if `n < 0`, move `|n|` values TOSS→SOSS the same way.
    pub fn transfer_under(&mut self) -> BlockResult {
        if self.stacks.len() == 1 {
            return BlockResult::Reflect;
        }

        let n = self.pop();
        if n > 0 {
            for _ in 0..n {
                let v = self.stacks[1].pop();
                self.stacks[0].push(v);
            }
        } else if n < 0 {
            for _ in 0..(-n) {
                let v = self.stacks[0].pop();
                self.stacks[1].push(v);
            }
        }
        BlockResult::Ok(None)
    }
}

impl Default for StackStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_bottom_pop() {
        let mut s = Stack::new();
        assert_eq!(s.pop(), 0);
        s.push(5);
        assert_eq!(s.pop(), 5);
        assert_eq!(s.pop(), 0);
    }

    #[test]
    fn push_all_reverses_so_first_ends_up_deepest() {
        let mut s = Stack::new();
        s.push_all(&[1, 2, 3]);
        assert_eq!(s.pop(), 1);
        assert_eq!(s.pop(), 2);
        assert_eq!(s.pop(), 3);
    }

    #[test]
    fn begin_end_block_zero_transfer_is_a_round_trip() {
        let mut ss = StackStack::new();
        ss.push(42);
        ss.push(0); // n for `{`
        ss.begin_block((7, 8));
        assert_eq!(ss.depth(), 2);
        ss.push(0); // n for `}`
        match ss.end_block() {
            BlockResult::Ok(Some((x, y))) => assert_eq!((x, y), (7, 8)),
            _ => panic!("expected Ok"),
        }
        assert_eq!(ss.depth(), 1);
        assert_eq!(ss.pop(), 42);
    }

    #[test]
    fn begin_block_transfers_preserving_order() {
        let mut ss = StackStack::new();
        ss.push(1);
        ss.push(2);
        ss.push(3);
        ss.push(2); // n
        ss.begin_block((0, 0));
        // top two values (2, 3) move across in the same order they had
        assert_eq!(ss.toss().pick(1), 3);
        assert_eq!(ss.toss().pick(2), 2);
    }

    #[test]
    fn end_block_on_single_stack_reflects() {
        let mut ss = StackStack::new();
        ss.push(0);
        assert!(matches!(ss.end_block(), BlockResult::Reflect));
    }

    #[test]
    fn transfer_under_reverses_order() {
        let mut soss = Stack::new();
        soss.push(1);
        soss.push(2);
        let mut toss = Stack::new();
        toss.push(9);
        toss.push(2); // n for `u`: move 2 from SOSS to TOSS one at a time
        let mut ss = StackStack { stacks: vec![toss, soss] };
        ss.transfer_under();
        // SOSS had [1, 2] (top = 2); one-at-a-time transfer reverses it
        assert_eq!(ss.pop(), 1);
        assert_eq!(ss.pop(), 2);
        assert_eq!(ss.pop(), 9);
    }
}
