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

//! The instruction dispatcher: pure mapping from (cell value, IP state,
//! funge-space) to effects, implemented as one big `match` over the
//! instruction character (the teacher's own dispatch style, not a
//! function-pointer jump table — see DESIGN.md).

use std::io::Write;

use num::Integer;
use rand::Rng;

use crate::fungespace::{Cell, FungeSpace, SPACE};
use crate::ip::{InstructionPointer, EAST, NORTH, SOUTH, WEST};
use crate::stack::BlockResult;
use crate::sysinfo::sys_info_vector;

/// An environment that provides the standard output stream and a hook for
/// reflectable-condition diagnostics. The teacher repo has no `log`/
/// `tracing` dependency and gates its own diagnostics behind a callback in
/// exactly this shape; this core does the same rather than reaching for a
/// logging crate it has no other use for.
pub trait InterpreterEnv {
    /// Standard output (or an equivalent sink, e.g. in tests).
    fn output_writer(&mut self) -> &mut dyn Write;
    /// Called on reflectable conditions: unknown instructions and `}`/`u`
    /// against a single-deep stack stack. Most implementations gate this
    /// behind a verbosity flag.
    fn warn(&mut self, msg: &str);
}

/// Outcome of a single dispatched instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionResult {
    /// Continue normally; the caller should move the IP afterwards.
    Continue,
    /// Continue, but suppress the post-tick move (space runs collapse to
    /// zero ticks; `;` already moved once itself).
    Suppress,
    /// `q` fired: terminate the whole process with this exit code.
    Exit(i32),
}

/// Execute one non-string-mode instruction. Returns the effect to apply;
/// all IP/stack/space mutation happens directly on `ip`/`space`.
pub fn dispatch(
    cell: Cell,
    ip: &mut InstructionPointer,
    space: &mut FungeSpace,
    env: &mut dyn InterpreterEnv,
) -> InstructionResult {
    let Some(c) = char::from_u32(cell as u32).filter(char::is_ascii) else {
        ip.reflect();
        env.warn(&format!("reflecting on non-ASCII cell {}", cell));
        return InstructionResult::Continue;
    };

    match c {
        // Direction changing
        '>' => ip.set_delta(EAST),
        '<' => ip.set_delta(WEST),
        '^' => ip.set_delta(NORTH),
        'v' => ip.set_delta(SOUTH),
        '?' => {
            let choices = [EAST, WEST, NORTH, SOUTH];
            let pick = rand::thread_rng().gen_range(0..choices.len());
            ip.set_delta(choices[pick]);
        }
        ']' => ip.turn_right(),
        '[' => ip.turn_left(),
        'r' => ip.reflect(),
        'x' => {
            let dy = ip.stack_stack.pop();
            let dx = ip.stack_stack.pop();
            ip.set_delta((dx, dy));
        }

        // Flow control
        '#' => ip.move_try_wrap(space),
        '@' => ip.alive = false,
        ';' => {
            ip.move_try_wrap(space);
            ip.skip_semicolon_block(space);
        }
        'j' => {
            let v = ip.stack_stack.pop();
            if v < 0 {
                ip.reflect();
                for _ in 0..(-v) {
                    ip.move_try_wrap(space);
                }
                ip.reflect();
            } else {
                for _ in 0..v {
                    ip.move_try_wrap(space);
                }
            }
        }
        'q' => {
            let v = ip.stack_stack.pop();
            return InstructionResult::Exit(v as i32);
        }
        'k' => {
            let v = ip.stack_stack.pop();
            let saved = ip.pos();
            ip.move_try_wrap(space);
            let instruction = ip.find_next_instruction(space);
            if v != 0 {
                ip.x = saved.0;
                ip.y = saved.1;
            }
            for _ in 0..v {
                if let InstructionResult::Exit(code) = dispatch(instruction, ip, space, env) {
                    return InstructionResult::Exit(code);
                }
            }
        }

        // Decision making
        '!' => {
            let v = ip.stack_stack.pop();
            ip.stack_stack.push(if v == 0 { 1 } else { 0 });
        }
        '`' => {
            let a = ip.stack_stack.pop();
            let b = ip.stack_stack.pop();
            ip.stack_stack.push(if b > a { 1 } else { 0 });
        }
        '_' => {
            let v = ip.stack_stack.pop();
            ip.set_delta(if v == 0 { EAST } else { WEST });
        }
        '|' => {
            let v = ip.stack_stack.pop();
            ip.set_delta(if v == 0 { SOUTH } else { NORTH });
        }
        'w' => {
            let b = ip.stack_stack.pop();
            let a = ip.stack_stack.pop();
            if a > b {
                ip.turn_right();
            } else if a < b {
                ip.turn_left();
            }
        }

        // Numbers
        '0'..='9' | 'a'..='f' => ip.stack_stack.push(c.to_digit(16).unwrap() as Cell),

        // Arithmetic
        '+' => {
            let a = ip.stack_stack.pop();
            let b = ip.stack_stack.pop();
            ip.stack_stack.push(b + a);
        }
        '*' => {
            let a = ip.stack_stack.pop();
            let b = ip.stack_stack.pop();
            ip.stack_stack.push(b * a);
        }
        '-' => {
            let a = ip.stack_stack.pop();
            let b = ip.stack_stack.pop();
            ip.stack_stack.push(b - a);
        }
        '/' => {
            let a = ip.stack_stack.pop();
            let b = ip.stack_stack.pop();
            ip.stack_stack.push(if a == 0 { 0 } else { b.div_floor(&a) });
        }
        '%' => {
            let a = ip.stack_stack.pop();
            let b = ip.stack_stack.pop();
            ip.stack_stack.push(if a == 0 { 0 } else { b.mod_floor(&a) });
        }

        // Strings
        '"' => ip.stringmode = true,
        '\'' => {
            ip.move_try_wrap(space);
            ip.stack_stack.push(space.get(ip.x, ip.y));
        }
        's' => {
            ip.move_try_wrap(space);
            let v = ip.stack_stack.pop();
            space.put(ip.x, ip.y, v);
        }

        // Stack manipulation
        '$' => {
            ip.stack_stack.pop();
        }
        ':' => {
            let v = ip.stack_stack.pop();
            ip.stack_stack.push(v);
            ip.stack_stack.push(v);
        }
        '\\' => {
            let b = ip.stack_stack.pop();
            let a = ip.stack_stack.pop();
            ip.stack_stack.push(b);
            ip.stack_stack.push(a);
        }
        'n' => ip.stack_stack.clear(),

        // Stack-stack manipulation
        '{' => {
            let offset = ip.storage_offset();
            ip.stack_stack.begin_block(offset);
            let (dx, dy) = ip.delta();
            ip.x_soffset = ip.x + dx;
            ip.y_soffset = ip.y + dy;
        }
        '}' => match ip.stack_stack.end_block() {
            BlockResult::Reflect => {
                ip.reflect();
                env.warn("reflecting: `}` with no stack beneath the TOSS");
            }
            BlockResult::Ok(Some((x, y))) => {
                ip.x_soffset = x;
                ip.y_soffset = y;
            }
            BlockResult::Ok(None) => unreachable!("end_block always restores an offset"),
        },
        'u' => {
            if let BlockResult::Reflect = ip.stack_stack.transfer_under() {
                ip.reflect();
                env.warn("reflecting: `u` with no stack beneath the TOSS");
            }
        }

        // Funge-space storage
        'g' => {
            let dy = ip.stack_stack.pop() + ip.y_soffset;
            let dx = ip.stack_stack.pop() + ip.x_soffset;
            let v = space.get(dx, dy);
            ip.stack_stack.push(v);
        }
        'p' => {
            let dy = ip.stack_stack.pop() + ip.y_soffset;
            let dx = ip.stack_stack.pop() + ip.x_soffset;
            let v = ip.stack_stack.pop();
            space.put(dx, dy, v);
        }

        // Standard I/O
        '.' => {
            let v = ip.stack_stack.pop();
            write!(env.output_writer(), "{} ", v).ok();
        }
        ',' => {
            let v = ip.stack_stack.pop();
            let byte = (v as i64 & 0xff) as u8;
            env.output_writer().write_all(&[byte]).ok();
        }

        // Reserved for extensions out of scope for this core
        '&' | '~' | 'i' | 'o' | '=' => {
            ip.reflect();
            env.warn(&format!("reflecting: `{}` is not implemented", c));
        }

        // Sys info
        'y' => {
            let v = ip.stack_stack.pop();
            let info = sys_info_vector(ip, space);
            if v > 0 {
                // `push_all` would leave `info[0]` (the flags cell) on top,
                // so picking the `v`-th cell from the top is `info[v - 1]`.
                if let Some(&picked) = info.get(v as usize - 1) {
                    ip.stack_stack.push(picked);
                }
            } else {
                ip.stack_stack.push_all(&info);
            }
        }

        // Fingerprints: pop and discard the id, then reflect. No registry.
        '(' | ')' => {
            let n = ip.stack_stack.pop();
            for _ in 0..n {
                ip.stack_stack.pop();
            }
            ip.reflect();
            env.warn(&format!("reflecting: fingerprint `{}` is not implemented", c));
        }

        // Miscellaneous
        ' ' => {
            ip.skip_spaces(space);
            return InstructionResult::Suppress;
        }
        'z' => {}

        _ => {
            ip.reflect();
            env.warn(&format!("reflecting on unknown instruction `{}`", c));
        }
    }

    InstructionResult::Continue
}

/// Run one full tick for `ip`: read its current cell, handle string mode or
/// dispatch a regular instruction, then advance (unless suppressed).
pub fn tick(
    ip: &mut InstructionPointer,
    space: &mut FungeSpace,
    env: &mut dyn InterpreterEnv,
) -> Option<i32> {
    let cell = space.get(ip.x, ip.y);
    let mut suppress_move = false;

    if ip.stringmode {
        if cell == b'"' as Cell {
            ip.stringmode = false;
        } else if cell == SPACE {
            ip.stack_stack.push(cell);
            ip.skip_spaces(space);
            suppress_move = true;
        } else {
            ip.stack_stack.push(cell);
        }
    } else {
        match dispatch(cell, ip, space, env) {
            InstructionResult::Continue => {}
            InstructionResult::Suppress => suppress_move = true,
            InstructionResult::Exit(code) => return Some(code),
        }
    }

    if !suppress_move {
        ip.move_try_wrap(space);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct TestEnv {
        out: Vec<u8>,
        warnings: Vec<String>,
    }

    impl TestEnv {
        fn new() -> Self {
            TestEnv {
                out: Vec::new(),
                warnings: Vec::new(),
            }
        }
    }

    impl InterpreterEnv for TestEnv {
        fn output_writer(&mut self) -> &mut dyn Write {
            &mut self.out
        }
        fn warn(&mut self, msg: &str) {
            self.warnings.push(msg.to_owned());
        }
    }

    fn run_program(src: &str) -> String {
        let mut space = FungeSpace::from_source(src);
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        loop {
            if let Some(_code) = tick(&mut ip, &mut space, &mut env) {
                break;
            }
            if !ip.alive {
                break;
            }
        }
        String::from_utf8(env.out).unwrap()
    }

    #[test]
    fn scenario_char_output() {
        assert_eq!(run_program("65,@"), "A");
    }

    #[test]
    fn scenario_hello_world() {
        assert_eq!(run_program(r#""!dlroW ,olleH">:#,_@"#), "Hello, World!");
    }

    #[test]
    fn scenario_addition() {
        assert_eq!(run_program("9 9+.@").trim(), "18");
    }

    #[test]
    fn scenario_square() {
        assert_eq!(run_program("5:*.@").trim(), "25");
    }

    #[test]
    fn scenario_three_prints_pop_in_reverse() {
        assert_eq!(run_program("123...@"), "3 2 1 ");
    }

    #[test]
    fn scenario_block_transfer_preserves_order_and_restores_soss() {
        assert_eq!(run_program("1 2 3 4 2{.. }.. @"), "4 3 2 1 ");
    }

    #[test]
    fn string_mode_pushes_chars_in_order_top_to_bottom() {
        let mut space = FungeSpace::from_source(r#""abc"@"#);
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        loop {
            if tick(&mut ip, &mut space, &mut env).is_some() || !ip.alive {
                break;
            }
        }
        assert_eq!(ip.stack_stack.pop(), b'c' as Cell);
        assert_eq!(ip.stack_stack.pop(), b'b' as Cell);
        assert_eq!(ip.stack_stack.pop(), b'a' as Cell);
    }

    #[test]
    fn division_rounds_toward_negative_infinity() {
        for (a, b) in [(7, 2), (-7, 2), (7, -2), (-7, -2)] {
            let q = b.div_floor(&a);
            let r = b.mod_floor(&a);
            assert_eq!(q * a + r, b);
        }
    }

    #[test]
    fn division_by_zero_yields_zero() {
        let mut space = FungeSpace::from_source("");
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        ip.stack_stack.push(5);
        ip.stack_stack.push(0);
        dispatch(b'/' as Cell, &mut ip, &mut space, &mut env);
        assert_eq!(ip.stack_stack.pop(), 0);
    }

    #[test]
    fn sysinfo_pick_one_returns_the_flags_cell() {
        let mut space = FungeSpace::from_source("");
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        ip.stack_stack.push(1); // v = 1: the flags cell
        dispatch('y' as Cell, &mut ip, &mut space, &mut env);
        assert_eq!(ip.stack_stack.pop(), 0b00000);
    }

    #[test]
    fn unknown_instruction_reflects_and_warns() {
        let mut space = FungeSpace::from_source("");
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        let before = ip.delta();
        dispatch('Q' as Cell, &mut ip, &mut space, &mut env);
        assert_eq!(ip.delta(), (-before.0, -before.1));
        assert_eq!(env.warnings.len(), 1);
    }

    #[test]
    fn trampoline_skips_exactly_one_cell() {
        // `1#23.` pushes 1, trampolines over '2', then '3' prints.
        assert_eq!(run_program("1#23.@").trim(), "3");
    }

    #[test]
    fn semicolon_comment_body_is_never_dispatched() {
        // Everything between the two `;` is skipped entirely: the `9` would
        // push and the `,` would print if either were ever reached, so an
        // empty-output, untouched-stack result proves the body never ran.
        let mut space = FungeSpace::from_source(";9,;@");
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        loop {
            if tick(&mut ip, &mut space, &mut env).is_some() || !ip.alive {
                break;
            }
        }
        assert!(env.out.is_empty());
        assert!(ip.stack_stack.toss().is_empty());
    }

    #[test]
    fn iterate_k_zero_skips_the_next_instruction_entirely() {
        // v=0: '2' is bypassed, never dispatched even on a later tick.
        let mut space = FungeSpace::from_source("0k2@");
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        loop {
            if tick(&mut ip, &mut space, &mut env).is_some() || !ip.alive {
                break;
            }
        }
        assert!(ip.stack_stack.toss().is_empty());
    }

    #[test]
    fn iterate_k_runs_instruction_n_times_then_once_more_on_the_next_tick() {
        // The IP is left on the `k` cell when v != 0, so the ordinary
        // post-tick move lands it right back on the iterated instruction,
        // which then runs once more as a normal tick. This matches the
        // reference implementation's control flow exactly (spec §9).
        let mut space = FungeSpace::from_source("3k1@");
        let mut ip = InstructionPointer::new();
        let mut env = TestEnv::new();
        loop {
            if tick(&mut ip, &mut space, &mut env).is_some() || !ip.alive {
                break;
            }
        }
        assert_eq!(ip.stack_stack.pop(), 1);
        assert_eq!(ip.stack_stack.pop(), 1);
        assert_eq!(ip.stack_stack.pop(), 1);
        assert_eq!(ip.stack_stack.pop(), 1);
        assert!(ip.stack_stack.toss().is_empty());
    }
}
