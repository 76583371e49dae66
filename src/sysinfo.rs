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

//! Builds the vector pushed by the `y` (sysinfo) instruction (spec §4.6).

use chrono::{Datelike, Local, Timelike};

use crate::fungespace::{Cell, FungeSpace};
use crate::ip::InstructionPointer;

/// The crate's "unbounded cell" marker for sysinfo's "bytes per cell"
/// field: the maximum representable positive `Cell`, by convention (spec
/// §4.6 item 2, §9 "cell width").
pub const INFINITE_CELL_MARKER: Cell = Cell::MAX;

/// Compute the full sysinfo vector for `ip` against `space`, in the push
/// order from spec §4.6 (the first element listed ends up deepest once
/// [`crate::stack::Stack::push_all`] reverses it onto the stack).
pub fn sys_info_vector(ip: &InstructionPointer, space: &FungeSpace) -> Vec<Cell> {
    let mut info = Vec::with_capacity(32);

    info.push(0b00000); // flag cell: no concurrency/input/output/`=` support
    info.push(INFINITE_CELL_MARKER); // bytes per cell
    info.push(0); // handprint: none
    info.push(10); // version
    info.push(0); // `=` paradigm: unavailable
    info.push(b'/' as Cell); // path separator
    info.push(2); // dimensions
    info.push(0); // IP id
    info.push(0); // team number

    info.push(ip.y);
    info.push(ip.x);
    info.push(ip.dy);
    info.push(ip.dx);
    info.push(ip.y_soffset);
    info.push(ip.x_soffset);

    let (x_least, y_least) = space.least_point();
    info.push(y_least);
    info.push(x_least);
    let (x_greatest, y_greatest) = space.greatest_point();
    info.push(y_greatest);
    info.push(x_greatest);

    let now = Local::now();
    let date = ((now.year() as Cell - 1900) * 65536) + (now.month() as Cell * 256) + now.day() as Cell;
    let time = (now.hour() as Cell * 65536) + (now.minute() as Cell * 256) + now.second() as Cell;
    info.push(date);
    info.push(time);

    let depths = ip.stack_stack.depths();
    info.push(depths.len() as Cell);
    for d in depths {
        info.push(d as Cell);
    }

    info.push(0); // argv placeholder
    info.push(0);
    info.push(0); // environ placeholder
    info.push(0);

    info
}
