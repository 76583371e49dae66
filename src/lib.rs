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

//! A Funge-98 core interpreter: the sparse toroidal code space, the
//! stack-of-stacks, the instruction dispatcher, and the cooperative IP
//! scheduler. See `SPEC_FULL.md` in the repository root for the full
//! behavioral contract.

pub mod fungespace;
pub mod instructions;
pub mod interpreter;
pub mod ip;
pub mod stack;
pub mod sysinfo;

pub use fungespace::{Cell, FungeSpace};
pub use instructions::{dispatch, tick, InstructionResult, InterpreterEnv};
pub use interpreter::{Interpreter, ProgramResult};
pub use ip::InstructionPointer;
pub use stack::{BlockResult, Stack, StackStack};
