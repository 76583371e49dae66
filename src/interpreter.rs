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

//! The scheduler: owns the shared [`FungeSpace`] and the ordered collection
//! of live IPs, and advances them one tick each in round-robin order (spec
//! §4.5/§5).

use crate::fungespace::FungeSpace;
use crate::instructions::{tick, InterpreterEnv};
use crate::ip::InstructionPointer;

/// Result of running an interpreter to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramResult {
    /// All IPs terminated naturally (`@`); carries the process exit code
    /// (always 0 unless a `q` fired, which is reported separately).
    Done(i32),
}

/// Owns funge-space and the list of live IPs. The IPs exclusively own their
/// own stack-stacks and geometry; funge-space is shared and every `p`
/// mutation is immediately visible to every other IP's next tick.
pub struct Interpreter<Env: InterpreterEnv> {
    pub space: FungeSpace,
    pub ips: Vec<InstructionPointer>,
    pub env: Env,
}

impl<Env: InterpreterEnv> Interpreter<Env> {
    /// A fresh interpreter over `space`, with the single primary IP at the
    /// origin heading east.
    pub fn new(space: FungeSpace, env: Env) -> Self {
        Interpreter {
            space,
            ips: vec![InstructionPointer::new()],
            env,
        }
    }

    /// Run every live IP one tick per round, in order, until none remain or
    /// a `q` fires. There is no preemption inside a tick and no threads are
    /// needed: each round is a plain, sequential pass over a snapshot of
    /// the IP list (spec §4.5's "reverse twice" round-trip nets out to a
    /// stable order, so a straightforward `Vec` suffices here).
    pub fn run(&mut self) -> ProgramResult {
        loop {
            for ip in self.ips.iter_mut() {
                if let Some(code) = tick(ip, &mut self.space, &mut self.env) {
                    return ProgramResult::Done(code);
                }
            }
            self.ips.retain(|ip| ip.alive);
            if self.ips.is_empty() {
                return ProgramResult::Done(0);
            }
        }
    }
}
