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

use std::io::{stderr, stdout, Stderr, Stdout, Write};

use clap::{App, Arg};

use funge98::{FungeSpace, Interpreter, InterpreterEnv, ProgramResult};

/// The command-line interpreter environment: standard output, and the
/// warning channel gated behind `-w`/`--warn`.
struct CmdLineEnv {
    warnings: bool,
    stdout: Stdout,
    stderr: Stderr,
}

impl CmdLineEnv {
    fn new(warnings: bool) -> Self {
        CmdLineEnv {
            warnings,
            stdout: stdout(),
            stderr: stderr(),
        }
    }
}

impl InterpreterEnv for CmdLineEnv {
    fn output_writer(&mut self) -> &mut dyn Write {
        &mut self.stdout
    }
    fn warn(&mut self, msg: &str) {
        if self.warnings {
            writeln!(self.stderr, "{}", msg).ok();
        }
    }
}

fn main() {
    let arg_matches = App::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Funge-98 core interpreter")
        .arg(
            Arg::with_name("warn")
                .short("w")
                .long("warn")
                .help("Print reflectable-condition diagnostics to stderr"),
        )
        .arg(
            Arg::with_name("quiet")
                .short("q")
                .long("quiet")
                .help("Suppress the diagnostic funge-space dump before execution"),
        )
        .arg(Arg::with_name("PROGRAM").help("Funge-98 source to execute"))
        .get_matches();

    let Some(filename) = arg_matches.value_of("PROGRAM") else {
        println!("Usage: funge98 <source-file>");
        std::process::exit(1);
    };

    let space = match FungeSpace::load(filename) {
        Ok(space) => space,
        Err(e) => {
            println!("Usage: funge98 <source-file>");
            eprintln!("error reading {}: {}", filename, e);
            std::process::exit(1);
        }
    };

    if !arg_matches.is_present("quiet") {
        print!("{}", space);
    }

    let env = CmdLineEnv::new(arg_matches.is_present("warn"));
    let mut interpreter = Interpreter::new(space, env);

    let result = interpreter.run();
    std::process::exit(match result {
        ProgramResult::Done(code) => code,
    });
}
