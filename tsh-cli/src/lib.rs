// This file is part of tsh, a tiny shell with job control.
// Copyright (C) 2026 The tsh authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! This is an internal library crate for the tsh shell. **This crate is not
//! intended to be used as a library by other crates.**
//!
//! The entry point for the shell is the [`main`] function, which is to be used
//! as the `main` function in the binary crate. The function parses the
//! command-line arguments, sets up the shell environment, and runs the main
//! read-eval loop.

pub mod logging;
pub mod startup;

use self::startup::args::{Parse, USAGE};
use tsh_env::Env;
use tsh_env::RealSystem;
use tsh_env::system::{Signal, SignalHandling};
use tsh_semantics::{ExitStatus, ReadEvalLoop};

fn run_as_shell_process(env: &mut Env) -> ExitStatus {
    let args = match self::startup::args::parse(std::env::args_os()) {
        Ok(Parse::Run(args)) => args,
        Ok(Parse::Help) | Err(_) => {
            env.print(USAGE);
            return ExitStatus::FAILURE;
        }
    };

    self::startup::configure_environment(env, &args);
    self::logging::init(env.options.verbose);

    if let Err(errno) = env.install_signal_handlers() {
        env.print_error(&format!("signal error: {}\n", errno.desc()));
        return ExitStatus::FAILURE;
    }

    let divert = ReadEvalLoop::new(env).run();
    tracing::debug!(?divert, "exiting");
    divert.exit_status()
}

/// Runs the shell and exits the process.
pub fn main() -> ! {
    // SAFETY: This is the only instance of RealSystem we create in the whole
    // process.
    let system = unsafe { RealSystem::new() };
    let mut env = Env::with_system(Box::new(system));

    // Rust by default sets SIGPIPE to SIG_IGN, which is inherited by the
    // utilities the shell executes.
    _ = env
        .system
        .sigaction(Signal::SIGPIPE, SignalHandling::Default);

    let exit_status = run_as_shell_process(&mut env);
    std::process::exit(exit_status.0)
}
