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

//! Shell startup

pub mod args;

use self::args::Args;
use tsh_env::Env;

/// Configures the environment according to the command-line arguments.
///
/// This function sets the shell options and registers the built-in
/// utilities.
pub fn configure_environment(env: &mut Env, args: &Args) {
    env.options.prompt = !args.no_prompt;
    env.options.verbose = args.verbose;
    env.builtins.extend(tsh_builtin::BUILTINS.iter().copied());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::startup::args::{Parse, parse};
    use assert_matches::assert_matches;
    use std::ops::ControlFlow::{Break, Continue};
    use tsh_env::semantics::{Divert, ExitStatus};
    use tsh_env_test_helper::{assert_stdout, virtual_env};
    use tsh_semantics::eval;

    fn parsed(args: &[&str]) -> Args {
        assert_matches!(parse(args.iter().copied()), Ok(Parse::Run(args)) => args)
    }

    #[test]
    fn default_options() {
        let (mut env, _state) = virtual_env();
        configure_environment(&mut env, &parsed(&["tsh"]));
        assert!(env.options.prompt);
        assert!(!env.options.verbose);
    }

    #[test]
    fn flags_set_options() {
        let (mut env, _state) = virtual_env();
        configure_environment(&mut env, &parsed(&["tsh", "-vp"]));
        assert!(!env.options.prompt);
        assert!(env.options.verbose);
    }

    #[test]
    fn builtins_are_registered() {
        let (mut env, state) = virtual_env();
        configure_environment(&mut env, &parsed(&["tsh", "-p"]));

        for name in ["&", "bg", "fg", "jobs", "quit"] {
            assert!(env.builtins.contains_key(name), "{name} missing");
        }
        assert_eq!(eval(&mut env, "&\n"), Continue(()));
        assert_eq!(eval(&mut env, "jobs\n"), Continue(()));
        assert_eq!(
            eval(&mut env, "quit\n"),
            Break(Divert::Exit(ExitStatus::SUCCESS))
        );
        assert!(state.borrow().processes.is_empty());
        assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
    }
}
