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

//! Quit built-in
//!
//! The **`quit`** built-in exits the shell with exit status 0.
//!
//! # Synopsis
//!
//! ```sh
//! quit
//! ```
//!
//! # Errors
//!
//! If there is a stopped job, the built-in prints `There are stopped jobs`
//! and the shell keeps running. Running background jobs do not prevent the
//! shell from exiting; they are left running.
//!
//! # Operands
//!
//! None. Operands are ignored.

use std::ops::ControlFlow::{Break, Continue};
use tsh_env::Env;
use tsh_env::builtin::Result;
use tsh_env::semantics::{Divert, ExitStatus};

/// Entry point for executing the `quit` built-in
pub fn main(env: &mut Env, _args: Vec<String>) -> Result {
    if env.jobs.has_stopped_jobs() {
        env.print("There are stopped jobs\n");
        return Continue(());
    }
    Break(Divert::Exit(ExitStatus::SUCCESS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsh_env::job::JobState;
    use tsh_env_test_helper::{add_job, assert_stdout, virtual_env};

    #[test]
    fn quit_without_jobs() {
        let (mut env, state) = virtual_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result, Break(Divert::Exit(ExitStatus::SUCCESS)));
        assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
    }

    #[test]
    fn quit_with_running_jobs() {
        let (mut env, state) = virtual_env();
        add_job(&mut env, &state, JobState::Background, "sleep 10 &\n");
        let result = main(&mut env, vec![]);
        assert_eq!(result, Break(Divert::Exit(ExitStatus::SUCCESS)));
    }

    #[test]
    fn quit_with_stopped_job_is_refused() {
        let (mut env, state) = virtual_env();
        add_job(&mut env, &state, JobState::Background, "sleep 10 &\n");
        add_job(&mut env, &state, JobState::Stopped, "sleep 20\n");

        let result = main(&mut env, vec![]);

        assert_eq!(result, Continue(()));
        assert_eq!(env.jobs.len(), 2);
        assert_stdout(&state, |stdout| assert_eq!(stdout, "There are stopped jobs\n"));
    }
}
