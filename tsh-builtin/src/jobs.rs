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

//! Jobs built-in
//!
//! The **`jobs`** built-in prints the jobs the shell is managing.
//!
//! # Synopsis
//!
//! ```sh
//! jobs
//! ```
//!
//! # Output
//!
//! One line is printed for each job in the order of the job list:
//!
//! ```text
//! [1] (12345) Running sleep 10 &
//! [2] (12350) Stopped sleep 20
//! ```
//!
//! The state is one of `Foreground`, `Running`, and `Stopped`. The last part
//! is the command line as entered.
//!
//! # Operands
//!
//! None. Operands are ignored.
//!
//! # Implementation notes
//!
//! The built-in does not reap finished jobs by itself. Jobs that have
//! finished since the last prompt are removed by the relay before the
//! command line is evaluated.

use itertools::Itertools as _;
use std::ops::ControlFlow::Continue;
use tsh_env::Env;
use tsh_env::builtin::Result;
use tsh_env::job::fmt::Report;

/// Entry point for executing the `jobs` built-in
pub fn main(env: &mut Env, _args: Vec<String>) -> Result {
    let output = env
        .jobs
        .iter()
        .map(|job| format!("{:#}", Report { job }))
        .join("");
    env.print(&output);
    Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsh_env::job::JobState;
    use tsh_env_test_helper::{add_job, assert_stdout, virtual_env};

    #[test]
    fn no_jobs() {
        let (mut env, state) = virtual_env();
        let result = main(&mut env, vec![]);
        assert_eq!(result, Continue(()));
        assert_stdout(&state, |stdout| assert_eq!(stdout, ""));
    }

    #[test]
    fn jobs_in_all_states() {
        let (mut env, state) = virtual_env();
        let pid1 = add_job(&mut env, &state, JobState::Background, "sleep 10 &\n");
        let pid2 = add_job(&mut env, &state, JobState::Stopped, "sleep 20\n");
        let pid3 = add_job(&mut env, &state, JobState::Foreground, "sleep 30\n");

        let result = main(&mut env, vec![]);

        assert_eq!(result, Continue(()));
        assert_stdout(&state, |stdout| {
            assert_eq!(
                stdout,
                format!(
                    "[1] ({pid1}) Running sleep 10 &\n\
                     [2] ({pid2}) Stopped sleep 20\n\
                     [3] ({pid3}) Foreground sleep 30\n"
                )
            )
        });
    }

    #[test]
    fn jobs_are_listed_in_slot_order() {
        let (mut env, state) = virtual_env();
        let pid1 = add_job(&mut env, &state, JobState::Background, "a &\n");
        let pid2 = add_job(&mut env, &state, JobState::Background, "b &\n");
        env.jobs.remove(pid1);
        let pid3 = add_job(&mut env, &state, JobState::Background, "c &\n");

        assert_eq!(main(&mut env, vec![]), Continue(()));

        assert_stdout(&state, |stdout| {
            assert_eq!(
                stdout,
                format!("[3] ({pid3}) Running c &\n[2] ({pid2}) Running b &\n")
            )
        });
    }
}
