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

//! This crate contains utility functions for use in tests that interact with
//! the shell environment ([`tsh_env::Env`]).

use assert_matches::assert_matches;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::from_utf8;
use tsh_env::Env;
use tsh_env::job::{JobState, Pid};
use tsh_env::system::r#virtual::{SystemState, VirtualSystem};

/// Creates an environment with a virtual system.
///
/// The returned environment catches the signals the shell relays, as the
/// real shell does at startup. The second element of the returned tuple is
/// the shared system state, which can be used to interact with the virtual
/// system.
pub fn virtual_env() -> (Env, Rc<RefCell<SystemState>>) {
    let system = VirtualSystem::new();
    let state = Rc::clone(&system.state);
    let mut env = Env::with_system(Box::new(system));
    env.install_signal_handlers().unwrap();
    (env, state)
}

/// Adds a job to the environment.
///
/// This function creates a virtual child process leading its own process
/// group and registers it in the job list with the given state and command
/// line. Returns the process ID of the job.
pub fn add_job(
    env: &mut Env,
    state: &RefCell<SystemState>,
    job_state: JobState,
    command_line: &str,
) -> Pid {
    let pid = state.borrow_mut().add_job_process();
    env.jobs.add(pid, job_state, command_line).unwrap();
    pid
}

/// Helper function for asserting on the content of the standard output
///
/// The argument function `f` is called with the content of the standard
/// output as a string slice.
///
/// This function panics if the standard output does not contain a valid UTF-8
/// string.
///
/// # Example
///
/// ```
/// # use tsh_env_test_helper::{assert_stdout, virtual_env};
/// let (mut env, state) = virtual_env();
/// env.print("Hello, world!\n");
/// assert_stdout(&state, |stdout| assert_eq!(stdout, "Hello, world!\n"));
/// ```
pub fn assert_stdout<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    let state = state.borrow();
    assert_matches!(from_utf8(&state.stdout), Ok(stdout) => f(stdout))
}

/// Helper function for asserting on the content of the standard error
///
/// This function is analogous to [`assert_stdout`]. See its documentation for
/// an example.
pub fn assert_stderr<F, T>(state: &RefCell<SystemState>, f: F) -> T
where
    F: FnOnce(&str) -> T,
{
    let state = state.borrow();
    assert_matches!(from_utf8(&state.stderr), Ok(stderr) => f(stderr))
}
