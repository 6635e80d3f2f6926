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

//! Fg built-in
//!
//! The **`fg`** built-in resumes a job in the foreground.
//!
//! # Synopsis
//!
//! ```sh
//! fg job
//! ```
//!
//! # Operands
//!
//! The operand specifies the job to resume: `%` followed by a job ID, or a
//! process ID. Operands after the first are ignored.
//!
//! # Description
//!
//! The built-in sends `SIGCONT` to the job, makes it the foreground job, and
//! waits until it terminates or stops, just like a job started in the
//! foreground. Nothing is printed on success.
//!
//! # Errors
//!
//! Errors in the operand are the same as those of the [`bg`](crate::bg)
//! built-in.

use crate::bg::{continue_job, report_kill_error, resolve_target};
use std::ops::ControlFlow::Continue;
use tsh_env::Env;
use tsh_env::builtin::Result;
use tsh_env::job::JobState;

/// Entry point for executing the `fg` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let pid = match resolve_target(env, "fg", &args) {
        Ok(pid) => pid,
        Err(error) => {
            env.print(&format!("{error}\n"));
            return Continue(());
        }
    };
    if let Err(errno) = continue_job(env, pid) {
        report_kill_error(env, errno);
        return Continue(());
    }
    if let Err(error) = env.jobs.set_state(pid, JobState::Foreground) {
        env.print_error(&format!("{error}\n"));
        return Continue(());
    }
    env.wait_for_foreground(pid)
}
