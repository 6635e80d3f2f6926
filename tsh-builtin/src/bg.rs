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

//! Bg built-in
//!
//! The **`bg`** built-in resumes a job in the background.
//!
//! # Synopsis
//!
//! ```sh
//! bg job
//! ```
//!
//! # Operands
//!
//! The operand specifies the job to resume: `%` followed by a job ID, or a
//! process ID. Operands after the first are ignored.
//!
//! # Output
//!
//! The resumed job is printed in the form `[jid] (pid) command line`.
//!
//! # Errors
//!
//! It is an error if the operand is missing, is not in either form above, or
//! does not specify a job. The error is reported in one line and the job list
//! is not changed.
//!
//! # Implementation notes
//!
//! `SIGCONT` is sent to the whole process group of the job even if the job is
//! already running. If the process has terminated but has not yet been
//! reaped, sending the signal fails with `ESRCH`, which is ignored.

use std::ops::ControlFlow::Continue;
use thiserror::Error;
use tsh_env::Env;
use tsh_env::builtin::Result;
use tsh_env::job::fmt::Report;
use tsh_env::job::id::{FindError, parse};
use tsh_env::job::{JobState, Pid};
use tsh_env::system::{Errno, Signal};

// Some definitions in this module are shared with the `fg` built-in.

/// Error in identifying the target job
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub(crate) enum TargetError {
    /// No operand was given.
    #[error("{0} command requires PID or %jobid argument")]
    MissingOperand(&'static str),
    /// The operand is not a job ID or process ID.
    #[error("{0}: argument must be a PID or %jobid")]
    InvalidJobId(&'static str),
    /// The operand does not specify an existing job.
    #[error(transparent)]
    UnidentifiedJob(#[from] FindError),
}

/// Returns the process ID of the job specified by the first operand.
pub(crate) fn resolve_target(
    env: &Env,
    name: &'static str,
    args: &[String],
) -> std::result::Result<Pid, TargetError> {
    let operand = args.first().ok_or(TargetError::MissingOperand(name))?;
    let job_ref = parse(operand).map_err(|_| TargetError::InvalidJobId(name))?;
    Ok(job_ref.find(&env.jobs)?.pid)
}

/// Sends `SIGCONT` to the process group of the job.
pub(crate) fn continue_job(env: &mut Env, pid: Pid) -> std::result::Result<(), Errno> {
    let group = Pid::from_raw(-pid.as_raw());
    match env.system.kill(group, Some(Signal::SIGCONT)) {
        Ok(()) | Err(Errno::ESRCH) => Ok(()),
        Err(errno) => Err(errno),
    }
}

/// Prints an error returned from [`continue_job`].
pub(crate) fn report_kill_error(env: &mut Env, errno: Errno) {
    env.print_error(&format!("kill error: {}\n", errno.desc()));
}

/// Entry point for executing the `bg` built-in
pub fn main(env: &mut Env, args: Vec<String>) -> Result {
    let pid = match resolve_target(env, "bg", &args) {
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

    if let Some(job) = env.jobs.find_by_pid_mut(pid) {
        job.state = JobState::Background;
        let report = Report { job }.to_string();
        env.print(&report);
    }
    Continue(())
}
