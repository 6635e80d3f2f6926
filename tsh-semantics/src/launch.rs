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

//! Starting external utilities as jobs
//!
//! [`spawn`] creates a child process that runs an external utility. The child
//! is placed in a new process group whose ID is the child's process ID so
//! that signals sent to the group reach only the job and the terminal's
//! signals do not reach the job directly.
//!
//! `SIGCHLD` is blocked from before the fork until the job has been added to
//! the job list. Otherwise, the relay might reap the child before the parent
//! registered it, leaving a stale job in the list.

use std::ffi::{CString, OsString};
use std::os::unix::ffi::OsStrExt;
use thiserror::Error;
use tsh_env::Env;
use tsh_env::job::{AddError, JobState, Pid};
use tsh_env::relay::without_relay_signals;
use tsh_env::semantics::ExitStatus;
use tsh_env::system::{ChildProcessTask, Errno, SigSet, SigmaskHow, Signal};

/// Error in starting a job
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LaunchError {
    /// The job list has no vacant slot.
    #[error("Tried to create too many jobs")]
    TooManyJobs,
    /// A field contains a null byte.
    #[error("{0}: argument contains a null byte")]
    InvalidArgument(String),
    /// The signal mask could not be changed.
    #[error("sigprocmask error: {}", .0.desc())]
    SignalMask(Errno),
    /// The child process could not be created.
    #[error("fork error: {}", .0.desc())]
    Fork(Errno),
    /// The child process could not be registered as a job.
    #[error(transparent)]
    Job(#[from] AddError),
}

fn to_c_strings(fields: &[OsString]) -> Result<Vec<CString>, LaunchError> {
    fields
        .iter()
        .map(|field| {
            CString::new(field.as_bytes())
                .map_err(|_| LaunchError::InvalidArgument(field.to_string_lossy().into_owned()))
        })
        .collect()
}

/// Starts an external utility as a new job.
///
/// `fields` are the command name and arguments. `command_line` is the line
/// the user entered, which is recorded in the job list. The new job is
/// [`Background`](JobState::Background) if `background` is true and
/// [`Foreground`](JobState::Foreground) otherwise.
///
/// Returns the process ID of the new job. The caller is responsible for
/// waiting for a foreground job.
///
/// If the job list is full or a field contains a null byte, this function
/// fails without creating a process. On any error, the job list and the
/// signal mask are left unchanged. The fields are passed to the utility
/// byte for byte, whether or not they are valid UTF-8.
///
/// The child process starts with the signal mask the shell had before this
/// function was called, except that the signals the shell relays are
/// unblocked.
pub fn spawn(
    env: &mut Env,
    fields: &[OsString],
    command_line: &str,
    background: bool,
) -> Result<Pid, LaunchError> {
    if env.jobs.is_full() {
        return Err(LaunchError::TooManyJobs);
    }
    let args = to_c_strings(fields)?;

    let mut sigchld = SigSet::empty();
    sigchld.add(Signal::SIGCHLD);
    let mut old_mask = SigSet::empty();
    env.system
        .sigmask(SigmaskHow::SIG_BLOCK, Some(&sigchld), Some(&mut old_mask))
        .map_err(LaunchError::SignalMask)?;

    let state = if background {
        JobState::Background
    } else {
        JobState::Foreground
    };
    let child_mask = without_relay_signals(&old_mask);
    let result = start_job(env, args, child_mask, state, command_line);

    env.system
        .sigmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None)
        .ok();
    result
}

fn start_job(
    env: &mut Env,
    args: Vec<CString>,
    child_mask: SigSet,
    state: JobState,
    command_line: &str,
) -> Result<Pid, LaunchError> {
    let starter = env.system.new_child_process().map_err(LaunchError::Fork)?;
    let task: ChildProcessTask =
        Box::new(move |env: &mut Env| exec_utility(env, &args, &child_mask));
    let pid = starter(env, task);

    // Both the parent and the child set the process group so that it is in
    // place whichever runs first.
    if let Err(errno) = env.system.setpgid(pid, pid) {
        // EACCES means the child has already executed the utility.
        tracing::debug!(pid = pid.as_raw(), %errno, "setpgid in parent failed");
    }

    if let Err(error) = env.jobs.add(pid, state, command_line) {
        env.system
            .kill(Pid::from_raw(-pid.as_raw()), Some(Signal::SIGKILL))
            .ok();
        return Err(error.into());
    }
    Ok(pid)
}

/// Executes an external utility in a new child process.
///
/// This function is the task run in the child process created by [`spawn`].
/// It restores the signal mask to `mask`, moves the process into a new
/// process group, and replaces the process with the utility named by
/// `args[0]`. If the utility cannot be executed, this function prints an
/// error message and returns [`ExitStatus::FAILURE`].
pub fn exec_utility(env: &mut Env, args: &[CString], mask: &SigSet) -> ExitStatus {
    env.system
        .sigmask(SigmaskHow::SIG_SETMASK, Some(mask), None)
        .ok();
    env.system
        .setpgid(Pid::from_raw(0), Pid::from_raw(0))
        .ok();

    let Some(name) = args.first() else {
        return ExitStatus::FAILURE;
    };
    let errno = match env.system.execvp(name, args) {
        Ok(never) => match never {},
        Err(errno) => errno,
    };
    tracing::debug!(%errno, "execvp failed");
    env.print(&format!("{}: Command not found\n", name.to_string_lossy()));
    ExitStatus::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tsh_env::job::MAX_JOBS;
    use tsh_env::system::r#virtual::ProcessState;
    use tsh_env_test_helper::{assert_stdout, virtual_env};

    fn fields(fields: &[&str]) -> Vec<OsString> {
        fields.iter().map(OsString::from).collect()
    }

    #[test]
    fn background_job_is_registered_in_own_process_group() {
        let (mut env, state) = virtual_env();

        let result = spawn(&mut env, &fields(&["sleep", "5"]), "sleep 5 &\n", true);

        let pid = assert_matches!(result, Ok(pid) => pid);
        assert_matches!(env.jobs.find_by_pid(pid), Some(job) => {
            assert_eq!(job.jid, 1);
            assert_eq!(job.state, JobState::Background);
            assert_eq!(job.command_line, "sleep 5 &\n");
        });
        let state = state.borrow();
        assert_eq!(state.processes[&pid].pgid, pid);
        assert_eq!(state.processes[&pid].state, ProcessState::Running);
        assert_eq!(state.blocked_signals, SigSet::empty());
    }

    #[test]
    fn foreground_job_is_registered_as_foreground() {
        let (mut env, _state) = virtual_env();

        let result = spawn(&mut env, &fields(&["sleep", "5"]), "sleep 5\n", false);

        let pid = assert_matches!(result, Ok(pid) => pid);
        assert_eq!(env.jobs.foreground_pid(), Some(pid));
    }

    #[test]
    fn signal_mask_is_restored_to_previous_value() {
        let (mut env, state) = virtual_env();
        let mut blocked = SigSet::empty();
        blocked.add(Signal::SIGINT);
        state.borrow_mut().blocked_signals = blocked;

        spawn(&mut env, &fields(&["true"]), "true &\n", true).unwrap();

        assert_eq!(state.borrow().blocked_signals, blocked);
    }

    #[test]
    fn full_job_list_prevents_fork() {
        let (mut env, state) = virtual_env();
        for i in 0..MAX_JOBS {
            let line = format!("sleep {i} &\n");
            spawn(&mut env, &fields(&["sleep", "1"]), &line, true).unwrap();
        }
        let before = env.jobs.clone();

        let result = spawn(&mut env, &fields(&["sleep", "1"]), "sleep 1 &\n", true);

        assert_eq!(result, Err(LaunchError::TooManyJobs));
        assert_eq!(env.jobs, before);
        assert_eq!(state.borrow().processes.len(), MAX_JOBS);
    }

    #[test]
    fn null_byte_in_argument() {
        let (mut env, state) = virtual_env();

        let result = spawn(&mut env, &fields(&["echo", "a\0b"]), "echo\n", true);

        assert_eq!(result, Err(LaunchError::InvalidArgument("a\0b".to_owned())));
        assert!(state.borrow().processes.is_empty());
        assert!(env.jobs.is_empty());
    }

    #[test]
    fn non_utf8_arguments_are_passed_unchanged() {
        use std::os::unix::ffi::OsStringExt;
        let field = OsString::from_vec(vec![b'a', 0xFF, b'b']);

        let args = to_c_strings(&[OsString::from("printf"), field]).unwrap();

        assert_eq!(args[0].as_bytes(), b"printf");
        assert_eq!(args[1].as_bytes(), [b'a', 0xFF, b'b']);
    }

    #[test]
    fn fork_failure_is_reported_without_side_effects() {
        let (mut env, state) = virtual_env();
        state.borrow_mut().fork_error = Some(Errno::EAGAIN);

        let result = spawn(&mut env, &fields(&["sleep", "1"]), "sleep 1\n", false);

        assert_eq!(result, Err(LaunchError::Fork(Errno::EAGAIN)));
        assert!(env.jobs.is_empty());
        assert_eq!(state.borrow().blocked_signals, SigSet::empty());
    }

    #[test]
    fn second_foreground_job_is_killed() {
        let (mut env, state) = virtual_env();
        let first = spawn(&mut env, &fields(&["sleep", "1"]), "sleep 1\n", false).unwrap();

        let result = spawn(&mut env, &fields(&["sleep", "2"]), "sleep 2\n", false);

        assert_eq!(result, Err(LaunchError::Job(AddError::ForegroundTaken(first))));
        assert_eq!(env.jobs.len(), 1);
        let killed = Pid::from_raw(first.as_raw() + 1);
        assert_eq!(
            state.borrow().processes[&killed].state,
            ProcessState::Signaled(Signal::SIGKILL)
        );
    }

    #[test]
    fn failed_exec_prints_command_not_found() {
        let (mut env, state) = virtual_env();
        let args = [CString::new("nosuchcmd").unwrap(), CString::new("x").unwrap()];

        let exit_status = exec_utility(&mut env, &args, &SigSet::empty());

        assert_eq!(exit_status, ExitStatus::FAILURE);
        assert_eq!(state.borrow().executed, [["nosuchcmd", "x"]]);
        assert_stdout(&state, |stdout| {
            assert_eq!(stdout, "nosuchcmd: Command not found\n")
        });
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            LaunchError::TooManyJobs.to_string(),
            "Tried to create too many jobs"
        );
        assert_eq!(
            LaunchError::InvalidArgument("a\0b".to_owned()).to_string(),
            "a\0b: argument contains a null byte"
        );
    }
}
