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

//! Reacting to signals caught by the shell
//!
//! The signal handler installed by [`Env::install_signal_handlers`] does
//! nothing but record the signal number (see
//! [`System::caught_signals`](crate::System::caught_signals)). The functions
//! in this module apply the effect of the recorded signals on the main path
//! of the shell:
//!
//! - `SIGCHLD`: [reap](Env::reap_children) all child processes that have
//!   changed their state and update the job list accordingly.
//! - `SIGINT` and `SIGTSTP`: [forward](Env::forward_to_foreground) the signal
//!   to the process group of the foreground job, if any.
//! - `SIGQUIT`: terminate the shell.
//!
//! The shell calls [`Env::handle_caught_signals`] before reading each command
//! line, when reading is interrupted by a signal, and repeatedly while
//! [waiting for the foreground job](Env::wait_for_foreground).
//! Removing jobs and marking them stopped happens only in
//! [`Env::reap_children`].

use crate::Env;
use crate::job::{JobState, Pid};
use crate::semantics::{Divert, ExitStatus, Result};
use crate::system::{Errno, SigSet, SigmaskHow, Signal, SignalHandling, WaitStatus};
use std::ops::ControlFlow::{Break, Continue};

/// Signals the shell catches
pub const RELAY_SIGNALS: [Signal; 4] = [
    Signal::SIGCHLD,
    Signal::SIGINT,
    Signal::SIGTSTP,
    Signal::SIGQUIT,
];

/// Returns a signal set containing [`RELAY_SIGNALS`].
#[must_use]
pub fn relay_signal_set() -> SigSet {
    let mut set = SigSet::empty();
    for signal in RELAY_SIGNALS {
        set.add(signal);
    }
    set
}

/// Returns the signal mask with [`RELAY_SIGNALS`] removed.
///
/// The shell keeps the relayed signals blocked while it runs and unblocks
/// them with this mask only while it sleeps. Child processes start with this
/// mask as well.
#[must_use]
pub fn without_relay_signals(mask: &SigSet) -> SigSet {
    let mut mask = *mask;
    for signal in RELAY_SIGNALS {
        mask.remove(signal);
    }
    mask
}

impl Env {
    /// Installs the signal handlers for [`RELAY_SIGNALS`].
    pub fn install_signal_handlers(&mut self) -> nix::Result<()> {
        for signal in RELAY_SIGNALS {
            self.system.sigaction(signal, SignalHandling::Catch)?;
        }
        Ok(())
    }

    /// Handles all signals caught so far.
    ///
    /// Handling a signal may cause another signal to be caught, so this
    /// function repeats until no signal is left. The result is `Break` only
    /// if `SIGQUIT` has been caught.
    pub fn handle_caught_signals(&mut self) -> Result {
        loop {
            let signals = self.system.caught_signals();
            if signals.is_empty() {
                return Continue(());
            }
            for signal in signals {
                self.handle_signal(signal)?;
            }
        }
    }

    fn handle_signal(&mut self, signal: Signal) -> Result {
        tracing::debug!(%signal, "handling caught signal");
        match signal {
            Signal::SIGCHLD => self.reap_children(),
            Signal::SIGINT | Signal::SIGTSTP => self.forward_to_foreground(signal),
            Signal::SIGQUIT => {
                self.print("Terminating after receipt of SIGQUIT signal\n");
                return Break(Divert::Abort(ExitStatus::FAILURE));
            }
            _ => (),
        }
        Continue(())
    }

    /// Reaps child processes that have stopped or terminated.
    ///
    /// This function calls [`System::wait`](crate::System::wait) until no
    /// more child process has a status to report. A job whose process has
    /// exited or has been killed is removed from the job list. A job whose
    /// process has been stopped is marked [`JobState::Stopped`]. A message is
    /// printed for a job killed or stopped by a signal.
    pub fn reap_children(&mut self) {
        let any = Pid::from_raw(-1);
        loop {
            match self.system.wait(any) {
                Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => break,

                Ok(WaitStatus::Exited(pid, exit_status)) => {
                    tracing::debug!(pid = pid.as_raw(), exit_status, "child exited");
                    self.jobs.remove(pid);
                }

                Ok(WaitStatus::Signaled(pid, signal, _core_dumped)) => {
                    if let Some(job) = self.jobs.remove(pid) {
                        self.print(&format!(
                            "Job [{}] ({}) terminated by signal {}\n",
                            job.jid, job.pid, signal as i32
                        ));
                    }
                }

                Ok(WaitStatus::Stopped(pid, signal)) => {
                    if let Some(job) = self.jobs.find_by_pid_mut(pid) {
                        job.state = JobState::Stopped;
                        let message = format!(
                            "Job [{}] ({}) stopped by signal {}\n",
                            job.jid, job.pid, signal as i32
                        );
                        self.print(&message);
                    }
                }

                Ok(_) | Err(Errno::EINTR) => (),

                Err(errno) => {
                    self.print_error(&format!("waitpid error: {}\n", errno.desc()));
                    break;
                }
            }
        }
    }

    /// Sends the signal to the process group of the foreground job.
    ///
    /// Does nothing if there is no foreground job.
    pub fn forward_to_foreground(&mut self, signal: Signal) {
        let Some(pid) = self.jobs.foreground_pid() else {
            return;
        };
        let group = Pid::from_raw(-pid.as_raw());
        match self.system.kill(group, Some(signal)) {
            // The job may have terminated before being reaped.
            Ok(()) | Err(Errno::ESRCH) => (),
            Err(errno) => self.print_error(&format!("kill error: {}\n", errno.desc())),
        }
    }

    /// Waits until the given job is no longer in the foreground.
    ///
    /// The job leaves the foreground when the relay finds that it has
    /// terminated or stopped. This function blocks the relayed signals
    /// while examining the job list and unblocks them atomically while
    /// sleeping, so a signal arriving between the check and the sleep wakes
    /// the shell up. The relayed signals are unblocked while sleeping even if
    /// they were already blocked when this function was called.
    ///
    /// The result is `Break` if `SIGQUIT` has been caught.
    pub fn wait_for_foreground(&mut self, pid: Pid) -> Result {
        let mut old_mask = SigSet::empty();
        let relay_signals = relay_signal_set();
        let blocking = self.system.sigmask(
            SigmaskHow::SIG_BLOCK,
            Some(&relay_signals),
            Some(&mut old_mask),
        );
        if let Err(errno) = blocking {
            self.print_error(&format!("sigprocmask error: {}\n", errno.desc()));
            return Continue(());
        }

        let wait_mask = without_relay_signals(&old_mask);
        let result = loop {
            if let Break(divert) = self.handle_caught_signals() {
                break Break(divert);
            }
            let in_foreground = self
                .jobs
                .find_by_pid(pid)
                .is_some_and(|job| job.state == JobState::Foreground);
            if !in_foreground {
                break Continue(());
            }
            if let Err(errno) = self.system.sigsuspend(&wait_mask) {
                self.print_error(&format!("sigsuspend error: {}\n", errno.desc()));
                break Continue(());
            }
        };

        self.system
            .sigmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None)
            .ok();
        result
    }
}
