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

//! Processes in a virtual system

use crate::job::Pid;
use nix::sys::signal::Signal;
use nix::sys::wait::WaitStatus;
use std::ffi::c_int;

/// State of a virtual process
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ProcessState {
    /// The process is running.
    Running,
    /// The process has been stopped by the signal.
    Stopped(Signal),
    /// The process has exited with the exit status.
    Exited(c_int),
    /// The process has been killed by the signal.
    Signaled(Signal),
}

impl ProcessState {
    /// Whether the process has not yet terminated.
    #[must_use]
    pub fn is_alive(self) -> bool {
        matches!(self, ProcessState::Running | ProcessState::Stopped(_))
    }

    /// Converts the state to the status `waitpid` would report.
    #[must_use]
    pub fn to_wait_status(self, pid: Pid) -> WaitStatus {
        match self {
            ProcessState::Running => WaitStatus::Continued(pid),
            ProcessState::Stopped(signal) => WaitStatus::Stopped(pid, signal),
            ProcessState::Exited(exit_status) => WaitStatus::Exited(pid, exit_status),
            ProcessState::Signaled(signal) => WaitStatus::Signaled(pid, signal, false),
        }
    }
}

/// Child process of the shell in a virtual system
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Process {
    /// Process group ID
    pub pgid: Pid,
    /// Current state
    pub state: ProcessState,
    /// Whether `state` has changed since last reported by `wait`
    pub state_changed: bool,
}

impl Process {
    /// Creates a running process in the given process group.
    #[must_use]
    pub fn new(pgid: Pid) -> Process {
        Process {
            pgid,
            state: ProcessState::Running,
            state_changed: false,
        }
    }

    /// Changes the state of the process.
    ///
    /// Returns true if the change should be reported to the parent, that is,
    /// the process has stopped or terminated.
    pub fn set_state(&mut self, state: ProcessState) -> bool {
        if self.state == state {
            return false;
        }
        self.state = state;
        self.state_changed = state != ProcessState::Running;
        self.state_changed
    }

    /// Applies the default action of a signal to the process.
    ///
    /// Returns true if the process has stopped or terminated.
    pub fn receive_signal(&mut self, signal: Signal) -> bool {
        use Signal::*;
        match (self.state, signal) {
            (ProcessState::Stopped(_), SIGCONT) => self.set_state(ProcessState::Running),
            (_, SIGCONT | SIGCHLD | SIGURG | SIGWINCH) => false,
            (ProcessState::Running, SIGSTOP | SIGTSTP | SIGTTIN | SIGTTOU) => {
                self.set_state(ProcessState::Stopped(signal))
            }
            (_, SIGSTOP | SIGTSTP | SIGTTIN | SIGTTOU) => false,
            (ProcessState::Running, _) | (ProcessState::Stopped(_), SIGKILL) => {
                self.set_state(ProcessState::Signaled(signal))
            }
            // Other signals stay pending in a stopped process.
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_continue_and_kill() {
        let mut process = Process::new(Pid::from_raw(10));
        assert!(process.receive_signal(Signal::SIGTSTP));
        assert_eq!(process.state, ProcessState::Stopped(Signal::SIGTSTP));
        assert!(process.state_changed);

        assert!(!process.receive_signal(Signal::SIGINT));
        assert_eq!(process.state, ProcessState::Stopped(Signal::SIGTSTP));

        assert!(!process.receive_signal(Signal::SIGCONT));
        assert_eq!(process.state, ProcessState::Running);
        assert!(!process.state_changed);

        assert!(process.receive_signal(Signal::SIGINT));
        assert_eq!(process.state, ProcessState::Signaled(Signal::SIGINT));
        assert!(!process.state.is_alive());
    }

    #[test]
    fn terminated_process_ignores_signals() {
        let mut process = Process::new(Pid::from_raw(10));
        process.set_state(ProcessState::Exited(0));
        assert!(!process.receive_signal(Signal::SIGKILL));
        assert!(!process.receive_signal(Signal::SIGSTOP));
        assert_eq!(process.state, ProcessState::Exited(0));
    }
}
