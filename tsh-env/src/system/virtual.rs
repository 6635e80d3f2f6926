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

//! System simulated in Rust.
//!
//! [`VirtualSystem`] is a pure Rust implementation of [`System`] that simulates
//! the behavior of the underlying system without any interaction with the
//! actual system. `VirtualSystem` is used for testing the behavior of the shell
//! in unit tests.
//!
//! # Processes
//!
//! The shell is the only process that runs code in a virtual system. Creating
//! a child process only registers a [`Process`] in the [`SystemState`]; the
//! task passed to the [`ChildProcessStarter`] is never run. Tests drive child
//! processes by sending signals to them or by changing their state directly.
//!
//! # Signals
//!
//! Sending a signal to a child process applies the default action of the
//! signal. When a child stops or terminates, `SIGCHLD` is sent to the shell.
//! The shell can block, ignore, and catch signals.
//!
//! [`sigsuspend`](VirtualSystem::sigsuspend) runs [scheduled
//! events](ScheduledEvent) one by one until a signal is caught. If no event
//! is left, it fails with `EDEADLK` instead of blocking forever.
//!
//! # I/O
//!
//! The standard input is a byte queue and the standard output and error are
//! byte buffers in the [`SystemState`].

mod process;

pub use self::process::*;
use super::{
    ChildProcessStarter, ChildProcessTask, Errno, SigSet, SigmaskHow, Signal, SignalHandling,
    System, WaitStatus,
};
use crate::Env;
use crate::io::Fd;
use crate::job::Pid;
use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::rc::Rc;

/// Event applied to a virtual system while the shell is suspended
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScheduledEvent {
    /// A child process changes its state.
    StateChange(Pid, ProcessState),
    /// The shell receives a signal, as if the user hit a key on the terminal.
    Signal(Signal),
}

/// Collection of the state of a virtual system
#[derive(Clone, Debug)]
pub struct SystemState {
    /// Process ID of the shell
    pub pid: Pid,

    /// Process group ID of the shell
    pub pgid: Pid,

    /// Child processes of the shell
    pub processes: BTreeMap<Pid, Process>,

    /// Content of the standard input not yet read
    pub stdin: VecDeque<u8>,

    /// Content written to the standard output
    pub stdout: Vec<u8>,

    /// Content written to the standard error
    pub stderr: Vec<u8>,

    /// Signals blocked in the shell
    pub blocked_signals: SigSet,

    /// Signals sent to the shell while blocked
    pub pending_signals: Vec<Signal>,

    /// How the shell handles signals
    ///
    /// Signals not in the map have the default handling. Only caught signals
    /// have an effect on the shell.
    pub signal_handling: HashMap<Signal, SignalHandling>,

    /// Signals caught but not yet returned by `caught_signals`
    pub caught_signals: Vec<Signal>,

    /// Arguments of all `kill` calls made by the shell
    pub sent_signals: Vec<(Pid, Option<Signal>)>,

    /// Arguments of all `execvp` calls made by the shell
    pub executed: Vec<Vec<String>>,

    /// Events [`sigsuspend`](VirtualSystem::sigsuspend) applies in order
    pub scheduled: VecDeque<ScheduledEvent>,

    /// Error `new_child_process` fails with, if any
    pub fork_error: Option<Errno>,
}

impl Default for SystemState {
    fn default() -> Self {
        SystemState {
            pid: Pid::from_raw(2),
            pgid: Pid::from_raw(2),
            processes: BTreeMap::new(),
            stdin: VecDeque::new(),
            stdout: Vec::new(),
            stderr: Vec::new(),
            blocked_signals: SigSet::empty(),
            pending_signals: Vec::new(),
            signal_handling: HashMap::new(),
            caught_signals: Vec::new(),
            sent_signals: Vec::new(),
            executed: Vec::new(),
            scheduled: VecDeque::new(),
            fork_error: None,
        }
    }
}

impl SystemState {
    /// Returns the standard output content as a string.
    #[must_use]
    pub fn stdout_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stdout)
    }

    /// Returns the standard error content as a string.
    #[must_use]
    pub fn stderr_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.stderr)
    }

    fn new_pid(&self) -> Pid {
        let max = self.processes.keys().next_back().copied().unwrap_or(self.pid);
        Pid::from_raw(max.as_raw().max(self.pid.as_raw()) + 1)
    }

    /// Adds a running child process in the process group of the shell.
    ///
    /// This is what forking does.
    pub fn add_child(&mut self) -> Pid {
        let pid = self.new_pid();
        self.processes.insert(pid, Process::new(self.pgid));
        pid
    }

    /// Adds a running child process leading its own process group.
    ///
    /// This is what a job started by the shell looks like.
    pub fn add_job_process(&mut self) -> Pid {
        let pid = self.new_pid();
        self.processes.insert(pid, Process::new(pid));
        pid
    }

    /// Sends a signal to the shell.
    ///
    /// A caught signal is recorded in `caught_signals`, or in
    /// `pending_signals` if blocked. Other signals are discarded.
    pub fn raise(&mut self, signal: Signal) {
        let handling = self.signal_handling.get(&signal).copied();
        if handling != Some(SignalHandling::Catch) {
            return;
        }
        let list = if self.blocked_signals.contains(signal) {
            &mut self.pending_signals
        } else {
            &mut self.caught_signals
        };
        if !list.contains(&signal) {
            list.push(signal);
        }
    }

    /// Delivers pending signals that are no longer blocked.
    fn deliver_pending_signals(&mut self) {
        let pending = std::mem::take(&mut self.pending_signals);
        for signal in pending {
            self.raise(signal);
        }
    }

    /// Changes the state of a child process.
    ///
    /// If the process stops or terminates, `SIGCHLD` is sent to the shell.
    /// Does nothing if there is no such process.
    pub fn set_process_state(&mut self, pid: Pid, state: ProcessState) {
        if let Some(process) = self.processes.get_mut(&pid) {
            if process.set_state(state) {
                self.raise(Signal::SIGCHLD);
            }
        }
    }

    fn signal_child(&mut self, pid: Pid, signal: Signal) {
        if let Some(process) = self.processes.get_mut(&pid) {
            if process.receive_signal(signal) {
                self.raise(Signal::SIGCHLD);
            }
        }
    }

    /// Applies the next scheduled event.
    ///
    /// Returns false if there is no scheduled event.
    pub fn run_scheduled_event(&mut self) -> bool {
        match self.scheduled.pop_front() {
            None => false,
            Some(ScheduledEvent::StateChange(pid, state)) => {
                self.set_process_state(pid, state);
                true
            }
            Some(ScheduledEvent::Signal(signal)) => {
                self.raise(signal);
                true
            }
        }
    }
}

/// Simulated system
///
/// See the [module-level documentation](self) to grasp a basic understanding
/// of `VirtualSystem`.
///
/// A `VirtualSystem` shares its [`SystemState`] through an `Rc`, so a test
/// can keep a clone of `state` to inspect the system after handing the
/// `VirtualSystem` to an [`Env`].
#[derive(Clone, Debug, Default)]
pub struct VirtualSystem {
    /// State of the system
    pub state: Rc<RefCell<SystemState>>,
}

impl VirtualSystem {
    /// Creates a virtual system with no child processes.
    #[must_use]
    pub fn new() -> VirtualSystem {
        VirtualSystem::default()
    }
}

impl System for VirtualSystem {
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize> {
        if fd != Fd::STDIN {
            return Err(Errno::EBADF);
        }
        let mut state = self.state.borrow_mut();
        let count = buffer.len().min(state.stdin.len());
        for (byte, input) in buffer.iter_mut().zip(state.stdin.drain(..count)) {
            *byte = input;
        }
        Ok(count)
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize> {
        let mut state = self.state.borrow_mut();
        let output = match fd {
            Fd::STDOUT => &mut state.stdout,
            Fd::STDERR => &mut state.stderr,
            _ => return Err(Errno::EBADF),
        };
        output.extend_from_slice(buffer);
        Ok(buffer.len())
    }

    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        if let Some(oldset) = oldset {
            *oldset = state.blocked_signals;
        }
        if let Some(set) = set {
            match how {
                SigmaskHow::SIG_BLOCK => {
                    for signal in set.iter() {
                        state.blocked_signals.add(signal);
                    }
                }
                SigmaskHow::SIG_UNBLOCK => {
                    for signal in set.iter() {
                        state.blocked_signals.remove(signal);
                    }
                }
                SigmaskHow::SIG_SETMASK => state.blocked_signals = *set,
                #[allow(unreachable_patterns)]
                _ => return Err(Errno::EINVAL),
            }
        }
        state.deliver_pending_signals();
        Ok(())
    }

    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> nix::Result<SignalHandling> {
        if matches!(signal, Signal::SIGKILL | Signal::SIGSTOP) {
            return Err(Errno::EINVAL);
        }
        let mut state = self.state.borrow_mut();
        let old_handling = state.signal_handling.insert(signal, handling);
        Ok(old_handling.unwrap_or_default())
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.state.borrow_mut().caught_signals)
    }

    fn sigsuspend(&mut self, mask: &SigSet) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        let saved_mask = std::mem::replace(&mut state.blocked_signals, *mask);
        state.deliver_pending_signals();
        let mut result = Ok(());
        while state.caught_signals.is_empty() {
            if !state.run_scheduled_event() {
                result = Err(Errno::EDEADLK);
                break;
            }
        }
        state.blocked_signals = saved_mask;
        result
    }

    /// Simulates waiting for input.
    ///
    /// The standard input is always ready because an empty `stdin` means the
    /// end of input. Pending signals unblocked by `signal_mask` are caught
    /// first, in which case this function returns `Err(Errno::EINTR)`.
    fn select(&mut self, reader: Fd, signal_mask: &SigSet) -> nix::Result<()> {
        if reader != Fd::STDIN {
            return Err(Errno::EBADF);
        }
        let mut state = self.state.borrow_mut();
        let saved_mask = std::mem::replace(&mut state.blocked_signals, *signal_mask);
        state.deliver_pending_signals();
        state.blocked_signals = saved_mask;
        if state.caught_signals.is_empty() {
            Ok(())
        } else {
            Err(Errno::EINTR)
        }
    }

    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> nix::Result<()> {
        let mut state = self.state.borrow_mut();
        state.sent_signals.push((target, signal));

        let raw = target.as_raw();
        let (include_self, children): (bool, Vec<Pid>) = match raw {
            1.. => {
                let is_child = state.processes.contains_key(&target);
                (target == state.pid, if is_child { vec![target] } else { vec![] })
            }
            -1 => (true, state.processes.keys().copied().collect()),
            _ => {
                let pgid = if raw == 0 {
                    state.pgid
                } else {
                    Pid::from_raw(-raw)
                };
                let children = state
                    .processes
                    .iter()
                    .filter(|(_, process)| process.pgid == pgid)
                    .map(|(pid, _)| *pid)
                    .collect();
                (state.pgid == pgid, children)
            }
        };
        if !include_self && children.is_empty() {
            return Err(Errno::ESRCH);
        }

        if let Some(signal) = signal {
            for pid in children {
                state.signal_child(pid, signal);
            }
            if include_self {
                state.raise(signal);
            }
        }
        Ok(())
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()> {
        if pgid.as_raw() < 0 {
            return Err(Errno::EINVAL);
        }
        let mut state = self.state.borrow_mut();
        let pid = if pid.as_raw() == 0 { state.pid } else { pid };
        let pgid = if pgid.as_raw() == 0 { pid } else { pgid };
        if pid == state.pid {
            state.pgid = pgid;
            Ok(())
        } else if let Some(process) = state.processes.get_mut(&pid) {
            process.pgid = pgid;
            Ok(())
        } else {
            Err(Errno::ESRCH)
        }
    }

    /// Creates a new child process.
    ///
    /// The child process is added to the system state in the process group
    /// of the shell. The returned starter returns the process ID of the child
    /// without running the task.
    fn new_child_process(&mut self) -> nix::Result<ChildProcessStarter> {
        let mut state = self.state.borrow_mut();
        if let Some(errno) = state.fork_error {
            return Err(errno);
        }
        let pid = state.add_child();
        Ok(Box::new(move |_env: &mut Env, _task: ChildProcessTask| pid))
    }

    fn wait(&mut self, target: Pid) -> nix::Result<WaitStatus> {
        let mut state = self.state.borrow_mut();
        let raw = target.as_raw();
        let shell_pgid = state.pgid;
        let is_target = |pid: Pid, process: &Process| match raw {
            -1 => true,
            0 => process.pgid == shell_pgid,
            1.. => pid == target,
            _ => process.pgid.as_raw() == -raw,
        };

        let changed = state
            .processes
            .iter()
            .find(|&(&pid, process)| is_target(pid, process) && process.state_changed)
            .map(|(&pid, process)| (pid, process.state));
        if let Some((pid, process_state)) = changed {
            if process_state.is_alive() {
                if let Some(process) = state.processes.get_mut(&pid) {
                    process.state_changed = false;
                }
            } else {
                state.processes.remove(&pid);
            }
            return Ok(process_state.to_wait_status(pid));
        }

        if state
            .processes
            .iter()
            .any(|(&pid, process)| is_target(pid, process))
        {
            Ok(WaitStatus::StillAlive)
        } else {
            Err(Errno::ECHILD)
        }
    }

    /// Records the call and fails with `ENOENT`.
    fn execvp(&mut self, _file: &CStr, args: &[CString]) -> nix::Result<Infallible> {
        let args = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        self.state.borrow_mut().executed.push(args);
        Err(Errno::ENOENT)
    }
}
