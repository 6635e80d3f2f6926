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

//! [System] and its implementors.

pub mod real;
pub mod r#virtual;

use crate::Env;
use crate::io::Fd;
use crate::job::Pid;
use crate::semantics::ExitStatus;
#[doc(no_inline)]
pub use nix::errno::Errno;
#[doc(no_inline)]
pub use nix::sys::signal::{SigSet, SigmaskHow, Signal};
#[doc(no_inline)]
pub use nix::sys::wait::WaitStatus;
use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::fmt::Debug;

/// API to the system-managed parts of the environment.
///
/// The `System` trait defines a collection of methods to access the underlying
/// operating system from the shell as an application program. There are two
/// implementors for this trait: [`RealSystem`](self::real::RealSystem) and
/// [`VirtualSystem`](self::virtual::VirtualSystem).
pub trait System: Debug {
    /// Reads from the file descriptor.
    ///
    /// This is a thin wrapper around the `read` system call. Unlike most
    /// other methods, this function does not retry on `EINTR` so that the
    /// caller can handle caught signals while waiting for input.
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize>;

    /// Writes to the file descriptor.
    ///
    /// This is a thin wrapper around the `write` system call. The call may
    /// write fewer bytes than requested.
    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize>;

    /// Writes the whole buffer to the file descriptor.
    ///
    /// This function calls [`write`](Self::write) repeatedly until all the
    /// bytes are written, retrying on `EINTR`.
    fn write_all(&mut self, fd: Fd, mut buffer: &[u8]) -> nix::Result<()> {
        while !buffer.is_empty() {
            match self.write(fd, buffer) {
                Ok(0) => return Err(Errno::EIO),
                Ok(count) => buffer = &buffer[count..],
                Err(Errno::EINTR) => continue,
                Err(errno) => return Err(errno),
            }
        }
        Ok(())
    }

    /// Gets and/or sets the signal blocking mask.
    ///
    /// This is a thin wrapper around the `sigprocmask` system call.
    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()>;

    /// Gets and sets the handler for a signal.
    ///
    /// This function returns the previous handling of the signal. A signal
    /// set to [`SignalHandling::Catch`] is recorded when it is delivered and
    /// later returned from [`caught_signals`](Self::caught_signals).
    fn sigaction(&mut self, signal: Signal, handling: SignalHandling)
    -> nix::Result<SignalHandling>;

    /// Returns signals this process has caught, if any.
    ///
    /// Each signal caught since the previous call is returned once. The same
    /// signal caught more than once in between may be returned only once.
    fn caught_signals(&mut self) -> Vec<Signal>;

    /// Waits for a signal with the given mask temporarily in place.
    ///
    /// This is a thin wrapper around the `sigsuspend` system call. The
    /// function returns `Ok(())` after a signal has been caught.
    fn sigsuspend(&mut self, mask: &SigSet) -> nix::Result<()>;

    /// Waits until the file descriptor is ready for reading.
    ///
    /// This is a wrapper around the `pselect` system call. The signal mask
    /// is replaced with `signal_mask` while waiting, so a signal that is
    /// blocked outside this function and unblocked by `signal_mask` is
    /// caught only while waiting. If such a signal has been caught, the
    /// function returns `Err(Errno::EINTR)` without waiting further.
    fn select(&mut self, reader: Fd, signal_mask: &SigSet) -> nix::Result<()>;

    /// Sends a signal.
    ///
    /// This is a thin wrapper around the `kill` system call. A negative
    /// `target` designates a process group. If `signal` is `None`, only
    /// permission and existence are checked.
    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> nix::Result<()>;

    /// Modifies the process group ID of a process.
    ///
    /// This is a thin wrapper around the `setpgid` system call. A zero `pid`
    /// means the current process and a zero `pgid` means `pid`.
    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()>;

    /// Creates a new child process.
    ///
    /// This is a wrapper around the `fork` system call. Users of [`Env`]
    /// should not call it directly. Instead, use
    /// `tsh_semantics::launch::spawn` so that the child is properly placed in
    /// its own process group and registered as a job.
    ///
    /// If successful, this function returns a [`ChildProcessStarter`]
    /// function. The caller must call the starter exactly once with a task
    /// the child process performs. In the parent, the starter returns the
    /// process ID of the child without running the task. In the child, the
    /// starter runs the task and then exits with the exit status the task
    /// returned, never returning to the caller.
    fn new_child_process(&mut self) -> nix::Result<ChildProcessStarter>;

    /// Reports updated status of a child process.
    ///
    /// This is a thin wrapper around the `waitpid` system call with the
    /// `WNOHANG` and `WUNTRACED` flags. A `target` of -1 means any child.
    /// This function returns [`WaitStatus::StillAlive`] if the target has
    /// no status to report, and `Err(Errno::ECHILD)` if there is no child
    /// to wait for.
    fn wait(&mut self, target: Pid) -> nix::Result<WaitStatus>;

    /// Replaces the current process with an external utility.
    ///
    /// This is a thin wrapper around the `execvp` system call. The program
    /// is searched for in `$PATH` when `file` contains no slash.
    fn execvp(&mut self, file: &CStr, args: &[CString]) -> nix::Result<Infallible>;
}

/// How to handle a signal.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignalHandling {
    /// Perform the default action for the signal.
    #[default]
    Default,
    /// Ignore the signal.
    Ignore,
    /// Catch the signal.
    Catch,
}

/// Task executed in a child process
pub type ChildProcessTask = Box<dyn FnOnce(&mut Env) -> ExitStatus>;

/// Abstract function that starts a child process
///
/// [`System::new_child_process`] returns a child process starter. You need
/// to pass the parent environment and a task to run in the child.
pub type ChildProcessStarter = Box<dyn FnOnce(&mut Env, ChildProcessTask) -> Pid>;
