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

//! Implementation of `System` that actually interacts with the system.

use super::{
    ChildProcessStarter, ChildProcessTask, Errno, SigSet, SigmaskHow, Signal, SignalHandling,
    System, WaitStatus,
};
use crate::Env;
use crate::io::Fd;
use crate::job::Pid;
use nix::sys::select::FdSet;
use nix::sys::signal::{SaFlags, SigAction, SigHandler};
use nix::sys::wait::WaitPidFlag;
use std::convert::Infallible;
use std::ffi::{CStr, CString, c_int};
use std::os::fd::BorrowedFd;
use std::sync::atomic::{AtomicIsize, Ordering, compiler_fence};

static CAUGHT_SIGNALS: [AtomicIsize; 8] = {
    // In the array creation, the repeat operand must be const.
    #[allow(clippy::declare_interior_mutable_const)]
    const SIGNAL_SLOT: AtomicIsize = AtomicIsize::new(0);
    [SIGNAL_SLOT; 8]
};

/// Signal catching function.
///
/// This function records the signal in `CAUGHT_SIGNALS`, which
/// [`RealSystem::caught_signals`] drains later.
extern "C" fn catch_signal(signal: c_int) {
    // This function can only perform async-signal-safe operations.
    // Performing unsafe operations is undefined behavior!

    // Find an unused slot (having a value of 0) in CAUGHT_SIGNALS and write the
    // signal number into it.
    // If there is a slot having a value of the signal already, do nothing.
    // If there is no available slot, the signal will be lost!
    let signal = signal as isize;
    for slot in &CAUGHT_SIGNALS {
        match slot.compare_exchange(0, signal, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => break,
            Err(slot_value) if slot_value == signal => break,
            _ => continue,
        }
    }
}

/// Implementation of `System` that actually interacts with the system.
///
/// `RealSystem` is an empty `struct` because the underlying operating system
/// manages the system's internal state.
#[derive(Debug)]
pub struct RealSystem(());

impl RealSystem {
    /// Returns an instance of `RealSystem`.
    ///
    /// # Safety
    ///
    /// This function is marked `unsafe` because improper use of `RealSystem`
    /// may lead to undefined behavior. Remember that most operations performed
    /// on the system by [`Env`] are not thread-safe. You should never use
    /// `RealSystem` in a multi-threaded program, and it is your responsibility
    /// to make sure you are using only one instance of `RealSystem` in the
    /// process.
    pub unsafe fn new() -> Self {
        RealSystem(())
    }
}

impl System for RealSystem {
    fn read(&mut self, fd: Fd, buffer: &mut [u8]) -> nix::Result<usize> {
        let result = unsafe { libc::read(fd.0, buffer.as_mut_ptr().cast(), buffer.len()) };
        Errno::result(result).map(|count| count as usize)
    }

    fn write(&mut self, fd: Fd, buffer: &[u8]) -> nix::Result<usize> {
        loop {
            let result = unsafe { libc::write(fd.0, buffer.as_ptr().cast(), buffer.len()) };
            let result = Errno::result(result).map(|count| count as usize);
            if result != Err(Errno::EINTR) {
                return result;
            }
        }
    }

    fn sigmask(
        &mut self,
        how: SigmaskHow,
        set: Option<&SigSet>,
        oldset: Option<&mut SigSet>,
    ) -> nix::Result<()> {
        nix::sys::signal::sigprocmask(how, set, oldset)
    }

    fn sigaction(
        &mut self,
        signal: Signal,
        handling: SignalHandling,
    ) -> nix::Result<SignalHandling> {
        let handler = match handling {
            SignalHandling::Default => SigHandler::SigDfl,
            SignalHandling::Ignore => SigHandler::SigIgn,
            SignalHandling::Catch => SigHandler::Handler(catch_signal),
        };
        // No SA_RESTART, so `select` and `read` fail with EINTR when a signal
        // is caught.
        let new_action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
        // SAFETY: The `catch_signal` function only accesses atomic variables.
        let old_action = unsafe { nix::sys::signal::sigaction(signal, &new_action) }?;
        let old_handling = match old_action.handler() {
            SigHandler::SigDfl => SignalHandling::Default,
            SigHandler::SigIgn => SignalHandling::Ignore,
            SigHandler::Handler(_) | SigHandler::SigAction(_) => SignalHandling::Catch,
        };
        Ok(old_handling)
    }

    fn caught_signals(&mut self) -> Vec<Signal> {
        let mut signals = Vec::new();
        for slot in &CAUGHT_SIGNALS {
            // Need a fence to ensure we examine the slots in order.
            compiler_fence(Ordering::Acquire);

            let signal = slot.swap(0, Ordering::Relaxed);
            if signal == 0 {
                // The `catch_signal` function always fills the first unused
                // slot, so there is no more slot filled with a signal.
                break;
            }

            if let Ok(signal) = Signal::try_from(signal as c_int) {
                signals.push(signal)
            } else {
                // ignore unknown signal
            }
        }
        signals
    }

    fn sigsuspend(&mut self, mask: &SigSet) -> nix::Result<()> {
        match mask.suspend() {
            Ok(()) | Err(Errno::EINTR) => Ok(()),
            Err(errno) => Err(errno),
        }
    }

    fn select(&mut self, reader: Fd, signal_mask: &SigSet) -> nix::Result<()> {
        if reader.0 < 0 {
            return Err(Errno::EBADF);
        }
        // SAFETY: The descriptor is only used during this call.
        let reader = unsafe { BorrowedFd::borrow_raw(reader.0) };
        let mut readers = FdSet::new();
        readers.insert(reader);
        nix::sys::select::pselect(None, &mut readers, None, None, None, signal_mask)?;
        Ok(())
    }

    fn kill(&mut self, target: Pid, signal: Option<Signal>) -> nix::Result<()> {
        nix::sys::signal::kill(target, signal)
    }

    fn setpgid(&mut self, pid: Pid, pgid: Pid) -> nix::Result<()> {
        nix::unistd::setpgid(pid, pgid)
    }

    fn new_child_process(&mut self) -> nix::Result<ChildProcessStarter> {
        use nix::unistd::ForkResult::*;
        // SAFETY: As stated on RealSystem::new, the caller is responsible for
        // making only one instance of RealSystem in the process.
        match unsafe { nix::unistd::fork()? } {
            Parent { child } => Ok(Box::new(
                move |_env: &mut Env, _task: ChildProcessTask| child,
            )),
            Child => Ok(Box::new(|env: &mut Env, task: ChildProcessTask| -> Pid {
                let exit_status = task(env);
                // _exit skips atexit handlers and buffers shared with the parent.
                unsafe { libc::_exit(exit_status.0) }
            })),
        }
    }

    fn wait(&mut self, target: Pid) -> nix::Result<WaitStatus> {
        let options = WaitPidFlag::WUNTRACED | WaitPidFlag::WNOHANG;
        nix::sys::wait::waitpid(target, Some(options))
    }

    fn execvp(&mut self, file: &CStr, args: &[CString]) -> nix::Result<Infallible> {
        loop {
            let result = nix::unistd::execvp(file, args);
            if result != Err(Errno::EINTR) {
                return result;
            }
        }
    }
}
