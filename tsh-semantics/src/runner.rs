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

//! Implementation of the read-eval loop

use crate::eval::eval;
use std::ffi::OsString;
use std::ops::ControlFlow::{Break, Continue};
use std::os::unix::ffi::OsStringExt;
use tsh_env::Env;
use tsh_env::io::Fd;
use tsh_env::option::PROMPT;
use tsh_env::relay::{relay_signal_set, without_relay_signals};
use tsh_env::semantics::{Divert, ExitStatus, Result};
use tsh_env::system::{Errno, SigSet, SigmaskHow};

fn input_error<T>(env: &mut Env, operation: &str, errno: Errno) -> Result<T> {
    env.print_error(&format!("{operation} error: {}\n", errno.desc()));
    Break(Divert::Exit(ExitStatus::FAILURE))
}

/// Reads a line from the standard input.
///
/// The line is read one byte at a time so that no input after the newline is
/// consumed. The returned line includes the trailing newline unless the input
/// ended without one. `None` means the end of input. The bytes are returned
/// as they are, whether or not they are valid UTF-8.
///
/// Before each byte, this function [waits](tsh_env::System::select) for the
/// input with the [relayed signals](tsh_env::relay::RELAY_SIGNALS)
/// unblocked. If the relayed signals are blocked when this function is
/// called, they are caught only during the wait, so a signal arriving just
/// before the wait is not left unhandled while the shell sleeps. Caught
/// signals are [handled](Env::handle_caught_signals) before reading is
/// resumed.
///
/// The result is `Break` if handling the signals resulted in `Break` or if
/// the standard input could not be read.
pub fn read_line(env: &mut Env) -> Result<Option<OsString>> {
    let mut current_mask = SigSet::empty();
    if let Err(errno) = env
        .system
        .sigmask(SigmaskHow::SIG_BLOCK, None, Some(&mut current_mask))
    {
        return input_error(env, "sigprocmask", errno);
    }
    let wait_mask = without_relay_signals(&current_mask);

    let mut line = Vec::new();
    let mut byte = [0];
    loop {
        match env.system.select(Fd::STDIN, &wait_mask) {
            Ok(()) => (),
            Err(Errno::EINTR) => {
                env.handle_caught_signals()?;
                continue;
            }
            Err(errno) => return input_error(env, "select", errno),
        }

        match env.system.read(Fd::STDIN, &mut byte) {
            Ok(0) => break,
            Ok(_) => {
                line.push(byte[0]);
                if byte[0] == b'\n' {
                    break;
                }
            }
            Err(Errno::EINTR) => env.handle_caught_signals()?,
            Err(errno) => return input_error(env, "read", errno),
        }
    }

    if line.is_empty() {
        Continue(None)
    } else {
        Continue(Some(OsString::from_vec(line)))
    }
}

/// Read-eval loop
///
/// The loop prints the [prompt](PROMPT) if
/// [enabled](tsh_env::option::Options::prompt), reads a command line from the
/// standard input, and [evaluates](eval) it, until the end of input or until
/// the evaluation results in `Break`. Caught signals are handled before the
/// prompt and before each evaluation.
///
/// While the loop runs, the [relayed signals](tsh_env::relay::RELAY_SIGNALS)
/// are blocked. They are delivered only while the shell waits for input or
/// for a foreground job. The previous signal mask is restored when the loop
/// ends.
///
/// # Example
///
/// ```
/// # use tsh_env::Env;
/// # use tsh_env::semantics::{Divert, ExitStatus};
/// # use tsh_semantics::ReadEvalLoop;
/// let mut env = Env::new_virtual();
/// env.options.prompt = false;
/// let divert = ReadEvalLoop::new(&mut env).run();
/// assert_eq!(divert, Divert::Exit(ExitStatus::SUCCESS));
/// ```
#[derive(Debug)]
pub struct ReadEvalLoop<'a> {
    env: &'a mut Env,
}

impl<'a> ReadEvalLoop<'a> {
    /// Creates a new read-eval loop instance.
    #[must_use]
    pub fn new(env: &'a mut Env) -> Self {
        Self { env }
    }

    /// Runs the read-eval loop.
    ///
    /// Returns the `Divert` that ended the loop. The end of input results in
    /// `Divert::Exit(ExitStatus::SUCCESS)`.
    pub fn run(mut self) -> Divert {
        let relay_signals = relay_signal_set();
        let mut old_mask = SigSet::empty();
        let blocking = self.env.system.sigmask(
            SigmaskHow::SIG_BLOCK,
            Some(&relay_signals),
            Some(&mut old_mask),
        );
        if let Err(errno) = blocking {
            self.env
                .print_error(&format!("sigprocmask error: {}\n", errno.desc()));
            return Divert::Exit(ExitStatus::FAILURE);
        }

        let divert = loop {
            if let Break(divert) = self.step() {
                break divert;
            }
        };
        tracing::debug!(?divert, "leaving read-eval loop");

        self.env
            .system
            .sigmask(SigmaskHow::SIG_SETMASK, Some(&old_mask), None)
            .ok();
        divert
    }

    fn step(&mut self) -> Result {
        let env = &mut *self.env;
        env.handle_caught_signals()?;
        if env.options.prompt {
            env.print(PROMPT);
        }
        let Some(line) = read_line(env)? else {
            return Break(Divert::Exit(ExitStatus::SUCCESS));
        };
        env.handle_caught_signals()?;
        eval(env, &line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tsh_env::builtin::Builtin;
    use tsh_env::job::{JobState, Pid};
    use tsh_env::relay::RELAY_SIGNALS;
    use tsh_env::system::Signal;
    use tsh_env::system::r#virtual::ProcessState;
    use tsh_env_test_helper::{add_job, assert_stdout, virtual_env};

    fn echo_builtin(env: &mut Env, args: Vec<String>) -> Result {
        env.print(&format!("{}\n", args.join(" ")));
        Continue(())
    }

    fn mask_builtin(env: &mut Env, _args: Vec<String>) -> Result {
        let mut mask = SigSet::empty();
        env.system
            .sigmask(SigmaskHow::SIG_BLOCK, None, Some(&mut mask))
            .unwrap();
        let all_blocked = RELAY_SIGNALS.iter().all(|&signal| mask.contains(signal));
        env.print(if all_blocked { "blocked\n" } else { "unblocked\n" });
        Continue(())
    }

    fn quit_builtin(_env: &mut Env, _args: Vec<String>) -> Result {
        Break(Divert::Exit(ExitStatus::SUCCESS))
    }

    #[test]
    fn read_line_splits_at_newline() {
        let (mut env, state) = virtual_env();
        state.borrow_mut().stdin.extend(b"first\nsecond");

        assert_eq!(read_line(&mut env), Continue(Some(OsString::from("first\n"))));
        assert_eq!(read_line(&mut env), Continue(Some(OsString::from("second"))));
        assert_eq!(read_line(&mut env), Continue(None));
    }

    #[test]
    fn read_line_keeps_non_utf8_bytes() {
        let (mut env, state) = virtual_env();
        state.borrow_mut().stdin.extend(b"echo \xFF\n");

        let line = read_line(&mut env);

        let line = assert_matches!(line, Continue(Some(line)) => line);
        assert_eq!(line.into_vec(), b"echo \xFF\n");
    }

    #[test]
    fn signal_pending_before_read_is_handled_without_input() {
        let (mut env, state) = virtual_env();
        state.borrow_mut().blocked_signals = relay_signal_set();
        state.borrow_mut().raise(Signal::SIGQUIT);
        state.borrow_mut().stdin.extend(b"sleep 1\n");

        let result = read_line(&mut env);

        assert_eq!(result, Break(Divert::Abort(ExitStatus::FAILURE)));
        assert_eq!(state.borrow().stdin, b"sleep 1\n");
        assert_eq!(state.borrow().blocked_signals, relay_signal_set());
        assert_stdout(&state, |stdout| {
            assert_eq!(stdout, "Terminating after receipt of SIGQUIT signal\n")
        });
    }

    #[test]
    fn job_terminated_while_waiting_for_input_is_reported() {
        let (mut env, state) = virtual_env();
        let pid = add_job(&mut env, &state, JobState::Background, "sleep 1 &\n");
        state.borrow_mut().blocked_signals = relay_signal_set();
        state
            .borrow_mut()
            .set_process_state(pid, ProcessState::Signaled(Signal::SIGTERM));
        assert_eq!(state.borrow().pending_signals, [Signal::SIGCHLD]);

        let result = read_line(&mut env);

        assert_eq!(result, Continue(None));
        assert!(env.jobs.is_empty());
        assert_stdout(&state, |stdout| {
            assert_eq!(stdout, format!("Job [1] ({pid}) terminated by signal 15\n"))
        });
    }

    #[test]
    fn relay_signals_are_blocked_only_while_loop_runs() {
        let (mut env, state) = virtual_env();
        env.options.prompt = false;
        env.builtins.insert("mask", Builtin::new(mask_builtin));
        state.borrow_mut().stdin.extend(b"mask\n");

        let divert = ReadEvalLoop::new(&mut env).run();

        assert_eq!(divert, Divert::Exit(ExitStatus::SUCCESS));
        assert_eq!(state.borrow().blocked_signals, SigSet::empty());
        assert_stdout(&state, |stdout| assert_eq!(stdout, "blocked\n"));
    }

    #[test]
    fn end_of_input_exits_successfully_after_prompt() {
        let (mut env, state) = virtual_env();

        let divert = ReadEvalLoop::new(&mut env).run();

        assert_eq!(divert, Divert::Exit(ExitStatus::SUCCESS));
        assert_stdout(&state, |stdout| assert_eq!(stdout, "tsh> "));
    }

    #[test]
    fn lines_are_evaluated_in_order() {
        let (mut env, state) = virtual_env();
        env.options.prompt = false;
        env.builtins.insert("echo", Builtin::new(echo_builtin));
        state.borrow_mut().stdin.extend(b"echo 1\n\necho 2\necho 3");

        let divert = ReadEvalLoop::new(&mut env).run();

        assert_eq!(divert, Divert::Exit(ExitStatus::SUCCESS));
        assert_stdout(&state, |stdout| assert_eq!(stdout, "1\n2\n3\n"));
    }

    #[test]
    fn prompt_is_printed_before_each_line() {
        let (mut env, state) = virtual_env();
        env.builtins.insert("echo", Builtin::new(echo_builtin));
        state.borrow_mut().stdin.extend(b"echo a\necho b\n");

        ReadEvalLoop::new(&mut env).run();

        assert_stdout(&state, |stdout| assert_eq!(stdout, "tsh> a\ntsh> b\ntsh> "));
    }

    #[test]
    fn builtin_break_ends_loop_without_reading_more() {
        let (mut env, state) = virtual_env();
        env.options.prompt = false;
        env.builtins.insert("quit", Builtin::new(quit_builtin));
        state.borrow_mut().stdin.extend(b"quit\nleftover\n");

        let divert = ReadEvalLoop::new(&mut env).run();

        assert_eq!(divert, Divert::Exit(ExitStatus::SUCCESS));
        assert_eq!(state.borrow().stdin, b"leftover\n");
    }

    #[test]
    fn background_job_termination_is_reported_before_next_prompt() {
        let (mut env, state) = virtual_env();
        let pid = add_job(&mut env, &state, JobState::Background, "sleep 1 &\n");
        state
            .borrow_mut()
            .processes
            .get_mut(&pid)
            .unwrap()
            .receive_signal(Signal::SIGTERM);
        state.borrow_mut().raise(Signal::SIGCHLD);

        ReadEvalLoop::new(&mut env).run();

        assert!(env.jobs.is_empty());
        assert_stdout(&state, |stdout| {
            assert_eq!(stdout, format!("Job [1] ({pid}) terminated by signal 15\ntsh> "))
        });
    }

    #[test]
    fn quit_signal_aborts_loop() {
        let (mut env, state) = virtual_env();
        env.options.prompt = false;
        state.borrow_mut().raise(Signal::SIGQUIT);
        state.borrow_mut().stdin.extend(b"sleep 1\n");

        let divert = ReadEvalLoop::new(&mut env).run();

        assert_eq!(divert, Divert::Abort(ExitStatus::FAILURE));
        assert_eq!(env.jobs.find_by_pid(Pid::from_raw(3)), None);
        assert_stdout(&state, |stdout| {
            assert_eq!(stdout, "Terminating after receipt of SIGQUIT signal\n")
        });
    }
}
