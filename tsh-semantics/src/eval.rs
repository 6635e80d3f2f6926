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

//! Evaluating a command line

use crate::command_line;
use crate::launch::spawn;
use std::ffi::OsStr;
use std::ops::ControlFlow::Continue;
use tsh_env::Env;
use tsh_env::job::fmt::Report;
use tsh_env::semantics::Result;

/// Evaluates a command line.
///
/// The line is [parsed](command_line::parse) into fields. An empty line does
/// nothing. If the first field names a built-in in `env.builtins`, the
/// built-in is called with the remaining fields. Otherwise, the fields are
/// [spawned](spawn) as a new job. The shell waits for a foreground job until
/// it is no longer in the foreground, and prints a background job in the
/// form `[jid] (pid) command line`. The job list records the line with
/// invalid UTF-8 replaced, but the utility receives the original bytes.
///
/// Errors in starting a job are printed to the standard error and do not
/// affect the result. The result is `Break` only if a built-in or the relay
/// requested to exit the shell.
pub fn eval<L: AsRef<OsStr> + ?Sized>(env: &mut Env, line: &L) -> Result {
    let line = line.as_ref();
    let command_line = command_line::parse(line);
    let Some((name, args)) = command_line.fields.split_first() else {
        return Continue(());
    };

    if let Some(builtin) = name.to_str().and_then(|name| env.builtins.get(name)).copied() {
        tracing::debug!(?name, "running built-in");
        let args = args
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        return (builtin.execute)(env, args);
    }

    let text = line.to_string_lossy();
    match spawn(env, &command_line.fields, &text, command_line.background) {
        Ok(pid) if command_line.background => {
            if let Some(job) = env.jobs.find_by_pid(pid) {
                let report = Report { job }.to_string();
                env.print(&report);
            }
            Continue(())
        }
        Ok(pid) => env.wait_for_foreground(pid),
        Err(error) => {
            env.print_error(&format!("{error}\n"));
            Continue(())
        }
    }
}
