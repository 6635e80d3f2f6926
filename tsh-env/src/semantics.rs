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

//! Type definitions for command execution.

use std::ffi::c_int;
use std::ops::ControlFlow;

/// Number that summarizes the result of command execution.
///
/// The shell itself only produces an exit status when it exits. A child
/// process that fails to start a program exits with [`ExitStatus::FAILURE`].
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ExitStatus(pub c_int);

impl ExitStatus {
    /// Exit status of 0: success
    pub const SUCCESS: ExitStatus = ExitStatus(0);

    /// Exit status of 1: failure
    pub const FAILURE: ExitStatus = ExitStatus(1);
}

/// Result of interrupted command execution.
///
/// `Divert` implements `Ord`. Values are ordered by severity.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Divert {
    /// Exit from the shell, e.g. by the `quit` built-in or at the end of input.
    Exit(ExitStatus),

    /// Exit from the shell because of an external request (`SIGQUIT`).
    Abort(ExitStatus),
}

impl Divert {
    /// Returns the exit status associated with the `Divert`.
    #[must_use]
    pub fn exit_status(&self) -> ExitStatus {
        match *self {
            Divert::Exit(exit_status) | Divert::Abort(exit_status) => exit_status,
        }
    }
}

/// Result of command execution.
///
/// If the command was interrupted in the middle of execution, the result value
/// will be a `Break` having a [`Divert`] value which specifies what to execute
/// next.
pub type Result<T = ()> = ControlFlow<Divert, T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divert_exit_status() {
        assert_eq!(Divert::Exit(ExitStatus(3)).exit_status(), ExitStatus(3));
        assert_eq!(
            Divert::Abort(ExitStatus::FAILURE).exit_status(),
            ExitStatus::FAILURE
        );
    }

    #[test]
    fn divert_order_by_severity() {
        assert!(Divert::Exit(ExitStatus(100)) < Divert::Abort(ExitStatus(0)));
    }
}
