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

//! Semantics of tsh command lines.
//!
//! This crate defines how the shell executes a command line read from the
//! user. A line is split into fields by [`command_line::parse`]. If the first
//! field names a built-in registered in the [`Env`](tsh_env::Env), the
//! built-in is executed in the shell process. Otherwise, the
//! [launcher](launch::spawn) starts an external utility as a new job, and the
//! shell either waits for it or reports it as a background job. See [`eval`].
//!
//! A [`ReadEvalLoop`] reads command lines from the standard input and
//! evaluates them one by one.

pub mod command_line;
pub mod launch;

#[doc(no_inline)]
pub use tsh_env::semantics::*;

mod eval;
pub use eval::eval;

mod runner;
pub use runner::{ReadEvalLoop, read_line};
