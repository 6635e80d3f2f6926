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

//! Type definitions for built-in utilities.
//!
//! This module provides data types for defining built-in utilities.
//!
//! Note that concrete implementations of built-ins are not included in the
//! `tsh_env` crate. For implementations of specific built-ins like `jobs` and
//! `fg`, see the `tsh_builtin` crate.

use crate::Env;

/// Result of built-in utility execution.
///
/// A `Break` asks the read-eval loop to stop, e.g. when `quit` succeeds.
pub type Result = crate::semantics::Result;

/// Type of functions that implement the behavior of a built-in.
///
/// The second argument is the list of operands, excluding the name of the
/// built-in.
pub type Main = fn(&mut Env, Vec<String>) -> Result;

/// Built-in utility definition.
#[derive(Clone, Copy, Debug)]
pub struct Builtin {
    /// Function that implements the behavior of the built-in.
    pub execute: Main,
}

impl Builtin {
    /// Creates a new built-in utility definition.
    #[must_use]
    pub const fn new(execute: Main) -> Self {
        Self { execute }
    }
}
