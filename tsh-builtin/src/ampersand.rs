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

//! Ampersand built-in
//!
//! A command line consisting of a lone `&` does nothing.

use std::ops::ControlFlow::Continue;
use tsh_env::Env;
use tsh_env::builtin::Result;

/// Entry point for executing the `&` built-in
pub fn main(_env: &mut Env, _args: Vec<String>) -> Result {
    Continue(())
}
