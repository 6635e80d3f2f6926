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

//! Implementation of the shell built-in utilities.
//!
//! Each built-in utility is implemented in the submodule named after the
//! utility. The submodule contains the `main` function that implements the
//! built-in utility. The module documentation for each submodule describes
//! the behavior of the built-in utility.
//!
//! Built-ins are called with the fields following the command name. A
//! trailing `&` has already been removed from them. Errors in using a
//! built-in are reported in a single line and never end the shell.

pub mod ampersand;
pub mod bg;
pub mod fg;
pub mod jobs;
pub mod quit;

use tsh_env::builtin::Builtin;

/// Array of all the implemented built-in utilities.
///
/// The array items are ordered alphabetically.
pub const BUILTINS: &[(&str, Builtin)] = &[
    ("&", Builtin::new(ampersand::main)),
    ("bg", Builtin::new(bg::main)),
    ("fg", Builtin::new(fg::main)),
    ("jobs", Builtin::new(jobs::main)),
    ("quit", Builtin::new(quit::main)),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_sorted() {
        BUILTINS
            .windows(2)
            .for_each(|pair| assert!(pair[0].0 < pair[1].0, "disordered pair: {pair:?}"))
    }
}
