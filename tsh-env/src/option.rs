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

//! Type definitions for shell options.

/// Shell options that can be set on the command line
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Options {
    /// Whether the read-eval loop prints a prompt before reading each line.
    ///
    /// The prompt is suppressed with the `-p` flag so that scripted tests see
    /// only the output of the commands.
    pub prompt: bool,

    /// Whether additional diagnostics are printed.
    ///
    /// The logger is set up from this option after the options are parsed.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            prompt: true,
            verbose: false,
        }
    }
}

/// Prompt printed before reading each command line
pub const PROMPT: &str = "tsh> ";
