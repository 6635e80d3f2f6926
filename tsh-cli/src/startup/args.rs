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

//! Command-line argument parser for the shell
//!
//! The shell accepts the following flags, which can be combined as in `-vp`:
//!
//! - `-h`: print the usage and exit with status 1.
//! - `-v`: print additional diagnostics.
//! - `-p`: do not print the prompt.
//!
//! Any other argument is an error, for which the usage is printed as well.

use clap::Parser;
use std::ffi::OsString;

/// Usage message printed for `-h` and for invalid arguments
pub const USAGE: &str = "\
Usage: shell [-hvp]
   -h   print this message
   -v   print additional diagnostic information
   -p   do not emit a command prompt
";

/// Parsed command-line flags
#[derive(Clone, Debug, Default, Eq, Parser, PartialEq)]
#[command(name = "tsh", disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// Print this message
    #[arg(short = 'h')]
    pub help: bool,

    /// Print additional diagnostic information
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Do not emit a command prompt
    #[arg(short = 'p')]
    pub no_prompt: bool,
}

/// Result of parsing the command-line arguments
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Parse {
    /// Print the usage.
    Help,
    /// Run the shell with the flags.
    Run(Args),
}

/// Parses the command-line arguments.
///
/// The first item of `args` is the program name.
pub fn parse<I, T>(args: I) -> Result<Parse, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let args = Args::try_parse_from(args)?;
    if args.help {
        Ok(Parse::Help)
    } else {
        Ok(Parse::Run(args))
    }
}
