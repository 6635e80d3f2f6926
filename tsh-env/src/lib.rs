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

//! This crate defines the shell execution environment of tsh.
//!
//! The environment, [`Env`], bundles the [job table](job::JobList), the
//! [built-in utilities](builtin) available to the evaluator, the shell
//! [options](option::Options), and the [`System`] through which the shell
//! talks to the operating system.
//!
//! The [`System`] trait is the interface to the underlying system.
//! [`RealSystem`] provides an implementation that actually forks, signals and
//! reaps processes. [`VirtualSystem`] is a dummy that simulates child
//! processes and signal delivery without affecting the actual system, which
//! is what the unit tests of the workspace run against.
//!
//! Asynchronous notifications from the operating system are not handled in
//! the signal handler itself. The handler only records the signal, and the
//! [relay](relay) applies its effect to the job table at well-defined points
//! on the main path.

pub mod builtin;
pub mod io;
pub mod job;
pub mod option;
pub mod relay;
pub mod semantics;
pub mod system;

use self::builtin::Builtin;
use self::io::Fd;
use self::job::JobList;
use self::option::Options;
#[doc(no_inline)]
pub use self::system::System;
#[doc(no_inline)]
pub use self::system::real::RealSystem;
#[doc(no_inline)]
pub use self::system::r#virtual::VirtualSystem;
use std::collections::HashMap;

/// Whole shell execution environment.
#[derive(Debug)]
pub struct Env {
    /// Built-in utilities available in the environment.
    pub builtins: HashMap<&'static str, Builtin>,

    /// Jobs managed in the environment.
    pub jobs: JobList,

    /// Shell options.
    pub options: Options,

    /// Interface to the system-managed parts of the environment.
    pub system: Box<dyn System>,
}

impl Env {
    /// Creates a new environment with the given system.
    ///
    /// Members of the new environment other than `system` are default-initialized.
    #[must_use]
    pub fn with_system(system: Box<dyn System>) -> Env {
        Env {
            builtins: HashMap::new(),
            jobs: JobList::default(),
            options: Options::default(),
            system,
        }
    }

    /// Creates a new environment with a default-initialized [`VirtualSystem`].
    #[must_use]
    pub fn new_virtual() -> Env {
        Env::with_system(Box::new(VirtualSystem::new()))
    }

    /// Convenience function that prints the given text to the standard output.
    ///
    /// Errors are ignored. Messages about job state changes and most user
    /// errors go to the standard output so that a driver that reads only one
    /// pipe sees all of them.
    pub fn print(&mut self, text: &str) {
        self.system.write_all(Fd::STDOUT, text.as_bytes()).ok();
    }

    /// Convenience function that prints the given message to the standard
    /// error, ignoring any errors.
    pub fn print_error(&mut self, message: &str) {
        self.system.write_all(Fd::STDERR, message.as_bytes()).ok();
    }
}
