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

//! Job reference parsing
//!
//! The `bg` and `fg` built-ins name their target with a *job reference*:
//! `%` followed by a job ID, or a bare process ID.

use super::{Job, JobList, Pid};
use thiserror::Error;

/// Parsed job reference
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum JobRef {
    /// `%N`
    JobId(usize),
    /// `N`
    ProcessId(Pid),
}

/// Error indicating that a string is not a valid job reference
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
#[error("argument must be a PID or %jobid")]
pub struct ParseError;

/// Error indicating that a job reference matched no job
///
/// The `Display` implementation produces the message printed by the `bg` and
/// `fg` built-ins.
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum FindError {
    #[error("%{0}: No such job")]
    NoSuchJob(usize),
    #[error("({0}): No such process")]
    NoSuchProcess(Pid),
}

fn parse_digits(s: &str) -> Option<&str> {
    (!s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())).then_some(s)
}

/// Parses a job reference.
pub fn parse(s: &str) -> Result<JobRef, ParseError> {
    if let Some(jid) = s.strip_prefix('%') {
        let jid = parse_digits(jid).ok_or(ParseError)?;
        jid.parse().map(JobRef::JobId).map_err(|_| ParseError)
    } else {
        let pid = parse_digits(s).ok_or(ParseError)?;
        pid.parse()
            .map(|pid| JobRef::ProcessId(Pid::from_raw(pid)))
            .map_err(|_| ParseError)
    }
}

impl JobRef {
    /// Finds the job this reference points to.
    pub fn find<'a>(&self, jobs: &'a JobList) -> Result<&'a Job, FindError> {
        match *self {
            JobRef::JobId(jid) => jobs.find_by_jid(jid).ok_or(FindError::NoSuchJob(jid)),
            JobRef::ProcessId(pid) => jobs.find_by_pid(pid).ok_or(FindError::NoSuchProcess(pid)),
        }
    }
}
