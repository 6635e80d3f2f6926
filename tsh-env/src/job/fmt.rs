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

//! Formatting jobs for reports
//!
//! [`Report`] formats a job in the form printed after starting a background
//! job or resuming one with `bg`:
//!
//! ```text
//! [1] (12345) sleep 10 &
//! ```
//!
//! The alternate form (`{:#}`) adds the job state, as printed by the `jobs`
//! built-in:
//!
//! ```text
//! [1] (12345) Running sleep 10 &
//! ```
//!
//! The command line is printed as is, so it usually ends with a newline.

use super::Job;
use std::fmt::{Display, Formatter, Result};

/// Wrapper for printing a job
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Report<'a> {
    pub job: &'a Job,
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let job = self.job;
        write!(f, "[{}] ({}) ", job.jid, job.pid)?;
        if f.alternate() {
            write!(f, "{} ", job.state)?;
        }
        f.write_str(&job.command_line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{JobState, Pid};

    fn job(state: JobState) -> Job {
        Job {
            pid: Pid::from_raw(12345),
            jid: 2,
            state,
            command_line: "sleep 10 &\n".to_string(),
        }
    }

    #[test]
    fn launch_form() {
        let job = job(JobState::Background);
        assert_eq!(Report { job: &job }.to_string(), "[2] (12345) sleep 10 &\n");
    }

    #[test]
    fn listing_form() {
        let job = job(JobState::Background);
        assert_eq!(
            format!("{:#}", Report { job: &job }),
            "[2] (12345) Running sleep 10 &\n"
        );
        let job = self::job(JobState::Stopped);
        assert_eq!(
            format!("{:#}", Report { job: &job }),
            "[2] (12345) Stopped sleep 10 &\n"
        );
        let job = self::job(JobState::Foreground);
        assert_eq!(
            format!("{:#}", Report { job: &job }),
            "[2] (12345) Foreground sleep 10 &\n"
        );
    }
}
