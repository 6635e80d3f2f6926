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

//! Type definitions for job management.
//!
//! A job is a child process the shell has started and keeps track of. Every
//! job is placed in its own process group whose ID equals the process ID of
//! the job, so signals meant for the job can be sent to the whole group.
//!
//! The [`JobList`] is a fixed-capacity table of jobs. A job is added when the
//! shell starts a child process and removed when the [relay](crate::relay)
//! finds that the process has exited or has been killed. The table enforces
//! that at most one job is in the [`Foreground`](JobState::Foreground) state.
//!
//! Each job has a process ID and a job ID. The job ID is a small positive
//! integer issued by the table: IDs increase while jobs are added and are
//! recycled only after the job with the greatest ID has been removed.

pub mod fmt;
pub mod id;

#[doc(no_inline)]
pub use nix::unistd::Pid;
use strum::Display;
use thiserror::Error;

/// Number of job slots in a default [`JobList`]
pub const MAX_JOBS: usize = 16;

/// Control state of a job
///
/// A vacant slot in the [`JobList`] corresponds to the "undefined" state, so
/// there is no variant for it.
///
/// The `Display` implementation produces the label printed by the `jobs`
/// built-in.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum JobState {
    /// The shell is waiting for the job to finish or stop.
    Foreground,
    /// The job runs without the shell waiting for it.
    #[strum(to_string = "Running")]
    Background,
    /// The job has been stopped by a signal.
    Stopped,
}

/// Set of information about a job
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Job {
    /// Process ID
    ///
    /// The process is also the leader of the process group of the job.
    pub pid: Pid,

    /// Job ID
    pub jid: usize,

    /// Current state of the job
    pub state: JobState,

    /// Command line the job was started with, including the trailing newline
    pub command_line: String,
}

/// Error that may occur in [`JobList::add`]
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum AddError {
    /// All the slots are occupied.
    #[error("tried to create too many jobs")]
    Full,
    /// The process is already registered as a job.
    #[error("process {0} is already a job")]
    DuplicatePid(Pid),
    /// Another job is already in the foreground.
    #[error("process {0} is already in the foreground")]
    ForegroundTaken(Pid),
}

/// Error that may occur in [`JobList::set_state`]
#[derive(Clone, Copy, Debug, Eq, Error, Hash, PartialEq)]
pub enum SetStateError {
    /// No job has the process ID.
    #[error("process {0} is not a job")]
    NoSuchJob(Pid),
    /// Another job is already in the foreground.
    #[error("process {0} is already in the foreground")]
    ForegroundTaken(Pid),
}

/// Fixed-capacity collection of jobs
///
/// Jobs are kept in slots. A new job takes the first vacant slot, and
/// [`iter`](Self::iter) yields jobs in slot order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JobList {
    slots: Vec<Option<Job>>,
    next_jid: usize,
}

impl Default for JobList {
    fn default() -> Self {
        JobList::with_capacity(MAX_JOBS)
    }
}

impl JobList {
    /// Creates an empty job list with the given number of slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        JobList {
            slots: vec![None; capacity],
            next_jid: 1,
        }
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of jobs in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Returns true if there is no job in the list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns true if all the slots are occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Adds a job to the list.
    ///
    /// The job takes the first vacant slot and is assigned the next job ID,
    /// which is returned. On error, the list is not modified.
    pub fn add<S: Into<String>>(
        &mut self,
        pid: Pid,
        state: JobState,
        command_line: S,
    ) -> Result<usize, AddError> {
        if self.find_by_pid(pid).is_some() {
            return Err(AddError::DuplicatePid(pid));
        }
        if state == JobState::Foreground {
            if let Some(foreground) = self.foreground_pid() {
                return Err(AddError::ForegroundTaken(foreground));
            }
        }
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(AddError::Full)?;

        let jid = self.next_jid;
        self.next_jid += 1;
        let command_line = command_line.into();
        tracing::debug!(jid, pid = pid.as_raw(), %state, command_line = command_line.trim_end(), "added job");
        *slot = Some(Job {
            pid,
            jid,
            state,
            command_line,
        });
        Ok(jid)
    }

    /// Removes the job with the given process ID.
    ///
    /// Returns the removed job, or `None` if no job has the process ID.
    /// After the removal, the next job ID is one greater than the largest job
    /// ID remaining in the list.
    pub fn remove(&mut self, pid: Pid) -> Option<Job> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|job| job.pid == pid))?;
        let job = slot.take();
        self.next_jid = self.iter().map(|job| job.jid).max().unwrap_or(0) + 1;
        if let Some(job) = &job {
            tracing::debug!(jid = job.jid, pid = pid.as_raw(), "removed job");
        }
        job
    }

    /// Returns the job with the given process ID.
    #[must_use]
    pub fn find_by_pid(&self, pid: Pid) -> Option<&Job> {
        self.iter().find(|job| job.pid == pid)
    }

    /// Returns the job with the given process ID.
    pub fn find_by_pid_mut(&mut self, pid: Pid) -> Option<&mut Job> {
        self.iter_mut().find(|job| job.pid == pid)
    }

    /// Returns the job with the given job ID.
    #[must_use]
    pub fn find_by_jid(&self, jid: usize) -> Option<&Job> {
        self.iter().find(|job| job.jid == jid)
    }

    /// Returns the process ID of the foreground job, if any.
    ///
    /// `None` means that the shell itself is in control.
    #[must_use]
    pub fn foreground_pid(&self) -> Option<Pid> {
        self.iter()
            .find(|job| job.state == JobState::Foreground)
            .map(|job| job.pid)
    }

    /// Returns true if any job is stopped.
    #[must_use]
    pub fn has_stopped_jobs(&self) -> bool {
        self.iter().any(|job| job.state == JobState::Stopped)
    }

    /// Changes the state of the job with the given process ID.
    ///
    /// Making a job `Foreground` fails if another job is in the foreground.
    pub fn set_state(&mut self, pid: Pid, state: JobState) -> Result<(), SetStateError> {
        if state == JobState::Foreground {
            if let Some(foreground) = self.foreground_pid() {
                if foreground != pid {
                    return Err(SetStateError::ForegroundTaken(foreground));
                }
            }
        }
        let job = self
            .find_by_pid_mut(pid)
            .ok_or(SetStateError::NoSuchJob(pid))?;
        job.state = state;
        Ok(())
    }

    /// Returns an iterator over the jobs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.slots.iter().flatten()
    }

    /// Returns an iterator over the jobs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Job> {
        self.slots.iter_mut().flatten()
    }
}
