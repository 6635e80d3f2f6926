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

//! Splitting a command line into fields

use std::ffi::{OsStr, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};

/// Result of parsing a command line
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq)]
pub struct CommandLine {
    /// Command name and arguments
    pub fields: Vec<OsString>,

    /// Whether the command line ended with a `&` field
    pub background: bool,
}

/// Parses a command line.
///
/// Fields are separated by whitespace. A field starting with a single quote
/// extends to the next single quote, which may be after whitespace; the
/// quotes are not part of the field. An unterminated quote extends to the
/// end of the line. Bytes other than whitespace and quotes are kept as they
/// are, so fields need not be valid UTF-8.
///
/// If the last field is `&` and is preceded by another field, it is removed
/// and the command line is marked as a background job. A `&` alone is a
/// normal field.
#[must_use]
pub fn parse<L: AsRef<OsStr> + ?Sized>(line: &L) -> CommandLine {
    let mut fields = Vec::new();
    let mut rest = line.as_ref().as_bytes();
    loop {
        rest = rest.trim_ascii_start();
        if rest.is_empty() {
            break;
        }
        let (field, remainder) = if let Some(quoted) = rest.strip_prefix(b"'") {
            match quoted.iter().position(|&byte| byte == b'\'') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => (quoted.strip_suffix(b"\n").unwrap_or(quoted), &[][..]),
            }
        } else {
            let end = rest
                .iter()
                .position(u8::is_ascii_whitespace)
                .unwrap_or(rest.len());
            rest.split_at(end)
        };
        fields.push(OsString::from_vec(field.to_vec()));
        rest = remainder;
    }

    let background = fields.len() > 1 && fields.last().is_some_and(|field| field == "&");
    if background {
        fields.pop();
    }
    CommandLine { fields, background }
}
