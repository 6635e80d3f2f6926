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

//! Scripted tests run the built shell with the `-p` flag, feed a script to
//! its standard input, and examine what it prints.

use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use std::io::{BufRead as _, BufReader, Read as _, Write as _};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

const BIN: &str = env!("CARGO_BIN_EXE_tsh");

/// Runs the shell with the given flags and script.
///
/// The standard input is closed after the script is written, so the shell
/// exits at the end of the script unless the script makes it exit earlier.
fn run_with_flags(flags: &[&str], script: &str) -> Output {
    let mut child = Command::new(BIN)
        .args(flags)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn run(script: &str) -> Output {
    run_with_flags(&["-p"], script)
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

/// Extracts the process ID from a line starting with `[jid] (pid)` or
/// `Job [jid] (pid)`.
fn pid_in(line: &str) -> &str {
    let start = line.find('(').unwrap() + 1;
    let end = line.find(')').unwrap();
    &line[start..end]
}

#[test]
fn help_flag_prints_usage() {
    let output = run_with_flags(&["-h"], "");
    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout(&output);
    assert!(stdout.starts_with("Usage: shell [-hvp]\n"), "{stdout:?}");
}

#[test]
fn unknown_flag_prints_usage() {
    let output = run_with_flags(&["-x"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).starts_with("Usage: shell [-hvp]\n"));
}

#[test]
fn prompt_is_printed_without_p_flag() {
    let output = run_with_flags(&[], "/bin/echo hi\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "tsh> hi\ntsh> ");
}

#[test]
fn end_of_input_exits_successfully() {
    let output = run("");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
}

#[test]
fn quit_exits_without_reading_further() {
    let output = run("quit\n/bin/echo unreachable\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "");
}

#[test]
fn foreground_job_runs_to_completion_before_next_line() {
    let output = run("/bin/echo 'hello  world'\n/bin/echo second\njobs\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "hello  world\nsecond\n");
}

#[test]
fn foreground_sleep_blocks_the_shell() {
    let start = Instant::now();
    let output = run("sleep 1\n/bin/echo after\n");
    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(stdout(&output), "after\n");
}

#[test]
fn command_not_found() {
    let output = run("./no-such-command-here arg\n/bin/echo next\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "./no-such-command-here: Command not found\nnext\n"
    );
}

#[test]
fn background_job_is_reported_and_listed() {
    let output = run("sleep 1 &\njobs\n");
    let stdout = stdout(&output);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "{stdout:?}");

    let pid = pid_in(lines[0]);
    assert_eq!(lines[0], format!("[1] ({pid}) sleep 1 &"));
    assert_eq!(lines[1], format!("[1] ({pid}) Running sleep 1 &"));
}

#[test]
fn job_ids_increase_for_background_jobs() {
    let output = run("sleep 1 &\nsleep 1 &\nsleep 1 &\n");
    let stdout = stdout(&output);
    let jids: Vec<&str> = stdout.lines().map(|line| &line[..3]).collect();
    assert_eq!(jids, ["[1]", "[2]", "[3]"]);
}

#[test]
fn job_killed_by_interrupt_is_reported() {
    let output = run("sh -c 'kill -INT $$'\njobs\n");
    let stdout = stdout(&output);
    let pid = pid_in(&stdout);
    assert_eq!(
        stdout,
        format!(
            "Job [1] ({pid}) terminated by signal {}\n",
            Signal::SIGINT as i32
        )
    );
}

#[test]
fn stopped_job_blocks_quit_and_resumes_in_foreground() {
    let script = "\
sh -c 'kill -STOP $$; echo resumed'
jobs
quit
fg %1
jobs
quit
/bin/echo unreachable
";
    let output = run(script);
    assert_eq!(output.status.code(), Some(0));

    let stdout = stdout(&output);
    let pid = pid_in(&stdout);
    assert_eq!(
        stdout,
        format!(
            "Job [1] ({pid}) stopped by signal {stop}\n\
             [1] ({pid}) Stopped sh -c 'kill -STOP $$; echo resumed'\n\
             There are stopped jobs\n\
             resumed\n",
            stop = Signal::SIGSTOP as i32,
        )
    );
}

#[test]
fn stopped_job_resumes_in_background() {
    let output = run("sh -c 'kill -STOP $$; sleep 1'\nbg %1\njobs\n");
    let stdout = stdout(&output);
    let pid = pid_in(&stdout);
    assert_eq!(
        stdout,
        format!(
            "Job [1] ({pid}) stopped by signal {stop}\n\
             [1] ({pid}) sh -c 'kill -STOP $$; sleep 1'\n\
             [1] ({pid}) Running sh -c 'kill -STOP $$; sleep 1'\n",
            stop = Signal::SIGSTOP as i32,
        )
    );
}

#[test]
fn bg_and_fg_argument_errors() {
    let output = run("bg\nfg x\nbg %4\nfg 999999\n");
    assert_eq!(
        stdout(&output),
        "bg command requires PID or %jobid argument\n\
         fg: argument must be a PID or %jobid\n\
         %4: No such job\n\
         (999999): No such process\n"
    );
}

#[test]
fn lone_ampersand_is_ignored() {
    let output = run("&\n/bin/echo ok\n");
    assert_eq!(stdout(&output), "ok\n");
}

#[test]
fn quit_signal_terminates_shell() {
    let mut child = Command::new(BIN)
        .arg("-p")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();
    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    // The handlers are in place once the shell has read a command.
    stdin.write_all(b"/bin/echo ready\n").unwrap();
    let mut line = String::new();
    stdout.read_line(&mut line).unwrap();
    assert_eq!(line, "ready\n");

    kill(Pid::from_raw(child.id() as i32), Signal::SIGQUIT).unwrap();

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).unwrap();
    let status = child.wait().unwrap();
    drop(stdin);
    assert_eq!(status.code(), Some(1));
    assert_eq!(rest, "Terminating after receipt of SIGQUIT signal\n");
}
