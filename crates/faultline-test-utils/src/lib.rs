//! Testing utilities for Faultline workspace
//!
//! Shared helpers for catching aborts and checking rendered stacks.

#![allow(missing_docs)]

use faultline::{into_failure, Failure};
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

/// Pattern for one rendered stack line, without its newline.
pub const FRAME_LINE: &str = r"^\tfile = .+, line = \d+$";

pub fn frame_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FRAME_LINE).unwrap())
}

/// Run `f`, expecting it to abort with a [`Failure`].
///
/// Panics if `f` returns normally; foreign panic payloads are resumed.
pub fn catch_failure<F, R>(f: F) -> Failure
where
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(_) => panic!("expected a failure abort, but the call returned"),
        Err(payload) => match into_failure(payload) {
            Ok(failure) => failure,
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Run `f`, expecting it to return normally.
pub fn no_failure<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => match into_failure(payload) {
            Ok(failure) => panic!("unexpected failure abort:\n{failure}"),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Assert every line of `stack` is a well-formed frame line and return how many there are.
pub fn assert_stack_lines(stack: &str) -> usize {
    let re = frame_line_regex();
    let mut count = 0;
    for line in stack.lines() {
        assert!(re.is_match(line), "malformed stack line: {line:?}");
        count += 1;
    }
    count
}
