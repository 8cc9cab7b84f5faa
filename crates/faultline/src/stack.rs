//! Call-stack capture
//!
//! A snapshot is plain text, one line per resolved frame:
//!
//! ```text
//! \tfile = /src/service.rs, line = 42
//! ```
//!
//! Log scrapers depend on this layout, so [`StackFrame`]'s `Display` and
//! [`parse_stack`] are the only two places that know it.

use std::fmt;
use std::path::{Path, PathBuf};

const LINE_PREFIX: &str = "\tfile = ";
const LINE_SEPARATOR: &str = ", line = ";

/// Frames skipped above the capture point: the capture routine and its caller.
const SKIP: usize = 2;

/// One resolved call site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    /// Source file of the call site
    pub file: PathBuf,
    /// 1-based line number
    pub line: u32,
}

impl StackFrame {
    /// Create frame
    #[inline]
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Source file
    #[inline]
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Parse a single rendered line, with or without its trailing newline.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let body = line.strip_suffix('\n').unwrap_or(line);
        let body = body.strip_prefix(LINE_PREFIX)?;
        let (file, number) = body.rsplit_once(LINE_SEPARATOR)?;
        let line = number.parse().ok()?;
        Some(Self::new(file, line))
    }
}

impl fmt::Display for StackFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{LINE_PREFIX}{}{LINE_SEPARATOR}{}",
            self.file.display(),
            self.line
        )
    }
}

/// Capture the active call stack, starting at the frame that called the
/// function which called `capture_stack`.
///
/// Frames without a file and line (unwinder glue such as `__rust_try`, or
/// thread start-up) are skipped; walking ends with the stack itself.
/// An empty string means nothing above the caller could be resolved.
#[inline(never)]
#[must_use]
pub fn capture_stack() -> String {
    let anchor = capture_stack as usize;

    let mut frames = Vec::new();
    backtrace::trace(|frame| {
        frames.push(frame.clone());
        true
    });

    // Frames above ours belong to the unwinder.
    let start = frames
        .iter()
        .position(|frame| frame.symbol_address() as usize == anchor)
        .map_or(SKIP, |own| own + SKIP);

    let mut out = String::new();
    for frame in frames.iter().skip(start) {
        for site in resolve(frame) {
            out.push_str(&site.to_string());
        }
    }
    out
}

/// Resolve one frame; inlined frames may yield several call sites.
fn resolve(frame: &backtrace::Frame) -> Vec<StackFrame> {
    let mut sites = Vec::new();
    backtrace::resolve_frame(frame, |symbol| {
        if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
            sites.push(StackFrame::new(file, line));
        }
    });
    sites
}

/// Read rendered stack text back into frames. Lines that are not frame lines
/// are ignored.
#[must_use]
pub fn parse_stack(text: &str) -> Vec<StackFrame> {
    text.lines().filter_map(StackFrame::parse_line).collect()
}
