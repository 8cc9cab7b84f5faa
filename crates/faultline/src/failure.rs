//! Wrapped failure with a captured backtrace
//!
//! A [`Failure`] carries three things:
//! - an optional origin (the underlying cause)
//! - a stack snapshot taken when it was built
//! - an optional formatted message
//!
//! Its `Display` is the diagnostic render consumed by log scrapers:
//!
//! ```text
//! <message>
//! backtrace:
//! \tfile = <path>, line = <n>
//! backtrace error:
//! <origin>
//! ```

use crate::sentinel::Sentinel;
use crate::stack::{capture_stack, parse_stack, StackFrame};
use std::error::Error as StdError;
use std::fmt;

/// Boxed, thread-safe failure value used as an origin
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failure that knows where it was built
///
/// Anything implementing this can be reported like an ordinary error, and
/// also exposes the captured stack and the cause it wraps.
pub trait Traced: StdError {
    /// Stack snapshot taken at construction
    fn stack(&self) -> &str;

    /// The wrapped cause, if any
    fn origin(&self) -> Option<&(dyn StdError + Send + Sync + 'static)>;

    /// Replace the wrapped cause
    fn rebind_origin(&mut self, origin: BoxError);
}

/// Failure with origin, stack snapshot and optional message
pub struct Failure {
    origin: Option<BoxError>,
    stack: String,
    message: Option<String>,
}

impl Failure {
    /// Wrap `origin` (or nothing) and capture the caller's stack.
    #[inline(never)]
    #[must_use]
    pub fn new(origin: Option<BoxError>) -> Self {
        Self {
            origin,
            stack: capture_stack(),
            message: None,
        }
    }

    /// Like [`Failure::new`], with a formatted message. An empty message is
    /// treated as absent.
    #[inline(never)]
    #[must_use]
    pub fn with_message(origin: Option<BoxError>, message: fmt::Arguments<'_>) -> Self {
        Self {
            origin,
            stack: capture_stack(),
            message: non_empty(message),
        }
    }

    /// Wrap a cause that is always present.
    #[inline(never)]
    #[must_use]
    pub fn wrap(origin: impl Into<BoxError>) -> Self {
        Self {
            origin: Some(origin.into()),
            stack: capture_stack(),
            message: None,
        }
    }

    /// Wrap a cause that is always present, with a formatted message.
    #[inline(never)]
    #[must_use]
    pub fn wrap_with_message(origin: impl Into<BoxError>, message: fmt::Arguments<'_>) -> Self {
        Self {
            origin: Some(origin.into()),
            stack: capture_stack(),
            message: non_empty(message),
        }
    }

    /// Stack snapshot taken at construction
    #[inline]
    #[must_use]
    pub fn stack(&self) -> &str {
        &self.stack
    }

    /// Parsed stack snapshot
    #[must_use]
    pub fn frames(&self) -> Vec<StackFrame> {
        parse_stack(&self.stack)
    }

    /// The wrapped cause, if any
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.origin.as_deref()
    }

    /// Custom message, if one was given
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Replace the wrapped cause. The stack and message are kept.
    #[inline]
    pub fn rebind_origin(&mut self, origin: BoxError) {
        self.origin = Some(origin);
    }

    /// Consume the failure and hand back its cause.
    #[inline]
    #[must_use]
    pub fn take_origin(self) -> Option<BoxError> {
        self.origin
    }

    /// Sentinel carried as origin, if the origin is one
    #[inline]
    #[must_use]
    pub fn sentinel(&self) -> Option<Sentinel> {
        self.origin.as_deref().and_then(|origin| Sentinel::of(origin))
    }

    /// Whether the origin is `sentinel`
    #[inline]
    #[must_use]
    pub fn is(&self, sentinel: Sentinel) -> bool {
        self.sentinel() == Some(sentinel)
    }
}

/// An empty formatted message counts as no message.
fn non_empty(message: fmt::Arguments<'_>) -> Option<String> {
    Some(fmt::format(message)).filter(|text| !text.is_empty())
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.origin) {
            (Some(message), Some(origin)) => write!(
                f,
                "{message}\nbacktrace:\n{}backtrace error:\n{origin}",
                self.stack
            ),
            (Some(message), None) => write!(f, "{message}\nbacktrace:\n{}", self.stack),
            // Origin text comes first here, with no "backtrace error:" section.
            (None, Some(origin)) => write!(f, "{origin}\nbacktrace:\n{}", self.stack),
            (None, None) => write!(f, "<unknown error>\n{}", self.stack),
        }
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("origin", &self.origin)
            .field("message", &self.message)
            .field("stack", &self.stack)
            .finish()
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.origin
            .as_deref()
            .map(|origin| origin as &(dyn StdError + 'static))
    }
}

impl Traced for Failure {
    fn stack(&self) -> &str {
        Failure::stack(self)
    }

    fn origin(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        Failure::origin(self)
    }

    fn rebind_origin(&mut self, origin: BoxError) {
        Failure::rebind_origin(self, origin);
    }
}

/// Build a [`Failure`] at the call site.
///
/// ```rust,ignore
/// let bare = failure!();
/// let wrapped = failure!(io_err);
/// let described = failure!(io_err, "reading {}", path.display());
/// ```
#[macro_export]
macro_rules! failure {
    () => {
        $crate::Failure::new(::std::option::Option::None)
    };
    ($origin:expr $(,)?) => {
        $crate::Failure::wrap($origin)
    };
    ($origin:expr, $($arg:tt)+) => {
        $crate::Failure::wrap_with_message($origin, ::std::format_args!($($arg)+))
    };
}
