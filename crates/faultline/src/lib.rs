//! Faultline - failures that remember where they came from
//!
//! Wraps any error together with a stack snapshot taken at the point of
//! wrapping, and turns violated preconditions into aborts carrying such a
//! failure.
//!
//! # Core Concepts
//!
//! - [`Failure`]: origin + captured stack + optional message, rendered by `Display`
//! - [`Sentinel`]: the four fixed origins used for classification
//! - [`require()`], [`assert()`], [`ensure()`]: unwind with a [`Failure`] when a check fails
//! - [`capture_stack`]: the `\tfile = <path>, line = <n>` snapshot format
//!
//! # Example
//!
//! ```rust,ignore
//! use faultline::{failure, require, Sentinel};
//!
//! let err = failure!(io_err, "error info: {}", "high level error message");
//! tracing::error!("{err}");
//!
//! require!(queue.len() < limit, "queue over limit: {}", queue.len());
//! ```

// Core modules
mod check;
mod failure;
mod sentinel;
mod stack;

/// Tracing setup and failure reporting
pub mod telemetry;

// Re-exports
pub use check::{
    assert, ensure, into_failure, payload_failure, raise, raise_with, require,
};
pub use failure::{BoxError, Failure, Traced};
pub use sentinel::{Sentinel, ERR_ASSERT, ERR_ENSURE, ERR_OVERLOAD, ERR_REQUIRE};
pub use stack::{capture_stack, parse_stack, StackFrame};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
