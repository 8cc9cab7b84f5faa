//! Abort-on-violation helpers
//!
//! Aborting means unwinding with a [`Failure`] as the panic payload. Nothing
//! here catches; whoever wants the failure back wraps the call in
//! [`std::panic::catch_unwind`] and downcasts with [`into_failure`].

use crate::failure::{BoxError, Failure};
use crate::sentinel::{Sentinel, ERR_ASSERT, ERR_ENSURE, ERR_REQUIRE};
use std::any::Any;
use std::fmt;
use std::panic;

/// Abort with `Failure::new(origin)`.
#[inline(never)]
pub fn raise(origin: Option<BoxError>) -> ! {
    unwind(Failure::new(origin))
}

/// Abort with `Failure::with_message(origin, message)`.
#[inline(never)]
pub fn raise_with(origin: Option<BoxError>, message: fmt::Arguments<'_>) -> ! {
    unwind(Failure::with_message(origin, message))
}

/// Abort with [`ERR_REQUIRE`] unless `status` holds.
#[inline]
pub fn require(status: bool, message: fmt::Arguments<'_>) {
    if !status {
        violated(ERR_REQUIRE, message);
    }
}

/// Abort with [`ERR_ASSERT`] unless `status` holds.
#[inline]
pub fn assert(status: bool, message: fmt::Arguments<'_>) {
    if !status {
        violated(ERR_ASSERT, message);
    }
}

/// Evaluate `condition` once and abort with [`ERR_ENSURE`] if it is false.
///
/// A panic raised by `condition` itself propagates untouched.
#[inline]
pub fn ensure<F>(condition: F, message: fmt::Arguments<'_>)
where
    F: FnOnce() -> bool,
{
    if !condition() {
        violated(ERR_ENSURE, message);
    }
}

#[cold]
#[inline(never)]
fn violated(sentinel: Sentinel, message: fmt::Arguments<'_>) -> ! {
    raise_with(Some(Box::new(sentinel)), message)
}

fn unwind(failure: Failure) -> ! {
    tracing::debug!(
        target: "faultline::check",
        sentinel = failure.sentinel().map(tracing::field::display),
        detail = failure.message(),
        "raising failure"
    );
    panic::panic_any(failure)
}

/// Borrow the [`Failure`] out of a caught panic payload.
#[inline]
#[must_use]
pub fn payload_failure(payload: &(dyn Any + Send)) -> Option<&Failure> {
    payload.downcast_ref::<Failure>()
}

/// Take the [`Failure`] out of a caught panic payload.
///
/// Any other payload is handed back so it can be resumed with
/// [`std::panic::resume_unwind`].
pub fn into_failure(payload: Box<dyn Any + Send>) -> Result<Failure, Box<dyn Any + Send>> {
    payload.downcast::<Failure>().map(|failure| *failure)
}

/// Abort with a wrapped failure.
///
/// `raise!()` carries no origin, `raise!(cause)` wraps `cause`, and
/// `raise!(cause, "fmt", args..)` adds a formatted message.
#[macro_export]
macro_rules! raise {
    () => {
        $crate::raise(::std::option::Option::None)
    };
    ($origin:expr $(,)?) => {
        $crate::raise(::std::option::Option::Some(::std::convert::Into::into($origin)))
    };
    ($origin:expr, $($arg:tt)+) => {
        $crate::raise_with(
            ::std::option::Option::Some(::std::convert::Into::into($origin)),
            ::std::format_args!($($arg)+),
        )
    };
}

/// Abort with the precondition sentinel unless the condition holds.
#[macro_export]
macro_rules! require {
    ($cond:expr $(,)?) => {
        $crate::require($cond, ::std::format_args!(""))
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::require($cond, ::std::format_args!($($arg)+))
    };
}

/// Abort with the assert sentinel unless the condition holds.
#[macro_export]
macro_rules! assert_that {
    ($cond:expr $(,)?) => {
        $crate::assert($cond, ::std::format_args!(""))
    };
    ($cond:expr, $($arg:tt)+) => {
        $crate::assert($cond, ::std::format_args!($($arg)+))
    };
}

/// Abort with the ensure sentinel unless the predicate returns true.
#[macro_export]
macro_rules! ensure {
    ($pred:expr $(,)?) => {
        $crate::ensure($pred, ::std::format_args!(""))
    };
    ($pred:expr, $($arg:tt)+) => {
        $crate::ensure($pred, ::std::format_args!($($arg)+))
    };
}
