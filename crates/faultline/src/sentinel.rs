//! Sentinel causes
//!
//! Four fixed failure values used as canonical origins. The checking helpers
//! attach the first three; [`ERR_OVERLOAD`] is reserved for callers.

use std::error::Error as StdError;

/// Fixed failure category carried as the origin of a [`crate::Failure`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Sentinel {
    /// A `require` precondition was false
    #[error("precondition error")]
    Precondition,

    /// An `assert_that` condition was false
    #[error("assert error")]
    Assert,

    /// An `ensure` predicate returned false
    #[error("ensure error")]
    Ensure,

    /// The service refused work because it is saturated
    #[error("service overload")]
    Overload,
}

impl Sentinel {
    /// All sentinels, in declaration order
    pub const ALL: [Sentinel; 4] = [
        Sentinel::Precondition,
        Sentinel::Assert,
        Sentinel::Ensure,
        Sentinel::Overload,
    ];

    /// Recover the sentinel behind an arbitrary failure value, if it is one.
    #[inline]
    #[must_use]
    pub fn of(err: &(dyn StdError + 'static)) -> Option<Self> {
        err.downcast_ref::<Sentinel>().copied()
    }

}

/// Origin attached by [`crate::require()`]
pub const ERR_REQUIRE: Sentinel = Sentinel::Precondition;

/// Origin attached by [`crate::assert()`]
pub const ERR_ASSERT: Sentinel = Sentinel::Assert;

/// Origin attached by [`crate::ensure()`]
pub const ERR_ENSURE: Sentinel = Sentinel::Ensure;

/// Reserved for callers signalling saturation
pub const ERR_OVERLOAD: Sentinel = Sentinel::Overload;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_fixed_text() {
        assert_eq!(ERR_REQUIRE.to_string(), "precondition error");
        assert_eq!(ERR_ASSERT.to_string(), "assert error");
        assert_eq!(ERR_ENSURE.to_string(), "ensure error");
        assert_eq!(ERR_OVERLOAD.to_string(), "service overload");
    }


    #[test]
    fn of_recovers_sentinel_from_trait_object() {
        let boxed: Box<dyn StdError + Send + Sync> = Box::new(ERR_ENSURE);
        assert_eq!(Sentinel::of(boxed.as_ref()), Some(Sentinel::Ensure));
    }

    #[test]
    fn of_rejects_foreign_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "precondition error");
        assert_eq!(Sentinel::of(&io), None);
    }

    #[test]
    fn sentinels_are_distinct() {
        for (i, a) in Sentinel::ALL.iter().enumerate() {
            for b in &Sentinel::ALL[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
