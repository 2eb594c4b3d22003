//! Memoization strategies.
//!
//! A strategy ([`Memoize`]) wraps a function into a [`Memoized`] value that
//! answers repeated calls from a cache. The selector engine builds two of
//! them per selector:
//! - an inner one around the combiner, keyed on dependency results
//! - an outer one around the whole call, keyed on the raw arguments
//!
//! The engine only talks to these traits, so any cache shape can be swapped
//! in without touching it.

mod last_call;

pub use last_call::{LastCall, LastCallMemoize};

use crate::args::{ArgList, Mismatch};
use crate::equality::SameValue;
use std::fmt::Debug;

/// A function wrapped by a [`Memoize`] strategy.
pub trait Memoized<A: ArgList, R: Clone + 'static> {
    /// Return the cached result for `args`, or invoke the wrapped function
    /// and cache its result.
    ///
    /// Arguments are borrowed so a cache hit costs only the comparison;
    /// strategies clone them when they store a new entry.
    fn call(&self, args: &A) -> R;

    /// The most recently cached result, if any.
    fn last_result(&self) -> Option<R>;

    /// Drop every cached entry.
    fn clear_cache(&self);

    /// Positions at which `first` and `second` differ under this cache's
    /// comparison policy.
    ///
    /// Used by the input stability check. Strategies without an explicit
    /// comparator keep the default, which compares with [`SameValue`].
    fn unstable_positions(&self, first: &A, second: &A) -> Vec<Mismatch> {
        first.mismatches(second, &SameValue)
    }
}

/// A memoization strategy.
///
/// Strategies are cheap configuration values; each call to
/// [`memoize`](Memoize::memoize) produces a fresh, independent cache.
pub trait Memoize: Clone + Debug + 'static {
    /// Extra configuration forwarded after the wrapped function, such as an
    /// equality comparator.
    type Options: Clone + Debug + 'static;

    /// The wrapped-function type produced for a given argument list and
    /// result type.
    type Memoized<A: ArgList, R: Clone + 'static>: Memoized<A, R> + 'static;

    /// Wrap `func`, configured by `options`.
    fn memoize<A, R, F>(&self, func: F, options: &[Self::Options]) -> Self::Memoized<A, R>
    where
        A: ArgList,
        R: Clone + 'static,
        F: Fn(&A) -> R + 'static;
}
