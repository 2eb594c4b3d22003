//! Single-slot memoization keyed on the previous call.
//!
//! The cache holds exactly one entry: the arguments and result of the last
//! call that actually ran. A call whose arguments match that entry position
//! by position is answered from the cache; anything else replaces it.

use super::{Memoize, Memoized};
use crate::args::{ArgList, Mismatch};
use crate::equality::{EqualityCheck, SameValue};
use log::trace;
use std::cell::RefCell;
use std::fmt::{self, Debug, Formatter};

/// The default memoization strategy: remember only the last call.
///
/// The comparator used for each position defaults to `E`'s configured value
/// and can be replaced per cache by passing a comparator as the first
/// memoize option.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastCallMemoize<E = SameValue> {
    equality: E,
}

impl LastCallMemoize {
    /// Strategy comparing arguments with [`SameValue`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            equality: SameValue,
        }
    }
}

impl<E: EqualityCheck> LastCallMemoize<E> {
    /// Strategy comparing arguments with `equality`.
    #[inline]
    pub const fn with_equality(equality: E) -> Self {
        Self { equality }
    }

    /// The comparator caches use when no option overrides it.
    #[inline]
    pub const fn equality(&self) -> &E {
        &self.equality
    }
}

impl<E: EqualityCheck + Default> Default for LastCallMemoize<E> {
    fn default() -> Self {
        Self {
            equality: E::default(),
        }
    }
}

impl<E: EqualityCheck> Memoize for LastCallMemoize<E> {
    type Options = E;
    type Memoized<A: ArgList, R: Clone + 'static> = LastCall<A, R, E>;

    fn memoize<A, R, F>(&self, func: F, options: &[E]) -> LastCall<A, R, E>
    where
        A: ArgList,
        R: Clone + 'static,
        F: Fn(&A) -> R + 'static,
    {
        let equality = options
            .first()
            .cloned()
            .unwrap_or_else(|| self.equality.clone());
        LastCall::new(func, equality)
    }
}

/// The cached arguments and result of the last call.
#[derive(Clone, Debug)]
struct CacheEntry<A, R> {
    args: A,
    result: R,
}

/// A function wrapped by [`LastCallMemoize`].
pub struct LastCall<A, R, E = SameValue> {
    func: Box<dyn Fn(&A) -> R>,
    equality: E,
    entry: RefCell<Option<CacheEntry<A, R>>>,
}

impl<A: ArgList, R: Clone + 'static, E: EqualityCheck> LastCall<A, R, E> {
    /// Wrap `func`, comparing arguments with `equality`.
    pub fn new<F>(func: F, equality: E) -> Self
    where
        F: Fn(&A) -> R + 'static,
    {
        Self {
            func: Box::new(func),
            equality,
            entry: RefCell::new(None),
        }
    }

    /// Arguments of the last call that ran the wrapped function.
    pub fn last_args(&self) -> Option<A> {
        self.entry.borrow().as_ref().map(|entry| entry.args.clone())
    }

    /// The comparator this cache uses.
    #[inline]
    pub const fn equality(&self) -> &E {
        &self.equality
    }

    fn cached(&self, args: &A) -> Option<R> {
        let entry = self.entry.borrow();
        let entry = entry.as_ref()?;
        entry
            .args
            .shallow_equal(args, &self.equality)
            .then(|| entry.result.clone())
    }
}

impl<A: ArgList, R: Clone + 'static, E: EqualityCheck> Memoized<A, R> for LastCall<A, R, E> {
    fn call(&self, args: &A) -> R {
        if let Some(result) = self.cached(args) {
            trace!("Last-call cache hit for {} argument(s)", args.arity());
            return result;
        }

        trace!("Last-call cache miss for {} argument(s)", args.arity());

        // No borrow is held while the wrapped function runs, so it may call
        // back into this cache. A panic leaves the previous entry in place.
        let result = (self.func)(args);
        *self.entry.borrow_mut() = Some(CacheEntry {
            args: args.clone(),
            result: result.clone(),
        });
        result
    }

    fn last_result(&self) -> Option<R> {
        self.entry.borrow().as_ref().map(|entry| entry.result.clone())
    }

    fn clear_cache(&self) {
        self.entry.borrow_mut().take();
    }

    fn unstable_positions(&self, first: &A, second: &A) -> Vec<Mismatch> {
        first.mismatches(second, &self.equality)
    }
}

impl<A: Debug, R: Debug, E: Debug> Debug for LastCall<A, R, E> {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("LastCall")
            .field("equality", &self.equality)
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}
