//! Equality policies used by memoizers to decide whether two arguments match.

use std::fmt::Debug;

/// Decides whether two positional arguments are the same for caching
/// purposes.
///
/// The method is generic so a single policy value can compare every
/// position of a heterogeneous argument list. Policies that only care about
/// particular types can downcast through [`std::any::Any`] and fall back to
/// `==` for everything else.
pub trait EqualityCheck: Clone + Debug + 'static {
    /// Returns `true` when `left` and `right` should be treated as equal.
    fn equals<T: PartialEq + 'static>(&self, left: &T, right: &T) -> bool;
}

/// The default policy: two arguments match when `PartialEq` says so.
///
/// For `Rc<T>` with `T: Eq` the standard library already short-circuits on
/// pointer identity, so shared state handed to a selector twice is matched
/// without a deep comparison.
///
/// Equal content is equal regardless of allocation. An input selector that
/// builds a new `Rc` or `Vec` with the same contents on every call is
/// therefore not reported by the input stability check: the combiner's
/// memoizer compares the same way and does not recompute for it either.
/// Policies that need identity for a particular type can downcast to it and
/// compare with [`Rc::ptr_eq`](std::rc::Rc::ptr_eq).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SameValue;

impl EqualityCheck for SameValue {
    #[inline]
    fn equals<T: PartialEq + 'static>(&self, left: &T, right: &T) -> bool {
        left == right
    }
}
