//! Positional argument lists.
//!
//! Memoizers never look inside a selector's values; they only compare
//! argument lists position by position through an [`EqualityCheck`]. This
//! module defines what an argument is and the list shapes the engine passes
//! around:
//!
//! - tuples of arity 0 to 8, for typed dependency results
//! - [`Single`], for the raw arguments of a selector call
//! - [`DependencyList`], for homogeneous dependency lists built at runtime

use crate::equality::EqualityCheck;
use bytemuck::TransparentWrapper;
use std::fmt::Debug;
use std::ops::Deref;

/// A value that can take part in memoization.
///
/// It must be comparable, cacheable, printable in diagnostics and own its
/// data.
pub trait Argument: PartialEq + Clone + Debug + 'static {}

impl<T: PartialEq + Clone + Debug + 'static> Argument for T {}

/// One position at which two argument lists disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// Zero-based position in the list.
    pub index: usize,
    /// Debug rendering of the value in the first list.
    pub first: String,
    /// Debug rendering of the value in the second list.
    pub second: String,
}

impl Mismatch {
    fn new<T: Debug + ?Sized, U: Debug + ?Sized>(index: usize, first: &T, second: &U) -> Self {
        Self {
            index,
            first: format!("{first:?}"),
            second: format!("{second:?}"),
        }
    }
}

/// An ordered list of arguments compared element-wise.
pub trait ArgList: Clone + Debug + 'static {
    /// Number of positions in this list.
    fn arity(&self) -> usize;

    /// Whether every position matches under `equality`.
    ///
    /// Lists of different arity never match.
    fn shallow_equal<E: EqualityCheck>(&self, other: &Self, equality: &E) -> bool;

    /// Every position that does not match under `equality`.
    fn mismatches<E: EqualityCheck>(&self, other: &Self, equality: &E) -> Vec<Mismatch>;
}

impl ArgList for () {
    #[inline]
    fn arity(&self) -> usize {
        0
    }

    #[inline]
    fn shallow_equal<E: EqualityCheck>(&self, _other: &Self, _equality: &E) -> bool {
        true
    }

    #[inline]
    fn mismatches<E: EqualityCheck>(&self, _other: &Self, _equality: &E) -> Vec<Mismatch> {
        Vec::new()
    }
}

macro_rules! impl_arg_list_for_tuple {
    ($arity:literal; $($name:ident : $idx:tt),+) => {
        impl<$($name: Argument),+> ArgList for ($($name,)+) {
            #[inline]
            fn arity(&self) -> usize {
                $arity
            }

            #[inline]
            fn shallow_equal<E: EqualityCheck>(&self, other: &Self, equality: &E) -> bool {
                $(equality.equals(&self.$idx, &other.$idx))&&+
            }

            fn mismatches<E: EqualityCheck>(&self, other: &Self, equality: &E) -> Vec<Mismatch> {
                let mut found = Vec::new();
                $(
                    if !equality.equals(&self.$idx, &other.$idx) {
                        found.push(Mismatch::new($idx, &self.$idx, &other.$idx));
                    }
                )+
                found
            }
        }
    };
}

impl_arg_list_for_tuple!(1; T0: 0);
impl_arg_list_for_tuple!(2; T0: 0, T1: 1);
impl_arg_list_for_tuple!(3; T0: 0, T1: 1, T2: 2);
impl_arg_list_for_tuple!(4; T0: 0, T1: 1, T2: 2, T3: 3);
impl_arg_list_for_tuple!(5; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4);
impl_arg_list_for_tuple!(6; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5);
impl_arg_list_for_tuple!(7; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6);
impl_arg_list_for_tuple!(8; T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7);

/// A one-position argument list holding a selector's raw arguments.
///
/// It has the same layout as `A`, so a borrowed argument can be looked up in
/// a cache without being cloned first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[repr(transparent)]
pub struct Single<A>(pub A);

// SAFETY: `Single` is `repr(transparent)` over its only field, of type `A`.
unsafe impl<A> TransparentWrapper<A> for Single<A> {}

impl<A> Single<A> {
    /// View a borrowed argument as a one-position list.
    #[inline]
    pub fn from_ref(args: &A) -> &Self {
        Self::wrap_ref(args)
    }
}

impl<A: Argument> ArgList for Single<A> {
    #[inline]
    fn arity(&self) -> usize {
        1
    }

    #[inline]
    fn shallow_equal<E: EqualityCheck>(&self, other: &Self, equality: &E) -> bool {
        equality.equals(&self.0, &other.0)
    }

    fn mismatches<E: EqualityCheck>(&self, other: &Self, equality: &E) -> Vec<Mismatch> {
        if equality.equals(&self.0, &other.0) {
            Vec::new()
        } else {
            vec![Mismatch::new(0, &self.0, &other.0)]
        }
    }
}

/// Dependency results of a selector whose input selectors all share one
/// output type and whose count is only known at runtime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyList<V>(Vec<V>);

impl<V> DependencyList<V> {
    /// Wrap an ordered list of results.
    #[inline]
    pub const fn new(values: Vec<V>) -> Self {
        Self(values)
    }

    /// Unwrap into the ordered results.
    #[inline]
    pub fn into_inner(self) -> Vec<V> {
        self.0
    }
}

impl<V> Deref for DependencyList<V> {
    type Target = [V];

    #[inline]
    fn deref(&self) -> &[V] {
        &self.0
    }
}

impl<V> FromIterator<V> for DependencyList<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Argument> ArgList for DependencyList<V> {
    #[inline]
    fn arity(&self) -> usize {
        self.0.len()
    }

    fn shallow_equal<E: EqualityCheck>(&self, other: &Self, equality: &E) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(left, right)| equality.equals(left, right))
    }

    fn mismatches<E: EqualityCheck>(&self, other: &Self, equality: &E) -> Vec<Mismatch> {
        let longest = self.0.len().max(other.0.len());
        (0..longest)
            .filter_map(|index| match (self.0.get(index), other.0.get(index)) {
                (Some(left), Some(right)) if equality.equals(left, right) => None,
                (Some(left), Some(right)) => Some(Mismatch::new(index, left, right)),
                (Some(left), None) => Some(Mismatch::new(index, left, "<missing>")),
                (None, Some(right)) => Some(Mismatch::new(index, "<missing>", right)),
                (None, None) => None,
            })
            .collect()
    }
}
