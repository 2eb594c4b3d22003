//! Input selectors and dependency resolution.
//!
//! An input selector extracts one value from the arguments a selector is
//! called with. A selector's dependencies are an ordered collection of input
//! selectors; resolving them calls each one, left to right, with the full
//! arguments and collects the results in declaration order.

use crate::args::{ArgList, Argument, DependencyList};
use log::trace;
use std::rc::Rc;

/// A function from a selector's arguments to one dependency value.
///
/// Any `Fn(&A) -> O` closure or function is an input selector, and so is
/// every [`OutputSelector`](crate::OutputSelector), which lets selectors be
/// built on top of other selectors.
///
/// # Example
///
/// ```
/// use memo_selector::InputSelector;
///
/// struct State {
///     count: u32,
/// }
///
/// let count = |state: &State| state.count;
/// assert_eq!(count.select(&State { count: 3 }), 3);
/// ```
pub trait InputSelector<A> {
    /// The extracted value.
    type Output: Argument;

    /// Extract the value from `args`.
    fn select(&self, args: &A) -> Self::Output;
}

impl<A, O, F> InputSelector<A> for F
where
    F: Fn(&A) -> O,
    O: Argument,
{
    type Output = O;

    #[inline]
    fn select(&self, args: &A) -> O {
        self(args)
    }
}

/// A type-erased input selector, for dependency lists assembled at runtime.
pub type DynInputSelector<A, V> = Rc<dyn InputSelector<A, Output = V>>;

/// The ordered dependencies of a selector.
///
/// Implemented for tuples of up to eight input selectors, whose results form
/// a tuple of the same arity, and for `Vec<DynInputSelector<A, V>>`, whose
/// results form a [`DependencyList`].
pub trait Dependencies<A>: 'static {
    /// The ordered results of every input selector.
    type Output: ArgList;

    /// Call every input selector with `args`, in declaration order.
    fn resolve(&self, args: &A) -> Self::Output;

    /// Number of input selectors.
    fn len(&self) -> usize;

    /// Whether there are no input selectors at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A> Dependencies<A> for () {
    type Output = ();

    #[inline]
    fn resolve(&self, _args: &A) {}

    #[inline]
    fn len(&self) -> usize {
        0
    }
}

macro_rules! impl_dependencies_for_tuple {
    ($len:literal; $($sel:ident : $idx:tt),+) => {
        impl<A, $($sel),+> Dependencies<A> for ($($sel,)+)
        where
            $($sel: InputSelector<A> + 'static),+
        {
            type Output = ($(<$sel as InputSelector<A>>::Output,)+);

            #[inline]
            fn resolve(&self, args: &A) -> Self::Output {
                trace!("Resolving {} dependencies", $len);
                ($(self.$idx.select(args),)+)
            }

            #[inline]
            fn len(&self) -> usize {
                $len
            }
        }
    };
}

impl_dependencies_for_tuple!(1; S0: 0);
impl_dependencies_for_tuple!(2; S0: 0, S1: 1);
impl_dependencies_for_tuple!(3; S0: 0, S1: 1, S2: 2);
impl_dependencies_for_tuple!(4; S0: 0, S1: 1, S2: 2, S3: 3);
impl_dependencies_for_tuple!(5; S0: 0, S1: 1, S2: 2, S3: 3, S4: 4);
impl_dependencies_for_tuple!(6; S0: 0, S1: 1, S2: 2, S3: 3, S4: 4, S5: 5);
impl_dependencies_for_tuple!(7; S0: 0, S1: 1, S2: 2, S3: 3, S4: 4, S5: 5, S6: 6);
impl_dependencies_for_tuple!(8; S0: 0, S1: 1, S2: 2, S3: 3, S4: 4, S5: 5, S6: 6, S7: 7);

impl<A: 'static, V: Argument> Dependencies<A> for Vec<DynInputSelector<A, V>> {
    type Output = DependencyList<V>;

    fn resolve(&self, args: &A) -> DependencyList<V> {
        trace!("Resolving {} dependencies", self.len());
        self.iter().map(|selector| selector.select(args)).collect()
    }

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }
}
