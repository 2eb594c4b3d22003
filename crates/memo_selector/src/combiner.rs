//! Combiners: the functions that turn dependency results into a selector's
//! output.

use crate::args::DependencyList;

/// Computes a selector's result from its ordered dependency results.
///
/// Implemented for functions taking one parameter per dependency (tuple
/// dependencies of arity 0 to 8) and for functions taking `&[V]` (runtime
/// [`DependencyList`] dependencies). A combiner must be pure: the engine
/// only re-runs it when its inputs change.
pub trait Combiner<Deps>: 'static {
    /// The selector's result type.
    type Output: 'static;

    /// Compute the result.
    fn combine(&self, dependencies: Deps) -> Self::Output;
}

impl<F, O> Combiner<()> for F
where
    F: Fn() -> O + 'static,
    O: 'static,
{
    type Output = O;

    #[inline]
    fn combine(&self, _dependencies: ()) -> O {
        self()
    }
}

macro_rules! impl_combiner_for_arity {
    ($($arg:ident : $idx:tt),+) => {
        impl<F, O, $($arg),+> Combiner<($($arg,)+)> for F
        where
            F: Fn($($arg),+) -> O + 'static,
            O: 'static,
        {
            type Output = O;

            #[inline]
            fn combine(&self, dependencies: ($($arg,)+)) -> O {
                self($(dependencies.$idx),+)
            }
        }
    };
}

impl_combiner_for_arity!(T0: 0);
impl_combiner_for_arity!(T0: 0, T1: 1);
impl_combiner_for_arity!(T0: 0, T1: 1, T2: 2);
impl_combiner_for_arity!(T0: 0, T1: 1, T2: 2, T3: 3);
impl_combiner_for_arity!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4);
impl_combiner_for_arity!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5);
impl_combiner_for_arity!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6);
impl_combiner_for_arity!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7);

impl<F, O, V> Combiner<DependencyList<V>> for F
where
    F: Fn(&[V]) -> O + 'static,
    O: 'static,
{
    type Output = O;

    #[inline]
    fn combine(&self, dependencies: DependencyList<V>) -> O {
        self(&dependencies)
    }
}

/// A type-erased combiner over a runtime dependency list.
pub type DynCombiner<V, O> = Box<dyn Fn(&[V]) -> O>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_combiners_receive_dependencies_in_order() {
        let concat = |first: String, second: String, third: String| format!("{first}{second}{third}");
        let combined = concat.combine(("a".to_owned(), "b".to_owned(), "c".to_owned()));
        assert_eq!(combined, "abc");
    }

    #[test]
    fn list_combiners_see_the_whole_list() {
        let sum: DynCombiner<i32, i32> = Box::new(|values: &[i32]| values.iter().sum());
        assert_eq!(sum.combine(DependencyList::new(vec![1, 2, 3])), 6);
    }

    #[test]
    fn nullary_combiners_take_unit() {
        let constant = || 42_u8;
        assert_eq!(constant.combine(()), 42);
    }
}
