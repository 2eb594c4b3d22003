//! The selector-composition engine.
//!
//! An [`OutputSelector`] is the callable produced by a
//! [`SelectorCreator`](crate::SelectorCreator). Every call:
//! 1. asks the outer (arguments) memoizer whether the raw arguments match
//!    the previous call, and if so returns the cached result without
//!    cloning them
//! 2. otherwise resolves the dependencies
//! 3. optionally resolves them a second time to detect unstable input
//!    selectors (debug builds only)
//! 4. hands the dependency results to the inner memoizer, which only runs
//!    the combiner when they changed
//! 5. records the result as the selector's last result

use crate::args::{Argument, Single};
use crate::combiner::Combiner;
use crate::counter::{Counter, SharedCounter};
use crate::dependency::{Dependencies, InputSelector};
use crate::memoize::{LastCallMemoize, Memoize, Memoized as _};
use crate::options::{EffectiveOptions, StabilityCheck};
use log::{debug, trace, warn};
use std::cell::{Cell, RefCell};
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::rc::Rc;

/// The part of a selector that runs on an outer-memoizer miss.
///
/// It is owned jointly by the selector handle and the closure wrapped by the
/// outer memoizer.
struct DependencyResolver<A, D, C, M>
where
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    M: Memoize,
{
    dependencies: D,
    memoized_result_func: M::Memoized<D::Output, Rc<C::Output>>,
    stability_check: StabilityCheck,
    first_run: Cell<bool>,
    dependency_recomputations: Counter,
    unstable_input_reports: Counter,
    _args: PhantomData<fn(&A)>,
}

impl<A, D, C, M> DependencyResolver<A, D, C, M>
where
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    M: Memoize,
{
    fn compute(&self, args: &A) -> Rc<C::Output> {
        self.dependency_recomputations.increment();
        let resolved = self.dependencies.resolve(args);

        if self.should_check_stability() {
            self.check_stability(args, &resolved);
        }
        self.first_run.set(false);

        self.memoized_result_func.call(&resolved)
    }

    fn should_check_stability(&self) -> bool {
        if !cfg!(debug_assertions) {
            return false;
        }
        match self.stability_check {
            StabilityCheck::Never => false,
            StabilityCheck::Once => self.first_run.get(),
            StabilityCheck::Always => true,
        }
    }

    /// Resolve the dependencies again and report every position whose
    /// result changed. Never fails the call.
    fn check_stability(&self, args: &A, resolved: &D::Output) {
        trace!("Running input stability check");
        let repeated = self.dependencies.resolve(args);
        let mismatches = self
            .memoized_result_func
            .unstable_positions(resolved, &repeated);
        if mismatches.is_empty() {
            return;
        }

        self.unstable_input_reports.increment();
        for mismatch in &mismatches {
            warn!(
                "An input selector returned a different result when passed the same arguments. \
                 This means the selector will recompute more often than expected. \
                 Dependency {}: first {}, then {}",
                mismatch.index, mismatch.first, mismatch.second
            );
        }
    }
}

struct SelectorState<A, D, C, M, AM>
where
    A: Argument,
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    M: Memoize,
    AM: Memoize,
{
    result_func: Rc<C>,
    resolver: Rc<DependencyResolver<A, D, C, M>>,
    memoized: AM::Memoized<Single<A>, Rc<C::Output>>,
    recomputations: SharedCounter,
    last_result: RefCell<Option<Rc<C::Output>>>,
    memoize: M,
    args_memoize: AM,
}

/// A memoized selector built from input selectors and a combiner.
///
/// Handles are cheap to clone; clones share caches and counters. Results
/// are returned as `Rc`s, so a cached result is the very same allocation as
/// the one returned by the call that computed it.
///
/// # Example
///
/// ```
/// use memo_selector::create_selector;
///
/// #[derive(Clone, Debug, PartialEq)]
/// struct State {
///     x: i32,
///     y: i32,
/// }
///
/// let sum = create_selector(
///     (|state: &State| state.x, |state: &State| state.y),
///     |x: i32, y: i32| x + y,
/// );
///
/// assert_eq!(*sum.select(&State { x: 1, y: 2 }), 3);
/// assert_eq!(*sum.select(&State { x: 1, y: 2 }), 3);
/// assert_eq!(sum.recomputations(), 1);
/// ```
pub struct OutputSelector<A, D, C, M = LastCallMemoize, AM = LastCallMemoize>
where
    A: Argument,
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    M: Memoize,
    AM: Memoize,
{
    state: Rc<SelectorState<A, D, C, M, AM>>,
}

impl<A, D, C, M, AM> OutputSelector<A, D, C, M, AM>
where
    A: Argument,
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    M: Memoize,
    AM: Memoize,
{
    /// Wire `dependencies` and `result_func` together under fully resolved
    /// options. Each selector gets its own memoizer instances.
    pub(crate) fn new(dependencies: D, result_func: C, options: EffectiveOptions<M, AM>) -> Self {
        let stability_check = options.resolved_stability_check();
        let result_func = Rc::new(result_func);
        let recomputations: SharedCounter = Rc::new(Counter::new());

        let combine = {
            let result_func = Rc::clone(&result_func);
            let recomputations = Rc::clone(&recomputations);
            move |resolved: &D::Output| {
                // Counted before running so a panicking combiner still
                // records the attempt.
                recomputations.increment();
                Rc::new(C::combine(&result_func, resolved.clone()))
            }
        };
        let memoized_result_func = options
            .memoize
            .memoize(combine, options.memoize_options.as_slice());

        debug!(
            "Creating selector over {} dependencies (input stability check: {stability_check})",
            dependencies.len()
        );

        let resolver = Rc::new(DependencyResolver {
            dependencies,
            memoized_result_func,
            stability_check,
            first_run: Cell::new(true),
            dependency_recomputations: Counter::new(),
            unstable_input_reports: Counter::new(),
            _args: PhantomData,
        });

        let memoized = {
            let resolver = Rc::clone(&resolver);
            options.args_memoize.memoize(
                move |args: &Single<A>| resolver.compute(&args.0),
                options.args_memoize_options.as_slice(),
            )
        };

        Self {
            state: Rc::new(SelectorState {
                result_func,
                resolver,
                memoized,
                recomputations,
                last_result: RefCell::new(None),
                memoize: options.memoize,
                args_memoize: options.args_memoize,
            }),
        }
    }

    /// Compute (or fetch from cache) the selector's result for `args`.
    ///
    /// A panic in an input selector or the combiner propagates unchanged;
    /// nothing from that call is cached and [`last_result`](Self::last_result)
    /// keeps its previous value.
    pub fn select(&self, args: &A) -> Rc<C::Output> {
        let result = self.state.memoized.call(Single::from_ref(args));
        *self.state.last_result.borrow_mut() = Some(Rc::clone(&result));
        result
    }

    /// The combiner this selector was built with.
    #[inline]
    pub fn result_func(&self) -> &C {
        &self.state.result_func
    }

    /// The combiner wrapped by the inner memoizer.
    #[inline]
    pub fn memoized_result_func(&self) -> &M::Memoized<D::Output, Rc<C::Output>> {
        &self.state.resolver.memoized_result_func
    }

    /// The input selectors, in declaration order.
    #[inline]
    pub fn dependencies(&self) -> &D {
        &self.state.resolver.dependencies
    }

    /// How many times the combiner has actually run.
    #[inline]
    pub fn recomputations(&self) -> usize {
        self.state.recomputations.get()
    }

    /// Reset [`recomputations`](Self::recomputations) to zero.
    #[inline]
    pub fn reset_recomputations(&self) {
        self.state.recomputations.reset();
    }

    /// How many times the dependencies have been resolved, i.e. how often
    /// the outer memoizer missed.
    #[inline]
    pub fn dependency_recomputations(&self) -> usize {
        self.state.resolver.dependency_recomputations.get()
    }

    /// Reset [`dependency_recomputations`](Self::dependency_recomputations)
    /// to zero.
    #[inline]
    pub fn reset_dependency_recomputations(&self) {
        self.state.resolver.dependency_recomputations.reset();
    }

    /// The result of the most recent completed call.
    pub fn last_result(&self) -> Option<Rc<C::Output>> {
        self.state.last_result.borrow().clone()
    }

    /// The memoizer wrapping the combiner.
    #[inline]
    pub fn memoize(&self) -> &M {
        &self.state.memoize
    }

    /// The memoizer wrapping the whole call.
    #[inline]
    pub fn args_memoize(&self) -> &AM {
        &self.state.args_memoize
    }

    /// The stability check frequency this selector was created with.
    #[inline]
    pub fn input_stability_check(&self) -> StabilityCheck {
        self.state.resolver.stability_check
    }

    /// How many computations detected an unstable input selector.
    ///
    /// A computation counts once however many positions it logged a
    /// warning for.
    #[inline]
    pub fn unstable_input_reports(&self) -> usize {
        self.state.resolver.unstable_input_reports.get()
    }

    /// Drop the cached entries of both memoizers. Counters are kept.
    pub fn clear_cache(&self) {
        debug!("Clearing selector caches");
        self.state.memoized.clear_cache();
        self.state.resolver.memoized_result_func.clear_cache();
    }
}

impl<A, D, C, M, AM> Clone for OutputSelector<A, D, C, M, AM>
where
    A: Argument,
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    M: Memoize,
    AM: Memoize,
{
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<A, D, C, M, AM> InputSelector<A> for OutputSelector<A, D, C, M, AM>
where
    A: Argument,
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    C::Output: PartialEq + Debug,
    M: Memoize,
    AM: Memoize,
{
    type Output = Rc<C::Output>;

    #[inline]
    fn select(&self, args: &A) -> Rc<C::Output> {
        Self::select(self, args)
    }
}

impl<A, D, C, M, AM> Debug for OutputSelector<A, D, C, M, AM>
where
    A: Argument,
    D: Dependencies<A>,
    C: Combiner<D::Output>,
    M: Memoize,
    AM: Memoize,
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OutputSelector")
            .field("dependencies", &self.dependencies().len())
            .field("recomputations", &self.recomputations())
            .field("dependency_recomputations", &self.dependency_recomputations())
            .field("input_stability_check", &self.input_stability_check())
            .field("memoize", &self.state.memoize)
            .field("args_memoize", &self.state.args_memoize)
            .finish_non_exhaustive()
    }
}
