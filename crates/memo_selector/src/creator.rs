//! Selector creators.
//!
//! A [`SelectorCreator`] carries default memoizers and options and builds
//! any number of selectors from them. [`create_selector_creator`] accepts
//! either a bare memoizer (plus options for it) or a full options record;
//! [`create_selector`] uses the built-in last-call memoizer for both caches.

use crate::args::Argument;
use crate::combiner::{Combiner, DynCombiner};
use crate::dependency::{Dependencies, DynInputSelector, InputSelector};
use crate::error::SelectorError;
use crate::memoize::{LastCallMemoize, Memoize};
use crate::options::{EffectiveOptions, MemoizeOptions, SelectorOptions, StabilityCheck};
use crate::selector::OutputSelector;
use log::trace;
use std::rc::Rc;

/// Creator configuration given as a full record. `memoize` is mandatory;
/// everything else falls back to the built-in defaults.
#[derive(Clone, Debug)]
pub struct CreatorOptions<M: Memoize, AM: Memoize = LastCallMemoize> {
    /// Memoizer wrapping each selector's combiner.
    pub memoize: M,
    /// Options for `memoize`.
    pub memoize_options: MemoizeOptions<M::Options>,
    /// Memoizer wrapping each selector's call; `AM::default()` when unset.
    pub args_memoize: Option<AM>,
    /// Options for `args_memoize`.
    pub args_memoize_options: MemoizeOptions<AM::Options>,
    /// Input stability check; the process-wide setting when unset.
    pub input_stability_check: Option<StabilityCheck>,
}

impl<M: Memoize, AM: Memoize> CreatorOptions<M, AM> {
    /// Options with `memoize` and defaults for everything else.
    pub fn new(memoize: M) -> Self {
        Self {
            memoize,
            memoize_options: MemoizeOptions::none(),
            args_memoize: None,
            args_memoize_options: MemoizeOptions::none(),
            input_stability_check: None,
        }
    }
}

/// The two ways to configure a creator.
#[derive(Clone, Debug)]
pub enum CreatorConfig<M: Memoize, AM: Memoize = LastCallMemoize> {
    /// A memoizer for the combiner, followed by its options.
    Memoizer {
        /// Memoizer wrapping each selector's combiner.
        memoize: M,
        /// Options for `memoize`.
        options: MemoizeOptions<M::Options>,
    },
    /// A full options record.
    Options(CreatorOptions<M, AM>),
}

impl<M: Memoize, AM: Memoize> CreatorConfig<M, AM> {
    /// Shape one: just a memoizer.
    pub fn memoizer(memoize: M) -> Self {
        Self::Memoizer {
            memoize,
            options: MemoizeOptions::none(),
        }
    }

    /// Shape one: a memoizer and its options.
    pub fn memoizer_with(memoize: M, options: MemoizeOptions<M::Options>) -> Self {
        Self::Memoizer { memoize, options }
    }

    /// Shape two: a full options record.
    pub fn options(options: CreatorOptions<M, AM>) -> Self {
        Self::Options(options)
    }
}

/// Build a reusable [`SelectorCreator`] from either configuration shape.
///
/// The shape is inspected once, here; the creator only ever sees resolved
/// defaults.
pub fn create_selector_creator<M, AM>(config: CreatorConfig<M, AM>) -> SelectorCreator<M, AM>
where
    M: Memoize,
    AM: Memoize + Default,
{
    let defaults = match config {
        CreatorConfig::Memoizer { memoize, options } => EffectiveOptions {
            memoize,
            memoize_options: options,
            args_memoize: AM::default(),
            args_memoize_options: MemoizeOptions::none(),
            input_stability_check: None,
        },
        CreatorConfig::Options(options) => EffectiveOptions {
            memoize: options.memoize,
            memoize_options: options.memoize_options,
            args_memoize: options.args_memoize.unwrap_or_default(),
            args_memoize_options: options.args_memoize_options,
            input_stability_check: options.input_stability_check,
        },
    };
    SelectorCreator { defaults }
}

/// One element of a selector described as a flat list: input selectors,
/// then a combiner, then optionally an options record.
///
/// All input selectors share the output type `V`; the combiner receives
/// their results as a slice.
pub enum SelectorPart<A, V, T, M: Memoize = LastCallMemoize, AM: Memoize = LastCallMemoize> {
    /// An input selector.
    Input(DynInputSelector<A, V>),
    /// The combiner.
    Combiner(DynCombiner<V, T>),
    /// Per-selector options.
    Options(SelectorOptions<M, AM>),
}

impl<A, V, T, M: Memoize, AM: Memoize> SelectorPart<A, V, T, M, AM> {
    /// Wrap an input selector.
    pub fn input<S>(selector: S) -> Self
    where
        S: InputSelector<A, Output = V> + 'static,
    {
        Self::Input(Rc::new(selector))
    }

    /// Wrap a combiner.
    pub fn combiner<F>(combiner: F) -> Self
    where
        F: Fn(&[V]) -> T + 'static,
    {
        Self::Combiner(Box::new(combiner))
    }

    /// Wrap per-selector options.
    pub fn options(options: SelectorOptions<M, AM>) -> Self {
        Self::Options(options)
    }

    /// Human-readable name of this part's kind, used in errors.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Input(_) => "an input selector",
            Self::Combiner(_) => "a combiner",
            Self::Options(_) => "an options record",
        }
    }
}

/// A selector assembled by [`SelectorCreator::create_from_parts`].
pub type PartsSelector<A, V, T, M = LastCallMemoize, AM = LastCallMemoize> =
    OutputSelector<A, Vec<DynInputSelector<A, V>>, DynCombiner<V, T>, M, AM>;

/// Builds selectors sharing the same default memoizers and options.
#[derive(Clone, Debug)]
pub struct SelectorCreator<M: Memoize = LastCallMemoize, AM: Memoize = LastCallMemoize> {
    defaults: EffectiveOptions<M, AM>,
}

impl Default for SelectorCreator {
    fn default() -> Self {
        create_selector_creator(CreatorConfig::memoizer(LastCallMemoize::new()))
    }
}

impl<M: Memoize> SelectorCreator<M> {
    /// Creator using `memoize` for combiners and the last-call memoizer for
    /// calls.
    pub fn with_memoize(memoize: M, options: MemoizeOptions<M::Options>) -> Self {
        create_selector_creator(CreatorConfig::memoizer_with(memoize, options))
    }
}

impl<M: Memoize, AM: Memoize> SelectorCreator<M, AM> {
    /// Build a selector from a tuple of input selectors and a combiner
    /// taking one parameter per input selector.
    pub fn create<A, D, C>(&self, dependencies: D, combiner: C) -> OutputSelector<A, D, C, M, AM>
    where
        A: Argument,
        D: Dependencies<A>,
        C: Combiner<D::Output>,
    {
        self.create_with(dependencies, combiner, SelectorOptions::new())
    }

    /// Like [`create`](Self::create), with per-selector overrides.
    pub fn create_with<A, D, C>(
        &self,
        dependencies: D,
        combiner: C,
        options: SelectorOptions<M, AM>,
    ) -> OutputSelector<A, D, C, M, AM>
    where
        A: Argument,
        D: Dependencies<A>,
        C: Combiner<D::Output>,
    {
        OutputSelector::new(dependencies, combiner, self.defaults.merged_with(options))
    }

    /// Build a selector from a flat list of parts.
    ///
    /// The list is read from the end: an optional trailing options record,
    /// then the mandatory combiner, then nothing but input selectors.
    ///
    /// # Errors
    ///
    /// [`SelectorError::MissingCombiner`] when the combiner position holds
    /// something else (or nothing), [`SelectorError::InvalidDependency`]
    /// when a dependency position holds something other than an input
    /// selector.
    pub fn create_from_parts<A, V, T>(
        &self,
        mut parts: Vec<SelectorPart<A, V, T, M, AM>>,
    ) -> Result<PartsSelector<A, V, T, M, AM>, SelectorError>
    where
        A: Argument,
        V: Argument,
        T: 'static,
    {
        trace!("Parsing {} selector parts", parts.len());

        let overrides = match parts.pop() {
            Some(SelectorPart::Options(options)) => options,
            Some(other) => {
                parts.push(other);
                SelectorOptions::new()
            }
            None => return Err(SelectorError::MissingCombiner { found: "nothing" }),
        };

        let combiner = match parts.pop() {
            Some(SelectorPart::Combiner(combiner)) => combiner,
            Some(other) => return Err(SelectorError::MissingCombiner { found: other.kind() }),
            None => return Err(SelectorError::MissingCombiner { found: "nothing" }),
        };

        let dependencies = parts
            .into_iter()
            .enumerate()
            .map(|(index, part)| match part {
                SelectorPart::Input(selector) => Ok(selector),
                other => Err(SelectorError::InvalidDependency {
                    index,
                    found: other.kind(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.create_with(dependencies, combiner, overrides))
    }
}

/// Build a selector with the default creator: last-call memoization for
/// both the combiner and the call.
pub fn create_selector<A, D, C>(dependencies: D, combiner: C) -> OutputSelector<A, D, C>
where
    A: Argument,
    D: Dependencies<A>,
    C: Combiner<D::Output>,
{
    SelectorCreator::default().create(dependencies, combiner)
}

