//! Selector configuration.
//!
//! Options are resolved in three layers, each field independently:
//! 1. per-selector [`SelectorOptions`]
//! 2. the creator's defaults
//! 3. built-in fallbacks (the last-call memoizer, no memoize options, and the
//!    process-wide input stability check)

use crate::memoize::Memoize;
use anyhow::anyhow;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};

/// How often a selector re-runs its input selectors to detect unstable ones.
///
/// Checks only ever run in debug builds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum StabilityCheck {
    /// Never check.
    Never,
    /// Check on the first computation only.
    #[default]
    Once,
    /// Check on every computation.
    Always,
}

impl StabilityCheck {
    const fn to_raw(self) -> u8 {
        match self {
            Self::Never => 0,
            Self::Once => 1,
            Self::Always => 2,
        }
    }

    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Never,
            2 => Self::Always,
            _ => Self::Once,
        }
    }
}

impl Display for StabilityCheck {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Never => "never",
            Self::Once => "once",
            Self::Always => "always",
        };
        formatter.write_str(name)
    }
}

impl FromStr for StabilityCheck {
    type Err = anyhow::Error;

    fn from_str(text: &str) -> anyhow::Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "never" => Ok(Self::Never),
            "once" => Ok(Self::Once),
            "always" => Ok(Self::Always),
            other => Err(anyhow!(
                "unknown input stability check frequency {other:?}, expected never, once or always"
            )),
        }
    }
}

/// Process-wide default for selectors that do not choose their own
/// [`StabilityCheck`].
///
/// Expected to be written once at startup (or per test); selectors read it
/// when they are created, not when they are called.
static GLOBAL_INPUT_STABILITY_CHECK: AtomicU8 = AtomicU8::new(StabilityCheck::Once.to_raw());

/// Set the process-wide default input stability check.
///
/// Affects selectors created after this call only.
pub fn set_global_input_stability_check(check: StabilityCheck) {
    GLOBAL_INPUT_STABILITY_CHECK.store(check.to_raw(), Ordering::Relaxed);
}

/// The current process-wide default input stability check.
pub fn global_input_stability_check() -> StabilityCheck {
    StabilityCheck::from_raw(GLOBAL_INPUT_STABILITY_CHECK.load(Ordering::Relaxed))
}

/// Extra configuration handed to a memoizer after the wrapped function.
///
/// Most memoizers take a single leading option such as a comparator, so a
/// single value is wrapped into a one-element list; a list is passed through
/// unchanged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoizeOptions<O>(Vec<O>);

impl<O> MemoizeOptions<O> {
    /// No options.
    #[inline]
    pub const fn none() -> Self {
        Self(Vec::new())
    }

    /// A single option, wrapped into a one-element list.
    #[inline]
    pub fn single(option: O) -> Self {
        Self(vec![option])
    }

    /// An option list, used verbatim.
    #[inline]
    pub const fn list(options: Vec<O>) -> Self {
        Self(options)
    }

    /// The normalized option list.
    #[inline]
    pub fn as_slice(&self) -> &[O] {
        &self.0
    }
}

impl<O> Default for MemoizeOptions<O> {
    fn default() -> Self {
        Self::none()
    }
}

/// Per-selector overrides. Every field left unset falls back to the
/// creator's default.
///
/// # Example
///
/// ```
/// use memo_selector::{LastCallMemoize, SelectorOptions, StabilityCheck};
///
/// let options: SelectorOptions<LastCallMemoize, LastCallMemoize> =
///     SelectorOptions::new().input_stability_check(StabilityCheck::Never);
/// ```
#[derive(Clone, Debug)]
pub struct SelectorOptions<M: Memoize, AM: Memoize> {
    pub(crate) memoize: Option<M>,
    pub(crate) memoize_options: Option<MemoizeOptions<M::Options>>,
    pub(crate) args_memoize: Option<AM>,
    pub(crate) args_memoize_options: Option<MemoizeOptions<AM::Options>>,
    pub(crate) input_stability_check: Option<StabilityCheck>,
}

impl<M: Memoize, AM: Memoize> Default for SelectorOptions<M, AM> {
    fn default() -> Self {
        Self {
            memoize: None,
            memoize_options: None,
            args_memoize: None,
            args_memoize_options: None,
            input_stability_check: None,
        }
    }
}

impl<M: Memoize, AM: Memoize> SelectorOptions<M, AM> {
    /// Options overriding nothing.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoizer wrapping the combiner.
    #[must_use]
    pub fn memoize(mut self, memoize: M) -> Self {
        self.memoize = Some(memoize);
        self
    }

    /// Options for the combiner's memoizer.
    #[must_use]
    pub fn memoize_options(mut self, options: MemoizeOptions<M::Options>) -> Self {
        self.memoize_options = Some(options);
        self
    }

    /// Memoizer wrapping the whole selector call.
    #[must_use]
    pub fn args_memoize(mut self, args_memoize: AM) -> Self {
        self.args_memoize = Some(args_memoize);
        self
    }

    /// Options for the selector call's memoizer.
    #[must_use]
    pub fn args_memoize_options(mut self, options: MemoizeOptions<AM::Options>) -> Self {
        self.args_memoize_options = Some(options);
        self
    }

    /// How often to check input selectors for stability.
    #[must_use]
    pub fn input_stability_check(mut self, check: StabilityCheck) -> Self {
        self.input_stability_check = Some(check);
        self
    }
}

/// Creator-level defaults with every memoizer field resolved.
#[derive(Clone, Debug)]
pub(crate) struct EffectiveOptions<M: Memoize, AM: Memoize> {
    pub memoize: M,
    pub memoize_options: MemoizeOptions<M::Options>,
    pub args_memoize: AM,
    pub args_memoize_options: MemoizeOptions<AM::Options>,
    pub input_stability_check: Option<StabilityCheck>,
}

impl<M: Memoize, AM: Memoize> EffectiveOptions<M, AM> {
    /// Shallow-merge `overrides` over these defaults, field by field.
    pub fn merged_with(&self, overrides: SelectorOptions<M, AM>) -> Self {
        Self {
            memoize: overrides.memoize.unwrap_or_else(|| self.memoize.clone()),
            memoize_options: overrides
                .memoize_options
                .unwrap_or_else(|| self.memoize_options.clone()),
            args_memoize: overrides
                .args_memoize
                .unwrap_or_else(|| self.args_memoize.clone()),
            args_memoize_options: overrides
                .args_memoize_options
                .unwrap_or_else(|| self.args_memoize_options.clone()),
            input_stability_check: overrides
                .input_stability_check
                .or(self.input_stability_check),
        }
    }

    /// The stability check a selector built now should use.
    pub fn resolved_stability_check(&self) -> StabilityCheck {
        self.input_stability_check
            .unwrap_or_else(global_input_stability_check)
    }
}
