//! Selector construction errors.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// A selector could not be built from the parts it was given.
///
/// These are raised while the selector is being created, never when it is
/// called.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorError {
    /// The part where the combiner should be (last, or second to last when
    /// options are given) is not a combiner.
    MissingCombiner {
        /// What was found instead.
        found: &'static str,
    },
    /// A part in dependency position is not an input selector.
    InvalidDependency {
        /// Position of the offending part among the dependencies.
        index: usize,
        /// What was found instead.
        found: &'static str,
    },
}

impl Display for SelectorError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCombiner { found } => write!(
                formatter,
                "selector creation expects a combiner after the input selectors, found {found}"
            ),
            Self::InvalidDependency { index, found } => write!(
                formatter,
                "selector creation expects every dependency to be an input selector, \
                 found {found} at index {index}"
            ),
        }
    }
}

impl Error for SelectorError {}
