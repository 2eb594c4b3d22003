//! Memoized derived-value selectors.
//!
//! A selector computes a value from a shared source state through a set of
//! input selectors and a combiner, and skips the work when nothing it
//! depends on has changed:
//! - Outer memoization on the raw call arguments
//! - Inner memoization of the combiner on the input selectors' results
//! - Pluggable memoization strategies behind the [`Memoize`] trait
//! - A debug-build check that flags input selectors returning different
//!   results for the same arguments
//!
//! # Architecture
//!
//! ```text
//! raw arguments
//!     ↓  outer memoizer (args_memoize)
//! dependency resolution (input selectors, in order)
//!     ↓  optional input stability check
//! dependency results
//!     ↓  inner memoizer (memoize)
//! combiner → result
//! ```
//!
//! # Example
//!
//! ```
//! use memo_selector::create_selector;
//! use std::rc::Rc;
//!
//! #[derive(Debug, PartialEq, Eq)]
//! struct Todo {
//!     done: bool,
//! }
//!
//! #[derive(Debug, PartialEq, Eq)]
//! struct State {
//!     todos: Rc<Vec<Todo>>,
//!     filter_done: bool,
//! }
//!
//! let visible = create_selector(
//!     (
//!         |state: &Rc<State>| Rc::clone(&state.todos),
//!         |state: &Rc<State>| state.filter_done,
//!     ),
//!     |todos: Rc<Vec<Todo>>, done: bool| todos.iter().filter(|todo| todo.done == done).count(),
//! );
//!
//! // Selectors are input selectors themselves.
//! let summary = create_selector((visible.clone(),), |count: Rc<usize>| format!("{count} visible"));
//!
//! let state = Rc::new(State {
//!     todos: Rc::new(vec![Todo { done: true }, Todo { done: false }]),
//!     filter_done: true,
//! });
//! assert_eq!(*summary.select(&state), "1 visible");
//! assert_eq!(*summary.select(&state), "1 visible");
//! assert_eq!(visible.recomputations(), 1);
//! ```

#![allow(
    clippy::module_name_repetitions,
    reason = "Selector types like SelectorCreator are clearer than just Creator"
)]
#![allow(clippy::missing_panics_doc, reason = "Panics come from user callbacks")]

mod args;
mod combiner;
mod counter;
mod creator;
mod dependency;
mod equality;
mod error;
mod options;
mod selector;

pub mod memoize;

// Re-exports
pub use args::{ArgList, Argument, DependencyList, Mismatch, Single};
pub use combiner::{Combiner, DynCombiner};
pub use creator::{
    CreatorConfig, CreatorOptions, PartsSelector, SelectorCreator, SelectorPart, create_selector,
    create_selector_creator,
};
pub use dependency::{Dependencies, DynInputSelector, InputSelector};
pub use equality::{EqualityCheck, SameValue};
pub use error::SelectorError;
pub use memoize::{LastCall, LastCallMemoize, Memoize, Memoized};
pub use options::{
    MemoizeOptions, SelectorOptions, StabilityCheck, global_input_stability_check,
    set_global_input_stability_check,
};
pub use selector::OutputSelector;
