//! Call counters for selector introspection.
//!
//! Counters record how often a selector actually did work, as opposed to
//! answering from a cache. They are shared between the selector handle and
//! the closures its memoizers wrap, so they live behind an `Rc`.

use std::cell::Cell;
use std::rc::Rc;

/// A monotonically increasing count that can be reset to zero.
///
/// Selectors are single-owner values, so the count is a plain `Cell`
/// rather than an atomic.
#[derive(Debug, Default)]
pub struct Counter {
    current: Cell<usize>,
}

impl Counter {
    /// Create a counter starting at zero.
    #[inline]
    pub const fn new() -> Self {
        Self {
            current: Cell::new(0),
        }
    }

    /// Get the current count.
    #[inline]
    pub fn get(&self) -> usize {
        self.current.get()
    }

    /// Increment and return the new count.
    #[inline]
    pub fn increment(&self) -> usize {
        let next = self.current.get() + 1;
        self.current.set(next);
        next
    }

    /// Reset the count to zero.
    #[inline]
    pub fn reset(&self) {
        self.current.set(0);
    }
}

/// A counter shared between a selector and the closures it hands to its
/// memoizers.
pub type SharedCounter = Rc<Counter>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increments_and_resets() {
        let counter = Counter::new();
        assert_eq!(counter.get(), 0);
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        counter.reset();
        assert_eq!(counter.get(), 0);
    }
}
