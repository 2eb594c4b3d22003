#![allow(
    clippy::tests_outside_test_module,
    clippy::unwrap_used,
    clippy::let_underscore_must_use,
    clippy::unused_trait_names,
    clippy::min_ident_chars,
    clippy::panic,
    reason = "Integration test harness simulating failing callbacks"
)]

use memo_selector::{Memoized, create_selector};
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
struct State {
    x: i32,
}

#[test]
fn panicking_combiner_caches_nothing() {
    let _ = env_logger::builder().is_test(true).try_init();
    let failing = Rc::new(Cell::new(true));
    let flag = Rc::clone(&failing);
    let scaled = create_selector((|state: &State| state.x,), move |x: i32| {
        if flag.get() {
            panic!("combiner failed for {x}");
        }
        x * 10
    });
    let state = State { x: 1 };

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scaled.select(&state)));
    assert!(outcome.is_err(), "the combiner's panic should reach the caller");
    assert_eq!(scaled.recomputations(), 1, "the failed attempt is still counted");
    assert!(scaled.last_result().is_none());
    assert!(scaled.memoized_result_func().last_result().is_none());

    failing.set(false);
    assert_eq!(*scaled.select(&state), 10);
    assert_eq!(scaled.recomputations(), 2);
    assert_eq!(scaled.dependency_recomputations(), 2);
}

#[test]
fn panic_keeps_the_previous_result() {
    let _ = env_logger::builder().is_test(true).try_init();
    let scaled = create_selector((|state: &State| state.x,), |x: i32| {
        if x < 0 {
            panic!("negative input {x}");
        }
        x * 10
    });

    let good = scaled.select(&State { x: 2 });
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| scaled.select(&State { x: -1 })));
    assert!(outcome.is_err());

    let previous = scaled.last_result();
    assert!(previous.is_some_and(|previous| Rc::ptr_eq(&previous, &good)));

    // The cache still holds the last successful call.
    let again = scaled.select(&State { x: 2 });
    assert!(Rc::ptr_eq(&again, &good));
    assert_eq!(scaled.recomputations(), 2);
}

#[test]
fn panicking_input_selector_propagates() {
    let _ = env_logger::builder().is_test(true).try_init();
    let checked = create_selector(
        (|state: &State| {
            if state.x == 0 {
                panic!("zero is not allowed");
            }
            state.x
        },),
        |x: i32| 100 / x,
    );

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| checked.select(&State { x: 0 })));
    assert!(outcome.is_err());
    assert_eq!(checked.recomputations(), 0, "the combiner never ran");
    assert!(checked.last_result().is_none());

    assert_eq!(*checked.select(&State { x: 4 }), 25);
    assert_eq!(checked.recomputations(), 1);
}
