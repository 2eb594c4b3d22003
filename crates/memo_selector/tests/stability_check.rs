#![allow(
    clippy::tests_outside_test_module,
    clippy::unwrap_used,
    clippy::let_underscore_must_use,
    clippy::unused_trait_names,
    clippy::min_ident_chars,
    reason = "Integration test harness"
)]

use memo_selector::{
    EqualityCheck, LastCallMemoize, Memoized, MemoizeOptions, SelectorCreator, SelectorOptions,
    StabilityCheck,
};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
struct State {
    x: i32,
}

/// Treats every pair of values as different.
#[derive(Clone, Copy, Debug, Default)]
struct AlwaysDifferent;

impl EqualityCheck for AlwaysDifferent {
    fn equals<T: PartialEq + 'static>(&self, _left: &T, _right: &T) -> bool {
        false
    }
}

/// An impure input selector: returns a new number on every call.
fn ticking() -> impl Fn(&State) -> u32 + 'static {
    let ticks = Rc::new(Cell::new(0));
    move |_state: &State| {
        ticks.set(ticks.get() + 1);
        ticks.get()
    }
}

/// Reports are only produced by debug builds.
const fn expected_reports(reports: usize) -> usize {
    if cfg!(debug_assertions) { reports } else { 0 }
}

fn with_check(check: StabilityCheck) -> SelectorOptions<LastCallMemoize, LastCallMemoize> {
    SelectorOptions::new().input_stability_check(check)
}

#[test]
fn never_skips_the_check() {
    let _ = env_logger::builder().is_test(true).try_init();
    let selector = SelectorCreator::default().create_with(
        (ticking(), |state: &State| state.x),
        |tick: u32, x: i32| format!("{tick}:{x}"),
        with_check(StabilityCheck::Never),
    );

    assert_eq!(*selector.select(&State { x: 1 }), "1:1");
    assert_eq!(*selector.select(&State { x: 2 }), "2:2");
    assert_eq!(selector.unstable_input_reports(), 0);
    assert_eq!(selector.input_stability_check(), StabilityCheck::Never);
}

#[test]
fn once_reports_on_the_first_computation_only() {
    let _ = env_logger::builder().is_test(true).try_init();
    let selector = SelectorCreator::default().create_with(
        (ticking(), |state: &State| state.x),
        |tick: u32, x: i32| format!("{tick}:{x}"),
        with_check(StabilityCheck::Once),
    );

    for x in 1..=3 {
        selector.select(&State { x });
    }

    assert_eq!(selector.unstable_input_reports(), expected_reports(1));
    assert_eq!(selector.dependency_recomputations(), 3);
}

#[test]
fn once_clears_even_without_a_report() {
    let _ = env_logger::builder().is_test(true).try_init();
    let flaky = Rc::new(Cell::new(false));
    let switch = Rc::clone(&flaky);
    let ticks = ticking();
    // Stable on the first computation, unstable afterwards.
    let input = move |state: &State| if switch.get() { ticks(state) } else { 0 };

    let selector = SelectorCreator::default().create_with(
        (input,),
        |tick: u32| tick,
        with_check(StabilityCheck::Once),
    );

    selector.select(&State { x: 1 });
    flaky.set(true);
    selector.select(&State { x: 2 });
    selector.select(&State { x: 3 });

    assert_eq!(selector.unstable_input_reports(), 0);
}

#[test]
fn always_reports_on_every_computation() {
    let _ = env_logger::builder().is_test(true).try_init();
    let selector = SelectorCreator::default().create_with(
        (ticking(), |state: &State| state.x),
        |tick: u32, x: i32| format!("{tick}:{x}"),
        with_check(StabilityCheck::Always),
    );

    for x in 1..=3 {
        selector.select(&State { x });
    }
    // Outer cache hit: no computation, no check.
    selector.select(&State { x: 3 });

    assert_eq!(selector.unstable_input_reports(), expected_reports(3));
}

#[test]
fn stable_inputs_are_never_reported() {
    let _ = env_logger::builder().is_test(true).try_init();
    let selector = SelectorCreator::default().create_with(
        (
            |state: &State| vec![state.x; 3],
            |state: &State| Rc::new(vec![state.x]),
            |state: &State| state.x * 2,
        ),
        |values: Vec<i32>, shared: Rc<Vec<i32>>, doubled: i32| {
            values.iter().sum::<i32>() + shared.len() as i32 + doubled
        },
        with_check(StabilityCheck::Always),
    );

    for x in 0..5 {
        selector.select(&State { x });
    }

    // Fresh allocations with equal contents are equal by value.
    assert_eq!(selector.unstable_input_reports(), 0);
    assert_eq!(selector.recomputations(), 5);
}

#[test]
fn the_check_never_changes_the_result() {
    let _ = env_logger::builder().is_test(true).try_init();
    let checked = SelectorCreator::default().create_with(
        (ticking(),),
        |tick: u32| tick,
        with_check(StabilityCheck::Always),
    );
    let unchecked = SelectorCreator::default().create_with(
        (ticking(),),
        |tick: u32| tick,
        with_check(StabilityCheck::Never),
    );

    // The checked selector's ticker ran twice, but its first result wins.
    assert_eq!(*checked.select(&State { x: 1 }), 1);
    assert_eq!(*unchecked.select(&State { x: 1 }), 1);
}

#[test]
fn comparisons_follow_the_combiner_memoizer() {
    let _ = env_logger::builder().is_test(true).try_init();
    let creator = SelectorCreator::with_memoize(
        LastCallMemoize::with_equality(AlwaysDifferent),
        MemoizeOptions::none(),
    );
    let selector = creator.create_with(
        (|state: &State| state.x,),
        |x: i32| x + 1,
        SelectorOptions::new().input_stability_check(StabilityCheck::Always),
    );

    selector.select(&State { x: 1 });
    selector.select(&State { x: 2 });

    assert_eq!(selector.unstable_input_reports(), expected_reports(2));
}

#[test]
fn mismatches_name_the_offending_position() {
    let _ = env_logger::builder().is_test(true).try_init();
    let selector = SelectorCreator::default().create(
        (|state: &State| state.x, |state: &State| state.x * 2),
        |x: i32, doubled: i32| x + doubled,
    );

    let mismatches = selector
        .memoized_result_func()
        .unstable_positions(&(1, 2), &(1, 3));

    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].index, 1);
    assert_eq!(mismatches[0].first, "2");
    assert_eq!(mismatches[0].second, "3");
}
