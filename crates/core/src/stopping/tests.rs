use std::time::Duration;

use super::{
    Criterion, CriterionError, CriterionState, Evaluation, GroupOp, Shape, StoppingRule,
    combine_all, combine_any, evaluate, get_reason, has_stopped, indicates_convergence,
    indicates_convergence_at, summary,
};

/// The "state" in these tests is just whether the flag rule is met.
type C = Criterion<(), (), bool>;

/// A convergence rule that is met while the state flag is set.
struct Flag;

impl StoppingRule<(), (), bool> for Flag {
    fn is_met(&self, _problem: &(), _algorithm: &(), state: &bool) -> bool {
        *state
    }

    fn describe(&self) -> String {
        "Flag".to_string()
    }
}

/// A rule that is always met but only signals a resource limit.
struct Budget;

impl StoppingRule<(), (), bool> for Budget {
    fn is_met(&self, _problem: &(), _algorithm: &(), _state: &bool) -> bool {
        true
    }

    fn indicates_convergence(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "Budget".to_string()
    }
}

fn eval(criterion: &C, criterion_state: &mut CriterionState, iteration: usize) -> Evaluation {
    eval_with(criterion, criterion_state, iteration, false)
}

fn eval_with(
    criterion: &C,
    criterion_state: &mut CriterionState,
    iteration: usize,
    flag: bool,
) -> Evaluation {
    evaluate(&(), &(), &flag, criterion, criterion_state, iteration).expect("state matches")
}

/// Returns the first iteration in `0..=limit` at which the criterion stops.
fn first_stop(criterion: &C, limit: usize) -> Option<usize> {
    let mut criterion_state = CriterionState::new(criterion);
    (0..=limit).find(|&iteration| eval(criterion, &mut criterion_state, iteration).stopped)
}

// --- Combination ---

#[test]
fn combine_all_is_associative_and_flat() {
    let (a, b, c) = (C::after_iteration(1), C::after_iteration(2), C::after_iteration(3));

    let left = combine_all(combine_all(a.clone(), b.clone()), c.clone());
    let right = combine_all(a.clone(), combine_all(b.clone(), c.clone()));

    let expected = C::all(vec![a, b, c]).expect("non-empty");
    assert_eq!(left, expected);
    assert_eq!(right, expected);
}

#[test]
fn combine_any_is_associative_and_flat() {
    let (a, b, c) = (C::after_iteration(1), C::rule(Flag), C::after_iteration(3));

    let left = combine_any(combine_any(a.clone(), b.clone()), c.clone());
    let right = a.clone() | (b.clone() | c.clone());

    let expected = C::any(vec![a, b, c]).expect("non-empty");
    assert_eq!(left, expected);
    assert_eq!(right, expected);
}

#[test]
fn combining_two_groups_concatenates_children() {
    let (a, b, c, d) = (
        C::after_iteration(1),
        C::after_iteration(2),
        C::after_iteration(3),
        C::after_iteration(4),
    );

    let combined = (a.clone() & b.clone()) & (c.clone() & d.clone());

    assert_eq!(combined, C::all(vec![a, b, c, d]).expect("non-empty"));
}

#[test]
fn mixing_operators_nests() {
    let (x, y, z) = (C::after_iteration(1), C::after_iteration(2), C::after_iteration(3));

    let combined = x.clone() & (y.clone() | z.clone());

    let group = combined.as_group().expect("group");
    assert_eq!(group.op(), GroupOp::All);
    assert_eq!(group.children().len(), 2);
    assert_eq!(group.children()[0], x);
    let nested = group.children()[1].as_group().expect("nested group");
    assert_eq!(nested.op(), GroupOp::Any);
    assert_eq!(nested.children(), &[y, z]);
}

#[test]
fn explicit_groups_must_be_non_empty() {
    assert_eq!(C::all(vec![]), Err(CriterionError::EmptyGroup(GroupOp::All)));
    assert_eq!(C::any(vec![]), Err(CriterionError::EmptyGroup(GroupOp::Any)));
}

// --- Convergence classification ---

#[test]
fn resource_limits_never_indicate_convergence() {
    assert!(!indicates_convergence(&C::after_iteration(5)));
    assert!(!indicates_convergence(&C::after_duration(Duration::from_secs(1))));
    assert!(!indicates_convergence(&C::rule(Budget)));
    assert!(indicates_convergence(&C::rule(Flag)));
}

#[test]
fn groups_indicate_convergence_only_if_every_child_does() {
    assert!(indicates_convergence(&(C::rule(Flag) | C::rule(Flag))));
    assert!(indicates_convergence(&(C::rule(Flag) & C::rule(Flag))));
    assert!(!indicates_convergence(&(C::rule(Flag) & C::after_iteration(5))));
    assert!(!indicates_convergence(&(C::after_iteration(5) | C::rule(Flag))));
}

#[test]
fn any_with_a_resource_limit_is_not_converged_after_stopping() {
    let criterion = C::after_iteration(5) | C::rule(Flag);
    let mut criterion_state = CriterionState::new(&criterion);

    let evaluation = eval_with(&criterion, &mut criterion_state, 3, true);

    assert!(evaluation.stopped);
    assert!(!evaluation.converged);
    assert!(!indicates_convergence_at(&criterion, &criterion_state));
}

#[test]
fn convergence_rule_stop_reports_converged() {
    let criterion = C::rule(Flag);
    let mut criterion_state = CriterionState::new(&criterion);

    assert_eq!(eval(&criterion, &mut criterion_state, 0), Evaluation::default());

    let evaluation = eval_with(&criterion, &mut criterion_state, 1, true);
    assert!(evaluation.stopped);
    assert!(evaluation.converged);
    assert_eq!(evaluation.reason, "Flag: reached at iteration 1");
    assert!(indicates_convergence_at(&criterion, &criterion_state));
}

// --- Leaf evaluation ---

#[test]
fn after_iteration_triggers_once_at_max() {
    let criterion = C::after_iteration(3);
    let mut criterion_state = CriterionState::new(&criterion);

    for iteration in 0..3 {
        assert!(!eval(&criterion, &mut criterion_state, iteration).stopped);
        assert_eq!(criterion_state.at_iteration(), None);
    }

    let evaluation = eval(&criterion, &mut criterion_state, 3);
    assert!(evaluation.stopped);
    assert!(!evaluation.converged);
    assert_eq!(criterion_state.at_iteration(), Some(3));

    let evaluation = eval(&criterion, &mut criterion_state, 4);
    assert!(evaluation.stopped);
    assert_eq!(criterion_state.at_iteration(), Some(3));
    assert_eq!(evaluation.reason, "Max Iterations (3): reached at iteration 3");
}

#[test]
fn after_iteration_zero_stops_before_first_step() {
    let criterion = C::after_iteration(0);
    let mut criterion_state = CriterionState::new(&criterion);

    assert!(eval(&criterion, &mut criterion_state, 0).stopped);
    assert_eq!(criterion_state.at_iteration(), Some(0));
}

#[test]
fn reason_embeds_trigger_iteration() {
    let criterion = C::after_iteration(200);
    let mut criterion_state = CriterionState::new(&criterion);

    let evaluation = eval(&criterion, &mut criterion_state, 200);

    assert_eq!(evaluation.reason, "Max Iterations (200): reached at iteration 200");
    assert_eq!(get_reason(&criterion, &criterion_state), evaluation.reason);
}

#[test]
fn iteration_zero_clears_previous_trigger() {
    let criterion = C::after_iteration(2);
    let mut criterion_state = CriterionState::new(&criterion);

    assert!(eval(&criterion, &mut criterion_state, 2).stopped);
    assert!(!eval(&criterion, &mut criterion_state, 0).stopped);
    assert_eq!(criterion_state.at_iteration(), None);
}

#[test]
fn zero_duration_stops_immediately() {
    let criterion = C::after_duration(Duration::ZERO);
    let mut criterion_state = CriterionState::new(&criterion);

    let evaluation = eval(&criterion, &mut criterion_state, 0);

    assert!(evaluation.stopped);
    assert!(!evaluation.converged);
    assert!(
        evaluation
            .reason
            .starts_with("Max Duration (0ns): reached at iteration 0 after")
    );
}

#[test]
fn long_duration_records_start_and_elapsed() {
    let criterion = C::after_duration(Duration::from_secs(3600));
    let mut criterion_state = CriterionState::new(&criterion);

    assert!(!eval(&criterion, &mut criterion_state, 0).stopped);
    let CriterionState::Duration(first) = criterion_state else {
        panic!("expected a duration state");
    };
    assert!(first.start().is_some());
    assert_eq!(first.elapsed(), Duration::ZERO);

    assert!(!eval(&criterion, &mut criterion_state, 1).stopped);
    let CriterionState::Duration(second) = criterion_state else {
        panic!("expected a duration state");
    };
    assert_eq!(second.start(), first.start());
    assert_eq!(second.at_iteration(), None);
}

#[test]
fn duration_marker_holds_after_threshold_passes() {
    let criterion = C::after_duration(Duration::from_millis(20));
    let mut criterion_state = CriterionState::new(&criterion);

    assert!(!eval(&criterion, &mut criterion_state, 0).stopped);
    std::thread::sleep(Duration::from_millis(30));

    let evaluation = eval(&criterion, &mut criterion_state, 3);
    assert!(evaluation.stopped);
    assert_eq!(criterion_state.at_iteration(), Some(3));

    let evaluation = eval(&criterion, &mut criterion_state, 4);
    assert!(evaluation.stopped);
    assert_eq!(criterion_state.at_iteration(), Some(3));
    assert!(
        evaluation
            .reason
            .starts_with("Max Duration (20ms): reached at iteration 3 after")
    );
}

#[test]
fn rule_marker_follows_condition() {
    let criterion = C::rule(Flag);
    let mut criterion_state = CriterionState::new(&criterion);

    assert!(eval_with(&criterion, &mut criterion_state, 1, true).stopped);
    assert!(eval_with(&criterion, &mut criterion_state, 2, true).stopped);
    assert_eq!(criterion_state.at_iteration(), Some(1));

    assert!(!eval_with(&criterion, &mut criterion_state, 3, false).stopped);
    assert_eq!(criterion_state.at_iteration(), None);
    assert_eq!(get_reason(&criterion, &criterion_state), "");
}

// --- Group evaluation ---

#[test]
fn all_stops_at_the_last_child() {
    let criterion = C::after_iteration(5) & C::after_iteration(10);
    assert_eq!(first_stop(&criterion, 20), Some(10));
}

#[test]
fn any_stops_at_the_first_child() {
    let criterion = C::after_iteration(5) | C::after_iteration(10);
    assert_eq!(first_stop(&criterion, 20), Some(5));
}

#[test]
fn groups_evaluate_every_child() {
    let criterion = C::after_iteration(0) | C::after_duration(Duration::from_secs(3600));
    let mut criterion_state = CriterionState::new(&criterion);

    assert!(eval(&criterion, &mut criterion_state, 0).stopped);

    let CriterionState::Duration(duration) = criterion_state.children()[1] else {
        panic!("expected a duration state");
    };
    assert!(duration.start().is_some());
}

#[test]
fn any_reason_joins_stopped_children() {
    let criterion = C::after_iteration(2) | C::after_iteration(10) | C::after_iteration(3);
    let mut criterion_state = CriterionState::new(&criterion);

    for iteration in 0..=3 {
        eval(&criterion, &mut criterion_state, iteration);
    }

    assert_eq!(
        get_reason(&criterion, &criterion_state),
        "Max Iterations (2): reached at iteration 2; Max Iterations (3): reached at iteration 3"
    );
}

#[test]
fn all_reason_is_empty_until_every_child_stops() {
    let criterion = C::after_iteration(1) & C::after_iteration(2);
    let mut criterion_state = CriterionState::new(&criterion);

    let evaluation = eval(&criterion, &mut criterion_state, 1);
    assert!(!evaluation.stopped);
    assert_eq!(evaluation.reason, "");
    assert_eq!(get_reason(&criterion, &criterion_state), "");

    let evaluation = eval(&criterion, &mut criterion_state, 2);
    assert!(evaluation.stopped);
    assert_eq!(
        evaluation.reason,
        "Max Iterations (1): reached at iteration 1; Max Iterations (2): reached at iteration 2"
    );
}

#[test]
fn nested_groups_derive_status_from_children() {
    let criterion = C::after_iteration(4) & (C::rule(Flag) | C::after_iteration(6));
    let mut criterion_state = CriterionState::new(&criterion);

    assert!(!eval_with(&criterion, &mut criterion_state, 4, false).stopped);
    assert!(!has_stopped(&criterion, &criterion_state));

    let evaluation = eval_with(&criterion, &mut criterion_state, 5, true);
    assert!(evaluation.stopped);
    assert!(!evaluation.converged);
    assert!(has_stopped(&criterion, &criterion_state));
    assert_eq!(
        evaluation.reason,
        "Max Iterations (4): reached at iteration 4; Flag: reached at iteration 5"
    );
}

// --- Structure and reporting ---

#[test]
fn mismatched_state_fails_without_updating() {
    let criterion = C::after_iteration(0) | C::after_iteration(1);
    let other = C::after_iteration(0) | C::after_iteration(1) | C::after_iteration(2);
    let mut criterion_state = CriterionState::new(&other);
    let before = criterion_state.clone();

    let err = evaluate(&(), &(), &false, &criterion, &mut criterion_state, 0).unwrap_err();

    assert_eq!(err.expected, Shape::Group(2));
    assert_eq!(err.found, Shape::Group(3));
    assert_eq!(criterion_state, before);
}

#[test]
fn leaf_of_the_wrong_kind_has_not_stopped() {
    let criterion = C::after_iteration(1);
    let mut duration_state = CriterionState::new(&C::after_duration(Duration::ZERO));
    eval(&C::after_duration(Duration::ZERO), &mut duration_state, 0);
    assert_eq!(duration_state.at_iteration(), Some(0));

    assert!(!has_stopped(&criterion, &duration_state));
    assert_eq!(get_reason(&criterion, &duration_state), "");
}

#[test]
fn leaf_state_for_group_is_a_mismatch() {
    let criterion = C::after_iteration(0) & C::after_iteration(1);
    let mut criterion_state = CriterionState::new(&C::after_iteration(0));

    let err = evaluate(&(), &(), &false, &criterion, &mut criterion_state, 0).unwrap_err();

    assert_eq!(err.expected, Shape::Group(2));
    assert_eq!(err.found, Shape::Marker);
}

#[test]
fn summary_describes_parameters_and_status() {
    let criterion = C::after_iteration(5) | C::after_duration(Duration::from_secs(60));
    let mut criterion_state = CriterionState::new(&criterion);

    assert_eq!(
        summary(&criterion, &criterion_state),
        "Stop When Any (2): not reached [Max Iterations (5): not reached; Max Duration (60s): not reached]"
    );

    eval(&criterion, &mut criterion_state, 5);

    assert_eq!(
        summary(&criterion, &criterion_state),
        "Stop When Any (2): reached [Max Iterations (5): reached; Max Duration (60s): not reached]"
    );
    assert_eq!(
        summary(&C::after_iteration(15), &CriterionState::new(&C::after_iteration(15))),
        "Max Iterations (15): not reached"
    );
}
