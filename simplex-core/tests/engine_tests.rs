//! End-to-end tests for the two-phase simplex pipeline.

use simplex_core::{
    solve, solve_default, Constraint, Direction, Model, Relation, SolveStatus, SolverOptions,
    VarKind,
};

fn le(coefs: Vec<f64>, rhs: f64) -> Constraint {
    Constraint::new(coefs, Relation::Le, rhs)
}

fn ge(coefs: Vec<f64>, rhs: f64) -> Constraint {
    Constraint::new(coefs, Relation::Ge, rhs)
}

fn eq(coefs: Vec<f64>, rhs: f64) -> Constraint {
    Constraint::new(coefs, Relation::Eq, rhs)
}

#[test]
fn test_optimum_satisfies_constraints_and_objective() {
    // max 3x + 2y s.t. x + y <= 4, x + 3y <= 6
    let model = Model::new(
        Direction::Maximize,
        vec![3.0, 2.0],
        vec![le(vec![1.0, 1.0], 4.0), le(vec![1.0, 3.0], 6.0)],
    );
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!(
        model.is_feasible(&result.assignment, 1e-9),
        "assignment violates a constraint: {:?}",
        result.assignment
    );
    // Reported objective equals the recomputation from original coefficients.
    let recomputed = model.objective_at(&result.assignment);
    assert!((result.objective - recomputed).abs() < 1e-9);
    assert!((result.objective - 12.0).abs() < 1e-9);
}

#[test]
fn test_redundant_zero_row_does_not_change_optimum() {
    let base = Model::new(
        Direction::Maximize,
        vec![3.0, 2.0],
        vec![le(vec![1.0, 1.0], 4.0), le(vec![1.0, 3.0], 6.0)],
    );
    let padded = base.with_constraints(&[le(vec![0.0, 0.0], 0.0)]);

    let a = solve_default(&base).unwrap();
    let b = solve_default(&padded).unwrap();

    assert_eq!(a.status, SolveStatus::Optimal);
    assert_eq!(b.status, SolveStatus::Optimal);
    assert!((a.objective - b.objective).abs() < 1e-9);
}

#[test]
fn test_zero_coefficients_ge_rhs_is_infeasible_before_pivoting() {
    let model = Model::new(
        Direction::Maximize,
        vec![1.0],
        vec![ge(vec![0.0], 5.0)],
    );
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Infeasible);
    // The pre-check fires before any tableau exists.
    assert_eq!(result.iterations, 0);
    assert!(result.snapshot.is_none());
}

#[test]
fn test_unbounded_instance() {
    // max x1 s.t. x1 - x2 <= 1: pushing x2 frees x1 without bound.
    let model = Model::new(
        Direction::Maximize,
        vec![1.0, 0.0],
        vec![le(vec![1.0, -1.0], 1.0)],
    );
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Unbounded);
    assert!(result.objective.is_infinite() && result.objective > 0.0);
    assert!(result.snapshot.is_some(), "ray reconstruction needs the snapshot");
}

#[test]
fn test_unbounded_minimization_reports_negative_infinity() {
    let model = Model::new(
        Direction::Minimize,
        vec![-1.0, 0.0],
        vec![le(vec![1.0, -1.0], 1.0)],
    );
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Unbounded);
    assert!(result.objective.is_infinite() && result.objective < 0.0);
}

#[test]
fn test_ge_rows_route_through_phase_one() {
    // min x + y s.t. x + y >= 2, x <= 5
    let model = Model::new(
        Direction::Minimize,
        vec![1.0, 1.0],
        vec![ge(vec![1.0, 1.0], 2.0), le(vec![1.0, 0.0], 5.0)],
    );
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!((result.objective - 2.0).abs() < 1e-9);
    assert!(model.is_feasible(&result.assignment, 1e-9));
}

#[test]
fn test_equality_constraints() {
    // max x + y s.t. x + y = 4, x <= 3
    let model = Model::new(
        Direction::Maximize,
        vec![1.0, 1.0],
        vec![eq(vec![1.0, 1.0], 4.0), le(vec![1.0, 0.0], 3.0)],
    );
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!((result.objective - 4.0).abs() < 1e-9);
    let sum = result.assignment[0] + result.assignment[1];
    assert!((sum - 4.0).abs() < 1e-9);
}

#[test]
fn test_conflicting_bounds_are_infeasible() {
    // x <= 1 and x >= 3 cannot hold together; Phase I proves it.
    let model = Model::new(
        Direction::Maximize,
        vec![1.0],
        vec![le(vec![1.0], 1.0), ge(vec![1.0], 3.0)],
    );
    let result = solve_default(&model).unwrap();
    assert_eq!(result.status, SolveStatus::Infeasible);
}

#[test]
fn test_iteration_cap_reports_limit_with_nan_objective() {
    // Needs two pivots; allow one.
    let model = Model::new(
        Direction::Maximize,
        vec![1.0, 1.0],
        vec![le(vec![1.0, 0.0], 1.0), le(vec![0.0, 1.0], 1.0)],
    );
    let options = SolverOptions::default().with_max_iterations(1);
    let result = solve(&model, &options).unwrap();

    assert_eq!(result.status, SolveStatus::IterationLimit);
    assert!(result.objective.is_nan());
    assert_eq!(result.iterations, 1);
    assert!(result.snapshot.is_some());
}

#[test]
fn test_expired_deadline_stops_before_pivoting() {
    let model = Model::new(
        Direction::Maximize,
        vec![1.0, 1.0],
        vec![le(vec![1.0, 0.0], 1.0), le(vec![0.0, 1.0], 1.0)],
    );
    let options = SolverOptions::default().with_time_limit_ms(0);
    let result = solve(&model, &options).unwrap();

    assert_eq!(result.status, SolveStatus::IterationLimit);
    assert_eq!(result.iterations, 0);
}

#[test]
fn test_negative_rhs_is_canonicalized() {
    // -x - y <= -2 is x + y >= 2 in disguise.
    let model = Model::new(
        Direction::Minimize,
        vec![1.0, 2.0],
        vec![le(vec![-1.0, -1.0], -2.0)],
    );
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!((result.objective - 2.0).abs() < 1e-9);
    assert!((result.assignment[0] - 2.0).abs() < 1e-9);
}

#[test]
fn test_nonpositive_variable() {
    // min x with x >= -5 and x non-positive: x = -5.
    let mut model = Model::new(
        Direction::Minimize,
        vec![1.0],
        vec![ge(vec![1.0], -5.0)],
    );
    model.var_kinds = vec![VarKind::NonPositive];
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!((result.objective - -5.0).abs() < 1e-9);
    assert!((result.assignment[0] - -5.0).abs() < 1e-9);
}

#[test]
fn test_binary_kind_bounds_the_relaxation() {
    // max x with x binary: the relaxation tops out at x = 1.
    let mut model = Model::new(Direction::Maximize, vec![1.0], vec![]);
    model.var_kinds = vec![VarKind::Binary];
    let result = solve_default(&model).unwrap();

    assert_eq!(result.status, SolveStatus::Optimal);
    assert!((result.objective - 1.0).abs() < 1e-9);
}

#[test]
fn test_show_steps_traces_pivots() {
    let _ = env_logger::builder().is_test(true).try_init();
    let model = Model::new(
        Direction::Maximize,
        vec![3.0, 2.0],
        vec![le(vec![1.0, 1.0], 4.0), le(vec![1.0, 3.0], 6.0)],
    );
    let options = SolverOptions::default().with_show_steps(true);
    let result = solve(&model, &options).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);
}

#[test]
fn test_invalid_model_is_a_hard_failure() {
    let model = Model::new(
        Direction::Maximize,
        vec![1.0, 1.0],
        vec![le(vec![1.0], 1.0)], // wrong coefficient count
    );
    assert!(solve_default(&model).is_err());
}

#[test]
fn test_repeated_solves_are_bit_identical() {
    let model = Model::new(
        Direction::Maximize,
        vec![3.0, 2.0, 1.0],
        vec![
            le(vec![1.0, 1.0, 1.0], 10.0),
            ge(vec![1.0, 0.0, 1.0], 2.0),
            eq(vec![0.0, 1.0, 1.0], 4.0),
        ],
    );
    let options = SolverOptions::default();
    let a = solve(&model, &options).unwrap();
    let b = solve(&model, &options).unwrap();

    assert_eq!(a.status, b.status);
    assert_eq!(a.objective.to_bits(), b.objective.to_bits());
    assert_eq!(a.iterations, b.iterations);
    let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
    assert_eq!(bits(&a.assignment), bits(&b.assignment));
}
