//! Tests for the special-case analyzer against real solves.

use simplex_core::analysis::{characterize, check_feasibility, extreme_ray};
use simplex_core::{
    solve_default, Constraint, Direction, Model, Relation, SolveStatus, SolverOptions,
};

fn le(coefs: Vec<f64>, rhs: f64) -> Constraint {
    Constraint::new(coefs, Relation::Le, rhs)
}

fn ge(coefs: Vec<f64>, rhs: f64) -> Constraint {
    Constraint::new(coefs, Relation::Ge, rhs)
}

#[test]
fn test_parallel_equalities_flag_infeasible_without_pivoting() {
    let model = Model::new(
        Direction::Minimize,
        vec![1.0, 1.0],
        vec![
            Constraint::new(vec![1.0, 2.0], Relation::Eq, 3.0),
            Constraint::new(vec![2.0, 4.0], Relation::Eq, 7.0),
        ],
    );
    let result = solve_default(&model).unwrap();
    assert_eq!(result.status, SolveStatus::Infeasible);
    assert_eq!(result.iterations, 0);

    let report = check_feasibility(&model, &SolverOptions::default()).unwrap();
    assert!(!report.feasible);
    assert_eq!(report.conflicting_constraints, vec![0, 1]);
}

#[test]
fn test_phase_one_identifies_conflicting_constraint() {
    // x <= 1 together with x >= 3: the >= row keeps its artificial.
    let model = Model::new(
        Direction::Maximize,
        vec![1.0],
        vec![le(vec![1.0], 1.0), ge(vec![1.0], 3.0)],
    );
    let report = check_feasibility(&model, &SolverOptions::default()).unwrap();

    assert!(!report.feasible);
    assert!(report.artificial_sum > 1.0);
    assert_eq!(report.conflicting_constraints, vec![1]);
}

#[test]
fn test_phase_one_confirms_feasibility() {
    let model = Model::new(
        Direction::Minimize,
        vec![1.0, 1.0],
        vec![ge(vec![1.0, 1.0], 2.0), le(vec![1.0, 0.0], 5.0)],
    );
    let report = check_feasibility(&model, &SolverOptions::default()).unwrap();

    assert!(report.feasible);
    assert!(report.artificial_sum.abs() < 1e-9);
    assert!(report.conflicting_constraints.is_empty());
}

#[test]
fn test_extreme_ray_reconstruction() {
    // max x1 s.t. x1 - x2 <= 1: the ray (1, 1) improves forever.
    let model = Model::new(
        Direction::Maximize,
        vec![1.0, 0.0],
        vec![le(vec![1.0, -1.0], 1.0)],
    );
    let result = solve_default(&model).unwrap();
    assert_eq!(result.status, SolveStatus::Unbounded);

    let snapshot = result.snapshot.expect("unbounded solve keeps its snapshot");
    let ray = extreme_ray(&snapshot).expect("an improving direction exists");
    assert_eq!(ray.len(), 2);

    // Walking along the ray stays feasible and improves the objective.
    let start = &result.assignment;
    for step in [1.0, 10.0, 1000.0] {
        let point: Vec<f64> = start.iter().zip(&ray).map(|(x, d)| x + step * d).collect();
        assert!(model.is_feasible(&point, 1e-9), "ray left the feasible region");
        assert!(model.objective_at(&point) > model.objective_at(start));
    }
}

#[test]
fn test_degenerate_basis_recommends_bland() {
    // max x s.t. x <= 0: x enters at value zero.
    let model = Model::new(Direction::Maximize, vec![1.0], vec![le(vec![1.0], 0.0)]);
    let result = solve_default(&model).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);

    let character = characterize(&result.snapshot.unwrap(), 1e-6);
    assert!(character.degenerate);
    assert!(character.bland_recommended);
    assert!(!character.alternate_optima);
}

#[test]
fn test_alternate_optima_detection() {
    // max x + y s.t. x + y <= 1: every point on the facet is optimal.
    let model = Model::new(
        Direction::Maximize,
        vec![1.0, 1.0],
        vec![le(vec![1.0, 1.0], 1.0)],
    );
    let result = solve_default(&model).unwrap();
    assert_eq!(result.status, SolveStatus::Optimal);

    let character = characterize(&result.snapshot.unwrap(), 1e-6);
    assert!(character.alternate_optima);
    assert!(!character.degenerate);
}

#[test]
fn test_unique_nondegenerate_optimum_is_clean() {
    let model = Model::new(
        Direction::Maximize,
        vec![3.0, 2.0],
        vec![le(vec![1.0, 1.0], 4.0), le(vec![1.0, 3.0], 6.0)],
    );
    let result = solve_default(&model).unwrap();

    let character = characterize(&result.snapshot.unwrap(), 1e-6);
    assert!(!character.degenerate);
    assert!(!character.alternate_optima);
}
