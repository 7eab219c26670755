//! Two-phase tableau simplex pipeline.
//!
//! `solve` canonicalizes a model, seats a slack basis where one exists,
//! routes the rest through a Phase-I artificial solve, and pivots to
//! optimality with Dantzig's rule. Every outcome is surfaced through
//! [`SolveStatus`]; only invalid models abort with an error.

use std::time::Instant;

use crate::analysis;
use crate::error::{SolverError, SolverResult};
use crate::problem::{Direction, Model, Relation, SolveResult, SolveStatus, SolverOptions, VarKind};
use crate::tableau::{CanonRow, CanonicalForm, RowOrigin, Tableau, PIVOT_EPS, ZERO_EPS};

/// Solve a model with explicit options.
pub fn solve(model: &Model, options: &SolverOptions) -> SolverResult<SolveResult> {
    model.validate().map_err(SolverError::InvalidModel)?;

    // Pre-checks flag contradictions before any pivot executes.
    if let Some(row) = analysis::trivial_contradiction(model) {
        log::debug!("constraint {row} is a trivial contradiction");
        return Ok(SolveResult::infeasible());
    }
    if let Some((a, b)) = analysis::parallel_equality_conflict(model) {
        log::debug!("equality constraints {a} and {b} are parallel but inconsistent");
        return Ok(SolveResult::infeasible());
    }

    let form = canonicalize(model);
    let (mut tableau, missing) = Tableau::build(&form);
    let mut iterations = 0;
    let started = Instant::now();

    if !missing.is_empty() {
        // Phase I: artificial columns for the basis-less rows, minimized
        // to zero through the same pivot kernel.
        tableau.add_artificials(&missing);
        tableau.install_phase1_objective();
        match pivot_to_optimality(&mut tableau, &mut iterations, options, started, "phase 1") {
            LoopExit::Optimal => {}
            LoopExit::Unbounded { .. } => {
                // The artificial sum is bounded below by zero; an unbounded
                // Phase I means the numerics broke down.
                return Ok(SolveResult {
                    status: SolveStatus::Error,
                    objective: f64::NAN,
                    assignment: vec![0.0; model.num_vars()],
                    iterations,
                    snapshot: Some(tableau.snapshot(&form)),
                });
            }
            LoopExit::IterationLimit => {
                return Ok(iteration_limited(&tableau, &form, iterations));
            }
        }
        if tableau.min_objective() > ZERO_EPS {
            return Ok(SolveResult {
                status: SolveStatus::Infeasible,
                objective: f64::NAN,
                assignment: vec![0.0; model.num_vars()],
                iterations,
                snapshot: Some(tableau.snapshot(&form)),
            });
        }
        retire_artificials(&mut tableau);
    }

    tableau.install_objective(&form.obj_min);
    let exit = pivot_to_optimality(&mut tableau, &mut iterations, options, started, "phase 2");
    let result = match exit {
        LoopExit::Optimal => {
            let assignment = assemble_assignment(&tableau, &form);
            let objective = model.objective_at(&assignment);
            SolveResult {
                status: SolveStatus::Optimal,
                objective,
                assignment,
                iterations,
                snapshot: Some(tableau.snapshot(&form)),
            }
        }
        LoopExit::Unbounded { entering } => {
            log::debug!("column {entering} improves without a blocking row");
            let objective = match model.direction {
                Direction::Maximize => f64::INFINITY,
                Direction::Minimize => f64::NEG_INFINITY,
            };
            SolveResult {
                status: SolveStatus::Unbounded,
                objective,
                assignment: assemble_assignment(&tableau, &form),
                iterations,
                snapshot: Some(tableau.snapshot(&form)),
            }
        }
        LoopExit::IterationLimit => iteration_limited(&tableau, &form, iterations),
    };
    Ok(result)
}

/// Solve with default options.
pub fn solve_default(model: &Model) -> SolverResult<SolveResult> {
    solve(model, &SolverOptions::default())
}

enum LoopExit {
    Optimal,
    Unbounded { entering: usize },
    IterationLimit,
}

/// Pivot until no objective-row coefficient is below −ε, the ratio test
/// finds no blocking row, or the shared iteration/time budget runs out.
/// The deadline is evaluated once per pivot iteration.
fn pivot_to_optimality(
    tableau: &mut Tableau,
    iterations: &mut usize,
    options: &SolverOptions,
    started: Instant,
    phase: &str,
) -> LoopExit {
    loop {
        if let Some(limit) = options.time_limit_ms {
            if started.elapsed().as_millis() as u64 >= limit {
                return LoopExit::IterationLimit;
            }
        }
        let Some(entering) = tableau.entering_column() else {
            return LoopExit::Optimal;
        };
        let Some(leaving) = tableau.leaving_row(entering) else {
            return LoopExit::Unbounded { entering };
        };
        if *iterations >= options.max_iterations {
            return LoopExit::IterationLimit;
        }
        tableau.pivot(leaving, entering);
        *iterations += 1;
        if options.show_steps {
            log::info!(
                "{} pivot {}: column {} enters, row {} leaves, objective {:.6}",
                phase,
                iterations,
                entering,
                leaving,
                tableau.min_objective(),
            );
        }
    }
}

/// Pivot every basic artificial out of the basis (they sit at zero level
/// after a feasible Phase I); rows with no non-artificial pivot candidate
/// are redundant and dropped. Then the artificial block is removed.
fn retire_artificials(tableau: &mut Tableau) {
    let Some((start, count)) = tableau.artificials else {
        return;
    };
    let mut redundant = Vec::new();
    for i in 0..tableau.num_rows() {
        let b = tableau.basis[i];
        if b >= start && b < start + count {
            match (0..start).find(|&j| tableau.m[(i, j)].abs() > PIVOT_EPS) {
                Some(j) => tableau.pivot(i, j),
                None => redundant.push(i),
            }
        }
    }
    for &i in redundant.iter().rev() {
        tableau.remove_row(i);
    }
    tableau.remove_artificials();
}

fn iteration_limited(tableau: &Tableau, form: &CanonicalForm, iterations: usize) -> SolveResult {
    SolveResult {
        status: SolveStatus::IterationLimit,
        objective: f64::NAN,
        assignment: assemble_assignment(tableau, form),
        iterations,
        snapshot: Some(tableau.snapshot(form)),
    }
}

/// Read the structural assignment off the basis mapping; non-structural
/// basics are ignored, non-positive variables are substituted back.
fn assemble_assignment(tableau: &Tableau, form: &CanonicalForm) -> Vec<f64> {
    let mut x = vec![0.0; form.num_structural];
    let rhs = tableau.rhs_col();
    for (i, &b) in tableau.basis.iter().enumerate() {
        if b < form.num_structural {
            x[b] = tableau.m[(i, rhs)];
        }
    }
    for (xj, &sign) in x.iter_mut().zip(&form.var_signs) {
        *xj *= sign;
    }
    x
}

/// Lower variable kinds and normalize right-hand-side signs.
///
/// Non-positive variables are substituted (x = −y), binary variables gain
/// an `x ≤ 1` row, and any row with a negative right-hand side is negated
/// with its relation flipped, so the tableau only ever sees non-negative
/// right-hand sides. The objective is stored in minimization form: direct
/// coefficients when minimizing, negated when maximizing.
pub(crate) fn canonicalize(model: &Model) -> CanonicalForm {
    let n = model.num_vars();
    let var_signs: Vec<f64> = model
        .var_kinds
        .iter()
        .map(|k| if *k == VarKind::NonPositive { -1.0 } else { 1.0 })
        .collect();

    let mut rows = Vec::with_capacity(model.num_constraints());
    for (i, c) in model.constraints.iter().enumerate() {
        let mut coefs: Vec<f64> = c.coefs.iter().zip(&var_signs).map(|(a, s)| a * s).collect();
        let mut relation = c.relation;
        let mut rhs = c.rhs;
        if rhs < 0.0 {
            for a in &mut coefs {
                *a = -*a;
            }
            rhs = -rhs;
            relation = relation.flipped();
        }
        rows.push(CanonRow {
            coefs,
            relation,
            rhs,
            origin: RowOrigin::Constraint(i),
        });
    }

    for (j, kind) in model.var_kinds.iter().enumerate() {
        if *kind == VarKind::Binary {
            let mut coefs = vec![0.0; n];
            coefs[j] = 1.0;
            rows.push(CanonRow {
                coefs,
                relation: Relation::Le,
                rhs: 1.0,
                origin: RowOrigin::BinaryBound(j),
            });
        }
    }

    let dir_sign = match model.direction {
        Direction::Maximize => -1.0,
        Direction::Minimize => 1.0,
    };
    let obj_min: Vec<f64> = model
        .objective
        .iter()
        .zip(&var_signs)
        .map(|(c, s)| c * s * dir_sign)
        .collect();

    CanonicalForm {
        rows,
        obj_min,
        var_signs,
        direction: model.direction,
        num_structural: n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::Constraint;

    #[test]
    fn test_canonicalize_flips_negative_rhs() {
        let model = Model::new(
            Direction::Minimize,
            vec![1.0],
            vec![Constraint::new(vec![2.0], Relation::Le, -4.0)],
        );
        let form = canonicalize(&model);
        assert_eq!(form.rows[0].relation, Relation::Ge);
        assert_eq!(form.rows[0].rhs, 4.0);
        assert_eq!(form.rows[0].coefs, vec![-2.0]);
    }

    #[test]
    fn test_canonicalize_negates_objective_when_maximizing() {
        let model = Model::new(Direction::Maximize, vec![3.0, -2.0], vec![]);
        let form = canonicalize(&model);
        assert_eq!(form.obj_min, vec![-3.0, 2.0]);
    }

    #[test]
    fn test_canonicalize_lowers_nonpositive() {
        let mut model = Model::new(
            Direction::Minimize,
            vec![1.0],
            vec![Constraint::new(vec![1.0], Relation::Ge, -5.0)],
        );
        model.var_kinds = vec![VarKind::NonPositive];
        let form = canonicalize(&model);
        // x substituted by -y, then the negative rhs flips the row.
        assert_eq!(form.obj_min, vec![-1.0]);
        assert_eq!(form.rows[0].relation, Relation::Le);
        assert_eq!(form.rows[0].coefs, vec![1.0]);
        assert_eq!(form.rows[0].rhs, 5.0);
    }

    #[test]
    fn test_canonicalize_appends_binary_bound_rows() {
        let mut model = Model::new(Direction::Maximize, vec![1.0, 1.0], vec![]);
        model.var_kinds = vec![VarKind::Binary, VarKind::Continuous];
        let form = canonicalize(&model);
        assert_eq!(form.rows.len(), 1);
        assert_eq!(form.rows[0].origin, RowOrigin::BinaryBound(0));
        assert_eq!(form.rows[0].rhs, 1.0);
    }
}
