//! Special-case analysis around the simplex engine.
//!
//! Infeasibility pre-checks that run before any pivot, the Phase-I
//! feasibility probe (an auxiliary model solved through the same engine),
//! unboundedness-ray reconstruction, and degeneracy / multiple-optima
//! detection against a terminal tableau.

use crate::engine;
use crate::error::SolverResult;
use crate::problem::{Constraint, Direction, Model, Relation, SolveStatus, SolverOptions, VarKind};
use crate::tableau::{TableauSnapshot, PIVOT_EPS, ZERO_EPS};

/// Find a constraint whose coefficients are all ≈0 but whose relation
/// against its right-hand side cannot hold (e.g. `0 ≥ 5`).
pub fn trivial_contradiction(model: &Model) -> Option<usize> {
    model.constraints.iter().position(|c| {
        if c.coefs.iter().any(|a| a.abs() > ZERO_EPS) {
            return false;
        }
        match c.relation {
            Relation::Le => c.rhs < -ZERO_EPS,
            Relation::Ge => c.rhs > ZERO_EPS,
            Relation::Eq => c.rhs.abs() > ZERO_EPS,
        }
    })
}

/// Find a pair of equality constraints with proportional coefficient
/// vectors whose right-hand sides are not related by the same ratio.
///
/// O(m²n) over the equality rows.
pub fn parallel_equality_conflict(model: &Model) -> Option<(usize, usize)> {
    let equalities: Vec<(usize, &Constraint)> = model
        .constraints
        .iter()
        .enumerate()
        .filter(|(_, c)| c.relation == Relation::Eq)
        .collect();

    for (a, &(ia, ca)) in equalities.iter().enumerate() {
        for &(ib, cb) in &equalities[a + 1..] {
            if let Some(ratio) = proportion_ratio(&ca.coefs, &cb.coefs) {
                if (cb.rhs - ratio * ca.rhs).abs() > ZERO_EPS {
                    return Some((ia, ib));
                }
            }
        }
    }
    None
}

/// Ratio r with b = r·a, or None if the vectors are not proportional.
fn proportion_ratio(a: &[f64], b: &[f64]) -> Option<f64> {
    let lead = a.iter().position(|v| v.abs() > ZERO_EPS)?;
    if b[lead].abs() <= ZERO_EPS {
        return None;
    }
    let ratio = b[lead] / a[lead];
    let consistent = a
        .iter()
        .zip(b)
        .all(|(&ai, &bi)| (bi - ratio * ai).abs() <= ZERO_EPS * ratio.abs().max(1.0));
    consistent.then_some(ratio)
}

/// Outcome of the Phase-I feasibility probe.
#[derive(Debug, Clone)]
pub struct FeasibilityReport {
    /// Whether a feasible point exists.
    pub feasible: bool,

    /// Indices of original constraints whose artificial variable stayed
    /// nonzero — the rows that cannot be jointly satisfied.
    pub conflicting_constraints: Vec<usize>,

    /// Optimal artificial-variable sum (≈0 when feasible).
    pub artificial_sum: f64,
}

/// Build the Phase-I auxiliary model.
///
/// Original variables keep their kinds at zero cost; each ≥/= constraint
/// (after right-hand-side sign normalization) gains a unit-cost artificial
/// variable with a +1 coefficient on its own row and zero elsewhere. The
/// returned map gives the original constraint index behind each artificial.
pub fn phase_one_model(model: &Model) -> (Model, Vec<usize>) {
    let n = model.num_vars();

    // Normalize rhs signs first so the artificial placement matches what
    // the engine's canonicalization will see.
    let mut rows: Vec<Constraint> = Vec::with_capacity(model.num_constraints());
    for c in &model.constraints {
        if c.rhs < 0.0 {
            rows.push(Constraint::new(
                c.coefs.iter().map(|a| -a).collect(),
                c.relation.flipped(),
                -c.rhs,
            ));
        } else {
            rows.push(c.clone());
        }
    }

    let needs_artificial: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, c)| c.relation != Relation::Le)
        .map(|(i, _)| i)
        .collect();
    let na = needs_artificial.len();

    let mut constraints = Vec::with_capacity(rows.len());
    for (i, c) in rows.into_iter().enumerate() {
        let mut coefs = c.coefs;
        coefs.resize(n + na, 0.0);
        if let Some(k) = needs_artificial.iter().position(|&r| r == i) {
            coefs[n + k] = 1.0;
        }
        constraints.push(Constraint::new(coefs, c.relation, c.rhs));
    }

    let mut objective = vec![0.0; n + na];
    for c in objective.iter_mut().skip(n) {
        *c = 1.0;
    }
    let mut var_kinds = model.var_kinds.clone();
    var_kinds.resize(n + na, VarKind::NonNegative);

    let aux = Model {
        direction: Direction::Minimize,
        objective,
        constraints,
        var_kinds,
    };
    (aux, needs_artificial)
}

/// Probe feasibility by minimizing the artificial-variable sum of the
/// auxiliary model through the engine.
pub fn check_feasibility(model: &Model, options: &SolverOptions) -> SolverResult<FeasibilityReport> {
    if let Some(row) = trivial_contradiction(model) {
        return Ok(FeasibilityReport {
            feasible: false,
            conflicting_constraints: vec![row],
            artificial_sum: f64::NAN,
        });
    }
    if let Some((a, b)) = parallel_equality_conflict(model) {
        return Ok(FeasibilityReport {
            feasible: false,
            conflicting_constraints: vec![a, b],
            artificial_sum: f64::NAN,
        });
    }

    let n = model.num_vars();
    let (aux, artificial_rows) = phase_one_model(model);
    let result = engine::solve(&aux, options)?;

    // The auxiliary model always admits the all-artificial basis and its
    // objective is bounded below by zero; anything but Optimal means the
    // probe itself was cut short.
    if result.status != SolveStatus::Optimal {
        return Ok(FeasibilityReport {
            feasible: false,
            conflicting_constraints: Vec::new(),
            artificial_sum: f64::NAN,
        });
    }

    let artificial_sum: f64 = result.assignment[n..].iter().sum();
    let conflicting: Vec<usize> = result.assignment[n..]
        .iter()
        .enumerate()
        .filter(|(_, &v)| v > ZERO_EPS)
        .map(|(k, _)| artificial_rows[k])
        .collect();

    Ok(FeasibilityReport {
        feasible: artificial_sum <= ZERO_EPS,
        conflicting_constraints: conflicting,
        artificial_sum,
    })
}

/// Reconstruct an improving direction from an unbounded terminal tableau.
///
/// Looks for a non-basic column whose reduced cost still favors improvement
/// while every constraint-row coefficient is ≤ ε: the ray has a unit
/// component for the entering variable and, per basic row, the negated
/// tableau coefficient for that row's basic variable.
pub fn extreme_ray(snapshot: &TableauSnapshot) -> Option<Vec<f64>> {
    let rows = snapshot.num_rows();
    for j in 0..snapshot.num_cols() {
        if snapshot.basic_row(j).is_some() {
            continue;
        }
        if snapshot.reduced_cost(j) >= -PIVOT_EPS {
            continue;
        }
        if (0..rows).any(|i| snapshot.matrix[(i, j)] > PIVOT_EPS) {
            continue;
        }

        let mut ray = vec![0.0; snapshot.num_structural];
        if j < snapshot.num_structural {
            ray[j] = 1.0;
        }
        for (i, &b) in snapshot.basis.iter().enumerate() {
            if b < snapshot.num_structural {
                ray[b] = -snapshot.matrix[(i, j)];
            }
        }
        for (r, &sign) in ray.iter_mut().zip(&snapshot.var_signs) {
            *r *= sign;
        }
        return Some(ray);
    }
    None
}

/// Qualitative character of an optimal basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolutionCharacter {
    /// Some basic variable sits at ≈0.
    pub degenerate: bool,

    /// Some non-basic column has reduced cost ≈0: other optimal vertices
    /// exist.
    pub alternate_optima: bool,

    /// Smallest-index (Bland's) pivoting is recommended to avoid cycling.
    /// Advisory only; the engine keeps its default tie-breaks.
    pub bland_recommended: bool,
}

/// Classify degeneracy and multiple optima at a terminal tableau.
pub fn characterize(snapshot: &TableauSnapshot, tol: f64) -> SolutionCharacter {
    let degenerate = (0..snapshot.num_rows()).any(|i| snapshot.rhs(i).abs() <= tol);
    let alternate_optima = (0..snapshot.num_cols())
        .any(|j| snapshot.basic_row(j).is_none() && snapshot.reduced_cost(j).abs() <= tol);
    SolutionCharacter {
        degenerate,
        alternate_optima,
        bland_recommended: degenerate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_contradiction() {
        let model = Model::new(
            Direction::Maximize,
            vec![1.0],
            vec![Constraint::new(vec![0.0], Relation::Ge, 5.0)],
        );
        assert_eq!(trivial_contradiction(&model), Some(0));

        let ok = Model::new(
            Direction::Maximize,
            vec![1.0],
            vec![Constraint::new(vec![0.0], Relation::Le, 5.0)],
        );
        assert_eq!(trivial_contradiction(&ok), None);

        let zero_eq = Model::new(
            Direction::Maximize,
            vec![1.0],
            vec![Constraint::new(vec![0.0], Relation::Eq, 0.0)],
        );
        assert_eq!(trivial_contradiction(&zero_eq), None);
    }

    #[test]
    fn test_parallel_equality_conflict() {
        let model = Model::new(
            Direction::Minimize,
            vec![1.0, 1.0],
            vec![
                Constraint::new(vec![1.0, 1.0], Relation::Eq, 2.0),
                Constraint::new(vec![2.0, 2.0], Relation::Eq, 5.0),
            ],
        );
        assert_eq!(parallel_equality_conflict(&model), Some((0, 1)));

        // Consistent ratio: 2x the coefficients, 2x the rhs.
        let consistent = Model::new(
            Direction::Minimize,
            vec![1.0, 1.0],
            vec![
                Constraint::new(vec![1.0, 1.0], Relation::Eq, 2.0),
                Constraint::new(vec![2.0, 2.0], Relation::Eq, 4.0),
            ],
        );
        assert_eq!(parallel_equality_conflict(&consistent), None);

        // Not proportional at all.
        let skew = Model::new(
            Direction::Minimize,
            vec![1.0, 1.0],
            vec![
                Constraint::new(vec![1.0, 1.0], Relation::Eq, 2.0),
                Constraint::new(vec![1.0, 2.0], Relation::Eq, 9.0),
            ],
        );
        assert_eq!(parallel_equality_conflict(&skew), None);
    }

    #[test]
    fn test_phase_one_model_shape() {
        let model = Model::new(
            Direction::Maximize,
            vec![1.0, 1.0],
            vec![
                Constraint::new(vec![1.0, 1.0], Relation::Le, 4.0),
                Constraint::new(vec![1.0, 0.0], Relation::Ge, 1.0),
                Constraint::new(vec![0.0, 1.0], Relation::Eq, 2.0),
            ],
        );
        let (aux, rows) = phase_one_model(&model);

        assert_eq!(rows, vec![1, 2]);
        assert_eq!(aux.num_vars(), 4);
        assert_eq!(aux.direction, Direction::Minimize);
        assert_eq!(aux.objective, vec![0.0, 0.0, 1.0, 1.0]);
        // Artificial coefficient sits on its own row only.
        assert_eq!(aux.constraints[1].coefs[2], 1.0);
        assert_eq!(aux.constraints[2].coefs[2], 0.0);
        assert_eq!(aux.constraints[2].coefs[3], 1.0);
    }

    #[test]
    fn test_phase_one_flips_negative_rhs_before_placing_artificials() {
        // x1 <= -1 flips to -x1 >= 1, which needs an artificial.
        let model = Model::new(
            Direction::Minimize,
            vec![1.0],
            vec![Constraint::new(vec![1.0], Relation::Le, -1.0)],
        );
        let (aux, rows) = phase_one_model(&model);
        assert_eq!(rows, vec![0]);
        assert_eq!(aux.constraints[0].relation, Relation::Ge);
        assert_eq!(aux.constraints[0].rhs, 1.0);
    }
}
