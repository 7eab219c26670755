//! Post-optimal sensitivity and duality queries.
//!
//! Everything here consumes a frozen optimal [`TableauSnapshot`] — no new
//! pivoting happens. Callers are expected to pass the snapshot of an
//! Optimal solve together with the model it came from.

use crate::problem::{Constraint, Direction, Model, Relation, VarKind};
use crate::tableau::{RowOrigin, TableauSnapshot, PIVOT_EPS};

/// Allowable range for a single value with the basis staying optimal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Lower end (may be −∞).
    pub lower: f64,
    /// Upper end (may be +∞).
    pub upper: f64,
}

fn direction_sign(direction: Direction) -> f64 {
    match direction {
        Direction::Maximize => 1.0,
        Direction::Minimize => -1.0,
    }
}

/// Shadow price per original constraint: the rate of change of the optimal
/// objective per unit of right-hand side, read as the negated reduced cost
/// of the constraint's slack column (sign-adjusted for surplus columns and
/// the objective direction). `None` for equality rows (no slack column)
/// and rows dropped as redundant.
pub fn shadow_prices(snapshot: &TableauSnapshot, model: &Model) -> Vec<Option<f64>> {
    let dir = direction_sign(snapshot.direction);
    let mut prices = vec![None; model.num_constraints()];
    for (row, origin) in snapshot.row_origins.iter().enumerate() {
        let RowOrigin::Constraint(i) = *origin else {
            continue;
        };
        let Some(col) = snapshot.slack_cols[row] else {
            continue;
        };
        let flipped = model.constraints[i].rhs < 0.0;
        let mut price = dir * snapshot.slack_signs[row] * snapshot.reduced_cost(col);
        if flipped {
            // The canonical row is the negated original; a unit of original
            // rhs moves the canonical rhs the other way.
            price = -price;
        }
        prices[i] = Some(price);
    }
    prices
}

/// Allowable range of each original objective coefficient.
pub fn cost_ranges(snapshot: &TableauSnapshot, model: &Model) -> Vec<Range> {
    let dir = direction_sign(snapshot.direction);
    let mut ranges = Vec::with_capacity(model.num_vars());

    for j in 0..model.num_vars() {
        let c = model.objective[j];
        // Orientation between a min-form delta and the original coefficient.
        let orient = -dir * snapshot.var_signs[j];

        let (lo_min, hi_min) = match snapshot.basic_row(j) {
            None => (-snapshot.reduced_cost(j), f64::INFINITY),
            Some(r) => {
                let mut hi = f64::INFINITY;
                let mut lo = f64::NEG_INFINITY;
                for k in 0..snapshot.num_cols() {
                    if k == j || snapshot.basic_row(k).is_some() {
                        continue;
                    }
                    let t = snapshot.matrix[(r, k)];
                    let d = snapshot.reduced_cost(k);
                    if t > PIVOT_EPS {
                        hi = hi.min(d / t);
                    } else if t < -PIVOT_EPS {
                        lo = lo.max(d / t);
                    }
                }
                (lo, hi)
            }
        };

        let a = c + orient * lo_min;
        let b = c + orient * hi_min;
        ranges.push(Range {
            lower: a.min(b),
            upper: a.max(b),
        });
    }
    ranges
}

/// Allowable range of each original right-hand side, from a ratio test
/// over the basis-inverse column exposed by the slack. `None` for
/// equality rows and rows dropped as redundant.
pub fn rhs_ranges(snapshot: &TableauSnapshot, model: &Model) -> Vec<Option<Range>> {
    let mut ranges = vec![None; model.num_constraints()];
    for (row, origin) in snapshot.row_origins.iter().enumerate() {
        let RowOrigin::Constraint(i) = *origin else {
            continue;
        };
        let Some(col) = snapshot.slack_cols[row] else {
            continue;
        };
        let sigma = snapshot.slack_signs[row];

        // B^{-1} e_row is the slack column scaled by its sign; keeping
        // every basic value non-negative bounds the canonical-rhs delta.
        let mut lo = f64::NEG_INFINITY;
        let mut hi = f64::INFINITY;
        for r in 0..snapshot.num_rows() {
            let coef = sigma * snapshot.matrix[(r, col)];
            let rhs = snapshot.rhs(r);
            if coef > PIVOT_EPS {
                lo = lo.max(-rhs / coef);
            } else if coef < -PIVOT_EPS {
                hi = hi.min(-rhs / coef);
            }
        }

        let b = model.constraints[i].rhs;
        let flipped = b < 0.0;
        let (a, z) = if flipped { (b - hi, b - lo) } else { (b + lo, b + hi) };
        ranges[i] = Some(Range { lower: a, upper: z });
    }
    ranges
}

/// Construct the dual of a model's continuous relaxation.
///
/// Equality rows contribute a split pair of sign-restricted dual variables
/// (their difference is the free dual multiplier). Integrality on primal
/// variables is ignored: the dual is taken of the relaxation.
pub fn dual_model(model: &Model) -> Model {
    let m = model.num_constraints();
    let n = model.num_vars();
    let primal_max = model.direction == Direction::Maximize;

    // One dual variable per row, two for equality rows.
    let mut dual_kinds = Vec::new();
    let mut dual_objective = Vec::new();
    let mut row_vars: Vec<(usize, Option<usize>)> = Vec::with_capacity(m);
    for c in &model.constraints {
        let idx = dual_kinds.len();
        match c.relation {
            Relation::Eq => {
                dual_kinds.push(VarKind::NonNegative);
                dual_kinds.push(VarKind::NonPositive);
                dual_objective.push(c.rhs);
                dual_objective.push(c.rhs);
                row_vars.push((idx, Some(idx + 1)));
            }
            Relation::Le | Relation::Ge => {
                let natural = if primal_max {
                    c.relation == Relation::Le
                } else {
                    c.relation == Relation::Ge
                };
                dual_kinds.push(if natural {
                    VarKind::NonNegative
                } else {
                    VarKind::NonPositive
                });
                dual_objective.push(c.rhs);
                row_vars.push((idx, None));
            }
        }
    }

    // One dual constraint per primal variable: A^T y vs c.
    let nd = dual_kinds.len();
    let mut dual_constraints = Vec::with_capacity(n);
    for j in 0..n {
        let mut coefs = vec![0.0; nd];
        for (i, c) in model.constraints.iter().enumerate() {
            let (a, b) = row_vars[i];
            coefs[a] = c.coefs[j];
            if let Some(b) = b {
                coefs[b] = c.coefs[j];
            }
        }
        let nonpositive = model.var_kinds[j] == VarKind::NonPositive;
        let relation = match (primal_max, nonpositive) {
            (true, false) => Relation::Ge,
            (true, true) => Relation::Le,
            (false, false) => Relation::Le,
            (false, true) => Relation::Ge,
        };
        dual_constraints.push(Constraint::new(coefs, relation, model.objective[j]));
    }

    Model {
        direction: if primal_max {
            Direction::Minimize
        } else {
            Direction::Maximize
        },
        objective: dual_objective,
        constraints: dual_constraints,
        var_kinds: dual_kinds,
    }
}
