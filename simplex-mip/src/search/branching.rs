//! Branching variable selection and child construction.

use simplex_core::{Constraint, Relation, VarKind};

use crate::problem::{FractionalVar, MipProblem};

/// A branching decision: the variable, its relaxed value, and the two
/// child constraints.
#[derive(Debug, Clone)]
pub struct BranchDecision {
    /// Variable to branch on.
    pub var: usize,

    /// Relaxed (fractional) value.
    pub value: f64,

    /// Fractional distance from the nearest feasible value.
    pub distance: f64,

    /// "Down" child constraint: `x ≤ floor(value)`, or fix to 0 for a
    /// binary variable.
    pub down: Constraint,

    /// "Up" child constraint: `x ≥ ceil(value)`, or fix to 1 for a
    /// binary variable.
    pub up: Constraint,
}

/// Select the integer variable with the largest fractional distance from
/// its nearest feasible value; ties keep the lowest index.
///
/// Returns None when the point is already integer-feasible.
pub fn select_branching(prob: &MipProblem, x: &[f64], tol: f64) -> Option<BranchDecision> {
    let fractional = prob.fractional_vars(x, tol);
    let chosen = fractional.iter().fold(None::<&FractionalVar>, |best, f| match best {
        Some(b) if f.distance <= b.distance => best,
        _ => Some(f),
    })?;

    let n = prob.num_vars();
    let (down, up) = if prob.base.var_kinds[chosen.var] == VarKind::Binary {
        (
            unit_constraint(n, chosen.var, Relation::Le, 0.0),
            unit_constraint(n, chosen.var, Relation::Ge, 1.0),
        )
    } else {
        (
            unit_constraint(n, chosen.var, Relation::Le, chosen.value.floor()),
            unit_constraint(n, chosen.var, Relation::Ge, chosen.value.ceil()),
        )
    };

    Some(BranchDecision {
        var: chosen.var,
        value: chosen.value,
        distance: chosen.distance,
        down,
        up,
    })
}

fn unit_constraint(n: usize, var: usize, relation: Relation, rhs: f64) -> Constraint {
    let mut coefs = vec![0.0; n];
    coefs[var] = 1.0;
    Constraint::new(coefs, relation, rhs)
}
