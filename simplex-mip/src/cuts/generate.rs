//! Cut construction for fractional integer variables.

use simplex_core::{Constraint, Relation, VarKind};

use crate::problem::MipProblem;

/// Which side of the fractional value a cut bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CutSide {
    /// `x ≤ threshold`.
    Upper,
    /// `x ≥ threshold`.
    Lower,
}

/// Identity of a cut; identical keys mean an identical cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CutKey {
    /// Variable being bounded.
    pub var: usize,

    /// Bounding side.
    pub side: CutSide,

    /// Integral threshold.
    pub threshold: i64,
}

/// A generated cut: its identity plus the constraint row to append.
#[derive(Debug, Clone)]
pub struct Cut {
    /// Dedup key.
    pub key: CutKey,

    /// The constraint realizing the cut.
    pub constraint: Constraint,
}

/// Build the cut for one fractional variable.
///
/// A binary variable is forced to 0 when its value is below 0.5 and to 1
/// otherwise. A general integer is bounded at its floor when the
/// fractional part is ≤ 0.5, else at its ceiling.
pub fn cut_for(prob: &MipProblem, var: usize, value: f64) -> Cut {
    let n = prob.num_vars();
    let (side, threshold) = if prob.base.var_kinds[var] == VarKind::Binary {
        if value < 0.5 {
            (CutSide::Upper, 0.0)
        } else {
            (CutSide::Lower, 1.0)
        }
    } else {
        let frac = value - value.floor();
        if frac <= 0.5 {
            (CutSide::Upper, value.floor())
        } else {
            (CutSide::Lower, value.ceil())
        }
    };

    let relation = match side {
        CutSide::Upper => Relation::Le,
        CutSide::Lower => Relation::Ge,
    };
    let mut coefs = vec![0.0; n];
    coefs[var] = 1.0;

    Cut {
        key: CutKey {
            var,
            side,
            threshold: threshold as i64,
        },
        constraint: Constraint::new(coefs, relation, threshold),
    }
}
