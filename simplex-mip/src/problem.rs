//! MIP problem wrapper and solution types.

use simplex_core::{Direction, Model, VarKind};

use crate::error::{MipError, MipResult};

/// A fractional integer variable in a relaxation solution.
#[derive(Debug, Clone, Copy)]
pub struct FractionalVar {
    /// Variable index.
    pub var: usize,

    /// Relaxed value.
    pub value: f64,

    /// Fractional distance from the nearest feasible value.
    pub distance: f64,
}

/// Mixed-integer problem wrapper.
///
/// Holds the immutable base model and the extracted integrality index
/// sets; search layers derive per-node relaxations from the base by
/// appending their overlay constraints.
#[derive(Debug, Clone)]
pub struct MipProblem {
    /// The base model shared by every relaxation.
    pub base: Model,

    /// Indices of integer variables (includes binary).
    pub integer_vars: Vec<usize>,

    /// Indices of binary variables (subset of `integer_vars`).
    pub binary_vars: Vec<usize>,
}

impl MipProblem {
    /// Wrap a model, extracting integer/binary variable indices.
    pub fn new(base: Model) -> MipResult<Self> {
        base.validate().map_err(MipError::InvalidProblem)?;

        let mut integer_vars = Vec::new();
        let mut binary_vars = Vec::new();
        for (i, kind) in base.var_kinds.iter().enumerate() {
            match kind {
                VarKind::Integer => integer_vars.push(i),
                VarKind::Binary => {
                    integer_vars.push(i);
                    binary_vars.push(i);
                }
                _ => {}
            }
        }

        Ok(Self {
            base,
            integer_vars,
            binary_vars,
        })
    }

    /// Number of structural variables.
    pub fn num_vars(&self) -> usize {
        self.base.num_vars()
    }

    /// Number of integer variables (including binary).
    pub fn num_integers(&self) -> usize {
        self.integer_vars.len()
    }

    /// Fractional distance of a value from its nearest feasible point:
    /// distance to the nearest integer, or for binaries to the nearest of
    /// {0, 1}.
    pub fn distance(&self, var: usize, value: f64) -> f64 {
        if self.base.var_kinds[var] == VarKind::Binary {
            value.abs().min((value - 1.0).abs())
        } else {
            (value - value.round()).abs()
        }
    }

    /// Check whether every integer variable is feasible within tolerance.
    pub fn is_integer_feasible(&self, x: &[f64], tol: f64) -> bool {
        self.integer_vars.iter().all(|&i| self.distance(i, x[i]) <= tol)
    }

    /// Integer variables whose relaxed value is non-integral, in index
    /// order.
    pub fn fractional_vars(&self, x: &[f64], tol: f64) -> Vec<FractionalVar> {
        self.integer_vars
            .iter()
            .filter_map(|&i| {
                let distance = self.distance(i, x[i]);
                (distance > tol).then_some(FractionalVar {
                    var: i,
                    value: x[i],
                    distance,
                })
            })
            .collect()
    }

    /// Round integer variables in place: binaries to the nearest of
    /// {0, 1}, general integers to the nearest integer.
    pub fn round_integers(&self, x: &mut [f64]) {
        for &i in &self.integer_vars {
            x[i] = if self.base.var_kinds[i] == VarKind::Binary {
                x[i].round().clamp(0.0, 1.0)
            } else {
                x[i].round()
            };
        }
    }
}

/// Status of a MIP solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipStatus {
    /// An integer-feasible optimum (under the search caps) was found.
    Optimal,

    /// No integer-feasible point exists: the search frontier was
    /// exhausted without hitting any cap.
    Infeasible,

    /// The relaxation is unbounded.
    Unbounded,

    /// A cap truncated the search before any integer-feasible point was
    /// found; nothing is proven.
    SearchLimit,

    /// A relaxation solve failed in a way that ended the search.
    Error,
}

impl MipStatus {
    /// Returns true if an integer-feasible solution was found.
    pub fn has_solution(&self) -> bool {
        matches!(self, MipStatus::Optimal)
    }
}

/// Complete MIP solution with search diagnostics.
#[derive(Debug, Clone)]
pub struct MipSolution {
    /// Solve status.
    pub status: MipStatus,

    /// Best integer-feasible assignment (empty if none).
    pub assignment: Vec<f64>,

    /// Objective of the best assignment (NaN if none).
    pub objective: f64,

    /// Branch-and-bound nodes explored, or cutting-plane rounds used.
    pub nodes_explored: u64,

    /// Cuts added during the solve.
    pub cuts_added: u64,

    /// Whether a cap truncated the search (the result may be suboptimal
    /// even when an incumbent exists).
    pub truncated: bool,
}

impl MipSolution {
    /// A solution carrying no integer-feasible point.
    pub fn without_solution(status: MipStatus) -> Self {
        Self {
            status,
            assignment: Vec::new(),
            objective: f64::NAN,
            nodes_explored: 0,
            cuts_added: 0,
            truncated: false,
        }
    }
}

/// Tracks the best known integer-feasible solution.
#[derive(Debug, Clone)]
pub struct IncumbentTracker {
    /// Current best assignment, if any.
    pub solution: Option<Vec<f64>>,

    /// Objective of the incumbent; the worst value for the direction
    /// until one exists.
    pub objective: f64,

    /// Number of times the incumbent was replaced.
    pub update_count: u64,

    direction: Direction,
}

impl IncumbentTracker {
    /// Create a tracker for the given objective direction.
    pub fn new(direction: Direction) -> Self {
        let objective = match direction {
            Direction::Maximize => f64::NEG_INFINITY,
            Direction::Minimize => f64::INFINITY,
        };
        Self {
            solution: None,
            objective,
            update_count: 0,
            direction,
        }
    }

    /// Check whether an incumbent exists.
    pub fn has_incumbent(&self) -> bool {
        self.solution.is_some()
    }

    /// Whether a candidate objective strictly improves on the incumbent.
    pub fn improves(&self, objective: f64, tol: f64) -> bool {
        match self.direction {
            Direction::Maximize => objective > self.objective + tol,
            Direction::Minimize => objective < self.objective - tol,
        }
    }

    /// Replace the incumbent on strict improvement.
    ///
    /// Returns true if the incumbent was replaced.
    pub fn update(&mut self, x: &[f64], objective: f64, tol: f64) -> bool {
        if self.improves(objective, tol) {
            self.solution = Some(x.to_vec());
            self.objective = objective;
            self.update_count += 1;
            true
        } else {
            false
        }
    }
}
