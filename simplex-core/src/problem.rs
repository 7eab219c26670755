//! Problem data structures and validation.
//!
//! This module defines the immutable linear-program description consumed by
//! the engine, together with solver options and the solve result types.

use std::fmt;

use crate::tableau::TableauSnapshot;

/// Objective direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Maximize the objective.
    Maximize,
    /// Minimize the objective.
    Minimize,
}

/// Constraint relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Left-hand side ≤ right-hand side.
    Le,
    /// Left-hand side ≥ right-hand side.
    Ge,
    /// Left-hand side = right-hand side.
    Eq,
}

impl Relation {
    /// The relation obtained by multiplying both sides by −1.
    pub fn flipped(self) -> Self {
        match self {
            Relation::Le => Relation::Ge,
            Relation::Ge => Relation::Le,
            Relation::Eq => Relation::Eq,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Le => write!(f, "<="),
            Relation::Ge => write!(f, ">="),
            Relation::Eq => write!(f, "="),
        }
    }
}

/// Variable kind, resolved once at model construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarKind {
    /// Continuous variable; non-negative by convention.
    #[default]
    Continuous,
    /// Explicitly non-negative (x ≥ 0).
    NonNegative,
    /// Non-positive (x ≤ 0).
    NonPositive,
    /// General integer variable (x ≥ 0, integral).
    Integer,
    /// Binary variable (x ∈ {0, 1}).
    Binary,
}

impl VarKind {
    /// Whether this kind carries an integrality requirement.
    pub fn is_integer(self) -> bool {
        matches!(self, VarKind::Integer | VarKind::Binary)
    }
}

/// A single linear constraint: `coefs · x <relation> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Coefficient per structural variable (length n).
    pub coefs: Vec<f64>,

    /// Relation between left- and right-hand side.
    pub relation: Relation,

    /// Scalar right-hand side.
    pub rhs: f64,
}

impl Constraint {
    /// Create a constraint.
    pub fn new(coefs: Vec<f64>, relation: Relation, rhs: f64) -> Self {
        Self { coefs, relation, rhs }
    }

    /// Evaluate the left-hand side at a point.
    pub fn lhs_at(&self, x: &[f64]) -> f64 {
        self.coefs.iter().zip(x).map(|(a, xi)| a * xi).sum()
    }

    /// Check whether a point satisfies this constraint within tolerance.
    pub fn is_satisfied(&self, x: &[f64], tol: f64) -> bool {
        let lhs = self.lhs_at(x);
        match self.relation {
            Relation::Le => lhs <= self.rhs + tol,
            Relation::Ge => lhs >= self.rhs - tol,
            Relation::Eq => (lhs - self.rhs).abs() <= tol,
        }
    }
}

/// Immutable linear-program description.
///
/// A model is never mutated in place: search layers derive tightened
/// variants by structural copy plus appended constraints
/// ([`Model::with_constraints`]).
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Objective direction.
    pub direction: Direction,

    /// Objective coefficient per variable; its length defines n.
    pub objective: Vec<f64>,

    /// Ordered constraint list.
    pub constraints: Vec<Constraint>,

    /// Kind per variable (length n).
    pub var_kinds: Vec<VarKind>,
}

impl Model {
    /// Create a model with all variables non-negative continuous.
    pub fn new(direction: Direction, objective: Vec<f64>, constraints: Vec<Constraint>) -> Self {
        let n = objective.len();
        Self {
            direction,
            objective,
            constraints,
            var_kinds: vec![VarKind::NonNegative; n],
        }
    }

    /// Number of structural variables (n).
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Number of constraints (m).
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Validate dimensions.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.num_vars();
        if n == 0 {
            return Err("model has no variables".to_string());
        }
        if self.var_kinds.len() != n {
            return Err(format!(
                "kind vector has length {}, expected {}",
                self.var_kinds.len(),
                n
            ));
        }
        for (i, c) in self.constraints.iter().enumerate() {
            if c.coefs.len() != n {
                return Err(format!(
                    "constraint {} has {} coefficients, expected {}",
                    i,
                    c.coefs.len(),
                    n
                ));
            }
            if !c.rhs.is_finite() || c.coefs.iter().any(|a| !a.is_finite()) {
                return Err(format!("constraint {} has a non-finite entry", i));
            }
        }
        if self.objective.iter().any(|c| !c.is_finite()) {
            return Err("objective has a non-finite coefficient".to_string());
        }
        Ok(())
    }

    /// Derive a new model by appending extra constraints.
    pub fn with_constraints(&self, extra: &[Constraint]) -> Self {
        let mut derived = self.clone();
        derived.constraints.extend_from_slice(extra);
        derived
    }

    /// Evaluate the original objective at a point.
    pub fn objective_at(&self, x: &[f64]) -> f64 {
        self.objective.iter().zip(x).map(|(c, xi)| c * xi).sum()
    }

    /// Check whether a point satisfies every constraint within tolerance.
    pub fn is_feasible(&self, x: &[f64], tol: f64) -> bool {
        self.constraints.iter().all(|c| c.is_satisfied(x, tol))
    }

    /// Indices of variables carrying an integrality requirement.
    pub fn integer_vars(&self) -> Vec<usize> {
        self.var_kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| k.is_integer())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Solver options.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    /// Pivot iteration cap, shared across Phase I and Phase II.
    pub max_iterations: usize,

    /// Deadline in milliseconds, checked once per pivot iteration
    /// (None = no limit). A solve cut short this way reports
    /// [`SolveStatus::IterationLimit`].
    pub time_limit_ms: Option<u64>,

    /// Emit a log line per pivot.
    pub show_steps: bool,

    /// User tolerance for constraint-satisfaction and solution-character
    /// checks. Pivot and ratio comparisons use fixed internal epsilons.
    pub tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            time_limit_ms: None,
            show_steps: false,
            tolerance: 1e-6,
        }
    }
}

impl SolverOptions {
    /// Set the pivot iteration cap.
    pub fn with_max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = cap;
        self
    }

    /// Set the deadline in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Enable per-pivot logging.
    pub fn with_show_steps(mut self, show: bool) -> Self {
        self.show_steps = show;
        self
    }
}

/// Solve status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,

    /// No feasible point exists.
    Infeasible,

    /// Objective improves without bound over the feasible region.
    Unbounded,

    /// Pivot iteration cap reached before termination.
    IterationLimit,

    /// A numeric operation failed mid-solve.
    Error,
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveStatus::Optimal => write!(f, "Optimal"),
            SolveStatus::Infeasible => write!(f, "Infeasible"),
            SolveStatus::Unbounded => write!(f, "Unbounded"),
            SolveStatus::IterationLimit => write!(f, "Iteration Limit"),
            SolveStatus::Error => write!(f, "Error"),
        }
    }
}

/// Result of one relaxation solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Solve status.
    pub status: SolveStatus,

    /// Objective value at the reported assignment, recomputed from the
    /// original objective coefficients. ±∞ when unbounded, NaN when the
    /// iteration cap was hit.
    pub objective: f64,

    /// Variable assignment (length n): the optimum, or the last basic
    /// point reached for Unbounded/IterationLimit outcomes.
    pub assignment: Vec<f64>,

    /// Pivot iterations consumed.
    pub iterations: usize,

    /// Terminal tableau and basis, for downstream consumers (sensitivity,
    /// ray reconstruction, solution-character analysis).
    pub snapshot: Option<TableauSnapshot>,
}

impl SolveResult {
    /// Result for a pre-check infeasibility (no tableau was built).
    pub fn infeasible() -> Self {
        Self {
            status: SolveStatus::Infeasible,
            objective: f64::NAN,
            assignment: Vec::new(),
            iterations: 0,
            snapshot: None,
        }
    }
}
