//! simplex-mip: mixed-integer search layers over `simplex-core`.
//!
//! Two orchestrators solve integer/binary-constrained models by repeatedly
//! re-solving tightened continuous relaxations through the tableau engine:
//!
//! - [`BranchAndBound`]: best-first tree search ordered by relaxation
//!   bounds, with bound-domination pruning and fixed depth/node safety
//!   caps.
//! - [`CuttingPlane`]: iterative refinement adding one de-duplicated
//!   bound cut per round, with a rounding fallback.
//!
//! Both own cloned/overlaid models per node or iteration; a failed
//! relaxation solve fathoms the affected node instead of aborting the
//! search. The terminal status distinguishes a proven [`MipStatus::Infeasible`]
//! (frontier exhausted) from a truncated [`MipStatus::SearchLimit`] search.
//!
//! # Example
//!
//! ```
//! use simplex_core::{Constraint, Direction, Model, Relation, VarKind};
//! use simplex_mip::{solve_branch_and_bound, MipSettings, MipStatus};
//!
//! // 0/1 knapsack: max 5a + 4b + 3c s.t. 2a + 3b + c <= 4.
//! let mut model = Model::new(
//!     Direction::Maximize,
//!     vec![5.0, 4.0, 3.0],
//!     vec![Constraint::new(vec![2.0, 3.0, 1.0], Relation::Le, 4.0)],
//! );
//! model.var_kinds = vec![VarKind::Binary; 3];
//!
//! let solution = solve_branch_and_bound(&model, &MipSettings::default()).unwrap();
//! assert_eq!(solution.status, MipStatus::Optimal);
//! assert!((solution.objective - 8.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

pub mod cuts;
mod error;
mod problem;
pub mod search;
mod settings;

pub use cuts::CuttingPlane;
pub use error::{MipError, MipResult};
pub use problem::{FractionalVar, IncumbentTracker, MipProblem, MipSolution, MipStatus};
pub use search::BranchAndBound;
pub use settings::MipSettings;

use simplex_core::Model;

/// Solve a mixed-integer model with best-first branch-and-bound.
pub fn solve_branch_and_bound(model: &Model, settings: &MipSettings) -> MipResult<MipSolution> {
    Ok(BranchAndBound::new(model.clone(), settings.clone())?.solve())
}

/// Solve a mixed-integer model with iterative cutting-plane refinement.
pub fn solve_cutting_plane(model: &Model, settings: &MipSettings) -> MipResult<MipSolution> {
    Ok(CuttingPlane::new(model.clone(), settings.clone())?.solve())
}
